//! Evaluation of univariate orthonormal polynomials from their recurrence coefficients.
//!
//! Polynomial values are always obtained with the three-term recurrence normalized at each
//! degree, which keeps magnitudes bounded at high degree. Monomial powers are never formed.
use crate::errors::Result;
use crate::recurrence::RecurrenceCoefficients;
use libm::lgamma;
use ndarray::{s, Array2, ArrayBase, Data, Ix1, Zip};

/// Evaluates the orthonormal polynomials of degree `0..=nmax` at samples `x`.
///
/// The degree-n orthonormal polynomial `p_n` satisfies
/// `b_{n+1} p_{n+1} = (x - a_n) p_n - b_n p_{n-1}` with `p_0 = 1 / b_0`.
///
/// # Returns
///
/// * A (nsamples, nmax + 1) matrix where the jth column holds `p_j(x)`
///
/// Fails with a configuration error if `ab` has less than `nmax + 1` rows.
pub fn evaluate(
    x: &ArrayBase<impl Data<Elem = f64>, Ix1>,
    nmax: usize,
    ab: &RecurrenceCoefficients,
) -> Result<Array2<f64>> {
    ab.check_degree(nmax)?;
    let a = ab.alpha();
    let b = ab.beta();

    let mut p = Array2::zeros((x.len(), nmax + 1));
    Zip::from(p.rows_mut()).and(x).for_each(|mut row, &xi| {
        row[0] = 1. / b[0];
        if nmax > 0 {
            row[1] = (xi - a[0]) * row[0] / b[1];
        }
        for j in 2..=nmax {
            row[j] = ((xi - a[j - 1]) * row[j - 1] - b[j - 1] * row[j - 2]) / b[j];
        }
    });
    Ok(p)
}

/// Evaluates the orthonormal polynomials of degree `0..=nmax` and their derivatives
/// up to order `deriv_order` at samples `x`.
///
/// # Returns
///
/// * A (nsamples, (nmax + 1) * (deriv_order + 1)) matrix where columns
///   `d * (nmax + 1)..(d + 1) * (nmax + 1)` hold the d-th derivatives `p_j^(d)(x)`, j = 0..=nmax.
pub fn evaluate_with_derivatives(
    x: &ArrayBase<impl Data<Elem = f64>, Ix1>,
    nmax: usize,
    ab: &RecurrenceCoefficients,
    deriv_order: usize,
) -> Result<Array2<f64>> {
    let p = evaluate(x, nmax, ab)?;
    let a = ab.alpha();
    let b = ab.beta();
    let nindices = nmax + 1;

    let mut result = Array2::zeros((x.len(), nindices * (deriv_order + 1)));
    result.slice_mut(s![.., ..nindices]).assign(&p);

    let mut lower = p;
    for d in 1..=deriv_order {
        let mut pd = Array2::zeros((x.len(), nindices));
        if d <= nmax {
            // d-th derivative of p_d is d! times its leading coefficient 1 / prod_{i<=d} b_i,
            // computed in log-domain to avoid overflow
            let log_b: f64 = b.slice(s![..=d]).iter().map(|v| v.ln()).sum();
            let leading = (lgamma(d as f64 + 1.) - log_b).exp();
            let fd = d as f64;
            Zip::from(pd.rows_mut())
                .and(lower.rows())
                .and(x)
                .for_each(|mut row, low, &xi| {
                    row[d] = leading;
                    for j in d + 1..nindices {
                        row[j] = ((xi - a[j - 1]) * row[j - 1] - b[j - 1] * row[j - 2]
                            + fd * low[j - 1])
                            / b[j];
                    }
                });
        }
        result
            .slice_mut(s![.., d * nindices..(d + 1) * nindices])
            .assign(&pd);
        lower = pd;
    }
    Ok(result)
}

/// Evaluates the monic polynomials of degree `0..=nmax` at samples `x`, that is
/// the orthonormal polynomials scaled so that their leading coefficient is one:
/// `pi_j = p_j * prod_{i<=j} b_i`.
pub fn evaluate_monic(
    x: &ArrayBase<impl Data<Elem = f64>, Ix1>,
    nmax: usize,
    ab: &RecurrenceCoefficients,
) -> Result<Array2<f64>> {
    ab.check_degree(nmax)?;
    let a = ab.alpha();
    let b = ab.beta();

    let mut p = Array2::zeros((x.len(), nmax + 1));
    Zip::from(p.rows_mut()).and(x).for_each(|mut row, &xi| {
        row[0] = 1.;
        if nmax > 0 {
            row[1] = xi - a[0];
        }
        for j in 2..=nmax {
            row[j] = (xi - a[j - 1]) * row[j - 1] - b[j - 1] * b[j - 1] * row[j - 2];
        }
    });
    Ok(p)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recurrence::*;
    use approx::assert_abs_diff_eq;
    use ndarray::{array, Array, Array1};

    #[test]
    fn test_legendre_values() {
        let ab = jacobi_recurrence(4, 0., 0., true).unwrap();
        let x = array![-1., -0.5, 0., 0.3, 1.];
        let p = evaluate(&x, 3, &ab).unwrap();
        // orthonormal Legendre wrt uniform probability on [-1, 1]: sqrt(2n+1) P_n
        let expected_p2 = x.mapv(|v: f64| 5f64.sqrt() * 0.5 * (3. * v * v - 1.));
        let expected_p3 = x.mapv(|v: f64| 7f64.sqrt() * 0.5 * (5. * v * v * v - 3. * v));
        assert_abs_diff_eq!(p.column(0).to_owned(), Array1::ones(5), epsilon = 1e-14);
        assert_abs_diff_eq!(p.column(1).to_owned(), &x * 3f64.sqrt(), epsilon = 1e-14);
        assert_abs_diff_eq!(p.column(2).to_owned(), expected_p2, epsilon = 1e-13);
        assert_abs_diff_eq!(p.column(3).to_owned(), expected_p3, epsilon = 1e-13);
    }

    #[test]
    fn test_hermite_values() {
        let ab = hermite_recurrence(4, 0., true).unwrap();
        let x = array![-2., 0.1, 1.5];
        let p = evaluate(&x, 3, &ab).unwrap();
        let expected_p3 = x.mapv(|v: f64| (v * v * v - 3. * v) / 6f64.sqrt());
        assert_abs_diff_eq!(p.column(3).to_owned(), expected_p3, epsilon = 1e-13);
    }

    #[test]
    fn test_not_enough_coefficients() {
        let ab = jacobi_recurrence(3, 0., 0., true).unwrap();
        let x = array![0.];
        assert!(evaluate(&x, 3, &ab).is_err());
        assert!(evaluate(&x, 2, &ab).is_ok());
        assert!(evaluate_with_derivatives(&x, 3, &ab, 1).is_err());
        assert!(evaluate_monic(&x, 3, &ab).is_err());
        assert!(evaluate(&x, 0, &RecurrenceCoefficients::empty()).is_err());
    }

    #[test]
    fn test_derivatives_against_finite_differences() {
        let families = [
            PolynomialFamily::Jacobi {
                alpha: 0.,
                beta: 0.,
                probability: true,
            },
            PolynomialFamily::Jacobi {
                alpha: 2.,
                beta: 1.,
                probability: false,
            },
            PolynomialFamily::Hermite {
                rho: 0.,
                probability: true,
            },
        ];
        let nmax = 8;
        let x = Array::linspace(-0.8, 0.8, 13);
        let h = 1e-6;
        for family in families.iter() {
            let ab = recurrence_coefficients(family, nmax + 1).unwrap();
            let values = evaluate_with_derivatives(&x, nmax, &ab, 1).unwrap();
            let p_plus = evaluate(&(&x + h), nmax, &ab).unwrap();
            let p_minus = evaluate(&(&x - h), nmax, &ab).unwrap();
            let fd = (p_plus - p_minus) / (2. * h);
            assert_abs_diff_eq!(
                values.slice(s![.., nmax + 1..]).to_owned(),
                fd,
                epsilon = 1e-6
            );
        }
    }

    #[test]
    fn test_second_derivatives() {
        let ab = jacobi_recurrence(5, 0., 0., true).unwrap();
        let x = array![-0.7, 0.2, 0.9];
        let values = evaluate_with_derivatives(&x, 4, &ab, 2).unwrap();
        assert_eq!(values.dim(), (3, 15));
        // p_2 = sqrt(5)/2 (3x^2 - 1): p_2'' = 3 sqrt(5)
        assert_abs_diff_eq!(
            values.column(12).to_owned(),
            Array1::from_elem(3, 3. * 5f64.sqrt()),
            epsilon = 1e-12
        );
        // p_3 = sqrt(7)/2 (5x^3 - 3x): p_3'' = 15 sqrt(7) x
        assert_abs_diff_eq!(
            values.column(13).to_owned(),
            &x * (15. * 7f64.sqrt()),
            epsilon = 1e-12
        );
        // derivatives of order d vanish below degree d
        assert_abs_diff_eq!(
            values.slice(s![.., 10..12]).to_owned(),
            Array2::zeros((3, 2)),
            epsilon = 1e-15
        );
    }

    #[test]
    fn test_monic_matches_scaled_orthonormal() {
        let ab = jacobi_recurrence(7, 1., 3., false).unwrap();
        let x = Array::linspace(-1., 1., 9);
        let p = evaluate(&x, 6, &ab).unwrap();
        let monic = evaluate_monic(&x, 6, &ab).unwrap();
        let mut scale = 1.;
        for j in 0..7 {
            scale *= ab.beta()[j];
            assert_abs_diff_eq!(
                monic.column(j).to_owned(),
                &p.column(j) * scale,
                epsilon = 1e-12
            );
        }
    }
}
