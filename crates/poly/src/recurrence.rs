use crate::errors::{PolyError, Result};
use libm::{lgamma, tgamma};
use log::warn;
use ndarray::{Array1, Array2, ArrayBase, ArrayView1, Data, Ix1};
use std::f64::consts::LN_2;
use std::fmt::Display;

#[cfg(feature = "serializable")]
use serde::{Deserialize, Serialize};

/// Table of recurrence coefficients of an orthonormal polynomial family.
///
/// The ith row holds `(alpha_i, beta_i)`. The first beta entry is not a recurrence term:
/// it is the square root of the weight function integral (1 for a probability measure)
/// so that the degree-0 orthonormal polynomial is `1 / beta_0`.
///
/// A table is immutable: when more terms are needed a new table is computed.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serializable", derive(Serialize, Deserialize))]
pub struct RecurrenceCoefficients(Array2<f64>);

impl RecurrenceCoefficients {
    /// Constructor from a raw (nterms, 2) table `[[alpha_0, beta_0], ...]`
    ///
    /// Fails with a configuration error if the table has not 2 columns,
    /// holds non finite values or negative beta values.
    pub fn new(ab: Array2<f64>) -> Result<Self> {
        if ab.ncols() != 2 {
            return Err(PolyError::ConfigurationError(format!(
                "recurrence table must have 2 columns (alpha, beta), got {}",
                ab.ncols()
            )));
        }
        if ab.iter().any(|v| !v.is_finite()) {
            return Err(PolyError::ConfigurationError(
                "recurrence table holds non finite values".to_string(),
            ));
        }
        if let Some(i) = ab.column(1).iter().position(|&b| b < 0.) {
            return Err(PolyError::ConfigurationError(format!(
                "recurrence beta[{i}] = {} is negative",
                ab[[i, 1]]
            )));
        }
        Ok(RecurrenceCoefficients(ab))
    }

    /// An empty (0, 2) table
    pub fn empty() -> Self {
        RecurrenceCoefficients(Array2::zeros((0, 2)))
    }

    /// Number of rows, hence polynomials of degree `0..len()` can be evaluated
    pub fn len(&self) -> usize {
        self.0.nrows()
    }

    /// Whether the table has no row
    pub fn is_empty(&self) -> bool {
        self.0.nrows() == 0
    }

    /// Diagonal coefficients column
    pub fn alpha(&self) -> ArrayView1<f64> {
        self.0.column(0)
    }

    /// Off-diagonal coefficients column (first entry is the normalization constant)
    pub fn beta(&self) -> ArrayView1<f64> {
        self.0.column(1)
    }

    /// Raw (nterms, 2) table
    pub fn as_array(&self) -> &Array2<f64> {
        &self.0
    }

    /// Consumes the table and returns the raw (nterms, 2) array
    pub fn into_array(self) -> Array2<f64> {
        self.0
    }

    /// Checks polynomials up to degree `nmax` can be evaluated with this table
    pub(crate) fn check_degree(&self, nmax: usize) -> Result<()> {
        if nmax >= self.len() {
            return Err(PolyError::ConfigurationError(format!(
                "degree {nmax} requires at least {} recurrence rows, got {}",
                nmax + 1,
                self.len()
            )));
        }
        Ok(())
    }
}

/// Orthonormal polynomial families for which recurrence coefficients are known in closed form
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serializable", derive(Serialize, Deserialize))]
pub enum PolynomialFamily {
    /// Generalized Hermite polynomials orthonormal wrt `|x|^(2 rho) exp(-x^2)`,
    /// with `rho = 0` and probability measure the probabilists' Hermite polynomials
    /// orthonormal wrt the standard normal distribution.
    Hermite {
        /// Weight parameter (rho > -1/2)
        rho: f64,
        /// Normalize the weight as a probability measure
        probability: bool,
    },
    /// Jacobi polynomials orthonormal wrt `(1-x)^alpha (1+x)^beta` on `[-1, 1]`.
    /// For a Beta(a, b) random variable mapped onto `[-1, 1]`, `alpha = b - 1` and `beta = a - 1`.
    Jacobi {
        /// First parameter (alpha > -1)
        alpha: f64,
        /// Second parameter (beta > -1)
        beta: f64,
        /// Normalize the weight as a probability measure
        probability: bool,
    },
    /// Charlier polynomials orthonormal wrt the Poisson distribution
    Charlier {
        /// Poisson rate
        rate: f64,
    },
    /// Krawtchouk polynomials orthonormal wrt the binomial distribution
    Krawtchouk {
        /// Number of trials
        ntrials: usize,
        /// Probability of success in (0, 1)
        p: f64,
    },
    /// Hahn polynomials orthonormal wrt the (generalized) hypergeometric distribution on `0..=ndraws`
    Hahn {
        /// Number of draws
        ndraws: usize,
        /// First parameter
        alpha: f64,
        /// Second parameter
        beta: f64,
    },
    /// Discrete Chebyshev (Gram) polynomials orthonormal wrt the uniform measure on `0..nmasses`
    DiscreteChebyshev {
        /// Number of probability masses
        nmasses: usize,
    },
}

impl Display for PolynomialFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PolynomialFamily::Hermite { rho, probability } => {
                write!(f, "Hermite(rho={rho}, probability={probability})")
            }
            PolynomialFamily::Jacobi {
                alpha,
                beta,
                probability,
            } => write!(
                f,
                "Jacobi(alpha={alpha}, beta={beta}, probability={probability})"
            ),
            PolynomialFamily::Charlier { rate } => write!(f, "Charlier(rate={rate})"),
            PolynomialFamily::Krawtchouk { ntrials, p } => {
                write!(f, "Krawtchouk(ntrials={ntrials}, p={p})")
            }
            PolynomialFamily::Hahn {
                ndraws,
                alpha,
                beta,
            } => write!(f, "Hahn(ndraws={ndraws}, alpha={alpha}, beta={beta})"),
            PolynomialFamily::DiscreteChebyshev { nmasses } => {
                write!(f, "DiscreteChebyshev(nmasses={nmasses})")
            }
        }
    }
}

/// Computes the recurrence coefficients of the first `nterms` orthonormal polynomials of the given family.
///
/// Returns a (nterms, 2) table, except for [PolynomialFamily::Charlier] which returns `nterms + 1` rows.
/// `nterms == 0` returns an empty (0, 2) table.
///
/// ```
/// use uqbox_poly::{recurrence_coefficients, PolynomialFamily};
///
/// let legendre = PolynomialFamily::Jacobi { alpha: 0., beta: 0., probability: true };
/// let ab = recurrence_coefficients(&legendre, 5).unwrap();
/// assert_eq!(ab.len(), 5);
/// ```
pub fn recurrence_coefficients(
    family: &PolynomialFamily,
    nterms: usize,
) -> Result<RecurrenceCoefficients> {
    match *family {
        PolynomialFamily::Hermite { rho, probability } => {
            hermite_recurrence(nterms, rho, probability)
        }
        PolynomialFamily::Jacobi {
            alpha,
            beta,
            probability,
        } => jacobi_recurrence(nterms, alpha, beta, probability),
        PolynomialFamily::Charlier { rate } => charlier_recurrence(nterms, rate),
        PolynomialFamily::Krawtchouk { ntrials, p } => krawtchouk_recurrence(nterms, ntrials, p),
        PolynomialFamily::Hahn {
            ndraws,
            alpha,
            beta,
        } => hahn_recurrence(nterms, ndraws, alpha, beta),
        PolynomialFamily::DiscreteChebyshev { nmasses } => {
            discrete_chebyshev_recurrence(nterms, nmasses)
        }
    }
}

/// Takes the square root of the beta column holding squared recurrence terms.
/// Tiny negative values coming from cancellation are clamped to zero.
fn sqrt_betas(mut ab: Array2<f64>, family: &str) -> Array2<f64> {
    for (i, b) in ab.column_mut(1).iter_mut().enumerate() {
        if *b < 0. {
            warn!("Numerical degeneracy: {family} recurrence beta^2[{i}] = {b:e} clamped to zero");
            *b = 0.;
        }
        *b = b.sqrt();
    }
    ab
}

/// Recurrence coefficients of the generalized Hermite polynomials orthonormal
/// wrt `|x|^(2 rho) exp(-x^2)`.
///
/// With `rho = 0` and `probability = true` the probabilists' Hermite polynomials
/// orthonormal wrt the standard normal distribution are obtained.
pub fn hermite_recurrence(
    nterms: usize,
    rho: f64,
    probability: bool,
) -> Result<RecurrenceCoefficients> {
    if nterms < 1 {
        return Ok(RecurrenceCoefficients::empty());
    }
    if rho <= -0.5 || !rho.is_finite() {
        return Err(PolyError::ConfigurationError(format!(
            "Hermite parameter rho should be greater than -1/2, got {rho}"
        )));
    }
    let mut ab = Array2::zeros((nterms, 2));
    // = sqrt(pi) when rho = 0
    ab[[0, 1]] = tgamma(rho + 0.5);
    for n in 1..nterms {
        ab[[n, 1]] = if rho == 0. && probability {
            n as f64
        } else {
            0.5 * n as f64
        };
        if n % 2 == 1 {
            ab[[n, 1]] += rho;
        }
    }
    let mut ab = sqrt_betas(ab, "Hermite");
    if probability {
        ab[[0, 1]] = 1.;
    }
    RecurrenceCoefficients::new(ab)
}

/// Recurrence coefficients of the Jacobi polynomials orthonormal wrt `(1-x)^alpha (1+x)^beta`
/// on `[-1, 1]`, hence wrt Beta(beta + 1, alpha + 1) random variables mapped on `[-1, 1]`.
///
/// The weight normalization is computed in log-domain to avoid overflow for large parameters.
/// The second row is computed with its own closed form as the general formula is singular
/// for small indices (e.g. `alpha + beta = -1`).
pub fn jacobi_recurrence(
    nterms: usize,
    alpha: f64,
    beta: f64,
    probability: bool,
) -> Result<RecurrenceCoefficients> {
    if nterms < 1 {
        return Ok(RecurrenceCoefficients::empty());
    }
    if alpha <= -1. || beta <= -1. || !alpha.is_finite() || !beta.is_finite() {
        return Err(PolyError::ConfigurationError(format!(
            "Jacobi parameters should be greater than -1, got alpha={alpha}, beta={beta}"
        )));
    }
    let mut ab = Array2::zeros((nterms, 2));
    ab.column_mut(0).fill(beta * beta - alpha * alpha);
    ab.column_mut(1).fill(1.);

    ab[[0, 0]] = (beta - alpha) / (alpha + beta + 2.);
    ab[[0, 1]] = ((alpha + beta + 1.) * LN_2 + lgamma(alpha + 1.) + lgamma(beta + 1.)
        - lgamma(alpha + beta + 2.))
    .exp();

    if nterms > 1 {
        ab[[1, 0]] /= (2. + alpha + beta) * (4. + alpha + beta);
        ab[[1, 1]] = 4. * (alpha + 1.) * (beta + 1.)
            / ((alpha + beta + 2.).powi(2) * (alpha + beta + 3.));
    }

    for i in 2..nterms {
        let fi = i as f64;
        let s = 2. * fi + alpha + beta;
        ab[[i, 0]] /= s * (s + 2.);
        ab[[i, 1]] = 4. * fi * (fi + alpha) * (fi + beta) * (fi + alpha + beta)
            / (s * s * (s + 1.) * (s - 1.));
    }

    let mut ab = sqrt_betas(ab, "Jacobi");
    if probability {
        ab[[0, 1]] = 1.;
    }
    RecurrenceCoefficients::new(ab)
}

/// Recurrence coefficients of the Charlier polynomials orthonormal wrt the Poisson distribution
/// of given `rate`. Returns `nterms + 1` rows.
///
/// As the rate gets smaller the number of terms that can be accurately computed decreases:
/// the probability mass concentrates on a few points so that the higher degree terms
/// cannot be resolved numerically.
pub fn charlier_recurrence(nterms: usize, rate: f64) -> Result<RecurrenceCoefficients> {
    if nterms < 1 {
        return Ok(RecurrenceCoefficients::empty());
    }
    if rate <= 0. || !rate.is_finite() {
        return Err(PolyError::ConfigurationError(format!(
            "Charlier rate should be positive, got {rate}"
        )));
    }
    let mut ab = Array2::zeros((nterms + 1, 2));
    ab[[0, 0]] = rate;
    ab[[0, 1]] = 1.;
    for i in 1..=nterms {
        ab[[i, 0]] = rate + i as f64;
        ab[[i, 1]] = rate * i as f64;
    }
    RecurrenceCoefficients::new(sqrt_betas(ab, "Charlier"))
}

/// Recurrence coefficients of the Krawtchouk polynomials orthonormal wrt the binomial
/// distribution of `ntrials` trials with success probability `p`.
pub fn krawtchouk_recurrence(
    nterms: usize,
    ntrials: usize,
    p: f64,
) -> Result<RecurrenceCoefficients> {
    if nterms > ntrials {
        return Err(PolyError::ConfigurationError(format!(
            "Krawtchouk: number of terms ({nterms}) should not exceed number of trials ({ntrials})"
        )));
    }
    if p <= 0. || p >= 1. {
        return Err(PolyError::ConfigurationError(format!(
            "Krawtchouk: probability of success should be in (0, 1), got {p}"
        )));
    }
    if nterms < 1 {
        return Ok(RecurrenceCoefficients::empty());
    }
    let n_trials = ntrials as f64;
    let mut ab = Array2::zeros((nterms, 2));
    for n in 0..nterms {
        let fnn = n as f64;
        ab[[n, 0]] = p * (n_trials - fnn) + fnn * (1. - p);
        ab[[n, 1]] = p * (1. - p) * fnn * (n_trials - fnn + 1.);
    }
    let mut ab = sqrt_betas(ab, "Krawtchouk");
    // beta_0 comes out 0 from the closed form, use the norm of p_0 instead
    ab[[0, 1]] = 1.;
    RecurrenceCoefficients::new(ab)
}

/// Recurrence coefficients of the Hahn polynomials orthonormal wrt the weight
/// `C(alpha + x, x) C(beta + ndraws - x, ndraws - x)` on `x = 0..=ndraws`
/// (hypergeometric distribution for negative integer parameters).
pub fn hahn_recurrence(
    nterms: usize,
    ndraws: usize,
    alpha: f64,
    beta: f64,
) -> Result<RecurrenceCoefficients> {
    if nterms > ndraws {
        return Err(PolyError::ConfigurationError(format!(
            "Hahn: number of terms ({nterms}) should not exceed number of draws ({ndraws})"
        )));
    }
    if nterms < 1 {
        return Ok(RecurrenceCoefficients::empty());
    }
    let n_draws = ndraws as f64;
    let (a_n, c_n): (Vec<f64>, Vec<f64>) = (0..nterms)
        .map(|n| {
            let fnn = n as f64;
            let num_a = (alpha + fnn + 1.) * (n_draws - fnn) * (fnn + alpha + beta + 1.);
            let den_a = (alpha + beta + 2. * fnn + 1.) * (alpha + beta + 2. * fnn + 2.);
            // C_0 carries a factor n, keep it zero even when its denominator vanishes
            let c = if n == 0 {
                0.
            } else {
                let num_c = fnn * (beta + fnn) * (n_draws + alpha + beta + fnn + 1.);
                let den_c = (alpha + beta + 2. * fnn + 1.) * (alpha + beta + 2. * fnn);
                num_c / den_c
            };
            (num_a / den_a, c)
        })
        .unzip();

    let mut ab = Array2::zeros((nterms, 2));
    ab[[0, 0]] = a_n[0] + c_n[0];
    ab[[0, 1]] = 1.;
    for n in 1..nterms {
        ab[[n, 0]] = a_n[n] + c_n[n];
        ab[[n, 1]] = a_n[n - 1] * c_n[n];
    }
    let mut ab = sqrt_betas(ab, "Hahn");
    ab[[0, 1]] = 1.;
    RecurrenceCoefficients::new(ab)
}

/// Recurrence coefficients of the discrete Chebyshev polynomials orthonormal wrt
/// the uniform probability measure on `{0, ..., nmasses - 1}`.
pub fn discrete_chebyshev_recurrence(
    nterms: usize,
    nmasses: usize,
) -> Result<RecurrenceCoefficients> {
    if nterms > nmasses {
        return Err(PolyError::ConfigurationError(format!(
            "Discrete Chebyshev: number of terms ({nterms}) should not exceed number of masses ({nmasses})"
        )));
    }
    if nterms < 1 {
        return Ok(RecurrenceCoefficients::empty());
    }
    let m = nmasses as f64;
    let mut ab = Array2::zeros((nterms, 2));
    ab.column_mut(0).fill(0.5 * m * (1. - 1. / m));
    ab[[0, 1]] = m;
    for i in 1..nterms {
        let fi = i as f64;
        ab[[i, 1]] = 0.25 * m * m * (1. - (fi / m).powi(2)) / (4. - 1. / (fi * fi));
    }
    let mut ab = sqrt_betas(ab, "Discrete Chebyshev");
    ab[[0, 1]] = 1.;
    RecurrenceCoefficients::new(ab)
}

/// Recurrence coefficients of the polynomials orthonormal wrt the finite discrete measure
/// `sum_k probabilities[k] delta(x - masses[k])` computed with the Stieltjes procedure.
///
/// The first beta entry is `sqrt(sum_k probabilities[k])`, that is 1 for a probability measure.
/// At most `masses.len()` terms can be requested.
pub fn discrete_stieltjes_recurrence(
    masses: &ArrayBase<impl Data<Elem = f64>, Ix1>,
    probabilities: &ArrayBase<impl Data<Elem = f64>, Ix1>,
    nterms: usize,
) -> Result<RecurrenceCoefficients> {
    if masses.len() != probabilities.len() {
        return Err(PolyError::ConfigurationError(format!(
            "Stieltjes: masses ({}) and probabilities ({}) lengths differ",
            masses.len(),
            probabilities.len()
        )));
    }
    if nterms > masses.len() {
        return Err(PolyError::ConfigurationError(format!(
            "Stieltjes: number of terms ({nterms}) should not exceed number of masses ({})",
            masses.len()
        )));
    }
    if probabilities.iter().any(|&w| w < 0. || !w.is_finite()) {
        return Err(PolyError::ConfigurationError(
            "Stieltjes: probabilities should be finite non-negative values".to_string(),
        ));
    }
    if nterms < 1 {
        return Ok(RecurrenceCoefficients::empty());
    }
    let total = probabilities.sum();
    if total <= 0. {
        return Err(PolyError::ConfigurationError(
            "Stieltjes: measure has no mass".to_string(),
        ));
    }

    let mut ab = Array2::zeros((nterms, 2));
    ab[[0, 1]] = total.sqrt();
    let mut p_prev: Array1<f64> = Array1::zeros(masses.len());
    let mut p_curr: Array1<f64> = Array1::from_elem(masses.len(), 1. / ab[[0, 1]]);
    for k in 0..nterms {
        let alpha = (masses * &p_curr * &p_curr * probabilities).sum();
        ab[[k, 0]] = alpha;
        if k + 1 == nterms {
            break;
        }
        let r = (masses - alpha) * &p_curr - ab[[k, 1]] * &p_prev;
        let b2 = (&r * &r * probabilities).sum();
        if b2 <= 0. {
            return Err(PolyError::ConfigurationError(format!(
                "Stieltjes: measure support exhausted at degree {}",
                k + 1
            )));
        }
        ab[[k + 1, 1]] = b2.sqrt();
        p_prev = p_curr;
        p_curr = r / ab[[k + 1, 1]];
    }
    RecurrenceCoefficients::new(ab)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluate;
    use approx::assert_abs_diff_eq;
    use ndarray::{array, Array, Axis};

    fn all_families() -> Vec<PolynomialFamily> {
        vec![
            PolynomialFamily::Hermite {
                rho: 0.,
                probability: true,
            },
            PolynomialFamily::Hermite {
                rho: 1.5,
                probability: false,
            },
            PolynomialFamily::Jacobi {
                alpha: 0.,
                beta: 0.,
                probability: false,
            },
            PolynomialFamily::Jacobi {
                alpha: 4.,
                beta: 2.,
                probability: true,
            },
            PolynomialFamily::Charlier { rate: 3. },
            PolynomialFamily::Krawtchouk { ntrials: 12, p: 0.3 },
            PolynomialFamily::Hahn {
                ndraws: 12,
                alpha: 1.5,
                beta: 0.5,
            },
            PolynomialFamily::DiscreteChebyshev { nmasses: 12 },
        ]
    }

    /// Gram matrix of the first `nterms` polynomials wrt the discrete measure (x, w)
    fn gram(ab: &RecurrenceCoefficients, x: &Array1<f64>, w: &Array1<f64>, nterms: usize) -> Array2<f64> {
        let p = evaluate(x, nterms - 1, ab).unwrap();
        let pw = &p * &w.view().insert_axis(Axis(1));
        p.t().dot(&pw)
    }

    fn ln_binomial(n: f64, k: f64) -> f64 {
        lgamma(n + 1.) - lgamma(k + 1.) - lgamma(n - k + 1.)
    }

    #[test]
    fn test_empty_tables() {
        for family in all_families() {
            let ab = recurrence_coefficients(&family, 0).unwrap();
            assert_eq!(ab.as_array().dim(), (0, 2), "{family}");
        }
    }

    #[test]
    fn test_shapes_and_nonnegative_betas() {
        for family in all_families() {
            for nterms in 1..10 {
                let ab = recurrence_coefficients(&family, nterms).unwrap();
                let expected = match family {
                    PolynomialFamily::Charlier { .. } => nterms + 1,
                    _ => nterms,
                };
                assert_eq!(ab.len(), expected, "{family}");
                assert!(ab.beta().iter().all(|&b| b >= 0.), "{family}");
            }
        }
    }

    #[test]
    fn test_invalid_parameters() {
        assert!(krawtchouk_recurrence(5, 4, 0.5).is_err());
        assert!(krawtchouk_recurrence(3, 4, 1.).is_err());
        assert!(discrete_chebyshev_recurrence(6, 5).is_err());
        assert!(hahn_recurrence(6, 5, 1., 1.).is_err());
        assert!(jacobi_recurrence(3, -1., 0., true).is_err());
        assert!(charlier_recurrence(3, 0.).is_err());
        assert!(RecurrenceCoefficients::new(array![[0., -1.]]).is_err());
        assert!(RecurrenceCoefficients::new(array![[0., 1., 2.]]).is_err());
    }

    #[test]
    fn test_probabilists_hermite() {
        let ab = hermite_recurrence(6, 0., true).unwrap();
        let expected = array![1., 1., 2f64.sqrt(), 3f64.sqrt(), 2., 5f64.sqrt()];
        assert_abs_diff_eq!(ab.beta().to_owned(), expected, epsilon = 1e-14);
        assert_abs_diff_eq!(ab.alpha().to_owned(), Array1::zeros(6), epsilon = 1e-14);

        let ab = hermite_recurrence(3, 0., false).unwrap();
        assert_abs_diff_eq!(ab.beta()[0], std::f64::consts::PI.sqrt().sqrt(), epsilon = 1e-14);
        assert_abs_diff_eq!(ab.beta()[2], 1., epsilon = 1e-14);
    }

    #[test]
    fn test_legendre() {
        let ab = jacobi_recurrence(8, 0., 0., true).unwrap();
        assert_abs_diff_eq!(ab.beta()[0], 1., epsilon = 1e-14);
        for n in 1..8 {
            let fnn = n as f64;
            assert_abs_diff_eq!(
                ab.beta()[n],
                fnn / (4. * fnn * fnn - 1.).sqrt(),
                epsilon = 1e-14
            );
        }
        assert_abs_diff_eq!(ab.alpha().to_owned(), Array1::zeros(8), epsilon = 1e-14);

        let ab = jacobi_recurrence(2, 0., 0., false).unwrap();
        assert_abs_diff_eq!(ab.beta()[0], 2f64.sqrt(), epsilon = 1e-14);
    }

    #[test]
    fn test_jacobi_second_row() {
        let (alpha, beta) = (0.5, 1.5);
        let ab = jacobi_recurrence(3, alpha, beta, false).unwrap();
        let s: f64 = 2. + alpha + beta;
        let b2 = 4. * (1. + alpha) * (1. + beta) * (1. + alpha + beta)
            / (s * s * (s + 1.) * (s - 1.));
        assert_abs_diff_eq!(ab.beta()[1], b2.sqrt(), epsilon = 1e-14);
        assert_abs_diff_eq!(
            ab.alpha()[1],
            (beta * beta - alpha * alpha) / (s * (s + 2.)),
            epsilon = 1e-14
        );
        // Chebyshev first kind: alpha + beta = -1 makes the general formula singular
        let ab = jacobi_recurrence(4, -0.5, -0.5, true).unwrap();
        assert_abs_diff_eq!(ab.beta()[1], 0.5f64.sqrt(), epsilon = 1e-14);
        assert_abs_diff_eq!(ab.beta()[2], 0.5, epsilon = 1e-14);
    }

    #[test]
    fn test_jacobi_orthonormality() {
        let ab = jacobi_recurrence(30, 4., 2., true).unwrap();
        let (x, w) = crate::gauss_quadrature(&ab, 30).unwrap();
        let g = gram(&ab, &x, &w, 10);
        assert_abs_diff_eq!(g, Array2::eye(10), epsilon = 1e-10);
    }

    #[test]
    fn test_krawtchouk_orthonormality() {
        let (ntrials, p): (usize, f64) = (15, 0.35);
        let x = Array::range(0., ntrials as f64 + 1., 1.);
        let w = x.mapv(|k| {
            (ln_binomial(ntrials as f64, k) + k * p.ln() + (ntrials as f64 - k) * (1. - p).ln())
                .exp()
        });
        let ab = krawtchouk_recurrence(8, ntrials, p).unwrap();
        assert_abs_diff_eq!(gram(&ab, &x, &w, 8), Array2::eye(8), epsilon = 1e-10);
    }

    #[test]
    fn test_charlier_orthonormality() {
        let rate: f64 = 2.;
        let x = Array::range(0., 100., 1.);
        let w = x.mapv(|k: f64| (k * rate.ln() - rate - lgamma(k + 1.)).exp());
        let ab = charlier_recurrence(8, rate).unwrap();
        assert_abs_diff_eq!(gram(&ab, &x, &w, 8), Array2::eye(8), epsilon = 1e-10);
    }

    #[test]
    fn test_hahn_orthonormality() {
        let (ndraws, alpha, beta) = (10usize, 1.5, 0.5);
        let n = ndraws as f64;
        let x = Array::range(0., n + 1., 1.);
        let mut w = x.mapv(|k| {
            (lgamma(alpha + k + 1.) - lgamma(k + 1.) - lgamma(alpha + 1.)
                + lgamma(beta + n - k + 1.)
                - lgamma(n - k + 1.)
                - lgamma(beta + 1.))
            .exp()
        });
        w /= w.sum();
        let ab = hahn_recurrence(6, ndraws, alpha, beta).unwrap();
        assert_abs_diff_eq!(gram(&ab, &x, &w, 6), Array2::eye(6), epsilon = 1e-10);
    }

    #[test]
    fn test_discrete_chebyshev_orthonormality() {
        let nmasses = 11;
        let x = Array::range(0., nmasses as f64, 1.);
        let w = Array1::from_elem(nmasses, 1. / nmasses as f64);
        let ab = discrete_chebyshev_recurrence(9, nmasses).unwrap();
        assert_abs_diff_eq!(gram(&ab, &x, &w, 9), Array2::eye(9), epsilon = 1e-10);
    }

    #[test]
    fn test_stieltjes_orthonormality() {
        let x = Array::geomspace(1., 512., 10).unwrap();
        let w = Array::geomspace(1., 16., 10).unwrap();
        let w = &w / w.sum();
        let ab = discrete_stieltjes_recurrence(&x, &w, 6).unwrap();
        assert_abs_diff_eq!(ab.beta()[0], 1., epsilon = 1e-14);
        assert_abs_diff_eq!(gram(&ab, &x, &w, 6), Array2::eye(6), epsilon = 1e-8);
    }

    #[test]
    fn test_stieltjes_recovers_discrete_chebyshev() {
        let nmasses = 8;
        let x = Array::range(0., nmasses as f64, 1.);
        let w = Array1::from_elem(nmasses, 1. / nmasses as f64);
        let expected = discrete_chebyshev_recurrence(6, nmasses).unwrap();
        let actual = discrete_stieltjes_recurrence(&x, &w, 6).unwrap();
        assert_abs_diff_eq!(actual.as_array(), expected.as_array(), epsilon = 1e-10);
    }
}
