//! Conversions between representations of orthonormal polynomials:
//! monomial coefficients and three-term recurrence encodings.
use crate::errors::{PolyError, Result};
use crate::recurrence::RecurrenceCoefficients;
use ndarray::{s, Array1, Array2, ArrayBase, Data, Ix1, Ix2, Zip};

#[cfg(feature = "serializable")]
use serde::{Deserialize, Serialize};

/// Computes the monomial coefficients of each orthonormal polynomial up to degree `nmax`.
///
/// # Returns
///
/// * A lower triangular (nmax + 1, nmax + 1) matrix where the jth row holds the coefficients
///   of `x^i, i = 0..=j` of the degree-j orthonormal polynomial `p_j`.
pub fn to_monomial(ab: &RecurrenceCoefficients, nmax: usize) -> Result<Array2<f64>> {
    ab.check_degree(nmax)?;
    let a = ab.alpha();
    let b = ab.beta();

    let mut coefs = Array2::zeros((nmax + 1, nmax + 1));
    coefs[[0, 0]] = 1. / b[0];
    if nmax > 0 {
        coefs[[1, 0]] = -a[0] * coefs[[0, 0]] / b[1];
        coefs[[1, 1]] = coefs[[0, 0]] / b[1];
    }
    for j in 2..=nmax {
        for i in 0..j {
            coefs[[j, i]] += (-a[j - 1] * coefs[[j - 1, i]] - b[j - 1] * coefs[[j - 2, i]]) / b[j];
        }
        for i in 1..=j {
            coefs[[j, i]] += coefs[[j - 1, i - 1]] / b[j];
        }
    }
    Ok(coefs)
}

/// Evaluates the polynomial `sum_i coefs[i] x^i` at samples `x` using Horner's scheme.
pub fn evaluate_monomial(
    coefs: &ArrayBase<impl Data<Elem = f64>, Ix1>,
    x: &ArrayBase<impl Data<Elem = f64>, Ix1>,
) -> Array1<f64> {
    x.mapv(|xi| coefs.iter().rev().fold(0., |acc, &c| acc * xi + c))
}

/// Rewrites the polynomial `sum_i coefs[i] z^i` with `z = (x - shift) / scale`
/// as a polynomial in `x`.
pub fn shift_monomial_expansion(
    coefs: &ArrayBase<impl Data<Elem = f64>, Ix1>,
    shift: f64,
    scale: f64,
) -> Result<Array1<f64>> {
    if scale == 0. || !scale.is_finite() || !shift.is_finite() {
        return Err(PolyError::ConfigurationError(format!(
            "invalid affine map (shift={shift}, scale={scale})"
        )));
    }
    let n = coefs.len();
    let mut shifted = Array1::zeros(n);
    for (i, &c) in coefs.iter().enumerate() {
        let factor = c / scale.powi(i as i32);
        // binomial expansion of (x - shift)^i
        let mut binom = 1.;
        for k in 0..=i {
            shifted[k] += factor * binom * (-shift).powi((i - k) as i32);
            binom = binom * (i - k) as f64 / (k + 1) as f64;
        }
    }
    Ok(shifted)
}

/// Converts the univariate orthonormal expansion `f(x) = sum_j c_j p_j((x - shift) / scale)`
/// into its monomial expansion `f(x) = sum_i d_i x^i`.
///
/// The orthonormal basis is defined on a canonical domain; `shift` and `scale` map
/// the canonical domain onto the physical one.
pub fn expand_monomial(
    ortho_coefs: &ArrayBase<impl Data<Elem = f64>, Ix1>,
    ab: &RecurrenceCoefficients,
    shift: f64,
    scale: f64,
) -> Result<Array1<f64>> {
    if ortho_coefs.is_empty() {
        return Err(PolyError::ConfigurationError(
            "orthonormal expansion has no coefficient".to_string(),
        ));
    }
    let basis_coefs = to_monomial(ab, ortho_coefs.len() - 1)?;
    let mono_coefs = basis_coefs.t().dot(ortho_coefs);
    shift_monomial_expansion(&mono_coefs, shift, scale)
}

/// Three-term recurrence encoding `p_{n+1} = (a~_{n+1} x - b~_{n+1}) p_n - c~_{n+1} p_{n-1}`
/// of an orthonormal family.
///
/// The (a~, b~, c~) rows derived from a K-row (alpha, beta) table do not hold `alpha_{K-1}`,
/// which is kept aside so that the conversion back is exact.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serializable", derive(Serialize, Deserialize))]
pub struct ThreeTermRecurrence {
    abc: Array2<f64>,
    trailing_alpha: f64,
}

impl ThreeTermRecurrence {
    /// Converts orthonormal (alpha, beta) recurrence coefficients.
    ///
    /// Fails with a configuration error if a beta coefficient is zero.
    pub fn from_two_term(ab: &RecurrenceCoefficients) -> Result<Self> {
        let nterms = ab.len();
        if nterms == 0 {
            return Ok(ThreeTermRecurrence {
                abc: Array2::zeros((0, 3)),
                trailing_alpha: 0.,
            });
        }
        let a = ab.alpha();
        let b = ab.beta();
        if let Some(i) = b.iter().position(|&v| v == 0.) {
            return Err(PolyError::ConfigurationError(format!(
                "beta[{i}] is zero, no three-term encoding"
            )));
        }
        let mut abc = Array2::zeros((nterms, 3));
        abc.column_mut(0).assign(&b.mapv(|v| 1. / v));
        Zip::from(abc.slice_mut(s![1.., 1]))
            .and(a.slice(s![..-1]))
            .and(b.slice(s![1..]))
            .for_each(|c, &ai, &bi| *c = ai / bi);
        Zip::from(abc.slice_mut(s![1.., 2]))
            .and(b.slice(s![..-1]))
            .and(b.slice(s![1..]))
            .for_each(|c, &bprev, &bi| *c = bprev / bi);
        Ok(ThreeTermRecurrence {
            abc,
            trailing_alpha: a[nterms - 1],
        })
    }

    /// Converts back to orthonormal (alpha, beta) recurrence coefficients
    pub fn to_two_term(&self) -> Result<RecurrenceCoefficients> {
        let nterms = self.abc.nrows();
        if nterms == 0 {
            return Ok(RecurrenceCoefficients::empty());
        }
        let mut ab = Array2::zeros((nterms, 2));
        ab.column_mut(1).assign(&self.abc.column(0).mapv(|v| 1. / v));
        for i in 0..nterms - 1 {
            ab[[i, 0]] = self.abc[[i + 1, 1]] * ab[[i + 1, 1]];
        }
        ab[[nterms - 1, 0]] = self.trailing_alpha;
        RecurrenceCoefficients::new(ab)
    }

    /// The (nterms, 3) table, the ith row holds `(a~_i, b~_i, c~_i)`
    pub fn abc(&self) -> &Array2<f64> {
        &self.abc
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.abc.nrows()
    }

    /// Whether the table has no row
    pub fn is_empty(&self) -> bool {
        self.abc.nrows() == 0
    }

    /// Evaluates the polynomials of degree `0..=nmax` at samples `x`
    pub fn evaluate(
        &self,
        x: &ArrayBase<impl Data<Elem = f64>, Ix1>,
        nmax: usize,
    ) -> Result<Array2<f64>> {
        evaluate_three_term(&self.abc, nmax, x)
    }
}

/// Evaluates polynomials of degree `0..=nmax` defined by a (nterms, 3) three-term recurrence table
/// `p_0 = a~_0`, `p_{n} = (a~_n x - b~_n) p_{n-1} - c~_n p_{n-2}`.
pub fn evaluate_three_term(
    abc: &ArrayBase<impl Data<Elem = f64>, Ix2>,
    nmax: usize,
    x: &ArrayBase<impl Data<Elem = f64>, Ix1>,
) -> Result<Array2<f64>> {
    if abc.ncols() != 3 || nmax >= abc.nrows() {
        return Err(PolyError::ConfigurationError(format!(
            "degree {nmax} requires a ({}, 3) three-term table, got {:?}",
            nmax + 1,
            abc.dim()
        )));
    }
    let mut p = Array2::zeros((x.len(), nmax + 1));
    Zip::from(p.rows_mut()).and(x).for_each(|mut row, &xi| {
        row[0] = abc[[0, 0]];
        if nmax > 0 {
            row[1] = (abc[[1, 0]] * xi - abc[[1, 1]]) * row[0];
        }
        for j in 2..=nmax {
            row[j] = (abc[[j, 0]] * xi - abc[[j, 1]]) * row[j - 1] - abc[[j, 2]] * row[j - 2];
        }
    });
    Ok(p)
}
