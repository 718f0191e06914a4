use crate::errors::{InducedError, Result};

use linfa::dataset::{WithLapack, WithoutLapack};
#[cfg(not(feature = "blas"))]
use linfa_linalg::svd::*;
use log::warn;
use ndarray::{Array1, Array2, ArrayBase, Axis, Data, Ix2};
#[cfg(feature = "blas")]
use ndarray_linalg::svd::*;
use ndarray_stats::QuantileExt;

/// Computes the Christoffel weights `1 / sum_i phi_i(x)^2` of each row of a
/// (nsamples, nbasis) basis matrix.
///
/// A row of zero basis values gets an infinite weight.
pub fn christoffel_weights(basis_matrix: &ArrayBase<impl Data<Elem = f64>, Ix2>) -> Array1<f64> {
    basis_matrix.map_axis(Axis(1), |row| 1. / row.dot(&row))
}

/// Computes the Christoffel function at samples given as a (nsamples, nvars) matrix.
///
/// With `normalize` the function is `k / sum_i phi_i(x)^2` where `k` is the number
/// of basis functions: the density of the induced measure is then the density of
/// the variable divided by the normalized Christoffel function and integrates to one.
/// Otherwise `1 / sum_i phi_i(x)^2` is returned.
pub fn christoffel_function(
    samples: &Array2<f64>,
    basis_matrix: impl Fn(&Array2<f64>) -> Result<Array2<f64>>,
    normalize: bool,
) -> Result<Array1<f64>> {
    let basis = basis_matrix(samples)?;
    if basis.nrows() != samples.nrows() {
        return Err(InducedError::ConfigurationError(format!(
            "basis matrix should have {} rows, got {}",
            samples.nrows(),
            basis.nrows()
        )));
    }
    let mut weights = christoffel_weights(&basis);
    if weights.iter().any(|w| !w.is_finite()) {
        warn!("Numerical degeneracy: all basis functions vanish at some samples");
    }
    if normalize {
        weights *= basis.ncols() as f64;
    }
    Ok(weights)
}

/// Computes the 2-norm condition number of the basis matrix evaluated at samples
/// and preconditioned by the square root of the Christoffel weights:
/// `cond(diag(sqrt(w)) Phi)`.
///
/// The condition number is infinite when there are less samples than basis functions
/// or when the smallest singular value vanishes.
pub fn compute_preconditioned_basis_matrix_condition_number(
    basis_matrix: impl Fn(&Array2<f64>) -> Result<Array2<f64>>,
    samples: &Array2<f64>,
) -> Result<f64> {
    let basis = basis_matrix(samples)?;
    if basis.ncols() == 0 {
        return Err(InducedError::ConfigurationError(
            "basis matrix has no column".to_string(),
        ));
    }
    if basis.nrows() < basis.ncols() {
        return Ok(f64::INFINITY);
    }
    let weights = christoffel_weights(&basis).mapv(f64::sqrt);
    let preconditioned = &basis * &weights.insert_axis(Axis(1));

    let (_, singular_values, _) = preconditioned.with_lapack().svd(false, false)?;
    let singular_values: Array1<f64> = singular_values.without_lapack();
    let smax = *singular_values.max()?;
    let smin = *singular_values.min()?;
    if smin <= 0. || !smin.is_finite() {
        return Ok(f64::INFINITY);
    }
    Ok(smax / smin)
}
