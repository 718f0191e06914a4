use crate::errors::{PolyError, Result};
use crate::evaluate::evaluate;
use crate::recurrence::RecurrenceCoefficients;

use linfa::dataset::{WithLapack, WithoutLapack};
#[cfg(not(feature = "blas"))]
use linfa_linalg::eigh::*;
use log::warn;
use ndarray::{s, Array1, Array2, Axis};
#[cfg(feature = "blas")]
use ndarray_linalg::{eigh::*, UPLO};

/// Computes the `n`-point Gauss quadrature rule of the measure whose orthonormal polynomials
/// are defined by the recurrence coefficients `ab` (Golub-Welsch algorithm).
///
/// Nodes are the eigenvalues of the symmetric tridiagonal Jacobi matrix with diagonal
/// `a_0..a_{n-1}` and off-diagonal `b_1..b_{n-1}`; the weight of a node `x` is the Christoffel
/// number `1 / sum_{j<n} p_j(x)^2`. Non finite weights, met with degenerate tables, are set
/// to zero. The rule integrates polynomials up to degree `2n - 1` exactly.
///
/// # Returns
///
/// * nodes sorted increasingly and the corresponding weights
///
/// Fails with a configuration error if `n == 0` or `ab` has less than `n` rows.
pub fn gauss_quadrature(
    ab: &RecurrenceCoefficients,
    n: usize,
) -> Result<(Array1<f64>, Array1<f64>)> {
    if n == 0 {
        return Err(PolyError::ConfigurationError(
            "quadrature rule requires at least one point".to_string(),
        ));
    }
    if n > ab.len() {
        return Err(PolyError::ConfigurationError(format!(
            "{n}-point quadrature rule requires {n} recurrence coefficients, got {}",
            ab.len()
        )));
    }
    let a = ab.alpha();
    let b = ab.beta();

    let mut jacobi = Array2::from_diag(&a.slice(s![..n]));
    for i in 1..n {
        jacobi[[i, i - 1]] = b[i];
        jacobi[[i - 1, i]] = b[i];
    }

    #[cfg(feature = "blas")]
    let (eigvals, _) = jacobi.with_lapack().eigh(UPLO::Lower)?;
    #[cfg(not(feature = "blas"))]
    let (eigvals, _) = jacobi.with_lapack().eigh_into()?;
    let mut nodes: Array1<f64> = eigvals.without_lapack();
    nodes
        .as_slice_mut()
        .ok_or_else(|| PolyError::ConfigurationError("non contiguous eigenvalues".to_string()))?
        .sort_by(|x, y| x.total_cmp(y));

    let p = evaluate(&nodes, n - 1, ab)?;
    let weights = p.map_axis(Axis(1), |row| {
        let w = 1. / row.dot(&row);
        if w.is_finite() {
            w
        } else {
            warn!("Numerical degeneracy: non finite quadrature weight set to zero");
            0.
        }
    });
    Ok((nodes, weights))
}
