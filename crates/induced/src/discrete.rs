use crate::errors::{InducedError, Result};
use crate::sampler::InducedSampler;

use log::debug;
use ndarray::{Array1, Array2, ArrayBase, Axis, Data, Ix1};
use ndarray_rand::rand::Rng;

/// Normalized CDF of the univariate discrete induced measure with weights
/// `p(x_k)^2 pk` given the polynomial values `p(x_k)` at the mass locations.
pub fn discrete_induced_cdf(
    values: &ArrayBase<impl Data<Elem = f64>, Ix1>,
    probabilities: &ArrayBase<impl Data<Elem = f64>, Ix1>,
) -> Result<Array1<f64>> {
    if values.len() != probabilities.len() || values.is_empty() {
        return Err(InducedError::ConfigurationError(format!(
            "{} polynomial values given for {} probability masses",
            values.len(),
            probabilities.len()
        )));
    }
    let mut cdf = Array1::zeros(values.len());
    let mut total = 0.;
    for ((c, &v), &p) in cdf.iter_mut().zip(values.iter()).zip(probabilities.iter()) {
        total += v * v * p;
        *c = total;
    }
    if !(total > 0.) || !total.is_finite() {
        return Err(InducedError::ConfigurationError(format!(
            "discrete induced measure has total mass {total}"
        )));
    }
    cdf /= total;
    Ok(cdf)
}

/// Smallest mass location whose cumulated probability reaches `u`
pub(crate) fn discrete_inverse_cdf(cdf: &Array1<f64>, masses: &Array1<f64>, u: f64) -> f64 {
    let k = cdf
        .iter()
        .position(|&c| c >= u)
        .unwrap_or(cdf.len() - 1);
    masses[k]
}

impl<R: Rng> InducedSampler<R> {
    /// Draws `num_samples` samples from the induced measure of a multivariate discrete
    /// measure restricted to the multi-indices `indices`, given as a (num_indices, num_vars)
    /// matrix.
    ///
    /// `masses[d]` and `probabilities[d]` define the dth marginal and
    /// `basis_matrix_1d(d, degree, x)` returns the values of the univariate polynomials of
    /// degree `0..=degree` orthonormal wrt the dth marginal at points `x`.
    /// Univariate draws are exact inverse CDF lookups.
    ///
    /// # Returns
    ///
    /// * samples as a (num_samples, num_vars) matrix, each entry being a mass location
    pub fn discrete_induced_sampling(
        &self,
        basis_matrix_1d: impl Fn(usize, usize, &Array1<f64>) -> Result<Array2<f64>>,
        indices: &Array2<usize>,
        masses: &[Array1<f64>],
        probabilities: &[Array1<f64>],
        num_samples: usize,
    ) -> Result<Array2<f64>> {
        let num_vars = indices.ncols();
        if masses.len() != num_vars || probabilities.len() != num_vars {
            return Err(InducedError::ConfigurationError(format!(
                "{num_vars} marginals expected, got {} mass sets and {} probability sets",
                masses.len(),
                probabilities.len()
            )));
        }

        // CDFs of every degree up to the largest used in each dimension
        let mut cdfs: Vec<Vec<Array1<f64>>> = Vec::with_capacity(num_vars);
        let max_degrees = indices.fold_axis(Axis(0), 0, |&m, &i| m.max(i));
        for (dim, &max_degree) in max_degrees.iter().enumerate() {
            let values = basis_matrix_1d(dim, max_degree, &masses[dim])?;
            if values.ncols() <= max_degree {
                return Err(InducedError::ConfigurationError(format!(
                    "univariate basis of variable {dim} should have {} columns, got {}",
                    max_degree + 1,
                    values.ncols()
                )));
            }
            let dim_cdfs = (0..=max_degree)
                .map(|degree| discrete_induced_cdf(&values.column(degree), &probabilities[dim]))
                .collect::<Result<Vec<_>>>()?;
            cdfs.push(dim_cdfs);
        }

        let (choices, uniforms) = self.draw_index_choices(indices.nrows(), num_samples, num_vars)?;
        let mut samples = Array2::zeros((num_samples, num_vars));
        for (i, &choice) in choices.iter().enumerate() {
            for dim in 0..num_vars {
                let cdf = &cdfs[dim][indices[[choice, dim]]];
                samples[[i, dim]] = discrete_inverse_cdf(cdf, &masses[dim], uniforms[[i, dim]]);
            }
        }
        debug!("{num_samples} discrete induced samples generated");
        Ok(samples)
    }
}
