use crate::christoffel::christoffel_function;
use crate::errors::{InducedError, Result};
use crate::sampler::InducedSampler;

use log::{debug, warn};
use ndarray::{Array1, Array2, Axis};
use ndarray_rand::rand::Rng;
use ndarray_rand::rand_distr::Uniform;
use ndarray_rand::RandomExt;

impl<R: Rng> InducedSampler<R> {
    /// Draws `num_samples` samples of the induced measure by rejection sampling.
    ///
    /// Proposals are drawn by batches of `num_samples` with `sample_proposal` and a proposal
    /// `x` is accepted with probability `target(x) / c(x) / (envelope_factor * proposal(x))`
    /// where `c` is the normalized Christoffel function of `basis_matrix`.
    /// `envelope_factor` must bound the ratio of the induced density to the proposal density,
    /// observed violations are logged.
    ///
    /// Fails with a convergence failure when `max_rejection_batches` batches do not provide
    /// enough accepted samples.
    ///
    /// # Returns
    ///
    /// * samples as a (num_samples, num_vars) matrix in the proposal space
    #[allow(clippy::too_many_arguments)]
    pub fn random_induced_measure_sampling(
        &self,
        num_samples: usize,
        num_vars: usize,
        basis_matrix: impl Fn(&Array2<f64>) -> Result<Array2<f64>>,
        target_density: impl Fn(&Array2<f64>) -> Result<Array1<f64>>,
        proposal_density: impl Fn(&Array2<f64>) -> Result<Array1<f64>>,
        mut sample_proposal: impl FnMut(usize, &mut R) -> Result<Array2<f64>>,
        envelope_factor: f64,
    ) -> Result<Array2<f64>> {
        if !(envelope_factor > 0.) || !envelope_factor.is_finite() {
            return Err(InducedError::ConfigurationError(format!(
                "envelope factor should be positive, got {envelope_factor}"
            )));
        }
        let mut samples = Array2::zeros((num_samples, num_vars));
        if num_samples == 0 {
            return Ok(samples);
        }

        let max_batches = self.params.max_rejection_batches;
        let mut num_accepted = 0;
        for batch in 0..max_batches {
            let (proposals, uniforms) = {
                let mut rng = self.rng()?;
                let proposals = sample_proposal(num_samples, &mut *rng)?;
                let uniforms =
                    Array1::random_using(proposals.nrows(), Uniform::new(0., 1.), &mut *rng);
                (proposals, uniforms)
            };
            if proposals.ncols() != num_vars {
                return Err(InducedError::ConfigurationError(format!(
                    "proposals should have {num_vars} columns, got {}",
                    proposals.ncols()
                )));
            }

            let christoffel = christoffel_function(&proposals, &basis_matrix, true)?;
            let induced = target_density(&proposals)? / christoffel;
            let envelope = proposal_density(&proposals)? * envelope_factor;

            let violations = induced
                .iter()
                .zip(envelope.iter())
                .filter(|(i, e)| i > e)
                .count();
            if violations > 0 {
                warn!(
                    "Numerical degeneracy: induced density exceeds the envelope at {violations} \
                     proposals, envelope factor {envelope_factor} is too small"
                );
            }

            for (row, ((&d, &e), &u)) in induced
                .iter()
                .zip(envelope.iter())
                .zip(uniforms.iter())
                .enumerate()
            {
                if e > 0. && u * e < d {
                    samples.row_mut(num_accepted).assign(&proposals.row(row));
                    num_accepted += 1;
                    if num_accepted == num_samples {
                        debug!(
                            "{num_samples} samples accepted after {} batches",
                            batch + 1
                        );
                        return Ok(samples);
                    }
                }
            }
        }
        Err(InducedError::ConvergenceFailure(format!(
            "{num_accepted} of {num_samples} samples accepted after {max_batches} rejection batches"
        )))
    }
}

/// Ratio of the induced density to the variable density, `sum_i phi_i(x)^2 / k`, at samples
pub fn induced_density_ratio(
    samples: &Array2<f64>,
    basis_matrix: impl Fn(&Array2<f64>) -> Result<Array2<f64>>,
) -> Result<Array1<f64>> {
    let basis = basis_matrix(samples)?;
    let k = basis.ncols() as f64;
    Ok(basis.map_axis(Axis(1), |row| row.dot(&row) / k))
}
