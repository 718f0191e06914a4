use crate::christoffel::compute_preconditioned_basis_matrix_condition_number;
use crate::errors::{InducedError, Result};
use crate::expansion::InducedExpansion;
use crate::sampler::{log_condition, InducedSampler};

use log::debug;
use ndarray::{concatenate, Array2, Axis};
use ndarray_rand::rand::Rng;

impl<R: Rng> InducedSampler<R> {
    /// Adds induced samples of the expansion one at a time until the preconditioned condition
    /// number of the basis matrix is below `cond_tol`
    fn grow_until_well_conditioned<E: InducedExpansion>(
        &self,
        expansion: &E,
        cond_tol: f64,
        mut samples: Array2<f64>,
    ) -> Result<Array2<f64>> {
        let max_samples = self.params.migliorati_max_samples;
        let num_indices = expansion.indices().nrows();
        loop {
            let cond = compute_preconditioned_basis_matrix_condition_number(
                |z| expansion.canonical_basis_matrix(z),
                &samples,
            )?;
            if cond < cond_tol {
                log_condition(samples.nrows(), num_indices, cond);
                return Ok(samples);
            }
            if samples.nrows() >= max_samples {
                return Err(InducedError::ConvergenceFailure(format!(
                    "condition number {cond:e} still above {cond_tol:e} with {} samples",
                    samples.nrows()
                )));
            }
            let new_sample = self.generate_induced_samples(expansion, 1)?;
            samples = concatenate![Axis(0), samples, new_sample];
        }
    }

    /// Draws induced samples of the active index set of the expansion until the condition
    /// number of the Christoffel preconditioned basis matrix is below `cond_tol`.
    ///
    /// Sampling starts with as many samples as basis functions and adds one sample at a time.
    /// Fails with a convergence failure when `migliorati_max_samples` is exceeded.
    ///
    /// # Returns
    ///
    /// * canonical samples as a (num_samples, num_vars) matrix
    pub fn generate_induced_samples_migliorati_tolerance<E: InducedExpansion>(
        &self,
        expansion: &E,
        cond_tol: f64,
    ) -> Result<Array2<f64>> {
        check_tolerance(cond_tol)?;
        let num_indices = expansion.indices().nrows();
        let samples = self.generate_induced_samples(expansion, num_indices)?;
        self.grow_until_well_conditioned(expansion, cond_tol, samples)
    }

    /// Enriches canonical `samples`, well conditioned for `indices`, so that they are well
    /// conditioned for the union of `indices` and `new_indices`.
    ///
    /// Existing samples are kept as a prefix of the result. New samples are first drawn from
    /// the induced measure of `new_indices` in proportion `m0 * k_new / k_old` of the `m0`
    /// existing samples, then from the induced measure of the union one at a time until the
    /// condition number is below `cond_tol`. On success the active index set of the expansion
    /// is the union, on failure it is left unchanged.
    pub fn increment_induced_samples_migliorati<E: InducedExpansion>(
        &self,
        expansion: &mut E,
        cond_tol: f64,
        samples: &Array2<f64>,
        indices: &Array2<usize>,
        new_indices: &Array2<usize>,
    ) -> Result<Array2<f64>> {
        let previous = expansion.indices().to_owned();
        let res = self.enrich_samples(expansion, cond_tol, samples, indices, new_indices);
        if res.is_err() && previous.nrows() > 0 {
            expansion.set_indices(previous)?;
        }
        res
    }

    fn enrich_samples<E: InducedExpansion>(
        &self,
        expansion: &mut E,
        cond_tol: f64,
        samples: &Array2<f64>,
        indices: &Array2<usize>,
        new_indices: &Array2<usize>,
    ) -> Result<Array2<f64>> {
        check_tolerance(cond_tol)?;
        let num_vars = expansion.num_vars();
        if samples.ncols() != num_vars
            || indices.ncols() != num_vars
            || new_indices.ncols() != num_vars
        {
            return Err(InducedError::ConfigurationError(format!(
                "samples {:?}, indices {:?} and new indices {:?} should have {num_vars} columns",
                samples.dim(),
                indices.dim(),
                new_indices.dim()
            )));
        }
        if indices.nrows() == 0 {
            return Err(InducedError::ConfigurationError(
                "previous index set is empty".to_string(),
            ));
        }

        let num_new = samples.nrows() * new_indices.nrows() / indices.nrows();
        let mut enriched = samples.to_owned();
        if num_new > 0 && new_indices.nrows() > 0 {
            expansion.set_indices(new_indices.to_owned())?;
            let new_samples = self.generate_induced_samples(expansion, num_new)?;
            enriched = concatenate![Axis(0), enriched, new_samples];
            debug!("{num_new} samples drawn from the induced measure of the new indices");
        }

        expansion.set_indices(concatenate![Axis(0), *indices, *new_indices])?;
        self.grow_until_well_conditioned(expansion, cond_tol, enriched)
    }
}

fn check_tolerance(cond_tol: f64) -> Result<()> {
    if cond_tol > 1. {
        Ok(())
    } else {
        Err(InducedError::ConfigurationError(format!(
            "condition number tolerance should be greater than 1, got {cond_tol}"
        )))
    }
}
