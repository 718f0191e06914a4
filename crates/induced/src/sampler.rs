use std::collections::BTreeMap;
use std::sync::{Arc, RwLock, RwLockWriteGuard};

use crate::continuous::continuous_induced_measure_ppf;
use crate::discrete::{discrete_induced_cdf, discrete_inverse_cdf};
use crate::errors::{InducedError, Result};
use crate::expansion::InducedExpansion;
use crate::params::InducedSamplerValidParams;
use crate::UQBOX_LOG;

use env_logger::{Builder, Env};
use log::{debug, info};
use ndarray::{Array, Array1, Array2};
use ndarray_rand::rand::{Rng, SeedableRng};
use ndarray_rand::rand_distr::Uniform;
use ndarray_rand::RandomExt;
use rand_xoshiro::Xoshiro256Plus;

type RngRef<R> = Arc<RwLock<R>>;

/// Sampler of induced measures of polynomial expansions.
///
/// The induced measure of an expansion with basis `phi_1..phi_k` has the density
/// `pdf(x) sum_i phi_i(x)^2 / k` where `pdf` is the density of the input variables.
/// Sampling from it yields well-conditioned least squares regression designs.
///
/// ```
/// use uqbox_induced::{
///     compute_hyperbolic_indices, AffineTransformation, InducedSampler, InducedSamplerParams,
///     PolynomialChaosExpansion, Variable,
/// };
/// use linfa::ParamGuard;
/// use ndarray_rand::rand::SeedableRng;
/// use rand_xoshiro::Xoshiro256Plus;
///
/// let var_trans = AffineTransformation::iid(Variable::Uniform { lb: 0., ub: 1. }, 2).unwrap();
/// let indices = compute_hyperbolic_indices(2, 3, 1.).unwrap();
/// let pce = PolynomialChaosExpansion::with_indices(var_trans, indices).unwrap();
///
/// let sampler = InducedSampler::new(InducedSamplerParams::new().check().unwrap())
///     .with_rng(Xoshiro256Plus::seed_from_u64(42));
/// // samples in the canonical space [-1, 1]^2
/// let samples = sampler.generate_induced_samples(&pce, 10).unwrap();
/// assert_eq!(samples.dim(), (10, 2));
/// ```
#[derive(Clone, Debug)]
pub struct InducedSampler<R: Rng> {
    /// Sampler parameters
    pub(crate) params: InducedSamplerValidParams,
    /// Random generator used for reproducibility
    rng: RngRef<R>,
}

impl InducedSampler<Xoshiro256Plus> {
    /// Constructor given validated parameters, the random generator is seeded from entropy.
    ///
    /// Logging is initialized from the `UQBOX_LOG` environment variable (default `warn`).
    pub fn new(params: InducedSamplerValidParams) -> Self {
        Self::new_with_rng(params, Xoshiro256Plus::from_entropy())
    }
}

impl<R: Rng> InducedSampler<R> {
    /// Constructor given validated parameters and a random generator for reproducibility
    pub fn new_with_rng(params: InducedSamplerValidParams, rng: R) -> Self {
        let env = Env::new().filter_or(UQBOX_LOG, "warn");
        let mut builder = Builder::from_env(env);
        let builder = builder.target(env_logger::Target::Stdout);
        builder.try_init().ok();
        InducedSampler {
            params,
            rng: Arc::new(RwLock::new(rng)),
        }
    }

    /// Set random generator
    pub fn with_rng<R2: Rng>(self, rng: R2) -> InducedSampler<R2> {
        InducedSampler {
            params: self.params,
            rng: Arc::new(RwLock::new(rng)),
        }
    }

    /// Sampler parameters
    pub fn params(&self) -> &InducedSamplerValidParams {
        &self.params
    }

    pub(crate) fn rng(&self) -> Result<RwLockWriteGuard<'_, R>> {
        self.rng.write().map_err(|_| {
            InducedError::ConfigurationError("random generator lock is poisoned".to_string())
        })
    }

    /// Draws for each sample the row of the multi-index it is sampled from, uniformly among
    /// `num_indices`, and one uniform variate per variable
    pub(crate) fn draw_index_choices(
        &self,
        num_indices: usize,
        num_samples: usize,
        num_vars: usize,
    ) -> Result<(Array1<usize>, Array2<f64>)> {
        if num_indices == 0 {
            return Err(InducedError::ConfigurationError(
                "induced sampling requires at least one multi-index".to_string(),
            ));
        }
        let mut rng = self.rng()?;
        let choices = Array::random_using(num_samples, Uniform::new(0, num_indices), &mut *rng);
        let uniforms =
            Array::random_using((num_samples, num_vars), Uniform::new(0., 1.), &mut *rng);
        Ok((choices, uniforms))
    }

    /// Draws `num_samples` samples from the induced measure of the active index set of the
    /// expansion.
    ///
    /// For each sample a multi-index is drawn uniformly from the active set, then each
    /// component is drawn from the univariate induced measure of the corresponding degree:
    /// by exact inverse CDF lookup for discrete variables and by inversion of the continuous
    /// induced CDF otherwise.
    ///
    /// # Returns
    ///
    /// * canonical samples as a (num_samples, num_vars) matrix
    pub fn generate_induced_samples<E: InducedExpansion>(
        &self,
        expansion: &E,
        num_samples: usize,
    ) -> Result<Array2<f64>> {
        let indices = expansion.indices();
        let num_vars = expansion.num_vars();
        let (choices, uniforms) = self.draw_index_choices(indices.nrows(), num_samples, num_vars)?;

        let mut samples = Array2::zeros((num_samples, num_vars));
        for dim in 0..num_vars {
            // samples sharing a degree are inverted together
            let mut by_degree: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
            for (i, &choice) in choices.iter().enumerate() {
                by_degree.entry(indices[[choice, dim]]).or_default().push(i);
            }
            for (degree, rows) in by_degree {
                let targets = Array1::from_iter(rows.iter().map(|&i| uniforms[[i, dim]]));
                let values = self.univariate_induced_quantiles(expansion, dim, degree, &targets)?;
                for (&i, &v) in rows.iter().zip(values.iter()) {
                    samples[[i, dim]] = v;
                }
            }
        }
        debug!("{num_samples} induced samples generated");
        Ok(samples)
    }

    fn univariate_induced_quantiles<E: InducedExpansion>(
        &self,
        expansion: &E,
        dim: usize,
        degree: usize,
        targets: &Array1<f64>,
    ) -> Result<Array1<f64>> {
        let variable = &expansion.variable_transformation().variables()[dim];
        match variable.canonical_masses() {
            Some((masses, probabilities)) => {
                let basis = expansion.basis_matrix_1d(dim, degree, &masses)?;
                let cdf = discrete_induced_cdf(&basis.column(degree), &probabilities)?;
                Ok(targets.mapv(|u| discrete_inverse_cdf(&cdf, &masses, u)))
            }
            None => {
                let ab = &expansion.recursion_coeffs()[dim];
                continuous_induced_measure_ppf(
                    variable,
                    ab,
                    degree,
                    targets,
                    self.params.quad_tol,
                    self.params.root_tol,
                    self.params.root_max_iters,
                )
            }
        }
    }
}

/// Logs the outcome of an adaptive sampling step
pub(crate) fn log_condition(num_samples: usize, num_indices: usize, cond: f64) {
    info!("{num_samples} samples for {num_indices} basis functions, condition number {cond:.3e}");
}
