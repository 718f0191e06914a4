use crate::errors::{InducedError, Result};
use crate::{
    DEFAULT_MAX_REJECTION_BATCHES, DEFAULT_MIGLIORATI_MAX_SAMPLES, DEFAULT_QUAD_TOL,
    DEFAULT_ROOT_MAX_ITERS, DEFAULT_ROOT_TOL,
};
use linfa::ParamGuard;

#[cfg(feature = "serializable")]
use serde::{Deserialize, Serialize};

/// A set of validated induced sampler parameters.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serializable", derive(Serialize, Deserialize))]
pub struct InducedSamplerValidParams {
    /// Absolute and relative tolerance of the induced CDF adaptive quadrature
    pub(crate) quad_tol: f64,
    /// Tolerance of the induced CDF root finding
    pub(crate) root_tol: f64,
    /// Max number of root finding iterations per inverted sample
    pub(crate) root_max_iters: u64,
    /// Max number of proposal batches of the rejection sampling
    pub(crate) max_rejection_batches: usize,
    /// Max number of samples of Migliorati growth
    pub(crate) migliorati_max_samples: usize,
}

impl Default for InducedSamplerValidParams {
    fn default() -> InducedSamplerValidParams {
        InducedSamplerValidParams {
            quad_tol: DEFAULT_QUAD_TOL,
            root_tol: DEFAULT_ROOT_TOL,
            root_max_iters: DEFAULT_ROOT_MAX_ITERS,
            max_rejection_batches: DEFAULT_MAX_REJECTION_BATCHES,
            migliorati_max_samples: DEFAULT_MIGLIORATI_MAX_SAMPLES,
        }
    }
}

impl InducedSamplerValidParams {
    /// Get the induced CDF quadrature tolerance
    pub fn quad_tol(&self) -> f64 {
        self.quad_tol
    }

    /// Get the root finding tolerance
    pub fn root_tol(&self) -> f64 {
        self.root_tol
    }

    /// Get the max number of root finding iterations
    pub fn root_max_iters(&self) -> u64 {
        self.root_max_iters
    }

    /// Get the max number of rejection batches
    pub fn max_rejection_batches(&self) -> usize {
        self.max_rejection_batches
    }

    /// Get the max number of samples of Migliorati growth
    pub fn migliorati_max_samples(&self) -> usize {
        self.migliorati_max_samples
    }
}

#[derive(Clone, Debug, Default)]
/// The set of parameters that can be specified for the [induced sampler](crate::InducedSampler).
pub struct InducedSamplerParams(InducedSamplerValidParams);

impl InducedSamplerParams {
    /// A constructor with default parameters
    pub fn new() -> InducedSamplerParams {
        Self(InducedSamplerValidParams::default())
    }

    /// Set the induced CDF quadrature tolerance (absolute and relative)
    pub fn quad_tol(mut self, quad_tol: f64) -> Self {
        self.0.quad_tol = quad_tol;
        self
    }

    /// Set the root finding tolerance used when inverting the induced CDF
    pub fn root_tol(mut self, root_tol: f64) -> Self {
        self.0.root_tol = root_tol;
        self
    }

    /// Set the max number of root finding iterations per inverted sample
    pub fn root_max_iters(mut self, root_max_iters: u64) -> Self {
        self.0.root_max_iters = root_max_iters;
        self
    }

    /// Set the max number of proposal batches of the rejection sampling
    pub fn max_rejection_batches(mut self, max_rejection_batches: usize) -> Self {
        self.0.max_rejection_batches = max_rejection_batches;
        self
    }

    /// Set the max number of samples Migliorati growth may reach
    pub fn migliorati_max_samples(mut self, migliorati_max_samples: usize) -> Self {
        self.0.migliorati_max_samples = migliorati_max_samples;
        self
    }
}

impl From<InducedSamplerValidParams> for InducedSamplerParams {
    fn from(valid: InducedSamplerValidParams) -> Self {
        InducedSamplerParams(valid)
    }
}

impl ParamGuard for InducedSamplerParams {
    type Checked = InducedSamplerValidParams;
    type Error = InducedError;

    fn check_ref(&self) -> Result<&Self::Checked> {
        let p = &self.0;
        for (name, tol) in [("quad_tol", p.quad_tol), ("root_tol", p.root_tol)] {
            if !(tol.is_finite() && tol > 0.) {
                return Err(InducedError::ConfigurationError(format!(
                    "`{name}` should be a positive number, got {tol}"
                )));
            }
        }
        if p.root_max_iters == 0 {
            return Err(InducedError::ConfigurationError(
                "`root_max_iters` cannot be 0".to_string(),
            ));
        }
        if p.max_rejection_batches == 0 {
            return Err(InducedError::ConfigurationError(
                "`max_rejection_batches` cannot be 0".to_string(),
            ));
        }
        if p.migliorati_max_samples == 0 {
            return Err(InducedError::ConfigurationError(
                "`migliorati_max_samples` cannot be 0".to_string(),
            ));
        }
        Ok(&self.0)
    }

    fn check(self) -> Result<Self::Checked> {
        self.check_ref()?;
        Ok(self.0)
    }
}
