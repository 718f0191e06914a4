//! This library implements induced and Christoffel sampling of multivariate orthonormal
//! polynomial expansions, which provide well-conditioned designs of experiments for
//! least squares regression of [polynomial chaos expansions](PolynomialChaosExpansion).
//!
//! The induced measure of an expansion with basis `phi_1..phi_k` wrt a probability density
//! `pdf` has the density `pdf(x) / c(x)` where `c(x) = k / sum_i phi_i(x)^2` is the
//! normalized [Christoffel function](christoffel_function).
//!
//! Sampling is implemented by [InducedSampler] parameterized by [InducedSamplerParams]:
//! * [exact induced sampling](InducedSampler::generate_induced_samples) by inversion of the
//!   univariate induced CDFs, continuous ones being integrated by adaptive quadrature and
//!   inverted by Brent's method,
//! * [discrete induced sampling](InducedSampler::discrete_induced_sampling) for finite
//!   discrete measures,
//! * [rejection sampling](InducedSampler::random_induced_measure_sampling) from a proposal,
//! * [Migliorati](InducedSampler::generate_induced_samples_migliorati_tolerance) adaptive
//!   growth until the Christoffel preconditioned basis matrix is well conditioned, and its
//!   [incremental](InducedSampler::increment_induced_samples_migliorati) version for
//!   adaptively enriched index sets.
//!
//! Example:
//! ```
//! use uqbox_induced::{
//!     compute_hyperbolic_indices, compute_preconditioned_basis_matrix_condition_number,
//!     AffineTransformation, InducedExpansion, InducedSampler, InducedSamplerParams,
//!     PolynomialChaosExpansion, Variable,
//! };
//! use linfa::ParamGuard;
//! use ndarray_rand::rand::SeedableRng;
//! use rand_xoshiro::Xoshiro256Plus;
//!
//! let variable = Variable::Beta { a: 2., b: 2., lb: 0., ub: 1. };
//! let var_trans = AffineTransformation::iid(variable, 2).unwrap();
//! let indices = compute_hyperbolic_indices(2, 3, 1.).unwrap();
//! let pce = PolynomialChaosExpansion::with_indices(var_trans, indices).unwrap();
//!
//! let sampler = InducedSampler::new(InducedSamplerParams::new().check().unwrap())
//!     .with_rng(Xoshiro256Plus::seed_from_u64(42));
//! let samples = sampler
//!     .generate_induced_samples_migliorati_tolerance(&pce, 1e2)
//!     .unwrap();
//! let cond = compute_preconditioned_basis_matrix_condition_number(
//!     |z| pce.canonical_basis_matrix(z),
//!     &samples,
//! )
//! .unwrap();
//! assert!(cond < 1e2);
//! ```
//!
//! Logging is configured with the `UQBOX_LOG` environment variable (default `warn`),
//! see [env_logger](https://docs.rs/env_logger) for the syntax.
#![warn(missing_docs)]
#![warn(rustdoc::broken_intra_doc_links)]
mod christoffel;
mod continuous;
mod discrete;
mod errors;
mod expansion;
mod indexing;
mod integrate;
mod migliorati;
mod params;
mod rejection;
mod sampler;
mod variables;

pub use christoffel::*;
pub use continuous::*;
pub use discrete::discrete_induced_cdf;
pub use errors::*;
pub use expansion::*;
pub use indexing::*;
pub use integrate::*;
pub use params::*;
pub use rejection::*;
pub use sampler::InducedSampler;
pub use variables::*;

/// Environment variable controlling the log level
pub const UQBOX_LOG: &str = "UQBOX_LOG";

/// Default absolute and relative tolerance of the induced CDF quadrature
pub const DEFAULT_QUAD_TOL: f64 = 1e-10;
/// Default tolerance of the induced CDF root finding
pub const DEFAULT_ROOT_TOL: f64 = 1e-8;
/// Default max number of root finding iterations per sample
pub const DEFAULT_ROOT_MAX_ITERS: u64 = 100;
/// Default max number of rejection sampling batches
pub const DEFAULT_MAX_REJECTION_BATCHES: usize = 1000;
/// Default max number of samples of Migliorati growth
pub const DEFAULT_MIGLIORATI_MAX_SAMPLES: usize = 10000;
