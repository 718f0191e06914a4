use thiserror::Error;

/// A result type for induced sampling
pub type Result<T> = std::result::Result<T, InducedError>;

/// An error when sampling induced measures
#[derive(Error, Debug)]
pub enum InducedError {
    /// When an input is invalid: shapes, bounds, indices or variable parameters
    #[error("Configuration error: {0}")]
    ConfigurationError(String),
    /// When an iterative process exhausts its budget
    #[error("Convergence failure: {0}")]
    ConvergenceFailure(String),
    /// When polynomial computation fails
    #[error(transparent)]
    PolyError(#[from] uqbox_poly::PolyError),
    /// When linear algebra computation fails
    #[error(transparent)]
    LinalgError(#[from] linfa_linalg::LinalgError),
    /// When linear algebra computation fails
    #[cfg(feature = "blas")]
    #[error("Linalg BLAS error: {0}")]
    LinalgBlasError(#[from] ndarray_linalg::error::LinalgError),
    /// When min or max of an empty array or an array with NaN is requested
    #[error(transparent)]
    MinMaxError(#[from] ndarray_stats::errors::MinMaxError),
    /// When an Argmin framework error is raised
    #[error(transparent)]
    ArgminError(#[from] argmin::core::Error),
}
