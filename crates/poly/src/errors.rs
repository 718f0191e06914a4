use thiserror::Error;

/// A result type for polynomial computations
pub type Result<T> = std::result::Result<T, PolyError>;

/// An error when computing recurrences, evaluating polynomials or building quadrature rules
#[derive(Error, Debug)]
pub enum PolyError {
    /// When a degree, a shape or a family parameter is invalid
    #[error("Configuration error: {0}")]
    ConfigurationError(String),
    /// When linear algebra computation fails
    #[error(transparent)]
    LinalgError(#[from] linfa_linalg::LinalgError),
    /// When linear algebra computation fails
    #[cfg(feature = "blas")]
    #[error("Linalg BLAS error: {0}")]
    LinalgBlasError(#[from] ndarray_linalg::error::LinalgError),
}
