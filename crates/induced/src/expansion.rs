use crate::errors::{InducedError, Result};
use crate::variables::AffineTransformation;
use log::debug;
use ndarray::{Array2, ArrayBase, Axis, Data, Ix1, Ix2, Zip};
use uqbox_poly::{evaluate, RecurrenceCoefficients};

#[cfg(feature = "serializable")]
use serde::{Deserialize, Serialize};

/// A multivariate orthonormal polynomial expansion the induced sampler draws samples for.
///
/// The basis function of the multi-index `i` is `phi_i(z) = prod_d p_{i_d}^(d)(z_d)`
/// where `p^(d)` is the family orthonormal wrt the dth canonical variable.
pub trait InducedExpansion {
    /// Number of variables
    fn num_vars(&self) -> usize;

    /// Active multi-indices as a (num_indices, num_vars) matrix
    fn indices(&self) -> &Array2<usize>;

    /// Set the active multi-indices, recurrence coefficients are extended when required
    fn set_indices(&mut self, indices: Array2<usize>) -> Result<()>;

    /// Variable transformation between user and canonical spaces
    fn variable_transformation(&self) -> &AffineTransformation;

    /// Recurrence coefficients of each variable
    fn recursion_coeffs(&self) -> &[RecurrenceCoefficients];

    /// Basis values at canonical samples given as a (nsamples, num_vars) matrix
    ///
    /// # Returns
    ///
    /// * a (nsamples, num_indices) matrix
    fn canonical_basis_matrix(
        &self,
        canonical_samples: &ArrayBase<impl Data<Elem = f64>, Ix2>,
    ) -> Result<Array2<f64>>;

    /// Basis values at user space samples
    fn basis_matrix(&self, samples: &ArrayBase<impl Data<Elem = f64>, Ix2>) -> Result<Array2<f64>> {
        let canonical_samples = self
            .variable_transformation()
            .map_to_canonical_space(samples)?;
        self.canonical_basis_matrix(&canonical_samples)
    }

    /// Values of the univariate polynomials of degree `0..=degree` of variable `dim`
    /// at canonical points `x`
    fn basis_matrix_1d(
        &self,
        dim: usize,
        degree: usize,
        x: &ArrayBase<impl Data<Elem = f64>, Ix1>,
    ) -> Result<Array2<f64>> {
        let ab = self.recursion_coeffs().get(dim).ok_or_else(|| {
            InducedError::ConfigurationError(format!("no variable of index {dim}"))
        })?;
        Ok(evaluate(x, degree, ab)?)
    }
}

/// A polynomial chaos expansion: the tensor product orthonormal basis of independent
/// variables restricted to a multi-index set.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serializable", derive(Serialize, Deserialize))]
pub struct PolynomialChaosExpansion {
    var_trans: AffineTransformation,
    indices: Array2<usize>,
    recursion_coeffs: Vec<RecurrenceCoefficients>,
}

impl PolynomialChaosExpansion {
    /// Constructor of an expansion with no active index
    pub fn new(var_trans: AffineTransformation) -> Self {
        let num_vars = var_trans.num_vars();
        PolynomialChaosExpansion {
            var_trans,
            indices: Array2::zeros((0, num_vars)),
            recursion_coeffs: vec![RecurrenceCoefficients::empty(); num_vars],
        }
    }

    /// Constructor given the active multi-indices
    pub fn with_indices(var_trans: AffineTransformation, indices: Array2<usize>) -> Result<Self> {
        let mut pce = Self::new(var_trans);
        pce.set_indices(indices)?;
        Ok(pce)
    }

    /// Number of active multi-indices
    pub fn num_terms(&self) -> usize {
        self.indices.nrows()
    }
}

impl InducedExpansion for PolynomialChaosExpansion {
    fn num_vars(&self) -> usize {
        self.var_trans.num_vars()
    }

    fn indices(&self) -> &Array2<usize> {
        &self.indices
    }

    fn set_indices(&mut self, indices: Array2<usize>) -> Result<()> {
        if indices.ncols() != self.num_vars() || indices.nrows() == 0 {
            return Err(InducedError::ConfigurationError(format!(
                "indices should be a non empty (num_indices, {}) matrix, got {:?}",
                self.num_vars(),
                indices.dim()
            )));
        }
        let max_degrees = indices.fold_axis(Axis(0), 0, |&m, &i| m.max(i));
        for (dim, &max_degree) in max_degrees.iter().enumerate() {
            if self.recursion_coeffs[dim].len() <= max_degree {
                debug!("Recurrence of variable {dim} extended to degree {max_degree}");
                self.recursion_coeffs[dim] =
                    self.var_trans.variables()[dim].recurrence(max_degree + 1)?;
            }
        }
        self.indices = indices;
        Ok(())
    }

    fn variable_transformation(&self) -> &AffineTransformation {
        &self.var_trans
    }

    fn recursion_coeffs(&self) -> &[RecurrenceCoefficients] {
        &self.recursion_coeffs
    }

    fn canonical_basis_matrix(
        &self,
        canonical_samples: &ArrayBase<impl Data<Elem = f64>, Ix2>,
    ) -> Result<Array2<f64>> {
        if canonical_samples.ncols() != self.num_vars() {
            return Err(InducedError::ConfigurationError(format!(
                "samples should have {} columns, got {}",
                self.num_vars(),
                canonical_samples.ncols()
            )));
        }
        if self.indices.nrows() == 0 {
            return Err(InducedError::ConfigurationError(
                "expansion has no active index".to_string(),
            ));
        }
        let mut basis = Array2::ones((canonical_samples.nrows(), self.num_terms()));
        for (dim, ab) in self.recursion_coeffs.iter().enumerate() {
            let degrees = self.indices.column(dim);
            let max_degree = degrees.fold(0, |m, &i| m.max(i));
            let values = evaluate(&canonical_samples.column(dim), max_degree, ab)?;
            Zip::from(basis.columns_mut())
                .and(&degrees)
                .for_each(|mut col, &degree| col *= &values.column(degree));
        }
        Ok(basis)
    }
}
