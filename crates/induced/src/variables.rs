use crate::errors::{InducedError, Result};
use libm::lgamma;
use ndarray::{Array, Array1, Array2, ArrayBase, Axis, Data, Ix2, Zip};
use ndarray_rand::rand::distributions::WeightedIndex;
use ndarray_rand::rand::Rng;
use ndarray_rand::rand_distr::{Beta, Binomial, Normal, Uniform};
use ndarray_rand::RandomExt;
use uqbox_poly::{
    discrete_stieltjes_recurrence, hermite_recurrence, jacobi_recurrence, krawtchouk_recurrence,
    RecurrenceCoefficients,
};

#[cfg(feature = "serializable")]
use serde::{Deserialize, Serialize};

const DISCRETE_PROBABILITY_TOL: f64 = 1e-8;

/// Truncation half-width of the canonical support of unbounded variables.
///
/// The squared orthonormal polynomial of degree n times the standard normal density is
/// negligible beyond `2 sqrt(n + 1) + 10`.
pub fn normal_truncation(degree: usize) -> f64 {
    2. * ((degree + 1) as f64).sqrt() + 10.
}

/// A univariate random variable.
///
/// Each variable is associated with a canonical random variable through an affine map
/// `z = (x - loc) / scale`: bounded variables map to `[-1, 1]`, normal variables are
/// standardized and binomial variables keep their integer lattice.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serializable", derive(Serialize, Deserialize))]
pub enum Variable {
    /// Beta distribution with shapes `a`, `b` on `[lb, ub]`
    Beta {
        /// first shape parameter
        a: f64,
        /// second shape parameter
        b: f64,
        /// lower bound
        lb: f64,
        /// upper bound
        ub: f64,
    },
    /// Uniform distribution on `[lb, ub]`
    Uniform {
        /// lower bound
        lb: f64,
        /// upper bound
        ub: f64,
    },
    /// Normal distribution
    Normal {
        /// mean
        mean: f64,
        /// standard deviation
        std: f64,
    },
    /// Binomial distribution on `{0, ..., ntrials}`
    Binomial {
        /// number of trials
        ntrials: usize,
        /// success probability
        p: f64,
    },
    /// Finite discrete distribution with masses `xk` of probabilities `pk`
    Discrete {
        /// mass locations
        xk: Array1<f64>,
        /// mass probabilities
        pk: Array1<f64>,
    },
}

fn beta_pdf(t: f64, a: f64, b: f64) -> f64 {
    if !(0. ..=1.).contains(&t) {
        return 0.;
    }
    let log_beta = lgamma(a) + lgamma(b) - lgamma(a + b);
    t.powf(a - 1.) * (1. - t).powf(b - 1.) * (-log_beta).exp()
}

fn binomial_pmf(k: usize, ntrials: usize, p: f64) -> f64 {
    if k > ntrials {
        return 0.;
    }
    let (n, k) = (ntrials as f64, k as f64);
    (lgamma(n + 1.) - lgamma(k + 1.) - lgamma(n - k + 1.) + k * p.ln() + (n - k) * (1. - p).ln())
        .exp()
}

fn discrete_pmf(x: f64, xk: &Array1<f64>, pk: &Array1<f64>) -> f64 {
    Zip::from(xk).and(pk).fold(0., |acc, &m, &w| {
        if (x - m).abs() <= 1e-12 * m.abs().max(1.) {
            acc + w
        } else {
            acc
        }
    })
}

impl Variable {
    /// Checks the distribution parameters
    pub fn check(&self) -> Result<()> {
        let valid = match self {
            Variable::Beta { a, b, lb, ub } => {
                *a > 0. && *b > 0. && lb.is_finite() && ub.is_finite() && lb < ub
            }
            Variable::Uniform { lb, ub } => lb.is_finite() && ub.is_finite() && lb < ub,
            Variable::Normal { mean, std } => mean.is_finite() && std.is_finite() && *std > 0.,
            Variable::Binomial { ntrials, p } => *ntrials > 0 && *p > 0. && *p < 1.,
            Variable::Discrete { xk, pk } => {
                !xk.is_empty()
                    && xk.len() == pk.len()
                    && xk.iter().all(|v| v.is_finite())
                    && pk.iter().all(|&v| v >= 0.)
                    && (pk.sum() - 1.).abs() <= DISCRETE_PROBABILITY_TOL
            }
        };
        if valid {
            Ok(())
        } else {
            Err(InducedError::ConfigurationError(format!(
                "invalid variable {self:?}"
            )))
        }
    }

    /// Whether the variable is discrete
    pub fn is_discrete(&self) -> bool {
        matches!(self, Variable::Binomial { .. } | Variable::Discrete { .. })
    }

    /// Whether the support of the variable is bounded
    pub fn is_bounded(&self) -> bool {
        !matches!(self, Variable::Normal { .. })
    }

    /// The affine map `(loc, scale)` such that `x = loc + scale * z`
    pub fn loc_scale(&self) -> (f64, f64) {
        match self {
            Variable::Beta { lb, ub, .. } | Variable::Uniform { lb, ub } => {
                (0.5 * (lb + ub), 0.5 * (ub - lb))
            }
            Variable::Normal { mean, std } => (*mean, *std),
            Variable::Binomial { .. } => (0., 1.),
            Variable::Discrete { xk, .. } => {
                let min = xk.fold(f64::INFINITY, |m, &v| m.min(v));
                let max = xk.fold(f64::NEG_INFINITY, |m, &v| m.max(v));
                if max > min {
                    (0.5 * (min + max), 0.5 * (max - min))
                } else {
                    (min, 1.)
                }
            }
        }
    }

    /// Maps a value to the canonical space
    pub fn to_canonical(&self, x: f64) -> f64 {
        let (loc, scale) = self.loc_scale();
        (x - loc) / scale
    }

    /// Maps a canonical value back to the user space
    pub fn from_canonical(&self, z: f64) -> f64 {
        let (loc, scale) = self.loc_scale();
        loc + scale * z
    }

    /// Density (or mass function for discrete variables) of the canonical variable
    pub fn canonical_pdf(&self, z: f64) -> f64 {
        match self {
            Variable::Beta { a, b, .. } => 0.5 * beta_pdf(0.5 * (z + 1.), *a, *b),
            Variable::Uniform { .. } => {
                if (-1. ..=1.).contains(&z) {
                    0.5
                } else {
                    0.
                }
            }
            Variable::Normal { .. } => {
                (-0.5 * z * z).exp() / (2. * std::f64::consts::PI).sqrt()
            }
            Variable::Binomial { ntrials, p } => {
                if z >= 0. && z.fract() == 0. {
                    binomial_pmf(z as usize, *ntrials, *p)
                } else {
                    0.
                }
            }
            Variable::Discrete { pk, .. } => {
                let xk = self.canonical_locations();
                discrete_pmf(z, &xk, pk)
            }
        }
    }

    /// Density (or mass function for discrete variables) in the user space
    pub fn pdf(&self, x: f64) -> f64 {
        match self {
            Variable::Discrete { xk, pk } => discrete_pmf(x, xk, pk),
            Variable::Binomial { .. } => self.canonical_pdf(x),
            _ => {
                let (_, scale) = self.loc_scale();
                self.canonical_pdf(self.to_canonical(x)) / scale
            }
        }
    }

    fn canonical_locations(&self) -> Array1<f64> {
        match self {
            Variable::Discrete { xk, .. } => xk.mapv(|v| self.to_canonical(v)),
            Variable::Binomial { ntrials, .. } => Array::range(0., (*ntrials + 1) as f64, 1.),
            _ => Array1::zeros(0),
        }
    }

    /// Canonical mass locations and probabilities of a discrete variable, `None` otherwise
    pub fn canonical_masses(&self) -> Option<(Array1<f64>, Array1<f64>)> {
        match self {
            Variable::Discrete { pk, .. } => Some((self.canonical_locations(), pk.to_owned())),
            Variable::Binomial { ntrials, p } => {
                let xk = self.canonical_locations();
                let pk = Array1::from_iter((0..=*ntrials).map(|k| binomial_pmf(k, *ntrials, *p)));
                Some((xk, pk))
            }
            _ => None,
        }
    }

    /// Bounds of the canonical support used to integrate the induced measure of
    /// the polynomial of given degree. Unbounded supports are truncated.
    pub fn canonical_support(&self, degree: usize) -> (f64, f64) {
        match self {
            Variable::Beta { .. } | Variable::Uniform { .. } => (-1., 1.),
            Variable::Normal { .. } => {
                let half_width = normal_truncation(degree);
                (-half_width, half_width)
            }
            Variable::Binomial { ntrials, .. } => (0., *ntrials as f64),
            Variable::Discrete { .. } => {
                let xk = self.canonical_locations();
                (
                    xk.fold(f64::INFINITY, |m, &v| m.min(v)),
                    xk.fold(f64::NEG_INFINITY, |m, &v| m.max(v)),
                )
            }
        }
    }

    /// Recurrence coefficients of the polynomials orthonormal wrt the canonical variable
    pub fn recurrence(&self, nterms: usize) -> Result<RecurrenceCoefficients> {
        let ab = match self {
            Variable::Beta { a, b, .. } => jacobi_recurrence(nterms, b - 1., a - 1., true)?,
            Variable::Uniform { .. } => jacobi_recurrence(nterms, 0., 0., true)?,
            Variable::Normal { .. } => hermite_recurrence(nterms, 0., true)?,
            Variable::Binomial { ntrials, p } => krawtchouk_recurrence(nterms, *ntrials, *p)?,
            Variable::Discrete { pk, .. } => {
                discrete_stieltjes_recurrence(&self.canonical_locations(), pk, nterms)?
            }
        };
        Ok(ab)
    }

    /// Draws `n` samples of the variable in the user space
    pub fn sample<R: Rng>(&self, n: usize, rng: &mut R) -> Result<Array1<f64>> {
        self.check()?;
        let to_error = |e: String| InducedError::ConfigurationError(e);
        let samples = match self {
            Variable::Beta { a, b, lb, ub } => {
                let dist = Beta::new(*a, *b).map_err(|e| to_error(e.to_string()))?;
                Array1::random_using(n, dist, rng).mapv(|t| lb + (ub - lb) * t)
            }
            Variable::Uniform { lb, ub } => Array1::random_using(n, Uniform::new(*lb, *ub), rng),
            Variable::Normal { mean, std } => {
                let dist = Normal::new(*mean, *std).map_err(|e| to_error(e.to_string()))?;
                Array1::random_using(n, dist, rng)
            }
            Variable::Binomial { ntrials, p } => {
                let dist = Binomial::new(*ntrials as u64, *p).map_err(|e| to_error(e.to_string()))?;
                Array1::random_using(n, dist, rng).mapv(|k: u64| k as f64)
            }
            Variable::Discrete { xk, pk } => {
                let dist = WeightedIndex::new(pk.iter()).map_err(|e| to_error(e.to_string()))?;
                Array1::random_using(n, dist, rng).mapv(|i: usize| xk[i])
            }
        };
        Ok(samples)
    }
}

/// Independent product of univariate variables with their canonical affine maps.
///
/// Samples are given as (nsamples, nvars) matrices, one sample per row.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serializable", derive(Serialize, Deserialize))]
pub struct AffineTransformation {
    variables: Vec<Variable>,
}

impl AffineTransformation {
    /// Constructor from marginal variables
    pub fn new(variables: Vec<Variable>) -> Result<Self> {
        if variables.is_empty() {
            return Err(InducedError::ConfigurationError(
                "transformation requires at least one variable".to_string(),
            ));
        }
        for var in variables.iter() {
            var.check()?;
        }
        Ok(AffineTransformation { variables })
    }

    /// Constructor of `num_vars` independent copies of a variable
    pub fn iid(variable: Variable, num_vars: usize) -> Result<Self> {
        Self::new(vec![variable; num_vars])
    }

    /// Number of variables
    pub fn num_vars(&self) -> usize {
        self.variables.len()
    }

    /// Marginal variables
    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    fn check_samples(&self, samples: &ArrayBase<impl Data<Elem = f64>, Ix2>) -> Result<()> {
        if samples.ncols() != self.num_vars() {
            return Err(InducedError::ConfigurationError(format!(
                "samples should have {} columns, got {}",
                self.num_vars(),
                samples.ncols()
            )));
        }
        Ok(())
    }

    /// Maps user space samples to the canonical space
    pub fn map_to_canonical_space(
        &self,
        samples: &ArrayBase<impl Data<Elem = f64>, Ix2>,
    ) -> Result<Array2<f64>> {
        self.check_samples(samples)?;
        let mut canonical = samples.to_owned();
        for (mut col, var) in canonical.columns_mut().into_iter().zip(self.variables.iter()) {
            col.mapv_inplace(|x| var.to_canonical(x));
        }
        Ok(canonical)
    }

    /// Maps canonical samples back to the user space
    pub fn map_from_canonical_space(
        &self,
        canonical_samples: &ArrayBase<impl Data<Elem = f64>, Ix2>,
    ) -> Result<Array2<f64>> {
        self.check_samples(canonical_samples)?;
        let mut samples = canonical_samples.to_owned();
        for (mut col, var) in samples.columns_mut().into_iter().zip(self.variables.iter()) {
            col.mapv_inplace(|z| var.from_canonical(z));
        }
        Ok(samples)
    }

    /// Joint density of user space samples
    pub fn pdf(&self, samples: &ArrayBase<impl Data<Elem = f64>, Ix2>) -> Result<Array1<f64>> {
        self.check_samples(samples)?;
        let mut values = Array1::ones(samples.nrows());
        Zip::from(&mut values)
            .and(samples.rows())
            .for_each(|v, row| {
                *v = row
                    .iter()
                    .zip(self.variables.iter())
                    .map(|(&x, var)| var.pdf(x))
                    .product();
            });
        Ok(values)
    }

    /// Draws `n` independent samples in the user space
    pub fn sample<R: Rng>(&self, n: usize, rng: &mut R) -> Result<Array2<f64>> {
        let mut samples = Array2::zeros((n, self.num_vars()));
        for (mut col, var) in samples.columns_mut().into_iter().zip(self.variables.iter()) {
            col.assign(&var.sample(n, rng)?);
        }
        Ok(samples)
    }
}
