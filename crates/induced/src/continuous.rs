use crate::errors::{InducedError, Result};
use crate::integrate::{adaptive_quadrature, QUADRATURE_SUBINTERVAL_LIMIT};
use crate::variables::Variable;

use argmin::core::{CostFunction, Error, Executor, State, TerminationReason};
use argmin::solver::brent::BrentRoot;
use log::debug;
use ndarray::{Array1, ArrayBase, Data, Ix1};
use uqbox_poly::{evaluate, RecurrenceCoefficients};

/// Density of the univariate induced measure `p_degree(t)^2 pdf(t)` evaluated on a batch of points
fn induced_density(
    pdf: &impl Fn(f64) -> f64,
    ab: &RecurrenceCoefficients,
    degree: usize,
    t: &Array1<f64>,
) -> Result<Array1<f64>> {
    let p = evaluate(t, degree, ab)?;
    let mut values = p.column(degree).mapv(|v| v * v);
    values.zip_mut_with(t, |v, &ti| *v *= pdf(ti));
    Ok(values)
}

fn integrate_induced_density(
    pdf: &impl Fn(f64) -> f64,
    ab: &RecurrenceCoefficients,
    degree: usize,
    lower: f64,
    upper: f64,
    tol: f64,
) -> Result<f64> {
    let (value, _) = adaptive_quadrature(
        |t: &Array1<f64>| induced_density(pdf, ab, degree, t),
        lower,
        upper,
        tol,
        tol,
        QUADRATURE_SUBINTERVAL_LIMIT,
    )?;
    Ok(value)
}

/// Computes the CDF of the univariate induced measure of degree `degree`
/// `F(x) = int_lb^x p_degree(t)^2 pdf(t) dt` at points `x` by adaptive quadrature.
///
/// `pdf` is the density of the measure the polynomials defined by `ab` are orthonormal to,
/// `[lb, ub]` its (possibly truncated) support and `tol` the absolute and relative
/// quadrature tolerance.
///
/// Fails with a configuration error if a point lies outside `[lb, ub]`.
pub fn continuous_induced_measure_cdf(
    pdf: impl Fn(f64) -> f64,
    ab: &RecurrenceCoefficients,
    degree: usize,
    lb: f64,
    ub: f64,
    tol: f64,
    x: &ArrayBase<impl Data<Elem = f64>, Ix1>,
) -> Result<Array1<f64>> {
    if !(lb < ub) {
        return Err(InducedError::ConfigurationError(format!(
            "invalid support [{lb}, {ub}]"
        )));
    }
    if let Some(v) = x.iter().find(|&&v| !(lb..=ub).contains(&v)) {
        return Err(InducedError::ConfigurationError(format!(
            "induced CDF queried at {v} outside of [{lb}, {ub}]"
        )));
    }
    if ab.len() <= degree {
        return Err(InducedError::ConfigurationError(format!(
            "degree {degree} requires {} recurrence coefficients, got {}",
            degree + 1,
            ab.len()
        )));
    }

    // integrate between consecutive sorted points and accumulate
    let mut order: Vec<usize> = (0..x.len()).collect();
    order.sort_by(|&i, &j| x[i].total_cmp(&x[j]));
    let mut cdf = Array1::zeros(x.len());
    let (mut previous, mut total) = (lb, 0.);
    for i in order {
        total += integrate_induced_density(&pdf, ab, degree, previous, x[i], tol)?;
        previous = x[i];
        cdf[i] = total;
    }
    // quadrature pieces may add up slightly above one
    cdf.mapv_inplace(|v: f64| v.clamp(0., 1.));
    Ok(cdf)
}

/// Root finding problem `F(x) - u = 0` on the induced CDF
struct InducedCdfRoot<'a, P: Fn(f64) -> f64> {
    pdf: &'a P,
    ab: &'a RecurrenceCoefficients,
    degree: usize,
    lb: f64,
    target: f64,
    tol: f64,
}

impl<P: Fn(f64) -> f64> CostFunction for InducedCdfRoot<'_, P> {
    type Param = f64;
    type Output = f64;

    fn cost(&self, x: &Self::Param) -> std::result::Result<Self::Output, Error> {
        integrate_induced_density(self.pdf, self.ab, self.degree, self.lb, *x, self.tol)
            .map(|cdf| cdf - self.target)
            .map_err(|e| Error::msg(e.to_string()))
    }
}

/// Computes the inverse CDF (quantile function) of the univariate induced measure of degree
/// `degree` of the canonical `variable` at probabilities `cdf_targets`.
///
/// Each quantile is the root of `F(x) - u` on the canonical support of the variable found
/// by Brent's method with tolerance `root_tol` in at most `max_iters` iterations, the CDF being
/// integrated with tolerance `quad_tol`. Targets below `F(lb) + quad_tol` give `lb` and targets
/// above `F(ub) - quad_tol` give `ub`.
///
/// Targets in `(1, 1 + quad_tol]` are accepted as rounding excess of a computed CDF.
///
/// Fails with a configuration error if a target is not a probability or if the variable is
/// discrete, and with a convergence failure if the iteration budget is exhausted.
pub fn continuous_induced_measure_ppf(
    variable: &Variable,
    ab: &RecurrenceCoefficients,
    degree: usize,
    cdf_targets: &ArrayBase<impl Data<Elem = f64>, Ix1>,
    quad_tol: f64,
    root_tol: f64,
    max_iters: u64,
) -> Result<Array1<f64>> {
    if variable.is_discrete() {
        return Err(InducedError::ConfigurationError(format!(
            "continuous inversion of discrete variable {variable:?}"
        )));
    }
    if let Some(u) = cdf_targets
        .iter()
        .find(|&&u| !(0. ..=1. + quad_tol).contains(&u))
    {
        return Err(InducedError::ConfigurationError(format!(
            "CDF target {u} is not a probability"
        )));
    }
    if ab.len() <= degree {
        return Err(InducedError::ConfigurationError(format!(
            "degree {degree} requires {} recurrence coefficients, got {}",
            degree + 1,
            ab.len()
        )));
    }
    let (lb, ub) = variable.canonical_support(degree);
    let pdf = |z: f64| variable.canonical_pdf(z);
    let cdf_ub = integrate_induced_density(&pdf, ab, degree, lb, ub, quad_tol)?;

    let mut quantiles = Array1::zeros(cdf_targets.len());
    for (q, &u) in quantiles.iter_mut().zip(cdf_targets.iter()) {
        if u <= quad_tol {
            *q = lb;
            continue;
        }
        if u >= cdf_ub - quad_tol {
            *q = ub;
            continue;
        }
        let problem = InducedCdfRoot {
            pdf: &pdf,
            ab,
            degree,
            lb,
            target: u,
            tol: quad_tol,
        };
        let solver = BrentRoot::new(lb, ub, root_tol);
        let res = Executor::new(problem, solver)
            .configure(|state| state.max_iters(max_iters))
            .run()?;
        if let Some(TerminationReason::MaxItersReached) = res.state().get_termination_reason() {
            return Err(InducedError::ConvergenceFailure(format!(
                "induced quantile of {u} (degree {degree}) not found in {max_iters} iterations"
            )));
        }
        *q = *res
            .state()
            .get_param()
            .or_else(|| res.state().get_best_param())
            .ok_or_else(|| {
                InducedError::ConvergenceFailure(format!("no induced quantile found for {u}"))
            })?;
    }
    debug!(
        "{} induced quantiles of degree {degree} computed",
        quantiles.len()
    );
    Ok(quantiles)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::{array, Array};

    fn beta33() -> Variable {
        Variable::Beta {
            a: 3.,
            b: 3.,
            lb: -1.,
            ub: 2.,
        }
    }

    #[test]
    fn test_cdf_bounds_and_monotonicity() {
        let var = beta33();
        let degree = 2;
        let ab = var.recurrence(degree + 1).unwrap();
        let x = Array::linspace(-1., 1., 101);
        let cdf = continuous_induced_measure_cdf(
            |z| var.canonical_pdf(z),
            &ab,
            degree,
            -1.,
            1.,
            1e-12,
            &x,
        )
        .unwrap();
        assert_abs_diff_eq!(cdf[0], 0., epsilon = 1e-15);
        assert_abs_diff_eq!(cdf[100], 1., epsilon = 1e-12);
        assert!(cdf.windows(2).into_iter().all(|w| w[0] <= w[1]));
        assert!(cdf.iter().all(|&v| (0. ..=1.).contains(&v)));
    }

    #[test]
    fn test_cdf_unsorted_points() {
        let var = beta33();
        let ab = var.recurrence(2).unwrap();
        let pdf = |z| var.canonical_pdf(z);
        let sorted = continuous_induced_measure_cdf(pdf, &ab, 1, -1., 1., 1e-12, &array![-0.5, 0., 0.5])
            .unwrap();
        let shuffled =
            continuous_induced_measure_cdf(pdf, &ab, 1, -1., 1., 1e-12, &array![0.5, -0.5, 0.])
                .unwrap();
        assert_abs_diff_eq!(shuffled, array![sorted[2], sorted[0], sorted[1]], epsilon = 1e-14);
        // symmetric density
        assert_abs_diff_eq!(sorted[1], 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_cdf_outside_support() {
        let var = beta33();
        let ab = var.recurrence(3).unwrap();
        let res = continuous_induced_measure_cdf(
            |z| var.canonical_pdf(z),
            &ab,
            2,
            -1.,
            1.,
            1e-10,
            &array![0., 1.5],
        );
        assert!(matches!(res, Err(InducedError::ConfigurationError(_))));
    }

    #[test]
    fn test_ppf_inverts_cdf() {
        let var = beta33();
        let degree = 2;
        let ab = var.recurrence(degree + 1).unwrap();
        let x = Array::linspace(-1., 1., 101);
        let cdf = continuous_induced_measure_cdf(
            |z| var.canonical_pdf(z),
            &ab,
            degree,
            -1.,
            1.,
            1e-12,
            &x,
        )
        .unwrap();
        assert!(cdf.iter().all(|&v| v <= 1.));
        let ppf = continuous_induced_measure_ppf(&var, &ab, degree, &cdf, 1e-12, 1e-10, 100).unwrap();
        assert_abs_diff_eq!(ppf, x, epsilon = 1e-7);
        // rounding excess of a computed CDF maps to the upper bound
        let ppf = continuous_induced_measure_ppf(
            &var,
            &ab,
            degree,
            &array![1. + 1e-13],
            1e-12,
            1e-10,
            100,
        )
        .unwrap();
        assert_eq!(ppf[0], 1.);
    }

    #[test]
    fn test_ppf_normal() {
        let var = Variable::Normal { mean: 0., std: 1. };
        let degree = 3;
        let ab = var.recurrence(degree + 1).unwrap();
        let ppf = continuous_induced_measure_ppf(&var, &ab, degree, &array![0.5], 1e-12, 1e-10, 100)
            .unwrap();
        // the induced density of a symmetric variable is symmetric
        assert_abs_diff_eq!(ppf[0], 0., epsilon = 1e-8);
        let (lb, ub) = var.canonical_support(degree);
        let ppf = continuous_induced_measure_ppf(&var, &ab, degree, &array![0., 1.], 1e-12, 1e-10, 100)
            .unwrap();
        assert_eq!(ppf, array![lb, ub]);
    }

    #[test]
    fn test_ppf_invalid_inputs() {
        let var = beta33();
        let ab = var.recurrence(3).unwrap();
        assert!(continuous_induced_measure_ppf(&var, &ab, 2, &array![1.5], 1e-10, 1e-8, 100).is_err());
        assert!(continuous_induced_measure_ppf(&var, &ab, 3, &array![0.5], 1e-10, 1e-8, 100).is_err());
        let binomial = Variable::Binomial { ntrials: 4, p: 0.5 };
        let ab = binomial.recurrence(3).unwrap();
        assert!(
            continuous_induced_measure_ppf(&binomial, &ab, 2, &array![0.5], 1e-10, 1e-8, 100).is_err()
        );
    }

    #[test]
    fn test_ppf_iteration_budget() {
        let var = beta33();
        let ab = var.recurrence(3).unwrap();
        let res = continuous_induced_measure_ppf(&var, &ab, 2, &array![0.3], 1e-12, 1e-14, 2);
        assert!(matches!(res, Err(InducedError::ConvergenceFailure(_))));
    }
}
