use crate::errors::{InducedError, Result};
use ndarray::Array2;

// slack on the p-norm comparison so that indices lying exactly on the level are kept
const HYPERBOLIC_TOL: f64 = 1e-8;

fn check_hyperbolic_params(num_vars: usize, p: f64) -> Result<()> {
    if num_vars == 0 {
        return Err(InducedError::ConfigurationError(
            "multi-indices require at least one variable".to_string(),
        ));
    }
    if !(p > 0. && p <= 1.) {
        return Err(InducedError::ConfigurationError(format!(
            "hyperbolic parameter p should be in (0, 1], got {p}"
        )));
    }
    Ok(())
}

fn p_norm(index: &[usize], p: f64) -> f64 {
    index
        .iter()
        .map(|&i| (i as f64).powf(p))
        .sum::<f64>()
        .powf(1. / p)
}

/// Enumerates every index of `num_vars` components whose p-norm does not exceed `level`
fn enumerate_hyperbolic(num_vars: usize, level: usize, p: f64) -> Vec<Vec<usize>> {
    let budget = (level as f64).powf(p) + HYPERBOLIC_TOL;
    let mut result = vec![];
    let mut current = vec![0; num_vars];
    fill_component(0, 0., budget, level, p, &mut current, &mut result);
    result
}

fn fill_component(
    dim: usize,
    used: f64,
    budget: f64,
    level: usize,
    p: f64,
    current: &mut Vec<usize>,
    result: &mut Vec<Vec<usize>>,
) {
    if dim == current.len() {
        result.push(current.clone());
        return;
    }
    for i in 0..=level {
        let cost = used + (i as f64).powf(p);
        if cost > budget {
            break;
        }
        current[dim] = i;
        fill_component(dim + 1, cost, budget, level, p, current, result);
    }
    current[dim] = 0;
}

fn to_array(mut indices: Vec<Vec<usize>>, num_vars: usize) -> Array2<usize> {
    // graded ordering: total degree first then reversed lexicographic
    indices.sort_by(|a, b| {
        let (sa, sb) = (a.iter().sum::<usize>(), b.iter().sum::<usize>());
        sa.cmp(&sb).then_with(|| b.cmp(a))
    });
    let nindices = indices.len();
    Array2::from_shape_vec((nindices, num_vars), indices.into_iter().flatten().collect())
        .unwrap_or_else(|_| Array2::zeros((0, num_vars)))
}

/// Computes the hyperbolic multi-index set `{ i : ||i||_p <= level }` of `num_vars` variables
/// where `||i||_p = (sum_d i_d^p)^(1/p)` and `p` is in (0, 1].
///
/// `p = 1` gives the total degree set.
///
/// # Returns
///
/// * a (num_indices, num_vars) matrix, one multi-index per row, ordered by total degree
///   (the zero index comes first)
pub fn compute_hyperbolic_indices(num_vars: usize, level: usize, p: f64) -> Result<Array2<usize>> {
    check_hyperbolic_params(num_vars, p)?;
    Ok(to_array(enumerate_hyperbolic(num_vars, level, p), num_vars))
}

/// Computes the multi-indices of the hyperbolic set of `level` that are not in the set of
/// `level - 1`, that is `{ i : level - 1 < ||i||_p <= level }`.
///
/// The union of the level sets `0..=level` is [compute_hyperbolic_indices] of `level`.
pub fn compute_hyperbolic_level_indices(
    num_vars: usize,
    level: usize,
    p: f64,
) -> Result<Array2<usize>> {
    check_hyperbolic_params(num_vars, p)?;
    let indices = enumerate_hyperbolic(num_vars, level, p);
    let indices = if level == 0 {
        indices
    } else {
        let lower = (level - 1) as f64 + HYPERBOLIC_TOL;
        indices
            .into_iter()
            .filter(|index| p_norm(index, p) > lower)
            .collect()
    };
    Ok(to_array(indices, num_vars))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, concatenate, Axis};

    #[test]
    fn test_total_degree_indices() {
        let indices = compute_hyperbolic_indices(2, 2, 1.).unwrap();
        let expected = array![[0, 0], [1, 0], [0, 1], [2, 0], [1, 1], [0, 2]];
        assert_eq!(indices, expected);
    }

    #[test]
    fn test_total_degree_cardinality() {
        // binomial(num_vars + level, num_vars)
        assert_eq!(compute_hyperbolic_indices(3, 4, 1.).unwrap().nrows(), 35);
        assert_eq!(compute_hyperbolic_indices(1, 20, 1.).unwrap().nrows(), 21);
        assert_eq!(compute_hyperbolic_indices(2, 0, 1.).unwrap(), array![[0, 0]]);
    }

    #[test]
    fn test_hyperbolic_cross() {
        let indices = compute_hyperbolic_indices(2, 4, 0.5).unwrap();
        for row in indices.rows() {
            let norm = p_norm(row.as_slice().unwrap(), 0.5);
            assert!(norm <= 4. + HYPERBOLIC_TOL);
        }
        // (1, 1) has 0.5-norm 4, (2, 1) has 0.5-norm ~5.83
        assert!(indices.rows().into_iter().any(|r| r == array![1, 1]));
        assert!(!indices.rows().into_iter().any(|r| r == array![2, 1]));
        assert!(indices.nrows() < compute_hyperbolic_indices(2, 4, 1.).unwrap().nrows());
    }

    #[test]
    fn test_level_indices_partition() {
        let mut union = compute_hyperbolic_level_indices(3, 0, 1.).unwrap();
        for level in 1..=3 {
            let level_indices = compute_hyperbolic_level_indices(3, level, 1.).unwrap();
            assert!(level_indices
                .rows()
                .into_iter()
                .all(|r| r.sum() == level));
            union = concatenate![Axis(0), union, level_indices];
        }
        assert_eq!(union, compute_hyperbolic_indices(3, 3, 1.).unwrap());
    }

    #[test]
    fn test_invalid_parameters() {
        assert!(compute_hyperbolic_indices(0, 2, 1.).is_err());
        assert!(compute_hyperbolic_indices(2, 2, 0.).is_err());
        assert!(compute_hyperbolic_level_indices(2, 2, 1.5).is_err());
    }
}
