use linfa::ParamGuard;
use ndarray::Axis;
use ndarray_rand::rand::SeedableRng;
use rand_xoshiro::Xoshiro256Plus;
use std::error::Error;
use uqbox_induced::{
    compute_hyperbolic_indices, compute_hyperbolic_level_indices,
    compute_preconditioned_basis_matrix_condition_number, AffineTransformation, InducedExpansion,
    InducedSampler, InducedSamplerParams, PolynomialChaosExpansion, Variable,
};

fn main() -> Result<(), Box<dyn Error>> {
    let var_trans = AffineTransformation::new(vec![
        Variable::Beta {
            a: 5.,
            b: 5.,
            lb: -1.,
            ub: 3.,
        },
        Variable::Normal { mean: 1., std: 0.5 },
    ])?;
    let cond_tol = 1e2;
    let mut indices = compute_hyperbolic_indices(2, 1, 1.)?;
    let mut pce = PolynomialChaosExpansion::with_indices(var_trans.clone(), indices.clone())?;

    let sampler = InducedSampler::new(InducedSamplerParams::new().check()?)
        .with_rng(Xoshiro256Plus::seed_from_u64(42));
    let mut samples = sampler.generate_induced_samples_migliorati_tolerance(&pce, cond_tol)?;
    println!("level 1: {} samples", samples.nrows());

    // enrich the design level by level, previous samples are kept
    for level in 2..=4 {
        let new_indices = compute_hyperbolic_level_indices(2, level, 1.)?;
        samples = sampler.increment_induced_samples_migliorati(
            &mut pce,
            cond_tol,
            &samples,
            &indices,
            &new_indices,
        )?;
        indices = pce.indices().to_owned();
        let cond = compute_preconditioned_basis_matrix_condition_number(
            |z| pce.canonical_basis_matrix(z),
            &samples,
        )?;
        println!(
            "level {level}: {} samples for {} basis functions, condition number {cond:.2}",
            samples.nrows(),
            indices.nrows()
        );
    }

    let x = var_trans.map_from_canonical_space(&samples)?;
    println!("Design mean = {}", x.mean_axis(Axis(0)).ok_or("empty design")?);
    Ok(())
}
