use criterion::{criterion_group, criterion_main, Criterion};
use linfa::ParamGuard;
use ndarray::array;
use ndarray_rand::rand::SeedableRng;
use rand_xoshiro::Xoshiro256Plus;
use uqbox_induced::{
    compute_hyperbolic_indices, induced_density_ratio, AffineTransformation, InducedExpansion,
    InducedSampler, InducedSamplerParams, PolynomialChaosExpansion, Variable,
};

fn criterion_induced(c: &mut Criterion) {
    let variable = Variable::Uniform { lb: -1., ub: 2. };
    let var_trans = AffineTransformation::iid(variable, 2).unwrap();

    let mut group = c.benchmark_group("induced");
    group.sample_size(10);
    for level in [2, 5] {
        let indices = compute_hyperbolic_indices(2, level, 1.).unwrap();
        let pce = PolynomialChaosExpansion::with_indices(var_trans.clone(), indices).unwrap();
        let sampler = InducedSampler::new(InducedSamplerParams::new().check().unwrap())
            .with_rng(Xoshiro256Plus::seed_from_u64(42));
        // Legendre polynomials peak at the corners of the domain
        let envelope =
            induced_density_ratio(&array![[2., 2.]], |x| pce.basis_matrix(x)).unwrap()[0];

        group.bench_function(format!("generate-{level}-level"), |b| {
            b.iter(|| std::hint::black_box(sampler.generate_induced_samples(&pce, 100).unwrap()));
        });
        group.bench_function(format!("rejection-{level}-level"), |b| {
            b.iter(|| {
                std::hint::black_box(
                    sampler
                        .random_induced_measure_sampling(
                            100,
                            2,
                            |x| pce.basis_matrix(x),
                            |x| var_trans.pdf(x),
                            |x| var_trans.pdf(x),
                            |n, rng| var_trans.sample(n, rng),
                            envelope,
                        )
                        .unwrap(),
                )
            });
        });
        group.bench_function(format!("migliorati-{level}-level"), |b| {
            b.iter(|| {
                std::hint::black_box(
                    sampler
                        .generate_induced_samples_migliorati_tolerance(&pce, 1e2)
                        .unwrap(),
                )
            });
        });
    }
    group.finish();
}

criterion_group!(benches, criterion_induced);
criterion_main!(benches);
