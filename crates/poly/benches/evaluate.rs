use criterion::{criterion_group, criterion_main, Criterion};
use ndarray::Array;
use uqbox_poly::{evaluate, evaluate_with_derivatives, gauss_quadrature, jacobi_recurrence};

fn criterion_evaluate(c: &mut Criterion) {
    let degrees = [10, 50];
    let sizes = [100, 10000];

    let mut group = c.benchmark_group("poly");
    group.sample_size(20);
    for degree in degrees {
        let ab = jacobi_recurrence(degree + 1, 0., 0., true).unwrap();
        for size in sizes {
            let x = Array::linspace(-1., 1., size);
            group.bench_function(format!("evaluate-{degree}-degree-{size}-size"), |b| {
                b.iter(|| std::hint::black_box(evaluate(&x, degree, &ab).unwrap()));
            });
            group.bench_function(format!("derivatives-{degree}-degree-{size}-size"), |b| {
                b.iter(|| {
                    std::hint::black_box(evaluate_with_derivatives(&x, degree, &ab, 1).unwrap())
                });
            });
        }
        group.bench_function(format!("gauss-{degree}-points"), |b| {
            b.iter(|| std::hint::black_box(gauss_quadrature(&ab, degree + 1).unwrap()));
        });
    }
    group.finish();
}

criterion_group!(benches, criterion_evaluate);
criterion_main!(benches);
