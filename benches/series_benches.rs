use criterion::{Criterion, criterion_group, criterion_main};
use RustedFourier::fourier::coefficients::{
    DEFAULT_QUAD_DEGREE, LambdifiedCoefficients, NumericCoefficients,
};
use RustedFourier::fourier::piecewise::PiecewiseFunction;
use RustedFourier::fourier::plotter::FourierSeriesPlotter;
use RustedFourier::fourier::solver::FourierSolver;
use std::hint::black_box;

fn square_wave() -> PiecewiseFunction {
    PiecewiseFunction::from_strings("2", &[("1", "0", "1"), ("0", "1", "2")])
        .expect("square wave")
}

fn bench_symbolic_solve(c: &mut Criterion) {
    let f = PiecewiseFunction::from_strings("2*pi", &[("t^2", "-pi", "pi")]).expect("parabola");
    c.bench_function("solve t^2", |b| {
        b.iter(|| FourierSolver::new().solve_sin_cos(black_box(&f)))
    });
}

fn bench_sampling(c: &mut Criterion) {
    let f = square_wave();
    let solution = FourierSolver::new().solve_sin_cos(&f).expect("solution");
    let lambdified = LambdifiedCoefficients::new(&solution).expect("lambdify");
    let numeric = NumericCoefficients::new(&f, DEFAULT_QUAD_DEGREE).expect("quadrature");
    let plotter = FourierSeriesPlotter::new(f.period, None, None, None)
        .expect("grid")
        .with_real_harmonics(1000);

    let mut group = c.benchmark_group("series sampling");
    group.bench_function("lambdified, 1000 harmonics", |b| {
        b.iter(|| plotter.sin_cos_serie(black_box(&lambdified)))
    });
    group.bench_function("quadrature, 50 harmonics", |b| {
        b.iter(|| plotter.sin_cos_serie_aprox(black_box(&numeric), 50))
    });
    group.finish();
}

criterion_group!(benches, bench_symbolic_solve, bench_sampling);
criterion_main!(benches);
