//! Square wave of period 2: closed-form coefficients, first harmonics and the spectra.
use RustedFourier::fourier::coefficients::{HarmonicCoefficients, LambdifiedCoefficients};
use RustedFourier::fourier::piecewise::PiecewiseFunction;
use RustedFourier::fourier::plotter::FourierSeriesPlotter;
use RustedFourier::fourier::solver::FourierSolver;
use RustedFourier::fourier::task::{latex_report, spectrum_table};

fn main() -> Result<(), String> {
    let f = PiecewiseFunction::from_strings("2", &[("1", "0", "1"), ("0", "1", "2")])?;
    let solution = FourierSolver::new().solve_sin_cos(&f)?;
    println!("{}", latex_report(&solution));
    for k in 1..=5 {
        let (ak, bk) = solution.harmonic(k);
        println!("k = {}: a_k = {}, b_k = {}", k, ak, bk);
    }

    let coefficients = LambdifiedCoefficients::with_fallback(&solution, &f)?;
    println!("w0 = {}", coefficients.omega0());
    let plotter = FourierSeriesPlotter::new(f.period, Some(0.0), Some(2.0), Some(0.25))?
        .with_real_harmonics(1000);
    let (t, y) = plotter.sin_cos_serie(&coefficients);
    for (t, y) in t.iter().zip(y.iter()) {
        println!("f({:.2}) = {:.4}", t, y);
    }
    let approximation = plotter.sin_cos_serie_aprox(&coefficients, 7);
    println!("{}", spectrum_table("Amplitude Spectrum", &approximation.amplitude));
    println!("{}", spectrum_table("Phase Spectrum", &approximation.phase));
    Ok(())
}
