//! Fourier sine/cosine series of piecewise-defined periodic functions
//!
//! ```text
//! f(t) = a0 + Σ_{n=1}^{∞} [an cos(n w0 t) + bn sin(n w0 t)],   w0 = 2π/T
//! a0 = 1/T ∫ f(t) dt,  an = 2/T ∫ f(t) cos(n w0 t) dt,  bn = 2/T ∫ f(t) sin(n w0 t) dt
//! ```
//! The integrals run over one period, piece by piece.
//!
//!# Example
//! ```
//! use RustedFourier::fourier::piecewise::PiecewiseFunction;
//! use RustedFourier::fourier::solver::FourierSolver;
//! // square wave: 1 on (0, 1), 0 on (1, 2)
//! let f = PiecewiseFunction::from_strings("2", &[("1", "0", "1"), ("0", "1", "2")]).unwrap();
//! let solution = FourierSolver::new().solve_sin_cos(&f).unwrap();
//! assert_eq!(solution.a0_value().unwrap(), 0.5);
//! let (ak, bk) = solution.harmonic_values(1).unwrap();
//! assert!(ak.abs() < 1e-12);
//! assert!((bk - 2.0 / std::f64::consts::PI).abs() < 1e-12);
//! ```

/// name of the time variable of the input functions
pub const TIME: &str = "t";
/// name of the symbolic harmonic index
pub const INDEX: &str = "n";

/// numeric coefficient sources: lambdified closed forms and quadrature
pub mod coefficients;
/// input model: pieces of one period with their limits
pub mod piecewise;
/// sampling of the series on a time grid, amplitude and phase spectra
pub mod plotter;
/// unevaluated infinite sum
pub mod series;
/// symbolic derivation of a0, an, bn
pub mod solver;
/// task documents and the logging wrapper around a full run
pub mod task;
mod fourier_tests;
