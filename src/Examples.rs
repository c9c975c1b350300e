//! examples of usage of RustedFourier
/// Fourier series of classic periodic signals
pub mod fourier_examples;
/// Symbolic operations examples
pub mod symbolic_examples;
