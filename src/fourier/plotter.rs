//! # Series sampling and spectra
//!
//! Evaluates the series on a uniform time grid:
//! - the "real" function, truncated at `N` harmonics (10000 by default)
//! - an approximation with `M` harmonics together with its amplitude and phase spectra
//!
//! Time points are sampled in parallel with rayon.

use crate::fourier::coefficients::{HarmonicCoefficients, coefficient_table};
use crate::symbolic::utils::linspace;
use log::{debug, info};
use nalgebra::DVector;
use rayon::prelude::*;
use std::f64::consts::PI;
use std::time::Instant;

/// number of harmonics of the "real" function
pub const REAL_HARMONICS: usize = 10000;
/// default number of harmonics of the approximation
pub const DEFAULT_HARMONICS: usize = 50;
pub const DEFAULT_STEP: f64 = 0.01;
pub const ZERO_TOLERANCE: f64 = 1e-12;

/// Truncated series with its spectra.
#[derive(Clone, Debug)]
pub struct SeriesApproximation {
    pub t: DVector<f64>,
    pub y: DVector<f64>,
    /// `sqrt(ak² + bk²)` for `k = 1..=M`
    pub amplitude: DVector<f64>,
    /// phase in degrees for `k = 1..=M`
    pub phase: DVector<f64>,
    /// `w0 * k` for `k = 1..=M`
    pub wk: DVector<f64>,
}

impl SeriesApproximation {
    pub fn harmonics(&self) -> usize {
        self.wk.len()
    }
}

/// Phase of harmonic `(ak, bk)` in degrees.
///
/// Rules are applied in this order, values below `tol` in magnitude count as zero:
/// 1. `ak = bk = 0` or `ak < 0, bk = 0` gives 0
/// 2. `ak >= 0, bk = 0` gives 180
/// 3. `ak = 0, bk > 0` gives -90
/// 4. `ak = 0, bk < 0` gives 90
/// 5. otherwise `-atan(bk/ak)` in degrees, `+180` for `ak > 0, bk > 0`,
///    `-180` for `ak < 0, bk > 0`
pub fn phase_degrees(ak: f64, bk: f64, tol: f64) -> f64 {
    let ak = if ak.abs() < tol { 0.0 } else { ak };
    let bk = if bk.abs() < tol { 0.0 } else { bk };
    if (ak == 0.0 && bk == 0.0) || (ak < 0.0 && bk == 0.0) {
        0.0
    } else if ak >= 0.0 && bk == 0.0 {
        180.0
    } else if ak == 0.0 && bk > 0.0 {
        -90.0
    } else if ak == 0.0 && bk < 0.0 {
        90.0
    } else {
        let phi = -(bk / ak).atan() * 180.0 / PI;
        if ak > 0.0 && bk > 0.0 {
            phi + 180.0
        } else if ak < 0.0 && bk > 0.0 {
            phi - 180.0
        } else {
            phi
        }
    }
}

#[derive(Clone, Debug)]
pub struct FourierSeriesPlotter {
    period: f64,
    omega: f64,
    t: DVector<f64>,
    /// harmonics of the "real" function
    pub real_harmonics: usize,
    pub zero_tolerance: f64,
}

impl FourierSeriesPlotter {
    /// Time grid from `start` (default `-2T`) to `end` (default `2T`) with `step` (default 0.01).
    ///
    /// The grid has `round((end - start)/step)` points including both ends.
    pub fn new(
        period: f64,
        start: Option<f64>,
        end: Option<f64>,
        step: Option<f64>,
    ) -> Result<FourierSeriesPlotter, String> {
        if !(period.is_finite() && period > 0.0) {
            return Err(format!("period must be positive, got {}", period));
        }
        let start = start.unwrap_or(-2.0 * period);
        let end = end.unwrap_or(2.0 * period);
        let step = step.unwrap_or(DEFAULT_STEP);
        if !(step > 0.0) || !(end > start) {
            return Err(format!(
                "invalid time grid: start = {}, end = {}, step = {}",
                start, end, step
            ));
        }
        let points = ((end - start) / step).round() as usize;
        if points < 2 {
            return Err(format!("time grid has {} points, at least 2 needed", points));
        }
        debug!("time grid [{}, {}] with {} points", start, end, points);
        Ok(FourierSeriesPlotter {
            period,
            omega: 2.0 * PI / period,
            t: DVector::from_vec(linspace(start, end, points)),
            real_harmonics: REAL_HARMONICS,
            zero_tolerance: ZERO_TOLERANCE,
        })
    }

    pub fn with_real_harmonics(mut self, n: usize) -> Self {
        self.real_harmonics = n;
        self
    }

    pub fn period(&self) -> f64 {
        self.period
    }

    pub fn time(&self) -> &DVector<f64> {
        &self.t
    }

    // a0 + Σ ak cos(w k t) + bk sin(w k t) on the grid
    fn sample(&self, a0: f64, table: &[(f64, f64)]) -> DVector<f64> {
        let omega = self.omega;
        let y: Vec<f64> = self
            .t
            .as_slice()
            .par_iter()
            .map(|&t| {
                table
                    .iter()
                    .enumerate()
                    .fold(a0, |acc, (i, (ak, bk))| {
                        let x = omega * (i + 1) as f64 * t;
                        acc + ak * x.cos() + bk * x.sin()
                    })
            })
            .collect();
        DVector::from_vec(y)
    }

    /// The series truncated at `real_harmonics` terms.
    pub fn sin_cos_serie<C: HarmonicCoefficients + ?Sized>(
        &self,
        coefficients: &C,
    ) -> (DVector<f64>, DVector<f64>) {
        let start = Instant::now();
        let n = self.real_harmonics;
        let table: Vec<(f64, f64)> = (1..=n)
            .into_par_iter()
            .map(|k| coefficients.ak_bk(k))
            .collect();
        let y = self.sample(coefficients.a0(), &table);
        info!(
            "series with {} harmonics sampled at {} points in {} ms",
            n,
            self.t.len(),
            start.elapsed().as_millis()
        );
        (self.t.clone(), y)
    }

    /// The series truncated at `m` terms with amplitude and phase spectra.
    pub fn sin_cos_serie_aprox<C: HarmonicCoefficients + ?Sized>(
        &self,
        coefficients: &C,
        m: usize,
    ) -> SeriesApproximation {
        let table = coefficient_table(coefficients, m);
        let y = self.sample(coefficients.a0(), &table);
        let amplitude = table
            .iter()
            .map(|(ak, bk)| (ak.powi(2) + bk.powi(2)).sqrt())
            .collect::<Vec<f64>>();
        let phase = table
            .iter()
            .map(|(ak, bk)| phase_degrees(*ak, *bk, self.zero_tolerance))
            .collect::<Vec<f64>>();
        let wk = (1..=m).map(|k| self.omega * k as f64).collect::<Vec<f64>>();
        SeriesApproximation {
            t: self.t.clone(),
            y,
            amplitude: DVector::from_vec(amplitude),
            phase: DVector::from_vec(phase),
            wk: DVector::from_vec(wk),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    // a0 = 1, a1 = 3, b2 = -2, everything else 0
    struct Fixed;

    impl HarmonicCoefficients for Fixed {
        fn period(&self) -> f64 {
            2.0 * PI
        }
        fn a0(&self) -> f64 {
            1.0
        }
        fn ak_bk(&self, k: usize) -> (f64, f64) {
            match k {
                1 => (3.0, 0.0),
                2 => (0.0, -2.0),
                _ => (0.0, 0.0),
            }
        }
    }

    #[test]
    fn test_phase_rules() {
        assert_eq!(phase_degrees(0.0, 0.0, 1e-12), 0.0);
        assert_eq!(phase_degrees(-1.0, 0.0, 1e-12), 0.0);
        assert_eq!(phase_degrees(1.0, 0.0, 1e-12), 180.0);
        assert_eq!(phase_degrees(0.0, 1.0, 1e-12), -90.0);
        assert_eq!(phase_degrees(0.0, -1.0, 1e-12), 90.0);
        assert_relative_eq!(phase_degrees(1.0, 1.0, 1e-12), 135.0, epsilon = 1e-12);
        assert_relative_eq!(phase_degrees(-1.0, 1.0, 1e-12), -135.0, epsilon = 1e-12);
        assert_relative_eq!(phase_degrees(1.0, -1.0, 1e-12), 45.0, epsilon = 1e-12);
        assert_relative_eq!(phase_degrees(-1.0, -1.0, 1e-12), -45.0, epsilon = 1e-12);
        // round-off is zero
        assert_eq!(phase_degrees(1e-17, 1.0, 1e-12), -90.0);
    }

    #[test]
    fn test_grid() {
        let p = FourierSeriesPlotter::new(2.0, None, None, None).unwrap();
        assert_eq!(p.time().len(), 800);
        assert_relative_eq!(p.time()[0], -4.0);
        assert_relative_eq!(p.time()[799], 4.0);
        let p = FourierSeriesPlotter::new(1.0, Some(0.0), Some(1.0), Some(0.25)).unwrap();
        assert_eq!(p.time().len(), 4);
        assert!(FourierSeriesPlotter::new(1.0, Some(1.0), Some(0.0), None).is_err());
        assert!(FourierSeriesPlotter::new(0.0, None, None, None).is_err());
    }

    #[test]
    fn test_approximation_and_spectra() {
        let p = FourierSeriesPlotter::new(2.0 * PI, Some(0.0), Some(PI), Some(PI / 4.0)).unwrap();
        let approx = p.sin_cos_serie_aprox(&Fixed, 3);
        assert_eq!(approx.harmonics(), 3);
        assert_relative_eq!(approx.wk[2], 3.0, epsilon = 1e-12);
        assert_relative_eq!(approx.amplitude[0], 3.0);
        assert_relative_eq!(approx.amplitude[1], 2.0);
        assert_relative_eq!(approx.amplitude[2], 0.0);
        assert_eq!(approx.phase[0], 180.0);
        assert_eq!(approx.phase[1], 90.0);
        assert_eq!(approx.phase[2], 0.0);
        for (i, &t) in approx.t.iter().enumerate() {
            let expected = 1.0 + 3.0 * t.cos() - 2.0 * (2.0 * t).sin();
            assert_relative_eq!(approx.y[i], expected, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_real_series_uses_configured_harmonics() {
        let p = FourierSeriesPlotter::new(2.0 * PI, Some(0.0), Some(1.0), Some(0.1))
            .unwrap()
            .with_real_harmonics(2);
        let (t, y) = p.sin_cos_serie(&Fixed);
        assert_eq!(t.len(), y.len());
        assert_relative_eq!(y[0], 4.0, epsilon = 1e-12);
    }
}
