//! # Fourier coefficient solver
//!
//! Derives `a0`, `an` and `bn` of a piecewise periodic function in closed form:
//!
//! 1. `w0 = 2 pi / T` with `pi` kept as a symbol
//! 2. every piece contributes `1/T ∫ f`, `2/T ∫ f cos(n w0 t)`, `2/T ∫ f sin(n w0 t)`
//!    over its own limits
//! 3. `an`, `bn` are reduced with the periodicity rules for integer `n`
//!    (`cos(2 n pi) = 1`, `sin(2 n pi) = 0`, `cos(n pi) = (-1)^n`, `sin(n pi) = 0`)
//!    and simplified
//! 4. harmonics `k` at which a product-to-sum frequency `(c - n) w0` vanishes are
//!    derived again with `n = k` substituted before integration and kept apart
//! 5. the series itself is kept unevaluated
//!
//! Integration failures are returned as errors, nothing is retried.

use crate::fourier::piecewise::PiecewiseFunction;
use crate::fourier::series::FourierSeries;
use crate::fourier::{INDEX, TIME};
use crate::symbolic::symbolic_engine::Expr;
use log::{debug, info};
use std::collections::BTreeMap;
use std::time::Instant;

/// Closed-form coefficients of the series.
#[derive(Clone, Debug)]
pub struct FourierSolution {
    pub a0: Expr,
    pub an: Expr,
    pub bn: Expr,
    pub f_t: FourierSeries,
    pub period: f64,
    /// `k -> (ak, bk)` where `an`, `bn` do not hold
    pub resonant: BTreeMap<usize, (Expr, Expr)>,
}

impl FourierSolution {
    /// numeric value of the DC component
    pub fn a0_value(&self) -> Result<f64, String> {
        self.a0.eval_numeric()
    }

    /// `(ak, bk)`: the resonant pair if `k` is one, otherwise the closed forms with `n = k`
    pub fn harmonic(&self, k: usize) -> (Expr, Expr) {
        if let Some(pair) = self.resonant.get(&k) {
            return pair.clone();
        }
        let at_k = |e: &Expr| e.set_variable(INDEX, k as f64).simplify_periodic(INDEX);
        (at_k(&self.an), at_k(&self.bn))
    }

    /// numeric `(ak, bk)`
    ///
    /// # Errors
    /// Returns Err if either value is not finite
    pub fn harmonic_values(&self, k: usize) -> Result<(f64, f64), String> {
        let (ak, bk) = self.harmonic(k);
        let (a, b) = (ak.eval_numeric()?, bk.eval_numeric()?);
        if !a.is_finite() || !b.is_finite() {
            return Err(format!("harmonic {} is singular: a = {}, b = {}", k, a, b));
        }
        Ok((a, b))
    }
}

#[derive(Clone, Debug, Default)]
pub struct FourierSolver {}

impl FourierSolver {
    pub fn new() -> Self {
        FourierSolver {}
    }

    // Σ 2/T ∫ f cos, Σ 2/T ∫ f sin over the pieces, unsimplified
    fn harmonic_integrals(
        f: &PiecewiseFunction,
        harmonic_arg: &Expr,
    ) -> Result<(Expr, Expr), String> {
        let period = f.period_expr.clone();
        let mut an = Expr::Const(0.0);
        let mut bn = Expr::Const(0.0);
        for (i, piece) in f.pieces.iter().enumerate() {
            let integral = |integrand: Expr| {
                integrand.definite_integrate_symbolic(TIME, &piece.lower_expr, &piece.upper_expr)
            };
            let cos_part = integral(piece.expr.clone() * harmonic_arg.clone().cos_of())?;
            let sin_part = integral(piece.expr.clone() * harmonic_arg.clone().sin_of())?;
            debug!("piece {}: ∫f cos = {}, ∫f sin = {}", i + 1, cos_part, sin_part);
            an += Expr::Const(2.0) / period.clone() * cos_part;
            bn += Expr::Const(2.0) / period.clone() * sin_part;
        }
        Ok((an, bn))
    }

    /// Sine/cosine series of `f`.
    pub fn solve_sin_cos(&self, f: &PiecewiseFunction) -> Result<FourierSolution, String> {
        let start = Instant::now();
        let period = f.period_expr.clone();
        let t = Expr::Var(TIME.to_string());
        let n = Expr::Var(INDEX.to_string());
        let w0 = (Expr::Const(2.0) * Expr::pi() / period.clone()).simplify();
        let harmonic_arg = n * w0.clone() * t;

        let mut a0 = Expr::Const(0.0);
        let mut resonances: Vec<usize> = Vec::new();
        for (i, piece) in f.pieces.iter().enumerate() {
            let dc = piece
                .expr
                .definite_integrate_symbolic(TIME, &piece.lower_expr, &piece.upper_expr)?;
            debug!("piece {}: ∫f = {}", i + 1, dc);
            a0 += Expr::Const(1.0) / period.clone() * dc;
            for integrand in [
                piece.expr.clone() * harmonic_arg.clone().cos_of(),
                piece.expr.clone() * harmonic_arg.clone().sin_of(),
            ] {
                resonances.extend(integrand.resonant_indices(TIME, INDEX));
            }
        }
        resonances.sort_unstable();
        resonances.dedup();

        let (an, bn) = Self::harmonic_integrals(f, &harmonic_arg)?;
        let a0 = a0.simplify_periodic(INDEX);
        let an = an.simplify_periodic(INDEX);
        let bn = bn.simplify_periodic(INDEX);
        info!("a0 = {}", a0);
        info!("an = {}", an);
        info!("bn = {}", bn);

        let mut resonant = BTreeMap::new();
        for k in resonances {
            let arg_k = harmonic_arg.set_variable(INDEX, k as f64);
            let (ak, bk) = Self::harmonic_integrals(f, &arg_k)?;
            let (ak, bk) = (ak.simplify_periodic(INDEX), bk.simplify_periodic(INDEX));
            info!("resonant harmonic k = {}: a = {}, b = {}", k, ak, bk);
            resonant.insert(k, (ak, bk));
        }

        let f_t = FourierSeries::new(a0.clone(), an.clone(), bn.clone(), w0)
            .with_resonant(resonant.clone());
        info!(
            "coefficients derived in {} ms",
            start.elapsed().as_millis()
        );
        Ok(FourierSolution {
            a0,
            an,
            bn,
            f_t,
            period: f.period,
            resonant,
        })
    }

    /// Parallel lists version: `functions[i]` lives on `limits[i]`.
    pub fn solve(
        &self,
        period: Expr,
        functions: Vec<Expr>,
        limits: Vec<(Expr, Expr)>,
    ) -> Result<FourierSolution, String> {
        let f = PiecewiseFunction::from_parts(period, functions, limits)?;
        self.solve_sin_cos(&f)
    }
}
