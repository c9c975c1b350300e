use crate::fourier::TIME;
use crate::symbolic::symbolic_engine::{Expr, PI_SYMBOL};
use crate::symbolic::symbolic_lambdify::Lambda;
use log::{debug, warn};
use std::f64::consts::PI;

/// One analytic piece `f_i(t)` on `(lower, upper)`.
///
/// Limits are kept as expressions so that `pi` stays symbolic in the derived
/// coefficients; their numeric values are cached next to them.
#[derive(Clone, Debug)]
pub struct Piece {
    pub expr: Expr,
    pub lower_expr: Expr,
    pub upper_expr: Expr,
    pub lower: f64,
    pub upper: f64,
    compiled: Lambda,
}

impl Piece {
    pub fn new(expr: Expr, lower_expr: Expr, upper_expr: Expr) -> Result<Piece, String> {
        let foreign: Vec<String> = expr
            .all_arguments_are_variables()
            .into_iter()
            .filter(|v| v != TIME && v != PI_SYMBOL)
            .collect();
        if !foreign.is_empty() {
            return Err(format!(
                "function {} may only depend on '{}' and '{}', found {:?}",
                expr, TIME, PI_SYMBOL, foreign
            ));
        }
        let lower = limit_value(&lower_expr)?;
        let upper = limit_value(&upper_expr)?;
        if lower >= upper {
            return Err(format!(
                "lower limit {} must be less than upper limit {} for f(t) = {}",
                lower_expr, upper_expr, expr
            ));
        }
        let compiled = expr.set_variable(PI_SYMBOL, PI).compile(&[TIME])?;
        Ok(Piece {
            expr,
            lower_expr,
            upper_expr,
            lower,
            upper,
            compiled,
        })
    }

    /// numeric value of `f_i(t)`, without checking the limits
    pub fn eval(&self, t: f64) -> f64 {
        self.compiled.eval(&[t])
    }

    pub fn contains(&self, t: f64) -> bool {
        self.lower <= t && t < self.upper
    }

    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }
}

fn limit_value(limit: &Expr) -> Result<f64, String> {
    if !limit.is_numeric() {
        return Err(format!("limit {} must be a number (pi allowed)", limit));
    }
    let value = limit.eval_numeric()?;
    if !value.is_finite() {
        return Err(format!("limit {} is not finite", limit));
    }
    Ok(value)
}

/// A periodic function given by its pieces over one period.
#[derive(Clone, Debug)]
pub struct PiecewiseFunction {
    pub period_expr: Expr,
    pub period: f64,
    pub pieces: Vec<Piece>,
}

impl PiecewiseFunction {
    /// Builds the function from parallel lists of expressions and limits.
    ///
    /// # Errors
    /// - `"Functions and limits size doesn't match."` if the lists differ in length
    /// - a non-positive or non-numeric period
    /// - a piece with `lower >= upper` or with variables other than `t` and `pi`
    pub fn from_parts(
        period: Expr,
        functions: Vec<Expr>,
        limits: Vec<(Expr, Expr)>,
    ) -> Result<PiecewiseFunction, String> {
        if functions.len() != limits.len() {
            return Err("Functions and limits size doesn't match.".to_string());
        }
        let period_value = limit_value(&period).map_err(|e| format!("period: {}", e))?;
        if period_value <= 0.0 {
            return Err(format!("period must be positive, got {}", period));
        }
        let pieces = functions
            .into_iter()
            .zip(limits)
            .map(|(f, (a, b))| Piece::new(f, a, b))
            .collect::<Result<Vec<Piece>, String>>()?;

        let covered: f64 = pieces.iter().map(|p| p.width()).sum();
        if (covered - period_value).abs() > 1e-9 * period_value.max(1.0) {
            warn!(
                "pieces cover {} time units while the period is {}",
                covered, period_value
            );
        }
        debug!("piecewise function with {} pieces, T = {}", pieces.len(), period);
        Ok(PiecewiseFunction {
            period_expr: period,
            period: period_value,
            pieces,
        })
    }

    /// numeric limits and period
    pub fn new(
        period: f64,
        functions: Vec<Expr>,
        limits: Vec<(f64, f64)>,
    ) -> Result<PiecewiseFunction, String> {
        let limits = limits
            .into_iter()
            .map(|(a, b)| (Expr::Const(a), Expr::Const(b)))
            .collect();
        PiecewiseFunction::from_parts(Expr::Const(period), functions, limits)
    }

    /// Parses the period and `(f_i(t), a_i, b_i)` triples.
    ///
    /// # Examples
    /// ```rust, ignore
    /// let f = PiecewiseFunction::from_strings("2*pi", &[("t", "-pi", "pi")])?;
    /// ```
    pub fn from_strings(
        period: &str,
        parts: &[(&str, &str, &str)],
    ) -> Result<PiecewiseFunction, String> {
        let period = Expr::parse_expression(period)?;
        let functions =
            Expr::parse_vector_expression(&parts.iter().map(|(f, _, _)| *f).collect::<Vec<&str>>())?;
        let mut limits = Vec::with_capacity(parts.len());
        for (_, a, b) in parts {
            limits.push((Expr::parse_expression(a)?, Expr::parse_expression(b)?));
        }
        PiecewiseFunction::from_parts(period, functions, limits)
    }

    /// start of the period covered by the pieces
    pub fn origin(&self) -> f64 {
        self.pieces
            .iter()
            .map(|p| p.lower)
            .fold(f64::INFINITY, f64::min)
    }

    /// Value of the periodic extension at `t`; points outside every piece give 0.
    pub fn eval(&self, t: f64) -> f64 {
        if self.pieces.is_empty() {
            return 0.0;
        }
        let origin = self.origin();
        let tau = origin + (t - origin).rem_euclid(self.period);
        self.pieces
            .iter()
            .find(|p| p.contains(tau))
            .map(|p| p.eval(tau))
            .unwrap_or(0.0)
    }
}
