//! # Symbolic Integration Module
//!
//! Indefinite and definite integration of the integrands that appear in Fourier analysis.
//!
//! The integrand is expanded into terms `c * t^m * e^(a t + b) * Π sin/cos(w t + phi) * g(t)`.
//! Everything free of the integration variable is pulled out as a (possibly symbolic)
//! constant; products of harmonics are reduced with product-to-sum identities, and each
//! remaining kernel is integrated in closed form:
//!
//! - `∫ cos(w t + p) = sin(w t + p)/w`, `∫ sin(w t + p) = -cos(w t + p)/w`
//! - `∫ e^(a t + b) = e^(a t + b)/a`
//! - `∫ e^u cos(w t + p) = e^u (a cos + w sin)/(a² + w²)`
//! - `∫ e^u sin(w t + p) = e^u (a sin - w cos)/(a² + w²)`
//! - `∫ t^m K = t^m ∫K - m ∫ t^(m-1) ∫K` (tabular integration by parts)
//!
//! Single non-kernel factors of a linear argument (`ln`, `tg`, `ctg`, inverse trigonometric
//! functions, powers, `1/u`) come from a table. Anything else is an error naming the term.
//!
//! Numeric integration (Simpson's rule and Gaussian quadrature) lives here as well.

use crate::symbolic::symbolic_engine::{Expr, PI_SYMBOL};
use crate::symbolic::symbolic_simplify::{Term, collect_terms, expand_terms};
use crate::symbolic::utils::as_integer;
use gauss_quad::{GaussHermite, GaussLaguerre, GaussLegendre};
use log::debug;
use std::f64::consts::PI;

/// kind of an oscillating factor `cos(w t + p)`, `sin(w t + p)` or plain `1`
#[derive(Clone, Copy, Debug, PartialEq)]
enum Kind {
    One,
    Cos,
    Sin,
}

/// `coef * kind(omega * t + phase)`
#[derive(Clone, Debug)]
struct Harmonic {
    coef: Expr,
    kind: Kind,
    omega: Expr,
    phase: Expr,
}

impl Harmonic {
    fn unit() -> Harmonic {
        Harmonic {
            coef: Expr::Const(1.0),
            kind: Kind::One,
            omega: Expr::Const(0.0),
            phase: Expr::Const(0.0),
        }
    }

    // a harmonic of zero frequency is a constant
    fn normalized(self) -> Harmonic {
        if self.kind == Kind::One {
            return self;
        }
        let omega = self.omega.simplify();
        let phase = self.phase.simplify();
        if omega.is_zero() {
            let value = if self.kind == Kind::Cos {
                phase.cos_of()
            } else {
                phase.sin_of()
            };
            return Harmonic {
                coef: (self.coef * value).simplify(),
                ..Harmonic::unit()
            };
        }
        Harmonic {
            omega,
            phase,
            ..self
        }
    }

    /// Product with `kind(omega t + phase)`, reduced by product-to-sum identities.
    fn times(&self, kind: Kind, omega: &Expr, phase: &Expr) -> Vec<Harmonic> {
        if self.kind == Kind::One {
            let product = Harmonic {
                coef: self.coef.clone(),
                kind,
                omega: omega.clone(),
                phase: phase.clone(),
            };
            return vec![product.normalized()];
        }
        // (kind of A+B, its sign, kind of A-B, its sign)
        let (sum_kind, sum_sign, diff_kind, diff_sign) = match (self.kind, kind) {
            // cos A cos B = (cos(A+B) + cos(A-B))/2
            (Kind::Cos, Kind::Cos) => (Kind::Cos, 1.0, Kind::Cos, 1.0),
            // sin A sin B = (cos(A-B) - cos(A+B))/2
            (Kind::Sin, Kind::Sin) => (Kind::Cos, -1.0, Kind::Cos, 1.0),
            // sin A cos B = (sin(A+B) + sin(A-B))/2
            (Kind::Sin, Kind::Cos) => (Kind::Sin, 1.0, Kind::Sin, 1.0),
            // cos A sin B = (sin(A+B) - sin(A-B))/2
            (Kind::Cos, Kind::Sin) => (Kind::Sin, 1.0, Kind::Sin, -1.0),
            _ => return vec![self.clone()],
        };
        let sum = Harmonic {
            coef: Expr::Const(0.5 * sum_sign) * self.coef.clone(),
            kind: sum_kind,
            omega: self.omega.clone() + omega.clone(),
            phase: self.phase.clone() + phase.clone(),
        };
        let diff = Harmonic {
            coef: Expr::Const(0.5 * diff_sign) * self.coef.clone(),
            kind: diff_kind,
            omega: self.omega.clone() - omega.clone(),
            phase: self.phase.clone() - phase.clone(),
        };
        vec![sum.normalized(), diff.normalized()]
    }
}

/// factors of one expanded term, sorted by how they are integrated
struct Integrand {
    constant: Term,
    degree: u32,
    exponent: Option<(Expr, Expr)>,
    harmonics: Vec<Harmonic>,
    special: Vec<(Expr, f64)>,
}

impl Integrand {
    fn classify(term: &Term, var: &str) -> Integrand {
        let mut parts = Integrand {
            constant: Term::constant(term.coef),
            degree: 0,
            exponent: None,
            harmonics: vec![Harmonic::unit()],
            special: Vec::new(),
        };
        for (base, exp) in term.factors.values() {
            if !base.contains_variable(var) {
                parts.constant.multiply_factor(base.clone(), *exp);
                continue;
            }
            let classified = match base {
                Expr::Var(_) => match as_integer(*exp, 1e-12) {
                    Some(k) if k >= 0 => {
                        parts.degree += k as u32;
                        true
                    }
                    _ => false,
                },
                Expr::Exp(arg) => parts.add_exponent(arg, *exp, var),
                Expr::Pow(b, arg) => match b.as_ref() {
                    Expr::Const(c) if *c > 0.0 => {
                        let log_arg = Expr::Const(c.ln()) * arg.as_ref().clone();
                        parts.add_exponent(&log_arg, *exp, var)
                    }
                    _ => false,
                },
                Expr::sin(arg) => parts.add_harmonic(Kind::Sin, arg, *exp, var),
                Expr::cos(arg) => parts.add_harmonic(Kind::Cos, arg, *exp, var),
                _ => false,
            };
            if !classified {
                parts.special.push((base.clone(), *exp));
            }
        }
        parts
    }

    fn add_exponent(&mut self, arg: &Expr, exp: f64, var: &str) -> bool {
        let Some((a, b)) = linear_coefficients(arg, var) else {
            return false;
        };
        let (a, b) = (Expr::Const(exp) * a, Expr::Const(exp) * b);
        self.exponent = Some(match self.exponent.take() {
            Some((alpha, beta)) => ((alpha + a).simplify(), (beta + b).simplify()),
            None => (a.simplify(), b.simplify()),
        });
        true
    }

    fn add_harmonic(&mut self, kind: Kind, arg: &Expr, exp: f64, var: &str) -> bool {
        let (Some((omega, phase)), Some(power)) =
            (linear_coefficients(arg, var), as_integer(exp, 1e-12))
        else {
            return false;
        };
        if power < 1 {
            return false;
        }
        for _ in 0..power {
            self.harmonics = self
                .harmonics
                .iter()
                .flat_map(|h| h.times(kind, &omega, &phase))
                .collect();
        }
        true
    }

    fn is_plain(&self) -> bool {
        self.exponent.is_none() && self.harmonics.len() == 1 && self.harmonics[0].kind == Kind::One
    }
}

/// Splits `arg` into `a * var + b` with `a`, `b` free of `var`.
///
/// Returns `None` if the argument is not linear in `var` or does not depend on it.
pub fn linear_coefficients(arg: &Expr, var: &str) -> Option<(Expr, Expr)> {
    let slope = arg.diff(var).simplify();
    if slope.contains_variable(var) || slope.is_zero() {
        return None;
    }
    let intercept = arg.set_variable(var, 0.0).simplify();
    Some((slope, intercept))
}

fn kind_value(kind: Kind, angle: &Expr) -> Expr {
    match kind {
        Kind::One => Expr::Const(1.0),
        Kind::Cos => angle.clone().cos_of(),
        Kind::Sin => angle.clone().sin_of(),
    }
}

fn sum_of(items: Vec<Expr>) -> Expr {
    items
        .into_iter()
        .reduce(|a, b| a + b)
        .unwrap_or(Expr::Const(0.0))
}

/// `∫ t^m e^(alpha t + beta) kind(omega t + phase) dt`
fn kernel_integral(
    m: u32,
    exponent: Option<&(Expr, Expr)>,
    kind: Kind,
    omega: &Expr,
    phase: &Expr,
    var: &str,
) -> Expr {
    let t = Expr::Var(var.to_string());
    // antiderivative of the kernel without t^m, as coef * kind pieces
    let pieces: Vec<(Expr, Kind)> = match (exponent, kind) {
        (None, Kind::One) => {
            let p = Expr::Const((m + 1) as f64);
            return t.pow(p.clone()) / p;
        }
        (None, Kind::Cos) => vec![(Expr::Const(1.0) / omega.clone(), Kind::Sin)],
        (None, Kind::Sin) => vec![(Expr::Const(-1.0) / omega.clone(), Kind::Cos)],
        (Some((alpha, _)), Kind::One) => vec![(Expr::Const(1.0) / alpha.clone(), Kind::One)],
        (Some((alpha, _)), _) => {
            let denom = alpha.clone().pow(Expr::Const(2.0)) + omega.clone().pow(Expr::Const(2.0));
            let a = alpha.clone() / denom.clone();
            let w = omega.clone() / denom;
            if kind == Kind::Cos {
                vec![(a, Kind::Cos), (w, Kind::Sin)]
            } else {
                vec![(a, Kind::Sin), (-w, Kind::Cos)]
            }
        }
    };
    let angle = omega.clone() * t.clone() + phase.clone();
    let mut head = sum_of(
        pieces
            .iter()
            .map(|(c, k)| c.clone() * kind_value(*k, &angle))
            .collect(),
    );
    if let Some((alpha, beta)) = exponent {
        head = head * (alpha.clone() * t.clone() + beta.clone()).exp();
    }
    if m == 0 {
        return head;
    }
    let head = t.pow(Expr::Const(m as f64)) * head;
    let tail = sum_of(
        pieces
            .iter()
            .map(|(c, k)| c.clone() * kernel_integral(m - 1, exponent, *k, omega, phase, var))
            .collect(),
    );
    head - Expr::Const(m as f64) * tail
}

/// table of single factors `g(u)^p` with `u = a t + b`
fn table_integral(base: &Expr, exp: f64, var: &str) -> Option<Expr> {
    if let Some((a, _)) = linear_coefficients(base, var) {
        let u = base.clone();
        return Some(if exp == -1.0 {
            u.ln() / a
        } else {
            let p = Expr::Const(exp + 1.0);
            u.pow(p.clone()) / (p * a)
        });
    }
    if exp != 1.0 {
        return None;
    }
    let (u, a) = match base {
        Expr::Ln(arg)
        | Expr::tg(arg)
        | Expr::ctg(arg)
        | Expr::arcsin(arg)
        | Expr::arccos(arg)
        | Expr::arctg(arg)
        | Expr::arcctg(arg) => {
            let (a, _) = linear_coefficients(arg, var)?;
            (arg.as_ref().clone(), a)
        }
        _ => return None,
    };
    let one = Expr::Const(1.0);
    let half = Expr::Const(0.5);
    let sqrt_1_u2 = (one.clone() - u.clone().pow(Expr::Const(2.0))).pow(half.clone());
    let ln_1_u2 = (one + u.clone().pow(Expr::Const(2.0))).ln();
    let antiderivative = match base {
        // u ln u - u
        Expr::Ln(_) => u.clone() * u.clone().ln() - u.clone(),
        // -ln(cos u)
        Expr::tg(_) => -(u.clone().cos_of().ln()),
        // ln(sin u)
        Expr::ctg(_) => u.clone().sin_of().ln(),
        Expr::arcsin(_) => u.clone() * Expr::arcsin(u.clone().boxed()) + sqrt_1_u2,
        Expr::arccos(_) => u.clone() * Expr::arccos(u.clone().boxed()) - sqrt_1_u2,
        Expr::arctg(_) => u.clone() * Expr::arctg(u.clone().boxed()) - half * ln_1_u2,
        Expr::arcctg(_) => u.clone() * Expr::arcctg(u.clone().boxed()) + half * ln_1_u2,
        _ => return None,
    };
    Some(antiderivative / a)
}

fn integrate_term(term: &Term, var: &str) -> Result<Expr, String> {
    let parts = Integrand::classify(term, var);
    let fail = || format!("Cannot integrate {} with respect to {}", term.to_expr(), var);
    let kernel = match parts.special.as_slice() {
        [] => sum_of(
            parts
                .harmonics
                .iter()
                .map(|h| {
                    h.coef.clone()
                        * kernel_integral(
                            parts.degree,
                            parts.exponent.as_ref(),
                            h.kind,
                            &h.omega,
                            &h.phase,
                            var,
                        )
                })
                .collect(),
        ),
        [(base, exp)] if parts.is_plain() => {
            let coef = parts.harmonics[0].coef.clone();
            if parts.degree == 0 {
                coef * table_integral(base, *exp, var).ok_or_else(fail)?
            } else {
                // ∫ t^m ln t = t^(m+1) (ln t/(m+1) - 1/(m+1)^2)
                let is_ln_t = *exp == 1.0
                    && matches!(base, Expr::Ln(arg) if matches!(arg.as_ref(), Expr::Var(v) if v == var));
                if !is_ln_t {
                    return Err(fail());
                }
                let t = Expr::Var(var.to_string());
                let p = Expr::Const((parts.degree + 1) as f64);
                coef * t.clone().pow(p.clone())
                    * (t.ln() / p.clone() - Expr::Const(1.0) / p.pow(Expr::Const(2.0)))
            }
        }
        _ => return Err(fail()),
    };
    Ok(parts.constant.to_expr() * kernel)
}

impl Expr {
    /// SYMBOLIC INTEGRATION

    /// Indefinite integral with respect to `var` (without constant of integration).
    ///
    /// Every symbol except `var` is treated as a constant, so `∫ t cos(n w t) dt` is found
    /// for a symbolic harmonic index `n`.
    ///
    /// # Errors
    /// Returns Err naming the first term outside the supported families
    pub fn integrate(&self, var: &str) -> Result<Expr, String> {
        let expr = self.simplify();
        if !expr.contains_variable(var) {
            return Ok((expr * Expr::Var(var.to_string())).simplify());
        }
        let mut result = Expr::Const(0.0);
        for term in collect_terms(expand_terms(&expr)) {
            result = result + integrate_term(&term, var)?;
        }
        let result = result.simplify();
        debug!("∫ {} d{} = {}", self, var, result);
        Ok(result)
    }

    /// Positive integer values of `index` at which a harmonic of the integrand has zero
    /// frequency after product-to-sum reduction.
    ///
    /// `∫ cos(t) cos(n t) dt` contains `sin((1 - n) t)/(1 - n)`, so it returns `[1]`.
    /// The closed form from [`Expr::integrate`] is not valid there; integrate again with
    /// `index` set to the returned value instead.
    pub fn resonant_indices(&self, var: &str, index: &str) -> Vec<usize> {
        let mut roots = Vec::new();
        for term in collect_terms(expand_terms(&self.simplify())) {
            let parts = Integrand::classify(&term, var);
            for h in parts.harmonics.iter().filter(|h| h.kind != Kind::One) {
                let Some((slope, intercept)) = linear_coefficients(&h.omega, index) else {
                    continue;
                };
                let (Ok(slope), Ok(intercept)) = (slope.eval_numeric(), intercept.eval_numeric())
                else {
                    continue;
                };
                if let Some(k) = as_integer(-intercept / slope, 1e-9) {
                    if k >= 1 && !roots.contains(&(k as usize)) {
                        roots.push(k as usize);
                    }
                }
            }
        }
        roots.sort_unstable();
        roots
    }

    /// Definite integral with symbolic limits: `F(upper) - F(lower)`, simplified.
    pub fn definite_integrate_symbolic(
        &self,
        var: &str,
        lower: &Expr,
        upper: &Expr,
    ) -> Result<Expr, String> {
        let antiderivative = self.integrate(var)?;
        let at_upper = antiderivative.substitute_variable(var, upper);
        let at_lower = antiderivative.substitute_variable(var, lower);
        Ok((at_upper - at_lower).simplify())
    }

    /// Definite integration using the fundamental theorem of calculus
    pub fn definite_integrate(&self, var: &str, lower: f64, upper: f64) -> Result<f64, String> {
        let indefinite = self.integrate(var)?;
        let upper_val = indefinite.eval_expression(&[var, PI_SYMBOL], &[upper, PI])?;
        let lower_val = indefinite.eval_expression(&[var, PI_SYMBOL], &[lower, PI])?;
        Ok(upper_val - lower_val)
    }

    /// Numerical integration using Simpson's rule
    pub fn numerical_integrate(&self, lower: f64, upper: f64, n: usize) -> Result<f64, String> {
        if n == 0 || n % 2 != 0 {
            return Err(format!("n must be even for Simpson's rule, got {}", n));
        }

        let h = (upper - lower) / (n as f64);
        let f = self.lambdify1D()?;

        let mut sum = f(lower) + f(upper);

        for i in 1..n {
            let x = lower + (i as f64) * h;
            if i % 2 == 0 {
                sum += 2.0 * f(x);
            } else {
                sum += 4.0 * f(x);
            }
        }

        Ok(sum * h / 3.0)
    }

    /// Numerical integration using Gaussian quadrature methods
    pub fn quad(
        &self,
        method: QuadMethod,
        degree: usize,
        lower: f64,
        upper: f64,
        alpha: Option<f64>,
    ) -> Result<f64, String> {
        if !method.is_suitable_for_interval(lower, upper) {
            return Err(format!(
                "{} cannot integrate over [{}, {}]",
                method.description(),
                lower,
                upper
            ));
        }
        let f = self.lambdify1D()?;

        match method {
            QuadMethod::GaussLegendre => {
                let quad = GaussLegendre::new(degree)
                    .map_err(|e| format!("Failed to create Gauss-Legendre quadrature: {:?}", e))?;
                Ok(quad.integrate(lower, upper, &f))
            }

            QuadMethod::GaussHermite => {
                let quad = GaussHermite::new(degree)
                    .map_err(|e| format!("Failed to create Gauss-Hermite quadrature: {:?}", e))?;
                Ok(quad.integrate(&f))
            }

            QuadMethod::GaussLaguerre => {
                let alpha = alpha.unwrap_or(0.5);
                let quad = GaussLaguerre::new(degree, alpha)
                    .map_err(|e| format!("Failed to create Gauss-Laguerre quadrature: {:?}", e))?;
                Ok(quad.integrate(&f))
            }
        }
    }
}

#[derive(Debug, Clone)]
pub enum QuadMethod {
    /// Gauss-Legendre quadrature for finite intervals
    GaussLegendre,
    /// Gauss-Hermite quadrature for infinite intervals with weight e^(-x²)
    GaussHermite,
    /// Gauss-Laguerre quadrature for semi-infinite intervals [0,∞) with weight e^(-x)
    GaussLaguerre,
}

impl QuadMethod {
    pub fn description(&self) -> &'static str {
        match self {
            QuadMethod::GaussLegendre => "Gauss-Legendre quadrature for finite intervals",
            QuadMethod::GaussHermite => {
                "Gauss-Hermite quadrature for infinite intervals with weight e^(-x²)"
            }
            QuadMethod::GaussLaguerre => {
                "Gauss-Laguerre quadrature for semi-infinite intervals [0,∞) with weight e^(-x)"
            }
        }
    }

    /// Check if the method is suitable for the given interval
    pub fn is_suitable_for_interval(&self, lower: f64, upper: f64) -> bool {
        match self {
            QuadMethod::GaussLegendre => lower.is_finite() && upper.is_finite(),
            QuadMethod::GaussHermite => lower.is_infinite() && upper.is_infinite(),
            QuadMethod::GaussLaguerre => lower == 0.0 && upper.is_infinite(),
        }
    }
}

///////////////////////////////////////////////////////////////////////////////////////////
// tests
////////////////////////////////////////////////////////////////////////////////////////////
#[cfg(test)]
mod integration_tests {

    use super::*;
    use approx::assert_relative_eq;

    fn parse(s: &str) -> Expr {
        Expr::parse_expression(s).unwrap()
    }

    // compares F(b) - F(a) with a high order Gauss-Legendre rule
    fn check_against_quadrature(integrand: &str, a: f64, b: f64) {
        let expr = parse(integrand);
        let exact = expr.definite_integrate("t", a, b).unwrap();
        let numeric = expr.quad(QuadMethod::GaussLegendre, 60, a, b, None).unwrap();
        assert_relative_eq!(exact, numeric, epsilon = 1e-9, max_relative = 1e-9);
    }

    #[test]
    fn test_integrate_constant() {
        // ∫ 5 dt = 5t
        let expr = Expr::Const(5.0);
        let result = expr.integrate("t").unwrap();
        let expected = Expr::Const(5.0) * Expr::Var("t".to_string());
        assert_eq!(result.simplify(), expected.simplify());
    }

    #[test]
    fn test_integrate_variable() {
        // ∫ t dt = t²/2
        let expr = Expr::Var("t".to_string());
        let result = expr.integrate("t").unwrap();
        let expected = Expr::Pow(
            Box::new(Expr::Var("t".to_string())),
            Box::new(Expr::Const(2.0)),
        ) / Expr::Const(2.0);
        assert_eq!(result.simplify(), expected.simplify());
    }

    #[test]
    fn test_integrate_different_variable() {
        // ∫ n dt = n*t (n is treated as constant)
        let expr = Expr::Var("n".to_string());
        let result = expr.integrate("t").unwrap();
        let expected = Expr::Var("n".to_string()) * Expr::Var("t".to_string());
        assert_eq!(result.simplify(), expected.simplify());
    }

    #[test]
    fn test_integrate_polynomial() {
        // ∫ (t + 3) dt = t²/2 + 3t
        let result = parse("t + 3").integrate("t").unwrap();
        let value = result.eval_expression(&["t"], &[2.0]).unwrap();
        assert_relative_eq!(value, 8.0, epsilon = 1e-10);
        check_against_quadrature("3*t^2 - 2*t + 1", -1.0, 2.0);
        check_against_quadrature("(1 - t)^3", 0.0, 1.5);
    }

    #[test]
    fn test_integrate_harmonics() {
        check_against_quadrature("cos(2*t)", 0.0, 1.3);
        check_against_quadrature("sin(3*t + 1)", -0.5, 2.0);
        check_against_quadrature("5*cos(pi*t/2)", 0.0, 1.0);
    }

    #[test]
    fn test_integrate_polynomial_times_harmonic() {
        check_against_quadrature("t*cos(2*t)", 0.0, 1.0);
        check_against_quadrature("t^2*sin(3*t + 1)", -1.0, 1.0);
        check_against_quadrature("(t + 1)^2*cos(t)", 0.0, 3.0);
    }

    #[test]
    fn test_integrate_exponentials() {
        check_against_quadrature("exp(2*t)", 0.0, 1.0);
        check_against_quadrature("t*exp(-t)", 0.0, 2.0);
        check_against_quadrature("t^2*exp(t)", -1.0, 1.0);
        check_against_quadrature("2^t", 0.0, 3.0);
    }

    #[test]
    fn test_x_times_exp_x_analytical() {
        // ∫ t * e^t dt = e^t(t - 1)
        let t = Expr::Var("t".to_string());
        let expr = t.clone() * t.clone().exp();
        let result = expr.integrate("t").unwrap();
        let expected = t.clone().exp() * (t.clone() - Expr::Const(1.0));
        for point in [0.0, 1.0, 2.0, -1.0, 0.5] {
            let result_val = result.eval_expression(&["t"], &[point]).unwrap();
            let expected_val = expected.eval_expression(&["t"], &[point]).unwrap();
            assert_relative_eq!(result_val, expected_val, epsilon = 1e-10);
        }
        let definite = expr.definite_integrate("t", 0.0, 1.0).unwrap();
        assert_relative_eq!(definite, 1.0, epsilon = 1e-10);
    }

    #[test]
    fn test_integrate_exponential_times_harmonic() {
        check_against_quadrature("exp(-t)*cos(2*t)", 0.0, 3.0);
        check_against_quadrature("exp(0.5*t)*sin(t)", -1.0, 2.0);
        check_against_quadrature("t*exp(2*t)*sin(t)", 0.0, 1.0);
    }

    #[test]
    fn test_integrate_products_of_harmonics() {
        check_against_quadrature("sin(t)^2", 0.0, 2.0);
        check_against_quadrature("cos(3*t)*cos(5*t)", 0.0, 1.0);
        check_against_quadrature("sin(t)*cos(t)", 0.3, 2.0);
        check_against_quadrature("t*sin(2*t)*sin(3*t)", 0.0, 1.0);
        check_against_quadrature("cos(t)^3", 0.0, 1.0);
    }

    #[test]
    fn test_integrate_table_functions() {
        check_against_quadrature("ln(t)", 1.0, 2.0);
        check_against_quadrature("1/t", 1.0, 3.0);
        check_against_quadrature("1/(2*t + 1)", 0.0, 1.0);
        check_against_quadrature("sqrt(t)", 1.0, 4.0);
        check_against_quadrature("t*ln(t)", 1.0, 2.0);
        check_against_quadrature("arctg(t)", 0.0, 1.0);
        check_against_quadrature("arcsin(t/2)", 0.0, 1.0);
        check_against_quadrature("tg(t)", 0.0, 1.0);
    }

    #[test]
    fn test_integrate_unsupported() {
        let err = parse("exp(t^2)").integrate("t").unwrap_err();
        assert!(err.contains("Cannot integrate"));
        assert!(parse("sin(t)/t").integrate("t").is_err());
    }

    #[test]
    fn test_linear_coefficients() {
        let (a, b) = linear_coefficients(&parse("2*n*pi*t/3 + 1"), "t").unwrap();
        assert!(!a.contains_variable("t"));
        assert_relative_eq!(
            a.eval_expression(&["n", "pi"], &[3.0, PI]).unwrap(),
            2.0 * PI,
            epsilon = 1e-12
        );
        assert_eq!(b, Expr::Const(1.0));
        assert!(linear_coefficients(&parse("t^2"), "t").is_none());
        assert!(linear_coefficients(&parse("n*pi"), "t").is_none());
    }

    #[test]
    fn test_definite_symbolic_periodicity() {
        // ∫_0^pi cos(n t) dt = sin(n pi)/n = 0 for integer n
        let res = parse("cos(n*t)")
            .definite_integrate_symbolic("t", &Expr::Const(0.0), &Expr::pi())
            .unwrap()
            .simplify_periodic("n");
        assert_eq!(res, Expr::Const(0.0));
    }

    #[test]
    fn test_definite_symbolic_with_index() {
        // ∫_{-pi}^{pi} t sin(n t) dt = 2 pi (-1)^(n+1) / n
        let res = parse("t*sin(n*t)")
            .definite_integrate_symbolic("t", &parse("-pi"), &Expr::pi())
            .unwrap()
            .simplify_periodic("n");
        for n in 1..6 {
            let value = res.eval_expression(&["n", "pi"], &[n as f64, PI]).unwrap();
            let sign = if n % 2 == 0 { -1.0 } else { 1.0 };
            assert_relative_eq!(value, sign * 2.0 * PI / n as f64, epsilon = 1e-10);
        }
    }

    #[test]
    fn test_resonant_harmonic_product() {
        // cos(t) cos(n t) with n = 1 divides by n - 1, other n stay finite
        let res = parse("cos(t)*cos(n*t)")
            .definite_integrate_symbolic("t", &Expr::Const(0.0), &Expr::pi())
            .unwrap();
        let at_two = res.eval_expression(&["n", "pi"], &[2.0, PI]).unwrap();
        assert_relative_eq!(at_two, 0.0, epsilon = 1e-10);
        let integrand = parse("cos(t)*cos(n*t)");
        assert_eq!(integrand.resonant_indices("t", "n"), vec![1]);
        // with n = 1 substituted first the product reduces to (1 + cos(2 t))/2
        let at_one = integrand
            .set_variable("n", 1.0)
            .definite_integrate_symbolic("t", &Expr::Const(0.0), &Expr::pi())
            .unwrap()
            .eval_numeric()
            .unwrap();
        assert_relative_eq!(at_one, PI / 2.0, epsilon = 1e-10);
    }

    #[test]
    fn test_resonant_indices() {
        // sin(2t) sin(n t) and sin(pi t) cos(n pi t) resonate at n = 2 and n = 1
        assert_eq!(parse("sin(2*t)*sin(n*t)").resonant_indices("t", "n"), vec![2]);
        assert_eq!(parse("sin(pi*t)*cos(n*pi*t)").resonant_indices("t", "n"), vec![1]);
        assert_eq!(parse("cos(3*t)*cos(n*t)").resonant_indices("t", "n"), vec![3]);
        // n, 1/2 - n and the damped n never vanish for integer n >= 1
        assert!(parse("t*cos(n*t)").resonant_indices("t", "n").is_empty());
        assert!(parse("cos(t/2)*cos(n*t)").resonant_indices("t", "n").is_empty());
        assert!(parse("exp(-t)*cos(n*t)").resonant_indices("t", "n").is_empty());
    }
}

#[cfg(test)]
mod quadrature_tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_simpson_rule() {
        // ∫₀² t e^(-t) dt = 1 - 3e^(-2)
        let t = Expr::Var("t".to_string());
        let expr = t.clone() * (-t.clone()).exp();
        let numerical_result = expr.numerical_integrate(0.0, 2.0, 1000).unwrap();
        let expected = 1.0 - 3.0 * (-2.0_f64).exp();
        assert_relative_eq!(numerical_result, expected, epsilon = 1e-8);
    }

    #[test]
    fn test_simpson_rule_odd_intervals() {
        let expr = Expr::Var("t".to_string());
        assert!(expr.numerical_integrate(0.0, 1.0, 7).is_err());
    }

    #[test]
    fn test_gauss_legendre_quadrature() {
        // ∫₀¹ t² dt = 1/3
        let t = Expr::Var("t".to_string());
        let expr = t.clone().pow(Expr::Const(2.0));
        let result = expr
            .quad(QuadMethod::GaussLegendre, 10, 0.0, 1.0, None)
            .unwrap();
        assert_relative_eq!(result, 1.0 / 3.0, epsilon = 1e-10);
    }

    #[test]
    fn test_gauss_legendre_with_pi() {
        // ∫₀^π sin(t) dt = 2
        let expr = Expr::parse_expression("sin(t)").unwrap();
        let result = expr
            .quad(QuadMethod::GaussLegendre, 20, 0.0, PI, None)
            .unwrap();
        assert_relative_eq!(result, 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_gauss_hermite_quadrature() {
        // ∫ e^(-t²) t² dt over the real line = sqrt(pi)/2, the weight is built in
        let t = Expr::Var("t".to_string());
        let expr = t.clone().pow(Expr::Const(2.0));
        let result = expr
            .quad(QuadMethod::GaussHermite, 10, f64::NEG_INFINITY, f64::INFINITY, None)
            .unwrap();
        assert_relative_eq!(result, PI.sqrt() / 2.0, epsilon = 1e-10);
    }

    #[test]
    fn test_unsuitable_interval() {
        let expr = Expr::Var("t".to_string());
        assert!(expr.quad(QuadMethod::GaussHermite, 10, 0.0, 1.0, None).is_err());
        assert!(expr.quad(QuadMethod::GaussLaguerre, 10, 1.0, f64::INFINITY, None).is_err());
        assert!(!QuadMethod::GaussLegendre.is_suitable_for_interval(0.0, f64::INFINITY));
    }
}
