//! # Symbolic Expression Simplification Module
//!
//! Algebraic simplification of symbolic expressions.
//!
//! ## Simplification Strategy
//!
//! 1. **Constant Folding**: Evaluates arithmetic operations and functions of numerical constants
//! 2. **Algebraic Identities**: x + 0 = x, x * 1 = x, x^0 = 1, exp(ln x) = x ...
//! 3. **Term Collection**: every sum is flattened into terms `coef * Π base^exp`, products of
//!    sums with small positive integer powers are expanded, equal terms are merged
//! 4. **Factor Collection**: equal bases inside a product are merged by adding exponents,
//!    which also cancels common factors of numerator and denominator
//! 5. **Periodicity**: `apply_periodicity` rewrites `sin/cos(c*n*pi + phi)` for an
//!    integer index `n` and integer `c`
//!
//! `simplify()` repeats one bottom-up pass until the expression stops changing.

use crate::symbolic::symbolic_engine::{Expr, PI_SYMBOL};
use crate::symbolic::utils::{as_integer, snap_to_integer};
use std::collections::BTreeMap;
use std::f64::consts::PI;

const INTEGER_TOL: f64 = 1e-9;
const FOLD_TOL: f64 = 1e-14;
const MAX_PASSES: usize = 12;
/// sums raised to a positive integer power up to this one are expanded
const MAX_EXPANDED_POWER: i64 = 6;
const MAX_EXPANDED_TERMS: usize = 512;

/// A product `coef * Π base_i ^ exp_i` with numeric exponents.
///
/// Bases are keyed by their printed form, so that `t * t` meets as `t^2`
/// and `x / x` cancels.
#[derive(Clone, Debug, PartialEq)]
pub struct Term {
    pub coef: f64,
    pub factors: BTreeMap<String, (Expr, f64)>,
}

impl Term {
    pub fn constant(coef: f64) -> Term {
        Term {
            coef,
            factors: BTreeMap::new(),
        }
    }

    /// Splits a product/quotient into coefficient and factors.
    pub fn from_expr(expr: &Expr) -> Term {
        let mut term = Term::constant(1.0);
        term.absorb(expr, 1.0);
        term
    }

    fn scale(&mut self, c: f64, power: f64) {
        if power == 1.0 {
            self.coef *= c;
        } else if power == -1.0 {
            self.coef /= c;
        } else {
            self.coef *= c.powf(power);
        }
    }

    fn absorb(&mut self, expr: &Expr, power: f64) {
        match expr {
            Expr::Const(c) => self.scale(*c, power),
            Expr::Mul(lhs, rhs) => {
                self.absorb(lhs, power);
                self.absorb(rhs, power);
            }
            Expr::Div(lhs, rhs) => {
                self.absorb(lhs, power);
                self.absorb(rhs, -power);
            }
            Expr::Pow(base, exp) => match (base.as_ref(), exp.as_ref()) {
                (Expr::Const(b), Expr::Const(e)) => self.scale(b.powf(*e), power),
                (Expr::Mul(_, _) | Expr::Div(_, _) | Expr::Pow(_, _), Expr::Const(e))
                    if as_integer(*e, INTEGER_TOL).is_some() =>
                {
                    self.absorb(base, e * power)
                }
                (Expr::Const(_), _) => self.multiply_factor(expr.clone(), power),
                (_, Expr::Const(e)) => self.multiply_factor(base.as_ref().clone(), e * power),
                _ => self.multiply_factor(expr.clone(), power),
            },
            _ => self.multiply_factor(expr.clone(), power),
        }
    }

    pub fn multiply_factor(&mut self, base: Expr, exp: f64) {
        let key = format!("{}", base);
        let remove = {
            let entry = self.factors.entry(key.clone()).or_insert((base, 0.0));
            entry.1 += exp;
            entry.1.abs() < 1e-12
        };
        if remove {
            self.factors.remove(&key);
        }
    }

    pub fn mul(&self, other: &Term) -> Term {
        let mut res = self.clone();
        res.coef *= other.coef;
        for (base, exp) in other.factors.values() {
            res.multiply_factor(base.clone(), *exp);
        }
        res
    }

    /// key of the non-numeric part
    pub fn key(&self) -> String {
        self.factors
            .iter()
            .map(|(k, (_, e))| format!("{}^{}", k, e))
            .collect::<Vec<_>>()
            .join("*")
    }

    pub fn is_constant(&self) -> bool {
        self.factors.is_empty()
    }

    /// true if the term is exactly `coef * a^1 * b^1 ...` for the given variable names
    pub fn has_exactly_variables(&self, names: &[&str]) -> bool {
        self.factors.len() == names.len()
            && names.iter().all(|name| {
                self.factors
                    .get(*name)
                    .map(|(base, exp)| *exp == 1.0 && matches!(base, Expr::Var(v) if v == name))
                    .unwrap_or(false)
            })
    }

    fn factor_to_expr(base: &Expr, exp: f64) -> Expr {
        if exp == 1.0 {
            base.clone()
        } else {
            Expr::Pow(Box::new(base.clone()), Box::new(Expr::Const(exp)))
        }
    }

    fn product(factors: Vec<Expr>) -> Option<Expr> {
        factors
            .into_iter()
            .reduce(|a, b| Expr::Mul(Box::new(a), Box::new(b)))
    }

    /// Rebuilds `coef * numerator / denominator`.
    pub fn to_expr(&self) -> Expr {
        let num: Vec<Expr> = self
            .factors
            .values()
            .filter(|(_, e)| *e > 0.0)
            .map(|(b, e)| Term::factor_to_expr(b, *e))
            .collect();
        let den: Vec<Expr> = self
            .factors
            .values()
            .filter(|(_, e)| *e < 0.0)
            .map(|(b, e)| Term::factor_to_expr(b, -*e))
            .collect();
        let numerator = match Term::product(num) {
            None => Expr::Const(self.coef),
            Some(p) if self.coef == 1.0 => p,
            Some(p) => Expr::Mul(Box::new(Expr::Const(self.coef)), Box::new(p)),
        };
        match Term::product(den) {
            None => numerator,
            Some(d) => Expr::Div(Box::new(numerator), Box::new(d)),
        }
    }
}

/// Flattens a sum into terms, expanding products of sums.
pub fn expand_terms(expr: &Expr) -> Vec<Term> {
    match expr {
        Expr::Add(lhs, rhs) => {
            let mut terms = expand_terms(lhs);
            terms.extend(expand_terms(rhs));
            terms
        }
        Expr::Sub(lhs, rhs) => {
            let mut terms = expand_terms(lhs);
            terms.extend(expand_terms(rhs).into_iter().map(|mut t| {
                t.coef = -t.coef;
                t
            }));
            terms
        }
        _ => distribute(Term::from_expr(expr)),
    }
}

fn is_sum(expr: &Expr) -> bool {
    matches!(expr, Expr::Add(_, _) | Expr::Sub(_, _))
}

// multiplies out factors that are sums raised to a small positive integer power
fn distribute(term: Term) -> Vec<Term> {
    let expandable = term.factors.iter().find_map(|(key, (base, exp))| {
        let power = as_integer(*exp, INTEGER_TOL)?;
        if is_sum(base) && power >= 1 && power <= MAX_EXPANDED_POWER {
            Some((key.clone(), base.clone(), power))
        } else {
            None
        }
    });
    let Some((key, base, power)) = expandable else {
        return vec![term];
    };
    let mut rest = term.clone();
    rest.factors.remove(&key);
    let inner = expand_terms(&base);
    let mut acc = vec![rest];
    for _ in 0..power {
        if acc.len() * inner.len() > MAX_EXPANDED_TERMS {
            return vec![term];
        }
        acc = acc
            .iter()
            .flat_map(|a| inner.iter().map(move |b| a.mul(b)))
            .collect();
    }
    acc.into_iter().flat_map(distribute).collect()
}

/// Merges terms with equal non-numeric parts and drops the ones that cancel.
pub fn collect_terms(terms: Vec<Term>) -> Vec<Term> {
    let mut grouped: BTreeMap<String, (Term, f64)> = BTreeMap::new();
    for term in terms {
        let key = term.key();
        let scale = term.coef.abs();
        match grouped.get_mut(&key) {
            Some((acc, max_abs)) => {
                acc.coef += term.coef;
                *max_abs = max_abs.max(scale);
            }
            None => {
                grouped.insert(key, (term, scale));
            }
        }
    }
    let (constants, mut others): (Vec<_>, Vec<_>) = grouped
        .into_values()
        .filter(|(t, max_abs)| !(t.coef == 0.0 || t.coef.abs() <= 1e-13 * max_abs))
        .map(|(t, _)| t)
        .partition(|t| t.is_constant());
    others.extend(constants);
    others
}

/// Builds a sum from terms, writing negative terms as subtraction.
pub fn terms_to_expr(terms: &[Term]) -> Expr {
    let mut iter = terms.iter();
    let Some(first) = iter.next() else {
        return Expr::Const(0.0);
    };
    iter.fold(first.to_expr(), |acc, term| {
        if term.coef < 0.0 {
            let mut positive = term.clone();
            positive.coef = -positive.coef;
            Expr::Sub(Box::new(acc), Box::new(positive.to_expr()))
        } else {
            Expr::Add(Box::new(acc), Box::new(term.to_expr()))
        }
    })
}

fn collect_sum(expr: &Expr) -> Expr {
    terms_to_expr(&collect_terms(expand_terms(expr)))
}

fn collect_product(expr: &Expr) -> Expr {
    let term = Term::from_expr(expr);
    if term.coef == 0.0 {
        return Expr::Const(0.0);
    }
    // c * (a + b) is distributed, any other product keeps its sums
    if term.coef != 1.0 && term.factors.len() == 1 {
        if let Some((base, exp)) = term.factors.values().next() {
            if *exp == 1.0 && is_sum(base) {
                return collect_sum(expr);
            }
        }
    }
    term.to_expr()
}

fn fold(val: f64) -> Expr {
    Expr::Const(snap_to_integer(val, FOLD_TOL))
}

// the argument negated, if every term of it has a negative coefficient
fn negated_argument(arg: &Expr) -> Option<Expr> {
    let terms = collect_terms(expand_terms(arg));
    if terms.is_empty() || terms.iter().any(|t| t.coef >= 0.0) {
        return None;
    }
    let flipped: Vec<Term> = terms
        .into_iter()
        .map(|mut t| {
            t.coef = -t.coef;
            t
        })
        .collect();
    Some(terms_to_expr(&flipped))
}

fn simplify_power(base: Expr, exp: Expr) -> Expr {
    match (&base, &exp) {
        (Expr::Const(a), Expr::Const(b)) => Expr::Const(a.powf(*b)), // (a) ^ (b) = (a ^ b)
        (_, Expr::Const(0.0)) => Expr::Const(1.0),                   // x ^ 0 = 1
        (_, Expr::Const(1.0)) => base,                               // x ^ 1 = x
        (Expr::Const(1.0), _) => Expr::Const(1.0),                   // 1 ^ x = 1
        // ((-1)^n)^k = (-1)^(n k) for integer k
        (Expr::Pow(inner_base, inner_exp), Expr::Const(k))
            if matches!(inner_base.as_ref(), Expr::Const(c) if *c == -1.0) =>
        {
            match as_integer(*k, INTEGER_TOL) {
                Some(k) if k % 2 == 0 => Expr::Const(1.0),
                Some(_) => Expr::Pow(inner_base.clone(), inner_exp.clone()),
                None => Expr::Pow(Box::new(base.clone()), Box::new(exp.clone())),
            }
        }
        // (-1)^(n + k) = (-1)^k (-1)^n
        (Expr::Const(c), _) if *c == -1.0 && is_sum(&exp) => {
            let terms = collect_terms(expand_terms(&exp));
            let (constant, rest): (Vec<Term>, Vec<Term>) =
                terms.into_iter().partition(|t| t.is_constant());
            let shift = constant.first().map(|t| t.coef).unwrap_or(0.0);
            match as_integer(shift, INTEGER_TOL) {
                Some(k) => {
                    let sign = if k % 2 == 0 { 1.0 } else { -1.0 };
                    let power = Expr::Pow(Box::new(base.clone()), Box::new(terms_to_expr(&rest)));
                    Expr::Mul(Box::new(Expr::Const(sign)), Box::new(power))
                }
                None => Expr::Pow(Box::new(base.clone()), Box::new(exp.clone())),
            }
        }
        (Expr::Mul(_, _) | Expr::Div(_, _) | Expr::Pow(_, _), Expr::Const(_)) => {
            collect_product(&Expr::Pow(Box::new(base.clone()), Box::new(exp.clone())))
        }
        _ => Expr::Pow(Box::new(base), Box::new(exp)),
    }
}

impl Expr {
    //___________________________________SIMPLIFICATION____________________________________

    /// One bottom-up simplification pass.
    ///
    /// ### Additive rules
    /// - constants are summed, `x - x = 0`, `3x + 2x = 5x`
    /// - `c * (a + b)` is distributed, sums inside products of a sum are expanded
    ///
    /// ### Multiplicative rules
    /// - constants are multiplied, `x * 1 = x`, `0 * x = 0`
    /// - `x^a * x^b = x^(a+b)`, `x^a / x^b = x^(a-b)`
    ///
    /// ### Power rules
    /// - `x^0 = 1`, `x^1 = x`, `1^x = 1`, `(x^a)^b = x^(a*b)` for integer b
    /// - `((-1)^n)^2 = 1`, `(-1)^(n+1) = -(-1)^n`
    ///
    /// ### Functions
    /// - any function of a constant is evaluated
    /// - `exp(ln x) = x`, `ln(exp x) = x`
    /// - `sin(-x) = -sin(x)`, `cos(-x) = cos(x)`
    pub fn simplify_(&self) -> Expr {
        match self {
            Expr::Var(_) | Expr::Const(_) => self.clone(),
            Expr::Add(_, _) | Expr::Sub(_, _) => {
                collect_sum(&self.map_children(|child| child.simplify_()))
            }
            Expr::Mul(_, _) | Expr::Div(_, _) => {
                collect_product(&self.map_children(|child| child.simplify_()))
            }
            Expr::Pow(base, exp) => simplify_power(base.simplify_(), exp.simplify_()),
            Expr::Exp(expr) => match expr.simplify_() {
                Expr::Const(c) => fold(c.exp()),
                Expr::Ln(inner) => *inner,
                other => Expr::Exp(Box::new(other)),
            },
            Expr::Ln(expr) => match expr.simplify_() {
                Expr::Const(c) if c > 0.0 => fold(c.ln()),
                Expr::Exp(inner) => *inner,
                other => Expr::Ln(Box::new(other)),
            },
            Expr::sin(expr) => {
                let arg = expr.simplify_();
                if let Expr::Const(c) = arg {
                    return fold(c.sin());
                }
                match negated_argument(&arg) {
                    Some(neg) => Expr::Mul(Box::new(Expr::Const(-1.0)), Box::new(Expr::sin(Box::new(neg)))),
                    None => Expr::sin(Box::new(arg)),
                }
            }
            Expr::cos(expr) => {
                let arg = expr.simplify_();
                if let Expr::Const(c) = arg {
                    return fold(c.cos());
                }
                Expr::cos(Box::new(negated_argument(&arg).unwrap_or(arg)))
            }
            Expr::tg(expr) => match expr.simplify_() {
                Expr::Const(c) => fold(c.tan()),
                other => Expr::tg(Box::new(other)),
            },
            Expr::ctg(expr) => match expr.simplify_() {
                Expr::Const(c) => fold(1.0 / c.tan()),
                other => Expr::ctg(Box::new(other)),
            },
            Expr::arcsin(expr) => match expr.simplify_() {
                Expr::Const(c) => fold(c.asin()),
                other => Expr::arcsin(Box::new(other)),
            },
            Expr::arccos(expr) => match expr.simplify_() {
                Expr::Const(c) => fold(c.acos()),
                other => Expr::arccos(Box::new(other)),
            },
            Expr::arctg(expr) => match expr.simplify_() {
                Expr::Const(c) => fold(c.atan()),
                other => Expr::arctg(Box::new(other)),
            },
            Expr::arcctg(expr) => match expr.simplify_() {
                Expr::Const(c) => fold(PI / 2.0 - c.atan()),
                other => Expr::arcctg(Box::new(other)),
            },
        }
    }

    /// Repeats `simplify_` until the expression stops changing.
    pub fn simplify(&self) -> Expr {
        let mut current = self.clone();
        for _ in 0..MAX_PASSES {
            let next = current.simplify_();
            if next == current {
                break;
            }
            current = next;
        }
        current
    }

    /// Applies the periodicity of sine and cosine for an integer-valued index.
    ///
    /// Arguments of the form `c*index*pi + phi` with integer `c` are reduced:
    /// `cos(c n pi + phi) = (-1)^(c n) cos(phi)`, `sin(c n pi + phi) = (-1)^(c n) sin(phi)`,
    /// where `(-1)^(c n)` is `1` for even `c` and `(-1)^n` for odd `c`. In particular
    /// `cos(2 n pi) = 1`, `sin(2 n pi) = 0`, `cos(n pi) = (-1)^n`, `sin(n pi) = 0`.
    /// Non-integer multiples are left untouched. Trigonometric functions whose argument
    /// contains nothing but numbers and `pi` are evaluated.
    pub fn apply_periodicity(&self, index: &str) -> Expr {
        match self {
            Expr::sin(arg) => reduce_harmonic(&arg.apply_periodicity(index), index, true),
            Expr::cos(arg) => reduce_harmonic(&arg.apply_periodicity(index), index, false),
            _ => self.map_children(|child| child.apply_periodicity(index)),
        }
    }

    /// `simplify`, then periodicity in `index`, then `simplify` again
    pub fn simplify_periodic(&self, index: &str) -> Expr {
        self.simplify().apply_periodicity(index).simplify()
    }
}

fn reduce_harmonic(arg: &Expr, index: &str, is_sin: bool) -> Expr {
    let rebuild = |a: Expr| if is_sin { Expr::sin(Box::new(a)) } else { Expr::cos(Box::new(a)) };
    let arg = arg.simplify();
    let terms = collect_terms(expand_terms(&arg));
    let mut multiple = 0i64;
    let mut has_index = false;
    let mut rest = Vec::new();
    for term in terms {
        match as_integer(term.coef, INTEGER_TOL) {
            Some(c) if term.has_exactly_variables(&[index, PI_SYMBOL]) => {
                multiple += c;
                has_index = true;
            }
            _ => rest.push(term),
        }
    }
    let phase = terms_to_expr(&rest);
    if phase.is_numeric() {
        if let Ok(value) = phase.eval_numeric() {
            let reduced = if is_sin { value.sin() } else { value.cos() };
            let reduced = fold(reduced);
            return if has_index && multiple % 2 != 0 {
                Expr::Mul(Box::new(reduced), Box::new(Expr::alternating_sign(index))).simplify()
            } else {
                reduced
            };
        }
    }
    if !has_index {
        return rebuild(arg);
    }
    let reduced = rebuild(phase);
    if multiple % 2 != 0 {
        Expr::Mul(Box::new(Expr::alternating_sign(index)), Box::new(reduced)).simplify()
    } else {
        reduced.simplify()
    }
}
