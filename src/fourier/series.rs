use crate::fourier::{INDEX, TIME};
use crate::symbolic::symbolic_engine::Expr;
use std::collections::BTreeMap;
use std::fmt;

/// The unevaluated sum `a0 + Σ_{n=1}^{∞} [an cos(n w0 t) + bn sin(n w0 t)]`.
///
/// Harmonics listed in `resonant` use their own `(ak, bk)` and are excluded from the sum.
#[derive(Clone, Debug, PartialEq)]
pub struct FourierSeries {
    pub a0: Expr,
    pub an: Expr,
    pub bn: Expr,
    pub omega0: Expr,
    pub index: String,
    pub var: String,
    pub resonant: BTreeMap<usize, (Expr, Expr)>,
}

impl FourierSeries {
    pub fn new(a0: Expr, an: Expr, bn: Expr, omega0: Expr) -> FourierSeries {
        FourierSeries {
            a0,
            an,
            bn,
            omega0,
            index: INDEX.to_string(),
            var: TIME.to_string(),
            resonant: BTreeMap::new(),
        }
    }

    pub fn with_resonant(mut self, resonant: BTreeMap<usize, (Expr, Expr)>) -> FourierSeries {
        self.resonant = resonant;
        self
    }

    fn harmonic_argument(&self) -> Expr {
        Expr::Var(self.index.clone()) * self.omega0.clone() * Expr::Var(self.var.clone())
    }

    fn cos_sin(&self, a: &Expr, b: &Expr, arg: Expr) -> Expr {
        (a.clone() * arg.clone().cos_of() + b.clone() * arg.sin_of()).simplify()
    }

    /// `an cos(n w0 t) + bn sin(n w0 t)`, zero parts dropped
    pub fn general_term(&self) -> Expr {
        self.cos_sin(&self.an, &self.bn, self.harmonic_argument())
    }

    /// `ak cos(k w0 t) + bk sin(k w0 t)` for every resonant `k`
    fn resonant_terms(&self) -> Vec<(usize, Expr)> {
        let arg = self.harmonic_argument();
        self.resonant
            .iter()
            .map(|(k, (ak, bk))| (*k, self.cos_sin(ak, bk, arg.set_variable(&self.index, *k as f64))))
            .collect()
    }

    /// `a0 + Σ_{k=1}^{m}` of the general term with `n = k`
    pub fn partial_sum(&self, m: usize) -> Expr {
        let term = self.general_term();
        let resonant: BTreeMap<usize, Expr> = self.resonant_terms().into_iter().collect();
        let mut sum = self.a0.clone();
        for k in 1..=m {
            sum += match resonant.get(&k) {
                Some(exact) => exact.clone(),
                None => term.set_variable(&self.index, k as f64),
            };
        }
        sum.simplify()
    }

    // ", n \neq 1, n \neq 2" for the sum bounds
    fn exclusions(&self, separator: &str, neq: &str) -> String {
        self.resonant
            .keys()
            .map(|k| format!("{}{} {} {}", separator, self.index, neq, k))
            .collect()
    }

    /// LaTeX of the whole series
    pub fn to_latex(&self) -> String {
        let term = self.general_term();
        let mut parts: Vec<String> = Vec::new();
        if !self.a0.is_zero() {
            parts.push(self.a0.to_latex());
        }
        for (_, exact) in self.resonant_terms() {
            if !exact.is_zero() {
                parts.push(format!("\\left({}\\right)", exact.to_latex()));
            }
        }
        if !term.is_zero() {
            parts.push(format!(
                "\\sum_{{{}=1{}}}^{{\\infty}} \\left({}\\right)",
                self.index,
                self.exclusions(", ", "\\neq"),
                term.to_latex()
            ));
        }
        if parts.is_empty() {
            "0".to_string()
        } else {
            parts.join(" + ")
        }
    }
}

impl fmt::Display for FourierSeries {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.a0)?;
        for (_, exact) in self.resonant_terms() {
            write!(f, " + {}", exact)?;
        }
        write!(
            f,
            " + Sum({}, ({}, 1, oo){})",
            self.general_term(),
            self.index,
            self.exclusions(", ", "!=")
        )
    }
}
