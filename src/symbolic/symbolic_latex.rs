//! LaTeX rendering of symbolic expressions.
//!
//! Brackets are only written where precedence needs them, `pi` becomes `\pi`,
//! quotients become `\frac{}{}` and `x^0.5` becomes `\sqrt{x}`.

use crate::symbolic::symbolic_engine::{Expr, PI_SYMBOL};

// binding strength of the top-level operation
fn precedence(expr: &Expr) -> u8 {
    match expr {
        Expr::Add(_, _) | Expr::Sub(_, _) => 1,
        Expr::Mul(_, _) | Expr::Div(_, _) => 2,
        Expr::Const(c) if *c < 0.0 => 2,
        Expr::Pow(_, _) => 3,
        _ => 4,
    }
}

fn format_number(val: f64) -> String {
    if val.is_finite() && val.fract() == 0.0 && val.abs() < 1e15 {
        format!("{}", val as i64)
    } else if val.is_nan() {
        "\\mathrm{NaN}".to_string()
    } else if val.is_infinite() {
        if val > 0.0 { "\\infty".to_string() } else { "-\\infty".to_string() }
    } else {
        let s = format!("{:.10}", val);
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

fn function(name: &str, arg: &Expr) -> String {
    format!("{}{{\\left({} \\right)}}", name, arg.to_latex())
}

impl Expr {
    fn latex_wrapped(&self, min_precedence: u8) -> String {
        if precedence(self) < min_precedence {
            format!("\\left({}\\right)", self.to_latex())
        } else {
            self.to_latex()
        }
    }

    /// LaTeX string of the expression
    pub fn to_latex(&self) -> String {
        match self {
            Expr::Var(name) if name == PI_SYMBOL => "\\pi".to_string(),
            Expr::Var(name) => name.clone(),
            Expr::Const(val) => format_number(*val),
            Expr::Add(lhs, rhs) => {
                let right = rhs.to_latex();
                match right.strip_prefix('-') {
                    Some(stripped) => format!("{} - {}", lhs.to_latex(), stripped),
                    None => format!("{} + {}", lhs.to_latex(), right),
                }
            }
            Expr::Sub(lhs, rhs) => format!("{} - {}", lhs.to_latex(), rhs.latex_wrapped(2)),
            Expr::Mul(lhs, rhs) => match lhs.as_ref() {
                Expr::Const(c) if *c == -1.0 => format!("-{}", rhs.latex_wrapped(2)),
                _ => {
                    let left = lhs.latex_wrapped(2);
                    let right = rhs.latex_wrapped(2);
                    let numeric_join = right.starts_with(|c: char| c.is_ascii_digit() || c == '-');
                    if numeric_join {
                        format!("{} \\cdot {}", left, right)
                    } else {
                        format!("{} {}", left, right)
                    }
                }
            },
            Expr::Div(lhs, rhs) => format!("\\frac{{{}}}{{{}}}", lhs.to_latex(), rhs.to_latex()),
            Expr::Pow(base, exp) => match exp.as_ref() {
                Expr::Const(e) if *e == 0.5 => format!("\\sqrt{{{}}}", base.to_latex()),
                _ => format!("{}^{{{}}}", base.latex_wrapped(4), exp.to_latex()),
            },
            Expr::Exp(arg) => format!("e^{{{}}}", arg.to_latex()),
            Expr::Ln(arg) => function("\\ln", arg),
            Expr::sin(arg) => function("\\sin", arg),
            Expr::cos(arg) => function("\\cos", arg),
            Expr::tg(arg) => function("\\tan", arg),
            Expr::ctg(arg) => function("\\cot", arg),
            Expr::arcsin(arg) => function("\\operatorname{asin}", arg),
            Expr::arccos(arg) => function("\\operatorname{acos}", arg),
            Expr::arctg(arg) => function("\\operatorname{atan}", arg),
            Expr::arcctg(arg) => function("\\operatorname{acot}", arg),
        }
    }
}
