use crate::symbolic::symbolic_engine::{Expr, PI_SYMBOL};
use std::f64::consts::PI;

/// Compiled expression tree: variables are resolved to argument positions once,
/// evaluation is a plain recursive walk without name lookups.
#[derive(Clone, Debug)]
pub enum Lambda {
    Var(usize),
    Const(f64),
    Add(Box<Lambda>, Box<Lambda>),
    Sub(Box<Lambda>, Box<Lambda>),
    Mul(Box<Lambda>, Box<Lambda>),
    Div(Box<Lambda>, Box<Lambda>),
    Pow(Box<Lambda>, Box<Lambda>),
    Exp(Box<Lambda>),
    Ln(Box<Lambda>),
    Sin(Box<Lambda>),
    Cos(Box<Lambda>),
    Tg(Box<Lambda>),
    Ctg(Box<Lambda>),
    ArcSin(Box<Lambda>),
    ArcCos(Box<Lambda>),
    ArcTg(Box<Lambda>),
    ArcCtg(Box<Lambda>),
}

impl Expr {
    /// Resolves the expression against an ordered list of argument names.
    ///
    /// # Errors
    /// Returns Err naming the first variable that is not among `vars`
    pub fn compile(&self, vars: &[&str]) -> Result<Lambda, String> {
        let unary = |e: &Expr| -> Result<Box<Lambda>, String> { Ok(Box::new(e.compile(vars)?)) };
        let lambda = match self {
            Expr::Var(name) => {
                let idx = vars
                    .iter()
                    .position(|&v| v == name)
                    .ok_or_else(|| format!("variable '{}' is not among arguments {:?}", name, vars))?;
                Lambda::Var(idx)
            }
            Expr::Const(v) => Lambda::Const(*v),
            Expr::Add(a, b) => Lambda::Add(unary(a)?, unary(b)?),
            Expr::Sub(a, b) => Lambda::Sub(unary(a)?, unary(b)?),
            Expr::Mul(a, b) => Lambda::Mul(unary(a)?, unary(b)?),
            Expr::Div(a, b) => Lambda::Div(unary(a)?, unary(b)?),
            Expr::Pow(a, b) => Lambda::Pow(unary(a)?, unary(b)?),
            Expr::Exp(e) => Lambda::Exp(unary(e)?),
            Expr::Ln(e) => Lambda::Ln(unary(e)?),
            Expr::sin(e) => Lambda::Sin(unary(e)?),
            Expr::cos(e) => Lambda::Cos(unary(e)?),
            Expr::tg(e) => Lambda::Tg(unary(e)?),
            Expr::ctg(e) => Lambda::Ctg(unary(e)?),
            Expr::arcsin(e) => Lambda::ArcSin(unary(e)?),
            Expr::arccos(e) => Lambda::ArcCos(unary(e)?),
            Expr::arctg(e) => Lambda::ArcTg(unary(e)?),
            Expr::arcctg(e) => Lambda::ArcCtg(unary(e)?),
        };
        Ok(lambda)
    }
}

impl Lambda {
    #[inline(always)]
    pub fn eval(&self, args: &[f64]) -> f64 {
        match self {
            Lambda::Var(i) => args[*i],
            Lambda::Const(v) => *v,
            Lambda::Add(a, b) => a.eval(args) + b.eval(args),
            Lambda::Sub(a, b) => a.eval(args) - b.eval(args),
            Lambda::Mul(a, b) => a.eval(args) * b.eval(args),
            Lambda::Div(a, b) => a.eval(args) / b.eval(args),
            Lambda::Pow(a, b) => a.eval(args).powf(b.eval(args)),
            Lambda::Exp(e) => e.eval(args).exp(),
            Lambda::Ln(e) => e.eval(args).ln(),
            Lambda::Sin(e) => e.eval(args).sin(),
            Lambda::Cos(e) => e.eval(args).cos(),
            Lambda::Tg(e) => e.eval(args).tan(),
            Lambda::Ctg(e) => 1.0 / e.eval(args).tan(),
            Lambda::ArcSin(e) => e.eval(args).asin(),
            Lambda::ArcCos(e) => e.eval(args).acos(),
            Lambda::ArcTg(e) => e.eval(args).atan(),
            Lambda::ArcCtg(e) => (PI / 2.0) - e.eval(args).atan(),
        }
    }

    pub fn as_closure(self) -> impl Fn(&[f64]) -> f64 + Send + Sync {
        move |args| self.eval(args)
    }
}

impl Expr {
    /// LAMBDIFICATION - Converting Symbolic Expressions to Executable Functions

    /// Converts the expression into a thread-safe closure of the given arguments.
    ///
    /// # Examples
    /// ```rust, ignore
    /// let f = Expr::parse_expression("n*t").unwrap();
    /// let func = f.lambdify_borrowed_thread_safe(&["n", "t"]).unwrap();
    /// assert_eq!(func(&[2.0, 3.0]), 6.0);
    /// ```
    pub fn lambdify_borrowed_thread_safe(
        &self,
        vars: &[&str],
    ) -> Result<Box<dyn Fn(&[f64]) -> f64 + Send + Sync>, String> {
        let compiled = self.compile(vars)?;
        Ok(Box::new(compiled.as_closure()))
    }

    /// Same as `lambdify_borrowed_thread_safe`, with the symbol `pi` bound to its value.
    pub fn lambdify_with_pi(
        &self,
        vars: &[&str],
    ) -> Result<Box<dyn Fn(&[f64]) -> f64 + Send + Sync>, String> {
        self.set_variable(PI_SYMBOL, PI)
            .lambdify_borrowed_thread_safe(vars)
    }

    /// Converts an expression of at most one variable (besides `pi`) into a closure.
    ///
    /// # Errors
    /// Returns Err if more than one free variable is found
    pub fn lambdify1D(&self) -> Result<Box<dyn Fn(f64) -> f64 + Send + Sync>, String> {
        let bound = self.set_variable(PI_SYMBOL, PI);
        let vars = bound.all_arguments_are_variables();
        match vars.as_slice() {
            [] => {
                let compiled = bound.compile(&[])?;
                Ok(Box::new(move |_| compiled.eval(&[])))
            }
            [var_name] => {
                let compiled = bound.compile(&[var_name.as_str()])?;
                Ok(Box::new(move |x| compiled.eval(&[x])))
            }
            _ => Err(format!(
                "lambdify1D can only be used with expressions containing one variable, found: {:?}",
                vars
            )),
        }
    }
}
