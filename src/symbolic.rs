#![allow(non_camel_case_types)]
#![allow(non_snake_case)]
/// a module turns a String expression into a symbolic expression
///
///# Example
/// ```
/// use RustedFourier::symbolic::symbolic_engine::Expr;
/// let input = "t^2*cos(2*pi*t)";
/// let parsed_expression = Expr::parse_expression(input).unwrap();
/// println!(" parsed_expression {}", parsed_expression);
/// let parsed_function = parsed_expression.lambdify1D().unwrap();
/// assert!((parsed_function(1.0) - 1.0).abs() < 1e-12);
///  ```
/// ________________________________________________________________________________________________________________________________
pub mod parse_expr;
///____________________________________________________________________________________________________________________________
/// # Symbolic engine
/// a module
/// 1) turns a String expression into a symbolic expression
/// 2) turns a symbolic expression into a Rust function
/// 3) substitutes variables and expressions, differentiates, prints
///# Example#
/// ```
/// use RustedFourier::symbolic::symbolic_engine::Expr;
/// let expr = Expr::parse_expression("n*t + pi").unwrap();
/// // return vec of all arguments
/// let all = expr.all_arguments_are_variables();
/// assert_eq!(all, vec!["n", "pi", "t"]);
/// // substitute t = 1 and differentiate by n
/// let d = expr.set_variable("t", 1.0).diff("n").simplify();
/// assert_eq!(d, Expr::Const(1.0));
/// ```
/// ________________________________________________________________________________________________________________________________________________
pub mod symbolic_engine;
pub mod symbolic_engine_derivatives;
/// symbolic integration of Fourier-type integrands and numerical quadrature
///# Example
/// ```
/// use RustedFourier::symbolic::symbolic_engine::Expr;
/// let f = Expr::parse_expression("t*sin(n*t)").unwrap();
/// let pi = Expr::pi();
/// let minus_pi = Expr::parse_expression("-pi").unwrap();
/// let bn = f
///     .definite_integrate_symbolic("t", &minus_pi, &pi)
///     .unwrap()
///     .simplify_periodic("n");
/// // 2*pi*(-1)^(n+1)/n
/// let b1 = bn.eval_expression(&["n", "pi"], &[1.0, std::f64::consts::PI]).unwrap();
/// assert!((b1 - 2.0 * std::f64::consts::PI).abs() < 1e-10);
/// ```
pub mod symbolic_integration;
/// compilation of symbolic expressions into closures
pub mod symbolic_lambdify;
/// LaTeX printing
pub mod symbolic_latex;
/// algebraic simplification and periodicity rules for an integer harmonic index
pub mod symbolic_simplify;
///______________________________________________________________________________________________________________________________________________
/// the collection of utility functions mainly for bracket parsing and proceeding
/// _____________________________________________________________________________________________________________________________________________
pub mod utils;
