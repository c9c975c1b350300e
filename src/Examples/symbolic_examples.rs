use crate::symbolic::symbolic_engine::Expr;
use crate::symbolic::symbolic_integration::QuadMethod;

/// Tour of the symbolic layer used by the Fourier solver.
pub fn sym_examples(example: usize) -> Result<(), String> {
    match example {
        0 => {
            // parse expression from string to symbolic expression
            let input = "t^2*exp(-t)";
            let parsed_expression = Expr::parse_expression(input)?;
            println!("parsed expression {}", parsed_expression);
            println!("all arguments are variables {:?}", parsed_expression.all_arguments_are_variables());
            // differentiate and simplify
            let df_dt = parsed_expression.diff("t").simplify();
            println!("df/dt = {}", df_dt);
            println!("LaTeX: {}", df_dt.to_latex());
            // turn symbolic expression into a Rust closure
            let f = parsed_expression.lambdify1D()?;
            println!("f(1) = {}", f(1.0));
        }
        1 => {
            // antiderivatives of the products met in Fourier coefficients
            for input in ["t*sin(n*t)", "exp(2*t)*cos(3*t)", "cos(t)*cos(n*t)", "t*ln(t)"] {
                let f = Expr::parse_expression(input)?;
                let integral = f.integrate("t")?;
                println!("∫ {} dt = {}", input, integral.to_latex());
            }
        }
        2 => {
            // definite integral in closed form, pi kept as a symbol
            let f = Expr::parse_expression("t*cos(n*t)")?;
            let lower = Expr::parse_expression("-pi")?;
            let upper = Expr::pi();
            let result = f.definite_integrate_symbolic("t", &lower, &upper)?;
            println!("raw: {}", result);
            println!("with integer n: {}", result.simplify_periodic("n").to_latex());
        }
        3 => {
            // quadrature of an expression without closed form
            let f = Expr::parse_expression("exp(-t^2)")?;
            let simpson = f.numerical_integrate(0.0, 1.0, 100)?;
            let gauss = f.quad(QuadMethod::GaussLegendre, 20, 0.0, 1.0, None)?;
            println!("Simpson {} Gauss-Legendre {}", simpson, gauss);
        }
        _ => return Err(format!("there is no symbolic example {}", example)),
    }
    Ok(())
}
