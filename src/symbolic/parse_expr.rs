use crate::symbolic::symbolic_engine::Expr;
use crate::symbolic::utils::{
    brackets_balanced, find_char_positions_outside_brackets, find_pair_to_this_bracket,
};
use log::debug;
use regex::Regex;
/// a module turns a String expression into a symbolic expression
///# Example
/// ```
/// use RustedFourier::symbolic::symbolic_engine::Expr;
/// let parsed_expression = Expr::parse_expression("t**2 - sin(pi*t)").unwrap();
/// println!(" parsed_expression {}", parsed_expression);
/// let f = parsed_expression.lambdify_borrowed_thread_safe(&["pi", "t"]).unwrap();
/// println!("f(1) = {}", f(&[std::f64::consts::PI, 1.0]));
/// ```
//                  search recursion diagram
//                "t^2+exp(t)-log(t)/n"             |
//                |       left          | right     |
//                |_________________________________|
//                |  rightmost +/- outside brackets |
//                |_________________________________|
//                |   t^2+exp(t)        |log(t)/n   |
//                |       |             |    |      |
//                |______\|/____________|___\|/_____|
//                |  split by +         | split by /|
//                |_____________________|___________|
//                |   t^2   |  exp(t)   |log(t)| n  |
//                |___\|/___|___\|/_____|______|____|
//                |  split ^| function  |  etc...   |
//
// The rightmost operator of the lowest precedence is split first, so that
// chains of '-' and '/' are left associative. '^' is split at the leftmost
// position and is therefore right associative.

const FUNCTIONS: [&str; 19] = [
    "exp", "log", "ln", "sin", "cos", "tg", "tan", "ctg", "cot", "arcsin", "asin", "arccos",
    "acos", "arctg", "atan", "arctan", "arcctg", "acot", "sqrt",
];

/// Removes whitespace and rewrites python power `**` into `^`.
pub fn normalize_input(input: &str) -> Result<String, String> {
    let spaces = Regex::new(r"\s+").map_err(|e| e.to_string())?;
    let power = Regex::new(r"\*\*").map_err(|e| e.to_string())?;
    let no_spaces = spaces.replace_all(input, "");
    Ok(power.replace_all(&no_spaces, "^").into_owned())
}

pub fn parse_expression_func(input: &str) -> Result<Expr, String> {
    let normalized = normalize_input(input)?;
    if normalized.is_empty() {
        return Err("Empty expression".to_string());
    }
    if !brackets_balanced(&normalized) {
        return Err(format!("Unbalanced brackets in '{}'", input));
    }
    parse_normalized(&normalized)
}

// a '+' or '-' at `pos` is a binary operator unless it follows another operator,
// an opening bracket, or is the sign of a number exponent as in 1e-3
fn is_binary_sign(input: &str, pos: usize) -> bool {
    if pos == 0 {
        return false;
    }
    let before = &input[..pos];
    let prev = before.chars().last().unwrap_or('(');
    if matches!(prev, '+' | '-' | '*' | '/' | '^' | '(') {
        return false;
    }
    if prev == 'e' || prev == 'E' {
        let mantissa = &before[..before.len() - 1];
        let digits: String = mantissa
            .chars()
            .rev()
            .take_while(|c| c.is_ascii_digit() || *c == '.')
            .collect();
        let boundary = mantissa[..mantissa.len() - digits.len()]
            .chars()
            .last()
            .map(|c| !(c.is_alphanumeric() || c == '_'))
            .unwrap_or(true);
        if !digits.is_empty() && boundary {
            return false;
        }
    }
    true
}

// function to find the rightmost occurrence of operators at the same precedence level
fn find_rightmost_operator_outside_brackets(
    input: &str,
    operators: &[char],
) -> Option<(usize, char)> {
    let mut bracket_depth = 0;
    let mut last_op = None;
    for (i, c) in input.char_indices() {
        match c {
            '(' => bracket_depth += 1,
            ')' => bracket_depth -= 1,
            _ if bracket_depth == 0 && operators.contains(&c) => {
                if (c != '+' && c != '-') || is_binary_sign(input, i) {
                    last_op = Some((i, c));
                }
            }
            _ => {}
        }
    }
    last_op
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

fn apply_function(name: &str, arg: Expr) -> Result<Expr, String> {
    let res = match name {
        "exp" => Expr::Exp(arg.boxed()),
        "log" | "ln" => Expr::Ln(arg.boxed()),
        "sin" => Expr::sin(arg.boxed()),
        "cos" => Expr::cos(arg.boxed()),
        "tg" | "tan" => Expr::tg(arg.boxed()),
        "ctg" | "cot" => Expr::ctg(arg.boxed()),
        "arcsin" | "asin" => Expr::arcsin(arg.boxed()),
        "arccos" | "acos" => Expr::arccos(arg.boxed()),
        "arctg" | "atan" | "arctan" => Expr::arctg(arg.boxed()),
        "arcctg" | "acot" => Expr::arcctg(arg.boxed()),
        "sqrt" => Expr::Pow(arg.boxed(), Box::new(Expr::Const(0.5))),
        _ => return Err(format!("Unknown function '{}'", name)),
    };
    Ok(res)
}

fn parse_normalized(input: &str) -> Result<Expr, String> {
    debug!("parsing: {}", input);
    if input.is_empty() {
        return Err("Missing operand".to_string());
    }
    // addition and subtraction
    if let Some((pos, op)) = find_rightmost_operator_outside_brackets(input, &['+', '-']) {
        let left = parse_normalized(&input[..pos])?;
        let right = parse_normalized(&input[pos + 1..])?;
        debug!("SIGN '{}' found at position {}", op, pos);
        return Ok(match op {
            '+' => Expr::Add(left.boxed(), right.boxed()),
            _ => Expr::Sub(left.boxed(), right.boxed()),
        });
    }
    // multiplication and division
    if let Some((pos, op)) = find_rightmost_operator_outside_brackets(input, &['*', '/']) {
        let left = parse_normalized(&input[..pos])?;
        let right = parse_normalized(&input[pos + 1..])?;
        debug!("SIGN '{}' found at position {}", op, pos);
        return Ok(match op {
            '*' => Expr::Mul(left.boxed(), right.boxed()),
            _ => Expr::Div(left.boxed(), right.boxed()),
        });
    }
    // unary signs
    if let Some(rest) = input.strip_prefix('-') {
        return Ok(match parse_normalized(rest)? {
            Expr::Const(c) => Expr::Const(-c),
            other => Expr::Mul(Box::new(Expr::Const(-1.0)), other.boxed()),
        });
    }
    if let Some(rest) = input.strip_prefix('+') {
        return parse_normalized(rest);
    }
    // power
    if let Some(pos) = find_char_positions_outside_brackets(input, '^') {
        let base = parse_normalized(&input[..pos])?;
        let exponent = parse_normalized(&input[pos + 1..])?;
        debug!("SIGN '^' at position {}", pos);
        return Ok(Expr::Pow(base.boxed(), exponent.boxed()));
    }
    // functions and brackets
    if input.ends_with(')') {
        if let Some(open) = input.find('(') {
            let close = find_pair_to_this_bracket(input, open)?;
            if close == input.len() - 1 {
                let inner = parse_normalized(&input[open + 1..close])?;
                let name = &input[..open];
                if name.is_empty() {
                    return Ok(inner);
                }
                if FUNCTIONS.contains(&name) {
                    debug!("function '{}' found", name);
                    return apply_function(name, inner);
                }
                return Err(format!("Unknown function '{}' in '{}'", name, input));
            }
        }
    }
    // constants and variables
    if input.starts_with(|c: char| c.is_ascii_digit() || c == '.') {
        return input
            .parse::<f64>()
            .map(Expr::Const)
            .map_err(|_| format!("Invalid number '{}'", input));
    }
    if is_identifier(input) {
        debug!("found variable: {}", input);
        return Ok(Expr::Var(input.to_string()));
    }
    Err(format!("Invalid expression format: '{}'", input))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn var(name: &str) -> Box<Expr> {
        Box::new(Expr::Var(name.to_string()))
    }

    #[test]
    fn test_parse_exponential() {
        let expr = parse_expression_func("exp(t)").unwrap();
        assert_eq!(expr, Expr::Exp(var("t")));
    }

    #[test]
    fn test_parse_constant() {
        assert_eq!(parse_expression_func("42").unwrap(), Expr::Const(42.0));
        assert_eq!(parse_expression_func("1e-3").unwrap(), Expr::Const(1e-3));
        assert_eq!(parse_expression_func("-2.5").unwrap(), Expr::Const(-2.5));
    }

    #[test]
    fn test_parse_subtraction_is_left_associative() {
        let expr = parse_expression_func("t^2 - t - 1").unwrap();
        let t = Expr::Var("t".to_string());
        let expected = t.clone().pow(Expr::Const(2.0)) - t - Expr::Const(1.0);
        assert_eq!(expr, expected);
    }

    #[test]
    fn test_parse_division_is_left_associative() {
        let expr = parse_expression_func("t/2/n").unwrap();
        assert_eq!(
            expr,
            Expr::Div(
                Box::new(Expr::Div(var("t"), Box::new(Expr::Const(2.0)))),
                var("n")
            )
        );
    }

    #[test]
    fn test_parse_python_power() {
        let expr = parse_expression_func("t ** 2").unwrap();
        assert_eq!(expr, Expr::Pow(var("t"), Box::new(Expr::Const(2.0))));
    }

    #[test]
    fn test_parse_power_is_right_associative() {
        let expr = parse_expression_func("2^t^2").unwrap();
        assert_eq!(
            expr,
            Expr::Pow(
                Box::new(Expr::Const(2.0)),
                Box::new(Expr::Pow(var("t"), Box::new(Expr::Const(2.0))))
            )
        );
    }

    #[test]
    fn test_parse_unary_minus() {
        let expr = parse_expression_func("-t^2").unwrap();
        assert_eq!(
            expr,
            Expr::Mul(
                Box::new(Expr::Const(-1.0)),
                Box::new(Expr::Pow(var("t"), Box::new(Expr::Const(2.0))))
            )
        );
        let expr = parse_expression_func("2*-t").unwrap();
        assert_eq!(
            expr,
            Expr::Mul(
                Box::new(Expr::Const(2.0)),
                Box::new(Expr::Mul(Box::new(Expr::Const(-1.0)), var("t")))
            )
        );
    }

    #[test]
    fn test_parse_expression_with_brackets() {
        let expr = parse_expression_func("(t + n) * pi").unwrap();
        assert_eq!(
            expr,
            Expr::Mul(Box::new(Expr::Add(var("t"), var("n"))), var("pi"))
        );
    }

    #[test]
    fn test_parse_complex_expression() {
        let expr = parse_expression_func("(x + y) * (z - 2) / exp(w)").unwrap();
        let x_plus_y = Box::new(Expr::Add(var("x"), var("y")));
        let z_minus_2 = Box::new(Expr::Sub(var("z"), Box::new(Expr::Const(2.0))));
        let e = Box::new(Expr::Exp(var("w")));
        let expected = Expr::Div(Box::new(Expr::Mul(x_plus_y, z_minus_2)), e);
        assert_eq!(expr, expected);
    }

    #[test]
    fn test_parse_trig_aliases() {
        assert_eq!(parse_expression_func("tan(t)").unwrap(), Expr::tg(var("t")));
        assert_eq!(parse_expression_func("cot(t)").unwrap(), Expr::ctg(var("t")));
        assert_eq!(parse_expression_func("atan(t)").unwrap(), Expr::arctg(var("t")));
        assert_eq!(parse_expression_func("log(t)").unwrap(), Expr::Ln(var("t")));
    }

    #[test]
    fn test_parse_sqrt() {
        assert_eq!(
            parse_expression_func("sqrt(t)").unwrap(),
            Expr::Pow(var("t"), Box::new(Expr::Const(0.5)))
        );
    }

    #[test]
    fn test_parse_nested_trig() {
        let expr = parse_expression_func("sin(cos(t))").unwrap();
        assert_eq!(expr, Expr::sin(Box::new(Expr::cos(var("t")))));
    }

    #[test]
    fn test_parse_sum_of_functions() {
        let expr = parse_expression_func("sin(t)*exp(-t)+cos(t)").unwrap();
        assert_eq!(
            expr,
            Expr::Add(
                Box::new(Expr::Mul(
                    Box::new(Expr::sin(var("t"))),
                    Box::new(Expr::Exp(Box::new(Expr::Mul(
                        Box::new(Expr::Const(-1.0)),
                        var("t")
                    ))))
                )),
                Box::new(Expr::cos(var("t")))
            )
        );
    }

    #[test]
    fn test_invalid_expressions() {
        assert!(parse_expression_func("(t +").is_err());
        assert!(parse_expression_func("(t + y").is_err());
        assert!(parse_expression_func("").is_err());
        assert!(parse_expression_func("t +* 2").is_err());
        assert!(parse_expression_func("foo(t)").is_err());
        assert!(parse_expression_func("2t").is_err());
    }
}
