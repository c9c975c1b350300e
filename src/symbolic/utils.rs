// the collection of utility functions mainly for bracket parsing and proceeding

/// true if every bracket has a matching pair
pub fn brackets_balanced(s: &str) -> bool {
    let mut stack = Vec::new();
    for c in s.chars() {
        match c {
            '(' | '{' | '[' => stack.push(c),
            ')' => {
                if stack.pop() != Some('(') {
                    return false;
                }
            }
            '}' => {
                if stack.pop() != Some('{') {
                    return false;
                }
            }
            ']' => {
                if stack.pop() != Some('[') {
                    return false;
                }
            }
            _ => {}
        }
    }
    stack.is_empty()
}

// find position of the first given char that is outside brackets
pub fn find_char_positions_outside_brackets(s: &str, c: char) -> Option<usize> {
    let mut depth = 0i32;
    for (i, ch) in s.char_indices() {
        match ch {
            '(' => depth += 1,
            ')' => depth -= 1,
            _ if ch == c && depth == 0 => return Some(i),
            _ => {}
        }
    }
    None
}

// code finds the position of the bracket closing the one opened at `bracket_start`
pub fn find_pair_to_this_bracket(input: &str, bracket_start: usize) -> Result<usize, String> {
    let mut stack = 0;
    for (i, c) in input.char_indices().skip_while(|(i, _)| *i < bracket_start) {
        if c == '(' {
            stack += 1;
        } else if c == ')' {
            stack -= 1;
            if stack == 0 {
                return Ok(i);
            }
        }
    }
    Err(format!("no closing bracket in '{}'", input))
}

pub fn linspace(start: f64, end: f64, num_values: usize) -> Vec<f64> {
    if num_values == 1 {
        return vec![start];
    }
    let step = (end - start) / (num_values as f64 - 1.0);
    (0..num_values).map(|i| start + (i as f64 * step)).collect()
}

/// rounds `x` to the nearest integer when it is closer than `tol`
pub fn snap_to_integer(x: f64, tol: f64) -> f64 {
    let r = x.round();
    if (x - r).abs() < tol { r } else { x }
}

/// integer value of `x` if it is one within `tol`
pub fn as_integer(x: f64, tol: f64) -> Option<i64> {
    let r = x.round();
    if x.is_finite() && (x - r).abs() < tol {
        Some(r as i64)
    } else {
        None
    }
}
