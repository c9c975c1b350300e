// Copyright (c)  by Gleb E. Zaslavkiy
//MIT License
#![allow(non_snake_case)]
use RustedFourier::Examples::fourier_examples::fourier_examples;
use RustedFourier::fourier::task::{FourierTask, task_summary};
use std::env;
use std::io::{self, BufRead, Write};

const USAGE: &str = "usage: RustedFourier [<task-file> | --example <k>]";

fn prompt<I: Iterator<Item = io::Result<String>>>(lines: &mut I, text: &str) -> Result<String, String> {
    print!("{}", text);
    io::stdout().flush().map_err(|e| e.to_string())?;
    match lines.next() {
        Some(line) => Ok(line.map_err(|e| e.to_string())?.trim().to_string()),
        None => Err("unexpected end of input".to_string()),
    }
}

// the piecewise function typed in line by line
fn interactive_task() -> Result<FourierTask, String> {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    let period = prompt(&mut lines, "Period T = ")?;
    let amount = prompt(&mut lines, "Amount of piecewise functions: ")?;
    let amount = amount
        .parse::<usize>()
        .map_err(|_| format!("amount of functions must be a positive integer, got '{}'", amount))?;
    let mut pieces = Vec::with_capacity(amount);
    for i in 1..=amount {
        let f = prompt(&mut lines, &format!("f{}(t) = ", i))?;
        let a = prompt(&mut lines, &format!("a{} = ", i))?;
        let b = prompt(&mut lines, &format!("b{} = ", i))?;
        pieces.push((f, a, b));
    }
    Ok(FourierTask::new(&period, pieces))
}

fn run() -> Result<(), String> {
    let args: Vec<String> = env::args().skip(1).collect();
    let task = match args.as_slice() {
        [] => interactive_task()?,
        [flag, k] if flag == "--example" => {
            let example = k
                .parse::<usize>()
                .map_err(|_| format!("example number expected, got '{}'\n{}", k, USAGE))?;
            return fourier_examples(example, ".");
        }
        [path] if !path.starts_with("--") => FourierTask::from_file(path)?,
        _ => return Err(USAGE.to_string()),
    };
    println!("{}", task_summary(&task));
    let report = task.solve()?;
    for file in &report.files {
        println!("saved {}", file);
    }
    Ok(())
}

fn main() {
    if let Err(e) = run() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
