//! Runs a task file, `demos/sawtooth.txt` by default:
//! `cargo run --example task_file -- path/to/task.txt`
use RustedFourier::fourier::task::{FourierTask, task_summary};
use std::env;

fn main() -> Result<(), String> {
    let path = env::args()
        .nth(1)
        .unwrap_or_else(|| "demos/sawtooth.txt".to_string());
    let task = FourierTask::from_file(&path)?;
    println!("{}", task_summary(&task));
    let report = task.solve()?;
    if let Some(solution) = &report.solution {
        println!("a0 = {}", solution.a0);
    }
    for file in &report.files {
        println!("saved {}", file);
    }
    Ok(())
}
