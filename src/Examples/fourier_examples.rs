use crate::fourier::task::FourierTask;

fn pieces(parts: &[(&str, &str, &str)]) -> Vec<(String, String, String)> {
    parts
        .iter()
        .map(|(f, a, b)| (f.to_string(), a.to_string(), b.to_string()))
        .collect()
}

/// Built-in tasks:
/// 0. square wave, 1 on (0, 1) and 0 on (1, 2)
/// 1. sawtooth `t` on (-pi, pi)
/// 2. triangle `|t|` on (-pi, pi)
/// 3. half-wave rectified sine, resonant at k = 1
/// 4. exponential pulse `exp(-t)` on (0, 1), period 2
/// 5. full-wave rectified sine, period pi
pub fn example_task(example: usize) -> Option<FourierTask> {
    let task = match example {
        0 => FourierTask::new("2", pieces(&[("1", "0", "1"), ("0", "1", "2")])),
        1 => FourierTask::new("2*pi", pieces(&[("t", "-pi", "pi")])),
        2 => FourierTask::new("2*pi", pieces(&[("-t", "-pi", "0"), ("t", "0", "pi")])),
        3 => FourierTask::new(
            "2*pi",
            pieces(&[("sin(t)", "0", "pi"), ("0", "pi", "2*pi")]),
        ),
        4 => FourierTask::new("2", pieces(&[("exp(-t)", "0", "1"), ("0", "1", "2")])),
        5 => FourierTask::new("pi", pieces(&[("sin(t)", "0", "pi")])),
        _ => return None,
    };
    Some(task)
}

/// Runs a built-in task with plots written to `output_dir`.
pub fn fourier_examples(example: usize, output_dir: &str) -> Result<(), String> {
    let mut task =
        example_task(example).ok_or_else(|| format!("there is no example {}", example))?;
    task.output_dir = output_dir.to_string();
    let report = task.solve()?;
    for file in &report.files {
        println!("saved {}", file);
    }
    Ok(())
}
