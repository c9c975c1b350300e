#[cfg(test)]
mod solver_tests {
    use crate::fourier::piecewise::PiecewiseFunction;
    use crate::fourier::solver::{FourierSolution, FourierSolver};
    use crate::symbolic::symbolic_engine::Expr;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    fn solve(period: &str, parts: &[(&str, &str, &str)]) -> FourierSolution {
        let f = PiecewiseFunction::from_strings(period, parts).unwrap();
        FourierSolver::new().solve_sin_cos(&f).unwrap()
    }

    #[test]
    fn test_square_wave() {
        let solution = solve("2", &[("1", "0", "1"), ("0", "1", "2")]);
        assert_relative_eq!(solution.a0_value().unwrap(), 0.5, epsilon = 1e-12);
        for k in 1..7 {
            let (ak, bk) = solution.harmonic_values(k).unwrap();
            let expected = (1.0 - (-1.0f64).powi(k as i32)) / (k as f64 * PI);
            assert_relative_eq!(ak, 0.0, epsilon = 1e-12);
            assert_relative_eq!(bk, expected, epsilon = 1e-12);
        }
        assert_eq!(solution.period, 2.0);
    }

    #[test]
    fn test_sawtooth() {
        // t on (-pi, pi): bn = 2 (-1)^(n+1) / n
        let solution = solve("2*pi", &[("t", "-pi", "pi")]);
        assert_relative_eq!(solution.a0_value().unwrap(), 0.0, epsilon = 1e-12);
        for k in 1..7 {
            let (ak, bk) = solution.harmonic_values(k).unwrap();
            let expected = 2.0 * (-1.0f64).powi(k as i32 + 1) / k as f64;
            assert_relative_eq!(ak, 0.0, epsilon = 1e-12);
            assert_relative_eq!(bk, expected, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_parabola() {
        // t^2 on (-pi, pi): a0 = pi^2/3, an = 4 (-1)^n / n^2
        let solution = solve("2*pi", &[("t^2", "-pi", "pi")]);
        assert_relative_eq!(solution.a0_value().unwrap(), PI * PI / 3.0, epsilon = 1e-12);
        for k in 1..6 {
            let (ak, bk) = solution.harmonic_values(k).unwrap();
            let expected = 4.0 * (-1.0f64).powi(k as i32) / (k * k) as f64;
            assert_relative_eq!(ak, expected, epsilon = 1e-10);
            assert_relative_eq!(bk, 0.0, epsilon = 1e-10);
        }
        // the closed form is free of t
        assert!(!solution.an.contains_variable("t"));
        assert!(solution.an.contains_variable("n"));
    }

    #[test]
    fn test_triangle_from_two_pieces() {
        // |t| on (-pi, pi): a0 = pi/2, an = 2 ((-1)^n - 1) / (pi n^2)
        let solution = solve("2*pi", &[("-t", "-pi", "0"), ("t", "0", "pi")]);
        assert_relative_eq!(solution.a0_value().unwrap(), PI / 2.0, epsilon = 1e-12);
        for k in 1..6 {
            let (ak, bk) = solution.harmonic_values(k).unwrap();
            let expected = 2.0 * ((-1.0f64).powi(k as i32) - 1.0) / (PI * (k * k) as f64);
            assert_relative_eq!(ak, expected, epsilon = 1e-10);
            assert_relative_eq!(bk, 0.0, epsilon = 1e-10);
        }
    }

    #[test]
    fn test_half_wave_resonant_harmonic() {
        // sin(t) on (0, pi), 0 on (pi, 2 pi): b1 = 1/2, an = -(1 + (-1)^n) / (pi (n^2 - 1))
        let solution = solve("2*pi", &[("sin(t)", "0", "pi"), ("0", "pi", "2*pi")]);
        assert_eq!(solution.resonant.keys().copied().collect::<Vec<_>>(), vec![1]);
        let (a1, b1) = solution.harmonic_values(1).unwrap();
        assert_relative_eq!(a1, 0.0, epsilon = 1e-12);
        assert_relative_eq!(b1, 0.5, epsilon = 1e-12);
        for k in 2..6 {
            let (ak, bk) = solution.harmonic_values(k).unwrap();
            let sign = (-1.0f64).powi(k as i32);
            let expected = -(1.0 + sign) / (PI * (k * k - 1) as f64);
            assert_relative_eq!(ak, expected, epsilon = 1e-10);
            assert_relative_eq!(bk, 0.0, epsilon = 1e-10);
        }
        // 1/pi, with no trigonometric function of pi left
        assert_relative_eq!(solution.a0_value().unwrap(), 1.0 / PI, epsilon = 1e-12);
        let a0 = format!("{}", solution.a0);
        assert!(!a0.contains("cos") && !a0.contains("sin"), "{}", a0);
        assert!(solution.f_t.to_latex().contains("\\neq 1"));
    }

    #[test]
    fn test_resonance_in_product_piece() {
        // t sin(t) on (-pi, pi): a0 = 1, a1 = -1/2, an = 2 (-1)^(n+1) / (n^2 - 1)
        let solution = solve("2*pi", &[("t*sin(t)", "-pi", "pi")]);
        assert_eq!(solution.a0, Expr::Const(1.0));
        assert!(solution.resonant.contains_key(&1));
        let (a1, b1) = solution.harmonic_values(1).unwrap();
        assert_relative_eq!(a1, -0.5, epsilon = 1e-12);
        assert_relative_eq!(b1, 0.0, epsilon = 1e-12);
        for k in 2..6 {
            let (ak, bk) = solution.harmonic_values(k).unwrap();
            let expected = 2.0 * (-1.0f64).powi(k as i32 + 1) / (k * k - 1) as f64;
            assert_relative_eq!(ak, expected, epsilon = 1e-10);
            assert_relative_eq!(bk, 0.0, epsilon = 1e-10);
        }
    }

    #[test]
    fn test_pure_harmonic_input() {
        // cos(2t) over one period is its own second harmonic
        let solution = solve("2*pi", &[("cos(2*t)", "0", "2*pi")]);
        assert_eq!(solution.a0, Expr::Const(0.0));
        for k in 1..5 {
            let (ak, bk) = solution.harmonic_values(k).unwrap();
            assert_relative_eq!(ak, if k == 2 { 1.0 } else { 0.0 }, epsilon = 1e-12);
            assert_relative_eq!(bk, 0.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_series_carries_coefficients() {
        let solution = solve("2", &[("1", "0", "1"), ("0", "1", "2")]);
        assert_eq!(solution.f_t.a0, solution.a0);
        assert_eq!(solution.f_t.bn, solution.bn);
        let text = format!("{}", solution.f_t);
        assert!(text.contains("Sum("));
    }

    #[test]
    fn test_size_mismatch() {
        let err = FourierSolver::new()
            .solve(
                Expr::Const(2.0),
                vec![Expr::Const(1.0)],
                vec![
                    (Expr::Const(0.0), Expr::Const(1.0)),
                    (Expr::Const(1.0), Expr::Const(2.0)),
                ],
            )
            .unwrap_err();
        assert_eq!(err, "Functions and limits size doesn't match.");
    }

    #[test]
    fn test_non_integrable_piece_is_an_error() {
        let f = PiecewiseFunction::from_strings("2", &[("exp(t^2)", "0", "2")]).unwrap();
        assert!(FourierSolver::new().solve_sin_cos(&f).is_err());
    }
}

#[cfg(test)]
mod task_tests {
    use crate::Utils::plots::PlotBackend;
    use crate::fourier::task::{
        FourierTask, SolveMode, latex_report, level_filter, spectrum_table, task_summary,
    };
    use approx::assert_relative_eq;
    use log::LevelFilter;
    use nalgebra::DVector;
    use std::f64::consts::PI;
    use std::path::Path;
    use tempfile::tempdir;

    const SQUARE_WAVE: &str = r#"
    // square wave of period 2
    series
      period: 2
      harmonics: 5
      real_harmonics: 2000
      mode: symbolic
    pieces
      f1: 1
      limits1: 0, 1
      f2: 0
      limits2: 1, 2
    plot
      start: 0
      end: 1
      step: 0.25
      backend: gnuplot
      enabled: false
    logging
      loglevel: off
    "#;

    #[test]
    fn test_from_document() {
        let task = FourierTask::from_document(SQUARE_WAVE).unwrap();
        assert_eq!(task.period, "2");
        assert_eq!(task.pieces.len(), 2);
        assert_eq!(
            task.pieces[1],
            ("0".to_string(), "1".to_string(), "2".to_string())
        );
        assert_eq!(task.harmonics, 5);
        assert_eq!(task.real_harmonics, 2000);
        assert_eq!(task.mode, SolveMode::Symbolic);
        assert_eq!(task.backend, PlotBackend::Gnuplot);
        assert_eq!(task.step, Some(0.25));
        assert!(!task.plot);
        assert!(!task.csv);
        assert_eq!(task.loglevel.as_deref(), Some("off"));
    }

    #[test]
    fn test_symbolic_limits_in_document() {
        let input = "series\n period: 2*pi\npieces\n f1: t\n limits1: -pi, pi\nplot\n start: -pi\n";
        let task = FourierTask::from_document(input).unwrap();
        assert_eq!(task.harmonics, 10);
        assert_relative_eq!(task.start.unwrap(), -PI);
        let f = task.function().unwrap();
        assert_relative_eq!(f.period, 2.0 * PI);
    }

    #[test]
    fn test_document_errors() {
        assert!(FourierTask::from_document("pieces\n f1: 1\n limits1: 0, 1\n").is_err());
        let mismatch = "series\n period: 2\npieces\n f1: 1\n f2: 0\n limits1: 0, 1\n";
        assert_eq!(
            FourierTask::from_document(mismatch).unwrap_err(),
            "Functions and limits size doesn't match."
        );
        let bad_mode = "series\n period: 2\n mode: exact\npieces\n f1: 1\n limits1: 0, 2\n";
        assert!(FourierTask::from_document(bad_mode).is_err());
        let bad_limits = "series\n period: 2\npieces\n f1: 1\n limits1: 0\n";
        assert!(FourierTask::from_document(bad_limits).is_err());
    }

    #[test]
    fn test_run_square_wave() {
        let task = FourierTask::from_document(SQUARE_WAVE).unwrap();
        let report = task.solve().unwrap();
        assert!(report.solution.is_some());
        assert!(report.files.is_empty());
        assert_eq!(report.t.len(), 4);
        // t = 1/3 lies inside the "1" piece
        assert_relative_eq!(report.y_real[1], 1.0, epsilon = 1e-2);
        let approx = &report.approximation;
        assert_eq!(approx.harmonics(), 5);
        assert_relative_eq!(approx.wk[0], PI, epsilon = 1e-12);
        assert_relative_eq!(approx.amplitude[0], 2.0 / PI, epsilon = 1e-12);
        assert_relative_eq!(approx.amplitude[1], 0.0, epsilon = 1e-12);
        assert_eq!(approx.phase[0], -90.0);
        assert_eq!(approx.phase[1], 0.0);
    }

    #[test]
    fn test_numeric_mode_with_csv_export() {
        let dir = tempdir().unwrap();
        let mut task = FourierTask::from_document(SQUARE_WAVE).unwrap();
        task.mode = SolveMode::Numeric;
        task.real_harmonics = 200;
        task.csv = true;
        task.output_dir = dir.path().display().to_string();
        let report = task.solver().unwrap();
        assert!(report.solution.is_none());
        assert_eq!(report.files.len(), 2);
        for file in &report.files {
            assert!(Path::new(file).exists());
        }
        let series = std::fs::read_to_string(&report.files[0]).unwrap();
        assert!(series.starts_with("t,y_real,y_approx"));
        assert_eq!(series.lines().count(), 5);
        assert_relative_eq!(report.approximation.amplitude[2], 2.0 / (3.0 * PI), epsilon = 1e-10);
    }

    #[test]
    fn test_level_filter() {
        assert_eq!(level_filter(None).unwrap(), LevelFilter::Info);
        assert_eq!(level_filter(Some("debug")).unwrap(), LevelFilter::Debug);
        assert_eq!(level_filter(Some("warn")).unwrap(), LevelFilter::Warn);
        assert!(level_filter(Some("verbose")).is_err());
    }

    #[test]
    fn test_console_output() {
        let task = FourierTask::from_document(SQUARE_WAVE).unwrap();
        let f = task.function().unwrap();
        let (solution, _) = task.coefficients(&f).unwrap();
        let latex = latex_report(&solution.unwrap());
        let lines: Vec<&str> = latex.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "a_0 = 0.5");
        assert!(lines[2].starts_with("b_n = "));
        assert!(lines[3].starts_with("f(t) = 0.5 + \\sum"));

        let table = spectrum_table("Amplitude Spectrum", &DVector::from_vec(vec![2.0 / PI, -0.0]));
        assert!(table.contains("Amplitude Spectrum"));
        assert!(table.contains("0.63661977"));
        assert!(!table.contains("-0"));
        // rows are numbered from 0
        assert!(table.contains("│ 0 │ 0.63661977"));
        assert!(table.contains("│ 1 │ 0 "));
        assert!(!table.contains("│ 2 │"));

        let half_wave = FourierTask::new(
            "2*pi",
            vec![
                ("sin(t)".to_string(), "0".to_string(), "pi".to_string()),
                ("0".to_string(), "pi".to_string(), "2*pi".to_string()),
            ],
        );
        let f = half_wave.function().unwrap();
        let (solution, _) = half_wave.coefficients(&f).unwrap();
        let latex = latex_report(&solution.unwrap());
        let lines: Vec<&str> = latex.lines().collect();
        assert_eq!(lines.len(), 6);
        assert!(lines[3].starts_with("a_1 = "));
        assert_eq!(lines[4], "b_1 = 0.5");

        let summary = task_summary(&task);
        assert!(summary.contains("symbolic"));
        assert!(summary.contains("gnuplot"));
    }
}
