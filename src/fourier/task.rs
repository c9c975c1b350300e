//! # Task files
//!
//! A task describes the whole run: the piecewise function, the number of harmonics,
//! the time window of the plots and what to export. Example:
//! ```text
//! // square wave
//! series
//!   period: 2
//!   harmonics: 10
//!   mode: symbolic
//! pieces
//!   f1: 1
//!   limits1: 0, 1
//!   f2: 0
//!   limits2: 1, 2
//! plot
//!   backend: gnuplot
//!   output_dir: results
//! export
//!   csv: true
//! logging
//!   loglevel: info
//!   log_to_file: false
//! ```
//! Only `series: period` and the `pieces` section are required. Expressions are
//! written without spaces since a space ends a value.
use crate::Utils::logger::{save_matrix_to_csv, save_spectrum_to_csv};
use crate::Utils::plots::{PlotBackend, PlotSpec, PlotStyle, plot};
use crate::Utils::task_parser::{StringDocumentMap, parse_document_as_strings};
use crate::fourier::coefficients::{
    DEFAULT_QUAD_DEGREE, HarmonicCoefficients, LambdifiedCoefficients, NumericCoefficients,
};
use crate::fourier::piecewise::PiecewiseFunction;
use crate::fourier::plotter::{FourierSeriesPlotter, REAL_HARMONICS, SeriesApproximation};
use crate::fourier::solver::{FourierSolution, FourierSolver};
use crate::symbolic::symbolic_engine::Expr;
use chrono::Local;
use log::{LevelFilter, info};
use nalgebra::{DMatrix, DVector};
use simplelog::{
    ColorChoice, CombinedLogger, Config, SharedLogger, TermLogger, TerminalMode, WriteLogger,
};
use std::collections::{BTreeMap, HashMap};
use std::fs::{self, File};
use std::path::Path;
use std::str::FromStr;
use std::time::Instant;
use strum_macros::{Display, EnumString};
use tabled::{builder::Builder, settings::Style};

/// harmonics of the visual approximation in console runs
pub const PROGRAM_HARMONICS: usize = 10;

/// How the coefficients are obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, EnumString, Display)]
#[strum(serialize_all = "lowercase")]
pub enum SolveMode {
    /// closed forms `an`, `bn`, with quadrature where they are singular
    #[default]
    Symbolic,
    /// quadrature only
    Numeric,
}

#[derive(Debug, Clone)]
pub struct FourierTask {
    pub period: String,
    /// `(f_i(t), a_i, b_i)`
    pub pieces: Vec<(String, String, String)>,
    pub harmonics: usize,
    pub real_harmonics: usize,
    pub mode: SolveMode,
    pub start: Option<f64>,
    pub end: Option<f64>,
    pub step: Option<f64>,
    pub backend: PlotBackend,
    pub plot: bool,
    pub output_dir: String,
    pub csv: bool,
    pub loglevel: Option<String>,
    pub log_to_file: bool,
}

/// Everything a run produces.
#[derive(Debug, Clone)]
pub struct FourierReport {
    /// closed forms, `None` in numeric mode
    pub solution: Option<FourierSolution>,
    pub t: DVector<f64>,
    /// series truncated at `real_harmonics`
    pub y_real: DVector<f64>,
    pub approximation: SeriesApproximation,
    /// written plots and tables
    pub files: Vec<String>,
}

fn first_value(doc: &StringDocumentMap, section: &str, key: &str) -> Option<String> {
    doc.get(section)
        .and_then(|s| s.get(key))
        .and_then(|v| v.as_ref())
        .and_then(|v| v.first().cloned())
}

// numbers may be expressions of pi: `-2*pi`
fn numeric_value(text: &str) -> Result<f64, String> {
    Expr::parse_expression(text)?.eval_numeric()
}

fn parse_flag(text: &str) -> Result<bool, String> {
    bool::from_str(text).map_err(|_| format!("expected true or false, got '{}'", text))
}

fn parse_count(text: &str, key: &str) -> Result<usize, String> {
    usize::from_str(text).map_err(|_| format!("{} must be a positive integer, got '{}'", key, text))
}

// `f3` -> 3, `limits3` -> 3
fn piece_index(key: &str, prefix: &str) -> Option<usize> {
    key.strip_prefix(prefix).and_then(|rest| rest.parse::<usize>().ok())
}

impl FourierTask {
    pub fn new(period: &str, pieces: Vec<(String, String, String)>) -> FourierTask {
        FourierTask {
            period: period.to_string(),
            pieces,
            harmonics: PROGRAM_HARMONICS,
            real_harmonics: REAL_HARMONICS,
            mode: SolveMode::Symbolic,
            start: None,
            end: None,
            step: None,
            backend: PlotBackend::Plotters,
            plot: true,
            output_dir: ".".to_string(),
            csv: false,
            loglevel: Some("info".to_string()),
            log_to_file: false,
        }
    }

    /// Reads a task document, see the module docs for the layout.
    pub fn from_document(input: &str) -> Result<FourierTask, String> {
        let doc = parse_document_as_strings(input)?;
        let period = first_value(&doc, "series", "period")
            .ok_or_else(|| "series: period is missing".to_string())?;

        let section = doc
            .get("pieces")
            .ok_or_else(|| "section 'pieces' is missing".to_string())?;
        let mut functions: BTreeMap<usize, String> = BTreeMap::new();
        let mut limits: BTreeMap<usize, (String, String)> = BTreeMap::new();
        for (key, values) in section {
            let values = values.clone().unwrap_or_default();
            if let Some(i) = piece_index(key, "limits") {
                match values.as_slice() {
                    [a, b] => {
                        limits.insert(i, (a.clone(), b.clone()));
                    }
                    _ => return Err(format!("{} must have exactly two values", key)),
                }
            } else if let Some(i) = piece_index(key, "f") {
                match values.as_slice() {
                    [f] => {
                        functions.insert(i, f.clone());
                    }
                    _ => return Err(format!("{} must have exactly one value", key)),
                }
            } else {
                return Err(format!("unknown key '{}' in section 'pieces'", key));
            }
        }
        if functions.len() != limits.len() {
            return Err("Functions and limits size doesn't match.".to_string());
        }
        let mut pieces = Vec::with_capacity(functions.len());
        for (i, f) in functions {
            let (a, b) = limits
                .get(&i)
                .ok_or_else(|| format!("f{} has no limits{}", i, i))?;
            pieces.push((f, a.clone(), b.clone()));
        }

        let mut task = FourierTask::new(&period, pieces);
        if let Some(m) = first_value(&doc, "series", "harmonics") {
            task.harmonics = parse_count(&m, "harmonics")?;
        }
        if let Some(n) = first_value(&doc, "series", "real_harmonics") {
            task.real_harmonics = parse_count(&n, "real_harmonics")?;
        }
        if let Some(mode) = first_value(&doc, "series", "mode") {
            task.mode = SolveMode::from_str(&mode).map_err(|_| {
                format!("mode must be symbolic or numeric, got '{}'", mode)
            })?;
        }
        task.start = first_value(&doc, "plot", "start")
            .map(|s| numeric_value(&s))
            .transpose()?;
        task.end = first_value(&doc, "plot", "end")
            .map(|s| numeric_value(&s))
            .transpose()?;
        task.step = first_value(&doc, "plot", "step")
            .map(|s| numeric_value(&s))
            .transpose()?;
        if let Some(backend) = first_value(&doc, "plot", "backend") {
            task.backend = PlotBackend::from_str(&backend).map_err(|_| {
                format!("backend must be plotters or gnuplot, got '{}'", backend)
            })?;
        }
        if let Some(enabled) = first_value(&doc, "plot", "enabled") {
            task.plot = parse_flag(&enabled)?;
        }
        if let Some(dir) = first_value(&doc, "plot", "output_dir") {
            task.output_dir = dir;
        }
        if let Some(csv) = first_value(&doc, "export", "csv") {
            task.csv = parse_flag(&csv)?;
        }
        if let Some(level) = first_value(&doc, "logging", "loglevel") {
            task.loglevel = Some(level);
        }
        if let Some(to_file) = first_value(&doc, "logging", "log_to_file") {
            task.log_to_file = parse_flag(&to_file)?;
        }
        Ok(task)
    }

    pub fn from_file(path: &str) -> Result<FourierTask, String> {
        let contents =
            fs::read_to_string(path).map_err(|e| format!("cannot read {}: {}", path, e))?;
        FourierTask::from_document(&contents)
    }

    pub fn function(&self) -> Result<PiecewiseFunction, String> {
        let parts: Vec<(&str, &str, &str)> = self
            .pieces
            .iter()
            .map(|(f, a, b)| (f.as_str(), a.as_str(), b.as_str()))
            .collect();
        PiecewiseFunction::from_strings(&self.period, &parts)
    }

    /// closed forms (symbolic mode) and the numeric source of `ak`, `bk`
    pub fn coefficients(
        &self,
        f: &PiecewiseFunction,
    ) -> Result<(Option<FourierSolution>, Box<dyn HarmonicCoefficients>), String> {
        match self.mode {
            SolveMode::Symbolic => {
                let solution = FourierSolver::new().solve_sin_cos(f)?;
                let coefficients = LambdifiedCoefficients::with_fallback(&solution, f)?;
                Ok((Some(solution), Box::new(coefficients)))
            }
            SolveMode::Numeric => {
                let coefficients = NumericCoefficients::new(f, DEFAULT_QUAD_DEGREE)?;
                Ok((None, Box::new(coefficients)))
            }
        }
    }

    /// The run itself, without logger setup.
    pub fn solver(&self) -> Result<FourierReport, String> {
        let start = Instant::now();
        let f = self.function()?;
        let (solution, coefficients) = self.coefficients(&f)?;
        if let Some(solution) = &solution {
            println!("{}", latex_report(solution));
        }

        let plotter = FourierSeriesPlotter::new(f.period, self.start, self.end, self.step)?
            .with_real_harmonics(self.real_harmonics);
        let (t, y_real) = plotter.sin_cos_serie(coefficients.as_ref());
        let approximation = plotter.sin_cos_serie_aprox(coefficients.as_ref(), self.harmonics);
        println!(
            "{}",
            spectrum_table("Amplitude Spectrum", &approximation.amplitude)
        );
        println!("{}", spectrum_table("Phase Spectrum", &approximation.phase));

        let mut files = Vec::new();
        if self.plot || self.csv {
            fs::create_dir_all(&self.output_dir)
                .map_err(|e| format!("cannot create {}: {}", self.output_dir, e))?;
        }
        if self.plot {
            files.extend(self.plot_all(&t, &y_real, &approximation)?);
        }
        if self.csv {
            files.extend(self.export_csv(&t, &y_real, &approximation)?);
        }
        info!("task finished in {} ms", start.elapsed().as_millis());
        Ok(FourierReport {
            solution,
            t,
            y_real,
            approximation,
            files,
        })
    }

    fn plot_all(
        &self,
        t: &DVector<f64>,
        y_real: &DVector<f64>,
        approximation: &SeriesApproximation,
    ) -> Result<Vec<String>, String> {
        let m = approximation.harmonics();
        let figures = [
            (
                PlotSpec::new("Function f(t)", "t", "f(t)", "black", PlotStyle::Line),
                t,
                y_real,
            ),
            (
                PlotSpec::new(&format!("Fourier Serie k = {}", m), "t", "f(t)", "red", PlotStyle::Line),
                t,
                &approximation.y,
            ),
            (
                PlotSpec::new(
                    &format!("Amplitude Spectrum k = {}", m),
                    "w",
                    "amplitude",
                    "blue",
                    PlotStyle::Stem,
                ),
                &approximation.wk,
                &approximation.amplitude,
            ),
            (
                PlotSpec::new(
                    &format!("Phase Spectrum k = {}", m),
                    "w",
                    "phase, deg",
                    "blue",
                    PlotStyle::Stem,
                ),
                &approximation.wk,
                &approximation.phase,
            ),
        ];
        let dir = Path::new(&self.output_dir);
        figures
            .iter()
            .map(|(spec, x, y)| plot(self.backend, spec, x, y, dir).map_err(|e| e.to_string()))
            .collect()
    }

    fn export_csv(
        &self,
        t: &DVector<f64>,
        y_real: &DVector<f64>,
        approximation: &SeriesApproximation,
    ) -> Result<Vec<String>, String> {
        let dir = Path::new(&self.output_dir);
        let series_file = dir.join("series.csv").display().to_string();
        let spectrum_file = dir.join("spectrum.csv").display().to_string();
        let matrix = DMatrix::from_columns(&[y_real.clone(), approximation.y.clone()]);
        let headers = vec!["y_real".to_string(), "y_approx".to_string()];
        save_matrix_to_csv(&matrix, &headers, &series_file, t, "t")
            .map_err(|e| format!("cannot write {}: {}", series_file, e))?;
        save_spectrum_to_csv(
            &approximation.wk,
            &approximation.amplitude,
            &approximation.phase,
            &spectrum_file,
        )
        .map_err(|e| format!("cannot write {}: {}", spectrum_file, e))?;
        info!("series and spectrum saved to {}", self.output_dir);
        Ok(vec![series_file, spectrum_file])
    }

    // wrapper around solver function to implement logging
    pub fn solve(&self) -> Result<FourierReport, String> {
        let is_logging_disabled = self
            .loglevel
            .as_ref()
            .map(|level| level == "off" || level == "none")
            .unwrap_or(false);
        if is_logging_disabled {
            return self.solver();
        }
        let log_option = level_filter(self.loglevel.as_deref())?;
        println!(" \n \n Program started with loglevel: {}", log_option);
        let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
            log_option,
            Config::default(),
            TerminalMode::Mixed,
            ColorChoice::Auto,
        )];
        if self.log_to_file {
            let date_and_time = Local::now().format("%Y-%m-%d_%H-%M-%S");
            let name = format!("log_{}.txt", date_and_time);
            let file = File::create(&name).map_err(|e| format!("cannot create {}: {}", name, e))?;
            loggers.push(WriteLogger::new(log_option, Config::default(), file));
        }
        // a logger set up by an earlier run stays in place
        if CombinedLogger::init(loggers).is_ok() {
            let res = self.solver();
            info!(" \n \n Program ended");
            res
        } else {
            self.solver()
        }
    }
}

/// `debug|info|warn|error`, no level means info
pub fn level_filter(level: Option<&str>) -> Result<LevelFilter, String> {
    match level {
        None => Ok(LevelFilter::Info),
        Some("debug") => Ok(LevelFilter::Debug),
        Some("info") => Ok(LevelFilter::Info),
        Some("warn") => Ok(LevelFilter::Warn),
        Some("error") => Ok(LevelFilter::Error),
        Some(other) => Err(format!(
            "loglevel must be debug, info, warn, error or off, got '{}'",
            other
        )),
    }
}

/// `a_0 = ...`, `a_n = ...`, `b_n = ...`, `a_k = ...`, `b_k = ...` for every resonant `k`,
/// then `f(t) = ...`, in LaTeX, one per line
pub fn latex_report(solution: &FourierSolution) -> String {
    let mut lines = vec![
        format!("a_0 = {}", solution.a0.to_latex()),
        format!("a_n = {}", solution.an.to_latex()),
        format!("b_n = {}", solution.bn.to_latex()),
    ];
    for (k, (ak, bk)) in &solution.resonant {
        lines.push(format!("a_{} = {}", k, ak.to_latex()));
        lines.push(format!("b_{} = {}", k, bk.to_latex()));
    }
    lines.push(format!("f(t) = {}", solution.f_t.to_latex()));
    lines.join("\n")
}

fn round8(x: f64) -> f64 {
    let r = (x * 1e8).round() / 1e8;
    // no "-0"
    if r == 0.0 { 0.0 } else { r }
}

/// `i  value` table with zero-based rows (row `i` is harmonic `i + 1`), values rounded to 8 digits
pub fn spectrum_table(title: &str, values: &DVector<f64>) -> String {
    let mut builder = Builder::default();
    builder.push_record(["i".to_string(), title.to_string()]);
    for (i, v) in values.iter().enumerate() {
        builder.push_record([i.to_string(), round8(*v).to_string()]);
    }
    let mut table = builder.build();
    table.with(Style::modern_rounded());
    table.to_string()
}

/// key/value summary of a task for the console
pub fn task_summary(task: &FourierTask) -> String {
    let mut summary: HashMap<String, String> = HashMap::new();
    summary.insert("period".to_string(), task.period.clone());
    summary.insert("pieces".to_string(), task.pieces.len().to_string());
    summary.insert("harmonics".to_string(), task.harmonics.to_string());
    summary.insert("real harmonics".to_string(), task.real_harmonics.to_string());
    summary.insert("mode".to_string(), task.mode.to_string());
    summary.insert("backend".to_string(), task.backend.to_string());
    let mut table = Builder::from(summary).build();
    table.with(Style::modern_rounded());
    table.to_string()
}
