//! PNG plots of a series and of its spectra, drawn either with plotters or with gnuplot.
use gnuplot::{AxesCommon, Caption, Color as GColor, Figure, PointSymbol};
use log::info;
use nalgebra::DVector;
use plotters::prelude::*;
use std::error::Error;
use std::path::Path;
use strum_macros::{Display, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, EnumString, Display)]
#[strum(serialize_all = "lowercase")]
pub enum PlotBackend {
    #[default]
    Plotters,
    Gnuplot,
}

/// continuous line or vertical stems with markers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlotStyle {
    Line,
    Stem,
}

#[derive(Debug, Clone)]
pub struct PlotSpec {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    /// black, red or blue
    pub color: String,
    pub style: PlotStyle,
}

impl PlotSpec {
    pub fn new(title: &str, x_label: &str, y_label: &str, color: &str, style: PlotStyle) -> Self {
        PlotSpec {
            title: title.to_string(),
            x_label: x_label.to_string(),
            y_label: y_label.to_string(),
            color: color.to_string(),
            style,
        }
    }

    /// file name derived from the title: `Fourier Serie k = 10` -> `Fourier_Serie_k_10.png`
    pub fn file_name(&self) -> String {
        let stem: String = self
            .title
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
            .collect::<Vec<&str>>()
            .join("_");
        format!("{}.png", stem)
    }
}

fn rgb(color: &str) -> RGBColor {
    match color {
        "black" => BLACK,
        "red" => RED,
        "green" => GREEN,
        _ => BLUE,
    }
}

// [min, max] with a margin, never empty
fn padded_range(values: &[f64], include_zero: bool) -> (f64, f64) {
    let finite = values.iter().copied().filter(|v| v.is_finite());
    let (mut lo, mut hi) = finite.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if !lo.is_finite() || !hi.is_finite() {
        return (-1.0, 1.0);
    }
    if include_zero {
        lo = lo.min(0.0);
        hi = hi.max(0.0);
    }
    let span = hi - lo;
    let margin = if span > 0.0 { 0.05 * span } else { 1.0 };
    (lo - margin, hi + margin)
}

/// Draws `y(x)` into `path` with plotters.
pub fn plot_plotters(
    spec: &PlotSpec,
    x: &DVector<f64>,
    y: &DVector<f64>,
    path: &Path,
) -> Result<(), Box<dyn Error>> {
    let color = rgb(&spec.color);
    let (x_min, x_max) = padded_range(x.as_slice(), false);
    let (y_min, y_max) = padded_range(y.as_slice(), spec.style == PlotStyle::Stem);

    let root_area = BitMapBackend::new(path, (800, 600)).into_drawing_area();
    root_area.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(&root_area)
        .caption(&spec.title, ("sans-serif", 30))
        .margin(10)
        .x_label_area_size(30)
        .y_label_area_size(50)
        .build_cartesian_2d(x_min..x_max, y_min..y_max)?;
    chart
        .configure_mesh()
        .x_desc(&spec.x_label)
        .y_desc(&spec.y_label)
        .draw()?;

    // axis lines
    chart.draw_series(LineSeries::new(vec![(x_min, 0.0), (x_max, 0.0)], &BLACK))?;
    if x_min < 0.0 && x_max > 0.0 {
        chart.draw_series(LineSeries::new(vec![(0.0, y_min), (0.0, y_max)], &BLACK))?;
    }

    let series: Vec<(f64, f64)> = x.iter().zip(y.iter()).map(|(&x, &y)| (x, y)).collect();
    match spec.style {
        PlotStyle::Line => {
            chart
                .draw_series(LineSeries::new(series, &color))?
                .label(&spec.y_label)
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
        }
        PlotStyle::Stem => {
            chart.draw_series(
                series
                    .iter()
                    .map(|&(x, y)| PathElement::new(vec![(x, 0.0), (x, y)], color)),
            )?;
            chart
                .draw_series(
                    series
                        .iter()
                        .map(|&(x, y)| Circle::new((x, y), 3, marker_style(color))),
                )?
                .label(&spec.y_label)
                .legend(move |(x, y)| Circle::new((x + 10, y), 3, marker_style(color)));
        }
    }
    chart
        .configure_series_labels()
        .background_style(legend_background())
        .border_style(&BLACK)
        .draw()?;
    root_area.present()?;
    Ok(())
}

// filled circle on top of a stem
fn marker_style(color: RGBColor) -> ShapeStyle {
    color.filled()
}

fn legend_background() -> RGBAColor {
    WHITE.mix(0.8)
}

/// Draws `y(x)` into `path` with gnuplot.
pub fn plot_gnuplot(
    spec: &PlotSpec,
    x: &DVector<f64>,
    y: &DVector<f64>,
    path: &Path,
) -> Result<(), Box<dyn Error>> {
    let (x_min, x_max) = padded_range(x.as_slice(), false);
    let mut fg = Figure::new();
    let axes = fg.axes2d();
    axes.set_title(&spec.title, &[])
        .set_x_label(&spec.x_label, &[])
        .set_y_label(&spec.y_label, &[])
        .set_x_grid(true)
        .set_y_grid(true)
        .lines([x_min, x_max], [0.0, 0.0], &[GColor("black".into())]);
    match spec.style {
        PlotStyle::Line => {
            axes.lines(
                x.as_slice(),
                y.as_slice(),
                &[Caption(spec.y_label.as_str()), GColor(spec.color.as_str().into())],
            );
        }
        PlotStyle::Stem => {
            for (&xi, &yi) in x.iter().zip(y.iter()) {
                axes.lines([xi, xi], [0.0, yi], &[GColor(spec.color.as_str().into())]);
            }
            axes.points(
                x.as_slice(),
                y.as_slice(),
                &[
                    Caption(spec.y_label.as_str()),
                    PointSymbol('O'),
                    GColor(spec.color.as_str().into()),
                ],
            );
        }
    }
    fg.save_to_png(&path.display().to_string(), 800, 600)?;
    Ok(())
}

/// Draws one figure into `output_dir` with the chosen backend, returns the file path.
pub fn plot(
    backend: PlotBackend,
    spec: &PlotSpec,
    x: &DVector<f64>,
    y: &DVector<f64>,
    output_dir: &Path,
) -> Result<String, Box<dyn Error>> {
    if x.len() != y.len() {
        return Err(format!("{} x values but {} y values", x.len(), y.len()).into());
    }
    let path = output_dir.join(spec.file_name());
    match backend {
        PlotBackend::Plotters => plot_plotters(spec, x, y, &path)?,
        PlotBackend::Gnuplot => plot_gnuplot(spec, x, y, &path)?,
    }
    let name = path.display().to_string();
    info!("{} saved to {}", spec.title, name);
    Ok(name)
}
