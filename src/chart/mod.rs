//! Latency chart rendering
//!
//! A dataset is first turned into a [`ChartPlan`] (labels, colors, points
//! and axis ranges) and the plan is then drawn with plotters. The output
//! file extension picks the backend.

pub mod font;

use crate::config::ChartConfig;
use crate::models::Dataset;
use crate::{IolatError, Result};
use font::FONT_FAMILY;
use plotters::coord::Shift;
use plotters::drawing::DrawingAreaErrorKind;
use plotters::prelude::*;
use std::fmt;
use std::path::{Path, PathBuf};

pub const TITLE: &str = "Random IO Latency vs. IO Size";
pub const X_LABEL: &str = "IO Size (bytes)";
pub const Y_LABEL: &str = "Median IO Latency (microseconds)";

/// Line colors assigned by plotting order
pub const PALETTE: [RGBColor; 10] = [
    RGBColor(0x1f, 0x77, 0xb4),
    RGBColor(0xff, 0x7f, 0x0e),
    RGBColor(0x2c, 0xa0, 0x2c),
    RGBColor(0xd6, 0x27, 0x28),
    RGBColor(0x94, 0x67, 0xbd),
    RGBColor(0x8c, 0x56, 0x4b),
    RGBColor(0xe3, 0x77, 0xc2),
    RGBColor(0x7f, 0x7f, 0x7f),
    RGBColor(0xbc, 0xbd, 0x22),
    RGBColor(0x17, 0xbe, 0xcf),
];

const GRID_COLOR: RGBColor = RGBColor(0xb0, 0xb0, 0xb0);
const MARKER_SIZE: u32 = 4;
const AXIS_MARGIN: f64 = 0.05;

/// Image encoding of a rendered chart
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartFormat {
    Png,
    Svg,
}

impl ChartFormat {
    /// Pick the format from a file extension
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match ext.as_deref() {
            Some("png") => Ok(ChartFormat::Png),
            Some("svg") => Ok(ChartFormat::Svg),
            _ => Err(IolatError::RenderError(format!(
                "unsupported chart format for {} (use .png or .svg)",
                path.display()
            ))),
        }
    }
}

impl fmt::Display for ChartFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChartFormat::Png => write!(f, "PNG"),
            ChartFormat::Svg => write!(f, "SVG"),
        }
    }
}

/// One labeled line of the chart
#[derive(Debug, Clone, PartialEq)]
pub struct PlottedSeries {
    pub label: String,
    pub color: RGBColor,
    /// (I/O size in bytes, latency in microseconds)
    pub points: Vec<(u64, f64)>,
}

impl PlottedSeries {
    /// Latency plotted at the given I/O size
    pub fn y_at(&self, io_size: u64) -> Option<f64> {
        self.points
            .iter()
            .find(|(x, _)| *x == io_size)
            .map(|(_, y)| *y)
    }
}

/// Everything needed to draw the chart, independent of the backend
#[derive(Debug, Clone, PartialEq)]
pub struct ChartPlan {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub series: Vec<PlottedSeries>,
    pub x_range: (f64, f64),
    pub y_range: (f64, f64),
    pub width: u32,
    pub height: u32,
    pub grid: bool,
    pub font_path: Option<PathBuf>,
}

fn padded_range(min: f64, max: f64) -> (f64, f64) {
    let span = max - min;
    let pad = if span > 0.0 {
        span * AXIS_MARGIN
    } else {
        (min.abs() * AXIS_MARGIN).max(1.0)
    };
    (min - pad, max + pad)
}

impl ChartPlan {
    /// Lay out a dataset; points echo the input values unchanged
    pub fn from_dataset(data: &Dataset, config: &ChartConfig) -> Self {
        let series: Vec<PlottedSeries> = data
            .series()
            .iter()
            .enumerate()
            .map(|(i, s)| PlottedSeries {
                label: s.filesystem.clone(),
                color: PALETTE[i % PALETTE.len()],
                points: data
                    .io_sizes()
                    .iter()
                    .copied()
                    .zip(s.median_latency_us.iter().copied())
                    .collect(),
            })
            .collect();

        let xs = data.io_sizes().iter().map(|&x| x as f64);
        let x_min = xs.clone().fold(f64::INFINITY, f64::min);
        let x_max = xs.fold(f64::NEG_INFINITY, f64::max);

        let ys = series.iter().flat_map(|s| s.points.iter().map(|(_, y)| *y));
        let (y_min, y_max) = ys.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), y| {
            (lo.min(y), hi.max(y))
        });
        let y_range = if y_min.is_finite() {
            padded_range(y_min, y_max)
        } else {
            (0.0, 1.0)
        };

        Self {
            title: TITLE.to_string(),
            x_label: X_LABEL.to_string(),
            y_label: Y_LABEL.to_string(),
            series,
            x_range: padded_range(x_min, x_max),
            y_range,
            width: config.width,
            height: config.height,
            grid: true,
            font_path: config.font_path.clone(),
        }
    }

    /// Find a plotted series by its legend label
    pub fn series(&self, label: &str) -> Option<&PlottedSeries> {
        self.series.iter().find(|s| s.label == label)
    }
}

/// A chart written to disk
#[derive(Debug, Clone)]
pub struct RenderedChart {
    pub path: PathBuf,
    pub format: ChartFormat,
    pub bytes: u64,
}

fn render_err<E: std::error::Error + Send + Sync>(err: DrawingAreaErrorKind<E>) -> IolatError {
    IolatError::RenderError(err.to_string())
}

fn draw<DB: DrawingBackend>(root: &DrawingArea<DB, Shift>, plan: &ChartPlan) -> Result<()> {
    root.fill(&WHITE).map_err(render_err)?;

    let mut chart = ChartBuilder::on(root)
        .caption(&plan.title, (FONT_FAMILY, 20).into_font())
        .margin(15)
        .x_label_area_size(45)
        .y_label_area_size(70)
        .build_cartesian_2d(
            plan.x_range.0..plan.x_range.1,
            plan.y_range.0..plan.y_range.1,
        )
        .map_err(render_err)?;

    let grid_style = if plan.grid {
        GRID_COLOR.mix(0.8)
    } else {
        WHITE.mix(0.0)
    };

    chart
        .configure_mesh()
        .x_desc(plan.x_label.as_str())
        .y_desc(plan.y_label.as_str())
        .label_style((FONT_FAMILY, 12).into_font())
        .axis_desc_style((FONT_FAMILY, 14).into_font())
        .x_label_formatter(&|x| format!("{:.0}", x))
        .y_label_formatter(&|y| format!("{:.0}", y))
        .bold_line_style(grid_style)
        .light_line_style(WHITE.mix(0.0))
        .draw()
        .map_err(render_err)?;

    for series in &plan.series {
        let color = series.color;
        let points: Vec<(f64, f64)> = series
            .points
            .iter()
            .map(|&(x, y)| (x as f64, y))
            .collect();

        chart
            .draw_series(LineSeries::new(points.iter().copied(), color.stroke_width(2)))
            .map_err(render_err)?
            .label(series.label.as_str())
            .legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2))
            });

        chart
            .draw_series(
                points
                    .iter()
                    .map(|&p| Circle::new(p, MARKER_SIZE, color.filled())),
            )
            .map_err(render_err)?;
    }

    chart
        .configure_series_labels()
        .label_font((FONT_FAMILY, 13).into_font())
        .background_style(WHITE.mix(0.8).filled())
        .border_style(BLACK.mix(0.3))
        .position(SeriesLabelPosition::UpperLeft)
        .draw()
        .map_err(render_err)?;

    root.present().map_err(render_err)?;
    Ok(())
}

/// Draw `plan` to `path`, encoding by file extension
pub fn render(plan: &ChartPlan, path: &Path) -> Result<RenderedChart> {
    let format = ChartFormat::from_path(path)?;
    font::ensure_registered(plan.font_path.as_deref())?;

    let size = (plan.width, plan.height);
    match format {
        ChartFormat::Png => {
            let root = BitMapBackend::new(path, size).into_drawing_area();
            draw(&root, plan)?;
        }
        ChartFormat::Svg => {
            let root = SVGBackend::new(path, size).into_drawing_area();
            draw(&root, plan)?;
        }
    }

    let bytes = std::fs::metadata(path)
        .map_err(|e| {
            IolatError::RenderError(format!("chart {} was not written: {}", path.display(), e))
        })?
        .len();
    log::info!("wrote {} chart {} ({} bytes)", format, path.display(), bytes);

    Ok(RenderedChart {
        path: path.to_path_buf(),
        format,
        bytes,
    })
}

/// Render the reference dataset to the configured output
pub fn render_reference(config: &ChartConfig) -> Result<RenderedChart> {
    config.validate()?;
    let plan = ChartPlan::from_dataset(&Dataset::reference(), config);
    render(&plan, &config.output)
}
