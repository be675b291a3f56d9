//! Date-indexed line charts rendered to SVG.

use chrono::{Duration, NaiveDate};
use plotters::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

pub const CHART_SIZE: (u32, u32) = (1000, 500);

#[derive(Debug, Error)]
pub enum PlotError {
    #[error("nothing to plot")]
    EmptySeries,

    #[error("cannot create {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("chart rendering failed: {0}")]
    Render(String),
}

fn render(e: impl std::fmt::Display) -> PlotError {
    PlotError::Render(e.to_string())
}

/// One titled series over dates.
#[derive(Debug, Clone)]
pub struct LineChart<'a> {
    pub title: String,
    pub x_label: &'a str,
    pub y_label: &'a str,
    pub series_label: &'a str,
    pub color: RGBColor,
    pub points: Vec<(NaiveDate, f64)>,
}

/// Value range padded so a flat series still gets a visible band.
fn y_range(points: &[(NaiveDate, f64)]) -> (f64, f64) {
    let (lo, hi) = points
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &(_, v)| {
            (lo.min(v), hi.max(v))
        });
    let pad = if hi > lo {
        (hi - lo) * 0.05
    } else {
        lo.abs().max(1.0) * 0.05
    };
    (lo - pad, hi + pad)
}

/// Render `chart` to an SVG file at `path`, creating parent directories.
pub fn line_chart(path: &Path, chart: &LineChart<'_>) -> Result<(), PlotError> {
    let points: Vec<(NaiveDate, f64)> = chart
        .points
        .iter()
        .copied()
        .filter(|(_, v)| v.is_finite())
        .collect();
    let (first, last) = match (points.first(), points.last()) {
        (Some(a), Some(b)) => (a.0, b.0),
        _ => return Err(PlotError::EmptySeries),
    };
    let x_end = if last > first {
        last
    } else {
        first + Duration::days(1)
    };
    let (y_lo, y_hi) = y_range(&points);

    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).map_err(|source| PlotError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
    }

    let root = SVGBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(render)?;

    let mut ctx = ChartBuilder::on(&root)
        .caption(&chart.title, ("sans-serif", 24))
        .margin(15)
        .x_label_area_size(45)
        .y_label_area_size(80)
        .build_cartesian_2d(first..x_end, y_lo..y_hi)
        .map_err(render)?;

    ctx.configure_mesh()
        .x_desc(chart.x_label)
        .y_desc(chart.y_label)
        .x_labels(8)
        .x_label_formatter(&|d: &NaiveDate| d.format("%Y-%m-%d").to_string())
        .draw()
        .map_err(render)?;

    let color = chart.color;
    ctx.draw_series(LineSeries::new(points, color.stroke_width(1)))
        .map_err(render)?
        .label(chart.series_label)
        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));

    ctx.configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .map_err(render)?;

    root.present().map_err(render)?;
    info!(path = %path.display(), title = %chart.title, "rendered chart");
    Ok(())
}
