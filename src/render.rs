use std::path::Path;

use plotters::prelude::*;

use crate::data::model::{fractional_year, year_month_label, TrendTable};
use crate::error::RenderError;

pub const TITLE: &str = "Sentiment Analysis of Financial Times News (2007-2009)";
pub const X_LABEL: &str = "Date (Year-Month)";
pub const Y_LABEL: &str = "Sentiment Score (Moving Average)";
pub const SERIES_LABEL: &str = "Moving Average Sentiment";

const SIZE: (u32, u32) = (1200, 600);

/// x extent used when nothing is plotted: the study period.
const EMPTY_X: (f64, f64) = (2007.0, 2010.0);
const EMPTY_Y: (f64, f64) = (-1.0, 1.0);

// ---------------------------------------------------------------------------
// Chart geometry
// ---------------------------------------------------------------------------

/// Plot-space polylines, one per contiguous run of defined points.
pub fn plot_segments(trend: &TrendTable) -> Vec<Vec<(f64, f64)>> {
    trend
        .segments()
        .into_iter()
        .map(|seg| {
            seg.into_iter()
                .map(|(date, ma)| (fractional_year(date), ma))
                .collect()
        })
        .collect()
}

/// Axis ranges covering every segment, padded so lines never sit on the
/// frame. Falls back to the study period and [-1, 1] when empty.
pub fn axis_ranges(segments: &[Vec<(f64, f64)>]) -> ((f64, f64), (f64, f64)) {
    let points = segments.iter().flatten();
    let (mut x0, mut x1, mut y0, mut y1) = (f64::INFINITY, f64::NEG_INFINITY, f64::INFINITY, f64::NEG_INFINITY);
    for &(x, y) in points {
        x0 = x0.min(x);
        x1 = x1.max(x);
        y0 = y0.min(y);
        y1 = y1.max(y);
    }
    if !x0.is_finite() {
        return (EMPTY_X, EMPTY_Y);
    }

    let pad = |lo: f64, hi: f64, min_span: f64| {
        let span = (hi - lo).max(min_span);
        let mid = (lo + hi) / 2.0;
        (mid - span * 0.55, mid + span * 0.55)
    };
    (pad(x0, x1, 1.0 / 12.0), pad(y0, y1, 0.1))
}

// ---------------------------------------------------------------------------
// SVG export
// ---------------------------------------------------------------------------

/// Draw the trend chart as an SVG document.
pub fn render_svg(trend: &TrendTable) -> Result<String, RenderError> {
    let segments = plot_segments(trend);
    let mut svg = String::new();
    draw(&segments, &mut svg)?;
    Ok(svg)
}

/// Write the trend chart to `path` as SVG.
pub fn render(trend: &TrendTable, path: &Path) -> Result<(), RenderError> {
    let svg = render_svg(trend)?;
    std::fs::write(path, svg).map_err(|source| RenderError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    log::info!("chart written to {}", path.display());
    Ok(())
}

fn draw_err<E: std::error::Error + Send + Sync>(e: DrawingAreaErrorKind<E>) -> RenderError {
    RenderError::Draw(e.to_string())
}

fn draw(segments: &[Vec<(f64, f64)>], svg: &mut String) -> Result<(), RenderError> {
    if segments.is_empty() {
        log::warn!("no defined moving-average points; chart will be empty");
    }
    let ((x0, x1), (y0, y1)) = axis_ranges(segments);

    let root = SVGBackend::with_string(svg, SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(draw_err)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(TITLE, ("sans-serif", 22))
        .margin(20)
        .x_label_area_size(45)
        .y_label_area_size(70)
        .build_cartesian_2d(x0..x1, y0..y1)
        .map_err(draw_err)?;

    chart
        .configure_mesh()
        .disable_mesh()
        .x_desc(X_LABEL)
        .y_desc(Y_LABEL)
        .x_label_formatter(&|x| year_month_label(*x))
        .y_label_formatter(&|y| format!("{y:.2}"))
        .draw()
        .map_err(draw_err)?;

    // Light dashed grid.
    let grid = BLACK.mix(0.25).stroke_width(1);
    for x in grid_ticks(x0, x1, 0.25) {
        chart
            .draw_series(DashedLineSeries::new(vec![(x, y0), (x, y1)], 4, 4, grid))
            .map_err(draw_err)?;
    }
    for y in grid_ticks(y0, y1, tick_step(y1 - y0)) {
        chart
            .draw_series(DashedLineSeries::new(vec![(x0, y), (x1, y)], 4, 4, grid))
            .map_err(draw_err)?;
    }

    let line = BLUE.stroke_width(2);
    let mut labelled = false;
    for seg in segments {
        let series = chart
            .draw_series(LineSeries::new(seg.iter().copied(), line))
            .map_err(draw_err)?;
        if !labelled {
            series
                .label(SERIES_LABEL)
                .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLUE.stroke_width(2)));
            labelled = true;
        }
    }
    if !labelled {
        chart
            .draw_series(LineSeries::new(std::iter::empty::<(f64, f64)>(), line))
            .map_err(draw_err)?
            .label(SERIES_LABEL)
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLUE.stroke_width(2)));
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .map_err(draw_err)?;

    root.present().map_err(draw_err)?;
    Ok(())
}

/// Multiples of `step` inside `[lo, hi]`.
fn grid_ticks(lo: f64, hi: f64, step: f64) -> Vec<f64> {
    let first = (lo / step).ceil() as i64;
    let last = (hi / step).floor() as i64;
    (first..=last).map(|k| k as f64 * step).collect()
}

/// A 1/2/5 step giving roughly five gridlines over `span`.
fn tick_step(span: f64) -> f64 {
    let raw = (span / 5.0).max(f64::EPSILON);
    let magnitude = 10f64.powf(raw.log10().floor());
    [1.0, 2.0, 5.0, 10.0]
        .into_iter()
        .map(|m| m * magnitude)
        .find(|&s| s >= raw * (1.0 - 1e-9))
        .unwrap_or(10.0 * magnitude)
}
