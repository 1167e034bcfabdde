use std::path::{Path, PathBuf};

use crate::data::model::{fractional_year, TrendTable};
use crate::pipeline::PipelineReport;
use crate::render::plot_segments;

// ---------------------------------------------------------------------------
// Viewer state
// ---------------------------------------------------------------------------

/// Everything the viewer draws, independent of rendering.
pub struct ViewState {
    /// Moving-average polylines in plot coordinates (fractional year, value).
    pub segments: Vec<Vec<[f64; 2]>>,

    /// Per-article scores, drawn as points when `show_scores` is on.
    pub scores: Vec<[f64; 2]>,

    /// Whether the raw article scores are overlaid.
    pub show_scores: bool,

    pub report: PipelineReport,

    /// Where the SVG was written.
    pub chart_path: PathBuf,
}

impl ViewState {
    pub fn new(trend: &TrendTable, report: PipelineReport, chart_path: &Path) -> Self {
        let segments = plot_segments(trend)
            .into_iter()
            .map(|seg| seg.into_iter().map(|(x, y)| [x, y]).collect())
            .collect();
        let scores = trend
            .rows
            .iter()
            .map(|r| [fractional_year(r.article.date), r.score])
            .collect();

        Self {
            segments,
            scores,
            show_scores: false,
            report,
            chart_path: chart_path.to_path_buf(),
        }
    }

    /// Number of moving-average points on screen.
    pub fn plotted_points(&self) -> usize {
        self.segments.iter().map(Vec::len).sum()
    }

    pub fn toggle_scores(&mut self) {
        self.show_scores = !self.show_scores;
    }
}
