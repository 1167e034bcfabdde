pub mod panels;
pub mod plot;

use std::path::Path;

use eframe::egui;

use crate::app::TrendApp;
use crate::data::model::TrendTable;
use crate::error::RenderError;
use crate::pipeline::PipelineReport;
use crate::render::TITLE;
use crate::state::ViewState;

/// Open the interactive chart window; blocks until it is closed.
pub fn display(trend: &TrendTable, report: PipelineReport, chart_path: &Path) -> Result<(), RenderError> {
    let app = TrendApp::new(ViewState::new(trend, report, chart_path));

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 650.0])
            .with_min_inner_size([600.0, 350.0]),
        ..Default::default()
    };

    eframe::run_native(TITLE, options, Box::new(move |_cc| Ok(Box::new(app))))
        .map_err(|e| RenderError::Display(e.to_string()))
}
