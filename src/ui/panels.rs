use eframe::egui::{self, Ui};

use crate::state::ViewState;

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the toolbar: overlay toggle and run summary.
pub fn top_bar(ui: &mut Ui, state: &mut ViewState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        if ui
            .selectable_label(state.show_scores, "Article scores")
            .clicked()
        {
            state.toggle_scores();
        }

        ui.separator();

        ui.label(format!(
            "{} articles scored, {} points plotted (window {})",
            state.report.scored,
            state.plotted_points(),
            state.report.window
        ));

        ui.separator();

        ui.label(format!("Saved to {}", state.chart_path.display()));
    });
}

// ---------------------------------------------------------------------------
// Bottom status bar
// ---------------------------------------------------------------------------

/// Render the preprocessing breakdown.
pub fn status_bar(ui: &mut Ui, state: &ViewState) {
    let stats = &state.report.preprocess;
    ui.horizontal(|ui: &mut Ui| {
        ui.small(format!(
            "{} rows loaded · {} missing values · {} bad dates · {} outside 2007–2009",
            stats.input_rows, stats.dropped_missing, stats.skipped_unparseable, stats.outside_period
        ));
    });
}
