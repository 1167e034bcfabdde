use eframe::egui::{Color32, Ui};
use egui_plot::{Legend, Line, Plot, PlotPoints, Points};

use crate::data::model::year_month_label;
use crate::render::{SERIES_LABEL, X_LABEL, Y_LABEL};
use crate::state::ViewState;

// ---------------------------------------------------------------------------
// Trend plot (central panel)
// ---------------------------------------------------------------------------

/// Render the sentiment trend in the central panel.
pub fn trend_plot(ui: &mut Ui, state: &ViewState) {
    if state.segments.is_empty() && !state.show_scores {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("No moving-average points: the window is larger than the article count");
        });
        return;
    }

    Plot::new("trend_plot")
        .legend(Legend::default())
        .x_axis_label(X_LABEL)
        .y_axis_label(Y_LABEL)
        .x_axis_formatter(|mark, _range| year_month_label(mark.value))
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            if state.show_scores {
                let points: PlotPoints = state.scores.iter().copied().collect();
                plot_ui.points(
                    Points::new(points)
                        .name("Article score")
                        .color(Color32::from_gray(170))
                        .radius(1.5),
                );
            }

            // Separate lines per run so gaps stay open; one shared legend entry.
            for seg in &state.segments {
                let points: PlotPoints = seg.iter().copied().collect();
                let line = Line::new(points)
                    .name(SERIES_LABEL)
                    .color(Color32::BLUE)
                    .width(1.5);

                plot_ui.line(line);
            }
        });
}
