use std::path::Path;

use crate::config::PipelineConfig;
use crate::data::loader;
use crate::data::model::TrendTable;
use crate::data::preprocess::{self, PreprocessStats};
use crate::error::{PipelineError, RenderError, ScoringError};
use crate::render;
use crate::sentiment::{self, Lexicon, PolarityScorer, StandardVader, VaderAnalyzer};

/// Row counts of a completed run, shown in the log and the viewer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineReport {
    pub preprocess: PreprocessStats,
    pub scored: usize,
    pub window: usize,
    pub plotted_points: usize,
}

impl PipelineReport {
    pub fn summary(&self) -> String {
        format!(
            "{} rows loaded, {} dropped (missing), {} skipped (bad date), {} outside 2007-2009; \
             {} articles scored, {} points plotted (window {})",
            self.preprocess.input_rows,
            self.preprocess.dropped_missing,
            self.preprocess.skipped_unparseable,
            self.preprocess.outside_period,
            self.scored,
            self.plotted_points,
            self.window,
        )
    }
}

/// Analyzer selected by the configuration: standard VADER unless a
/// lexicon file is given.
pub fn build_analyzer(config: &PipelineConfig) -> Result<Box<dyn PolarityScorer>, ScoringError> {
    match &config.lexicon {
        Some(path) => {
            let lexicon = Lexicon::from_path(path)?;
            log::info!("using lexicon {} ({} entries)", path.display(), lexicon.len());
            Ok(Box::new(VaderAnalyzer::new(lexicon)))
        }
        None => Ok(Box::new(StandardVader::new())),
    }
}

/// Load → preprocess → score → smooth. No output is written.
pub fn analyse(
    config: &PipelineConfig,
    analyzer: &dyn PolarityScorer,
) -> Result<(TrendTable, PipelineReport), PipelineError> {
    let window = config.window()?;

    let raw = loader::load(&config.input)?;
    let (articles, stats) = preprocess::preprocess_with_stats(&raw, config.date_policy)?;
    log::info!(
        "preprocessed: {} kept of {} ({} missing, {} bad date, {} outside period)",
        stats.kept,
        stats.input_rows,
        stats.dropped_missing,
        stats.skipped_unparseable,
        stats.outside_period
    );

    let scored = sentiment::score(articles, analyzer)?;
    let scored_rows = scored.len();
    let trend = sentiment::smooth(scored, window);

    let report = PipelineReport {
        preprocess: stats,
        scored: scored_rows,
        window: window.get(),
        plotted_points: trend.points().count(),
    };
    Ok((trend, report))
}

/// The full run: [`analyse`] then write the chart to `config.output`.
pub fn run(
    config: &PipelineConfig,
    analyzer: &dyn PolarityScorer,
) -> Result<(TrendTable, PipelineReport), PipelineError> {
    let (trend, report) = analyse(config, analyzer)?;
    render::render(&trend, &config.output)?;
    log::info!("{}", report.summary());
    Ok((trend, report))
}

/// Show the finished chart interactively when configured to.
///
/// Runs after [`run`] has written the SVG, so a window that cannot open
/// (no display server, for one) is logged and the run still succeeds.
/// Returns whether the window was shown.
pub fn present<F>(config: &PipelineConfig, trend: &TrendTable, report: PipelineReport, show: F) -> bool
where
    F: FnOnce(&TrendTable, PipelineReport, &Path) -> Result<(), RenderError>,
{
    if !config.display {
        return false;
    }
    match show(trend, report, &config.output) {
        Ok(()) => true,
        Err(e) => {
            log::warn!(
                "chart saved to {} but the interactive view failed: {e}",
                config.output.display()
            );
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::num::NonZeroUsize;

    fn empty_trend() -> TrendTable {
        TrendTable {
            rows: Vec::new(),
            window: NonZeroUsize::new(3).unwrap(),
        }
    }

    #[test]
    fn display_failure_does_not_fail_the_run() {
        let config = PipelineConfig::default();
        let shown = present(&config, &empty_trend(), PipelineReport::default(), |_, _, _| {
            Err(RenderError::Display("no display server".into()))
        });
        assert!(!shown);
    }

    #[test]
    fn display_receives_the_chart_path() {
        let config = PipelineConfig {
            output: "out/chart.svg".into(),
            ..Default::default()
        };
        let shown = present(&config, &empty_trend(), PipelineReport::default(), |_, _, path| {
            assert_eq!(path, Path::new("out/chart.svg"));
            Ok(())
        });
        assert!(shown);
    }

    #[test]
    fn headless_runs_never_open_a_window() {
        let config = PipelineConfig {
            display: false,
            ..Default::default()
        };
        let called = Cell::new(false);
        let shown = present(&config, &empty_trend(), PipelineReport::default(), |_, _, _| {
            called.set(true);
            Ok(())
        });
        assert!(!shown);
        assert!(!called.get());
    }

    #[test]
    fn lexicon_file_errors_surface_as_scoring_errors() {
        let config = PipelineConfig {
            lexicon: Some("/no/such/lexicon.txt".into()),
            ..Default::default()
        };
        assert!(matches!(
            build_analyzer(&config),
            Err(ScoringError::Lexicon { .. })
        ));
    }

    #[test]
    fn default_analyzer_is_standard_vader() {
        let analyzer = build_analyzer(&PipelineConfig::default()).unwrap();
        assert!(analyzer.compound("A disappointing quarter").unwrap() < 0.0);
    }
}
