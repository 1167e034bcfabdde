/// Sentiment layer: polarity scoring and trend smoothing.
///
/// ```text
///   ArticleTable ──score──▶ ScoredTable ──smooth──▶ TrendTable
///                  │
///                  └─ PolarityScorer (StandardVader by default)
/// ```
pub mod analyzer;
pub mod lexicon;
pub mod standard;

use std::num::NonZeroUsize;

use crate::data::model::{ArticleTable, ScoredArticle, ScoredTable, TrendRow, TrendTable};
use crate::error::ScoringError;

pub use analyzer::VaderAnalyzer;
pub use lexicon::Lexicon;
pub use standard::StandardVader;

/// Anything that maps a text to a compound polarity in [-1, 1].
pub trait PolarityScorer {
    fn compound(&self, text: &str) -> anyhow::Result<f64>;
}

/// Score every article's merged text, in row order.
pub fn score(
    table: ArticleTable,
    analyzer: &dyn PolarityScorer,
) -> Result<ScoredTable, ScoringError> {
    let mut rows = Vec::with_capacity(table.len());
    for (row, article) in table.articles.into_iter().enumerate() {
        let score = analyzer
            .compound(&article.title_and_text)
            .map_err(|e| ScoringError::Analyzer {
                row,
                message: format!("{e:#}"),
            })?;
        if !(-1.0..=1.0).contains(&score) {
            return Err(ScoringError::OutOfRange { row, score });
        }
        rows.push(ScoredArticle { article, score });
    }
    log::info!("scored {} articles", rows.len());
    Ok(ScoredTable { rows })
}

/// Trailing moving average without partial windows: position `i` is
/// `Some(mean(scores[i + 1 - window ..= i]))` once `i + 1 >= window`.
pub fn moving_average(scores: &[f64], window: NonZeroUsize) -> Vec<Option<f64>> {
    let w = window.get();
    if scores.len() < w {
        return vec![None; scores.len()];
    }
    std::iter::repeat(None)
        .take(w - 1)
        .chain(
            scores
                .windows(w)
                .map(|win| Some(win.iter().sum::<f64>() / w as f64)),
        )
        .collect()
}

/// Attach the moving average to every scored row.
pub fn smooth(table: ScoredTable, window: NonZeroUsize) -> TrendTable {
    let averages = moving_average(&table.scores(), window);
    let rows: Vec<TrendRow> = table
        .rows
        .into_iter()
        .zip(averages)
        .map(|(r, moving_average)| TrendRow {
            article: r.article,
            score: r.score,
            moving_average,
        })
        .collect();

    let defined = rows.iter().filter(|r| r.moving_average.is_some()).count();
    log::info!(
        "moving average over {} rows (window {window}): {defined} defined",
        rows.len()
    );
    TrendTable { rows, window }
}
