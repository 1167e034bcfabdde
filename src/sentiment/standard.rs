//! # Standard VADER scorer
//!
//! The published VADER model with its full lexicon, via the
//! `vader_sentiment` port of NLTK's `SentimentIntensityAnalyzer`.

use anyhow::anyhow;
use vader_sentiment::SentimentIntensityAnalyzer;

use super::PolarityScorer;

/// Default scorer: VADER compound scores as NLTK computes them.
pub struct StandardVader {
    inner: SentimentIntensityAnalyzer<'static>,
}

impl StandardVader {
    pub fn new() -> Self {
        StandardVader {
            inner: SentimentIntensityAnalyzer::new(),
        }
    }
}

impl Default for StandardVader {
    fn default() -> Self {
        Self::new()
    }
}

impl PolarityScorer for StandardVader {
    fn compound(&self, text: &str) -> anyhow::Result<f64> {
        self.inner
            .polarity_scores(text)
            .get("compound")
            .copied()
            .ok_or_else(|| anyhow!("analyzer produced no compound score"))
    }
}
