use std::num::NonZeroUsize;
use std::path::PathBuf;

use crate::data::preprocess::DatePolicy;
use crate::error::ConfigError;

pub const DEFAULT_INPUT: &str = "ft-articles.parquet";
pub const DEFAULT_OUTPUT: &str = "ft_sentiment_trend.svg";
pub const DEFAULT_WINDOW: usize = 500;

pub const ENV_INPUT: &str = "FT_SENTIMENT_INPUT";
pub const ENV_OUTPUT: &str = "FT_SENTIMENT_OUTPUT";
pub const ENV_WINDOW: &str = "FT_SENTIMENT_WINDOW";
pub const ENV_LENIENT_DATES: &str = "FT_SENTIMENT_LENIENT_DATES";
pub const ENV_LEXICON: &str = "FT_SENTIMENT_LEXICON";
pub const ENV_HEADLESS: &str = "FT_SENTIMENT_HEADLESS";

/// Everything a pipeline run needs, passed explicitly to each stage.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    pub window: usize,
    pub date_policy: DatePolicy,
    /// VADER-format lexicon file; the standard VADER scorer when `None`.
    pub lexicon: Option<PathBuf>,
    /// Open the interactive window after writing the chart.
    pub display: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_INPUT),
            output: PathBuf::from(DEFAULT_OUTPUT),
            window: DEFAULT_WINDOW,
            date_policy: DatePolicy::Strict,
            lexicon: None,
            display: true,
        }
    }
}

impl PipelineConfig {
    /// Defaults overlaid with the `FT_SENTIMENT_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an injectable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();

        if let Some(v) = lookup(ENV_INPUT) {
            cfg.input = PathBuf::from(v);
        }
        if let Some(v) = lookup(ENV_OUTPUT) {
            cfg.output = PathBuf::from(v);
        }
        if let Some(v) = lookup(ENV_WINDOW) {
            cfg.window = v.trim().parse().map_err(|_| ConfigError::InvalidVar {
                name: ENV_WINDOW,
                value: v.clone(),
            })?;
        }
        if let Some(v) = lookup(ENV_LENIENT_DATES) {
            if parse_flag(ENV_LENIENT_DATES, &v)? {
                cfg.date_policy = DatePolicy::Lenient;
            }
        }
        if let Some(v) = lookup(ENV_LEXICON) {
            cfg.lexicon = Some(PathBuf::from(v));
        }
        if let Some(v) = lookup(ENV_HEADLESS) {
            cfg.display = !parse_flag(ENV_HEADLESS, &v)?;
        }

        cfg.window()?;
        Ok(cfg)
    }

    /// The validated moving-average window.
    pub fn window(&self) -> Result<NonZeroUsize, ConfigError> {
        NonZeroUsize::new(self.window).ok_or(ConfigError::InvalidWindow)
    }
}

fn parse_flag(name: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(ConfigError::InvalidVar {
            name,
            value: value.to_string(),
        }),
    }
}
