use std::path::PathBuf;

use thiserror::Error;

// ---------------------------------------------------------------------------
// Stage errors
// ---------------------------------------------------------------------------

/// The input file could not be turned into an article table.
#[derive(Debug, Error)]
pub enum DataLoadError {
    #[error("input file {} does not exist", path.display())]
    NotFound { path: PathBuf },

    #[error("cannot read {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported input format for {} (expected .parquet, .json, .jsonl or .csv, optionally .gz)", path.display())]
    UnsupportedFormat { path: PathBuf },

    #[error("gzip stream in {} is unreadable", path.display())]
    Decompress {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed JSON")]
    Json(#[from] serde_json::Error),

    #[error("malformed CSV")]
    Csv(#[from] csv::Error),

    #[error("malformed parquet")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("arrow error")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("content is not tabular: {reason}")]
    NotTabular { reason: String },

    #[error("required column '{column}' is missing")]
    MissingColumn { column: &'static str },

    #[error("column '{column}' has unsupported type {found}")]
    UnsupportedColumnType { column: &'static str, found: String },
}

/// A raw date value could not be parsed in strict mode.
#[derive(Debug, Error, PartialEq)]
#[error("row {row}: cannot parse date '{value}'")]
pub struct DateParseError {
    /// Index of the offending row in the raw table.
    pub row: usize,
    pub value: String,
}

/// The polarity analyzer failed or misbehaved.
#[derive(Debug, Error)]
pub enum ScoringError {
    #[error("row {row}: analyzer failed: {message}")]
    Analyzer { row: usize, message: String },

    #[error("row {row}: analyzer returned {score}, outside [-1, 1]")]
    OutOfRange { row: usize, score: f64 },

    #[error("cannot load lexicon {}: {reason}", path.display())]
    Lexicon { path: PathBuf, reason: String },
}

/// The chart could not be drawn, written or shown.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("drawing failed: {0}")]
    Draw(String),

    #[error("cannot write chart to {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("interactive display failed: {0}")]
    Display(String),
}

/// Invalid runtime configuration.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("moving-average window must be at least 1")]
    InvalidWindow,

    #[error("environment variable {name} has invalid value '{value}'")]
    InvalidVar { name: &'static str, value: String },
}

// ---------------------------------------------------------------------------
// Pipeline error
// ---------------------------------------------------------------------------

/// Any fatal failure of the pipeline, tagged by stage.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("configuration")]
    Config(#[from] ConfigError),

    #[error("load stage")]
    Load(#[from] DataLoadError),

    #[error("preprocess stage")]
    DateParse(#[from] DateParseError),

    #[error("scoring stage")]
    Scoring(#[from] ScoringError),

    #[error("render stage")]
    Render(#[from] RenderError),
}
