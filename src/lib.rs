//! News sentiment trend for the Financial Times corpus, 2007–2009.
//!
//! The pipeline is a chain of plain functions, each consuming the previous
//! stage's value:
//!
//! ```text
//! load ─▶ preprocess ─▶ score ─▶ smooth ─▶ render / display
//! ```

pub mod app;
pub mod config;
pub mod data;
pub mod error;
pub mod pipeline;
pub mod render;
pub mod sentiment;
pub mod state;
pub mod ui;

pub use config::PipelineConfig;
pub use data::loader::load;
pub use data::preprocess::{preprocess, DatePolicy};
pub use error::{
    ConfigError, DataLoadError, DateParseError, PipelineError, RenderError, ScoringError,
};
pub use pipeline::{analyse, present, run, PipelineReport};
pub use render::render;
pub use sentiment::{moving_average, score, smooth, PolarityScorer, StandardVader, VaderAnalyzer};
pub use ui::display;
