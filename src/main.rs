use anyhow::{Context, Result};

use ft_sentiment::config::PipelineConfig;
use ft_sentiment::pipeline;

fn main() -> Result<()> {
    env_logger::init();

    let config = PipelineConfig::from_env().context("reading configuration")?;
    log::info!(
        "analysing {} (window {}, {:?} dates)",
        config.input.display(),
        config.window,
        config.date_policy
    );

    let analyzer = pipeline::build_analyzer(&config).context("preparing sentiment analyzer")?;
    let (trend, report) = pipeline::run(&config, analyzer.as_ref())
        .with_context(|| format!("sentiment pipeline on {}", config.input.display()))?;

    pipeline::present(&config, &trend, report, ft_sentiment::display);
    Ok(())
}
