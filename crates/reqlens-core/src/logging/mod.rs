pub mod config;
pub mod file_writer;

pub use config::{LogFormat, LoggingConfig};

use anyhow::Result;
use std::path::PathBuf;
use tracing_subscriber::{
    fmt, layer::Layer, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry,
};

/// Initialize the logging system with the given configuration
pub fn init(config: LoggingConfig) -> Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let console_layer = config.console.then(|| {
        let layer = fmt::layer()
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .with_ansi(true);
        match config.format {
            LogFormat::Json => layer.json().boxed(),
            LogFormat::Text => layer.boxed(),
        }
    });

    let file_layer = config.file.as_ref().map(|path| {
        let layer = fmt::layer()
            .with_writer(file_writer::FileWriter::new(path.clone()))
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .with_ansi(false)
            .with_timer(fmt::time::ChronoUtc::rfc_3339());
        match config.format {
            LogFormat::Json => layer.json().boxed(),
            LogFormat::Text => layer.boxed(),
        }
    });

    Registry::default()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()?;

    Ok(())
}

/// Initialize logging with default configuration
pub fn init_default() -> Result<()> {
    init(LoggingConfig::default())
}

/// Initialize logging from CLI arguments, with environment variables as the
/// fallback layer.
///
/// `--verbose` beats `--log-level` beats `RUST_LOG`; an explicit file path
/// beats `REQLENS_LOG_FILE`. The environment fallbacks come in through
/// `LoggingConfig::default`.
pub fn init_from_args(
    log_level: Option<String>,
    log_file: Option<PathBuf>,
    verbose: bool,
) -> Result<()> {
    let defaults = LoggingConfig::default();
    let level = if verbose {
        "debug".to_string()
    } else {
        log_level.unwrap_or(defaults.level)
    };
    init(LoggingConfig::new(
        level,
        log_file.or(defaults.file),
        true,
        LogFormat::Text,
    ))
}
