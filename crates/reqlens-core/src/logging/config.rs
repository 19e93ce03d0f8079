use std::path::PathBuf;

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable text
    #[default]
    Text,
    /// Structured JSON lines
    Json,
}

/// Settings for the tracing pipeline
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Filter directive applied when RUST_LOG is absent
    pub level: String,
    /// File sink target; None disables file logging
    pub file: Option<PathBuf>,
    /// Install the console layer
    pub console: bool,
    /// Rendering applied to every installed sink
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            file: std::env::var("REQLENS_LOG_FILE").ok().map(PathBuf::from),
            console: true,
            format: LogFormat::Text,
        }
    }
}

impl LoggingConfig {
    pub fn new(level: String, file: Option<PathBuf>, console: bool, format: LogFormat) -> Self {
        Self { level, file, console, format }
    }
}
