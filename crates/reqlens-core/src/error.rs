use thiserror::Error;

/// Errors surfaced by type resolution.
///
/// Cancellation is its own variant so callers can tell an aborted pass from
/// a failed one: cancelled resolutions must not be cached as failures.
#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("resolution cancelled")]
    Cancelled,

    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl ResolveError {
    /// Wraps an I/O failure with the path it happened on
    pub fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        ResolveError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Errors from applying an externally generated payload to a request
#[derive(Error, Debug)]
pub enum PayloadError {
    #[error("generated payload is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("generated payload must be a single JSON object")]
    NotAnObject,
}
