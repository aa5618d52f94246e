//! Error types for HTML conversion

use thiserror::Error;

/// Result type alias for conversion operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while resolving or rendering a document
#[derive(Error, Debug)]
pub enum Error {
    /// The source file is missing, unreadable, or does not decode with the
    /// configured text encoding
    #[error("Failed to read HTML source: {0}")]
    ReadError(String),

    /// The render engine failed to launch, load the content, or produce the
    /// requested artifact
    #[error("Rendering failed: {0}")]
    RenderError(String),

    /// The rendered artifact could not be written to the requested output path
    #[error("Failed to write artifact: {0}")]
    WriteError(String),

    /// Invalid configuration (unknown encoding name, malformed substitution data)
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    /// Operation timed out
    #[error("Operation timed out after {0}ms")]
    Timeout(u64),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Error::RenderError(err.to_string())
    }
}
