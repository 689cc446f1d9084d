//! Error types for quote card generation

use thiserror::Error;

/// Result type alias for quote card operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while formatting or rendering a quote card
#[derive(Error, Debug)]
pub enum Error {
    /// A formatting directive had a negative offset or a non-positive length
    #[error("Invalid directive: {0}")]
    InvalidDirective(String),

    /// Text could not be round-tripped through UTF-16
    #[error("Encoding error: {0}")]
    EncodingError(String),

    /// Failed to build the HTML document
    #[error("Template rendering failed: {0}")]
    TemplateError(String),

    /// Failed to rasterize the HTML document
    #[error("Rendering failed: {0}")]
    RenderError(String),

    /// Failed to decode, crop or encode the rendered image
    #[error("Image processing failed: {0}")]
    ImageError(String),

    /// Operation timed out
    #[error("Operation timed out after {0}ms")]
    Timeout(u64),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    /// Malformed request payload
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// I/O failure talking to files or child processes
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Whether the error was caused by the caller's input rather than by the service.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Error::InvalidDirective(_) | Error::EncodingError(_) | Error::InvalidRequest(_)
        )
    }
}

impl From<image::ImageError> for Error {
    fn from(err: image::ImageError) -> Self {
        Error::ImageError(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::InvalidRequest(err.to_string())
    }
}
