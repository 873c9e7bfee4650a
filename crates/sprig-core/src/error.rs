use std::path::PathBuf;

use thiserror::Error;

/// Application-wide error types for sprig.
#[derive(Error, Debug)]
pub enum AppError {
    /// Connection or DNS failure while fetching a page.
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Request timed out.
    #[error("Request timed out after {0} seconds")]
    Timeout(u64),

    /// The server answered with a non-success status.
    #[error("HTTP {status} for {url}")]
    HttpStatus { status: u16, url: String },

    /// Response body could not be read or is not a usable document.
    #[error("Malformed response body: {0}")]
    MalformedBody(String),

    /// Any other transport failure (client construction, invalid URL, ...).
    #[error("HTTP error: {0}")]
    HttpError(String),

    /// The rule table could not be compiled into selectors.
    #[error("Extraction error: {0}")]
    ExtractionError(String),

    /// Mandatory fields were empty after extraction.
    #[error("Failed to extract required profile information (missing: {})", .missing.join(", "))]
    ValidationError { missing: Vec<&'static str> },

    /// JSON serialization/deserialization failed.
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// Writing the JSON result to disk failed.
    #[error("Failed to write {}: {source}", .path.display())]
    WriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Retrieving or saving the profile image failed.
    #[error("Failed to download image from {url}: {reason}")]
    DownloadError { url: String, reason: String },

    /// The profile identifier cannot be used in a URL path or file name.
    #[error("Invalid profile identifier: {0:?}")]
    InvalidIdentifier(String),

    /// Bad configuration (base URL, rules file, ...).
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl AppError {
    /// Returns true if this error should halt the pipeline.
    ///
    /// Only image download failures are tolerated: the JSON result has
    /// already been written by the time the image is fetched.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, AppError::DownloadError { .. })
    }

    /// Returns true for failures raised while fetching the profile page.
    pub fn is_fetch_error(&self) -> bool {
        matches!(
            self,
            AppError::NetworkError(_)
                | AppError::Timeout(_)
                | AppError::HttpStatus { .. }
                | AppError::MalformedBody(_)
                | AppError::HttpError(_)
        )
    }
}
