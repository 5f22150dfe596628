//! Error types for logo resolution.

use thiserror::Error;

/// Result type alias using the logo-fetcher error type.
pub type Result<T> = std::result::Result<T, LogoFetcherError>;

/// Main error type for logo resolution.
///
/// Per-company failures are carried as messages on
/// [`ResolvedLogo`](crate::domain::ResolvedLogo); only [`LogoFetcherError::Validation`]
/// escapes a pipeline run.
#[derive(Error, Debug)]
pub enum LogoFetcherError {
    /// Connection-level failure talking to the provider or an asset host
    #[error("{0}")]
    Transport(String),

    /// Provider or asset host answered with a non-2xx status
    #[error("{status} error for url ({url})")]
    Status { status: u16, url: String },

    /// Well-formed response without usable brand, domain or logo data
    #[error("{0}")]
    NotFound(String),

    /// Malformed response body or undecodable asset bytes
    #[error("{0}")]
    Decode(String),

    /// Caller-level precondition failure (e.g. missing credential)
    #[error("Validation error: {0}")]
    Validation(String),

    /// HTTP client error
    #[error("HTTP request failed: {0}")]
    HttpClient(#[from] reqwest::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Archive writer error
    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// General error from anyhow
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl LogoFetcherError {
    /// Whether this error was raised before any network work started.
    pub fn is_validation(&self) -> bool {
        matches!(self, LogoFetcherError::Validation(_))
    }

    /// Whether retrying the same request later could succeed.
    ///
    /// Connection failures and non-2xx answers are transient; well-formed
    /// "nothing here" answers and malformed bodies are not.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            LogoFetcherError::Transport(_)
                | LogoFetcherError::Status { .. }
                | LogoFetcherError::HttpClient(_)
        )
    }
}
