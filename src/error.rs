//! Error types for repo-bots

use thiserror::Error;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the bots and the platform layer
#[derive(Debug, Error)]
pub enum Error {
    /// The API answered 404 for the requested resource
    #[error("not found: {0}")]
    NotFound(String),

    /// An invariant about an API response or a generated patch did not hold
    #[error("assertion failed: {0}")]
    Assertion(String),

    /// Any other non-2xx API response
    #[error("API request failed with status {status}: {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Message reported by the API (or the raw body)
        message: String,
    },

    /// Error raised by the typed GitHub client
    #[error("GitHub API error: {0}")]
    GitHubApi(String),

    /// Transport-level HTTP failure
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON (de)serialization failure
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A version feed was unusable
    #[error("version feed error: {0}")]
    Feed(String),

    /// Configuration could not be loaded
    #[error("configuration error: {0}")]
    Config(String),

    /// No usable credentials
    #[error("authentication error: {0}")]
    Auth(String),

    /// No bot registered under this name
    #[error("unknown bot: {0}")]
    UnknownBot(String),

    /// Internal error
    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Whether this error is a 404 from the API
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

impl From<octocrab::Error> for Error {
    fn from(err: octocrab::Error) -> Self {
        match err {
            octocrab::Error::GitHub { source, .. } if source.status_code.as_u16() == 404 => {
                Self::NotFound(source.message)
            }
            other => Self::GitHubApi(other.to_string()),
        }
    }
}
