//! Error types for card rendering

use thiserror::Error;

/// Result type alias for card operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while producing a card
#[derive(Error, Debug)]
pub enum Error {
    /// The request carried no `username` parameter
    #[error("No username provided")]
    MissingUsername,

    /// The profile API reported no such account
    #[error("No GitHub user with username {0:?}")]
    NotFound(String),

    /// Any other failure talking to GitHub (status, transport or body)
    #[error("Network error ({}): {message}", status_label(.status))]
    NetworkError {
        /// HTTP status when one was received
        status: Option<u16>,
        /// Diagnostic detail, for logs only
        message: String,
    },

    /// Rasterizing a visual tree failed
    #[error("Rendering failed: {0}")]
    RenderError(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    ConfigError(String),
}

fn status_label(status: &Option<u16>) -> String {
    match status {
        Some(code) => code.to_string(),
        None => "no status".to_string(),
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::NetworkError {
            status: err.status().map(|s| s.as_u16()),
            message: err.to_string(),
        }
    }
}
