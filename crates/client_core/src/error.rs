use thiserror::Error;

const DEFAULT_REJECTION: &str = "Invalid username or password";

/// Failures of the credential exchange with the scheduling service.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The service rejected the credentials. Carries the server-supplied
    /// message when one was present, a stock message otherwise.
    #[error("{message}")]
    InvalidCredentials { message: String },
    #[error("scheduling service unreachable: {0}")]
    Unreachable(String),
}

impl AuthError {
    pub fn invalid_credentials(message: Option<String>) -> Self {
        Self::InvalidCredentials {
            message: message.unwrap_or_else(|| DEFAULT_REJECTION.to_string()),
        }
    }
}

/// Failures of a per-view data fetch.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("scheduling service unreachable: {0}")]
    Unreachable(String),
    #[error("not authorized for this resource")]
    Unauthorized,
}

/// Malformed date/time input reaching the display formatters.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("unparseable date: {0:?}")]
    Date(String),
    #[error("unparseable clock time: {0:?}")]
    Time(String),
}
