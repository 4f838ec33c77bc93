//! Remote Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};
use std::io::Error as IoError;

/// A repository error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for repository operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// Album or photo does not exist on the remote side
    #[display("not found: {_0}")]
    NotFound(#[error(not(source))] String),
    /// The service answered, but refused the request
    #[display("API error {code}: {message}")]
    Api { code: i64, message: String },
    /// Connection, TLS or timeout failure before a usable answer arrived
    #[display("network error: {_0}")]
    Network(#[error(not(source))] String),
    /// The service answered with something we could not make sense of
    #[display("invalid response: {_0}")]
    InvalidResponse(#[error(not(source))] String),
    /// Reading the local file to upload failed
    #[display("I/O error: {_0}")]
    Io(IoError),
    /// Credentials are missing or were rejected
    #[display("invalid or missing credentials")]
    Credentials,
}
impl From<IoError> for ErrorKind {
    fn from(err: IoError) -> Self {
        Self::Io(err)
    }
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    ///
    /// Advisory only: the sync engine retries every failure the same way and
    /// only reports this alongside each retry.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Io(_) | Self::Network(_) | Self::Api { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn error_kind_display() {
        assert_eq!(ErrorKind::NotFound("album 42".to_string()).to_string(), "not found: album 42");
        assert_eq!(
            ErrorKind::Api {
                code: 1,
                message: "Photoset not found".to_string()
            }
            .to_string(),
            "API error 1: Photoset not found"
        );
        assert_eq!(ErrorKind::Credentials.to_string(), "invalid or missing credentials");
    }

    #[rstest]
    #[case(ErrorKind::Network("timeout".to_string()), true)]
    #[case(ErrorKind::Api { code: 105, message: "Service currently unavailable".to_string() }, true)]
    #[case(ErrorKind::Io(IoError::other("disk")), true)]
    #[case(ErrorKind::Credentials, false)]
    #[case(ErrorKind::NotFound("photo 1".to_string()), false)]
    #[case(ErrorKind::InvalidResponse("garbage".to_string()), false)]
    fn error_kind_retryable(#[case] kind: ErrorKind, #[case] expected: bool) {
        assert_eq!(kind.is_retryable(), expected);
    }
}
