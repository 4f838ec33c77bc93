//! Engine Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction. Repository errors are kept as the
//! children of these kinds via `or_raise`.

use derive_more::{Display, Error};
use std::path::PathBuf;

/// An engine error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for engine operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// The remote album list could not be read; nothing can be reconciled
    #[display("could not retrieve the remote album list")]
    Inventory,
    /// The local library root is missing or is not a directory
    #[display("photo library root is not a readable directory: {}", _0.display())]
    LibraryRoot(#[error(not(source))] PathBuf),
    /// A directory or directory entry could not be read during the walk
    #[display("could not read {}", _0.display())]
    Scan(#[error(not(source))] PathBuf),
    /// Every upload attempt for a file failed
    #[display("upload of {} failed after {_1} attempt(s)", _0.display())]
    Transfer(#[error(not(source))] PathBuf, #[error(not(source))] u32),
}

impl ErrorKind {
    /// Returns `true` if running again later might succeed. The binary logs a
    /// hint when a run aborts on such an error.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Inventory | Self::Transfer(..))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::path::Path;

    #[test]
    fn error_kind_display() {
        assert_eq!(
            ErrorKind::Transfer(Path::new("/library/Trip/img1.jpg").to_path_buf(), 6).to_string(),
            "upload of /library/Trip/img1.jpg failed after 6 attempt(s)"
        );
        assert_eq!(ErrorKind::Inventory.to_string(), "could not retrieve the remote album list");
    }

    #[rstest]
    #[case(ErrorKind::Inventory, true)]
    #[case(ErrorKind::Transfer(PathBuf::from("a/b.jpg"), 1), true)]
    #[case(ErrorKind::LibraryRoot(PathBuf::from("/nowhere")), false)]
    #[case(ErrorKind::Scan(PathBuf::from("/library/locked")), false)]
    fn error_kind_retryable(#[case] kind: ErrorKind, #[case] expected: bool) {
        assert_eq!(kind.is_retryable(), expected);
    }
}
