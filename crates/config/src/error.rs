//! Configuration Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};
use std::path::PathBuf;

/// A configuration error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for configuration operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Everything here is fatal: the process cannot start without a usable
/// configuration.
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// An explicitly requested configuration file does not exist
    #[display("configuration file not found: {}", _0.display())]
    NotFound(#[error(not(source))] PathBuf),
    /// The file extension does not name a supported format
    #[display("unsupported configuration format: {}", _0.display())]
    UnsupportedFormat(#[error(not(source))] PathBuf),
    /// A source could not be parsed or a value has the wrong type
    #[display("invalid configuration: {_0}")]
    Parse(#[error(not(source))] String),
    #[display("api_key, api_secret, oauth_token and oauth_token_secret must all be set")]
    MissingCredentials,
    #[display("photo_library_path must be set")]
    MissingLibraryPath,
    #[display("photo library path does not exist: {}", _0.display())]
    LibraryPathNotFound(#[error(not(source))] PathBuf),
    #[display("cannot access photo library path: {}", _0.display())]
    LibraryPathInaccessible(#[error(not(source))] PathBuf),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        false
    }
}
