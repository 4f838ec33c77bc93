use derive_more::{Display, Error};

pub type Error = exn::Exn<ErrorKind>;
pub type Result<T> = std::result::Result<T, Error>;

/// Reasons the process exits with a failure status.
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    #[display("configuration is missing or invalid")]
    Config,
    #[display("could not set up logging")]
    Logging,
    #[cfg(not(feature = "flickr"))]
    #[display("no usable photo repository")]
    Repository,
    #[display("run aborted")]
    Run,
}
