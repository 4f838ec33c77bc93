use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::writer::BoxMakeWriter;

/// Build the event filter: `RUST_LOG` when set, `level` otherwise.
pub fn filter(level: &str) -> Result<EnvFilter> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(level).or_raise(|| ErrorKind::Logging),
    }
}

/// Install the global subscriber, writing to stderr or appending to `output`.
pub fn init(level: &str, output: Option<&Path>) -> Result<()> {
    let filter = filter(level)?;
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match output {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path).or_raise(|| ErrorKind::Logging)?;
            builder.with_ansi(false).with_writer(BoxMakeWriter::new(Mutex::new(file))).init();
        },
        None => builder.with_writer(BoxMakeWriter::new(std::io::stderr)).init(),
    }
    Ok(())
}

