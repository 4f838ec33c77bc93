//! albumsync: mirror a local photo library into remote albums.
//!
//! Every sub-directory of the library becomes an album named after it, and
//! every image inside is uploaded unless the album already holds a photo
//! with the same title.

mod cli;
mod error;
mod logging;

use crate::cli::{Cli, Command};
use crate::error::{ErrorKind, Result};
use albumsync_config::Config;
use albumsync_engine::{Context, dedupe, inventory};
use albumsync_remote::RepositoryHandle;
use clap::Parser;
use exn::ResultExt;
use std::process::ExitCode;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(err) => {
            // Logging cannot be configured from a file we failed to read.
            if logging::init(cli.log_level.as_deref().unwrap_or("info"), None).is_ok() {
                tracing::error!(error = ?err, "Could not load configuration");
            } else {
                eprintln!("Could not load configuration: {err:?}");
            }
            return ExitCode::FAILURE;
        },
    };
    let level = cli.log_level.as_deref().unwrap_or(&config.log_level);
    if let Err(err) = logging::init(level, config.log_output.as_deref()) {
        eprintln!("Could not set up logging: {err:?}");
        return ExitCode::FAILURE;
    }

    match run(&cli, &config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = ?err, "albumsync failed");
            ExitCode::FAILURE
        },
    }
}

async fn run(cli: &Cli, config: &Config) -> Result<()> {
    config.validate().or_raise(|| ErrorKind::Config)?;
    let ctx = Context::from_config(config).or_raise(|| ErrorKind::Config)?;
    let repository = repository(config, cli.dry_run)?;
    tracing::info!(
        repository = repository.name(),
        root = %ctx.root.display(),
        dry_run = cli.dry_run,
        command = ?cli.effective_command(),
        "Starting albumsync"
    );

    match cli.effective_command() {
        Command::Sync => {
            engine_outcome(albumsync_engine::sync(repository.as_ref(), &ctx).await)?;
        },
        Command::Dedupe => {
            let snapshot = engine_outcome(inventory::fetch(repository.as_ref(), &ctx.retrieve).await)?;
            dedupe::delete_duplicates(repository.as_ref(), &snapshot).await;
        },
        Command::Inventory => {
            let snapshot = engine_outcome(inventory::fetch(repository.as_ref(), &ctx.retrieve).await)?;
            for (title, album) in snapshot.iter() {
                println!("{title}\t{}", album.len());
            }
        },
    }
    Ok(())
}

/// Wrap an engine failure, noting whether the next scheduled run may get past it.
fn engine_outcome<T>(outcome: albumsync_engine::error::Result<T>) -> Result<T> {
    if let Err(err) = &outcome
        && err.is_retryable()
    {
        tracing::info!("The failure looks transient; a later run may succeed");
    }
    outcome.or_raise(|| ErrorKind::Run)
}

#[cfg(feature = "flickr")]
fn repository(config: &Config, dry_run: bool) -> Result<RepositoryHandle> {
    use albumsync_remote::repository::{Credentials, DryRunRepository, FlickrRepository};
    use std::sync::Arc;

    let credentials = Credentials {
        api_key: config.api_key.clone(),
        api_secret: config.api_secret.clone(),
        oauth_token: config.oauth_token.clone(),
        oauth_token_secret: config.oauth_token_secret.clone(),
    };
    let flickr: RepositoryHandle = Arc::new(FlickrRepository::new("flickr", credentials));
    Ok(if dry_run { Arc::new(DryRunRepository::new(flickr)) } else { flickr })
}

#[cfg(not(feature = "flickr"))]
fn repository(_config: &Config, _dry_run: bool) -> Result<RepositoryHandle> {
    exn::bail!(ErrorKind::Repository)
}
