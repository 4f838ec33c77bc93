use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(version, about = "Mirror a local photo library into remote albums")]
pub struct Cli {
    /// Configuration file (JSON, TOML or YAML)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level or filter directives; overrides the configuration file
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Read from the remote service but never write to it
    #[arg(long, global = true)]
    pub dry_run: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Upload every local photo missing from the remote albums
    #[default]
    Sync,
    /// Delete remote photos that repeat a title within an album
    Dedupe,
    /// Print remote albums and their photo counts
    Inventory,
}

impl Cli {
    pub fn effective_command(&self) -> Command {
        self.command.unwrap_or_default()
    }
}
