use std::path::PathBuf;

use clap::Parser;

use crate::cmd::Commands;

/// Simple, file-backed task list CLI.
/// Storage defaults to ~/.todue/tasks.json or a path passed via --store.
#[derive(Parser)]
#[command(name = "todue", version, about = "Daily task list with due dates")]
pub struct Cli {
    /// Path to the JSON store file.
    #[arg(long, global = true)]
    pub store: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}
