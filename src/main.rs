//! # todue - Daily Task List
//!
//! A minimal file-backed task list with due dates, view filters and an
//! optional terminal user interface (TUI).
//!
//! ## Key Features
//!
//! - **Due dates**: every task carries a calendar date; overdue tasks are
//!   classified against the current local day at render time
//! - **View filters**: all / active / completed / overdue
//! - **Multiple Interfaces**: full CLI for automation + interactive TUI
//! - **Local File Storage**: one JSON file, human-readable, safe to edit
//!
//! ## Quick Start
//!
//! ```bash
//! # Launch the TUI
//! todue ui
//!
//! # Add a task via CLI
//! todue add "Buy milk" --date tomorrow
//!
//! # List what's left
//! todue list --filter active
//!
//! # Mark it done
//! todue toggle 1
//! ```
//!
//! Data is stored locally in `~/.todue/tasks.json` (override with `--store`).

use std::path::PathBuf;

use clap::Parser;

pub mod cli;
pub mod cmd;
pub mod db;
pub mod filter;
pub mod task;
pub mod tui {
    pub mod app;
    pub mod colors;
    pub mod input;
    pub mod run;
    pub mod utils;
}

use cli::Cli;
use cmd::*;
use db::Database;

fn main() {
    let cli = Cli::parse();

    // Completions never touch the store.
    if let Commands::Completions { shell } = &cli.command {
        cmd_completions(*shell);
        return;
    }

    let store_path = cli.store.unwrap_or_else(|| {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        PathBuf::from(home).join(".todue").join("tasks.json")
    });

    if let Commands::Ui = cli.command {
        cmd_ui(&store_path);
        return;
    }

    let mut db = Database::load(&store_path);

    match cli.command {
        Commands::Ui => unreachable!("UI command handled above"),
        Commands::Completions { .. } => unreachable!("completions handled above"),
        Commands::Add { text, date } => cmd_add(&mut db, &store_path, text, date),
        Commands::List { filter } => cmd_list(&db, filter),
        Commands::Toggle { id } => cmd_toggle(&mut db, &store_path, id),
        Commands::Delete { id } => cmd_delete(&mut db, &store_path, id),
    }
}
