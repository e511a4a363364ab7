//! Command implementations for the CLI interface.
//!
//! This module contains the command handlers for the subcommands available in
//! the CLI, plus the entry point that launches the TUI.

use std::path::Path;

use chrono::Local;
use clap::Subcommand;
use clap_complete::{generate, Shell};

use crate::db::{format_due_relative, parse_date_input, print_table, Database};
use crate::filter::{self, Filter, EMPTY_FILTER_MSG, EMPTY_STORE_MSG};
use crate::tui::run::run_tui;

#[derive(Subcommand)]
pub enum Commands {
    /// Launch the interactive UI interface.
    Ui,

    /// Add a new task.
    Add {
        /// The task label.
        text: String,
        /// Due date: YYYY-MM-DD, "today", "tomorrow", "in Nd" or "in Nw".
        /// Defaults to today; dates before today are rejected.
        #[arg(long)]
        date: Option<String>,
    },

    /// List tasks, optionally restricted to one view.
    List {
        /// View filter: all | active | completed | overdue.
        #[arg(long, value_enum, default_value_t = Filter::All)]
        filter: Filter,
    },

    /// Toggle a task between active and completed.
    Toggle {
        /// Task ID as shown by `list`.
        id: u64,
    },

    /// Delete a task.
    Delete {
        /// Task ID as shown by `list`.
        id: u64,
    },

    /// Generate shell completion scripts.
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Launch the terminal user interface.
pub fn cmd_ui(store_path: &Path) {
    if let Err(e) = run_tui(store_path) {
        eprintln!("UI error: {e}");
        std::process::exit(1);
    }
}

/// Add a new task to the store.
pub fn cmd_add(db: &mut Database, store_path: &Path, text: String, date: Option<String>) {
    let today = Local::now().date_naive();
    let date = match date {
        Some(ref s) => match parse_date_input(s) {
            Some(d) => d,
            None => {
                eprintln!("Unrecognised date: '{s}'. Use YYYY-MM-DD, today, tomorrow or 'in Nd'.");
                std::process::exit(1);
            }
        },
        None => today,
    };
    // The add surface only offers today onwards, same as the date picker
    // minimum in the UI.
    if date < today {
        eprintln!("Due date cannot be before today.");
        std::process::exit(1);
    }

    match db.add(&text, date) {
        Ok(id) => {
            if let Err(e) = db.save(store_path) {
                eprintln!("Failed to save store: {e}");
                std::process::exit(1);
            }
            println!("Added task {} (due {})", id, format_due_relative(date, today));
        }
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}

/// List tasks for the given view filter.
pub fn cmd_list(db: &Database, filter: Filter) {
    if db.tasks.is_empty() {
        println!("{EMPTY_STORE_MSG}");
        return;
    }
    let today = Local::now().date_naive();
    let view = filter::apply(&db.tasks, filter, today);
    if view.is_empty() {
        println!("{EMPTY_FILTER_MSG}");
        return;
    }
    print_table(&view);
}

/// Toggle a task's completion flag.
pub fn cmd_toggle(db: &mut Database, store_path: &Path, id: u64) {
    if !db.toggle(id) {
        eprintln!("Task with ID {id} not found");
        std::process::exit(1);
    }
    if let Err(e) = db.save(store_path) {
        eprintln!("Failed to save store: {e}");
        std::process::exit(1);
    }
    let state = if db.get(id).map(|t| t.completed).unwrap_or(false) {
        "completed"
    } else {
        "active"
    };
    println!("Task {id} is now {state}");
}

/// Delete a task from the store.
pub fn cmd_delete(db: &mut Database, store_path: &Path, id: u64) {
    if !db.remove(id) {
        eprintln!("Task with ID {id} not found");
        std::process::exit(1);
    }
    if let Err(e) = db.save(store_path) {
        eprintln!("Failed to save store: {e}");
        std::process::exit(1);
    }
    println!("Deleted task {id}");
}

/// Generate shell completions on stdout.
pub fn cmd_completions(shell: Shell) {
    use clap::CommandFactory;
    let mut cmd = crate::cli::Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut std::io::stdout());
}
