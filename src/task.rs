//! Task data structure.
//!
//! This module defines the `Task` struct that represents a single to-do item
//! with its label, due date and completion flag.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single to-do item.
///
/// The `id` is a runtime handle only: the on-disk format is a plain array of
/// `{text, date, completed}` objects, and ids are reassigned in sequence order
/// every time the store is loaded. All lookups go through the id rather than
/// the position in the sequence, so deleting a task never redirects an action
/// onto its neighbour.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    #[serde(skip)]
    pub id: u64,
    pub text: String,
    pub date: NaiveDate,
    pub completed: bool,
}
