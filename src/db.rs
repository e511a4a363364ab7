//! Task store and persistence.
//!
//! This module provides the `Database` struct that owns the ordered task
//! sequence and its round-trip to the backing JSON file, along with date
//! parsing and formatting helpers shared by the CLI and the TUI.

use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::Path;

use chrono::{Duration, Local, NaiveDate};

use crate::filter::format_task_date;
use crate::task::Task;

/// In-memory task store backed by a JSON file.
///
/// The file holds a bare array of `{text, date, completed}` objects; ids are
/// assigned in sequence order on load and are stable for the lifetime of the
/// process. Every mutation is followed by a full `save` by the caller — there
/// is no incremental persistence.
#[derive(Debug)]
pub struct Database {
    pub tasks: Vec<Task>,
    next_id: u64,
}

impl Default for Database {
    fn default() -> Self {
        Database {
            tasks: Vec::new(),
            next_id: 1,
        }
    }
}

impl Database {
    /// Load the store from a JSON file. A missing, unreadable or corrupt file
    /// yields an empty store rather than an error.
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            return Database::default();
        }
        let mut buf = String::new();
        let tasks: Vec<Task> = match File::open(path).and_then(|mut f| f.read_to_string(&mut buf)) {
            Ok(_) => match serde_json::from_str(&buf) {
                Ok(tasks) => tasks,
                Err(e) => {
                    eprintln!("Error parsing store, starting fresh: {e}");
                    Vec::new()
                }
            },
            Err(e) => {
                eprintln!("Error reading store, starting fresh: {e}");
                Vec::new()
            }
        };
        Database::from_tasks(tasks)
    }

    /// Build a store from an already-deserialized sequence, assigning ids.
    pub fn from_tasks(mut tasks: Vec<Task>) -> Self {
        for (i, t) in tasks.iter_mut().enumerate() {
            t.id = i as u64 + 1;
        }
        let next_id = tasks.len() as u64 + 1;
        Database { tasks, next_id }
    }

    /// Save the full task sequence to the JSON file using an atomic write
    /// (temp file + rename).
    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        if let Some(dir) = path.parent() {
            if !dir.as_os_str().is_empty() {
                fs::create_dir_all(dir)?;
            }
        }
        let tmp = path.with_extension("json.tmp");
        let mut f = File::create(&tmp)?;
        let data = serde_json::to_string_pretty(&self.tasks).unwrap();
        f.write_all(data.as_bytes())?;
        f.flush()?;
        fs::rename(tmp, path)?;
        Ok(())
    }

    /// Append a new task. Rejects empty (post-trim) text, the single
    /// validation error this store recognises. Returns the new task's id.
    pub fn add(&mut self, text: &str, date: NaiveDate) -> Result<u64, String> {
        let text = text.trim();
        if text.is_empty() {
            return Err("Please enter a task".to_string());
        }
        let id = self.next_id;
        self.next_id += 1;
        self.tasks.push(Task {
            id,
            text: text.to_string(),
            date,
            completed: false,
        });
        Ok(id)
    }

    /// Flip the completion flag of a task. Returns false if the id is unknown.
    pub fn toggle(&mut self, id: u64) -> bool {
        match self.get_mut(id) {
            Some(t) => {
                t.completed = !t.completed;
                true
            }
            None => false,
        }
    }

    /// Remove a task, shifting later tasks down one position. Returns false if
    /// the id is unknown.
    pub fn remove(&mut self, id: u64) -> bool {
        match self.tasks.iter().position(|t| t.id == id) {
            Some(idx) => {
                self.tasks.remove(idx);
                true
            }
            None => false,
        }
    }

    /// Get a task by ID.
    pub fn get(&self, id: u64) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Get a mutable reference to a task by ID.
    pub fn get_mut(&mut self, id: u64) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.id == id)
    }
}

/// Parse human-readable date input.
///
/// Supports:
/// - "today", "tomorrow"
/// - "in 3d", "in 2w"
/// - "YYYY-MM-DD" format
pub fn parse_date_input(s: &str) -> Option<NaiveDate> {
    let s = s.trim().to_lowercase();
    let today = Local::now().date_naive();

    match s.as_str() {
        "today" => return Some(today),
        "tomorrow" => return Some(today + Duration::days(1)),
        _ => {}
    }

    if let Some(rest) = s.strip_prefix("in ") {
        if let Some(nd) = rest.strip_suffix('d') {
            if let Ok(days) = nd.trim().parse::<i64>() {
                return Some(today + Duration::days(days));
            }
        }
        if let Some(nw) = rest.strip_suffix('w') {
            if let Ok(weeks) = nw.trim().parse::<i64>() {
                return Some(today + Duration::weeks(weeks));
            }
        }
    }

    NaiveDate::parse_from_str(&s, "%Y-%m-%d").ok()
}

/// Format a due date relative to today ("today", "tomorrow", "in 3d", "2d late").
pub fn format_due_relative(date: NaiveDate, today: NaiveDate) -> String {
    let delta = date - today;
    if delta.num_days() == 0 {
        "today".into()
    } else if delta.num_days() == 1 {
        "tomorrow".into()
    } else if delta.num_days() > 1 {
        format!("in {}d", delta.num_days())
    } else {
        format!("{}d late", -delta.num_days())
    }
}

/// Print tasks in a formatted table.
pub fn print_table(tasks: &[&Task]) {
    println!("{:<5} {:<5} {:<14} {:<10} {}", "ID", "Done", "Date", "Due", "Task");
    let today = Local::now().date_naive();
    for t in tasks {
        let done = if t.completed { "x" } else { "-" };
        let due = if t.completed {
            "-".to_string()
        } else {
            format_due_relative(t.date, today)
        };
        println!(
            "{:<5} {:<5} {:<14} {:<10} {}",
            t.id,
            done,
            format_task_date(t.date),
            due,
            t.text
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn today() -> NaiveDate {
        Local::now().date_naive()
    }

    #[test]
    fn test_add_appends_incomplete_task() {
        let mut db = Database::default();
        let id = db.add("Buy milk", today()).unwrap();
        assert_eq!(db.tasks.len(), 1);
        let t = db.get(id).unwrap();
        assert_eq!(t.text, "Buy milk");
        assert_eq!(t.date, today());
        assert!(!t.completed);
    }

    #[test]
    fn test_add_trims_and_rejects_empty_text() {
        let mut db = Database::default();
        assert!(db.add("", today()).is_err());
        assert!(db.add("   \t ", today()).is_err());
        assert_eq!(db.tasks.len(), 0);

        let id = db.add("  padded  ", today()).unwrap();
        assert_eq!(db.get(id).unwrap().text, "padded");
    }

    #[test]
    fn test_toggle_is_its_own_inverse() {
        let mut db = Database::default();
        let id = db.add("Water plants", today()).unwrap();
        assert!(db.toggle(id));
        assert!(db.get(id).unwrap().completed);
        assert!(db.toggle(id));
        let t = db.get(id).unwrap();
        assert!(!t.completed);
        assert_eq!(t.text, "Water plants");
        assert_eq!(t.date, today());
    }

    #[test]
    fn test_toggle_and_remove_unknown_id() {
        let mut db = Database::default();
        db.add("One", today()).unwrap();
        assert!(!db.toggle(99));
        assert!(!db.remove(99));
        assert_eq!(db.tasks.len(), 1);
    }

    #[test]
    fn test_remove_shifts_later_tasks_down() {
        let mut db = Database::default();
        let first = db.add("First", today()).unwrap();
        let second = db.add("Second", today()).unwrap();
        assert!(db.remove(first));
        assert_eq!(db.tasks.len(), 1);
        assert_eq!(db.tasks[0].text, "Second");
        // The surviving task keeps responding under its own id.
        assert!(db.toggle(second));
        assert!(db.tasks[0].completed);
        // After a reload, the survivor sits at position 0 with id 1.
        let reloaded = Database::from_tasks(db.tasks.clone());
        assert_eq!(reloaded.tasks[0].id, 1);
        assert_eq!(reloaded.tasks[0].text, "Second");
    }

    #[test]
    fn test_removed_task_never_rendered() {
        let mut db = Database::default();
        let id = db.add("Gone", today()).unwrap();
        db.remove(id);
        assert!(db.get(id).is_none());
        assert!(db.tasks.iter().all(|t| t.text != "Gone"));
    }

    #[test]
    fn test_ids_not_reused_within_a_run() {
        let mut db = Database::default();
        let first = db.add("First", today()).unwrap();
        db.remove(first);
        let second = db.add("Second", today()).unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_save_load_round_trip() {
        let mut db = Database::default();
        db.add("Keep", today()).unwrap();
        db.add("Done", today() + Duration::days(3)).unwrap();
        db.toggle(2);

        let path = std::env::temp_dir().join("todue_round_trip_test.json");
        db.save(&path).unwrap();
        let reloaded = Database::load(&path);
        std::fs::remove_file(&path).ok();

        assert_eq!(reloaded.tasks.len(), db.tasks.len());
        for (a, b) in db.tasks.iter().zip(reloaded.tasks.iter()) {
            assert_eq!(a.id, b.id);
            assert_eq!(a.text, b.text);
            assert_eq!(a.date, b.date);
            assert_eq!(a.completed, b.completed);
        }
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let path = std::env::temp_dir().join("todue_does_not_exist_test.json");
        let db = Database::load(&path);
        assert!(db.tasks.is_empty());
    }

    #[test]
    fn test_load_corrupt_file_is_empty() {
        let path = std::env::temp_dir().join("todue_corrupt_test.json");
        std::fs::write(&path, "not json at all").unwrap();
        let db = Database::load(&path);
        std::fs::remove_file(&path).ok();
        assert!(db.tasks.is_empty());
    }

    #[test]
    fn test_persisted_layout_is_bare_array() {
        let mut db = Database::default();
        db.add("Layout", NaiveDate::from_ymd_opt(2025, 1, 5).unwrap()).unwrap();
        let path = std::env::temp_dir().join("todue_layout_test.json");
        db.save(&path).unwrap();
        let raw = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).ok();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        let arr = value.as_array().unwrap();
        assert_eq!(arr[0]["text"], "Layout");
        assert_eq!(arr[0]["date"], "2025-01-05");
        assert_eq!(arr[0]["completed"], false);
        assert!(arr[0].get("id").is_none());
    }

    #[test]
    fn test_parse_date_input() {
        let today = today();
        assert_eq!(parse_date_input("today"), Some(today));
        assert_eq!(parse_date_input("tomorrow"), Some(today + Duration::days(1)));
        assert_eq!(parse_date_input("in 3d"), Some(today + Duration::days(3)));
        assert_eq!(parse_date_input("in 2w"), Some(today + Duration::weeks(2)));
        assert_eq!(
            parse_date_input("2025-01-05"),
            NaiveDate::from_ymd_opt(2025, 1, 5)
        );
        assert_eq!(parse_date_input("next sprint"), None);
    }

    #[test]
    fn test_format_due_relative() {
        let today = today();
        assert_eq!(format_due_relative(today, today), "today");
        assert_eq!(format_due_relative(today + Duration::days(1), today), "tomorrow");
        assert_eq!(format_due_relative(today + Duration::days(5), today), "in 5d");
        assert_eq!(format_due_relative(today - Duration::days(2), today), "2d late");
    }
}
