//! View filters and derived task classification.
//!
//! Filtering is pure: it takes the task sequence and a `today` date and
//! derives the visible view, preserving insertion order. "today" is supplied
//! by the caller at each render, so a task can drift into the overdue view
//! between renders without any mutation.

use chrono::NaiveDate;
use clap::ValueEnum;

use crate::task::Task;

/// Placeholder shown when there are no tasks at all.
pub const EMPTY_STORE_MSG: &str = "No tasks yet";
/// Placeholder shown when tasks exist but none match the active filter.
pub const EMPTY_FILTER_MSG: &str = "No tasks match this filter";

/// View filters over the task list. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq, Default)]
pub enum Filter {
    #[default]
    All,
    Active,
    Completed,
    Overdue,
}

impl Filter {
    pub const ALL: [Filter; 4] = [Filter::All, Filter::Active, Filter::Completed, Filter::Overdue];

    /// The next filter in display order, wrapping around.
    pub fn next(self) -> Filter {
        match self {
            Filter::All => Filter::Active,
            Filter::Active => Filter::Completed,
            Filter::Completed => Filter::Overdue,
            Filter::Overdue => Filter::All,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Filter::All => "All",
            Filter::Active => "Active",
            Filter::Completed => "Completed",
            Filter::Overdue => "Overdue",
        }
    }
}

/// Whether a task is overdue as of `today`: due strictly before the start of
/// the current day and not completed.
pub fn is_overdue(task: &Task, today: NaiveDate) -> bool {
    !task.completed && task.date < today
}

/// Whether a task belongs to the given filter's view as of `today`.
pub fn matches(task: &Task, filter: Filter, today: NaiveDate) -> bool {
    match filter {
        Filter::All => true,
        Filter::Active => !task.completed && task.date >= today,
        Filter::Completed => task.completed,
        Filter::Overdue => is_overdue(task, today),
    }
}

/// Derive the visible view for a filter, preserving insertion order.
pub fn apply(tasks: &[Task], filter: Filter, today: NaiveDate) -> Vec<&Task> {
    tasks.iter().filter(|t| matches(t, filter, today)).collect()
}

/// Format a task date for display, e.g. "Jan 5, 2025".
pub fn format_task_date(date: NaiveDate) -> String {
    date.format("%b %-d, %Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn task(text: &str, date: NaiveDate, completed: bool) -> Task {
        Task {
            id: 0,
            text: text.to_string(),
            date,
            completed,
        }
    }

    fn fixed_today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 15).unwrap()
    }

    #[test]
    fn test_every_task_in_exactly_one_classified_view() {
        let today = fixed_today();
        let tasks = vec![
            task("due today", today, false),
            task("due later", today + Duration::days(7), false),
            task("late", today - Duration::days(1), false),
            task("done on time", today, true),
            task("done late", today - Duration::days(3), true),
        ];
        for t in &tasks {
            let classified = [Filter::Active, Filter::Completed, Filter::Overdue]
                .iter()
                .filter(|&&f| matches(t, f, today))
                .count();
            assert_eq!(classified, 1, "task {:?} not in exactly one view", t.text);
            assert!(matches(t, Filter::All, today));
        }
        let visible: usize = [Filter::Active, Filter::Completed, Filter::Overdue]
            .iter()
            .map(|&f| apply(&tasks, f, today).len())
            .sum();
        assert_eq!(visible, tasks.len());
    }

    #[test]
    fn test_all_preserves_insertion_order() {
        let today = fixed_today();
        let tasks = vec![
            task("a", today, true),
            task("b", today - Duration::days(1), false),
            task("c", today, false),
        ];
        let view = apply(&tasks, Filter::All, today);
        let texts: Vec<&str> = view.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, ["a", "b", "c"]);
    }

    #[test]
    fn test_fresh_task_is_active_only() {
        let today = fixed_today();
        let tasks = vec![task("Buy milk", today, false)];
        assert_eq!(apply(&tasks, Filter::All, today).len(), 1);
        assert_eq!(apply(&tasks, Filter::Active, today).len(), 1);
        assert!(apply(&tasks, Filter::Completed, today).is_empty());
        assert!(apply(&tasks, Filter::Overdue, today).is_empty());
    }

    #[test]
    fn test_yesterday_task_is_overdue_only() {
        let today = fixed_today();
        let tasks = vec![task("Old task", today - Duration::days(1), false)];
        assert_eq!(apply(&tasks, Filter::Overdue, today).len(), 1);
        assert_eq!(apply(&tasks, Filter::All, today).len(), 1);
        assert!(apply(&tasks, Filter::Active, today).is_empty());
        assert!(apply(&tasks, Filter::Completed, today).is_empty());
    }

    #[test]
    fn test_completed_task_leaves_active_and_overdue() {
        let today = fixed_today();
        let tasks = vec![task("Late but done", today - Duration::days(2), true)];
        assert_eq!(apply(&tasks, Filter::Completed, today).len(), 1);
        assert_eq!(apply(&tasks, Filter::All, today).len(), 1);
        assert!(apply(&tasks, Filter::Active, today).is_empty());
        assert!(apply(&tasks, Filter::Overdue, today).is_empty());
    }

    #[test]
    fn test_overdue_flips_with_the_clock() {
        let date = fixed_today();
        let t = task("drifts", date, false);
        assert!(!is_overdue(&t, date));
        assert!(is_overdue(&t, date + Duration::days(1)));
    }

    #[test]
    fn test_filter_cycle_wraps() {
        let mut f = Filter::All;
        for _ in 0..4 {
            f = f.next();
        }
        assert_eq!(f, Filter::All);
    }

    #[test]
    fn test_format_task_date() {
        assert_eq!(
            format_task_date(NaiveDate::from_ymd_opt(2025, 1, 5).unwrap()),
            "Jan 5, 2025"
        );
        assert_eq!(
            format_task_date(NaiveDate::from_ymd_opt(2024, 12, 31).unwrap()),
            "Dec 31, 2024"
        );
    }
}
