//! Color constants for the terminal user interface.

use ratatui::style::Color;

// Row colors mirror the visual state classes of the list:
// completed and overdue are mutually exclusive.

/// Used for overdue tasks
pub const OVERDUE_RED: Color = Color::Rgb(200, 60, 60);
/// Used for completed tasks
pub const DONE_GRAY: Color = Color::Rgb(110, 110, 110);
/// Header and filter bar accent
pub const ACCENT_BLUE: Color = Color::Rgb(60, 90, 160);
