//! Main application logic for the terminal user interface.
//!
//! This module contains the `App` struct which manages the TUI state, handles
//! user input, renders the task list, and drives the store. Every mutating
//! action saves the store and fully rebuilds the visible list before the next
//! event is processed.

use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::Local;
use crossterm::event::{self, Event, KeyCode, KeyModifiers};
use ratatui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Wrap},
    Frame, Terminal,
};

use crate::db::{format_due_relative, parse_date_input, Database};
use crate::filter::{self, format_task_date, Filter, EMPTY_FILTER_MSG, EMPTY_STORE_MSG};
use crate::task::Task;
use crate::tui::colors::{ACCENT_BLUE, DONE_GRAY, OVERDUE_RED};
use crate::tui::input::InputField;
use crate::tui::utils::centered_rect;

/// Application state for the terminal user interface.
#[derive(Clone, Copy, PartialEq)]
enum AppState {
    TaskList,
    AddTask,
    Confirm,
    Help,
}

/// Which field of the add form has focus.
#[derive(Clone, Copy, PartialEq)]
enum FormField {
    Text,
    Date,
}

/// Main application state for the terminal user interface.
///
/// Owns the store, the active view filter and the add-form inputs. The
/// visible list is a sequence of task ids; actions always address the store
/// by id, never by row position, so an active filter can never redirect a
/// toggle or delete onto the wrong task.
pub struct App {
    state: AppState,
    db: Database,
    store_path: PathBuf,
    list_state: TableState,
    visible: Vec<u64>,
    filter: Filter,
    text_input: InputField,
    date_input: InputField,
    form_focus: FormField,
    status_message: String,
    confirm_delete: Option<u64>,
}

impl App {
    /// Create a new App instance, loading the store from the specified path.
    pub fn new(store_path: &Path) -> io::Result<Self> {
        let db = Database::load(store_path);
        let mut app = App {
            state: AppState::TaskList,
            db,
            store_path: store_path.to_path_buf(),
            list_state: TableState::default(),
            visible: Vec::new(),
            filter: Filter::All,
            text_input: InputField::new(),
            date_input: InputField::new(),
            form_focus: FormField::Text,
            status_message: String::new(),
            confirm_delete: None,
        };
        app.update_visible();
        Ok(app)
    }

    /// Save the store to disk.
    fn save_db(&mut self) -> io::Result<()> {
        self.db.save(&self.store_path)
    }

    /// Rebuild the visible id list from the current filter, recomputing
    /// "today" so overdue classification tracks the wall clock. Preserves the
    /// selection by id where possible.
    fn update_visible(&mut self) {
        let old_selected = self
            .list_state
            .selected()
            .and_then(|idx| self.visible.get(idx))
            .copied();

        let today = Local::now().date_naive();
        self.visible = filter::apply(&self.db.tasks, self.filter, today)
            .iter()
            .map(|t| t.id)
            .collect();

        if self.visible.is_empty() {
            self.list_state.select(None);
            return;
        }
        let idx = old_selected
            .and_then(|id| self.visible.iter().position(|&v| v == id))
            .unwrap_or(0);
        self.list_state.select(Some(idx.min(self.visible.len() - 1)));
    }

    fn selected_id(&self) -> Option<u64> {
        self.list_state
            .selected()
            .and_then(|idx| self.visible.get(idx))
            .copied()
    }

    fn set_status_message(&mut self, msg: String) {
        self.status_message = msg;
    }

    fn select_next(&mut self) {
        if self.visible.is_empty() {
            return;
        }
        let next = match self.list_state.selected() {
            Some(i) if i + 1 < self.visible.len() => i + 1,
            Some(i) => i,
            None => 0,
        };
        self.list_state.select(Some(next));
    }

    fn select_prev(&mut self) {
        if self.visible.is_empty() {
            return;
        }
        let prev = self.list_state.selected().map_or(0, |i| i.saturating_sub(1));
        self.list_state.select(Some(prev));
    }

    fn set_filter(&mut self, filter: Filter) {
        self.filter = filter;
        self.update_visible();
    }

    /// Open the add form with the date field prefilled with today.
    fn open_add_form(&mut self) {
        let today = Local::now().date_naive();
        self.text_input.clear();
        self.date_input.set(&today.format("%Y-%m-%d").to_string());
        self.form_focus = FormField::Text;
        self.state = AppState::AddTask;
    }

    /// Validate and submit the add form. On success the form stays open with
    /// cleared text and the date reset to today, for rapid entry.
    fn submit_add_form(&mut self) -> io::Result<()> {
        let today = Local::now().date_naive();
        let date = if self.date_input.value.trim().is_empty() {
            today
        } else {
            match parse_date_input(&self.date_input.value) {
                Some(d) => d,
                None => {
                    self.set_status_message(format!(
                        "Unrecognised date: '{}'",
                        self.date_input.value
                    ));
                    return Ok(());
                }
            }
        };
        if date < today {
            self.set_status_message("Due date cannot be before today".to_string());
            return Ok(());
        }

        match self.db.add(&self.text_input.value, date) {
            Ok(id) => {
                self.save_db()?;
                self.update_visible();
                self.text_input.clear();
                self.date_input.set(&today.format("%Y-%m-%d").to_string());
                self.form_focus = FormField::Text;
                self.set_status_message(format!("Added task {id}"));
            }
            Err(msg) => self.set_status_message(msg),
        }
        Ok(())
    }

    fn toggle_selected(&mut self) -> io::Result<()> {
        if let Some(id) = self.selected_id() {
            self.db.toggle(id);
            self.save_db()?;
            self.update_visible();
        }
        Ok(())
    }

    fn delete_confirmed(&mut self) -> io::Result<()> {
        if let Some(id) = self.confirm_delete.take() {
            if self.db.remove(id) {
                self.save_db()?;
                self.update_visible();
                self.set_status_message(format!("Deleted task {id}"));
            }
        }
        Ok(())
    }

    fn handle_task_list_input(
        &mut self,
        key: KeyCode,
        _modifiers: KeyModifiers,
    ) -> io::Result<bool> {
        match key {
            KeyCode::Char('q') | KeyCode::Esc => return Ok(true),
            KeyCode::Char('a') | KeyCode::Char('n') => self.open_add_form(),
            KeyCode::Char(' ') | KeyCode::Enter => self.toggle_selected()?,
            KeyCode::Char('d') | KeyCode::Delete => {
                if let Some(id) = self.selected_id() {
                    self.confirm_delete = Some(id);
                    self.state = AppState::Confirm;
                }
            }
            KeyCode::Tab | KeyCode::Char('f') => self.set_filter(self.filter.next()),
            KeyCode::Char('1') => self.set_filter(Filter::All),
            KeyCode::Char('2') => self.set_filter(Filter::Active),
            KeyCode::Char('3') => self.set_filter(Filter::Completed),
            KeyCode::Char('4') => self.set_filter(Filter::Overdue),
            KeyCode::Down | KeyCode::Char('j') => self.select_next(),
            KeyCode::Up | KeyCode::Char('k') => self.select_prev(),
            KeyCode::Char('h') => self.state = AppState::Help,
            _ => {}
        }
        Ok(false)
    }

    fn handle_form_input(&mut self, key: KeyCode, _modifiers: KeyModifiers) -> io::Result<bool> {
        match key {
            KeyCode::Esc => {
                self.state = AppState::TaskList;
                self.update_visible();
            }
            KeyCode::Enter => self.submit_add_form()?,
            KeyCode::Tab | KeyCode::Down | KeyCode::Up => {
                self.form_focus = match self.form_focus {
                    FormField::Text => FormField::Date,
                    FormField::Date => FormField::Text,
                };
            }
            other => {
                let input = match self.form_focus {
                    FormField::Text => &mut self.text_input,
                    FormField::Date => &mut self.date_input,
                };
                match other {
                    KeyCode::Char(c) => input.handle_char(c),
                    KeyCode::Backspace => input.handle_backspace(),
                    KeyCode::Delete => input.handle_delete(),
                    KeyCode::Left => input.move_cursor_left(),
                    KeyCode::Right => input.move_cursor_right(),
                    _ => {}
                }
            }
        }
        Ok(false)
    }

    fn handle_confirm_input(&mut self, key: KeyCode, _modifiers: KeyModifiers) -> io::Result<bool> {
        match key {
            KeyCode::Char('y') | KeyCode::Char('Y') => {
                self.delete_confirmed()?;
                self.state = AppState::TaskList;
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                self.confirm_delete = None;
                self.state = AppState::TaskList;
            }
            _ => {}
        }
        Ok(false)
    }

    fn handle_help_input(&mut self, key: KeyCode, _modifiers: KeyModifiers) -> io::Result<bool> {
        if !matches!(key, KeyCode::Null) {
            self.state = AppState::TaskList;
        }
        Ok(false)
    }

    fn handle_input(&mut self) -> io::Result<bool> {
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                self.status_message.clear();

                let should_quit = match self.state {
                    AppState::TaskList => self.handle_task_list_input(key.code, key.modifiers)?,
                    AppState::AddTask => self.handle_form_input(key.code, key.modifiers)?,
                    AppState::Confirm => self.handle_confirm_input(key.code, key.modifiers)?,
                    AppState::Help => self.handle_help_input(key.code, key.modifiers)?,
                };
                if should_quit {
                    return Ok(true);
                }
            }
        }
        Ok(false)
    }

    /// Render the filter bar showing the four views with the active one
    /// highlighted.
    fn render_filter_bar(&self, f: &mut Frame, area: Rect) {
        let mut spans = vec![Span::raw(" ")];
        for (i, flt) in Filter::ALL.iter().enumerate() {
            let label = format!(" {} {} ", i + 1, flt.label());
            let style = if *flt == self.filter {
                Style::default()
                    .bg(ACCENT_BLUE)
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Gray)
            };
            spans.push(Span::styled(label, style));
            spans.push(Span::raw(" "));
        }
        let bar = Paragraph::new(Line::from(spans))
            .block(Block::default().borders(Borders::ALL).title("Filter"));
        f.render_widget(bar, area);
    }

    /// Render the main task list view.
    fn render_task_list(&mut self, f: &mut Frame, area: Rect) {
        let today = Local::now().date_naive();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0)])
            .split(area);

        self.render_filter_bar(f, chunks[0]);

        let list_block = Block::default().borders(Borders::ALL).title(format!(
            "Tasks ({}/{}) - Press 'h' for help",
            self.visible.len(),
            self.db.tasks.len()
        ));

        // Distinct placeholders: an empty store reads differently from a
        // filter that matched nothing.
        if self.db.tasks.is_empty() || self.visible.is_empty() {
            let msg = if self.db.tasks.is_empty() {
                EMPTY_STORE_MSG
            } else {
                EMPTY_FILTER_MSG
            };
            let placeholder = Paragraph::new(vec![Line::from(""), Line::from(msg)])
                .block(list_block)
                .alignment(Alignment::Center)
                .style(Style::default().fg(Color::DarkGray));
            f.render_widget(placeholder, chunks[1]);
            return;
        }

        let header_cells = ["ID", "", "Task", "Date", "Due"]
            .iter()
            .map(|h| Cell::from(*h).style(Style::default().add_modifier(Modifier::BOLD)));
        let header = Row::new(header_cells)
            .style(Style::default().bg(ACCENT_BLUE).fg(Color::White))
            .height(1);

        let rows: Vec<Row> = self
            .visible
            .iter()
            .filter_map(|&id| self.db.get(id))
            .map(|task| self.task_row(task, today))
            .collect();

        let widths = [
            Constraint::Length(4),  // ID
            Constraint::Length(2),  // State marker
            Constraint::Min(25),    // Task
            Constraint::Length(14), // Date
            Constraint::Length(10), // Due
        ];

        let table = Table::new(rows, widths)
            .header(header)
            .block(list_block)
            .row_highlight_style(Style::default().bg(Color::Gray).fg(Color::Black))
            .highlight_symbol(">> ");

        f.render_stateful_widget(table, chunks[1], &mut self.list_state);
    }

    /// Build the table row for a single task, with the completed / overdue
    /// visual state.
    fn task_row(&self, task: &Task, today: chrono::NaiveDate) -> Row<'static> {
        let overdue = filter::is_overdue(task, today);
        let (marker, style) = if task.completed {
            (
                "x",
                Style::default()
                    .fg(DONE_GRAY)
                    .add_modifier(Modifier::CROSSED_OUT),
            )
        } else if overdue {
            ("!", Style::default().fg(OVERDUE_RED))
        } else {
            (" ", Style::default().fg(Color::White))
        };

        let due = if task.completed {
            "-".to_string()
        } else {
            format_due_relative(task.date, today)
        };

        Row::new(vec![
            Cell::from(task.id.to_string()),
            Cell::from(marker),
            Cell::from(task.text.clone()),
            Cell::from(format_task_date(task.date)),
            Cell::from(due),
        ])
        .style(style)
    }

    /// Render the add-task form as a centered overlay.
    fn render_add_form(&mut self, f: &mut Frame, area: Rect) {
        self.render_task_list(f, area);

        let popup = centered_rect(60, 40, area);
        f.render_widget(Clear, popup);

        let outer = Block::default().borders(Borders::ALL).title("Add Task");
        let inner = outer.inner(popup);
        f.render_widget(outer, popup);

        let fields = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Min(0),
            ])
            .split(inner);

        let field_style = |focused: bool| {
            if focused {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default()
            }
        };

        let text_focused = self.form_focus == FormField::Text;
        let text = Paragraph::new(self.text_input.value.as_str()).block(
            Block::default()
                .borders(Borders::ALL)
                .title("Task")
                .border_style(field_style(text_focused)),
        );
        f.render_widget(text, fields[0]);

        let date_focused = self.form_focus == FormField::Date;
        let date = Paragraph::new(self.date_input.value.as_str()).block(
            Block::default()
                .borders(Borders::ALL)
                .title("Due date (YYYY-MM-DD, today, tomorrow, in Nd)")
                .border_style(field_style(date_focused)),
        );
        f.render_widget(date, fields[1]);

        let hint = Paragraph::new("Enter to add, Tab to switch field, Esc to close")
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center);
        f.render_widget(hint, fields[2]);

        let (field_area, cursor) = if text_focused {
            (fields[0], self.text_input.cursor_chars())
        } else {
            (fields[1], self.date_input.cursor_chars())
        };
        f.set_cursor_position((field_area.x + 1 + cursor as u16, field_area.y + 1));
    }

    /// Render a confirmation dialog for deletion.
    fn render_confirm(&mut self, f: &mut Frame, area: Rect) {
        let task_text = self
            .confirm_delete
            .and_then(|id| self.db.get(id))
            .map(|t| t.text.clone())
            .unwrap_or_default();

        let block = Block::default()
            .title("Confirm Delete")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(OVERDUE_RED));

        let area = centered_rect(50, 20, area);
        f.render_widget(Clear, area);

        let text = vec![
            Line::from(""),
            Line::from(vec![Span::styled(
                "Delete this task?",
                Style::default().add_modifier(Modifier::BOLD),
            )]),
            Line::from(task_text),
            Line::from(""),
            Line::from("Press 'y' to confirm, 'n' to cancel"),
        ];

        let paragraph = Paragraph::new(text)
            .block(block)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });

        f.render_widget(paragraph, area);
    }

    /// Render the help screen.
    fn render_help(&mut self, f: &mut Frame, area: Rect) {
        let text = vec![
            Line::from(""),
            Line::from(Span::styled(
                "Key bindings",
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from("  a / n        Add a task"),
            Line::from("  Space/Enter  Toggle complete"),
            Line::from("  d            Delete (with confirm)"),
            Line::from("  Tab / f      Cycle filter"),
            Line::from("  1-4          All / Active / Completed / Overdue"),
            Line::from("  j/k or ↑↓    Move selection"),
            Line::from("  q / Esc      Quit"),
            Line::from(""),
            Line::from("Press any key to return"),
        ];
        let help = Paragraph::new(text)
            .block(Block::default().borders(Borders::ALL).title("Help"))
            .alignment(Alignment::Left);
        f.render_widget(help, area);
    }

    /// Render the status bar at the bottom of the screen.
    fn render_status_bar(&mut self, f: &mut Frame, area: Rect) {
        let status_text = if !self.status_message.is_empty() {
            self.status_message.clone()
        } else {
            match self.state {
                AppState::TaskList => format!(
                    "View: {} | Tasks: {} | Press 'h' for help",
                    self.filter.label(),
                    self.visible.len()
                ),
                AppState::AddTask => "Add New Task".to_string(),
                AppState::Confirm => "Confirm Delete".to_string(),
                AppState::Help => "Help".to_string(),
            }
        };

        let status = Paragraph::new(status_text)
            .style(Style::default().bg(ACCENT_BLUE).fg(Color::White))
            .alignment(Alignment::Left);

        f.render_widget(status, area);
    }

    /// Main render function that dispatches to appropriate view renderers.
    fn render(&mut self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)].as_ref())
            .split(f.area());

        match self.state {
            AppState::TaskList => self.render_task_list(f, chunks[0]),
            AppState::AddTask => self.render_add_form(f, chunks[0]),
            AppState::Help => self.render_help(f, chunks[0]),
            AppState::Confirm => {
                self.render_task_list(f, chunks[0]);
                self.render_confirm(f, chunks[0]);
            }
        }

        self.render_status_bar(f, chunks[1]);
    }

    /// Main event loop for the TUI application.
    ///
    /// Handles rendering and input processing until the user exits.
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            // Recompute the view each frame: overdue is clock-driven and can
            // change without a mutation.
            if self.state == AppState::TaskList {
                self.update_visible();
            }
            terminal.draw(|f| self.render(f))?;

            if self.handle_input()? {
                break;
            }
        }
        Ok(())
    }
}
