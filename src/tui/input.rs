//! Input field handling for the terminal user interface.

/// A single-line text input with cursor position management.
///
/// The cursor is a byte offset into `value` and always sits on a char
/// boundary; edits and cursor moves step by whole characters so multibyte
/// input is safe.
#[derive(Clone, Default)]
pub struct InputField {
    pub value: String,
    cursor: usize,
}

impl InputField {
    /// Create a new empty input field.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the field contents, placing the cursor at the end.
    pub fn set(&mut self, value: &str) {
        self.value = value.to_string();
        self.cursor = value.len();
    }

    /// Clear the field.
    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor = 0;
    }

    /// Cursor position in characters, for on-screen column placement.
    pub fn cursor_chars(&self) -> usize {
        self.value[..self.cursor].chars().count()
    }

    /// Byte offset of the character before the cursor, if any.
    fn prev_boundary(&self) -> Option<usize> {
        self.value[..self.cursor]
            .char_indices()
            .next_back()
            .map(|(i, _)| i)
    }

    /// Insert a character at the current cursor position.
    pub fn handle_char(&mut self, c: char) {
        self.value.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    /// Delete the character before the cursor.
    pub fn handle_backspace(&mut self) {
        if let Some(prev) = self.prev_boundary() {
            self.value.remove(prev);
            self.cursor = prev;
        }
    }

    /// Delete the character at the cursor position.
    pub fn handle_delete(&mut self) {
        if self.cursor < self.value.len() {
            self.value.remove(self.cursor);
        }
    }

    /// Move cursor one character to the left.
    pub fn move_cursor_left(&mut self) {
        if let Some(prev) = self.prev_boundary() {
            self.cursor = prev;
        }
    }

    /// Move cursor one character to the right.
    pub fn move_cursor_right(&mut self) {
        if let Some(c) = self.value[self.cursor..].chars().next() {
            self.cursor += c.len_utf8();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typing_after_multibyte_char() {
        let mut input = InputField::new();
        input.handle_char('é');
        input.handle_char('s');
        assert_eq!(input.value, "és");
        assert_eq!(input.cursor_chars(), 2);
    }

    #[test]
    fn test_backspace_removes_whole_multibyte_char() {
        let mut input = InputField::new();
        input.set("café");
        input.handle_backspace();
        assert_eq!(input.value, "caf");
        input.handle_char('e');
        assert_eq!(input.value, "cafe");
    }

    #[test]
    fn test_cursor_moves_by_whole_chars() {
        let mut input = InputField::new();
        input.set("aé");
        input.move_cursor_left();
        assert_eq!(input.cursor_chars(), 1);
        input.move_cursor_left();
        assert_eq!(input.cursor_chars(), 0);
        input.move_cursor_left();
        assert_eq!(input.cursor_chars(), 0);
        input.move_cursor_right();
        assert_eq!(input.cursor_chars(), 1);
        input.handle_delete();
        assert_eq!(input.value, "a");
    }

    #[test]
    fn test_insert_mid_string_before_multibyte_char() {
        let mut input = InputField::new();
        input.set("né");
        input.move_cursor_left();
        input.handle_char('o');
        assert_eq!(input.value, "noé");
        assert_eq!(input.cursor_chars(), 2);
    }
}
