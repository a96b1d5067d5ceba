//! Reusable UTF-8 safe text input state with cursor management.
//!
//! Used by the personal-info fields and the checkout payment-id prompt.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use unicode_width::UnicodeWidthStr;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TextInputState {
    /// The underlying text buffer
    input: String,
    /// Cursor byte index into `input` (always on a UTF-8 boundary)
    cursor: usize,
}

impl TextInputState {
    pub fn new() -> Self {
        Self::default()
    }

    // ----- Getters -----
    pub fn input(&self) -> &str {
        &self.input
    }
    pub fn is_empty(&self) -> bool {
        self.input.trim().is_empty()
    }

    /// Terminal column of the cursor relative to the start of the input.
    pub fn cursor_column(&self) -> u16 {
        self.input[..self.cursor].width() as u16
    }

    // ----- Setters -----

    /// Replace the buffer and park the cursor at the end.
    #[cfg(test)]
    pub fn set_input<S: Into<String>>(&mut self, s: S) {
        self.input = s.into();
        self.cursor = self.input.len();
    }

    // ----- Editing primitives (UTF-8 safe) -----

    /// Move cursor one Unicode scalar to the left.
    pub fn move_left(&mut self) {
        if self.cursor == 0 {
            return;
        }
        let prev_len = self.input[..self.cursor].chars().last().map(|c| c.len_utf8()).unwrap_or(1);
        self.cursor = self.cursor.saturating_sub(prev_len);
    }

    /// Move cursor one Unicode scalar to the right.
    pub fn move_right(&mut self) {
        if let Some(next) = self.input[self.cursor..].chars().next() {
            self.cursor += next.len_utf8();
        }
    }

    pub fn insert_char(&mut self, c: char) {
        self.input.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    /// Backspace the char immediately before the cursor.
    pub fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        let prev = self.input[..self.cursor].chars().last().map(|c| c.len_utf8()).unwrap_or(1);
        let start = self.cursor - prev;
        self.input.drain(start..self.cursor);
        self.cursor = start;
    }

    pub fn delete(&mut self) {
        if let Some(next) = self.input[self.cursor..].chars().next() {
            self.input.drain(self.cursor..self.cursor + next.len_utf8());
        }
    }

    /// Apply an editing key. Returns whether the buffer or cursor changed.
    pub fn handle_edit_key(&mut self, key: KeyEvent) -> bool {
        let before = (self.input.len(), self.cursor);
        match key.code {
            KeyCode::Char(c) if !key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) => {
                self.insert_char(c);
                return true;
            }
            KeyCode::Backspace => self.backspace(),
            KeyCode::Delete => self.delete(),
            KeyCode::Left => self.move_left(),
            KeyCode::Right => self.move_right(),
            KeyCode::Home => self.cursor = 0,
            KeyCode::End => self.cursor = self.input.len(),
            _ => return false,
        }
        before != (self.input.len(), self.cursor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn utf8_move_insert_backspace() {
        let mut st = TextInputState::new();
        st.set_input("h🙂llo"); // emoji is 4 bytes
        for _ in 0..4 {
            st.move_left(); // back to between h and 🙂
        }
        st.insert_char('e');
        assert_eq!(st.input(), "he🙂llo");
        st.move_right(); // step over 🙂
        st.backspace(); // delete 🙂
        assert_eq!(st.input(), "hello");
        st.move_left();
        st.backspace();
        assert_eq!(st.input(), "ello");
    }

    #[test]
    fn edit_keys_ignore_control_chords() {
        let mut st = TextInputState::new();
        assert!(st.handle_edit_key(KeyEvent::from(KeyCode::Char('a'))));
        assert!(!st.handle_edit_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)));
        assert!(st.handle_edit_key(KeyEvent::from(KeyCode::Home)));
        st.delete();
        assert!(st.input().is_empty());
        assert!(!st.handle_edit_key(KeyEvent::from(KeyCode::Tab)));
    }

    #[test]
    fn cursor_column_uses_display_width() {
        let mut st = TextInputState::new();
        st.set_input("né");
        assert_eq!(st.cursor_column(), 2);
        st.set_input("名前");
        assert_eq!(st.cursor_column(), 4);
    }
}
