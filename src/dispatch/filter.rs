//! Filter buffer: the single-line editor behind the process filter.

use crate::input::{EscapeCode, KeyEvent};

/// Text being typed into the process filter, with a cursor.
///
/// Only printable ASCII is accepted, so byte offsets are char offsets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterBuffer {
    text: String,
    cursor: usize,
}

impl FilterBuffer {
    /// Start editing `text` with the cursor at the end.
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let cursor = text.len();
        Self { text, cursor }
    }

    /// Current text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Cursor position (byte offset).
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    /// Apply an editing key.
    ///
    /// Returns `false` if the key is not an editing key. Returns `true` for
    /// editing keys even if they changed nothing (e.g. backspace at 0).
    pub fn command(&mut self, key: KeyEvent) -> bool {
        match key {
            KeyEvent::Char(c) => self.insert(c),
            KeyEvent::Named(EscapeCode::Space) => self.insert(b' '),
            KeyEvent::Named(EscapeCode::Backspace) => {
                if self.cursor > 0 {
                    self.cursor -= 1;
                    self.text.remove(self.cursor);
                }
            }
            KeyEvent::Named(EscapeCode::Delete) => {
                if self.cursor < self.text.len() {
                    self.text.remove(self.cursor);
                }
            }
            KeyEvent::Named(EscapeCode::ArrowLeft) => self.cursor = self.cursor.saturating_sub(1),
            KeyEvent::Named(EscapeCode::ArrowRight) => {
                self.cursor = (self.cursor + 1).min(self.text.len());
            }
            KeyEvent::Named(EscapeCode::Home) => self.cursor = 0,
            KeyEvent::Named(EscapeCode::End) => self.cursor = self.text.len(),
            _ => return false,
        }
        true
    }

    fn insert(&mut self, c: u8) {
        if (0x20..=0x7E).contains(&c) {
            self.text.insert(self.cursor, char::from(c));
            self.cursor += 1;
        }
    }
}
