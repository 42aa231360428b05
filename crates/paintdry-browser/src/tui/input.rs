//! Single-line text input for the search box

use crossterm::event::{KeyCode, KeyModifiers};

/// What a key press did to the input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputChange {
    Ignored,
    /// Consumed without changing the text
    Moved,
    Edited,
}

#[derive(Debug, Default, Clone)]
pub struct TextInput {
    pub text: String,
    /// Byte offset, always on a char boundary
    pub cursor: usize,
}

impl TextInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_char(&mut self, c: char) {
        self.text.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    pub fn delete_char_before(&mut self) -> bool {
        match self.prev_boundary() {
            Some(prev) => {
                self.text.drain(prev..self.cursor);
                self.cursor = prev;
                true
            }
            None => false,
        }
    }

    pub fn delete_char_at(&mut self) -> bool {
        match self.next_boundary() {
            Some(next) => {
                self.text.drain(self.cursor..next);
                true
            }
            None => false,
        }
    }

    pub fn move_left(&mut self) {
        if let Some(prev) = self.prev_boundary() {
            self.cursor = prev;
        }
    }

    pub fn move_right(&mut self) {
        if let Some(next) = self.next_boundary() {
            self.cursor = next;
        }
    }

    /// Delete back to the start of the previous word
    pub fn delete_word_before(&mut self) -> bool {
        let before = &self.text[..self.cursor];
        let trimmed = before.trim_end();
        let start = trimmed
            .char_indices()
            .rev()
            .find(|(_, c)| c.is_whitespace())
            .map(|(i, c)| i + c.len_utf8())
            .unwrap_or(0);
        if start == self.cursor {
            return false;
        }
        self.text.drain(start..self.cursor);
        self.cursor = start;
        true
    }

    pub fn clear(&mut self) -> bool {
        let had_text = !self.text.is_empty();
        self.text.clear();
        self.cursor = 0;
        had_text
    }

    fn prev_boundary(&self) -> Option<usize> {
        self.text[..self.cursor].char_indices().next_back().map(|(i, _)| i)
    }

    fn next_boundary(&self) -> Option<usize> {
        self.text[self.cursor..]
            .chars()
            .next()
            .map(|c| self.cursor + c.len_utf8())
    }

    pub fn handle_key(&mut self, code: KeyCode, modifiers: KeyModifiers) -> InputChange {
        let has_ctrl = modifiers.contains(KeyModifiers::CONTROL);
        let has_alt = modifiers.contains(KeyModifiers::ALT);

        let edited = match code {
            KeyCode::Char('u') if has_ctrl => self.clear(),
            KeyCode::Char('w') if has_ctrl => self.delete_word_before(),
            KeyCode::Backspace if has_alt => self.delete_word_before(),
            KeyCode::Backspace => self.delete_char_before(),
            KeyCode::Delete => self.delete_char_at(),
            KeyCode::Char(c) if !has_ctrl && !has_alt => {
                self.insert_char(c);
                true
            }
            KeyCode::Char('a') if has_ctrl => {
                self.cursor = 0;
                return InputChange::Moved;
            }
            KeyCode::Home => {
                self.cursor = 0;
                return InputChange::Moved;
            }
            KeyCode::Char('e') if has_ctrl => {
                self.cursor = self.text.len();
                return InputChange::Moved;
            }
            KeyCode::End => {
                self.cursor = self.text.len();
                return InputChange::Moved;
            }
            KeyCode::Left if !has_alt => {
                self.move_left();
                return InputChange::Moved;
            }
            KeyCode::Right if !has_alt => {
                self.move_right();
                return InputChange::Moved;
            }
            _ => return InputChange::Ignored,
        };

        if edited {
            InputChange::Edited
        } else {
            InputChange::Moved
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn typed(text: &str) -> TextInput {
        let mut input = TextInput::new();
        for c in text.chars() {
            input.handle_key(KeyCode::Char(c), KeyModifiers::NONE);
        }
        input
    }

    #[test]
    fn test_typing_and_backspace() {
        let mut input = typed("héllo");
        assert_eq!(input.text, "héllo");
        assert_eq!(
            input.handle_key(KeyCode::Backspace, KeyModifiers::NONE),
            InputChange::Edited
        );
        input.move_left();
        input.move_left();
        input.handle_key(KeyCode::Backspace, KeyModifiers::NONE);
        assert_eq!(input.text, "hll");
        assert_eq!(input.cursor, 1);
    }

    #[test]
    fn test_empty_edits_are_not_edits() {
        let mut input = TextInput::new();
        assert_eq!(
            input.handle_key(KeyCode::Backspace, KeyModifiers::NONE),
            InputChange::Moved
        );
        assert_eq!(
            input.handle_key(KeyCode::Char('u'), KeyModifiers::CONTROL),
            InputChange::Moved
        );
        assert_eq!(
            input.handle_key(KeyCode::Tab, KeyModifiers::NONE),
            InputChange::Ignored
        );
    }

    #[test]
    fn test_delete_word() {
        let mut input = typed("dns example.com  ");
        assert_eq!(
            input.handle_key(KeyCode::Char('w'), KeyModifiers::CONTROL),
            InputChange::Edited
        );
        assert_eq!(input.text, "dns ");
        input.handle_key(KeyCode::Backspace, KeyModifiers::ALT);
        assert_eq!(input.text, "");
    }

    #[test]
    fn test_cursor_keys_do_not_edit() {
        let mut input = typed("abc");
        assert_eq!(
            input.handle_key(KeyCode::Home, KeyModifiers::NONE),
            InputChange::Moved
        );
        input.handle_key(KeyCode::Delete, KeyModifiers::NONE);
        assert_eq!(input.text, "bc");
        input.handle_key(KeyCode::End, KeyModifiers::NONE);
        assert_eq!(input.cursor, 2);
    }
}
