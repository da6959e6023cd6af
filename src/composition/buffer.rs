//! Editable composition text with a caret.

use super::insert::{byte_offset, insert_token};

/// The composition buffer and its caret.
///
/// Key-driven insertions go through [`insert_token`] and keep single-space
/// separation. Direct typing is stored verbatim, so hand-typed text may
/// carry irregular whitespace; tokenization copes with that.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompositionBuffer {
    /// The raw composition text.
    text: String,
    /// Caret position in characters, `0..=len`.
    caret: usize,
}

impl CompositionBuffer {
    /// Creates an empty buffer with the caret at 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a buffer holding `text` with the caret at the end.
    pub fn with_text(text: impl Into<String>) -> Self {
        let mut buffer = Self::new();
        buffer.replace(text);
        buffer
    }

    /// Returns the composition text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns the caret position in characters.
    pub fn caret(&self) -> usize {
        self.caret
    }

    /// Returns the text length in characters.
    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    /// Returns true if the buffer holds no text at all.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Returns true if the buffer holds nothing but whitespace.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// Inserts a note (or bar) token at the caret with normalized spacing.
    pub fn insert_note(&mut self, token: &str) {
        let (text, caret) = insert_token(&self.text, self.caret, token);
        self.text = text;
        self.caret = caret;
    }

    /// Inserts a typed character at the caret, verbatim.
    pub fn type_char(&mut self, c: char) {
        let offset = byte_offset(&self.text, self.caret);
        self.text.insert(offset, c);
        self.caret += 1;
    }

    /// Deletes the character before the caret.
    pub fn backspace(&mut self) {
        if self.caret == 0 {
            return;
        }
        let offset = byte_offset(&self.text, self.caret - 1);
        self.text.remove(offset);
        self.caret -= 1;
    }

    /// Deletes the character under the caret.
    pub fn delete(&mut self) {
        if self.caret < self.len() {
            let offset = byte_offset(&self.text, self.caret);
            self.text.remove(offset);
        }
    }

    /// Moves the caret by `delta` characters, staying within the text.
    pub fn move_caret(&mut self, delta: isize) {
        let target = self.caret.saturating_add_signed(delta);
        self.caret = target.min(self.len());
    }

    /// Places the caret, clamped to the text length.
    pub fn set_caret(&mut self, caret: usize) {
        self.caret = caret.min(self.len());
    }

    /// Moves the caret to the start of the text.
    pub fn caret_home(&mut self) {
        self.caret = 0;
    }

    /// Moves the caret to the end of the text.
    pub fn caret_end(&mut self) {
        self.caret = self.len();
    }

    /// Replaces the whole text and moves the caret to the end.
    pub fn replace(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.caret = self.len();
    }

    /// Empties the buffer.
    pub fn clear(&mut self) {
        self.text.clear();
        self.caret = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_notes_tracks_caret() {
        let mut buffer = CompositionBuffer::new();
        buffer.insert_note("C4");
        buffer.insert_note("D4");
        assert_eq!(buffer.text(), "C4 D4");
        assert_eq!(buffer.caret(), 5);
    }

    #[test]
    fn test_insert_in_the_middle() {
        let mut buffer = CompositionBuffer::with_text("C4 E4");
        buffer.set_caret(2);
        buffer.insert_note("D4");
        assert_eq!(buffer.text(), "C4 D4 E4");
        assert_eq!(buffer.caret(), 5);
    }

    #[test]
    fn test_typing_is_not_normalized() {
        let mut buffer = CompositionBuffer::new();
        for c in "C4   D4".chars() {
            buffer.type_char(c);
        }
        assert_eq!(buffer.text(), "C4   D4");
        assert_eq!(buffer.caret(), 7);
        // A key insertion after hand-typed spaces adds none of its own.
        buffer.type_char(' ');
        buffer.type_char(' ');
        buffer.insert_note("E4");
        assert_eq!(buffer.text(), "C4   D4  E4");
    }

    #[test]
    fn test_backspace_and_delete() {
        let mut buffer = CompositionBuffer::with_text("C4 D4");
        buffer.backspace();
        assert_eq!(buffer.text(), "C4 D");
        assert_eq!(buffer.caret(), 4);

        buffer.caret_home();
        buffer.backspace();
        assert_eq!(buffer.text(), "C4 D");

        buffer.delete();
        assert_eq!(buffer.text(), "4 D");
        assert_eq!(buffer.caret(), 0);

        buffer.caret_end();
        buffer.delete();
        assert_eq!(buffer.text(), "4 D");
    }

    #[test]
    fn test_move_caret_clamps() {
        let mut buffer = CompositionBuffer::with_text("C4");
        buffer.move_caret(-10);
        assert_eq!(buffer.caret(), 0);
        buffer.move_caret(10);
        assert_eq!(buffer.caret(), 2);
        buffer.set_caret(99);
        assert_eq!(buffer.caret(), 2);
    }

    #[test]
    fn test_replace_and_clear() {
        let mut buffer = CompositionBuffer::new();
        buffer.replace("C4 D4");
        assert_eq!(buffer.caret(), 5);
        assert!(!buffer.is_blank());

        buffer.clear();
        assert!(buffer.is_empty());
        assert_eq!(buffer.caret(), 0);

        buffer.replace(" \t ");
        assert!(buffer.is_blank());
    }

    #[test]
    fn test_multibyte_editing() {
        let mut buffer = CompositionBuffer::with_text("C♯4");
        assert_eq!(buffer.len(), 3);
        buffer.backspace();
        buffer.backspace();
        assert_eq!(buffer.text(), "C");
        buffer.type_char('♭');
        assert_eq!(buffer.text(), "C♭");
        assert_eq!(buffer.caret(), 2);
    }
}
