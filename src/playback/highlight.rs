//! Key highlight capability.
//!
//! Playback drives visual feedback through [`KeyHighlighter`]. The terminal
//! keyboard reads the active set from [`KeyboardHighlights`].

use crate::composition::note_to_name;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

/// Lowest key of an 88-key piano (A0).
const PIANO_LOWEST: u8 = 21;
/// Highest key of an 88-key piano (C8).
const PIANO_HIGHEST: u8 = 108;

/// Sets and clears the "active" look of keys.
///
/// All calls are idempotent and ignore notes that have no key.
pub trait KeyHighlighter: Send + Sync {
    /// Marks the key for `note` as active.
    fn set_active(&self, note: &str);
    /// Clears the active mark of the key for `note`.
    fn clear_active(&self, note: &str);
    /// Clears every key.
    fn clear_all(&self);
}

/// The set of note names that have a visual key.
#[derive(Debug, Clone)]
pub struct KeyLayout {
    keys: HashSet<String>,
}

impl KeyLayout {
    /// Standard 88-key piano, A0 through C8.
    pub fn piano() -> Self {
        Self::from_range(PIANO_LOWEST, PIANO_HIGHEST)
    }

    /// Keys for every MIDI note in `lowest..=highest`.
    pub fn from_range(lowest: u8, highest: u8) -> Self {
        Self {
            keys: (lowest..=highest).map(note_to_name).collect(),
        }
    }

    /// Returns whether `note` has a key.
    pub fn contains(&self, note: &str) -> bool {
        self.keys.contains(note)
    }

    /// Number of keys in the layout.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Returns true if the layout has no keys.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl Default for KeyLayout {
    fn default() -> Self {
        Self::piano()
    }
}

/// Highlight state for an on-screen keyboard.
#[derive(Debug, Clone)]
pub struct KeyboardHighlights {
    layout: Arc<KeyLayout>,
    active: Arc<Mutex<HashSet<String>>>,
}

impl KeyboardHighlights {
    /// Creates highlight state for `layout` with no active keys.
    pub fn new(layout: KeyLayout) -> Self {
        Self {
            layout: Arc::new(layout),
            active: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    /// Returns whether the key for `note` is active.
    pub fn is_active(&self, note: &str) -> bool {
        self.active
            .lock()
            .map(|active| active.contains(note))
            .unwrap_or(false)
    }

    /// Returns the number of active keys.
    pub fn active_count(&self) -> usize {
        self.active.lock().map(|active| active.len()).unwrap_or(0)
    }
}

impl Default for KeyboardHighlights {
    fn default() -> Self {
        Self::new(KeyLayout::piano())
    }
}

impl KeyHighlighter for KeyboardHighlights {
    fn set_active(&self, note: &str) {
        if !self.layout.contains(note) {
            return;
        }
        if let Ok(mut active) = self.active.lock() {
            active.insert(note.to_string());
        }
    }

    fn clear_active(&self, note: &str) {
        if let Ok(mut active) = self.active.lock() {
            active.remove(note);
        }
    }

    fn clear_all(&self) {
        if let Ok(mut active) = self.active.lock() {
            active.clear();
        }
    }
}
