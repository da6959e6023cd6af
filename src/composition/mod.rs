//! Composition text model.
//!
//! A composition is a single editable text buffer of whitespace-separated
//! note tokens (`C4`, `F#5`, ...) and bar separators (`|`), plus a caret.
//! Tokens are never stored; they are derived from the text on demand.

mod buffer;
mod insert;
mod tokens;

pub use buffer::CompositionBuffer;
pub use insert::insert_token;
pub use tokens::{playable_notes, tokens, Token, BAR_TOKEN};

/// Standard note names within an octave, sharps only.
pub const NOTE_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Converts a MIDI note number to a note name with octave.
///
/// # Arguments
///
/// * `note` - MIDI note number (0-127)
///
/// # Returns
///
/// String representation like "C4" or "F#5"
///
/// # Examples
///
/// ```
/// use keyscribe::composition::note_to_name;
///
/// assert_eq!(note_to_name(60), "C4");
/// ```
pub fn note_to_name(note: u8) -> String {
    let octave = (note / 12) as i8 - 1; // MIDI octave convention
    let note_index = (note % 12) as usize;
    format!("{}{}", NOTE_NAMES[note_index], octave)
}

/// Converts a note name to a MIDI note number.
///
/// Returns `None` for anything that is not a sharp-spelled note within the
/// MIDI range, including the bar token.
pub fn name_to_note(name: &str) -> Option<u8> {
    let name = name.trim();
    if name.is_empty() {
        return None;
    }

    let octave_start = name.chars().position(|c| c.is_ascii_digit() || c == '-')?;
    let (note_part, octave_part) = name.split_at(octave_start);

    let note_index = NOTE_NAMES.iter().position(|&n| n == note_part)? as i32;
    let octave: i32 = octave_part.parse().ok()?;

    let midi_note = (octave + 1) * 12 + note_index;
    u8::try_from(midi_note).ok().filter(|n| *n <= 127)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_note_to_name() {
        assert_eq!(note_to_name(60), "C4");
        assert_eq!(note_to_name(69), "A4");
        assert_eq!(note_to_name(0), "C-1");
        assert_eq!(note_to_name(127), "G9");
    }

    #[test]
    fn test_name_to_note() {
        assert_eq!(name_to_note("C4"), Some(60));
        assert_eq!(name_to_note("A4"), Some(69));
        assert_eq!(name_to_note("C-1"), Some(0));
        assert_eq!(name_to_note("G9"), Some(127));
    }

    #[test]
    fn test_name_to_note_rejects_out_of_range_and_garbage() {
        assert_eq!(name_to_note("G#9"), None);
        assert_eq!(name_to_note("C30"), None);
        assert_eq!(name_to_note("C-2"), None);
        assert_eq!(name_to_note("|"), None);
        assert_eq!(name_to_note("H4"), None);
        assert_eq!(name_to_note("Db4"), None);
        assert_eq!(name_to_note(""), None);
    }

    #[test]
    fn test_names_round_trip_over_piano_range() {
        for note in 21..=108u8 {
            assert_eq!(name_to_note(&note_to_name(note)), Some(note));
        }
    }
}
