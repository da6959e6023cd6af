//! Standard MIDI File rendering for the local studio.
//!
//! Renders a composition as SMF Format 0 with:
//! - A tempo meta event at tick 0
//! - One quarter note per note token on channel 0
//! - Bar separators skipped (they carry no time)

use crate::composition::{name_to_note, tokens, Token};
use midly::num::{u15, u24, u28, u4, u7};
use midly::{Format, Header, MetaMessage, MidiMessage, Smf, Timing, Track, TrackEvent, TrackEventKind};
use thiserror::Error;

/// Ticks per beat (quarter note).
pub const TICKS_PER_BEAT: u16 = 480;

/// Velocity used for every rendered note.
const NOTE_VELOCITY: u8 = 100;

/// Largest value a tempo meta event can hold.
const MAX_MICROS_PER_BEAT: u32 = 0xFF_FFFF;

/// Errors that can occur while rendering.
#[derive(Debug, Error)]
pub enum RenderError {
    /// A token is not a note name in the MIDI range.
    #[error("Unknown note: {0}")]
    UnknownNote(String),

    /// The tempo cannot be represented.
    #[error("Tempo out of range: {0} BPM")]
    TempoOutOfRange(u32),

    /// Writing the file failed.
    #[error("Failed to write MIDI data: {0}")]
    Write(#[from] std::io::Error),
}

fn event(delta: u32, kind: TrackEventKind<'static>) -> TrackEvent<'static> {
    TrackEvent {
        delta: u28::new(delta),
        kind,
    }
}

fn note_event(delta: u32, message: MidiMessage) -> TrackEvent<'static> {
    event(
        delta,
        TrackEventKind::Midi {
            channel: u4::new(0),
            message,
        },
    )
}

/// Renders `composition` at `tempo` BPM into SMF bytes.
///
/// # Errors
///
/// Returns an error if a token is not a valid note name or the tempo
/// cannot be encoded.
pub fn render_smf(composition: &str, tempo: u32) -> Result<Vec<u8>, RenderError> {
    if tempo == 0 {
        return Err(RenderError::TempoOutOfRange(tempo));
    }
    let micros_per_beat = 60_000_000 / tempo;
    if micros_per_beat > MAX_MICROS_PER_BEAT {
        return Err(RenderError::TempoOutOfRange(tempo));
    }

    let mut track: Track<'static> = Vec::new();
    track.push(event(
        0,
        TrackEventKind::Meta(MetaMessage::Tempo(u24::new(micros_per_beat))),
    ));

    for token in tokens(composition) {
        let Token::Note(name) = token else {
            continue;
        };
        let key = name_to_note(name).ok_or_else(|| RenderError::UnknownNote(name.to_string()))?;

        track.push(note_event(
            0,
            MidiMessage::NoteOn {
                key: u7::new(key),
                vel: u7::new(NOTE_VELOCITY),
            },
        ));
        track.push(note_event(
            TICKS_PER_BEAT as u32,
            MidiMessage::NoteOff {
                key: u7::new(key),
                vel: u7::new(0),
            },
        ));
    }

    track.push(event(0, TrackEventKind::Meta(MetaMessage::EndOfTrack)));

    let mut smf = Smf::new(Header::new(
        Format::SingleTrack,
        Timing::Metrical(u15::new(TICKS_PER_BEAT)),
    ));
    smf.tracks.push(track);

    let mut bytes = Vec::new();
    smf.write_std(&mut bytes)?;
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note_ons(bytes: &[u8]) -> Vec<u8> {
        let smf = Smf::parse(bytes).unwrap();
        smf.tracks[0]
            .iter()
            .filter_map(|e| match e.kind {
                TrackEventKind::Midi {
                    message: MidiMessage::NoteOn { key, .. },
                    ..
                } => Some(key.as_int()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_renders_notes_and_skips_bars() {
        let bytes = render_smf("C4 E4 G4 C5 | E4 G4 C5 E5", 120).unwrap();
        assert_eq!(&bytes[..4], b"MThd");
        assert_eq!(note_ons(&bytes), vec![60, 64, 67, 72, 64, 67, 72, 76]);
    }

    #[test]
    fn test_tempo_meta_event() {
        let bytes = render_smf("A4", 90).unwrap();
        let smf = Smf::parse(&bytes).unwrap();
        let tempo = smf.tracks[0].iter().find_map(|e| match e.kind {
            TrackEventKind::Meta(MetaMessage::Tempo(t)) => Some(t.as_int()),
            _ => None,
        });
        assert_eq!(tempo, Some(60_000_000 / 90));
        assert_eq!(smf.header.format, Format::SingleTrack);
    }

    #[test]
    fn test_notes_last_one_beat() {
        let bytes = render_smf("C4 D4", 120).unwrap();
        let smf = Smf::parse(&bytes).unwrap();
        let total: u32 = smf.tracks[0].iter().map(|e| e.delta.as_int()).sum();
        assert_eq!(total, 2 * TICKS_PER_BEAT as u32);
    }

    #[test]
    fn test_unknown_note_is_an_error() {
        let err = render_smf("C4 Q9", 120).unwrap_err();
        assert_eq!(err.to_string(), "Unknown note: Q9");
    }

    #[test]
    fn test_unrepresentable_tempo() {
        assert!(matches!(
            render_smf("C4", 0),
            Err(RenderError::TempoOutOfRange(0))
        ));
        assert!(matches!(
            render_smf("C4", 3),
            Err(RenderError::TempoOutOfRange(3))
        ));
        assert!(render_smf("C4", 4).is_ok());
    }
}
