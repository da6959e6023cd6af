//! Editing session state.
//!
//! A session owns everything the command handlers mutate: the composition
//! buffer and caret, the tempo, and the latest download artifact.

use crate::composition::CompositionBuffer;

/// Default tempo in beats per minute.
pub const DEFAULT_TEMPO: u32 = 120;

/// Lowest tempo reachable by interactive adjustment.
pub const MIN_TEMPO: u32 = 20;

/// Highest tempo reachable by interactive adjustment.
pub const MAX_TEMPO: u32 = 300;

/// A named output of a successful generate request.
///
/// Only the name is kept; the encoded bytes belong to the renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadArtifact {
    pub filename: String,
}

/// Mutable state of one editing session.
#[derive(Debug, Clone)]
pub struct Session {
    /// Composition text and caret.
    pub composition: CompositionBuffer,
    /// Tempo in BPM, forwarded to the renderer.
    pub tempo: u32,
    /// Latest generated artifact, if any.
    pub artifact: Option<DownloadArtifact>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(DEFAULT_TEMPO)
    }
}

impl Session {
    /// Creates an empty session at `tempo` BPM.
    pub fn new(tempo: u32) -> Self {
        Self {
            composition: CompositionBuffer::new(),
            tempo: tempo.max(1),
            artifact: None,
        }
    }

    /// Changes the tempo by `delta`, staying within `MIN_TEMPO..=MAX_TEMPO`.
    pub fn adjust_tempo(&mut self, delta: i32) {
        let tempo = (self.tempo as i64 + delta as i64).clamp(MIN_TEMPO as i64, MAX_TEMPO as i64);
        self.tempo = tempo as u32;
    }

    /// Replaces composition and tempo, as after a load.
    ///
    /// The caret moves to the end of the new text.
    pub fn replace(&mut self, composition: impl Into<String>, tempo: u32) {
        self.composition.replace(composition);
        self.tempo = tempo;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_is_empty() {
        let session = Session::default();
        assert!(session.composition.is_empty());
        assert_eq!(session.composition.caret(), 0);
        assert_eq!(session.tempo, DEFAULT_TEMPO);
        assert!(session.artifact.is_none());
    }

    #[test]
    fn test_adjust_tempo_clamps() {
        let mut session = Session::new(290);
        session.adjust_tempo(50);
        assert_eq!(session.tempo, MAX_TEMPO);
        session.adjust_tempo(-1000);
        assert_eq!(session.tempo, MIN_TEMPO);
    }

    #[test]
    fn test_replace_moves_caret_to_end() {
        let mut session = Session::default();
        session.replace("C4 D4", 90);
        assert_eq!(session.composition.text(), "C4 D4");
        assert_eq!(session.composition.caret(), 5);
        assert_eq!(session.tempo, 90);
    }

    #[test]
    fn test_zero_tempo_is_raised() {
        assert_eq!(Session::new(0).tempo, 1);
    }
}
