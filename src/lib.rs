//! keyscribe - A terminal note-sequence composer.
//!
//! Compose a monophonic sequence by playing piano keys or typing note
//! tokens, play it back with timed key highlights, and hand it to a studio
//! backend for MIDI rendering and persistence.

pub mod app;
pub mod composition;
pub mod config;
pub mod gateway;
pub mod playback;
pub mod session;
pub mod status;
pub mod ui;

// Re-export commonly used types
pub use app::{App, EditMode};
pub use composition::{insert_token, playable_notes, CompositionBuffer};
pub use config::{ComposerConfig, ConfigError};
pub use gateway::{Backend, Gateway, GatewayError, HttpBackend, LocalStudio, Studio};
pub use playback::{KeyHighlighter, Player, Transport, TransportState};
pub use session::{DownloadArtifact, Session};
pub use status::{StatusKind, StatusMessage, StatusNotifier};
