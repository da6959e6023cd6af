//! Playback scheduling and transport.
//!
//! This module provides:
//! - The transport state machine (Idle / Playing) with run identities
//! - The key highlight capability used for visual feedback
//! - The player that walks a composition at a fixed interval

mod highlight;
mod player;
mod transport;

pub use highlight::{KeyHighlighter, KeyLayout, KeyboardHighlights};
pub use player::{Player, NOTE_INTERVAL};
pub use transport::{RunId, Transport, TransportState};
