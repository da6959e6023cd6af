//! Single-slot status messages.
//!
//! The notifier holds at most one message. A new message replaces the old
//! one immediately. Success messages expire after a fixed time to live;
//! error messages stay until replaced.

use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::Instant;

/// Default time to live for success messages.
pub const STATUS_TTL: Duration = Duration::from_millis(3000);

/// Kind of a status message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    /// Informational or positive outcome. Expires automatically.
    Success,
    /// Failure or attention-worthy outcome. Stays until replaced.
    Error,
}

/// A user-facing status message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    /// Message text.
    pub text: String,
    /// Message kind.
    pub kind: StatusKind,
}

/// A posted message and the time it was posted.
#[derive(Debug)]
struct Posted {
    message: StatusMessage,
    posted_at: Instant,
}

/// Shared handle to the status slot.
///
/// Cloning is cheap; every clone points at the same slot. Expiry is
/// evaluated against the message that is currently posted, so an older
/// message's expiry can never clear a newer one.
#[derive(Debug, Clone)]
pub struct StatusNotifier {
    slot: Arc<Mutex<Option<Posted>>>,
    ttl: Duration,
}

impl Default for StatusNotifier {
    fn default() -> Self {
        Self::new(STATUS_TTL)
    }
}

impl StatusNotifier {
    /// Creates an empty notifier whose success messages live for `ttl`.
    pub fn new(ttl: Duration) -> Self {
        Self {
            slot: Arc::new(Mutex::new(None)),
            ttl,
        }
    }

    /// Posts a message, replacing any current one.
    pub fn notify(&self, text: impl Into<String>, kind: StatusKind) {
        let message = StatusMessage {
            text: text.into(),
            kind,
        };
        tracing::debug!(?kind, text = %message.text, "status");
        if let Ok(mut slot) = self.slot.lock() {
            *slot = Some(Posted {
                message,
                posted_at: Instant::now(),
            });
        }
    }

    /// Posts a success message.
    pub fn success(&self, text: impl Into<String>) {
        self.notify(text, StatusKind::Success);
    }

    /// Posts an error message.
    pub fn error(&self, text: impl Into<String>) {
        self.notify(text, StatusKind::Error);
    }

    /// Returns the visible message, if any.
    ///
    /// Expired success messages are dropped from the slot as a side effect.
    pub fn current(&self) -> Option<StatusMessage> {
        let mut slot = self.slot.lock().ok()?;
        if slot.as_ref().is_some_and(|posted| self.is_expired(posted)) {
            *slot = None;
        }
        slot.as_ref().map(|posted| posted.message.clone())
    }

    /// Clears the slot if the posted message has expired.
    pub fn clear_expired(&self) {
        let _ = self.current();
    }

    /// Clears the slot unconditionally.
    pub fn clear(&self) {
        if let Ok(mut slot) = self.slot.lock() {
            *slot = None;
        }
    }

    fn is_expired(&self, posted: &Posted) -> bool {
        posted.message.kind == StatusKind::Success && posted.posted_at.elapsed() >= self.ttl
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::advance;

    #[tokio::test(start_paused = true)]
    async fn test_success_expires_after_ttl() {
        let status = StatusNotifier::default();
        status.success("Composition cleared");

        advance(Duration::from_millis(2999)).await;
        assert_eq!(
            status.current().map(|m| m.text),
            Some("Composition cleared".to_string())
        );

        advance(Duration::from_millis(1)).await;
        assert_eq!(status.current(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_error_never_expires() {
        let status = StatusNotifier::default();
        status.error("Playback stopped");

        advance(Duration::from_secs(60)).await;
        let message = status.current().expect("error messages stay");
        assert_eq!(message.kind, StatusKind::Error);
        assert_eq!(message.text, "Playback stopped");
    }

    #[tokio::test(start_paused = true)]
    async fn test_newer_message_is_not_cleared_by_older_expiry() {
        let status = StatusNotifier::default();
        status.success("Playing composition...");

        advance(Duration::from_millis(2000)).await;
        status.success("Playback finished");

        // The first message would have expired here.
        advance(Duration::from_millis(1500)).await;
        assert_eq!(
            status.current().map(|m| m.text),
            Some("Playback finished".to_string())
        );

        advance(Duration::from_millis(1500)).await;
        assert_eq!(status.current(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_error_replacing_success_stays() {
        let status = StatusNotifier::default();
        status.success("Generating MIDI file...");
        status.error("Network error: connection refused");

        advance(Duration::from_secs(10)).await;
        assert_eq!(
            status.current().map(|m| m.kind),
            Some(StatusKind::Error)
        );
    }

    #[test]
    fn test_clones_share_the_slot() {
        let status = StatusNotifier::default();
        let other = status.clone();
        other.error("Cannot save empty composition");
        assert_eq!(
            status.current().map(|m| m.text),
            Some("Cannot save empty composition".to_string())
        );
        status.clear();
        assert_eq!(other.current(), None);
    }
}
