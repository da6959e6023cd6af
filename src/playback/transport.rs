//! Transport state machine.
//!
//! Tracks whether a playback run is active. Each accepted play request is
//! given a fresh run id; the run is active while the transport holds that
//! id. Uses atomics so handles can be shared with spawned playback tasks.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Marker for "no active run".
const IDLE: u64 = 0;

/// Transport state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransportState {
    /// Nothing is playing. Initial and terminal state.
    #[default]
    Idle,
    /// A playback run is in progress.
    Playing,
}

/// Identity of one playback run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RunId(u64);

/// Shared state between the transport handles.
#[derive(Debug, Default)]
struct SharedState {
    /// Id of the active run, or `IDLE`.
    active_run: AtomicU64,
    /// Last issued run id.
    last_run: AtomicU64,
}

/// Cloneable handle to the transport.
#[derive(Debug, Clone, Default)]
pub struct Transport {
    state: Arc<SharedState>,
}

impl Transport {
    /// Creates an idle transport.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current state.
    pub fn state(&self) -> TransportState {
        if self.state.active_run.load(Ordering::Acquire) == IDLE {
            TransportState::Idle
        } else {
            TransportState::Playing
        }
    }

    /// Returns whether a run is active.
    pub fn is_playing(&self) -> bool {
        self.state() == TransportState::Playing
    }

    /// Starts a new run.
    ///
    /// # Returns
    ///
    /// The new run id, or `None` if a run is already active.
    pub fn try_start(&self) -> Option<RunId> {
        let id = self.state.last_run.fetch_add(1, Ordering::AcqRel) + 1;
        self.state
            .active_run
            .compare_exchange(IDLE, id, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| RunId(id))
    }

    /// Returns whether `run` is still the active run.
    pub fn is_current(&self, run: RunId) -> bool {
        self.state.active_run.load(Ordering::Acquire) == run.0
    }

    /// Ends `run` after it played through.
    ///
    /// # Returns
    ///
    /// `false` if the run had already been stopped (or superseded).
    pub fn finish(&self, run: RunId) -> bool {
        self.state
            .active_run
            .compare_exchange(run.0, IDLE, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// Stops whatever is playing. Idempotent.
    pub fn stop(&self) {
        self.state.active_run.store(IDLE, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_idle() {
        let transport = Transport::new();
        assert_eq!(transport.state(), TransportState::Idle);
    }

    #[test]
    fn test_at_most_one_run() {
        let transport = Transport::new();
        let run = transport.try_start().expect("idle transport accepts a run");
        assert!(transport.is_playing());
        assert!(transport.try_start().is_none());
        assert!(transport.is_current(run));
    }

    #[test]
    fn test_stop_is_idempotent() {
        let transport = Transport::new();
        transport.stop();
        assert_eq!(transport.state(), TransportState::Idle);

        let run = transport.try_start().unwrap();
        transport.stop();
        transport.stop();
        assert_eq!(transport.state(), TransportState::Idle);
        assert!(!transport.is_current(run));
    }

    #[test]
    fn test_stopped_run_cannot_finish_a_newer_one() {
        let transport = Transport::new();
        let old = transport.try_start().unwrap();
        transport.stop();
        let new = transport.try_start().unwrap();
        assert_ne!(old, new);

        assert!(!transport.finish(old));
        assert!(transport.is_playing());
        assert!(transport.finish(new));
        assert_eq!(transport.state(), TransportState::Idle);
    }

    #[test]
    fn test_clones_share_state() {
        let transport = Transport::new();
        let handle = transport.clone();
        let _run = transport.try_start().unwrap();
        assert!(handle.is_playing());
        handle.stop();
        assert!(!transport.is_playing());
    }
}
