//! Timed playback of a composition.
//!
//! A run walks the note tokens of a composition snapshot, highlighting each
//! key for a fixed interval. The interval does not depend on tempo. Stop is
//! cooperative: the run checks the transport before each note, so a pending
//! interval always completes first.

use super::highlight::KeyHighlighter;
use super::transport::{RunId, Transport, TransportState};
use crate::composition::playable_notes;
use crate::status::StatusNotifier;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Time each note stays highlighted.
pub const NOTE_INTERVAL: Duration = Duration::from_millis(500);

/// Starts and stops playback runs.
pub struct Player {
    /// Shared transport state.
    transport: Transport,
    /// Key highlight capability.
    highlighter: Arc<dyn KeyHighlighter>,
    /// Status slot for playback messages.
    status: StatusNotifier,
    /// Per-note interval.
    interval: Duration,
}

impl Player {
    /// Creates a player with the default note interval.
    pub fn new(highlighter: Arc<dyn KeyHighlighter>, status: StatusNotifier) -> Self {
        Self {
            transport: Transport::new(),
            highlighter,
            status,
            interval: NOTE_INTERVAL,
        }
    }

    /// Sets the per-note interval.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Returns the per-note interval.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Returns the transport handle.
    pub fn transport(&self) -> &Transport {
        &self.transport
    }

    /// Returns the current transport state.
    pub fn state(&self) -> TransportState {
        self.transport.state()
    }

    /// Starts playing `composition`.
    ///
    /// The text is tokenized immediately, so later edits do not affect this
    /// run. Must be called from within a tokio runtime.
    ///
    /// # Returns
    ///
    /// The spawned run, or `None` if playback was already active (in which
    /// case nothing happens).
    pub fn play(&self, composition: &str) -> Option<JoinHandle<()>> {
        let Some(run) = self.transport.try_start() else {
            tracing::debug!("play ignored, already playing");
            return None;
        };

        self.status.success("Playing composition...");
        let notes = playable_notes(composition);
        tracing::info!(notes = notes.len(), "playback started");

        let playback = PlaybackRun {
            run,
            notes,
            transport: self.transport.clone(),
            highlighter: Arc::clone(&self.highlighter),
            status: self.status.clone(),
            interval: self.interval,
        };
        Some(tokio::spawn(playback.run()))
    }

    /// Stops playback and clears every key. Safe to call when idle.
    pub fn stop(&self) {
        self.transport.stop();
        self.status.error("Playback stopped");
        self.highlighter.clear_all();
        tracing::info!("playback stopped");
    }
}

/// State owned by one spawned run.
struct PlaybackRun {
    run: RunId,
    notes: Vec<String>,
    transport: Transport,
    highlighter: Arc<dyn KeyHighlighter>,
    status: StatusNotifier,
    interval: Duration,
}

impl PlaybackRun {
    async fn run(self) {
        for (index, note) in self.notes.iter().enumerate() {
            if !self.transport.is_current(self.run) {
                tracing::debug!(index, "playback run cancelled");
                return;
            }

            tracing::debug!(index, note = %note, "note");
            self.highlighter.set_active(note);
            tokio::time::sleep(self.interval).await;
            // After a stop the keys were already cleared, and a newer run
            // may own this key now.
            if self.transport.is_current(self.run) {
                self.highlighter.clear_active(note);
            }
        }

        if self.transport.finish(self.run) {
            self.status.success("Playback finished");
            tracing::info!("playback finished");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::playback::KeyboardHighlights;
    use crate::status::StatusKind;
    use std::sync::Mutex;
    use tokio::time::{sleep, Instant};

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Call {
        Set(String),
        Clear(String),
        ClearAll,
    }

    #[derive(Default)]
    struct RecordingHighlighter {
        calls: Mutex<Vec<Call>>,
    }

    impl RecordingHighlighter {
        fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }

        fn highlighted(&self) -> Vec<String> {
            self.calls()
                .into_iter()
                .filter_map(|call| match call {
                    Call::Set(note) => Some(note),
                    _ => None,
                })
                .collect()
        }
    }

    impl KeyHighlighter for RecordingHighlighter {
        fn set_active(&self, note: &str) {
            self.calls.lock().unwrap().push(Call::Set(note.to_string()));
        }

        fn clear_active(&self, note: &str) {
            self.calls.lock().unwrap().push(Call::Clear(note.to_string()));
        }

        fn clear_all(&self) {
            self.calls.lock().unwrap().push(Call::ClearAll);
        }
    }

    fn player() -> (Player, Arc<RecordingHighlighter>, StatusNotifier) {
        let keys = Arc::new(RecordingHighlighter::default());
        let status = StatusNotifier::default();
        let player = Player::new(keys.clone(), status.clone());
        (player, keys, status)
    }

    fn status_text(status: &StatusNotifier) -> Option<String> {
        status.current().map(|m| m.text)
    }

    #[tokio::test(start_paused = true)]
    async fn test_plays_notes_in_order_and_finishes() {
        let (player, keys, status) = player();
        let started = Instant::now();

        let run = player.play("C4 | D4 E4").expect("idle player starts");
        assert_eq!(player.state(), TransportState::Playing);
        assert_eq!(status_text(&status).as_deref(), Some("Playing composition..."));

        run.await.unwrap();

        let elapsed = started.elapsed();
        assert!(elapsed >= NOTE_INTERVAL * 3);
        assert!(elapsed < NOTE_INTERVAL * 3 + Duration::from_millis(5));
        assert_eq!(player.state(), TransportState::Idle);
        assert_eq!(
            keys.calls(),
            vec![
                Call::Set("C4".into()),
                Call::Clear("C4".into()),
                Call::Set("D4".into()),
                Call::Clear("D4".into()),
                Call::Set("E4".into()),
                Call::Clear("E4".into()),
            ]
        );
        let message = status.current().unwrap();
        assert_eq!(message.text, "Playback finished");
        assert_eq!(message.kind, StatusKind::Success);
    }

    #[tokio::test(start_paused = true)]
    async fn test_play_while_playing_is_rejected() {
        let (player, keys, _status) = player();

        let run = player.play("C4 D4").unwrap();
        assert!(player.play("G4 A4 B4").is_none());
        assert_eq!(player.state(), TransportState::Playing);

        run.await.unwrap();
        assert_eq!(keys.highlighted(), vec!["C4", "D4"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_during_delay_prevents_next_note() {
        let (player, keys, status) = player();

        let run = player.play("C4 D4 E4").unwrap();
        // Lands inside the interval for D4.
        sleep(Duration::from_millis(750)).await;
        player.stop();
        assert_eq!(player.state(), TransportState::Idle);

        run.await.unwrap();

        assert_eq!(keys.highlighted(), vec!["C4", "D4"]);
        assert_eq!(
            keys.calls(),
            vec![
                Call::Set("C4".into()),
                Call::Clear("C4".into()),
                Call::Set("D4".into()),
                Call::ClearAll,
            ]
        );
        let message = status.current().unwrap();
        assert_eq!(message.text, "Playback stopped");
        assert_eq!(message.kind, StatusKind::Error);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_run_does_not_continue_after_restart() {
        let (player, keys, status) = player();

        let first = player.play("C4 D4").unwrap();
        sleep(Duration::from_millis(250)).await;
        player.stop();
        let second = player.play("E4").expect("stopped player starts again");

        first.await.unwrap();
        second.await.unwrap();

        assert_eq!(keys.highlighted(), vec!["C4", "E4"]);
        assert_eq!(player.state(), TransportState::Idle);
        assert_eq!(status_text(&status).as_deref(), Some("Playback finished"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_run_leaves_restarted_key_lit() {
        let keys = KeyboardHighlights::default();
        let player = Player::new(Arc::new(keys.clone()), StatusNotifier::default());

        let first = player.play("C4").unwrap();
        sleep(Duration::from_millis(250)).await;
        player.stop();
        let second = player.play("C4").unwrap();

        // The first run wakes at 500ms; the second holds C4 until 750ms.
        sleep(Duration::from_millis(260)).await;
        assert!(first.is_finished());
        assert!(keys.is_active("C4"));

        second.await.unwrap();
        assert!(!keys.is_active("C4"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_only_bars_finishes_immediately() {
        let (player, keys, status) = player();
        let started = Instant::now();

        player.play(" | |  ").unwrap().await.unwrap();

        assert!(started.elapsed() < Duration::from_millis(1));
        assert!(keys.calls().is_empty());
        assert_eq!(status_text(&status).as_deref(), Some("Playback finished"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_when_idle_still_clears_and_notifies() {
        let (player, keys, status) = player();

        player.stop();

        assert_eq!(player.state(), TransportState::Idle);
        assert_eq!(keys.calls(), vec![Call::ClearAll]);
        assert_eq!(status_text(&status).as_deref(), Some("Playback stopped"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_custom_interval_is_tempo_independent() {
        let (player, _keys, _status) = player();
        let player = player.with_interval(Duration::from_millis(100));
        let started = Instant::now();

        player.play("C4 D4 E4 F4").unwrap().await.unwrap();

        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_millis(400) && elapsed < Duration::from_millis(405));
    }
}
