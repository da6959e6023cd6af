//! Application state and command handlers.
//!
//! `App` ties the editing session to playback, the gateway and the status
//! slot. Each user action maps to one `on_*` handler; the terminal front end
//! only translates input events into these calls.

use crate::composition::{note_to_name, BAR_TOKEN};
use crate::config::ComposerConfig;
use crate::gateway::{BackendError, Gateway, GatewayError, SaveReceipt, Studio};
use crate::playback::{KeyboardHighlights, Player, TransportState};
use crate::session::{DownloadArtifact, Session};
use crate::status::{StatusMessage, StatusNotifier};
use ratatui::layout::Rect;
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Tempo change per `+`/`-` press, in BPM.
pub const TEMPO_STEP: i32 = 5;

/// Lowest and highest octave offsets for keyboard input.
const OCTAVE_RANGE: (i8, i8) = (-3, 3);

/// Width of one key cell in the keyboard widget, in columns.
pub const KEY_CELL_WIDTH: u16 = 3;

/// Upper keyboard row as drawn on screen, C4 through C5.
pub const UPPER_KEYS: [char; 13] = [
    'Q', '2', 'W', '3', 'E', 'R', '5', 'T', '6', 'Y', '7', 'U', 'I',
];

/// Lower keyboard row as drawn on screen, C3 through B3.
pub const LOWER_KEYS: [char; 12] = ['Z', 'S', 'X', 'D', 'C', 'V', 'G', 'B', 'H', 'N', 'J', 'M'];

/// Keyboard key to MIDI note mapping for the computer keyboard.
/// Uses a piano-like layout on QWERTY keyboards.
pub const KEYBOARD_MAP: [(char, u8); 25] = [
    // Lower row (Z-M) = C3 to B3
    ('z', 48),
    ('s', 49),
    ('x', 50),
    ('d', 51),
    ('c', 52),
    ('v', 53),
    ('g', 54),
    ('b', 55),
    ('h', 56),
    ('n', 57),
    ('j', 58),
    ('m', 59),
    // Upper row (Q-I) = C4 to C5
    ('q', 60),
    ('2', 61),
    ('w', 62),
    ('3', 63),
    ('e', 64),
    ('r', 65),
    ('5', 66),
    ('t', 67),
    ('6', 68),
    ('y', 69),
    ('7', 70),
    ('u', 71),
    ('i', 72),
];

/// How keystrokes reach the composition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditMode {
    /// Piano keys insert normalized note tokens.
    #[default]
    Note,
    /// Keystrokes edit the text verbatim.
    Text,
}

/// State for the save-name dialog.
#[derive(Debug, Clone, Default)]
pub struct SaveDialogState {
    pub open: bool,
    pub name: String,
}

/// Screen regions recorded during rendering, for mouse hit testing.
#[derive(Debug, Clone, Copy, Default)]
pub struct LayoutRegions {
    pub transport: Rect,
    pub composition: Rect,
    /// Inner area of the keyboard widget; row 0 is the upper key row.
    pub keyboard: Rect,
}

impl LayoutRegions {
    fn contains(rect: Rect, x: u16, y: u16) -> bool {
        x >= rect.x && x < rect.x + rect.width && y >= rect.y && y < rect.y + rect.height
    }

    /// Returns the key character drawn at the given screen position.
    pub fn key_at(&self, x: u16, y: u16) -> Option<char> {
        if !Self::contains(self.keyboard, x, y) {
            return None;
        }
        let column = ((x - self.keyboard.x) / KEY_CELL_WIDTH) as usize;
        match y - self.keyboard.y {
            0 => UPPER_KEYS.get(column).copied(),
            1 => LOWER_KEYS.get(column).copied(),
            _ => None,
        }
    }
}

/// Main application state.
pub struct App {
    /// Composition, tempo and artifact.
    pub session: Session,
    pub config: ComposerConfig,
    pub edit_mode: EditMode,
    /// Octave offset for keyboard input.
    pub octave_offset: i8,
    pub save_dialog: SaveDialogState,
    pub layout: LayoutRegions,
    pub should_quit: bool,
    status: StatusNotifier,
    highlights: KeyboardHighlights,
    player: Player,
    gateway: Gateway<Studio>,
    playback_task: Option<JoinHandle<()>>,
}

impl App {
    /// Creates the application from `config`.
    ///
    /// Talks to the studio at `config.backend_url`, or to the in-process
    /// studio when no URL is configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new(config: ComposerConfig) -> Result<Self, BackendError> {
        let studio = Studio::from_url(config.backend_url.as_deref())?;
        let status = StatusNotifier::new(config.status_ttl());
        let highlights = KeyboardHighlights::default();
        let player = Player::new(Arc::new(highlights.clone()), status.clone())
            .with_interval(config.note_interval());
        let gateway = Gateway::new(studio, status.clone());

        Ok(Self {
            session: Session::new(config.default_tempo),
            config,
            edit_mode: EditMode::default(),
            octave_offset: 0,
            save_dialog: SaveDialogState::default(),
            layout: LayoutRegions::default(),
            should_quit: false,
            status,
            highlights,
            player,
            gateway,
            playback_task: None,
        })
    }

    /// Returns whether the gateway talks to a remote studio.
    pub fn is_remote(&self) -> bool {
        self.gateway.backend().is_remote()
    }

    /// Highlight state read by the keyboard widget.
    pub fn highlights(&self) -> &KeyboardHighlights {
        &self.highlights
    }

    pub fn transport_state(&self) -> TransportState {
        self.player.state()
    }

    /// The visible status message, if any.
    pub fn status(&self) -> Option<StatusMessage> {
        self.status.current()
    }

    /// Drops expired status messages. Called once per frame.
    pub fn tick(&mut self) {
        self.status.clear_expired();
        if self
            .playback_task
            .as_ref()
            .is_some_and(|task| task.is_finished())
        {
            self.playback_task = None;
        }
    }

    /// Inserts `token` at the caret with single-space separation.
    pub fn on_insert(&mut self, token: &str) {
        self.session.composition.insert_note(token);
        tracing::debug!(token, caret = self.session.composition.caret(), "token inserted");
    }

    /// Starts playback of the current text. Ignored while already playing.
    pub fn on_play(&mut self) -> bool {
        match self.player.play(self.session.composition.text()) {
            Some(task) => {
                self.playback_task = Some(task);
                true
            }
            None => false,
        }
    }

    pub fn on_stop(&mut self) {
        self.player.stop();
    }

    /// Requests a MIDI rendering; on success the artifact is exposed.
    pub async fn on_generate(&mut self) -> Result<DownloadArtifact, GatewayError> {
        self.gateway.generate(&mut self.session).await
    }

    /// Saves under `name`. `None` or an empty name declines silently.
    pub async fn on_save(&mut self, name: Option<&str>) -> Result<Option<SaveReceipt>, GatewayError> {
        self.gateway.save(&self.session, name).await
    }

    /// Loads the configured target into the session.
    pub async fn on_load(&mut self) -> Result<(), GatewayError> {
        let target = self.config.load_target.clone();
        self.gateway.load(&mut self.session, &target).await
    }

    pub fn on_clear(&mut self) {
        self.session.composition.clear();
        self.status.success("Composition cleared");
    }

    /// Activates the download artifact. Only reports the filename; the
    /// bytes belong to the renderer and nothing is written.
    pub fn on_download(&mut self) -> Option<DownloadArtifact> {
        match &self.session.artifact {
            Some(artifact) => {
                self.status.success(format!(
                    "{} is ready; downloading is not implemented here",
                    artifact.filename
                ));
                tracing::info!(filename = %artifact.filename, "artifact activated");
                Some(artifact.clone())
            }
            None => {
                self.status.error("Generate a MIDI file first");
                None
            }
        }
    }

    /// Handles a piano key press in note mode.
    ///
    /// # Returns
    ///
    /// true if the key was handled as a note
    pub fn handle_note_key(&mut self, key: char) -> bool {
        let key_lower = key.to_ascii_lowercase();
        let Some(note) = KEYBOARD_MAP
            .iter()
            .find(|(k, _)| *k == key_lower)
            .and_then(|(_, base)| self.shifted(*base))
        else {
            return false;
        };
        self.on_insert(&note_to_name(note));
        true
    }

    /// Handles a click on the keyboard widget. Clicking a key inserts its note.
    pub fn handle_keyboard_click(&mut self, x: u16, y: u16) -> bool {
        match self.layout.key_at(x, y) {
            Some(key) => self.handle_note_key(key),
            None => false,
        }
    }

    /// Inserts a bar separator.
    pub fn insert_bar(&mut self) {
        self.on_insert(BAR_TOKEN);
    }

    /// MIDI note for keyboard key `base` at the current octave offset.
    pub fn shifted(&self, base: u8) -> Option<u8> {
        let note = base as i16 + self.octave_offset as i16 * 12;
        u8::try_from(note).ok().filter(|n| *n <= 127)
    }

    pub fn change_octave(&mut self, delta: i8) {
        let (low, high) = OCTAVE_RANGE;
        self.octave_offset = (self.octave_offset + delta).clamp(low, high);
        self.status
            .success(format!("Octave offset: {:+}", self.octave_offset));
    }

    pub fn adjust_tempo(&mut self, delta: i32) {
        self.session.adjust_tempo(delta);
        self.status
            .success(format!("Tempo: {} BPM", self.session.tempo));
    }

    pub fn toggle_edit_mode(&mut self) {
        self.edit_mode = match self.edit_mode {
            EditMode::Note => EditMode::Text,
            EditMode::Text => EditMode::Note,
        };
    }

    /// Opens the save dialog pre-filled with the default name.
    pub fn open_save_dialog(&mut self) {
        self.save_dialog.name = self.config.default_save_name.clone();
        self.save_dialog.open = true;
    }

    /// Handles character input in the save dialog.
    pub fn save_dialog_input(&mut self, c: char) {
        if self.save_dialog.open && !c.is_control() {
            self.save_dialog.name.push(c);
        }
    }

    /// Handles backspace in the save dialog.
    pub fn save_dialog_backspace(&mut self) {
        if self.save_dialog.open {
            self.save_dialog.name.pop();
        }
    }

    /// Closes the dialog and saves under the entered name, as typed.
    ///
    /// Only an empty name declines the save.
    pub async fn save_dialog_confirm(&mut self) -> Result<Option<SaveReceipt>, GatewayError> {
        self.save_dialog.open = false;
        let name = std::mem::take(&mut self.save_dialog.name);
        self.on_save(Some(&name)).await
    }

    /// Closes the dialog. The user declined to name the composition.
    pub fn save_dialog_cancel(&mut self) {
        self.save_dialog.open = false;
        self.save_dialog.name.clear();
        tracing::debug!("save dialog dismissed");
    }

    /// Queries the studio health route and logs the result.
    pub async fn check_health(&self) {
        match self.gateway.health().await {
            Ok(health) => {
                tracing::info!(status = %health.status, service = %health.service, "studio health")
            }
            Err(e) => tracing::warn!(error = %e, "studio health check failed"),
        }
    }
}
