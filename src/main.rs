//! keyscribe - A terminal note-sequence composer.
//!
//! # Usage
//!
//! ```bash
//! cargo run                              # Start with defaults
//! cargo run -- --tempo 90                # Start at 90 BPM
//! cargo run -- --config keyscribe.json   # Load settings from a file
//! cargo run -- --backend-url http://localhost:5000
//! ```
//!
//! Logging goes to stderr and is controlled by `RUST_LOG`.

use keyscribe::app::{App, EditMode, TEMPO_STEP};
use keyscribe::config::ComposerConfig;
use keyscribe::ui;

use anyhow::{Context, Result};
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
    KeyModifiers, MouseButton, MouseEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::io::{self, Stdout};
use std::path::PathBuf;
use std::time::Duration;

/// Delay between frames.
const FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// Command-line options for the application.
struct CliOptions {
    /// Tempo override in BPM.
    tempo: Option<u32>,
    /// Path to a JSON configuration file.
    config: Option<PathBuf>,
    /// Remote studio service URL.
    backend_url: Option<String>,
}

impl CliOptions {
    /// Parses command-line arguments.
    ///
    /// Supports:
    /// - `--tempo <bpm>` or `-t <bpm>`: Initial tempo
    /// - `--config <path>` or `-c <path>`: Configuration file
    /// - `--backend-url <url>` or `-b <url>`: Remote studio service
    /// - `--help` or `-h`: Print help and exit
    fn parse() -> Result<Self> {
        let args: Vec<String> = std::env::args().collect();
        let mut tempo = None;
        let mut config = None;
        let mut backend_url = None;
        let mut i = 1;

        while i < args.len() {
            match args[i].as_str() {
                "--tempo" | "-t" => {
                    i += 1;
                    let value = args
                        .get(i)
                        .context("--tempo requires a BPM argument")?;
                    tempo = Some(
                        value
                            .parse()
                            .with_context(|| format!("Invalid tempo: {}", value))?,
                    );
                }
                "--config" | "-c" => {
                    i += 1;
                    let path = args.get(i).context("--config requires a path argument")?;
                    config = Some(PathBuf::from(path));
                }
                "--backend-url" | "-b" => {
                    i += 1;
                    let url = args
                        .get(i)
                        .context("--backend-url requires a URL argument")?;
                    backend_url = Some(url.clone());
                }
                "--help" | "-h" => {
                    eprintln!("keyscribe - Terminal note-sequence composer");
                    eprintln!();
                    eprintln!(
                        "Usage: {} [OPTIONS]",
                        args.first().map(String::as_str).unwrap_or("keyscribe")
                    );
                    eprintln!();
                    eprintln!("Options:");
                    eprintln!("  -t, --tempo BPM     Initial tempo (20-300)");
                    eprintln!("  -c, --config PATH   Load settings from a JSON file");
                    eprintln!("  -b, --backend-url URL");
                    eprintln!("                      Use a remote studio service");
                    eprintln!("  -h, --help          Print this help message");
                    std::process::exit(0);
                }
                other => {
                    eprintln!("Unknown option: {}", other);
                    eprintln!("Use --help for usage information");
                    std::process::exit(1);
                }
            }
            i += 1;
        }

        Ok(Self {
            tempo,
            config,
            backend_url,
        })
    }

    /// Builds the configuration: file first, then CLI overrides.
    fn into_config(self) -> Result<ComposerConfig> {
        let config = match &self.config {
            Some(path) => ComposerConfig::load(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            None => ComposerConfig::default(),
        };
        let config = match self.tempo {
            Some(tempo) => config.with_tempo(tempo)?,
            None => config,
        };
        match self.backend_url {
            Some(url) => Ok(config.with_backend_url(url)?),
            None => Ok(config),
        }
    }
}

/// Main entry point.
fn main() -> Result<()> {
    let config = CliOptions::parse()?.into_config()?;

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start runtime")?;

    let mut app = App::new(config).context("Failed to create studio client")?;
    if let Some(url) = &app.config.backend_url {
        tracing::info!(url = %url, "using remote studio");
    }
    runtime.block_on(app.check_health());

    let mut terminal = setup_terminal().context("Failed to setup terminal")?;
    let result = runtime.block_on(run_app(&mut terminal, &mut app));
    restore_terminal(&mut terminal)?;

    tracing::info!("exiting");
    result
}

/// Sets up the terminal for TUI rendering.
fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)
        .context("Failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend).context("Failed to create terminal")?;
    Ok(terminal)
}

/// Restores the terminal to its original state.
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )
    .context("Failed to leave alternate screen")?;
    terminal.show_cursor().context("Failed to show cursor")?;
    Ok(())
}

/// Main event loop.
///
/// Input is polled without blocking; the frame sleep is where the playback
/// task gets to run.
async fn run_app(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    while !app.should_quit {
        app.tick();
        terminal.draw(|frame| ui::render(frame, app))?;

        while event::poll(Duration::ZERO)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    handle_key(app, key).await;
                }
                Event::Mouse(mouse) => {
                    if mouse.kind == MouseEventKind::Down(MouseButton::Left)
                        && !app.save_dialog.open
                    {
                        app.handle_keyboard_click(mouse.column, mouse.row);
                    }
                }
                _ => {}
            }
        }

        tokio::time::sleep(FRAME_INTERVAL).await;
    }

    app.on_stop();
    Ok(())
}

/// Dispatches one key press. The save dialog takes input first.
///
/// Gateway failures are already on the status line, so results are dropped.
async fn handle_key(app: &mut App, key: KeyEvent) {
    if app.save_dialog.open {
        match key.code {
            KeyCode::Enter => {
                let _ = app.save_dialog_confirm().await;
            }
            KeyCode::Esc => app.save_dialog_cancel(),
            KeyCode::Backspace => app.save_dialog_backspace(),
            KeyCode::Char(c) => app.save_dialog_input(c),
            _ => {}
        }
        return;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('c') => app.should_quit = true,
            KeyCode::Char('g') => {
                let _ = app.on_generate().await;
            }
            KeyCode::Char('s') => app.open_save_dialog(),
            KeyCode::Char('o') => {
                let _ = app.on_load().await;
            }
            KeyCode::Char('l') => app.on_clear(),
            KeyCode::Char('d') => {
                app.on_download();
            }
            _ => {}
        }
        return;
    }

    match app.edit_mode {
        EditMode::Note => handle_note_mode_key(app, key.code),
        EditMode::Text => handle_text_mode_key(app, key.code),
    }
}

fn handle_note_mode_key(app: &mut App, code: KeyCode) {
    match code {
        KeyCode::Char(' ') => {
            app.on_play();
        }
        KeyCode::Esc => app.on_stop(),
        KeyCode::Tab => app.toggle_edit_mode(),
        KeyCode::Char('|') => app.insert_bar(),
        KeyCode::Char('+') | KeyCode::Char('=') => app.adjust_tempo(TEMPO_STEP),
        KeyCode::Char('-') => app.adjust_tempo(-TEMPO_STEP),
        KeyCode::Char(',') => app.change_octave(-1),
        KeyCode::Char('.') => app.change_octave(1),
        KeyCode::Left => app.session.composition.move_caret(-1),
        KeyCode::Right => app.session.composition.move_caret(1),
        KeyCode::Char(c) => {
            app.handle_note_key(c);
        }
        _ => {}
    }
}

fn handle_text_mode_key(app: &mut App, code: KeyCode) {
    if matches!(code, KeyCode::Esc | KeyCode::Tab) {
        app.toggle_edit_mode();
        return;
    }

    let buffer = &mut app.session.composition;
    match code {
        KeyCode::Char(c) => buffer.type_char(c),
        KeyCode::Backspace => buffer.backspace(),
        KeyCode::Delete => buffer.delete(),
        KeyCode::Left => buffer.move_caret(-1),
        KeyCode::Right => buffer.move_caret(1),
        KeyCode::Home => buffer.caret_home(),
        KeyCode::End => buffer.caret_end(),
        _ => {}
    }
}
