//! Piano keyboard display.
//!
//! Shows the computer keyboard to note mapping, lights up keys that are
//! active during playback, and lists the key bindings for the current mode.

use crate::app::{App, EditMode, KEYBOARD_MAP, LOWER_KEYS, UPPER_KEYS};
use crate::composition::note_to_name;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

/// Builds a keyboard row from a slice of key characters.
///
/// Each cell is three columns wide, matching `KEY_CELL_WIDTH` used for
/// mouse hit testing.
fn build_keyboard_row(keys: &[char], app: &App) -> Vec<Span<'static>> {
    keys.iter()
        .map(|&key| {
            let note = KEYBOARD_MAP
                .iter()
                .find(|(k, _)| k.to_ascii_uppercase() == key)
                .and_then(|(_, base)| app.shifted(*base));

            let Some(note) = note else {
                return Span::styled(format!(" {} ", key), Style::default().fg(Color::DarkGray));
            };

            let is_black = matches!(note % 12, 1 | 3 | 6 | 8 | 10);
            let style = if app.highlights().is_active(&note_to_name(note)) {
                Style::default()
                    .fg(Color::White)
                    .bg(Color::Blue)
                    .add_modifier(Modifier::BOLD)
            } else if is_black {
                Style::default()
                    .fg(Color::White)
                    .bg(Color::DarkGray)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::White)
                    .add_modifier(Modifier::BOLD)
            };

            Span::styled(format!(" {} ", key), style)
        })
        .collect()
}

/// Renders the piano keyboard at the bottom of the screen.
pub fn render_keyboard(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .title(format!(
            " Keyboard (C{} to C{}) ",
            3 + app.octave_offset as i16,
            5 + app.octave_offset as i16
        ))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(if app.edit_mode == EditMode::Note {
            Color::Cyan
        } else {
            Color::Gray
        }));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = [
        Line::from(build_keyboard_row(&UPPER_KEYS, app)),
        Line::from(build_keyboard_row(&LOWER_KEYS, app)),
        build_contextual_help(app.edit_mode),
    ];

    for (offset, row) in rows.into_iter().enumerate().take(inner.height as usize) {
        frame.render_widget(
            Paragraph::new(row),
            Rect::new(inner.x, inner.y + offset as u16, inner.width, 1),
        );
    }
}

/// Builds the contextual help line based on the current edit mode.
fn build_contextual_help(mode: EditMode) -> Line<'static> {
    let key_style = Style::default().fg(Color::Yellow);
    let bracket_style = Style::default().fg(Color::DarkGray);
    let desc_style = Style::default().fg(Color::DarkGray);

    let bindings: &[(&'static str, &'static str)] = match mode {
        EditMode::Note => &[
            ("Space", "Play "),
            ("Esc", "Stop "),
            ("|", "Bar "),
            (",.", "Oct "),
            ("+-", "BPM "),
            ("^G", "Gen "),
            ("^S", "Save "),
            ("^O", "Load "),
            ("^L", "Clear "),
            ("Tab", "Text "),
            ("^Q", "Quit"),
        ],
        EditMode::Text => &[
            ("Arrows", "Move "),
            ("Home/End", "Jump "),
            ("Bksp/Del", "Erase "),
            ("Esc/Tab", "Notes"),
        ],
    };

    let mut spans = Vec::with_capacity(bindings.len() * 3 + 1);
    if mode == EditMode::Text {
        spans.push(Span::styled(
            "TEXT MODE  ",
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        ));
    }
    for (key, desc) in bindings {
        spans.push(Span::styled("[", bracket_style));
        spans.push(Span::styled(*key, key_style));
        spans.push(Span::styled(format!("]{}", desc), desc_style));
    }
    Line::from(spans)
}
