//! Transport bar rendering.
//!
//! Displays playback state, tempo, edit mode and the status message.

use crate::app::{App, EditMode};
use crate::playback::TransportState;
use crate::status::StatusKind;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

/// Renders the transport bar at the top of the screen.
pub fn render_transport(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .title(" Transport ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Gray));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(12), // Playback state
            Constraint::Length(12), // Tempo
            Constraint::Length(10), // Mode
            Constraint::Min(20),    // Status
        ])
        .split(inner);

    let play_status = match app.transport_state() {
        TransportState::Playing => Span::styled(
            " [>] PLAY ",
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        ),
        TransportState::Idle => Span::styled(
            " [.] IDLE ",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ),
    };
    frame.render_widget(Paragraph::new(Line::from(play_status)), chunks[0]);

    let tempo_widget = Paragraph::new(Line::from(vec![
        Span::styled("BPM: ", Style::default().fg(Color::DarkGray)),
        Span::styled(
            app.session.tempo.to_string(),
            Style::default().fg(Color::White),
        ),
    ]));
    frame.render_widget(tempo_widget, chunks[1]);

    let (mode_str, mode_color) = match app.edit_mode {
        EditMode::Note => ("NOTE", Color::Blue),
        EditMode::Text => ("TEXT", Color::Green),
    };
    frame.render_widget(
        Paragraph::new(Span::styled(
            format!("-- {} --", mode_str),
            Style::default().fg(mode_color).add_modifier(Modifier::BOLD),
        )),
        chunks[2],
    );

    if let Some(message) = app.status() {
        let color = match message.kind {
            StatusKind::Success => Color::Green,
            StatusKind::Error => Color::Red,
        };
        frame.render_widget(
            Paragraph::new(Span::styled(
                message.text,
                Style::default().fg(color).add_modifier(Modifier::ITALIC),
            )),
            chunks[3],
        );
    }
}
