//! Composition editor rendering.

use crate::app::{App, EditMode};
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

/// Splits `text` around the caret into (before, at caret, after).
///
/// The middle part is a single character, or a blank when the caret is at
/// the end.
fn split_at_caret(text: &str, caret: usize) -> (&str, String, &str) {
    let mut chars = text.char_indices().skip(caret);
    match chars.next() {
        Some((start, c)) => {
            let end = start + c.len_utf8();
            (&text[..start], c.to_string(), &text[end..])
        }
        None => (text, " ".to_string(), ""),
    }
}

/// Renders the composition text with its caret, and the artifact line.
pub fn render_composition(frame: &mut Frame, area: Rect, app: &App) {
    let focused = app.edit_mode == EditMode::Text;
    let block = Block::default()
        .title(" Composition ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(if focused { Color::Cyan } else { Color::Gray }));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    if inner.height == 0 {
        return;
    }

    let buffer = &app.session.composition;
    let (before, at, after) = split_at_caret(buffer.text(), buffer.caret());
    let text_style = Style::default().fg(Color::White);
    let caret_style = if focused {
        Style::default().fg(Color::Black).bg(Color::Cyan)
    } else {
        Style::default().add_modifier(Modifier::REVERSED)
    };

    let text_area = Rect::new(inner.x, inner.y, inner.width, inner.height.saturating_sub(1));
    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled(before, text_style),
            Span::styled(at, caret_style),
            Span::styled(after, text_style),
        ]))
        .wrap(Wrap { trim: false }),
        text_area,
    );

    let artifact_line = match &app.session.artifact {
        Some(artifact) => Line::from(vec![
            Span::styled("MIDI: ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                artifact.filename.as_str(),
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::UNDERLINED),
            ),
            Span::styled("  [^D] Download", Style::default().fg(Color::DarkGray)),
        ]),
        None => Line::from(Span::styled(
            "No MIDI generated",
            Style::default().fg(Color::DarkGray),
        )),
    };
    frame.render_widget(
        Paragraph::new(artifact_line),
        Rect::new(inner.x, inner.y + inner.height - 1, inner.width, 1),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_at_caret() {
        assert_eq!(split_at_caret("C4 D4", 0), ("", "C".to_string(), "4 D4"));
        assert_eq!(split_at_caret("C4 D4", 2), ("C4", " ".to_string(), "D4"));
        assert_eq!(split_at_caret("C4 D4", 5), ("C4 D4", " ".to_string(), ""));
        assert_eq!(split_at_caret("é C4", 1), ("é", " ".to_string(), "C4"));
    }
}
