//! Terminal user interface components.
//!
//! Three stacked panels: transport bar, composition editor and the
//! computer-keyboard piano, plus the save dialog drawn on top.

mod composition;
mod dialogs;
mod keyboard;
mod transport;

use crate::app::{App, LayoutRegions};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::widgets::{Block, Borders};
use ratatui::Frame;

pub use composition::render_composition;
pub use dialogs::render_save_dialog;
pub use keyboard::render_keyboard;
pub use transport::render_transport;

/// Splits the screen into transport, composition and keyboard areas.
fn calculate_layout(size: Rect) -> [Rect; 3] {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Transport
            Constraint::Min(5),    // Composition
            Constraint::Length(5), // Keyboard
        ])
        .split(size);

    [chunks[0], chunks[1], chunks[2]]
}

/// Renders the complete UI and records layout regions for mouse hit testing.
pub fn render(frame: &mut Frame, app: &mut App) {
    let [transport, composition, keyboard] = calculate_layout(frame.area());

    app.layout = LayoutRegions {
        transport,
        composition,
        keyboard: Block::default().borders(Borders::ALL).inner(keyboard),
    };

    render_transport(frame, transport, app);
    render_composition(frame, composition, app);
    render_keyboard(frame, keyboard, app);
    render_save_dialog(frame, app);
}

/// Helper function to center a rectangle within another rectangle.
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
