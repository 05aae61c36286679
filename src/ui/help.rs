//! Help overlay — keybinding table.
//!
//! Renders a centered overlay listing every binding, including user
//! overrides from config. Any key dismisses it.

use crate::app::App;
use crate::keybindings::format_key;
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

/// Render the help overlay on top of the current view.
pub fn render(f: &mut Frame, app: &App) {
    let area = f.area();
    let overlay = centered_rect(50, 80, area);
    if overlay.width < 24 || overlay.height < 6 {
        return;
    }

    // Clear the background behind the overlay
    f.render_widget(Clear, overlay);

    let key_column = 10;
    let lines: Vec<Line> = app
        .keys
        .bindings()
        .iter()
        .map(|(key, action)| {
            Line::from(vec![
                Span::styled(
                    format!("{:>width$}  ", format_key(key), width = key_column),
                    app.palette.help_key,
                ),
                Span::raw(action.describe()),
            ])
        })
        .collect();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(app.palette.border_focused)
        .title(Span::styled(" Keys ", app.palette.help_title));
    f.render_widget(Paragraph::new(lines).block(block), overlay);
}

/// A rectangle centered in `area`, sized as percentages of it.
fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let width = area.width * percent_x / 100;
    let height = area.height * percent_y / 100;
    Rect {
        x: area.x + (area.width.saturating_sub(width)) / 2,
        y: area.y + (area.height.saturating_sub(height)) / 2,
        width,
        height,
    }
}
