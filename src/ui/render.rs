//! Render functions for the TUI.
//!
//! Layout dispatch: the forum list fills the screen above a one-line status
//! bar; the help overlay draws on top when visible.

use crate::app::App;
use ratatui::{
    layout::{Constraint, Direction, Layout},
    widgets::{ListState, Paragraph},
    Frame,
};

use super::{forum_list, help, status};

/// Minimum terminal dimensions required for normal operation.
const MIN_WIDTH: u16 = 30;
const MIN_HEIGHT: u16 = 6;

/// Main render dispatch function.
pub(super) fn render(f: &mut Frame, app: &App, list_state: &mut ListState) {
    let area = f.area();

    // Guard against zero-width/height to prevent panics
    if area.width < 1 || area.height < 1 {
        return;
    }

    if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
        f.render_widget(
            Paragraph::new(format!(
                "Terminal too small (need {}x{})",
                MIN_WIDTH, MIN_HEIGHT
            )),
            area,
        );
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(area);

    forum_list::render(f, app, list_state, chunks[0]);
    status::render(f, app, chunks[1]);

    if app.show_help {
        help::render(f, app);
    }
}
