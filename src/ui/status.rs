use crate::app::App;
use ratatui::{layout::Rect, widgets::Paragraph, Frame};
use std::borrow::Cow;

/// Render the status bar: a transient flash when one is active, otherwise
/// keybinding hints plus the last index sync time.
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 1 || area.height < 1 {
        return;
    }

    let text: Cow<'_, str> = if let Some((msg, _)) = &app.status_message {
        Cow::Borrowed(msg.as_str())
    } else {
        match &app.synced_at {
            Some(synced) => Cow::Owned(format!(
                "[Space]fold [f]pin [J/K]reorder [o]pen [r]eload [?]help [q]uit | synced {}",
                synced
            )),
            None => Cow::Borrowed("[Space]fold [f]pin [J/K]reorder [o]pen [r]eload [?]help [q]uit"),
        }
    };

    let paragraph = Paragraph::new(text).style(app.palette.status_bar);
    f.render_widget(paragraph, area);
}
