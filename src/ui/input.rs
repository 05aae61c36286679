//! Input handling for the TUI.
//!
//! Keys resolve to actions through the keybinding registry; row-kind checks
//! happen here so the app layer's contracts hold (favorite reordering is only
//! ever invoked on a favorite row).

use crate::app::{App, MoveDirection};
use crate::keybindings::Action as Binding;
use crate::model::Row;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyModifiers};

use super::Action;

/// Main input dispatch function.
pub(super) async fn handle_input(
    app: &mut App,
    code: KeyCode,
    modifiers: KeyModifiers,
) -> Result<Action> {
    // The help overlay captures all keys while visible.
    if app.show_help {
        app.show_help = false;
        return Ok(Action::Continue);
    }

    let Some(binding) = app.keys.action_for(code, modifiers) else {
        return Ok(Action::Continue);
    };

    match binding {
        Binding::Quit => return Ok(Action::Quit),

        Binding::NavDown => app.select_next(),
        Binding::NavUp => app.select_prev(),
        Binding::NavTop => app.select_first(),
        Binding::NavBottom => app.select_last(),

        Binding::ToggleExpand => app.toggle_expand().await?,
        Binding::ToggleFavorite => app.toggle_favorite().await?,

        Binding::MoveFavoriteUp | Binding::MoveFavoriteDown => {
            // Only favorite rows reorder; anywhere else this key is a no-op
            // flash, not a contract violation.
            if matches!(app.selected_row(), Some(Row::Favorite(_))) {
                let direction = if binding == Binding::MoveFavoriteUp {
                    MoveDirection::Up
                } else {
                    MoveDirection::Down
                };
                app.move_selected_favorite(direction).await?;
            } else {
                app.set_status("only favorites can be reordered");
            }
        }

        Binding::OpenInBrowser => app.open_selected().await?,

        Binding::Reload => {
            app.reload().await?;
            app.set_status("reloaded");
        }

        Binding::CycleTheme => app.cycle_theme(),
        Binding::ShowHelp => app.show_help = true,
        Binding::Back => {}
    }

    Ok(Action::Continue)
}
