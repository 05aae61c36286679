//! Main event loop for the TUI.
//!
//! Multiplexes terminal input, a periodic tick, and shutdown signals. All
//! state changes happen on this task; storage writes are awaited inline, so
//! the row model never sees a half-applied change.

use crate::app::App;
use anyhow::Result;
use crossterm::{
    event::Event,
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use ratatui::{backend::CrosstermBackend, widgets::ListState, Terminal};
use std::io::{self, Stdout};
use std::time::Duration;

#[cfg(unix)]
use tokio::signal::unix::{signal, SignalKind};

use super::input::handle_input;
use super::render::render;

/// Result of handling a key press event.
pub enum Action {
    /// Continue the event loop and process more events.
    Continue,
    /// Exit the application and restore the terminal.
    Quit,
}

/// Cadence of the housekeeping tick that expires status flashes.
const TICK: Duration = Duration::from_millis(250);

/// Runs the TUI application event loop until the user quits or a shutdown
/// signal arrives.
///
/// A panic hook restores the terminal before unwinding so a bug never leaves
/// the shell in raw mode. Rendering is lazy: a frame is drawn only when some
/// handler flagged `needs_redraw`, which an unchanged-row-list reload never
/// does.
pub async fn run(app: &mut App) -> Result<()> {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let mut terminal = setup_terminal()?;
    let mut input_events = crossterm::event::EventStream::new();
    let mut tick = tokio::time::interval(TICK);
    // Scroll offset for the forum list; survives across frames so the view
    // doesn't snap back while navigating.
    let mut list_state = ListState::default();

    #[cfg(unix)]
    let mut sigterm = signal(SignalKind::terminate())?;
    #[cfg(unix)]
    let mut sigint = signal(SignalKind::interrupt())?;

    'outer: loop {
        if app.needs_redraw {
            terminal.draw(|f| render(f, app, &mut list_state))?;
            app.needs_redraw = false;
        }
        if app.clear_expired_status() {
            app.needs_redraw = true;
        }

        #[cfg(unix)]
        let shutdown = async {
            tokio::select! {
                _ = sigterm.recv() => "SIGTERM",
                _ = sigint.recv() => "SIGINT",
            }
        };
        #[cfg(not(unix))]
        let shutdown = std::future::pending::<&str>();

        tokio::select! {
            biased;  // Signals first, then input, for predictable shutdown

            sig = shutdown => {
                tracing::info!(signal = sig, "shutting down");
                break 'outer;
            }

            maybe_event = input_events.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key))) => {
                        app.needs_redraw = true;
                        match handle_input(app, key.code, key.modifiers).await {
                            Ok(Action::Quit) => break 'outer,
                            Ok(Action::Continue) => {}
                            Err(e) => app.set_status(format!("Error: {}", e)),
                        }
                    }
                    Some(Ok(Event::Resize(_, _))) => app.needs_redraw = true,
                    _ => {}
                }
            }

            _ = tick.tick() => {
                // Nothing to do here: status expiry runs at the top of the
                // loop, the tick just guarantees the loop comes back around.
            }
        }
    }

    restore_terminal(terminal)
}

/// Put the terminal into raw mode on the alternate screen.
fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    Ok(Terminal::new(CrosstermBackend::new(stdout))?)
}

/// Undo `setup_terminal`.
fn restore_terminal(mut terminal: Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}
