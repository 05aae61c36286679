use crate::config::Config;
use crate::keybindings::KeybindingRegistry;
use crate::model::{ForumTree, Row, RowModelBuilder};
use crate::storage::Database;
use crate::theme::{Palette, ThemeVariant};
use anyhow::{Context, Result};
use std::time::Duration;
use tokio::time::Instant;

/// Meta key under which the last index sync time is stored.
pub const SYNCED_AT_KEY: &str = "synced_at";

// ============================================================================
// Application State
// ============================================================================

/// Direction for favorite reordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveDirection {
    Up,
    Down,
}

pub struct App {
    pub db: Database,
    pub builder: RowModelBuilder,
    pub tree: ForumTree,

    /// Index of the selected row in the flat row list.
    pub selected: usize,
    pub show_help: bool,
    pub needs_redraw: bool,

    pub theme: ThemeVariant,
    pub palette: Palette,
    pub keys: KeybindingRegistry,

    /// Transient status flash: message + when it was set.
    pub status_message: Option<(String, Instant)>,
    status_flash: Duration,

    /// When the index was last imported, for the status line.
    pub synced_at: Option<String>,
}

impl App {
    pub fn new(db: Database, config: &Config) -> Self {
        let theme = ThemeVariant::from_str_name(&config.theme).unwrap_or_else(|| {
            tracing::warn!(theme = %config.theme, "unknown theme in config, using dark");
            ThemeVariant::Dark
        });
        let mut keys = KeybindingRegistry::new();
        keys.apply_overrides(&config.keybindings);

        Self {
            db,
            builder: RowModelBuilder::new(),
            tree: ForumTree::empty(),
            selected: 0,
            show_help: false,
            needs_redraw: true,
            theme,
            palette: theme.palette(),
            keys,
            status_message: None,
            status_flash: Duration::from_secs(config.status_flash_seconds.max(1)),
            synced_at: None,
        }
    }

    // ========================================================================
    // Reload / Rebuild
    // ========================================================================

    /// Re-query both source collections and rebuild the row list.
    ///
    /// Every change notification funnels through here: favorite toggles,
    /// collapse flags, index imports. When the rebuild reports a delta the
    /// screen is redrawn, a flash summarizes the change, and the selection
    /// follows its row by identity; an empty delta leaves the screen alone.
    pub async fn reload(&mut self) -> Result<()> {
        let selected_identity = self.builder.row_at(self.selected).map(Row::identity);

        let favorites = self.db.get_favorites().await.context("loading favorites")?;
        let forums = self
            .db
            .get_forums_ordered()
            .await
            .context("loading forums")?;
        self.tree = ForumTree::from_records(&forums);

        if let Some(delta) = self.builder.rebuild(&favorites, &forums, &self.tree) {
            self.needs_redraw = true;
            self.set_status(format!(
                "{} removed, {} added, {} moved",
                delta.deletions.len(),
                delta.insertions.len(),
                delta.moves.len()
            ));

            // Follow the selected row wherever the delta put it; if it was
            // deleted, stay in place (clamped).
            if let Some(identity) = selected_identity {
                if let Some(index) = self.builder.index_of_identity(&identity) {
                    self.selected = index;
                }
            }
        }
        self.clamp_selection();
        Ok(())
    }

    fn clamp_selection(&mut self) {
        if self.builder.is_empty() {
            self.selected = 0;
        } else if self.selected >= self.builder.len() {
            self.selected = self.builder.len() - 1;
        }
    }

    // ========================================================================
    // Selection
    // ========================================================================

    pub fn selected_row(&self) -> Option<&Row> {
        self.builder.row_at(self.selected)
    }

    /// Move the selection down, skipping header rows.
    pub fn select_next(&mut self) {
        if let Some(index) = self.next_selectable(self.selected, 1) {
            self.selected = index;
        }
    }

    /// Move the selection up, skipping header rows.
    pub fn select_prev(&mut self) {
        if let Some(index) = self.next_selectable(self.selected, -1) {
            self.selected = index;
        }
    }

    pub fn select_first(&mut self) {
        // Land on the first non-header row if there is one.
        self.selected = 0;
        if self.selected_row().is_some_and(Row::is_header) {
            self.select_next();
        }
    }

    pub fn select_last(&mut self) {
        if !self.builder.is_empty() {
            self.selected = self.builder.len() - 1;
            if self.selected_row().is_some_and(Row::is_header) {
                self.select_prev();
            }
        }
    }

    fn next_selectable(&self, start: usize, step: isize) -> Option<usize> {
        let len = self.builder.len() as isize;
        let mut index = start as isize + step;
        while (0..len).contains(&index) {
            if !self.builder.row_at(index as usize)?.is_header() {
                return Some(index as usize);
            }
            index += step;
        }
        None
    }

    // ========================================================================
    // Row Operations
    // ========================================================================

    /// Expand or collapse the selected forum's subforums. No-op flash on rows
    /// that cannot expand (headers, favorites, leaves).
    pub async fn toggle_expand(&mut self) -> Result<()> {
        let Some(Row::Forum(card)) = self.selected_row() else {
            self.set_status("nothing to expand here");
            return Ok(());
        };
        let Some(expanded) = card.expanded else {
            self.set_status("no subforums");
            return Ok(());
        };
        let forum_id = card.forum_id.to_string();

        self.db.set_shows_children(&forum_id, !expanded).await?;
        self.reload().await
    }

    /// Pin or unpin the selected row's forum.
    pub async fn toggle_favorite(&mut self) -> Result<()> {
        let Some(card) = self.selected_row().and_then(Row::card) else {
            self.set_status("select a forum to pin");
            return Ok(());
        };
        let forum_id = card.forum_id.to_string();
        let pin = !card.favorite;

        self.db.set_favorite(&forum_id, pin).await?;
        self.reload().await?;
        self.set_status(if pin { "pinned" } else { "unpinned" });
        Ok(())
    }

    /// Move the selected favorite one position up or down.
    ///
    /// The reorder is this screen's own write: the rebuild runs with updates
    /// suppressed so the list does not re-animate in response to it; the
    /// selection tracks the moved row manually.
    ///
    /// # Panics
    ///
    /// Panics if the selected row is not a favorite row; callers check the
    /// row kind first (the input layer flashes a status instead).
    pub async fn move_selected_favorite(&mut self, direction: MoveDirection) -> Result<()> {
        let Some(Row::Favorite(_)) = self.selected_row() else {
            panic!("move_selected_favorite on a non-favorite row");
        };

        // Favorites occupy rows 1..=last_favorite_index (row 0 is the header).
        let from = self.selected - 1;
        let count = self.builder.last_favorite_index().unwrap_or(0);
        let to = match direction {
            MoveDirection::Up if from > 0 => from - 1,
            MoveDirection::Down if from + 1 < count => from + 1,
            _ => {
                self.set_status("already at the edge");
                return Ok(());
            }
        };

        self.db.reorder_favorite(from, to).await?;

        let favorites = self.db.get_favorites().await?;
        let forums = self.db.get_forums_ordered().await?;
        self.tree = ForumTree::from_records(&forums);
        self.builder
            .without_updates(|builder| builder.rebuild(&favorites, &forums, &self.tree));

        self.selected = to + 1;
        self.needs_redraw = true;
        Ok(())
    }

    /// Open the selected forum's URL in the system browser.
    pub async fn open_selected(&mut self) -> Result<()> {
        let Some(card) = self.selected_row().and_then(Row::card) else {
            self.set_status("select a forum to open");
            return Ok(());
        };
        let Some(url) = &card.url else {
            self.set_status("forum has no URL");
            return Ok(());
        };

        let url = url.to_string();
        open::that(&url).with_context(|| format!("opening {}", url))?;
        self.set_status("opened in browser");
        Ok(())
    }

    pub fn cycle_theme(&mut self) {
        self.theme = self.theme.next();
        self.palette = self.theme.palette();
        self.set_status(format!("theme: {}", self.theme.name()));
        self.needs_redraw = true;
    }

    // ========================================================================
    // Status
    // ========================================================================

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some((message.into(), Instant::now()));
        self.needs_redraw = true;
    }

    /// Drop an expired status flash. Returns true if one was cleared.
    pub fn clear_expired_status(&mut self) -> bool {
        if let Some((_, since)) = &self.status_message {
            if since.elapsed() >= self.status_flash {
                self.status_message = None;
                return true;
            }
        }
        false
    }
}
