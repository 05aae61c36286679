use std::collections::HashMap;
use std::sync::Arc;

use crate::storage::ForumRecord;

use super::delta::{diff, RowDelta};
use super::row::{ForumCard, Row, RowId};
use super::tree::ForumTree;

/// Title of the favorites section header.
pub const FAVORITES_HEADER: &str = "Favorites";

// ============================================================================
// Row List Construction
// ============================================================================

/// A freshly computed row list.
pub struct RowModel {
    pub rows: Vec<Row>,
    /// Index of the last favorite row, `None` when there are no favorites.
    pub last_favorite_index: Option<usize>,
}

/// Build the flat row list from the two source collections.
///
/// `favorites` must be in favorite-index order and `forums` in
/// (group order, in-group order); both come straight from storage queries
/// that order them that way.
pub fn build_rows(
    favorites: &[ForumRecord],
    forums: &[ForumRecord],
    tree: &ForumTree,
) -> RowModel {
    let mut rows = Vec::with_capacity(favorites.len() + forums.len() + 8);

    if !favorites.is_empty() {
        rows.push(Row::Header(Arc::from(FAVORITES_HEADER)));
        let last = favorites.len() - 1;
        for (i, record) in favorites.iter().enumerate() {
            rows.push(Row::Favorite(favorite_card(record, i != last)));
        }
    }
    let last_favorite_index = rows.len().checked_sub(1);

    // The last visible forum of each group drops its trailing separator.
    let mut last_visible: HashMap<Option<&str>, &str> = HashMap::new();
    for record in forums {
        if tree.is_visible(&record.id) {
            last_visible.insert(record.group_id.as_deref(), &record.id);
        }
    }

    let mut current_group: Option<&str> = None;
    for record in forums {
        let group = record.group_id.as_deref();
        if group != current_group {
            current_group = group;
            // Nameless groups get no header; their forums still render.
            if let Some(name) = &record.group_name {
                if !name.is_empty() {
                    rows.push(Row::Header(Arc::clone(name)));
                }
            }
        }

        if tree.is_visible(&record.id) {
            let subforum_count = tree.child_count(&record.id);
            rows.push(Row::Forum(ForumCard {
                forum_id: Arc::clone(&record.id),
                name: Arc::clone(&record.name),
                url: record.url.clone(),
                favorite: record.favorite,
                subforum_count,
                expanded: (subforum_count > 0).then_some(record.shows_children),
                indent: tree.depth(&record.id),
                show_separator: last_visible.get(&group).copied() != Some(&*record.id),
            }));
        }
    }

    RowModel {
        rows,
        last_favorite_index,
    }
}

fn favorite_card(record: &ForumRecord, show_separator: bool) -> ForumCard {
    ForumCard {
        forum_id: Arc::clone(&record.id),
        name: Arc::clone(&record.name),
        url: record.url.clone(),
        favorite: true,
        subforum_count: 0,
        expanded: None,
        indent: 0,
        show_separator,
    }
}

// ============================================================================
// Builder
// ============================================================================

/// Holds the current row list and reconciles it with each recomputation.
///
/// Every change to the favorite set, the forum set, or a collapse flag funnels
/// into one [`rebuild`](Self::rebuild) pass: the list is recomputed wholesale,
/// diffed against its predecessor, and replaced. There is no partial update.
#[derive(Default)]
pub struct RowModelBuilder {
    rows: Vec<Row>,
    last_favorite_index: Option<usize>,
    suppress_updates: bool,
}

impl RowModelBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_favorites(&self) -> bool {
        self.last_favorite_index.is_some()
    }

    pub fn last_favorite_index(&self) -> Option<usize> {
        self.last_favorite_index
    }

    pub fn row_at(&self, index: usize) -> Option<&Row> {
        self.rows.get(index)
    }

    /// First row backed by the given forum (a favorite row when the forum is
    /// pinned, since favorites precede the grouped sections).
    pub fn index_of_forum(&self, forum_id: &str) -> Option<usize> {
        self.rows
            .iter()
            .position(|row| row.forum_id() == Some(forum_id))
    }

    pub fn index_of_identity(&self, identity: &RowId) -> Option<usize> {
        self.rows.iter().position(|row| row.identity() == *identity)
    }

    /// Recompute the row list and diff it against the previous one.
    ///
    /// Returns `None` when nothing changed or while updates are suppressed;
    /// otherwise the delta that transforms the old list into the new one.
    /// The unchanged case is the common one, and callers skip all update
    /// work on it.
    pub fn rebuild(
        &mut self,
        favorites: &[ForumRecord],
        forums: &[ForumRecord],
        tree: &ForumTree,
    ) -> Option<RowDelta> {
        let model = build_rows(favorites, forums, tree);

        if self.suppress_updates {
            self.rows = model.rows;
            self.last_favorite_index = model.last_favorite_index;
            return None;
        }

        let old_ids: Vec<RowId> = self.rows.iter().map(Row::identity).collect();
        let new_ids: Vec<RowId> = model.rows.iter().map(Row::identity).collect();
        let delta = diff(&old_ids, &new_ids);
        debug_assert_eq!(
            delta.apply(&old_ids, &new_ids),
            new_ids,
            "delta must replay old rows into new rows"
        );

        self.rows = model.rows;
        self.last_favorite_index = model.last_favorite_index;

        if delta.is_empty() {
            None
        } else {
            tracing::debug!(
                deletions = delta.deletions.len(),
                insertions = delta.insertions.len(),
                moves = delta.moves.len(),
                rows = self.rows.len(),
                "forum list changed"
            );
            Some(delta)
        }
    }

    /// Run `f` with delta reporting suppressed.
    ///
    /// Used when the caller is about to mutate its own source data (favorite
    /// reorder writes) and must not react to the resulting rebuild.
    pub fn without_updates<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        self.suppress_updates = true;
        let out = f(self);
        self.suppress_updates = false;
        out
    }
}
