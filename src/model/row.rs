use std::sync::Arc;

// ============================================================================
// Row Identity
// ============================================================================

/// Diff identity of a row.
///
/// Headers are identified by their title; forum and favorite rows by the forum
/// id alone. Display data ([`ForumCard`]) is deliberately excluded: a forum
/// whose card changed (new subforum count, toggled expand indicator) is still
/// the same row and must not show up in a delta as an insert/delete pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RowId {
    Header(Arc<str>),
    Forum(Arc<str>),
    Favorite(Arc<str>),
}

// ============================================================================
// Display Data
// ============================================================================

/// Per-row display data for a forum or favorite row.
///
/// `Arc<str>` fields keep the wholesale row-list rebuild cheap: cards are
/// cloned out of storage records, not re-allocated.
#[derive(Debug, Clone)]
pub struct ForumCard {
    pub forum_id: Arc<str>,
    pub name: Arc<str>,
    pub url: Option<Arc<str>>,
    /// Starred in the favorites section.
    pub favorite: bool,
    pub subforum_count: usize,
    /// `None` when the forum has no subforums (indicator hidden),
    /// otherwise whether the subforums are currently shown.
    pub expanded: Option<bool>,
    /// Ancestor count; rendered as leading indentation.
    pub indent: usize,
    /// Draw a trailing separator rule under this row. Suppressed on the last
    /// favorite and on the last visible forum of each group.
    pub show_separator: bool,
}

// ============================================================================
// Row
// ============================================================================

/// One displayable line in the forum list.
#[derive(Debug, Clone)]
pub enum Row {
    Header(Arc<str>),
    Forum(ForumCard),
    Favorite(ForumCard),
}

impl Row {
    /// The identity used for diffing. See [`RowId`].
    pub fn identity(&self) -> RowId {
        match self {
            Row::Header(title) => RowId::Header(Arc::clone(title)),
            Row::Forum(card) => RowId::Forum(Arc::clone(&card.forum_id)),
            Row::Favorite(card) => RowId::Favorite(Arc::clone(&card.forum_id)),
        }
    }

    /// The forum id behind this row, `None` for headers.
    pub fn forum_id(&self) -> Option<&str> {
        self.card().map(|card| &*card.forum_id)
    }

    /// Display data, `None` for headers.
    pub fn card(&self) -> Option<&ForumCard> {
        match self {
            Row::Header(_) => None,
            Row::Forum(card) | Row::Favorite(card) => Some(card),
        }
    }

    pub fn is_header(&self) -> bool {
        matches!(self, Row::Header(_))
    }

    pub fn is_favorite(&self) -> bool {
        matches!(self, Row::Favorite(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(id: &str, name: &str) -> ForumCard {
        ForumCard {
            forum_id: Arc::from(id),
            name: Arc::from(name),
            url: None,
            favorite: false,
            subforum_count: 0,
            expanded: None,
            indent: 0,
            show_separator: true,
        }
    }

    #[test]
    fn identity_ignores_display_data() {
        let a = Row::Forum(card("42", "General"));
        let mut renamed = card("42", "General Discussion");
        renamed.subforum_count = 3;
        renamed.show_separator = false;
        let b = Row::Forum(renamed);

        assert_eq!(a.identity(), b.identity());
    }

    #[test]
    fn identity_distinguishes_variant() {
        let forum = Row::Forum(card("42", "General"));
        let favorite = Row::Favorite(card("42", "General"));

        // Same forum pinned as a favorite is a different row.
        assert_ne!(forum.identity(), favorite.identity());
    }

    #[test]
    fn header_identity_is_title() {
        let a = Row::Header(Arc::from("Favorites"));
        let b = Row::Header(Arc::from("Favorites"));
        let c = Row::Header(Arc::from("Archives"));

        assert_eq!(a.identity(), b.identity());
        assert_ne!(a.identity(), c.identity());
        assert!(a.forum_id().is_none());
    }
}
