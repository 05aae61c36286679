use std::sync::Arc;
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

/// Database-specific errors with user-friendly messages
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// Another instance of the application has locked the database
    #[error("Another instance of lurk appears to be running. Please close it and try again.")]
    InstanceLocked,

    /// Migration failed
    #[error("Database migration failed: {0}")]
    Migration(String),

    /// Generic database error
    #[error("Database error: {0}")]
    Other(#[from] sqlx::Error),
}

impl DatabaseError {
    /// Check if a sqlx error indicates database locking
    pub(crate) fn from_sqlx(err: sqlx::Error) -> Self {
        let error_string = err.to_string().to_lowercase();

        // SQLITE_BUSY (5), SQLITE_LOCKED (6), SQLITE_CANTOPEN (14)
        if error_string.contains("database is locked")
            || error_string.contains("database table is locked")
            || error_string.contains("sqlite_busy")
            || error_string.contains("sqlite_locked")
            || error_string.contains("unable to open database file")
        {
            return DatabaseError::InstanceLocked;
        }

        DatabaseError::Other(err)
    }
}

// ============================================================================
// Upsert Inputs
// ============================================================================

/// A forum group as flattened from the imported index file.
#[derive(Debug, Clone)]
pub struct GroupUpsert {
    pub id: String,
    /// `None` renders the group's forums without a section header.
    pub name: Option<String>,
    pub sort_order: i64,
}

/// A forum as flattened from the imported index file.
#[derive(Debug, Clone)]
pub struct ForumUpsert {
    pub id: String,
    pub name: String,
    pub group_id: Option<String>,
    pub parent_id: Option<String>,
    pub sort_order: i64,
    pub url: Option<String>,
}

// ============================================================================
// Records
// ============================================================================

/// Internal row type for forum queries (used by sqlx FromRow).
/// Converts to [`ForumRecord`] via `into_record()` with Arc wrapping.
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct ForumDbRow {
    pub id: String,
    pub name: String,
    pub group_id: Option<String>,
    pub parent_id: Option<String>,
    pub url: Option<String>,
    pub favorite: bool,
    pub favorite_index: Option<i64>,
    pub shows_children: bool,
    pub group_name: Option<String>,
}

impl ForumDbRow {
    pub(crate) fn into_record(self) -> ForumRecord {
        ForumRecord {
            id: Arc::from(self.id),
            name: Arc::from(self.name),
            group_id: self.group_id.map(Arc::from),
            group_name: self.group_name.map(Arc::from),
            parent_id: self.parent_id.map(Arc::from),
            url: self.url.map(Arc::from),
            favorite: self.favorite,
            favorite_index: self.favorite_index,
            shows_children: self.shows_children,
        }
    }
}

/// Forum data from the database, joined with its group.
///
/// String fields use `Arc<str>` so the row-model rebuild can clone them into
/// cards without re-allocating on every refresh.
#[derive(Debug, Clone)]
pub struct ForumRecord {
    pub id: Arc<str>,
    pub name: Arc<str>,
    pub group_id: Option<Arc<str>>,
    pub group_name: Option<Arc<str>>,
    pub parent_id: Option<Arc<str>>,
    pub url: Option<Arc<str>>,
    pub favorite: bool,
    pub favorite_index: Option<i64>,
    pub shows_children: bool,
}

#[cfg(test)]
impl ForumRecord {
    /// Minimal record for model tests: no group, no parent, expanded.
    pub fn stub(id: &str) -> Self {
        Self {
            id: Arc::from(id),
            name: Arc::from(id),
            group_id: None,
            group_name: None,
            parent_id: None,
            url: None,
            favorite: false,
            favorite_index: None,
            shows_children: true,
        }
    }
}
