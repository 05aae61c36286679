use anyhow::Result;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    SqlitePool,
};
use std::str::FromStr;
use std::time::Duration;

use super::types::DatabaseError;

// ============================================================================
// Database
// ============================================================================

#[derive(Clone)]
pub struct Database {
    pub(crate) pool: SqlitePool,
}

impl Database {
    /// Open (creating if needed) the forum database and bring its schema up
    /// to date.
    ///
    /// # Errors
    ///
    /// `DatabaseError::InstanceLocked` when another lurk process holds the
    /// file (SQLITE_BUSY / SQLITE_LOCKED / SQLITE_CANTOPEN),
    /// `DatabaseError::Migration` when the schema could not be applied,
    /// `DatabaseError::Other` otherwise.
    pub async fn open(path: &str) -> Result<Self, DatabaseError> {
        // The database carries local user state (favorites, collapse flags):
        // user-only file permissions, set before any connection exists.
        #[cfg(unix)]
        if path != ":memory:" && std::path::Path::new(path).exists() {
            use std::os::unix::fs::PermissionsExt;
            if let Err(e) =
                std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
            {
                tracing::warn!(path = %path, error = %e, "Failed to set database file permissions");
            }
        }

        // busy_timeout makes SQLite wait out transient lock contention
        // instead of surfacing SQLITE_BUSY; set as a pragma so every pooled
        // connection inherits it.
        let options = SqliteConnectOptions::from_str(&format!("sqlite:{}?mode=rwc", path))
            .map_err(DatabaseError::from_sqlx)?
            .pragma("busy_timeout", "5000");
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(10))
            .connect_with(options)
            .await
            .map_err(DatabaseError::from_sqlx)?;

        let db = Self { pool };
        db.migrate().await.map_err(|e| {
            let msg = e.to_string().to_lowercase();
            if msg.contains("locked") || msg.contains("sqlite_busy") {
                DatabaseError::InstanceLocked
            } else {
                DatabaseError::Migration(e.to_string())
            }
        })?;
        Ok(db)
    }

    /// Apply the schema inside one transaction. Every statement is
    /// `IF NOT EXISTS`, so re-running against an existing database is a
    /// no-op and a mid-way failure rolls back cleanly.
    async fn migrate(&self) -> Result<()> {
        // Per-connection setting, must run outside the transaction
        sqlx::query("PRAGMA foreign_keys = ON")
            .execute(&self.pool)
            .await?;

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS groups (
                id TEXT PRIMARY KEY,
                name TEXT,
                sort_order INTEGER NOT NULL DEFAULT 0
            )
        "#,
        )
        .execute(&mut *tx)
        .await?;

        // favorite, favorite_index, and shows_children are local user state;
        // everything else is replaced by index imports.
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS forums (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                group_id TEXT REFERENCES groups(id) ON DELETE SET NULL,
                parent_id TEXT,
                sort_order INTEGER NOT NULL DEFAULT 0,
                url TEXT,
                favorite INTEGER NOT NULL DEFAULT 0,
                favorite_index INTEGER,
                shows_children INTEGER NOT NULL DEFAULT 1
            )
        "#,
        )
        .execute(&mut *tx)
        .await?;

        for index in [
            "CREATE INDEX IF NOT EXISTS idx_forums_group ON forums(group_id, sort_order)",
            "CREATE INDEX IF NOT EXISTS idx_forums_parent ON forums(parent_id)",
            "CREATE INDEX IF NOT EXISTS idx_forums_favorite ON forums(favorite_index) WHERE favorite = 1",
        ] {
            sqlx::query(index).execute(&mut *tx).await?;
        }

        // Key-value metadata (index sync timestamp and the like)
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS meta (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            )
        "#,
        )
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }

    // ========================================================================
    // Meta Operations
    // ========================================================================

    pub async fn set_meta(&self, key: &str, value: &str) -> Result<()> {
        sqlx::query(
            "INSERT INTO meta (key, value) VALUES (?, ?)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn get_meta(&self, key: &str) -> Result<Option<String>> {
        let row: Option<(String,)> = sqlx::query_as("SELECT value FROM meta WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|(value,)| value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_open_in_memory_and_migrate_twice() {
        let db = Database::open(":memory:").await.unwrap();
        // Idempotent: a second migrate pass is a no-op.
        db.migrate().await.unwrap();
    }

    #[tokio::test]
    async fn test_meta_round_trip() {
        let db = Database::open(":memory:").await.unwrap();

        assert_eq!(db.get_meta("synced_at").await.unwrap(), None);
        db.set_meta("synced_at", "2026-08-06 12:00").await.unwrap();
        db.set_meta("synced_at", "2026-08-07 09:30").await.unwrap();
        assert_eq!(
            db.get_meta("synced_at").await.unwrap().as_deref(),
            Some("2026-08-07 09:30")
        );
    }
}
