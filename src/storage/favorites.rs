use anyhow::{bail, Result};

use super::schema::Database;
use super::types::{ForumDbRow, ForumRecord};

impl Database {
    // ========================================================================
    // Favorite Operations
    // ========================================================================

    /// Favorites in user order: the favorites collection of the row model.
    pub async fn get_favorites(&self) -> Result<Vec<ForumRecord>> {
        let rows: Vec<ForumDbRow> = sqlx::query_as(
            r#"
                SELECT
                    f.id, f.name, f.group_id, f.parent_id, f.url,
                    f.favorite, f.favorite_index, f.shows_children,
                    g.name AS group_name
                FROM forums f
                LEFT JOIN groups g ON f.group_id = g.id
                WHERE f.favorite = 1
                ORDER BY f.favorite_index, f.id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(ForumDbRow::into_record).collect())
    }

    /// Pin or unpin a forum. Pinning appends to the favorite order; unpinning
    /// clears the index and leaves the remaining order gapped (gaps are
    /// harmless, ordering is all that matters).
    pub async fn set_favorite(&self, forum_id: &str, favorite: bool) -> Result<()> {
        if favorite {
            sqlx::query(
                r#"
                UPDATE forums
                SET favorite = 1,
                    favorite_index = (SELECT COALESCE(MAX(favorite_index), -1) + 1
                                      FROM forums WHERE favorite = 1)
                WHERE id = ?
                "#,
            )
            .bind(forum_id)
            .execute(&self.pool)
            .await?;
        } else {
            sqlx::query("UPDATE forums SET favorite = 0, favorite_index = NULL WHERE id = ?")
                .bind(forum_id)
                .execute(&self.pool)
                .await?;
        }
        Ok(())
    }

    /// Move the favorite at position `from` to position `to` (positions within
    /// the favorites collection, not row indexes).
    ///
    /// Rewrites all favorite indexes in one transaction; the new order is
    /// visible to the next `get_favorites` call as soon as this returns.
    pub async fn reorder_favorite(&self, from: usize, to: usize) -> Result<()> {
        let favorites = self.get_favorites().await?;
        if from >= favorites.len() || to >= favorites.len() {
            bail!(
                "favorite position out of range: {} -> {} of {}",
                from,
                to,
                favorites.len()
            );
        }
        if from == to {
            return Ok(());
        }

        let mut order: Vec<&str> = favorites.iter().map(|record| &*record.id).collect();
        let moved = order.remove(from);
        order.insert(to, moved);

        let mut tx = self.pool.begin().await?;
        for (index, id) in order.iter().enumerate() {
            sqlx::query("UPDATE forums SET favorite_index = ? WHERE id = ?")
                .bind(index as i64)
                .bind(id)
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;
        Ok(())
    }
}
