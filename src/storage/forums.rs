use anyhow::Result;
use sqlx::QueryBuilder;

use super::schema::Database;
use super::types::{ForumDbRow, ForumRecord, ForumUpsert, GroupUpsert};

/// Statistics from an index sync.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SyncStats {
    pub groups: usize,
    pub forums: usize,
    pub pruned: usize,
}

impl Database {
    // ========================================================================
    // Forum Operations
    // ========================================================================

    /// Batch upserts keep large index imports to a few statements instead of
    /// one round-trip per forum.
    const BATCH_SIZE: usize = 100;

    /// Sync the forum hierarchy from an imported index.
    ///
    /// Upserts every group and forum, then prunes rows absent from the
    /// index; the index file is the source of truth for structure. Local
    /// user state (favorite, favorite_index, shows_children) is preserved
    /// for forums that remain.
    pub async fn sync_index(
        &self,
        groups: &[GroupUpsert],
        forums: &[ForumUpsert],
    ) -> Result<SyncStats> {
        let mut tx = self.pool.begin().await?;

        for chunk in groups.chunks(Self::BATCH_SIZE) {
            let mut builder: QueryBuilder<sqlx::Sqlite> =
                QueryBuilder::new("INSERT INTO groups (id, name, sort_order) ");
            builder.push_values(chunk, |mut b, group| {
                b.push_bind(&group.id)
                    .push_bind(&group.name)
                    .push_bind(group.sort_order);
            });
            builder.push(
                " ON CONFLICT(id) DO UPDATE SET name = excluded.name, sort_order = excluded.sort_order",
            );
            builder.build().execute(&mut *tx).await?;
        }

        for chunk in forums.chunks(Self::BATCH_SIZE) {
            let mut builder: QueryBuilder<sqlx::Sqlite> = QueryBuilder::new(
                "INSERT INTO forums (id, name, group_id, parent_id, sort_order, url) ",
            );
            builder.push_values(chunk, |mut b, forum| {
                b.push_bind(&forum.id)
                    .push_bind(&forum.name)
                    .push_bind(&forum.group_id)
                    .push_bind(&forum.parent_id)
                    .push_bind(forum.sort_order)
                    .push_bind(&forum.url);
            });
            // Local columns (favorite, favorite_index, shows_children) are
            // deliberately not listed: re-importing must not reset them.
            builder.push(
                " ON CONFLICT(id) DO UPDATE SET name = excluded.name, \
                 group_id = excluded.group_id, parent_id = excluded.parent_id, \
                 sort_order = excluded.sort_order, url = excluded.url",
            );
            builder.build().execute(&mut *tx).await?;
        }

        // Prune forums and groups no longer in the index.
        let mut pruned = 0u64;
        if forums.is_empty() {
            let result = sqlx::query("DELETE FROM forums").execute(&mut *tx).await?;
            pruned += result.rows_affected();
        } else {
            let mut builder: QueryBuilder<sqlx::Sqlite> =
                QueryBuilder::new("DELETE FROM forums WHERE id NOT IN (");
            let mut separated = builder.separated(", ");
            for forum in forums {
                separated.push_bind(&forum.id);
            }
            separated.push_unseparated(")");
            let result = builder.build().execute(&mut *tx).await?;
            pruned += result.rows_affected();
        }
        if groups.is_empty() {
            sqlx::query("DELETE FROM groups").execute(&mut *tx).await?;
        } else {
            let mut builder: QueryBuilder<sqlx::Sqlite> =
                QueryBuilder::new("DELETE FROM groups WHERE id NOT IN (");
            let mut separated = builder.separated(", ");
            for group in groups {
                separated.push_bind(&group.id);
            }
            separated.push_unseparated(")");
            builder.build().execute(&mut *tx).await?;
        }

        tx.commit().await?;

        let stats = SyncStats {
            groups: groups.len(),
            forums: forums.len(),
            pruned: pruned as usize,
        };
        tracing::info!(
            groups = stats.groups,
            forums = stats.forums,
            pruned = stats.pruned,
            "forum index synced"
        );
        Ok(stats)
    }

    /// All forums joined with their group, ordered by (group order, in-group
    /// order): the grouped collection the row model walks.
    pub async fn get_forums_ordered(&self) -> Result<Vec<ForumRecord>> {
        let rows: Vec<ForumDbRow> = sqlx::query_as(
            r#"
                SELECT
                    f.id, f.name, f.group_id, f.parent_id, f.url,
                    f.favorite, f.favorite_index, f.shows_children,
                    g.name AS group_name
                FROM forums f
                LEFT JOIN groups g ON f.group_id = g.id
                ORDER BY g.sort_order, f.group_id, f.sort_order, f.id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(ForumDbRow::into_record).collect())
    }

    /// Set whether a forum's subforums are shown in the list.
    pub async fn set_shows_children(&self, forum_id: &str, shows: bool) -> Result<()> {
        sqlx::query("UPDATE forums SET shows_children = ? WHERE id = ?")
            .bind(shows)
            .bind(forum_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
