//! Forum index import.
//!
//! The forum hierarchy is described by a JSON index file: groups, each
//! containing forums, each optionally containing nested subforums. The file
//! is parsed with serde and flattened into the upsert rows the storage layer
//! consumes. Names are sanitized for terminal output, URLs are validated,
//! and nesting depth and file size are capped.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

use crate::storage::{ForumUpsert, GroupUpsert};
use crate::util::{strip_control_chars, validate_forum_url};

/// Maximum nesting depth for subforums. Real forum hierarchies are a few
/// levels deep; anything past this is a malformed or malicious file.
const MAX_FORUM_DEPTH: usize = 8;

/// Maximum index file size (4 MB).
const MAX_FILE_SIZE: u64 = 4 * 1024 * 1024;

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum IndexError {
    #[error("Forum nesting depth exceeds maximum of {0} levels")]
    MaxDepthExceeded(usize),

    #[error("Index file too large: {0} bytes (max {1})")]
    TooLarge(u64, u64),

    #[error("Invalid JSON in index file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Failed to read index file: {0}")]
    Io(#[from] std::io::Error),
}

// ============================================================================
// Document Shape
// ============================================================================

#[derive(Debug, Deserialize)]
struct IndexDocument {
    #[serde(default)]
    groups: Vec<IndexGroup>,
}

#[derive(Debug, Deserialize)]
struct IndexGroup {
    id: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    forums: Vec<IndexForum>,
}

#[derive(Debug, Deserialize)]
struct IndexForum {
    id: String,
    name: String,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    subforums: Vec<IndexForum>,
}

/// The flattened index, ready for [`Database::sync_index`].
///
/// [`Database::sync_index`]: crate::storage::Database::sync_index
#[derive(Debug)]
pub struct FlattenedIndex {
    pub groups: Vec<GroupUpsert>,
    pub forums: Vec<ForumUpsert>,
}

// ============================================================================
// Loading
// ============================================================================

/// Load and flatten an index file from disk.
pub async fn load(path: &Path) -> Result<FlattenedIndex> {
    let meta = tokio::fs::metadata(path)
        .await
        .with_context(|| format!("Failed to read index file: {}", path.display()))?;
    if meta.len() > MAX_FILE_SIZE {
        return Err(IndexError::TooLarge(meta.len(), MAX_FILE_SIZE).into());
    }

    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read index file: {}", path.display()))?;
    Ok(parse(&content)?)
}

/// Parse and flatten index content.
///
/// Invalid entries are skipped with a warning rather than failing the whole
/// import: a forum with an empty id or name (after control characters are
/// stripped) is dropped along with its subtree, a duplicate id keeps its
/// first occurrence, and an invalid URL is dropped while the forum is kept.
pub fn parse(content: &str) -> Result<FlattenedIndex, IndexError> {
    let document: IndexDocument = serde_json::from_str(content)?;

    let mut groups = Vec::with_capacity(document.groups.len());
    let mut forums = Vec::new();
    let mut seen_ids = std::collections::HashSet::new();
    let mut sort_order: i64 = 0;

    for (group_order, group) in document.groups.into_iter().enumerate() {
        let group_id = group.id.trim();
        if group_id.is_empty() {
            tracing::warn!("skipping group with empty id");
            continue;
        }
        let name = group
            .name
            .as_deref()
            .map(|raw| strip_control_chars(raw).trim().to_string())
            .filter(|clean| !clean.is_empty());
        groups.push(GroupUpsert {
            id: group_id.to_string(),
            name,
            sort_order: group_order as i64,
        });

        // Iterative flatten: depth-first, children in document order. The
        // work stack takes children reversed so pop order matches the file.
        let mut stack: Vec<(IndexForum, Option<String>, usize)> = group
            .forums
            .into_iter()
            .rev()
            .map(|forum| (forum, None, 0))
            .collect();

        while let Some((forum, parent_id, depth)) = stack.pop() {
            if depth >= MAX_FORUM_DEPTH {
                return Err(IndexError::MaxDepthExceeded(MAX_FORUM_DEPTH));
            }

            let id = forum.id.trim().to_string();
            let name = strip_control_chars(&forum.name).trim().to_string();
            if id.is_empty() || name.is_empty() {
                tracing::warn!(forum = %forum.id, "skipping forum with empty id or name");
                continue;
            }
            if !seen_ids.insert(id.clone()) {
                tracing::warn!(forum = %id, "skipping duplicate forum id");
                continue;
            }

            let url = forum.url.as_deref().and_then(|raw| {
                validate_forum_url(raw)
                    .map(|valid| valid.to_string())
                    .map_err(|e| {
                        tracing::warn!(forum = %id, error = %e, "dropping invalid forum URL");
                    })
                    .ok()
            });

            forums.push(ForumUpsert {
                id: id.clone(),
                name,
                group_id: Some(group_id.to_string()),
                parent_id,
                sort_order,
                url,
            });
            sort_order += 1;

            for subforum in forum.subforums.into_iter().rev() {
                stack.push((subforum, Some(id.clone()), depth + 1));
            }
        }
    }

    Ok(FlattenedIndex { groups, forums })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SAMPLE: &str = r#"{
        "groups": [
            {
                "id": "main",
                "name": "Main",
                "forums": [
                    {
                        "id": "1",
                        "name": "General",
                        "url": "https://forums.example.com/f/1",
                        "subforums": [
                            {"id": "2", "name": "Subgeneral"},
                            {"id": "3", "name": "Other Sub"}
                        ]
                    },
                    {"id": "4", "name": "Second"}
                ]
            },
            {
                "id": "misc",
                "forums": [
                    {"id": "5", "name": "Orphanage"}
                ]
            }
        ]
    }"#;

    #[test]
    fn flattens_depth_first_in_document_order() {
        let index = parse(SAMPLE).unwrap();

        let ids: Vec<&str> = index.forums.iter().map(|f| f.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3", "4", "5"]);

        let sorts: Vec<i64> = index.forums.iter().map(|f| f.sort_order).collect();
        assert_eq!(sorts, vec![0, 1, 2, 3, 4]);

        assert_eq!(index.forums[1].parent_id.as_deref(), Some("1"));
        assert_eq!(index.forums[2].parent_id.as_deref(), Some("1"));
        assert_eq!(index.forums[3].parent_id, None);
        assert_eq!(index.forums[0].group_id.as_deref(), Some("main"));
        assert_eq!(index.forums[4].group_id.as_deref(), Some("misc"));
    }

    #[test]
    fn nameless_group_stays_nameless() {
        let index = parse(SAMPLE).unwrap();

        assert_eq!(index.groups.len(), 2);
        assert_eq!(index.groups[0].name.as_deref(), Some("Main"));
        assert_eq!(index.groups[1].name, None);
        assert_eq!(index.groups[0].sort_order, 0);
        assert_eq!(index.groups[1].sort_order, 1);
    }

    #[test]
    fn sanitizes_names_and_skips_empty() {
        // \u001b is ESC: ANSI sequences in imported names must not reach the
        // terminal, and a name that is nothing but controls and whitespace is
        // no name at all.
        let content = r#"{
            "groups": [{
                "id": "g",
                "name": "\u001b[31mMain",
                "forums": [
                    {"id": "1", "name": "Clean\u001b[2J Me"},
                    {"id": "2", "name": "\u001b\u0007  "}
                ]
            }]
        }"#;
        let index = parse(content).unwrap();

        assert_eq!(index.groups[0].name.as_deref(), Some("[31mMain"));
        assert_eq!(index.forums.len(), 1);
        assert_eq!(index.forums[0].name, "Clean[2J Me");
    }

    #[test]
    fn skips_duplicate_ids_keeping_first() {
        let content = r#"{
            "groups": [{
                "id": "g",
                "forums": [
                    {"id": "1", "name": "First"},
                    {"id": "1", "name": "Second"}
                ]
            }]
        }"#;
        let index = parse(content).unwrap();

        assert_eq!(index.forums.len(), 1);
        assert_eq!(index.forums[0].name, "First");
    }

    #[test]
    fn drops_invalid_urls_but_keeps_the_forum() {
        let content = r#"{
            "groups": [{
                "id": "g",
                "forums": [{"id": "1", "name": "F", "url": "file:///etc/passwd"}]
            }]
        }"#;
        let index = parse(content).unwrap();

        assert_eq!(index.forums.len(), 1);
        assert_eq!(index.forums[0].url, None);
    }

    #[test]
    fn rejects_excessive_nesting() {
        // Build a chain one level past the cap.
        let mut forum = String::from(r#"{"id": "leaf", "name": "Leaf"}"#);
        for i in 0..MAX_FORUM_DEPTH {
            forum = format!(
                r#"{{"id": "n{}", "name": "N{}", "subforums": [{}]}}"#,
                i, i, forum
            );
        }
        let content = format!(r#"{{"groups": [{{"id": "g", "forums": [{}]}}]}}"#, forum);

        let result = parse(&content);
        assert!(matches!(result, Err(IndexError::MaxDepthExceeded(_))));
    }

    #[test]
    fn empty_document_is_fine() {
        let index = parse(r#"{"groups": []}"#).unwrap();
        assert!(index.groups.is_empty());
        assert!(index.forums.is_empty());

        let index = parse("{}").unwrap();
        assert!(index.forums.is_empty());
    }
}
