//! Integration tests for the forum-list lifecycle: import an index, build the
//! row list, collapse and expand subtrees, and check the delta each step
//! reports.
//!
//! Each test creates its own in-memory SQLite database for isolation and
//! drives the same reload path the app uses: query both collections, rebuild
//! the tree, rebuild the rows.

use lurk::index;
use lurk::model::{ForumTree, Row, RowDelta, RowId, RowModelBuilder};
use lurk::storage::Database;
use pretty_assertions::assert_eq;
use std::sync::Arc;

const INDEX: &str = r#"{
    "groups": [
        {
            "id": "main",
            "name": "Main",
            "forums": [
                {
                    "id": "general",
                    "name": "General",
                    "url": "https://forums.example.com/f/general",
                    "subforums": [
                        {"id": "helpdesk", "name": "Helpdesk"},
                        {"id": "projects", "name": "Projects"}
                    ]
                },
                {"id": "news", "name": "News"}
            ]
        },
        {
            "id": "archive",
            "name": "Archive",
            "forums": [
                {"id": "goldmine", "name": "Goldmine"}
            ]
        }
    ]
}"#;

async fn seeded_db() -> Database {
    let db = Database::open(":memory:").await.unwrap();
    let flattened = index::parse(INDEX).unwrap();
    db.sync_index(&flattened.groups, &flattened.forums)
        .await
        .unwrap();
    db
}

/// The app's reload path: query both collections, rebuild tree and rows.
async fn reload(db: &Database, builder: &mut RowModelBuilder) -> Option<RowDelta> {
    let favorites = db.get_favorites().await.unwrap();
    let forums = db.get_forums_ordered().await.unwrap();
    let tree = ForumTree::from_records(&forums);
    builder.rebuild(&favorites, &forums, &tree)
}

fn identities(builder: &RowModelBuilder) -> Vec<RowId> {
    builder.rows().iter().map(Row::identity).collect()
}

fn header(title: &str) -> RowId {
    RowId::Header(Arc::from(title))
}

fn forum(id: &str) -> RowId {
    RowId::Forum(Arc::from(id))
}

#[tokio::test]
async fn test_initial_build_lists_groups_in_order() {
    let db = seeded_db().await;
    let mut builder = RowModelBuilder::new();

    let delta = reload(&db, &mut builder).await.unwrap();
    // First build: everything is an insertion.
    assert_eq!(delta.insertions.len(), 7);
    assert!(delta.deletions.is_empty());
    assert!(delta.moves.is_empty());

    assert_eq!(
        identities(&builder),
        vec![
            header("Main"),
            forum("general"),
            forum("helpdesk"),
            forum("projects"),
            forum("news"),
            header("Archive"),
            forum("goldmine"),
        ]
    );
    assert!(!builder.has_favorites());
}

#[tokio::test]
async fn test_collapse_deletes_subtree_rows_and_expand_restores_them() {
    let db = seeded_db().await;
    let mut builder = RowModelBuilder::new();
    reload(&db, &mut builder).await;

    db.set_shows_children("general", false).await.unwrap();
    let delta = reload(&db, &mut builder).await.unwrap();

    // helpdesk (index 2) and projects (index 3) vanish, nothing else changes.
    assert_eq!(delta.deletions, vec![2, 3]);
    assert!(delta.insertions.is_empty());
    assert!(delta.moves.is_empty());
    assert_eq!(
        identities(&builder),
        vec![
            header("Main"),
            forum("general"),
            forum("news"),
            header("Archive"),
            forum("goldmine"),
        ]
    );

    db.set_shows_children("general", true).await.unwrap();
    let delta = reload(&db, &mut builder).await.unwrap();
    assert_eq!(delta.insertions, vec![2, 3]);
    assert!(delta.deletions.is_empty());
    assert!(delta.moves.is_empty());
}

#[tokio::test]
async fn test_unchanged_reload_reports_nothing() {
    let db = seeded_db().await;
    let mut builder = RowModelBuilder::new();
    reload(&db, &mut builder).await;

    assert_eq!(reload(&db, &mut builder).await, None);
}

#[tokio::test]
async fn test_pinning_inserts_favorites_section() {
    let db = seeded_db().await;
    let mut builder = RowModelBuilder::new();
    reload(&db, &mut builder).await;

    db.set_favorite("goldmine", true).await.unwrap();
    let delta = reload(&db, &mut builder).await.unwrap();

    // "Favorites" header and the favorite row appear at the top; the forum's
    // own row stays where it was (favorite rows are distinct identities).
    assert_eq!(delta.insertions, vec![0, 1]);
    assert!(delta.deletions.is_empty());
    assert_eq!(
        identities(&builder)[..3],
        [
            header("Favorites"),
            RowId::Favorite(Arc::from("goldmine")),
            header("Main"),
        ]
    );
    assert_eq!(builder.last_favorite_index(), Some(1));

    // The goldmine forum row is still marked as a favorite for display.
    let forum_index = builder.index_of_identity(&forum("goldmine")).unwrap();
    let card = builder.rows()[forum_index].card().unwrap();
    assert!(card.favorite);

    // Unpinning removes exactly the two favorite-section rows.
    db.set_favorite("goldmine", false).await.unwrap();
    let delta = reload(&db, &mut builder).await.unwrap();
    assert_eq!(delta.deletions, vec![0, 1]);
    assert!(delta.insertions.is_empty());
    assert!(!builder.has_favorites());
}

#[tokio::test]
async fn test_reimport_preserves_collapse_and_favorites() {
    let db = seeded_db().await;
    let mut builder = RowModelBuilder::new();
    reload(&db, &mut builder).await;

    db.set_favorite("news", true).await.unwrap();
    db.set_shows_children("general", false).await.unwrap();
    reload(&db, &mut builder).await;

    // Re-import the same index: structure is unchanged, local state survives,
    // so the reload is a no-op.
    let flattened = index::parse(INDEX).unwrap();
    db.sync_index(&flattened.groups, &flattened.forums)
        .await
        .unwrap();
    assert_eq!(reload(&db, &mut builder).await, None);

    assert_eq!(
        identities(&builder),
        vec![
            header("Favorites"),
            RowId::Favorite(Arc::from("news")),
            header("Main"),
            forum("general"),
            forum("news"),
            header("Archive"),
            forum("goldmine"),
        ]
    );
}

#[tokio::test]
async fn test_separators_follow_group_and_favorite_boundaries() {
    let db = seeded_db().await;
    let mut builder = RowModelBuilder::new();

    db.set_favorite("news", true).await.unwrap();
    db.set_favorite("goldmine", true).await.unwrap();
    reload(&db, &mut builder).await;

    let separators: Vec<(RowId, bool)> = builder
        .rows()
        .iter()
        .filter_map(|row| row.card().map(|card| (row.identity(), card.show_separator)))
        .collect();

    assert_eq!(
        separators,
        vec![
            (RowId::Favorite(Arc::from("news")), true),
            (RowId::Favorite(Arc::from("goldmine")), false), // last favorite
            (forum("general"), true),
            (forum("helpdesk"), true),
            (forum("projects"), true),
            (forum("news"), false),    // last visible in Main
            (forum("goldmine"), false), // last visible in Archive
        ]
    );
}

#[tokio::test]
async fn test_indentation_tracks_nesting() {
    let db = seeded_db().await;
    let mut builder = RowModelBuilder::new();
    reload(&db, &mut builder).await;

    let indents: Vec<(RowId, usize)> = builder
        .rows()
        .iter()
        .filter_map(|row| row.card().map(|card| (row.identity(), card.indent)))
        .collect();

    assert_eq!(
        indents,
        vec![
            (forum("general"), 0),
            (forum("helpdesk"), 1),
            (forum("projects"), 1),
            (forum("news"), 0),
            (forum("goldmine"), 0),
        ]
    );
}
