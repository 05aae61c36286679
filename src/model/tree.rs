use std::collections::HashMap;
use std::sync::Arc;

use crate::storage::ForumRecord;

/// Upper bound on ancestor-chain walks. Forum nesting is bounded by the UI
/// (a handful of levels); a chain longer than this means corrupted parent
/// links, and the walk stops rather than looping.
const MAX_ANCESTOR_HOPS: usize = 64;

// ============================================================================
// Forum Tree
// ============================================================================

struct TreeNode {
    parent: Option<Arc<str>>,
    children: Vec<Arc<str>>,
    shows_children: bool,
}

/// The forum hierarchy as an identity-lookup relation.
///
/// Parent links are back-references into the map, never owning pointers;
/// cycles can only come from corrupted imported data, which the hop cap
/// guards against.
///
/// Rebuilt from the ordered forum records on every reload; all queries are
/// pure functions of the snapshot.
pub struct ForumTree {
    nodes: HashMap<Arc<str>, TreeNode>,
}

impl ForumTree {
    pub fn empty() -> Self {
        Self {
            nodes: HashMap::new(),
        }
    }

    /// Build the tree from forum records. `children` lists preserve the
    /// records' order, which is already (group order, in-group order).
    pub fn from_records(records: &[ForumRecord]) -> Self {
        let mut nodes: HashMap<Arc<str>, TreeNode> = HashMap::with_capacity(records.len());
        for record in records {
            nodes.insert(
                Arc::clone(&record.id),
                TreeNode {
                    parent: record.parent_id.clone(),
                    children: Vec::new(),
                    shows_children: record.shows_children,
                },
            );
        }
        for record in records {
            if let Some(parent_id) = &record.parent_id {
                if let Some(parent) = nodes.get_mut(parent_id) {
                    parent.children.push(Arc::clone(&record.id));
                } else {
                    tracing::warn!(
                        forum = %record.id,
                        parent = %parent_id,
                        "forum references a parent that is not in the index"
                    );
                }
            }
        }
        Self { nodes }
    }

    /// Iterate the ancestors of `id`, nearest first. Unknown ids yield an
    /// empty walk.
    pub fn ancestors<'a>(&'a self, id: &str) -> Ancestors<'a> {
        Ancestors {
            tree: self,
            current: self.nodes.get(id).and_then(|node| node.parent.clone()),
            hops: 0,
        }
    }

    /// Whether the forum should appear in the flattened list: true iff every
    /// ancestor currently shows its children. A forum with no parent is
    /// trivially visible, whatever its own flag.
    pub fn is_visible(&self, id: &str) -> bool {
        self.ancestors(id).all(|ancestor_id| {
            self.nodes
                .get(&*ancestor_id)
                .map(|node| node.shows_children)
                .unwrap_or(true)
        })
    }

    /// Ancestor count; the indentation level of the forum's row.
    pub fn depth(&self, id: &str) -> usize {
        self.ancestors(id).count()
    }

    pub fn child_count(&self, id: &str) -> usize {
        self.nodes.get(id).map(|node| node.children.len()).unwrap_or(0)
    }

    pub fn shows_children(&self, id: &str) -> bool {
        self.nodes
            .get(id)
            .map(|node| node.shows_children)
            .unwrap_or(true)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }
}

/// Iterative parent-chain walk; no recursion, capped at [`MAX_ANCESTOR_HOPS`].
pub struct Ancestors<'a> {
    tree: &'a ForumTree,
    current: Option<Arc<str>>,
    hops: usize,
}

impl Iterator for Ancestors<'_> {
    type Item = Arc<str>;

    fn next(&mut self) -> Option<Arc<str>> {
        let id = self.current.take()?;
        if self.hops >= MAX_ANCESTOR_HOPS {
            tracing::warn!(forum = %id, "ancestor chain exceeds hop cap, stopping walk");
            return None;
        }
        self.hops += 1;
        self.current = self
            .tree
            .nodes
            .get(&id)
            .and_then(|node| node.parent.clone());
        Some(id)
    }
}
