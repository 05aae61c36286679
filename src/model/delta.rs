use std::collections::{HashMap, HashSet};
use std::hash::Hash;

// ============================================================================
// Delta
// ============================================================================

/// The index operations turning one ordered row list into another.
///
/// - `deletions` are indexes into the old list, ascending.
/// - `insertions` are indexes into the new list, ascending.
/// - `moves` are `(old index, new index)` pairs, ascending by old index.
///
/// Applied in that order (deletions, then insertions, then moves) the delta
/// transforms the old list into the new one; see [`RowDelta::apply`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowDelta {
    pub deletions: Vec<usize>,
    pub insertions: Vec<usize>,
    pub moves: Vec<(usize, usize)>,
}

impl RowDelta {
    pub fn is_empty(&self) -> bool {
        self.deletions.is_empty() && self.insertions.is_empty() && self.moves.is_empty()
    }

    /// Replay this delta against `old`, producing the transformed list.
    ///
    /// `new` supplies the payload for insertions (an insertion index carries
    /// no content, exactly as a list view would ask its data source for the
    /// inserted row). The result is identity-equal to `new` for any delta
    /// produced by [`diff`]; the builder asserts this in debug builds.
    pub fn apply<T: Clone>(&self, old: &[T], new: &[T]) -> Vec<T> {
        let final_len = old.len() - self.deletions.len() + self.insertions.len();
        let mut slots: Vec<Option<T>> = vec![None; final_len];

        for &at in &self.insertions {
            slots[at] = Some(new[at].clone());
        }
        for &(from, to) in &self.moves {
            slots[to] = Some(old[from].clone());
        }

        // Rows that neither moved nor were deleted keep their relative order;
        // they fill the remaining slots front to back.
        let deleted: HashSet<usize> = self.deletions.iter().copied().collect();
        let moved: HashSet<usize> = self.moves.iter().map(|&(from, _)| from).collect();
        let mut stationary = old
            .iter()
            .enumerate()
            .filter(|(i, _)| !deleted.contains(i) && !moved.contains(i))
            .map(|(_, item)| item);

        for slot in &mut slots {
            if slot.is_none() {
                *slot = stationary.next().cloned();
            }
        }

        slots
            .into_iter()
            .map(|slot| slot.expect("delta application left an unfilled slot"))
            .collect()
    }
}

// ============================================================================
// Differ
// ============================================================================

/// Diff two ordered sequences of row identities.
///
/// An element present in both sequences is reported as a move iff its rank
/// among the shared elements changed: a row displaced only by an earlier
/// insertion or deletion is not a move, while both sides of a swap are. The
/// result is correct (every element accounted for exactly once) but not
/// guaranteed minimal.
///
/// Identities are expected to be unique within each sequence; the row model
/// guarantees this, and behavior under duplicates is undefined.
///
/// Equal sequences return an empty delta via an O(n) fast path: most rebuilds
/// change nothing, and the caller skips all update work on an empty delta.
pub fn diff<T: Eq + Hash>(old: &[T], new: &[T]) -> RowDelta {
    if old == new {
        return RowDelta::default();
    }

    let old_index: HashMap<&T, usize> = old.iter().enumerate().map(|(i, t)| (t, i)).collect();
    let new_index: HashMap<&T, usize> = new.iter().enumerate().map(|(i, t)| (t, i)).collect();
    debug_assert_eq!(old_index.len(), old.len(), "duplicate identity in old rows");
    debug_assert_eq!(new_index.len(), new.len(), "duplicate identity in new rows");

    let mut delta = RowDelta::default();

    for (i, item) in old.iter().enumerate() {
        if !new_index.contains_key(item) {
            delta.deletions.push(i);
        }
    }
    for (i, item) in new.iter().enumerate() {
        if !old_index.contains_key(item) {
            delta.insertions.push(i);
        }
    }

    // Rank of each shared element within the new sequence's shared subsequence.
    let shared_rank_new: HashMap<&T, usize> = new
        .iter()
        .filter(|item| old_index.contains_key(*item))
        .enumerate()
        .map(|(rank, item)| (item, rank))
        .collect();

    let shared_old = old.iter().filter(|item| new_index.contains_key(*item));
    for (old_rank, item) in shared_old.enumerate() {
        if shared_rank_new[item] != old_rank {
            delta.moves.push((old_index[item], new_index[item]));
        }
    }

    delta
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn equal_sequences_yield_empty_delta() {
        let rows = ["Favorites", "A", "B", "C"];
        assert!(diff(&rows, &rows).is_empty());
        assert!(diff::<&str>(&[], &[]).is_empty());
    }

    #[test]
    fn swap_reports_both_rows_as_moves() {
        // Favorites reorder: both displaced rows move, nothing else changes.
        let old = ["Favorites", "A", "B"];
        let new = ["Favorites", "B", "A"];

        let delta = diff(&old, &new);
        assert_eq!(delta.deletions, Vec::<usize>::new());
        assert_eq!(delta.insertions, Vec::<usize>::new());
        assert_eq!(delta.moves, vec![(1, 2), (2, 1)]);
    }

    #[test]
    fn collapsed_subtree_is_deletions_only() {
        let old = ["X"];
        let new: [&str; 0] = [];

        let delta = diff(&old, &new);
        assert_eq!(delta.deletions, vec![0]);
        assert!(delta.insertions.is_empty());
        assert!(delta.moves.is_empty());
    }

    #[test]
    fn insertion_indexes_are_against_new() {
        let old = ["A", "C"];
        let new = ["A", "B", "C", "D"];

        let delta = diff(&old, &new);
        assert!(delta.deletions.is_empty());
        assert_eq!(delta.insertions, vec![1, 3]);
        // A and C keep their shared rank; no moves despite C's index shifting.
        assert!(delta.moves.is_empty());
    }

    #[test]
    fn deletion_does_not_move_trailing_rows() {
        let old = ["X", "A", "B"];
        let new = ["A", "B"];

        let delta = diff(&old, &new);
        assert_eq!(delta.deletions, vec![0]);
        assert!(delta.insertions.is_empty());
        assert!(delta.moves.is_empty());
    }

    #[test]
    fn move_across_a_deletion_reports_absolute_indexes() {
        let old = ["X", "A", "B"];
        let new = ["B", "A"];

        let delta = diff(&old, &new);
        assert_eq!(delta.deletions, vec![0]);
        assert!(delta.insertions.is_empty());
        assert_eq!(delta.moves, vec![(1, 1), (2, 0)]);
        assert_eq!(delta.apply(&old, &new), new);
    }

    #[test]
    fn mixed_delta_applies_back_to_new() {
        let old = ["h1", "A", "B", "h2", "C"];
        let new = ["h1", "B", "D", "A"];

        let delta = diff(&old, &new);
        assert_eq!(delta.apply(&old, &new), new);
    }

    // ========================================================================
    // Properties
    // ========================================================================

    use proptest::prelude::*;

    /// Sequences of unique small identities. Uniqueness is part of the diff
    /// contract, so the generator dedups rather than exercising undefined
    /// behavior.
    fn unique_seq() -> impl Strategy<Value = Vec<u16>> {
        proptest::collection::vec(0u16..48, 0..32).prop_map(|raw| {
            let mut seen = HashSet::new();
            raw.into_iter().filter(|id| seen.insert(*id)).collect()
        })
    }

    proptest! {
        #[test]
        fn prop_equal_is_empty(seq in unique_seq()) {
            prop_assert!(diff(&seq, &seq).is_empty());
        }

        #[test]
        fn prop_accounting_is_exact(old in unique_seq(), new in unique_seq()) {
            let delta = diff(&old, &new);

            let deleted: HashSet<_> = delta.deletions.iter().copied().collect();
            let move_sources: HashSet<_> = delta.moves.iter().map(|&(from, _)| from).collect();
            let inserted: HashSet<_> = delta.insertions.iter().copied().collect();
            let move_targets: HashSet<_> = delta.moves.iter().map(|&(_, to)| to).collect();

            // No old index both deleted and moved; no new index both inserted
            // and a move target.
            prop_assert!(deleted.is_disjoint(&move_sources));
            prop_assert!(inserted.is_disjoint(&move_targets));

            // Deletions name rows absent from new; insertions rows absent from
            // old; moves rows present in both, at matching indexes.
            let new_set: HashSet<_> = new.iter().collect();
            let old_set: HashSet<_> = old.iter().collect();
            for &i in &delta.deletions {
                prop_assert!(!new_set.contains(&old[i]));
            }
            for &i in &delta.insertions {
                prop_assert!(!old_set.contains(&new[i]));
            }
            for &(from, to) in &delta.moves {
                prop_assert_eq!(old[from], new[to]);
            }
        }

        #[test]
        fn prop_apply_reproduces_new(old in unique_seq(), new in unique_seq()) {
            let delta = diff(&old, &new);
            prop_assert_eq!(delta.apply(&old, &new), new);
        }
    }
}
