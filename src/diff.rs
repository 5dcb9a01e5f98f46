//! Snapshot diff engine.
//!
//! Computes the minimal positional edit script between two ordered
//! snapshots of opaque items. This is a pure algorithm module with no
//! I/O and no collection state.
//!
//! # Algorithm
//!
//! 1. Align the snapshots under `same_identity` (Myers LCS, see
//!    [`crate::algo`])
//! 2. Pair unaligned old items with unaligned new items of the same
//!    identity: those are moves rather than remove+insert
//! 3. Emit removals (descending, run-batched), moves, insertions
//!    (ascending, run-batched), then content changes at final positions
//!
//! Emission simulates its own application step by step, so every emitted
//! position is valid at its point in the script.
//!
//! # Duplicate identities
//!
//! Items need not be unique under `same_identity`. Matching is then
//! greedy: both the alignment and the move pairing take the earliest
//! unmatched candidate in sequence order. Which of several equal-identity
//! items ends up "moved" is deterministic but otherwise unspecified.
//!
//! # Complexity
//!
//! Alignment is O((n+m)*d) where d is the edit distance. Move pairing is
//! quadratic in the number of unaligned items, which the alignment
//! already bounded by d.

use crate::algo::align;
use crate::compare::Comparator;
use crate::script::{EditOp, EditScript};

/// Fate of one old-snapshot position.
#[derive(Debug, Clone, Copy)]
enum Fate {
    /// Aligned with a new position; stays in relative order.
    Kept(usize),
    /// Identity survives at a new position; relocates.
    Moved(usize),
    /// No identity match in the new snapshot.
    Dropped,
}

/// Compute the edit script transforming `old` into `new`.
///
/// Applying the script's operations in order to `old` yields a sequence
/// identical to `new` under `cmp`'s identity relation. Diffing a snapshot
/// against itself returns an empty script for reflexive comparators.
/// Empty inputs degenerate to a single insert-everything or
/// remove-everything operation.
pub fn diff<T, C>(old: &[T], new: &[T], cmp: &C) -> EditScript
where
    C: Comparator<T> + ?Sized,
{
    let mut script = EditScript::new();

    // Degenerate snapshots: everything in, or everything out.
    if old.is_empty() && new.is_empty() {
        return script;
    }
    if old.is_empty() {
        script.push(EditOp::Inserted { position: 0, count: new.len() });
        return script;
    }
    if new.is_empty() {
        script.push(EditOp::Removed { position: 0, count: old.len() });
        return script;
    }

    let pairs = align(old, new, |a, b| cmp.same_identity(a, b));

    let mut fates = vec![Fate::Dropped; old.len()];
    let mut matched_new = vec![false; new.len()];
    for &(o, ni) in &pairs {
        fates[o] = Fate::Kept(ni);
        matched_new[ni] = true;
    }

    // Unaligned old items that still exist in the new snapshot become
    // moves. Greedy: earliest unmatched new candidate wins.
    for o in 0..old.len() {
        if !matches!(fates[o], Fate::Dropped) {
            continue;
        }
        for ni in 0..new.len() {
            if !matched_new[ni] && cmp.same_identity(&old[o], &new[ni]) {
                fates[o] = Fate::Moved(ni);
                matched_new[ni] = true;
                break;
            }
        }
    }

    emit(old, new, &fates, &matched_new, cmp, &mut script);
    script
}

/// Survivor of the removal phase, tracked through the emission
/// simulation.
#[derive(Debug, Clone, Copy)]
struct Survivor {
    /// Destination position in the new snapshot.
    target: usize,
    /// Already at its final relative position.
    settled: bool,
}

fn emit<T, C>(
    old: &[T],
    new: &[T],
    fates: &[Fate],
    matched_new: &[bool],
    cmp: &C,
    script: &mut EditScript,
) where
    C: Comparator<T> + ?Sized,
{
    // Removals, descending so earlier positions stay valid. Consecutive
    // dropped positions collapse into one ranged op.
    let mut pos = old.len();
    while pos > 0 {
        pos -= 1;
        if matches!(fates[pos], Fate::Dropped) {
            let end = pos + 1;
            while pos > 0 && matches!(fates[pos - 1], Fate::Dropped) {
                pos -= 1;
            }
            script.push(EditOp::Removed { position: pos, count: end - pos });
        }
    }

    // Survivors in old order. Kept entries are already in ascending
    // target order (LCS property); moved entries are not.
    let mut work: Vec<Survivor> = Vec::with_capacity(old.len());
    let mut relocations: Vec<usize> = Vec::new();
    for fate in fates {
        match *fate {
            Fate::Kept(target) => work.push(Survivor { target, settled: true }),
            Fate::Moved(target) => {
                work.push(Survivor { target, settled: false });
                relocations.push(target);
            }
            Fate::Dropped => {}
        }
    }

    // Relocate in ascending target order. Each move lands after every
    // settled survivor with a smaller target; unsettled survivors are
    // skipped when choosing the slot, they all have larger targets and
    // relocate later.
    relocations.sort_unstable();
    for target in relocations {
        let Some(from) = work.iter().position(|s| s.target == target) else {
            continue;
        };
        let survivor = work.remove(from);
        let to = work
            .iter()
            .position(|s| s.settled && s.target > target)
            .unwrap_or(work.len());
        work.insert(to, Survivor { settled: true, ..survivor });
        if from != to {
            script.push(EditOp::Moved { from, to });
        }
    }

    // Insertions, ascending and run-batched. The work list is sorted by
    // target now, so each run lands at the index of the first survivor
    // with a larger target.
    let mut ni = 0;
    while ni < new.len() {
        if matched_new[ni] {
            ni += 1;
            continue;
        }
        let run_start = ni;
        while ni < new.len() && !matched_new[ni] {
            ni += 1;
        }
        let count = ni - run_start;
        let position = work
            .iter()
            .position(|s| s.target > run_start)
            .unwrap_or(work.len());
        script.push(EditOp::Inserted { position, count });
        for (k, target) in (run_start..run_start + count).enumerate() {
            work.insert(position + k, Survivor { target, settled: true });
        }
    }

    debug_assert!(work.iter().enumerate().all(|(i, s)| s.target == i));

    // Content changes at final positions, run-batched. Only aligned
    // pairs are queried; fresh insertions carry their own content.
    let mut source: Vec<Option<usize>> = vec![None; new.len()];
    for (o, fate) in fates.iter().enumerate() {
        match *fate {
            Fate::Kept(ni) | Fate::Moved(ni) => source[ni] = Some(o),
            Fate::Dropped => {}
        }
    }

    let content_changed = |ni: usize| match source[ni] {
        Some(o) => !cmp.same_content(&old[o], &new[ni]),
        None => false,
    };

    let mut ni = 0;
    while ni < new.len() {
        if !content_changed(ni) {
            ni += 1;
            continue;
        }
        let run_start = ni;
        while ni < new.len() && content_changed(ni) {
            ni += 1;
        }
        script.push(EditOp::Changed { position: run_start, count: ni - run_start });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compare::EqComparator;
    use proptest::prelude::*;

    /// Replay a script against a sequence of `old_len` source indices,
    /// tracking which source slot (or fresh insertion) ends up where.
    fn replay(old_len: usize, script: &EditScript) -> Vec<Option<usize>> {
        let mut slots: Vec<Option<usize>> = (0..old_len).map(Some).collect();
        for op in script.ops() {
            match *op {
                EditOp::Inserted { position, count } => {
                    for k in 0..count {
                        slots.insert(position + k, None);
                    }
                }
                EditOp::Removed { position, count } => {
                    slots.drain(position..position + count);
                }
                EditOp::Moved { from, to } => {
                    let slot = slots.remove(from);
                    slots.insert(to, slot);
                }
                EditOp::Changed { .. } => {}
            }
        }
        slots
    }

    /// Diff, replay, and assert the result lines up with `new`.
    fn check_transforms<T: PartialEq + std::fmt::Debug>(old: &[T], new: &[T]) -> EditScript {
        let script = diff(old, new, &EqComparator);
        let slots = replay(old.len(), &script);
        assert_eq!(slots.len(), new.len(), "script must produce new length: {script:?}");
        for (i, slot) in slots.iter().enumerate() {
            if let Some(o) = slot {
                assert_eq!(old[*o], new[i], "surviving item at {i} does not match: {script:?}");
            }
        }
        script
    }

    #[test]
    fn test_identical_snapshots_yield_empty_script() {
        let script = check_transforms(&[1, 2, 3], &[1, 2, 3]);
        assert!(script.is_empty());
    }

    #[test]
    fn test_both_empty() {
        let script = check_transforms::<u32>(&[], &[]);
        assert!(script.is_empty());
    }

    #[test]
    fn test_insert_everything() {
        let script = check_transforms::<u32>(&[], &[1, 2, 3]);
        assert_eq!(script.ops(), &[EditOp::Inserted { position: 0, count: 3 }]);
    }

    #[test]
    fn test_remove_everything() {
        let script = check_transforms::<u32>(&[1, 2, 3], &[]);
        assert_eq!(script.ops(), &[EditOp::Removed { position: 0, count: 3 }]);
    }

    #[test]
    fn test_remove_head_insert_tail() {
        // [A,B,C] -> [B,C,D]: two operations, nothing more.
        let script = check_transforms(&["a", "b", "c"], &["b", "c", "d"]);
        assert_eq!(
            script.ops(),
            &[
                EditOp::Removed { position: 0, count: 1 },
                EditOp::Inserted { position: 2, count: 1 },
            ]
        );
    }

    #[test]
    fn test_batches_consecutive_runs() {
        let script = check_transforms(&[1, 2, 3, 4, 5, 6], &[1, 4, 5, 6, 7, 8]);
        assert_eq!(
            script.ops(),
            &[
                EditOp::Removed { position: 1, count: 2 },
                EditOp::Inserted { position: 4, count: 2 },
            ]
        );
    }

    #[test]
    fn test_swap_produces_move() {
        let script = check_transforms(&[1, 2, 3], &[1, 3, 2]);
        assert!(script.stats().moved > 0);
        assert_eq!(script.stats().inserted, 0);
        assert_eq!(script.stats().removed, 0);
    }

    #[test]
    fn test_rotation_moves_single_item() {
        // [1,2,3] -> [3,1,2]: one move suffices.
        let script = check_transforms(&[1, 2, 3], &[3, 1, 2]);
        assert_eq!(script.ops(), &[EditOp::Moved { from: 2, to: 0 }]);
    }

    #[test]
    fn test_full_reversal() {
        let script = check_transforms(&[1, 2, 3, 4], &[4, 3, 2, 1]);
        assert_eq!(script.stats().inserted, 0);
        assert_eq!(script.stats().removed, 0);
    }

    #[test]
    fn test_duplicate_identities() {
        check_transforms(&[7, 7], &[7]);
        check_transforms(&[7], &[7, 7]);
        check_transforms(&[1, 1, 2, 2], &[2, 1, 2, 1]);
    }

    #[derive(Debug, Clone, Copy, PartialEq)]
    struct Rec {
        key: u32,
        val: &'static str,
    }

    struct ByKey;

    impl Comparator<Rec> for ByKey {
        fn same_identity(&self, a: &Rec, b: &Rec) -> bool {
            a.key == b.key
        }
        fn same_content(&self, a: &Rec, b: &Rec) -> bool {
            a.val == b.val
        }
    }

    fn rec(key: u32, val: &'static str) -> Rec {
        Rec { key, val }
    }

    #[test]
    fn test_content_change_in_place() {
        let old = [rec(1, "a"), rec(2, "b"), rec(3, "c")];
        let new = [rec(1, "a"), rec(2, "x"), rec(3, "y")];
        let script = diff(&old, &new, &ByKey);
        assert_eq!(script.ops(), &[EditOp::Changed { position: 1, count: 2 }]);
    }

    #[test]
    fn test_moved_and_changed() {
        let old = [rec(1, "a"), rec(2, "b"), rec(3, "c")];
        let new = [rec(3, "z"), rec(1, "a"), rec(2, "b")];
        let script = diff(&old, &new, &ByKey);
        assert_eq!(
            script.ops(),
            &[
                EditOp::Moved { from: 2, to: 0 },
                EditOp::Changed { position: 0, count: 1 },
            ]
        );
    }

    #[test]
    fn test_change_never_queried_for_fresh_items() {
        // A comparator that panics when content is queried for a pair
        // that never matched identity.
        struct Strict;
        impl Comparator<Rec> for Strict {
            fn same_identity(&self, a: &Rec, b: &Rec) -> bool {
                a.key == b.key
            }
            fn same_content(&self, a: &Rec, b: &Rec) -> bool {
                assert_eq!(a.key, b.key, "content queried for non-identity pair");
                a.val == b.val
            }
        }

        let old = [rec(1, "a"), rec(2, "b")];
        let new = [rec(2, "b"), rec(9, "fresh")];
        let script = diff(&old, &new, &Strict);
        assert_eq!(script.stats().inserted, 1);
        assert_eq!(script.stats().removed, 1);
        assert_eq!(script.stats().changed, 0);
    }

    proptest! {
        #[test]
        fn prop_script_transforms_old_into_new(
            old in proptest::collection::vec(0u8..5, 0..12),
            new in proptest::collection::vec(0u8..5, 0..12),
        ) {
            check_transforms(&old, &new);
        }

        #[test]
        fn prop_self_diff_is_empty(items in proptest::collection::vec(0u8..8, 0..16)) {
            let script = diff(&items, &items, &EqComparator);
            prop_assert!(script.is_empty());
        }
    }
}
