//! Positional edit scripts.
//!
//! An [`EditScript`] is the output of [`diff`](crate::diff::diff): an
//! ordered list of positional operations that transforms the old sequence
//! into the new one when applied front to back. Operations carry no item
//! references, only positions and counts, so a script is meaningful
//! exactly once, against the pair of snapshots it was computed from.

use smallvec::SmallVec;

use crate::sink::ChangeSink;

/// One positional operation of an [`EditScript`].
///
/// Positions are interpreted against the sequence as already transformed
/// by every preceding operation. `Moved` removes the item at `from` and
/// reinserts it at `to`, with `to` indexed in the post-removal sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOp {
    /// `count` items inserted at `position`.
    Inserted { position: usize, count: usize },
    /// `count` items removed at `position`.
    Removed { position: usize, count: usize },
    /// One item moved from `from` to `to`.
    Moved { from: usize, to: usize },
    /// `count` identity-matched items at `position` changed content.
    Changed { position: usize, count: usize },
}

/// Per-item counters for a computed script.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ScriptStats {
    /// Items inserted.
    pub inserted: usize,
    /// Items removed.
    pub removed: usize,
    /// Items relocated.
    pub moved: usize,
    /// Items with changed content.
    pub changed: usize,
}

impl ScriptStats {
    /// Total number of touched items.
    pub fn touched(&self) -> usize {
        self.inserted + self.removed + self.moved + self.changed
    }

    /// `true` when the script leaves the sequence untouched.
    pub fn is_empty(&self) -> bool {
        self.touched() == 0
    }
}

/// Ordered positional operations transforming one snapshot into another.
///
/// Produced once per diff, consumed once by the commit step.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct EditScript {
    ops: SmallVec<[EditOp; 8]>,
    stats: ScriptStats,
}

impl EditScript {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, op: EditOp) {
        match op {
            EditOp::Inserted { count, .. } => self.stats.inserted += count,
            EditOp::Removed { count, .. } => self.stats.removed += count,
            EditOp::Moved { .. } => self.stats.moved += 1,
            EditOp::Changed { count, .. } => self.stats.changed += count,
        }
        self.ops.push(op);
    }

    /// The operations, in application order.
    pub fn ops(&self) -> &[EditOp] {
        &self.ops
    }

    /// Per-item counters.
    pub fn stats(&self) -> ScriptStats {
        self.stats
    }

    /// Number of operations.
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// `true` when the script contains no operations.
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Forward every operation to `sink`, in order.
    pub fn dispatch_to(&self, sink: &mut dyn ChangeSink) {
        for op in &self.ops {
            match *op {
                EditOp::Inserted { position, count } => sink.range_inserted(position, count),
                EditOp::Removed { position, count } => sink.range_removed(position, count),
                EditOp::Moved { from, to } => sink.moved(from, to),
                EditOp::Changed { position, count } => sink.range_changed(position, count),
            }
        }
    }
}
