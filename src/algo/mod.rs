//! Sequence alignment backing the diff engine.
//!
//! - `myers`: predicate-based Myers LCS with a DP fast path

mod myers;

pub use myers::align;
