//! rowbind - incremental rendering driver for display-bound collections
//!
//! ## Core Concepts
//!
//! **Snapshots and scripts**: a collection's contents are immutable
//! ordered snapshots. Each update diffs the old snapshot against the new
//! one and emits a minimal positional [`EditScript`] of insert, remove,
//! move and change operations, so the renderer touches only the rows
//! that actually changed.
//!
//! **Versioned async updates**: small diffs run inline; large ones run on
//! a background worker. A monotonic version counter guarantees that a
//! result superseded by a newer update is discarded, never applied late
//! or out of order.
//!
//! ## Modules
//! - `compare`: identity/content comparator contract
//! - `algo`: predicate-based Myers LCS alignment
//! - `diff`: edit script computation
//! - `script`: positional edit scripts
//! - `collection`: versioned bound collection
//! - `sink`: positional change notifications
//! - `row` / `binder`: renderer-facing adapter surface
//! - `error`: error types
//!
//! ## Usage
//!
//! ```ignore
//! use rowbind::prelude::*;
//!
//! let mut binder = Binder::builder()
//!     .row_factory(|view_type| MyRow::new(view_type))
//!     .comparator(MyComparator)
//!     .on_item_click(|item, position| println!("clicked {item:?} at {position}"))
//!     .build()?;
//!
//! // Owner thread: feed updates, then pump completed diffs each frame.
//! binder.set_items(Some(load_items()), &mut renderer);
//! binder.poll(&mut renderer);
//! ```

// =============================================================================
// Core modules
// =============================================================================

/// Sequence alignment algorithms
pub mod algo;

/// Renderer-facing adapter surface
pub mod binder;

/// Versioned bound collection
pub mod collection;

/// Comparator contracts
pub mod compare;

/// Snapshot diff engine
pub mod diff;

/// Error types
pub mod error;

/// Prelude for common imports
pub mod prelude;

/// Row collaborator contracts
pub mod row;

/// Positional edit scripts
pub mod script;

/// Change notification sinks
pub mod sink;

// =============================================================================
// Re-exports
// =============================================================================

pub use binder::{Binder, BinderBuilder};
pub use collection::{BoundCollection, SYNC_DIFF_THRESHOLD};
pub use compare::{Comparator, EqComparator};
pub use diff::diff;
pub use error::{BindError, BindResult};
pub use row::{
    OnItemBind, OnItemClick, Row, RowFactory, SingleViewType, ViewType, ViewTyper,
    DEFAULT_VIEW_TYPE,
};
pub use script::{EditOp, EditScript, ScriptStats};
pub use sink::{ChangeRecord, ChangeSink, NoopSink, RecordingSink};

// =============================================================================
// Tests
// =============================================================================
