//! Prelude module for common imports.
//!
//! ```ignore
//! use rowbind::prelude::*;
//! ```

// Comparison
pub use crate::compare::{Comparator, EqComparator};

// Diff engine
pub use crate::diff::diff;
pub use crate::script::{EditOp, EditScript, ScriptStats};

// Collection
pub use crate::collection::{BoundCollection, SYNC_DIFF_THRESHOLD};

// Notifications
pub use crate::sink::{ChangeRecord, ChangeSink, NoopSink, RecordingSink};

// Rows and binder
pub use crate::binder::{Binder, BinderBuilder};
pub use crate::row::{
    OnItemBind, OnItemClick, Row, RowFactory, SingleViewType, ViewType, ViewTyper,
    DEFAULT_VIEW_TYPE,
};

// Errors
pub use crate::error::{BindError, BindResult};
