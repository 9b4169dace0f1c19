#![warn(missing_docs)]

//! Undo/Redo change log for umlboard
//!
//! Records every document mutation as paired before/after snapshots,
//! grouped into transactions that undo and redo as atomic units. The log
//! is generic over the snapshot payload so it stays independent of the
//! document model that feeds it.

pub mod error;
pub mod log;
pub mod transaction;

// Re-export public API
pub use error::UndoRedoError;
pub use log::ChangeLog;
pub use transaction::{Snapshot, SnapshotRole, Transaction};
