//! Transactions: ordered snapshot pairs that undo and redo as one unit

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::UndoRedoError;

/// Which side of a mutation a snapshot captures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SnapshotRole {
    /// State the node must return to when the mutation is undone
    Before,
    /// State the node must return to when the mutation is redone
    After,
}

/// One recorded snapshot: an immutable payload plus its replay direction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot<B> {
    /// Replay direction of this snapshot
    pub role: SnapshotRole,
    /// Captured state, opaque to the log
    pub buffer: B,
}

/// An atomic undo/redo unit
///
/// Snapshots are pushed one at a time but travel in before/after pairs;
/// a transaction covers one mutation, or several when grouping is active.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction<B> {
    /// Unique identifier for this transaction
    pub id: String,
    /// When the first snapshot was recorded
    pub created_at: DateTime<Utc>,
    /// Optional human-readable label
    pub description: Option<String>,
    /// Snapshots in push order
    pub snapshots: Vec<Snapshot<B>>,
}

impl<B> Transaction<B> {
    /// Create an empty transaction with a fresh id and timestamp
    pub fn new(description: Option<String>) -> Self {
        Transaction {
            id: Uuid::new_v4().to_string(),
            created_at: Utc::now(),
            description,
            snapshots: Vec::new(),
        }
    }

    /// Append a snapshot
    pub fn push(&mut self, role: SnapshotRole, buffer: B) {
        self.snapshots.push(Snapshot { role, buffer });
    }

    /// Number of before snapshots recorded
    pub fn before_count(&self) -> usize {
        self.snapshots
            .iter()
            .filter(|s| s.role == SnapshotRole::Before)
            .count()
    }

    /// Number of after snapshots recorded
    pub fn after_count(&self) -> usize {
        self.snapshots
            .iter()
            .filter(|s| s.role == SnapshotRole::After)
            .count()
    }

    /// True once every before snapshot has its after counterpart
    pub fn is_balanced(&self) -> bool {
        !self.snapshots.is_empty() && self.before_count() == self.after_count()
    }

    /// True when nothing has been recorded
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Validate the transaction for consistency
    pub fn validate(&self) -> Result<(), UndoRedoError> {
        if self.snapshots.is_empty() {
            return Err(UndoRedoError::EmptyTransaction(self.id.clone()));
        }
        let (before, after) = (self.before_count(), self.after_count());
        if before != after {
            return Err(UndoRedoError::UnbalancedTransaction(
                self.id.clone(),
                before,
                after,
            ));
        }
        Ok(())
    }

    /// Before buffers in reverse push order, the order undo applies them
    pub fn undo_buffers(&self) -> impl Iterator<Item = &B> {
        self.snapshots
            .iter()
            .rev()
            .filter(|s| s.role == SnapshotRole::Before)
            .map(|s| &s.buffer)
    }

    /// After buffers in push order, the order redo applies them
    pub fn redo_buffers(&self) -> impl Iterator<Item = &B> {
        self.snapshots
            .iter()
            .filter(|s| s.role == SnapshotRole::After)
            .map(|s| &s.buffer)
    }
}
