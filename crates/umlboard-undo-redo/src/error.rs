//! Error types for the change log

use thiserror::Error;

/// Errors that can occur in the change log
#[derive(Debug, Error)]
pub enum UndoRedoError {
    /// A transaction holds an unequal number of before and after snapshots
    #[error("Unbalanced transaction {0}: {1} before / {2} after snapshots")]
    UnbalancedTransaction(String, usize, usize),

    /// A transaction holds no snapshots at all
    #[error("Empty transaction: {0}")]
    EmptyTransaction(String),

    /// Validation error
    #[error("Validation error: {0}")]
    ValidationError(String),
}

impl UndoRedoError {
    /// Create a new ValidationError with context
    pub fn validation_error(msg: impl Into<String>) -> Self {
        Self::ValidationError(msg.into())
    }
}
