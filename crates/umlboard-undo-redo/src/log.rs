//! The change log: blocked/recording gates and the undo/redo stacks

use tracing::debug;

use crate::transaction::{SnapshotRole, Transaction};

/// Transactional change log
///
/// Snapshots arrive through [`push_before`](ChangeLog::push_before) and
/// [`push_after`](ChangeLog::push_after). When grouping is off, a balanced
/// open transaction seals onto the undo stack immediately; while
/// [`record`](ChangeLog::record) is active, pairs keep accumulating into one
/// transaction until [`stop_record`](ChangeLog::stop_record).
///
/// Sealing through the push path discards the redo stack. Replay (undo/redo
/// themselves) moves transactions between stacks with
/// [`stash_undo`](ChangeLog::stash_undo) / [`stash_redo`](ChangeLog::stash_redo),
/// which never touch the other stack.
#[derive(Debug, Clone, Default)]
pub struct ChangeLog<B> {
    undo: Vec<Transaction<B>>,
    redo: Vec<Transaction<B>>,
    open: Option<Transaction<B>>,
    blocked: bool,
    recording: bool,
}

impl<B> ChangeLog<B> {
    /// Create an empty, unblocked, non-recording log
    pub fn new() -> Self {
        ChangeLog {
            undo: Vec::new(),
            redo: Vec::new(),
            open: None,
            blocked: false,
            recording: false,
        }
    }

    /// Record a before snapshot. Returns `false` when the log is blocked.
    pub fn push_before(&mut self, buffer: B) -> bool {
        self.push(SnapshotRole::Before, buffer)
    }

    /// Record an after snapshot. Returns `false` when the log is blocked.
    pub fn push_after(&mut self, buffer: B) -> bool {
        self.push(SnapshotRole::After, buffer)
    }

    fn push(&mut self, role: SnapshotRole, buffer: B) -> bool {
        if self.blocked {
            return false;
        }
        self.open
            .get_or_insert_with(|| Transaction::new(None))
            .push(role, buffer);
        if !self.recording {
            self.seal_if_balanced();
        }
        true
    }

    /// Seal the open transaction onto the undo stack once balanced
    fn seal_if_balanced(&mut self) {
        let balanced = self.open.as_ref().is_some_and(|txn| txn.is_balanced());
        if balanced {
            if let Some(txn) = self.open.take() {
                debug!(id = %txn.id, snapshots = txn.snapshots.len(), "sealing transaction");
                self.undo.push(txn);
                self.redo.clear();
            }
        }
    }

    /// Block or unblock snapshot recording, returning the previous state
    ///
    /// Callers save the returned value and restore it afterwards, so nested
    /// blocked sections compose.
    pub fn set_blocked(&mut self, blocked: bool) -> bool {
        std::mem::replace(&mut self.blocked, blocked)
    }

    /// True when snapshot pushes are ignored
    pub fn is_blocked(&self) -> bool {
        self.blocked
    }

    /// Start grouping: subsequent pairs accumulate into one transaction
    pub fn record(&mut self) {
        self.recording = true;
    }

    /// Stop grouping and seal the accumulated transaction if balanced
    pub fn stop_record(&mut self) {
        self.recording = false;
        self.seal_if_balanced();
    }

    /// True while grouping is active
    pub fn is_recording(&self) -> bool {
        self.recording
    }

    /// Take the most recent transaction off the undo stack
    pub fn pop_undo(&mut self) -> Option<Transaction<B>> {
        self.undo.pop()
    }

    /// Take the most recent transaction off the redo stack
    pub fn pop_redo(&mut self) -> Option<Transaction<B>> {
        self.redo.pop()
    }

    /// Put a replayed transaction onto the undo stack without clearing redo
    pub fn stash_undo(&mut self, txn: Transaction<B>) {
        self.undo.push(txn);
    }

    /// Put an undone transaction onto the redo stack
    pub fn stash_redo(&mut self, txn: Transaction<B>) {
        self.redo.push(txn);
    }

    /// True when at least one transaction can be undone
    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    /// True when at least one transaction can be redone
    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    /// Number of sealed transactions available to undo
    pub fn undo_depth(&self) -> usize {
        self.undo.len()
    }

    /// Number of undone transactions available to redo
    pub fn redo_depth(&self) -> usize {
        self.redo.len()
    }

    /// Drop both stacks and any open transaction
    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
        self.open = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_balanced_pair_seals_immediately() {
        let mut log: ChangeLog<u32> = ChangeLog::new();
        assert!(log.push_before(1));
        assert!(!log.can_undo());
        assert!(log.push_after(2));
        assert_eq!(log.undo_depth(), 1);
    }

    #[test]
    fn test_after_then_before_seals() {
        // Removal ordering: after snapshot arrives first.
        let mut log: ChangeLog<u32> = ChangeLog::new();
        log.push_after(1);
        assert!(!log.can_undo());
        log.push_before(2);
        assert_eq!(log.undo_depth(), 1);
    }

    #[test]
    fn test_blocked_log_ignores_pushes() {
        let mut log: ChangeLog<u32> = ChangeLog::new();
        let was = log.set_blocked(true);
        assert!(!was);
        assert!(!log.push_before(1));
        assert!(!log.push_after(2));
        assert!(!log.can_undo());
        let was = log.set_blocked(false);
        assert!(was);
        log.push_before(1);
        log.push_after(2);
        assert_eq!(log.undo_depth(), 1);
    }

    #[test]
    fn test_recording_groups_pairs() {
        let mut log: ChangeLog<u32> = ChangeLog::new();
        log.record();
        assert!(log.is_recording());
        log.push_before(1);
        log.push_after(2);
        log.push_before(3);
        log.push_after(4);
        assert!(!log.can_undo());
        log.stop_record();
        assert_eq!(log.undo_depth(), 1);
        let txn = log.pop_undo().unwrap();
        assert_eq!(txn.snapshots.len(), 4);
    }

    #[test]
    fn test_stop_record_with_nothing_recorded() {
        let mut log: ChangeLog<u32> = ChangeLog::new();
        log.record();
        log.stop_record();
        assert!(!log.can_undo());
        assert!(!log.is_recording());
    }

    #[test]
    fn test_sealing_clears_redo() {
        let mut log: ChangeLog<u32> = ChangeLog::new();
        log.push_before(1);
        log.push_after(2);
        let txn = log.pop_undo().unwrap();
        log.stash_redo(txn);
        assert!(log.can_redo());
        log.push_before(3);
        log.push_after(4);
        assert!(!log.can_redo());
    }

    #[test]
    fn test_stash_undo_preserves_redo() {
        let mut log: ChangeLog<u32> = ChangeLog::new();
        log.push_before(1);
        log.push_after(2);
        log.push_before(3);
        log.push_after(4);
        let newer = log.pop_undo().unwrap();
        log.stash_redo(newer);
        let older = log.pop_undo().unwrap();
        // Replay path: moving a transaction back must not clobber redo.
        log.stash_undo(older);
        assert_eq!(log.undo_depth(), 1);
        assert_eq!(log.redo_depth(), 1);
    }

    #[test]
    fn test_clear_drops_everything() {
        let mut log: ChangeLog<u32> = ChangeLog::new();
        log.push_before(1);
        log.push_after(2);
        log.push_before(3);
        log.clear();
        assert!(!log.can_undo());
        assert!(!log.can_redo());
        log.push_after(4);
        // The dangling before snapshot is gone; this after opens a new
        // transaction that stays unbalanced.
        assert!(!log.can_undo());
    }
}

#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn prop_pairs_always_seal(pairs in prop::collection::vec(any::<u32>(), 1..50)) {
            let mut log: ChangeLog<u32> = ChangeLog::new();
            for value in &pairs {
                log.push_before(*value);
                log.push_after(value.wrapping_add(1));
            }
            prop_assert_eq!(log.undo_depth(), pairs.len());
            prop_assert_eq!(log.redo_depth(), 0);
        }

        #[test]
        fn prop_grouped_pairs_seal_as_one(pairs in prop::collection::vec(any::<u32>(), 1..50)) {
            let mut log: ChangeLog<u32> = ChangeLog::new();
            log.record();
            for value in &pairs {
                log.push_before(*value);
                log.push_after(*value);
            }
            log.stop_record();
            prop_assert_eq!(log.undo_depth(), 1);
            let txn = log.pop_undo().unwrap();
            prop_assert_eq!(txn.snapshots.len(), pairs.len() * 2);
            prop_assert!(txn.validate().is_ok());
        }

        #[test]
        fn prop_blocked_log_stays_empty(values in prop::collection::vec(any::<u32>(), 0..50)) {
            let mut log: ChangeLog<u32> = ChangeLog::new();
            log.set_blocked(true);
            for value in &values {
                log.push_before(*value);
                log.push_after(*value);
            }
            prop_assert_eq!(log.undo_depth(), 0);
            prop_assert_eq!(log.redo_depth(), 0);
        }
    }
}
