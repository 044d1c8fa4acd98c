//! Bounded snapshot history for undo/redo.
//!
//! Each entry is a full snapshot of the canvas contents taken before a
//! mutating operation. The ring holds at most `capacity` snapshots;
//! pushing past the cap evicts the oldest. Undoing and then pushing a
//! new snapshot discards the redo tail.

use std::collections::VecDeque;

use tracing::debug;

/// Default number of retained snapshots.
pub const DEFAULT_HISTORY_CAPACITY: usize = 50;

/// A bounded undo/redo ring of snapshots.
///
/// `T` is the snapshot type; cloning it must capture the full state.
/// The cursor sits just past the snapshot that `undo` would restore.
#[derive(Debug, Clone)]
pub struct HistoryRing<T> {
    snapshots: VecDeque<T>,
    cursor: usize,
    capacity: usize,
}

impl<T: Clone> HistoryRing<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            snapshots: VecDeque::new(),
            cursor: 0,
            capacity: capacity.max(1),
        }
    }

    /// Records a snapshot, discarding any redo tail and evicting the
    /// oldest entry once the ring is full.
    pub fn push(&mut self, snapshot: T) {
        self.snapshots.truncate(self.cursor);
        if self.snapshots.len() == self.capacity {
            self.snapshots.pop_front();
            self.cursor -= 1;
        }
        self.snapshots.push_back(snapshot);
        self.cursor += 1;
        debug!(depth = self.cursor, "history snapshot recorded");
    }

    /// Steps back one snapshot, exchanging it for the current state so
    /// the step can be redone. Returns `None` at the oldest snapshot.
    pub fn undo(&mut self, current: T) -> Option<T> {
        if self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        let restored = std::mem::replace(&mut self.snapshots[self.cursor], current);
        Some(restored)
    }

    /// Steps forward one snapshot, exchanging it for the current state.
    /// Returns `None` when there is nothing to redo.
    pub fn redo(&mut self, current: T) -> Option<T> {
        if self.cursor == self.snapshots.len() {
            return None;
        }
        let restored = std::mem::replace(&mut self.snapshots[self.cursor], current);
        self.cursor += 1;
        Some(restored)
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor < self.snapshots.len()
    }

    /// Number of undoable steps currently retained.
    pub fn depth(&self) -> usize {
        self.cursor
    }

    pub fn clear(&mut self) {
        self.snapshots.clear();
        self.cursor = 0;
    }
}

impl<T: Clone> Default for HistoryRing<T> {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}
