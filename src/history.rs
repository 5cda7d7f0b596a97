/*
history.rs

Copyright 2025 Hervé Quatremain

This file is part of Gridlink.

Gridlink is free software: you can redistribute it and/or modify it under the
terms of the GNU General Public License as published by the Free Software
Foundation, either version 3 of the License, or (at your option) any later
version.

Gridlink is distributed in the hope that it will be useful, but WITHOUT ANY
WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR
A PARTICULAR PURPOSE. See the GNU General Public License for more details.

You should have received a copy of the GNU General Public License along with
Gridlink. If not, see <https://www.gnu.org/licenses/>.

SPDX-License-Identifier: GPL-3.0-or-later
*/

//! Undo history.
//!
//! A [`Snapshot`] is taken each time a path is committed, before the session changes.
//! Snapshots are organized as a bounded stack: undo pops the last snapshot and restores it.
//! When the stack is full, the oldest snapshot is dropped.

use std::collections::{BTreeSet, VecDeque};
use std::num::NonZero;

use serde::{Deserialize, Serialize};

use crate::config::HISTORY_CAPACITY;
use crate::path_engine::DrawnPath;

/// Committed state of a session.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    /// Committed paths.
    pub committed: Vec<DrawnPath>,

    /// Occupancy map of the committed paths, in row-major order.
    pub occupancy: Vec<Option<usize>>,

    /// Numbers of the points already connected.
    pub connected: BTreeSet<usize>,

    /// Number of the point that starts the next path.
    pub current_number: usize,
}

/// Bounded last-in-first-out stack of snapshots.
#[derive(Debug, Clone)]
pub struct HistorySnapshotStore {
    stack: VecDeque<Snapshot>,
    capacity: NonZero<usize>,
}

impl Default for HistorySnapshotStore {
    fn default() -> Self {
        Self::new()
    }
}

impl HistorySnapshotStore {
    pub const fn default_capacity() -> NonZero<usize> {
        NonZero::new(HISTORY_CAPACITY).unwrap()
    }

    /// Create a [`HistorySnapshotStore`] object with the default capacity.
    pub fn new() -> Self {
        Self::with_capacity(Self::default_capacity())
    }

    pub fn with_capacity(capacity: NonZero<usize>) -> Self {
        Self {
            stack: VecDeque::with_capacity(capacity.get()),
            capacity,
        }
    }

    pub fn capacity(&self) -> NonZero<usize> {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    /// Push a snapshot, dropping the oldest one if the stack is full.
    pub fn push(&mut self, snapshot: Snapshot) {
        if self.stack.len() == self.capacity.get() {
            self.stack.pop_front();
        }
        self.stack.push_back(snapshot);
    }

    /// Remove and return the most recent snapshot.
    pub fn pop(&mut self) -> Option<Snapshot> {
        self.stack.pop_back()
    }

    /// Return the most recent snapshot without removing it.
    pub fn peek(&self) -> Option<&Snapshot> {
        self.stack.back()
    }

    pub fn clear(&mut self) {
        self.stack.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(current_number: usize) -> Snapshot {
        Snapshot {
            committed: Vec::new(),
            occupancy: Vec::new(),
            connected: (1..current_number).collect(),
            current_number,
        }
    }

    #[test]
    fn pop_returns_most_recent_first() {
        let mut history = HistorySnapshotStore::new();
        history.push(snapshot(1));
        history.push(snapshot(2));
        history.push(snapshot(3));

        assert_eq!(history.peek().map(|s| s.current_number), Some(3));
        assert_eq!(history.pop().map(|s| s.current_number), Some(3));
        assert_eq!(history.pop().map(|s| s.current_number), Some(2));
        assert_eq!(history.pop().map(|s| s.current_number), Some(1));
        assert_eq!(history.pop(), None);
    }

    #[test]
    fn capacity_drops_oldest() {
        let mut history = HistorySnapshotStore::with_capacity(NonZero::new(3).unwrap());
        for n in 1..=5 {
            history.push(snapshot(n));
        }

        assert_eq!(history.len(), 3);
        assert_eq!(history.pop().map(|s| s.current_number), Some(5));
        assert_eq!(history.pop().map(|s| s.current_number), Some(4));
        assert_eq!(history.pop().map(|s| s.current_number), Some(3));
        assert!(history.is_empty());
    }

    #[test]
    fn default_capacity_is_fifty() {
        let mut history = HistorySnapshotStore::default();
        assert_eq!(history.capacity().get(), 50);
        for n in 0..60 {
            history.push(snapshot(n));
        }
        assert_eq!(history.len(), 50);
        assert_eq!(history.peek().map(|s| s.current_number), Some(59));
    }

    #[test]
    fn clear_empties_history() {
        let mut history = HistorySnapshotStore::new();
        history.push(snapshot(1));
        history.clear();
        assert!(history.is_empty());
        assert_eq!(history.pop(), None);
    }
}
