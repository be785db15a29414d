// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bounded focus history with an undo/redo cursor.

use understory_event_state::ring::BoundedLog;

use crate::config::DEFAULT_HISTORY_CAPACITY;
use crate::id::{ElementId, ScopeId};

/// Why a transition was requested.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TransitionReason {
    /// Sequential keyboard traversal.
    Keyboard,
    /// Pointer click or tap.
    Pointer,
    /// Application code, including restoration after a scope closes.
    Programmatic,
    /// Undo or redo. Never recorded in history.
    HistoryNavigation,
}

/// One accepted focus transition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HistoryEntry {
    /// Element that received focus.
    pub element: ElementId,
    /// Scope that owned it at the time.
    pub scope: ScopeId,
    /// Why focus moved.
    pub reason: TransitionReason,
    /// Element that held focus before, if any.
    pub previous: Option<ElementId>,
    /// Host timestamp in milliseconds.
    pub timestamp: u64,
}

/// Append-and-trim log of transitions plus a cursor.
///
/// The cursor is `None` exactly when the log is empty, and otherwise always
/// indexes a retained entry.
#[derive(Clone, Debug)]
pub struct History {
    log: BoundedLog<HistoryEntry>,
    cursor: Option<usize>,
    /// Entries dropped from the front since creation.
    evicted: u64,
}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}

impl History {
    /// Create an empty history holding at most `capacity` entries.
    pub fn new(capacity: usize) -> Self {
        Self {
            log: BoundedLog::new(capacity),
            cursor: None,
            evicted: 0,
        }
    }

    /// Append an entry and move the cursor onto it.
    ///
    /// Entries past the cursor are kept; undo followed by a fresh transition
    /// simply appends.
    pub fn push(&mut self, entry: HistoryEntry) {
        self.evicted += self.log.push(entry) as u64;
        self.cursor = Some(self.log.len() - 1);
    }

    /// Current cursor position.
    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    /// Entry under the cursor.
    pub fn current(&self) -> Option<&HistoryEntry> {
        self.log.get(self.cursor?)
    }

    /// Whether there is an entry before the cursor.
    pub fn can_undo(&self) -> bool {
        self.cursor.is_some_and(|c| c > 0)
    }

    /// Whether there is an entry after the cursor.
    pub fn can_redo(&self) -> bool {
        self.cursor.is_some_and(|c| c + 1 < self.log.len())
    }

    /// Move the cursor one entry back and return the entry now under it.
    pub fn step_back(&mut self) -> Option<&HistoryEntry> {
        if !self.can_undo() {
            return None;
        }
        let c = self.cursor? - 1;
        self.cursor = Some(c);
        self.log.get(c)
    }

    /// Move the cursor one entry forward and return the entry now under it.
    pub fn step_forward(&mut self) -> Option<&HistoryEntry> {
        if !self.can_redo() {
            return None;
        }
        let c = self.cursor? + 1;
        self.cursor = Some(c);
        self.log.get(c)
    }

    /// Cursor position that stays valid across evictions.
    pub(crate) fn mark(&self) -> Option<u64> {
        self.cursor.map(|c| c as u64 + self.evicted)
    }

    /// Put the cursor back on a [`History::mark`].
    ///
    /// A marked entry that has since been evicted resolves to the oldest
    /// retained entry.
    pub(crate) fn restore(&mut self, mark: Option<u64>) {
        let last = self.log.len().checked_sub(1);
        self.cursor = match mark {
            Some(m) => {
                let c = usize::try_from(m.saturating_sub(self.evicted)).unwrap_or(usize::MAX);
                last.map(|l| c.min(l))
            }
            None => last,
        };
    }

    /// Number of retained entries.
    pub fn len(&self) -> usize {
        self.log.len()
    }

    /// Returns `true` if nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.log.is_empty()
    }

    /// Retained entries, oldest first.
    pub fn entries(&self) -> impl DoubleEndedIterator<Item = &HistoryEntry> + ExactSizeIterator {
        self.log.iter()
    }

    /// Maximum retained entries.
    pub fn capacity(&self) -> usize {
        self.log.capacity()
    }

    /// Change the capacity, evicting the oldest entries and shifting the cursor.
    pub fn set_capacity(&mut self, capacity: usize) {
        let evicted = self.log.set_capacity(capacity);
        self.evicted += evicted as u64;
        if let Some(c) = self.cursor {
            self.cursor = Some(c.saturating_sub(evicted));
        }
    }

    /// Drop every entry and reset the cursor.
    pub fn clear(&mut self) {
        self.evicted += self.log.len() as u64;
        self.log.clear();
        self.cursor = None;
    }
}
