//! Undo/redo history over whole-state snapshots.
//!
//! DESIGN
//! ======
//! `History<T>` keeps `past`, `present`, and `future`. Every commit stores
//! the full previous value rather than an inverse operation, so undo and redo
//! are plain moves between stacks and can never drift from the state they
//! restore. `past` is bounded: once it exceeds `max_depth` the oldest entry is
//! dropped. Committing a value equal to `present` records nothing.

#[cfg(test)]
#[path = "history_test.rs"]
mod history_test;

use std::collections::VecDeque;

use crate::consts::DEFAULT_HISTORY_DEPTH;

/// Bounded past/present/future container.
#[derive(Debug, Clone)]
pub struct History<T> {
    past: VecDeque<T>,
    present: T,
    future: VecDeque<T>,
    initial: T,
    max_depth: usize,
}

impl<T: Clone + PartialEq> History<T> {
    /// Create a history with the default depth.
    #[must_use]
    pub fn new(initial: T) -> Self {
        Self::with_max_depth(initial, DEFAULT_HISTORY_DEPTH)
    }

    /// Create a history keeping at most `max_depth` undo steps.
    #[must_use]
    pub fn with_max_depth(initial: T, max_depth: usize) -> Self {
        Self {
            past: VecDeque::new(),
            present: initial.clone(),
            future: VecDeque::new(),
            initial,
            max_depth,
        }
    }

    /// The current value.
    #[must_use]
    pub fn present(&self) -> &T {
        &self.present
    }

    /// Record `next` as the new present. Returns `false` (and records
    /// nothing) when `next` equals the current present.
    pub fn commit(&mut self, next: T) -> bool {
        if next == self.present {
            return false;
        }
        let prev = std::mem::replace(&mut self.present, next);
        self.past.push_back(prev);
        while self.past.len() > self.max_depth {
            self.past.pop_front();
        }
        self.future.clear();
        true
    }

    /// Step back one commit. Returns `false` when there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        let Some(prev) = self.past.pop_back() else {
            return false;
        };
        let current = std::mem::replace(&mut self.present, prev);
        self.future.push_front(current);
        true
    }

    /// Step forward one undone commit. Returns `false` when there is nothing to redo.
    pub fn redo(&mut self) -> bool {
        let Some(next) = self.future.pop_front() else {
            return false;
        };
        let current = std::mem::replace(&mut self.present, next);
        self.past.push_back(current);
        true
    }

    /// Drop both stacks and set the present to `state`, or back to the
    /// value the history was created with.
    pub fn reset(&mut self, state: Option<T>) {
        self.past.clear();
        self.future.clear();
        self.present = state.unwrap_or_else(|| self.initial.clone());
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    #[must_use]
    pub fn undo_count(&self) -> usize {
        self.past.len()
    }

    #[must_use]
    pub fn redo_count(&self) -> usize {
        self.future.len()
    }

    #[must_use]
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Past states, oldest first.
    pub fn past(&self) -> impl Iterator<Item = &T> {
        self.past.iter()
    }

    /// Undone states, next-to-redo first.
    pub fn future(&self) -> impl Iterator<Item = &T> {
        self.future.iter()
    }
}
