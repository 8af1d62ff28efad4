//! Selection set and the rules that change it.
//!
//! DESIGN
//! ======
//! The selection is a plain set of overlay ids owned by the editing session.
//! It is only ever a subset of the present composition: callers run `prune`
//! after anything that can remove overlays (delete, undo, redo, load).
//!
//! Group dragging does not use a shared frame of reference. Each selected
//! overlay keeps its own live position and receives the same incremental
//! delta as the one under the pointer, clamped on its own.

#[cfg(test)]
#[path = "selection_test.rs"]
mod selection_test;

use std::collections::{HashMap, HashSet};

use crate::doc::{Composition, ObjectId};
use crate::geometry::{Point, Rect, Size, clamp_to_bounds};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    ids: HashSet<ObjectId>,
}

impl Selection {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the selection with exactly `id`.
    pub fn select_one(&mut self, id: ObjectId) {
        self.ids.clear();
        self.ids.insert(id);
    }

    /// Add `id` if absent, remove it if present.
    pub fn select_toggle(&mut self, id: ObjectId) {
        if !self.ids.remove(&id) {
            self.ids.insert(id);
        }
    }

    /// Apply a marquee over `composition`.
    ///
    /// Additive marquees union with the current selection. Otherwise the
    /// selection is replaced, but only when the marquee touched something:
    /// an empty sweep leaves the selection alone.
    pub fn marquee_select(&mut self, rect: &Rect, additive: bool, composition: &Composition) {
        let hits = composition.ids_intersecting(rect);
        if additive {
            self.ids.extend(hits);
        } else if !hits.is_empty() {
            self.ids = hits.into_iter().collect();
        }
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Drop ids that no longer exist in `composition`. Returns true if any were dropped.
    pub fn prune(&mut self, composition: &Composition) -> bool {
        let before = self.ids.len();
        self.ids.retain(|id| composition.contains(id));
        before != self.ids.len()
    }

    #[must_use]
    pub fn contains(&self, id: &ObjectId) -> bool {
        self.ids.contains(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// The selected id when exactly one overlay is selected.
    #[must_use]
    pub fn single(&self) -> Option<ObjectId> {
        if self.ids.len() == 1 {
            self.ids.iter().next().copied()
        } else {
            None
        }
    }

    #[must_use]
    pub fn ids(&self) -> &HashSet<ObjectId> {
        &self.ids
    }

    /// Other selected overlays that follow `dragged` when it moves. Empty
    /// unless `dragged` is part of a multi-selection.
    #[must_use]
    pub fn group_followers(&self, dragged: &ObjectId) -> Vec<ObjectId> {
        if self.ids.len() < 2 || !self.ids.contains(dragged) {
            return Vec::new();
        }
        self.ids.iter().filter(|id| *id != dragged).copied().collect()
    }

    /// Translate every follower of `dragged` by `delta`.
    ///
    /// `live` holds the in-gesture top-left of each moving overlay; followers
    /// missing from it start at their committed position. Each result is
    /// clamped to `stage` independently. Returns the ids that moved.
    pub fn propagate_group_move(
        &self,
        dragged: &ObjectId,
        delta: Point,
        composition: &Composition,
        live: &mut HashMap<ObjectId, Point>,
        stage: Size,
    ) -> Vec<ObjectId> {
        let mut moved = Vec::new();
        for id in self.group_followers(dragged) {
            let Some(overlay) = composition.get(&id) else {
                continue;
            };
            let base = live.get(&id).copied().unwrap_or_else(|| overlay.position());
            let raw = base.offset(delta);
            let pos = clamp_to_bounds(raw.x, raw.y, overlay.size, stage.width, stage.height);
            live.insert(id, pos);
            moved.push(id);
        }
        moved
    }
}
