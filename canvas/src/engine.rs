//! Stage engine: the per-session coordinator of the editor.
//!
//! DESIGN
//! ======
//! `EngineCore` owns everything one editing session needs: the undo history
//! of the composition, the selection, the active gesture, the palette drop
//! preview, the stage size, and the image resolution cache. Host events go in
//! through `on_*` methods; every method returns the effects as `Vec<Action>`
//! for the host to act on (load an image, persist, repaint). Nothing here
//! touches the browser, so the whole interaction model runs in plain unit
//! tests.
//!
//! During a gesture the engine only updates ephemeral state (`live`
//! positions, the transform preview, the marquee). The history sees exactly
//! one commit per gesture, on pointer-up, with every position re-clamped.
//!
//! Modifier keys are sampled once, at pointer-down, for every selection
//! decision of the gesture (click toggle and marquee union alike).
//!
//! `Engine` wraps `EngineCore` with the browser canvas element and the
//! decoded image elements, and paints the scene built by [`crate::render`].

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

use std::collections::{HashMap, HashSet};

use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement};

use crate::assets::AssetCache;
use crate::catalog::{Catalog, ImageResolver};
use crate::consts::{DEFAULT_HISTORY_DEPTH, MIN_OVERLAY_SIZE};
use crate::doc::{Composition, ObjectId, Overlay, PlacedItemData};
use crate::error::CanvasError;
use crate::geometry::{Point, Rect, Size, angle_from_up_deg, clamp_to_bounds};
use crate::history::History;
use crate::hit::{HitPart, hit_test};
use crate::input::{Button, DropPreview, InputState, Key, Modifiers, TransformHandle, UiState};
use crate::render;
use crate::selection::Selection;

/// Actions returned from input handlers for the host to process.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// A new overlay was committed.
    OverlayCreated(Overlay),
    /// Overlays whose geometry was committed by a gesture or transform.
    OverlaysUpdated(Vec<ObjectId>),
    /// Overlays removed by a delete.
    OverlaysDeleted(Vec<ObjectId>),
    /// The history stacks changed (commit, undo, redo, reset).
    HistoryChanged { can_undo: bool, can_redo: bool },
    /// The selection changed; carries the new selection.
    SelectionChanged(Vec<ObjectId>),
    /// The host should start loading this image URL.
    LoadAsset { url: String },
    /// The host should change the pointer cursor.
    SetCursor(String),
    /// Something visible changed.
    RenderNeeded,
}

/// Tunables for an editing session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    /// Maximum number of undo steps kept.
    pub history_depth: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self { history_depth: DEFAULT_HISTORY_DEPTH }
    }
}

/// Core engine state: everything that does not touch the canvas element.
///
/// Separated from `Engine` so it can be tested without WASM/browser dependencies.
pub struct EngineCore {
    history: History<Composition>,
    ui: UiState,
    input: InputState,
    live: HashMap<ObjectId, Point>,
    catalog: Catalog,
    resolver: Box<dyn ImageResolver>,
    assets: AssetCache,
    background: Option<String>,
    stage: Size,
    cursor: &'static str,
}

impl EngineCore {
    #[must_use]
    pub fn new(resolver: Box<dyn ImageResolver>) -> Self {
        Self::with_config(resolver, EngineConfig::default())
    }

    #[must_use]
    pub fn with_config(resolver: Box<dyn ImageResolver>, config: EngineConfig) -> Self {
        Self {
            history: History::with_max_depth(Composition::new(), config.history_depth),
            ui: UiState::default(),
            input: InputState::default(),
            live: HashMap::new(),
            catalog: Catalog::default(),
            resolver,
            assets: AssetCache::new(),
            background: None,
            stage: Size::default(),
            cursor: "default",
        }
    }

    // =============================================================
    // Data inputs
    // =============================================================

    /// Replace the item catalog and request images for overlays that can now
    /// be resolved.
    pub fn set_catalog(&mut self, catalog: Catalog) -> Vec<Action> {
        self.catalog = catalog;
        let item_ids: Vec<String> = self
            .history
            .present()
            .overlays()
            .iter()
            .map(|o| o.item_id.clone())
            .collect();
        let mut actions: Vec<Action> = item_ids
            .iter()
            .filter_map(|item_id| self.request_item_image(item_id))
            .collect();
        actions.push(Action::RenderNeeded);
        actions
    }

    /// Update the stage to the container's observed size (floored to whole pixels).
    pub fn set_stage_size(&mut self, width: f64, height: f64) -> Vec<Action> {
        let next = Size::new(width.max(0.0).floor(), height.max(0.0).floor());
        if next == self.stage {
            return Vec::new();
        }
        self.stage = next;
        vec![Action::RenderNeeded]
    }

    /// Set the background photo URL.
    pub fn set_background(&mut self, url: &str) -> Vec<Action> {
        self.background = Some(url.to_string());
        let mut actions = Vec::new();
        if self.assets.request(url) {
            actions.push(Action::LoadAsset { url: url.to_string() });
        }
        actions.push(Action::RenderNeeded);
        actions
    }

    /// The host finished decoding an image.
    pub fn on_asset_loaded(&mut self, url: &str, width: f64, height: f64) -> Vec<Action> {
        if self.assets.resolve(url, width, height) {
            vec![Action::RenderNeeded]
        } else {
            Vec::new()
        }
    }

    /// The host could not load an image. Whatever uses it is simply not drawn.
    pub fn on_asset_failed(&mut self, url: &str) -> Vec<Action> {
        tracing::warn!(%url, "image failed to load");
        if self.assets.fail(url) {
            vec![Action::RenderNeeded]
        } else {
            Vec::new()
        }
    }

    /// Resume a saved composition. History is reset to it.
    ///
    /// Entries that reference an item missing from the catalog, or carry
    /// unusable numbers, are dropped. Duplicate or malformed ids get a fresh
    /// id, sizes are raised to the minimum, and positions are clamped to the
    /// current stage. Set the catalog before calling this.
    pub fn load_composition(&mut self, items: &[PlacedItemData]) -> Vec<Action> {
        self.discard_gesture();
        let mut seen = HashSet::new();
        let mut overlays = Vec::with_capacity(items.len());
        for data in items {
            if !data.is_well_formed() {
                tracing::warn!(id = %data.id, "dropping placed item with invalid geometry");
                continue;
            }
            if !self.catalog.contains(&data.item_id) {
                tracing::warn!(id = %data.id, item_id = %data.item_id, "dropping placed item with unknown catalog item");
                continue;
            }
            let mut overlay = data.to_overlay();
            if !seen.insert(overlay.id) {
                overlay.id = uuid::Uuid::new_v4();
                seen.insert(overlay.id);
            }
            if self.stage.is_drawable() {
                overlay = overlay.moved_to(overlay.position(), self.stage);
            }
            overlays.push(overlay);
        }
        tracing::info!(loaded = overlays.len(), dropped = items.len() - overlays.len(), "composition loaded");

        let before = self.ui.selection.clone();
        self.history.reset(Some(Composition::from_overlays(overlays)));
        self.ui.selection.clear();

        let item_ids: Vec<String> = self
            .history
            .present()
            .overlays()
            .iter()
            .map(|o| o.item_id.clone())
            .collect();
        let mut actions: Vec<Action> = item_ids
            .iter()
            .filter_map(|item_id| self.request_item_image(item_id))
            .collect();
        actions.extend(self.selection_effect(&before));
        actions.push(self.history_effect());
        actions.push(Action::RenderNeeded);
        actions
    }

    /// Serialize the committed composition for saving.
    #[must_use]
    pub fn placed_items(&self) -> Vec<PlacedItemData> {
        self.history.present().to_data()
    }

    // =============================================================
    // Palette drag and drop
    // =============================================================

    /// A palette item is being dragged over the stage at `pointer`.
    ///
    /// The preview is a square of the item's default size centered on the
    /// pointer. Unknown items clear any preview.
    pub fn palette_drag_move(&mut self, item_id: &str, pointer: Point) -> Vec<Action> {
        let next = self.catalog.get(item_id).map(|item| {
            let size = item.default_size.max(MIN_OVERLAY_SIZE);
            DropPreview {
                item_id: item_id.to_string(),
                x: pointer.x - size / 2.0,
                y: pointer.y - size / 2.0,
                size,
            }
        });
        if next == self.ui.drop_preview {
            return Vec::new();
        }
        self.ui.drop_preview = next;
        let mut actions = Vec::new();
        actions.extend(self.request_item_image(item_id));
        actions.push(Action::RenderNeeded);
        actions
    }

    /// The palette item was released over the stage at `pointer`. The new
    /// overlay lands where the preview was, clamped to the stage.
    ///
    /// `pointer` is the preview's center, so the committed top-left is
    /// `pointer - size / 2`. Hosts that already hold a top-left call
    /// [`Self::place_overlay`] instead.
    pub fn palette_drop(&mut self, item_id: &str, pointer: Point) -> Vec<Action> {
        let mut actions = self.palette_drag_cancel();
        let Some(size) = self.catalog.get(item_id).map(|i| i.default_size.max(MIN_OVERLAY_SIZE)) else {
            tracing::warn!(%item_id, "drop of unknown catalog item ignored");
            return actions;
        };
        actions.extend(self.place_overlay(item_id, Point::new(pointer.x - size / 2.0, pointer.y - size / 2.0)));
        actions
    }

    /// The palette drag ended anywhere other than the stage.
    pub fn palette_drag_cancel(&mut self) -> Vec<Action> {
        if self.ui.drop_preview.take().is_some() {
            vec![Action::RenderNeeded]
        } else {
            Vec::new()
        }
    }

    /// Commit a new overlay of catalog item `item_id` with its top-left at
    /// `top_left`, clamped once the stage has a size. Size is the item's
    /// default size.
    pub fn place_overlay(&mut self, item_id: &str, top_left: Point) -> Vec<Action> {
        let Some(item) = self.catalog.get(item_id) else {
            tracing::warn!(%item_id, "cannot place unknown catalog item");
            return Vec::new();
        };
        let mut overlay = Overlay::new(item_id, top_left.x, top_left.y, item.default_size);
        if self.stage.is_drawable() {
            overlay = overlay.moved_to(top_left, self.stage);
        }

        let mut next = self.history.present().clone();
        next.push(overlay.clone());

        let mut actions = Vec::new();
        actions.extend(self.request_item_image(item_id));
        let committed = self.commit(next);
        if !committed.is_empty() {
            tracing::debug!(id = %overlay.id, %item_id, x = overlay.x, y = overlay.y, "overlay placed");
            actions.push(Action::OverlayCreated(overlay));
            actions.extend(committed);
        }
        actions
    }

    // =============================================================
    // Direct mutations
    // =============================================================

    /// Commit a move of one overlay to `top_left`, clamped.
    pub fn move_overlay(&mut self, id: &ObjectId, top_left: Point) -> Vec<Action> {
        let Some(overlay) = self.history.present().get(id) else {
            return Vec::new();
        };
        let moved = overlay.moved_to(top_left, self.stage);
        self.commit_updates(vec![moved])
    }

    /// Commit a resize/rotate as reported by a transform handle: `scale` is
    /// the handle's horizontal scale, `rotation` its absolute rotation in degrees.
    pub fn apply_transform(&mut self, id: &ObjectId, scale: f64, rotation: f64) -> Vec<Action> {
        let Some(overlay) = self.history.present().get(id) else {
            return Vec::new();
        };
        let transformed = overlay.transformed(scale, rotation, self.stage);
        self.commit_updates(vec![transformed])
    }

    /// Delete one overlay.
    pub fn delete_overlay(&mut self, id: &ObjectId) -> Vec<Action> {
        let ids: HashSet<ObjectId> = std::iter::once(*id).collect();
        self.delete_ids(&ids)
    }

    /// Delete every selected overlay.
    pub fn delete_selected(&mut self) -> Vec<Action> {
        let ids = self.ui.selection.ids().clone();
        self.delete_ids(&ids)
    }

    /// Step back one commit. An active gesture is discarded first.
    pub fn undo(&mut self) -> Vec<Action> {
        let mut actions = self.cancel_gesture();
        let before = self.ui.selection.clone();
        if self.history.undo() {
            self.ui.selection.prune(self.history.present());
            actions.extend(self.after_history_step(&before));
        }
        actions
    }

    /// Step forward one undone commit. An active gesture is discarded first.
    pub fn redo(&mut self) -> Vec<Action> {
        let mut actions = self.cancel_gesture();
        let before = self.ui.selection.clone();
        if self.history.redo() {
            self.ui.selection.prune(self.history.present());
            actions.extend(self.after_history_step(&before));
        }
        actions
    }

    // =============================================================
    // Selection
    // =============================================================

    pub fn select_one(&mut self, id: &ObjectId) -> Vec<Action> {
        if !self.history.present().contains(id) {
            return Vec::new();
        }
        let before = self.ui.selection.clone();
        self.ui.selection.select_one(*id);
        self.selection_effect(&before).into_iter().collect()
    }

    pub fn select_toggle(&mut self, id: &ObjectId) -> Vec<Action> {
        if !self.history.present().contains(id) {
            return Vec::new();
        }
        let before = self.ui.selection.clone();
        self.ui.selection.select_toggle(*id);
        self.selection_effect(&before).into_iter().collect()
    }

    pub fn clear_selection(&mut self) -> Vec<Action> {
        let before = self.ui.selection.clone();
        self.ui.selection.clear();
        self.selection_effect(&before).into_iter().collect()
    }

    // =============================================================
    // Pointer input
    // =============================================================

    /// Pointer pressed at stage point `pt`.
    pub fn on_pointer_down(&mut self, pt: Point, button: Button, modifiers: Modifiers) -> Vec<Action> {
        if button != Button::Primary {
            return Vec::new();
        }
        // A release we never saw still ends the previous gesture.
        let mut actions = self.finish_gesture();
        let before = self.ui.selection.clone();
        let additive = modifiers.additive();

        match hit_test(pt, self.history.present(), &self.ui.selection) {
            Some(hit) => match hit.part {
                HitPart::DeleteButton => {
                    actions.extend(self.delete_selected());
                    return actions;
                }
                HitPart::ResizeHandle(corner) => {
                    self.begin_transform(hit.object_id, TransformHandle::Resize(corner), pt);
                }
                HitPart::RotateHandle => self.begin_transform(hit.object_id, TransformHandle::Rotate, pt),
                HitPart::Body => self.begin_drag(hit.object_id, pt, additive),
            },
            None => {
                if !additive {
                    self.ui.selection.clear();
                }
                self.input = InputState::Marqueeing { start: pt, current: pt, additive };
            }
        }

        actions.extend(self.selection_effect(&before));
        actions.push(Action::RenderNeeded);
        actions
    }

    /// Pointer moved to stage point `pt`.
    pub fn on_pointer_move(&mut self, pt: Point, _modifiers: Modifiers) -> Vec<Action> {
        if self.input.is_idle() {
            return self.update_hover_cursor(pt).into_iter().collect();
        }
        let stage = self.stage;
        match &mut self.input {
            InputState::Idle => Vec::new(),
            InputState::Dragging { id, start_pointer, last_pointer, orig, moved, .. } => {
                if pt == *last_pointer {
                    return Vec::new();
                }
                let delta = pt.delta_from(*last_pointer);
                *last_pointer = pt;
                *moved = true;
                let id = *id;
                let raw = orig.offset(pt.delta_from(*start_pointer));
                let composition = self.history.present();
                let Some(size) = composition.get(&id).map(|o| o.size) else {
                    return Vec::new();
                };
                self.live
                    .insert(id, clamp_to_bounds(raw.x, raw.y, size, stage.width, stage.height));
                self.ui
                    .selection
                    .propagate_group_move(&id, delta, composition, &mut self.live, stage);
                vec![Action::RenderNeeded]
            }
            InputState::Marqueeing { current, .. } => {
                *current = pt;
                vec![Action::RenderNeeded]
            }
            InputState::Transforming {
                handle, center, start_distance, start_angle, orig_rotation, scale, rotation, ..
            } => {
                match handle {
                    TransformHandle::Resize(_) => {
                        if *start_distance > f64::EPSILON {
                            *scale = pt.distance_to(*center) / *start_distance;
                        }
                    }
                    TransformHandle::Rotate => {
                        *rotation = *orig_rotation + angle_from_up_deg(*center, pt) - *start_angle;
                    }
                }
                vec![Action::RenderNeeded]
            }
        }
    }

    /// Pointer released at stage point `pt`. Ends whatever gesture is active
    /// and commits its result; a no-op when idle.
    pub fn on_pointer_up(&mut self, pt: Point, _button: Button, _modifiers: Modifiers) -> Vec<Action> {
        if let InputState::Marqueeing { current, .. } = &mut self.input {
            *current = pt;
        }
        self.finish_gesture()
    }

    /// Abandon the active gesture without committing (pointer cancel, blur,
    /// unmount).
    pub fn cancel_gesture(&mut self) -> Vec<Action> {
        if self.input.is_idle() && self.live.is_empty() {
            return Vec::new();
        }
        self.discard_gesture();
        vec![Action::RenderNeeded]
    }

    // =============================================================
    // Keyboard input
    // =============================================================

    /// Key pressed. `editable_focus` is true while focus is in a text input
    /// or editable element, in which case shortcuts are left to it.
    pub fn on_key_down(&mut self, key: &Key, modifiers: Modifiers, editable_focus: bool) -> Vec<Action> {
        if editable_focus {
            return Vec::new();
        }
        let name = key.0.as_str();
        if name == "Escape" {
            let mut actions = self.cancel_gesture();
            actions.extend(self.palette_drag_cancel());
            if actions.is_empty() {
                actions.extend(self.clear_selection());
                actions.push(Action::RenderNeeded);
            }
            return actions;
        }
        if !self.input.is_idle() {
            return Vec::new();
        }

        let is_z = name.eq_ignore_ascii_case("z");
        let is_y = name.eq_ignore_ascii_case("y");
        if modifiers.command() && is_z && !modifiers.shift {
            self.undo()
        } else if modifiers.command() && (is_y || (is_z && modifiers.shift)) {
            self.redo()
        } else if matches!(name, "Delete" | "Backspace") {
            self.delete_selected()
        } else {
            Vec::new()
        }
    }

    // =============================================================
    // Queries
    // =============================================================

    /// The committed composition.
    #[must_use]
    pub fn composition(&self) -> &Composition {
        self.history.present()
    }

    /// Look up a committed overlay by id.
    #[must_use]
    pub fn overlay(&self, id: &ObjectId) -> Option<&Overlay> {
        self.history.present().get(id)
    }

    /// An overlay as it should be drawn right now, including in-gesture
    /// movement and transform previews.
    #[must_use]
    pub fn displayed_overlay(&self, overlay: &Overlay) -> Overlay {
        if let InputState::Transforming { id, scale, rotation, .. } = &self.input {
            if *id == overlay.id {
                return overlay.transformed(*scale, *rotation, self.stage);
            }
        }
        match self.live.get(&overlay.id) {
            Some(pos) => Overlay { x: pos.x, y: pos.y, ..overlay.clone() },
            None => overlay.clone(),
        }
    }

    /// Image URL for a catalog item, if the item exists.
    #[must_use]
    pub fn item_image_url(&self, item_id: &str) -> Option<String> {
        self.catalog.get(item_id).map(|item| self.resolver.image_url(item))
    }

    #[must_use]
    pub fn selection(&self) -> &Selection {
        &self.ui.selection
    }

    #[must_use]
    pub fn drop_preview(&self) -> Option<&DropPreview> {
        self.ui.drop_preview.as_ref()
    }

    #[must_use]
    pub fn input(&self) -> &InputState {
        &self.input
    }

    #[must_use]
    pub fn stage_size(&self) -> Size {
        self.stage
    }

    #[must_use]
    pub fn background(&self) -> Option<&str> {
        self.background.as_deref()
    }

    #[must_use]
    pub fn assets(&self) -> &AssetCache {
        &self.assets
    }

    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    #[must_use]
    pub fn undo_count(&self) -> usize {
        self.history.undo_count()
    }

    #[must_use]
    pub fn redo_count(&self) -> usize {
        self.history.redo_count()
    }

    // =============================================================
    // Gesture internals
    // =============================================================

    fn begin_drag(&mut self, id: ObjectId, pt: Point, additive: bool) {
        let was_selected = self.ui.selection.contains(&id);
        if additive {
            self.ui.selection.select_toggle(id);
        } else if !was_selected {
            self.ui.selection.select_one(id);
        }
        let Some(orig) = self.history.present().get(&id).map(Overlay::position) else {
            return;
        };
        self.input = InputState::Dragging {
            id,
            start_pointer: pt,
            last_pointer: pt,
            orig,
            moved: false,
            collapse_on_click: was_selected && !additive,
        };
    }

    fn begin_transform(&mut self, id: ObjectId, handle: TransformHandle, pt: Point) {
        let Some(overlay) = self.history.present().get(&id) else {
            return;
        };
        let center = overlay.center();
        self.input = InputState::Transforming {
            id,
            handle,
            center,
            start_distance: pt.distance_to(center),
            start_angle: angle_from_up_deg(center, pt),
            orig_rotation: overlay.rotation,
            scale: 1.0,
            rotation: overlay.rotation,
        };
    }

    /// End the active gesture at its last tracked pointer position,
    /// committing its result.
    fn finish_gesture(&mut self) -> Vec<Action> {
        let state = std::mem::take(&mut self.input);
        let live = std::mem::take(&mut self.live);
        match state {
            InputState::Idle => Vec::new(),
            InputState::Dragging { id, moved, collapse_on_click, .. } => {
                if moved {
                    self.commit_live(&live)
                } else if collapse_on_click {
                    self.select_one(&id)
                } else {
                    Vec::new()
                }
            }
            InputState::Marqueeing { start, current, additive } => {
                let rect = Rect::from_corners(start, current);
                let before = self.ui.selection.clone();
                // A press without movement is a click; a straight-line sweep still selects.
                if rect.width > 0.0 || rect.height > 0.0 {
                    self.ui
                        .selection
                        .marquee_select(&rect, additive, self.history.present());
                }
                let mut actions: Vec<Action> = self.selection_effect(&before).into_iter().collect();
                actions.push(Action::RenderNeeded);
                actions
            }
            InputState::Transforming { id, scale, rotation, .. } => {
                let mut actions = self.apply_transform(&id, scale, rotation);
                actions.push(Action::RenderNeeded);
                actions
            }
        }
    }

    /// Commit every live position, each re-clamped.
    fn commit_live(&mut self, live: &HashMap<ObjectId, Point>) -> Vec<Action> {
        let present = self.history.present();
        let updates: Vec<Overlay> = live
            .iter()
            .filter_map(|(id, pos)| present.get(id).map(|o| o.moved_to(*pos, self.stage)))
            .collect();
        let mut actions = self.commit_updates(updates);
        actions.push(Action::RenderNeeded);
        actions
    }

    fn discard_gesture(&mut self) {
        self.input = InputState::Idle;
        self.live.clear();
    }

    fn update_hover_cursor(&mut self, pt: Point) -> Option<Action> {
        let cursor = match hit_test(pt, self.history.present(), &self.ui.selection).map(|h| h.part) {
            Some(HitPart::Body) => "move",
            Some(HitPart::ResizeHandle(_)) => "nwse-resize",
            Some(HitPart::RotateHandle) => "grab",
            Some(HitPart::DeleteButton) => "pointer",
            None => "default",
        };
        if cursor == self.cursor {
            return None;
        }
        self.cursor = cursor;
        Some(Action::SetCursor(cursor.to_string()))
    }

    // =============================================================
    // Commit helpers
    // =============================================================

    fn commit_updates(&mut self, updates: Vec<Overlay>) -> Vec<Action> {
        let mut next = self.history.present().clone();
        let mut ids = Vec::with_capacity(updates.len());
        for overlay in updates {
            let id = overlay.id;
            if next.replace(overlay) {
                ids.push(id);
            }
        }
        let mut actions = self.commit(next);
        if !actions.is_empty() {
            tracing::debug!(count = ids.len(), "overlays updated");
            actions.insert(0, Action::OverlaysUpdated(ids));
        }
        actions
    }

    fn delete_ids(&mut self, ids: &HashSet<ObjectId>) -> Vec<Action> {
        if ids.is_empty() {
            return Vec::new();
        }
        let mut next = self.history.present().clone();
        if next.remove_all(ids) == 0 {
            return Vec::new();
        }
        let before = self.ui.selection.clone();
        let mut actions = vec![Action::OverlaysDeleted(ids.iter().copied().collect())];
        actions.extend(self.commit(next));
        actions.extend(self.selection_effect(&before));
        tracing::debug!(count = ids.len(), "overlays deleted");
        actions
    }

    /// Record `next` in history and prune the selection. Empty when nothing changed.
    fn commit(&mut self, next: Composition) -> Vec<Action> {
        if !self.history.commit(next) {
            return Vec::new();
        }
        self.ui.selection.prune(self.history.present());
        vec![self.history_effect(), Action::RenderNeeded]
    }

    fn after_history_step(&mut self, before: &Selection) -> Vec<Action> {
        let mut actions = vec![self.history_effect()];
        actions.extend(self.selection_effect(before));
        actions.push(Action::RenderNeeded);
        actions
    }

    fn history_effect(&self) -> Action {
        Action::HistoryChanged { can_undo: self.history.can_undo(), can_redo: self.history.can_redo() }
    }

    fn selection_effect(&self, before: &Selection) -> Option<Action> {
        (self.ui.selection != *before).then(|| Action::SelectionChanged(self.ui.selection.ids().iter().copied().collect()))
    }

    fn request_item_image(&mut self, item_id: &str) -> Option<Action> {
        let url = self.item_image_url(item_id)?;
        self.assets.request(&url).then_some(Action::LoadAsset { url })
    }
}

// =============================================================
// Browser engine
// =============================================================

/// The full stage engine. Wraps `EngineCore` and owns the browser canvas
/// element plus the decoded images it paints.
pub struct Engine {
    canvas: HtmlCanvasElement,
    images: HashMap<String, HtmlImageElement>,
    dpr: f64,
    pub core: EngineCore,
}

impl Engine {
    /// Create a new engine bound to the given canvas element.
    #[must_use]
    pub fn new(canvas: HtmlCanvasElement, resolver: Box<dyn ImageResolver>, config: EngineConfig) -> Self {
        Self {
            canvas,
            images: HashMap::new(),
            dpr: 1.0,
            core: EngineCore::with_config(resolver, config),
        }
    }

    /// Resize the backing store to the container size at device pixel ratio `dpr`.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn set_viewport(&mut self, width_css: f64, height_css: f64, dpr: f64) -> Vec<Action> {
        self.dpr = if dpr.is_finite() && dpr > 0.0 { dpr } else { 1.0 };
        let actions = self.core.set_stage_size(width_css, height_css);
        let stage = self.core.stage_size();
        self.canvas.set_width((stage.width * self.dpr).round() as u32);
        self.canvas.set_height((stage.height * self.dpr).round() as u32);
        actions
    }

    /// Hand over a decoded image for `url`.
    pub fn provide_image(&mut self, url: &str, image: HtmlImageElement) -> Vec<Action> {
        let (w, h) = (f64::from(image.natural_width()), f64::from(image.natural_height()));
        self.images.insert(url.to_string(), image);
        self.core.on_asset_loaded(url, w, h)
    }

    /// Report that `url` could not be loaded.
    pub fn image_failed(&mut self, url: &str) -> Vec<Action> {
        self.images.remove(url);
        self.core.on_asset_failed(url)
    }

    /// Draw the current state to the canvas.
    ///
    /// # Errors
    ///
    /// Returns an error if the 2D context is unavailable or a draw call fails.
    pub fn render(&self) -> Result<(), CanvasError> {
        let ctx = self.context()?;
        let scene = render::build_scene(&self.core);
        render::paint(&ctx, &scene, &self.images, self.dpr).map_err(|e| CanvasError::Paint(format!("{e:?}")))
    }

    fn context(&self) -> Result<CanvasRenderingContext2d, CanvasError> {
        self.canvas
            .get_context("2d")
            .map_err(|e| CanvasError::Paint(format!("{e:?}")))?
            .ok_or(CanvasError::NoContext)?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| CanvasError::NoContext)
    }
}
