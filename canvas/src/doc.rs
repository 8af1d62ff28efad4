//! Document model: placed overlays, the ordered composition, and the wire
//! shapes used to save and resume a composition.
//!
//! This module defines the overlay entity (`Overlay`), the ordered collection
//! that is the unit of undo history (`Composition`), and the serialized forms
//! exchanged with the backend (`PlacedItemData`, `SavedImage`).
//!
//! Sequence order in a `Composition` is the paint order: index 0 is drawn
//! first, the last overlay is on top. Every transform on `Overlay` returns a
//! new value with its position clamped to the stage, which is what a commit
//! stores.

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::consts::MIN_OVERLAY_SIZE;
use crate::error::CanvasError;
use crate::geometry::{Point, Rect, Size, clamp_to_bounds};

/// Unique identifier for a placed overlay.
pub type ObjectId = Uuid;

/// A decorative item placed on the stage.
#[derive(Debug, Clone, PartialEq)]
pub struct Overlay {
    /// Stable identity, assigned at creation.
    pub id: ObjectId,
    /// Catalog item this overlay displays.
    pub item_id: String,
    /// Left edge of the square in stage coordinates.
    pub x: f64,
    /// Top edge of the square in stage coordinates.
    pub y: f64,
    /// Edge length of the square.
    pub size: f64,
    /// Clockwise rotation in degrees around the square's center.
    pub rotation: f64,
}

impl Overlay {
    /// Create an overlay with a fresh id. `size` is raised to [`MIN_OVERLAY_SIZE`].
    #[must_use]
    pub fn new(item_id: impl Into<String>, x: f64, y: f64, size: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            item_id: item_id.into(),
            x,
            y,
            size: size.max(MIN_OVERLAY_SIZE),
            rotation: 0.0,
        }
    }

    /// Axis-aligned bounding square, ignoring rotation.
    #[must_use]
    pub fn bounds(&self) -> Rect {
        Rect::square(self.x, self.y, self.size)
    }

    #[must_use]
    pub fn center(&self) -> Point {
        self.bounds().center()
    }

    #[must_use]
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Copy placed at `top_left`, clamped to the stage.
    #[must_use]
    pub fn moved_to(&self, top_left: Point, stage: Size) -> Self {
        let pos = clamp_to_bounds(top_left.x, top_left.y, self.size, stage.width, stage.height);
        Self { x: pos.x, y: pos.y, ..self.clone() }
    }

    /// Copy resized by `scale` and set to `rotation` degrees, keeping its
    /// center fixed before clamping to the stage.
    ///
    /// The new size never drops below [`MIN_OVERLAY_SIZE`].
    #[must_use]
    pub fn transformed(&self, scale: f64, rotation: f64, stage: Size) -> Self {
        let scale = if scale.is_finite() { scale } else { 1.0 };
        let rotation = if rotation.is_finite() { rotation } else { self.rotation };
        let size = (self.size * scale).max(MIN_OVERLAY_SIZE);
        let center = self.center();
        let pos = clamp_to_bounds(center.x - size / 2.0, center.y - size / 2.0, size, stage.width, stage.height);
        Self {
            x: pos.x,
            y: pos.y,
            size,
            rotation,
            ..self.clone()
        }
    }

    /// Serialize to the wire shape. Rotation is omitted when zero.
    #[must_use]
    pub fn to_data(&self) -> PlacedItemData {
        PlacedItemData {
            id: self.id.to_string(),
            item_id: self.item_id.clone(),
            x: self.x,
            y: self.y,
            size: self.size,
            rotation: (self.rotation != 0.0).then_some(self.rotation),
        }
    }
}

/// The ordered set of overlays on the stage. This is the history state.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Composition {
    overlays: Vec<Overlay>,
}

impl Composition {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from overlays already in paint order.
    #[must_use]
    pub fn from_overlays(overlays: Vec<Overlay>) -> Self {
        Self { overlays }
    }

    /// Overlays in paint order (bottom first).
    #[must_use]
    pub fn overlays(&self) -> &[Overlay] {
        &self.overlays
    }

    /// Overlay ids in paint order (bottom first).
    #[must_use]
    pub fn paint_order(&self) -> Vec<ObjectId> {
        self.overlays.iter().map(|o| o.id).collect()
    }

    #[must_use]
    pub fn get(&self, id: &ObjectId) -> Option<&Overlay> {
        self.overlays.iter().find(|o| o.id == *id)
    }

    #[must_use]
    pub fn contains(&self, id: &ObjectId) -> bool {
        self.get(id).is_some()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.overlays.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.overlays.is_empty()
    }

    /// Append on top of everything else.
    pub fn push(&mut self, overlay: Overlay) {
        self.overlays.push(overlay);
    }

    /// Replace the overlay with the same id, keeping its paint position.
    /// Returns false if no such overlay exists.
    pub fn replace(&mut self, overlay: Overlay) -> bool {
        let Some(slot) = self.overlays.iter_mut().find(|o| o.id == overlay.id) else {
            return false;
        };
        *slot = overlay;
        true
    }

    /// Remove every overlay whose id is in `ids`. Returns how many were removed.
    pub fn remove_all(&mut self, ids: &HashSet<ObjectId>) -> usize {
        let before = self.overlays.len();
        self.overlays.retain(|o| !ids.contains(&o.id));
        before - self.overlays.len()
    }

    /// Ids of overlays whose bounding square strictly intersects `rect`.
    #[must_use]
    pub fn ids_intersecting(&self, rect: &Rect) -> Vec<ObjectId> {
        self.overlays
            .iter()
            .filter(|o| o.bounds().intersects(rect))
            .map(|o| o.id)
            .collect()
    }

    /// Serialize every overlay in paint order.
    #[must_use]
    pub fn to_data(&self) -> Vec<PlacedItemData> {
        self.overlays.iter().map(Overlay::to_data).collect()
    }
}

// =============================================================
// Wire shapes
// =============================================================

/// A placed overlay as saved alongside a rendered composition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacedItemData {
    pub id: String,
    pub item_id: String,
    pub x: f64,
    pub y: f64,
    pub size: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f64>,
}

impl PlacedItemData {
    /// Whether every numeric field is usable (finite, positive size).
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        self.x.is_finite()
            && self.y.is_finite()
            && self.size.is_finite()
            && self.size > 0.0
            && self.rotation.is_none_or(f64::is_finite)
    }

    /// Convert to an overlay. An id that is not a UUID is replaced with a
    /// fresh one; the size is raised to [`MIN_OVERLAY_SIZE`].
    #[must_use]
    pub fn to_overlay(&self) -> Overlay {
        let id = Uuid::parse_str(&self.id).unwrap_or_else(|_| Uuid::new_v4());
        Overlay {
            id,
            item_id: self.item_id.clone(),
            x: self.x,
            y: self.y,
            size: self.size.max(MIN_OVERLAY_SIZE),
            rotation: self.rotation.unwrap_or(0.0),
        }
    }
}

/// A saved composition record returned by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedImage {
    pub id: String,
    pub name: String,
    pub image_path: String,
    #[serde(default)]
    pub placed_items: Option<Vec<PlacedItemData>>,
    pub user_id: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Parse a `placedItems` JSON array.
///
/// # Errors
///
/// Returns [`CanvasError::Json`] if the payload is not an array of placed items.
pub fn parse_placed_items(json: &str) -> Result<Vec<PlacedItemData>, CanvasError> {
    Ok(serde_json::from_str(json)?)
}
