//! Hit-testing: which overlay, transform handle, or delete button lies under
//! a stage point.
//!
//! Controls attached to a single selected overlay are tested before any
//! overlay body, and bodies are tested topmost first, so the result always
//! matches what the user sees on top.

#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::consts::{DELETE_BUTTON_MARGIN_PX, DELETE_BUTTON_RADIUS_PX, HANDLE_RADIUS_PX, ROTATE_HANDLE_OFFSET_PX};
use crate::doc::{Composition, ObjectId, Overlay};
use crate::geometry::{Point, point_in_rotated_square, rotate_offset};
use crate::selection::Selection;

/// Which part of an overlay was hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitPart {
    Body,
    ResizeHandle(Corner),
    RotateHandle,
    DeleteButton,
}

/// Corner of an overlay's square, before rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Corner {
    Ne,
    Se,
    Sw,
    Nw,
}

impl Corner {
    pub const ALL: [Corner; 4] = [Corner::Ne, Corner::Se, Corner::Sw, Corner::Nw];

    /// Unit direction of the corner from the center, unrotated.
    fn unit(self) -> (f64, f64) {
        match self {
            Corner::Ne => (1.0, -1.0),
            Corner::Se => (1.0, 1.0),
            Corner::Sw => (-1.0, 1.0),
            Corner::Nw => (-1.0, -1.0),
        }
    }
}

/// Result of a hit test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hit {
    pub object_id: ObjectId,
    pub part: HitPart,
}

/// Stage position of a corner, following the overlay's rotation.
#[must_use]
pub fn corner_point(overlay: &Overlay, corner: Corner) -> Point {
    let half = overlay.size / 2.0;
    let (ux, uy) = corner.unit();
    overlay
        .center()
        .offset(rotate_offset(ux * half, uy * half, overlay.rotation))
}

/// Stage position of the rotate knob, above the top edge.
#[must_use]
pub fn rotate_handle_point(overlay: &Overlay) -> Point {
    let reach = overlay.size / 2.0 + ROTATE_HANDLE_OFFSET_PX;
    overlay
        .center()
        .offset(rotate_offset(0.0, -reach, overlay.rotation))
}

/// Center of the delete button: the rotated top-right corner pushed out by a
/// fixed margin.
#[must_use]
pub fn delete_button_center(overlay: &Overlay) -> Point {
    let corner = corner_point(overlay, Corner::Ne);
    Point::new(corner.x + DELETE_BUTTON_MARGIN_PX, corner.y - DELETE_BUTTON_MARGIN_PX)
}

/// Test what lies under `pt`.
///
/// When exactly one overlay is selected its transform handles and delete
/// button take priority; otherwise the topmost overlay whose rotated square
/// contains `pt` is reported as a body hit.
#[must_use]
pub fn hit_test(pt: Point, composition: &Composition, selection: &Selection) -> Option<Hit> {
    if let Some(hit) = selection
        .single()
        .and_then(|id| composition.get(&id))
        .and_then(|overlay| hit_controls(pt, overlay))
    {
        return Some(hit);
    }

    composition
        .overlays()
        .iter()
        .rev()
        .find(|o| point_in_rotated_square(pt, o.center(), o.size, o.rotation))
        .map(|o| Hit { object_id: o.id, part: HitPart::Body })
}

fn hit_controls(pt: Point, overlay: &Overlay) -> Option<Hit> {
    let hit = |part| Some(Hit { object_id: overlay.id, part });

    if pt.distance_to(rotate_handle_point(overlay)) <= HANDLE_RADIUS_PX {
        return hit(HitPart::RotateHandle);
    }
    // The delete button overlaps the NE handle; the handle wins.
    if let Some(corner) = Corner::ALL
        .into_iter()
        .find(|corner| pt.distance_to(corner_point(overlay, *corner)) <= HANDLE_RADIUS_PX)
    {
        return hit(HitPart::ResizeHandle(corner));
    }
    if pt.distance_to(delete_button_center(overlay)) <= DELETE_BUTTON_RADIUS_PX {
        return hit(HitPart::DeleteButton);
    }
    None
}
