//! Input model: modifier keys, mouse buttons, and the gesture state machine.
//!
//! This module defines the types consumed by the input engine. `Modifiers`
//! captures the keys held when a pointer goes down. `InputState` is the
//! active gesture being tracked between pointer-down and pointer-up, carrying
//! all context needed to compute incremental deltas and emit one commit on
//! release. `UiState` is the session's presentation state: selection and the
//! palette drop preview.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::doc::ObjectId;
use crate::geometry::{Point, Rect};
use crate::hit::Corner;
use crate::selection::Selection;

/// Keyboard modifier keys held during an event.
#[derive(Debug, Clone, Copy, Default)]
pub struct Modifiers {
    /// Shift key is held.
    pub shift: bool,
    /// Ctrl key is held.
    pub ctrl: bool,
    /// Meta / Command key is held.
    pub meta: bool,
}

impl Modifiers {
    /// Whether the event should extend the selection instead of replacing it.
    #[must_use]
    pub fn additive(self) -> bool {
        self.shift || self.ctrl || self.meta
    }

    /// Ctrl on most platforms, Command on macOS.
    #[must_use]
    pub fn command(self) -> bool {
        self.ctrl || self.meta
    }
}

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    /// Left mouse button (or single-finger tap).
    Primary,
    /// Right mouse button (or two-finger tap).
    Secondary,
}

/// A keyboard key.
///
/// The inner string holds the key name as reported by the browser (e.g. `"Delete"`, `"z"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key(pub String);

/// Where a palette item would land if released now.
#[derive(Debug, Clone, PartialEq)]
pub struct DropPreview {
    /// Catalog item being dragged.
    pub item_id: String,
    /// Left edge of the preview square.
    pub x: f64,
    /// Top edge of the preview square.
    pub y: f64,
    /// Edge length of the preview square.
    pub size: f64,
}

impl DropPreview {
    #[must_use]
    pub fn bounds(&self) -> Rect {
        Rect::square(self.x, self.y, self.size)
    }
}

/// Presentation state of the editing session visible to the renderer.
#[derive(Debug, Clone, Default)]
pub struct UiState {
    /// Currently selected overlays.
    pub selection: Selection,
    /// Active palette drop preview, only while a palette drag is over the stage.
    pub drop_preview: Option<DropPreview>,
}

/// Internal state for the input state machine.
///
/// Each active variant carries gesture context needed to compute deltas and
/// emit the final commit on pointer-up.
#[derive(Debug, Clone, Default)]
pub enum InputState {
    /// No gesture in progress; waiting for the next pointer-down.
    #[default]
    Idle,
    /// The user is moving an overlay (and any selected followers).
    Dragging {
        /// Id of the overlay under the pointer.
        id: ObjectId,
        /// Pointer position at pointer-down.
        start_pointer: Point,
        /// Pointer position at the previous event; deltas are measured from here.
        last_pointer: Point,
        /// Committed top-left of the dragged overlay at pointer-down.
        orig: Point,
        /// Whether the pointer has moved since pointer-down.
        moved: bool,
        /// The overlay was already part of the selection and no modifier was
        /// held: a release without movement collapses the selection to it.
        collapse_on_click: bool,
    },
    /// The user is sweeping a selection rectangle over the stage.
    Marqueeing {
        /// Pointer position where the sweep started.
        start: Point,
        /// Current pointer position.
        current: Point,
        /// Union with the existing selection instead of replacing it.
        additive: bool,
    },
    /// The user is resizing and/or rotating the single selected overlay.
    Transforming {
        /// Id of the overlay being transformed.
        id: ObjectId,
        /// Which handle is being dragged.
        handle: TransformHandle,
        /// Center of the overlay; the pivot for both scale and rotation.
        center: Point,
        /// Pointer distance from the center at pointer-down.
        start_distance: f64,
        /// Pointer angle around the center at pointer-down, degrees.
        start_angle: f64,
        /// Rotation of the overlay at pointer-down, degrees.
        orig_rotation: f64,
        /// Scale reported by the handle so far (1.0 = unchanged).
        scale: f64,
        /// Absolute rotation reported by the handle so far, degrees.
        rotation: f64,
    },
}

impl InputState {
    #[must_use]
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    /// Normalized marquee rectangle while a sweep is active.
    #[must_use]
    pub fn marquee(&self) -> Option<Rect> {
        match self {
            Self::Marqueeing { start, current, .. } => Some(Rect::from_corners(*start, *current)),
            _ => None,
        }
    }
}

/// Which part of the transform frame is being dragged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransformHandle {
    /// A corner: uniform resize about the center.
    Resize(Corner),
    /// The rotate knob above the top edge.
    Rotate,
}
