//! Shared numeric constants for the canvas crate.

// ── Overlays ────────────────────────────────────────────────────

/// Smallest edge length an overlay may have, in stage units.
pub const MIN_OVERLAY_SIZE: f64 = 20.0;

// ── History ─────────────────────────────────────────────────────

/// Default number of undo steps kept before the oldest is dropped.
pub const DEFAULT_HISTORY_DEPTH: usize = 50;

// ── Hit-testing ─────────────────────────────────────────────────

/// Screen-space hit slop in pixels for transform handles.
pub const HANDLE_RADIUS_PX: f64 = 8.0;

/// Distance from the top edge to the rotate handle, in pixels.
pub const ROTATE_HANDLE_OFFSET_PX: f64 = 20.0;

// ── Delete affordance ───────────────────────────────────────────

/// Outward offset of the delete button from the rotated top-right corner.
pub const DELETE_BUTTON_MARGIN_PX: f64 = 8.0;

/// Radius of the circular delete button.
pub const DELETE_BUTTON_RADIUS_PX: f64 = 12.0;

// ── Drop preview ────────────────────────────────────────────────

/// Opacity of the palette drop preview sprite.
pub const DROP_PREVIEW_OPACITY: f64 = 0.5;
