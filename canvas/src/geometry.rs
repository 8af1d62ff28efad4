//! Pure 2D helpers shared by the stage: points, rectangles, cover fitting,
//! boundary clamping, and rotation-aware offsets.
//!
//! Everything here works in stage space (CSS pixels, origin top-left, y down).
//! Rotations are in degrees, clockwise on screen, matching `Overlay::rotation`.

#[cfg(test)]
#[path = "geometry_test.rs"]
mod geometry_test;

use serde::{Deserialize, Serialize};

/// A point in stage space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Vector from `other` to `self`.
    #[must_use]
    pub fn delta_from(self, other: Point) -> Point {
        Point::new(self.x - other.x, self.y - other.y)
    }

    /// Translate by a delta vector.
    #[must_use]
    pub fn offset(self, delta: Point) -> Point {
        Point::new(self.x + delta.x, self.y + delta.y)
    }

    #[must_use]
    pub fn distance_to(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Width and height of the stage.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Whether both dimensions are positive.
    #[must_use]
    pub fn is_drawable(self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }
}

/// Axis-aligned rectangle with top-left origin.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    #[must_use]
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Normalized rectangle spanning two arbitrary corners (e.g. a marquee
    /// dragged up and to the left).
    #[must_use]
    pub fn from_corners(a: Point, b: Point) -> Self {
        Self {
            x: a.x.min(b.x),
            y: a.y.min(b.y),
            width: (b.x - a.x).abs(),
            height: (b.y - a.y).abs(),
        }
    }

    /// Square with the given top-left corner and edge length.
    #[must_use]
    pub fn square(x: f64, y: f64, size: f64) -> Self {
        Self { x, y, width: size, height: size }
    }

    #[must_use]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Whether width or height is zero (or negative).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Strict interval-overlap test on both axes.
    ///
    /// Edge-adjacent rectangles do not intersect.
    #[must_use]
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.right() && self.right() > other.x && self.y < other.bottom() && self.bottom() > other.y
    }
}

/// Largest rectangle with the asset's aspect ratio that fully covers the
/// container, centered. Overflow on one axis is cropped by the container.
///
/// Returns a zero rectangle when any dimension is zero, negative, or not finite.
#[must_use]
pub fn cover_fit(container_w: f64, container_h: f64, asset_w: f64, asset_h: f64) -> Rect {
    let dims = [container_w, container_h, asset_w, asset_h];
    if dims.iter().any(|d| !d.is_finite() || *d <= 0.0) {
        return Rect::default();
    }

    let container_ratio = container_w / container_h;
    let asset_ratio = asset_w / asset_h;

    let (width, height) = if asset_ratio > container_ratio {
        (asset_w * (container_h / asset_h), container_h)
    } else {
        (container_w, asset_h * (container_w / asset_w))
    };

    Rect {
        x: (container_w - width) / 2.0,
        y: (container_h - height) / 2.0,
        width,
        height,
    }
}

/// Clamp the top-left of a square of edge `size` so the square stays inside
/// `[0, bounds_w] × [0, bounds_h]`.
///
/// A square larger than the bounds is pinned to `0` on that axis and simply
/// overflows.
#[must_use]
pub fn clamp_to_bounds(x: f64, y: f64, size: f64, bounds_w: f64, bounds_h: f64) -> Point {
    Point {
        x: x.min(bounds_w - size).max(0.0),
        y: y.min(bounds_h - size).max(0.0),
    }
}

/// Rotate a local offset `(dx, dy)` clockwise by `degrees`.
#[must_use]
pub fn rotate_offset(dx: f64, dy: f64, degrees: f64) -> Point {
    let (sin, cos) = degrees.to_radians().sin_cos();
    Point::new(dx * cos - dy * sin, dx * sin + dy * cos)
}

/// Whether `pt` lies inside a square of edge `size` centered on `center`
/// and rotated by `degrees`.
#[must_use]
pub fn point_in_rotated_square(pt: Point, center: Point, size: f64, degrees: f64) -> bool {
    let local = rotate_offset(pt.x - center.x, pt.y - center.y, -degrees);
    let half = size / 2.0;
    local.x.abs() <= half && local.y.abs() <= half
}

/// Clockwise angle in degrees of the vector from `center` to `pt`, measured
/// from "straight up".
#[must_use]
pub fn angle_from_up_deg(center: Point, pt: Point) -> f64 {
    (pt.y - center.y).atan2(pt.x - center.x).to_degrees() + 90.0
}
