#![allow(clippy::float_cmp)]

use super::*;

const EPSILON: f64 = 1e-9;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

// =============================================================
// Point / Rect
// =============================================================

#[test]
fn point_delta_and_offset_are_inverse() {
    let a = Point::new(10.0, 4.0);
    let b = Point::new(3.0, 9.0);
    let d = a.delta_from(b);
    assert_eq!(d, Point::new(7.0, -5.0));
    assert_eq!(b.offset(d), a);
}

#[test]
fn rect_from_corners_normalizes() {
    let r = Rect::from_corners(Point::new(50.0, 40.0), Point::new(10.0, 90.0));
    assert_eq!(r, Rect::new(10.0, 40.0, 40.0, 50.0));
}

#[test]
fn rect_center_and_edges() {
    let r = Rect::new(10.0, 20.0, 30.0, 40.0);
    assert_eq!(r.right(), 40.0);
    assert_eq!(r.bottom(), 60.0);
    assert_eq!(r.center(), Point::new(25.0, 40.0));
}

#[test]
fn rect_empty_when_any_dimension_zero() {
    assert!(Rect::new(0.0, 0.0, 0.0, 10.0).is_empty());
    assert!(Rect::new(0.0, 0.0, 10.0, 0.0).is_empty());
    assert!(!Rect::new(0.0, 0.0, 1.0, 1.0).is_empty());
}

#[test]
fn rect_intersects_overlapping() {
    let a = Rect::new(0.0, 0.0, 10.0, 10.0);
    let b = Rect::new(5.0, 5.0, 10.0, 10.0);
    assert!(a.intersects(&b));
    assert!(b.intersects(&a));
}

#[test]
fn rect_edge_adjacent_does_not_intersect() {
    let a = Rect::new(0.0, 0.0, 10.0, 10.0);
    let right = Rect::new(10.0, 0.0, 10.0, 10.0);
    let below = Rect::new(0.0, 10.0, 10.0, 10.0);
    assert!(!a.intersects(&right));
    assert!(!a.intersects(&below));
}

#[test]
fn rect_contained_intersects() {
    let outer = Rect::new(0.0, 0.0, 100.0, 100.0);
    let inner = Rect::new(40.0, 40.0, 5.0, 5.0);
    assert!(outer.intersects(&inner));
}

// =============================================================
// cover_fit
// =============================================================

#[test]
fn cover_fit_wide_asset_fills_height() {
    let r = cover_fit(400.0, 300.0, 1600.0, 900.0);
    assert!(approx_eq(r.height, 300.0));
    assert!(approx_eq(r.width, 1600.0 * 300.0 / 900.0));
    assert!(r.x < 0.0);
    assert!(approx_eq(r.y, 0.0));
}

#[test]
fn cover_fit_tall_asset_fills_width() {
    let r = cover_fit(400.0, 300.0, 300.0, 900.0);
    assert!(approx_eq(r.width, 400.0));
    assert!(approx_eq(r.height, 1200.0));
    assert!(approx_eq(r.x, 0.0));
    assert!(approx_eq(r.y, -450.0));
}

#[test]
fn cover_fit_preserves_aspect_ratio() {
    let cases = [
        (500.0, 500.0, 640.0, 480.0),
        (320.0, 800.0, 1920.0, 1080.0),
        (1024.0, 768.0, 33.0, 71.0),
        (1.0, 1000.0, 7.0, 3.0),
    ];
    for (cw, ch, aw, ah) in cases {
        let r = cover_fit(cw, ch, aw, ah);
        assert!(((r.width / r.height) - (aw / ah)).abs() < 1e-9, "aspect for {cw}x{ch} / {aw}x{ah}");
    }
}

#[test]
fn cover_fit_covers_container_and_is_centered() {
    let (cw, ch) = (640.0, 360.0);
    let r = cover_fit(cw, ch, 500.0, 700.0);
    assert!(r.x <= EPSILON && r.y <= EPSILON);
    assert!(r.right() >= cw - EPSILON && r.bottom() >= ch - EPSILON);
    assert!(approx_eq(r.center().x, cw / 2.0));
    assert!(approx_eq(r.center().y, ch / 2.0));
}

#[test]
fn cover_fit_zero_or_negative_input_gives_zero_rect() {
    assert_eq!(cover_fit(0.0, 100.0, 10.0, 10.0), Rect::default());
    assert_eq!(cover_fit(100.0, 0.0, 10.0, 10.0), Rect::default());
    assert_eq!(cover_fit(100.0, 100.0, 0.0, 10.0), Rect::default());
    assert_eq!(cover_fit(100.0, 100.0, 10.0, -1.0), Rect::default());
    assert_eq!(cover_fit(100.0, 100.0, f64::NAN, 10.0), Rect::default());
}

// =============================================================
// clamp_to_bounds
// =============================================================

#[test]
fn clamp_inside_is_identity() {
    assert_eq!(clamp_to_bounds(100.0, 120.0, 30.0, 500.0, 500.0), Point::new(100.0, 120.0));
}

#[test]
fn clamp_pulls_back_past_far_edge() {
    assert_eq!(clamp_to_bounds(490.0, 480.0, 30.0, 500.0, 500.0), Point::new(470.0, 470.0));
}

#[test]
fn clamp_negative_pins_to_zero() {
    assert_eq!(clamp_to_bounds(-15.0, -1.0, 30.0, 500.0, 500.0), Point::new(0.0, 0.0));
}

#[test]
fn clamp_oversized_object_pins_to_zero() {
    assert_eq!(clamp_to_bounds(40.0, 40.0, 600.0, 500.0, 300.0), Point::new(0.0, 0.0));
}

#[test]
fn clamp_is_idempotent_and_in_range() {
    let xs = [-100.0, -0.5, 0.0, 12.5, 250.0, 499.0, 1e6];
    let sizes = [1.0, 20.0, 60.0, 480.0, 900.0];
    let bounds = [(500.0, 500.0), (300.0, 800.0), (10.0, 10.0)];
    for &x in &xs {
        for &y in &xs {
            for &size in &sizes {
                for &(w, h) in &bounds {
                    let once = clamp_to_bounds(x, y, size, w, h);
                    let twice = clamp_to_bounds(once.x, once.y, size, w, h);
                    assert_eq!(once, twice);
                    assert!(once.x >= 0.0 && once.x <= (w - size).max(0.0));
                    assert!(once.y >= 0.0 && once.y <= (h - size).max(0.0));
                }
            }
        }
    }
}

// =============================================================
// Rotation helpers
// =============================================================

#[test]
fn rotate_offset_zero_is_identity() {
    let p = rotate_offset(5.0, -3.0, 0.0);
    assert!(approx_eq(p.x, 5.0) && approx_eq(p.y, -3.0));
}

#[test]
fn rotate_offset_quarter_turn_is_clockwise_on_screen() {
    // Pointing right, rotated 90° clockwise (y down) points down.
    let p = rotate_offset(10.0, 0.0, 90.0);
    assert!(approx_eq(p.x, 0.0));
    assert!(approx_eq(p.y, 10.0));
}

#[test]
fn point_in_rotated_square_respects_rotation() {
    let center = Point::new(50.0, 50.0);
    // Corner region of an axis-aligned square is inside.
    assert!(point_in_rotated_square(Point::new(68.0, 68.0), center, 40.0, 0.0));
    // Rotated 45°, the same corner point falls outside the diamond.
    assert!(!point_in_rotated_square(Point::new(68.0, 68.0), center, 40.0, 45.0));
    // But a point along the axis further out is inside the diamond.
    assert!(point_in_rotated_square(Point::new(76.0, 50.0), center, 40.0, 45.0));
}

#[test]
fn angle_from_up_measures_clockwise() {
    let c = Point::new(0.0, 0.0);
    assert!(approx_eq(angle_from_up_deg(c, Point::new(0.0, -10.0)), 0.0));
    assert!(approx_eq(angle_from_up_deg(c, Point::new(10.0, 0.0)), 90.0));
    assert!(approx_eq(angle_from_up_deg(c, Point::new(0.0, 10.0)), 180.0));
}
