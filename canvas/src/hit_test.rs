use super::*;

const EPSILON: f64 = 1e-9;

fn point_approx_eq(a: Point, b: Point) -> bool {
    (a.x - b.x).abs() < EPSILON && (a.y - b.y).abs() < EPSILON
}

fn overlay_at(x: f64, y: f64, size: f64) -> Overlay {
    Overlay::new("gem", x, y, size)
}

fn selected(ids: &[ObjectId]) -> Selection {
    let mut s = Selection::new();
    for id in ids {
        s.select_toggle(*id);
    }
    s
}

// =============================================================
// Control geometry
// =============================================================

#[test]
fn corner_points_unrotated() {
    let o = overlay_at(100.0, 100.0, 40.0);
    assert!(point_approx_eq(corner_point(&o, Corner::Ne), Point::new(140.0, 100.0)));
    assert!(point_approx_eq(corner_point(&o, Corner::Se), Point::new(140.0, 140.0)));
    assert!(point_approx_eq(corner_point(&o, Corner::Sw), Point::new(100.0, 140.0)));
    assert!(point_approx_eq(corner_point(&o, Corner::Nw), Point::new(100.0, 100.0)));
}

#[test]
fn corner_point_follows_rotation() {
    let mut o = overlay_at(100.0, 100.0, 40.0);
    o.rotation = 90.0;
    // A quarter turn clockwise carries the NE corner to where SE was.
    assert!(point_approx_eq(corner_point(&o, Corner::Ne), Point::new(140.0, 140.0)));
}

#[test]
fn delete_button_sits_outside_top_right() {
    let o = overlay_at(100.0, 100.0, 40.0);
    assert!(point_approx_eq(delete_button_center(&o), Point::new(148.0, 92.0)));
}

#[test]
fn delete_button_follows_rotation() {
    let mut o = overlay_at(100.0, 100.0, 40.0);
    o.rotation = 180.0;
    // Upside down, the local top-right corner is at the stage bottom-left.
    assert!(point_approx_eq(delete_button_center(&o), Point::new(108.0, 132.0)));
}

#[test]
fn rotate_handle_above_top_edge() {
    let o = overlay_at(100.0, 100.0, 40.0);
    assert!(point_approx_eq(rotate_handle_point(&o), Point::new(120.0, 80.0)));
}

// =============================================================
// hit_test
// =============================================================

#[test]
fn miss_returns_none() {
    let o = overlay_at(100.0, 100.0, 40.0);
    let comp = Composition::from_overlays(vec![o]);
    assert!(hit_test(Point::new(10.0, 10.0), &comp, &Selection::new()).is_none());
}

#[test]
fn topmost_body_wins() {
    let below = overlay_at(100.0, 100.0, 40.0);
    let above = overlay_at(120.0, 120.0, 40.0);
    let comp = Composition::from_overlays(vec![below.clone(), above.clone()]);
    let hit = hit_test(Point::new(130.0, 130.0), &comp, &Selection::new()).unwrap();
    assert_eq!(hit, Hit { object_id: above.id, part: HitPart::Body });
    let hit = hit_test(Point::new(105.0, 105.0), &comp, &Selection::new()).unwrap();
    assert_eq!(hit.object_id, below.id);
}

#[test]
fn rotated_body_excludes_bounding_box_corner() {
    let mut o = overlay_at(100.0, 100.0, 40.0);
    o.rotation = 45.0;
    let comp = Composition::from_overlays(vec![o]);
    assert!(hit_test(Point::new(102.0, 102.0), &comp, &Selection::new()).is_none());
}

#[test]
fn single_selection_exposes_delete_button() {
    let o = overlay_at(100.0, 100.0, 40.0);
    let comp = Composition::from_overlays(vec![o.clone()]);
    let hit = hit_test(Point::new(148.0, 88.0), &comp, &selected(&[o.id])).unwrap();
    assert_eq!(hit.part, HitPart::DeleteButton);
}

#[test]
fn resize_handle_beats_delete_button() {
    let o = overlay_at(100.0, 100.0, 40.0);
    let comp = Composition::from_overlays(vec![o.clone()]);
    let hit = hit_test(Point::new(140.0, 100.0), &comp, &selected(&[o.id])).unwrap();
    assert_eq!(hit.part, HitPart::ResizeHandle(Corner::Ne));
}

#[test]
fn rotate_handle_hit() {
    let o = overlay_at(100.0, 100.0, 40.0);
    let comp = Composition::from_overlays(vec![o.clone()]);
    let hit = hit_test(Point::new(121.0, 81.0), &comp, &selected(&[o.id])).unwrap();
    assert_eq!(hit.part, HitPart::RotateHandle);
}

#[test]
fn multi_selection_has_no_controls() {
    let a = overlay_at(100.0, 100.0, 40.0);
    let b = overlay_at(300.0, 300.0, 40.0);
    let comp = Composition::from_overlays(vec![a.clone(), b.clone()]);
    assert!(hit_test(Point::new(148.0, 88.0), &comp, &selected(&[a.id, b.id])).is_none());
    assert!(hit_test(Point::new(120.0, 80.0), &comp, &selected(&[a.id, b.id])).is_none());
}
