#![allow(clippy::float_cmp)]

use std::collections::HashSet;

use serde_json::json;
use uuid::Uuid;

use super::*;

const STAGE: Size = Size { width: 500.0, height: 500.0 };

fn overlay_at(x: f64, y: f64, size: f64) -> Overlay {
    Overlay::new("ring", x, y, size)
}

// =============================================================
// Overlay
// =============================================================

#[test]
fn new_overlay_has_fresh_id_and_zero_rotation() {
    let a = overlay_at(0.0, 0.0, 30.0);
    let b = overlay_at(0.0, 0.0, 30.0);
    assert_ne!(a.id, b.id);
    assert_eq!(a.rotation, 0.0);
}

#[test]
fn new_overlay_enforces_minimum_size() {
    let o = overlay_at(0.0, 0.0, 5.0);
    assert_eq!(o.size, MIN_OVERLAY_SIZE);
}

#[test]
fn moved_to_clamps_inside_stage() {
    let o = overlay_at(10.0, 10.0, 40.0);
    let moved = o.moved_to(Point::new(480.0, -20.0), STAGE);
    assert_eq!(moved.position(), Point::new(460.0, 0.0));
    assert_eq!(moved.id, o.id);
    assert_eq!(moved.size, 40.0);
}

#[test]
fn transformed_scales_about_center() {
    let o = overlay_at(100.0, 100.0, 30.0);
    let t = o.transformed(2.0, 0.0, STAGE);
    assert_eq!(t.size, 60.0);
    assert_eq!(t.center(), o.center());
    assert_eq!(t.position(), Point::new(85.0, 85.0));
}

#[test]
fn transformed_sets_absolute_rotation() {
    let mut o = overlay_at(100.0, 100.0, 30.0);
    o.rotation = 15.0;
    let t = o.transformed(1.0, 72.5, STAGE);
    assert_eq!(t.rotation, 72.5);
}

#[test]
fn transformed_floors_size_at_minimum() {
    let o = overlay_at(100.0, 100.0, 30.0);
    let t = o.transformed(0.1, 0.0, STAGE);
    assert_eq!(t.size, MIN_OVERLAY_SIZE);
}

#[test]
fn transformed_reclamps_near_edge() {
    let o = overlay_at(460.0, 0.0, 40.0);
    let t = o.transformed(2.0, 0.0, STAGE);
    assert_eq!(t.size, 80.0);
    assert_eq!(t.position(), Point::new(420.0, 0.0));
}

#[test]
fn transformed_ignores_non_finite_inputs() {
    let o = overlay_at(100.0, 100.0, 30.0);
    let t = o.transformed(f64::NAN, f64::INFINITY, STAGE);
    assert_eq!(t.size, 30.0);
    assert_eq!(t.rotation, 0.0);
}

// =============================================================
// Composition
// =============================================================

#[test]
fn composition_paint_order_is_insertion_order() {
    let a = overlay_at(0.0, 0.0, 30.0);
    let b = overlay_at(10.0, 10.0, 30.0);
    let mut c = Composition::new();
    c.push(a.clone());
    c.push(b.clone());
    assert_eq!(c.paint_order(), vec![a.id, b.id]);
}

#[test]
fn replace_keeps_paint_position() {
    let a = overlay_at(0.0, 0.0, 30.0);
    let b = overlay_at(10.0, 10.0, 30.0);
    let mut c = Composition::from_overlays(vec![a.clone(), b.clone()]);
    let moved = a.moved_to(Point::new(200.0, 200.0), STAGE);
    assert!(c.replace(moved));
    assert_eq!(c.paint_order(), vec![a.id, b.id]);
    assert_eq!(c.get(&a.id).map(Overlay::position), Some(Point::new(200.0, 200.0)));
}

#[test]
fn replace_missing_returns_false() {
    let mut c = Composition::new();
    assert!(!c.replace(overlay_at(0.0, 0.0, 30.0)));
    assert!(c.is_empty());
}

#[test]
fn remove_all_counts_removed() {
    let a = overlay_at(0.0, 0.0, 30.0);
    let b = overlay_at(10.0, 10.0, 30.0);
    let mut c = Composition::from_overlays(vec![a.clone(), b.clone()]);
    let ids: HashSet<_> = [a.id, Uuid::new_v4()].into_iter().collect();
    assert_eq!(c.remove_all(&ids), 1);
    assert_eq!(c.len(), 1);
    assert!(c.contains(&b.id));
}

#[test]
fn ids_intersecting_uses_strict_overlap() {
    let touching = overlay_at(100.0, 0.0, 20.0);
    let inside = overlay_at(40.0, 40.0, 20.0);
    let outside = overlay_at(300.0, 300.0, 20.0);
    let c = Composition::from_overlays(vec![touching.clone(), inside.clone(), outside]);
    let hits = c.ids_intersecting(&Rect::new(0.0, 0.0, 100.0, 100.0));
    assert_eq!(hits, vec![inside.id]);
}

#[test]
fn compositions_compare_by_value() {
    let a = overlay_at(0.0, 0.0, 30.0);
    let c1 = Composition::from_overlays(vec![a.clone()]);
    let c2 = Composition::from_overlays(vec![a]);
    assert_eq!(c1, c2);
}

// =============================================================
// Wire shapes
// =============================================================

#[test]
fn placed_item_serializes_camel_case() {
    let mut o = overlay_at(12.0, 34.0, 56.0);
    o.rotation = 45.0;
    let value = serde_json::to_value(o.to_data()).unwrap();
    assert_eq!(value["itemId"], json!("ring"));
    assert_eq!(value["x"], json!(12.0));
    assert_eq!(value["size"], json!(56.0));
    assert_eq!(value["rotation"], json!(45.0));
    assert_eq!(value["id"], json!(o.id.to_string()));
}

#[test]
fn placed_item_omits_zero_rotation() {
    let value = serde_json::to_value(overlay_at(0.0, 0.0, 30.0).to_data()).unwrap();
    assert!(value.get("rotation").is_none());
}

#[test]
fn placed_item_roundtrips_into_identical_overlay() {
    let mut o = overlay_at(12.0, 34.0, 56.0);
    o.rotation = -30.0;
    assert_eq!(o.to_data().to_overlay(), o);
}

#[test]
fn placed_item_with_non_uuid_id_gets_fresh_id() {
    let data: PlacedItemData =
        serde_json::from_value(json!({ "id": "1699999-abc", "itemId": "gem", "x": 1, "y": 2, "size": 40 })).unwrap();
    let o = data.to_overlay();
    assert_eq!(o.item_id, "gem");
    assert_eq!(o.rotation, 0.0);
    assert_eq!(o.size, 40.0);
}

#[test]
fn placed_item_well_formed_checks() {
    let good = overlay_at(0.0, 0.0, 30.0).to_data();
    assert!(good.is_well_formed());
    let zero = PlacedItemData { size: 0.0, ..good.clone() };
    assert!(!zero.is_well_formed());
    let nan = PlacedItemData { x: f64::NAN, ..good.clone() };
    assert!(!nan.is_well_formed());
    let bad_rot = PlacedItemData { rotation: Some(f64::INFINITY), ..good };
    assert!(!bad_rot.is_well_formed());
}

#[test]
fn parse_placed_items_accepts_array() {
    let items = parse_placed_items(r#"[{"id":"a","itemId":"gem","x":1,"y":2,"size":30,"rotation":10}]"#).unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].rotation, Some(10.0));
}

#[test]
fn parse_placed_items_rejects_garbage() {
    let err = parse_placed_items("{\"nope\":1}").unwrap_err();
    assert!(err.to_string().contains("invalid JSON payload"));
}

#[test]
fn saved_image_deserializes_without_placed_items() {
    let saved: SavedImage = serde_json::from_value(json!({
        "id": "s1",
        "name": "My smile",
        "imagePath": "abc.png",
        "userId": "u1",
        "createdAt": "2024-01-01T00:00:00Z",
        "updatedAt": "2024-01-01T00:00:00Z",
    }))
    .unwrap();
    assert!(saved.placed_items.is_none());
    assert_eq!(saved.image_path, "abc.png");
}
