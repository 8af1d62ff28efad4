use super::*;

#[test]
fn first_request_needs_load() {
    let mut cache = AssetCache::new();
    assert!(cache.request("a.png"));
    assert!(!cache.request("a.png"));
    assert_eq!(cache.state("a.png"), Some(AssetState::Pending));
}

#[test]
fn resolve_records_dimensions() {
    let mut cache = AssetCache::new();
    cache.request("a.png");
    assert!(cache.resolve("a.png", 640.0, 480.0));
    assert_eq!(cache.dimensions("a.png"), Some((640.0, 480.0)));
    assert!(cache.is_ready("a.png"));
    assert_eq!(cache.state("a.png"), Some(AssetState::Ready { width: 640.0, height: 480.0 }));
}

#[test]
fn resolve_same_dimensions_twice_is_unchanged() {
    let mut cache = AssetCache::new();
    assert!(cache.resolve("a.png", 10.0, 10.0));
    assert!(!cache.resolve("a.png", 10.0, 10.0));
}

#[test]
fn failed_asset_is_not_ready_and_not_rerequested() {
    let mut cache = AssetCache::new();
    cache.request("bad.png");
    assert!(cache.fail("bad.png"));
    assert!(!cache.fail("bad.png"));
    assert!(!cache.is_ready("bad.png"));
    assert!(!cache.request("bad.png"));
    assert_eq!(cache.state("bad.png"), Some(AssetState::Failed));
}

#[test]
fn assets_are_independent() {
    let mut cache = AssetCache::new();
    cache.request("slow.png");
    cache.request("fast.png");
    cache.resolve("fast.png", 1.0, 1.0);
    assert!(cache.is_ready("fast.png"));
    assert!(!cache.is_ready("slow.png"));
    assert_eq!(cache.state("slow.png"), Some(AssetState::Pending));
}

#[test]
fn unknown_url_has_no_state() {
    let cache = AssetCache::new();
    assert!(cache.state("nope").is_none());
    assert!(cache.dimensions("nope").is_none());
}
