//! Replays a saved composition through the editor core.
//!
//! Loading goes through [`EngineCore::load_composition`], the same path the
//! browser editor uses when resuming, so the result is exactly what the
//! editor would show and save again.

use canvas::catalog::{ApiImageResolver, Catalog};
use canvas::doc::{PlacedItemData, SavedImage};
use canvas::engine::EngineCore;
use canvas::geometry::Size;
use serde::Serialize;

use crate::config::StudioConfig;

/// An entry the editor refused to load.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DroppedItem {
    pub id: String,
    pub item_id: String,
    pub reason: DropReason,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DropReason {
    UnknownItem,
    InvalidGeometry,
}

/// Outcome of loading stored entries into a fresh editing session.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Replay {
    pub stage: Size,
    /// Entries as the editor holds them after loading, in paint order.
    pub placed_items: Vec<PlacedItemData>,
    pub dropped: Vec<DroppedItem>,
    /// Ids of loaded entries the editor normalized: size raised, position
    /// clamped, or a duplicate or malformed id replaced. Listed under the
    /// id they were loaded with.
    pub adjusted: Vec<String>,
}

/// Summary printed by `saved inspect`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InspectReport {
    pub id: String,
    pub name: String,
    pub image_url: String,
    pub stored: usize,
    #[serde(flatten)]
    pub replay: Replay,
}

/// Load `items` into an editing session sized from `config`.
#[must_use]
pub fn replay(items: &[PlacedItemData], catalog: Catalog, resolver: ApiImageResolver, config: &StudioConfig) -> Replay {
    let mut core = EngineCore::with_config(Box::new(resolver), config.engine_config());
    core.set_stage_size(config.stage.width, config.stage.height);

    let mut kept = Vec::with_capacity(items.len());
    let mut dropped = Vec::new();
    for data in items {
        match drop_reason(data, &catalog) {
            Some(reason) => dropped.push(DroppedItem {
                id: data.id.clone(),
                item_id: data.item_id.clone(),
                reason,
            }),
            None => kept.push(data),
        }
    }

    core.set_catalog(catalog);
    core.load_composition(items);
    let placed_items = core.placed_items();

    // Loading keeps the surviving entries in stored order.
    let adjusted = kept
        .iter()
        .zip(&placed_items)
        .filter(|(stored, loaded)| stored.id != loaded.id || geometry_changed(stored, loaded))
        .map(|(_, loaded)| loaded.id.clone())
        .collect();

    Replay { stage: core.stage_size(), placed_items, dropped, adjusted }
}

/// Replay a saved image's composition and describe the result.
#[must_use]
pub fn inspect(saved: &SavedImage, catalog: Catalog, resolver: ApiImageResolver, config: &StudioConfig) -> InspectReport {
    let items = saved.placed_items.as_deref().unwrap_or_default();
    let image_url = resolver.saved_image_url(&saved.image_path);
    InspectReport {
        id: saved.id.clone(),
        name: saved.name.clone(),
        image_url,
        stored: items.len(),
        replay: replay(items, catalog, resolver, config),
    }
}

fn geometry_changed(stored: &PlacedItemData, loaded: &PlacedItemData) -> bool {
    let differs = |a: f64, b: f64| (a - b).abs() > f64::EPSILON;
    differs(stored.x, loaded.x) || differs(stored.y, loaded.y) || differs(stored.size, loaded.size)
}

fn drop_reason(data: &PlacedItemData, catalog: &Catalog) -> Option<DropReason> {
    if !data.is_well_formed() {
        Some(DropReason::InvalidGeometry)
    } else if !catalog.contains(&data.item_id) {
        Some(DropReason::UnknownItem)
    } else {
        None
    }
}

#[cfg(test)]
#[path = "replay_test.rs"]
mod tests;
