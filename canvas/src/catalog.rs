//! Item catalog as seen by the editor: read-only items and the mapping from
//! an item to a fetchable image URL.
//!
//! The catalog is owned by the backend and can change between sessions, so
//! every lookup here is fallible and callers skip what they cannot resolve.

#[cfg(test)]
#[path = "catalog_test.rs"]
mod catalog_test;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::CanvasError;

/// A decorative item offered in the palette.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogItem {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub image_path: Option<String>,
    #[serde(default)]
    pub image_mime: Option<String>,
    /// Edge length of a freshly dropped overlay, in stage units.
    pub default_size: f64,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Maps a catalog item to an image URL. The editor treats the result as opaque.
pub trait ImageResolver {
    fn image_url(&self, item: &CatalogItem) -> String;
}

/// Resolves images against the REST backend.
///
/// Items with a stored `imagePath` are served from `/uploads/`; everything
/// else goes through `/items/{id}/image`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiImageResolver {
    base_url: String,
}

impl ApiImageResolver {
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        Self { base_url: base_url.trim_end_matches('/').to_string() }
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Image URL for a bare item id, when only the id is known.
    #[must_use]
    pub fn image_url_for_id(&self, item_id: &str) -> String {
        format!("{}/items/{item_id}/image", self.base_url)
    }

    /// URL of a rendered composition previously saved to the backend.
    #[must_use]
    pub fn saved_image_url(&self, image_path: &str) -> String {
        format!("{}/uploads/{image_path}", self.base_url)
    }
}

impl ImageResolver for ApiImageResolver {
    fn image_url(&self, item: &CatalogItem) -> String {
        match item.image_path.as_deref() {
            Some(path) if !path.is_empty() => format!("{}/uploads/{path}", self.base_url),
            _ => self.image_url_for_id(&item.id),
        }
    }
}

/// Catalog items indexed by id, preserving the backend's listing order.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    items: Vec<CatalogItem>,
    by_id: HashMap<String, usize>,
}

impl Catalog {
    #[must_use]
    pub fn new(items: Vec<CatalogItem>) -> Self {
        let by_id = items
            .iter()
            .enumerate()
            .map(|(idx, item)| (item.id.clone(), idx))
            .collect();
        Self { items, by_id }
    }

    /// Parse a `GET /items` response body.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::Json`] if the body is not an item array.
    pub fn from_json(json: &str) -> Result<Self, CanvasError> {
        let items: Vec<CatalogItem> = serde_json::from_str(json)?;
        Ok(Self::new(items))
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&CatalogItem> {
        self.by_id.get(id).and_then(|idx| self.items.get(*idx))
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    /// Items in listing order.
    #[must_use]
    pub fn items(&self) -> &[CatalogItem] {
        &self.items
    }

    /// Items whose category matches, in listing order.
    pub fn in_category<'a>(&'a self, category: &'a str) -> impl Iterator<Item = &'a CatalogItem> + 'a {
        self.items
            .iter()
            .filter(move |item| item.category.as_deref() == Some(category))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
