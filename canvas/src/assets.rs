//! Per-URL image resolution state.
//!
//! The engine never loads images itself. It asks the host to load a URL
//! once (`request`), and the host reports back with `resolve` or `fail`.
//! Each URL is tracked on its own, so one slow or broken image never holds
//! up the rest of the stage.

#[cfg(test)]
#[path = "assets_test.rs"]
mod assets_test;

use std::collections::HashMap;

/// Resolution state of one image URL.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AssetState {
    /// Requested from the host; not yet decoded.
    Pending,
    /// Decoded; natural dimensions in pixels.
    Ready { width: f64, height: f64 },
    /// The host could not load the image. Not retried.
    Failed,
}

#[derive(Debug, Clone, Default)]
pub struct AssetCache {
    entries: HashMap<String, AssetState>,
}

impl AssetCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `url` as wanted. Returns true only the first time a URL is seen,
    /// which is when the host needs to start loading it.
    pub fn request(&mut self, url: &str) -> bool {
        if self.entries.contains_key(url) {
            return false;
        }
        self.entries.insert(url.to_string(), AssetState::Pending);
        true
    }

    /// Record a decoded image. Returns false if nothing changed.
    pub fn resolve(&mut self, url: &str, width: f64, height: f64) -> bool {
        let next = AssetState::Ready { width, height };
        self.entries.insert(url.to_string(), next) != Some(next)
    }

    /// Record a load failure. Returns false if nothing changed.
    pub fn fail(&mut self, url: &str) -> bool {
        self.entries.insert(url.to_string(), AssetState::Failed) != Some(AssetState::Failed)
    }

    #[must_use]
    pub fn state(&self, url: &str) -> Option<AssetState> {
        self.entries.get(url).copied()
    }

    /// Natural size of a resolved image.
    #[must_use]
    pub fn dimensions(&self, url: &str) -> Option<(f64, f64)> {
        match self.entries.get(url) {
            Some(AssetState::Ready { width, height }) => Some((*width, *height)),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_ready(&self, url: &str) -> bool {
        self.dimensions(url).is_some()
    }
}
