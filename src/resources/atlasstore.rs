//! Atlas storage.
//!
//! Provides a registry for loaded atlases so multiple playback entities can
//! share one sheet description. Systems look atlases up by string key.

use bevy_ecs::prelude::Resource;
use rustc_hash::FxHashMap;

use super::atlas::Atlas;

/// Registry of loaded atlases by key.
#[derive(Resource, Debug, Default)]
pub struct AtlasStore {
    pub map: FxHashMap<String, Atlas>,
}

impl AtlasStore {
    /// Create an empty store.
    pub fn new() -> Self {
        AtlasStore {
            map: FxHashMap::default(),
        }
    }

    /// Get an atlas by its key.
    pub fn get(&self, key: impl AsRef<str>) -> Option<&Atlas> {
        self.map.get(key.as_ref())
    }

    /// Insert an atlas with a specific key, replacing any previous one.
    pub fn insert(&mut self, key: impl Into<String>, atlas: Atlas) {
        self.map.insert(key.into(), atlas);
    }

    /// Remove an atlas by key.
    pub fn remove(&mut self, key: impl AsRef<str>) -> Option<Atlas> {
        self.map.remove(key.as_ref())
    }

    /// Clear all loaded atlases.
    pub fn clear(&mut self) {
        self.map.clear();
    }
}
