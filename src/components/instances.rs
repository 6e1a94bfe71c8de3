//! Instanced sprite fan-out component.
//!
//! [`SpriteInstances`] renders many simultaneous copies of one sprite sheet,
//! each with an independent pseudo-random starting frame and its own copy of
//! the UV transform. The canonical [`Playback`](super::playback::Playback)
//! clock on the same entity keeps ticking; instance offsets diverge from it
//! without touching each other, because every entry owns its `uv` outright.
//!
//! Seeding happens once, when the atlas becomes available, in
//! [`seed_sprite_instances`](crate::systems::instancing::seed_sprite_instances).

use bevy_ecs::prelude::Component;

use super::sprite::UvTransform;

/// One fan-out instance: a world position plus its privately-owned frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpriteInstance {
    pub position: [f32; 3],
    /// Frame index this instance starts on, drawn at seed time.
    pub frame: usize,
    /// This instance's own sampling rectangle; never shared.
    pub uv: UvTransform,
}

/// Fan-out buffer for rendering many sprites from one playback entity.
#[derive(Component, Clone, Debug, Default)]
pub struct SpriteInstances {
    /// Optional cap on how many items get seeded.
    pub limit: Option<usize>,
    /// Requested instance positions.
    pub items: Vec<[f32; 3]>,
    /// Seeded entries, one per accepted item.
    pub entries: Vec<SpriteInstance>,
    pub(crate) seeded: bool,
}

impl SpriteInstances {
    pub fn new(items: Vec<[f32; 3]>) -> Self {
        SpriteInstances {
            limit: None,
            items,
            entries: Vec::new(),
            seeded: false,
        }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Number of instances that will actually be seeded.
    pub fn count(&self) -> usize {
        match self.limit {
            Some(limit) => self.items.len().min(limit),
            None => self.items.len(),
        }
    }

    pub fn is_seeded(&self) -> bool {
        self.seeded
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_unlimited() {
        let inst = SpriteInstances::new(vec![[0.0; 3]; 5]);
        assert_eq!(inst.count(), 5);
    }

    #[test]
    fn test_count_caps_at_limit() {
        let inst = SpriteInstances::new(vec![[0.0; 3]; 5]).with_limit(3);
        assert_eq!(inst.count(), 3);
    }

    #[test]
    fn test_count_limit_larger_than_items() {
        let inst = SpriteInstances::new(vec![[0.0; 3]; 2]).with_limit(8);
        assert_eq!(inst.count(), 2);
    }

    #[test]
    fn test_new_is_unseeded() {
        let inst = SpriteInstances::new(Vec::new());
        assert!(!inst.is_seeded());
        assert!(inst.entries.is_empty());
    }
}
