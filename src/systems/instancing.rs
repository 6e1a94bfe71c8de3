//! Instanced sprite seeding.

use bevy_ecs::prelude::*;
use log::warn;

use crate::components::instances::{SpriteInstance, SpriteInstances};
use crate::components::playback::Playback;
use crate::resources::atlasstore::AtlasStore;
use crate::systems::playback::compute_uv;

/// Seed every unseeded [`SpriteInstances`] whose atlas has become available.
///
/// Each accepted item draws an independent pseudo-random starting frame and
/// gets its own copy of the UV transform, so instance animation phases
/// diverge without ever sharing state. Seeding is one-shot; re-running the
/// system on a seeded component is a no-op.
pub fn seed_sprite_instances(
    mut query: Query<(&Playback, &mut SpriteInstances)>,
    store: Res<AtlasStore>,
    mut rng: Local<fastrand::Rng>,
) {
    for (pb, mut instances) in query.iter_mut() {
        if instances.seeded {
            continue;
        }
        let Some(atlas) = store.get(&pb.atlas_key) else {
            continue;
        };
        let Some(frames) = atlas.sequence(pb.animation.as_deref()) else {
            continue;
        };
        if frames.is_empty() {
            continue;
        }

        let count = instances.count();
        if count < instances.items.len() {
            warn!(
                "Instance limit {} drops {} of {} requested sprites",
                instances.limit.unwrap_or(0),
                instances.items.len() - count,
                instances.items.len()
            );
        }

        instances.entries = instances
            .items
            .iter()
            .take(count)
            .map(|&position| {
                let frame = rng.usize(0..frames.len());
                SpriteInstance {
                    position,
                    frame,
                    uv: compute_uv(atlas.sheet_w, atlas.sheet_h, &frames[frame], pb.flip_x),
                }
            })
            .collect();
        instances.seeded = true;
    }
}
