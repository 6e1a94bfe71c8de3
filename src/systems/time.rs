//! Simulation time bookkeeping.

use bevy_ecs::prelude::*;

use crate::resources::worldtime::WorldTime;

/// Fold one host tick into [`WorldTime`].
///
/// The raw delta is scaled by `time_scale` before it reaches any consumer,
/// so slow-motion and fast-forward apply uniformly to all playback clocks.
pub fn update_world_time(world: &mut World, delta: f32) {
    let mut time = world.resource_mut::<WorldTime>();
    time.delta = delta * time.time_scale;
    time.elapsed += time.delta;
    time.frame_count += 1;
}
