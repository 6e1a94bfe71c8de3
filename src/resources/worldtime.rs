//! Simulation time resource.

use bevy_ecs::prelude::Resource;

/// Wall-clock simulation time shared by all systems.
#[derive(Resource, Clone, Copy)]
pub struct WorldTime {
    /// Scaled seconds since startup.
    pub elapsed: f32,
    /// Scaled seconds covered by the current tick.
    pub delta: f32,
    /// Multiplier applied to incoming deltas.
    pub time_scale: f32,
    /// Number of ticks applied so far.
    pub frame_count: u64,
}

impl Default for WorldTime {
    fn default() -> Self {
        WorldTime {
            elapsed: 0.0,
            delta: 0.0,
            time_scale: 1.0,
            frame_count: 0,
        }
    }
}

impl WorldTime {
    pub fn with_time_scale(mut self, time_scale: f32) -> Self {
        self.time_scale = time_scale;
        self
    }
}
