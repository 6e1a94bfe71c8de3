//! ECS systems executed each tick.
//!
//! Overview
//! - `playback` – fps-gated frame advance, UV updates, lifecycle events
//! - `instancing` – one-shot seeding of instanced sprite fan-outs
//! - `loader` – loader thread body and result draining
//! - `time` – simulation clock updates

pub mod instancing;
pub mod loader;
pub mod playback;
pub mod time;
