//! ECS resources made available to systems.
//!
//! This module groups the long-lived data injected into the ECS world and
//! accessed by systems during execution: atlas definitions, the loader
//! bridge, timing, and the demo player configuration. Each submodule
//! documents the semantics and intended usage of its resource(s).
//!
//! Overview
//! - `atlas` – sheet frame layouts and the JSON/grid normalizer
//! - `atlasstore` – loaded atlases keyed by string IDs
//! - `loader` – bridge and channels for the background atlas loader thread
//! - `playerconfig` – INI-backed defaults for the demo player binary
//! - `worldtime` – simulation time and delta

pub mod atlas;
pub mod atlasstore;
pub mod loader;
pub mod playerconfig;
pub mod worldtime;
