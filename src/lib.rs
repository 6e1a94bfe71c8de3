//! Spriteplay library.
//!
//! A sprite-sheet playback engine: atlases describe rectangular frames inside
//! a sheet, playback components drive frame advance against a wall-clock fps
//! gate, and systems emit lifecycle events plus a per-frame UV transform for
//! whatever renderer hosts the world. This module exposes the ECS components,
//! resources, systems, and events for use in integration tests and as a
//! reusable library.

pub mod components;
pub mod events;
pub mod resources;
pub mod systems;
