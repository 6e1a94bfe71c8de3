//! ECS components for playback entities.
//!
//! This module groups the component types attached to entities driven by the
//! playback engine. Components are plain data; the systems in
//! [`crate::systems`] interpret them.
//!
//! Submodules overview:
//! - [`playback`] – per-entity sprite-sheet playback state machine
//! - [`sprite`] – UV transform and aspect output consumed by the renderer
//! - [`instances`] – fan-out buffer for many independently-offset sprites

pub mod instances;
pub mod playback;
pub mod sprite;
