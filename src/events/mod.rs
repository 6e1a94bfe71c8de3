//! Event types exchanged by the playback engine.
//!
//! Events provide a decoupled way for the engine to notify hosts about
//! playback lifecycle transitions and asynchronous atlas loads without
//! polling component state every tick.
//!
//! Submodules:
//! - [`playback`] – lifecycle notifications (start, frame, loop end, end)
//!   delivered through observers
//! - [`atlas`] – loader thread commands and load result messages
//!
//! See each submodule for concrete event data and delivery ordering.

pub mod atlas;
pub mod playback;
