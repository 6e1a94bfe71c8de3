//! Playback lifecycle events.
//!
//! The [`sprite_playback`](crate::systems::playback::sprite_playback) system
//! triggers a [`PlaybackEvent`] on every lifecycle transition. Observers can
//! subscribe to react without polling component state.
//!
//! # Delivery ordering
//!
//! Within one applied tick the engine guarantees:
//!
//! 1. [`PlaybackEventKind::LoopEnd`] at the wraparound (looping only),
//!    carrying the post-wrap frame
//! 2. [`PlaybackEventKind::Started`] when the index sits on the run's start
//!    position, including the very first applied tick; fired once per visit
//! 3. [`PlaybackEventKind::Frame`] for the frame actually displayed
//!
//! [`PlaybackEventKind::Ended`] replaces the `Frame` event on the tick where
//! a non-looping run freezes, and fires exactly once per completion.
//!
//! # Example
//!
//! ```ignore
//! world.spawn(Observer::new(|trigger: On<PlaybackEvent>| {
//!     if trigger.event().kind == PlaybackEventKind::LoopEnd {
//!         // one wrap completed
//!     }
//! }));
//! ```
//!
//! # Related
//!
//! - [`crate::components::playback::Playback`] – the state being reported
//! - [`crate::systems::playback::sprite_playback`] – the system that emits these

use bevy_ecs::prelude::*;

/// Which lifecycle transition a [`PlaybackEvent`] reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackEventKind {
    /// Index reached the run's start position.
    Started,
    /// A frame was applied this tick.
    Frame,
    /// A looping run wrapped around.
    LoopEnd,
    /// A non-looping run (or a scrub) reached its boundary.
    Ended,
}

/// Event triggered on playback lifecycle transitions.
#[derive(Event, Debug, Clone, PartialEq)]
pub struct PlaybackEvent {
    /// The entity whose playback transitioned.
    pub entity: Entity,
    pub kind: PlaybackEventKind,
    /// Frame index at the moment of the transition.
    pub frame: usize,
    /// Active sequence name, if the atlas is named.
    pub frame_name: Option<String>,
}
