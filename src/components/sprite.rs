//! Sprite output component.
//!
//! [`Sprite`] carries what the host renderer needs to display the current
//! frame: the [`UvTransform`] selecting a sub-rectangle of the sheet texture,
//! and the display aspect ratio derived from the frame's source size. Both
//! are written by the playback system every applied tick; the renderer only
//! reads them.

use bevy_ecs::prelude::Component;

/// Offset/repeat pair that selects a sub-rectangle of a texture for sampling.
///
/// Repeat values are always positive; a horizontal flip is expressed by
/// negating `offset_x`, so hosts can detect mirroring from the sign alone.
/// Texture space has a bottom-left origin, image space a top-left one, so
/// `offset_y` is flipped relative to the frame's pixel y position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UvTransform {
    pub offset_x: f32,
    pub offset_y: f32,
    pub repeat_x: f32,
    pub repeat_y: f32,
}

impl Default for UvTransform {
    fn default() -> Self {
        UvTransform {
            offset_x: 0.0,
            offset_y: 0.0,
            repeat_x: 1.0,
            repeat_y: 1.0,
        }
    }
}

/// Renderable sprite surface fed by a [`Playback`](super::playback::Playback).
#[derive(Component, Clone, Debug)]
pub struct Sprite {
    /// Sampling rectangle for the current frame.
    pub uv: UvTransform,
    /// Display scale `[x, y, z]`; y carries `source_h / source_w` of the
    /// active sequence's first frame.
    pub aspect: [f32; 3],
}

impl Default for Sprite {
    fn default() -> Self {
        Sprite {
            uv: UvTransform::default(),
            aspect: [1.0, 1.0, 1.0],
        }
    }
}

impl Sprite {
    pub fn new() -> Self {
        Self::default()
    }
}
