//! Sprite playback state component.
//!
//! [`Playback`] is the per-entity state machine for sprite-sheet animation:
//! current frame index, active sequence name, direction, loop policy, pause
//! state, and the bookkeeping needed to fire lifecycle events exactly once
//! per transition. The [`sprite_playback`](crate::systems::playback::sprite_playback)
//! system advances it against the wall-clock fps gate and writes the
//! resulting UV transform to the entity's [`Sprite`](super::sprite::Sprite).
//!
//! All mutation happens inside the playback system; nothing here is shared
//! across entities, so two live playbacks can never alias each other's
//! scratch state.

use bevy_ecs::prelude::Component;

/// Default playback speed in frames per second.
pub const DEFAULT_FPS: f32 = 30.0;

/// Per-entity sprite-sheet playback state.
///
/// Points at an atlas in the [`AtlasStore`](crate::resources::atlasstore::AtlasStore)
/// by key. The public fields are the configuration surface; the private ones
/// are engine bookkeeping owned by the playback system.
#[derive(Component, Clone, Debug)]
pub struct Playback {
    /// Atlas key in the [`AtlasStore`](crate::resources::atlasstore::AtlasStore).
    pub atlas_key: String,
    /// Requested sequence name for named atlases. `None` plays the whole atlas.
    pub animation: Option<String>,
    /// First frame of a forward run.
    pub start_frame: usize,
    /// Last frame of a run. `None` means the last index of the sequence.
    pub end_frame: Option<usize>,
    /// Frames per second applied by the tick gate.
    pub fps: f32,
    /// Wrap to the run start instead of freezing at the boundary.
    pub looping: bool,
    /// Start advancing as soon as the atlas is available.
    pub auto_play: bool,
    /// Explicit play request, equivalent to `auto_play` for gating.
    pub play: bool,
    /// Suspend ticking without losing state.
    pub paused: bool,
    /// Mirror the sampled frame horizontally (negates the UV x offset).
    pub flip_x: bool,
    /// Step the index by -1 instead of +1 and swap the run boundaries.
    pub backwards: bool,
    /// On non-looping completion, pause at the run start instead of freezing
    /// with `has_ended` set.
    pub reset_on_end: bool,
    /// Manual scrub offset in `[0, 1]`. `Some` overrides autoplay.
    pub offset: Option<f32>,
    /// Current frame index within the active sequence.
    pub frame: usize,
    /// Set when a non-looping run froze at its boundary.
    pub has_ended: bool,
    /// Time accumulated toward the next applied tick, in seconds.
    pub(crate) elapsed: f32,
    /// The previous advance stepped past the run boundary.
    pub(crate) past_end: bool,
    /// Start event already fired for the current visit to the run start.
    pub(crate) started_latch: bool,
    /// End event already fired for the current scrub boundary contact.
    pub(crate) scrub_end_latch: bool,
    /// Sequence name the engine last synced against.
    pub(crate) active_animation: Option<String>,
    /// Direction the engine last synced against.
    pub(crate) active_backwards: bool,
    /// Length of the active sequence, cached at sync time.
    pub(crate) sequence_len: usize,
    /// The atlas has been seen at least once.
    pub(crate) synced: bool,
}

impl Playback {
    /// Create playback state for the atlas stored under `atlas_key`.
    ///
    /// Defaults: frame 0, forward, 30 fps, non-looping, auto-playing.
    pub fn new(atlas_key: impl Into<String>) -> Self {
        Playback {
            atlas_key: atlas_key.into(),
            animation: None,
            start_frame: 0,
            end_frame: None,
            fps: DEFAULT_FPS,
            looping: false,
            auto_play: true,
            play: false,
            paused: false,
            flip_x: false,
            backwards: false,
            reset_on_end: false,
            offset: None,
            frame: 0,
            has_ended: false,
            elapsed: 0.0,
            past_end: false,
            started_latch: false,
            scrub_end_latch: false,
            active_animation: None,
            active_backwards: false,
            sequence_len: 0,
            synced: false,
        }
    }

    /// Select a named sequence to play.
    pub fn with_animation(mut self, name: impl Into<String>) -> Self {
        self.animation = Some(name.into());
        self
    }

    /// Restrict playback to the inclusive index range `[start, end]`.
    pub fn with_frame_range(mut self, start: usize, end: usize) -> Self {
        self.start_frame = start;
        self.end_frame = Some(end);
        self.frame = start;
        self
    }

    pub fn with_fps(mut self, fps: f32) -> Self {
        self.fps = fps;
        self
    }

    pub fn with_looping(mut self, looping: bool) -> Self {
        self.looping = looping;
        self
    }

    pub fn with_flip_x(mut self, flip_x: bool) -> Self {
        self.flip_x = flip_x;
        self
    }

    pub fn with_backwards(mut self, backwards: bool) -> Self {
        self.backwards = backwards;
        self
    }

    pub fn with_reset_on_end(mut self, reset_on_end: bool) -> Self {
        self.reset_on_end = reset_on_end;
        self
    }

    /// Start in manual scrub mode at the given normalized offset.
    pub fn with_offset(mut self, offset: f32) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Disable autoplay; playback waits for [`Playback::resume`].
    pub fn stopped(mut self) -> Self {
        self.auto_play = false;
        self
    }

    /// Whether the tick gate lets this playback advance at all.
    pub fn is_playing(&self) -> bool {
        self.auto_play || self.play
    }

    /// Request playback; also clears a pause.
    pub fn resume(&mut self) {
        self.play = true;
        self.paused = false;
    }

    /// Suspend ticking. State is kept and [`Playback::resume`] continues it.
    pub fn pause(&mut self) {
        self.paused = true;
    }

    /// Switch the active sequence. The engine resets the frame index to 0 and
    /// clears the ended state on the next tick.
    pub fn set_animation(&mut self, name: impl Into<String>) {
        self.animation = Some(name.into());
    }

    /// Drive the frame index from a normalized offset instead of the clock.
    pub fn set_offset(&mut self, offset: Option<f32>) {
        self.offset = offset;
    }

    /// Normalized position of the current frame within the active sequence.
    ///
    /// Returns the scrub offset verbatim (clamped) when scrubbing, otherwise
    /// the frame index normalized over the cached sequence length.
    pub fn progress(&self) -> f32 {
        if let Some(offset) = self.offset {
            return if offset.is_finite() {
                offset.clamp(0.0, 1.0)
            } else {
                0.0
            };
        }
        if self.sequence_len > 1 {
            self.frame as f32 / (self.sequence_len - 1) as f32
        } else {
            0.0
        }
    }

    pub fn has_ended(&self) -> bool {
        self.has_ended
    }

    /// Rewind to the start of the run and clear the ended state.
    ///
    /// The pause flag is left alone so a paused playback stays paused.
    pub fn reset(&mut self) {
        self.frame = self.start_frame;
        self.has_ended = false;
        self.elapsed = 0.0;
        self.past_end = false;
        self.started_latch = false;
        self.scrub_end_latch = false;
        // Force a resync so direction-dependent start positions are reapplied.
        self.synced = false;
    }
}
