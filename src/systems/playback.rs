//! Sprite playback system.
//!
//! [`sprite_playback`] advances every [`Playback`](crate::components::playback::Playback)
//! component against a wall-clock fps gate and writes the resulting
//! [`UvTransform`](crate::components::sprite::UvTransform) to the entity's
//! [`Sprite`](crate::components::sprite::Sprite). Lifecycle transitions are
//! delivered as [`PlaybackEvent`](crate::events::playback::PlaybackEvent)
//! triggers.
//!
//! # Playback Flow
//!
//! 1. Atlases are loaded into the [`AtlasStore`](crate::resources::atlasstore::AtlasStore)
//! 2. Entities carry a [`Playback`] pointing at an atlas key
//! 3. Each tick accumulates [`WorldTime`] delta; an advance is applied only
//!    when the accumulated time reaches `1/fps` seconds
//! 4. An applied tick resolves end-of-sequence policy, emits events, writes
//!    the UV transform, and steps the index for the next applied tick
//!
//! A missing atlas, an empty (degenerate) sequence, or a frame index racing a
//! sequence switch all make the tick a no-op for that entity; playback heals
//! on the next valid tick.

use bevy_ecs::prelude::*;
use log::warn;

use crate::components::playback::Playback;
use crate::components::sprite::{Sprite, UvTransform};
use crate::events::playback::{PlaybackEvent, PlaybackEventKind};
use crate::resources::atlas::{Atlas, AtlasFrame};
use crate::resources::atlasstore::AtlasStore;
use crate::resources::worldtime::WorldTime;

/// Advance sprite playback and update sprite UV transforms.
///
/// Contract
/// - Reads [`WorldTime`] for the tick delta.
/// - Looks up sheet data in [`AtlasStore`]; entities whose atlas has not
///   loaded yet are skipped without error.
/// - Mutates [`Playback`] state and the paired [`Sprite`].
/// - Triggers [`PlaybackEvent`]s in the documented delivery order.
pub fn sprite_playback(
    mut query: Query<(Entity, &mut Playback, &mut Sprite)>,
    store: Res<AtlasStore>,
    time: Res<WorldTime>,
    mut commands: Commands,
) {
    for (entity, mut pb, mut sprite) in query.iter_mut() {
        let Some(atlas) = store.get(&pb.atlas_key) else {
            continue;
        };

        // Apply pending animation or direction changes before ticking.
        if !pb.synced || pb.active_animation != pb.animation || pb.active_backwards != pb.backwards
        {
            sync_playback(&mut pb, &mut sprite, atlas);
        }

        if pb.paused || pb.has_ended || !pb.is_playing() {
            continue;
        }

        let Some(frames) = atlas.sequence(pb.animation.as_deref()) else {
            continue;
        };
        if frames.is_empty() {
            // Degenerate atlas, already logged at load time.
            continue;
        }

        pb.elapsed += time.delta;
        let interval = 1.0 / pb.fps.max(f32::EPSILON);
        if pb.elapsed < interval {
            continue;
        }
        // Keep the remainder so animation rate stays decoupled from the
        // host refresh rate; at most one advance per host tick.
        pb.elapsed %= interval;

        apply_tick(entity, &mut pb, &mut sprite, atlas, frames, &mut commands);
    }
}

/// Re-sync playback bookkeeping after an animation or direction change, or
/// when the atlas becomes available for the first time.
///
/// Switching the sequence name resets the index to 0 and clears the ended
/// state; toggling direction moves the index to the new run's start
/// position. Also refreshes the sprite aspect and writes an initial UV so
/// the surface is valid before the first applied tick.
fn sync_playback(pb: &mut Playback, sprite: &mut Sprite, atlas: &Atlas) {
    let first = !pb.synced;
    let animation_changed = pb.synced && pb.active_animation != pb.animation;
    let direction_changed = pb.synced && pb.active_backwards != pb.backwards;

    pb.active_animation = pb.animation.clone();
    pb.active_backwards = pb.backwards;
    pb.synced = true;
    pb.has_ended = false;
    pb.past_end = false;
    pb.started_latch = false;
    pb.scrub_end_latch = false;
    pb.elapsed = 0.0;

    let Some(frames) = atlas.sequence(pb.animation.as_deref()) else {
        pb.sequence_len = 0;
        return;
    };
    pb.sequence_len = frames.len();
    if frames.is_empty() {
        return;
    }

    let (start, end) = run_bounds(pb, frames.len());

    if animation_changed {
        pb.frame = 0;
    }
    if pb.backwards && (first || direction_changed) {
        pb.frame = end;
    } else if direction_changed {
        pb.frame = start;
    } else if first {
        pb.frame = pb.frame.clamp(start, end);
    }

    sprite.aspect = atlas.aspect(pb.animation.as_deref());
    if let Some(frame) = frames.get(pb.frame) {
        sprite.uv = compute_uv(atlas.sheet_w, atlas.sheet_h, frame, pb.flip_x);
    }
}

/// One applied tick: resolve end policy, emit events, write the UV
/// transform, and step the index for the next applied tick.
fn apply_tick(
    entity: Entity,
    pb: &mut Playback,
    sprite: &mut Sprite,
    atlas: &Atlas,
    frames: &[AtlasFrame],
    commands: &mut Commands,
) {
    let (start, end) = run_bounds(pb, frames.len());
    let run_start = if pb.backwards { end } else { start };

    // End handling deferred from the previous advance.
    if pb.past_end {
        pb.past_end = false;
        if pb.looping {
            pb.frame = run_start;
            commands.trigger(PlaybackEvent {
                entity,
                kind: PlaybackEventKind::LoopEnd,
                frame: pb.frame,
                frame_name: pb.animation.clone(),
            });
        } else {
            commands.trigger(PlaybackEvent {
                entity,
                kind: PlaybackEventKind::Ended,
                frame: pb.frame,
                frame_name: pb.animation.clone(),
            });
            if pb.reset_on_end {
                // Wait for an external resume instead of marking ended.
                pb.paused = true;
                pb.frame = run_start;
            } else {
                pb.has_ended = true;
            }
            return;
        }
    }

    // Manual scrub overrides autoplay.
    if let Some(offset) = pb.offset {
        pb.frame = scrub_index(offset, frames.len());
        let at_bound = if pb.backwards {
            pb.frame <= start
        } else {
            pb.frame >= end
        };
        if at_bound {
            if !pb.scrub_end_latch {
                pb.scrub_end_latch = true;
                commands.trigger(PlaybackEvent {
                    entity,
                    kind: PlaybackEventKind::Ended,
                    frame: pb.frame,
                    frame_name: pb.animation.clone(),
                });
            }
        } else {
            pb.scrub_end_latch = false;
        }
    }

    // Edge-latched start notification, delivered before this tick's Frame.
    if pb.frame == run_start {
        if !pb.started_latch {
            pb.started_latch = true;
            commands.trigger(PlaybackEvent {
                entity,
                kind: PlaybackEventKind::Started,
                frame: pb.frame,
                frame_name: pb.animation.clone(),
            });
        }
    } else {
        pb.started_latch = false;
    }

    // The sequence may have been swapped under the tick; skip the cycle.
    let Some(frame) = frames.get(pb.frame) else {
        return;
    };
    sprite.uv = compute_uv(atlas.sheet_w, atlas.sheet_h, frame, pb.flip_x);
    commands.trigger(PlaybackEvent {
        entity,
        kind: PlaybackEventKind::Frame,
        frame: pb.frame,
        frame_name: pb.animation.clone(),
    });

    // Step the index for the next applied tick (autoplay only). The index
    // stays in range; crossing the boundary is recorded in `past_end`.
    if pb.offset.is_none() {
        if pb.backwards {
            if pb.frame <= start {
                pb.past_end = true;
                pb.frame = start;
            } else {
                pb.frame -= 1;
            }
        } else if pb.frame >= end {
            pb.past_end = true;
            pb.frame = end;
        } else {
            pb.frame += 1;
        }
    }
}

/// Inclusive `[start, end]` index bounds of the current run.
fn run_bounds(pb: &Playback, len: usize) -> (usize, usize) {
    let last = len.saturating_sub(1);
    let end = pb.end_frame.map_or(last, |e| e.min(last));
    let start = pb.start_frame.min(end);
    (start, end)
}

/// Map a normalized scrub offset to a frame index.
///
/// `frame = clamp(floor(offset * len), 0, len - 1)`. Non-finite offsets are
/// clamped to frame 0 with a diagnostic log so NaN never reaches the UV
/// transform.
pub(crate) fn scrub_index(offset: f32, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    if !offset.is_finite() {
        warn!("non-finite scrub offset {offset}, falling back to frame 0");
        return 0;
    }
    let index = (offset * len as f32).floor();
    if index < 0.0 {
        0
    } else {
        (index as usize).min(len - 1)
    }
}

/// Compute the sampling rectangle for one frame of a sheet.
///
/// Repeat values are always positive. A horizontal flip negates `offset_x`.
/// The sheet-space y axis is flipped so the top image row maps to the top of
/// texture space, which has a bottom-left origin.
pub(crate) fn compute_uv(
    sheet_w: f32,
    sheet_h: f32,
    frame: &AtlasFrame,
    flip_x: bool,
) -> UvTransform {
    if sheet_w <= 0.0 || sheet_h <= 0.0 || frame.w <= 0.0 || frame.h <= 0.0 {
        return UvTransform::default();
    }
    let repeat_x = frame.w / sheet_w;
    let repeat_y = frame.h / sheet_h;
    let base_x = frame.x / sheet_w;
    UvTransform {
        offset_x: if flip_x { -base_x } else { base_x },
        offset_y: (1.0 - repeat_y) - frame.y / sheet_h,
        repeat_x,
        repeat_y,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(x: f32, y: f32, w: f32, h: f32) -> AtlasFrame {
        AtlasFrame {
            x,
            y,
            w,
            h,
            source_w: w,
            source_h: h,
        }
    }

    // --- scrub_index ---

    #[test]
    fn test_scrub_index_midpoint() {
        assert_eq!(scrub_index(0.5, 10), 5);
    }

    #[test]
    fn test_scrub_index_clamps_at_one() {
        // floor(1.0 * 10) = 10, clamped into range
        assert_eq!(scrub_index(1.0, 10), 9);
    }

    #[test]
    fn test_scrub_index_clamps_negative() {
        assert_eq!(scrub_index(-0.3, 10), 0);
    }

    #[test]
    fn test_scrub_index_nan_falls_back_to_zero() {
        assert_eq!(scrub_index(f32::NAN, 10), 0);
        assert_eq!(scrub_index(f32::INFINITY, 10), 0);
    }

    #[test]
    fn test_scrub_index_empty_sequence() {
        assert_eq!(scrub_index(0.5, 0), 0);
    }

    #[test]
    fn test_scrub_index_is_idempotent() {
        assert_eq!(scrub_index(0.73, 10), scrub_index(0.73, 10));
    }

    // --- compute_uv ---

    #[test]
    fn test_uv_single_row_sheet() {
        // 256x64 sheet cut into four 64x64 frames; frame 1 starts at x=64.
        let uv = compute_uv(256.0, 64.0, &frame(64.0, 0.0, 64.0, 64.0), false);
        assert_eq!(uv.repeat_x, 0.25);
        assert_eq!(uv.repeat_y, 1.0);
        assert_eq!(uv.offset_x, 0.25);
        assert_eq!(uv.offset_y, 0.0);
    }

    #[test]
    fn test_uv_repeat_always_positive() {
        let plain = compute_uv(256.0, 64.0, &frame(64.0, 0.0, 64.0, 64.0), false);
        let flipped = compute_uv(256.0, 64.0, &frame(64.0, 0.0, 64.0, 64.0), true);
        assert!(plain.repeat_x > 0.0 && plain.repeat_y > 0.0);
        assert!(flipped.repeat_x > 0.0 && flipped.repeat_y > 0.0);
    }

    #[test]
    fn test_uv_offset_x_sign_flips_with_flip_x() {
        let plain = compute_uv(256.0, 64.0, &frame(64.0, 0.0, 64.0, 64.0), false);
        let flipped = compute_uv(256.0, 64.0, &frame(64.0, 0.0, 64.0, 64.0), true);
        assert_eq!(plain.offset_x, 0.25);
        assert_eq!(flipped.offset_x, -0.25);
        assert_eq!(plain.offset_y, flipped.offset_y);
    }

    #[test]
    fn test_uv_y_axis_is_flipped() {
        // Two-row 64x64 sheet of 32x32 frames: the top image row (y=0) maps
        // to the upper half of texture space, the bottom row to the lower.
        let top = compute_uv(64.0, 64.0, &frame(0.0, 0.0, 32.0, 32.0), false);
        let bottom = compute_uv(64.0, 64.0, &frame(0.0, 32.0, 32.0, 32.0), false);
        assert_eq!(top.offset_y, 0.5);
        assert_eq!(bottom.offset_y, 0.0);
    }

    #[test]
    fn test_uv_degenerate_frame_is_identity() {
        let uv = compute_uv(256.0, 64.0, &frame(0.0, 0.0, 0.0, 64.0), false);
        assert_eq!(uv, UvTransform::default());
    }

    // --- run_bounds ---

    #[test]
    fn test_run_bounds_defaults_to_whole_sequence() {
        let pb = Playback::new("a");
        assert_eq!(run_bounds(&pb, 10), (0, 9));
    }

    #[test]
    fn test_run_bounds_respects_frame_range() {
        let pb = Playback::new("a").with_frame_range(2, 6);
        assert_eq!(run_bounds(&pb, 10), (2, 6));
    }

    #[test]
    fn test_run_bounds_clamps_end_to_sequence() {
        let pb = Playback::new("a").with_frame_range(2, 40);
        assert_eq!(run_bounds(&pb, 10), (2, 9));
    }

    #[test]
    fn test_run_bounds_start_never_exceeds_end() {
        let pb = Playback::new("a").with_frame_range(8, 3);
        assert_eq!(run_bounds(&pb, 10), (3, 3));
    }
}
