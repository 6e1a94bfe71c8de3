//! Atlas data types and the sheet normalizer.
//!
//! An [`Atlas`] describes where each frame sits inside a sheet texture. It is
//! built once, either from declared grid dimensions or from a JSON sheet
//! document, and is read-only afterwards. The JSON document's shape (array of
//! frames vs. map keyed by sub-image name) is resolved exactly once at load
//! time into a [`FrameSet`] variant, so playback never re-sniffs the shape.
//!
//! # Sheet document format
//!
//! ```json
//! {
//!   "frames": {
//!     "walk_0": { "frame": { "x": 0, "y": 0, "w": 64, "h": 64 },
//!                 "sourceSize": { "w": 64, "h": 64 } }
//!   },
//!   "meta": { "size": { "w": 256, "h": 64 } }
//! }
//! ```
//!
//! `frames` may equally be an ordered array of the same records.
//!
//! # Related
//!
//! - [`crate::resources::atlasstore::AtlasStore`] – registry of loaded atlases
//! - [`crate::systems::loader`] – background thread that builds atlases from disk

use log::warn;
use serde::Deserialize;

/// One rectangular sub-image of a sheet, in pixels.
///
/// `source_w`/`source_h` are the original, pre-trim dimensions used for
/// aspect-ratio computation. Immutable once parsed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AtlasFrame {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
    pub source_w: f32,
    pub source_h: f32,
}

/// Frame storage, resolved once at load time.
#[derive(Debug, Clone, PartialEq)]
pub enum FrameSet {
    /// A single ordered animation.
    Sequential(Vec<AtlasFrame>),
    /// Named animation sequences, in declaration order.
    Named(Vec<(String, Vec<AtlasFrame>)>),
}

/// Loader options controlling how a keyed sheet document is partitioned.
#[derive(Debug, Clone, Default)]
pub struct AtlasOptions {
    /// Substrings partitioning keyed frames into named sequences
    /// (case-insensitive containment). Unmatched keys are dropped.
    pub animation_names: Vec<String>,
    /// With no `animation_names`, extracts only keyed entries containing
    /// this substring as a flat sequence.
    pub frame_name: Option<String>,
}

/// A sheet's frame layout plus its pixel dimensions.
#[derive(Debug, Clone, PartialEq)]
pub struct Atlas {
    /// Full sheet width in pixels.
    pub sheet_w: f32,
    /// Full sheet height in pixels.
    pub sheet_h: f32,
    /// Frame layout, resolved once at load time.
    pub frames: FrameSet,
}

impl Atlas {
    /// Cut a sheet of declared dimensions into `count` equal-width frames
    /// spanning the full sheet height.
    ///
    /// The sheet width must divide evenly by `count`. If it does not, the
    /// atlas is degenerate: frames are left empty, a warning is logged, and
    /// playback stays a no-op until a valid atlas replaces it.
    pub fn from_grid(sheet_w: f32, sheet_h: f32, count: usize) -> Atlas {
        let mut frames = Vec::new();
        if count == 0 {
            warn!("grid atlas with zero frames requested ({sheet_w}x{sheet_h})");
        } else {
            let frame_w = sheet_w / count as f32;
            if frame_w.fract() != 0.0 || frame_w <= 0.0 {
                warn!(
                    "degenerate atlas: sheet width {sheet_w} does not divide into {count} frames"
                );
            } else {
                for i in 0..count {
                    frames.push(AtlasFrame {
                        x: i as f32 * frame_w,
                        y: 0.0,
                        w: frame_w,
                        h: sheet_h,
                        source_w: frame_w,
                        source_h: sheet_h,
                    });
                }
            }
        }
        Atlas {
            sheet_w,
            sheet_h,
            frames: FrameSet::Sequential(frames),
        }
    }

    /// Parse a JSON sheet document and normalize it per `options`.
    ///
    /// Accepts `frames` as an ordered array or as a map keyed by sub-image
    /// name. Keyed maps keep their authoring order.
    pub fn from_json_str(json: &str, options: &AtlasOptions) -> Result<Atlas, String> {
        let doc: SheetDoc =
            serde_json::from_str(json).map_err(|e| format!("invalid sheet document: {e}"))?;
        Self::from_document(doc, options)
    }

    fn from_document(doc: SheetDoc, options: &AtlasOptions) -> Result<Atlas, String> {
        let sheet_w = doc.meta.size.w;
        let sheet_h = doc.meta.size.h;
        if !(sheet_w.is_finite() && sheet_h.is_finite()) || sheet_w <= 0.0 || sheet_h <= 0.0 {
            return Err(format!("invalid sheet size {sheet_w}x{sheet_h}"));
        }

        let frames = match doc.frames {
            FramesField::Sequence(records) => {
                let mut out = Vec::with_capacity(records.len());
                for record in records {
                    out.push(record_to_frame(record)?);
                }
                FrameSet::Sequential(out)
            }
            FramesField::Keyed(map) => {
                // Keyed values are decoded lazily so one malformed entry names
                // itself in the error.
                let mut entries: Vec<(String, AtlasFrame)> = Vec::with_capacity(map.len());
                for (key, value) in map {
                    let record: FrameRecord = serde_json::from_value(value)
                        .map_err(|e| format!("invalid frame record '{key}': {e}"))?;
                    entries.push((key, record_to_frame(record)?));
                }
                partition_entries(entries, options)
            }
        };

        Ok(Atlas {
            sheet_w,
            sheet_h,
            frames,
        })
    }

    /// The frame sequence selected by `name`.
    ///
    /// Sequential atlases always return the whole sequence. Named atlases
    /// return the matching group, or the first group when no name is given.
    pub fn sequence(&self, name: Option<&str>) -> Option<&[AtlasFrame]> {
        match &self.frames {
            FrameSet::Sequential(frames) => Some(frames.as_slice()),
            FrameSet::Named(groups) => match name {
                Some(name) => groups
                    .iter()
                    .find(|(group, _)| group == name)
                    .map(|(_, frames)| frames.as_slice()),
                None => groups.first().map(|(_, frames)| frames.as_slice()),
            },
        }
    }

    /// Number of frames in the sequence selected by `name`.
    pub fn frame_count(&self, name: Option<&str>) -> usize {
        self.sequence(name).map_or(0, |frames| frames.len())
    }

    /// Display aspect ratio `[1, source_h / source_w, 1]` taken from the
    /// first frame of the selected sequence. Identity if the sequence is
    /// empty or the frame has no width.
    pub fn aspect(&self, name: Option<&str>) -> [f32; 3] {
        match self.sequence(name).and_then(|frames| frames.first()) {
            Some(frame) if frame.source_w > 0.0 => [1.0, frame.source_h / frame.source_w, 1.0],
            _ => [1.0, 1.0, 1.0],
        }
    }

    /// True when no sequence holds any frame (degenerate or empty atlas).
    pub fn is_empty(&self) -> bool {
        match &self.frames {
            FrameSet::Sequential(frames) => frames.is_empty(),
            FrameSet::Named(groups) => groups.iter().all(|(_, frames)| frames.is_empty()),
        }
    }

    /// Names of the animation sequences, in declaration order. Empty for
    /// sequential atlases.
    pub fn animation_names(&self) -> Vec<&str> {
        match &self.frames {
            FrameSet::Sequential(_) => Vec::new(),
            FrameSet::Named(groups) => groups.iter().map(|(name, _)| name.as_str()).collect(),
        }
    }
}

fn partition_entries(entries: Vec<(String, AtlasFrame)>, options: &AtlasOptions) -> FrameSet {
    if !options.animation_names.is_empty() {
        let mut groups: Vec<(String, Vec<AtlasFrame>)> = options
            .animation_names
            .iter()
            .map(|name| (name.clone(), Vec::new()))
            .collect();
        for (key, frame) in &entries {
            let key_lower = key.to_lowercase();
            for (name, frames) in groups.iter_mut() {
                if key_lower.contains(&name.to_lowercase()) {
                    frames.push(*frame);
                }
            }
        }
        FrameSet::Named(groups)
    } else if let Some(filter) = &options.frame_name {
        let filter_lower = filter.to_lowercase();
        FrameSet::Sequential(
            entries
                .into_iter()
                .filter(|(key, _)| key.to_lowercase().contains(&filter_lower))
                .map(|(_, frame)| frame)
                .collect(),
        )
    } else {
        FrameSet::Sequential(entries.into_iter().map(|(_, frame)| frame).collect())
    }
}

fn record_to_frame(record: FrameRecord) -> Result<AtlasFrame, String> {
    let rect = record.frame;
    let source = record.source_size.unwrap_or(Size {
        w: rect.w,
        h: rect.h,
    });
    let values = [rect.x, rect.y, rect.w, rect.h, source.w, source.h];
    if values.iter().any(|v| !v.is_finite()) {
        return Err(format!(
            "non-numeric frame rect ({}, {}, {}, {})",
            rect.x, rect.y, rect.w, rect.h
        ));
    }
    Ok(AtlasFrame {
        x: rect.x,
        y: rect.y,
        w: rect.w,
        h: rect.h,
        source_w: source.w,
        source_h: source.h,
    })
}

// ---------- serde input shapes ----------

#[derive(Debug, Deserialize)]
struct SheetDoc {
    frames: FramesField,
    meta: SheetMeta,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum FramesField {
    Sequence(Vec<FrameRecord>),
    Keyed(serde_json::Map<String, serde_json::Value>),
}

#[derive(Debug, Deserialize)]
struct SheetMeta {
    size: Size,
}

#[derive(Debug, Clone, Copy, Deserialize)]
struct Size {
    w: f32,
    h: f32,
}

#[derive(Debug, Clone, Copy, Deserialize)]
struct Rect {
    x: f32,
    y: f32,
    w: f32,
    h: f32,
}

#[derive(Debug, Deserialize)]
struct FrameRecord {
    frame: Rect,
    #[serde(rename = "sourceSize")]
    source_size: Option<Size>,
    #[serde(default)]
    #[allow(dead_code)]
    rotated: bool,
    #[serde(default)]
    #[allow(dead_code)]
    trimmed: bool,
}
