//! Atlas loader commands and messages.
//!
//! The loader runs on its own thread (see
//! [`crate::resources::loader::setup_loader`]); these types cross the channel
//! bridge in both directions. [`AtlasMessage`] additionally flows through the
//! ECS message queue so systems can observe load completions and failures the
//! frame they are applied.

use bevy_ecs::message::Message;
use std::path::PathBuf;

use crate::resources::atlas::{Atlas, AtlasOptions};

/// Commands sent *to* the loader thread.
#[derive(Debug)]
pub enum AtlasCmd {
    /// Read and parse a JSON sheet description from disk.
    Load {
        /// Store key the resulting atlas is inserted under.
        key: String,
        path: PathBuf,
        options: AtlasOptions,
    },
    Shutdown,
}

/// Raw load outcome sent *back* from the loader thread.
///
/// Consumed by [`poll_atlas_results`](crate::systems::loader::poll_atlas_results),
/// which moves successful atlases into the store and re-emits the outcome as
/// an [`AtlasMessage`].
#[derive(Debug)]
pub struct AtlasResult {
    pub key: String,
    pub result: Result<Atlas, String>,
}

/// ECS-side notification of a finished load.
#[derive(Message, Debug, Clone, PartialEq)]
pub enum AtlasMessage {
    Loaded { key: String },
    Failed { key: String, error: String },
}
