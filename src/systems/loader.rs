//! Background atlas loading.
//!
//! [`loader_thread`] runs off the main thread and owns all file IO and JSON
//! parsing. [`poll_atlas_results`] drains finished loads back into the
//! [`AtlasStore`](crate::resources::atlasstore::AtlasStore) inside the serial
//! tick, then re-emits each outcome as an
//! [`AtlasMessage`](crate::events::atlas::AtlasMessage) for systems that want
//! to react to completions.

use bevy_ecs::prelude::*;
use crossbeam_channel::{Receiver, Sender};
use log::{debug, error, info};

use crate::events::atlas::{AtlasCmd, AtlasMessage, AtlasResult};
use crate::resources::atlas::Atlas;
use crate::resources::atlasstore::AtlasStore;
use crate::resources::loader::AtlasBridge;

/// Entry point of the background loader thread.
///
/// Blocks on the command channel; every [`AtlasCmd::Load`] becomes exactly one
/// [`AtlasResult`], success or failure. Exits when [`AtlasCmd::Shutdown`]
/// arrives or the command channel closes.
pub fn loader_thread(rx_cmd: Receiver<AtlasCmd>, tx_res: Sender<AtlasResult>) {
    info!("Atlas loader thread started");
    while let Ok(cmd) = rx_cmd.recv() {
        match cmd {
            AtlasCmd::Load { key, path, options } => {
                debug!("Loading atlas '{}' from {:?}", key, path);
                let result = std::fs::read_to_string(&path)
                    .map_err(|e| format!("Failed to read {:?}: {}", path, e))
                    .and_then(|json| Atlas::from_json_str(&json, &options));
                if tx_res.send(AtlasResult { key, result }).is_err() {
                    // Receiver dropped, the world is gone.
                    break;
                }
            }
            AtlasCmd::Shutdown => break,
        }
    }
    info!("Atlas loader thread stopped");
}

/// Drain finished loads from the loader thread into the atlas store.
///
/// Successful atlases are inserted under their requested key; failures are
/// logged and never touch the store. Both outcomes are forwarded as
/// [`AtlasMessage`]s.
pub fn poll_atlas_results(
    bridge: Res<AtlasBridge>,
    mut store: ResMut<AtlasStore>,
    mut writer: MessageWriter<AtlasMessage>,
) {
    for AtlasResult { key, result } in bridge.rx_res.try_iter() {
        match result {
            Ok(atlas) => {
                info!(
                    "Atlas '{}' loaded ({} sequences)",
                    key,
                    atlas.animation_names().len().max(1)
                );
                store.insert(&key, atlas);
                writer.write(AtlasMessage::Loaded { key });
            }
            Err(error) => {
                error!("Atlas '{}' failed to load: {}", key, error);
                writer.write(AtlasMessage::Failed { key, error });
            }
        }
    }
}

/// Advance the [`AtlasMessage`] double buffer once per tick.
pub fn update_atlas_messages(mut msgs: ResMut<Messages<AtlasMessage>>) {
    msgs.update();
}
