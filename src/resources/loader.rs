//! ECS resources that bridge the main thread with the background atlas loader.
//!
//! Use [`setup_loader`] once during initialization to spawn the loader thread
//! and insert the [`AtlasBridge`] and `Messages<AtlasMessage>` resources. Call
//! [`shutdown_loader`] during teardown to stop the thread cleanly.
//!
//! Loading is the only work that leaves the main thread: file reads and JSON
//! parsing are network/disk-bound, so they run on the loader thread and cross
//! back via a channel. Results are applied to the world by
//! [`poll_atlas_results`](crate::systems::loader::poll_atlas_results) inside
//! the serial tick, so playback state never needs locking.

use bevy_ecs::prelude::*;
use crossbeam_channel::{Receiver, Sender, unbounded};

use crate::events::atlas::{AtlasCmd, AtlasMessage, AtlasResult};
use crate::systems::loader::loader_thread;

/// Shared bridge between the ECS world and the loader thread.
///
/// Systems can request loads via [`AtlasBridge::tx_cmd`] and poll for
/// finished atlases via [`AtlasBridge::rx_res`].
#[derive(Resource)]
pub struct AtlasBridge {
    /// Sender for [`AtlasCmd`] messages (ECS -> loader thread).
    pub tx_cmd: Sender<AtlasCmd>,
    /// Receiver for [`AtlasResult`] messages (loader thread -> ECS).
    pub rx_res: Receiver<AtlasResult>,
    /// Join handle for the background loader thread.
    pub handle: std::thread::JoinHandle<()>,
}

/// Spawn the loader thread and register bridge resources.
///
/// This function:
/// - Creates command/result channels.
/// - Spawns the background thread running [`loader_thread`].
/// - Inserts [`AtlasBridge`] and initializes `Messages<AtlasMessage>` so that
///   systems can request loads and observe completions.
pub fn setup_loader(world: &mut World) {
    let (tx_cmd, rx_cmd) = unbounded::<AtlasCmd>();
    let (tx_res, rx_res) = unbounded::<AtlasResult>();

    let handle = std::thread::spawn(move || loader_thread(rx_cmd, tx_res));

    world.insert_resource(AtlasBridge {
        tx_cmd,
        rx_res,
        handle,
    });
    world.insert_resource(Messages::<AtlasMessage>::default());
}

/// Gracefully request shutdown of the loader thread and join it.
///
/// If the bridge resource exists, sends [`AtlasCmd::Shutdown`], waits for the
/// thread to exit, and removes the resource from the world.
pub fn shutdown_loader(world: &mut World) {
    if let Some(bridge) = world.remove_resource::<AtlasBridge>() {
        let _ = bridge.tx_cmd.send(AtlasCmd::Shutdown);
        let _ = bridge.handle.join();
    }
}
