//! Headless demo player.
//!
//! Loads a sprite sheet (JSON atlas from disk, or a synthetic uniform grid),
//! drives the playback schedule for a fixed number of simulated ticks, and
//! logs every lifecycle event it observes. Useful for eyeballing frame
//! timing and event ordering without a renderer.

use bevy_ecs::prelude::*;
use clap::Parser;
use log::{info, warn};
use std::path::PathBuf;

use spriteplay::components::playback::Playback;
use spriteplay::components::sprite::Sprite;
use spriteplay::events::atlas::AtlasCmd;
use spriteplay::events::playback::PlaybackEvent;
use spriteplay::resources::atlas::{Atlas, AtlasOptions};
use spriteplay::resources::atlasstore::AtlasStore;
use spriteplay::resources::loader::{AtlasBridge, setup_loader, shutdown_loader};
use spriteplay::resources::playerconfig::PlayerConfig;
use spriteplay::resources::worldtime::WorldTime;
use spriteplay::systems::instancing::seed_sprite_instances;
use spriteplay::systems::loader::{poll_atlas_results, update_atlas_messages};
use spriteplay::systems::playback::sprite_playback;
use spriteplay::systems::time::update_world_time;

#[derive(Parser, Debug)]
#[command(author, version, about = "Headless sprite sheet playback player")]
struct Cli {
    /// Path to a JSON sheet description. Omit to play a synthetic grid.
    #[arg(short, long)]
    sheet: Option<PathBuf>,

    /// Sequence name to play, for sheets with named animations.
    #[arg(short, long)]
    animation: Option<String>,

    /// Comma separated substrings used to partition a flat frame list
    /// into named sequences.
    #[arg(long, value_delimiter = ',')]
    animation_names: Vec<String>,

    /// Playback speed in frames per second.
    #[arg(long)]
    fps: Option<f32>,

    /// Play the sequence in reverse.
    #[arg(long)]
    backwards: bool,

    /// Mirror frames horizontally.
    #[arg(long)]
    flip_x: bool,

    /// Stop at the last frame instead of wrapping.
    #[arg(long)]
    no_loop: bool,

    /// Number of simulated ticks to run.
    #[arg(long)]
    ticks: Option<u32>,

    /// Path to the INI configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => PlayerConfig::with_path(path.clone()),
        None => PlayerConfig::new(),
    };
    if let Err(e) = config.load_from_file() {
        warn!("Using default configuration: {}", e);
    }
    if let Some(fps) = cli.fps {
        config.fps = fps;
    }
    if cli.no_loop {
        config.looping = false;
    }
    if let Some(ticks) = cli.ticks {
        config.ticks = ticks;
    }

    let mut world = World::new();
    world.insert_resource(WorldTime::default());
    world.insert_resource(AtlasStore::new());
    world.insert_resource(config.clone());
    setup_loader(&mut world);

    // Log every lifecycle event the playback system emits.
    world.spawn(Observer::new(|event: On<PlaybackEvent>| {
        let e = event.event();
        info!(
            "{:?} frame={} sequence={:?} entity={:?}",
            e.kind, e.frame, e.frame_name, e.entity
        );
    }));

    const ATLAS_KEY: &str = "player";
    match &cli.sheet {
        Some(path) => {
            let bridge = world.resource::<AtlasBridge>();
            let cmd = AtlasCmd::Load {
                key: ATLAS_KEY.to_string(),
                path: path.clone(),
                options: AtlasOptions {
                    animation_names: cli.animation_names.clone(),
                    frame_name: cli.animation.clone(),
                },
            };
            if bridge.tx_cmd.send(cmd).is_err() {
                warn!("Loader thread unavailable, nothing to play");
            }
        }
        None => {
            // Synthetic 8 frame strip of 64x64 cells.
            let atlas = Atlas::from_grid(512.0, 64.0, 8);
            world.resource_mut::<AtlasStore>().insert(ATLAS_KEY, atlas);
        }
    }

    let mut playback = Playback::new(ATLAS_KEY)
        .with_fps(config.fps)
        .with_looping(config.looping);
    if let Some(name) = &cli.animation {
        playback = playback.with_animation(name);
    }
    if cli.backwards {
        playback = playback.with_backwards(true);
    }
    if cli.flip_x {
        playback = playback.with_flip_x(true);
    }
    if !config.auto_play {
        playback = playback.stopped();
    }
    world.spawn((playback, Sprite::default()));

    let mut schedule = Schedule::default();
    schedule.add_systems((
        poll_atlas_results,
        seed_sprite_instances,
        sprite_playback,
        update_atlas_messages,
    ));

    let dt = config.tick_ms / 1000.0;
    info!(
        "Simulating {} ticks at {:.1} ms per tick",
        config.ticks, config.tick_ms
    );
    for _ in 0..config.ticks {
        update_world_time(&mut world, dt);
        schedule.run(&mut world);
        world.clear_trackers();
    }

    shutdown_loader(&mut world);
    info!("Done");
}
