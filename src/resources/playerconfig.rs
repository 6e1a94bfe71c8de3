//! Demo player configuration resource.
//!
//! Manages defaults for the headless player binary, loaded from an INI file.
//! Provides safe defaults so the player starts without any file present.
//!
//! # Configuration File Format
//!
//! ```ini
//! [playback]
//! fps = 30
//! loop = true
//! autoplay = true
//!
//! [simulation]
//! ticks = 120
//! tick_ms = 16.6
//! ```

use bevy_ecs::prelude::*;
use configparser::ini::Ini;
use log::info;
use std::path::PathBuf;

/// Default safe values for startup
const DEFAULT_FPS: f32 = 30.0;
const DEFAULT_LOOPING: bool = true;
const DEFAULT_AUTO_PLAY: bool = true;
const DEFAULT_TICKS: u32 = 120;
const DEFAULT_TICK_MS: f32 = 1000.0 / 60.0;
const DEFAULT_CONFIG_PATH: &str = "./player.ini";

/// Demo player configuration resource.
///
/// Stores playback defaults and simulation settings for the headless player.
/// CLI flags override whatever is loaded from the file.
#[derive(Resource, Debug, Clone)]
pub struct PlayerConfig {
    /// Playback speed in frames per second.
    pub fps: f32,
    /// Wrap around at the end of the sequence.
    pub looping: bool,
    /// Start playing as soon as the atlas is available.
    pub auto_play: bool,
    /// Number of simulated ticks to run.
    pub ticks: u32,
    /// Simulated milliseconds per tick.
    pub tick_ms: f32,
    /// Path to the configuration file.
    pub config_path: PathBuf,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl PlayerConfig {
    /// Create a new configuration with safe default values.
    pub fn new() -> Self {
        Self {
            fps: DEFAULT_FPS,
            looping: DEFAULT_LOOPING,
            auto_play: DEFAULT_AUTO_PLAY,
            ticks: DEFAULT_TICKS,
            tick_ms: DEFAULT_TICK_MS,
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
        }
    }

    /// Create a new configuration with a custom config file path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            ..Self::new()
        }
    }

    /// Load configuration from the INI file.
    ///
    /// Missing values retain their current (default) values.
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from_file(&mut self) -> Result<(), String> {
        let mut config = Ini::new();
        config
            .load(&self.config_path)
            .map_err(|e| format!("Failed to load config file: {}", e))?;

        // [playback] section
        if let Some(fps) = config.getfloat("playback", "fps").ok().flatten() {
            self.fps = fps as f32;
        }
        if let Some(looping) = config.getbool("playback", "loop").ok().flatten() {
            self.looping = looping;
        }
        if let Some(auto_play) = config.getbool("playback", "autoplay").ok().flatten() {
            self.auto_play = auto_play;
        }

        // [simulation] section
        if let Some(ticks) = config.getuint("simulation", "ticks").ok().flatten() {
            self.ticks = ticks as u32;
        }
        if let Some(tick_ms) = config.getfloat("simulation", "tick_ms").ok().flatten() {
            self.tick_ms = tick_ms as f32;
        }

        info!(
            "Loaded config: fps={}, loop={}, autoplay={}, ticks={}, tick_ms={}",
            self.fps, self.looping, self.auto_play, self.ticks, self.tick_ms
        );

        Ok(())
    }

    /// Save configuration to the INI file.
    ///
    /// Creates the file if it doesn't exist.
    #[allow(dead_code)]
    pub fn save_to_file(&self) -> Result<(), String> {
        let mut config = Ini::new();

        // [playback] section
        config.set("playback", "fps", Some(self.fps.to_string()));
        config.set("playback", "loop", Some(self.looping.to_string()));
        config.set("playback", "autoplay", Some(self.auto_play.to_string()));

        // [simulation] section
        config.set("simulation", "ticks", Some(self.ticks.to_string()));
        config.set("simulation", "tick_ms", Some(self.tick_ms.to_string()));

        config
            .write(&self.config_path)
            .map_err(|e| format!("Failed to save config file: {}", e))?;

        info!("Saved config to {:?}", self.config_path);

        Ok(())
    }
}
