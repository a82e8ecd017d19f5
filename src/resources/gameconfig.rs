//! Game configuration resource.
//!
//! Manages katamari tuning and session settings loaded from an INI file.
//! Provides defaults for safe startup and methods to load/save configuration.
//!
//! # Configuration File Format
//!
//! ```ini
//! [katamari]
//! radius = 0.5
//! density = 1.0
//! roll_up_max_ratio = 0.25
//! torque_mult = 1500
//! force_mult = 500
//! airborne_force_mult = 250
//! upward_force_mult = 1000
//! stair_climb_ratio = 2.15
//! consolidation_threshold = 40
//!
//! [session]
//! seed = 7
//! collectibles = 60
//! target_radius = 1.5
//! tick_rate = 60
//! ticks = 3600
//! ```

use bevy_ecs::prelude::*;
use configparser::ini::Ini;
use log::info;
use std::path::PathBuf;
use thiserror::Error;

use crate::components::katamari::KatamariTuning;

/// Default safe values for startup
const DEFAULT_KATAMARI_RADIUS: f64 = 0.5;
const DEFAULT_KATAMARI_DENSITY: f64 = 1.0;
const DEFAULT_SEED: u64 = 7;
const DEFAULT_COLLECTIBLES: usize = 60;
const DEFAULT_TARGET_RADIUS: f64 = 1.5;
const DEFAULT_TICK_RATE: u32 = 60;
const DEFAULT_TICKS: u64 = 3600;
const DEFAULT_CONFIG_PATH: &str = "./config.ini";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load config file {}: {reason}", path.display())]
    Load { path: PathBuf, reason: String },
    #[error("failed to save config file {}: {source}", path.display())]
    Save {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid value for [{section}] {key}: {reason}")]
    Invalid {
        section: &'static str,
        key: &'static str,
        reason: String,
    },
}

/// Game configuration resource.
#[derive(Resource, Debug, Clone)]
pub struct GameConfig {
    /// Starting radius of the katamari.
    pub katamari_radius: f64,
    /// Density of the katamari; sets its starting mass.
    pub katamari_density: f64,
    pub tuning: KatamariTuning,
    /// Seed for scene generation.
    pub seed: u64,
    /// Number of scattered collectibles.
    pub collectibles: usize,
    /// Radius needed for victory.
    pub target_radius: f64,
    /// Simulation ticks per second.
    pub tick_rate: u32,
    /// Ticks to simulate in a headless run.
    pub ticks: u64,
    /// Path to the configuration file.
    pub config_path: PathBuf,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}

fn read_f64(ini: &Ini, section: &'static str, key: &'static str) -> Result<Option<f64>, ConfigError> {
    ini.getfloat(section, key)
        .map_err(|reason| ConfigError::Invalid {
            section,
            key,
            reason,
        })
}

fn read_u64(ini: &Ini, section: &'static str, key: &'static str) -> Result<Option<u64>, ConfigError> {
    ini.getuint(section, key)
        .map_err(|reason| ConfigError::Invalid {
            section,
            key,
            reason,
        })
}

fn require_positive(section: &'static str, key: &'static str, value: f64) -> Result<f64, ConfigError> {
    if value > 0.0 && value.is_finite() {
        Ok(value)
    } else {
        Err(ConfigError::Invalid {
            section,
            key,
            reason: format!("expected a positive number, got {value}"),
        })
    }
}

impl GameConfig {
    /// Create a new configuration with safe default values.
    pub fn new() -> Self {
        Self {
            katamari_radius: DEFAULT_KATAMARI_RADIUS,
            katamari_density: DEFAULT_KATAMARI_DENSITY,
            tuning: KatamariTuning::default(),
            seed: DEFAULT_SEED,
            collectibles: DEFAULT_COLLECTIBLES,
            target_radius: DEFAULT_TARGET_RADIUS,
            tick_rate: DEFAULT_TICK_RATE,
            ticks: DEFAULT_TICKS,
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

    /// Length of one simulation tick in seconds.
    pub fn tick_seconds(&self) -> f64 {
        1.0 / f64::from(self.tick_rate.max(1))
    }

    /// Load configuration from the INI file.
    ///
    /// Missing values retain their current (default) values. Malformed or
    /// out-of-range values are reported and leave the configuration unchanged.
    pub fn load_from_file(&mut self) -> Result<(), ConfigError> {
        let mut ini = Ini::new();
        ini.load(&self.config_path)
            .map_err(|reason| ConfigError::Load {
                path: self.config_path.clone(),
                reason,
            })?;
        self.apply_ini(&ini)?;

        info!(
            "Loaded config: radius={}, density={}, roll_up_max_ratio={}, seed={}, collectibles={}, target_radius={}, tick_rate={}",
            self.katamari_radius,
            self.katamari_density,
            self.tuning.roll_up_max_ratio,
            self.seed,
            self.collectibles,
            self.target_radius,
            self.tick_rate
        );

        Ok(())
    }

    /// Load configuration from INI text.
    pub fn load_from_str(&mut self, text: &str) -> Result<(), ConfigError> {
        let mut ini = Ini::new();
        ini.read(text.to_string())
            .map_err(|reason| ConfigError::Load {
                path: self.config_path.clone(),
                reason,
            })?;
        self.apply_ini(&ini)
    }

    fn apply_ini(&mut self, ini: &Ini) -> Result<(), ConfigError> {
        let mut next = self.clone();

        // [katamari] section
        if let Some(radius) = read_f64(ini, "katamari", "radius")? {
            next.katamari_radius = require_positive("katamari", "radius", radius)?;
        }
        if let Some(density) = read_f64(ini, "katamari", "density")? {
            next.katamari_density = require_positive("katamari", "density", density)?;
        }
        if let Some(ratio) = read_f64(ini, "katamari", "roll_up_max_ratio")? {
            next.tuning.roll_up_max_ratio = require_positive("katamari", "roll_up_max_ratio", ratio)?;
        }
        if let Some(value) = read_f64(ini, "katamari", "torque_mult")? {
            next.tuning.torque_mult = value;
        }
        if let Some(value) = read_f64(ini, "katamari", "force_mult")? {
            next.tuning.force_mult = value;
        }
        if let Some(value) = read_f64(ini, "katamari", "airborne_force_mult")? {
            next.tuning.airborne_force_mult = value;
        }
        if let Some(value) = read_f64(ini, "katamari", "upward_force_mult")? {
            next.tuning.upward_force_mult = value;
        }
        if let Some(ratio) = read_f64(ini, "katamari", "stair_climb_ratio")? {
            next.tuning.stair_climb_ratio = require_positive("katamari", "stair_climb_ratio", ratio)?;
        }
        if let Some(threshold) = read_u64(ini, "katamari", "consolidation_threshold")? {
            next.tuning.consolidation_threshold = threshold as usize;
        }

        // [session] section
        if let Some(seed) = read_u64(ini, "session", "seed")? {
            next.seed = seed;
        }
        if let Some(count) = read_u64(ini, "session", "collectibles")? {
            next.collectibles = count as usize;
        }
        if let Some(target) = read_f64(ini, "session", "target_radius")? {
            next.target_radius = require_positive("session", "target_radius", target)?;
        }
        if let Some(rate) = read_u64(ini, "session", "tick_rate")? {
            if rate == 0 || rate > u64::from(u32::MAX) {
                return Err(ConfigError::Invalid {
                    section: "session",
                    key: "tick_rate",
                    reason: format!("expected 1..={}, got {rate}", u32::MAX),
                });
            }
            next.tick_rate = rate as u32;
        }
        if let Some(ticks) = read_u64(ini, "session", "ticks")? {
            next.ticks = ticks;
        }

        *self = next;
        Ok(())
    }

    /// Save configuration to the INI file.
    ///
    /// Creates the file if it doesn't exist.
    pub fn save_to_file(&self) -> Result<(), ConfigError> {
        let mut ini = Ini::new();

        // [katamari] section
        ini.set("katamari", "radius", Some(self.katamari_radius.to_string()));
        ini.set("katamari", "density", Some(self.katamari_density.to_string()));
        ini.set(
            "katamari",
            "roll_up_max_ratio",
            Some(self.tuning.roll_up_max_ratio.to_string()),
        );
        ini.set("katamari", "torque_mult", Some(self.tuning.torque_mult.to_string()));
        ini.set("katamari", "force_mult", Some(self.tuning.force_mult.to_string()));
        ini.set(
            "katamari",
            "airborne_force_mult",
            Some(self.tuning.airborne_force_mult.to_string()),
        );
        ini.set(
            "katamari",
            "upward_force_mult",
            Some(self.tuning.upward_force_mult.to_string()),
        );
        ini.set(
            "katamari",
            "stair_climb_ratio",
            Some(self.tuning.stair_climb_ratio.to_string()),
        );
        ini.set(
            "katamari",
            "consolidation_threshold",
            Some(self.tuning.consolidation_threshold.to_string()),
        );

        // [session] section
        ini.set("session", "seed", Some(self.seed.to_string()));
        ini.set("session", "collectibles", Some(self.collectibles.to_string()));
        ini.set("session", "target_radius", Some(self.target_radius.to_string()));
        ini.set("session", "tick_rate", Some(self.tick_rate.to_string()));
        ini.set("session", "ticks", Some(self.ticks.to_string()));

        ini.write(&self.config_path)
            .map_err(|source| ConfigError::Save {
                path: self.config_path.clone(),
                source,
            })?;

        info!("Saved config to {:?}", self.config_path);

        Ok(())
    }
}
