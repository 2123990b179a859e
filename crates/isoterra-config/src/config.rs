//! Configuration structs with sensible defaults and RON persistence.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Directory name under the OS config directory.
pub const APP_DIR_NAME: &str = "isoterra";

/// File name of the persisted config.
pub const CONFIG_FILE_NAME: &str = "config.ron";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Field generation settings.
    pub terrain: TerrainConfig,
    /// Mesh building settings.
    pub mesh: MeshConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// Field generation configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TerrainConfig {
    /// Cells per side of the square grid.
    pub width: usize,
    /// Peak-to-peak elevation range before smoothing.
    pub amplitude: f64,
    /// Elevation noise step per cell.
    pub frequency: f64,
    /// Moisture noise step per cell.
    pub moisture_frequency: f64,
    /// Elevation noise x offset.
    pub offset_x: f64,
    /// Elevation noise z offset.
    pub offset_z: f64,
    /// World seed; unset keeps the default noise permutation.
    pub seed: Option<u64>,
}

/// Mesh building configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MeshConfig {
    /// Worker threads (0 = one per logical CPU).
    pub workers: usize,
    /// Render unclassifiable cells flat; `false` makes the build fail on
    /// the first one.
    pub flatten_unclassified: bool,
    /// Center the mesh on the origin.
    pub center: bool,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
}

// --- Default implementations ---

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            width: 64,
            amplitude: 15.0,
            frequency: 1.0 / 32.0,
            moisture_frequency: 0.15,
            offset_x: 0.0,
            offset_z: 0.0,
            seed: None,
        }
    }
}

impl Default for MeshConfig {
    fn default() -> Self {
        Self {
            workers: 0,
            flatten_unclassified: true,
            center: true,
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

// --- Load / Save / Reload ---

impl Config {
    /// Platform config directory for this application.
    pub fn default_dir() -> Result<PathBuf, ConfigError> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR_NAME))
            .ok_or(ConfigError::NoConfigDir)
    }

    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE_NAME);

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
            let config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(ConfigError::WriteError)?;

        let config_path = config_dir.join(CONFIG_FILE_NAME);
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .separate_tuple_members(true)
            .enumerate_arrays(false);

        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;

        std::fs::write(&config_path, serialized).map_err(ConfigError::WriteError)?;
        Ok(())
    }

    /// Re-read the file: returns `Some(new_config)` if it changed, `None` otherwise.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE_NAME);
        let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
        let new_config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;

        if &new_config != self {
            log::info!("Config reloaded with changes");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }

    /// Reject settings the generator and mesh builder cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let t = &self.terrain;
        if t.width == 0 {
            return Err(ConfigError::Invalid("terrain.width must be positive".into()));
        }
        if !t.amplitude.is_finite() || t.amplitude < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "terrain.amplitude must be finite and non-negative, got {}",
                t.amplitude
            )));
        }
        for (name, value) in [
            ("frequency", t.frequency),
            ("moisture_frequency", t.moisture_frequency),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "terrain.{name} must be finite and positive, got {value}"
                )));
            }
        }
        if !t.offset_x.is_finite() || !t.offset_z.is_finite() {
            return Err(ConfigError::Invalid("terrain offsets must be finite".into()));
        }
        Ok(())
    }
}
