//! Configuration structs with defaults and RON persistence.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// File name used inside the config directory.
pub const CONFIG_FILE_NAME: &str = "config.ron";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Gravity field constants.
    pub field: FieldConfig,
    /// Trajectory prediction defaults.
    pub predictor: PredictorConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// Constants shared by every field query.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FieldConfig {
    /// Gravitational constant, scaled for gameplay units.
    pub gravitational_constant: f32,
    /// Ceiling on the magnitude of the summed force.
    pub max_force: f32,
    /// Finite-difference step for the surface gradient. Raise it for coarse
    /// baked maps.
    pub surface_probe_epsilon: f32,
}

/// Defaults for trajectory prediction.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PredictorConfig {
    /// Seconds per integration step.
    pub time_step: f32,
    /// Maximum number of predicted samples.
    pub max_steps: usize,
    /// Mass of the predicted body.
    pub mass: f32,
    /// Stop at the first surface contact.
    pub stop_on_collision: bool,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log filter override (e.g. "debug", "info,gravitas_field=trace").
    pub log_level: String,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            gravitational_constant: 667.4,
            max_force: 100_000.0,
            surface_probe_epsilon: 0.1,
        }
    }
}

impl Default for PredictorConfig {
    fn default() -> Self {
        Self {
            time_step: 0.1,
            max_steps: 100,
            mass: 1.0,
            stop_on_collision: true,
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

/// Platform config directory for Gravitas (`<config_dir>/gravitas`), if the
/// platform has one.
pub fn default_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("gravitas"))
}

fn read_config(config_path: &Path) -> Result<Config, ConfigError> {
    let contents = std::fs::read_to_string(config_path).map_err(|source| ConfigError::Read {
        path: config_path.to_path_buf(),
        source,
    })?;
    ron::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: config_path.to_path_buf(),
        source,
    })
}

impl Config {
    /// Loads `config.ron` from `config_dir`, or writes and returns the
    /// defaults if it does not exist yet.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE_NAME);

        if config_path.exists() {
            let config = read_config(&config_path)?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Writes the config to `config_dir/config.ron`, creating the directory.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(|source| ConfigError::Write {
            path: config_dir.to_path_buf(),
            source,
        })?;

        let config_path = config_dir.join(CONFIG_FILE_NAME);
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(2)
            .separate_tuple_members(true);
        let serialized = ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::Serialize)?;

        std::fs::write(&config_path, serialized).map_err(|source| ConfigError::Write {
            path: config_path.clone(),
            source,
        })
    }

    /// Re-reads the file. Returns `Some(new_config)` if it differs from `self`.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let new_config = read_config(&config_dir.join(CONFIG_FILE_NAME))?;

        if &new_config != self {
            log::info!("Config reloaded with changes");
            Ok(Some(new_config))
        } else {
            log::debug!("Config unchanged on reload");
            Ok(None)
        }
    }
}
