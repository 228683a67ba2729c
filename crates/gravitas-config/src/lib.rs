//! Configuration for the Gravitas field engine.
//!
//! Field constants, trajectory-prediction defaults, and logging settings
//! persist to disk as a RON file. Command-line flags override loaded values.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{
    CONFIG_FILE_NAME, Config, DebugConfig, FieldConfig, PredictorConfig, default_config_dir,
};
pub use error::ConfigError;
