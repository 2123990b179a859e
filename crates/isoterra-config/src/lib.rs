//! Configuration for the terrain pipeline.
//!
//! Settings persist to disk as `config.ron`, every section falls back to its
//! defaults when missing, and command-line flags override whatever was loaded.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{APP_DIR_NAME, CONFIG_FILE_NAME, Config, DebugConfig, MeshConfig, TerrainConfig};
pub use error::ConfigError;
