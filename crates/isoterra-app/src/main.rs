//! `isoterra`: generate a terrain field once and build its mesh.
//!
//! Configuration is loaded from `config.ron` and can be overridden via CLI
//! flags, e.g. `isoterra --width 128 --seed 7`.

mod pipeline;

use std::process::ExitCode;

use clap::Parser;
use isoterra_config::{CliArgs, Config};

fn main() -> ExitCode {
    let args = CliArgs::parse();

    let config_dir = match args.config.clone() {
        Some(dir) => dir,
        None => match Config::default_dir() {
            Ok(dir) => dir,
            Err(e) => {
                eprintln!("{e}");
                return ExitCode::FAILURE;
            }
        },
    };

    let mut config = match Config::load_or_create(&config_dir) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config from {}: {e}", config_dir.display());
            return ExitCode::FAILURE;
        }
    };
    config.apply_cli_overrides(&args);
    if let Err(e) = config.validate() {
        eprintln!("{e}");
        return ExitCode::FAILURE;
    }

    let log_dir = config_dir.join("logs");
    isoterra_log::init_logging(Some(&log_dir), cfg!(debug_assertions), Some(&config));

    match pipeline::run(&config) {
        Ok(summary) => {
            tracing::info!(
                width = summary.width,
                vertices = summary.vertices,
                min_elevation = summary.min_elevation,
                max_elevation = summary.max_elevation,
                flat = summary.shape_counts[0],
                slope = summary.shape_counts[1],
                corner_up = summary.shape_counts[2],
                corner_down = summary.shape_counts[3],
                "terrain ready"
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(internal = e.is_internal(), "{e}");
            ExitCode::FAILURE
        }
    }
}
