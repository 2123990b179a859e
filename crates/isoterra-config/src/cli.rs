//! Command-line argument parsing.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// Isoterra command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "isoterra", about = "Isometric terrain field and mesh generator")]
pub struct CliArgs {
    /// Cells per side of the grid.
    #[arg(long)]
    pub width: Option<usize>,

    /// Peak-to-peak elevation range.
    #[arg(long)]
    pub amplitude: Option<f64>,

    /// World seed.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Mesh worker threads (0 = one per logical CPU).
    #[arg(long)]
    pub workers: Option<usize>,

    /// Render unclassifiable cells flat (`false` fails on the first one).
    #[arg(long)]
    pub flatten_unclassified: Option<bool>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(w) = args.width {
            self.terrain.width = w;
        }
        if let Some(a) = args.amplitude {
            self.terrain.amplitude = a;
        }
        if let Some(seed) = args.seed {
            self.terrain.seed = Some(seed);
        }
        if let Some(workers) = args.workers {
            self.mesh.workers = workers;
        }
        if let Some(flatten) = args.flatten_unclassified {
            self.mesh.flatten_unclassified = flatten;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}
