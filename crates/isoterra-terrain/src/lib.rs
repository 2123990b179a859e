//! Terrain field synthesis: noise-driven elevation with causal smoothing,
//! discrete moisture, and the biome table used to color cells.

mod field;
mod generator;
mod noise_source;

pub mod biome;

pub use biome::{BiomeTable, BiomeTableError, BiomeZone, standard_zones};
pub use field::{Cell, ELEVATION_TIERS, Field, FieldError, MOISTURE_LEVELS, TileShape};
pub use generator::{FieldGenerator, FieldParams, MAX_NEIGHBOR_SPAN, smooth_elevation};
pub use noise_source::{NoiseSource2D, SimplexNoise};
