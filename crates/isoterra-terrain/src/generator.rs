//! Field generator: noise-driven elevation with causal smoothing, plus an
//! independent moisture channel.
//!
//! Cells are produced in raster order (row-major, top-left origin). Each new
//! elevation is pulled to within one tier of every neighbor that already
//! exists (left, up-left, up, up-right), so any two 8-adjacent cells of the
//! finished field differ by at most one tier.

use std::time::Instant;

use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::field::{Cell, Field, FieldError, MOISTURE_LEVELS};
use crate::noise_source::{NoiseSource2D, SimplexNoise};

/// Widest elevation span the causal neighbors of a cell may cover.
pub const MAX_NEIGHBOR_SPAN: i32 = 2;

/// Parameters for field generation.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldParams {
    /// Peak-to-peak elevation range; raw elevation is `amplitude / 2 * noise`.
    pub amplitude: f64,
    /// Elevation noise step per cell. Default: 1/32.
    pub frequency: f64,
    /// Moisture noise step per cell. Default: 0.15.
    pub moisture_frequency: f64,
    /// Offset added to the elevation noise x coordinate.
    pub offset_x: f64,
    /// Offset added to the elevation noise z coordinate.
    pub offset_z: f64,
    /// Optional world seed. `None` keeps the default simplex permutation for
    /// both channels.
    pub seed: Option<u64>,
}

impl Default for FieldParams {
    fn default() -> Self {
        Self {
            amplitude: 15.0,
            frequency: 1.0 / 32.0,
            moisture_frequency: 0.15,
            offset_x: 0.0,
            offset_z: 0.0,
            seed: None,
        }
    }
}

/// Produces [`Field`]s from two noise channels.
pub struct FieldGenerator<N: NoiseSource2D = SimplexNoise> {
    params: FieldParams,
    elevation_noise: N,
    moisture_noise: N,
}

impl FieldGenerator<SimplexNoise> {
    /// Create a generator backed by simplex noise.
    ///
    /// With a seed, a `ChaCha8Rng` derives separate permutation seeds for the
    /// elevation and moisture channels.
    pub fn new(params: FieldParams) -> Self {
        let (elevation_seed, moisture_seed) = match params.seed {
            Some(seed) => {
                let mut rng = ChaCha8Rng::seed_from_u64(seed);
                (rng.next_u32(), rng.next_u32())
            }
            None => (SimplexNoise::DEFAULT_SEED, SimplexNoise::DEFAULT_SEED),
        };
        Self {
            params,
            elevation_noise: SimplexNoise::new(elevation_seed),
            moisture_noise: SimplexNoise::new(moisture_seed),
        }
    }
}

impl<N: NoiseSource2D> FieldGenerator<N> {
    /// Create a generator over caller-supplied noise sources.
    pub fn with_noise(params: FieldParams, elevation_noise: N, moisture_noise: N) -> Self {
        Self {
            params,
            elevation_noise,
            moisture_noise,
        }
    }

    /// Generation parameters.
    pub fn params(&self) -> &FieldParams {
        &self.params
    }

    /// Generate a `width * width` field.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::InvalidWidth`] before any work if `width == 0`,
    /// and [`FieldError::NeighborRangeExceeded`] if the smoothing invariant
    /// is ever found broken.
    pub fn generate(&self, width: usize) -> Result<Field, FieldError> {
        if width == 0 {
            return Err(FieldError::InvalidWidth(width));
        }
        let _span = tracing::debug_span!("generate_field", width, seed = ?self.params.seed).entered();
        let start = Instant::now();

        let mut cells: Vec<Cell> = Vec::with_capacity(width * width);
        let mut min_elevation = i32::MAX;
        let mut max_elevation = i32::MIN;

        for z in 0..width {
            for x in 0..width {
                let raw = self.raw_elevation(x, z);
                let neighbors = causal_neighbors(&cells, width, x, z);
                let elevation = smooth_elevation(raw, neighbors.as_slice(), x as u32, z as u32)?;

                min_elevation = min_elevation.min(elevation);
                max_elevation = max_elevation.max(elevation);

                let moisture = self.moisture(x, z);
                cells.push(Cell::new(x as u32, z as u32, elevation, moisture));
            }
        }

        tracing::debug!(
            width,
            min_elevation,
            max_elevation,
            elapsed_us = start.elapsed().as_micros() as u64,
            "field generated"
        );

        Ok(Field::from_parts(width, cells, min_elevation, max_elevation))
    }

    /// Unsmoothed elevation at `(x, z)`.
    pub fn raw_elevation(&self, x: usize, z: usize) -> i32 {
        let p = &self.params;
        let n = self
            .elevation_noise
            .get(p.offset_x + x as f64 * p.frequency, p.offset_z + z as f64 * p.frequency);
        (p.amplitude / 2.0 * n).floor() as i32
    }

    /// Discrete moisture at `(x, z)` in `[0, 5]`.
    ///
    /// The moisture channel samples with swapped axes so it stays decorrelated
    /// from elevation even when both channels share a seed.
    pub fn moisture(&self, x: usize, z: usize) -> u8 {
        let f = self.params.moisture_frequency;
        let n = self.moisture_noise.get(z as f64 * f, x as f64 * f);
        let levels = MOISTURE_LEVELS as f64;
        (levels * (n + 1.0) / 2.0).floor().clamp(0.0, levels - 1.0) as u8
    }
}

/// Up to four already-visited neighbors of a cell in raster order.
#[derive(Default)]
struct CausalNeighbors {
    values: [i32; 4],
    len: usize,
}

impl CausalNeighbors {
    fn push(&mut self, v: i32) {
        self.values[self.len] = v;
        self.len += 1;
    }

    fn as_slice(&self) -> &[i32] {
        &self.values[..self.len]
    }
}

/// Collect left, up-left, up and up-right elevations where they exist.
fn causal_neighbors(cells: &[Cell], width: usize, x: usize, z: usize) -> CausalNeighbors {
    let mut out = CausalNeighbors::default();
    let at = |cx: usize, cz: usize| cells[cz * width + cx].elevation;

    if x > 0 {
        out.push(at(x - 1, z));
    }
    if z > 0 {
        if x > 0 {
            out.push(at(x - 1, z - 1));
        }
        out.push(at(x, z - 1));
        if x + 1 < width {
            out.push(at(x + 1, z - 1));
        }
    }
    out
}

/// Pull `raw` to within one tier of every value in `neighbors`.
///
/// With no neighbors the raw value is kept.
///
/// # Errors
///
/// Returns [`FieldError::NeighborRangeExceeded`] if the neighbors span more
/// than [`MAX_NEIGHBOR_SPAN`] tiers.
pub fn smooth_elevation(raw: i32, neighbors: &[i32], x: u32, z: u32) -> Result<i32, FieldError> {
    let Some(&first) = neighbors.first() else {
        return Ok(raw);
    };
    let (min, max) = neighbors
        .iter()
        .fold((first, first), |(lo, hi), &v| (lo.min(v), hi.max(v)));

    if max - min > MAX_NEIGHBOR_SPAN {
        return Err(FieldError::NeighborRangeExceeded { x, z, min, max });
    }

    Ok(raw.clamp(max - 1, min + 1))
}
