//! 3x3 elevation neighborhood of a cell.
//!
//! Index conventions used throughout the crate:
//!
//! | index | side   | corner      |
//! |-------|--------|-------------|
//! | 0     | left   | upper-left  |
//! | 1     | top    | upper-right |
//! | 2     | right  | lower-right |
//! | 3     | bottom | lower-left  |
//!
//! Both sequences run clockwise when viewed from above with the grid origin
//! at the top-left, so side `i` spans corners `i - 1` and `i` (mod 4), and
//! sides `i` and `i + 1` share corner `i`.

use isoterra_terrain::Field;

/// Grid offsets `(dx, dz)` of the four sides.
pub const SIDE_OFFSETS: [(i64, i64); 4] = [(-1, 0), (0, -1), (1, 0), (0, 1)];

/// Grid offsets `(dx, dz)` of the four diagonal corners.
pub const CORNER_OFFSETS: [(i64, i64); 4] = [(-1, -1), (1, -1), (1, 1), (-1, 1)];

/// The two tile corners touching each side.
pub const SIDE_CORNERS: [[usize; 2]; 4] = [[0, 3], [0, 1], [1, 2], [2, 3]];

/// Center elevation plus its eight neighbors.
///
/// Neighbors outside the grid take the center's elevation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Neighborhood {
    /// Elevation of the cell itself.
    pub center: i32,
    /// Left, top, right, bottom.
    pub sides: [i32; 4],
    /// Upper-left, upper-right, lower-right, lower-left.
    pub corners: [i32; 4],
}

impl Neighborhood {
    /// A neighborhood where every neighbor sits at `center`.
    pub fn uniform(center: i32) -> Self {
        Self {
            center,
            sides: [center; 4],
            corners: [center; 4],
        }
    }

    /// Sample the neighborhood of `(x, z)` from a field, or `None` if the
    /// cell itself lies outside the grid.
    pub fn from_field(field: &Field, x: u32, z: u32) -> Option<Self> {
        let (x, z) = (x as i64, z as i64);
        let center = field.elevation_at(x, z)?;
        let sample = |(dx, dz): (i64, i64)| field.elevation_at(x + dx, z + dz).unwrap_or(center);

        Some(Self {
            center,
            sides: SIDE_OFFSETS.map(sample),
            corners: CORNER_OFFSETS.map(sample),
        })
    }

    /// Bit `i` set when side `i` is strictly higher than the center.
    pub fn higher_sides(&self) -> u8 {
        higher_mask(self.center, &self.sides)
    }

    /// Bit `i` set when corner `i` is strictly higher than the center.
    pub fn higher_corners(&self) -> u8 {
        higher_mask(self.center, &self.corners)
    }
}

fn higher_mask(center: i32, values: &[i32; 4]) -> u8 {
    values
        .iter()
        .enumerate()
        .filter(|&(_, &v)| v > center)
        .fold(0u8, |mask, (i, _)| mask | (1 << i))
}
