//! UV mapping into the shared 2x2 tile atlas.
//!
//! Each shape owns one quadrant of a single texture. Within a quadrant the
//! tile's corner UVs are rotated around the tile center by the cell's
//! quarter-turn count, so an asymmetric texture follows the raised feature.

use glam::Vec2;
use isoterra_terrain::TileShape;

/// Side length of one atlas quadrant in UV space.
pub const QUADRANT_SIZE: f32 = 0.5;

/// Unrotated corner UVs within a quadrant: upper-left, upper-right,
/// lower-right, lower-left.
pub const TILE_CORNER_UVS: [Vec2; 4] = [
    Vec2::new(0.0, QUADRANT_SIZE),
    Vec2::new(QUADRANT_SIZE, QUADRANT_SIZE),
    Vec2::new(QUADRANT_SIZE, 0.0),
    Vec2::new(0.0, 0.0),
];

/// Tile center within a quadrant.
pub const TILE_CENTER_UV: Vec2 = Vec2::new(QUADRANT_SIZE * 0.5, QUADRANT_SIZE * 0.5);

/// Lower-left origin of the quadrant owned by `shape`.
pub fn atlas_offset(shape: TileShape) -> Vec2 {
    match shape {
        TileShape::Flat => Vec2::new(0.0, 0.0),
        TileShape::Slope => Vec2::new(QUADRANT_SIZE, 0.0),
        TileShape::CornerUp => Vec2::new(0.0, QUADRANT_SIZE),
        TileShape::CornerDown => Vec2::new(QUADRANT_SIZE, QUADRANT_SIZE),
    }
}

/// Rotate `uv` clockwise around `center` by `turns` quarter turns.
///
/// One turn carries corner `i` of [`TILE_CORNER_UVS`] onto corner `i + 1`.
pub fn rotate_quarter_turns(uv: Vec2, center: Vec2, turns: u8) -> Vec2 {
    let mut d = uv - center;
    for _ in 0..turns % 4 {
        d = Vec2::new(d.y, -d.x);
    }
    center + d
}

/// UVs of one tile: corners in tile order plus the center.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TileUvs {
    /// Upper-left, upper-right, lower-right, lower-left.
    pub corners: [Vec2; 4],
    /// Tile center.
    pub center: Vec2,
}

/// Atlas UVs for a tile of `shape` rotated by `rotation` quarter turns.
pub fn tile_uvs(shape: TileShape, rotation: u8) -> TileUvs {
    let offset = atlas_offset(shape);
    TileUvs {
        corners: TILE_CORNER_UVS
            .map(|uv| offset + rotate_quarter_turns(uv, TILE_CENTER_UV, rotation)),
        center: offset + TILE_CENTER_UV,
    }
}
