//! Isometric terrain meshing: neighborhood classification into four tile
//! shapes, atlas UVs, and assembly of the final triangle list.

pub mod atlas;
pub mod builder;
pub mod classify;
pub mod neighborhood;
pub mod terrain_mesh;

pub use atlas::{QUADRANT_SIZE, TileUvs, atlas_offset, rotate_quarter_turns, tile_uvs};
pub use builder::{
    CellTile, HEIGHT_SCALE, MeshBuilder, MeshError, MeshOptions, Vertex, face_normal,
};
pub use classify::{TileClass, TileHeights, Unclassified, classify, classify_masks};
pub use neighborhood::{CORNER_OFFSETS, Neighborhood, SIDE_CORNERS, SIDE_OFFSETS};
pub use terrain_mesh::{TRIANGLES_PER_CELL, TerrainMesh, VERTICES_PER_CELL};
