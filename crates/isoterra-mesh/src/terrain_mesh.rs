//! Terrain mesh output: four parallel, non-indexed vertex attribute buffers.
//!
//! Every triangle owns its three vertices, so each face carries its own
//! normal and UVs even where it meets a neighboring face.

use isoterra_terrain::TileShape;

/// Triangles emitted per cell.
pub const TRIANGLES_PER_CELL: usize = 4;

/// Vertices emitted per cell.
pub const VERTICES_PER_CELL: usize = TRIANGLES_PER_CELL * 3;

/// The assembled triangle list.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TerrainMesh {
    /// Vertex positions, centered on the grid.
    pub positions: Vec<[f32; 3]>,
    /// Flat face normals, one per vertex.
    pub normals: Vec<[f32; 3]>,
    /// Atlas texture coordinates.
    pub uvs: Vec<[f32; 2]>,
    /// Biome colors in `[0, 1]`.
    pub colors: Vec<[f32; 3]>,
    /// Shape of each cell, row-major.
    pub shapes: Vec<TileShape>,
}

impl TerrainMesh {
    /// A zero-filled mesh sized for `cells` cells.
    pub fn with_cells(cells: usize) -> Self {
        let vertices = cells * VERTICES_PER_CELL;
        Self {
            positions: vec![[0.0; 3]; vertices],
            normals: vec![[0.0; 3]; vertices],
            uvs: vec![[0.0; 2]; vertices],
            colors: vec![[0.0; 3]; vertices],
            shapes: vec![TileShape::Flat; cells],
        }
    }

    /// Number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Number of triangles.
    pub fn triangle_count(&self) -> usize {
        self.positions.len() / 3
    }

    /// Cells per shape, indexed by [`TileShape::index`].
    pub fn shape_counts(&self) -> [usize; 4] {
        let mut counts = [0; 4];
        for shape in &self.shapes {
            counts[shape.index()] += 1;
        }
        counts
    }

    /// Positions as a flat `x, y, z, x, y, z, ...` slice.
    pub fn positions_flat(&self) -> &[f32] {
        bytemuck::cast_slice(&self.positions)
    }

    /// Normals as a flat slice.
    pub fn normals_flat(&self) -> &[f32] {
        bytemuck::cast_slice(&self.normals)
    }

    /// UVs as a flat `u, v, u, v, ...` slice.
    pub fn uvs_flat(&self) -> &[f32] {
        bytemuck::cast_slice(&self.uvs)
    }

    /// Colors as a flat `r, g, b, ...` slice.
    pub fn colors_flat(&self) -> &[f32] {
        bytemuck::cast_slice(&self.colors)
    }

    /// Position buffer contents for GPU upload.
    pub fn positions_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.positions)
    }

    /// Normal buffer contents for GPU upload.
    pub fn normals_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.normals)
    }

    /// UV buffer contents for GPU upload.
    pub fn uvs_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.uvs)
    }

    /// Color buffer contents for GPU upload.
    pub fn colors_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.colors)
    }
}
