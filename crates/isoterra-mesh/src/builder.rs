//! Mesh assembly: turns a [`Field`] into a centered, non-indexed triangle
//! list with one four-triangle fan per cell.
//!
//! Per-cell work reads only the immutable field, so rows are filled
//! independently. The output buffers are pre-sized (twelve vertices per
//! cell) and split into disjoint per-row slices before any worker starts.

use std::f32::consts::FRAC_1_SQRT_2;
use std::time::Instant;

use glam::{Vec2, Vec3};
use isoterra_terrain::{BiomeTable, Field, MOISTURE_LEVELS, TileShape};

use crate::atlas::tile_uvs;
use crate::classify::{TileClass, Unclassified, classify};
use crate::neighborhood::Neighborhood;
use crate::terrain_mesh::{TRIANGLES_PER_CELL, TerrainMesh, VERTICES_PER_CELL};

/// Vertical scale applied to tile heights so slopes keep a consistent grade
/// against the unit cell pitch.
pub const HEIGHT_SCALE: f32 = FRAC_1_SQRT_2;

/// Errors raised while building a mesh.
#[derive(Debug, thiserror::Error)]
pub enum MeshError {
    /// The grid width must be positive.
    #[error("invalid grid width {0}: width must be positive")]
    InvalidWidth(usize),

    /// The field does not hold `width * width` cells.
    #[error("cell count mismatch: width {width} needs {expected} cells, field has {actual}")]
    CellCountMismatch {
        /// Requested width.
        width: usize,
        /// `width * width`.
        expected: usize,
        /// Cells in the field.
        actual: usize,
    },

    /// A cell coordinate lies outside the field.
    #[error("cell ({x}, {z}) is outside a field of width {width}")]
    OutOfGrid {
        /// Column.
        x: u32,
        /// Row.
        z: u32,
        /// Field width.
        width: usize,
    },

    /// A cell's neighborhood falls outside the classification table.
    #[error("cell ({x}, {z}) cannot be classified: {reason}")]
    Unclassifiable {
        /// Column.
        x: u32,
        /// Row.
        z: u32,
        /// Which configuration was found.
        #[source]
        reason: Unclassified,
    },
}

impl MeshError {
    /// Returns `true` for defects in the generated data rather than invalid
    /// caller input.
    pub fn is_internal(&self) -> bool {
        matches!(self, Self::Unclassifiable { .. })
    }
}

/// Options for [`MeshBuilder`].
#[derive(Clone, Debug, PartialEq)]
pub struct MeshOptions {
    /// Worker threads for [`MeshBuilder::build_parallel`]; 0 uses one per
    /// logical CPU.
    pub workers: usize,
    /// Emit unclassifiable cells (pits, valleys, lone diagonal ridges) as
    /// flat tiles. When off, the first such cell aborts the build.
    pub flatten_unclassified: bool,
    /// Translate positions so the grid center sits at the origin.
    pub center: bool,
}

impl Default for MeshOptions {
    fn default() -> Self {
        Self {
            workers: 0,
            flatten_unclassified: true,
            center: true,
        }
    }
}

/// One emitted vertex.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vertex {
    /// Position.
    pub position: Vec3,
    /// Face normal of the owning triangle.
    pub normal: Vec3,
    /// Atlas UV.
    pub uv: Vec2,
    /// Biome color.
    pub color: [f32; 3],
}

/// The twelve vertices of one cell plus its shape.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CellTile {
    /// Shape the cell was rendered with.
    pub shape: TileShape,
    /// Quarter-turn rotation.
    pub rotation: u8,
    /// Four triangles, three vertices each.
    pub vertices: [Vertex; VERTICES_PER_CELL],
}

/// Unit normal of triangle `(a, b, c)` following the right-hand rule.
///
/// Degenerate triangles yield `+Y`.
pub fn face_normal(a: Vec3, b: Vec3, c: Vec3) -> Vec3 {
    (b - a).cross(c - a).try_normalize().unwrap_or(Vec3::Y)
}

/// Mutable output slices for one grid row.
struct RowSlots<'m> {
    z: u32,
    positions: &'m mut [[f32; 3]],
    normals: &'m mut [[f32; 3]],
    uvs: &'m mut [[f32; 2]],
    colors: &'m mut [[f32; 3]],
    shapes: &'m mut [TileShape],
}

/// Builds [`TerrainMesh`]es from fields.
pub struct MeshBuilder<'a> {
    options: MeshOptions,
    biomes: &'a BiomeTable,
}

impl MeshBuilder<'static> {
    /// Builder coloring cells from the reference biome table.
    pub fn new(options: MeshOptions) -> Self {
        Self {
            options,
            biomes: BiomeTable::standard(),
        }
    }
}

impl<'a> MeshBuilder<'a> {
    /// Builder coloring cells from a custom biome table.
    pub fn with_biomes(options: MeshOptions, biomes: &'a BiomeTable) -> Self {
        Self { options, biomes }
    }

    /// Builder options.
    pub fn options(&self) -> &MeshOptions {
        &self.options
    }

    /// Build the mesh on the calling thread.
    ///
    /// # Errors
    ///
    /// [`MeshError::InvalidWidth`] and [`MeshError::CellCountMismatch`] are
    /// reported before any geometry is emitted. [`MeshError::Unclassifiable`]
    /// aborts the build unless `flatten_unclassified` is set.
    pub fn build(&self, width: usize, field: &Field) -> Result<TerrainMesh, MeshError> {
        self.build_with_workers(width, field, 1)
    }

    /// Build the mesh with a pool of scoped worker threads.
    ///
    /// The output is identical to [`build`](Self::build), including which
    /// error is reported when several cells fail.
    ///
    /// # Errors
    ///
    /// Same as [`build`](Self::build).
    pub fn build_parallel(&self, width: usize, field: &Field) -> Result<TerrainMesh, MeshError> {
        let requested = match self.options.workers {
            0 => num_cpus::get(),
            n => n,
        };
        self.build_with_workers(width, field, requested.clamp(1, width.max(1)))
    }

    fn build_with_workers(
        &self,
        width: usize,
        field: &Field,
        workers: usize,
    ) -> Result<TerrainMesh, MeshError> {
        validate(width, field)?;
        let _span = tracing::info_span!("build_mesh", width, workers).entered();
        let start = Instant::now();

        let mut mesh = TerrainMesh::with_cells(width * width);
        let row_vertices = width * VERTICES_PER_CELL;

        {
            let mut rows: Vec<RowSlots<'_>> = mesh
                .positions
                .chunks_mut(row_vertices)
                .zip(mesh.normals.chunks_mut(row_vertices))
                .zip(mesh.uvs.chunks_mut(row_vertices))
                .zip(mesh.colors.chunks_mut(row_vertices))
                .zip(mesh.shapes.chunks_mut(width))
                .enumerate()
                .map(|(z, ((((positions, normals), uvs), colors), shapes))| RowSlots {
                    z: z as u32,
                    positions,
                    normals,
                    uvs,
                    colors,
                    shapes,
                })
                .collect();

            if workers <= 1 {
                for row in &mut rows {
                    self.fill_row(field, width, row)?;
                }
            } else {
                let per_worker = rows.len().div_ceil(workers);
                std::thread::scope(|scope| {
                    let handles: Vec<_> = rows
                        .chunks_mut(per_worker)
                        .map(|group| {
                            scope.spawn(move || -> Result<(), MeshError> {
                                for row in group.iter_mut() {
                                    self.fill_row(field, width, row)?;
                                }
                                Ok(())
                            })
                        })
                        .collect();

                    // Groups are in row order, so the first error kept is the
                    // same one a serial build reports.
                    let mut result = Ok(());
                    for handle in handles {
                        let outcome = match handle.join() {
                            Ok(outcome) => outcome,
                            Err(payload) => std::panic::resume_unwind(payload),
                        };
                        if result.is_ok() {
                            result = outcome;
                        }
                    }
                    result
                })?;
            }
        }

        let [flat, slope, corner_up, corner_down] = mesh.shape_counts();
        tracing::debug!(
            vertices = mesh.vertex_count(),
            flat,
            slope,
            corner_up,
            corner_down,
            elapsed_us = start.elapsed().as_micros() as u64,
            "mesh built"
        );
        Ok(mesh)
    }

    fn fill_row(&self, field: &Field, width: usize, row: &mut RowSlots<'_>) -> Result<(), MeshError> {
        for x in 0..width {
            let tile = self.build_cell(field, x as u32, row.z)?;
            let base = x * VERTICES_PER_CELL;
            for (i, v) in tile.vertices.iter().enumerate() {
                row.positions[base + i] = v.position.to_array();
                row.normals[base + i] = v.normal.to_array();
                row.uvs[base + i] = v.uv.to_array();
                row.colors[base + i] = v.color;
            }
            row.shapes[x] = tile.shape;
        }
        Ok(())
    }

    /// Classify and assemble a single cell.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::OutOfGrid`] if `(x, z)` lies outside the field,
    /// and [`MeshError::Unclassifiable`] when the neighborhood is outside the
    /// classification table and `flatten_unclassified` is off.
    pub fn build_cell(&self, field: &Field, x: u32, z: u32) -> Result<CellTile, MeshError> {
        let width = field.width();
        let (Some(cell), Some(neighborhood)) = (
            field.cell(x as i64, z as i64),
            Neighborhood::from_field(field, x, z),
        ) else {
            return Err(MeshError::OutOfGrid { x, z, width });
        };

        let class = match classify(&neighborhood) {
            Ok(class) => class,
            Err(reason) if self.options.flatten_unclassified => {
                tracing::trace!(x, z, %reason, "flattening unclassifiable cell");
                TileClass::FLAT
            }
            Err(reason) => return Err(MeshError::Unclassifiable { x, z, reason }),
        };

        let heights = class.heights(&neighborhood).scaled(HEIGHT_SCALE);

        let tier = field.elevation_tier(cell.elevation);
        let moisture = cell.moisture.min(MOISTURE_LEVELS - 1);
        let color = self.biomes.lookup(tier, moisture).color_rgb();

        let uvs = tile_uvs(class.shape, class.rotation);

        let shift = if self.options.center {
            -(width as f32) * 0.5
        } else {
            0.0
        };
        let fx = x as f32 + shift;
        let fz = z as f32 + shift;
        let corners = [
            Vec3::new(fx, heights.corners[0], fz),
            Vec3::new(fx + 1.0, heights.corners[1], fz),
            Vec3::new(fx + 1.0, heights.corners[2], fz + 1.0),
            Vec3::new(fx, heights.corners[3], fz + 1.0),
        ];
        let center = Vec3::new(fx + 0.5, heights.center, fz + 0.5);

        let mut vertices = [Vertex::default(); VERTICES_PER_CELL];
        for tri in 0..TRIANGLES_PER_CELL {
            // center -> next corner -> this corner, clockwise from upper-left
            let (a, b) = ((tri + 1) % 4, tri);
            let normal = face_normal(center, corners[a], corners[b]);
            let fan = [
                (center, uvs.center),
                (corners[a], uvs.corners[a]),
                (corners[b], uvs.corners[b]),
            ];
            for (k, (position, uv)) in fan.into_iter().enumerate() {
                vertices[tri * 3 + k] = Vertex {
                    position,
                    normal,
                    uv,
                    color,
                };
            }
        }

        Ok(CellTile {
            shape: class.shape,
            rotation: class.rotation,
            vertices,
        })
    }
}

fn validate(width: usize, field: &Field) -> Result<(), MeshError> {
    if width == 0 {
        return Err(MeshError::InvalidWidth(width));
    }
    let expected = width * width;
    if field.cells().len() != expected || field.width() != width {
        return Err(MeshError::CellCountMismatch {
            width,
            expected,
            actual: field.cells().len(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use isoterra_terrain::{Cell, FieldGenerator, FieldParams};

    const EPSILON: f32 = 1e-6;

    fn field_from_rows(rows: &[&[i32]]) -> Field {
        let width = rows.len();
        let cells = rows
            .iter()
            .enumerate()
            .flat_map(|(z, row)| {
                row.iter()
                    .enumerate()
                    .map(move |(x, &e)| Cell::new(x as u32, z as u32, e, 0))
            })
            .collect();
        Field::from_cells(width, cells).unwrap()
    }

    fn generated(width: usize, seed: u64) -> Field {
        FieldGenerator::new(FieldParams {
            seed: Some(seed),
            amplitude: 24.0,
            ..Default::default()
        })
        .generate(width)
        .unwrap()
    }

    fn lenient() -> MeshBuilder<'static> {
        MeshBuilder::new(MeshOptions::default())
    }

    fn strict(workers: usize) -> MeshBuilder<'static> {
        MeshBuilder::new(MeshOptions {
            workers,
            flatten_unclassified: false,
            ..Default::default()
        })
    }

    #[test]
    fn test_flat_field_is_all_flat_with_up_normals() {
        let field = field_from_rows(&[&[3; 4], &[3; 4], &[3; 4], &[3; 4]]);
        let mesh = MeshBuilder::new(MeshOptions::default())
            .build(4, &field)
            .unwrap();

        assert_eq!(mesh.vertex_count(), 12 * 16);
        assert_eq!(mesh.shape_counts(), [16, 0, 0, 0]);
        for n in &mesh.normals {
            assert_eq!(*n, [0.0, 1.0, 0.0]);
        }
        for p in &mesh.positions {
            assert!((p[1] - 3.0 * HEIGHT_SCALE).abs() < EPSILON);
        }
    }

    #[test]
    fn test_two_by_two_zero_field() {
        let cells = (0..4).map(|i| Cell::new(i % 2, i / 2, 0, 0)).collect();
        let field = Field::from_cells(2, cells).unwrap();
        let mesh = MeshBuilder::new(MeshOptions::default())
            .build(2, &field)
            .unwrap();

        assert_eq!(mesh.vertex_count(), 48);
        assert_eq!(mesh.shapes, vec![TileShape::Flat; 4]);
        assert!(mesh.normals.iter().all(|n| *n == [0.0, 1.0, 0.0]));

        let expected = BiomeTable::standard().lookup(0, 0).color_rgb();
        assert!(mesh.colors.iter().all(|c| *c == expected));
    }

    #[test]
    fn test_slope_cell_lifts_center_half_a_tier() {
        let field = field_from_rows(&[&[1, 1, 1], &[0, 0, 0], &[0, 0, 0]]);
        let builder = MeshBuilder::new(MeshOptions::default());
        let tile = builder.build_cell(&field, 1, 1).unwrap();

        assert_eq!(tile.shape, TileShape::Slope);
        assert_eq!(tile.rotation, 0);
        // first vertex of every triangle is the center
        for tri in 0..4 {
            let center = tile.vertices[tri * 3].position;
            assert!((center.y - 0.5 * HEIGHT_SCALE).abs() < EPSILON);
        }
        // the top edge (upper-left and upper-right) is raised one tier
        let raised = tile
            .vertices
            .iter()
            .filter(|v| (v.position.y - HEIGHT_SCALE).abs() < EPSILON)
            .count();
        // upper-right appears in triangles 0 and 1, upper-left in 0 and 3
        assert_eq!(raised, 4);
    }

    #[test]
    fn test_corner_down_notch() {
        let field = field_from_rows(&[&[1, 1, 0], &[1, 0, 0], &[0, 0, 0]]);
        let mesh = MeshBuilder::new(MeshOptions::default())
            .build(3, &field)
            .unwrap();
        assert_eq!(mesh.shapes[4], TileShape::CornerDown);
        assert_eq!(mesh.shapes[2], TileShape::Slope);
        assert_eq!(mesh.shapes[7], TileShape::CornerUp);
        assert_eq!(mesh.shapes[5], TileShape::CornerUp);
        assert_eq!(mesh.shapes[8], TileShape::Flat);

        let tile = MeshBuilder::new(MeshOptions::default())
            .build_cell(&field, 1, 1)
            .unwrap();
        assert!((tile.vertices[0].position.y - HEIGHT_SCALE).abs() < EPSILON);
    }

    #[test]
    fn test_pit_is_unclassifiable() {
        let field = field_from_rows(&[&[1, 1, 1], &[1, 0, 1], &[1, 1, 1]]);
        let err = strict(1).build(3, &field).unwrap_err();
        assert!(err.is_internal());
        assert!(matches!(
            err,
            MeshError::Unclassifiable {
                x: 1,
                z: 1,
                reason: Unclassified::TooManySides { count: 4, .. }
            }
        ));
    }

    #[test]
    fn test_default_options_flatten_unclassified() {
        assert!(MeshOptions::default().flatten_unclassified);
    }

    #[test]
    fn test_default_options_mesh_every_generated_cell() {
        let width = 64;
        for seed in [None, Some(1), Some(2), Some(3), Some(4), Some(5), Some(6), Some(7)] {
            let field = FieldGenerator::new(FieldParams {
                seed,
                ..Default::default()
            })
            .generate(width)
            .unwrap();
            let mesh = MeshBuilder::new(MeshOptions::default())
                .build(width, &field)
                .unwrap_or_else(|e| panic!("seed {seed:?}: {e}"));
            assert_eq!(mesh.vertex_count(), 12 * width * width);
            assert_eq!(mesh.shape_counts().iter().sum::<usize>(), width * width);
        }
    }

    #[test]
    fn test_strict_build_rejects_generated_pits() {
        // a default 64-wide field contains at least one uncovered configuration
        let field = FieldGenerator::new(FieldParams::default())
            .generate(64)
            .unwrap();
        let strict_result = strict(1).build(64, &field);
        let uncovered = (0..64u32)
            .flat_map(|z| (0..64u32).map(move |x| (x, z)))
            .filter(|&(x, z)| {
                let n = Neighborhood::from_field(&field, x, z).unwrap();
                classify(&n).is_err()
            })
            .count();
        if uncovered == 0 {
            assert!(strict_result.is_ok());
        } else {
            assert!(matches!(strict_result, Err(MeshError::Unclassifiable { .. })));
        }
    }

    #[test]
    fn test_build_cell_outside_grid_is_an_error() {
        let field = field_from_rows(&[&[0, 0], &[0, 0]]);
        let builder = lenient();
        for (x, z) in [(2, 0), (0, 2), (5, 5)] {
            let err = builder.build_cell(&field, x, z).unwrap_err();
            assert!(matches!(err, MeshError::OutOfGrid { width: 2, .. }));
            assert!(!err.is_internal());
        }
    }

    #[test]
    fn test_flatten_unclassified_emits_flat_tile() {
        let field = field_from_rows(&[&[1, 1, 1], &[1, 0, 1], &[1, 1, 1]]);
        let mesh = lenient().build(3, &field).unwrap();
        assert_eq!(mesh.shapes[4], TileShape::Flat);
        assert_eq!(mesh.vertex_count(), 12 * 9);
    }

    #[test]
    fn test_configuration_errors_precede_geometry() {
        let field = field_from_rows(&[&[0, 0], &[0, 0]]);
        let builder = MeshBuilder::new(MeshOptions::default());
        assert!(matches!(
            builder.build(0, &field),
            Err(MeshError::InvalidWidth(0))
        ));
        let err = builder.build(3, &field).unwrap_err();
        assert!(!err.is_internal());
        assert!(matches!(
            err,
            MeshError::CellCountMismatch {
                width: 3,
                expected: 9,
                actual: 4
            }
        ));
    }

    #[test]
    fn test_vertex_count_for_generated_fields() {
        for width in [1, 5, 16, 31] {
            let field = generated(width, width as u64);
            let mesh = lenient().build(width, &field).unwrap();
            assert_eq!(mesh.vertex_count(), 12 * width * width);
            assert_eq!(mesh.normals.len(), mesh.vertex_count());
            assert_eq!(mesh.uvs.len(), mesh.vertex_count());
            assert_eq!(mesh.colors.len(), mesh.vertex_count());
            assert_eq!(mesh.shapes.len(), width * width);
        }
    }

    #[test]
    fn test_build_is_idempotent() {
        let field = generated(20, 5);
        let builder = lenient();
        let a = builder.build(20, &field).unwrap();
        let b = builder.build(20, &field).unwrap();
        assert_eq!(a.positions_bytes(), b.positions_bytes());
        assert_eq!(a.normals_bytes(), b.normals_bytes());
        assert_eq!(a.uvs_bytes(), b.uvs_bytes());
        assert_eq!(a.colors_bytes(), b.colors_bytes());
    }

    #[test]
    fn test_parallel_matches_serial() {
        let field = generated(33, 11);
        let builder = MeshBuilder::new(MeshOptions {
            workers: 4,
            flatten_unclassified: true,
            center: true,
        });
        let serial = builder.build(33, &field).unwrap();
        let parallel = builder.build_parallel(33, &field).unwrap();
        assert_eq!(serial, parallel);
    }

    #[test]
    fn test_parallel_reports_first_error_in_row_order() {
        let mut rows: Vec<Vec<i32>> = vec![vec![1; 6]; 6];
        rows[1][1] = 0;
        rows[4][4] = 0;
        let refs: Vec<&[i32]> = rows.iter().map(|r| r.as_slice()).collect();
        let field = field_from_rows(&refs);

        let builder = strict(3);
        for result in [builder.build(6, &field), builder.build_parallel(6, &field)] {
            assert!(matches!(
                result,
                Err(MeshError::Unclassifiable { x: 1, z: 1, .. })
            ));
        }
    }

    #[test]
    fn test_positions_are_centered() {
        let width = 8;
        let field = generated(width, 2);
        let mesh = lenient().build(width, &field).unwrap();
        let half = width as f32 / 2.0;
        let (mut min_x, mut max_x) = (f32::MAX, f32::MIN);
        for p in &mesh.positions {
            min_x = min_x.min(p[0]);
            max_x = max_x.max(p[0]);
            assert!(p[2] >= -half && p[2] <= half);
        }
        assert_eq!(min_x, -half);
        assert_eq!(max_x, half);
    }

    #[test]
    fn test_uncentered_positions_start_at_origin() {
        let field = field_from_rows(&[&[0, 0], &[0, 0]]);
        let mesh = MeshBuilder::new(MeshOptions {
            center: false,
            ..Default::default()
        })
        .build(2, &field)
        .unwrap();
        assert!(mesh.positions.iter().all(|p| p[0] >= 0.0 && p[2] >= 0.0));
        assert!(mesh.positions.iter().any(|p| p[0] == 2.0));
    }

    #[test]
    fn test_normals_are_unit_length_and_upward() {
        let field = generated(24, 9);
        let mesh = lenient().build(24, &field).unwrap();
        for n in &mesh.normals {
            let v = Vec3::from_array(*n);
            assert!((v.length() - 1.0).abs() < 1e-5);
            assert!(v.y > 0.0, "terrain faces should point upward, got {v}");
        }
    }

    #[test]
    fn test_face_normal_degenerate_falls_back_to_up() {
        let p = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(face_normal(p, p, p), Vec3::Y);
    }

    #[test]
    fn test_custom_biome_table_colors() {
        use isoterra_terrain::BiomeZone;

        let zones: Vec<BiomeZone> = (0..4)
            .map(|tier| BiomeZone::new("mono", tier, (0, 5), 0x0000FF))
            .collect();
        let table = BiomeTable::from_zones(&zones).unwrap();
        let field = generated(6, 1);
        let mesh = MeshBuilder::with_biomes(
            MeshOptions {
                flatten_unclassified: true,
                ..Default::default()
            },
            &table,
        )
        .build(6, &field)
        .unwrap();
        assert!(mesh.colors.iter().all(|c| *c == [0.0, 0.0, 1.0]));
    }
}
