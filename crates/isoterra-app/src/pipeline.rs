//! Generate-once pipeline: field, mesh, shapes recorded back on the field.

use isoterra_config::{Config, MeshConfig, TerrainConfig};
use isoterra_mesh::{MeshBuilder, MeshError, MeshOptions, TerrainMesh};
use isoterra_terrain::{Field, FieldError, FieldGenerator, FieldParams};

/// Errors from a pipeline run.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Field generation failed.
    #[error("field generation failed: {0}")]
    Field(#[from] FieldError),

    /// Mesh building failed.
    #[error("mesh build failed: {0}")]
    Mesh(#[from] MeshError),
}

impl PipelineError {
    /// Returns `true` when the failure is a defect rather than bad input.
    pub fn is_internal(&self) -> bool {
        match self {
            Self::Field(e) => e.is_internal(),
            Self::Mesh(e) => e.is_internal(),
        }
    }
}

/// Numbers worth reporting after a run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub width: usize,
    pub vertices: usize,
    pub min_elevation: i32,
    pub max_elevation: i32,
    pub shape_counts: [usize; 4],
}

pub fn field_params(terrain: &TerrainConfig) -> FieldParams {
    FieldParams {
        amplitude: terrain.amplitude,
        frequency: terrain.frequency,
        moisture_frequency: terrain.moisture_frequency,
        offset_x: terrain.offset_x,
        offset_z: terrain.offset_z,
        seed: terrain.seed,
    }
}

pub fn mesh_options(mesh: &MeshConfig) -> MeshOptions {
    MeshOptions {
        workers: mesh.workers,
        flatten_unclassified: mesh.flatten_unclassified,
        center: mesh.center,
    }
}

/// Generate the field and its mesh, recording each cell's shape.
pub fn generate(config: &Config) -> Result<(Field, TerrainMesh), PipelineError> {
    let width = config.terrain.width;
    let mut field = FieldGenerator::new(field_params(&config.terrain)).generate(width)?;
    let mesh = MeshBuilder::new(mesh_options(&config.mesh)).build_parallel(width, &field)?;
    field.record_shapes(&mesh.shapes)?;
    Ok((field, mesh))
}

/// Run the pipeline and summarize the result.
pub fn run(config: &Config) -> Result<RunSummary, PipelineError> {
    let (field, mesh) = generate(config)?;
    Ok(RunSummary {
        width: field.width(),
        vertices: mesh.vertex_count(),
        min_elevation: field.min_elevation(),
        max_elevation: field.max_elevation(),
        shape_counts: mesh.shape_counts(),
    })
}
