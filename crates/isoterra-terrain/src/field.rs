//! Cell and field data model shared by the generator and the mesh builder.

/// Number of coarse elevation tiers used for biome lookup.
pub const ELEVATION_TIERS: u8 = 4;

/// Number of discrete moisture levels (`0..MOISTURE_LEVELS`).
pub const MOISTURE_LEVELS: u8 = 6;

/// The four canonical tile geometries every cell is rendered with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TileShape {
    /// All corners at the cell's own height.
    Flat = 0,
    /// One side raised, the center lifted by half a tier.
    Slope = 1,
    /// A single corner raised to a higher diagonal neighbor.
    CornerUp = 2,
    /// Three corners and the center raised; a notch cut out of a plateau.
    CornerDown = 3,
}

impl TileShape {
    /// All shapes in atlas order.
    pub const ALL: [TileShape; 4] = [
        Self::Flat,
        Self::Slope,
        Self::CornerUp,
        Self::CornerDown,
    ];

    /// Stable index in `0..4`.
    pub fn index(self) -> usize {
        self as usize
    }
}

/// One grid position of the generated field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cell {
    /// Discrete elevation after smoothing.
    pub elevation: i32,
    /// Discrete moisture in `[0, 5]`.
    pub moisture: u8,
    /// Column.
    pub x: u32,
    /// Row (top-left origin).
    pub z: u32,
    /// Shape computed by the mesh builder; `None` until recorded.
    pub shape: Option<TileShape>,
}

impl Cell {
    /// Create a cell with no shape recorded yet.
    pub fn new(x: u32, z: u32, elevation: i32, moisture: u8) -> Self {
        Self {
            elevation,
            moisture,
            x,
            z,
            shape: None,
        }
    }
}

/// Errors raised while generating or assembling a field.
#[derive(Debug, thiserror::Error)]
pub enum FieldError {
    /// The grid width must be positive.
    #[error("invalid grid width {0}: width must be positive")]
    InvalidWidth(usize),

    /// The cell array does not cover a `width * width` grid.
    #[error("cell count mismatch: expected {expected} cells, got {actual}")]
    CellCountMismatch {
        /// `width * width`.
        expected: usize,
        /// Length of the supplied array.
        actual: usize,
    },

    /// The already-visited neighbors of a cell span more than two tiers.
    ///
    /// Smoothing keeps every cell within one tier of its causal neighbors, so
    /// this only fires when the smoothing pass itself is broken.
    #[error("neighbor elevation range [{min}, {max}] too wide at cell ({x}, {z})")]
    NeighborRangeExceeded {
        /// Column of the offending cell.
        x: u32,
        /// Row of the offending cell.
        z: u32,
        /// Lowest causal neighbor elevation.
        min: i32,
        /// Highest causal neighbor elevation.
        max: i32,
    },
}

impl FieldError {
    /// Returns `true` for defects in the generation algorithm itself, as
    /// opposed to invalid caller input.
    pub fn is_internal(&self) -> bool {
        matches!(self, Self::NeighborRangeExceeded { .. })
    }
}

/// A square grid of cells plus its elevation bounds.
///
/// Cells are stored row-major: index `z * width + x`.
#[derive(Clone, Debug, PartialEq)]
pub struct Field {
    width: usize,
    cells: Vec<Cell>,
    min_elevation: i32,
    max_elevation: i32,
}

impl Field {
    /// Build a field from caller-supplied cells.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::InvalidWidth`] for a zero width and
    /// [`FieldError::CellCountMismatch`] if `cells.len() != width * width`.
    pub fn from_cells(width: usize, cells: Vec<Cell>) -> Result<Self, FieldError> {
        if width == 0 {
            return Err(FieldError::InvalidWidth(width));
        }
        let expected = width * width;
        if cells.len() != expected {
            return Err(FieldError::CellCountMismatch {
                expected,
                actual: cells.len(),
            });
        }

        let (min_elevation, max_elevation) = cells
            .iter()
            .fold((i32::MAX, i32::MIN), |(lo, hi), c| {
                (lo.min(c.elevation), hi.max(c.elevation))
            });

        Ok(Self {
            width,
            cells,
            min_elevation,
            max_elevation,
        })
    }

    /// Assemble a field whose bounds were tracked by the caller.
    pub(crate) fn from_parts(
        width: usize,
        cells: Vec<Cell>,
        min_elevation: i32,
        max_elevation: i32,
    ) -> Self {
        Self {
            width,
            cells,
            min_elevation,
            max_elevation,
        }
    }

    /// Grid width (and height).
    pub fn width(&self) -> usize {
        self.width
    }

    /// All cells, row-major.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Lowest elevation over all cells.
    pub fn min_elevation(&self) -> i32 {
        self.min_elevation
    }

    /// Highest elevation over all cells.
    pub fn max_elevation(&self) -> i32 {
        self.max_elevation
    }

    /// Returns the cell at `(x, z)`, or `None` outside the grid.
    pub fn cell(&self, x: i64, z: i64) -> Option<&Cell> {
        let w = self.width as i64;
        if x < 0 || z < 0 || x >= w || z >= w {
            return None;
        }
        self.cells.get((z * w + x) as usize)
    }

    /// Elevation at `(x, z)`, or `None` outside the grid.
    pub fn elevation_at(&self, x: i64, z: i64) -> Option<i32> {
        self.cell(x, z).map(|c| c.elevation)
    }

    /// Map an elevation to its coarse tier in `[0, 3]`.
    ///
    /// Normalizes against the field bounds, scales by four and rounds. A flat
    /// field (`max == min`) maps everything to tier 0.
    pub fn elevation_tier(&self, elevation: i32) -> u8 {
        let range = self.max_elevation - self.min_elevation;
        if range <= 0 {
            return 0;
        }
        let normalized = (elevation - self.min_elevation) as f64 / range as f64;
        let tier = (normalized * ELEVATION_TIERS as f64).round();
        tier.clamp(0.0, (ELEVATION_TIERS - 1) as f64) as u8
    }

    /// Write the mesh builder's per-cell shapes back onto the cells.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::CellCountMismatch`] if `shapes` does not hold one
    /// entry per cell.
    pub fn record_shapes(&mut self, shapes: &[TileShape]) -> Result<(), FieldError> {
        if shapes.len() != self.cells.len() {
            return Err(FieldError::CellCountMismatch {
                expected: self.cells.len(),
                actual: shapes.len(),
            });
        }
        for (cell, &shape) in self.cells.iter_mut().zip(shapes) {
            cell.shape = Some(shape);
        }
        Ok(())
    }
}
