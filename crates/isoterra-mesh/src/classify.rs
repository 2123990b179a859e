//! Tile classification: maps a cell's higher sides and corners to one of the
//! four canonical shapes plus a quarter-turn rotation.
//!
//! The table is keyed on the 4-bit higher-side mask. Sides dominate corners;
//! corners only matter when no side is higher.
//!
//! | higher sides         | higher corners | shape       | rotation |
//! |----------------------|----------------|-------------|----------|
//! | none                 | none           | Flat        | 0        |
//! | none                 | exactly `k`    | CornerUp    | `-k`     |
//! | left                 | any            | Slope       | 1        |
//! | top                  | any            | Slope       | 0        |
//! | right                | any            | Slope       | 3        |
//! | bottom               | any            | Slope       | 2        |
//! | left + top           | any            | CornerDown  | 0        |
//! | top + right          | any            | CornerDown  | 3        |
//! | right + bottom       | any            | CornerDown  | 2        |
//! | bottom + left        | any            | CornerDown  | 1        |
//!
//! Everything else (two or more corners alone, opposite sides, three or four
//! sides) is [`Unclassified`].
//!
//! A rotation of `r` quarter turns moves canonical corner `c` to tile corner
//! `c - r` (mod 4). The canonical tiles raise corner 0 (CornerUp), the top
//! side (Slope) and the left and top sides (CornerDown).

use isoterra_terrain::TileShape;

use crate::neighborhood::{Neighborhood, SIDE_CORNERS};

/// Neighbor configurations the classification table does not cover.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Unclassified {
    /// No side is higher but several corners are.
    #[error("{count} higher corners without a higher side (corner mask {corners:#06b})")]
    MultipleCorners {
        /// Higher-corner mask.
        corners: u8,
        /// Number of higher corners.
        count: u32,
    },

    /// Two opposite sides are higher.
    #[error("opposite sides higher (side mask {sides:#06b})")]
    OpposedSides {
        /// Higher-side mask.
        sides: u8,
    },

    /// Three or four sides are higher.
    #[error("{count} higher sides (side mask {sides:#06b})")]
    TooManySides {
        /// Higher-side mask.
        sides: u8,
        /// Number of higher sides.
        count: u32,
    },
}

/// Result of classifying one cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TileClass {
    /// Canonical shape.
    pub shape: TileShape,
    /// Quarter turns in `0..4`.
    pub rotation: u8,
    /// The raised feature: corner index for CornerUp, side index for Slope,
    /// first side of the raised pair for CornerDown; 0 for Flat.
    pub anchor: u8,
}

impl TileClass {
    /// The flat tile.
    pub const FLAT: Self = Self::new(TileShape::Flat, 0, 0);

    const fn new(shape: TileShape, rotation: u8, anchor: u8) -> Self {
        Self {
            shape,
            rotation,
            anchor,
        }
    }

    /// Corner and center heights in tier units, before vertical scaling.
    pub fn heights(&self, n: &Neighborhood) -> TileHeights {
        let base = n.center as f32;
        let mut heights = TileHeights {
            corners: [base; 4],
            center: base,
        };
        let anchor = self.anchor as usize;

        match self.shape {
            TileShape::Flat => {}
            TileShape::CornerUp => {
                heights.corners[anchor] = n.corners[anchor] as f32;
            }
            TileShape::Slope => {
                let raised = n.sides[anchor] as f32;
                for c in SIDE_CORNERS[anchor] {
                    heights.corners[c] = raised;
                }
                heights.center = base + 0.5;
            }
            TileShape::CornerDown => {
                let next = (anchor + 1) % 4;
                let raised = n.sides[anchor].max(n.sides[next]) as f32;
                for c in SIDE_CORNERS[anchor].into_iter().chain(SIDE_CORNERS[next]) {
                    heights.corners[c] = raised;
                }
                heights.center = raised;
            }
        }
        heights
    }
}

/// Heights of a tile's four corners (upper-left, upper-right, lower-right,
/// lower-left) and its center.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TileHeights {
    /// Corner heights.
    pub corners: [f32; 4],
    /// Center height.
    pub center: f32,
}

impl TileHeights {
    /// Multiply every height by `factor`.
    pub fn scaled(self, factor: f32) -> Self {
        Self {
            corners: self.corners.map(|h| h * factor),
            center: self.center * factor,
        }
    }
}

/// Classify from raw higher-side and higher-corner masks.
pub fn classify_masks(sides: u8, corners: u8) -> Result<TileClass, Unclassified> {
    let sides = sides & 0b1111;
    let corners = corners & 0b1111;

    let class = match (sides, corners) {
        (0b0000, 0b0000) => TileClass::FLAT,

        (0b0000, 0b0001) => TileClass::new(TileShape::CornerUp, 0, 0),
        (0b0000, 0b0010) => TileClass::new(TileShape::CornerUp, 3, 1),
        (0b0000, 0b0100) => TileClass::new(TileShape::CornerUp, 2, 2),
        (0b0000, 0b1000) => TileClass::new(TileShape::CornerUp, 1, 3),
        (0b0000, _) => {
            return Err(Unclassified::MultipleCorners {
                corners,
                count: corners.count_ones(),
            });
        }

        (0b0001, _) => TileClass::new(TileShape::Slope, 1, 0),
        (0b0010, _) => TileClass::new(TileShape::Slope, 0, 1),
        (0b0100, _) => TileClass::new(TileShape::Slope, 3, 2),
        (0b1000, _) => TileClass::new(TileShape::Slope, 2, 3),

        (0b0011, _) => TileClass::new(TileShape::CornerDown, 0, 0),
        (0b0110, _) => TileClass::new(TileShape::CornerDown, 3, 1),
        (0b1100, _) => TileClass::new(TileShape::CornerDown, 2, 2),
        (0b1001, _) => TileClass::new(TileShape::CornerDown, 1, 3),

        (0b0101 | 0b1010, _) => return Err(Unclassified::OpposedSides { sides }),
        (_, _) => {
            return Err(Unclassified::TooManySides {
                sides,
                count: sides.count_ones(),
            });
        }
    };
    Ok(class)
}

/// Classify a neighborhood.
pub fn classify(n: &Neighborhood) -> Result<TileClass, Unclassified> {
    classify_masks(n.higher_sides(), n.higher_corners())
}
