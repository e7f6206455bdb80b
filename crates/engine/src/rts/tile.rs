use std::fmt;

use serde::{Deserialize, Serialize};

use crate::math::Vec2;

pub const TILE_SIZE_DEFAULT: Vec2 = Vec2 { x: 32.0, y: 32.0 };

/// Grid position of a tile. Signed so that neighbour offsets can step off
/// the grid; the grid decides what is in bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileCoord {
    pub row: i32,
    pub col: i32,
}

impl TileCoord {
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// `None` when the step leaves the `i32` range.
    pub fn offset(self, d_row: i32, d_col: i32) -> Option<Self> {
        Some(Self {
            row: self.row.checked_add(d_row)?,
            col: self.col.checked_add(d_col)?,
        })
    }

    /// `(col, row)` as a vector, so that `x` runs along columns.
    pub fn as_vec2(self) -> Vec2 {
        Vec2::new(self.col as f32, self.row as f32)
    }

    pub fn is_orthogonal_neighbour(self, other: TileCoord) -> bool {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col) == 1
    }
}

impl fmt::Display for TileCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.row, self.col)
    }
}

/// A cell's contents. The grid owns tiles and their positions; a tile only
/// decides whether it can be traversed, which may change over time.
pub trait Tile {
    fn is_pathable(&self) -> bool;
}

impl Tile for bool {
    fn is_pathable(&self) -> bool {
        *self
    }
}
