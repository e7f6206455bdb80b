use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use super::tile::{Tile, TileCoord, TILE_SIZE_DEFAULT};
use crate::math::{Rect, Vec2};

#[derive(Debug, Error)]
pub enum GridError {
    #[error("tile count mismatch: expected {expected}, got {actual}")]
    TileCountMismatch { expected: usize, actual: usize },
    #[error("cell size must be positive and finite, got {width}x{height}")]
    InvalidCellSize { width: f32, height: f32 },
    #[error("failed to read grid '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to write grid '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid grid json at '{path}': {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to encode grid: {0}")]
    Encode(#[source] serde_json::Error),
}

#[derive(Serialize)]
struct GridFileRef<'a, T> {
    rows: u32,
    cols: u32,
    cell_size: Vec2,
    tiles: &'a [T],
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct GridFile<T> {
    rows: u32,
    cols: u32,
    cell_size: Vec2,
    tiles: Vec<T>,
}

/// Half-open block of cells: rows `min.row..max.row`, cols `min.col..max.col`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRange {
    pub min: TileCoord,
    pub max: TileCoord,
}

impl CellRange {
    pub fn rows(&self) -> u32 {
        (self.max.row - self.min.row).max(0) as u32
    }

    pub fn cols(&self) -> u32 {
        (self.max.col - self.min.col).max(0) as u32
    }

    pub fn contains(&self, coord: TileCoord) -> bool {
        coord.row >= self.min.row
            && coord.row < self.max.row
            && coord.col >= self.min.col
            && coord.col < self.max.col
    }

    pub fn coords(&self) -> impl Iterator<Item = TileCoord> + '_ {
        (self.min.row..self.max.row)
            .flat_map(move |row| (self.min.col..self.max.col).map(move |col| TileCoord::new(row, col)))
    }
}

/// Row-major matrix of tiles. Out-of-range lookups yield `None`, which is
/// how callers detect the edge of the world.
#[derive(Debug, Clone, PartialEq)]
pub struct TileGrid<T> {
    rows: u32,
    cols: u32,
    cell_size: Vec2,
    tiles: Vec<T>,
}

impl<T> TileGrid<T> {
    pub fn new(rows: u32, cols: u32, factory: impl FnMut(TileCoord) -> T) -> Self {
        let tiles = build_tiles(rows, cols, factory);
        Self {
            rows,
            cols,
            cell_size: TILE_SIZE_DEFAULT,
            tiles,
        }
    }

    pub fn with_cell_size(
        rows: u32,
        cols: u32,
        cell_size: Vec2,
        factory: impl FnMut(TileCoord) -> T,
    ) -> Result<Self, GridError> {
        validate_cell_size(cell_size)?;
        let mut grid = Self::new(rows, cols, factory);
        grid.cell_size = cell_size;
        Ok(grid)
    }

    pub fn from_tiles(
        rows: u32,
        cols: u32,
        cell_size: Vec2,
        tiles: Vec<T>,
    ) -> Result<Self, GridError> {
        validate_cell_size(cell_size)?;
        let expected = rows as usize * cols as usize;
        let actual = tiles.len();
        if expected != actual {
            return Err(GridError::TileCountMismatch { expected, actual });
        }
        Ok(Self {
            rows,
            cols,
            cell_size,
            tiles,
        })
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn cols(&self) -> u32 {
        self.cols
    }

    pub fn cell_size(&self) -> Vec2 {
        self.cell_size
    }

    pub fn is_valid(&self, coord: TileCoord) -> bool {
        self.index_of(coord).is_some()
    }

    pub fn index_of(&self, coord: TileCoord) -> Option<usize> {
        if coord.row < 0 || coord.col < 0 {
            return None;
        }
        let (row, col) = (coord.row as u32, coord.col as u32);
        if row >= self.rows || col >= self.cols {
            return None;
        }
        Some(row as usize * self.cols as usize + col as usize)
    }

    pub fn tile_at(&self, row: i32, col: i32) -> Option<&T> {
        self.tile(TileCoord::new(row, col))
    }

    pub fn tile(&self, coord: TileCoord) -> Option<&T> {
        self.index_of(coord).and_then(|index| self.tiles.get(index))
    }

    pub fn tile_mut(&mut self, coord: TileCoord) -> Option<&mut T> {
        self.index_of(coord).and_then(|index| self.tiles.get_mut(index))
    }

    /// Grid neighbours of `coord` that exist on the grid, in row-major
    /// offset order from `(-1, -1)` to `(1, 1)`. Without diagonals this is
    /// north, west, east, south.
    pub fn neighbours(&self, coord: TileCoord, diagonals: bool) -> Vec<TileCoord> {
        let mut result = Vec::with_capacity(if diagonals { 8 } else { 4 });
        for d_row in -1i32..=1 {
            for d_col in -1i32..=1 {
                let step = d_row.abs() + d_col.abs();
                if step == 0 || (!diagonals && step != 1) {
                    continue;
                }
                let Some(neighbour) = coord.offset(d_row, d_col) else {
                    continue;
                };
                if self.is_valid(neighbour) {
                    result.push(neighbour);
                }
            }
        }
        result
    }

    /// Top-left corner of the tile in pixels.
    pub fn pixel_position(&self, coord: TileCoord) -> Vec2 {
        coord.as_vec2().scale_by(self.cell_size)
    }

    pub fn tile_area(&self, coord: TileCoord) -> Rect {
        Rect::from_pos_size(self.pixel_position(coord), self.cell_size)
    }

    pub fn pixel_area(&self) -> Rect {
        Rect::new(
            0.0,
            0.0,
            self.cols as f32 * self.cell_size.x,
            self.rows as f32 * self.cell_size.y,
        )
    }

    pub fn pixel_to_tile(&self, pixel: Vec2) -> Option<TileCoord> {
        if !pixel.is_finite() {
            return None;
        }
        let cell = pixel.scale_by(self.cell_size.inv()).floor();
        let coord = TileCoord::new(cell.y as i32, cell.x as i32);
        self.is_valid(coord).then_some(coord)
    }

    /// Cells touched by a pixel-space rectangle, clipped to the grid.
    pub fn cells_in(&self, area: Rect) -> Option<CellRange> {
        let inv = self.cell_size.inv();
        let min_col = (area.x * inv.x).floor().max(0.0);
        let min_row = (area.y * inv.y).floor().max(0.0);
        let max_col = (area.end_x() * inv.x).ceil().min(self.cols as f32);
        let max_row = (area.end_y() * inv.y).ceil().min(self.rows as f32);
        if !(min_col < max_col && min_row < max_row) {
            return None;
        }
        Some(CellRange {
            min: TileCoord::new(min_row as i32, min_col as i32),
            max: TileCoord::new(max_row as i32, max_col as i32),
        })
    }

    /// Rebuild every tile through `factory`.
    pub fn refill(&mut self, factory: impl FnMut(TileCoord) -> T) {
        self.tiles = build_tiles(self.rows, self.cols, factory);
    }

    pub fn iter(&self) -> impl Iterator<Item = (TileCoord, &T)> + '_ {
        let cols = self.cols.max(1) as usize;
        self.tiles.iter().enumerate().map(move |(index, tile)| {
            (
                TileCoord::new((index / cols) as i32, (index % cols) as i32),
                tile,
            )
        })
    }
}

impl<T: Tile> TileGrid<T> {
    /// Off-grid cells are never pathable.
    pub fn is_pathable(&self, coord: TileCoord) -> bool {
        self.tile(coord).is_some_and(Tile::is_pathable)
    }
}

impl<T: Clone> TileGrid<T> {
    /// Copy the cells under a pixel-space rectangle into a new grid whose
    /// `(0, 0)` is the top-left cell of the clipped area.
    pub fn sub_grid(&self, area: Rect) -> Option<TileGrid<T>> {
        let range = self.cells_in(area)?;
        let tiles = range
            .coords()
            .filter_map(|coord| self.tile(coord).cloned())
            .collect::<Vec<_>>();
        TileGrid::from_tiles(range.rows(), range.cols(), self.cell_size, tiles).ok()
    }
}

impl<T: Serialize> TileGrid<T> {
    pub fn to_json(&self) -> Result<String, GridError> {
        let file = GridFileRef {
            rows: self.rows,
            cols: self.cols,
            cell_size: self.cell_size,
            tiles: &self.tiles,
        };
        serde_json::to_string_pretty(&file).map_err(GridError::Encode)
    }

    pub fn save(&self, path: &Path) -> Result<(), GridError> {
        let raw = self.to_json()?;
        fs::write(path, raw).map_err(|source| GridError::Write {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(grid = %self, path = %path.display(), "grid_saved");
        Ok(())
    }
}

impl<T: DeserializeOwned> TileGrid<T> {
    /// Parse a grid written by [`TileGrid::to_json`]; the dimensions, cell
    /// size and tile count are validated like [`TileGrid::from_tiles`].
    pub fn from_json(raw: &str) -> Result<Self, GridError> {
        let mut deserializer = serde_json::Deserializer::from_str(raw);
        let file = match serde_path_to_error::deserialize::<_, GridFile<T>>(&mut deserializer) {
            Ok(file) => file,
            Err(error) => {
                let path = error.path().to_string();
                let source = error.into_inner();
                return Err(GridError::Parse { path, source });
            }
        };
        Self::from_tiles(file.rows, file.cols, file.cell_size, file.tiles)
    }

    pub fn load(path: &Path) -> Result<Self, GridError> {
        let raw = fs::read_to_string(path).map_err(|source| GridError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let grid = Self::from_json(&raw)?;
        debug!(grid = %grid, path = %path.display(), "grid_loaded");
        Ok(grid)
    }
}

impl<T> fmt::Display for TileGrid<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TileGrid({}x{})", self.rows, self.cols)
    }
}

fn build_tiles<T>(rows: u32, cols: u32, mut factory: impl FnMut(TileCoord) -> T) -> Vec<T> {
    let mut tiles = Vec::with_capacity(rows as usize * cols as usize);
    for row in 0..rows {
        for col in 0..cols {
            tiles.push(factory(TileCoord::new(row as i32, col as i32)));
        }
    }
    tiles
}

fn validate_cell_size(cell_size: Vec2) -> Result<(), GridError> {
    if cell_size.is_finite() && cell_size.x > 0.0 && cell_size.y > 0.0 {
        Ok(())
    } else {
        Err(GridError::InvalidCellSize {
            width: cell_size.x,
            height: cell_size.y,
        })
    }
}
