mod grid;
pub mod heuristic;
mod search;
mod tile;

pub use grid::{CellRange, GridError, TileGrid};
pub use heuristic::{Heuristic, HeuristicKind};
pub use search::PathSearch;
pub use tile::{Tile, TileCoord, TILE_SIZE_DEFAULT};
