use serde::{Deserialize, Serialize};

use super::tile::TileCoord;

pub type Heuristic = fn(TileCoord, TileCoord) -> u32;

pub fn none(_start: TileCoord, _end: TileCoord) -> u32 {
    0
}

/// Straight-line distance in cells, truncated.
pub fn euclidean(start: TileCoord, end: TileCoord) -> u32 {
    start.as_vec2().distance(end.as_vec2()) as u32
}

pub fn manhattan(start: TileCoord, end: TileCoord) -> u32 {
    start.row.abs_diff(end.row) + start.col.abs_diff(end.col)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeuristicKind {
    None,
    #[default]
    Euclidean,
    Manhattan,
}

impl HeuristicKind {
    pub fn function(self) -> Heuristic {
        match self {
            HeuristicKind::None => none,
            HeuristicKind::Euclidean => euclidean,
            HeuristicKind::Manhattan => manhattan,
        }
    }
}
