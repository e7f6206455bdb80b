use std::collections::{BTreeSet, HashMap};

use tracing::{debug, warn};

use super::grid::TileGrid;
use super::heuristic;
use super::tile::{Tile, TileCoord};

type StateId = usize;

const START_STATE: StateId = 0;

/// Bookkeeping for one tile during one search.
#[derive(Debug, Clone)]
struct SearchState {
    tile: TileCoord,
    previous: Option<StateId>,
    current_cost: u32,
    total_cost_estimate: u32,
    estimate: u32,
    closed: bool,
    open: bool,
}

impl SearchState {
    fn new(tile: TileCoord, estimate: u32) -> Self {
        Self {
            tile,
            previous: None,
            current_cost: 0,
            total_cost_estimate: estimate,
            estimate,
            closed: false,
            open: false,
        }
    }

    // Must not be called while the state sits in the open set: its key changes.
    fn set_parent(&mut self, parent: StateId, parent_cost: u32) {
        self.previous = Some(parent);
        self.current_cost = parent_cost.saturating_add(1);
        self.total_cost_estimate = self.current_cost.saturating_add(self.estimate);
    }

    fn open_key(&self, id: StateId) -> OpenKey {
        OpenKey {
            total_cost_estimate: self.total_cost_estimate,
            estimate: self.estimate,
            tile: self.tile,
            state: id,
        }
    }
}

/// Open-set ordering: cheapest total first, then closest to the goal, then
/// row-major tile order so equal candidates always pop the same way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct OpenKey {
    total_cost_estimate: u32,
    estimate: u32,
    tile: TileCoord,
    state: StateId,
}

/// One A* query over a [`TileGrid`], run to completion on construction.
///
/// Movement is orthogonal with a uniform step cost. Closed states are never
/// reopened. When the goal cannot be reached the search keeps the closed
/// state nearest the goal (by heuristic) and [`PathSearch::path`] leads
/// there instead.
#[derive(Debug, Clone)]
pub struct PathSearch {
    start: TileCoord,
    goal: TileCoord,
    states: Vec<SearchState>,
    end: Option<StateId>,
    fallback: StateId,
}

impl PathSearch {
    pub fn new<T: Tile>(grid: &TileGrid<T>, start: TileCoord, goal: TileCoord) -> Self {
        Self::with_heuristic(grid, start, goal, heuristic::euclidean)
    }

    pub fn with_heuristic<T, H>(
        grid: &TileGrid<T>,
        start: TileCoord,
        goal: TileCoord,
        heuristic: H,
    ) -> Self
    where
        T: Tile,
        H: Fn(TileCoord, TileCoord) -> u32,
    {
        let mut search = Searcher {
            grid,
            goal,
            heuristic,
            states: Vec::new(),
            visited: HashMap::new(),
            open: BTreeSet::new(),
        };
        let outcome = if grid.is_valid(start) {
            search.run(start)
        } else {
            warn!(start = %start, grid = %grid, "path_search_start_off_grid");
            search.seed(start);
            SearchOutcome {
                end: None,
                fallback: START_STATE,
            }
        };

        let result = Self {
            start,
            goal,
            states: search.states,
            end: outcome.end,
            fallback: outcome.fallback,
        };
        debug!(
            start = %start,
            goal = %goal,
            reached = result.has_result(),
            explored = result.explored(),
            end_tile = %result.end_tile(),
            "path_search_complete"
        );
        result
    }

    pub fn start(&self) -> TileCoord {
        self.start
    }

    pub fn goal(&self) -> TileCoord {
        self.goal
    }

    /// True if the goal was reached; false means the path leads to the
    /// fallback tile instead.
    pub fn has_result(&self) -> bool {
        self.end.is_some()
    }

    /// Number of tiles the search created state for.
    pub fn explored(&self) -> usize {
        self.states.len()
    }

    /// Last tile of [`PathSearch::path`], or the start when the path is empty.
    pub fn end_tile(&self) -> TileCoord {
        self.states[self.end.unwrap_or(self.fallback)].tile
    }

    /// Tiles to walk, in order, excluding the start tile.
    pub fn path(&self) -> Vec<TileCoord> {
        let mut result = Vec::new();
        let mut current = self.end.unwrap_or(self.fallback);
        while current != START_STATE {
            let state = &self.states[current];
            result.push(state.tile);
            match state.previous {
                Some(previous) => current = previous,
                None => break,
            }
        }
        result.reverse();
        result
    }
}

struct SearchOutcome {
    end: Option<StateId>,
    fallback: StateId,
}

struct Searcher<'g, T, H> {
    grid: &'g TileGrid<T>,
    goal: TileCoord,
    heuristic: H,
    states: Vec<SearchState>,
    visited: HashMap<TileCoord, StateId>,
    open: BTreeSet<OpenKey>,
}

impl<T, H> Searcher<'_, T, H>
where
    T: Tile,
    H: Fn(TileCoord, TileCoord) -> u32,
{
    fn seed(&mut self, start: TileCoord) {
        let id = self.create_state(start);
        debug_assert_eq!(id, START_STATE);
    }

    fn run(&mut self, start: TileCoord) -> SearchOutcome {
        self.seed(start);
        self.push_open(START_STATE);
        let mut fallback = START_STATE;

        while let Some(key) = self.open.pop_first() {
            let current = key.state;
            self.states[current].open = false;

            if self.states[current].tile == self.goal {
                return SearchOutcome {
                    end: Some(current),
                    fallback,
                };
            }

            let tile = self.states[current].tile;
            for neighbour in self.grid.neighbours(tile, false) {
                // The goal is a valid target even when it cannot be crossed.
                if neighbour == self.goal || self.grid.is_pathable(neighbour) {
                    self.expand(current, neighbour);
                }
            }

            self.states[current].closed = true;
            if self.states[current].estimate < self.states[fallback].estimate {
                fallback = current;
            }
        }

        SearchOutcome {
            end: None,
            fallback,
        }
    }

    fn expand(&mut self, source: StateId, tile: TileCoord) {
        let dest = match self.visited.get(&tile).copied() {
            Some(id) => id,
            None => self.create_state(tile),
        };
        if self.states[dest].closed {
            return;
        }

        let source_cost = self.states[source].current_cost;
        if !self.states[dest].open {
            self.states[dest].set_parent(source, source_cost);
            self.push_open(dest);
        } else if source_cost.saturating_add(1) < self.states[dest].current_cost {
            let stale = self.states[dest].open_key(dest);
            self.open.remove(&stale);
            self.states[dest].set_parent(source, source_cost);
            self.push_open(dest);
        }
    }

    fn create_state(&mut self, tile: TileCoord) -> StateId {
        let id = self.states.len();
        let estimate = (self.heuristic)(tile, self.goal);
        self.states.push(SearchState::new(tile, estimate));
        self.visited.insert(tile, id);
        id
    }

    fn push_open(&mut self, id: StateId) {
        let state = &mut self.states[id];
        state.open = true;
        let key = state.open_key(id);
        self.open.insert(key);
    }
}
