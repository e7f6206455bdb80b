use std::fs;
use std::path::{Path, PathBuf};

use ambition::{
    CameraConfig, GridError, HeuristicKind, InputAction, InputEvent, InputSnapshot, Rect,
    TileCoord, TileGrid, Vec2, TILE_SIZE_DEFAULT,
};
use serde::Deserialize;
use thiserror::Error;

use super::terrain::Terrain;

const START_GLYPH: char = 'S';
const GOAL_GLYPH: char = 'G';
const DEFAULT_CANVAS_SIZE: Vec2 = Vec2 { x: 320.0, y: 192.0 };

const BUILTIN_SCENARIO: &str = include_str!("builtin_scenario.json");

#[derive(Debug, Error)]
pub(crate) enum ScenarioError {
    #[error("failed to read scenario '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid scenario json at '{path}': {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("scenario layout has no tiles")]
    EmptyLayout,
    #[error("layout row {row} has {actual} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        actual: usize,
    },
    #[error("unknown glyph '{glyph}' at [{row}, {col}]")]
    UnknownGlyph { row: usize, col: usize, glyph: char },
    #[error("layout has no '{marker}' marker")]
    MissingMarker { marker: char },
    #[error("layout marks '{marker}' twice: {first} and {second}")]
    DuplicateMarker {
        marker: char,
        first: TileCoord,
        second: TileCoord,
    },
    #[error(transparent)]
    Grid(#[from] GridError),
}

/// A fully validated scenario, ready to search and view.
#[derive(Debug, Clone)]
pub(crate) struct Scenario {
    pub(crate) grid: TileGrid<Terrain>,
    pub(crate) start: TileCoord,
    pub(crate) goal: TileCoord,
    pub(crate) canvas_size: Vec2,
    pub(crate) boundary: Option<Rect>,
    pub(crate) heuristic: HeuristicKind,
    pub(crate) camera: CameraConfig,
    pub(crate) frames: Vec<InputSnapshot>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ScenarioFile {
    layout: Vec<String>,
    #[serde(default)]
    cell_size: Option<Vec2>,
    #[serde(default)]
    canvas_size: Option<Vec2>,
    #[serde(default = "default_boundary")]
    boundary: bool,
    #[serde(default)]
    heuristic: HeuristicKind,
    #[serde(default)]
    camera: CameraConfig,
    #[serde(default)]
    frames: Vec<FrameScript>,
}

fn default_boundary() -> bool {
    true
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    fn action(self) -> InputAction {
        match self {
            Direction::Up => InputAction::MoveUp,
            Direction::Down => InputAction::MoveDown,
            Direction::Left => InputAction::MoveLeft,
            Direction::Right => InputAction::MoveRight,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct FrameScript {
    hold: Vec<Direction>,
    cursor: Option<Vec2>,
    wheel: i32,
    confirm: bool,
    cancel: bool,
    repeat: u32,
}

impl Default for FrameScript {
    fn default() -> Self {
        Self {
            hold: Vec::new(),
            cursor: None,
            wheel: 0,
            confirm: false,
            cancel: false,
            repeat: 1,
        }
    }
}

impl FrameScript {
    fn snapshot(&self, window_size: (u32, u32)) -> InputSnapshot {
        let mut snapshot = InputSnapshot::empty()
            .with_window_size(window_size)
            .with_cursor_position_px(self.cursor)
            .with_wheel_steps(self.wheel);
        for direction in &self.hold {
            snapshot = snapshot.with_action_down(direction.action(), true);
        }
        for (requested, action) in [
            (self.confirm, InputAction::Confirm),
            (self.cancel, InputAction::Cancel),
        ] {
            if requested {
                snapshot = snapshot.with_event(InputEvent::Key {
                    action,
                    pressed: true,
                });
            }
        }
        snapshot
    }
}

pub(crate) fn builtin_scenario() -> Result<Scenario, ScenarioError> {
    parse_scenario(BUILTIN_SCENARIO)
}

pub(crate) fn load_scenario(path: &Path) -> Result<Scenario, ScenarioError> {
    let raw = fs::read_to_string(path).map_err(|source| ScenarioError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_scenario(&raw)
}

pub(crate) fn parse_scenario(raw: &str) -> Result<Scenario, ScenarioError> {
    let mut deserializer = serde_json::Deserializer::from_str(raw);
    let file = match serde_path_to_error::deserialize::<_, ScenarioFile>(&mut deserializer) {
        Ok(file) => file,
        Err(error) => {
            let path = error.path().to_string();
            let source = error.into_inner();
            return Err(ScenarioError::Parse { path, source });
        }
    };
    build_scenario(file)
}

fn build_scenario(file: ScenarioFile) -> Result<Scenario, ScenarioError> {
    let rows = file.layout.len();
    let cols = file.layout.first().map_or(0, |row| row.chars().count());
    if rows == 0 || cols == 0 {
        return Err(ScenarioError::EmptyLayout);
    }

    let mut tiles = Vec::with_capacity(rows * cols);
    let mut start = None;
    let mut goal = None;
    for (row, line) in file.layout.iter().enumerate() {
        let actual = line.chars().count();
        if actual != cols {
            return Err(ScenarioError::RaggedRow {
                row,
                expected: cols,
                actual,
            });
        }
        for (col, glyph) in line.chars().enumerate() {
            let coord = TileCoord::new(row as i32, col as i32);
            let terrain = match glyph {
                START_GLYPH => {
                    place_marker(&mut start, START_GLYPH, coord)?;
                    Terrain::Floor
                }
                GOAL_GLYPH => {
                    place_marker(&mut goal, GOAL_GLYPH, coord)?;
                    Terrain::Floor
                }
                other => Terrain::from_glyph(other).ok_or(ScenarioError::UnknownGlyph {
                    row,
                    col,
                    glyph: other,
                })?,
            };
            tiles.push(terrain);
        }
    }
    let start = start.ok_or(ScenarioError::MissingMarker {
        marker: START_GLYPH,
    })?;
    let goal = goal.ok_or(ScenarioError::MissingMarker { marker: GOAL_GLYPH })?;

    let grid = TileGrid::from_tiles(
        rows as u32,
        cols as u32,
        file.cell_size.unwrap_or(TILE_SIZE_DEFAULT),
        tiles,
    )?;
    let canvas_size = file.canvas_size.unwrap_or(DEFAULT_CANVAS_SIZE);
    let window_size = (canvas_size.x.max(0.0) as u32, canvas_size.y.max(0.0) as u32);
    let frames = file
        .frames
        .iter()
        .flat_map(|script| {
            let snapshot = script.snapshot(window_size);
            std::iter::repeat(snapshot).take(script.repeat as usize)
        })
        .collect();

    Ok(Scenario {
        boundary: file.boundary.then(|| grid.pixel_area()),
        grid,
        start,
        goal,
        canvas_size,
        heuristic: file.heuristic,
        camera: file.camera,
        frames,
    })
}

fn place_marker(
    slot: &mut Option<TileCoord>,
    marker: char,
    coord: TileCoord,
) -> Result<(), ScenarioError> {
    if let Some(first) = *slot {
        return Err(ScenarioError::DuplicateMarker {
            marker,
            first,
            second: coord,
        });
    }
    *slot = Some(coord);
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn builtin_scenario_is_valid() {
        let scenario = builtin_scenario().expect("builtin");
        assert_eq!(scenario.grid.rows(), 9);
        assert_eq!(scenario.grid.cols(), 16);
        assert_eq!(scenario.start, TileCoord::new(0, 0));
        assert_eq!(scenario.goal, TileCoord::new(4, 11));
        assert_eq!(scenario.boundary, Some(Rect::new(0.0, 0.0, 512.0, 288.0)));
        assert_eq!(scenario.frames.len(), 33);
        assert_eq!(
            scenario.grid.tile(TileCoord::new(8, 4)),
            Some(&Terrain::Water)
        );
    }

    #[test]
    fn markers_become_floor() {
        let scenario = parse_scenario(r#"{ "layout": ["S#G"] }"#).expect("scenario");
        assert!(scenario.grid.is_pathable(TileCoord::new(0, 0)));
        assert!(!scenario.grid.is_pathable(TileCoord::new(0, 1)));
        assert!(scenario.grid.is_pathable(TileCoord::new(0, 2)));
    }

    #[test]
    fn optional_fields_take_defaults() {
        let scenario =
            parse_scenario(r#"{ "layout": ["SG"], "boundary": false }"#).expect("scenario");
        assert_eq!(scenario.grid.cell_size(), TILE_SIZE_DEFAULT);
        assert_eq!(scenario.canvas_size, DEFAULT_CANVAS_SIZE);
        assert_eq!(scenario.boundary, None);
        assert_eq!(scenario.heuristic, HeuristicKind::Euclidean);
        assert_eq!(scenario.camera, CameraConfig::default());
        assert!(scenario.frames.is_empty());
    }

    #[test]
    fn frames_expand_repeats_and_keys() {
        let scenario = parse_scenario(
            r#"{
                "layout": ["SG"],
                "canvas_size": { "x": 64.0, "y": 48.0 },
                "frames": [
                    { "hold": ["left", "up"], "repeat": 3 },
                    { "cancel": true, "wheel": -2 },
                    { "repeat": 0 }
                ]
            }"#,
        )
        .expect("scenario");
        assert_eq!(scenario.frames.len(), 4);
        let held = &scenario.frames[0];
        assert_eq!(held.key_direction(), Vec2::new(-1.0, -1.0));
        assert_eq!(held.window_size(), (64, 48));
        let last = &scenario.frames[3];
        assert!(last.was_pressed(InputAction::Cancel));
        assert!(!last.was_pressed(InputAction::Confirm));
        assert_eq!(last.wheel_steps(), -2);
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let err = parse_scenario(r#"{ "layout": ["S..", "G."] }"#).expect_err("ragged");
        assert!(matches!(
            err,
            ScenarioError::RaggedRow {
                row: 1,
                expected: 3,
                actual: 2
            }
        ));
    }

    #[test]
    fn unknown_glyph_reports_position() {
        let err = parse_scenario(r#"{ "layout": ["S.", ".x", "G."] }"#).expect_err("glyph");
        assert!(matches!(
            err,
            ScenarioError::UnknownGlyph {
                row: 1,
                col: 1,
                glyph: 'x'
            }
        ));
    }

    #[test]
    fn markers_must_appear_exactly_once() {
        let missing = parse_scenario(r#"{ "layout": ["S.."] }"#).expect_err("missing");
        assert!(matches!(
            missing,
            ScenarioError::MissingMarker { marker: 'G' }
        ));

        let duplicate = parse_scenario(r#"{ "layout": ["SGS"] }"#).expect_err("duplicate");
        assert!(matches!(
            duplicate,
            ScenarioError::DuplicateMarker { marker: 'S', .. }
        ));
    }

    #[test]
    fn empty_layout_is_rejected() {
        let err = parse_scenario(r#"{ "layout": [] }"#).expect_err("empty");
        assert!(matches!(err, ScenarioError::EmptyLayout));
    }

    #[test]
    fn bad_cell_size_surfaces_grid_error() {
        let err = parse_scenario(r#"{ "layout": ["SG"], "cell_size": { "x": 0.0, "y": 8.0 } }"#)
            .expect_err("cell size");
        assert!(matches!(
            err,
            ScenarioError::Grid(GridError::InvalidCellSize { .. })
        ));
    }

    #[test]
    fn parse_errors_include_json_path() {
        let err = parse_scenario(r#"{ "layout": ["SG"], "frames": [{ "wheel": "up" }] }"#)
            .expect_err("parse");
        match err {
            ScenarioError::Parse { path, .. } => assert_eq!(path, "frames[0].wheel"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn loads_scenario_from_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(file, r#"{{ "layout": ["S.", ".G"], "heuristic": "manhattan" }}"#)
            .expect("write");
        let scenario = load_scenario(file.path()).expect("load");
        assert_eq!(scenario.goal, TileCoord::new(1, 1));
        assert_eq!(scenario.heuristic, HeuristicKind::Manhattan);
    }

    #[test]
    fn missing_file_reports_path() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("absent.json");
        let err = load_scenario(&path).expect_err("missing");
        match err {
            ScenarioError::Read { path: reported, .. } => assert_eq!(reported, path),
            other => panic!("unexpected error: {other}"),
        }
    }
}
