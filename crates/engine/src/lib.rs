pub mod app;
pub mod math;
pub mod rts;

pub use app::{
    Camera, CameraConfig, InputAction, InputCollector, InputEvent, InputSnapshot, Interactive,
    PointerButton, UpdateResult, CAMERA_SCROLL_SPEED, CAMERA_ZOOM_DEFAULT, CAMERA_ZOOM_MAX,
    CAMERA_ZOOM_MIN, CAMERA_ZOOM_SPEED,
};
pub use math::{Circle, Rect, Vec2};
pub use rts::{
    CellRange, GridError, Heuristic, HeuristicKind, PathSearch, Tile, TileCoord, TileGrid,
    TILE_SIZE_DEFAULT,
};
