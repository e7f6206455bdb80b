mod camera;
mod input;

pub use camera::{
    Camera, CameraConfig, Interactive, UpdateResult, CAMERA_SCROLL_SPEED, CAMERA_ZOOM_DEFAULT,
    CAMERA_ZOOM_MAX, CAMERA_ZOOM_MIN, CAMERA_ZOOM_SPEED,
};
pub use input::{InputAction, InputCollector, InputEvent, InputSnapshot, PointerButton};
