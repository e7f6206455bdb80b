use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::input::InputSnapshot;
use crate::math::{Circle, Rect, Vec2};
use crate::rts::{CellRange, TileGrid};

pub const CAMERA_SCROLL_SPEED: f32 = 6.0;
pub const CAMERA_ZOOM_SPEED: f32 = 0.1;
pub const CAMERA_ZOOM_MIN: f32 = 0.1;
pub const CAMERA_ZOOM_MAX: f32 = 2.0;
pub const CAMERA_ZOOM_DEFAULT: f32 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateResult {
    Continue,
    Exit,
}

/// Something that consumes one frame of input.
pub trait Interactive {
    fn process_input(&mut self, input: &InputSnapshot) -> UpdateResult;
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// View pixels panned per frame while a direction key is held.
    pub scroll_speed: f32,
    /// Relative zoom change per wheel step.
    pub zoom_speed: f32,
    pub zoom_min: f32,
    pub zoom_max: f32,
    pub zoom_default: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            scroll_speed: CAMERA_SCROLL_SPEED,
            zoom_speed: CAMERA_ZOOM_SPEED,
            zoom_min: CAMERA_ZOOM_MIN,
            zoom_max: CAMERA_ZOOM_MAX,
            zoom_default: CAMERA_ZOOM_DEFAULT,
        }
    }
}

impl CameraConfig {
    pub fn is_valid(&self) -> bool {
        let finite = [
            self.scroll_speed,
            self.zoom_speed,
            self.zoom_min,
            self.zoom_max,
            self.zoom_default,
        ]
        .iter()
        .all(|value| value.is_finite());
        finite
            && self.zoom_min > 0.0
            && self.zoom_min <= self.zoom_max
            && (self.zoom_min..=self.zoom_max).contains(&self.zoom_default)
    }

    /// Invalid configs fall back to the defaults.
    pub fn normalized(self) -> Self {
        if self.is_valid() {
            return self;
        }
        warn!(config = ?self, "invalid camera config; falling back to defaults");
        Self::default()
    }
}

/// A pannable, zoomable window onto the world.
///
/// `view` is in world units and always has size `canvas_size / zoom`. With a
/// boundary set, every mutation ends by pulling the view back inside it, or
/// centring it on an axis where it is larger than the boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    config: CameraConfig,
    canvas_size: Vec2,
    view: Rect,
    boundary: Option<Rect>,
    zoom: f32,
}

impl Camera {
    pub fn new(canvas_size: Vec2, boundary: Option<Rect>) -> Self {
        Self::with_config(CameraConfig::default(), canvas_size, boundary)
    }

    pub fn with_config(config: CameraConfig, canvas_size: Vec2, boundary: Option<Rect>) -> Self {
        let config = config.normalized();
        let canvas_size = sanitize_canvas_size(canvas_size);
        let mut camera = Self {
            config,
            canvas_size,
            view: Rect::from_pos_size(Vec2::ZERO, canvas_size / config.zoom_default),
            boundary: sanitize_boundary(boundary),
            zoom: config.zoom_default,
        };
        camera.keep_inside_bounds();
        camera
    }

    pub fn config(&self) -> &CameraConfig {
        &self.config
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn view(&self) -> Rect {
        self.view
    }

    pub fn canvas_size(&self) -> Vec2 {
        self.canvas_size
    }

    pub fn boundary(&self) -> Option<Rect> {
        self.boundary
    }

    pub fn world_to_view(&self, position: Vec2) -> Vec2 {
        (position - self.view.pos()) * self.zoom
    }

    pub fn view_to_world(&self, position: Vec2) -> Vec2 {
        position / self.zoom + self.view.pos()
    }

    pub fn world_to_view_rect(&self, rect: Rect) -> Rect {
        Rect::from_pos_size(self.world_to_view(rect.pos()), rect.size() * self.zoom)
    }

    pub fn view_to_world_rect(&self, rect: Rect) -> Rect {
        Rect::from_pos_size(self.view_to_world(rect.pos()), rect.size() / self.zoom)
    }

    pub fn can_see_point(&self, position: Vec2) -> bool {
        self.view.contains(position)
    }

    pub fn can_see_rect(&self, area: Rect) -> bool {
        self.view.collides(&area)
    }

    pub fn can_see_circle(&self, circle: Circle) -> bool {
        circle.collides_rect(&self.view)
    }

    pub fn visible_cells<T>(&self, grid: &TileGrid<T>) -> Option<CellRange> {
        grid.cells_in(self.view)
    }

    pub fn reset(&mut self) {
        self.zoom = self.config.zoom_default;
        self.view = Rect::from_pos_size(Vec2::ZERO, self.canvas_size / self.zoom);
        self.keep_inside_bounds();
        debug!(zoom = self.zoom, view = %self.view, "camera_reset");
    }

    /// Resizing shows more or less of the world; the zoom is unchanged.
    pub fn set_canvas_size(&mut self, canvas_size: Vec2) {
        self.canvas_size = sanitize_canvas_size(canvas_size);
        self.view.set_size(self.canvas_size / self.zoom);
        self.keep_inside_bounds();
    }

    pub fn set_boundary(&mut self, boundary: Option<Rect>) {
        self.boundary = sanitize_boundary(boundary);
        self.keep_inside_bounds();
    }

    /// Shift the view by a canvas-space translation, so the same input moves
    /// the picture by the same number of pixels at any zoom.
    pub fn pan(&mut self, translation: Vec2) {
        if !translation.is_finite() {
            return;
        }
        self.view.shift(translation / self.zoom);
        self.keep_inside_bounds();
    }

    /// Centre the view over a world position.
    pub fn set_position(&mut self, centre: Vec2) {
        if !centre.is_finite() {
            return;
        }
        self.view.set_pos(centre - self.view.size() * 0.5);
        self.keep_inside_bounds();
    }

    /// Scale the zoom by `1 + delta`, keeping the world point under the
    /// canvas position `target` in place.
    pub fn zoom_toward(&mut self, delta: f32, target: Vec2) {
        if !delta.is_finite() || !target.is_finite() {
            return;
        }
        let target_world = self.view_to_world(target);
        self.zoom = (self.zoom * (1.0 + delta)).clamp(self.config.zoom_min, self.config.zoom_max);
        self.view.set_size(self.canvas_size / self.zoom);
        self.view.set_pos(target_world - target / self.zoom);
        self.keep_inside_bounds();
    }

    fn keep_inside_bounds(&mut self) {
        let Some(boundary) = self.boundary else {
            return;
        };
        let overlap = self.view.overlap(&boundary);
        self.view.x = clamp_axis(self.view.x, overlap.x, boundary.x);
        self.view.y = clamp_axis(self.view.y, overlap.y, boundary.y);
    }
}

impl Interactive for Camera {
    fn process_input(&mut self, input: &InputSnapshot) -> UpdateResult {
        self.pan(input.key_direction() * self.config.scroll_speed);

        let wheel = input.wheel_steps();
        if wheel != 0 {
            let target = input
                .cursor_position_px()
                .unwrap_or(self.canvas_size * 0.5);
            self.zoom_toward(wheel as f32 * self.config.zoom_speed, target);
        }
        UpdateResult::Continue
    }
}

/// `overlap` is view length minus boundary length on this axis.
fn clamp_axis(position: f32, overlap: f32, bound_position: f32) -> f32 {
    if overlap > 0.0 {
        bound_position - overlap * 0.5
    } else if position < bound_position {
        bound_position
    } else {
        position.min(bound_position - overlap)
    }
}

fn sanitize_boundary(boundary: Option<Rect>) -> Option<Rect> {
    let boundary = boundary?;
    let finite = boundary.pos().is_finite() && boundary.size().is_finite();
    if finite && boundary.w >= 0.0 && boundary.h >= 0.0 {
        return Some(boundary);
    }
    warn!(boundary = %boundary, "invalid camera boundary; ignoring it");
    None
}

fn sanitize_canvas_size(canvas_size: Vec2) -> Vec2 {
    if canvas_size.is_finite() && canvas_size.x >= 0.0 && canvas_size.y >= 0.0 {
        return canvas_size;
    }
    warn!(canvas_size = %canvas_size, "invalid canvas size; clamping to zero");
    Vec2::new(
        finite_non_negative(canvas_size.x),
        finite_non_negative(canvas_size.y),
    )
}

fn finite_non_negative(value: f32) -> f32 {
    if value.is_finite() {
        value.max(0.0)
    } else {
        0.0
    }
}
