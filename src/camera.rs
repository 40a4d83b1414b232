//! Orthographic camera for the colour cube.
//!
//! Points are rotated about the horizontal (X) axis first and the vertical (Y)
//! axis second, then scaled by half the shorter viewport side times `zoom`.
//! Screen Y grows downward, so the rotated Y is subtracted.

use crate::extract::ColorPoint;

pub const MIN_ZOOM: f64 = 0.05;
pub const MAX_ZOOM: f64 = 100.0;

/// Rotation, zoom and pan of the point-cloud view.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraState {
    /// Rotation about the horizontal axis, radians.
    pub rot_x: f64,
    /// Rotation about the vertical axis, radians.
    pub rot_y: f64,
    /// Always within `[MIN_ZOOM, MAX_ZOOM]`.
    zoom: f64,
    /// Screen-space offset in pixels.
    pub pan: [f64; 2],
}

impl Default for CameraState {
    fn default() -> Self {
        Self {
            rot_x: 0.0,
            rot_y: 0.0,
            zoom: 1.0,
            pan: [0.0, 0.0],
        }
    }
}

impl CameraState {
    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Set zoom, clamped to the allowed range. Non-finite or non-positive
    /// values are ignored.
    pub fn set_zoom(&mut self, zoom: f64) {
        if zoom.is_finite() && zoom > 0.0 {
            self.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
        }
    }

    /// Multiply zoom by `factor`. Ignored unless `factor` is finite and positive.
    pub fn zoom_by(&mut self, factor: f64) {
        if factor.is_finite() && factor > 0.0 {
            self.set_zoom(self.zoom * factor);
        }
    }

    pub fn rotate_by(&mut self, d_rot_x: f64, d_rot_y: f64) {
        self.rot_x += d_rot_x;
        self.rot_y += d_rot_y;
    }

    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.pan[0] += dx;
        self.pan[1] += dy;
    }

    /// Zoom by `1 - delta_y * sensitivity`, so scrolling up zooms in.
    pub fn apply_wheel(&mut self, delta_y: f64, sensitivity: f64) {
        self.zoom_by(1.0 + (-delta_y) * sensitivity);
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Drawing surface dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn center_x(&self) -> f64 {
        self.width / 2.0
    }

    pub fn center_y(&self) -> f64 {
        self.height / 2.0
    }
}

/// A projected point. `depth` is the rotated Z; larger is nearer the viewer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
    pub depth: f64,
}

/// Rotate about the X axis.
pub fn rotate_x(v: [f64; 3], angle: f64) -> [f64; 3] {
    let (sin, cos) = angle.sin_cos();
    [v[0], v[1] * cos - v[2] * sin, v[1] * sin + v[2] * cos]
}

/// Rotate about the Y axis.
pub fn rotate_y(v: [f64; 3], angle: f64) -> [f64; 3] {
    let (sin, cos) = angle.sin_cos();
    [v[0] * cos + v[2] * sin, v[1], -v[0] * sin + v[2] * cos]
}

/// Map a 3D vector to screen coordinates under `camera`.
pub fn project_vec(v: [f64; 3], camera: &CameraState, viewport: &Viewport) -> ScreenPoint {
    let rotated = rotate_y(rotate_x(v, camera.rot_x), camera.rot_y);
    let scale = viewport.width.min(viewport.height) / 2.0 * camera.zoom;
    ScreenPoint {
        x: viewport.center_x() + camera.pan[0] + rotated[0] * scale,
        y: viewport.center_y() + camera.pan[1] - rotated[1] * scale,
        depth: rotated[2],
    }
}

pub fn project(point: &ColorPoint, camera: &CameraState, viewport: &Viewport) -> ScreenPoint {
    project_vec(point.channels(), camera, viewport)
}
