//! Pointer gestures driving the camera.
//!
//! | active pointers | phase      | on move                                       |
//! |-----------------|------------|-----------------------------------------------|
//! | 0               | `Idle`     | nothing                                       |
//! | 1               | `Rotating` | `rot_y += dx * s`, `rot_x += dy * s`          |
//! | 2 or more       | `Pinching` | zoom by distance ratio, pan by midpoint delta |
//!
//! Down adds a pointer and seeds the baseline for the resulting phase. Up and
//! cancel remove the pointer and drop every cached baseline; the next move
//! re-seeds instead of jumping. Only the first two pointers pressed take part
//! in a pinch. Moves from pointers that never went down are ignored.

use crate::camera::CameraState;

pub const DEFAULT_ROTATE_SENSITIVITY: f64 = 0.01;
pub const DEFAULT_WHEEL_SENSITIVITY: f64 = 0.001;

/// Pinch distances below this do not drive zoom.
const MIN_PINCH_DISTANCE: f64 = 1e-6;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GestureConfig {
    /// Radians of rotation per pixel of single-pointer drag.
    pub rotate_sensitivity: f64,
    /// Zoom change per wheel unit.
    pub wheel_sensitivity: f64,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            rotate_sensitivity: DEFAULT_ROTATE_SENSITIVITY,
            wheel_sensitivity: DEFAULT_WHEEL_SENSITIVITY,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerEventKind {
    Down,
    Move,
    Up,
    Cancel,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerEvent {
    pub pointer_id: i32,
    pub kind: PointerEventKind,
    pub x: f64,
    pub y: f64,
}

impl PointerEvent {
    pub fn down(pointer_id: i32, x: f64, y: f64) -> Self {
        Self { pointer_id, kind: PointerEventKind::Down, x, y }
    }

    pub fn moved(pointer_id: i32, x: f64, y: f64) -> Self {
        Self { pointer_id, kind: PointerEventKind::Move, x, y }
    }

    pub fn up(pointer_id: i32, x: f64, y: f64) -> Self {
        Self { pointer_id, kind: PointerEventKind::Up, x, y }
    }

    pub fn cancel(pointer_id: i32) -> Self {
        Self { pointer_id, kind: PointerEventKind::Cancel, x: 0.0, y: 0.0 }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GesturePhase {
    Idle,
    Rotating,
    Pinching,
}

impl GesturePhase {
    fn for_count(active: usize) -> Self {
        match active {
            0 => GesturePhase::Idle,
            1 => GesturePhase::Rotating,
            _ => GesturePhase::Pinching,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct PinchBaseline {
    distance: f64,
    midpoint: [f64; 2],
}

impl PinchBaseline {
    fn between(a: [f64; 2], b: [f64; 2]) -> Self {
        let dx = b[0] - a[0];
        let dy = b[1] - a[1];
        Self {
            distance: (dx * dx + dy * dy).sqrt(),
            midpoint: [(a[0] + b[0]) / 2.0, (a[1] + b[1]) / 2.0],
        }
    }
}

/// Tracks active pointers and turns their motion into camera updates.
#[derive(Clone, Debug, Default)]
pub struct GestureController {
    config: GestureConfig,
    /// Active pointers in press order.
    pointers: Vec<(i32, [f64; 2])>,
    last_single: Option<[f64; 2]>,
    pinch: Option<PinchBaseline>,
}

impl GestureController {
    pub fn new(config: GestureConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &GestureConfig {
        &self.config
    }

    pub fn phase(&self) -> GesturePhase {
        GesturePhase::for_count(self.pointers.len())
    }

    pub fn active_pointers(&self) -> usize {
        self.pointers.len()
    }

    /// Feed one pointer event, mutating `camera` as the gesture dictates.
    /// Returns the phase after the event.
    pub fn apply_pointer_event(&mut self, camera: &mut CameraState, event: PointerEvent) -> GesturePhase {
        let pos = [event.x, event.y];
        match event.kind {
            PointerEventKind::Down => self.pointer_down(event.pointer_id, pos),
            PointerEventKind::Move => self.pointer_move(camera, event.pointer_id, pos),
            PointerEventKind::Up | PointerEventKind::Cancel => self.pointer_up(event.pointer_id),
        }
        self.phase()
    }

    /// Wheel zoom applies whatever the pointer state.
    pub fn apply_wheel(&self, camera: &mut CameraState, delta_y: f64) {
        camera.apply_wheel(delta_y, self.config.wheel_sensitivity);
    }

    /// Forget every pointer and baseline.
    pub fn clear(&mut self) {
        self.pointers.clear();
        self.clear_baselines();
    }

    fn pointer_down(&mut self, id: i32, pos: [f64; 2]) {
        match self.pointers.iter_mut().find(|(pid, _)| *pid == id) {
            Some(entry) => entry.1 = pos,
            None => self.pointers.push((id, pos)),
        }
        match self.phase() {
            GesturePhase::Idle => {}
            GesturePhase::Rotating => {
                self.last_single = Some(pos);
                self.pinch = None;
            }
            GesturePhase::Pinching => {
                self.last_single = None;
                self.pinch = Some(self.current_pinch());
            }
        }
    }

    fn pointer_move(&mut self, camera: &mut CameraState, id: i32, pos: [f64; 2]) {
        let Some(slot) = self.pointers.iter().position(|(pid, _)| *pid == id) else {
            return;
        };
        self.pointers[slot].1 = pos;

        match self.phase() {
            GesturePhase::Idle => {}
            GesturePhase::Rotating => {
                if let Some(last) = self.last_single {
                    let dx = pos[0] - last[0];
                    let dy = pos[1] - last[1];
                    let s = self.config.rotate_sensitivity;
                    camera.rotate_by(dy * s, dx * s);
                }
                self.last_single = Some(pos);
            }
            GesturePhase::Pinching => {
                // Pointers beyond the first two are tracked but inert.
                if slot >= 2 {
                    return;
                }
                let current = self.current_pinch();
                if let Some(base) = self.pinch {
                    if base.distance > MIN_PINCH_DISTANCE && current.distance > MIN_PINCH_DISTANCE {
                        camera.zoom_by(current.distance / base.distance);
                    }
                    camera.pan_by(
                        current.midpoint[0] - base.midpoint[0],
                        current.midpoint[1] - base.midpoint[1],
                    );
                }
                self.pinch = Some(current);
            }
        }
    }

    fn pointer_up(&mut self, id: i32) {
        self.pointers.retain(|(pid, _)| *pid != id);
        self.clear_baselines();
    }

    fn clear_baselines(&mut self) {
        self.last_single = None;
        self.pinch = None;
    }

    fn current_pinch(&self) -> PinchBaseline {
        PinchBaseline::between(self.pointers[0].1, self.pointers[1].1)
    }
}
