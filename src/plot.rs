//! Flat-coloured discs for drawing the colour cloud.

use crate::camera::{CameraState, Viewport, project_vec};
use crate::extract::{Centroid, ColorPoint};
use crate::segment::quantize;

pub const POINT_RADIUS: f64 = 1.5;
pub const CENTROID_RADIUS: f64 = 6.0;
pub const DEFAULT_MAX_PLOT_POINTS: usize = 20_000;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Disc {
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    pub color: [u8; 3],
    pub depth: f64,
}

impl Disc {
    fn of(color: &ColorPoint, radius: f64, camera: &CameraState, viewport: &Viewport) -> Self {
        // The cube is drawn around its centre, not its black corner.
        let [r, g, b] = color.channels();
        let s = project_vec([r - 0.5, g - 0.5, b - 0.5], camera, viewport);
        Disc {
            x: s.x,
            y: s.y,
            radius,
            color: quantize(color),
            depth: s.depth,
        }
    }
}

/// Project points and centroids into discs ordered far to near.
///
/// At most `max_points` points are drawn, taken at an even stride; centroids
/// are always drawn.
pub fn build_scene(
    points: &[ColorPoint],
    centroids: &[Centroid],
    camera: &CameraState,
    viewport: &Viewport,
    max_points: usize,
) -> Vec<Disc> {
    let mut discs: Vec<Disc> = Vec::new();
    if max_points > 0 {
        let stride = points.len().div_ceil(max_points).max(1);
        discs.extend(
            points
                .iter()
                .step_by(stride)
                .map(|p| Disc::of(p, POINT_RADIUS, camera, viewport)),
        );
    }
    discs.extend(centroids.iter().map(|c| Disc::of(c, CENTROID_RADIUS, camera, viewport)));

    discs.sort_by(|a, b| a.depth.total_cmp(&b.depth));
    discs
}
