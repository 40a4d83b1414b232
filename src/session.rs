//! Per-image state shared by the clustering core and the view.

use image::RgbaImage;
use log::{info, warn};

use crate::camera::{CameraState, Viewport};
use crate::error::{Error, Result};
use crate::extract::{Centroid, ColorPoint, extract_color_points};
use crate::gesture::{GestureConfig, GestureController, GesturePhase, PointerEvent};
use crate::image_io::{PixelBuffer, decode_image};
use crate::kmeans::{ClusterConfig, Clustering, cluster};
use crate::plot::{DEFAULT_MAX_PLOT_POINTS, Disc, build_scene};
use crate::segment::segment;

pub const DEFAULT_MAX_SIDE: u32 = 256;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SessionConfig {
    /// Longest side a decoded image is downsampled to.
    pub max_side: u32,
    /// Cap on colour points drawn by [`Session::plot`].
    pub max_plot_points: usize,
    pub gesture: GestureConfig,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_side: DEFAULT_MAX_SIDE,
            max_plot_points: DEFAULT_MAX_PLOT_POINTS,
            gesture: GestureConfig::default(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClusterOutcome {
    Completed,
    /// This point set was already clustered; nothing ran.
    AlreadyClustered,
}

/// One loaded image with its colour points, clustering and view state.
pub struct Session {
    config: SessionConfig,
    pixels: PixelBuffer,
    points: Vec<ColorPoint>,
    clustering: Option<Clustering>,
    /// Set after a successful run, cleared only by `reset`.
    run_guard: bool,
    camera: CameraState,
    gesture: GestureController,
}

impl Session {
    pub fn new(pixels: PixelBuffer, config: SessionConfig) -> Result<Self> {
        if pixels.is_empty() {
            return Err(Error::EmptyImage);
        }
        let points = extract_color_points(&pixels);
        info!(
            "loaded {}x{} image ({} colour points)",
            pixels.width(),
            pixels.height(),
            points.len()
        );
        Ok(Self {
            config,
            pixels,
            points,
            clustering: None,
            run_guard: false,
            camera: CameraState::default(),
            gesture: GestureController::new(config.gesture),
        })
    }

    /// Decode and downsample an encoded image, then open a session on it.
    pub fn from_encoded(input: &[u8], config: SessionConfig) -> Result<Self> {
        Self::new(decode_image(input, config.max_side)?, config)
    }

    /// Cluster the loaded points. A second call before [`reset`](Self::reset)
    /// does nothing and reports [`ClusterOutcome::AlreadyClustered`].
    pub fn cluster(&mut self, config: &ClusterConfig) -> Result<ClusterOutcome> {
        if self.run_guard {
            warn!("clustering already ran for this image; reset before clustering again");
            return Ok(ClusterOutcome::AlreadyClustered);
        }
        let result = cluster(&self.points, config)?;
        self.clustering = Some(result);
        self.run_guard = true;
        Ok(ClusterOutcome::Completed)
    }

    /// Drop the clustering result and allow a new run.
    pub fn reset(&mut self) {
        self.clustering = None;
        self.run_guard = false;
    }

    pub fn reset_view(&mut self) {
        self.camera.reset();
        self.gesture.clear();
    }

    pub fn is_clustered(&self) -> bool {
        self.run_guard
    }

    pub fn clustering(&self) -> Option<&Clustering> {
        self.clustering.as_ref()
    }

    pub fn centroids(&self) -> &[Centroid] {
        self.clustering.as_ref().map(Clustering::centroids).unwrap_or(&[])
    }

    pub fn points(&self) -> &[ColorPoint] {
        &self.points
    }

    pub fn pixels(&self) -> &PixelBuffer {
        &self.pixels
    }

    pub fn camera(&self) -> &CameraState {
        &self.camera
    }

    pub fn gesture_phase(&self) -> GesturePhase {
        self.gesture.phase()
    }

    /// The loaded image recoloured by the current centroids.
    pub fn segmented(&self) -> Result<RgbaImage> {
        segment(&self.pixels, self.centroids())
    }

    pub fn plot(&self, viewport: &Viewport) -> Vec<Disc> {
        build_scene(
            &self.points,
            self.centroids(),
            &self.camera,
            viewport,
            self.config.max_plot_points,
        )
    }

    pub fn pointer_event(&mut self, event: PointerEvent) -> GesturePhase {
        self.gesture.apply_pointer_event(&mut self.camera, event)
    }

    pub fn wheel(&mut self, delta_y: f64) {
        self.gesture.apply_wheel(&mut self.camera, delta_y);
    }
}
