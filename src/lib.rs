use wasm_bindgen::prelude::*;
use js_sys::{Array, Float64Array, Object, Reflect, Uint8Array};
#[cfg(feature = "native-bin")]
use anyhow::{Context, Result as AnyResult};

pub mod camera;
pub mod error;
pub mod extract;
pub mod gesture;
pub mod image_io;
pub mod kmeans;
pub mod plot;
pub mod segment;
pub mod session;

pub use camera::{CameraState, ScreenPoint, Viewport, project, rotate_x, rotate_y};
pub use error::{Error, Result};
pub use extract::{Centroid, ColorPoint, extract_color_points};
pub use gesture::{GestureConfig, GestureController, GesturePhase, PointerEvent, PointerEventKind};
pub use image_io::{PixelBuffer, decode_image, encode_png};
pub use kmeans::{ClusterConfig, Clustering, assign_points, cluster, cluster_with_rng};
pub use plot::{Disc, build_scene};
pub use segment::{palette_hex, quantize, segment};
pub use session::{ClusterOutcome, Session, SessionConfig};

/// Fields per disc in the flat array returned by [`ColorSession::plot`].
pub const DISC_STRIDE: usize = 6;

/// Seed drawn from the platform entropy source, for callers that supply none.
pub fn entropy_seed() -> std::result::Result<u64, getrandom::Error> {
    let mut bytes = [0u8; 8];
    getrandom::fill(&mut bytes)?;
    Ok(u64::from_le_bytes(bytes))
}

fn js_err(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

// ------------------------------------------------------------
// Browser surface
// ------------------------------------------------------------

/// One loaded image, exposed to JavaScript.
///
/// The page decodes nothing itself: it hands over the encoded file bytes and
/// forwards pointer and wheel events. Every method runs to completion
/// synchronously.
#[wasm_bindgen]
pub struct ColorSession {
    inner: Session,
}

#[wasm_bindgen]
impl ColorSession {
    /// Decode `input` and downsample it so its longest side is `max_side`.
    #[wasm_bindgen(constructor)]
    pub fn new(input: Vec<u8>, max_side: u32) -> std::result::Result<ColorSession, JsValue> {
        let config = SessionConfig {
            max_side,
            ..SessionConfig::default()
        };
        let inner = Session::from_encoded(&input, config)
            .map_err(|e| JsValue::from_str(&format!("Unable to load image: {e}")))?;
        Ok(ColorSession { inner })
    }

    pub fn width(&self) -> u32 {
        self.inner.pixels().width()
    }

    pub fn height(&self) -> u32 {
        self.inner.pixels().height()
    }

    /// Run k-means once for this image.
    ///
    /// Returns `{ palette, iterations, converged }`. When the image was
    /// already clustered the run is skipped and the object also carries a
    /// `notice` string for the page to show.
    pub fn cluster(
        &mut self,
        k: usize,
        max_iterations: usize,
        seed: Option<u32>,
    ) -> std::result::Result<Object, JsValue> {
        let seed = match seed {
            Some(s) => s as u64,
            None => entropy_seed().map_err(js_err)?,
        };
        let config = ClusterConfig {
            k,
            max_iterations,
            seed,
        };
        let outcome = self.inner.cluster(&config).map_err(js_err)?;

        let result = Object::new();
        if outcome == ClusterOutcome::AlreadyClustered {
            Reflect::set(
                &result,
                &JsValue::from_str("notice"),
                &JsValue::from_str("Already clustered. Reset to run again."),
            )?;
        }

        let palette_js = Array::new();
        for hex in palette_hex(self.inner.centroids()) {
            palette_js.push(&JsValue::from_str(&hex));
        }
        let (iterations, converged) = self
            .inner
            .clustering()
            .map(|c| (c.iterations(), c.converged()))
            .unwrap_or((0, false));

        Reflect::set(&result, &JsValue::from_str("palette"), &palette_js)?;
        Reflect::set(&result, &JsValue::from_str("iterations"), &JsValue::from_f64(iterations as f64))?;
        Reflect::set(&result, &JsValue::from_str("converged"), &JsValue::from_bool(converged))?;
        Ok(result)
    }

    /// PNG of the image recoloured by the centroids.
    pub fn segmented_png(&self) -> std::result::Result<Uint8Array, JsValue> {
        let img = self.inner.segmented().map_err(js_err)?;
        let png = encode_png(&img).map_err(|e| JsValue::from_str(&format!("PNG encode error: {e}")))?;
        Ok(Uint8Array::from(png.as_slice()))
    }

    /// Discs to paint, far to near, flattened as `[x, y, radius, r, g, b]`.
    pub fn plot(&self, width: f64, height: f64) -> Float64Array {
        let discs = self.inner.plot(&Viewport::new(width, height));
        let mut flat = Vec::with_capacity(discs.len() * DISC_STRIDE);
        for d in &discs {
            flat.extend_from_slice(&[
                d.x,
                d.y,
                d.radius,
                d.color[0] as f64,
                d.color[1] as f64,
                d.color[2] as f64,
            ]);
        }
        Float64Array::from(flat.as_slice())
    }

    pub fn pointer_down(&mut self, id: i32, x: f64, y: f64) {
        self.inner.pointer_event(PointerEvent::down(id, x, y));
    }

    pub fn pointer_move(&mut self, id: i32, x: f64, y: f64) {
        self.inner.pointer_event(PointerEvent::moved(id, x, y));
    }

    pub fn pointer_up(&mut self, id: i32, x: f64, y: f64) {
        self.inner.pointer_event(PointerEvent::up(id, x, y));
    }

    pub fn pointer_cancel(&mut self, id: i32) {
        self.inner.pointer_event(PointerEvent::cancel(id));
    }

    pub fn wheel(&mut self, delta_y: f64) {
        self.inner.wheel(delta_y);
    }

    /// Forget the clustering so `cluster` may run again.
    pub fn reset(&mut self) {
        self.inner.reset();
    }

    pub fn reset_view(&mut self) {
        self.inner.reset_view();
    }
}

// ------------------------------------------------------------
// Native pipeline
// ------------------------------------------------------------

/// Decode, cluster and recolour an image in one go.
///
/// Returns the PNG-encoded segmented image and the palette as `RRGGBB` hex.
#[cfg(feature = "native-bin")]
pub fn segment_bytes(
    input: &[u8],
    config: &ClusterConfig,
    max_side: u32,
) -> AnyResult<(Vec<u8>, Vec<String>)> {
    let pixels = decode_image(input, max_side).context("decode image")?;
    let points = extract_color_points(&pixels);
    let clustering = cluster(&points, config).context("cluster colours")?;
    let segmented = segment(&pixels, clustering.centroids())?;
    let png = encode_png(&segmented).context("encode PNG")?;
    Ok((png, palette_hex(clustering.centroids())))
}
