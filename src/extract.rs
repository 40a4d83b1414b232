use crate::image_io::PixelBuffer;

/// A pixel's colour as a point in the unit RGB cube.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ColorPoint([f64; 3]);

/// Centroids live in the same space as the points they summarise.
pub type Centroid = ColorPoint;

impl ColorPoint {
    pub const fn new(r: f64, g: f64, b: f64) -> Self {
        Self([r, g, b])
    }

    pub fn channels(&self) -> [f64; 3] {
        self.0
    }

    #[inline(always)]
    pub fn distance_sq(&self, other: &ColorPoint) -> f64 {
        let dr = self.0[0] - other.0[0];
        let dg = self.0[1] - other.0[1];
        let db = self.0[2] - other.0[2];
        dr * dr + dg * dg + db * db
    }
}

impl From<[f64; 3]> for ColorPoint {
    fn from(c: [f64; 3]) -> Self {
        Self(c)
    }
}

/// Flatten a pixel buffer into colour points, row by row.
pub fn extract_color_points(buffer: &PixelBuffer) -> Vec<ColorPoint> {
    buffer.pixels().iter().copied().map(ColorPoint::from).collect()
}
