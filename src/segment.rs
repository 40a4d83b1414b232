use image::RgbaImage;
use palette::Srgb;

use crate::error::{Error, Result};
use crate::extract::{Centroid, ColorPoint};
use crate::image_io::PixelBuffer;
use crate::kmeans::nearest_centroid;

/// Round a unit-cube colour to 8-bit channels.
pub fn quantize(color: &ColorPoint) -> [u8; 3] {
    let [r, g, b] = color.channels();
    let c: Srgb<u8> = Srgb::<f64>::new(r, g, b).into_format::<u8>();
    [c.red, c.green, c.blue]
}

/// Hex strings (`RRGGBB`) of the quantized centroids.
pub fn palette_hex(centroids: &[Centroid]) -> Vec<String> {
    centroids
        .iter()
        .map(|c| {
            let [r, g, b] = quantize(c);
            format!("{r:02X}{g:02X}{b:02X}")
        })
        .collect()
}

/// Re-colour every pixel with its nearest centroid, fully opaque.
pub fn segment(pixels: &PixelBuffer, centroids: &[Centroid]) -> Result<RgbaImage> {
    if centroids.is_empty() {
        return Err(Error::InvalidArgument("cannot segment without centroids".to_string()));
    }

    let colors: Vec<[u8; 3]> = centroids.iter().map(quantize).collect();
    let mut out_buf: Vec<u8> = Vec::with_capacity(pixels.len() * 4);
    for &px in pixels.pixels() {
        let [r, g, b] = colors[nearest_centroid(&ColorPoint::from(px), centroids)];
        out_buf.extend_from_slice(&[r, g, b, 255]);
    }

    RgbaImage::from_raw(pixels.width(), pixels.height(), out_buf)
        .ok_or_else(|| Error::InvalidArgument("pixel buffer does not match its dimensions".to_string()))
}
