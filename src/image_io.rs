use image::{DynamicImage, GenericImageView, ImageFormat, RgbaImage, imageops::FilterType};
use log::debug;

use crate::error::{Error, Result};

/// A rectangular buffer of RGB pixels with channels normalised to `[0, 1]`,
/// stored row-major.
#[derive(Clone, Debug, PartialEq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    pixels: Vec<[f64; 3]>,
}

impl PixelBuffer {
    /// Build a buffer from row-major pixels. The pixel count must equal `width * height`.
    pub fn new(width: u32, height: u32, pixels: Vec<[f64; 3]>) -> Result<Self> {
        let expected = width as usize * height as usize;
        if pixels.len() != expected {
            return Err(Error::InvalidArgument(format!(
                "buffer of {width}x{height} needs {expected} pixels, got {}",
                pixels.len()
            )));
        }
        Ok(Self { width, height, pixels })
    }

    /// Normalise an 8-bit RGBA image. Alpha is dropped.
    pub fn from_rgba(img: &RgbaImage) -> Self {
        let pixels = img
            .pixels()
            .map(|p| {
                [
                    p[0] as f64 / 255.0,
                    p[1] as f64 / 255.0,
                    p[2] as f64 / 255.0,
                ]
            })
            .collect();
        Self {
            width: img.width(),
            height: img.height(),
            pixels,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    pub fn get(&self, x: u32, y: u32) -> Option<[f64; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels.get((y * self.width + x) as usize).copied()
    }

    pub fn pixels(&self) -> &[[f64; 3]] {
        &self.pixels
    }
}

/// Size that fits `(w, h)` inside a `max_side` square, keeping the aspect ratio.
/// Images already small enough keep their size.
pub fn fit_within(w: u32, h: u32, max_side: u32) -> (u32, u32) {
    let longest = w.max(h);
    if max_side == 0 || longest <= max_side {
        return (w, h);
    }
    let ratio = max_side as f32 / longest as f32;
    (
        ((w as f32) * ratio).round().max(1.0) as u32,
        ((h as f32) * ratio).round().max(1.0) as u32,
    )
}

/// Decode an encoded image and downsample it (nearest-neighbour) so that its
/// longest side is at most `max_side`.
pub fn decode_image(input: &[u8], max_side: u32) -> Result<PixelBuffer> {
    let img = image::load_from_memory(input)?;
    let (orig_w, orig_h) = img.dimensions();
    if orig_w == 0 || orig_h == 0 {
        return Err(Error::EmptyImage);
    }

    let (w, h) = fit_within(orig_w, orig_h, max_side);
    let working: DynamicImage = if (w, h) == (orig_w, orig_h) {
        img
    } else {
        debug!("downsampling {orig_w}x{orig_h} to {w}x{h}");
        DynamicImage::ImageRgba8(image::imageops::resize(&img, w, h, FilterType::Nearest))
    };

    Ok(PixelBuffer::from_rgba(&working.to_rgba8()))
}

/// PNG-encode an RGBA image.
pub fn encode_png(img: &RgbaImage) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    {
        let mut cursor = std::io::Cursor::new(&mut buf);
        img.write_to(&mut cursor, ImageFormat::Png)?;
    }
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn new_rejects_mismatched_pixel_count() {
        let err = PixelBuffer::new(2, 2, vec![[0.0; 3]; 3]).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[test]
    fn from_rgba_normalises_channels_and_drops_alpha() {
        let img = RgbaImage::from_pixel(1, 1, Rgba([255, 0, 51, 10]));
        let buf = PixelBuffer::from_rgba(&img);
        assert_eq!(buf.get(0, 0), Some([1.0, 0.0, 0.2]));
        assert_eq!(buf.get(1, 0), None);
    }

    #[test]
    fn fit_within_keeps_aspect_ratio() {
        assert_eq!(fit_within(400, 200, 100), (100, 50));
        assert_eq!(fit_within(50, 20, 100), (50, 20));
        assert_eq!(fit_within(1000, 1, 10), (10, 1));
    }

    #[test]
    fn png_round_trips_through_decode() {
        let img = RgbaImage::from_fn(4, 2, |x, _| {
            if x < 2 { Rgba([255, 0, 0, 255]) } else { Rgba([0, 0, 255, 255]) }
        });
        let png = encode_png(&img).unwrap();
        let buf = decode_image(&png, 2).unwrap();
        assert_eq!((buf.width(), buf.height()), (2, 1));
        assert_eq!(buf.get(0, 0), Some([1.0, 0.0, 0.0]));
        assert_eq!(buf.get(1, 0), Some([0.0, 0.0, 1.0]));
    }

    #[test]
    fn decode_rejects_garbage() {
        assert!(matches!(decode_image(b"not an image", 64), Err(Error::Image(_))));
    }
}
