//! Camera frame access
//!
//! A [`Frame`] owns the pixels of one captured image and hands out
//! rectangular sticker regions as device-order (blue-green-red) colors.
//! Frames can be built from a raw device buffer, from an `image` crate
//! buffer, or decoded from disk.
//!
//! Polygon lists for a frame are read from JSON: an array of polygons, each
//! an array of `{"x": .., "y": ..}` points.

use std::path::Path;

use image::{ImageReader, RgbImage};

use crate::color::Bgr;
use crate::error::{Result, ScanError};
use crate::geometry::{Polygon, Rect};

/// Pixels of one rectangular region, row by row
#[derive(Debug, Clone)]
pub struct Region {
    /// Region bounds after clipping to the frame
    pub rect: Rect,
    /// Device colors in row-major order
    pub pixels: Vec<Bgr>,
}

impl Region {
    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }
}

/// One captured frame
#[derive(Debug, Clone)]
pub struct Frame {
    image: RgbImage,
}

impl Frame {
    pub fn from_rgb_image(image: RgbImage) -> Self {
        Self { image }
    }

    /// Build a frame from an interleaved blue-green-red buffer
    ///
    /// # Errors
    ///
    /// Returns `ScanError::InvalidFrame` if `data` is not `width * height * 3` bytes.
    pub fn from_bgr_bytes(width: u32, height: u32, data: &[u8]) -> Result<Self> {
        let expected = width as usize * height as usize * 3;
        if data.len() != expected {
            return Err(ScanError::InvalidFrame {
                expected,
                actual: data.len(),
            });
        }

        let rgb: Vec<u8> = data
            .chunks_exact(3)
            .flat_map(|bgr| [bgr[2], bgr[1], bgr[0]])
            .collect();
        RgbImage::from_raw(width, height, rgb)
            .map(Self::from_rgb_image)
            .ok_or(ScanError::InvalidFrame {
                expected,
                actual: data.len(),
            })
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn as_rgb_image(&self) -> &RgbImage {
        &self.image
    }

    /// Device color at a pixel, if inside the frame
    pub fn pixel(&self, x: u32, y: u32) -> Option<Bgr> {
        self.image
            .get_pixel_checked(x, y)
            .map(|p| Bgr::from_u8(p[2], p[1], p[0]))
    }

    /// Clip a rectangle to the frame bounds
    pub fn clip(&self, rect: &Rect) -> Rect {
        let frame_w = i64::from(self.width());
        let frame_h = i64::from(self.height());
        let x0 = i64::from(rect.x).clamp(0, frame_w);
        let y0 = i64::from(rect.y).clamp(0, frame_h);
        let x1 = (i64::from(rect.x) + i64::from(rect.width)).clamp(x0, frame_w);
        let y1 = (i64::from(rect.y) + i64::from(rect.height)).clamp(y0, frame_h);
        Rect::new(x0 as i32, y0 as i32, (x1 - x0) as i32, (y1 - y0) as i32)
    }

    /// Pixels inside `rect`, clipped to the frame
    pub fn region(&self, rect: &Rect) -> Region {
        let clipped = self.clip(rect);
        let mut pixels = Vec::with_capacity(clipped.width.max(0) as usize * clipped.height.max(0) as usize);
        for y in clipped.y..clipped.y + clipped.height {
            for x in clipped.x..clipped.x + clipped.width {
                let p = self.image.get_pixel(x as u32, y as u32);
                pixels.push(Bgr::from_u8(p[2], p[1], p[0]));
            }
        }
        Region {
            rect: clipped,
            pixels,
        }
    }
}

/// Decode an image file into a frame
///
/// # Errors
///
/// Returns `ScanError::ImageLoad` if the file cannot be opened or decoded.
pub fn load_frame(path: &Path) -> Result<Frame> {
    let reader = ImageReader::open(path).map_err(|e| {
        ScanError::image_load(format!("Failed to open image file: {}", path.display()), e)
    })?;
    let reader = reader.with_guessed_format().map_err(|e| {
        ScanError::image_load(format!("Failed to detect image format: {}", path.display()), e)
    })?;
    let image = reader.decode().map_err(|e| {
        ScanError::image_load(format!("Failed to decode image: {}", path.display()), e)
    })?;

    Ok(Frame::from_rgb_image(image.to_rgb8()))
}

/// Read the polygon candidates of a frame from a JSON file
pub fn load_polygons(path: &Path) -> Result<Vec<Polygon>> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        ScanError::config(format!("Failed to read polygons: {}", path.display()), e)
    })?;
    serde_json::from_str(&content).map_err(|e| {
        ScanError::config(format!("Failed to parse polygons: {}", path.display()), e)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn test_from_bgr_bytes_reorders_channels() {
        // 2x1 frame: red, blue (device order)
        let data = [0, 0, 255, 255, 0, 0];
        let frame = Frame::from_bgr_bytes(2, 1, &data).unwrap();

        assert_eq!(frame.as_rgb_image().get_pixel(0, 0), &Rgb([255, 0, 0]));
        assert_eq!(frame.pixel(0, 0), Some(Bgr::from_u8(0, 0, 255)));
        assert_eq!(frame.pixel(1, 0), Some(Bgr::from_u8(255, 0, 0)));
        assert_eq!(frame.pixel(2, 0), None);
    }

    #[test]
    fn test_from_bgr_bytes_rejects_wrong_length() {
        match Frame::from_bgr_bytes(2, 2, &[0; 11]) {
            Err(ScanError::InvalidFrame {
                expected: 12,
                actual: 11,
            }) => {}
            other => panic!("Expected InvalidFrame, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_region_is_row_major() {
        let image = RgbImage::from_fn(4, 4, |x, y| Rgb([(x * 10) as u8, (y * 10) as u8, 0]));
        let frame = Frame::from_rgb_image(image);
        let region = frame.region(&Rect::new(1, 2, 2, 2));

        assert_eq!(region.rect, Rect::new(1, 2, 2, 2));
        assert_eq!(region.pixels.len(), 4);
        // Device order: b = 0, g = y * 10, r = x * 10
        assert_eq!(region.pixels[0], Bgr::from_u8(0, 20, 10));
        assert_eq!(region.pixels[1], Bgr::from_u8(0, 20, 20));
        assert_eq!(region.pixels[2], Bgr::from_u8(0, 30, 10));
    }

    #[test]
    fn test_region_is_clipped() {
        let frame = Frame::from_rgb_image(RgbImage::new(10, 10));
        let region = frame.region(&Rect::new(8, -3, 5, 5));
        assert_eq!(region.rect, Rect::new(8, 0, 2, 2));
        assert_eq!(region.pixels.len(), 4);

        let outside = frame.region(&Rect::new(20, 20, 5, 5));
        assert!(outside.is_empty());
        assert!(outside.rect.is_empty());
    }

    #[test]
    fn test_load_frame_missing_file() {
        let result = load_frame(Path::new("nonexistent_frame.png"));
        assert!(matches!(result, Err(ScanError::ImageLoad { .. })));
    }

    #[test]
    fn test_polygons_json_format() {
        let json = r#"[[{"x":0,"y":0},{"x":10,"y":0},{"x":10,"y":10}]]"#;
        let polygons: Vec<Polygon> = serde_json::from_str(json).unwrap();
        assert_eq!(polygons.len(), 1);
        assert_eq!(polygons[0], Polygon::from_coords(&[(0, 0), (10, 0), (10, 10)]));
    }
}
