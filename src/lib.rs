//! # Cube Scan
//!
//! A Rust crate for reading the nine sticker colors of one Rubik's Cube face
//! from a single camera frame.
//!
//! Given the polygon candidates an external contour extractor found in a
//! frame, this library:
//! - Filters polygons down to sticker-sized squares
//! - Extracts each sticker's dominant color and matches it against the cube
//!   palette with the CIEDE2000 color difference
//! - Orders nine stickers into a row-major 3x3 grid and rejects layouts with
//!   spatially incoherent outliers
//!
//! A frame without a usable face yields `Ok(None)`; errors are reserved for
//! configuration and integration defects.
//!
//! ## Example
//!
//! ```rust,no_run
//! use cube_scan::{detect_face, frame::{load_frame, load_polygons}};
//! use std::path::Path;
//!
//! let frame = load_frame(Path::new("frame.png"))?;
//! let polygons = load_polygons(Path::new("frame_polygons.json"))?;
//! if let Some(grid) = detect_face(&frame, &polygons)? {
//!     println!("{:?}", grid.colors());
//! }
//! # Ok::<(), cube_scan::ScanError>(())
//! ```

pub mod color;
pub mod config;
pub mod constants;
pub mod detection;
pub mod error;
pub mod frame;
pub mod geometry;
pub mod pipeline;

pub use color::{Bgr, CubeColor, CubePalette, LabColor, PaletteEntry};
pub use config::ScanConfig;
pub use detection::{ClassifiedSquare, Grid, SquareCandidate};
pub use error::{Result, ScanError};
pub use frame::Frame;
pub use geometry::{Point, Polygon, Rect};
pub use pipeline::{FaceDetector, FrameInput};

/// Detect the face grid of one frame with the default configuration
///
/// For repeated use build a [`FaceDetector`] once and call
/// [`FaceDetector::detect`] per frame.
pub fn detect_face(frame: &Frame, polygons: &[Polygon]) -> Result<Option<Grid>> {
    FaceDetector::new(&ScanConfig::default())?.detect(frame, polygons)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_face_without_polygons() {
        let frame = Frame::from_rgb_image(image::RgbImage::new(64, 64));
        assert!(detect_face(&frame, &[]).unwrap().is_none());
    }
}
