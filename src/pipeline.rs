//! Per-frame face detection pipeline
//!
//! Data flows strictly downstream: polygons -> square candidates ->
//! classified stickers -> validated grid. Each frame is independent, so a
//! batch of frames can be processed in parallel; results keep input order.

use rayon::prelude::*;
use tracing::debug;

use crate::config::ScanConfig;
use crate::detection::{ClassifiedSquare, Grid, GridReconstructor, PaletteClassifier, SquareFilter};
use crate::error::Result;
use crate::frame::Frame;
use crate::geometry::Polygon;

/// One frame plus the polygon candidates extracted from it
#[derive(Debug, Clone)]
pub struct FrameInput {
    pub frame: Frame,
    pub polygons: Vec<Polygon>,
}

/// Face detector built once from a configuration and reused for every frame
#[derive(Debug, Clone)]
pub struct FaceDetector {
    filter: SquareFilter,
    classifier: PaletteClassifier,
    reconstructor: GridReconstructor,
}

impl FaceDetector {
    /// Build a detector from a validated configuration
    ///
    /// # Errors
    ///
    /// Returns the first validation error of `config`.
    pub fn new(config: &ScanConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            filter: SquareFilter::from_config(&config.square_filter),
            classifier: PaletteClassifier::from_config(config)?,
            reconstructor: GridReconstructor::from_config(&config.grid),
        })
    }

    /// Filter and classify the polygons of one frame
    pub fn classify_squares(&self, frame: &Frame, polygons: &[Polygon]) -> Result<Vec<ClassifiedSquare>> {
        let candidates = self.filter.filter_all(polygons);

        let mut classified = Vec::with_capacity(candidates.len());
        for candidate in candidates.iter().copied() {
            let region = frame.region(&candidate.rect());
            if let Some(square) = self.classifier.classify(candidate, &region)? {
                classified.push(square);
            }
        }

        debug!(
            polygons = polygons.len(),
            candidates = candidates.len(),
            classified = classified.len(),
            "stickers classified"
        );
        Ok(classified)
    }

    /// Detect the face grid of one frame
    ///
    /// `Ok(None)` means this frame has no usable detection; move on to the
    /// next one.
    pub fn detect(&self, frame: &Frame, polygons: &[Polygon]) -> Result<Option<Grid>> {
        let squares = self.classify_squares(frame, polygons)?;
        let grid = self.reconstructor.reconstruct(&squares);
        if let Some(grid) = &grid {
            debug!(colors = ?grid.colors(), "face grid detected");
        }
        Ok(grid)
    }

    /// Detect grids for many frames in parallel, results in input order
    pub fn detect_batch(&self, inputs: &[FrameInput]) -> Vec<Result<Option<Grid>>> {
        inputs
            .par_iter()
            .map(|input| self.detect(&input.frame, &input.polygons))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::CubeColor;
    use crate::error::ScanError;
    use image::{Rgb, RgbImage};

    const SIDE: i32 = 40;
    const PITCH: i32 = 50;
    const ORIGIN: i32 = 20;

    fn sticker_polygon(row: i32, col: i32) -> Polygon {
        let x = ORIGIN + col * PITCH;
        let y = ORIGIN + row * PITCH;
        Polygon::from_coords(&[
            (x, y),
            (x + SIDE - 1, y),
            (x + SIDE - 1, y + SIDE - 1),
            (x, y + SIDE - 1),
        ])
    }

    /// Frame with a gray background and nine stickers painted in `colors` (RGB)
    fn face_frame(colors: &[[u8; 3]; 9]) -> Frame {
        let image = RgbImage::from_fn(200, 200, |x, y| {
            let (x, y) = (x as i32, y as i32);
            for (i, rgb) in colors.iter().enumerate() {
                let sx = ORIGIN + (i as i32 % 3) * PITCH;
                let sy = ORIGIN + (i as i32 / 3) * PITCH;
                if x >= sx && x < sx + SIDE && y >= sy && y < sy + SIDE {
                    return Rgb(*rgb);
                }
            }
            Rgb([90, 90, 90])
        });
        Frame::from_rgb_image(image)
    }

    fn all_polygons() -> Vec<Polygon> {
        (0..9).map(|i| sticker_polygon(i / 3, i % 3)).collect()
    }

    #[test]
    fn test_detect_uniform_face() {
        let detector = FaceDetector::new(&ScanConfig::default()).unwrap();
        let frame = face_frame(&[[255, 255, 0]; 9]);

        let grid = detector.detect(&frame, &all_polygons()).unwrap().unwrap();
        assert!(grid.colors().iter().all(|&c| c == CubeColor::Yellow));
    }

    #[test]
    fn test_missing_sticker_yields_no_grid() {
        let detector = FaceDetector::new(&ScanConfig::default()).unwrap();
        let frame = face_frame(&[[255, 255, 255]; 9]);
        let mut polygons = all_polygons();
        polygons.pop();

        assert!(detector.detect(&frame, &polygons).unwrap().is_none());
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let mut config = ScanConfig::default();
        config.classification.max_delta_e = 0.0;
        assert!(matches!(
            FaceDetector::new(&config),
            Err(ScanError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_batch_keeps_frame_order() {
        let detector = FaceDetector::new(&ScanConfig::default()).unwrap();
        let inputs = vec![
            FrameInput {
                frame: face_frame(&[[255, 0, 0]; 9]),
                polygons: all_polygons(),
            },
            FrameInput {
                frame: face_frame(&[[0, 0, 255]; 9]),
                polygons: all_polygons()[..5].to_vec(),
            },
            FrameInput {
                frame: face_frame(&[[0, 0, 255]; 9]),
                polygons: all_polygons(),
            },
        ];

        let results = detector.detect_batch(&inputs);
        assert_eq!(results.len(), 3);
        assert_eq!(
            results[0].as_ref().unwrap().as_ref().unwrap().center().color,
            CubeColor::Red
        );
        assert!(results[1].as_ref().unwrap().is_none());
        assert_eq!(
            results[2].as_ref().unwrap().as_ref().unwrap().center().color,
            CubeColor::Blue
        );
    }
}
