//! Palette classification of sticker candidates
//!
//! Each candidate's region is reduced to its dominant color, converted to
//! Lab and compared with every palette reference using ΔE00. The closest
//! reference wins if it is strictly closer than the rejection threshold.

use serde::Serialize;
use tracing::trace;

use super::square::SquareCandidate;
use crate::color::{ciede2000, Bgr, ColorConverter, CubeColor, CubePalette, DominantColorExtractor, LabColor};
use crate::config::ScanConfig;
use crate::constants::thresholds;
use crate::error::{Result, ScanError};
use crate::frame::Region;

/// Closest palette reference for a color
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ColorMatch {
    pub color: CubeColor,
    pub delta_e: f64,
}

/// Sticker candidate carrying its palette label
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ClassifiedSquare {
    #[serde(flatten)]
    pub square: SquareCandidate,
    pub color: CubeColor,
    /// ΔE00 to the winning palette reference
    pub delta_e: f64,
}

/// Nearest-palette classifier with a rejection threshold
#[derive(Debug, Clone)]
pub struct PaletteClassifier {
    converter: ColorConverter,
    extractor: DominantColorExtractor,
    references: Vec<(CubeColor, LabColor)>,
    max_delta_e: f64,
}

impl PaletteClassifier {
    /// Create a classifier with the default extractor and threshold
    ///
    /// # Errors
    ///
    /// Returns `ScanError::EmptyPalette` if the palette has no entries.
    pub fn new(palette: &CubePalette) -> Result<Self> {
        Self::with_params(palette, DominantColorExtractor::new(), thresholds::MAX_DELTA_E)
    }

    /// Create a classifier with a custom extractor and threshold
    pub fn with_params(
        palette: &CubePalette,
        extractor: DominantColorExtractor,
        max_delta_e: f64,
    ) -> Result<Self> {
        if palette.is_empty() {
            return Err(ScanError::EmptyPalette);
        }

        let converter = ColorConverter::new();
        let references = palette
            .entries()
            .iter()
            .map(|entry| (entry.color, converter.bgr_to_lab(entry.device_color())))
            .collect();

        Ok(Self {
            converter,
            extractor,
            references,
            max_delta_e,
        })
    }

    pub fn from_config(config: &ScanConfig) -> Result<Self> {
        Self::with_params(
            &config.palette,
            DominantColorExtractor::from_config(&config.clustering),
            config.classification.max_delta_e,
        )
    }

    pub fn max_delta_e(&self) -> f64 {
        self.max_delta_e
    }

    /// Closest palette reference, regardless of threshold.
    ///
    /// On equal distances the earlier palette entry wins.
    pub fn nearest(&self, lab: LabColor) -> Option<ColorMatch> {
        let mut best: Option<ColorMatch> = None;
        for &(color, reference) in &self.references {
            let delta_e = ciede2000(reference, lab);
            if best.map_or(true, |current| delta_e < current.delta_e) {
                best = Some(ColorMatch { color, delta_e });
            }
        }
        best
    }

    /// Match a device color, rejecting matches at or beyond the threshold
    pub fn match_color(&self, color: Bgr) -> Option<ColorMatch> {
        let lab = self.converter.bgr_to_lab(color);
        let best = self.nearest(lab)?;
        if best.delta_e < self.max_delta_e {
            Some(best)
        } else {
            trace!(
                color = %best.color,
                delta_e = best.delta_e,
                "closest palette color beyond threshold"
            );
            None
        }
    }

    /// Classify a candidate from the pixels it bounds
    ///
    /// # Errors
    ///
    /// Returns `ScanError::EmptyRegion` if `region` has no pixels.
    pub fn classify(&self, square: SquareCandidate, region: &Region) -> Result<Option<ClassifiedSquare>> {
        let dominant = self.extractor.dominant_color(region)?;
        Ok(self.match_color(dominant).map(|found| ClassifiedSquare {
            square,
            color: found.color,
            delta_e: found.delta_e,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::PaletteEntry;
    use crate::geometry::Rect;
    use approx::assert_abs_diff_eq;

    fn uniform_region(bgr: [u8; 3], count: usize) -> Region {
        Region {
            rect: Rect::new(0, 0, count as i32, 1),
            pixels: vec![Bgr::from(bgr); count],
        }
    }

    #[test]
    fn test_empty_palette_is_an_error() {
        let result = PaletteClassifier::new(&CubePalette::new(Vec::new()));
        assert!(matches!(result, Err(ScanError::EmptyPalette)));
    }

    #[test]
    fn test_reference_colors_match_themselves() {
        let palette = CubePalette::default();
        let classifier = PaletteClassifier::new(&palette).unwrap();

        for entry in palette.entries() {
            let found = classifier.match_color(entry.device_color()).unwrap();
            assert_eq!(found.color, entry.color);
            assert_abs_diff_eq!(found.delta_e, 0.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_desaturated_colors_still_match() {
        let classifier = PaletteClassifier::new(&CubePalette::default()).unwrap();

        let dim_red = classifier.match_color(Bgr::from_u8(40, 40, 170)).unwrap();
        assert_eq!(dim_red.color, CubeColor::Red);

        let dim_green = classifier.match_color(Bgr::from_u8(60, 180, 50)).unwrap();
        assert_eq!(dim_green.color, CubeColor::Green);

        let off_white = classifier.match_color(Bgr::from_u8(225, 230, 235)).unwrap();
        assert_eq!(off_white.color, CubeColor::White);
    }

    #[test]
    fn test_mid_gray_rejected_beyond_threshold() {
        let palette = CubePalette::default();
        let gray = Bgr::from_u8(128, 128, 128);

        let lenient = PaletteClassifier::new(&palette).unwrap();
        let nearest = lenient.nearest(lenient.converter.bgr_to_lab(gray)).unwrap();
        // Gray sits roughly 30 ΔE00 from every saturated reference
        assert!(nearest.delta_e > 30.0);

        let strict = PaletteClassifier::with_params(&palette, DominantColorExtractor::new(), 30.0).unwrap();
        assert!(strict.match_color(gray).is_none());
    }

    #[test]
    fn test_threshold_is_strict() {
        let palette = CubePalette::default();
        let gray = Bgr::from_u8(128, 128, 128);
        let default_classifier = PaletteClassifier::new(&palette).unwrap();
        let gray_lab = default_classifier.converter.bgr_to_lab(gray);
        let distance = default_classifier.nearest(gray_lab).unwrap().delta_e;

        let at_threshold =
            PaletteClassifier::with_params(&palette, DominantColorExtractor::new(), distance).unwrap();
        assert!(at_threshold.match_color(gray).is_none());

        let above = PaletteClassifier::with_params(&palette, DominantColorExtractor::new(), distance + 1e-6)
            .unwrap();
        assert!(above.match_color(gray).is_some());
    }

    #[test]
    fn test_tie_goes_to_first_entry() {
        let palette = CubePalette::new(vec![
            PaletteEntry::new(CubeColor::Blue, [255, 0, 0]),
            PaletteEntry::new(CubeColor::Green, [255, 0, 0]),
        ]);
        let classifier = PaletteClassifier::new(&palette).unwrap();
        let found = classifier.match_color(Bgr::from_u8(250, 5, 5)).unwrap();
        assert_eq!(found.color, CubeColor::Blue);
    }

    #[test]
    fn test_classify_attaches_label() {
        let classifier = PaletteClassifier::new(&CubePalette::default()).unwrap();
        let square = SquareCandidate::new(10, 20, 40, 40);

        let classified = classifier
            .classify(square, &uniform_region([0, 255, 255], 1600))
            .unwrap()
            .unwrap();
        assert_eq!(classified.square, square);
        assert_eq!(classified.color, CubeColor::Yellow);
    }

    #[test]
    fn test_classify_empty_region_fails_loudly() {
        let classifier = PaletteClassifier::new(&CubePalette::default()).unwrap();
        let result = classifier.classify(SquareCandidate::new(0, 0, 40, 40), &uniform_region([0, 0, 0], 0));
        assert!(matches!(result, Err(ScanError::EmptyRegion { .. })));
    }

    #[test]
    fn test_classified_square_serialization() {
        let classified = ClassifiedSquare {
            square: SquareCandidate::new(1, 2, 3, 4),
            color: CubeColor::Orange,
            delta_e: 0.5,
        };
        let json = serde_json::to_value(classified).unwrap();
        assert_eq!(json["x"], 1);
        assert_eq!(json["height"], 4);
        assert_eq!(json["color"], "orange");
    }
}
