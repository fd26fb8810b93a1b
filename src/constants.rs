//! Colorimetric reference values and calibration defaults
//!
//! The geometric and color thresholds were tuned for one camera distance and
//! resolution. They are configuration defaults, not derived constants.

/// D65 Standard Illuminant Reference (2° observer)
pub mod d65 {
    /// D65 white point in CIE XYZ, scaled so that Y = 100
    pub const WHITE_POINT_XYZ: [f64; 3] = [95.047, 100.000, 108.883];
}

/// sRGB companding and CIE Lab transfer constants
pub mod srgb {
    /// Below this normalized value the sRGB curve is linear
    pub const GAMMA_THRESHOLD: f64 = 0.04045;

    /// Slope of the linear segment of the sRGB curve
    pub const LINEAR_SLOPE: f64 = 12.92;

    /// Exponent of the power-law segment of the sRGB curve
    pub const GAMMA: f64 = 2.4;

    /// Linear RGB to XYZ matrix for sRGB primaries (rows: X, Y, Z)
    pub const RGB_TO_XYZ: [[f64; 3]; 3] = [
        [0.4124, 0.3576, 0.1805],
        [0.2126, 0.7152, 0.0722],
        [0.0193, 0.1192, 0.9505],
    ];

    /// Below this normalized XYZ value the Lab transfer is linear
    pub const LAB_EPSILON: f64 = 0.008856;

    /// Slope of the linear Lab transfer segment
    pub const LAB_KAPPA_SLOPE: f64 = 7.787;

    /// Decimal places kept after conversion
    pub const ROUNDING_DECIMALS: i32 = 4;
}

/// Sticker geometry defaults
pub mod geometry {
    /// Polygon simplification tolerance as a fraction of the perimeter
    pub const POLY_APPROX_EPSILON: f64 = 0.10;

    /// Minimum width/height ratio for a sticker
    pub const MIN_ASPECT_RATIO: f64 = 0.8;

    /// Maximum width/height ratio for a sticker
    pub const MAX_ASPECT_RATIO: f64 = 1.2;

    /// Minimum bounding box width in pixels
    pub const MIN_WIDTH: i32 = 30;

    /// Maximum bounding box width in pixels
    pub const MAX_WIDTH: i32 = 80;

    /// Minimum enclosed polygon area in square pixels
    pub const MIN_AREA: f64 = 900.0;
}

/// Dominant color clustering defaults
pub mod clustering {
    /// Number of clusters
    pub const CLUSTERS: usize = 1;

    /// Iteration cap per attempt
    pub const MAX_ITERATIONS: usize = 10;

    /// Center movement below which an attempt has converged
    pub const EPSILON: f64 = 1.0;

    /// Number of randomly initialized attempts
    pub const ATTEMPTS: usize = 10;
}

/// Classification and grid reconstruction defaults
pub mod thresholds {
    /// Palette matches at or above this ΔE00 are rejected.
    /// Large on purpose: dim lighting desaturates sticker colors.
    pub const MAX_DELTA_E: f64 = 80.0;

    /// Allowed offset of the outer stickers from the center sticker,
    /// in multiples of the center sticker's size
    pub const GRID_GAP_MULTIPLIER: f64 = 1.7;

    /// Number of stickers on one cube face
    pub const FACE_STICKERS: usize = 9;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_d65_constants() {
        assert!((d65::WHITE_POINT_XYZ[0] - 95.047).abs() < 1e-9);
        assert!((d65::WHITE_POINT_XYZ[1] - 100.0).abs() < 1e-9);
        assert!((d65::WHITE_POINT_XYZ[2] - 108.883).abs() < 1e-9);
    }

    #[test]
    fn test_rgb_to_xyz_white_maps_to_white_point() {
        // Rows of the matrix sum to the white point / 100
        for (row, white) in srgb::RGB_TO_XYZ.iter().zip(d65::WHITE_POINT_XYZ) {
            let sum: f64 = row.iter().sum();
            assert!((sum * 100.0 - white).abs() < 0.05);
        }
    }

    #[test]
    fn test_threshold_ranges() {
        assert!(geometry::MIN_ASPECT_RATIO < geometry::MAX_ASPECT_RATIO);
        assert!(geometry::MIN_WIDTH < geometry::MAX_WIDTH);
        assert!(thresholds::MAX_DELTA_E > 0.0);
        assert_eq!(thresholds::FACE_STICKERS, 9);
    }
}
