//! CIEDE2000 color difference
//!
//! Full CIE 2000 formula: lightness, chroma and hue weighting functions plus
//! the rotation term for blue hues. Classification thresholds are calibrated
//! against this metric; a Euclidean Lab distance is not interchangeable.

use palette::color_difference::Ciede2000;

use super::conversion::LabColor;

/// Compute ΔE00 between two Lab colors
///
/// Returns a non-negative difference; 0 for identical colors. The result is
/// symmetric in its arguments.
pub fn ciede2000(reference: LabColor, sample: LabColor) -> f64 {
    reference.difference(sample)
}
