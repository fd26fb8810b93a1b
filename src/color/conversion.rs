//! Color space conversion utilities
//!
//! Converts device colors (blue-green-red channel order, as delivered by
//! camera frame buffers) to CIE Lab under the D65 illuminant:
//! - sRGB gamma linearization
//! - Linear RGB to XYZ with sRGB primaries
//! - XYZ normalization by the D65 white point
//! - XYZ to Lab transfer
//!
//! Intermediate XYZ values and the final Lab coordinates are rounded to four
//! decimal places so results are reproducible across platforms.

use palette::{white_point::D65, Lab};
use serde::{Deserialize, Serialize};

use crate::constants::{d65, srgb};

/// CIE Lab color under D65 with double precision components
pub type LabColor = Lab<D65, f64>;

/// Device color in blue-green-red channel order.
///
/// Channels are nominally in [0, 255]. Fractional values appear when the
/// color is a cluster center rather than a raw pixel.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Bgr {
    pub b: f64,
    pub g: f64,
    pub r: f64,
}

impl Bgr {
    pub const fn new(b: f64, g: f64, r: f64) -> Self {
        Self { b, g, r }
    }

    /// Build from 8-bit channels in blue-green-red order
    pub fn from_u8(b: u8, g: u8, r: u8) -> Self {
        Self::new(b as f64, g as f64, r as f64)
    }

    pub fn to_array(self) -> [f64; 3] {
        [self.b, self.g, self.r]
    }

    pub fn from_array(channels: [f64; 3]) -> Self {
        Self::new(channels[0], channels[1], channels[2])
    }
}

impl From<[u8; 3]> for Bgr {
    fn from(bgr: [u8; 3]) -> Self {
        Self::from_u8(bgr[0], bgr[1], bgr[2])
    }
}

/// Device color to Lab converter
#[derive(Debug, Clone)]
pub struct ColorConverter {
    /// Reference white in XYZ (Y = 100)
    white_point: [f64; 3],
}

impl Default for ColorConverter {
    fn default() -> Self {
        Self::new()
    }
}

impl ColorConverter {
    /// Create a new color converter referenced to D65
    pub fn new() -> Self {
        Self {
            white_point: d65::WHITE_POINT_XYZ,
        }
    }

    /// Convert a blue-green-red device color to Lab
    ///
    /// # Arguments
    ///
    /// * `color` - Device color, channels in [0, 255]
    ///
    /// # Returns
    ///
    /// Lab color referenced to D65, rounded to four decimals
    pub fn bgr_to_lab(&self, color: Bgr) -> LabColor {
        let rgb = [color.r, color.g, color.b];
        let linear = rgb.map(|channel| linearize(channel / 255.0) * 100.0);

        let xyz = srgb::RGB_TO_XYZ.map(|row| {
            round_decimals(row[0] * linear[0] + row[1] * linear[1] + row[2] * linear[2])
        });

        let f = [0, 1, 2].map(|i| lab_transfer(xyz[i] / self.white_point[i]));

        LabColor::new(
            round_decimals(116.0 * f[1] - 16.0),
            round_decimals(500.0 * (f[0] - f[1])),
            round_decimals(200.0 * (f[1] - f[2])),
        )
    }

    /// Convert 8-bit blue-green-red channels to Lab
    pub fn bgr8_to_lab(&self, bgr: [u8; 3]) -> LabColor {
        self.bgr_to_lab(Bgr::from(bgr))
    }
}

/// Inverse sRGB companding of a normalized channel
fn linearize(value: f64) -> f64 {
    if value > srgb::GAMMA_THRESHOLD {
        ((value + 0.055) / 1.055).powf(srgb::GAMMA)
    } else {
        value / srgb::LINEAR_SLOPE
    }
}

/// CIE Lab companding of a white-normalized XYZ component
fn lab_transfer(value: f64) -> f64 {
    if value > srgb::LAB_EPSILON {
        value.powf(1.0 / 3.0)
    } else {
        srgb::LAB_KAPPA_SLOPE * value + 16.0 / 116.0
    }
}

fn round_decimals(value: f64) -> f64 {
    let scale = 10f64.powi(srgb::ROUNDING_DECIMALS);
    (value * scale).round() / scale
}
