//! Color analysis and conversion module
//!
//! This module handles device-color to Lab conversion, CIEDE2000 color
//! difference, dominant color extraction and the cube reference palette.

pub mod analysis;
pub mod conversion;
pub mod cube_palette;
pub mod difference;

pub use analysis::{ClusterResult, DominantColorExtractor};
pub use conversion::{Bgr, ColorConverter, LabColor};
pub use cube_palette::{CubeColor, CubePalette, PaletteEntry};
pub use difference::ciede2000;
