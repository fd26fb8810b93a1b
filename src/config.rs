//! Configuration structures for the cube face scanning pipeline.
//!
//! All tunable parameters are grouped by stage: sticker geometry, dominant
//! color clustering, palette classification and grid reconstruction, plus the
//! reference palette itself.
//!
//! # Configuration Loading
//!
//! ```no_run
//! use cube_scan::ScanConfig;
//! use std::path::Path;
//!
//! // Load from file; missing fields take their defaults
//! let config = ScanConfig::from_json_file(Path::new("scan.json"))?;
//!
//! // Or use defaults
//! let config = ScanConfig::default();
//! # Ok::<(), cube_scan::ScanError>(())
//! ```
//!
//! The default thresholds were calibrated for one camera distance and
//! resolution and will usually need adjusting for another setup.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::color::CubePalette;
use crate::constants::{clustering, geometry, thresholds};
use crate::error::{Result, ScanError};

/// Complete scanning configuration.
///
/// Built once at startup and shared read-only by every frame.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Sticker geometry filter
    pub square_filter: SquareFilterConfig,

    /// Dominant color clustering
    pub clustering: ClusteringConfig,

    /// Palette matching
    pub classification: ClassificationConfig,

    /// Grid coherence check
    pub grid: GridConfig,

    /// Reference colors of the six faces
    pub palette: CubePalette,
}

/// Geometric thresholds for sticker-like quadrilaterals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SquareFilterConfig {
    /// Polygon approximation epsilon as fraction of perimeter
    pub poly_approx_epsilon: f64,

    /// Minimum width/height ratio
    pub min_aspect_ratio: f64,

    /// Maximum width/height ratio
    pub max_aspect_ratio: f64,

    /// Minimum bounding box width in pixels
    pub min_width: i32,

    /// Maximum bounding box width in pixels
    pub max_width: i32,

    /// Minimum enclosed area in square pixels
    pub min_area: f64,
}

impl Default for SquareFilterConfig {
    fn default() -> Self {
        Self {
            poly_approx_epsilon: geometry::POLY_APPROX_EPSILON,
            min_aspect_ratio: geometry::MIN_ASPECT_RATIO,
            max_aspect_ratio: geometry::MAX_ASPECT_RATIO,
            min_width: geometry::MIN_WIDTH,
            max_width: geometry::MAX_WIDTH,
            min_area: geometry::MIN_AREA,
        }
    }
}

/// k-means parameters for dominant color extraction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusteringConfig {
    /// Number of clusters; the most populated one is the dominant color
    pub clusters: usize,

    /// Iteration cap per attempt
    pub max_iterations: usize,

    /// Convergence threshold on center movement
    pub epsilon: f64,

    /// Randomly initialized attempts; the most compact wins
    pub attempts: usize,

    /// Fixed seed for reproducible runs
    pub seed: Option<u64>,
}

impl Default for ClusteringConfig {
    fn default() -> Self {
        Self {
            clusters: clustering::CLUSTERS,
            max_iterations: clustering::MAX_ITERATIONS,
            epsilon: clustering::EPSILON,
            attempts: clustering::ATTEMPTS,
            seed: None,
        }
    }
}

/// Palette matching parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassificationConfig {
    /// Matches must be strictly closer than this ΔE00
    pub max_delta_e: f64,
}

impl Default for ClassificationConfig {
    fn default() -> Self {
        Self {
            max_delta_e: thresholds::MAX_DELTA_E,
        }
    }
}

/// Grid reconstruction parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Allowed distance of the outer stickers from the center sticker, in
    /// multiples of the center sticker's width/height
    pub gap_multiplier: f64,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            gap_multiplier: thresholds::GRID_GAP_MULTIPLIER,
        }
    }
}

impl ScanConfig {
    /// Check that every parameter is usable
    ///
    /// # Errors
    ///
    /// Returns `ScanError::InvalidParameter` naming the first offending field,
    /// or `ScanError::EmptyPalette` when the palette has no entries.
    pub fn validate(&self) -> Result<()> {
        let filter = &self.square_filter;
        if !(filter.poly_approx_epsilon > 0.0) {
            return Err(ScanError::invalid_parameter(
                "square_filter.poly_approx_epsilon",
                filter.poly_approx_epsilon,
            ));
        }
        if !(filter.min_aspect_ratio > 0.0 && filter.min_aspect_ratio <= filter.max_aspect_ratio) {
            return Err(ScanError::invalid_parameter(
                "square_filter.min_aspect_ratio",
                filter.min_aspect_ratio,
            ));
        }
        if filter.min_width < 1 || filter.min_width > filter.max_width {
            return Err(ScanError::invalid_parameter(
                "square_filter.min_width",
                filter.min_width,
            ));
        }
        if !(filter.min_area >= 0.0) {
            return Err(ScanError::invalid_parameter(
                "square_filter.min_area",
                filter.min_area,
            ));
        }

        let clustering = &self.clustering;
        if clustering.clusters == 0 {
            return Err(ScanError::invalid_parameter("clustering.clusters", 0));
        }
        if clustering.max_iterations == 0 {
            return Err(ScanError::invalid_parameter("clustering.max_iterations", 0));
        }
        if clustering.attempts == 0 {
            return Err(ScanError::invalid_parameter("clustering.attempts", 0));
        }
        if !(clustering.epsilon >= 0.0) {
            return Err(ScanError::invalid_parameter(
                "clustering.epsilon",
                clustering.epsilon,
            ));
        }

        if !(self.classification.max_delta_e > 0.0) {
            return Err(ScanError::invalid_parameter(
                "classification.max_delta_e",
                self.classification.max_delta_e,
            ));
        }
        if !(self.grid.gap_multiplier > 0.0) {
            return Err(ScanError::invalid_parameter(
                "grid.gap_multiplier",
                self.grid.gap_multiplier,
            ));
        }
        if self.palette.is_empty() {
            return Err(ScanError::EmptyPalette);
        }
        Ok(())
    }

    /// Load configuration from JSON file
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ScanError::config(format!("Failed to read config: {}", path.display()), e)
        })?;
        let config: Self = serde_json::from_str(&content).map_err(|e| {
            ScanError::config(format!("Failed to parse config: {}", path.display()), e)
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to JSON file
    pub fn to_json_file(&self, path: &Path) -> Result<()> {
        let json = self.to_json()?;
        std::fs::write(path, json).map_err(|e| {
            ScanError::config(format!("Failed to write config: {}", path.display()), e)
        })
    }

    /// Pretty-printed JSON representation
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ScanError::config("Failed to serialize config", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ScanConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.square_filter.min_width, 30);
        assert_eq!(config.square_filter.max_width, 80);
        assert_eq!(config.classification.max_delta_e, 80.0);
        assert_eq!(config.grid.gap_multiplier, 1.7);
        assert_eq!(config.clustering.attempts, 10);
        assert_eq!(config.palette.len(), 6);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let json = r#"{ "classification": { "max_delta_e": 40.0 }, "grid": {} }"#;
        let config: ScanConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.classification.max_delta_e, 40.0);
        assert_eq!(config.grid.gap_multiplier, 1.7);
        assert_eq!(config.square_filter, SquareFilterConfig::default());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = ScanConfig::default();
        config.square_filter.min_width = 90;
        assert!(matches!(
            config.validate(),
            Err(ScanError::InvalidParameter { ref parameter, .. }) if parameter == "square_filter.min_width"
        ));

        let mut config = ScanConfig::default();
        config.grid.gap_multiplier = f64::NAN;
        assert!(config.validate().is_err());

        let mut config = ScanConfig::default();
        config.clustering.attempts = 0;
        assert!(config.validate().is_err());

        let mut config = ScanConfig::default();
        config.palette = CubePalette::new(Vec::new());
        assert!(matches!(config.validate(), Err(ScanError::EmptyPalette)));
    }

    #[test]
    fn test_json_roundtrip() {
        let mut config = ScanConfig::default();
        config.clustering.seed = Some(99);
        let json = config.to_json().unwrap();
        let parsed: ScanConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, parsed);
    }
}
