//! Sticker candidate filtering
//!
//! Turns raw contour polygons into square candidates:
//! - Simplify to a quadrilateral with a perimeter-proportional tolerance
//! - Measure the bounding box and enclosed area
//! - Keep only near-square boxes of sticker size

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::config::SquareFilterConfig;
use crate::constants::geometry;
use crate::geometry::{Polygon, Rect};

/// A sticker-sized quadrilateral, not yet classified
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SquareCandidate {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl SquareCandidate {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

/// Geometric filter for sticker-like polygons
#[derive(Debug, Clone)]
pub struct SquareFilter {
    poly_epsilon: f64,
    min_aspect_ratio: f64,
    max_aspect_ratio: f64,
    min_width: i32,
    max_width: i32,
    min_area: f64,
}

impl Default for SquareFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl SquareFilter {
    /// Create a filter with the default calibration
    pub fn new() -> Self {
        Self {
            poly_epsilon: geometry::POLY_APPROX_EPSILON,
            min_aspect_ratio: geometry::MIN_ASPECT_RATIO,
            max_aspect_ratio: geometry::MAX_ASPECT_RATIO,
            min_width: geometry::MIN_WIDTH,
            max_width: geometry::MAX_WIDTH,
            min_area: geometry::MIN_AREA,
        }
    }

    pub fn from_config(config: &SquareFilterConfig) -> Self {
        Self {
            poly_epsilon: config.poly_approx_epsilon,
            min_aspect_ratio: config.min_aspect_ratio,
            max_aspect_ratio: config.max_aspect_ratio,
            min_width: config.min_width,
            max_width: config.max_width,
            min_area: config.min_area,
        }
    }

    /// Accept a polygon as a sticker candidate
    ///
    /// Returns `None` unless the polygon simplifies to exactly four vertices
    /// and its bounding box and area fall inside the configured ranges.
    pub fn filter(&self, polygon: &Polygon) -> Option<SquareCandidate> {
        let epsilon = self.poly_epsilon * polygon.arc_length(true);
        let approx = polygon.approximate(epsilon);
        if approx.len() != 4 {
            trace!(vertices = approx.len(), "polygon is not a quadrilateral");
            return None;
        }

        let rect = approx.bounding_rect()?;
        let area = approx.area();
        let ratio = rect.width as f64 / rect.height as f64;

        let accepted = ratio >= self.min_aspect_ratio
            && ratio <= self.max_aspect_ratio
            && rect.width >= self.min_width
            && rect.width <= self.max_width
            && area >= self.min_area;

        if !accepted {
            trace!(
                x = rect.x,
                y = rect.y,
                width = rect.width,
                height = rect.height,
                area,
                "quadrilateral outside sticker geometry"
            );
            return None;
        }

        Some(SquareCandidate::new(rect.x, rect.y, rect.width, rect.height))
    }

    /// Filter every polygon of a frame, keeping input order
    pub fn filter_all(&self, polygons: &[Polygon]) -> Vec<SquareCandidate> {
        polygons.iter().filter_map(|p| self.filter(p)).collect()
    }
}
