//! 3x3 grid reconstruction with outlier rejection
//!
//! Nine classified stickers are ordered row-major by splitting the
//! y-sorted sequence into three rows and sorting each row by x. The layout
//! is accepted only if the leftmost, rightmost, topmost and bottommost
//! stickers all sit within a size-proportional gap of the center sticker.
//! Exactly nine stickers are required; other counts never produce a grid.

use serde::Serialize;
use tracing::{debug, trace};

use super::classifier::ClassifiedSquare;
use crate::color::CubeColor;
use crate::config::GridConfig;
use crate::constants::thresholds;

const GRID_SIDE: usize = 3;

/// Nine stickers in row-major order, top-left to bottom-right
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Grid {
    cells: [ClassifiedSquare; thresholds::FACE_STICKERS],
}

impl Grid {
    pub fn cells(&self) -> &[ClassifiedSquare; thresholds::FACE_STICKERS] {
        &self.cells
    }

    /// The middle sticker (position 4)
    pub fn center(&self) -> &ClassifiedSquare {
        &self.cells[4]
    }

    pub fn at(&self, row: usize, col: usize) -> Option<&ClassifiedSquare> {
        if row < GRID_SIDE && col < GRID_SIDE {
            self.cells.get(row * GRID_SIDE + col)
        } else {
            None
        }
    }

    pub fn colors(&self) -> [CubeColor; thresholds::FACE_STICKERS] {
        self.cells.map(|cell| cell.color)
    }

    /// Top, middle and bottom rows, each left to right
    pub fn rows(&self) -> impl Iterator<Item = &[ClassifiedSquare]> {
        self.cells.chunks(GRID_SIDE)
    }
}

/// Orders and validates the stickers of one frame
#[derive(Debug, Clone)]
pub struct GridReconstructor {
    gap_multiplier: f64,
}

impl Default for GridReconstructor {
    fn default() -> Self {
        Self::new()
    }
}

impl GridReconstructor {
    pub fn new() -> Self {
        Self {
            gap_multiplier: thresholds::GRID_GAP_MULTIPLIER,
        }
    }

    pub fn with_gap_multiplier(gap_multiplier: f64) -> Self {
        Self { gap_multiplier }
    }

    pub fn from_config(config: &GridConfig) -> Self {
        Self::with_gap_multiplier(config.gap_multiplier)
    }

    /// Build a grid from the classified stickers of one frame
    ///
    /// Returns `None` unless there are exactly nine stickers and the outer
    /// ones are coherent with the center sticker.
    pub fn reconstruct(&self, squares: &[ClassifiedSquare]) -> Option<Grid> {
        if squares.len() != thresholds::FACE_STICKERS {
            trace!(count = squares.len(), "need exactly nine stickers");
            return None;
        }

        let mut by_x: Vec<&ClassifiedSquare> = squares.iter().collect();
        by_x.sort_by_key(|s| s.square.x);
        let mut by_y: Vec<&ClassifiedSquare> = squares.iter().collect();
        by_y.sort_by_key(|s| s.square.y);

        let ordered: Vec<ClassifiedSquare> = by_y
            .chunks(GRID_SIDE)
            .flat_map(|row| {
                let mut row = row.to_vec();
                row.sort_by_key(|s| s.square.x);
                row
            })
            .copied()
            .collect();
        let cells: [ClassifiedSquare; thresholds::FACE_STICKERS] = ordered.try_into().ok()?;

        let center = cells[4].square;
        let gap_w = (center.width as f64 * self.gap_multiplier) as i64;
        let gap_h = (center.height as f64 * self.gap_multiplier) as i64;

        let leftmost = by_x.first()?.square;
        let rightmost = by_x.last()?.square;
        let topmost = by_y.first()?.square;
        let bottommost = by_y.last()?.square;

        let offset = |from: i32, to: i32| i64::from(to) - i64::from(from);
        let coherent = offset(leftmost.x, center.x) <= gap_w
            && offset(center.x, rightmost.x) <= gap_w
            && offset(topmost.y, center.y) <= gap_h
            && offset(center.y, bottommost.y) <= gap_h;

        if !coherent {
            debug!(
                center_x = center.x,
                center_y = center.y,
                gap_w,
                gap_h,
                "stickers not coherent with the center sticker"
            );
            return None;
        }

        Some(Grid { cells })
    }
}
