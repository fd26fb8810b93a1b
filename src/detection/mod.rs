//! Sticker detection module
//!
//! This module filters contour polygons into sticker candidates, labels
//! them against the cube palette and assembles the 3x3 face grid.

pub mod classifier;
pub mod grid;
pub mod square;

pub use classifier::{ClassifiedSquare, ColorMatch, PaletteClassifier};
pub use grid::{Grid, GridReconstructor};
pub use square::{SquareCandidate, SquareFilter};
