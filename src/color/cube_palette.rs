//! Reference palette of the six cube face colors

use std::fmt;

use serde::{Deserialize, Serialize};

use super::conversion::Bgr;

/// One of the six canonical sticker colors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CubeColor {
    White,
    Yellow,
    Red,
    Orange,
    Blue,
    Green,
}

impl CubeColor {
    pub const ALL: [CubeColor; 6] = [
        CubeColor::White,
        CubeColor::Yellow,
        CubeColor::Red,
        CubeColor::Orange,
        CubeColor::Blue,
        CubeColor::Green,
    ];

    pub fn name(self) -> &'static str {
        match self {
            CubeColor::White => "white",
            CubeColor::Yellow => "yellow",
            CubeColor::Red => "red",
            CubeColor::Orange => "orange",
            CubeColor::Blue => "blue",
            CubeColor::Green => "green",
        }
    }
}

impl fmt::Display for CubeColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Mapping from a palette name to its reference device color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaletteEntry {
    pub color: CubeColor,
    /// Reference color, blue-green-red channel order
    pub bgr: [u8; 3],
}

impl PaletteEntry {
    pub const fn new(color: CubeColor, bgr: [u8; 3]) -> Self {
        Self { color, bgr }
    }

    pub fn device_color(&self) -> Bgr {
        Bgr::from(self.bgr)
    }
}

/// Read-only palette table, built once and shared by every frame
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CubePalette {
    entries: Vec<PaletteEntry>,
}

impl Default for CubePalette {
    fn default() -> Self {
        Self::new(vec![
            PaletteEntry::new(CubeColor::White, [255, 255, 255]),
            PaletteEntry::new(CubeColor::Yellow, [0, 255, 255]),
            PaletteEntry::new(CubeColor::Red, [0, 0, 255]),
            PaletteEntry::new(CubeColor::Orange, [0, 165, 255]),
            PaletteEntry::new(CubeColor::Blue, [255, 0, 0]),
            PaletteEntry::new(CubeColor::Green, [0, 255, 0]),
        ])
    }
}

impl CubePalette {
    pub fn new(entries: Vec<PaletteEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[PaletteEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Reference entry for a color, if present
    pub fn get(&self, color: CubeColor) -> Option<&PaletteEntry> {
        self.entries.iter().find(|entry| entry.color == color)
    }
}
