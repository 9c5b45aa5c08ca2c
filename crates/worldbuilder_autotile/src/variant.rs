//! Tile variants: the artwork role a cell plays within its terrain

use serde::{Deserialize, Serialize};
use std::fmt;

/// Logical autotile role of a tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VariantName {
    // 3x3 block
    TopLeft,
    Top,
    TopRight,
    Left,
    Center,
    Right,
    BottomLeft,
    Bottom,
    BottomRight,
    // Single-row and single-column strips
    HorLeft,
    HorCenter,
    HorRight,
    VerTop,
    VerCenter,
    VerBottom,
    Solo,
    // Plateau cliffs
    TopCenter,
    CenterLeft,
    CenterRight,
    BottomCenter,
    LongTop,
    LongCenter,
    LongBottom,
    WideLeft,
    WideCenter,
    WideRight,
    // Decorative bridge pieces
    Broken1,
    Broken2,
    Broken3,
}

impl VariantName {
    pub const fn as_str(self) -> &'static str {
        match self {
            VariantName::TopLeft => "TOP_LEFT",
            VariantName::Top => "TOP",
            VariantName::TopRight => "TOP_RIGHT",
            VariantName::Left => "LEFT",
            VariantName::Center => "CENTER",
            VariantName::Right => "RIGHT",
            VariantName::BottomLeft => "BOTTOM_LEFT",
            VariantName::Bottom => "BOTTOM",
            VariantName::BottomRight => "BOTTOM_RIGHT",
            VariantName::HorLeft => "HOR_LEFT",
            VariantName::HorCenter => "HOR_CENTER",
            VariantName::HorRight => "HOR_RIGHT",
            VariantName::VerTop => "VER_TOP",
            VariantName::VerCenter => "VER_CENTER",
            VariantName::VerBottom => "VER_BOTTOM",
            VariantName::Solo => "SOLO",
            VariantName::TopCenter => "TOP_CENTER",
            VariantName::CenterLeft => "CENTER_LEFT",
            VariantName::CenterRight => "CENTER_RIGHT",
            VariantName::BottomCenter => "BOTTOM_CENTER",
            VariantName::LongTop => "LONG_TOP",
            VariantName::LongCenter => "LONG_CENTER",
            VariantName::LongBottom => "LONG_BOTTOM",
            VariantName::WideLeft => "WIDE_LEFT",
            VariantName::WideCenter => "WIDE_CENTER",
            VariantName::WideRight => "WIDE_RIGHT",
            VariantName::Broken1 => "BROKEN1",
            VariantName::Broken2 => "BROKEN2",
            VariantName::Broken3 => "BROKEN3",
        }
    }
}

impl fmt::Display for VariantName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A resolved tile: its role plus where the renderer finds the artwork.
///
/// `source_x` / `source_y` are tile-sheet cell coordinates. The engine never
/// interprets them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileVariant {
    pub name: VariantName,
    pub source_x: u32,
    pub source_y: u32,
}

impl TileVariant {
    pub const fn new(name: VariantName, source_x: u32, source_y: u32) -> Self {
        Self {
            name,
            source_x,
            source_y,
        }
    }
}
