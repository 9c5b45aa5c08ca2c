//! Terrain kinds and the string labels used on the wire

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::WorldError;

/// A paintable terrain type. Each kind selects one layer of the world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TerrainKind {
    #[serde(rename = "WATER")]
    Water,
    #[serde(rename = "FOAM")]
    Foam,
    #[serde(rename = "ROCKS")]
    Rocks,
    #[serde(rename = "SAND")]
    Sand,
    #[serde(rename = "GRASS")]
    Grass,
    #[serde(rename = "SHADOW")]
    Shadow,
    #[serde(rename = "STAIRS")]
    Stairs,
    #[serde(rename = "PLATEAU")]
    Plateau,
    #[serde(rename = "WALL")]
    Wall,
    #[serde(rename = "GRASSFILL")]
    GrassFill,
    #[serde(rename = "SANDFILL")]
    SandFill,
    #[serde(rename = "BRIDGE")]
    Bridge,
    #[serde(rename = "BRIDGESHADOW")]
    BridgeShadow,
    /// Declared for the tool palette; no layer backs it yet
    #[serde(rename = "DECO")]
    Deco,
}

impl TerrainKind {
    /// Every kind, in tool palette order
    pub const ALL: [TerrainKind; 14] = [
        TerrainKind::Water,
        TerrainKind::Foam,
        TerrainKind::Rocks,
        TerrainKind::Sand,
        TerrainKind::Grass,
        TerrainKind::Shadow,
        TerrainKind::Stairs,
        TerrainKind::Plateau,
        TerrainKind::Wall,
        TerrainKind::GrassFill,
        TerrainKind::SandFill,
        TerrainKind::Bridge,
        TerrainKind::BridgeShadow,
        TerrainKind::Deco,
    ];

    /// Upper-case name used in labels and log messages
    pub const fn name(self) -> &'static str {
        match self {
            TerrainKind::Water => "WATER",
            TerrainKind::Foam => "FOAM",
            TerrainKind::Rocks => "ROCKS",
            TerrainKind::Sand => "SAND",
            TerrainKind::Grass => "GRASS",
            TerrainKind::Shadow => "SHADOW",
            TerrainKind::Stairs => "STAIRS",
            TerrainKind::Plateau => "PLATEAU",
            TerrainKind::Wall => "WALL",
            TerrainKind::GrassFill => "GRASSFILL",
            TerrainKind::SandFill => "SANDFILL",
            TerrainKind::Bridge => "BRIDGE",
            TerrainKind::BridgeShadow => "BRIDGESHADOW",
            TerrainKind::Deco => "DECO",
        }
    }

    /// Look up a kind by its upper-case name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }
}

impl fmt::Display for TerrainKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Visual sub-type of a rocks overlay, 1 through 4
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct RockVariant(u8);

impl RockVariant {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 4;

    pub fn new(value: u8) -> Result<Self, WorldError> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(WorldError::InvalidRockVariant(value))
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// All four variants in ascending order
    pub fn all() -> impl Iterator<Item = RockVariant> {
        (Self::MIN..=Self::MAX).map(RockVariant)
    }
}

impl Default for RockVariant {
    fn default() -> Self {
        Self(Self::MIN)
    }
}

impl TryFrom<u8> for RockVariant {
    type Error = WorldError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<RockVariant> for u8 {
    fn from(variant: RockVariant) -> Self {
        variant.0
    }
}

/// What gets painted into a cell: a terrain kind, plus the rock variant for rocks.
///
/// On the wire this is a single string such as `"GRASS"` or `"ROCKS3"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TileLabel {
    kind: TerrainKind,
    rock: Option<RockVariant>,
}

impl TileLabel {
    /// Label for `kind`. Rocks get the default variant; use [`TileLabel::rocks`]
    /// to pick one.
    pub fn terrain(kind: TerrainKind) -> Self {
        match kind {
            TerrainKind::Rocks => Self::rocks(RockVariant::default()),
            _ => Self { kind, rock: None },
        }
    }

    pub fn rocks(variant: RockVariant) -> Self {
        Self {
            kind: TerrainKind::Rocks,
            rock: Some(variant),
        }
    }

    pub fn kind(&self) -> TerrainKind {
        self.kind
    }

    /// The rock variant, present only for rocks labels
    pub fn rock_variant(&self) -> Option<RockVariant> {
        self.rock
    }
}

impl From<TerrainKind> for TileLabel {
    fn from(kind: TerrainKind) -> Self {
        Self::terrain(kind)
    }
}

impl fmt::Display for TileLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.rock {
            Some(variant) => write!(f, "{}{}", self.kind.name(), variant.get()),
            None => f.write_str(self.kind.name()),
        }
    }
}

impl FromStr for TileLabel {
    type Err = WorldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unknown = || WorldError::UnknownLabel(s.to_string());

        if let Some(digit) = s.strip_prefix(TerrainKind::Rocks.name()) {
            // Rocks always carry exactly one variant digit
            if digit.len() != 1 {
                return Err(unknown());
            }
            let value: u8 = digit.parse().map_err(|_| unknown())?;
            let variant = RockVariant::new(value).map_err(|_| unknown())?;
            return Ok(Self::rocks(variant));
        }

        TerrainKind::from_name(s).map(Self::terrain).ok_or_else(unknown)
    }
}

impl TryFrom<String> for TileLabel {
    type Error = WorldError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TileLabel> for String {
    fn from(label: TileLabel) -> Self {
        label.to_string()
    }
}
