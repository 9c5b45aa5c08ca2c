//! Rule tables mapping neighbor patterns to tile variants
//!
//! Each terrain family is described as data: an ordered list of rules, each
//! matching a pattern over the 4 orthogonal neighbors, plus a fallback for
//! patterns no rule covers. Tables precompute a 16-entry lookup on
//! construction, so resolving a cell is a single index plus at most one
//! random pick.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use worldbuilder_core::{Neighbors, WorldError};

use crate::variant::{TileVariant, VariantName};

/// What a rule requires of one neighbor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Requirement {
    Present,
    Absent,
    #[default]
    Any,
}

impl Requirement {
    pub const fn from_presence(present: bool) -> Self {
        if present {
            Requirement::Present
        } else {
            Requirement::Absent
        }
    }

    pub fn accepts(self, present: bool) -> bool {
        match self {
            Requirement::Present => present,
            Requirement::Absent => !present,
            Requirement::Any => true,
        }
    }
}

/// Requirements for all 4 orthogonal neighbors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Pattern {
    pub top: Requirement,
    pub bottom: Requirement,
    pub left: Requirement,
    pub right: Requirement,
}

impl Pattern {
    /// Match exactly one occupancy combination
    pub const fn exact(top: bool, bottom: bool, left: bool, right: bool) -> Self {
        Self {
            top: Requirement::from_presence(top),
            bottom: Requirement::from_presence(bottom),
            left: Requirement::from_presence(left),
            right: Requirement::from_presence(right),
        }
    }

    /// Match on left/right only; top and bottom are ignored
    pub const fn horizontal(left: bool, right: bool) -> Self {
        Self {
            top: Requirement::Any,
            bottom: Requirement::Any,
            left: Requirement::from_presence(left),
            right: Requirement::from_presence(right),
        }
    }

    pub fn matches(&self, neighbors: Neighbors) -> bool {
        self.top.accepts(neighbors.top)
            && self.bottom.accepts(neighbors.bottom)
            && self.left.accepts(neighbors.left)
            && self.right.accepts(neighbors.right)
    }
}

/// A single pattern -> variant mapping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    pub pattern: Pattern,
    pub variant: TileVariant,
}

impl Rule {
    pub const fn new(pattern: Pattern, variant: TileVariant) -> Self {
        Self { pattern, variant }
    }
}

/// What to do when no rule matches
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Fallback {
    /// Unmatched patterns are an error
    #[default]
    Strict,
    /// Pick uniformly among these variants
    Random(Vec<TileVariant>),
}

/// The kind of artwork layout a rule table describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TerrainFamily {
    /// Full 16-case ground set (sand, grass)
    FlatGround,
    /// Single-row strip matched on left/right neighbors (wall, stairs)
    Elevation,
    /// Raised cliff with long and wide strips
    Plateau,
    /// Straight spans with random broken pieces elsewhere
    Bridge,
}

impl fmt::Display for TerrainFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TerrainFamily::FlatGround => "flat ground",
            TerrainFamily::Elevation => "elevation",
            TerrainFamily::Plateau => "plateau",
            TerrainFamily::Bridge => "bridge",
        };
        f.write_str(name)
    }
}

/// Ordered rule set for one terrain family. The first matching rule wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleTable {
    family: TerrainFamily,
    rules: Vec<Rule>,
    fallback: Fallback,
    /// Index into `rules` for each neighbor mask
    lookup: [Option<usize>; 16],
}

impl RuleTable {
    pub fn new(family: TerrainFamily, rules: Vec<Rule>, fallback: Fallback) -> Self {
        let mut lookup = [None; 16];
        for (mask, slot) in lookup.iter_mut().enumerate() {
            let neighbors = Neighbors::from_mask(mask as u8);
            *slot = rules.iter().position(|rule| rule.pattern.matches(neighbors));
        }
        Self {
            family,
            rules,
            fallback,
            lookup,
        }
    }

    pub fn family(&self) -> TerrainFamily {
        self.family
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn fallback(&self) -> &Fallback {
        &self.fallback
    }

    /// The rule variant for `neighbors`, ignoring the fallback
    pub fn matched(&self, neighbors: Neighbors) -> Option<TileVariant> {
        self.lookup[neighbors.mask() as usize].map(|idx| self.rules[idx].variant)
    }

    /// True if every one of the 16 patterns has a matching rule
    pub fn is_exhaustive(&self) -> bool {
        self.lookup.iter().all(Option::is_some)
    }

    /// Pick the variant for a cell with the given neighbors
    pub fn resolve(
        &self,
        neighbors: Neighbors,
        rng: &mut impl Rng,
    ) -> Result<TileVariant, WorldError> {
        if let Some(variant) = self.matched(neighbors) {
            return Ok(variant);
        }
        match &self.fallback {
            Fallback::Random(choices) if !choices.is_empty() => {
                Ok(choices[rng.gen_range(0..choices.len())])
            }
            _ => Err(WorldError::UnresolvedPattern {
                family: self.family.to_string(),
                neighbors,
            }),
        }
    }

    /// Whether `variant` is a result [`resolve`](Self::resolve) could give
    /// for `neighbors`
    pub fn is_consistent(&self, neighbors: Neighbors, variant: TileVariant) -> bool {
        match self.matched(neighbors) {
            Some(expected) => expected == variant,
            None => match &self.fallback {
                Fallback::Random(choices) => choices.contains(&variant),
                Fallback::Strict => false,
            },
        }
    }

    /// Ground set laid out as a 4x4 block with its top-left at
    /// `(origin_x, origin_y)`: the 3x3 block, a horizontal strip below it and
    /// a vertical strip plus solo tile in the fourth column.
    pub fn flat_ground(origin_x: u32, origin_y: u32) -> Self {
        use VariantName::*;
        let at = |name, dx, dy| TileVariant::new(name, origin_x + dx, origin_y + dy);
        let rule = |t, b, l, r, variant| Rule::new(Pattern::exact(t, b, l, r), variant);

        Self::new(
            TerrainFamily::FlatGround,
            vec![
                rule(true, true, true, true, at(Center, 1, 1)),
                rule(false, false, true, true, at(HorCenter, 1, 3)),
                rule(true, true, false, false, at(VerCenter, 3, 1)),
                rule(false, true, false, true, at(TopLeft, 0, 0)),
                rule(false, true, true, false, at(TopRight, 2, 0)),
                rule(true, false, false, true, at(BottomLeft, 0, 2)),
                rule(true, false, true, false, at(BottomRight, 2, 2)),
                rule(false, true, true, true, at(Top, 1, 0)),
                rule(true, false, true, true, at(Bottom, 1, 2)),
                rule(true, true, false, true, at(Left, 0, 1)),
                rule(true, true, true, false, at(Right, 2, 1)),
                rule(false, false, false, true, at(HorLeft, 0, 3)),
                rule(false, false, true, false, at(HorRight, 2, 3)),
                rule(false, true, false, false, at(VerTop, 3, 0)),
                rule(true, false, false, false, at(VerBottom, 3, 2)),
                rule(false, false, false, false, at(Solo, 3, 3)),
            ],
            Fallback::Strict,
        )
    }

    pub fn sand() -> Self {
        Self::flat_ground(5, 0)
    }

    pub fn grass() -> Self {
        Self::flat_ground(0, 0)
    }

    /// Single-row strip on sheet row `row`, matched on left/right only
    pub fn elevation(row: u32) -> Self {
        use VariantName::*;
        let rule = |l, r, name, x| Rule::new(Pattern::horizontal(l, r), TileVariant::new(name, x, row));

        Self::new(
            TerrainFamily::Elevation,
            vec![
                rule(true, true, Center, 1),
                rule(false, true, Left, 0),
                rule(true, false, Right, 2),
                rule(false, false, Solo, 3),
            ],
            Fallback::Strict,
        )
    }

    pub fn wall() -> Self {
        Self::elevation(5)
    }

    pub fn stairs() -> Self {
        Self::elevation(7)
    }

    pub fn plateau() -> Self {
        use VariantName::*;
        let rule = |t, b, l, r, name, x, y| Rule::new(Pattern::exact(t, b, l, r), TileVariant::new(name, x, y));

        Self::new(
            TerrainFamily::Plateau,
            vec![
                rule(false, true, false, true, TopLeft, 0, 0),
                rule(false, true, true, true, TopCenter, 1, 0),
                rule(false, true, true, false, TopRight, 2, 0),
                rule(true, true, false, true, CenterLeft, 0, 1),
                rule(true, true, true, true, Center, 1, 1),
                rule(true, true, true, false, CenterRight, 2, 1),
                rule(true, false, false, true, BottomLeft, 0, 2),
                rule(true, false, true, true, BottomCenter, 1, 2),
                rule(true, false, true, false, BottomRight, 2, 2),
                rule(false, true, false, false, LongTop, 3, 0),
                rule(true, true, false, false, LongCenter, 3, 1),
                rule(true, false, false, false, LongBottom, 3, 2),
                rule(false, false, false, true, WideLeft, 0, 4),
                rule(false, false, true, true, WideCenter, 1, 4),
                rule(false, false, true, false, WideRight, 2, 4),
                rule(false, false, false, false, Solo, 3, 4),
            ],
            Fallback::Strict,
        )
    }

    /// Straight horizontal and vertical spans. Corners, junctions and lone
    /// pieces fall back to a random broken tile.
    pub fn bridge() -> Self {
        use VariantName::*;
        let rule = |t, b, l, r, name, x, y| Rule::new(Pattern::exact(t, b, l, r), TileVariant::new(name, x, y));

        Self::new(
            TerrainFamily::Bridge,
            vec![
                rule(false, false, false, true, HorLeft, 0, 0),
                rule(false, false, true, true, HorCenter, 1, 0),
                rule(false, false, true, false, HorRight, 2, 0),
                rule(false, true, false, false, VerTop, 0, 1),
                rule(true, true, false, false, VerCenter, 0, 2),
                rule(true, false, false, false, VerBottom, 0, 3),
            ],
            Fallback::Random(vec![
                TileVariant::new(Broken1, 1, 1),
                TileVariant::new(Broken2, 1, 2),
                TileVariant::new(Broken3, 2, 1),
            ]),
        )
    }
}
