//! Neighbor-driven terrain autotiling
//!
//! Each terrain family (flat ground, elevation strips, plateau, bridge) is a
//! [`RuleTable`]: ordered patterns over a cell's 4 orthogonal neighbors that
//! pick a [`TileVariant`]. A [`TerrainLayer`] stores resolved tiles and keeps
//! them consistent as cells are painted and deleted.
//!
//! # Example
//!
//! ```rust
//! use rand::rngs::SmallRng;
//! use rand::SeedableRng;
//! use worldbuilder_autotile::{RuleTable, TerrainLayer, VariantName};
//! use worldbuilder_core::{GridCoord, TerrainKind};
//!
//! let mut rng = SmallRng::seed_from_u64(0);
//! let mut sand = TerrainLayer::new(TerrainKind::Sand, RuleTable::sand(), 8, 8);
//!
//! sand.paint(GridCoord::new(2, 2), true, &mut rng).unwrap();
//! sand.paint(GridCoord::new(3, 2), true, &mut rng).unwrap();
//!
//! let left = sand.query(GridCoord::new(2, 2)).unwrap().unwrap();
//! assert_eq!(left.name, VariantName::HorLeft);
//! ```

pub mod layer;
pub mod rules;
pub mod variant;

pub use layer::{TerrainLayer, TileUpdate};
pub use rules::{Fallback, Pattern, Requirement, Rule, RuleTable, TerrainFamily};
pub use variant::{TileVariant, VariantName};
