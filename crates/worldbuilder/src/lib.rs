//! Autotiled, layered 2D world editing
//!
//! Paint typed terrain onto a fixed-size grid and keep every terrain layer
//! seamless: each cell's artwork variant follows from which of its four
//! neighbors hold the same terrain. Worlds export to a portable JSON tile
//! map plus a derived collision map.
//!
//! # Crates
//!
//! - [`core`] - Coordinates, grids, terrain kinds and labels, errors, config
//! - [`autotile`] - Rule tables per terrain family and autotiled layers
//! - [`world`] - The composed world, overlays, export/import and persistence
//!
//! # Example
//!
//! ```rust
//! use worldbuilder::prelude::*;
//!
//! let config = WorldConfig::new(16, 16).with_seed(7);
//! let mut world = WorldGrid::new(config).unwrap();
//!
//! world.paint_at(TileLabel::terrain(TerrainKind::Grass), 0, 0).unwrap();
//! world.paint_at(TileLabel::terrain(TerrainKind::Grass), 1, 0).unwrap();
//! world.paint_at(TileLabel::terrain(TerrainKind::Water), 0, 1).unwrap();
//!
//! let exported = export(&world);
//! let mut restored = WorldGrid::new(WorldConfig::new(16, 16)).unwrap();
//! let report = import(&mut restored, &exported.tile_map);
//!
//! assert!(report.is_clean());
//! assert_eq!(report.collision.ground_at(0, 1).unwrap(), Some(TerrainKind::Water));
//! ```

pub use worldbuilder_autotile as autotile;
pub use worldbuilder_core as core;
pub use worldbuilder_world as world;

/// Common imports for worldbuilder
pub mod prelude {
    pub use worldbuilder_autotile::{
        RuleTable, TerrainFamily, TerrainLayer, TileUpdate, TileVariant, VariantName,
    };
    pub use worldbuilder_core::{
        ConfigError, GridCoord, Neighbors, PropagationMode, RockVariant, TerrainKind, TileLabel,
        WorldConfig, WorldError,
    };
    pub use worldbuilder_world::{
        export, import, AnimatedHandle, CellState, CellUpdate, CollisionMap, ImportReport,
        PersistError, TileMapDocument, WorldEvent, WorldExport, WorldGrid,
    };
}
