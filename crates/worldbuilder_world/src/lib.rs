//! The layered world for worldbuilder
//!
//! This crate composes the autotiled terrain layers with the overlay layers
//! into a [`WorldGrid`] and provides:
//! - `PresenceGrid` - Presence-only overlays (water, fills, bridge shadow)
//! - `ShadowLayer` - Shadows with connected-region deletion
//! - `AnimatedRegistry` / `AnimatedHandle` - Foam and rocks, readable from a renderer thread
//! - `CollisionMap` - Derived ground and elevation labels per cell
//! - `export` / `import` - The `[x][y][slot]` JSON tile map
//! - `persist` - Saving and loading exported documents

pub mod animated;
pub mod collision;
pub mod events;
pub mod export;
pub mod overlay;
pub mod persist;
pub mod shadow;
pub mod world;

pub use animated::{AnimatedHandle, AnimatedOverlays, AnimatedRegistry};
pub use collision::{CollisionCell, CollisionMap, CollisionMapDocument, ELEVATION_KINDS, GROUND_KINDS};
pub use events::{CellState, CellUpdate, RejectReason, WorldEvent};
pub use export::{
    export, export_slot, import, ImportReport, TileMapDocument, WorldExport, EXPORT_ORDER,
    SLOT_COUNT,
};
pub use overlay::PresenceGrid;
pub use persist::{
    load_collision_map, load_tile_map, save_export, save_tile_map, PersistError,
    COLLISION_MAP_FILE, TILE_MAP_FILE,
};
pub use shadow::ShadowLayer;
pub use world::{WorldGrid, EVENT_HISTORY, RENDER_ORDER};
