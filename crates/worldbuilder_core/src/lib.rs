//! Core data structures for worldbuilder
//!
//! This crate provides the fundamental types shared by the autotile engine
//! and the layered world:
//! - `Grid` / `GridCoord` - Fixed-size dense cell storage and coordinates
//! - `Neighbors` - Orthogonal occupancy pattern used by autotiling
//! - `TerrainKind` / `TileLabel` - Paintable terrain types and their wire labels
//! - `RockVariant` - Visual sub-type of a rocks overlay (1-4)
//! - `WorldError` - Errors raised by grid operations
//! - `WorldConfig` - World dimensions, propagation mode and RNG seed

mod config;
mod error;
mod grid;
mod terrain;

pub use config::{
    ConfigError, PropagationMode, WorldConfig, DEFAULT_SHADOW_CONNECTION_RADIUS, DEFAULT_WORLD_SIZE,
};
pub use error::WorldError;
pub use grid::{Direction, Grid, GridCoord, Neighbors};
pub use terrain::{RockVariant, TerrainKind, TileLabel};
