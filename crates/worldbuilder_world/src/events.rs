//! Cell states, per-cell updates and the world event queue
//!
//! Edits return [`CellUpdate`]s for the renderer to redraw. Each accepted or
//! refused command also queues a [`WorldEvent`] that a status display can
//! drain with [`WorldGrid::drain_events`](crate::WorldGrid::drain_events).

use std::fmt;
use worldbuilder_autotile::{TileUpdate, TileVariant};
use worldbuilder_core::{GridCoord, RockVariant, TerrainKind, TileLabel};

/// What one layer holds at one cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CellState {
    #[default]
    Empty,
    /// Presence-only overlay or foam
    Present,
    /// Autotiled terrain with its resolved variant
    Tile(TileVariant),
    Rocks(RockVariant),
}

impl CellState {
    pub fn is_occupied(&self) -> bool {
        !matches!(self, CellState::Empty)
    }

    pub fn from_tile(variant: Option<TileVariant>) -> Self {
        variant.map_or(CellState::Empty, CellState::Tile)
    }
}

/// A changed cell on one layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellUpdate {
    pub kind: TerrainKind,
    pub coord: GridCoord,
    pub state: CellState,
}

impl CellUpdate {
    pub fn new(kind: TerrainKind, coord: GridCoord, state: CellState) -> Self {
        Self { kind, coord, state }
    }

    pub fn from_tile(kind: TerrainKind, update: TileUpdate) -> Self {
        Self::new(kind, update.coord, CellState::from_tile(update.variant))
    }
}

/// Why a paint was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    AlreadyPainted,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::AlreadyPainted => f.write_str("already painted"),
        }
    }
}

/// A user-visible record of an edit
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorldEvent {
    Painted {
        label: TileLabel,
        coord: GridCoord,
    },
    Deleted {
        kind: TerrainKind,
        coord: GridCoord,
    },
    Rejected {
        kind: TerrainKind,
        coord: GridCoord,
        reason: RejectReason,
    },
    Cleared,
}

impl fmt::Display for WorldEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorldEvent::Painted { label, coord } => write!(f, "Painted {} at {}", label, coord),
            WorldEvent::Deleted { kind, coord } => write!(f, "Deleted {} at {}", kind, coord),
            WorldEvent::Rejected {
                kind,
                coord,
                reason,
            } => write!(f, "{} {} at {}", kind, reason, coord),
            WorldEvent::Cleared => f.write_str("Cleared world"),
        }
    }
}
