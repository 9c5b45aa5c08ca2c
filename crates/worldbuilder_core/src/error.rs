//! Errors raised by grid and world operations

use thiserror::Error;

use crate::{Neighbors, TerrainKind};

/// Errors that can occur when editing or importing a world
///
/// `OutOfBounds`, `UnknownLayer` and `NoLayerSelected` are caller contract
/// violations and abort the operation. `MalformedImport` is reported per
/// entry while the rest of an import proceeds.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorldError {
    #[error("Cell ({x}, {y}) is outside the {width}x{height} world")]
    OutOfBounds {
        x: i64,
        y: i64,
        width: u32,
        height: u32,
    },
    #[error("No layer backs terrain {0}")]
    UnknownLayer(TerrainKind),
    #[error("No layer selected")]
    NoLayerSelected,
    #[error("Unknown tile label '{0}'")]
    UnknownLabel(String),
    #[error("Rock variant must be between 1 and 4, got {0}")]
    InvalidRockVariant(u8),
    #[error("No {family} rule matches neighbor pattern {neighbors}")]
    UnresolvedPattern {
        family: String,
        neighbors: Neighbors,
    },
    #[error("Malformed import entry at [{x}][{y}][{slot}]: {reason}")]
    MalformedImport {
        x: usize,
        y: usize,
        slot: usize,
        reason: String,
    },
}
