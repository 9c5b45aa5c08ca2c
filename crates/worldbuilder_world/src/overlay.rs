//! Presence-only overlays (water, fills, bridge shadow, shadow)

use worldbuilder_core::{Grid, GridCoord, TerrainKind, WorldError};

/// A layer that only records whether each cell is covered
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresenceGrid {
    kind: TerrainKind,
    cells: Grid<bool>,
}

impl PresenceGrid {
    pub fn new(kind: TerrainKind, width: u32, height: u32) -> Self {
        Self {
            kind,
            cells: Grid::new(width, height, false),
        }
    }

    pub fn kind(&self) -> TerrainKind {
        self.kind
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.cells.dimensions()
    }

    pub fn contains(&self, coord: GridCoord) -> bool {
        self.cells.contains(coord)
    }

    /// False for empty and out-of-bounds cells
    pub fn is_present(&self, coord: GridCoord) -> bool {
        self.cells.get(coord).copied().unwrap_or(false)
    }

    pub fn query(&self, coord: GridCoord) -> Result<bool, WorldError> {
        self.cells.ensure_contains(coord)?;
        Ok(self.is_present(coord))
    }

    /// Mark `coord`. Returns true if it was empty before.
    pub fn mark(&mut self, coord: GridCoord) -> Result<bool, WorldError> {
        Ok(!self.cells.set(coord, true)?)
    }

    /// Clear `coord`. Returns true if it was marked before.
    pub fn unmark(&mut self, coord: GridCoord) -> Result<bool, WorldError> {
        self.cells.set(coord, false)
    }

    /// Marked cells in row-major order
    pub fn occupied(&self) -> impl Iterator<Item = GridCoord> + '_ {
        self.cells
            .iter()
            .filter_map(|(coord, present)| present.then_some(coord))
    }

    pub fn clear(&mut self) {
        self.cells.fill(false);
    }
}
