//! Shadow overlay with connected-region deletion
//!
//! Shadows have soft edges that overlap their neighbors, so deleting one
//! clears the whole connected group and repaints the survivors. Two shadows
//! are connected when they lie within `radius` cells of each other on both
//! axes.

use std::collections::HashSet;
use worldbuilder_core::{GridCoord, TerrainKind, WorldError};

use crate::events::{CellState, CellUpdate};
use crate::overlay::PresenceGrid;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShadowLayer {
    cells: PresenceGrid,
    radius: u32,
}

impl ShadowLayer {
    pub fn new(width: u32, height: u32, radius: u32) -> Self {
        Self {
            cells: PresenceGrid::new(TerrainKind::Shadow, width, height),
            radius,
        }
    }

    pub fn radius(&self) -> u32 {
        self.radius
    }

    pub fn cells(&self) -> &PresenceGrid {
        &self.cells
    }

    pub fn is_present(&self, coord: GridCoord) -> bool {
        self.cells.is_present(coord)
    }

    /// Mark `coord`. Returns false, changing nothing, if it already holds a
    /// shadow.
    pub fn paint(&mut self, coord: GridCoord) -> Result<bool, WorldError> {
        if self.cells.query(coord)? {
            return Ok(false);
        }
        self.cells.mark(coord)
    }

    /// Delete the shadow at `coord`.
    ///
    /// Clears every shadow connected to it, then repaints all of them except
    /// `coord`. The returned updates list the cleared footprint followed by
    /// the repaints.
    pub fn delete(&mut self, coord: GridCoord) -> Result<Vec<CellUpdate>, WorldError> {
        if !self.cells.query(coord)? {
            return Ok(Vec::new());
        }

        let region = self.connected_region(coord);
        tracing::trace!("Shadow region at {} has {} cells", coord, region.len());

        let mut updates = Vec::with_capacity(region.len() * 2);
        for &cell in &region {
            self.cells.unmark(cell)?;
            updates.push(CellUpdate::new(TerrainKind::Shadow, cell, CellState::Empty));
        }
        for &cell in region.iter().filter(|cell| **cell != coord) {
            self.cells.mark(cell)?;
            updates.push(CellUpdate::new(TerrainKind::Shadow, cell, CellState::Present));
        }
        Ok(updates)
    }

    /// All shadows reachable from `origin` through hops of at most `radius`
    /// cells on each axis. Empty if `origin` holds no shadow.
    pub fn connected_region(&self, origin: GridCoord) -> Vec<GridCoord> {
        let (width, height) = self.cells.dimensions();
        let reach = i32::try_from(self.radius.min(width.max(height))).unwrap_or(i32::MAX);
        let mut visited = HashSet::new();
        let mut stack = vec![origin];
        let mut region = Vec::new();

        while let Some(cell) = stack.pop() {
            if !visited.insert(cell) || !self.cells.is_present(cell) {
                continue;
            }
            region.push(cell);

            for dy in -reach..=reach {
                for dx in -reach..=reach {
                    if dx == 0 && dy == 0 {
                        continue;
                    }
                    if let Some(next) = cell.offset(dx, dy) {
                        if self.cells.is_present(next) && !visited.contains(&next) {
                            stack.push(next);
                        }
                    }
                }
            }
        }
        region
    }

    pub fn occupied(&self) -> impl Iterator<Item = GridCoord> + '_ {
        self.cells.occupied()
    }

    pub fn clear(&mut self) {
        self.cells.clear();
    }
}
