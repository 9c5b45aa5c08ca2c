//! Derived per-cell collision summary
//!
//! Each cell records at most one ground label and one elevation label:
//! - ground: the last of GRASS, WATER, SAND, WALL, STAIRS present, in export order
//! - elevation: PLATEAU or BRIDGE, bridge winning when both are present
//!
//! The map is rebuilt from the world on demand and never edited in place.

use serde::{Deserialize, Serialize};
use worldbuilder_core::{Grid, GridCoord, TerrainKind, WorldError};

use crate::export::EXPORT_ORDER;
use crate::world::WorldGrid;

/// Kinds that can occupy the ground slot
pub const GROUND_KINDS: [TerrainKind; 5] = [
    TerrainKind::Grass,
    TerrainKind::Water,
    TerrainKind::Sand,
    TerrainKind::Wall,
    TerrainKind::Stairs,
];

/// Kinds that can occupy the elevation slot
pub const ELEVATION_KINDS: [TerrainKind; 2] = [TerrainKind::Plateau, TerrainKind::Bridge];

/// Collision summary of one cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CollisionCell {
    pub ground: Option<TerrainKind>,
    pub elevation: Option<TerrainKind>,
}

/// Serialized collision map, `[x][y][slot]` with slot 0 ground and slot 1
/// elevation
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CollisionMapDocument(pub Vec<Vec<[Option<String>; 2]>>);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollisionMap {
    cells: Grid<CollisionCell>,
}

impl CollisionMap {
    /// Build the collision summary of `world`
    pub fn derive(world: &WorldGrid) -> Self {
        let (width, height) = world.dimensions();
        let mut cells = Grid::new(width, height, CollisionCell::default());

        // Later kinds in export order overwrite earlier ones
        for kind in EXPORT_ORDER {
            let ground = GROUND_KINDS.contains(&kind);
            let elevation = ELEVATION_KINDS.contains(&kind);
            if !ground && !elevation {
                continue;
            }
            for coord in world.occupied(kind).into_iter().flatten() {
                if let Some(cell) = cells.get_mut(coord) {
                    if ground {
                        cell.ground = Some(kind);
                    } else {
                        cell.elevation = Some(kind);
                    }
                }
            }
        }
        Self { cells }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.cells.dimensions()
    }

    pub fn cell(&self, coord: GridCoord) -> Option<CollisionCell> {
        self.cells.get(coord).copied()
    }

    fn cell_at(&self, x: i32, y: i32) -> Result<CollisionCell, WorldError> {
        let coord = self.cells.checked_coord(x, y)?;
        Ok(self.cell(coord).unwrap_or_default())
    }

    pub fn ground_at(&self, x: i32, y: i32) -> Result<Option<TerrainKind>, WorldError> {
        Ok(self.cell_at(x, y)?.ground)
    }

    pub fn elevation_at(&self, x: i32, y: i32) -> Result<Option<TerrainKind>, WorldError> {
        Ok(self.cell_at(x, y)?.elevation)
    }

    /// True if a blocking ground label covers the cell
    pub fn is_blocked(&self, x: i32, y: i32) -> Result<bool, WorldError> {
        Ok(self.ground_at(x, y)?.is_some())
    }

    pub fn to_document(&self) -> CollisionMapDocument {
        let (width, height) = self.cells.dimensions();
        let label = |kind: Option<TerrainKind>| kind.map(|k| k.name().to_string());
        let columns = (0..width)
            .map(|x| {
                (0..height)
                    .map(|y| {
                        let cell = self.cell(GridCoord::new(x, y)).unwrap_or_default();
                        [label(cell.ground), label(cell.elevation)]
                    })
                    .collect()
            })
            .collect();
        CollisionMapDocument(columns)
    }
}
