//! An autotiled terrain layer
//!
//! Painting or deleting a cell re-resolves its occupied neighbors so every
//! cell's variant keeps agreeing with its surroundings.

use rand::Rng;
use std::collections::{HashSet, VecDeque};
use worldbuilder_core::{Grid, GridCoord, Neighbors, PropagationMode, TerrainKind, WorldError};

use crate::rules::RuleTable;
use crate::variant::TileVariant;

/// A single cell change produced by an edit. `variant: None` means cleared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileUpdate {
    pub coord: GridCoord,
    pub variant: Option<TileVariant>,
}

/// Grid of resolved tiles for one autotiled terrain kind
#[derive(Debug, Clone)]
pub struct TerrainLayer {
    kind: TerrainKind,
    table: RuleTable,
    propagation: PropagationMode,
    tiles: Grid<Option<TileVariant>>,
}

impl TerrainLayer {
    pub fn new(kind: TerrainKind, table: RuleTable, width: u32, height: u32) -> Self {
        Self {
            kind,
            table,
            propagation: PropagationMode::default(),
            tiles: Grid::new(width, height, None),
        }
    }

    pub fn with_propagation(mut self, propagation: PropagationMode) -> Self {
        self.propagation = propagation;
        self
    }

    pub fn kind(&self) -> TerrainKind {
        self.kind
    }

    pub fn table(&self) -> &RuleTable {
        &self.table
    }

    pub fn propagation(&self) -> PropagationMode {
        self.propagation
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.tiles.dimensions()
    }

    pub fn tiles(&self) -> &Grid<Option<TileVariant>> {
        &self.tiles
    }

    /// Occupancy of the 4 neighbors of `coord`. Off-grid counts as absent.
    pub fn neighbors(&self, coord: GridCoord) -> Neighbors {
        Neighbors::from_fn(&self.tiles, coord, Option::is_some)
    }

    pub fn is_occupied(&self, coord: GridCoord) -> bool {
        matches!(self.tiles.get(coord), Some(Some(_)))
    }

    pub fn query(&self, coord: GridCoord) -> Result<Option<TileVariant>, WorldError> {
        self.tiles.ensure_contains(coord)?;
        Ok(self.tiles.get(coord).copied().flatten())
    }

    /// Occupied cells in row-major order
    pub fn occupied(&self) -> impl Iterator<Item = (GridCoord, TileVariant)> + '_ {
        self.tiles
            .iter()
            .filter_map(|(coord, tile)| tile.map(|variant| (coord, variant)))
    }

    pub fn occupied_count(&self) -> usize {
        self.tiles.cells().iter().filter(|tile| tile.is_some()).count()
    }

    /// True if every occupied cell holds a variant its rule table allows for
    /// its current neighbors
    pub fn is_consistent(&self) -> bool {
        self.occupied()
            .all(|(coord, variant)| self.table.is_consistent(self.neighbors(coord), variant))
    }

    /// Paint `coord` and, if `propagate`, re-resolve affected neighbors.
    ///
    /// Returns every cell that changed, the painted cell first.
    pub fn paint(
        &mut self,
        coord: GridCoord,
        propagate: bool,
        rng: &mut impl Rng,
    ) -> Result<Vec<TileUpdate>, WorldError> {
        self.tiles.ensure_contains(coord)?;

        let variant = self.table.resolve(self.neighbors(coord), rng)?;
        self.tiles.set(coord, Some(variant))?;
        tracing::trace!("Painted {} {} at {}", self.kind, variant.name, coord);

        let mut updates = vec![TileUpdate {
            coord,
            variant: Some(variant),
        }];
        if propagate {
            self.propagate(coord, rng, &mut updates)?;
        }
        Ok(updates)
    }

    /// Clear `coord` and re-resolve its occupied neighbors. Deleting an empty
    /// cell changes nothing.
    pub fn delete(
        &mut self,
        coord: GridCoord,
        rng: &mut impl Rng,
    ) -> Result<Vec<TileUpdate>, WorldError> {
        if self.tiles.set(coord, None)?.is_none() {
            return Ok(Vec::new());
        }
        tracing::trace!("Deleted {} at {}", self.kind, coord);

        let mut updates = vec![TileUpdate {
            coord,
            variant: None,
        }];
        self.propagate(coord, rng, &mut updates)?;
        Ok(updates)
    }

    pub fn paint_at(
        &mut self,
        x: i32,
        y: i32,
        propagate: bool,
        rng: &mut impl Rng,
    ) -> Result<Vec<TileUpdate>, WorldError> {
        let coord = self.tiles.checked_coord(x, y)?;
        self.paint(coord, propagate, rng)
    }

    pub fn delete_at(
        &mut self,
        x: i32,
        y: i32,
        rng: &mut impl Rng,
    ) -> Result<Vec<TileUpdate>, WorldError> {
        let coord = self.tiles.checked_coord(x, y)?;
        self.delete(coord, rng)
    }

    pub fn query_at(&self, x: i32, y: i32) -> Result<Option<TileVariant>, WorldError> {
        let coord = self.tiles.checked_coord(x, y)?;
        self.query(coord)
    }

    pub fn clear(&mut self) {
        self.tiles.fill(None);
    }

    /// Re-resolve occupied neighbors of `origin` in left, right, up, down
    /// order. In deep mode, keep walking outward through cells whose stored
    /// variant no longer fits their neighbors.
    fn propagate(
        &mut self,
        origin: GridCoord,
        rng: &mut impl Rng,
        updates: &mut Vec<TileUpdate>,
    ) -> Result<(), WorldError> {
        let mut visited = HashSet::from([origin]);
        let mut queue: VecDeque<GridCoord> = self.tiles.neighbors(origin).collect();
        let mut first_ring = queue.len();

        while let Some(cell) = queue.pop_front() {
            let direct = first_ring > 0;
            first_ring = first_ring.saturating_sub(1);

            if !visited.insert(cell) {
                continue;
            }
            let Some(Some(current)) = self.tiles.get(cell).copied() else {
                continue;
            };

            let neighbors = self.neighbors(cell);
            if !direct && self.table.is_consistent(neighbors, current) {
                continue;
            }

            let variant = self.table.resolve(neighbors, rng)?;
            self.tiles.set(cell, Some(variant))?;
            tracing::trace!("Re-resolved {} at {} to {}", self.kind, cell, variant.name);
            updates.push(TileUpdate {
                coord: cell,
                variant: Some(variant),
            });

            if self.propagation == PropagationMode::Deep {
                queue.extend(self.tiles.neighbors(cell));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::variant::VariantName;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn sand_layer(size: u32) -> TerrainLayer {
        TerrainLayer::new(TerrainKind::Sand, RuleTable::sand(), size, size)
    }

    fn name_at(layer: &TerrainLayer, x: u32, y: u32) -> Option<VariantName> {
        layer.query(GridCoord::new(x, y)).unwrap().map(|v| v.name)
    }

    #[test]
    fn test_single_paint_is_solo() {
        let mut rng = SmallRng::seed_from_u64(0);
        let mut layer = sand_layer(4);
        let updates = layer.paint(GridCoord::new(1, 1), true, &mut rng).unwrap();
        assert_eq!(updates.len(), 1);
        assert_eq!(name_at(&layer, 1, 1), Some(VariantName::Solo));
    }

    #[test]
    fn test_horizontal_pair_propagates() {
        let mut rng = SmallRng::seed_from_u64(0);
        let mut layer = sand_layer(4);
        layer.paint(GridCoord::new(1, 1), true, &mut rng).unwrap();
        let updates = layer.paint(GridCoord::new(2, 1), true, &mut rng).unwrap();

        assert_eq!(updates.len(), 2);
        assert_eq!(name_at(&layer, 1, 1), Some(VariantName::HorLeft));
        assert_eq!(name_at(&layer, 2, 1), Some(VariantName::HorRight));
        assert!(layer.is_consistent());
    }

    #[test]
    fn test_three_by_three_block() {
        let mut rng = SmallRng::seed_from_u64(0);
        let mut layer = sand_layer(5);
        for y in 1..4 {
            for x in 1..4 {
                layer.paint(GridCoord::new(x, y), true, &mut rng).unwrap();
            }
        }
        assert_eq!(name_at(&layer, 1, 1), Some(VariantName::TopLeft));
        assert_eq!(name_at(&layer, 2, 1), Some(VariantName::Top));
        assert_eq!(name_at(&layer, 3, 1), Some(VariantName::TopRight));
        assert_eq!(name_at(&layer, 1, 2), Some(VariantName::Left));
        assert_eq!(name_at(&layer, 2, 2), Some(VariantName::Center));
        assert_eq!(name_at(&layer, 3, 2), Some(VariantName::Right));
        assert_eq!(name_at(&layer, 1, 3), Some(VariantName::BottomLeft));
        assert_eq!(name_at(&layer, 2, 3), Some(VariantName::Bottom));
        assert_eq!(name_at(&layer, 3, 3), Some(VariantName::BottomRight));
        assert!(layer.is_consistent());
    }

    #[test]
    fn test_paint_without_propagation_leaves_neighbors() {
        let mut rng = SmallRng::seed_from_u64(0);
        let mut layer = sand_layer(4);
        layer.paint(GridCoord::new(1, 1), true, &mut rng).unwrap();
        let updates = layer.paint(GridCoord::new(2, 1), false, &mut rng).unwrap();

        assert_eq!(updates.len(), 1);
        assert_eq!(name_at(&layer, 1, 1), Some(VariantName::Solo));
        assert_eq!(name_at(&layer, 2, 1), Some(VariantName::HorRight));
        assert!(!layer.is_consistent());
    }

    #[test]
    fn test_paint_is_idempotent() {
        let mut rng = SmallRng::seed_from_u64(0);
        let mut layer = sand_layer(6);
        for (x, y) in [(1, 1), (2, 1), (2, 2), (3, 2), (2, 3)] {
            layer.paint(GridCoord::new(x, y), true, &mut rng).unwrap();
        }
        let before = layer.tiles().clone();
        layer.paint(GridCoord::new(2, 2), true, &mut rng).unwrap();
        assert_eq!(layer.tiles(), &before);
    }

    #[test]
    fn test_paint_only_touches_cell_and_neighbors() {
        let mut rng = SmallRng::seed_from_u64(0);
        let mut layer = sand_layer(7);
        for y in 0..7 {
            for x in 0..7 {
                if (x + y) % 2 == 0 {
                    layer.paint(GridCoord::new(x, y), true, &mut rng).unwrap();
                }
            }
        }
        let before = layer.tiles().clone();
        let target = GridCoord::new(3, 2);
        layer.paint(target, true, &mut rng).unwrap();

        for (coord, tile) in layer.tiles().iter() {
            let dx = coord.x.abs_diff(target.x);
            let dy = coord.y.abs_diff(target.y);
            if dx + dy > 1 {
                assert_eq!(Some(tile), before.get(coord), "{coord} changed");
            }
        }
    }

    #[test]
    fn test_delete_updates_neighbors() {
        let mut rng = SmallRng::seed_from_u64(0);
        let mut layer = sand_layer(4);
        for x in 0..3 {
            layer.paint(GridCoord::new(x, 1), true, &mut rng).unwrap();
        }
        assert_eq!(name_at(&layer, 1, 1), Some(VariantName::HorCenter));

        let updates = layer.delete(GridCoord::new(1, 1), &mut rng).unwrap();
        assert_eq!(updates[0].variant, None);
        assert_eq!(name_at(&layer, 0, 1), Some(VariantName::Solo));
        assert_eq!(name_at(&layer, 1, 1), None);
        assert_eq!(name_at(&layer, 2, 1), Some(VariantName::Solo));
    }

    #[test]
    fn test_delete_empty_cell_is_noop() {
        let mut rng = SmallRng::seed_from_u64(0);
        let mut layer = sand_layer(3);
        layer.paint(GridCoord::new(0, 0), true, &mut rng).unwrap();
        let updates = layer.delete(GridCoord::new(1, 0), &mut rng).unwrap();
        assert!(updates.is_empty());
        assert_eq!(name_at(&layer, 0, 0), Some(VariantName::Solo));
    }

    #[test]
    fn test_out_of_bounds_is_rejected() {
        let mut rng = SmallRng::seed_from_u64(0);
        let mut layer = sand_layer(3);
        assert!(matches!(
            layer.paint_at(-1, 0, true, &mut rng),
            Err(WorldError::OutOfBounds { .. })
        ));
        assert!(layer.paint_at(3, 0, true, &mut rng).is_err());
        assert!(layer.delete_at(0, 3, &mut rng).is_err());
        assert!(layer.query_at(0, -1).is_err());
        assert_eq!(layer.occupied_count(), 0);
    }

    #[test]
    fn test_edges_count_as_absent() {
        let mut rng = SmallRng::seed_from_u64(0);
        let mut layer = sand_layer(2);
        layer.paint_at(0, 0, true, &mut rng).unwrap();
        layer.paint_at(1, 0, true, &mut rng).unwrap();
        assert_eq!(name_at(&layer, 0, 0), Some(VariantName::HorLeft));
        assert_eq!(name_at(&layer, 1, 0), Some(VariantName::HorRight));
    }

    #[test]
    fn test_deep_propagation_repairs_stale_cells() {
        let mut rng = SmallRng::seed_from_u64(0);
        let mut layer = sand_layer(6).with_propagation(PropagationMode::Deep);
        // A row painted without propagation leaves every cell stale
        for x in 0..5 {
            layer.paint(GridCoord::new(x, 2), false, &mut rng).unwrap();
        }
        assert!(!layer.is_consistent());

        layer.paint(GridCoord::new(0, 2), true, &mut rng).unwrap();
        assert!(layer.is_consistent());
        assert_eq!(name_at(&layer, 4, 2), Some(VariantName::HorRight));
    }

    #[test]
    fn test_one_hop_leaves_distant_stale_cells() {
        let mut rng = SmallRng::seed_from_u64(0);
        let mut layer = sand_layer(6);
        for x in 0..5 {
            layer.paint(GridCoord::new(x, 2), false, &mut rng).unwrap();
        }
        layer.paint(GridCoord::new(0, 2), true, &mut rng).unwrap();
        assert!(!layer.is_consistent());
    }

    #[test]
    fn test_deep_propagation_visits_each_cell_once() {
        let mut rng = SmallRng::seed_from_u64(0);
        let mut layer = sand_layer(5).with_propagation(PropagationMode::Deep);
        for y in 0..5 {
            for x in 0..5 {
                layer.paint(GridCoord::new(x, y), false, &mut rng).unwrap();
            }
        }
        let updates = layer.paint(GridCoord::new(2, 2), true, &mut rng).unwrap();
        let unique: HashSet<_> = updates.iter().map(|u| u.coord).collect();
        assert_eq!(unique.len(), updates.len());
        assert!(layer.is_consistent());
    }

    #[test]
    fn test_bridge_layer_stays_consistent() {
        let mut rng = SmallRng::seed_from_u64(3);
        let mut layer = TerrainLayer::new(TerrainKind::Bridge, RuleTable::bridge(), 5, 5);
        for (x, y) in [(1, 1), (2, 1), (3, 1), (2, 2), (2, 3)] {
            layer.paint(GridCoord::new(x, y), true, &mut rng).unwrap();
        }
        assert!(layer.is_consistent());
        assert_eq!(name_at(&layer, 1, 1), Some(VariantName::HorLeft));
        assert_eq!(name_at(&layer, 2, 3), Some(VariantName::VerBottom));
        assert!(matches!(
            name_at(&layer, 2, 1),
            Some(VariantName::Broken1 | VariantName::Broken2 | VariantName::Broken3)
        ));
    }
}
