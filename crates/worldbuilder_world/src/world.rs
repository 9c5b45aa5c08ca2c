//! The layered world grid
//!
//! One layer per implemented terrain kind, stacked in render order. Paint and
//! delete requests are dispatched by terrain kind; autotiled layers always
//! propagate, so every layer is consistent when a call returns.

use rand::rngs::SmallRng;
use rand::SeedableRng;
use std::collections::VecDeque;
use worldbuilder_autotile::{RuleTable, TerrainLayer};
use worldbuilder_core::{
    ConfigError, GridCoord, TerrainKind, TileLabel, WorldConfig, WorldError,
};

use crate::animated::{AnimatedHandle, AnimatedRegistry};
use crate::events::{CellState, CellUpdate, RejectReason, WorldEvent};
use crate::overlay::PresenceGrid;
use crate::shadow::ShadowLayer;

/// Most events a world keeps queued; older ones are dropped first
pub const EVENT_HISTORY: usize = 256;

/// Layers from bottom to top as a renderer draws them
pub const RENDER_ORDER: [TerrainKind; 13] = [
    TerrainKind::Water,
    TerrainKind::Foam,
    TerrainKind::Sand,
    TerrainKind::Rocks,
    TerrainKind::Grass,
    TerrainKind::Shadow,
    TerrainKind::Plateau,
    TerrainKind::Wall,
    TerrainKind::Stairs,
    TerrainKind::GrassFill,
    TerrainKind::SandFill,
    TerrainKind::BridgeShadow,
    TerrainKind::Bridge,
];

/// What painting an already covered presence cell does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Repaint {
    /// Mark again and report it
    Remark,
    /// Leave it alone silently
    Ignore,
}

#[derive(Debug, Clone)]
enum Layer {
    Autotiled(TerrainLayer),
    Presence { grid: PresenceGrid, repaint: Repaint },
    Shadow(ShadowLayer),
    /// State lives in the animated registry
    Foam,
    /// State lives in the animated registry
    Rocks,
}

impl Layer {
    fn for_kind(kind: TerrainKind, config: &WorldConfig) -> Option<Self> {
        let (width, height) = (config.width, config.height);
        let autotiled = |table: RuleTable| {
            Layer::Autotiled(
                TerrainLayer::new(kind, table, width, height).with_propagation(config.propagation),
            )
        };
        let presence = |repaint| Layer::Presence {
            grid: PresenceGrid::new(kind, width, height),
            repaint,
        };

        let layer = match kind {
            TerrainKind::Water | TerrainKind::GrassFill | TerrainKind::SandFill => {
                presence(Repaint::Remark)
            }
            TerrainKind::BridgeShadow => presence(Repaint::Ignore),
            TerrainKind::Foam => Layer::Foam,
            TerrainKind::Rocks => Layer::Rocks,
            TerrainKind::Shadow => {
                Layer::Shadow(ShadowLayer::new(width, height, config.shadow_connection_radius))
            }
            TerrainKind::Sand => autotiled(RuleTable::sand()),
            TerrainKind::Grass => autotiled(RuleTable::grass()),
            TerrainKind::Plateau => autotiled(RuleTable::plateau()),
            TerrainKind::Wall => autotiled(RuleTable::wall()),
            TerrainKind::Stairs => autotiled(RuleTable::stairs()),
            TerrainKind::Bridge => autotiled(RuleTable::bridge()),
            TerrainKind::Deco => return None,
        };
        Some(layer)
    }
}

/// Result of dispatching a command to a layer
enum Outcome {
    Applied(Vec<CellUpdate>),
    Unchanged,
    Rejected(RejectReason),
}

/// The composed multi-layer world for one editing session
#[derive(Debug)]
pub struct WorldGrid {
    config: WorldConfig,
    layers: Vec<(TerrainKind, Layer)>,
    animated: AnimatedRegistry,
    rng: SmallRng,
    events: VecDeque<WorldEvent>,
}

impl WorldGrid {
    /// Create an empty world. Bridge variants draw from `config.rng_seed`
    /// when set, otherwise from entropy.
    pub fn new(config: WorldConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let rng = match config.rng_seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };
        let layers = RENDER_ORDER
            .into_iter()
            .filter_map(|kind| Layer::for_kind(kind, &config).map(|layer| (kind, layer)))
            .collect();

        tracing::info!(
            "Created {}x{} world ({:?} propagation)",
            config.width,
            config.height,
            config.propagation
        );
        Ok(Self {
            config,
            layers,
            animated: AnimatedRegistry::new(),
            rng,
            events: VecDeque::with_capacity(EVENT_HISTORY),
        })
    }

    /// Default-configured world of the given size
    pub fn with_size(width: u32, height: u32) -> Result<Self, ConfigError> {
        Self::new(WorldConfig::new(width, height))
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    /// Kinds backed by a layer, bottom to top
    pub fn render_order(&self) -> impl Iterator<Item = TerrainKind> + '_ {
        self.layers.iter().map(|(kind, _)| *kind)
    }

    /// Read access to the animated overlays for a renderer thread
    pub fn animated_handle(&self) -> AnimatedHandle {
        self.animated.handle()
    }

    /// The autotiled layer for `kind`, if that kind is autotiled
    pub fn terrain_layer(&self, kind: TerrainKind) -> Option<&TerrainLayer> {
        self.layers.iter().find_map(|(k, layer)| match layer {
            Layer::Autotiled(terrain) if *k == kind => Some(terrain),
            _ => None,
        })
    }

    /// True if every autotiled layer holds the variants its rules require
    pub fn is_consistent(&self) -> bool {
        self.layers.iter().all(|(_, layer)| match layer {
            Layer::Autotiled(terrain) => terrain.is_consistent(),
            _ => true,
        })
    }

    /// Validate a signed coordinate against the world size
    pub fn checked_coord(&self, x: i32, y: i32) -> Result<GridCoord, WorldError> {
        GridCoord::checked(x, y, self.config.width, self.config.height)
    }

    fn layer_index(&self, kind: TerrainKind) -> Result<usize, WorldError> {
        self.layers
            .iter()
            .position(|(k, _)| *k == kind)
            .ok_or(WorldError::UnknownLayer(kind))
    }

    /// Paint `label` at `(x, y)`, re-resolving neighbors on autotiled layers.
    ///
    /// Returns the changed cells. Refused or redundant paints return an empty
    /// list.
    pub fn paint_at(
        &mut self,
        label: TileLabel,
        x: i32,
        y: i32,
    ) -> Result<Vec<CellUpdate>, WorldError> {
        let kind = label.kind();
        let idx = self.layer_index(kind)?;
        let coord = self.checked_coord(x, y)?;

        let outcome = match &mut self.layers[idx].1 {
            Layer::Autotiled(layer) => Outcome::Applied(
                layer
                    .paint(coord, true, &mut self.rng)?
                    .into_iter()
                    .map(|update| CellUpdate::from_tile(kind, update))
                    .collect(),
            ),
            Layer::Presence { grid, repaint } => {
                if *repaint == Repaint::Ignore && grid.is_present(coord) {
                    Outcome::Unchanged
                } else {
                    grid.mark(coord)?;
                    Outcome::Applied(vec![CellUpdate::new(kind, coord, CellState::Present)])
                }
            }
            Layer::Shadow(shadow) => {
                if shadow.paint(coord)? {
                    Outcome::Applied(vec![CellUpdate::new(kind, coord, CellState::Present)])
                } else {
                    Outcome::Rejected(RejectReason::AlreadyPainted)
                }
            }
            Layer::Foam => {
                self.animated.insert_foam(coord);
                Outcome::Applied(vec![CellUpdate::new(kind, coord, CellState::Present)])
            }
            Layer::Rocks => {
                let variant = label.rock_variant().unwrap_or_default();
                if self.animated.insert_rocks(coord, variant) {
                    Outcome::Applied(vec![CellUpdate::new(kind, coord, CellState::Rocks(variant))])
                } else {
                    Outcome::Unchanged
                }
            }
        };

        match outcome {
            Outcome::Applied(updates) => {
                tracing::debug!("Painted {} at {}", label, coord);
                self.record(WorldEvent::Painted { label, coord });
                Ok(updates)
            }
            Outcome::Unchanged => {
                tracing::trace!("{} at {} already present", label, coord);
                Ok(Vec::new())
            }
            Outcome::Rejected(reason) => {
                tracing::warn!("{} {} at {}", kind, reason, coord);
                self.record(WorldEvent::Rejected {
                    kind,
                    coord,
                    reason,
                });
                Ok(Vec::new())
            }
        }
    }

    /// Delete `kind` at `(x, y)`. Deleting an empty cell changes nothing.
    pub fn delete_at(
        &mut self,
        kind: TerrainKind,
        x: i32,
        y: i32,
    ) -> Result<Vec<CellUpdate>, WorldError> {
        let idx = self.layer_index(kind)?;
        let coord = self.checked_coord(x, y)?;

        let updates = match &mut self.layers[idx].1 {
            Layer::Autotiled(layer) => layer
                .delete(coord, &mut self.rng)?
                .into_iter()
                .map(|update| CellUpdate::from_tile(kind, update))
                .collect(),
            Layer::Presence { grid, .. } => {
                if grid.unmark(coord)? {
                    vec![CellUpdate::new(kind, coord, CellState::Empty)]
                } else {
                    Vec::new()
                }
            }
            Layer::Shadow(shadow) => shadow.delete(coord)?,
            Layer::Foam => {
                if self.animated.remove_foam(coord) {
                    vec![CellUpdate::new(kind, coord, CellState::Empty)]
                } else {
                    Vec::new()
                }
            }
            Layer::Rocks => match self.animated.remove_rocks(coord) {
                Some(_) => vec![CellUpdate::new(kind, coord, CellState::Empty)],
                None => Vec::new(),
            },
        };

        if !updates.is_empty() {
            tracing::debug!("Deleted {} at {}", kind, coord);
            self.record(WorldEvent::Deleted { kind, coord });
        }
        Ok(updates)
    }

    /// What the `kind` layer holds at `(x, y)`
    pub fn query_at(&self, kind: TerrainKind, x: i32, y: i32) -> Result<CellState, WorldError> {
        let idx = self.layer_index(kind)?;
        let coord = self.checked_coord(x, y)?;
        self.state_at(idx, coord)
    }

    fn state_at(&self, idx: usize, coord: GridCoord) -> Result<CellState, WorldError> {
        let presence = |present: bool| {
            if present {
                CellState::Present
            } else {
                CellState::Empty
            }
        };
        Ok(match &self.layers[idx].1 {
            Layer::Autotiled(layer) => CellState::from_tile(layer.query(coord)?),
            Layer::Presence { grid, .. } => presence(grid.query(coord)?),
            Layer::Shadow(shadow) => presence(shadow.cells().query(coord)?),
            Layer::Foam => presence(self.animated.has_foam(coord)),
            Layer::Rocks => self
                .animated
                .rocks_at(coord)
                .map_or(CellState::Empty, CellState::Rocks),
        })
    }

    /// Paint with the tool palette's current selection
    pub fn paint_selected(
        &mut self,
        selection: Option<TileLabel>,
        x: i32,
        y: i32,
    ) -> Result<Vec<CellUpdate>, WorldError> {
        let Some(label) = selection else {
            tracing::warn!("Paint at ({}, {}) with no layer selected", x, y);
            return Err(WorldError::NoLayerSelected);
        };
        self.paint_at(label, x, y)
    }

    /// Delete with the tool palette's current selection
    pub fn delete_selected(
        &mut self,
        selection: Option<TerrainKind>,
        x: i32,
        y: i32,
    ) -> Result<Vec<CellUpdate>, WorldError> {
        let Some(kind) = selection else {
            tracing::warn!("Delete at ({}, {}) with no layer selected", x, y);
            return Err(WorldError::NoLayerSelected);
        };
        self.delete_at(kind, x, y)
    }

    /// Occupied cells of the `kind` layer
    pub fn occupied(&self, kind: TerrainKind) -> Result<Vec<GridCoord>, WorldError> {
        let idx = self.layer_index(kind)?;
        Ok(match &self.layers[idx].1 {
            Layer::Autotiled(layer) => layer.occupied().map(|(coord, _)| coord).collect(),
            Layer::Presence { grid, .. } => grid.occupied().collect(),
            Layer::Shadow(shadow) => shadow.occupied().collect(),
            Layer::Foam => self.animated.foam_cells(),
            Layer::Rocks => self.animated.rock_cells(),
        })
    }

    /// The label a cell would carry on export, if the `kind` layer covers it
    pub fn label_at(&self, kind: TerrainKind, coord: GridCoord) -> Result<Option<TileLabel>, WorldError> {
        let idx = self.layer_index(kind)?;
        Ok(match self.state_at(idx, coord)? {
            CellState::Empty => None,
            CellState::Rocks(variant) => Some(TileLabel::rocks(variant)),
            CellState::Present | CellState::Tile(_) => Some(TileLabel::terrain(kind)),
        })
    }

    /// Empty every layer
    pub fn clear(&mut self) {
        for (_, layer) in &mut self.layers {
            match layer {
                Layer::Autotiled(terrain) => terrain.clear(),
                Layer::Presence { grid, .. } => grid.clear(),
                Layer::Shadow(shadow) => shadow.clear(),
                Layer::Foam | Layer::Rocks => {}
            }
        }
        self.animated.clear();
        self.record(WorldEvent::Cleared);
        tracing::info!("Cleared world");
    }

    /// Take all queued events, oldest first. At most [`EVENT_HISTORY`] of
    /// the latest events are kept between drains.
    pub fn drain_events(&mut self) -> Vec<WorldEvent> {
        self.events.drain(..).collect()
    }

    fn record(&mut self, event: WorldEvent) {
        if self.events.len() == EVENT_HISTORY {
            self.events.pop_front();
        }
        self.events.push_back(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use worldbuilder_autotile::VariantName;
    use worldbuilder_core::RockVariant;

    fn world() -> WorldGrid {
        WorldGrid::new(WorldConfig::new(8, 8).with_seed(1)).unwrap()
    }

    fn paint(world: &mut WorldGrid, kind: TerrainKind, x: i32, y: i32) -> Vec<CellUpdate> {
        world.paint_at(TileLabel::terrain(kind), x, y).unwrap()
    }

    #[test]
    fn test_render_order_skips_deco() {
        let world = world();
        let order: Vec<_> = world.render_order().collect();
        assert_eq!(order, RENDER_ORDER.to_vec());
        assert!(!order.contains(&TerrainKind::Deco));
    }

    #[test]
    fn test_deco_is_unknown_layer() {
        let mut world = world();
        assert_eq!(
            world.paint_at(TileLabel::terrain(TerrainKind::Deco), 0, 0),
            Err(WorldError::UnknownLayer(TerrainKind::Deco))
        );
        assert_eq!(
            world.delete_at(TerrainKind::Deco, 0, 0),
            Err(WorldError::UnknownLayer(TerrainKind::Deco))
        );
        assert!(world.query_at(TerrainKind::Deco, 0, 0).is_err());
    }

    #[test]
    fn test_no_selection() {
        let mut world = world();
        assert_eq!(world.paint_selected(None, 1, 1), Err(WorldError::NoLayerSelected));
        assert_eq!(world.delete_selected(None, 1, 1), Err(WorldError::NoLayerSelected));

        let updates = world
            .paint_selected(Some(TileLabel::terrain(TerrainKind::Water)), 1, 1)
            .unwrap();
        assert_eq!(updates.len(), 1);
    }

    #[test]
    fn test_out_of_bounds_never_writes() {
        let mut world = world();
        for kind in RENDER_ORDER {
            let label = TileLabel::terrain(kind);
            assert!(matches!(
                world.paint_at(label, -1, 0),
                Err(WorldError::OutOfBounds { x: -1, y: 0, .. })
            ));
            assert!(matches!(
                world.paint_at(label, 8, 0),
                Err(WorldError::OutOfBounds { x: 8, .. })
            ));
            assert!(world.delete_at(kind, 0, 8).is_err());
            assert!(world.occupied(kind).unwrap().is_empty());
        }
        assert!(world.drain_events().is_empty());
    }

    #[test]
    fn test_autotiled_paint_reports_neighbors() {
        let mut world = world();
        paint(&mut world, TerrainKind::Grass, 2, 2);
        let updates = paint(&mut world, TerrainKind::Grass, 3, 2);

        assert_eq!(updates.len(), 2);
        assert!(updates.iter().all(|u| u.kind == TerrainKind::Grass));
        assert!(matches!(
            world.query_at(TerrainKind::Grass, 2, 2).unwrap(),
            CellState::Tile(v) if v.name == VariantName::HorLeft
        ));
        assert!(world.is_consistent());
    }

    #[test]
    fn test_layers_are_independent() {
        let mut world = world();
        paint(&mut world, TerrainKind::Sand, 1, 1);
        paint(&mut world, TerrainKind::Grass, 2, 1);

        // Grass next door does not change the lone sand tile
        assert!(matches!(
            world.query_at(TerrainKind::Sand, 1, 1).unwrap(),
            CellState::Tile(v) if v.name == VariantName::Solo
        ));
        assert_eq!(world.query_at(TerrainKind::Sand, 2, 1).unwrap(), CellState::Empty);
    }

    #[test]
    fn test_shadow_repaint_is_rejected() {
        let mut world = world();
        paint(&mut world, TerrainKind::Shadow, 4, 4);
        world.drain_events();

        let updates = paint(&mut world, TerrainKind::Shadow, 4, 4);
        assert!(updates.is_empty());
        assert_eq!(
            world.drain_events(),
            vec![WorldEvent::Rejected {
                kind: TerrainKind::Shadow,
                coord: GridCoord::new(4, 4),
                reason: RejectReason::AlreadyPainted,
            }]
        );
    }

    #[test]
    fn test_shadow_delete_keeps_connected() {
        let mut world = world();
        paint(&mut world, TerrainKind::Shadow, 2, 2);
        paint(&mut world, TerrainKind::Shadow, 3, 3);

        world.delete_at(TerrainKind::Shadow, 2, 2).unwrap();
        assert_eq!(world.query_at(TerrainKind::Shadow, 2, 2).unwrap(), CellState::Empty);
        assert_eq!(world.query_at(TerrainKind::Shadow, 3, 3).unwrap(), CellState::Present);
    }

    #[test]
    fn test_water_repaint_is_reported_bridge_shadow_is_not() {
        let mut world = world();
        paint(&mut world, TerrainKind::Water, 0, 0);
        assert_eq!(paint(&mut world, TerrainKind::Water, 0, 0).len(), 1);

        paint(&mut world, TerrainKind::BridgeShadow, 0, 0);
        assert!(paint(&mut world, TerrainKind::BridgeShadow, 0, 0).is_empty());
        assert_eq!(
            world.query_at(TerrainKind::BridgeShadow, 0, 0).unwrap(),
            CellState::Present
        );
    }

    #[test]
    fn test_rocks_keep_first_variant() {
        let mut world = world();
        let two = RockVariant::new(2).unwrap();
        let four = RockVariant::new(4).unwrap();

        world.paint_at(TileLabel::rocks(two), 5, 5).unwrap();
        assert!(world.paint_at(TileLabel::rocks(four), 5, 5).unwrap().is_empty());
        assert_eq!(world.query_at(TerrainKind::Rocks, 5, 5).unwrap(), CellState::Rocks(two));
        assert_eq!(
            world.label_at(TerrainKind::Rocks, GridCoord::new(5, 5)).unwrap(),
            Some(TileLabel::rocks(two))
        );

        world.delete_at(TerrainKind::Rocks, 5, 5).unwrap();
        world.paint_at(TileLabel::rocks(four), 5, 5).unwrap();
        assert_eq!(world.query_at(TerrainKind::Rocks, 5, 5).unwrap(), CellState::Rocks(four));
    }

    #[test]
    fn test_animated_handle_tracks_foam() {
        let mut world = world();
        let handle = world.animated_handle();
        paint(&mut world, TerrainKind::Foam, 1, 0);
        assert!(handle.has_foam(GridCoord::new(1, 0)));

        world.delete_at(TerrainKind::Foam, 1, 0).unwrap();
        assert_eq!(handle.active_count(), 0);
    }

    #[test]
    fn test_delete_empty_is_silent() {
        let mut world = world();
        for kind in RENDER_ORDER {
            assert!(world.delete_at(kind, 3, 3).unwrap().is_empty());
        }
        assert!(world.drain_events().is_empty());
    }

    #[test]
    fn test_events_are_drained_in_order() {
        let mut world = world();
        paint(&mut world, TerrainKind::Wall, 1, 1);
        world.delete_at(TerrainKind::Wall, 1, 1).unwrap();

        let messages: Vec<_> = world.drain_events().iter().map(ToString::to_string).collect();
        assert_eq!(messages, vec!["Painted WALL at (1, 1)", "Deleted WALL at (1, 1)"]);
        assert!(world.drain_events().is_empty());
    }

    #[test]
    fn test_event_queue_keeps_latest() {
        let mut world = world();
        for _ in 0..EVENT_HISTORY {
            paint(&mut world, TerrainKind::Wall, 0, 0);
            world.delete_at(TerrainKind::Wall, 0, 0).unwrap();
        }
        world.clear();

        let events = world.drain_events();
        assert_eq!(events.len(), EVENT_HISTORY);
        assert_eq!(
            events.first(),
            Some(&WorldEvent::Deleted {
                kind: TerrainKind::Wall,
                coord: GridCoord::new(0, 0),
            })
        );
        assert_eq!(events.last(), Some(&WorldEvent::Cleared));
    }

    #[test]
    fn test_clear_empties_everything() {
        let mut world = world();
        paint(&mut world, TerrainKind::Plateau, 0, 0);
        paint(&mut world, TerrainKind::Foam, 1, 1);
        paint(&mut world, TerrainKind::SandFill, 2, 2);
        world.paint_at(TileLabel::terrain(TerrainKind::Rocks), 3, 3).unwrap();

        world.clear();
        for kind in RENDER_ORDER {
            assert!(world.occupied(kind).unwrap().is_empty(), "{kind} not cleared");
        }
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        assert!(WorldGrid::with_size(0, 4).is_err());
        let config = WorldConfig::new(4, 4).with_shadow_connection_radius(0);
        assert!(WorldGrid::new(config).is_err());
    }
}
