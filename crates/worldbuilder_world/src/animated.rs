//! Registry of animated overlays (foam, rocks)
//!
//! The edit thread owns the [`AnimatedRegistry`] and is the only writer. A
//! renderer driving frame animation gets an [`AnimatedHandle`] that can be
//! cloned and sent to another thread; it only takes snapshots.

use parking_lot::RwLock;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use worldbuilder_core::{GridCoord, RockVariant};

/// Active animated cells
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnimatedOverlays {
    foam: BTreeSet<GridCoord>,
    rocks: BTreeMap<GridCoord, RockVariant>,
}

impl AnimatedOverlays {
    pub fn has_foam(&self, coord: GridCoord) -> bool {
        self.foam.contains(&coord)
    }

    pub fn rocks_at(&self, coord: GridCoord) -> Option<RockVariant> {
        self.rocks.get(&coord).copied()
    }

    pub fn foam(&self) -> impl Iterator<Item = GridCoord> + '_ {
        self.foam.iter().copied()
    }

    pub fn rocks(&self) -> impl Iterator<Item = (GridCoord, RockVariant)> + '_ {
        self.rocks.iter().map(|(coord, variant)| (*coord, *variant))
    }

    /// Number of animated cells across foam and rocks
    pub fn len(&self) -> usize {
        self.foam.len() + self.rocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.foam.is_empty() && self.rocks.is_empty()
    }
}

/// Write side of the animated overlays, owned by the world
#[derive(Debug, Default)]
pub struct AnimatedRegistry {
    state: Arc<RwLock<AnimatedOverlays>>,
}

impl AnimatedRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A read-only handle sharing this registry's state
    pub fn handle(&self) -> AnimatedHandle {
        AnimatedHandle {
            state: Arc::clone(&self.state),
        }
    }

    /// Returns true if foam was not already present
    pub fn insert_foam(&self, coord: GridCoord) -> bool {
        self.state.write().foam.insert(coord)
    }

    pub fn remove_foam(&self, coord: GridCoord) -> bool {
        self.state.write().foam.remove(&coord)
    }

    /// Place rocks at `coord`. An existing entry keeps its variant and the
    /// call returns false.
    pub fn insert_rocks(&self, coord: GridCoord, variant: RockVariant) -> bool {
        let mut state = self.state.write();
        if state.rocks.contains_key(&coord) {
            return false;
        }
        state.rocks.insert(coord, variant);
        true
    }

    pub fn remove_rocks(&self, coord: GridCoord) -> Option<RockVariant> {
        self.state.write().rocks.remove(&coord)
    }

    pub fn has_foam(&self, coord: GridCoord) -> bool {
        self.state.read().has_foam(coord)
    }

    pub fn rocks_at(&self, coord: GridCoord) -> Option<RockVariant> {
        self.state.read().rocks_at(coord)
    }

    pub fn foam_cells(&self) -> Vec<GridCoord> {
        self.state.read().foam().collect()
    }

    pub fn rock_cells(&self) -> Vec<GridCoord> {
        self.state.read().rocks.keys().copied().collect()
    }

    pub fn clear(&self) {
        let mut state = self.state.write();
        state.foam.clear();
        state.rocks.clear();
    }
}

/// Cloneable, thread-safe read access to the animated overlays
#[derive(Debug, Clone)]
pub struct AnimatedHandle {
    state: Arc<RwLock<AnimatedOverlays>>,
}

impl AnimatedHandle {
    /// Copy of the current state
    pub fn snapshot(&self) -> AnimatedOverlays {
        self.state.read().clone()
    }

    pub fn has_foam(&self, coord: GridCoord) -> bool {
        self.state.read().has_foam(coord)
    }

    pub fn rocks_at(&self, coord: GridCoord) -> Option<RockVariant> {
        self.state.read().rocks_at(coord)
    }

    pub fn active_count(&self) -> usize {
        self.state.read().len()
    }
}
