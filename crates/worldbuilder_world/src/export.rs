//! Tile map export and import
//!
//! The tile map is a JSON array indexed `[x][y][slot]`. Each slot belongs to
//! one terrain kind (see [`EXPORT_ORDER`]) and holds that kind's label when
//! the cell is covered, or `null`. Only presence is stored: importing paints
//! every label again, so autotiled variants are recomputed rather than read.

use serde::{Deserialize, Serialize};
use worldbuilder_core::{TerrainKind, TileLabel, WorldError};

use crate::collision::{CollisionMap, CollisionMapDocument};
use crate::world::WorldGrid;

/// Terrain kind stored in each tile map slot
pub const EXPORT_ORDER: [TerrainKind; 13] = [
    TerrainKind::Grass,
    TerrainKind::Water,
    TerrainKind::Foam,
    TerrainKind::Sand,
    TerrainKind::Rocks,
    TerrainKind::Shadow,
    TerrainKind::Wall,
    TerrainKind::Plateau,
    TerrainKind::Stairs,
    TerrainKind::Bridge,
    TerrainKind::BridgeShadow,
    TerrainKind::SandFill,
    TerrainKind::GrassFill,
];

/// Number of slots per cell
pub const SLOT_COUNT: usize = EXPORT_ORDER.len();

/// Slot index of `kind`, if it is exported
pub fn export_slot(kind: TerrainKind) -> Option<usize> {
    EXPORT_ORDER.iter().position(|k| *k == kind)
}

/// Serialized tile map, `[x][y][slot]`
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TileMapDocument(pub Vec<Vec<Vec<Option<String>>>>);

impl TileMapDocument {
    /// An all-empty document for a `width` x `height` world
    pub fn empty(width: u32, height: u32) -> Self {
        Self(vec![
            vec![vec![None; SLOT_COUNT]; height as usize];
            width as usize
        ])
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Number of non-null entries
    pub fn label_count(&self) -> usize {
        self.0
            .iter()
            .flatten()
            .flatten()
            .filter(|entry| entry.is_some())
            .count()
    }
}

/// Both documents produced by an export
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorldExport {
    pub tile_map: TileMapDocument,
    pub collision_map: CollisionMapDocument,
}

/// Outcome of an import
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportReport {
    /// Labels painted into the world
    pub applied: usize,
    /// Skipped entries, each a [`WorldError::MalformedImport`]
    pub issues: Vec<WorldError>,
    /// Collision map derived from the imported world
    pub collision: CollisionMap,
}

impl ImportReport {
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Serialize every layer of `world` and derive its collision map
pub fn export(world: &WorldGrid) -> WorldExport {
    let (width, height) = world.dimensions();
    let mut tile_map = TileMapDocument::empty(width, height);

    for (slot, kind) in EXPORT_ORDER.into_iter().enumerate() {
        for coord in world.occupied(kind).into_iter().flatten() {
            let label = world.label_at(kind, coord).ok().flatten();
            if let Some(entry) = tile_map
                .0
                .get_mut(coord.x as usize)
                .and_then(|column| column.get_mut(coord.y as usize))
                .and_then(|cell| cell.get_mut(slot))
            {
                *entry = label.map(|label| label.to_string());
            }
        }
    }

    let collision_map = CollisionMap::derive(world).to_document();
    tracing::info!(
        "Exported {}x{} world with {} labels",
        width,
        height,
        tile_map.label_count()
    );
    WorldExport {
        tile_map,
        collision_map,
    }
}

/// Replace the contents of `world` with `document`.
///
/// Every label is painted back through [`WorldGrid::paint_at`]. Entries that
/// cannot be decoded, sit in the wrong slot, fall outside the world, or are
/// refused by their layer are skipped and reported; the rest still apply.
/// Column, row and slot counts that differ from the world are reported as
/// shape issues ahead of any entry issue.
pub fn import(world: &mut WorldGrid, document: &TileMapDocument) -> ImportReport {
    world.clear();

    let mut applied = 0;
    let (width, height) = world.dimensions();
    let mut issues = shape_issues(document, width, height);

    for (x, column) in document.0.iter().enumerate() {
        for (y, cell) in column.iter().enumerate() {
            for (slot, entry) in cell.iter().enumerate() {
                let Some(raw) = entry else {
                    continue;
                };
                let malformed = |reason: String| WorldError::MalformedImport {
                    x,
                    y,
                    slot,
                    reason,
                };

                match decode_entry(raw, x, y, slot, width, height) {
                    Ok((label, cx, cy)) => match world.paint_at(label, cx, cy) {
                        Ok(_) => applied += 1,
                        Err(err) => issues.push(malformed(err.to_string())),
                    },
                    Err(reason) => issues.push(malformed(reason)),
                }
            }
        }
    }

    for issue in &issues {
        tracing::warn!("Skipped import entry: {}", issue);
    }
    tracing::info!(
        "Imported {} labels into {}x{} world ({} skipped)",
        applied,
        width,
        height,
        issues.len()
    );

    ImportReport {
        applied,
        issues,
        collision: CollisionMap::derive(world),
    }
}

/// Compare the document's column, row and slot counts with the world.
///
/// Each mismatch is reported at the first index where the expected and actual
/// counts part ways: `x` for columns, `y` for rows, `slot` for layer slots.
fn shape_issues(document: &TileMapDocument, width: u32, height: u32) -> Vec<WorldError> {
    let width = width as usize;
    let height = height as usize;
    let shape = |x: usize, y: usize, slot: usize, reason: String| WorldError::MalformedImport {
        x,
        y,
        slot,
        reason: format!("shape: {}", reason),
    };

    let mut issues = Vec::new();
    let columns = document.0.len();
    if columns != width {
        issues.push(shape(
            columns.min(width),
            0,
            0,
            format!("{} columns for a world {} cells wide", columns, width),
        ));
    }
    for (x, column) in document.0.iter().enumerate() {
        if column.len() != height {
            issues.push(shape(
                x,
                column.len().min(height),
                0,
                format!("column has {} rows for a world {} cells high", column.len(), height),
            ));
        }
        for (y, cell) in column.iter().enumerate() {
            if cell.len() != SLOT_COUNT {
                issues.push(shape(
                    x,
                    y,
                    cell.len().min(SLOT_COUNT),
                    format!("cell has {} slots instead of {}", cell.len(), SLOT_COUNT),
                ));
            }
        }
    }
    issues
}

/// Check one tile map entry and turn it into a paint request
fn decode_entry(
    raw: &str,
    x: usize,
    y: usize,
    slot: usize,
    width: u32,
    height: u32,
) -> Result<(TileLabel, i32, i32), String> {
    if slot >= SLOT_COUNT {
        return Err(format!("slot {} exceeds the {} layer slots", slot, SLOT_COUNT));
    }
    if x >= width as usize || y >= height as usize {
        return Err(format!("cell lies outside the {}x{} world", width, height));
    }

    let label: TileLabel = raw.parse().map_err(|err: WorldError| err.to_string())?;
    let expected = export_slot(label.kind());
    if expected != Some(slot) {
        return Err(match expected {
            Some(expected) => format!("label {} belongs in slot {}", label, expected),
            None => format!("label {} is never exported", label),
        });
    }

    let cx = i32::try_from(x).map_err(|_| format!("x {} is not addressable", x))?;
    let cy = i32::try_from(y).map_err(|_| format!("y {} is not addressable", y))?;
    Ok((label, cx, cy))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{CellState, WorldEvent};
    use crate::world::EVENT_HISTORY;
    use worldbuilder_core::{GridCoord, RockVariant, WorldConfig};

    fn world(width: u32, height: u32) -> WorldGrid {
        let config = WorldConfig::new(width, height)
            .with_seed(5)
            .with_shadow_connection_radius(1);
        WorldGrid::new(config).unwrap()
    }

    fn paint(world: &mut WorldGrid, kind: TerrainKind, x: i32, y: i32) {
        world.paint_at(TileLabel::terrain(kind), x, y).unwrap();
    }

    #[test]
    fn test_export_slots() {
        assert_eq!(SLOT_COUNT, 13);
        assert_eq!(export_slot(TerrainKind::Grass), Some(0));
        assert_eq!(export_slot(TerrainKind::Rocks), Some(4));
        assert_eq!(export_slot(TerrainKind::GrassFill), Some(12));
        assert_eq!(export_slot(TerrainKind::Deco), None);
    }

    #[test]
    fn test_export_labels() {
        let mut world = world(3, 2);
        paint(&mut world, TerrainKind::Grass, 0, 0);
        paint(&mut world, TerrainKind::Water, 0, 0);
        world
            .paint_at(TileLabel::rocks(RockVariant::new(3).unwrap()), 2, 1)
            .unwrap();

        let doc = export(&world).tile_map;
        assert_eq!(doc.0.len(), 3);
        assert_eq!(doc.0[0].len(), 2);
        assert_eq!(doc.0[0][0].len(), SLOT_COUNT);
        assert_eq!(doc.0[0][0][0].as_deref(), Some("GRASS"));
        assert_eq!(doc.0[0][0][1].as_deref(), Some("WATER"));
        assert_eq!(doc.0[2][1][4].as_deref(), Some("ROCKS3"));
        assert_eq!(doc.label_count(), 3);
    }

    #[test]
    fn test_export_json_is_bare_array() {
        let mut world = world(1, 1);
        paint(&mut world, TerrainKind::SandFill, 0, 0);

        let json = export(&world).tile_map.to_json().unwrap();
        assert!(json.starts_with("[[["));
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0][0][11], "SANDFILL");
        assert!(value[0][0][0].is_null());
    }

    #[test]
    fn test_round_trip_preserves_occupancy() {
        let mut source = world(6, 6);
        paint(&mut source, TerrainKind::Grass, 0, 0);
        paint(&mut source, TerrainKind::Grass, 1, 0);
        paint(&mut source, TerrainKind::Water, 0, 1);
        paint(&mut source, TerrainKind::Bridge, 3, 3);
        paint(&mut source, TerrainKind::Shadow, 4, 4);
        paint(&mut source, TerrainKind::Foam, 5, 5);
        source
            .paint_at(TileLabel::rocks(RockVariant::new(4).unwrap()), 2, 2)
            .unwrap();

        let exported = export(&source);
        let mut target = world(6, 6);
        let report = import(&mut target, &exported.tile_map);

        assert!(report.is_clean());
        assert_eq!(report.applied, 7);
        for kind in EXPORT_ORDER {
            assert_eq!(
                source.occupied(kind).unwrap(),
                target.occupied(kind).unwrap(),
                "{kind} differs after round trip"
            );
        }
        assert_eq!(
            target.query_at(TerrainKind::Rocks, 2, 2).unwrap(),
            CellState::Rocks(RockVariant::new(4).unwrap())
        );
        assert_eq!(report.collision.ground_at(0, 1).unwrap(), Some(TerrainKind::Water));
        assert_eq!(report.collision.to_document(), exported.collision_map);
        assert!(target.is_consistent());
    }

    #[test]
    fn test_import_replaces_existing_content() {
        let mut target = world(3, 3);
        paint(&mut target, TerrainKind::Sand, 1, 1);

        let report = import(&mut target, &TileMapDocument::empty(3, 3));
        assert_eq!(report.applied, 0);
        assert!(target.occupied(TerrainKind::Sand).unwrap().is_empty());
    }

    #[test]
    fn test_import_skips_bad_entries() {
        let mut doc = TileMapDocument::empty(2, 2);
        doc.0[0][0][0] = Some("GRASS".to_string());
        doc.0[0][1][0] = Some("LAVA".to_string());
        doc.0[1][0][0] = Some("WATER".to_string());
        doc.0[1][1][4] = Some("ROCKS9".to_string());
        doc.0[1][1][1] = Some("WATER".to_string());

        let mut target = world(2, 2);
        let report = import(&mut target, &doc);

        assert_eq!(report.applied, 2);
        assert_eq!(report.issues.len(), 3);
        assert!(report
            .issues
            .iter()
            .all(|issue| matches!(issue, WorldError::MalformedImport { .. })));
        assert!(matches!(
            &report.issues[1],
            WorldError::MalformedImport { x: 1, y: 0, slot: 0, reason } if reason.contains("slot 1")
        ));
        assert_eq!(target.occupied(TerrainKind::Grass).unwrap(), vec![GridCoord::new(0, 0)]);
        assert_eq!(target.occupied(TerrainKind::Water).unwrap(), vec![GridCoord::new(1, 1)]);
    }

    #[test]
    fn test_import_reports_entries_outside_world() {
        let mut doc = TileMapDocument::empty(3, 2);
        doc.0[2][0][0] = Some("GRASS".to_string());
        doc.0[0][1][0] = Some("GRASS".to_string());
        doc.0[0][0].push(Some("GRASS".to_string()));

        let mut target = world(2, 2);
        let report = import(&mut target, &doc);

        assert_eq!(report.applied, 1);
        assert_eq!(report.issues.len(), 4);
        assert!(matches!(
            &report.issues[0],
            WorldError::MalformedImport { x: 2, y: 0, slot: 0, reason } if reason.starts_with("shape")
        ));
        assert!(matches!(
            &report.issues[1],
            WorldError::MalformedImport { x: 0, y: 0, slot: 13, reason } if reason.starts_with("shape")
        ));
        assert!(matches!(
            report.issues[2],
            WorldError::MalformedImport { x: 0, y: 0, slot: 13, .. }
        ));
        assert!(matches!(report.issues[3], WorldError::MalformedImport { x: 2, .. }));
    }

    #[test]
    fn test_import_reports_shape_mismatch() {
        let mut doc = TileMapDocument::empty(2, 2);
        doc.0[0][0][0] = Some("GRASS".to_string());
        doc.0[1][1].truncate(3);

        let mut target = world(4, 4);
        let report = import(&mut target, &doc);

        assert!(!report.is_clean());
        assert_eq!(report.applied, 1);
        let shapes: Vec<_> = report
            .issues
            .iter()
            .filter_map(|issue| match issue {
                WorldError::MalformedImport { x, y, slot, reason } if reason.starts_with("shape") => {
                    Some((*x, *y, *slot))
                }
                _ => None,
            })
            .collect();
        assert_eq!(shapes, vec![(2, 0, 0), (0, 2, 0), (1, 2, 0), (1, 1, 3)]);
        assert_eq!(target.occupied(TerrainKind::Grass).unwrap(), vec![GridCoord::new(0, 0)]);
    }

    #[test]
    fn test_repeated_imports_keep_event_queue_bounded() {
        let mut doc = TileMapDocument::empty(30, 30);
        for column in &mut doc.0 {
            for cell in column {
                cell[0] = Some("GRASS".to_string());
                cell[1] = Some("WATER".to_string());
            }
        }

        let mut target = world(30, 30);
        for _ in 0..5 {
            let report = import(&mut target, &doc);
            assert_eq!(report.applied, 30 * 30 * 2);
        }

        let events = target.drain_events();
        assert_eq!(events.len(), EVENT_HISTORY);
        assert_eq!(
            events.last(),
            Some(&WorldEvent::Painted {
                label: TileLabel::terrain(TerrainKind::Water),
                coord: GridCoord::new(29, 29),
            })
        );
        assert!(target.drain_events().is_empty());
    }

    #[test]
    fn test_import_ignores_repeated_shadow_without_issue() {
        // A shadow label is only painted once per cell, so a clean document
        // never triggers the already-painted refusal
        let mut doc = TileMapDocument::empty(2, 1);
        doc.0[0][0][5] = Some("SHADOW".to_string());
        doc.0[1][0][5] = Some("SHADOW".to_string());

        let mut target = world(2, 1);
        let report = import(&mut target, &doc);
        assert!(report.is_clean());
        assert_eq!(target.occupied(TerrainKind::Shadow).unwrap().len(), 2);
    }
}
