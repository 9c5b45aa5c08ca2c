//! Paint a small island and write its tile map and collision map.
//!
//! ```sh
//! cargo run -p worldbuilder --example paint_island -- out/
//! ```

use std::path::PathBuf;
use worldbuilder::prelude::*;
use worldbuilder::world::save_export;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let out_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("island_export"));

    let mut world = WorldGrid::new(WorldConfig::new(12, 12).with_seed(3))?;
    let paint = |world: &mut WorldGrid, kind, x, y| world.paint_at(TileLabel::terrain(kind), x, y);

    for y in 0..12 {
        for x in 0..12 {
            paint(&mut world, TerrainKind::Water, x, y)?;
        }
    }
    for y in 3..9 {
        for x in 3..9 {
            paint(&mut world, TerrainKind::Sand, x, y)?;
        }
    }
    for y in 4..8 {
        for x in 4..8 {
            paint(&mut world, TerrainKind::Grass, x, y)?;
        }
    }
    for x in 1..4 {
        paint(&mut world, TerrainKind::Bridge, x, 6)?;
    }
    world.paint_at(TileLabel::rocks(RockVariant::new(3)?), 8, 3)?;

    for event in world.drain_events().iter().rev().take(5) {
        println!("{event}");
    }

    let exported = export(&world);
    let (tile_map, collision_map) = save_export(&exported, &out_dir)?;
    println!("Wrote {} and {}", tile_map.display(), collision_map.display());
    Ok(())
}
