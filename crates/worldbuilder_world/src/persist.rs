//! Reading and writing exported documents as JSON files

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::collision::CollisionMapDocument;
use crate::export::{TileMapDocument, WorldExport};

/// File name of the tile map inside an export directory
pub const TILE_MAP_FILE: &str = "tilemap.json";

/// File name of the collision map inside an export directory
pub const COLLISION_MAP_FILE: &str = "collisionmap.json";

/// Errors that can occur when saving or loading documents
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

fn write_json<T: Serialize>(value: &T, path: &Path) -> Result<(), PersistError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let json = serde_json::to_string(value)?;
    std::fs::write(path, json)?;
    Ok(())
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, PersistError> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Write both documents of `export` into `dir`, creating it if needed.
///
/// Returns the tile map and collision map paths.
pub fn save_export(export: &WorldExport, dir: &Path) -> Result<(PathBuf, PathBuf), PersistError> {
    let tile_map_path = dir.join(TILE_MAP_FILE);
    let collision_map_path = dir.join(COLLISION_MAP_FILE);

    write_json(&export.tile_map, &tile_map_path)?;
    write_json(&export.collision_map, &collision_map_path)?;

    tracing::info!("Saved world export to {}", dir.display());
    Ok((tile_map_path, collision_map_path))
}

pub fn save_tile_map(document: &TileMapDocument, path: &Path) -> Result<(), PersistError> {
    write_json(document, path)
}

pub fn load_tile_map(path: &Path) -> Result<TileMapDocument, PersistError> {
    let document = read_json(path)?;
    tracing::info!("Loaded tile map from {}", path.display());
    Ok(document)
}

pub fn load_collision_map(path: &Path) -> Result<CollisionMapDocument, PersistError> {
    read_json(path)
}
