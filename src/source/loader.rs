//! Level loading from JSON files.

use super::{Container, Level, LevelData};
use crate::error::{ConvertError, Result};
use std::path::Path;

/// Load a level file. The level is named after the file stem.
pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Level> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path)?;
    let name = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    load_from_str(name, &contents)
        .map_err(|e| ConvertError::Load(format!("{}: {}", path.display(), e)))
}

/// Load a level from JSON text.
pub fn load_from_str(name: impl Into<String>, json: &str) -> Result<Level> {
    let data: LevelData = serde_json::from_str(json)?;
    Ok(Level::from_data(name, data))
}

/// Load a world level plus an optional common level into a container.
///
/// A common level that does not exist is skipped with a warning; a world
/// level that does not exist is an error.
pub fn load_container<P: AsRef<Path>, Q: AsRef<Path>>(
    world_level: P,
    common_level: Option<Q>,
) -> Result<Container> {
    let mut container = Container::new();
    container.add_level(load_from_path(world_level)?);

    if let Some(common) = common_level {
        let common = common.as_ref();
        if common.exists() {
            container.add_level(load_from_path(common)?);
        } else {
            log::warn!("Could not find '{}'!", common.display());
        }
    }

    Ok(container)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{SceneSource, Topology};
    use std::fs;

    const LEVEL_JSON: &str = r#"{
        "worlds": [{
            "name": "base",
            "terrain": {
                "name": "ground",
                "positions": [[0,0,0],[1,0,0],[0,0,1]],
                "indices": [0,1,2]
            },
            "instances": [
                {"name": "rock_a", "position": [1,2,3], "rotation": [0,0,0,1],
                 "properties": {"GeometryName": "rock01"}}
            ]
        }],
        "models": [{
            "name": "rock01",
            "segments": [{
                "positions": [[0,0,0],[1,0,0],[0,1,0]],
                "indices": [0,1,2],
                "material": {"diffuse_color": [255,0,0,255]},
                "topology": 5
            }]
        }]
    }"#;

    #[test]
    fn test_load_from_str() {
        let level = load_from_str("test", LEVEL_JSON).unwrap();
        assert_eq!(level.name(), "test");
        assert_eq!(level.worlds().len(), 1);

        let world = &level.worlds()[0];
        assert_eq!(world.terrain.as_ref().unwrap().positions.len(), 3);
        assert_eq!(world.instances[0].geometry_name(), Some("rock01"));

        let rock = level.find_model("rock01").unwrap();
        assert_eq!(rock.segments[0].topology, Topology::TriangleStrip);
        assert!(rock.segments[0].uvs.is_empty());
    }

    #[test]
    fn test_load_invalid_json() {
        assert!(matches!(
            load_from_str("bad", "{ not json"),
            Err(ConvertError::Json(_))
        ));
    }

    #[test]
    fn test_load_container_with_missing_common() {
        let dir = tempfile::tempdir().unwrap();
        let map = dir.path().join("map.json");
        fs::write(&map, LEVEL_JSON).unwrap();

        let container = load_container(&map, Some(dir.path().join("ingame.json"))).unwrap();
        assert_eq!(container.levels().len(), 1);
        assert_eq!(container.levels()[0].name(), "map");
    }

    #[test]
    fn test_load_container_with_common() {
        let dir = tempfile::tempdir().unwrap();
        let map = dir.path().join("map.json");
        let common = dir.path().join("ingame.json");
        fs::write(&map, LEVEL_JSON).unwrap();
        fs::write(&common, r#"{"models": [{"name": "turret", "segments": []}]}"#).unwrap();

        let container = load_container(&map, Some(&common)).unwrap();
        assert_eq!(container.levels().len(), 2);
        assert!(container.find_model("turret").is_some());
        assert_eq!(container.worlds().len(), 1);
    }

    #[test]
    fn test_load_missing_world_level() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_container(dir.path().join("missing.json"), None::<&Path>);
        assert!(matches!(result, Err(ConvertError::Io(_))));
    }
}
