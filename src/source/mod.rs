//! In-memory level reader.
//!
//! A [`Level`] holds one loaded level file: its worlds and the models it
//! defines. A [`Container`] stacks several levels the way the game does, so
//! a world level can place models that live in a shared common level.

pub mod loader;

use crate::types::{Model, SceneSource, World};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// On-disk shape of a level file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LevelData {
    #[serde(default)]
    pub worlds: Vec<World>,
    #[serde(default)]
    pub models: Vec<Model>,
}

/// One loaded level with an index over its model names.
#[derive(Debug, Clone, Default)]
pub struct Level {
    name: String,
    worlds: Vec<World>,
    models: Vec<Model>,
    model_index: HashMap<String, usize>,
}

impl Level {
    pub fn new(name: impl Into<String>, worlds: Vec<World>, models: Vec<Model>) -> Self {
        let mut model_index = HashMap::with_capacity(models.len());
        for (i, model) in models.iter().enumerate() {
            // First definition wins, like the reader's lookup.
            model_index.entry(model.name.clone()).or_insert(i);
        }

        Self {
            name: name.into(),
            worlds,
            models,
            model_index,
        }
    }

    pub fn from_data(name: impl Into<String>, data: LevelData) -> Self {
        Self::new(name, data.worlds, data.models)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn model_count(&self) -> usize {
        self.models.len()
    }
}

impl SceneSource for Level {
    fn worlds(&self) -> &[World] {
        &self.worlds
    }

    fn find_model(&self, geometry_name: &str) -> Option<&Model> {
        self.model_index
            .get(geometry_name)
            .map(|&i| &self.models[i])
    }
}

/// Several levels loaded together.
///
/// Worlds come from the first level that has any; models are looked up in
/// every level, in load order.
#[derive(Debug, Clone, Default)]
pub struct Container {
    levels: Vec<Level>,
}

impl Container {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_level(&mut self, level: Level) {
        self.levels.push(level);
    }

    pub fn levels(&self) -> &[Level] {
        &self.levels
    }

    /// The level whose worlds are converted.
    pub fn world_level(&self) -> Option<&Level> {
        self.levels.iter().find(|l| !l.worlds.is_empty())
    }
}

impl SceneSource for Container {
    fn worlds(&self) -> &[World] {
        self.world_level().map(|l| l.worlds.as_slice()).unwrap_or(&[])
    }

    fn find_model(&self, geometry_name: &str) -> Option<&Model> {
        self.levels
            .iter()
            .find_map(|l| l.find_model(geometry_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model(name: &str, segments: usize) -> Model {
        Model {
            name: name.to_string(),
            segments: vec![Default::default(); segments],
        }
    }

    #[test]
    fn test_level_model_lookup() {
        let level = Level::new(
            "test",
            Vec::new(),
            vec![model("rock01", 1), model("tree01", 2), model("rock01", 3)],
        );

        assert_eq!(level.model_count(), 3);
        assert_eq!(level.find_model("tree01").unwrap().segments.len(), 2);
        // Duplicate names resolve to the first definition
        assert_eq!(level.find_model("rock01").unwrap().segments.len(), 1);
        assert!(level.find_model("missing").is_none());
    }

    #[test]
    fn test_container_worlds_from_first_world_level() {
        let common = Level::new("common", Vec::new(), vec![model("cp_post", 1)]);
        let world_level = Level::new(
            "map",
            vec![World {
                name: "base".into(),
                ..Default::default()
            }],
            vec![model("rock01", 1)],
        );

        let mut container = Container::new();
        container.add_level(common);
        container.add_level(world_level);

        assert_eq!(container.worlds().len(), 1);
        assert_eq!(container.world_level().unwrap().name(), "map");
        assert!(container.find_model("cp_post").is_some());
        assert!(container.find_model("rock01").is_some());
        assert!(container.find_model("nope").is_none());
    }

    #[test]
    fn test_empty_container_has_no_worlds() {
        let container = Container::new();
        assert!(container.worlds().is_empty());
        assert!(container.world_level().is_none());
    }
}
