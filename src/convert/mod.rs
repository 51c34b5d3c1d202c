//! Scene graph translation.
//!
//! This module walks the source worlds and turns them into a glTF document:
//! one scene per selected world, a node for the terrain and for every placed
//! instance, and one shared mesh per distinct geometry name.

pub mod builder;
pub mod material;
pub mod packer;
pub mod topology;

pub use builder::MeshBuilder;
pub use material::{normalize_color, MaterialTable};
pub use packer::{pack_streams, PackedAccessors, VertexStreams};
pub use topology::draw_mode;

use crate::document::{Document, GENERATOR};
use crate::error::{ConvertError, Result};
use crate::types::{Instance, SceneSource, Terrain, World};
use gltf_json as json;
use std::collections::HashMap;

/// Which worlds to convert.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum WorldSelection {
    /// Every world, in declaration order.
    #[default]
    All,
    /// Only the named worlds, still in declaration order.
    Named(Vec<String>),
}

impl WorldSelection {
    fn includes(&self, world: &World) -> bool {
        match self {
            WorldSelection::All => true,
            WorldSelection::Named(names) => names.iter().any(|n| *n == world.name),
        }
    }
}

/// Converter configuration.
#[derive(Debug, Clone)]
pub struct ConverterConfig {
    /// Worlds to convert.
    pub worlds: WorldSelection,
    /// `asset.generator` of the output document.
    pub generator: String,
    /// `asset.copyright` of the output document.
    pub copyright: Option<String>,
    /// Share one material between segments with the same diffuse color.
    pub deduplicate_materials: bool,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            worlds: WorldSelection::All,
            generator: GENERATOR.to_string(),
            copyright: None,
            deduplicate_materials: false,
        }
    }
}

impl ConverterConfig {
    /// Convert only the named worlds.
    pub fn with_worlds<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.worlds = WorldSelection::Named(names.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_copyright(mut self, copyright: impl Into<String>) -> Self {
        self.copyright = Some(copyright.into());
        self
    }

    pub fn with_material_deduplication(mut self, enabled: bool) -> Self {
        self.deduplicate_materials = enabled;
        self
    }
}

/// Counters from one translation run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TranslationStats {
    pub worlds: usize,
    pub terrains: usize,
    pub instances: usize,
    pub skipped_instances: usize,
    pub meshes_built: usize,
    pub cache_hits: usize,
}

/// Output of a translation run.
#[derive(Debug)]
pub struct ConvertOutput {
    pub document: Document,
    pub stats: TranslationStats,
}

/// The scene graph translator.
#[derive(Debug, Clone, Default)]
pub struct Converter {
    config: ConverterConfig,
}

impl Converter {
    /// Create a converter with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a converter with custom configuration.
    pub fn with_config(config: ConverterConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ConverterConfig {
        &self.config
    }

    /// Translate the selected worlds of `source` into a new document.
    pub fn convert<S: SceneSource>(&self, source: &S) -> Result<ConvertOutput> {
        let worlds = self.select_worlds(source.worlds())?;

        let mut translation = Translation::new(source, &self.config);
        for world in worlds {
            translation.translate_world(world)?;
        }

        let stats = translation.stats;
        log::info!(
            "Converted {} world(s): {} instance(s), {} skipped, {} mesh(es), {} cache hit(s)",
            stats.worlds,
            stats.instances,
            stats.skipped_instances,
            stats.meshes_built,
            stats.cache_hits
        );

        Ok(ConvertOutput {
            document: translation.finish(),
            stats,
        })
    }

    fn select_worlds<'w>(&self, worlds: &'w [World]) -> Result<Vec<&'w World>> {
        if worlds.is_empty() {
            return Err(ConvertError::NoWorlds);
        }

        if let WorldSelection::Named(names) = &self.config.worlds {
            for name in names {
                if !worlds.iter().any(|w| w.name == *name) {
                    log::warn!("World '{}' not found, ignoring", name);
                }
            }
        }

        let selected: Vec<_> = worlds
            .iter()
            .filter(|w| self.config.worlds.includes(w))
            .collect();

        match &self.config.worlds {
            WorldSelection::Named(names) if selected.is_empty() => {
                Err(ConvertError::NoWorldsSelected(names.clone()))
            }
            _ => Ok(selected),
        }
    }
}

/// State of one run: the document being built and the mesh cache.
struct Translation<'s, S> {
    source: &'s S,
    document: Document,
    materials: MaterialTable,
    /// Geometry name -> mesh built for it.
    mesh_cache: HashMap<String, json::Index<json::Mesh>>,
    stats: TranslationStats,
}

impl<'s, S: SceneSource> Translation<'s, S> {
    fn new(source: &'s S, config: &ConverterConfig) -> Self {
        Self {
            source,
            document: Document::new(&config.generator, config.copyright.as_deref()),
            materials: MaterialTable::new(config.deduplicate_materials),
            mesh_cache: HashMap::new(),
            stats: TranslationStats::default(),
        }
    }

    fn translate_world(&mut self, world: &World) -> Result<()> {
        let mut roots = Vec::new();

        if let Some(terrain) = &world.terrain {
            roots.push(self.terrain_node(terrain)?);
        }

        for instance in &world.instances {
            if let Some(node) = self.instance_node(world, instance)? {
                roots.push(node);
            }
        }

        self.document.push_scene(json::Scene {
            extensions: Default::default(),
            extras: Default::default(),
            name: Some(world.name.clone()),
            nodes: roots,
        });
        if self.document.root.scene.is_none() {
            self.document.root.scene = Some(json::Index::new(0));
        }

        self.stats.worlds += 1;
        Ok(())
    }

    fn terrain_node(&mut self, terrain: &Terrain) -> Result<json::Index<json::Node>> {
        let mesh = MeshBuilder::new(&mut self.document, &mut self.materials).build_terrain(terrain)?;
        self.stats.terrains += 1;

        Ok(self
            .document
            .push_node(node(&terrain.name, [0.0; 3], [0.0, 0.0, 0.0, 1.0], mesh)))
    }

    /// Returns `None` for instances whose geometry cannot be resolved.
    fn instance_node(
        &mut self,
        world: &World,
        instance: &Instance,
    ) -> Result<Option<json::Index<json::Node>>> {
        let Some(geometry_name) = instance.geometry_name() else {
            log::warn!(
                "Could not resolve 'GeometryName' property of instance '{}' in world '{}'",
                instance.name,
                world.name
            );
            self.stats.skipped_instances += 1;
            return Ok(None);
        };

        let Some(model) = self.source.find_model(geometry_name) else {
            log::warn!(
                "Could not find model '{}' for instance '{}'!",
                geometry_name,
                instance.name
            );
            self.stats.skipped_instances += 1;
            return Ok(None);
        };

        let mesh = match self.mesh_cache.get(geometry_name) {
            Some(&mesh) => {
                log::debug!("Reusing mesh '{}' for '{}'", geometry_name, instance.name);
                self.stats.cache_hits += 1;
                mesh
            }
            None => {
                log::info!("Converting mesh '{}'", model.name);
                let mesh =
                    MeshBuilder::new(&mut self.document, &mut self.materials).build_model(model)?;
                self.mesh_cache.insert(geometry_name.to_string(), mesh);
                self.stats.meshes_built += 1;
                mesh
            }
        };

        self.stats.instances += 1;
        Ok(Some(self.document.push_node(node(
            &instance.name,
            instance.position.to_array(),
            instance.rotation.to_array(),
            mesh,
        ))))
    }

    fn finish(self) -> Document {
        self.document
    }
}

fn node(
    name: &str,
    translation: [f32; 3],
    rotation: [f32; 4],
    mesh: json::Index<json::Mesh>,
) -> json::Node {
    json::Node {
        camera: None,
        children: None,
        extensions: Default::default(),
        extras: Default::default(),
        matrix: None,
        mesh: Some(mesh),
        name: Some(name.to_string()),
        rotation: Some(json::scene::UnitQuaternion(rotation)),
        scale: None,
        translation: Some(translation),
        skin: None,
        weights: None,
    }
}
