//! # lvl2gltf
//!
//! Converts a game level's scene graph (worlds, terrain, placed instances and
//! the models they reference) into a glTF 2.0 document.
//!
//! ## Overview
//!
//! A level reader exposes the loaded scene graph through the [`SceneSource`]
//! trait. The [`Converter`] walks the selected worlds and produces a
//! [`Document`]: one scene per world, one node per terrain and placed
//! instance, and one mesh per distinct geometry name, with vertex and index
//! data packed into tightly laid out binary buffers. The document can then be
//! written as `.glb` or `.gltf`.
//!
//! ## Quick Start
//!
//! ```ignore
//! use lvl2gltf::{export_glb, load_level, Converter};
//!
//! let level = load_level("path/to/level.json")?;
//! let output = Converter::new().convert(&level)?;
//! std::fs::write("level.glb", export_glb(&output.document)?)?;
//! ```
//!
//! ## Custom Readers
//!
//! To convert from another reader, implement [`SceneSource`] over its data:
//!
//! ```ignore
//! use lvl2gltf::{Model, SceneSource, World};
//!
//! impl SceneSource for MyReader {
//!     fn worlds(&self) -> &[World] { &self.worlds }
//!     fn find_model(&self, name: &str) -> Option<&Model> { self.models.get(name) }
//! }
//! ```

pub mod convert;
pub mod document;
pub mod error;
pub mod export;
pub mod source;
pub mod types;

// Re-export main types for convenience
pub use convert::{ConvertOutput, Converter, ConverterConfig, TranslationStats, WorldSelection};
pub use document::Document;
pub use error::{ConvertError, Result};
pub use export::{export_glb, export_gltf, OutputFormat};
pub use source::{Container, Level};
pub use types::{
    Color, Instance, Material, Model, SceneSource, Segment, Terrain, Topology, World,
};

/// Load a level from a JSON file.
pub fn load_level<P: AsRef<std::path::Path>>(path: P) -> Result<Level> {
    source::loader::load_from_path(path)
}
