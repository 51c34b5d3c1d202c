//! Builds glTF meshes from models and terrain.

use super::material::{normalize_color, MaterialTable, TERRAIN_BASE_COLOR};
use super::packer::{pack_streams, VertexStreams};
use super::topology::draw_mode;
use crate::document::Document;
use crate::error::{ConvertError, Result};
use crate::types::{GeometryView, Model, Terrain};
use gltf_json as json;
use json::mesh::{Mode, Semantic};
use json::validation::Checked::Valid;
use std::collections::BTreeMap;

/// Appends meshes, materials and their buffers to a document.
pub struct MeshBuilder<'a> {
    document: &'a mut Document,
    materials: &'a mut MaterialTable,
}

impl<'a> MeshBuilder<'a> {
    pub fn new(document: &'a mut Document, materials: &'a mut MaterialTable) -> Self {
        Self {
            document,
            materials,
        }
    }

    /// Build one mesh with a primitive per model segment.
    pub fn build_model(&mut self, model: &Model) -> Result<json::Index<json::Mesh>> {
        let mut primitives = Vec::with_capacity(model.segments.len());

        for (i, segment) in model.segments.iter().enumerate() {
            let unit = format!("{}_{}", model.name, i);
            let material = self.materials.material(
                self.document,
                &unit,
                normalize_color(segment.material.diffuse_color),
            );
            let primitive = self.build_primitive(
                &unit,
                segment.geometry(),
                draw_mode(segment.topology),
                material,
            )?;
            primitives.push(primitive);
        }

        Ok(self.push_mesh(&model.name, primitives))
    }

    /// Build the terrain mesh: a single white triangle-list primitive.
    pub fn build_terrain(&mut self, terrain: &Terrain) -> Result<json::Index<json::Mesh>> {
        let material = self
            .materials
            .material(self.document, &terrain.name, TERRAIN_BASE_COLOR);
        let primitive =
            self.build_primitive(&terrain.name, terrain.geometry(), Mode::Triangles, material)?;

        Ok(self.push_mesh(&terrain.name, vec![primitive]))
    }

    fn build_primitive(
        &mut self,
        unit: &str,
        geometry: GeometryView<'_>,
        mode: Mode,
        material: json::Index<json::Material>,
    ) -> Result<json::mesh::Primitive> {
        let indices = narrow_indices(unit, geometry.indices)?;
        let streams = VertexStreams {
            positions: geometry.positions,
            normals: geometry.normals,
            uvs: geometry.uvs,
            indices: &indices,
        };
        let packed = pack_streams(self.document, unit, &streams)?;

        let mut attributes = BTreeMap::new();
        attributes.insert(Valid(Semantic::Positions), packed.positions);
        if let Some(normals) = packed.normals {
            attributes.insert(Valid(Semantic::Normals), normals);
        }
        if let Some(uvs) = packed.uvs {
            attributes.insert(Valid(Semantic::TexCoords(0)), uvs);
        }

        Ok(json::mesh::Primitive {
            attributes,
            extensions: Default::default(),
            extras: Default::default(),
            indices: packed.indices,
            material: Some(material),
            mode: Valid(mode),
            targets: None,
        })
    }

    fn push_mesh(
        &mut self,
        name: &str,
        primitives: Vec<json::mesh::Primitive>,
    ) -> json::Index<json::Mesh> {
        self.document.push_mesh(json::Mesh {
            extensions: Default::default(),
            extras: Default::default(),
            name: Some(name.to_string()),
            primitives,
            weights: None,
        })
    }
}

/// Narrow source indices to the 16-bit accessor type.
fn narrow_indices(unit: &str, indices: &[u32]) -> Result<Vec<u16>> {
    indices
        .iter()
        .map(|&value| {
            u16::try_from(value).map_err(|_| ConvertError::IndexOutOfRange {
                unit: unit.to_string(),
                value,
            })
        })
        .collect()
}
