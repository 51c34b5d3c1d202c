//! Source scene graph types, as produced by the level reader.
//!
//! These types are read-only inputs. The converter only ever borrows them
//! through a [`SceneSource`] for the duration of one run.

mod topology;

pub use topology::Topology;

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Property key an [`Instance`] uses to name its backing geometry.
pub const GEOMETRY_NAME_PROPERTY: &str = "GeometryName";

/// An 8-bit-per-channel RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "[u8; 4]", into = "[u8; 4]")]
pub struct Color {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
    pub alpha: u8,
}

impl Color {
    pub const WHITE: Color = Color::new(255, 255, 255, 255);

    pub const fn new(red: u8, green: u8, blue: u8, alpha: u8) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

impl From<[u8; 4]> for Color {
    fn from([red, green, blue, alpha]: [u8; 4]) -> Self {
        Self::new(red, green, blue, alpha)
    }
}

impl From<Color> for [u8; 4] {
    fn from(c: Color) -> Self {
        [c.red, c.green, c.blue, c.alpha]
    }
}

/// A segment material. Only the diffuse color is carried over.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Material {
    #[serde(default)]
    pub diffuse_color: Color,
}

/// Borrowed attribute arrays of one geometry unit (a terrain or a segment).
#[derive(Debug, Clone, Copy)]
pub struct GeometryView<'a> {
    pub positions: &'a [[f32; 3]],
    pub normals: &'a [[f32; 3]],
    pub uvs: &'a [[f32; 2]],
    pub indices: &'a [u32],
}

/// One material-homogeneous, topology-homogeneous chunk of a [`Model`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Segment {
    pub positions: Vec<[f32; 3]>,
    #[serde(default)]
    pub normals: Vec<[f32; 3]>,
    #[serde(default)]
    pub uvs: Vec<[f32; 2]>,
    #[serde(default)]
    pub indices: Vec<u32>,
    #[serde(default)]
    pub material: Material,
    #[serde(default)]
    pub topology: Topology,
}

impl Segment {
    pub fn geometry(&self) -> GeometryView<'_> {
        GeometryView {
            positions: &self.positions,
            normals: &self.normals,
            uvs: &self.uvs,
            indices: &self.indices,
        }
    }
}

/// A named model made of ordered segments.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Model {
    pub name: String,
    #[serde(default)]
    pub segments: Vec<Segment>,
}

/// World terrain. Its index buffer is always a triangle list.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Terrain {
    pub name: String,
    pub positions: Vec<[f32; 3]>,
    #[serde(default)]
    pub normals: Vec<[f32; 3]>,
    #[serde(default)]
    pub uvs: Vec<[f32; 2]>,
    #[serde(default)]
    pub indices: Vec<u32>,
}

impl Terrain {
    pub fn geometry(&self) -> GeometryView<'_> {
        GeometryView {
            positions: &self.positions,
            normals: &self.normals,
            uvs: &self.uvs,
            indices: &self.indices,
        }
    }
}

fn identity_rotation() -> Quat {
    Quat::IDENTITY
}

/// A placed object in a world.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Instance {
    pub name: String,
    #[serde(default)]
    pub position: Vec3,
    /// Rotation quaternion, serialized as `[x, y, z, w]`.
    #[serde(default = "identity_rotation")]
    pub rotation: Quat,
    /// Instance properties, e.g. {"GeometryName": "rock01"}
    #[serde(default)]
    pub properties: HashMap<String, String>,
}

impl Instance {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            properties: HashMap::new(),
        }
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    pub fn with_transform(mut self, position: Vec3, rotation: Quat) -> Self {
        self.position = position;
        self.rotation = rotation;
        self
    }

    /// Look up a property by name.
    pub fn property(&self, name: &str) -> Option<&str> {
        self.properties.get(name).map(String::as_str)
    }

    /// The name of the geometry this instance places, if it has one.
    pub fn geometry_name(&self) -> Option<&str> {
        self.property(GEOMETRY_NAME_PROPERTY)
    }
}

/// A world (layer) of a level.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct World {
    pub name: String,
    #[serde(default)]
    pub terrain: Option<Terrain>,
    #[serde(default)]
    pub instances: Vec<Instance>,
}

/// Read access to a loaded scene graph.
///
/// Implement this over whatever reader holds the level data. The converter
/// never copies the graph; it borrows it for one run.
pub trait SceneSource {
    /// All worlds, in declaration order.
    fn worlds(&self) -> &[World];

    /// Resolve a geometry name to its model.
    fn find_model(&self, geometry_name: &str) -> Option<&Model>;
}
