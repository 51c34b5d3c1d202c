//! The output document: a glTF JSON root plus the bytes of its buffers.

use gltf_json as json;
use json::validation::Checked::Valid;

/// Default `asset.generator` string.
pub const GENERATOR: &str = "lvl2gltf converter";

/// glTF version written to `asset.version` and `asset.minVersion`.
pub const GLTF_VERSION: &str = "2.0";

/// A fully populated glTF document.
///
/// `buffers[i]` holds the bytes of `root.buffers[i]`. Entities are only ever
/// appended; indices handed out stay valid for the life of the document.
#[derive(Debug, Clone)]
pub struct Document {
    pub root: json::Root,
    pub buffers: Vec<Vec<u8>>,
}

impl Document {
    /// Create an empty document with the given asset metadata.
    pub fn new(generator: &str, copyright: Option<&str>) -> Self {
        let root = json::Root {
            asset: json::Asset {
                copyright: copyright.map(str::to_string),
                extensions: Default::default(),
                extras: Default::default(),
                generator: Some(generator.to_string()),
                min_version: Some(GLTF_VERSION.to_string()),
                version: GLTF_VERSION.to_string(),
            },
            ..Default::default()
        };

        Self {
            root,
            buffers: Vec::new(),
        }
    }

    pub fn push_scene(&mut self, scene: json::Scene) -> json::Index<json::Scene> {
        push(&mut self.root.scenes, scene)
    }

    pub fn push_node(&mut self, node: json::Node) -> json::Index<json::Node> {
        push(&mut self.root.nodes, node)
    }

    pub fn push_mesh(&mut self, mesh: json::Mesh) -> json::Index<json::Mesh> {
        push(&mut self.root.meshes, mesh)
    }

    pub fn push_material(&mut self, material: json::Material) -> json::Index<json::Material> {
        push(&mut self.root.materials, material)
    }

    pub fn push_view(&mut self, view: json::buffer::View) -> json::Index<json::buffer::View> {
        push(&mut self.root.buffer_views, view)
    }

    pub fn push_accessor(&mut self, accessor: json::Accessor) -> json::Index<json::Accessor> {
        push(&mut self.root.accessors, accessor)
    }

    /// Append a buffer of `byte_length` bytes. The returned storage starts
    /// empty with that capacity reserved; the caller fills it.
    pub fn push_buffer(&mut self, name: &str, byte_length: usize) -> json::Index<json::Buffer> {
        self.buffers.push(Vec::with_capacity(byte_length));
        push(
            &mut self.root.buffers,
            json::Buffer {
                byte_length: json::validation::USize64(byte_length as u64),
                name: Some(name.to_string()),
                uri: None,
                extensions: Default::default(),
                extras: Default::default(),
            },
        )
    }

    /// Mutable bytes of a buffer.
    pub fn buffer_data_mut(&mut self, index: json::Index<json::Buffer>) -> &mut Vec<u8> {
        &mut self.buffers[index.value()]
    }

    /// Total size of all buffer data.
    pub fn total_buffer_bytes(&self) -> usize {
        self.buffers.iter().map(Vec::len).sum()
    }

    /// The byte range an accessor reads, or `None` if it points outside its
    /// buffer or uses a type this converter does not write.
    pub fn accessor_bytes(&self, index: json::Index<json::Accessor>) -> Option<&[u8]> {
        let accessor = self.root.accessors.get(index.value())?;
        let view = self.root.buffer_views.get(accessor.buffer_view?.value())?;
        let data = self.buffers.get(view.buffer.value())?;

        let (component_type, type_) = match (&accessor.component_type, &accessor.type_) {
            (Valid(component_type), Valid(type_)) => (component_type.0, *type_),
            _ => return None,
        };
        let element_size = element_size(component_type, type_)?;

        let start = view.byte_offset.map_or(0, |o| o.0 as usize)
            + accessor.byte_offset.map_or(0, |o| o.0 as usize);
        let end = start + accessor.count.0 as usize * element_size;
        data.get(start..end)
    }
}

/// Size in bytes of one tightly packed accessor element.
pub fn element_size(
    component_type: json::accessor::ComponentType,
    type_: json::accessor::Type,
) -> Option<usize> {
    use json::accessor::{ComponentType, Type};

    let component = match component_type {
        ComponentType::I8 | ComponentType::U8 => 1,
        ComponentType::I16 | ComponentType::U16 => 2,
        ComponentType::U32 | ComponentType::F32 => 4,
    };
    let components = match type_ {
        Type::Scalar => 1,
        Type::Vec2 => 2,
        Type::Vec3 => 3,
        Type::Vec4 => 4,
        // Matrix columns carry alignment padding; never written here.
        Type::Mat2 | Type::Mat3 | Type::Mat4 => return None,
    };
    Some(component * components)
}

fn push<T>(items: &mut Vec<T>, item: T) -> json::Index<T> {
    let index = json::Index::new(items.len() as u32);
    items.push(item);
    index
}

#[cfg(test)]
mod tests {
    use super::*;
    use json::accessor::{ComponentType, Type};

    #[test]
    fn test_new_document_asset() {
        let doc = Document::new(GENERATOR, Some("example"));
        assert_eq!(doc.root.asset.version, "2.0");
        assert_eq!(doc.root.asset.min_version.as_deref(), Some("2.0"));
        assert_eq!(doc.root.asset.generator.as_deref(), Some(GENERATOR));
        assert_eq!(doc.root.asset.copyright.as_deref(), Some("example"));
        assert!(doc.root.scenes.is_empty());
        assert_eq!(doc.total_buffer_bytes(), 0);
    }

    #[test]
    fn test_push_buffer_indices() {
        let mut doc = Document::new(GENERATOR, None);
        let a = doc.push_buffer("a", 12);
        let b = doc.push_buffer("b", 4);
        assert_eq!(a.value(), 0);
        assert_eq!(b.value(), 1);
        assert_eq!(doc.root.buffers[1].byte_length.0, 4);
        assert!(doc.buffers[1].is_empty());
    }

    #[test]
    fn test_element_sizes() {
        assert_eq!(element_size(ComponentType::F32, Type::Vec3), Some(12));
        assert_eq!(element_size(ComponentType::F32, Type::Vec2), Some(8));
        assert_eq!(element_size(ComponentType::U16, Type::Scalar), Some(2));
        assert_eq!(element_size(ComponentType::F32, Type::Mat4), None);
    }
}
