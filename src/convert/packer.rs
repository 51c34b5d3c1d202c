//! Packs vertex attribute and index arrays into glTF buffers.
//!
//! Each geometry unit gets its own buffer. Regions are written back to back
//! in a fixed order (positions, normals, UVs, indices), each tightly packed at
//! its natural stride, with one buffer view and one accessor per region.

use crate::document::Document;
use crate::error::{ConvertError, Result};
use glam::Vec3;
use gltf_json as json;
use json::accessor::{ComponentType, Type};
use json::validation::Checked::Valid;
use json::validation::USize64;

/// Attribute and index arrays of one geometry unit, ready for packing.
#[derive(Debug, Clone, Copy)]
pub struct VertexStreams<'a> {
    pub positions: &'a [[f32; 3]],
    pub normals: &'a [[f32; 3]],
    pub uvs: &'a [[f32; 2]],
    pub indices: &'a [u16],
}

/// Accessors produced for one packed geometry unit.
///
/// Optional streams that were empty have no accessor.
#[derive(Debug, Clone, Copy)]
pub struct PackedAccessors {
    pub buffer: json::Index<json::Buffer>,
    pub positions: json::Index<json::Accessor>,
    pub normals: Option<json::Index<json::Accessor>>,
    pub uvs: Option<json::Index<json::Accessor>>,
    pub indices: Option<json::Index<json::Accessor>>,
}

/// An element type that can be written into a buffer region.
trait PackElement: Copy {
    const COMPONENT_TYPE: ComponentType;
    const TYPE: Type;
    /// Bytes per element; also the region's stride.
    const SIZE: usize;

    fn write(&self, out: &mut Vec<u8>);
}

impl PackElement for [f32; 3] {
    const COMPONENT_TYPE: ComponentType = ComponentType::F32;
    const TYPE: Type = Type::Vec3;
    const SIZE: usize = 12;

    fn write(&self, out: &mut Vec<u8>) {
        for c in self {
            out.extend_from_slice(&c.to_le_bytes());
        }
    }
}

impl PackElement for [f32; 2] {
    const COMPONENT_TYPE: ComponentType = ComponentType::F32;
    const TYPE: Type = Type::Vec2;
    const SIZE: usize = 8;

    fn write(&self, out: &mut Vec<u8>) {
        for c in self {
            out.extend_from_slice(&c.to_le_bytes());
        }
    }
}

impl PackElement for u16 {
    const COMPONENT_TYPE: ComponentType = ComponentType::U16;
    const TYPE: Type = Type::Scalar;
    const SIZE: usize = 2;

    fn write(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.to_le_bytes());
    }
}

/// Byte size of the buffer a set of streams packs into.
pub fn packed_size(streams: &VertexStreams<'_>) -> usize {
    streams.positions.len() * <[f32; 3]>::SIZE
        + streams.normals.len() * <[f32; 3]>::SIZE
        + streams.uvs.len() * <[f32; 2]>::SIZE
        + streams.indices.len() * u16::SIZE
}

/// Pack one geometry unit into a new buffer of `document`.
///
/// Fails if there are no positions. Empty normals, UVs or indices are
/// skipped rather than written as zero-length regions.
pub fn pack_streams(
    document: &mut Document,
    unit: &str,
    streams: &VertexStreams<'_>,
) -> Result<PackedAccessors> {
    if streams.positions.is_empty() {
        return Err(ConvertError::MissingPositions {
            unit: unit.to_string(),
        });
    }

    let total = packed_size(streams);
    let buffer = document.push_buffer(unit, total);
    let mut region = RegionWriter {
        document,
        buffer,
        offset: 0,
    };

    let (min, max) = position_bounds(streams.positions);
    let positions = region.write(streams.positions, Some((min, max)));
    let normals = (!streams.normals.is_empty()).then(|| region.write(streams.normals, None));
    let uvs = (!streams.uvs.is_empty()).then(|| region.write(streams.uvs, None));
    let indices = (!streams.indices.is_empty()).then(|| region.write(streams.indices, None));

    debug_assert_eq!(region.offset, total);

    Ok(PackedAccessors {
        buffer,
        positions,
        normals,
        uvs,
        indices,
    })
}

/// Appends regions to one buffer, tracking the running byte offset.
struct RegionWriter<'a> {
    document: &'a mut Document,
    buffer: json::Index<json::Buffer>,
    offset: usize,
}

impl RegionWriter<'_> {
    fn write<T: PackElement>(
        &mut self,
        elements: &[T],
        bounds: Option<([f32; 3], [f32; 3])>,
    ) -> json::Index<json::Accessor> {
        let byte_length = elements.len() * T::SIZE;

        let data = self.document.buffer_data_mut(self.buffer);
        for element in elements {
            element.write(data);
        }

        // Index views must not declare a stride.
        let is_index = matches!(T::TYPE, Type::Scalar);
        let view = self.document.push_view(json::buffer::View {
            buffer: self.buffer,
            byte_length: USize64(byte_length as u64),
            byte_offset: Some(USize64(self.offset as u64)),
            byte_stride: (!is_index).then_some(json::buffer::Stride(T::SIZE)),
            name: None,
            target: Some(Valid(if is_index {
                json::buffer::Target::ElementArrayBuffer
            } else {
                json::buffer::Target::ArrayBuffer
            })),
            extensions: Default::default(),
            extras: Default::default(),
        });
        self.offset += byte_length;

        self.document.push_accessor(json::Accessor {
            buffer_view: Some(view),
            byte_offset: Some(USize64(0)),
            count: USize64(elements.len() as u64),
            component_type: Valid(json::accessor::GenericComponentType(T::COMPONENT_TYPE)),
            extensions: Default::default(),
            extras: Default::default(),
            type_: Valid(T::TYPE),
            min: bounds.map(|(min, _)| json::Value::from(min.to_vec())),
            max: bounds.map(|(_, max)| json::Value::from(max.to_vec())),
            name: None,
            normalized: false,
            sparse: None,
        })
    }
}

/// Component-wise bounds of a non-empty position array.
fn position_bounds(positions: &[[f32; 3]]) -> ([f32; 3], [f32; 3]) {
    let (min, max) = positions.iter().map(|&p| Vec3::from(p)).fold(
        (Vec3::splat(f32::MAX), Vec3::splat(f32::MIN)),
        |(min, max), p| (min.min(p), max.max(p)),
    );
    (min.to_array(), max.to_array())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{element_size, GENERATOR};

    fn read_vec3s(bytes: &[u8]) -> Vec<[f32; 3]> {
        bytes
            .chunks_exact(12)
            .map(|c| {
                let f = |i: usize| f32::from_le_bytes([c[i], c[i + 1], c[i + 2], c[i + 3]]);
                [f(0), f(4), f(8)]
            })
            .collect()
    }

    fn triangle_streams<'a>(
        positions: &'a [[f32; 3]],
        normals: &'a [[f32; 3]],
        uvs: &'a [[f32; 2]],
        indices: &'a [u16],
    ) -> VertexStreams<'a> {
        VertexStreams {
            positions,
            normals,
            uvs,
            indices,
        }
    }

    #[test]
    fn test_positions_read_back() {
        let mut doc = Document::new(GENERATOR, None);
        let positions = [[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]];
        let streams = triangle_streams(&positions, &[], &[], &[]);

        let packed = pack_streams(&mut doc, "unit", &streams).unwrap();

        let bytes = doc.accessor_bytes(packed.positions).unwrap();
        assert_eq!(read_vec3s(bytes), positions.to_vec());
        assert!(packed.normals.is_none());
        assert!(packed.uvs.is_none());
        assert!(packed.indices.is_none());
    }

    #[test]
    fn test_regions_are_sequential_and_sized() {
        let mut doc = Document::new(GENERATOR, None);
        let positions = [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]];
        let normals = [[0.0, 0.0, 1.0]; 3];
        let uvs = [[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]];
        let indices = [0u16, 1, 2];
        let streams = triangle_streams(&positions, &normals, &uvs, &indices);

        let packed = pack_streams(&mut doc, "tri", &streams).unwrap();

        assert_eq!(doc.root.buffers.len(), 1);
        assert_eq!(doc.root.buffer_views.len(), 4);
        assert_eq!(doc.root.accessors.len(), 4);

        let total = doc.root.buffers[0].byte_length.0 as usize;
        assert_eq!(total, 36 + 36 + 24 + 6);
        assert_eq!(doc.buffers[0].len(), total);

        // Views tile the buffer in order with no gaps or overlap
        let mut expected_offset = 0;
        for view in &doc.root.buffer_views {
            assert_eq!(view.buffer.value(), packed.buffer.value());
            assert_eq!(view.byte_offset.unwrap().0 as usize, expected_offset);
            expected_offset += view.byte_length.0 as usize;
        }
        assert_eq!(expected_offset, total);

        // count × element size == view length for every accessor
        for accessor in &doc.root.accessors {
            let view = &doc.root.buffer_views[accessor.buffer_view.unwrap().value()];
            let (Valid(component), Valid(type_)) = (&accessor.component_type, &accessor.type_) else {
                panic!("unchecked accessor type");
            };
            let size = element_size(component.0, *type_).unwrap();
            assert_eq!(accessor.count.0 as usize * size, view.byte_length.0 as usize);
        }
    }

    #[test]
    fn test_strides_and_targets() {
        let mut doc = Document::new(GENERATOR, None);
        let positions = [[0.0; 3]; 3];
        let uvs = [[0.0; 2]; 3];
        let indices = [0u16, 1, 2];
        let streams = triangle_streams(&positions, &[], &uvs, &indices);

        pack_streams(&mut doc, "unit", &streams).unwrap();

        let views = &doc.root.buffer_views;
        assert_eq!(views.len(), 3);
        assert_eq!(views[0].byte_stride.map(|s| s.0), Some(12));
        assert_eq!(views[1].byte_stride.map(|s| s.0), Some(8));
        assert_eq!(views[2].byte_stride.map(|s| s.0), None);
        assert_eq!(
            views[2].target,
            Some(Valid(json::buffer::Target::ElementArrayBuffer))
        );
    }

    #[test]
    fn test_index_bytes_little_endian() {
        let mut doc = Document::new(GENERATOR, None);
        let positions = [[0.0; 3]];
        let indices = [0x0102u16, 0];
        let streams = triangle_streams(&positions, &[], &[], &indices);

        let packed = pack_streams(&mut doc, "unit", &streams).unwrap();
        let bytes = doc.accessor_bytes(packed.indices.unwrap()).unwrap();
        assert_eq!(bytes, &[0x02, 0x01, 0x00, 0x00]);
    }

    #[test]
    fn test_position_bounds() {
        let mut doc = Document::new(GENERATOR, None);
        let positions = [[-1.0, 2.0, 0.5], [3.0, -4.0, 0.0]];
        let streams = triangle_streams(&positions, &[], &[], &[]);

        let packed = pack_streams(&mut doc, "unit", &streams).unwrap();
        let accessor = &doc.root.accessors[packed.positions.value()];
        assert_eq!(accessor.min, Some(json::Value::from(vec![-1.0f32, -4.0, 0.0])));
        assert_eq!(accessor.max, Some(json::Value::from(vec![3.0f32, 2.0, 0.5])));
    }

    #[test]
    fn test_missing_positions_is_fatal() {
        let mut doc = Document::new(GENERATOR, None);
        let streams = triangle_streams(&[], &[[0.0; 3]], &[], &[0]);

        let result = pack_streams(&mut doc, "broken", &streams);
        assert!(matches!(result, Err(ConvertError::MissingPositions { unit }) if unit == "broken"));
        assert!(doc.root.buffers.is_empty());
    }
}
