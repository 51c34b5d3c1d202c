//! Maps source topology tags to glTF draw modes.

use crate::types::Topology;
use gltf_json::mesh::Mode;

/// The glTF draw mode for a source topology.
///
/// Unknown codes fall back to a triangle list with a warning; they never
/// abort the conversion.
pub fn draw_mode(topology: Topology) -> Mode {
    match topology {
        // The reader's line lists are closed outlines.
        Topology::LineList => Mode::LineLoop,
        Topology::LineStrip => Mode::LineStrip,
        Topology::PointList => Mode::Points,
        Topology::TriangleFan => Mode::TriangleFan,
        Topology::TriangleList => Mode::Triangles,
        Topology::TriangleStrip => Mode::TriangleStrip,
        Topology::Unknown(code) => {
            log::warn!("Unknown topology type: {}! Assuming triangle list!", code);
            Mode::Triangles
        }
    }
}
