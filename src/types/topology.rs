//! Primitive topology tags as reported by the level reader.

use serde::{Deserialize, Serialize};

/// How a segment's index stream is assembled into primitives.
///
/// The numeric codes follow the reader's enumeration. Codes the reader does
/// not define are kept as [`Topology::Unknown`] so the converter can report
/// them instead of failing to load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "u32", into = "u32")]
pub enum Topology {
    PointList,
    LineList,
    LineStrip,
    #[default]
    TriangleList,
    TriangleStrip,
    TriangleFan,
    Unknown(u32),
}

impl Topology {
    /// The reader's numeric code for this topology.
    pub fn code(&self) -> u32 {
        match self {
            Topology::PointList => 1,
            Topology::LineList => 2,
            Topology::LineStrip => 3,
            Topology::TriangleList => 4,
            Topology::TriangleStrip => 5,
            Topology::TriangleFan => 6,
            Topology::Unknown(code) => *code,
        }
    }
}

impl From<u32> for Topology {
    fn from(code: u32) -> Self {
        match code {
            1 => Topology::PointList,
            2 => Topology::LineList,
            3 => Topology::LineStrip,
            4 => Topology::TriangleList,
            5 => Topology::TriangleStrip,
            6 => Topology::TriangleFan,
            other => Topology::Unknown(other),
        }
    }
}

impl From<Topology> for u32 {
    fn from(topology: Topology) -> Self {
        topology.code()
    }
}
