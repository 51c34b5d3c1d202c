//! Document writers.
//!
//! Both writers take a finished [`Document`](crate::Document) and never
//! modify it.

pub mod glb;
pub mod gltf;

pub use glb::export_glb;
pub use gltf::{export_gltf, gltf_json_string};

/// Output container format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Binary glTF (`.glb`).
    #[default]
    Binary,
    /// JSON glTF (`.gltf`) with external `.bin` buffers.
    Text,
}

impl OutputFormat {
    /// File extension for this format, without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Binary => "glb",
            OutputFormat::Text => "gltf",
        }
    }
}
