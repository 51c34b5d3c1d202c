//! Material conversion: normalized diffuse colors and the material table.

use crate::document::Document;
use crate::types::Color;
use gltf_json as json;
use json::validation::Checked::Valid;
use std::collections::HashMap;

/// Base color used for terrain, which carries no diffuse color.
pub const TERRAIN_BASE_COLOR: [f64; 4] = [1.0, 1.0, 1.0, 1.0];

/// Convert an 8-bit RGBA color to normalized factors in `[0, 1]`.
///
/// Channel order is kept; no gamma correction is applied.
pub fn normalize_color(color: Color) -> [f64; 4] {
    [
        color.red as f64 / 255.0,
        color.green as f64 / 255.0,
        color.blue as f64 / 255.0,
        color.alpha as f64 / 255.0,
    ]
}

/// Build a flat-colored, non-metallic material.
pub fn flat_material(name: &str, base_color: [f64; 4]) -> json::Material {
    json::Material {
        pbr_metallic_roughness: json::material::PbrMetallicRoughness {
            base_color_texture: None,
            base_color_factor: json::material::PbrBaseColorFactor(base_color.map(|c| c as f32)),
            metallic_factor: json::material::StrengthFactor(0.0),
            roughness_factor: json::material::StrengthFactor(1.0),
            metallic_roughness_texture: None,
            extensions: Default::default(),
            extras: Default::default(),
        },
        alpha_mode: Valid(json::material::AlphaMode::Opaque),
        alpha_cutoff: None,
        double_sided: false,
        name: Some(name.to_string()),
        normal_texture: None,
        occlusion_texture: None,
        emissive_texture: None,
        emissive_factor: json::material::EmissiveFactor([0.0, 0.0, 0.0]),
        extensions: Default::default(),
        extras: Default::default(),
    }
}

/// Hands out material indices for a run.
///
/// By default every request appends a new material. With deduplication on,
/// requests for the same normalized color share one material.
#[derive(Debug, Default)]
pub struct MaterialTable {
    deduplicate: bool,
    by_color: HashMap<[u64; 4], json::Index<json::Material>>,
}

impl MaterialTable {
    pub fn new(deduplicate: bool) -> Self {
        Self {
            deduplicate,
            by_color: HashMap::new(),
        }
    }

    /// Get a material for `base_color`, creating it if needed.
    pub fn material(
        &mut self,
        document: &mut Document,
        name: &str,
        base_color: [f64; 4],
    ) -> json::Index<json::Material> {
        if !self.deduplicate {
            return document.push_material(flat_material(name, base_color));
        }

        let key = base_color.map(f64::to_bits);
        *self
            .by_color
            .entry(key)
            .or_insert_with(|| document.push_material(flat_material(name, base_color)))
    }

    /// Number of distinct colors cached (always 0 without deduplication).
    pub fn cached(&self) -> usize {
        self.by_color.len()
    }
}
