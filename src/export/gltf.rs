//! Text glTF export: a JSON file plus one external `.bin` file per buffer.

use crate::document::Document;
use crate::error::{ConvertError, Result};
use gltf_json as json;
use std::fs;
use std::path::{Path, PathBuf};

/// Serialize the document JSON with buffer URIs set to `uris`.
pub fn gltf_json_string(document: &Document, uris: &[String]) -> Result<String> {
    if document.root.scenes.is_empty() {
        return Err(ConvertError::Export("Cannot export a document without scenes".to_string()));
    }
    if uris.len() != document.root.buffers.len() {
        return Err(ConvertError::Export(format!(
            "Expected {} buffer URIs, got {}",
            document.root.buffers.len(),
            uris.len()
        )));
    }

    let mut root = document.root.clone();
    for (buffer, uri) in root.buffers.iter_mut().zip(uris) {
        buffer.uri = Some(uri.clone());
    }

    json::serialize::to_string_pretty(&root)
        .map_err(|e| ConvertError::Export(format!("Failed to serialize glTF JSON: {}", e)))
}

/// Write `path` as a `.gltf` file and each buffer as `<stem>_<index>.bin`
/// in the same directory. Returns the paths of the written `.bin` files.
pub fn export_gltf<P: AsRef<Path>>(document: &Document, path: P) -> Result<Vec<PathBuf>> {
    let path = path.as_ref();
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "scene".to_string());
    let dir = path.parent().unwrap_or_else(|| Path::new(""));

    let uris: Vec<String> = (0..document.buffers.len())
        .map(|i| format!("{}_{}.bin", stem, i))
        .collect();
    let json = gltf_json_string(document, &uris)?;

    let mut written = Vec::with_capacity(uris.len());
    for (uri, data) in uris.iter().zip(&document.buffers) {
        let bin_path = dir.join(uri);
        fs::write(&bin_path, data)?;
        written.push(bin_path);
    }
    fs::write(path, json)?;

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::Converter;
    use crate::source::Level;
    use crate::types::{Terrain, World};

    fn document() -> Document {
        let level = Level::new(
            "test",
            vec![World {
                name: "base".into(),
                terrain: Some(Terrain {
                    name: "ground".into(),
                    positions: vec![[0.0; 3], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]],
                    indices: vec![0, 1, 2],
                    ..Default::default()
                }),
                instances: Vec::new(),
            }],
            Vec::new(),
        );
        Converter::new().convert(&level).unwrap().document
    }

    #[test]
    fn test_export_gltf_writes_buffers() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("level.gltf");
        let doc = document();

        let written = export_gltf(&doc, &path).unwrap();

        assert_eq!(written, vec![dir.path().join("level_0.bin")]);
        assert_eq!(fs::read(&written[0]).unwrap(), doc.buffers[0]);

        let text = fs::read_to_string(&path).unwrap();
        let root: json::Root = serde_json::from_str(&text).unwrap();
        assert_eq!(root.buffers[0].uri.as_deref(), Some("level_0.bin"));
        assert_eq!(root.buffers[0].byte_length.0 as usize, doc.buffers[0].len());
        assert_eq!(root.nodes.len(), 1);
        assert_eq!(root.asset.version, "2.0");
    }

    #[test]
    fn test_uri_count_mismatch() {
        let doc = document();
        assert!(matches!(
            gltf_json_string(&doc, &[]),
            Err(ConvertError::Export(_))
        ));
    }

    #[test]
    fn test_export_without_scenes_fails() {
        let doc = Document::new("test", None);
        assert!(gltf_json_string(&doc, &[]).is_err());
    }
}
