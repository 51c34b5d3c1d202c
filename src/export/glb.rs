//! Binary glTF (GLB) export.

use crate::document::Document;
use crate::error::{ConvertError, Result};
use gltf_json as json;
use json::validation::USize64;

const GLB_MAGIC: &[u8; 4] = b"glTF";
const GLB_VERSION: u32 = 2;
const CHUNK_JSON: u32 = 0x4E4F534A;
const CHUNK_BIN: u32 = 0x004E4942;

/// Export a document to GLB.
///
/// A GLB file has a single binary chunk, so every buffer is copied into it
/// (each start aligned to 4 bytes) and the buffer views are rebased onto
/// buffer 0. The document itself is left untouched.
pub fn export_glb(document: &Document) -> Result<Vec<u8>> {
    if document.root.scenes.is_empty() {
        return Err(ConvertError::Export("Cannot export a document without scenes".to_string()));
    }

    let (root, bin) = merge_buffers(document);

    let json_string = json::serialize::to_string(&root)
        .map_err(|e| ConvertError::Export(format!("Failed to serialize glTF JSON: {}", e)))?;
    let json_bytes = json_string.as_bytes();

    let json_padding = padding(json_bytes.len());
    let padded_json_len = json_bytes.len() + json_padding;
    let bin_padding = padding(bin.len());
    let padded_bin_len = bin.len() + bin_padding;

    let total_size = 12
        + 8 + padded_json_len
        + if bin.is_empty() { 0 } else { 8 + padded_bin_len };

    let mut glb = Vec::with_capacity(total_size);

    // Header
    glb.extend_from_slice(GLB_MAGIC);
    glb.extend_from_slice(&GLB_VERSION.to_le_bytes());
    glb.extend_from_slice(&(total_size as u32).to_le_bytes());

    // JSON chunk, padded with spaces
    glb.extend_from_slice(&(padded_json_len as u32).to_le_bytes());
    glb.extend_from_slice(&CHUNK_JSON.to_le_bytes());
    glb.extend_from_slice(json_bytes);
    glb.extend(std::iter::repeat(0x20u8).take(json_padding));

    // BIN chunk, padded with zeros
    if !bin.is_empty() {
        glb.extend_from_slice(&(padded_bin_len as u32).to_le_bytes());
        glb.extend_from_slice(&CHUNK_BIN.to_le_bytes());
        glb.extend_from_slice(&bin);
        glb.extend(std::iter::repeat(0u8).take(bin_padding));
    }

    debug_assert_eq!(glb.len(), total_size);
    Ok(glb)
}

/// Concatenate all buffers into one and point every view at it.
fn merge_buffers(document: &Document) -> (json::Root, Vec<u8>) {
    let mut root = document.root.clone();
    let mut bin = Vec::with_capacity(document.total_buffer_bytes() + 3 * document.buffers.len());
    let mut bases = Vec::with_capacity(document.buffers.len());

    for data in &document.buffers {
        bin.extend(std::iter::repeat(0u8).take(padding(bin.len())));
        bases.push(bin.len());
        bin.extend_from_slice(data);
    }

    for view in &mut root.buffer_views {
        let base = bases[view.buffer.value()];
        let offset = view.byte_offset.map_or(0, |o| o.0 as usize);
        view.buffer = json::Index::new(0);
        view.byte_offset = Some(USize64((base + offset) as u64));
    }

    root.buffers = if bin.is_empty() {
        Vec::new()
    } else {
        vec![json::Buffer {
            byte_length: USize64(bin.len() as u64),
            name: None,
            uri: None,
            extensions: Default::default(),
            extras: Default::default(),
        }]
    };

    (root, bin)
}

/// Bytes needed to bring `len` to a multiple of 4.
fn padding(len: usize) -> usize {
    (4 - (len % 4)) % 4
}
