//! Error types for level conversion.

use thiserror::Error;

/// Result type alias using ConvertError.
pub type Result<T> = std::result::Result<T, ConvertError>;

/// Fatal errors that abort a conversion run.
///
/// Recoverable conditions (an instance without a resolvable geometry, an
/// unknown topology code) are logged and never surface as an error.
#[derive(Error, Debug)]
pub enum ConvertError {
    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to parse or serialize JSON data.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The loaded level container holds no world data.
    #[error("No worlds found in the loaded level")]
    NoWorlds,

    /// A world selection was given but none of its names matched.
    #[error("None of the selected worlds exist: {0:?}")]
    NoWorldsSelected(Vec<String>),

    /// A geometry unit has no vertex positions.
    #[error("Geometry '{unit}' has no vertex positions")]
    MissingPositions { unit: String },

    /// An index does not fit the 16-bit index accessor.
    #[error("Geometry '{unit}' has index {value}, which exceeds the 16-bit index range")]
    IndexOutOfRange { unit: String, value: u32 },

    /// A level file could not be loaded.
    #[error("Load error: {0}")]
    Load(String),

    /// Failed to export the document.
    #[error("Export error: {0}")]
    Export(String),
}
