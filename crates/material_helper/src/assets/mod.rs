//! Asset management system
//!
//! The converter talks to the project's assets only through [`AssetIndex`].

pub mod asset_index;
pub mod file_index;
pub mod memory_index;
pub mod materials;

pub use asset_index::AssetIndex;
pub use file_index::FileAssetIndex;
pub use memory_index::InMemoryAssetIndex;
pub use materials::{
    VmtParser, ParsedMaterial, TextureReference, TextureSlot,
    MaterialRecord, ShaderRef,
    MaterialResolver, Resolution, ResolutionEvent, ResolveStatus, ResolvedAsset,
};

#[cfg(test)]
mod test_conversion;

use std::path::PathBuf;
use thiserror::Error;

/// Asset loading errors
#[derive(Error, Debug)]
pub enum AssetError {
    /// Asset not found
    #[error("Asset not found: {0}")]
    NotFound(String),

    /// Source file could not be read or decoded
    #[error("Failed to read {path:?}: {source}")]
    ReadFailed {
        /// File that failed
        path: PathBuf,
        /// Underlying IO error
        source: std::io::Error,
    },

    /// Invalid asset data
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Storage system error
    #[error("Storage error: {0}")]
    StorageError(String),

    /// IO error during asset loading
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}
