//! Asset index abstraction
//!
//! The resolver never touches the asset store directly. Everything it needs
//! (record lookup, image search, shader lookup, persistence) goes through this
//! trait so tests can run against [`InMemoryAssetIndex`](super::InMemoryAssetIndex)
//! and the CLI against [`FileAssetIndex`](super::FileAssetIndex).
//!
//! All paths are asset paths: relative to the index root, `/`-separated.

use super::AssetError;
use super::materials::{MaterialRecord, ShaderRef};

/// Store of material records, images and shaders
pub trait AssetIndex {
    /// Whether a material record exists at `path`
    fn record_exists(&self, path: &str) -> bool;

    /// Load the record stored at `path`
    fn load_record(&self, path: &str) -> Result<MaterialRecord, AssetError>;

    /// Image assets whose file name (without extension) equals `name`,
    /// compared case-insensitively, in a stable order
    fn find_images(&self, name: &str) -> Vec<String>;

    /// Look a shader up by name
    fn find_shader(&self, name: &str) -> Option<ShaderRef>;

    /// Persist a new record at `record.path`
    fn create_record(&mut self, record: &MaterialRecord) -> Result<(), AssetError>;

    /// Queue an updated existing record for saving
    fn mark_dirty(&mut self, record: &MaterialRecord) -> Result<(), AssetError>;

    /// Make sure a directory exists; returns `true` if it had to be created
    fn ensure_directory(&mut self, dir: &str) -> Result<bool, AssetError>;

    /// Write everything queued by [`mark_dirty`](Self::mark_dirty); returns the number of records saved
    fn flush(&mut self) -> Result<usize, AssetError> {
        Ok(0)
    }
}
