//! In-memory asset index
//!
//! Holds records, images and shaders in ordered maps. Used by tests and by
//! hosts that already keep their asset catalogue in memory.

use std::collections::{BTreeMap, BTreeSet};

use super::asset_index::AssetIndex;
use super::materials::{MaterialRecord, ShaderRef};
use super::AssetError;
use crate::foundation::files;

/// Asset index backed by plain collections
#[derive(Debug, Clone, Default)]
pub struct InMemoryAssetIndex {
    records: BTreeMap<String, MaterialRecord>,
    images: BTreeSet<String>,
    shaders: BTreeSet<String>,
    directories: BTreeSet<String>,
    dirty: BTreeSet<String>,
    saved: usize,
}

impl InMemoryAssetIndex {
    /// Create an empty index
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a shader (builder style)
    pub fn with_shader(mut self, name: impl Into<String>) -> Self {
        self.shaders.insert(name.into());
        self
    }

    /// Register a shader
    pub fn add_shader(&mut self, name: impl Into<String>) {
        self.shaders.insert(name.into());
    }

    /// Register an image asset
    pub fn add_image(&mut self, path: impl AsRef<str>) {
        self.images.insert(files::normalize_separators(path.as_ref()));
    }

    /// Store a record directly, bypassing creation bookkeeping
    pub fn insert_record(&mut self, record: MaterialRecord) {
        self.records.insert(record.path.clone(), record);
    }

    /// Record currently stored at `path`
    pub fn record(&self, path: &str) -> Option<&MaterialRecord> {
        self.records.get(path)
    }

    /// Number of stored records
    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    /// Directories created through [`AssetIndex::ensure_directory`]
    pub fn directories(&self) -> &BTreeSet<String> {
        &self.directories
    }

    /// Records marked dirty and not yet flushed
    pub fn dirty_count(&self) -> usize {
        self.dirty.len()
    }

    /// Records written by all flushes so far
    pub fn saved_count(&self) -> usize {
        self.saved
    }
}

impl AssetIndex for InMemoryAssetIndex {
    fn record_exists(&self, path: &str) -> bool {
        self.records.contains_key(path)
    }

    fn load_record(&self, path: &str) -> Result<MaterialRecord, AssetError> {
        self.records
            .get(path)
            .cloned()
            .ok_or_else(|| AssetError::NotFound(path.to_string()))
    }

    fn find_images(&self, name: &str) -> Vec<String> {
        self.images
            .iter()
            .filter(|image| files::bare_file_name(image).eq_ignore_ascii_case(name))
            .cloned()
            .collect()
    }

    fn find_shader(&self, name: &str) -> Option<ShaderRef> {
        self.shaders.get(name).map(|shader| ShaderRef::new(shader.clone()))
    }

    fn create_record(&mut self, record: &MaterialRecord) -> Result<(), AssetError> {
        if self.records.contains_key(&record.path) {
            return Err(AssetError::StorageError(format!("Record already exists: {}", record.path)));
        }
        self.records.insert(record.path.clone(), record.clone());
        Ok(())
    }

    fn mark_dirty(&mut self, record: &MaterialRecord) -> Result<(), AssetError> {
        if !self.records.contains_key(&record.path) {
            return Err(AssetError::NotFound(record.path.clone()));
        }
        self.records.insert(record.path.clone(), record.clone());
        self.dirty.insert(record.path.clone());
        Ok(())
    }

    fn ensure_directory(&mut self, dir: &str) -> Result<bool, AssetError> {
        Ok(self.directories.insert(files::normalize_separators(dir)))
    }

    fn flush(&mut self) -> Result<usize, AssetError> {
        let count = self.dirty.len();
        self.dirty.clear();
        self.saved += count;
        Ok(count)
    }
}
