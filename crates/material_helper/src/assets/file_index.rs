//! File-backed asset index
//!
//! Treats a directory as the project asset tree. Images are discovered once
//! by scanning the tree for files the `image` crate recognises; material
//! records are RON files checked on disk at query time; shaders come from the
//! converter configuration since there is no shader store on disk.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};

use image::ImageFormat;

use super::asset_index::AssetIndex;
use super::materials::{MaterialRecord, ShaderRef};
use super::AssetError;
use crate::core::config::ConverterConfig;
use crate::foundation::files;

/// Asset index over a directory on disk
#[derive(Debug, Clone)]
pub struct FileAssetIndex {
    root: PathBuf,
    images: Vec<String>,
    shaders: BTreeSet<String>,
    dirty: BTreeMap<String, MaterialRecord>,
}

impl FileAssetIndex {
    /// Scan `root` for image assets
    pub fn scan(root: impl AsRef<Path>, config: &ConverterConfig) -> Result<Self, AssetError> {
        let root = root.as_ref().to_path_buf();
        if !root.is_dir() {
            return Err(AssetError::NotFound(root.display().to_string()));
        }

        let mut index = Self {
            root,
            images: Vec::new(),
            shaders: config.shaders.iter().cloned().collect(),
            dirty: BTreeMap::new(),
        };
        index.shaders.insert(config.default_shader.clone());
        index.refresh()?;
        Ok(index)
    }

    /// Rescan the tree for image assets
    pub fn refresh(&mut self) -> Result<(), AssetError> {
        let mut found = Vec::new();
        files::walk_files(&self.root, &mut found)?;

        self.images = found
            .iter()
            .filter(|path| ImageFormat::from_path(path).is_ok())
            .filter_map(|path| path.strip_prefix(&self.root).ok())
            .map(files::to_asset_path)
            .collect();
        self.images.sort();

        log::debug!("Indexed {} image(s) under {:?}", self.images.len(), self.root);
        Ok(())
    }

    /// Root of the asset tree
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Number of indexed images
    pub fn image_count(&self) -> usize {
        self.images.len()
    }

    /// Filesystem location of an asset path
    pub fn full_path(&self, asset_path: &str) -> PathBuf {
        asset_path
            .split('/')
            .filter(|part| !part.is_empty())
            .fold(self.root.clone(), |path, part| path.join(part))
    }

    fn write_record(&self, record: &MaterialRecord) -> Result<(), AssetError> {
        let path = self.full_path(&record.path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, record.to_ron()?)?;
        log::debug!("Wrote material record {:?}", path);
        Ok(())
    }
}

impl AssetIndex for FileAssetIndex {
    fn record_exists(&self, path: &str) -> bool {
        self.dirty.contains_key(path) || self.full_path(path).is_file()
    }

    fn load_record(&self, path: &str) -> Result<MaterialRecord, AssetError> {
        if let Some(record) = self.dirty.get(path) {
            return Ok(record.clone());
        }

        let full_path = self.full_path(path);
        if !full_path.is_file() {
            return Err(AssetError::NotFound(path.to_string()));
        }
        let contents = fs::read_to_string(&full_path)?;
        MaterialRecord::from_ron(path, &contents)
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
        if self.record_exists(&record.path) {
            return Err(AssetError::StorageError(format!("Record already exists: {}", record.path)));
        }
        self.write_record(record)
    }

    fn mark_dirty(&mut self, record: &MaterialRecord) -> Result<(), AssetError> {
        self.dirty.insert(record.path.clone(), record.clone());
        Ok(())
    }

    fn ensure_directory(&mut self, dir: &str) -> Result<bool, AssetError> {
        let path = self.full_path(dir);
        if path.is_dir() {
            return Ok(false);
        }
        fs::create_dir_all(&path)?;
        Ok(true)
    }

    fn flush(&mut self) -> Result<usize, AssetError> {
        let dirty = std::mem::take(&mut self.dirty);
        for record in dirty.values() {
            self.write_record(record)?;
        }
        Ok(dirty.len())
    }
}
