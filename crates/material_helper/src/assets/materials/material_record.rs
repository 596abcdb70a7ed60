//! Material records produced by the converter
//!
//! A record is the engine-side material asset: a shader plus texture
//! bindings keyed by shader property. Records are persisted by the asset
//! index as RON.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::vmt_parser::TextureSlot;
use crate::assets::AssetError;

/// Shader handle returned by the asset index
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ShaderRef {
    /// Shader name as registered with the index
    pub name: String,
}

impl ShaderRef {
    /// Create a shader reference
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Engine material asset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialRecord {
    /// Asset path of the record (not stored in the file itself)
    #[serde(skip)]
    pub path: String,
    /// Display name
    pub name: String,
    /// Shader the material renders with
    pub shader: String,
    /// Texture asset paths keyed by shader property
    #[serde(default)]
    pub textures: BTreeMap<String, String>,
    /// Scalar shader properties set outside the converter
    #[serde(default)]
    pub floats: BTreeMap<String, f32>,
}

impl MaterialRecord {
    /// Create an empty record using `shader`
    pub fn new(path: impl Into<String>, name: impl Into<String>, shader: &ShaderRef) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
            shader: shader.name.clone(),
            textures: BTreeMap::new(),
            floats: BTreeMap::new(),
        }
    }

    /// Bind a texture asset to a shader property, returning the previous binding
    pub fn set_texture(&mut self, property: impl Into<String>, texture: impl Into<String>) -> Option<String> {
        self.textures.insert(property.into(), texture.into())
    }

    /// Texture bound to a shader property
    pub fn texture(&self, property: &str) -> Option<&str> {
        self.textures.get(property).map(String::as_str)
    }

    /// Texture bound to a managed slot
    pub fn slot_texture(&self, slot: TextureSlot) -> Option<&str> {
        self.texture(slot.shader_property())
    }

    /// Serialize the record body
    pub fn to_ron(&self) -> Result<String, AssetError> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| AssetError::InvalidData(format!("Failed to serialize material {}: {}", self.path, e)))
    }

    /// Deserialize a record body stored at `path`
    pub fn from_ron(path: impl Into<String>, contents: &str) -> Result<Self, AssetError> {
        let path = path.into();
        let mut record: Self = ron::from_str(contents)
            .map_err(|e| AssetError::InvalidData(format!("Failed to parse material {path}: {e}")))?;
        record.path = path;
        Ok(record)
    }
}
