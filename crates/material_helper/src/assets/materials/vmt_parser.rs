//! VMT (Valve Material Type) file parser
//!
//! Scrapes texture references out of Source engine `.vmt` files. Only the
//! three keys that map onto the standard shader are extracted; the rest of
//! the key/value tree is ignored.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use lazy_static::lazy_static;
use regex::{Regex, RegexBuilder};

use crate::assets::AssetError;
use crate::foundation::files;

/// Texture roles managed by the converter
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TextureSlot {
    /// Base color (`$basetexture`)
    Albedo,
    /// Normal map (`$bumpmap`)
    Normal,
    /// Metallic/gloss map, stood in for by `$phongexponenttexture`
    Metallic,
}

impl TextureSlot {
    /// All slots in resolution order
    pub const ALL: [Self; 3] = [Self::Albedo, Self::Normal, Self::Metallic];

    /// Slot name used in diagnostics
    pub fn name(self) -> &'static str {
        match self {
            Self::Albedo => "albedo",
            Self::Normal => "normal",
            Self::Metallic => "metallic",
        }
    }

    /// VMT key that carries this slot's texture
    pub fn vmt_key(self) -> &'static str {
        match self {
            Self::Albedo => "$basetexture",
            Self::Normal => "$bumpmap",
            Self::Metallic => "$phongexponenttexture",
        }
    }

    /// Shader property the slot is bound to
    pub fn shader_property(self) -> &'static str {
        match self {
            Self::Albedo => "_MainTex",
            Self::Normal => "_BumpMap",
            Self::Metallic => "_MetallicGlossMap",
        }
    }

    fn pattern(self) -> &'static Regex {
        match self {
            Self::Albedo => &*BASE_TEXTURE,
            Self::Normal => &*BUMP_MAP,
            Self::Metallic => &*PHONG_EXPONENT_TEXTURE,
        }
    }
}

impl fmt::Display for TextureSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

lazy_static! {
    static ref BASE_TEXTURE: Regex = key_pattern(TextureSlot::Albedo.vmt_key());
    static ref BUMP_MAP: Regex = key_pattern(TextureSlot::Normal.vmt_key());
    static ref PHONG_EXPONENT_TEXTURE: Regex = key_pattern(TextureSlot::Metallic.vmt_key());
}

/// Key (quotes optional) followed by whitespace and a quoted value
///
/// The key must not be glued to a preceding word character, and must be
/// followed by its closing quote or whitespace, so `$basetexture2` is a
/// different key.
fn key_pattern(key: &str) -> Regex {
    RegexBuilder::new(&format!(r#"(?:^|[^\w$])"?{}"?\s+"([^"\r\n]*)""#, regex::escape(key)))
        .case_insensitive(true)
        .build()
        .unwrap_or_else(|e| panic!("invalid VMT key pattern for {key}: {e}"))
}

/// A texture path as written in the VMT file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureReference {
    /// Slot the texture feeds
    pub slot: TextureSlot,
    /// Raw path, unchanged (either separator, any extension)
    pub raw_path: String,
}

/// Parsed VMT data for one source file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedMaterial {
    /// Material name (source file stem)
    pub name: String,
    /// Path the file was read from
    pub source_path: PathBuf,
    /// Source path relative to the scanned root, as an asset path
    pub relative_path: String,
    /// Texture references by slot; slots missing from the file are absent
    pub textures: BTreeMap<TextureSlot, TextureReference>,
}

impl ParsedMaterial {
    /// Build from already-extracted slot values
    pub fn new(
        relative_path: impl Into<String>,
        source_path: impl Into<PathBuf>,
        slots: BTreeMap<TextureSlot, String>,
    ) -> Self {
        let relative_path = files::normalize_separators(&relative_path.into());
        let name = files::bare_file_name(&relative_path).to_string();
        let textures = slots
            .into_iter()
            .map(|(slot, raw_path)| (slot, TextureReference { slot, raw_path }))
            .collect();

        Self {
            name,
            source_path: source_path.into(),
            relative_path,
            textures,
        }
    }

    /// True when none of the managed keys were found
    pub fn has_textures(&self) -> bool {
        !self.textures.is_empty()
    }

    /// Reference for one slot, if present
    pub fn texture(&self, slot: TextureSlot) -> Option<&TextureReference> {
        self.textures.get(&slot)
    }
}

/// VMT file parser
pub struct VmtParser;

impl VmtParser {
    /// Extract the managed texture references from VMT text
    ///
    /// Only the first occurrence of each key counts. Keys that never appear
    /// are left out of the map.
    pub fn parse(contents: &str) -> BTreeMap<TextureSlot, String> {
        TextureSlot::ALL
            .into_iter()
            .filter_map(|slot| {
                slot.pattern()
                    .captures(contents)
                    .and_then(|captures| captures.get(1))
                    .map(|value| (slot, value.as_str().to_string()))
            })
            .collect()
    }

    /// Read and parse a VMT file located under `source_root`
    ///
    /// # Arguments
    /// * `path` - The `.vmt` file
    /// * `source_root` - Directory the batch was started from; used to derive
    ///   the relative path that becomes the record location
    pub fn parse_file(path: impl AsRef<Path>, source_root: impl AsRef<Path>) -> Result<ParsedMaterial, AssetError> {
        let path = path.as_ref();
        let relative = path.strip_prefix(source_root.as_ref()).unwrap_or(path);

        let contents = fs::read_to_string(path).map_err(|e| AssetError::ReadFailed {
            path: path.to_path_buf(),
            source: e,
        })?;

        Ok(ParsedMaterial::new(
            files::to_asset_path(relative),
            path,
            Self::parse(&contents),
        ))
    }
}
