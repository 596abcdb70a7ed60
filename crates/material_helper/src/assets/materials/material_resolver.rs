//! Material resolver
//!
//! Turns a [`ParsedMaterial`] into a [`MaterialRecord`] inside an asset
//! index: picks the record path, creates or reuses the record, and binds each
//! referenced texture to its shader property when a converted image exists.

use std::collections::BTreeMap;
use std::fmt;

use log::Level;

use super::material_record::MaterialRecord;
use super::vmt_parser::{ParsedMaterial, TextureReference, TextureSlot};
use crate::assets::AssetIndex;
use crate::core::config::ConverterConfig;
use crate::foundation::files;
use crate::report::LogSink;

/// Something that happened while resolving one material
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionEvent {
    /// None of the managed keys were present
    NoTextures,
    /// A record already existed and is being updated
    RecordUpdated {
        /// Record path
        path: String,
    },
    /// A new record is being created
    RecordCreated {
        /// Record path
        path: String,
    },
    /// A missing destination directory was created
    DirectoryCreated {
        /// Directory asset path
        path: String,
    },
    /// The shader for new records is not registered
    ShaderMissing {
        /// Shader that was looked up
        shader: String,
    },
    /// A legacy texture reference was redirected to its converted image
    LegacyTextureSubstituted {
        /// Slot being resolved
        slot: TextureSlot,
        /// Path as written in the VMT
        original: String,
        /// Path searched instead
        substituted: String,
    },
    /// Several images share the searched name; the first was used
    AmbiguousTexture {
        /// Slot being resolved
        slot: TextureSlot,
        /// Bare name searched for
        name: String,
        /// Asset that was bound
        chosen: String,
        /// Number of candidates found
        candidates: usize,
    },
    /// A texture was bound to its shader property
    Bound {
        /// Slot resolved
        slot: TextureSlot,
        /// Shader property written
        property: &'static str,
        /// Bound asset path
        texture: String,
    },
    /// No image matched the reference; the property was left untouched
    Unresolved {
        /// Slot resolved
        slot: TextureSlot,
        /// Shader property that stays unbound
        property: &'static str,
        /// File the converter expected to find
        expected: String,
    },
    /// The asset index failed to load or persist the record
    StoreFailed {
        /// Record path
        path: String,
        /// Underlying error
        message: String,
    },
}

impl ResolutionEvent {
    /// Severity used when the event is written to a log
    pub fn level(&self) -> Level {
        match self {
            Self::ShaderMissing { .. } | Self::StoreFailed { .. } => Level::Error,
            Self::Unresolved { .. } | Self::AmbiguousTexture { .. } => Level::Warn,
            Self::NoTextures
            | Self::RecordUpdated { .. }
            | Self::RecordCreated { .. }
            | Self::DirectoryCreated { .. }
            | Self::LegacyTextureSubstituted { .. }
            | Self::Bound { .. } => Level::Info,
        }
    }
}

impl fmt::Display for ResolutionEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoTextures => write!(f, "  - No textures found in VMT file. Skipping."),
            Self::RecordUpdated { path } => write!(f, "  - Material file already exists. Updating '{path}'."),
            Self::RecordCreated { path } => write!(f, "  - Creating new material file '{path}'."),
            Self::DirectoryCreated { path } => write!(f, "  - Created directory: {path}"),
            Self::ShaderMissing { shader } => {
                write!(f, "  - ERROR: Could not find the '{shader}' shader. Skipping.")
            }
            Self::LegacyTextureSubstituted { slot, original, substituted } => write!(
                f,
                "  - VMT specified a VTF texture for {slot} ('{original}'). Looking for a converted image at '{substituted}'."
            ),
            Self::AmbiguousTexture { slot, name, chosen, candidates } => write!(
                f,
                "  - WARNING: {candidates} images named '{name}' match {slot}; using '{chosen}'."
            ),
            Self::Bound { property, texture, .. } => {
                write!(f, "  - Assigned '{}' to '{property}'.", files::file_name(texture))
            }
            Self::Unresolved { property, expected, .. } => write!(
                f,
                "  - WARNING: Texture for '{property}' not found in the project. (Expected: {expected})"
            ),
            Self::StoreFailed { path, message } => {
                write!(f, "  - ERROR: Could not save material '{path}': {message}")
            }
        }
    }
}

/// Where a slot's texture ended up
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedAsset {
    /// Image asset found in the index
    Located {
        /// Asset path of the image
        asset_path: String,
    },
    /// Nothing matched
    Unresolved {
        /// File name that was searched for
        expected: String,
    },
}

impl ResolvedAsset {
    /// Located asset path, if any
    pub fn asset_path(&self) -> Option<&str> {
        match self {
            Self::Located { asset_path } => Some(asset_path.as_str()),
            Self::Unresolved { .. } => None,
        }
    }
}

/// Terminal state of one material's resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveStatus {
    /// Nothing to do; no record touched
    NoTextures,
    /// New record needed but the default shader is missing; nothing written
    ShaderMissing,
    /// New record created
    Created,
    /// Existing record updated in place
    Updated,
    /// The index could not load or persist the record
    StoreFailed,
}

impl ResolveStatus {
    /// Whether this outcome should fail the batch
    pub fn is_error(self) -> bool {
        matches!(self, Self::ShaderMissing | Self::StoreFailed)
    }
}

/// Result of resolving one parsed material
#[derive(Debug, Clone)]
pub struct Resolution {
    /// Terminal state
    pub status: ResolveStatus,
    /// Record as written to the index, when one was written
    pub record: Option<MaterialRecord>,
    /// Per-slot outcomes for the slots present in the VMT
    pub resolved: BTreeMap<TextureSlot, ResolvedAsset>,
    /// Ordered diagnostics
    pub events: Vec<ResolutionEvent>,
}

impl Resolution {
    fn finished(status: ResolveStatus, events: Vec<ResolutionEvent>) -> Self {
        Self {
            status,
            record: None,
            resolved: BTreeMap::new(),
            events,
        }
    }

    /// Number of slots bound
    pub fn bound_count(&self) -> usize {
        self.resolved.values().filter(|r| r.asset_path().is_some()).count()
    }

    /// Number of slots left unresolved
    pub fn unresolved_count(&self) -> usize {
        self.resolved.len() - self.bound_count()
    }

    /// Write every event to a log sink
    pub fn write_to(&self, log: &mut dyn LogSink) {
        for event in &self.events {
            log.append(event.level(), &event.to_string());
        }
    }
}

/// Creates and updates material records for parsed VMT files
#[derive(Debug, Clone)]
pub struct MaterialResolver {
    config: ConverterConfig,
}

impl MaterialResolver {
    /// Create a resolver using the given configuration
    pub fn new(config: ConverterConfig) -> Self {
        Self { config }
    }

    /// Configuration in use
    pub fn config(&self) -> &ConverterConfig {
        &self.config
    }

    /// Record path for a source file relative to the scanned root
    ///
    /// `models/brick.vmt` becomes `<destination_prefix>/models/brick.mat`.
    pub fn record_path(&self, relative_source: &str) -> String {
        let swapped = files::replace_extension(
            &files::normalize_separators(relative_source),
            &self.config.material_extension,
        );
        files::join_asset_path(&self.config.destination_prefix, &swapped)
    }

    /// Resolve a parsed material against the index and persist the record
    pub fn resolve(&self, parsed: &ParsedMaterial, index: &mut dyn AssetIndex) -> Resolution {
        let mut events = Vec::new();

        if !parsed.has_textures() {
            events.push(ResolutionEvent::NoTextures);
            return Resolution::finished(ResolveStatus::NoTextures, events);
        }

        let path = self.record_path(&parsed.relative_path);
        let existing = index.record_exists(&path);

        let mut record = if existing {
            match index.load_record(&path) {
                Ok(record) => {
                    events.push(ResolutionEvent::RecordUpdated { path: path.clone() });
                    record
                }
                Err(e) => {
                    events.push(ResolutionEvent::StoreFailed { path, message: e.to_string() });
                    return Resolution::finished(ResolveStatus::StoreFailed, events);
                }
            }
        } else {
            let Some(shader) = index.find_shader(&self.config.default_shader) else {
                events.push(ResolutionEvent::ShaderMissing {
                    shader: self.config.default_shader.clone(),
                });
                return Resolution::finished(ResolveStatus::ShaderMissing, events);
            };

            if let Some(dir) = files::parent_asset_dir(&path) {
                match index.ensure_directory(dir) {
                    Ok(true) => events.push(ResolutionEvent::DirectoryCreated { path: dir.to_string() }),
                    Ok(false) => {}
                    Err(e) => {
                        events.push(ResolutionEvent::StoreFailed {
                            path: path.clone(),
                            message: e.to_string(),
                        });
                        return Resolution::finished(ResolveStatus::StoreFailed, events);
                    }
                }
            }

            events.push(ResolutionEvent::RecordCreated { path: path.clone() });
            MaterialRecord::new(path.clone(), parsed.name.clone(), &shader)
        };

        let mut resolved = BTreeMap::new();
        for reference in parsed.textures.values() {
            let asset = self.resolve_texture(reference, &*index, &mut events);
            if let ResolvedAsset::Located { asset_path } = &asset {
                record.set_texture(reference.slot.shader_property(), asset_path.clone());
            }
            resolved.insert(reference.slot, asset);
        }

        let stored = if existing {
            index.mark_dirty(&record)
        } else {
            index.create_record(&record)
        };
        if let Err(e) = stored {
            events.push(ResolutionEvent::StoreFailed { path, message: e.to_string() });
            return Resolution {
                status: ResolveStatus::StoreFailed,
                record: None,
                resolved,
                events,
            };
        }

        Resolution {
            status: if existing { ResolveStatus::Updated } else { ResolveStatus::Created },
            record: Some(record),
            resolved,
            events,
        }
    }

    /// Find the image a single texture reference points at
    pub fn resolve_texture(
        &self,
        reference: &TextureReference,
        index: &dyn AssetIndex,
        events: &mut Vec<ResolutionEvent>,
    ) -> ResolvedAsset {
        let slot = reference.slot;
        let lookup = match files::substitute_extension(
            &reference.raw_path,
            &self.config.legacy_texture_extension,
            &self.config.converted_texture_extension,
        ) {
            Some(substituted) => {
                events.push(ResolutionEvent::LegacyTextureSubstituted {
                    slot,
                    original: reference.raw_path.clone(),
                    substituted: substituted.clone(),
                });
                substituted
            }
            None => reference.raw_path.clone(),
        };

        let name = files::bare_file_name(&lookup);
        let mut candidates = index.find_images(name);

        if candidates.is_empty() {
            events.push(ResolutionEvent::Unresolved {
                slot,
                property: slot.shader_property(),
                expected: lookup.clone(),
            });
            return ResolvedAsset::Unresolved { expected: lookup };
        }

        let count = candidates.len();
        let chosen = candidates.swap_remove(0);
        if count > 1 {
            events.push(ResolutionEvent::AmbiguousTexture {
                slot,
                name: name.to_string(),
                chosen: chosen.clone(),
                candidates: count,
            });
        }

        events.push(ResolutionEvent::Bound {
            slot,
            property: slot.shader_property(),
            texture: chosen.clone(),
        });
        ResolvedAsset::Located { asset_path: chosen }
    }
}
