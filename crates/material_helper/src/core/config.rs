//! # Converter Configuration
//!
//! Settings shared by the parser, the resolver and the batch converter.
//! Every field has a default, so configuration files only need to list the
//! values they change.
//!
//! ```toml
//! default_shader = "Standard"
//! shaders = ["Standard", "Standard (Specular setup)"]
//! destination_prefix = "Assets"
//! ```

use serde::{Serialize, Deserialize};

pub use crate::config::{Config, ConfigError};

/// Default ceiling for the retained conversion log, in characters
pub const DEFAULT_MAX_LOG_LENGTH: usize = 5000;

/// # Converter Configuration
///
/// Controls file extensions, the shader used for new records and where
/// records land inside the asset tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConverterConfig {
    /// Extension of the source material files (without dot)
    pub source_extension: String,
    /// Extension given to generated material records (without dot)
    pub material_extension: String,
    /// Shader assigned to newly created records
    pub default_shader: String,
    /// Shaders the file-backed asset index reports as available
    pub shaders: Vec<String>,
    /// Legacy texture container extension referenced by VMT files
    pub legacy_texture_extension: String,
    /// Extension the external conversion step produced for legacy textures
    pub converted_texture_extension: String,
    /// Asset-tree directory that mirrors the source root (empty = tree root)
    pub destination_prefix: String,
    /// Retained log size before the oldest text is trimmed
    pub max_log_length: usize,
}

impl ConverterConfig {
    /// Create a configuration with default values
    pub fn new() -> Self {
        Self {
            source_extension: "vmt".to_string(),
            material_extension: "mat".to_string(),
            default_shader: "Standard".to_string(),
            shaders: vec!["Standard".to_string()],
            legacy_texture_extension: "vtf".to_string(),
            converted_texture_extension: "png".to_string(),
            destination_prefix: String::new(),
            max_log_length: DEFAULT_MAX_LOG_LENGTH,
        }
    }

    /// Set the shader used for new records
    pub fn with_default_shader(mut self, shader: impl Into<String>) -> Self {
        self.default_shader = shader.into();
        self
    }

    /// Set the shaders known to the file-backed index
    pub fn with_shaders<I, S>(mut self, shaders: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.shaders = shaders.into_iter().map(Into::into).collect();
        self
    }

    /// Set the material record extension
    pub fn with_material_extension(mut self, extension: impl Into<String>) -> Self {
        self.material_extension = extension.into();
        self
    }

    /// Set the destination directory inside the asset tree
    pub fn with_destination_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.destination_prefix = prefix.into();
        self
    }

    /// Set the retained log ceiling
    pub fn with_max_log_length(mut self, length: usize) -> Self {
        self.max_log_length = length;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        let extensions = [
            ("source_extension", &self.source_extension),
            ("material_extension", &self.material_extension),
            ("legacy_texture_extension", &self.legacy_texture_extension),
            ("converted_texture_extension", &self.converted_texture_extension),
        ];
        for (field, value) in extensions {
            if value.is_empty() {
                return Err(ConfigError::Invalid(format!("{field} cannot be empty")));
            }
            if value.starts_with('.') {
                return Err(ConfigError::Invalid(format!(
                    "{field} should not include the leading dot: '{value}'"
                )));
            }
        }

        if self.default_shader.trim().is_empty() {
            return Err(ConfigError::Invalid("default_shader cannot be empty".to_string()));
        }

        if self.max_log_length == 0 {
            return Err(ConfigError::Invalid("max_log_length must be at least 1".to_string()));
        }

        Ok(())
    }
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl Config for ConverterConfig {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigFormat;

    #[test]
    fn test_defaults_are_valid() {
        let config = ConverterConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.material_extension, "mat");
        assert_eq!(config.default_shader, "Standard");
        assert_eq!(config.max_log_length, 5000);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = ConverterConfig::from_str_as(
            "default_shader = \"Lit\"\nshaders = [\"Lit\"]\n",
            ConfigFormat::Toml,
        )
        .unwrap();

        assert_eq!(config.default_shader, "Lit");
        assert_eq!(config.shaders, vec!["Lit".to_string()]);
        assert_eq!(config.source_extension, "vmt");
    }

    #[test]
    fn test_ron_config() {
        let config = ConverterConfig::from_str_as(
            "(material_extension: \"material\", max_log_length: 128)",
            ConfigFormat::Ron,
        )
        .unwrap();

        assert_eq!(config.material_extension, "material");
        assert_eq!(config.max_log_length, 128);
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        assert!(ConverterConfig::new().with_material_extension("").validate().is_err());
        assert!(ConverterConfig::new().with_material_extension(".mat").validate().is_err());
        assert!(ConverterConfig::new().with_default_shader(" ").validate().is_err());
        assert!(ConverterConfig::new().with_max_log_length(0).validate().is_err());
    }

    #[test]
    fn test_save_and_load_round_trip_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("converter.toml");

        let config = ConverterConfig::new().with_destination_prefix("Assets/Materials");
        config.save_to_file(&path).unwrap();

        let loaded = ConverterConfig::load_from_file(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_unsupported_extension() {
        let result = ConverterConfig::load_from_file("converter.yaml");
        assert!(matches!(result, Err(ConfigError::UnsupportedFormat(_))));
    }
}
