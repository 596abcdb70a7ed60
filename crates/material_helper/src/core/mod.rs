//! # Core Module
//!
//! Shared configuration used by every stage of the conversion.

pub mod config;

// Re-export foundation modules for convenience
pub use crate::foundation;
pub use crate::assets;

pub use config::{ConverterConfig, Config, ConfigError};
