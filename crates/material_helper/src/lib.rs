//! # Material Helper
//!
//! Converts Source engine material descriptions (`.vmt`) into engine material
//! records, binding the referenced textures to the standard shader slots.
//!
//! ## Features
//!
//! - **VMT Scraping**: Extracts base, bump and phong exponent textures
//! - **Texture Resolution**: Finds converted images in a project asset index
//! - **Idempotent Output**: Re-runs update existing records in place
//! - **Pluggable Stores**: File-backed and in-memory asset indices
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use material_helper::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ConverterConfig::default();
//!     let mut index = FileAssetIndex::scan("project/assets", &config)?;
//!     let mut log = BoundedLog::new(config.max_log_length);
//!
//!     let converter = BatchConverter::new(config);
//!     let summary = converter.run("project/assets/materials", &mut index, &mut log)?;
//!     println!("{summary}");
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod core;
pub mod config;
pub mod foundation;
pub mod assets;
pub mod report;

mod converter;

pub use converter::{
    BatchConverter, BatchProgress, BatchSummary, CancellationToken, ConvertError, FileOutcome,
};

/// Common imports for converter users
pub mod prelude {
    pub use crate::{
        BatchConverter, BatchProgress, BatchSummary, CancellationToken, ConvertError,
        assets::{
            AssetError, AssetIndex, FileAssetIndex, InMemoryAssetIndex,
            materials::{
                MaterialRecord, MaterialResolver, ParsedMaterial, ResolutionEvent,
                TextureSlot, VmtParser,
            },
        },
        core::config::ConverterConfig,
        config::Config,
        report::{BoundedLog, LogSink},
    };
}
