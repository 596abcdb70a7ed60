//! Material conversion subsystem
//!
//! VMT scraping, engine material records and the resolver that links them.

pub mod vmt_parser;
pub mod material_record;
pub mod material_resolver;

pub use vmt_parser::{VmtParser, ParsedMaterial, TextureReference, TextureSlot};
pub use material_record::{MaterialRecord, ShaderRef};
pub use material_resolver::{
    MaterialResolver, Resolution, ResolutionEvent, ResolveStatus, ResolvedAsset,
};
