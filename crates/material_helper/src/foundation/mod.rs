//! Foundation module - Core utilities and types
//!
//! This module provides fundamental utilities used throughout the converter:
//! - Logging setup
//! - File discovery and asset path helpers

pub mod logging;
pub mod files;
