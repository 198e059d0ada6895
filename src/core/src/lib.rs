//! Modpack Core - Foundational Types
//!
//! This module provides the error taxonomy, buildpack distribution metadata
//! and configuration shared across the modpack crates.

pub mod config;
pub mod dist;
pub mod error;

// Re-export commonly used types
pub use config::{LogLevel, ModpackConfig, UnpackConfig};
pub use dist::{
    BuildpackDescriptor, Descriptor, ExtensionDescriptor, Metadata, ModuleInfo, ModuleKind,
    ModuleLayerInfo, ModuleLayers, BUILDPACK_LAYERS_LABEL, METADATA_LABEL,
};
pub use error::{ModpackError, Result};

/// Modpack version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
