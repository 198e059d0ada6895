//! Modpack Runtime - buildpackage decomposition.
//!
//! Reads the labels of a buildpackage, rebuilds a descriptor for every module
//! it carries and hands each one back as a [`BuildModule`] whose layer is only
//! opened on demand.
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use modpack_runtime::{extract_buildpacks, OciLayoutPackage};
//!
//! let pkg = Arc::new(OciLayoutPackage::from_path("./my-buildpackage")?);
//! let extracted = extract_buildpacks(pkg)?;
//! if let Some(main) = &extracted.main {
//!     println!("main buildpack: {}", main.info());
//! }
//! ```

pub mod blob;
pub mod extract;
pub mod module;
pub mod oci;
pub mod package;
pub mod unpack;

#[cfg(test)]
mod testing;

// Re-export common types
pub use blob::{Blob, OpenerBlob};
pub use extract::{extract_buildpacks, extract_extension, extract_extensions, ExtractedBuildpacks};
pub use module::BuildModule;
pub use oci::OciLayoutPackage;
pub use package::{get_label, require_label, LayerReader, Package};
pub use unpack::{unpack_module, unpack_modules};

/// Modpack Runtime version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
