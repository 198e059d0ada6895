//! Build modules: a descriptor bound to lazily opened layer content.

use modpack_core::dist::{Descriptor, ModuleInfo, ModuleKind};
use modpack_core::error::Result;

use crate::blob::Blob;
use crate::package::LayerReader;

/// An installable buildpack or extension.
///
/// Each module owns its descriptor and its blob. Opening the module reads
/// the layer from the package it was extracted from.
pub struct BuildModule {
    descriptor: Descriptor,
    blob: Box<dyn Blob>,
}

impl BuildModule {
    /// Bind a descriptor to the blob holding the module's layer.
    pub fn from_blob(descriptor: impl Into<Descriptor>, blob: impl Blob + 'static) -> Self {
        Self {
            descriptor: descriptor.into(),
            blob: Box::new(blob),
        }
    }

    /// Get the module's descriptor.
    pub fn descriptor(&self) -> &Descriptor {
        &self.descriptor
    }

    /// Get the module's identity.
    pub fn info(&self) -> &ModuleInfo {
        self.descriptor.info()
    }

    /// Whether this is a buildpack or an extension.
    pub fn kind(&self) -> ModuleKind {
        self.descriptor.kind()
    }

    /// Open the module's layer content.
    pub fn open(&self) -> Result<LayerReader> {
        self.blob.open()
    }
}

impl std::fmt::Debug for BuildModule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BuildModule")
            .field("descriptor", &self.descriptor)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blob::OpenerBlob;
    use modpack_core::dist::{BuildpackDescriptor, ExtensionDescriptor};
    use std::io::{Cursor, Read};

    #[test]
    fn test_from_blob_exposes_descriptor() {
        let desc = BuildpackDescriptor {
            api: "0.9".to_string(),
            info: ModuleInfo::new("buildpack/a", "1.0"),
            ..BuildpackDescriptor::default()
        };
        let module = BuildModule::from_blob(desc, OpenerBlob::new(|| {
            Ok(Box::new(Cursor::new(b"content".to_vec())) as LayerReader)
        }));

        assert_eq!(module.kind(), ModuleKind::Buildpack);
        assert_eq!(module.info().full_name(), "buildpack/a@1.0");
        assert_eq!(module.descriptor().api(), "0.9");

        let mut content = Vec::new();
        module.open().unwrap().read_to_end(&mut content).unwrap();
        assert_eq!(content, b"content");
    }

    #[test]
    fn test_extension_module_kind() {
        let desc = ExtensionDescriptor {
            api: "0.10".to_string(),
            info: ModuleInfo::new("ext/a", "0.1"),
        };
        let module = BuildModule::from_blob(desc, OpenerBlob::new(|| {
            Ok(Box::new(std::io::empty()) as LayerReader)
        }));

        assert_eq!(module.kind(), ModuleKind::Extension);
        assert!(format!("{module:?}").contains("ext/a"));
    }
}
