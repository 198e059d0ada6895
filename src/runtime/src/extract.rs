//! Decomposition of a buildpackage into its build modules.
//!
//! Extraction reads two labels and builds one [`BuildModule`] per entry of the
//! layer index. Layers are never read here: each module carries an opener
//! bound to its own diff ID, and the package is only asked for the layer when
//! the module is opened.

use std::sync::Arc;

use modpack_core::dist::{
    BuildpackDescriptor, ExtensionDescriptor, Metadata, ModuleInfo, ModuleKind, ModuleLayers,
    BUILDPACK_LAYERS_LABEL, METADATA_LABEL,
};
use modpack_core::error::{ModpackError, Result};

use crate::blob::OpenerBlob;
use crate::module::BuildModule;
use crate::package::{require_label, Package};

/// Buildpacks found in a package.
#[derive(Debug, Default)]
pub struct ExtractedBuildpacks {
    /// The buildpack the package was built to deliver, if the layer index has it.
    pub main: Option<BuildModule>,

    /// Every other buildpack in the package, in no particular order.
    pub dependencies: Vec<BuildModule>,
}

impl ExtractedBuildpacks {
    /// Total number of buildpacks, main included.
    pub fn len(&self) -> usize {
        self.dependencies.len() + usize::from(self.main.is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All buildpacks, main first.
    pub fn into_modules(self) -> Vec<BuildModule> {
        self.main.into_iter().chain(self.dependencies).collect()
    }
}

/// Extract the main buildpack and its dependencies from a package.
///
/// Fails when the metadata or layer index label is missing or malformed.
/// Layer errors surface only when a returned module is opened.
pub fn extract_buildpacks(pkg: Arc<dyn Package>) -> Result<ExtractedBuildpacks> {
    let md: Metadata = require_label(pkg.as_ref(), METADATA_LABEL)?;
    let layers: ModuleLayers = require_label(pkg.as_ref(), BUILDPACK_LAYERS_LABEL)?;

    let mut extracted = ExtractedBuildpacks::default();
    for (id, version, layer) in layers.iter() {
        let desc = BuildpackDescriptor::from_layer(id, version, layer);
        let blob = layer_blob(&pkg, ModuleKind::Buildpack, &desc.info, &layer.layer_diff_id);
        let is_main = desc.info.matches(&md.info);

        tracing::debug!(
            module = %desc.info,
            diff_id = %layer.layer_diff_id,
            main = is_main,
            "Found buildpack"
        );

        let module = BuildModule::from_blob(desc, blob);
        if is_main {
            extracted.main = Some(module);
        } else {
            extracted.dependencies.push(module);
        }
    }

    if extracted.main.is_none() {
        tracing::debug!(module = %md.info, "Main buildpack not present in layer index");
    }

    Ok(extracted)
}

/// Extract every extension from a package.
pub fn extract_extensions(pkg: Arc<dyn Package>) -> Result<Vec<BuildModule>> {
    let layers: ModuleLayers = require_label(pkg.as_ref(), BUILDPACK_LAYERS_LABEL)?;

    let extensions = layers
        .iter()
        .map(|(id, version, layer)| {
            let desc = ExtensionDescriptor::from_layer(id, version, layer);
            let blob = layer_blob(&pkg, ModuleKind::Extension, &desc.info, &layer.layer_diff_id);
            tracing::debug!(module = %desc.info, diff_id = %layer.layer_diff_id, "Found extension");
            BuildModule::from_blob(desc, blob)
        })
        .collect();

    Ok(extensions)
}

/// Extract the extension a package delivers.
///
/// Extension packages are expected to hold a single extension. When the
/// layer index has more than one, the last one walked is returned.
pub fn extract_extension(pkg: Arc<dyn Package>) -> Result<Option<BuildModule>> {
    let mut extensions = extract_extensions(pkg)?;
    if extensions.len() > 1 {
        tracing::warn!(
            count = extensions.len(),
            "Package contains more than one extension; keeping the last"
        );
    }
    Ok(extensions.pop())
}

/// Opener for one module's layer.
///
/// Captures its own copies of the package handle, module name and diff ID.
fn layer_blob(
    pkg: &Arc<dyn Package>,
    kind: ModuleKind,
    info: &ModuleInfo,
    diff_id: &str,
) -> OpenerBlob {
    let pkg = Arc::clone(pkg);
    let module = info.full_name();
    let diff_id = diff_id.to_string();

    OpenerBlob::new(move || {
        tracing::debug!(%kind, module = %module, diff_id = %diff_id, "Opening module layer");
        pkg.get_layer(&diff_id)
            .map_err(|source| ModpackError::LayerOpen {
                kind,
                module: module.clone(),
                diff_id: diff_id.clone(),
                source: Box::new(source),
            })
    })
}
