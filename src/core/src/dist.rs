//! Buildpack distribution metadata.
//!
//! These types mirror the JSON carried by buildpackage image labels:
//!
//! - `io.buildpacks.buildpackage.metadata` decodes into [`Metadata`] and names
//!   the package's main module.
//! - `io.buildpacks.buildpack.layers` decodes into [`ModuleLayers`], the
//!   inventory of every module in the package keyed by ID then version.
//!
//! ```json
//! {
//!   "buildpack/a": {
//!     "1.0": { "api": "0.9", "layerDiffID": "sha256:aaa", "homepage": "https://a.example" }
//!   }
//! }
//! ```

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Label carrying the package's main-module identity.
pub const METADATA_LABEL: &str = "io.buildpacks.buildpackage.metadata";

/// Label carrying the module layer index.
pub const BUILDPACK_LAYERS_LABEL: &str = "io.buildpacks.buildpack.layers";

/// Kind of build module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModuleKind {
    Buildpack,
    Extension,
}

impl fmt::Display for ModuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Buildpack => write!(f, "buildpack"),
            Self::Extension => write!(f, "extension"),
        }
    }
}

/// License declared by a module.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct License {
    #[serde(rename = "type", default, skip_serializing_if = "String::is_empty")]
    pub license_type: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub uri: String,
}

/// Identity of a build module.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleInfo {
    #[serde(default)]
    pub id: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,

    #[serde(default)]
    pub version: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub homepage: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub keywords: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub licenses: Vec<License>,
}

impl ModuleInfo {
    /// Create an identity from an ID and version.
    pub fn new(id: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            version: version.into(),
            ..Self::default()
        }
    }

    /// `id@version`, or just `id` when the version is empty.
    pub fn full_name(&self) -> String {
        if self.version.is_empty() {
            self.id.clone()
        } else {
            format!("{}@{}", self.id, self.version)
        }
    }

    /// Two identities match when their ID and version are equal.
    pub fn matches(&self, other: &ModuleInfo) -> bool {
        self.id == other.id && self.version == other.version
    }
}

impl fmt::Display for ModuleInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full_name())
    }
}

/// A stack a buildpack supports.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stack {
    pub id: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub mixins: Vec<String>,
}

/// Reference to a module inside an order group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleRef {
    #[serde(flatten)]
    pub info: ModuleInfo,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub optional: bool,
}

/// One group of a composite buildpack's order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderEntry {
    #[serde(default)]
    pub group: Vec<ModuleRef>,
}

/// Detection order of a composite buildpack.
pub type Order = Vec<OrderEntry>;

/// Decoded `io.buildpacks.buildpackage.metadata` label.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    #[serde(flatten)]
    pub info: ModuleInfo,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub stacks: Vec<Stack>,
}

/// Per-version entry of the layer index.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleLayerInfo {
    #[serde(default)]
    pub api: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub stacks: Vec<Stack>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub order: Order,

    #[serde(default, rename = "layerDiffID")]
    pub layer_diff_id: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub homepage: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
}

impl ModuleLayerInfo {
    /// Identity of the module stored under `id` / `version`.
    pub fn module_info(&self, id: &str, version: &str) -> ModuleInfo {
        ModuleInfo {
            id: id.to_string(),
            version: version.to_string(),
            homepage: self.homepage.clone(),
            name: self.name.clone(),
            ..ModuleInfo::default()
        }
    }
}

/// Decoded `io.buildpacks.buildpack.layers` label: module ID → version → layer info.
///
/// Iteration follows key order. Callers should still treat the order as
/// unspecified, since packages carry no ordering of their own.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModuleLayers(BTreeMap<String, BTreeMap<String, ModuleLayerInfo>>);

impl ModuleLayers {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the entry for `id` / `version`.
    pub fn insert(
        &mut self,
        id: impl Into<String>,
        version: impl Into<String>,
        info: ModuleLayerInfo,
    ) {
        self.0
            .entry(id.into())
            .or_default()
            .insert(version.into(), info);
    }

    /// Look up the entry for `id` / `version`.
    pub fn get(&self, id: &str, version: &str) -> Option<&ModuleLayerInfo> {
        self.0.get(id).and_then(|versions| versions.get(version))
    }

    /// Walk every `(id, version, info)` triple.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str, &ModuleLayerInfo)> {
        self.0.iter().flat_map(|(id, versions)| {
            versions
                .iter()
                .map(move |(version, info)| (id.as_str(), version.as_str(), info))
        })
    }

    /// Number of module versions in the index.
    pub fn len(&self) -> usize {
        self.0.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Descriptor of a buildpack.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildpackDescriptor {
    pub api: String,
    pub info: ModuleInfo,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub stacks: Vec<Stack>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub order: Order,
}

impl BuildpackDescriptor {
    /// Build the descriptor for a layer index entry.
    pub fn from_layer(id: &str, version: &str, layer: &ModuleLayerInfo) -> Self {
        Self {
            api: layer.api.clone(),
            info: layer.module_info(id, version),
            stacks: layer.stacks.clone(),
            order: layer.order.clone(),
        }
    }

    /// Whether this buildpack is a composite (has an order).
    pub fn is_composite(&self) -> bool {
        !self.order.is_empty()
    }
}

/// Descriptor of an image extension.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtensionDescriptor {
    pub api: String,
    pub info: ModuleInfo,
}

impl ExtensionDescriptor {
    /// Build the descriptor for a layer index entry.
    pub fn from_layer(id: &str, version: &str, layer: &ModuleLayerInfo) -> Self {
        Self {
            api: layer.api.clone(),
            info: layer.module_info(id, version),
        }
    }
}

/// Descriptor of any build module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Descriptor {
    Buildpack(BuildpackDescriptor),
    Extension(ExtensionDescriptor),
}

impl Descriptor {
    /// Kind of module this descriptor describes.
    pub fn kind(&self) -> ModuleKind {
        match self {
            Self::Buildpack(_) => ModuleKind::Buildpack,
            Self::Extension(_) => ModuleKind::Extension,
        }
    }

    /// Buildpack API version the module targets.
    pub fn api(&self) -> &str {
        match self {
            Self::Buildpack(d) => &d.api,
            Self::Extension(d) => &d.api,
        }
    }

    /// Get the module's identity.
    pub fn info(&self) -> &ModuleInfo {
        match self {
            Self::Buildpack(d) => &d.info,
            Self::Extension(d) => &d.info,
        }
    }

    /// The buildpack descriptor, if this is a buildpack.
    pub fn as_buildpack(&self) -> Option<&BuildpackDescriptor> {
        match self {
            Self::Buildpack(d) => Some(d),
            Self::Extension(_) => None,
        }
    }
}

impl From<BuildpackDescriptor> for Descriptor {
    fn from(desc: BuildpackDescriptor) -> Self {
        Self::Buildpack(desc)
    }
}

impl From<ExtensionDescriptor> for Descriptor {
    fn from(desc: ExtensionDescriptor) -> Self {
        Self::Extension(desc)
    }
}
