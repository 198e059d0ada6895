//! Package abstraction and label decoding.

use std::io::Read;

use modpack_core::error::{ModpackError, Result};
use serde::de::DeserializeOwned;

/// Readable layer content returned by a package.
pub type LayerReader = Box<dyn Read + Send>;

/// An image-like artifact carrying labels and content-addressed layers.
///
/// Implementations must be safe to share across threads; extracted modules
/// keep a handle to their package and may be opened from any thread.
pub trait Package: Send + Sync {
    /// Raw value of a label, or `None` when the label is not set.
    fn label(&self, name: &str) -> Result<Option<String>>;

    /// Open the layer whose uncompressed digest is `diff_id`.
    ///
    /// Each call returns a fresh stream owned by the caller.
    fn get_layer(&self, diff_id: &str) -> Result<LayerReader>;
}

/// Decode a JSON label into `T`.
///
/// Returns `Ok(None)` when the label is absent or empty, an
/// [`ModpackError::LabelDecode`] when it is present but malformed, and the
/// package's own error when the label cannot be read.
pub fn get_label<T: DeserializeOwned>(pkg: &dyn Package, name: &str) -> Result<Option<T>> {
    let raw = match pkg.label(name)? {
        Some(raw) if !raw.is_empty() => raw,
        _ => {
            tracing::debug!(label = name, "Label not set");
            return Ok(None);
        }
    };

    let value = serde_json::from_str(&raw).map_err(|source| ModpackError::LabelDecode {
        label: name.to_string(),
        source,
    })?;

    tracing::debug!(label = name, bytes = raw.len(), "Decoded label");
    Ok(Some(value))
}

/// Decode a JSON label that must be present.
pub fn require_label<T: DeserializeOwned>(pkg: &dyn Package, name: &str) -> Result<T> {
    get_label(pkg, name)?.ok_or_else(|| ModpackError::LabelNotFound(name.to_string()))
}
