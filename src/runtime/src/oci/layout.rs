//! Buildpackages stored as OCI image layouts on disk.
//!
//! Labels come from the image configuration. Layers are addressed by their
//! diff ID (the digest of the uncompressed tar), which the configuration's
//! `rootfs.diff_ids` pairs by position with the manifest's layer blobs.

use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use flate2::read::GzDecoder;
use modpack_core::error::{ModpackError, Result};
use oci_spec::image::{ImageConfiguration, ImageIndex, ImageManifest};

use super::digest::{is_sha256, DigestReader};
use crate::package::{LayerReader, Package};

/// A layer blob in the layout.
#[derive(Debug, Clone)]
struct LayerBlob {
    path: PathBuf,
    media_type: String,
}

impl LayerBlob {
    fn is_gzip(&self) -> bool {
        self.media_type.ends_with("gzip")
    }

    fn is_zstd(&self) -> bool {
        self.media_type.ends_with("zstd")
    }
}

/// A buildpackage loaded from an OCI image layout directory.
#[derive(Debug)]
pub struct OciLayoutPackage {
    /// Root directory of the OCI image layout
    root_dir: PathBuf,

    /// Image labels
    labels: HashMap<String, String>,

    /// Layer blobs keyed by diff ID
    layers: HashMap<String, LayerBlob>,
}

impl OciLayoutPackage {
    /// Load a package from a directory.
    ///
    /// The directory must contain a valid OCI image layout:
    /// - oci-layout file
    /// - index.json
    /// - blobs/<algorithm>/ directory with manifest, config, and layers
    ///
    /// Layer blobs are located but not read.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let root_dir = path.as_ref().to_path_buf();

        Self::validate_oci_layout(&root_dir)?;

        let index = Self::load_index(&root_dir)?;
        let manifest_digest = index
            .manifests()
            .first()
            .ok_or_else(|| ModpackError::OciImageError("No manifests in index.json".to_string()))?
            .digest()
            .to_string();

        let manifest = Self::load_manifest(&root_dir, &manifest_digest)?;
        let config = Self::load_config(&root_dir, manifest.config().digest())?;

        let diff_ids = config.rootfs().diff_ids();
        if diff_ids.len() != manifest.layers().len() {
            return Err(ModpackError::OciImageError(format!(
                "Config lists {} diff IDs but manifest has {} layers",
                diff_ids.len(),
                manifest.layers().len()
            )));
        }

        let layers = diff_ids
            .iter()
            .zip(manifest.layers())
            .map(|(diff_id, layer)| {
                let blob = LayerBlob {
                    path: Self::blob_path(&root_dir, layer.digest()),
                    media_type: layer.media_type().to_string(),
                };
                (diff_id.clone(), blob)
            })
            .collect::<HashMap<_, _>>();

        let labels = config
            .config()
            .as_ref()
            .and_then(|c| c.labels().clone())
            .unwrap_or_default();

        tracing::debug!(
            path = %root_dir.display(),
            manifest = %manifest_digest,
            layers = layers.len(),
            labels = labels.len(),
            "Loaded OCI layout package"
        );

        Ok(Self {
            root_dir,
            labels,
            layers,
        })
    }

    /// Get the root directory of the layout.
    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    /// Get all image labels.
    pub fn labels(&self) -> &HashMap<String, String> {
        &self.labels
    }

    /// Number of layers in the image.
    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// Validate that the directory contains a valid OCI layout.
    fn validate_oci_layout(root_dir: &Path) -> Result<()> {
        for required in ["oci-layout", "index.json", "blobs"] {
            if !root_dir.join(required).exists() {
                return Err(ModpackError::OciImageError(format!(
                    "Not a valid OCI layout: missing {} in {}",
                    required,
                    root_dir.display()
                )));
            }
        }
        Ok(())
    }

    fn load_index(root_dir: &Path) -> Result<ImageIndex> {
        let index_path = root_dir.join("index.json");
        let content = std::fs::read_to_string(&index_path).map_err(|e| {
            ModpackError::OciImageError(format!(
                "Failed to read index.json at {}: {}",
                index_path.display(),
                e
            ))
        })?;

        serde_json::from_str(&content)
            .map_err(|e| ModpackError::OciImageError(format!("Failed to parse index.json: {}", e)))
    }

    fn load_manifest(root_dir: &Path, digest: &str) -> Result<ImageManifest> {
        let content = Self::read_blob(root_dir, digest, "manifest")?;
        serde_json::from_str(&content)
            .map_err(|e| ModpackError::OciImageError(format!("Failed to parse manifest: {}", e)))
    }

    fn load_config(root_dir: &Path, digest: &str) -> Result<ImageConfiguration> {
        let content = Self::read_blob(root_dir, digest, "config")?;
        serde_json::from_str(&content)
            .map_err(|e| ModpackError::OciImageError(format!("Failed to parse config: {}", e)))
    }

    fn read_blob(root_dir: &Path, digest: &str, what: &str) -> Result<String> {
        let blob_path = Self::blob_path(root_dir, digest);
        std::fs::read_to_string(&blob_path).map_err(|e| {
            ModpackError::OciImageError(format!(
                "Failed to read {} at {}: {}",
                what,
                blob_path.display(),
                e
            ))
        })
    }

    /// Get the path to a blob by digest.
    fn blob_path(root_dir: &Path, digest: &str) -> PathBuf {
        // Digest format: "sha256:abc123..."
        let (algorithm, hash) = digest.split_once(':').unwrap_or(("sha256", digest));
        root_dir.join("blobs").join(algorithm).join(hash)
    }
}

impl Package for OciLayoutPackage {
    fn label(&self, name: &str) -> Result<Option<String>> {
        Ok(self.labels.get(name).cloned())
    }

    fn get_layer(&self, diff_id: &str) -> Result<LayerReader> {
        let blob = self
            .layers
            .get(diff_id)
            .ok_or_else(|| ModpackError::LayerNotFound(diff_id.to_string()))?;

        if blob.is_zstd() {
            return Err(ModpackError::OciImageError(format!(
                "Unsupported layer media type {}",
                blob.media_type
            )));
        }

        let file = File::open(&blob.path).map_err(|e| {
            ModpackError::OciImageError(format!(
                "Failed to open layer blob {}: {}",
                blob.path.display(),
                e
            ))
        })?;
        let file = BufReader::new(file);

        let uncompressed: LayerReader = if blob.is_gzip() {
            Box::new(GzDecoder::new(file))
        } else {
            Box::new(file)
        };

        tracing::debug!(
            diff_id,
            blob = %blob.path.display(),
            media_type = %blob.media_type,
            "Opened layer"
        );

        if is_sha256(diff_id) {
            Ok(Box::new(DigestReader::new(uncompressed, diff_id)))
        } else {
            Ok(uncompressed)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oci::testing::{create_layout, tar_bytes, TestLayer};
    use std::fs;
    use std::io::Read;
    use tempfile::TempDir;

    #[test]
    fn test_validate_oci_layout_missing_oci_layout_file() {
        let temp_dir = TempDir::new().unwrap();

        let err = OciLayoutPackage::validate_oci_layout(temp_dir.path()).unwrap_err();

        assert!(err.to_string().contains("oci-layout"));
    }

    #[test]
    fn test_validate_oci_layout_missing_index_json() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(
            temp_dir.path().join("oci-layout"),
            r#"{"imageLayoutVersion":"1.0.0"}"#,
        )
        .unwrap();

        let err = OciLayoutPackage::validate_oci_layout(temp_dir.path()).unwrap_err();

        assert!(err.to_string().contains("index.json"));
    }

    #[test]
    fn test_validate_oci_layout_missing_blobs() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(
            temp_dir.path().join("oci-layout"),
            r#"{"imageLayoutVersion":"1.0.0"}"#,
        )
        .unwrap();
        fs::write(temp_dir.path().join("index.json"), "{}").unwrap();

        let err = OciLayoutPackage::validate_oci_layout(temp_dir.path()).unwrap_err();

        assert!(err.to_string().contains("blobs"));
    }

    #[test]
    fn test_blob_path() {
        let root = PathBuf::from("/images/test");

        let path = OciLayoutPackage::blob_path(&root, "sha256:abc123");
        assert_eq!(path, PathBuf::from("/images/test/blobs/sha256/abc123"));

        let path = OciLayoutPackage::blob_path(&root, "abc123");
        assert_eq!(path, PathBuf::from("/images/test/blobs/sha256/abc123"));
    }

    #[test]
    fn test_from_path_nonexistent() {
        assert!(OciLayoutPackage::from_path("/nonexistent/path").is_err());
    }

    #[test]
    fn test_labels_from_config() {
        let temp_dir = TempDir::new().unwrap();
        let labels = [("io.buildpacks.buildpack.layers", "{}"), ("other", "x")];
        create_layout(temp_dir.path(), &labels, &[]);

        let pkg = OciLayoutPackage::from_path(temp_dir.path()).unwrap();

        assert_eq!(pkg.label("io.buildpacks.buildpack.layers").unwrap().as_deref(), Some("{}"));
        assert_eq!(pkg.label("missing").unwrap(), None);
        assert_eq!(pkg.labels().len(), 2);
        assert_eq!(pkg.layer_count(), 0);
    }

    #[test]
    fn test_get_layer_gzip_by_diff_id() {
        let temp_dir = TempDir::new().unwrap();
        let tar = tar_bytes(&[("cnb/buildpacks/a/1.0/bin/build", b"#!/bin/sh\n")]);
        let layer = TestLayer::gzip(&tar);
        let diff_id = layer.diff_id.clone();
        create_layout(temp_dir.path(), &[], &[layer]);

        let pkg = OciLayoutPackage::from_path(temp_dir.path()).unwrap();

        let mut content = Vec::new();
        pkg.get_layer(&diff_id).unwrap().read_to_end(&mut content).unwrap();
        assert_eq!(content, tar);
    }

    #[test]
    fn test_get_layer_uncompressed() {
        let temp_dir = TempDir::new().unwrap();
        let tar = tar_bytes(&[("file.txt", b"hello")]);
        let layer = TestLayer::plain(&tar);
        let diff_id = layer.diff_id.clone();
        create_layout(temp_dir.path(), &[], &[layer]);

        let pkg = OciLayoutPackage::from_path(temp_dir.path()).unwrap();

        let mut content = Vec::new();
        pkg.get_layer(&diff_id).unwrap().read_to_end(&mut content).unwrap();
        assert_eq!(content, tar);
    }

    #[test]
    fn test_get_layer_unknown_diff_id() {
        let temp_dir = TempDir::new().unwrap();
        create_layout(temp_dir.path(), &[], &[]);

        let pkg = OciLayoutPackage::from_path(temp_dir.path()).unwrap();

        let err = pkg.get_layer("sha256:nope").err().unwrap();
        assert!(matches!(err, ModpackError::LayerNotFound(ref d) if d == "sha256:nope"));
    }

    #[test]
    fn test_get_layer_detects_corrupt_content() {
        let temp_dir = TempDir::new().unwrap();
        let mut layer = TestLayer::plain(&tar_bytes(&[("file.txt", b"hello")]));
        // Claim the content of a different tar
        layer.diff_id = crate::oci::digest::sha256_digest(b"different");
        let diff_id = layer.diff_id.clone();
        create_layout(temp_dir.path(), &[], &[layer]);

        let pkg = OciLayoutPackage::from_path(temp_dir.path()).unwrap();

        let err = pkg
            .get_layer(&diff_id)
            .unwrap()
            .read_to_end(&mut Vec::new())
            .unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::InvalidData);
    }

    #[test]
    fn test_each_get_layer_is_a_fresh_stream() {
        let temp_dir = TempDir::new().unwrap();
        let tar = tar_bytes(&[("file.txt", b"hello")]);
        let layer = TestLayer::gzip(&tar);
        let diff_id = layer.diff_id.clone();
        create_layout(temp_dir.path(), &[], &[layer]);

        let pkg = OciLayoutPackage::from_path(temp_dir.path()).unwrap();

        for _ in 0..2 {
            let mut content = Vec::new();
            pkg.get_layer(&diff_id).unwrap().read_to_end(&mut content).unwrap();
            assert_eq!(content, tar);
        }
    }
}
