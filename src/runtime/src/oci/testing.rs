//! OCI layout fixtures for unit tests.

use std::fs;
use std::io::Write;
use std::path::Path;

use flate2::write::GzEncoder;
use flate2::Compression;

use super::digest::sha256_digest;

pub(crate) struct TestLayer {
    pub blob: Vec<u8>,
    pub diff_id: String,
    pub media_type: &'static str,
}

impl TestLayer {
    pub(crate) fn gzip(tar: &[u8]) -> Self {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(tar).unwrap();
        Self {
            blob: encoder.finish().unwrap(),
            diff_id: sha256_digest(tar),
            media_type: "application/vnd.oci.image.layer.v1.tar+gzip",
        }
    }

    pub(crate) fn plain(tar: &[u8]) -> Self {
        Self {
            blob: tar.to_vec(),
            diff_id: sha256_digest(tar),
            media_type: "application/vnd.oci.image.layer.v1.tar",
        }
    }
}

/// Build an uncompressed tar archive from `(path, content)` pairs.
pub(crate) fn tar_bytes(files: &[(&str, &[u8])]) -> Vec<u8> {
    let mut builder = tar::Builder::new(Vec::new());
    for (name, content) in files {
        let mut header = tar::Header::new_gnu();
        header.set_size(content.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();
        builder.append_data(&mut header, name, *content).unwrap();
    }
    builder.into_inner().unwrap()
}

fn write_blob(root: &Path, data: &[u8]) -> String {
    let digest = sha256_digest(data);
    let hash = digest.trim_start_matches("sha256:");
    fs::write(root.join("blobs/sha256").join(hash), data).unwrap();
    digest
}

/// Write a single-manifest OCI image layout with the given labels and layers.
pub(crate) fn create_layout(root: &Path, labels: &[(&str, &str)], layers: &[TestLayer]) {
    fs::create_dir_all(root.join("blobs/sha256")).unwrap();
    fs::write(root.join("oci-layout"), r#"{"imageLayoutVersion":"1.0.0"}"#).unwrap();

    let labels: serde_json::Map<String, serde_json::Value> = labels
        .iter()
        .map(|(k, v)| (k.to_string(), serde_json::Value::String(v.to_string())))
        .collect();
    let diff_ids: Vec<&str> = layers.iter().map(|l| l.diff_id.as_str()).collect();

    let config = serde_json::to_vec(&serde_json::json!({
        "architecture": "amd64",
        "os": "linux",
        "config": { "Labels": labels },
        "rootfs": { "type": "layers", "diff_ids": diff_ids },
        "history": []
    }))
    .unwrap();
    let config_digest = write_blob(root, &config);

    let layer_descriptors: Vec<serde_json::Value> = layers
        .iter()
        .map(|layer| {
            let digest = write_blob(root, &layer.blob);
            serde_json::json!({
                "mediaType": layer.media_type,
                "digest": digest,
                "size": layer.blob.len()
            })
        })
        .collect();

    let manifest = serde_json::to_vec(&serde_json::json!({
        "schemaVersion": 2,
        "mediaType": "application/vnd.oci.image.manifest.v1+json",
        "config": {
            "mediaType": "application/vnd.oci.image.config.v1+json",
            "digest": config_digest,
            "size": config.len()
        },
        "layers": layer_descriptors
    }))
    .unwrap();
    let manifest_digest = write_blob(root, &manifest);

    let index = serde_json::json!({
        "schemaVersion": 2,
        "mediaType": "application/vnd.oci.image.index.v1+json",
        "manifests": [{
            "mediaType": "application/vnd.oci.image.manifest.v1+json",
            "digest": manifest_digest,
            "size": manifest.len()
        }]
    });
    fs::write(root.join("index.json"), serde_json::to_vec(&index).unwrap()).unwrap();
}
