//! Unpacking build module layers onto disk.

use std::io::{self, Read};
use std::path::Path;

use modpack_core::config::UnpackConfig;
use modpack_core::error::{ModpackError, Result};
use tar::Archive;

use crate::module::BuildModule;

/// Unpack a module's layer (an uncompressed tar stream) into `target_dir`.
///
/// # Errors
///
/// Returns error if:
/// - The target directory cannot be created
/// - The module's layer cannot be opened
/// - Extraction fails
/// - The layer content does not match its digest
pub fn unpack_module(module: &BuildModule, target_dir: &Path, config: &UnpackConfig) -> Result<()> {
    std::fs::create_dir_all(target_dir).map_err(|e| {
        ModpackError::Other(format!(
            "Failed to create target directory {}: {}",
            target_dir.display(),
            e
        ))
    })?;

    let reader = module.open()?;

    let mut archive = Archive::new(reader);
    archive.set_preserve_permissions(config.preserve_permissions);
    archive.set_overwrite(config.overwrite);
    archive.unpack(target_dir).map_err(|e| {
        ModpackError::Other(format!(
            "Failed to unpack {} '{}' to {}: {}",
            module.kind(),
            module.info(),
            target_dir.display(),
            e
        ))
    })?;

    // The archive stops at the end-of-archive marker; reading the remainder
    // lets digest-checking readers reach EOF.
    drain(archive.into_inner()).map_err(|e| layer_read_error(module, e))?;

    tracing::debug!(
        module = %module.info(),
        kind = %module.kind(),
        target = %target_dir.display(),
        "Unpacked module layer"
    );

    Ok(())
}

fn drain(mut reader: impl Read) -> io::Result<u64> {
    io::copy(&mut reader, &mut io::sink())
}

/// Surface a [`ModpackError`] carried inside an I/O error, such as a digest mismatch.
fn layer_read_error(module: &BuildModule, err: io::Error) -> ModpackError {
    let message = err.to_string();
    match err.into_inner().map(|inner| inner.downcast::<ModpackError>()) {
        Some(Ok(inner)) => *inner,
        _ => ModpackError::Other(format!(
            "Failed to read {} '{}' layer: {}",
            module.kind(),
            module.info(),
            message
        )),
    }
}

/// Unpack several modules into the same directory, in order.
///
/// Stops at the first failure. Returns the number of modules unpacked.
pub fn unpack_modules<'a>(
    modules: impl IntoIterator<Item = &'a BuildModule>,
    target_dir: &Path,
    config: &UnpackConfig,
) -> Result<usize> {
    let mut count = 0;
    for module in modules {
        unpack_module(module, target_dir, config)?;
        count += 1;
    }
    Ok(count)
}
