//! Streaming digest verification for layer content.

use std::io::{self, Read};

use modpack_core::error::ModpackError;
use sha2::{Digest, Sha256};

/// Reader that hashes everything read through it and checks the result
/// against an expected `sha256:<hex>` digest once the inner reader is exhausted.
///
/// A mismatch is reported as an `InvalidData` I/O error wrapping
/// [`ModpackError::DigestMismatch`] from the final `read` call.
pub struct DigestReader<R> {
    inner: R,
    hasher: Sha256,
    expected: String,
    verified: bool,
}

impl<R: Read> DigestReader<R> {
    pub fn new(inner: R, expected: impl Into<String>) -> Self {
        Self {
            inner,
            hasher: Sha256::new(),
            expected: expected.into(),
            verified: false,
        }
    }

    fn verify(&mut self) -> io::Result<()> {
        self.verified = true;
        let actual = format!("sha256:{}", hex::encode(self.hasher.finalize_reset()));
        if actual != self.expected {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                ModpackError::DigestMismatch {
                    expected: self.expected.clone(),
                    actual,
                },
            ));
        }
        tracing::trace!(digest = %self.expected, "Layer digest verified");
        Ok(())
    }
}

impl<R: Read> Read for DigestReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        if n > 0 {
            self.hasher.update(&buf[..n]);
        } else if !buf.is_empty() && !self.verified {
            self.verify()?;
        }
        Ok(n)
    }
}

/// Whether `digest` is a sha256 digest this module can verify.
pub fn is_sha256(digest: &str) -> bool {
    digest
        .strip_prefix("sha256:")
        .is_some_and(|hex| hex.len() == 64 && hex.bytes().all(|b| b.is_ascii_hexdigit()))
}

/// `sha256:<hex>` digest of raw bytes.
pub fn sha256_digest(data: &[u8]) -> String {
    format!("sha256:{}", hex::encode(Sha256::digest(data)))
}
