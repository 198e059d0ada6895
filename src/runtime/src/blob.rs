//! Lazily opened layer content.

use modpack_core::error::Result;

use crate::package::LayerReader;

/// Re-openable source of layer content.
pub trait Blob: Send + Sync {
    /// Open a fresh stream over the content.
    fn open(&self) -> Result<LayerReader>;
}

type Opener = dyn Fn() -> Result<LayerReader> + Send + Sync;

/// Blob backed by an opener function.
///
/// Nothing is read until [`Blob::open`] is called, and every call runs the
/// opener again; streams are never cached or shared between calls.
pub struct OpenerBlob {
    opener: Box<Opener>,
}

impl OpenerBlob {
    /// Wrap an opener. It is not called until the blob is opened.
    pub fn new<F>(opener: F) -> Self
    where
        F: Fn() -> Result<LayerReader> + Send + Sync + 'static,
    {
        Self {
            opener: Box::new(opener),
        }
    }
}

impl Blob for OpenerBlob {
    fn open(&self) -> Result<LayerReader> {
        (self.opener)()
    }
}

impl std::fmt::Debug for OpenerBlob {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenerBlob").finish_non_exhaustive()
    }
}
