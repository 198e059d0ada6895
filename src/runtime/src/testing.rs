//! In-memory package used by unit tests.

use std::collections::HashMap;
use std::io::Cursor;
use std::sync::atomic::{AtomicUsize, Ordering};

use modpack_core::error::{ModpackError, Result};

use crate::package::{LayerReader, Package};

#[derive(Default)]
pub(crate) struct FakePackage {
    labels: HashMap<String, String>,
    layers: HashMap<String, Vec<u8>>,
    label_error: bool,
    layer_calls: AtomicUsize,
}

impl FakePackage {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_label(mut self, name: &str, value: &str) -> Self {
        self.labels.insert(name.to_string(), value.to_string());
        self
    }

    pub(crate) fn with_json_label<T: serde::Serialize>(self, name: &str, value: &T) -> Self {
        let json = serde_json::to_string(value).unwrap();
        self.with_label(name, &json)
    }

    pub(crate) fn with_label_error(mut self) -> Self {
        self.label_error = true;
        self
    }

    pub(crate) fn with_layer(mut self, diff_id: &str, content: &[u8]) -> Self {
        self.layers.insert(diff_id.to_string(), content.to_vec());
        self
    }

    pub(crate) fn layer_calls(&self) -> usize {
        self.layer_calls.load(Ordering::SeqCst)
    }
}

impl Package for FakePackage {
    fn label(&self, name: &str) -> Result<Option<String>> {
        if self.label_error {
            return Err(
                std::io::Error::new(std::io::ErrorKind::BrokenPipe, "label read failed").into(),
            );
        }
        Ok(self.labels.get(name).cloned())
    }

    fn get_layer(&self, diff_id: &str) -> Result<LayerReader> {
        self.layer_calls.fetch_add(1, Ordering::SeqCst);
        let content = self
            .layers
            .get(diff_id)
            .ok_or_else(|| ModpackError::LayerNotFound(diff_id.to_string()))?;
        Ok(Box::new(Cursor::new(content.clone())))
    }
}
