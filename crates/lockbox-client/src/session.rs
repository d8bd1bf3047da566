//! Session-scoped custom data and headers attached to every request.
//!
//! Created empty at client construction, grown by `set_*`, cleared only
//! by `reset_*`. Per-request data layered on top of this storage wins
//! on conflict (see the payload assembler).

use std::collections::HashMap;
use std::sync::Mutex;

use serde_json::{Map, Value};

#[derive(Default)]
struct SessionInner {
    custom_data: Map<String, Value>,
    custom_headers: HashMap<String, String>,
}

/// Process-lifetime key/value storage shared by every submission of one
/// transport client.
#[derive(Default)]
pub struct SessionStorage {
    inner: Mutex<SessionInner>,
}

impl SessionStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge `data` into the stored custom data, overwriting per key.
    pub fn set_custom_data(&self, data: Map<String, Value>) {
        self.lock().custom_data.extend(data);
    }

    pub fn reset_custom_data(&self) {
        self.lock().custom_data.clear();
    }

    /// Snapshot of the stored custom data.
    pub fn custom_data(&self) -> Map<String, Value> {
        self.lock().custom_data.clone()
    }

    /// Merge `headers` into the stored headers, overwriting per name.
    pub fn set_custom_headers(&self, headers: HashMap<String, String>) {
        self.lock().custom_headers.extend(headers);
    }

    pub fn reset_custom_headers(&self) {
        self.lock().custom_headers.clear();
    }

    /// Snapshot of the stored headers.
    pub fn custom_headers(&self) -> HashMap<String, String> {
        self.lock().custom_headers.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, SessionInner> {
        self.inner.lock().expect("session storage lock poisoned")
    }
}
