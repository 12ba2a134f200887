//! Deferred full-payload storage.
//!
//! When an extractor runs with deferred payloads, records carry only their
//! thumbnail and the full payload waits here under the record id until it is
//! taken. Each payload can be taken exactly once.

use crate::images::Payload;
use parking_lot::Mutex;
use std::collections::HashMap;

/// Single-use payload holding area keyed by image id.
#[derive(Default)]
pub struct PayloadStore {
    entries: Mutex<HashMap<String, Payload>>,
}

impl PayloadStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hold `payload` for later retrieval under `id`.
    pub fn insert(&self, id: impl Into<String>, payload: Payload) {
        self.entries.lock().insert(id.into(), payload);
    }

    /// Remove and return the payload for `id`.
    pub fn take(&self, id: &str) -> Option<Payload> {
        self.entries.lock().remove(id)
    }

    #[inline]
    pub fn contains(&self, id: &str) -> bool {
        self.entries.lock().contains_key(id)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Drop every held payload.
    pub fn clear(&self) {
        self.entries.lock().clear();
    }
}

impl std::fmt::Debug for PayloadStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PayloadStore")
            .field("len", &self.len())
            .finish()
    }
}

// Shared across blocking extraction tasks
const _: () = {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<PayloadStore>();
};
