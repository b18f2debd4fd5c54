use bytes::Bytes;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// The Store holds the two in-memory namespaces: a flat string map and a
/// hash-of-hashes map. Each namespace is guarded by its own reader/writer
/// lock so reads against one never contend with writes against the other.
/// The store is designed to be shared and cloned cheaply using reference
/// counting.
#[derive(Clone)]
pub struct Store {
    inner: Arc<InnerStore>,
}

struct InnerStore {
    strings: RwLock<HashMap<String, Bytes>>,
    hashes: RwLock<HashMap<String, HashMap<String, Bytes>>>,
}

impl Store {
    pub fn new() -> Store {
        let inner = Arc::new(InnerStore {
            strings: RwLock::new(HashMap::new()),
            hashes: RwLock::new(HashMap::new()),
        });

        Self { inner }
    }

    pub fn set(&self, key: String, value: Bytes) {
        let mut strings = self.inner.strings.write().unwrap();
        strings.insert(key, value);
    }

    pub fn get(&self, key: &str) -> Option<Bytes> {
        let strings = self.inner.strings.read().unwrap();
        strings.get(key).cloned()
    }

    pub fn hset(&self, hash: String, field: String, value: Bytes) {
        let mut hashes = self.inner.hashes.write().unwrap();
        hashes.entry(hash).or_default().insert(field, value);
    }

    pub fn hget(&self, hash: &str, field: &str) -> Option<Bytes> {
        let hashes = self.inner.hashes.read().unwrap();
        hashes.get(hash).and_then(|h| h.get(field)).cloned()
    }

    /// Returns all field/value pairs of the hash, or `None` if the hash does
    /// not exist. Pair order follows the inner map's iteration order, which
    /// is not stable across calls.
    pub fn hgetall(&self, hash: &str) -> Option<Vec<(String, Bytes)>> {
        let hashes = self.inner.hashes.read().unwrap();
        hashes.get(hash).map(|h| {
            h.iter()
                .map(|(field, value)| (field.clone(), value.clone()))
                .collect()
        })
    }

    /// Removes each key from both namespaces and returns the number of
    /// removals. A key present in both namespaces counts twice.
    ///
    /// The two locks are taken sequentially, never nested.
    pub fn del(&self, keys: &[String]) -> i64 {
        let mut count = 0;

        {
            let mut strings = self.inner.strings.write().unwrap();
            for key in keys {
                if strings.remove(key).is_some() {
                    count += 1;
                }
            }
        }

        {
            let mut hashes = self.inner.hashes.write().unwrap();
            for key in keys {
                if hashes.remove(key).is_some() {
                    count += 1;
                }
            }
        }

        count
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}
