//! Compiled-schema cache
//!
//! Schemas are keyed by a SHA-256 fingerprint of their compact JSON text.
//! Entries are never evicted or replaced; once the cache reaches capacity,
//! further schemas are compiled on every call.

use sha2::{Digest, Sha256};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::engine::{compile, CompiledSchema};
use crate::error::Result;

/// Fingerprint of a schema. Key order is significant since it determines
/// field evaluation order.
pub fn fingerprint(schema: &Value) -> String {
    let mut hasher = Sha256::new();
    hasher.update(schema.to_string().as_bytes());
    hex::encode(hasher.finalize())
}

/// Append-only cache of compiled schemas, safe for concurrent use
#[derive(Debug)]
pub struct SchemaCache {
    entries: RwLock<HashMap<String, Arc<CompiledSchema>>>,
    capacity: usize,
}

impl Default for SchemaCache {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAPACITY)
    }
}

impl SchemaCache {
    pub const DEFAULT_CAPACITY: usize = 1024;

    /// Create a cache holding at most `capacity` schemas (0 disables storage)
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Return the compiled form of `schema`, compiling it on a miss.
    ///
    /// Schema errors are returned as-is and never cached.
    pub fn get_or_compile(&self, schema: &Value) -> Result<Arc<CompiledSchema>> {
        let key = fingerprint(schema);

        if let Some(hit) = self
            .entries
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(&key)
        {
            tracing::trace!(fingerprint = %key, "Schema cache hit");
            return Ok(Arc::clone(hit));
        }

        let compiled = Arc::new(compile(schema)?);

        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        if let Some(existing) = entries.get(&key) {
            // Another caller compiled the same schema first
            return Ok(Arc::clone(existing));
        }
        if entries.len() < self.capacity {
            entries.insert(key.clone(), Arc::clone(&compiled));
            tracing::debug!(fingerprint = %key, entries = entries.len(), "Cached compiled schema");
        }

        Ok(compiled)
    }
}
