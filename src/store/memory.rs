//! In-process content store for tests and previews.

use std::collections::HashMap;
use std::sync::Mutex;

use anyhow::{anyhow, Result};
use serde_json::{Map, Value};

use super::{ensure_object, merge_into, sorted_records, validate_path, with_id, ContentStore};

/// Content store that keeps everything in memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: Mutex<HashMap<String, Map<String, Value>>>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn with_collections<R>(
        &self,
        path: &str,
        f: impl FnOnce(&mut HashMap<String, Map<String, Value>>) -> Result<R>,
    ) -> Result<R> {
        validate_path(path)?;
        let mut collections = self
            .collections
            .lock()
            .map_err(|_| anyhow!("Content store lock poisoned"))?;
        f(&mut collections)
    }
}

impl ContentStore for MemoryStore {
    fn load_collection(&self, path: &str) -> Result<Vec<Value>> {
        self.with_collections(path, |collections| {
            Ok(collections.get(path).map(sorted_records).unwrap_or_default())
        })
    }

    fn get_record(&self, path: &str, id: &str) -> Result<Option<Value>> {
        self.with_collections(path, |collections| {
            Ok(collections
                .get(path)
                .and_then(|collection| collection.get(id))
                .map(|value| with_id(id, value.clone())))
        })
    }

    fn save_record(&self, path: &str, id: &str, record: &Value) -> Result<()> {
        ensure_object(id, record)?;
        self.with_collections(path, |collections| {
            collections
                .entry(path.to_string())
                .or_default()
                .insert(id.to_string(), record.clone());
            Ok(())
        })
    }

    fn update_record(&self, path: &str, id: &str, patch: &Value) -> Result<Value> {
        self.with_collections(path, |collections| {
            let collection = collections.entry(path.to_string()).or_default();
            merge_into(collection, path, id, patch)
        })
    }

    fn delete_record(&self, path: &str, id: &str) -> Result<()> {
        self.with_collections(path, |collections| {
            if let Some(collection) = collections.get_mut(path) {
                collection.remove(id);
            }
            Ok(())
        })
    }
}
