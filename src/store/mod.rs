//! Remote content store abstraction.
//!
//! Everything the admin panel persists lives in collections of JSON records
//! addressed by a slash-separated path (`hero-images`, `collection-items`)
//! and a string ID. Callers receive the store as an injected
//! `Arc<dyn ContentStore>` so tests can swap in [`MemoryStore`].

pub mod file;
pub mod media;
pub mod memory;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::warn;

pub use file::JsonFileStore;
pub use media::{FsMediaStore, MediaStore, StoredFile};
pub use memory::MemoryStore;

use crate::models::Record;

/// Rejections callers may want to branch on.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    /// Collection path is empty or escapes the store root
    #[error("invalid collection path '{0}'")]
    InvalidPath(String),
    /// Update targeted a record that does not exist
    #[error("record '{id}' not found in '{path}'")]
    RecordNotFound {
        /// Collection path
        path: String,
        /// Record ID
        id: String,
    },
    /// Record or patch is not a JSON object
    #[error("record '{0}' must be a JSON object")]
    NotAnObject(String),
}

/// A keyed document store.
///
/// Records are JSON objects. The store injects the record's key as `id` when
/// loading, mirroring hosted realtime databases that keep the key outside
/// the value.
pub trait ContentStore: Send + Sync {
    /// Loads every record in a collection, newest `createdAt` first.
    fn load_collection(&self, path: &str) -> Result<Vec<Value>>;

    /// Loads one record.
    fn get_record(&self, path: &str, id: &str) -> Result<Option<Value>>;

    /// Creates or fully replaces a record.
    fn save_record(&self, path: &str, id: &str, record: &Value) -> Result<()>;

    /// Merges the top-level fields of `patch` into an existing record and
    /// returns the merged record.
    fn update_record(&self, path: &str, id: &str, patch: &Value) -> Result<Value>;

    /// Removes a record. Removing a missing record is not an error.
    fn delete_record(&self, path: &str, id: &str) -> Result<()>;
}

/// Loads and deserializes a collection, skipping records that do not parse.
pub fn load_records<T: DeserializeOwned>(store: &dyn ContentStore, path: &str) -> Result<Vec<T>> {
    let records = store.load_collection(path)?;
    let mut typed = Vec::with_capacity(records.len());

    for record in records {
        let id = record
            .get("id")
            .and_then(Value::as_str)
            .unwrap_or("<unknown>")
            .to_string();
        match serde_json::from_value(record) {
            Ok(value) => typed.push(value),
            Err(e) => warn!(path, id = %id, error = %e, "skipping unreadable record"),
        }
    }

    Ok(typed)
}

/// Loads and deserializes one record.
pub fn get_typed<T: DeserializeOwned>(
    store: &dyn ContentStore,
    path: &str,
    id: &str,
) -> Result<Option<T>> {
    store
        .get_record(path, id)?
        .map(|value| {
            serde_json::from_value(value)
                .with_context(|| format!("Failed to parse record '{id}' in '{path}'"))
        })
        .transpose()
}

/// Serializes and saves a record under its own ID.
pub fn save_typed<T: Serialize + Record>(
    store: &dyn ContentStore,
    path: &str,
    record: &T,
) -> Result<()> {
    let value = serde_json::to_value(record)
        .with_context(|| format!("Failed to serialize record '{}'", record.id()))?;
    store.save_record(path, record.id(), &value)
}

/// Validates a collection path.
///
/// Segments may only contain ASCII letters, digits, `-` and `_`.
pub fn validate_path(path: &str) -> Result<(), StoreError> {
    let valid = !path.is_empty()
        && path.split('/').all(|segment| {
            !segment.is_empty()
                && segment
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        });

    if valid {
        Ok(())
    } else {
        Err(StoreError::InvalidPath(path.to_string()))
    }
}

/// Materializes a collection map as records sorted newest first.
pub(crate) fn sorted_records(collection: &Map<String, Value>) -> Vec<Value> {
    let mut records: Vec<Value> = collection
        .iter()
        .map(|(id, value)| with_id(id, value.clone()))
        .collect();

    records.sort_by(|a, b| created_at_key(b).cmp(&created_at_key(a)));
    records
}

/// Inserts the record key as `id`.
pub(crate) fn with_id(id: &str, mut value: Value) -> Value {
    if let Value::Object(map) = &mut value {
        map.insert("id".to_string(), Value::String(id.to_string()));
    }
    value
}

/// Merges `patch` into the record stored under `id`.
pub(crate) fn merge_into(
    collection: &mut Map<String, Value>,
    path: &str,
    id: &str,
    patch: &Value,
) -> Result<Value> {
    let Value::Object(fields) = patch else {
        return Err(StoreError::NotAnObject(id.to_string()).into());
    };

    let record = collection
        .get_mut(id)
        .ok_or_else(|| StoreError::RecordNotFound {
            path: path.to_string(),
            id: id.to_string(),
        })?;

    let Value::Object(existing) = record else {
        return Err(StoreError::NotAnObject(id.to_string()).into());
    };

    for (key, value) in fields {
        existing.insert(key.clone(), value.clone());
    }

    Ok(with_id(id, record.clone()))
}

pub(crate) fn ensure_object(id: &str, record: &Value) -> Result<(), StoreError> {
    if record.is_object() {
        Ok(())
    } else {
        Err(StoreError::NotAnObject(id.to_string()))
    }
}

fn created_at_key(record: &Value) -> Option<chrono::DateTime<chrono::Utc>> {
    record
        .get("createdAt")
        .and_then(Value::as_str)
        .and_then(|s| chrono::DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&chrono::Utc))
}
