//! JSON-file backed content store.
//!
//! Each collection is a single `<root>/<path>.json` file holding an object
//! that maps record IDs to records. Writes go through a temp file + rename so
//! a collection file is never left half-written.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{anyhow, Context, Result};
use serde_json::{Map, Value};
use tracing::debug;

use super::{ensure_object, merge_into, sorted_records, validate_path, with_id, ContentStore};

/// Content store persisting collections as JSON files under a root directory.
#[derive(Debug)]
pub struct JsonFileStore {
    root: PathBuf,
    // Serializes read-modify-write cycles within this process
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    /// Opens (and creates, if needed) a store rooted at `root`.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)
            .with_context(|| format!("Failed to create store directory: {}", root.display()))?;
        Ok(Self {
            root,
            write_lock: Mutex::new(()),
        })
    }

    /// Store root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn collection_file(&self, path: &str) -> Result<PathBuf> {
        validate_path(path)?;
        Ok(self.root.join(format!("{path}.json")))
    }

    fn read_collection(&self, path: &str) -> Result<Map<String, Value>> {
        let file = self.collection_file(path)?;
        if !file.exists() {
            return Ok(Map::new());
        }

        let content = fs::read_to_string(&file)
            .with_context(|| format!("Failed to read collection file: {}", file.display()))?;
        if content.trim().is_empty() {
            return Ok(Map::new());
        }

        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse collection file: {}", file.display()))
    }

    fn write_collection(&self, path: &str, collection: &Map<String, Value>) -> Result<()> {
        let file = self.collection_file(path)?;
        if let Some(parent) = file.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let content =
            serde_json::to_string_pretty(collection).context("Failed to serialize collection")?;
        let temp_path = file.with_extension("json.tmp");

        fs::write(&temp_path, content).with_context(|| {
            format!("Failed to write temp collection file: {}", temp_path.display())
        })?;
        fs::rename(&temp_path, &file).with_context(|| {
            format!("Failed to rename temp collection file to: {}", file.display())
        })?;

        Ok(())
    }

    fn modify<R>(
        &self,
        path: &str,
        f: impl FnOnce(&mut Map<String, Value>) -> Result<R>,
    ) -> Result<R> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| anyhow!("Content store lock poisoned"))?;

        let mut collection = self.read_collection(path)?;
        let result = f(&mut collection)?;
        self.write_collection(path, &collection)?;
        Ok(result)
    }
}

impl ContentStore for JsonFileStore {
    fn load_collection(&self, path: &str) -> Result<Vec<Value>> {
        let collection = self.read_collection(path)?;
        debug!(path, count = collection.len(), "loaded collection");
        Ok(sorted_records(&collection))
    }

    fn get_record(&self, path: &str, id: &str) -> Result<Option<Value>> {
        let collection = self.read_collection(path)?;
        Ok(collection.get(id).map(|value| with_id(id, value.clone())))
    }

    fn save_record(&self, path: &str, id: &str, record: &Value) -> Result<()> {
        ensure_object(id, record)?;
        self.modify(path, |collection| {
            collection.insert(id.to_string(), record.clone());
            Ok(())
        })
    }

    fn update_record(&self, path: &str, id: &str, patch: &Value) -> Result<Value> {
        self.modify(path, |collection| merge_into(collection, path, id, patch))
    }

    fn delete_record(&self, path: &str, id: &str) -> Result<()> {
        self.modify(path, |collection| {
            collection.remove(id);
            Ok(())
        })
    }
}
