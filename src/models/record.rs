//! Record contract shared by everything persisted in the content store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A persisted record keyed by a string ID.
pub trait Record {
    /// Collection-unique identifier
    fn id(&self) -> &str;

    /// Creation timestamp
    fn created_at(&self) -> DateTime<Utc>;
}

/// Generates a fresh record ID.
#[must_use]
pub fn new_record_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Metadata for an uploaded file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileMetadata {
    /// Record ID
    pub id: String,
    /// Public URL of the stored file
    pub url: String,
    /// Stored file name
    pub file_name: String,
    /// Size in bytes
    pub file_size: u64,
    /// MIME type
    pub file_type: String,
    /// Upload time
    pub created_at: DateTime<Utc>,
}

impl Record for FileMetadata {
    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
