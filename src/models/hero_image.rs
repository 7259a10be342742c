//! Homepage hero images.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{FileMetadata, Record};

/// An image shown in the homepage hero rotation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeroImage {
    /// Stored file details
    #[serde(flatten)]
    pub file: FileMetadata,
    /// Display title
    pub title: String,
    /// 1-based display order
    pub order: u32,
}

impl Record for HeroImage {
    fn id(&self) -> &str {
        &self.file.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.file.created_at
    }
}
