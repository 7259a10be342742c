//! Service layer for the admin panel.
//!
//! Services own the business rules around uploads, categories and sessions
//! and talk to persistence only through the injected [`ContentStore`] and
//! [`MediaStore`] handles.
//!
//! [`ContentStore`]: crate::store::ContentStore
//! [`MediaStore`]: crate::store::MediaStore

pub mod auth;
pub mod collections;
pub mod hero_images;
pub mod validator;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::Config;
use crate::constants::{MEDIA_DIR, RECORDS_DIR, SESSION_FILE};
use crate::store::{ContentStore, FsMediaStore, JsonFileStore, MediaStore};

// Re-export commonly used types and functions
pub use auth::{AdminCredentials, AuthError, AuthGate, FileTokenStore, MemoryTokenStore, TokenStore};
pub use collections::CollectionService;
pub use hero_images::HeroImageService;
pub use validator::{
    format_file_size, FileRejection, FileValidator, UploadedFile, Validation,
    DEFAULT_MAX_UPLOAD_BYTES,
};

/// A caller-supplied value broke a business rule (empty title, duplicate
/// slug, ...).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{0}")]
pub struct InvalidInput(String);

impl InvalidInput {
    /// Wraps a human-readable message.
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Every admin service wired to one data directory.
#[derive(Clone)]
pub struct AdminServices {
    /// Hero image management
    pub hero_images: HeroImageService,
    /// Categories and gallery items
    pub collections: CollectionService,
    /// Admin sessions
    pub auth: AuthGate,
    /// Directory uploaded media is written to
    pub media_root: PathBuf,
}

impl AdminServices {
    /// Opens the JSON record store, media store and session file under
    /// `data_dir` using the upload rules and credentials from `config`.
    pub fn open(config: &Config, data_dir: &Path) -> Result<Self> {
        let store: Arc<dyn ContentStore> = Arc::new(
            JsonFileStore::open(data_dir.join(RECORDS_DIR))
                .context("Failed to open record store")?,
        );
        let media_root = data_dir.join(MEDIA_DIR);
        let media: Arc<dyn MediaStore> = Arc::new(
            FsMediaStore::open(&media_root).context("Failed to open media store")?,
        );
        let tokens: Arc<dyn TokenStore> = Arc::new(FileTokenStore::new(data_dir.join(SESSION_FILE)));

        let credentials = config.admin_credentials();
        if credentials.is_none() {
            warn!("admin credentials are not configured; logins will be refused");
        }
        debug!(data_dir = %data_dir.display(), "opened admin services");

        Ok(Self::with_stores(
            store,
            media,
            AuthGate::new(credentials, tokens),
            config.file_validator(),
            media_root,
        ))
    }

    /// Wires services over explicit store handles.
    pub fn with_stores(
        store: Arc<dyn ContentStore>,
        media: Arc<dyn MediaStore>,
        auth: AuthGate,
        validator: FileValidator,
        media_root: PathBuf,
    ) -> Self {
        Self {
            hero_images: HeroImageService::new(Arc::clone(&store), Arc::clone(&media), validator.clone()),
            collections: CollectionService::new(store, media, validator),
            auth,
            media_root,
        }
    }
}
