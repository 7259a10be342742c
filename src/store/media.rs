//! Binary media storage for uploaded images.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use tracing::{debug, warn};

use super::validate_path;

/// Where an upload ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    /// Public URL for the file
    pub url: String,
    /// Generated file name
    pub file_name: String,
}

/// Stores uploaded file bytes and hands out public URLs.
pub trait MediaStore: Send + Sync {
    /// Stores `bytes` under `folder`, naming the file after the folder and
    /// the upload time while keeping the original extension.
    fn upload(&self, folder: &str, original_name: &str, bytes: &[u8]) -> Result<StoredFile>;

    /// Removes a file previously returned by [`upload`](Self::upload).
    /// URLs that are not managed by this store are ignored.
    fn remove(&self, url: &str) -> Result<()>;
}

/// Media store writing files below a root directory and serving them under
/// a URL prefix (`/media` by default).
#[derive(Debug, Clone)]
pub struct FsMediaStore {
    root: PathBuf,
    url_prefix: String,
}

impl FsMediaStore {
    /// URL prefix used when none is given.
    pub const DEFAULT_URL_PREFIX: &'static str = "/media";

    /// Opens (and creates, if needed) a media directory.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)
            .with_context(|| format!("Failed to create media directory: {}", root.display()))?;
        Ok(Self {
            root,
            url_prefix: Self::DEFAULT_URL_PREFIX.to_string(),
        })
    }

    /// Overrides the public URL prefix.
    #[must_use]
    pub fn with_url_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.url_prefix = prefix.into().trim_end_matches('/').to_string();
        self
    }

    /// Media root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Maps a URL issued by this store back to a file path.
    fn path_for_url(&self, url: &str) -> Option<PathBuf> {
        let relative = url
            .strip_prefix(&self.url_prefix)?
            .strip_prefix('/')?;
        let (folder, file_name) = relative.rsplit_once('/')?;

        validate_path(folder).ok()?;
        if !is_safe_file_name(file_name) {
            return None;
        }

        Some(self.root.join(folder).join(file_name))
    }
}

impl MediaStore for FsMediaStore {
    fn upload(&self, folder: &str, original_name: &str, bytes: &[u8]) -> Result<StoredFile> {
        validate_path(folder)?;

        let dir = self.root.join(folder);
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create media folder: {}", dir.display()))?;

        let extension = file_extension(original_name);
        let stem = format!("{}-{}", folder.replace('/', "-"), Utc::now().timestamp_millis());

        // Two uploads in the same millisecond get a numeric suffix
        let mut file_name = with_extension(&stem, extension.as_deref());
        let mut attempt = 1;
        while dir.join(&file_name).exists() {
            file_name = with_extension(&format!("{stem}-{attempt}"), extension.as_deref());
            attempt += 1;
        }

        let path = dir.join(&file_name);
        fs::write(&path, bytes)
            .with_context(|| format!("Failed to write media file: {}", path.display()))?;

        debug!(folder, file_name = %file_name, size = bytes.len(), "stored media file");

        Ok(StoredFile {
            url: format!("{}/{}/{}", self.url_prefix, folder, file_name),
            file_name,
        })
    }

    fn remove(&self, url: &str) -> Result<()> {
        let Some(path) = self.path_for_url(url) else {
            warn!(url, "not removing media outside the store");
            return Ok(());
        };

        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e)
                .with_context(|| format!("Failed to remove media file: {}", path.display())),
        }
    }
}

/// Lowercased alphanumeric extension of `name`, if any.
fn file_extension(name: &str) -> Option<String> {
    let extension = Path::new(name).extension()?.to_str()?;
    let cleaned: String = extension
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .collect::<String>()
        .to_ascii_lowercase();
    (!cleaned.is_empty()).then_some(cleaned)
}

fn with_extension(stem: &str, extension: Option<&str>) -> String {
    match extension {
        Some(ext) => format!("{stem}.{ext}"),
        None => stem.to_string(),
    }
}

fn is_safe_file_name(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with('.')
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}
