//! Homepage hero image management.

use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Utc;
use serde_json::json;
use tracing::{debug, info, warn};

use super::{FileValidator, InvalidInput, UploadedFile};
use crate::models::{new_record_id, FileMetadata, HeroImage};
use crate::store::{self, ContentStore, MediaStore};

/// Collection path and media folder for hero images.
pub const HERO_IMAGES_PATH: &str = "hero-images";

/// Loads, uploads, retitles and deletes hero images.
#[derive(Clone)]
pub struct HeroImageService {
    store: Arc<dyn ContentStore>,
    media: Arc<dyn MediaStore>,
    validator: FileValidator,
}

impl HeroImageService {
    /// Creates a service over the given store, media store and upload rules.
    pub fn new(
        store: Arc<dyn ContentStore>,
        media: Arc<dyn MediaStore>,
        validator: FileValidator,
    ) -> Self {
        Self {
            store,
            media,
            validator,
        }
    }

    /// Upload rules applied by [`upload`](Self::upload).
    #[must_use]
    pub const fn validator(&self) -> &FileValidator {
        &self.validator
    }

    /// Loads every hero image, lowest `order` first.
    pub fn load(&self) -> Result<Vec<HeroImage>> {
        let mut images: Vec<HeroImage> = store::load_records(self.store.as_ref(), HERO_IMAGES_PATH)
            .context("Failed to load hero images")?;
        images.sort_by_key(|image| image.order);
        debug!(count = images.len(), "loaded hero images");
        Ok(images)
    }

    /// Validates and stores a new image, appending it after `current_count`
    /// existing images.
    pub fn upload(&self, file: &UploadedFile, title: &str, current_count: usize) -> Result<HeroImage> {
        if let Err(rejection) = self.validator.check(file) {
            warn!(file_name = %file.name, %rejection, "rejected hero image upload");
            return Err(rejection.into());
        }

        let stored = self
            .media
            .upload(HERO_IMAGES_PATH, &file.name, &file.bytes)
            .with_context(|| format!("Error uploading image '{}'", file.name))?;

        let image = HeroImage {
            file: FileMetadata {
                id: new_record_id(),
                url: stored.url,
                file_name: stored.file_name,
                file_size: file.size(),
                file_type: file.mime_type().to_string(),
                created_at: Utc::now(),
            },
            title: title.trim().to_string(),
            order: next_order(current_count),
        };

        store::save_typed(self.store.as_ref(), HERO_IMAGES_PATH, &image)
            .context("Error saving hero image")?;

        info!(id = %image.file.id, order = image.order, "uploaded hero image");
        Ok(image)
    }

    /// Replaces an image's title.
    pub fn update_title(&self, id: &str, title: &str) -> Result<HeroImage> {
        let title = title.trim();
        if title.is_empty() {
            return Err(InvalidInput::new("Title cannot be empty").into());
        }

        let merged = self
            .store
            .update_record(HERO_IMAGES_PATH, id, &json!({ "title": title }))
            .with_context(|| format!("Error updating image '{id}'"))?;

        info!(id, "retitled hero image");
        serde_json::from_value(merged).context("Failed to parse updated hero image")
    }

    /// Removes the stored file, then the record.
    pub fn delete(&self, image: &HeroImage) -> Result<()> {
        self.media
            .remove(&image.file.url)
            .with_context(|| format!("Error deleting image file '{}'", image.file.url))?;
        self.store
            .delete_record(HERO_IMAGES_PATH, &image.file.id)
            .with_context(|| format!("Error deleting image '{}'", image.file.id))?;

        info!(id = %image.file.id, "deleted hero image");
        Ok(())
    }

    /// Looks up one image by ID.
    pub fn find(&self, id: &str) -> Result<Option<HeroImage>> {
        store::get_typed(self.store.as_ref(), HERO_IMAGES_PATH, id)
    }
}

pub(crate) fn next_order(current_count: usize) -> u32 {
    u32::try_from(current_count).map_or(u32::MAX, |count| count.saturating_add(1))
}
