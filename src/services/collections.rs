//! Gallery collections: categories and the items filed under them.

use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Context, Result};
use chrono::Utc;
use serde_json::{json, Map, Value};
use tracing::{debug, info, warn};

use super::hero_images::next_order;
use super::{FileValidator, InvalidInput, UploadedFile};
use crate::models::{
    new_record_id, slugify, CategoryUpdate, CollectionCategory, CollectionItem, ItemUpdate,
};
use crate::store::{self, ContentStore, MediaStore};

/// Collection path for categories.
pub const CATEGORIES_PATH: &str = "collection-categories";
/// Collection path and media folder for items.
pub const ITEMS_PATH: &str = "collection-items";
/// Category filter matching every item.
pub const ALL_CATEGORIES: &str = "all";

/// Categories seeded into an empty store, in display order.
pub const DEFAULT_CATEGORIES: [&str; 4] =
    ["Summer Deals", "Italian Summer", "Winter Deals", "New Deals"];

/// CRUD over gallery categories and items.
#[derive(Clone)]
pub struct CollectionService {
    store: Arc<dyn ContentStore>,
    media: Arc<dyn MediaStore>,
    validator: FileValidator,
    /// Serializes slug checks with the writes they guard. Shared by clones.
    slug_lock: Arc<Mutex<()>>,
}

impl CollectionService {
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
            slug_lock: Arc::new(Mutex::new(())),
        }
    }

    // === Categories ===

    /// Loads active categories, lowest `order` first.
    pub fn load_categories(&self) -> Result<Vec<CollectionCategory>> {
        let mut categories: Vec<CollectionCategory> =
            store::load_records(self.store.as_ref(), CATEGORIES_PATH)
                .context("Failed to load categories")?;
        categories.retain(|category| category.is_active);
        categories.sort_by_key(|category| category.order);
        debug!(count = categories.len(), "loaded categories");
        Ok(categories)
    }

    /// Creates an active category whose slug is derived from `name`.
    pub fn create_category(&self, name: &str, order: u32) -> Result<CollectionCategory> {
        let category = CollectionCategory::new(new_record_id(), name, order)
            .map_err(|e| InvalidInput::new(e.to_string()))?;

        let _guard = self
            .slug_lock
            .lock()
            .map_err(|_| anyhow!("Category lock poisoned"))?;
        self.ensure_slug_free(&category.slug, None)?;

        store::save_typed(self.store.as_ref(), CATEGORIES_PATH, &category)
            .context("Error creating category")?;

        info!(id = %category.id, slug = %category.slug, "created category");
        Ok(category)
    }

    /// Renames and/or reorders a category. A rename also updates the slug.
    pub fn update_category(&self, id: &str, update: &CategoryUpdate) -> Result<CollectionCategory> {
        let mut patch = Map::new();
        let _guard = self
            .slug_lock
            .lock()
            .map_err(|_| anyhow!("Category lock poisoned"))?;

        if let Some(name) = &update.name {
            let name = name.trim();
            CollectionCategory::validate_name(name)
                .map_err(|e| InvalidInput::new(e.to_string()))?;
            let slug = slugify(name);
            CollectionCategory::validate_slug(&slug)
                .map_err(|e| InvalidInput::new(e.to_string()))?;
            self.ensure_slug_free(&slug, Some(id))?;
            patch.insert("name".to_string(), Value::from(name));
            patch.insert("slug".to_string(), Value::from(slug));
        }
        if let Some(order) = update.order {
            patch.insert("order".to_string(), Value::from(order));
        }

        let merged = self
            .store
            .update_record(CATEGORIES_PATH, id, &Value::Object(patch))
            .with_context(|| format!("Error updating category '{id}'"))?;

        info!(id, "updated category");
        serde_json::from_value(merged).context("Failed to parse updated category")
    }

    /// Fails if an active category other than `except` already uses `slug`.
    fn ensure_slug_free(&self, slug: &str, except: Option<&str>) -> Result<()> {
        let taken = self
            .load_categories()?
            .iter()
            .any(|existing| existing.slug == slug && except != Some(existing.id.as_str()));
        if taken {
            return Err(
                InvalidInput::new(format!("A category with slug '{slug}' already exists")).into(),
            );
        }
        Ok(())
    }

    /// Hides a category. The record is kept so existing items stay readable.
    pub fn delete_category(&self, id: &str) -> Result<()> {
        self.store
            .update_record(CATEGORIES_PATH, id, &json!({ "isActive": false }))
            .with_context(|| format!("Error deleting category '{id}'"))?;
        info!(id, "deactivated category");
        Ok(())
    }

    /// Seeds [`DEFAULT_CATEGORIES`] unless an active category already
    /// exists. Returns the number of categories created.
    pub fn initialize_default_categories(&self) -> Result<usize> {
        if !self.load_categories()?.is_empty() {
            info!("categories already exist, skipping initialization");
            return Ok(0);
        }

        for (order, name) in (1..).zip(DEFAULT_CATEGORIES) {
            self.create_category(name, order)
                .context("Failed to initialize default categories")?;
        }

        info!(count = DEFAULT_CATEGORIES.len(), "initialized default categories");
        Ok(DEFAULT_CATEGORIES.len())
    }

    // === Items ===

    /// Loads items in `category` (every item for `None` or `"all"`), lowest
    /// `order` first.
    pub fn load_items(&self, category: Option<&str>) -> Result<Vec<CollectionItem>> {
        let mut items: Vec<CollectionItem> = store::load_records(self.store.as_ref(), ITEMS_PATH)
            .context("Failed to load collection items")?;

        if let Some(category) = category.filter(|c| *c != ALL_CATEGORIES) {
            items.retain(|item| item.category == category);
        }
        items.sort_by_key(|item| item.order);

        debug!(count = items.len(), ?category, "loaded collection items");
        Ok(items)
    }

    /// Validates and stores a new item, appending it after `current_count`
    /// existing items.
    pub fn upload_item(
        &self,
        file: &UploadedFile,
        title: &str,
        location: &str,
        category: &str,
        current_count: usize,
    ) -> Result<CollectionItem> {
        let title = required("Title", title)?;
        let location = required("Location", location)?;
        let category = required("Category", category)?;
        self.check_upload(file)?;

        let stored = self
            .media
            .upload(ITEMS_PATH, &file.name, &file.bytes)
            .with_context(|| format!("Error uploading collection item '{}'", file.name))?;

        let item = CollectionItem {
            id: new_record_id(),
            image_src: stored.url,
            alt_text: title.to_string(),
            title: title.to_string(),
            location: location.to_string(),
            category: category.to_string(),
            order: next_order(current_count),
            created_at: Utc::now(),
            file_name: Some(stored.file_name),
            file_size: Some(file.size()),
            file_type: Some(file.mime_type().to_string()),
        };

        store::save_typed(self.store.as_ref(), ITEMS_PATH, &item)
            .context("Error saving collection item")?;

        info!(id = %item.id, category = %item.category, "uploaded collection item");
        Ok(item)
    }

    /// Applies text edits and, when `file` is given, swaps the image. The
    /// previous image is removed only after the record points at the new one.
    pub fn update_item(
        &self,
        id: &str,
        update: &ItemUpdate,
        file: Option<&UploadedFile>,
    ) -> Result<CollectionItem> {
        let existing: CollectionItem = store::get_typed(self.store.as_ref(), ITEMS_PATH, id)?
            .ok_or_else(|| store::StoreError::RecordNotFound {
                path: ITEMS_PATH.to_string(),
                id: id.to_string(),
            })?;

        let mut patch = Map::new();
        if let Some(title) = &update.title {
            let title = required("Title", title)?;
            patch.insert("title".to_string(), Value::from(title));
            patch.insert("altText".to_string(), Value::from(title));
        }
        if let Some(location) = &update.location {
            patch.insert("location".to_string(), Value::from(required("Location", location)?));
        }
        if let Some(category) = &update.category {
            patch.insert("category".to_string(), Value::from(required("Category", category)?));
        }

        let mut replaced_url = None;
        if let Some(file) = file {
            self.check_upload(file)?;
            let stored = self
                .media
                .upload(ITEMS_PATH, &file.name, &file.bytes)
                .with_context(|| format!("Error uploading collection item '{}'", file.name))?;

            patch.insert("imageSrc".to_string(), Value::from(stored.url));
            patch.insert("fileName".to_string(), Value::from(stored.file_name));
            patch.insert("fileSize".to_string(), Value::from(file.size()));
            patch.insert("fileType".to_string(), Value::from(file.mime_type()));
            replaced_url = Some(existing.image_src);
        }

        let merged = self
            .store
            .update_record(ITEMS_PATH, id, &Value::Object(patch))
            .with_context(|| format!("Error updating collection item '{id}'"))?;

        if let Some(url) = replaced_url {
            // The record already points at the new file; a stale file is harmless
            if let Err(e) = self.media.remove(&url) {
                warn!(url = %url, error = %e, "failed to remove replaced image");
            }
        }

        info!(id, "updated collection item");
        serde_json::from_value(merged).context("Failed to parse updated collection item")
    }

    /// Removes the stored image, then the record.
    pub fn delete_item(&self, item: &CollectionItem) -> Result<()> {
        self.media
            .remove(&item.image_src)
            .with_context(|| format!("Error deleting item image '{}'", item.image_src))?;
        self.store
            .delete_record(ITEMS_PATH, &item.id)
            .with_context(|| format!("Error deleting collection item '{}'", item.id))?;

        info!(id = %item.id, "deleted collection item");
        Ok(())
    }

    /// Looks up one item by ID.
    pub fn find_item(&self, id: &str) -> Result<Option<CollectionItem>> {
        store::get_typed(self.store.as_ref(), ITEMS_PATH, id)
    }

    fn check_upload(&self, file: &UploadedFile) -> Result<()> {
        self.validator.check(file).map_err(|rejection| {
            warn!(file_name = %file.name, %rejection, "rejected collection upload");
            rejection.into()
        })
    }
}

fn required<'a>(field: &str, value: &'a str) -> Result<&'a str> {
    let value = value.trim();
    if value.is_empty() {
        return Err(InvalidInput::new(format!("{field} is required")).into());
    }
    Ok(value)
}
