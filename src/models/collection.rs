//! Gallery collections: categories and the items filed under them.

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Record;

/// Maximum length of a category name.
pub const MAX_CATEGORY_NAME_LEN: usize = 50;

/// A gallery category (e.g. "Summer Deals").
///
/// # Validation
///
/// - Name must be non-empty (after trimming), max 50 characters
/// - Slug format: kebab-case (lowercase, digits, hyphens; no leading/trailing hyphen)
///
/// Deleting a category is a soft delete: `is_active` flips to false and the
/// record stays in the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionCategory {
    /// Record ID
    pub id: String,
    /// Display name
    pub name: String,
    /// URL-safe identifier items refer to
    pub slug: String,
    /// 1-based display order
    pub order: u32,
    /// False once deleted
    pub is_active: bool,
    /// Creation time
    pub created_at: DateTime<Utc>,
}

impl CollectionCategory {
    /// Creates an active category, deriving the slug from the name.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is empty, too long, or produces an empty slug.
    pub fn new(id: impl Into<String>, name: &str, order: u32) -> Result<Self> {
        let name = name.trim().to_string();
        Self::validate_name(&name)?;

        let slug = slugify(&name);
        Self::validate_slug(&slug)?;

        Ok(Self {
            id: id.into(),
            name,
            slug,
            order,
            is_active: true,
            created_at: Utc::now(),
        })
    }

    /// Validates a category name.
    pub fn validate_name(name: &str) -> Result<()> {
        if name.trim().is_empty() {
            anyhow::bail!("Category name cannot be empty");
        }

        if name.chars().count() > MAX_CATEGORY_NAME_LEN {
            anyhow::bail!(
                "Category name '{}' exceeds maximum length of {} characters (got {})",
                name,
                MAX_CATEGORY_NAME_LEN,
                name.chars().count()
            );
        }

        Ok(())
    }

    /// Validates slug format (kebab-case).
    pub fn validate_slug(slug: &str) -> Result<()> {
        if slug.is_empty() {
            anyhow::bail!("Category slug cannot be empty");
        }

        if !slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        {
            anyhow::bail!(
                "Category slug '{slug}' must be kebab-case (lowercase, hyphens, and digits only)"
            );
        }

        if slug.starts_with('-') || slug.ends_with('-') {
            anyhow::bail!("Category slug '{slug}' cannot start or end with a hyphen");
        }

        Ok(())
    }
}

impl Record for CollectionCategory {
    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Derives a kebab-case slug from a display name.
///
/// Lowercases, collapses whitespace runs into single hyphens and drops
/// anything that is not ASCII alphanumeric or a hyphen.
///
/// # Examples
///
/// ```
/// use villa_showcase::models::slugify;
///
/// assert_eq!(slugify("Italian  Summer"), "italian-summer");
/// assert_eq!(slugify("  Winter Deals! "), "winter-deals");
/// ```
#[must_use]
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_hyphen = false;

    for c in name.trim().chars().flat_map(char::to_lowercase) {
        if c.is_whitespace() || c == '-' {
            pending_hyphen = true;
        } else if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c);
        }
    }

    slug
}

/// Partial update for a category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryUpdate {
    /// New display name (slug is re-derived)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New display order
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<u32>,
}

/// A gallery entry: one image with caption and location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionItem {
    /// Record ID
    pub id: String,
    /// Public image URL
    pub image_src: String,
    /// Accessible description (mirrors the title)
    pub alt_text: String,
    /// Caption heading
    pub title: String,
    /// Villa location
    pub location: String,
    /// Slug of the owning category
    pub category: String,
    /// 1-based display order
    pub order: u32,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Stored file name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    /// Size in bytes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_size: Option<u64>,
    /// MIME type
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_type: Option<String>,
}

impl Record for CollectionItem {
    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Partial update for a collection item.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemUpdate {
    /// New caption heading (also replaces the alt text)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// New location
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// New category slug
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl ItemUpdate {
    /// Returns true if nothing would change.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none() && self.location.is_none() && self.category.is_none()
    }
}
