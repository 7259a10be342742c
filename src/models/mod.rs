//! Data models for slides, uploaded files, and gallery collections.
//!
//! Models are independent of UI and storage; anything persisted implements
//! [`Record`] and serializes with camelCase keys.

pub mod collection;
pub mod hero_image;
pub mod record;
pub mod slide;

pub use collection::{
    slugify, CategoryUpdate, CollectionCategory, CollectionItem, ItemUpdate,
    MAX_CATEGORY_NAME_LEN,
};
pub use hero_image::HeroImage;
pub use record::{new_record_id, FileMetadata, Record};
pub use slide::Slide;
