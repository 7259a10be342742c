//! Carousel slide content.

use serde::{Deserialize, Serialize};

use super::HeroImage;

/// One carousel entry.
///
/// Slides are immutable once constructed; their position in the carousel is
/// their index in the slide list, not a stored attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slide {
    /// Image reference (URL or path)
    pub image: String,
    /// Caption heading
    pub title: String,
    /// Caption body
    #[serde(default)]
    pub description: String,
}

impl Slide {
    /// Creates a slide.
    pub fn new(
        image: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            image: image.into(),
            title: title.into(),
            description: description.into(),
        }
    }

    /// Built-in showcase villas used when no hero images are stored.
    #[must_use]
    pub fn showcase() -> Vec<Self> {
        vec![
            Self::new(
                "/images/slide/slide1.webp",
                "Modern Beach Villa",
                "Stunning oceanfront property with panoramic sea views and contemporary design",
            ),
            Self::new(
                "/images/slide/slide3.webp",
                "Mountain Retreat",
                "Luxury villa nestled in the mountains with breathtaking valley views",
            ),
            Self::new(
                "/images/slide/slide4.jpg",
                "Tropical Paradise",
                "Private villa surrounded by lush gardens and crystal-clear pools",
            ),
            Self::new(
                "/images/slide/slide5.jpg",
                "Desert Oasis",
                "Architectural masterpiece blending modern luxury with natural desert beauty",
            ),
            Self::new(
                "/images/slide/slide6.jpg",
                "Urban Sanctuary",
                "Sophisticated city villa with rooftop terraces and contemporary amenities",
            ),
        ]
    }
}

impl From<&HeroImage> for Slide {
    fn from(image: &HeroImage) -> Self {
        Self::new(image.file.url.clone(), image.title.clone(), "")
    }
}
