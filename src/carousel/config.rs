//! Carousel geometry configuration.
//!
//! Doubles as the `[carousel]` section of the application config file.

use std::time::Duration;

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Viewport widths below this value use the mobile geometry.
pub const DEFAULT_BREAKPOINT: f32 = 768.0;

/// A value that differs between mobile and desktop viewports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Responsive<T> {
    /// Value used below the breakpoint
    pub mobile: T,
    /// Value used at or above the breakpoint
    pub desktop: T,
}

impl<T: Copy> Responsive<T> {
    /// Creates a responsive pair.
    pub const fn new(mobile: T, desktop: T) -> Self {
        Self { mobile, desktop }
    }

    /// Picks the value for the given viewport class.
    pub const fn pick(&self, is_mobile: bool) -> T {
        if is_mobile {
            self.mobile
        } else {
            self.desktop
        }
    }
}

/// Geometry and gesture tuning for a [`Carousel`](super::Carousel).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CarouselConfig {
    /// Viewport width (px) separating mobile from desktop
    pub breakpoint: f32,
    /// Slide width in pixels per viewport class
    pub slide_width: Responsive<f32>,
    /// Horizontal spacing between slides in pixels
    pub slide_gap: f32,
    /// Minimum net drag distance (px) that changes the slide on release
    pub drag_threshold: Responsive<f32>,
    /// Coalescing window for horizontal wheel input, in milliseconds
    pub wheel_debounce_ms: u64,
}

impl Default for CarouselConfig {
    fn default() -> Self {
        Self {
            breakpoint: DEFAULT_BREAKPOINT,
            slide_width: Responsive::new(300.0, 660.0),
            slide_gap: 20.0,
            drag_threshold: Responsive::new(50.0, 100.0),
            wheel_debounce_ms: 50,
        }
    }
}

impl CarouselConfig {
    /// Returns true when `viewport_width` falls in the mobile class.
    #[must_use]
    pub fn is_mobile(&self, viewport_width: f32) -> bool {
        viewport_width < self.breakpoint
    }

    /// Slide width for the given viewport.
    #[must_use]
    pub fn slide_width_for(&self, viewport_width: f32) -> f32 {
        self.slide_width.pick(self.is_mobile(viewport_width))
    }

    /// Drag threshold for the given viewport.
    #[must_use]
    pub fn drag_threshold_for(&self, viewport_width: f32) -> f32 {
        self.drag_threshold.pick(self.is_mobile(viewport_width))
    }

    /// Wheel coalescing window.
    #[must_use]
    pub const fn wheel_window(&self) -> Duration {
        Duration::from_millis(self.wheel_debounce_ms)
    }

    /// Validates configuration values.
    ///
    /// Checks:
    /// - slide widths are finite and positive
    /// - gap and thresholds are finite and non-negative
    /// - the wheel debounce window is non-zero
    pub fn validate(&self) -> Result<()> {
        for (label, width) in [
            ("mobile", self.slide_width.mobile),
            ("desktop", self.slide_width.desktop),
        ] {
            if !width.is_finite() || width <= 0.0 {
                anyhow::bail!("Carousel {label} slide width must be positive (got {width})");
            }
        }

        if !self.slide_gap.is_finite() || self.slide_gap < 0.0 {
            anyhow::bail!(
                "Carousel slide gap cannot be negative (got {})",
                self.slide_gap
            );
        }

        for (label, threshold) in [
            ("mobile", self.drag_threshold.mobile),
            ("desktop", self.drag_threshold.desktop),
        ] {
            if !threshold.is_finite() || threshold < 0.0 {
                anyhow::bail!(
                    "Carousel {label} drag threshold cannot be negative (got {threshold})"
                );
            }
        }

        if !self.breakpoint.is_finite() || self.breakpoint < 0.0 {
            anyhow::bail!("Carousel breakpoint cannot be negative");
        }

        if self.wheel_debounce_ms == 0 {
            anyhow::bail!("Carousel wheel debounce window must be at least 1ms");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(CarouselConfig::default().validate().is_ok());
    }

    #[test]
    fn test_breakpoint_selects_geometry() {
        let config = CarouselConfig::default();

        assert!(config.is_mobile(767.0));
        assert!(!config.is_mobile(768.0));
        assert!((config.slide_width_for(375.0) - 300.0).abs() < f32::EPSILON);
        assert!((config.slide_width_for(1280.0) - 660.0).abs() < f32::EPSILON);
        assert!((config.drag_threshold_for(375.0) - 50.0).abs() < f32::EPSILON);
        assert!((config.drag_threshold_for(1280.0) - 100.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = CarouselConfig::default();
        config.slide_width.mobile = 0.0;
        assert!(config.validate().is_err());

        let mut config = CarouselConfig::default();
        config.slide_gap = -1.0;
        assert!(config.validate().is_err());

        let mut config = CarouselConfig::default();
        config.drag_threshold.desktop = f32::NAN;
        assert!(config.validate().is_err());

        let mut config = CarouselConfig::default();
        config.wheel_debounce_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: CarouselConfig = toml::from_str("slide_gap = 32.0").unwrap();
        assert!((config.slide_gap - 32.0).abs() < f32::EPSILON);
        assert_eq!(config.wheel_debounce_ms, 50);
        assert_eq!(config.slide_width, Responsive::new(300.0, 660.0));
    }
}
