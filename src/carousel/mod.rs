//! Drag-driven horizontal slide carousel.
//!
//! The carousel is a pure state reducer: pointer, wheel, navigation and resize
//! events go in, and a single authoritative `current_index` plus a clamped
//! pixel `translate_offset` come out. Rendering layers read the state and
//! apply it however they draw (terminal cells, DOM transforms, ...).

pub mod config;
pub mod engine;
pub mod wheel;

pub use config::{CarouselConfig, Responsive};
pub use engine::{Carousel, CarouselEvent};
pub use wheel::{DebounceTimer, WheelDebouncer, WheelDirection, WheelDisposition};
