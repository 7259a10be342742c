//! Carousel state reducer.

// Slide counts are tiny; index <-> pixel conversions never lose precision in practice
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]

use std::time::Instant;

use tracing::debug;

use super::config::CarouselConfig;
use super::wheel::{WheelDebouncer, WheelDirection, WheelDisposition};
use crate::models::Slide;

/// Input events understood by the carousel reducer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CarouselEvent {
    /// Pointer or touch went down at `pointer_x`
    GestureStart {
        /// Horizontal pointer position in pixels
        pointer_x: f32,
    },
    /// Pointer moved while pressed
    GestureMove {
        /// Horizontal pointer position in pixels
        pointer_x: f32,
    },
    /// Pointer released
    GestureEnd,
    /// Jump to a slide (clamped to the slide range)
    GoTo(usize),
    /// Arrow: next slide
    Next,
    /// Arrow: previous slide
    Previous,
    /// Viewport width changed
    Resize {
        /// New viewport width in pixels
        viewport_width: f32,
    },
    /// Wheel or trackpad scroll
    Wheel {
        /// Horizontal delta
        delta_x: f32,
        /// Vertical delta
        delta_y: f32,
        /// Event timestamp
        at: Instant,
    },
    /// Clock tick used to flush a coalesced wheel burst
    Tick {
        /// Current time
        now: Instant,
    },
    /// Component is going away
    Unmount,
}

/// Gesture bookkeeping, present only while a drag is in progress.
#[derive(Debug, Clone, Copy, PartialEq)]
struct DragGesture {
    start_pointer_x: f32,
    start_offset: f32,
}

/// A horizontally dragged slide carousel.
///
/// # Invariants
///
/// After every operation:
/// - `0 <= current_index <= max(slide_count - 1, 0)`
/// - `min_translate <= translate_offset <= 0`
///
/// `min_translate` is recomputed from the viewport on every resize and never
/// reused across viewport changes.
#[derive(Debug, Clone)]
pub struct Carousel {
    slides: Vec<Slide>,
    config: CarouselConfig,
    viewport_width: f32,
    slide_width: f32,
    min_translate: f32,
    current_index: usize,
    translate_offset: f32,
    animating: bool,
    drag: Option<DragGesture>,
    wheel: WheelDebouncer,
}

impl Carousel {
    /// Creates a carousel showing the first slide.
    #[must_use]
    pub fn new(slides: Vec<Slide>, config: CarouselConfig, viewport_width: f32) -> Self {
        let wheel = WheelDebouncer::new(config.wheel_window());
        let mut carousel = Self {
            slides,
            config,
            viewport_width,
            slide_width: 0.0,
            min_translate: 0.0,
            current_index: 0,
            translate_offset: 0.0,
            animating: true,
            drag: None,
            wheel,
        };
        carousel.recompute_geometry();
        carousel
    }

    // === Accessors ===

    /// Slides in display order.
    #[must_use]
    pub fn slides(&self) -> &[Slide] {
        &self.slides
    }

    /// Number of slides.
    #[must_use]
    pub fn slide_count(&self) -> usize {
        self.slides.len()
    }

    /// Index of the selected slide.
    #[must_use]
    pub const fn current_index(&self) -> usize {
        self.current_index
    }

    /// Horizontal track displacement in pixels (always `<= 0`).
    #[must_use]
    pub const fn translate_offset(&self) -> f32 {
        self.translate_offset
    }

    /// Lowest allowed offset for the current viewport.
    #[must_use]
    pub const fn min_translate(&self) -> f32 {
        self.min_translate
    }

    /// Slide width for the current viewport.
    #[must_use]
    pub const fn slide_width(&self) -> f32 {
        self.slide_width
    }

    /// Current viewport width.
    #[must_use]
    pub const fn viewport_width(&self) -> f32 {
        self.viewport_width
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &CarouselConfig {
        &self.config
    }

    /// True while a gesture is in progress.
    #[must_use]
    pub const fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// True when offset changes should be animated (false while dragging so
    /// the track follows the pointer 1:1).
    #[must_use]
    pub const fn is_animating(&self) -> bool {
        self.animating
    }

    /// Distance between the left edges of adjacent slides.
    #[must_use]
    pub fn step(&self) -> f32 {
        self.slide_width + self.config.slide_gap
    }

    /// Width of all slides plus the gaps between them.
    #[must_use]
    pub fn total_content_width(&self) -> f32 {
        let count = self.slides.len();
        if count == 0 {
            return 0.0;
        }
        count as f32 * self.slide_width + (count - 1) as f32 * self.config.slide_gap
    }

    /// Highest index whose offset is not swallowed entirely by the clamp.
    ///
    /// Once this slide is selected the last slide's right edge sits on the
    /// viewport's right edge.
    #[must_use]
    pub fn last_reachable_index(&self) -> usize {
        let count = self.slides.len();
        if count == 0 {
            return 0;
        }
        let step = self.step();
        if step <= 0.0 {
            return count - 1;
        }
        let reachable = (-self.min_translate / step).ceil() as usize;
        reachable.min(count - 1)
    }

    /// Whether the "previous" arrow is enabled.
    #[must_use]
    pub const fn can_go_previous(&self) -> bool {
        self.current_index > 0
    }

    /// Whether the "next" arrow is enabled.
    #[must_use]
    pub fn can_go_next(&self) -> bool {
        self.offset_for(self.current_index) > self.min_translate
    }

    /// Pending wheel deadline, for sizing event-loop poll timeouts.
    #[must_use]
    pub const fn wheel_deadline(&self) -> Option<Instant> {
        self.wheel.deadline()
    }

    // === Reducer ===

    /// Applies one event in place.
    pub fn apply(&mut self, event: CarouselEvent) {
        match event {
            CarouselEvent::GestureStart { pointer_x } => self.gesture_start(pointer_x),
            CarouselEvent::GestureMove { pointer_x } => self.gesture_move(pointer_x),
            CarouselEvent::GestureEnd => self.gesture_end(),
            CarouselEvent::GoTo(index) => self.go_to(index),
            CarouselEvent::Next => self.next(),
            CarouselEvent::Previous => self.previous(),
            CarouselEvent::Resize { viewport_width } => self.resize(viewport_width),
            CarouselEvent::Wheel {
                delta_x,
                delta_y,
                at,
            } => {
                self.wheel(delta_x, delta_y, at);
            }
            CarouselEvent::Tick { now } => {
                self.poll_wheel(now);
            }
            CarouselEvent::Unmount => self.unmount(),
        }
    }

    /// Pure form of [`apply`](Self::apply): consumes the state and returns the next one.
    #[must_use]
    pub fn reduce(mut self, event: CarouselEvent) -> Self {
        self.apply(event);
        self
    }

    // === Operations ===

    /// Starts a drag at `pointer_x`.
    pub fn gesture_start(&mut self, pointer_x: f32) {
        self.drag = Some(DragGesture {
            start_pointer_x: pointer_x,
            start_offset: self.translate_offset,
        });
        self.animating = false;
    }

    /// Follows the pointer, clamping so no empty space is revealed mid-drag.
    pub fn gesture_move(&mut self, pointer_x: f32) {
        let Some(drag) = self.drag else {
            return;
        };
        let raw = drag.start_offset + (pointer_x - drag.start_pointer_x);
        self.translate_offset = self.clamp_offset(raw);
    }

    /// Ends the drag and snaps to a slide.
    pub fn gesture_end(&mut self) {
        let Some(drag) = self.drag.take() else {
            return;
        };

        let moved_by = self.translate_offset - drag.start_offset;
        let threshold = self.config.drag_threshold_for(self.viewport_width);

        if moved_by < -threshold && self.current_index < self.last_reachable_index() {
            self.current_index += 1;
        } else if moved_by > threshold && self.current_index > 0 {
            self.current_index -= 1;
        }

        debug!(
            moved_by,
            threshold,
            index = self.current_index,
            "carousel gesture ended"
        );

        self.settle();
    }

    /// Selects `index`, clamped to the slide range.
    pub fn go_to(&mut self, index: usize) {
        let count = self.slides.len();
        if count == 0 {
            return;
        }
        self.drag = None;
        self.current_index = index.min(count - 1);
        self.settle();
    }

    /// Advances one slide if the track can still move left.
    pub fn next(&mut self) {
        if self.can_go_next() {
            self.go_to(self.current_index + 1);
        }
    }

    /// Goes back one slide.
    pub fn previous(&mut self) {
        if self.can_go_previous() {
            self.go_to(self.current_index - 1);
        }
    }

    /// Recomputes geometry for a new viewport width and re-clamps the offset.
    ///
    /// The selected index never changes here, only where it is drawn.
    pub fn resize(&mut self, viewport_width: f32) {
        self.viewport_width = viewport_width;
        self.recompute_geometry();

        if let Some(drag) = self.drag.as_mut() {
            drag.start_offset = drag.start_offset.clamp(self.min_translate, 0.0);
            self.translate_offset = self.translate_offset.clamp(self.min_translate, 0.0);
        } else {
            self.translate_offset = self.offset_for(self.current_index);
            self.animating = true;
        }
    }

    /// Feeds a wheel event; horizontal-dominant input is captured and coalesced.
    pub fn wheel(&mut self, delta_x: f32, delta_y: f32, at: Instant) -> WheelDisposition {
        self.wheel.on_wheel(delta_x, delta_y, at)
    }

    /// Flushes a coalesced wheel burst whose window has elapsed.
    ///
    /// Returns true if the burst moved the carousel.
    pub fn poll_wheel(&mut self, now: Instant) -> bool {
        let before = self.current_index;
        match self.wheel.poll(now) {
            Some(WheelDirection::Forward) => self.next(),
            Some(WheelDirection::Backward) => self.previous(),
            None => return false,
        }
        before != self.current_index
    }

    /// Releases transient resources: ends an in-flight drag without a snap
    /// decision and cancels any pending wheel step.
    pub fn unmount(&mut self) {
        self.wheel.cancel();
        if self.drag.take().is_some() {
            self.settle();
        }
    }

    // === Geometry helpers ===

    fn recompute_geometry(&mut self) {
        self.slide_width = self.config.slide_width_for(self.viewport_width);
        self.min_translate = (self.viewport_width - self.total_content_width()).min(0.0);
    }

    fn clamp_offset(&self, offset: f32) -> f32 {
        offset.clamp(self.min_translate, 0.0)
    }

    fn offset_for(&self, index: usize) -> f32 {
        self.clamp_offset(-(index as f32) * self.step())
    }

    fn settle(&mut self) {
        self.animating = true;
        self.translate_offset = self.offset_for(self.current_index);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::time::Duration;

    const DESKTOP: f32 = 1280.0;

    fn slides(count: usize) -> Vec<Slide> {
        (0..count)
            .map(|i| Slide::new(format!("/images/slide/{i}.jpg"), format!("Villa {i}"), ""))
            .collect()
    }

    fn config() -> CarouselConfig {
        CarouselConfig::default()
    }

    fn drag(carousel: &mut Carousel, from: f32, by: f32) {
        carousel.gesture_start(from);
        carousel.gesture_move(from + by / 2.0);
        carousel.gesture_move(from + by);
        carousel.gesture_end();
    }

    fn assert_close(actual: f32, expected: f32) {
        assert!(
            (actual - expected).abs() < 1e-3,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_new_starts_at_first_slide() {
        let carousel = Carousel::new(slides(5), config(), DESKTOP);
        assert_eq!(carousel.current_index(), 0);
        assert_close(carousel.translate_offset(), 0.0);
        assert_close(carousel.slide_width(), 660.0);
        assert_close(carousel.total_content_width(), 3380.0);
        assert_close(carousel.min_translate(), 1280.0 - 3380.0);
        assert!(!carousel.is_dragging());
    }

    #[test]
    fn test_snap_past_threshold_advances() {
        let mut carousel = Carousel::new(slides(5), config(), DESKTOP);
        carousel.go_to(2);
        assert_close(carousel.translate_offset(), -1360.0);

        drag(&mut carousel, 900.0, -150.0);

        assert_eq!(carousel.current_index(), 3);
        assert_close(carousel.translate_offset(), -2040.0);
        assert!(carousel.is_animating());
    }

    #[test]
    fn test_snap_below_threshold_returns() {
        let mut carousel = Carousel::new(slides(5), config(), DESKTOP);
        carousel.go_to(2);

        drag(&mut carousel, 400.0, 50.0);

        assert_eq!(carousel.current_index(), 2);
        assert_close(carousel.translate_offset(), -1360.0);
    }

    #[test]
    fn test_positive_drag_goes_back() {
        let mut carousel = Carousel::new(slides(5), config(), DESKTOP);
        carousel.go_to(2);
        drag(&mut carousel, 400.0, 180.0);
        assert_eq!(carousel.current_index(), 1);
    }

    #[test]
    fn test_drag_disables_animation_until_release() {
        let mut carousel = Carousel::new(slides(5), config(), DESKTOP);
        carousel.gesture_start(500.0);
        assert!(carousel.is_dragging());
        assert!(!carousel.is_animating());

        carousel.gesture_move(430.0);
        assert_close(carousel.translate_offset(), -70.0);

        carousel.gesture_end();
        assert!(!carousel.is_dragging());
        assert!(carousel.is_animating());
    }

    #[test]
    fn test_move_without_start_is_ignored() {
        let mut carousel = Carousel::new(slides(5), config(), DESKTOP);
        carousel.gesture_move(-400.0);
        carousel.gesture_end();
        assert_eq!(carousel.current_index(), 0);
        assert_close(carousel.translate_offset(), 0.0);
    }

    #[test]
    fn test_drag_clamps_at_first_slide() {
        let mut carousel = Carousel::new(slides(5), config(), DESKTOP);
        carousel.gesture_start(100.0);
        carousel.gesture_move(900.0);
        assert_close(carousel.translate_offset(), 0.0);
        carousel.gesture_end();
        assert_eq!(carousel.current_index(), 0);
    }

    #[test]
    fn test_no_overshoot_at_last_slide() {
        let mut carousel = Carousel::new(slides(5), config(), DESKTOP);
        carousel.go_to(4);
        let min = carousel.min_translate();
        assert_close(carousel.translate_offset(), min);

        carousel.gesture_start(900.0);
        carousel.gesture_move(100.0);
        assert_close(carousel.translate_offset(), min);
        carousel.gesture_end();

        assert_eq!(carousel.current_index(), 4);
        assert_close(carousel.translate_offset(), min);
    }

    #[test]
    fn test_last_reachable_index() {
        let carousel = Carousel::new(slides(5), config(), DESKTOP);
        // 2100px of overflow over a 680px step
        assert_eq!(carousel.last_reachable_index(), 4);

        let wide = Carousel::new(slides(5), config(), 4000.0);
        assert_close(wide.min_translate(), 0.0);
        assert_eq!(wide.last_reachable_index(), 0);
    }

    #[test]
    fn test_drag_refused_past_last_reachable() {
        let mut carousel = Carousel::new(slides(5), config(), 2700.0);
        // 680px of overflow: one step is enough to reveal the last edge
        assert_eq!(carousel.last_reachable_index(), 1);
        carousel.go_to(1);
        assert!(!carousel.can_go_next());

        drag(&mut carousel, 600.0, -300.0);
        assert_eq!(carousel.current_index(), 1);
    }

    #[test]
    fn test_arrows_follow_clamp() {
        let mut carousel = Carousel::new(slides(5), config(), DESKTOP);
        assert!(!carousel.can_go_previous());
        assert!(carousel.can_go_next());

        for _ in 0..10 {
            carousel.next();
        }
        assert_eq!(carousel.current_index(), 4);
        assert!(!carousel.can_go_next());
        assert!(carousel.can_go_previous());

        carousel.previous();
        assert_eq!(carousel.current_index(), 3);
    }

    #[test]
    fn test_go_to_clamps_index() {
        let mut carousel = Carousel::new(slides(3), config(), DESKTOP);
        carousel.go_to(99);
        assert_eq!(carousel.current_index(), 2);
        assert!(carousel.translate_offset() >= carousel.min_translate());
    }

    #[test]
    fn test_empty_carousel_is_inert() {
        let mut carousel = Carousel::new(Vec::new(), config(), DESKTOP);
        carousel.go_to(3);
        carousel.next();
        drag(&mut carousel, 500.0, -400.0);
        assert_eq!(carousel.current_index(), 0);
        assert_close(carousel.translate_offset(), 0.0);
        assert!(!carousel.can_go_next());
    }

    #[test]
    fn test_resize_reclamps_without_changing_index() {
        let mut carousel = Carousel::new(slides(5), config(), DESKTOP);
        carousel.go_to(4);
        assert_close(carousel.translate_offset(), -2100.0);

        // Crossing the breakpoint shrinks slides to 300px: content is 1580px
        carousel.resize(700.0);

        assert_eq!(carousel.current_index(), 4);
        assert_close(carousel.slide_width(), 300.0);
        assert_close(carousel.min_translate(), -880.0);
        assert_close(carousel.translate_offset(), -880.0);
    }

    #[test]
    fn test_resize_during_drag_keeps_gesture() {
        let mut carousel = Carousel::new(slides(5), config(), DESKTOP);
        carousel.go_to(4);
        carousel.gesture_start(500.0);
        carousel.resize(700.0);

        assert!(carousel.is_dragging());
        assert_close(carousel.translate_offset(), -880.0);
        carousel.gesture_end();
        assert_eq!(carousel.current_index(), 4);
    }

    #[test]
    fn test_wheel_burst_advances_once() {
        let mut carousel = Carousel::new(slides(5), config(), DESKTOP);
        let start = Instant::now();

        for ms in 0..5 {
            let at = start + Duration::from_millis(ms * 10);
            assert_eq!(carousel.wheel(6.0, 1.0, at), WheelDisposition::Captured);
        }
        assert!(!carousel.poll_wheel(start + Duration::from_millis(60)));
        assert!(carousel.poll_wheel(start + Duration::from_millis(100)));
        assert_eq!(carousel.current_index(), 1);
    }

    #[test]
    fn test_vertical_wheel_is_not_intercepted() {
        let mut carousel = Carousel::new(slides(5), config(), DESKTOP);
        let now = Instant::now();
        assert_eq!(carousel.wheel(1.0, 20.0, now), WheelDisposition::PassThrough);
        assert!(carousel.wheel_deadline().is_none());
    }

    #[test]
    fn test_unmount_during_drag_cleans_up() {
        let mut carousel = Carousel::new(slides(5), config(), DESKTOP);
        let now = Instant::now();
        carousel.wheel(-30.0, 0.0, now);
        carousel.gesture_start(600.0);
        carousel.gesture_move(300.0);

        carousel.apply(CarouselEvent::Unmount);

        assert!(!carousel.is_dragging());
        assert!(carousel.wheel_deadline().is_none());
        assert_eq!(carousel.current_index(), 0);
        assert_close(carousel.translate_offset(), 0.0);
    }

    #[test]
    fn test_reduce_is_event_driven() {
        let carousel = Carousel::new(slides(5), config(), DESKTOP)
            .reduce(CarouselEvent::GoTo(2))
            .reduce(CarouselEvent::GestureStart { pointer_x: 900.0 })
            .reduce(CarouselEvent::GestureMove { pointer_x: 750.0 })
            .reduce(CarouselEvent::GestureEnd);
        assert_eq!(carousel.current_index(), 3);
    }

    /// An event whose timestamp is filled in when the sequence is replayed.
    #[derive(Debug, Clone)]
    enum TimedStep {
        Event(CarouselEvent),
        Wheel { delta_x: f32, delta_y: f32 },
        Tick,
    }

    fn step_strategy() -> impl Strategy<Value = TimedStep> {
        prop_oneof![
            (-2000.0f32..4000.0)
                .prop_map(|x| TimedStep::Event(CarouselEvent::GestureStart { pointer_x: x })),
            (-2000.0f32..4000.0)
                .prop_map(|x| TimedStep::Event(CarouselEvent::GestureMove { pointer_x: x })),
            Just(TimedStep::Event(CarouselEvent::GestureEnd)),
            (0usize..20).prop_map(|index| TimedStep::Event(CarouselEvent::GoTo(index))),
            Just(TimedStep::Event(CarouselEvent::Next)),
            Just(TimedStep::Event(CarouselEvent::Previous)),
            (200.0f32..5000.0)
                .prop_map(|w| TimedStep::Event(CarouselEvent::Resize { viewport_width: w })),
            (-120.0f32..120.0, -120.0f32..120.0)
                .prop_map(|(delta_x, delta_y)| TimedStep::Wheel { delta_x, delta_y }),
            Just(TimedStep::Tick),
            Just(TimedStep::Event(CarouselEvent::Unmount)),
        ]
    }

    proptest! {
        #[test]
        fn prop_offset_and_index_stay_in_bounds(
            count in 0usize..12,
            viewport in 200.0f32..5000.0,
            steps in prop::collection::vec((0u64..120, step_strategy()), 0..80),
        ) {
            let mut carousel = Carousel::new(slides(count), config(), viewport);
            let mut now = Instant::now();
            for (advance_ms, step) in steps {
                now += Duration::from_millis(advance_ms);
                let event = match step {
                    TimedStep::Event(event) => event,
                    TimedStep::Wheel { delta_x, delta_y } => {
                        CarouselEvent::Wheel { delta_x, delta_y, at: now }
                    }
                    TimedStep::Tick => CarouselEvent::Tick { now },
                };
                carousel.apply(event);
                prop_assert!(carousel.translate_offset() <= 0.0);
                prop_assert!(carousel.translate_offset() >= carousel.min_translate());
                prop_assert!(carousel.current_index() <= count.saturating_sub(1));
            }
        }
    }
}
