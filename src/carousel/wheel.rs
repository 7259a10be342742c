//! Horizontal wheel/trackpad coalescing.
//!
//! Trackpads emit bursts of small wheel deltas. A [`WheelDebouncer`] folds a
//! burst into a single navigation step once the input has been quiet for the
//! configured window. Time is passed in explicitly so the debouncer stays
//! deterministic under test.

use std::time::{Duration, Instant};

/// A cancellable one-shot timer.
///
/// Scheduling always replaces the pending deadline; there is never more than
/// one outstanding timer per instance.
#[derive(Debug, Clone)]
pub struct DebounceTimer {
    window: Duration,
    deadline: Option<Instant>,
}

impl DebounceTimer {
    /// Creates an idle timer with the given window.
    #[must_use]
    pub const fn new(window: Duration) -> Self {
        Self {
            window,
            deadline: None,
        }
    }

    /// Cancels any pending deadline and schedules a new one `window` after `now`.
    pub fn schedule(&mut self, now: Instant) {
        self.deadline = Some(now + self.window);
    }

    /// Drops the pending deadline, if any.
    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    /// Returns true while a deadline is outstanding.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Pending deadline, if any.
    #[must_use]
    pub const fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Consumes the deadline if it has elapsed at `now`.
    pub fn take_if_due(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

/// What the caller should do with a wheel event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WheelDisposition {
    /// Vertical (or empty) input: let the page scroll normally
    PassThrough,
    /// Horizontal input consumed by the carousel
    Captured,
}

/// Direction of a coalesced wheel burst.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WheelDirection {
    /// Towards later slides
    Forward,
    /// Towards earlier slides
    Backward,
}

/// Folds bursts of horizontal wheel deltas into single steps.
#[derive(Debug, Clone)]
pub struct WheelDebouncer {
    timer: DebounceTimer,
    accumulated_dx: f32,
}

impl WheelDebouncer {
    /// Creates a debouncer with the given coalescing window.
    #[must_use]
    pub const fn new(window: Duration) -> Self {
        Self {
            timer: DebounceTimer::new(window),
            accumulated_dx: 0.0,
        }
    }

    /// Feeds one wheel event.
    ///
    /// Only input whose horizontal magnitude dominates the vertical one is
    /// captured. Each captured event restarts the window.
    pub fn on_wheel(&mut self, delta_x: f32, delta_y: f32, now: Instant) -> WheelDisposition {
        if delta_x == 0.0 || delta_x.abs() <= delta_y.abs() {
            return WheelDisposition::PassThrough;
        }

        self.accumulated_dx += delta_x;
        self.timer.schedule(now);
        WheelDisposition::Captured
    }

    /// Returns the burst direction once the window has elapsed quietly.
    pub fn poll(&mut self, now: Instant) -> Option<WheelDirection> {
        if !self.timer.take_if_due(now) {
            return None;
        }

        let dx = std::mem::take(&mut self.accumulated_dx);
        if dx > 0.0 {
            Some(WheelDirection::Forward)
        } else if dx < 0.0 {
            Some(WheelDirection::Backward)
        } else {
            None
        }
    }

    /// Cancels the pending step and forgets accumulated input.
    pub fn cancel(&mut self) {
        self.timer.cancel();
        self.accumulated_dx = 0.0;
    }

    /// Returns true while a step is waiting for its window to elapse.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.timer.is_pending()
    }

    /// Deadline of the pending step, used by event loops to size their poll timeout.
    #[must_use]
    pub const fn deadline(&self) -> Option<Instant> {
        self.timer.deadline()
    }
}
