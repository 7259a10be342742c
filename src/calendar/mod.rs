//! Booking calendar: check-in/check-out range selection with two
//! independently navigable month grids, plus the guest counter and the
//! search summary built on top of them.

pub mod booking;
pub mod date_range;
pub mod guests;
pub mod month;

pub use booking::{BookingSearch, Destination};
pub use date_range::{CalendarId, DateRange, DateRangePicker, DayCell};
pub use guests::{GuestCounts, GuestField};
pub use month::{MonthView, WEEKDAY_HEADERS};
