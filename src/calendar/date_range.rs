//! Check-in/check-out range selection.
//!
//! The picker holds two dependent selections. Check-in may not precede
//! "today"; check-out must fall strictly after check-in (or after today
//! while check-in is unset). Invalid picks are ignored rather than
//! reported, and moving check-in onto or past the current check-out pushes
//! check-out to the following day.

use chrono::{Days, Local, NaiveDate, NaiveDateTime};
use serde::Serialize;
use tracing::debug;

use super::MonthView;

/// Which of the two calendars an operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CalendarId {
    /// Arrival date calendar
    CheckIn,
    /// Departure date calendar
    CheckOut,
}

impl CalendarId {
    /// The other calendar.
    #[must_use]
    pub const fn other(self) -> Self {
        match self {
            Self::CheckIn => Self::CheckOut,
            Self::CheckOut => Self::CheckIn,
        }
    }

    /// Field label shown above the calendar.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::CheckIn => "Check-in",
            Self::CheckOut => "Check-out",
        }
    }
}

/// A reservation window. When both ends are set, `check_out > check_in`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    /// Arrival date
    pub check_in: Option<NaiveDate>,
    /// Departure date
    pub check_out: Option<NaiveDate>,
}

impl DateRange {
    /// Nights between the two dates, when both are set.
    #[must_use]
    pub fn nights(&self) -> Option<i64> {
        Some((self.check_out? - self.check_in?).num_days())
    }

    /// True if `date` lies strictly between check-in and check-out.
    #[must_use]
    pub fn contains_strictly(&self, date: NaiveDate) -> bool {
        match (self.check_in, self.check_out) {
            (Some(start), Some(end)) => start < date && date < end,
            _ => false,
        }
    }
}

/// One day in a rendered month grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayCell {
    /// The day
    pub date: NaiveDate,
    /// Not selectable in this calendar
    pub disabled: bool,
    /// The calendar's current selection
    pub selected: bool,
    /// Strictly inside the selected range
    pub in_range: bool,
}

/// Two-calendar date range picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateRangePicker {
    today: NaiveDate,
    max_date: Option<NaiveDate>,
    range: DateRange,
    check_in_view: MonthView,
    check_out_view: MonthView,
}

impl DateRangePicker {
    /// Creates an empty picker whose floor date is `today`.
    #[must_use]
    pub fn new(today: NaiveDate) -> Self {
        let view = MonthView::containing(today);
        Self {
            today,
            max_date: None,
            range: DateRange::default(),
            check_in_view: view,
            check_out_view: view,
        }
    }

    /// Creates a picker anchored at the local calendar date.
    #[must_use]
    pub fn for_local_today() -> Self {
        Self::new(Local::now().date_naive())
    }

    /// Sets the last selectable day for both calendars.
    #[must_use]
    pub const fn with_max_date(mut self, max_date: Option<NaiveDate>) -> Self {
        self.max_date = max_date;
        self
    }

    /// The floor date for check-in.
    #[must_use]
    pub const fn today(&self) -> NaiveDate {
        self.today
    }

    /// The configured ceiling, if any.
    #[must_use]
    pub const fn max_date(&self) -> Option<NaiveDate> {
        self.max_date
    }

    /// Current selection.
    #[must_use]
    pub const fn range(&self) -> DateRange {
        self.range
    }

    /// Selected check-in date.
    #[must_use]
    pub const fn check_in(&self) -> Option<NaiveDate> {
        self.range.check_in
    }

    /// Selected check-out date.
    #[must_use]
    pub const fn check_out(&self) -> Option<NaiveDate> {
        self.range.check_out
    }

    /// Selected date for a calendar.
    #[must_use]
    pub const fn selected(&self, calendar: CalendarId) -> Option<NaiveDate> {
        match calendar {
            CalendarId::CheckIn => self.range.check_in,
            CalendarId::CheckOut => self.range.check_out,
        }
    }

    /// Earliest selectable check-out: the day after check-in, or the day
    /// after today while check-in is unset. `None` when the calendar has no
    /// later day, in which case every check-out is disabled.
    #[must_use]
    pub fn min_check_out_date(&self) -> Option<NaiveDate> {
        next_day(self.range.check_in.unwrap_or(self.today))
    }

    /// Earliest selectable day in a calendar, if any.
    #[must_use]
    pub fn floor_date(&self, calendar: CalendarId) -> Option<NaiveDate> {
        match calendar {
            CalendarId::CheckIn => Some(self.today),
            CalendarId::CheckOut => self.min_check_out_date(),
        }
    }

    /// True if `date` cannot be picked in `calendar`.
    #[must_use]
    pub fn is_disabled(&self, calendar: CalendarId, date: NaiveDate) -> bool {
        !self.floor_date(calendar).is_some_and(|floor| date >= floor)
            || self.max_date.is_some_and(|max| date > max)
    }

    /// Picks an arrival date. Returns false (and changes nothing) for a day
    /// before today or after the ceiling.
    pub fn select_check_in(&mut self, date: NaiveDate) -> bool {
        if self.is_disabled(CalendarId::CheckIn, date) {
            debug!(%date, "ignored check-in before floor date");
            return false;
        }

        self.range.check_in = Some(date);
        if self.range.check_out.is_some_and(|out| out <= date) {
            let repaired = next_day(date).filter(|d| !self.max_date.is_some_and(|max| *d > max));
            debug!(%date, ?repaired, "moved check-out after new check-in");
            self.range.check_out = repaired;
        }
        true
    }

    /// Picks a departure date. Returns false (and changes nothing) for a
    /// day before [`min_check_out_date`](Self::min_check_out_date) or
    /// after the ceiling.
    pub fn select_check_out(&mut self, date: NaiveDate) -> bool {
        if self.is_disabled(CalendarId::CheckOut, date) {
            debug!(%date, "ignored check-out before floor date");
            return false;
        }

        self.range.check_out = Some(date);
        true
    }

    /// Picks a date in the given calendar.
    pub fn select(&mut self, calendar: CalendarId, date: NaiveDate) -> bool {
        match calendar {
            CalendarId::CheckIn => self.select_check_in(date),
            CalendarId::CheckOut => self.select_check_out(date),
        }
    }

    /// Picks the day of a timestamp; time of day is ignored.
    pub fn select_at(&mut self, calendar: CalendarId, at: NaiveDateTime) -> bool {
        self.select(calendar, at.date())
    }

    /// Resets both dates. Month views stay where they are.
    pub fn clear(&mut self) {
        self.range = DateRange::default();
    }

    /// Nights in the selected range.
    #[must_use]
    pub fn nights(&self) -> Option<i64> {
        self.range.nights()
    }

    /// Month displayed by a calendar.
    #[must_use]
    pub const fn month(&self, calendar: CalendarId) -> MonthView {
        match calendar {
            CalendarId::CheckIn => self.check_in_view,
            CalendarId::CheckOut => self.check_out_view,
        }
    }

    /// Shifts one calendar's displayed month by `direction` months. The
    /// other calendar and the selection are unaffected.
    pub fn navigate_month(&mut self, calendar: CalendarId, direction: i32) {
        let view = match calendar {
            CalendarId::CheckIn => &mut self.check_in_view,
            CalendarId::CheckOut => &mut self.check_out_view,
        };
        *view = view.shift(direction);
    }

    /// Cells for the month a calendar is displaying.
    #[must_use]
    pub fn grid(&self, calendar: CalendarId) -> Vec<DayCell> {
        let selected = self.selected(calendar);
        self.month(calendar)
            .days()
            .map(|date| DayCell {
                date,
                disabled: self.is_disabled(calendar, date),
                selected: selected == Some(date),
                in_range: self.range.contains_strictly(date),
            })
            .collect()
    }

    /// Button text for a calendar: "Jun 10", or "Add date" when unset.
    #[must_use]
    pub fn date_label(&self, calendar: CalendarId) -> String {
        self.selected(calendar)
            .map_or_else(|| "Add date".to_string(), format_date)
    }
}

/// Short display form, e.g. "Jun 10".
#[must_use]
pub fn format_date(date: NaiveDate) -> String {
    date.format("%b %d").to_string()
}

fn next_day(date: NaiveDate) -> Option<NaiveDate> {
    date.checked_add_days(Days::new(1))
}
