//! Month grids with Sunday-first weeks.

use chrono::{Datelike, Months, NaiveDate};

/// Column headers for a Sunday-first week.
pub const WEEKDAY_HEADERS: [&str; 7] = ["Su", "Mo", "Tu", "We", "Th", "Fr", "Sa"];

/// A displayed calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MonthView {
    first: NaiveDate,
}

impl MonthView {
    /// The month containing `date`.
    #[must_use]
    pub fn containing(date: NaiveDate) -> Self {
        Self {
            first: date.with_day(1).unwrap_or(date),
        }
    }

    /// The given month, or `None` for an invalid year/month pair.
    #[must_use]
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(|first| Self { first })
    }

    /// Calendar year.
    #[must_use]
    pub fn year(&self) -> i32 {
        self.first.year()
    }

    /// Month number, 1 = January.
    #[must_use]
    pub fn month(&self) -> u32 {
        self.first.month()
    }

    /// First day of the month.
    #[must_use]
    pub const fn first_day(&self) -> NaiveDate {
        self.first
    }

    /// Moves by `delta` months, wrapping across years. Shifts past the
    /// representable date range leave the view unchanged.
    #[must_use]
    pub fn shift(self, delta: i32) -> Self {
        let months = Months::new(delta.unsigned_abs());
        let shifted = if delta >= 0 {
            self.first.checked_add_months(months)
        } else {
            self.first.checked_sub_months(months)
        };
        shifted.map_or(self, |first| Self { first })
    }

    /// Number of days in the month.
    #[must_use]
    pub fn days_in_month(&self) -> u32 {
        // Bounded by 31
        #[allow(clippy::cast_possible_truncation)]
        let count = self.days().count() as u32;
        count
    }

    /// Blank cells before day 1 in a Sunday-first week.
    #[must_use]
    pub fn leading_blanks(&self) -> u32 {
        self.first.weekday().num_days_from_sunday()
    }

    /// Display label, e.g. "June 2025".
    #[must_use]
    pub fn label(&self) -> String {
        self.first.format("%B %Y").to_string()
    }

    /// Every day of the month in order.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let month = self.first.month();
        self.first.iter_days().take_while(move |day| day.month() == month)
    }

    /// Grid cells: leading blanks followed by each day.
    #[must_use]
    pub fn cells(&self) -> Vec<Option<NaiveDate>> {
        let mut cells = vec![None; self.leading_blanks() as usize];
        cells.extend(self.days().map(Some));
        cells
    }

    /// True if `date` falls in this month.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year() && date.month() == self.month()
    }
}
