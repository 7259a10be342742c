//! Booking search form state.

use std::fmt;

use super::{CalendarId, DateRangePicker, GuestCounts};

/// Destinations offered by the search form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Destination {
    /// Italy
    Italy,
    /// Greece
    Greece,
    /// Portugal
    Portugal,
}

impl Destination {
    /// All destinations in display order.
    pub const ALL: [Self; 3] = [Self::Italy, Self::Greece, Self::Portugal];

    /// Display name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Italy => "Italy",
            Self::Greece => "Greece",
            Self::Portugal => "Portugal",
        }
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Destination, dates and party size for the homepage search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingSearch {
    /// Chosen destination
    pub destination: Option<Destination>,
    /// Date range
    pub dates: DateRangePicker,
    /// Party size
    pub guests: GuestCounts,
}

impl BookingSearch {
    /// An empty search over the given picker.
    #[must_use]
    pub fn new(dates: DateRangePicker) -> Self {
        Self {
            destination: None,
            dates,
            guests: GuestCounts::default(),
        }
    }

    /// Cycles to the next destination, starting from the first.
    pub fn cycle_destination(&mut self) {
        let next = match self.destination {
            None => 0,
            Some(current) => {
                let index = Destination::ALL
                    .iter()
                    .position(|d| *d == current)
                    .unwrap_or(0);
                (index + 1) % Destination::ALL.len()
            }
        };
        self.destination = Some(Destination::ALL[next]);
    }

    /// True once destination and both dates are chosen.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.destination.is_some() && self.dates.nights().is_some()
    }

    /// One-line summary: "Italy · Jun 10 → Jun 12 (2 nights) · 2 guests, 1 room".
    #[must_use]
    pub fn summary(&self) -> String {
        let destination = self
            .destination
            .map_or("Where are you going?", Destination::name);
        let mut dates = format!(
            "{} → {}",
            self.dates.date_label(CalendarId::CheckIn),
            self.dates.date_label(CalendarId::CheckOut)
        );
        if let Some(nights) = self.dates.nights() {
            let plural = if nights == 1 { "" } else { "s" };
            dates.push_str(&format!(" ({nights} night{plural})"));
        }
        format!("{destination} · {dates} · {}", self.guests.summary())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_empty_summary() {
        let search = BookingSearch::new(DateRangePicker::new(date(2025, 6, 1)));
        assert_eq!(
            search.summary(),
            "Where are you going? · Add date → Add date · 2 guests, 1 room"
        );
        assert!(!search.is_complete());
    }

    #[test]
    fn test_complete_summary() {
        let mut search = BookingSearch::new(DateRangePicker::new(date(2025, 6, 1)));
        search.cycle_destination();
        search.cycle_destination();
        search.dates.select_check_in(date(2025, 6, 10));
        search.dates.select_check_out(date(2025, 6, 12));

        assert_eq!(search.destination, Some(Destination::Greece));
        assert!(search.is_complete());
        assert_eq!(
            search.summary(),
            "Greece · Jun 10 → Jun 12 (2 nights) · 2 guests, 1 room"
        );
    }

    #[test]
    fn test_destination_cycle_wraps() {
        let mut search = BookingSearch::new(DateRangePicker::new(date(2025, 6, 1)));
        for _ in 0..4 {
            search.cycle_destination();
        }
        assert_eq!(search.destination, Some(Destination::Italy));
    }
}
