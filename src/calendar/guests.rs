//! Guest and room counters.

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

/// A counter in [`GuestCounts`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GuestField {
    /// Adults, at least one
    Adults,
    /// Children
    Children,
    /// Rooms, at least one
    Rooms,
}

impl GuestField {
    /// All counters in display order.
    pub const ALL: [Self; 3] = [Self::Adults, Self::Children, Self::Rooms];

    /// Allowed values for this counter.
    #[must_use]
    pub const fn limits(self) -> RangeInclusive<u8> {
        match self {
            Self::Adults => 1..=10,
            Self::Children => 0..=10,
            Self::Rooms => 1..=5,
        }
    }

    /// Row label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Adults => "Adults",
            Self::Children => "Children",
            Self::Rooms => "Rooms",
        }
    }
}

/// Party size for a booking search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuestCounts {
    /// Adults
    pub adults: u8,
    /// Children
    pub children: u8,
    /// Rooms
    pub rooms: u8,
}

impl Default for GuestCounts {
    fn default() -> Self {
        Self {
            adults: 2,
            children: 0,
            rooms: 1,
        }
    }
}

impl GuestCounts {
    /// Current value of a counter.
    #[must_use]
    pub const fn get(&self, field: GuestField) -> u8 {
        match field {
            GuestField::Adults => self.adults,
            GuestField::Children => self.children,
            GuestField::Rooms => self.rooms,
        }
    }

    fn slot(&mut self, field: GuestField) -> &mut u8 {
        match field {
            GuestField::Adults => &mut self.adults,
            GuestField::Children => &mut self.children,
            GuestField::Rooms => &mut self.rooms,
        }
    }

    /// Adds one unless at the maximum. Returns true if the value changed.
    pub fn increment(&mut self, field: GuestField) -> bool {
        let max = *field.limits().end();
        let slot = self.slot(field);
        if *slot >= max {
            return false;
        }
        *slot += 1;
        true
    }

    /// Removes one unless at the minimum. Returns true if the value changed.
    pub fn decrement(&mut self, field: GuestField) -> bool {
        let min = *field.limits().start();
        let slot = self.slot(field);
        if *slot <= min {
            return false;
        }
        *slot -= 1;
        true
    }

    /// Adults plus children.
    #[must_use]
    pub const fn total_guests(&self) -> u32 {
        self.adults as u32 + self.children as u32
    }

    /// "3 guests, 1 room".
    #[must_use]
    pub fn summary(&self) -> String {
        let guests = self.total_guests();
        format!(
            "{guests} guest{}, {} room{}",
            if guests == 1 { "" } else { "s" },
            self.rooms,
            if self.rooms == 1 { "" } else { "s" },
        )
    }
}
