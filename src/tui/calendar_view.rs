//! Booking band: destination, check-in/check-out month grids and guests.

use chrono::NaiveDate;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::Theme;
use crate::calendar::{
    BookingSearch, CalendarId, DateRangePicker, DayCell, GuestField, WEEKDAY_HEADERS,
};

/// What the booking band currently has focused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarFocus {
    /// Focused calendar
    pub calendar: CalendarId,
    /// Day under the cursor
    pub cursor: NaiveDate,
}

/// Splits a month grid into Sunday-first weeks, padding the first week.
#[must_use]
pub fn week_rows(picker: &DateRangePicker, calendar: CalendarId) -> Vec<Vec<Option<DayCell>>> {
    let blanks = picker.month(calendar).leading_blanks() as usize;
    let mut cells: Vec<Option<DayCell>> = vec![None; blanks];
    cells.extend(picker.grid(calendar).into_iter().map(Some));
    cells.chunks(7).map(<[_]>::to_vec).collect()
}

/// Renders the booking band.
pub fn render_booking(
    f: &mut Frame,
    area: Rect,
    search: &BookingSearch,
    focus: Option<CalendarFocus>,
    guest_field: GuestField,
    theme: &Theme,
) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(10), Constraint::Length(3)])
        .split(area);
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[0]);

    for (calendar, column) in [CalendarId::CheckIn, CalendarId::CheckOut]
        .into_iter()
        .zip(columns.iter())
    {
        let cursor = focus
            .filter(|focus| focus.calendar == calendar)
            .map(|focus| focus.cursor);
        render_month(f, *column, &search.dates, calendar, cursor, theme);
    }

    let guests = GuestField::ALL
        .iter()
        .map(|field| {
            let style = if *field == guest_field {
                Style::default().fg(theme.accent)
            } else {
                Style::default().fg(theme.text_secondary)
            };
            Span::styled(
                format!("{} {}  ", field.label(), search.guests.get(*field)),
                style,
            )
        })
        .collect::<Vec<_>>();

    let summary = vec![
        Line::from(Span::styled(
            search.summary(),
            Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
        )),
        Line::from(guests),
    ];
    f.render_widget(
        Paragraph::new(summary).block(
            Block::default()
                .borders(Borders::TOP)
                .border_style(Style::default().fg(theme.inactive)),
        ),
        rows[1],
    );
}

fn render_month(
    f: &mut Frame,
    area: Rect,
    picker: &DateRangePicker,
    calendar: CalendarId,
    cursor: Option<NaiveDate>,
    theme: &Theme,
) {
    let border = if cursor.is_some() {
        theme.active
    } else {
        theme.inactive
    };
    let title = format!(
        " {}: {} ",
        calendar.label(),
        picker.date_label(calendar)
    );

    let mut lines = vec![
        Line::from(Span::styled(
            format!("‹ {} ›", picker.month(calendar).label()),
            Style::default().fg(theme.primary).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            WEEKDAY_HEADERS.map(|d| format!("{d} ")).concat(),
            Style::default().fg(theme.text_secondary),
        )),
    ];

    for week in week_rows(picker, calendar) {
        let spans = week
            .into_iter()
            .map(|cell| match cell {
                None => Span::raw("   "),
                Some(cell) => Span::styled(
                    format!("{:>2} ", chrono::Datelike::day(&cell.date)),
                    day_style(&cell, cursor == Some(cell.date), theme),
                ),
            })
            .collect::<Vec<_>>();
        lines.push(Line::from(spans));
    }

    f.render_widget(
        Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .border_style(Style::default().fg(border)),
        ),
        area,
    );
}

fn day_style(cell: &DayCell, under_cursor: bool, theme: &Theme) -> Style {
    let mut style = if cell.disabled {
        Style::default().fg(theme.text_muted)
    } else {
        Style::default().fg(theme.text)
    };
    if cell.in_range {
        style = style.bg(theme.highlight_bg);
    }
    if cell.selected {
        style = style
            .fg(theme.background)
            .bg(theme.accent)
            .add_modifier(Modifier::BOLD);
    }
    if under_cursor {
        style = style.add_modifier(Modifier::REVERSED);
    }
    style
}
