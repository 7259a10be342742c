//! Terminal preview of the homepage widgets.
//!
//! This module contains the preview loop, `PreviewState`, event handling,
//! and the carousel and booking bands rendered with Ratatui.

// Allow intentional type casts for terminal coordinates
#![allow(clippy::cast_possible_truncation)]

pub mod calendar_view;
pub mod carousel_view;
pub mod theme;

use std::io;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use chrono::{Datelike, Days, Months, NaiveDate};
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Paragraph},
    Frame, Terminal,
};
use tracing::debug;

pub use calendar_view::CalendarFocus;
pub use theme::Theme;

use crate::calendar::{BookingSearch, CalendarId, DateRangePicker, GuestField};
use crate::carousel::{Carousel, CarouselEvent};
use crate::config::Config;
use crate::models::Slide;
use calendar_view::render_booking;
use carousel_view::{band_layout, cells_to_px, pointer_x, render_carousel};

/// Horizontal pixels per wheel notch.
pub const WHEEL_STEP_PX: f32 = 40.0;

/// Poll interval while no wheel timer is pending.
const IDLE_POLL: Duration = Duration::from_millis(250);

/// Height of the carousel band in rows.
const CAROUSEL_ROWS: u16 = 9;

/// Which band receives keyboard input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    /// Arrow keys drive the carousel
    Carousel,
    /// Arrow keys move the day cursor of a calendar
    Calendar(CalendarId),
}

impl Focus {
    const fn next(self) -> Self {
        match self {
            Self::Carousel => Self::Calendar(CalendarId::CheckIn),
            Self::Calendar(CalendarId::CheckIn) => Self::Calendar(CalendarId::CheckOut),
            Self::Calendar(CalendarId::CheckOut) => Self::Carousel,
        }
    }

    const fn previous(self) -> Self {
        match self {
            Self::Carousel => Self::Calendar(CalendarId::CheckOut),
            Self::Calendar(CalendarId::CheckIn) => Self::Carousel,
            Self::Calendar(CalendarId::CheckOut) => Self::Calendar(CalendarId::CheckIn),
        }
    }
}

/// Everything the preview shows and edits.
pub struct PreviewState {
    /// Carousel reducer
    pub carousel: Carousel,
    /// Destination, dates and guests
    pub booking: BookingSearch,
    /// Focused band
    pub focus: Focus,
    /// Day cursor of the focused calendar
    pub cursor: NaiveDate,
    /// Guest counter changed by `g`/`G`
    pub guest_field: GuestField,
    /// Active theme
    pub theme: Theme,
    /// Last action, shown in the help line
    pub status: Option<String>,
    /// Set when the user asked to quit
    pub should_quit: bool,
    area: Rect,
}

impl PreviewState {
    /// Builds the preview for a terminal of size `area`.
    pub fn new(slides: Vec<Slide>, config: &Config, area: Rect, dates: DateRangePicker) -> Self {
        let track = Self::track_for(area);
        Self {
            carousel: Carousel::new(slides, config.carousel.clone(), cells_to_px(track.width)),
            cursor: dates.today(),
            booking: BookingSearch::new(dates),
            focus: Focus::Carousel,
            guest_field: GuestField::Adults,
            theme: Theme::from_mode(config.ui.theme_mode),
            status: None,
            should_quit: false,
            area,
        }
    }

    /// Splits the screen into carousel band, booking band and help line.
    #[must_use]
    pub fn layout(area: Rect) -> (Rect, Rect, Rect) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(CAROUSEL_ROWS),
                Constraint::Min(10),
                Constraint::Length(1),
            ])
            .split(area);
        (rows[0], rows[1], rows[2])
    }

    fn track_for(area: Rect) -> Rect {
        band_layout(Self::layout(area).0).0
    }

    /// Carousel track area for the current terminal size.
    #[must_use]
    pub fn track(&self) -> Rect {
        Self::track_for(self.area)
    }

    /// How long the loop may block waiting for input.
    #[must_use]
    pub fn poll_timeout(&self, now: Instant) -> Duration {
        self.carousel
            .wheel_deadline()
            .map_or(IDLE_POLL, |deadline| {
                deadline.saturating_duration_since(now).min(IDLE_POLL)
            })
    }

    /// Fires due timers.
    pub fn tick(&mut self, now: Instant) {
        self.carousel.apply(CarouselEvent::Tick { now });
    }

    /// Dispatches one terminal event.
    pub fn handle_event(&mut self, event: &Event, now: Instant) {
        match event {
            Event::Key(key) if key.kind != KeyEventKind::Release => self.handle_key(*key),
            Event::Mouse(mouse) => self.handle_mouse(*mouse, now),
            Event::Resize(width, height) => self.resize(*width, *height),
            _ => {}
        }
    }

    /// Tracks a new terminal size and re-lays out the carousel.
    pub fn resize(&mut self, width: u16, height: u16) {
        self.area = Rect::new(0, 0, width, height);
        let viewport_width = cells_to_px(self.track().width);
        debug!(width, height, viewport_width, "terminal resized");
        self.carousel.apply(CarouselEvent::Resize { viewport_width });
    }

    /// Handles keyboard input.
    pub fn handle_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
            }
            KeyCode::Tab => self.set_focus(self.focus.next()),
            KeyCode::BackTab => self.set_focus(self.focus.previous()),
            KeyCode::Char('g') => self.change_guests(true),
            KeyCode::Char('G') => self.change_guests(false),
            KeyCode::Char('f') => {
                let index = GuestField::ALL
                    .iter()
                    .position(|f| *f == self.guest_field)
                    .map_or(0, |i| (i + 1) % GuestField::ALL.len());
                self.guest_field = GuestField::ALL[index];
            }
            KeyCode::Char('d') => {
                self.booking.cycle_destination();
                self.status = self.booking.destination.map(|d| format!("Destination: {d}"));
            }
            KeyCode::Char('c') => {
                self.booking.dates.clear();
                self.status = Some("Dates cleared".to_string());
            }
            _ => match self.focus {
                Focus::Carousel => self.carousel_key(key.code),
                Focus::Calendar(calendar) => self.calendar_key(calendar, key.code),
            },
        }
    }

    fn carousel_key(&mut self, code: KeyCode) {
        let event = match code {
            KeyCode::Left => CarouselEvent::Previous,
            KeyCode::Right => CarouselEvent::Next,
            KeyCode::Home => CarouselEvent::GoTo(0),
            KeyCode::End => CarouselEvent::GoTo(self.carousel.slide_count().saturating_sub(1)),
            _ => return,
        };
        self.carousel.apply(event);
    }

    fn calendar_key(&mut self, calendar: CalendarId, code: KeyCode) {
        let cursor = self.cursor;
        let moved = match code {
            KeyCode::Left => cursor.checked_sub_days(Days::new(1)),
            KeyCode::Right => cursor.checked_add_days(Days::new(1)),
            KeyCode::Up => cursor.checked_sub_days(Days::new(7)),
            KeyCode::Down => cursor.checked_add_days(Days::new(7)),
            KeyCode::Char('[') => cursor.checked_sub_months(Months::new(1)),
            KeyCode::Char(']') => cursor.checked_add_months(Months::new(1)),
            KeyCode::Enter | KeyCode::Char(' ') => {
                self.select(calendar);
                return;
            }
            _ => return,
        };

        if let Some(moved) = moved {
            self.cursor = moved;
            self.follow_cursor(calendar);
        }
    }

    fn select(&mut self, calendar: CalendarId) {
        let date = self.cursor;
        let accepted = self.booking.dates.select(calendar, date);
        self.status = Some(if accepted {
            format!("{} set to {}", calendar.label(), date.format("%b %d"))
        } else {
            format!("{} is not available for {}", date.format("%b %d"), calendar.label())
        });
    }

    fn change_guests(&mut self, increment: bool) {
        let guests = &mut self.booking.guests;
        let changed = if increment {
            guests.increment(self.guest_field)
        } else {
            guests.decrement(self.guest_field)
        };
        if changed {
            self.status = Some(guests.summary());
        }
    }

    fn set_focus(&mut self, focus: Focus) {
        self.focus = focus;
        if let Focus::Calendar(calendar) = focus {
            let dates = &self.booking.dates;
            self.cursor = dates
                .selected(calendar)
                .or_else(|| dates.floor_date(calendar))
                .unwrap_or_else(|| dates.today());
            self.follow_cursor(calendar);
        }
    }

    /// Navigates the calendar so the cursor's month is displayed.
    fn follow_cursor(&mut self, calendar: CalendarId) {
        let view = self.booking.dates.month(calendar);
        let delta = (self.cursor.year() - view.year()) * 12 + self.cursor.month() as i32
            - view.month() as i32;
        if delta != 0 {
            self.booking.dates.navigate_month(calendar, delta);
        }
    }

    /// Handles mouse input over the carousel track.
    pub fn handle_mouse(&mut self, mouse: MouseEvent, now: Instant) {
        let track = self.track();
        let over_track = track.contains(ratatui::layout::Position::new(mouse.column, mouse.row));
        let x = pointer_x(mouse.column, track);

        let event = match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) if over_track => {
                self.focus = Focus::Carousel;
                CarouselEvent::GestureStart { pointer_x: x }
            }
            MouseEventKind::Drag(MouseButton::Left) => CarouselEvent::GestureMove { pointer_x: x },
            MouseEventKind::Up(MouseButton::Left) => CarouselEvent::GestureEnd,
            MouseEventKind::ScrollLeft if over_track => wheel(-WHEEL_STEP_PX, 0.0, now),
            MouseEventKind::ScrollRight if over_track => wheel(WHEEL_STEP_PX, 0.0, now),
            MouseEventKind::ScrollUp if over_track => wheel(0.0, -WHEEL_STEP_PX, now),
            MouseEventKind::ScrollDown if over_track => wheel(0.0, WHEEL_STEP_PX, now),
            _ => return,
        };
        self.carousel.apply(event);
    }
}

fn wheel(delta_x: f32, delta_y: f32, at: Instant) -> CarouselEvent {
    CarouselEvent::Wheel {
        delta_x,
        delta_y,
        at,
    }
}

/// Owns the terminal while the preview runs.
///
/// Raw mode, the alternate screen and mouse capture are released when the
/// session is dropped, including on early returns and panics unwinding
/// through the loop.
pub struct TerminalSession {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
    active: bool,
}

impl TerminalSession {
    /// Enables raw mode, the alternate screen and mouse capture.
    pub fn enter() -> Result<Self> {
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stdout = io::stdout();
        if let Err(e) = execute!(stdout, EnterAlternateScreen, EnableMouseCapture) {
            let _ = disable_raw_mode();
            return Err(e).context("Failed to enter alternate screen");
        }
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend).context("Failed to create terminal")?;
        Ok(Self {
            terminal,
            active: true,
        })
    }

    /// The managed terminal.
    pub fn terminal_mut(&mut self) -> &mut Terminal<CrosstermBackend<io::Stdout>> {
        &mut self.terminal
    }

    /// Restores the terminal, reporting failures.
    pub fn restore(mut self) -> Result<()> {
        self.active = false;
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(
            self.terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )
        .context("Failed to leave alternate screen")?;
        self.terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        if self.active {
            let _ = disable_raw_mode();
            let _ = execute!(
                self.terminal.backend_mut(),
                LeaveAlternateScreen,
                DisableMouseCapture
            );
            let _ = self.terminal.show_cursor();
        }
    }
}

/// Runs the preview until the user quits. Calendars start at the local date.
pub fn run_preview(config: &Config, slides: Vec<Slide>) -> Result<()> {
    let mut session = TerminalSession::enter()?;
    let size = session
        .terminal_mut()
        .size()
        .context("Failed to read terminal size")?;
    let area = Rect::new(0, 0, size.width, size.height);
    let mut state = PreviewState::new(slides, config, area, DateRangePicker::for_local_today());

    let result = run_loop(&mut state, session.terminal_mut());
    state.carousel.apply(CarouselEvent::Unmount);

    session.restore()?;
    result
}

/// Main event loop
fn run_loop(
    state: &mut PreviewState,
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
) -> Result<()> {
    while !state.should_quit {
        terminal.draw(|f| render(f, state))?;

        if event::poll(state.poll_timeout(Instant::now()))? {
            let event = event::read()?;
            state.handle_event(&event, Instant::now());
        }

        state.tick(Instant::now());
    }

    Ok(())
}

/// Render the UI from current state
pub fn render(f: &mut Frame, state: &PreviewState) {
    let theme = &state.theme;
    f.render_widget(
        Block::default().style(Style::default().bg(theme.background)),
        f.area(),
    );

    let (carousel_area, booking_area, help_area) = PreviewState::layout(f.area());

    render_carousel(
        f,
        carousel_area,
        &state.carousel,
        state.focus == Focus::Carousel,
        theme,
    );

    let focus = match state.focus {
        Focus::Calendar(calendar) => Some(CalendarFocus {
            calendar,
            cursor: state.cursor,
        }),
        Focus::Carousel => None,
    };
    render_booking(
        f,
        booking_area,
        &state.booking,
        focus,
        state.guest_field,
        theme,
    );

    let help = "Tab focus  ←/→ navigate  [ ] month  Enter select  g/G guests  f field  d destination  c clear  q quit";
    let mut spans = vec![Span::styled(help, Style::default().fg(theme.text_muted))];
    if let Some(status) = &state.status {
        spans.push(Span::styled(
            format!("  |  {status}"),
            Style::default().fg(theme.accent),
        ));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), help_area);
}
