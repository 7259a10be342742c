//! Carousel band: slides laid out in terminal columns.
//!
//! One column stands for [`PX_PER_CELL`] pixels, so the reducer runs on the
//! same pixel geometry a browser would use and mouse columns map straight to
//! pointer coordinates.

#![allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use super::Theme;
use crate::carousel::Carousel;

/// Pixels represented by one terminal column.
pub const PX_PER_CELL: f32 = 10.0;

/// Converts a width in columns to pixels.
#[must_use]
pub fn cells_to_px(cells: u16) -> f32 {
    f32::from(cells) * PX_PER_CELL
}

/// Pointer position in track pixels for a mouse column.
#[must_use]
pub fn pointer_x(column: u16, track: Rect) -> f32 {
    cells_to_px(column.saturating_sub(track.x))
}

/// Where a slide lands inside the track, in columns relative to the track.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlideSpan {
    /// Slide index
    pub index: usize,
    /// First visible column
    pub x: u16,
    /// Visible width in columns
    pub width: u16,
    /// Left edge is outside the track
    pub clipped_left: bool,
    /// Right edge is outside the track
    pub clipped_right: bool,
}

/// Slides intersecting a track `track_width` columns wide.
#[must_use]
pub fn visible_slides(carousel: &Carousel, track_width: u16) -> Vec<SlideSpan> {
    let step = carousel.step();
    let offset = carousel.translate_offset();
    let track = i32::from(track_width);

    (0..carousel.slide_count())
        .filter_map(|index| {
            let left_px = index as f32 * step + offset;
            let left = (left_px / PX_PER_CELL).round() as i32;
            let right = ((left_px + carousel.slide_width()) / PX_PER_CELL).round() as i32;

            if right <= 0 || left >= track {
                return None;
            }

            let x = left.max(0);
            let end = right.min(track);
            Some(SlideSpan {
                index,
                x: u16::try_from(x).ok()?,
                width: u16::try_from(end - x).ok()?,
                clipped_left: left < 0,
                clipped_right: right > track,
            })
        })
        .collect()
}

/// Splits the carousel band into its track and footer rows.
#[must_use]
pub fn band_layout(area: Rect) -> (Rect, Rect) {
    let inner = Block::default().borders(Borders::ALL).inner(area);
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(inner);
    (rows[0], rows[1])
}

/// Renders the carousel band.
pub fn render_carousel(
    f: &mut Frame,
    area: Rect,
    carousel: &Carousel,
    focused: bool,
    theme: &Theme,
) {
    let border = if focused { theme.active } else { theme.inactive };
    let title = if carousel.is_dragging() {
        " Villas (dragging) "
    } else {
        " Villas "
    };
    f.render_widget(
        Block::default()
            .borders(Borders::ALL)
            .title(title)
            .border_style(Style::default().fg(border))
            .style(Style::default().bg(theme.background)),
        area,
    );

    let (track, footer) = band_layout(area);

    for span in visible_slides(carousel, track.width) {
        let Some(slide) = carousel.slides().get(span.index) else {
            continue;
        };

        let mut borders = Borders::TOP | Borders::BOTTOM;
        if !span.clipped_left {
            borders |= Borders::LEFT;
        }
        if !span.clipped_right {
            borders |= Borders::RIGHT;
        }

        let current = span.index == carousel.current_index();
        let slide_style = if current {
            Style::default().fg(theme.accent)
        } else {
            Style::default().fg(theme.text_secondary)
        };

        let body = vec![
            Line::from(Span::styled(
                slide.title.clone(),
                Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                slide.description.clone(),
                Style::default().fg(theme.text_secondary),
            )),
            Line::from(Span::styled(
                slide.image.clone(),
                Style::default().fg(theme.text_muted),
            )),
        ];

        let rect = Rect::new(track.x + span.x, track.y, span.width, track.height);
        f.render_widget(
            Paragraph::new(body)
                .wrap(Wrap { trim: true })
                .block(Block::default().borders(borders).border_style(slide_style)),
            rect,
        );
    }

    f.render_widget(footer_line(carousel, theme), footer);
}

fn footer_line(carousel: &Carousel, theme: &Theme) -> Paragraph<'static> {
    let arrow = |enabled: bool, symbol: &'static str| {
        let color = if enabled { theme.primary } else { theme.inactive };
        Span::styled(symbol, Style::default().fg(color))
    };

    let mut spans = vec![arrow(carousel.can_go_previous(), "◀ ")];
    for index in 0..carousel.slide_count() {
        let (dot, color) = if index == carousel.current_index() {
            ("●", theme.accent)
        } else {
            ("○", theme.text_muted)
        };
        spans.push(Span::styled(dot, Style::default().fg(color)));
    }
    spans.push(arrow(carousel.can_go_next(), " ▶"));
    spans.push(Span::styled(
        format!(
            "   {}/{}  offset {:.0}px",
            carousel.current_index() + 1,
            carousel.slide_count().max(1),
            carousel.translate_offset()
        ),
        Style::default().fg(theme.text_muted),
    ));

    Paragraph::new(Line::from(spans)).alignment(Alignment::Center)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::carousel::CarouselConfig;
    use crate::models::Slide;

    fn carousel(viewport_cols: u16) -> Carousel {
        Carousel::new(
            Slide::showcase(),
            CarouselConfig::default(),
            cells_to_px(viewport_cols),
        )
    }

    #[test]
    fn test_first_slides_visible_at_start() {
        // 128 columns = 1280px, desktop slides of 66 columns plus a 2-column gap
        let spans = visible_slides(&carousel(128), 128);
        assert_eq!(spans.len(), 2);
        assert_eq!(spans[0], SlideSpan {
            index: 0,
            x: 0,
            width: 66,
            clipped_left: false,
            clipped_right: false,
        });
        assert_eq!(spans[1].x, 68);
        assert_eq!(spans[1].width, 60);
        assert!(spans[1].clipped_right);
    }

    #[test]
    fn test_last_slide_aligns_with_right_edge() {
        let mut carousel = carousel(128);
        carousel.go_to(4);

        let spans = visible_slides(&carousel, 128);
        let last = spans.last().unwrap();
        assert_eq!(last.index, 4);
        assert_eq!(last.x + last.width, 128);
        assert!(!last.clipped_right);
    }

    #[test]
    fn test_pointer_mapping() {
        let track = Rect::new(5, 2, 100, 10);
        assert!((pointer_x(5, track) - 0.0).abs() < f32::EPSILON);
        assert!((pointer_x(15, track) - 100.0).abs() < f32::EPSILON);
        assert!((pointer_x(0, track) - 0.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_band_layout_reserves_footer() {
        let (track, footer) = band_layout(Rect::new(0, 0, 80, 12));
        assert_eq!(track, Rect::new(1, 1, 78, 9));
        assert_eq!(footer, Rect::new(1, 10, 78, 1));
    }
}
