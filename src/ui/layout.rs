use ratatui::layout::{Constraint, Direction, Layout, Margin, Rect};
use unicode_width::UnicodeWidthStr;

use crate::marker::Marker;

const HORIZONTAL_MARGIN: u16 = 2;
const VERTICAL_MARGIN: u16 = 1;

pub const FIELD_LABEL: &str = "Points: ";
pub const FIELD_WIDTH: u16 = 8;
pub const TIME_LABEL: &str = "Time: ";

/// Where every part of the screen lands for a given terminal area.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenLayout {
    pub title: Rect,
    /// label plus the editable input
    pub field: Rect,
    pub message: Rect,
    pub time: Rect,
    pub button: Rect,
    /// bordered play area, including the border
    pub play_frame: Rect,
    /// where markers are placed
    pub play_area: Rect,
    pub help: Rect,
}

/// What a mouse press landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hit {
    Marker(u32),
    Button,
    Field,
}

pub fn button_text(label: &str) -> String {
    format!("[ {} ]", label)
}

impl ScreenLayout {
    pub fn new(area: Rect, button_label: &str) -> Self {
        let inner = area.inner(Margin {
            horizontal: HORIZONTAL_MARGIN,
            vertical: VERTICAL_MARGIN,
        });

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // Title
                Constraint::Length(1),
                Constraint::Length(2), // Form
                Constraint::Min(3),    // Play area
                Constraint::Length(1), // Help
            ])
            .split(inner);

        let button_width = button_text(button_label).width() as u16;
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Length(FIELD_LABEL.width() as u16 + FIELD_WIDTH + 4),
                Constraint::Length(TIME_LABEL.width() as u16 + 12),
                Constraint::Length(button_width),
                Constraint::Min(0),
            ])
            .split(rows[2]);

        // one-line slice of a column; empty when the column is too short
        let line = |r: Rect, row: u16| {
            if row < r.height {
                Rect {
                    y: r.y + row,
                    height: 1,
                    ..r
                }
            } else {
                Rect { height: 0, ..r }
            }
        };

        let play_frame = rows[3];

        Self {
            title: rows[0],
            field: line(columns[0], 0),
            message: line(columns[0], 1),
            time: line(columns[1], 0),
            button: line(columns[2], 0),
            play_frame,
            play_area: play_frame.inner(Margin {
                horizontal: 1,
                vertical: 1,
            }),
            help: rows[4],
        }
    }

    /// Cell rect a marker badge occupies, kept inside the play area.
    pub fn marker_rect(&self, marker: &Marker) -> Option<Rect> {
        let area = self.play_area;
        if area.width == 0 || area.height == 0 {
            return None;
        }

        let width = (marker.label().width() as u16).min(area.width);
        let offset_x = ((marker.x / 100.0) * area.width as f64).floor() as u16;
        let offset_y = ((marker.y / 100.0) * area.height as f64).floor() as u16;

        let x = (area.x + offset_x).min(area.right() - width);
        let y = (area.y + offset_y).min(area.bottom() - 1);

        Some(Rect::new(x, y, width, 1))
    }

    /// Resolve a press at (`column`, `row`). Later markers are drawn on top
    /// of earlier ones, so they win.
    pub fn hit_test(&self, markers: &[Marker], column: u16, row: u16) -> Option<Hit> {
        let contains = |r: Rect| {
            column >= r.x && column < r.right() && row >= r.y && row < r.bottom()
        };

        let marker_hit = markers
            .iter()
            .rev()
            .find(|m| self.marker_rect(m).is_some_and(contains))
            .map(|m| Hit::Marker(m.value));

        marker_hit.or_else(|| {
            if contains(self.button) {
                Some(Hit::Button)
            } else if contains(self.field) {
                Some(Hit::Field)
            } else {
                None
            }
        })
    }
}
