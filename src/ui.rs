pub mod layout;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

use crate::{game::GameSession, runtime::TickScheduler};

pub use layout::{button_text, Hit, ScreenLayout, FIELD_LABEL, FIELD_WIDTH, TIME_LABEL};

pub const REQUIRED_MESSAGE: &str = "Points is required";
pub const HELP_TEXT: &str = "click the numbers in order | (enter) play/restart | (esc)ape";

impl<T: TickScheduler> Widget for &GameSession<T> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let layout = ScreenLayout::new(area, self.button_label());

        // styles
        let bold_style = Style::default().add_modifier(Modifier::BOLD);
        let dim_style = Style::default().add_modifier(Modifier::DIM);
        let input_style = Style::default().add_modifier(Modifier::UNDERLINED);
        let error_style = Style::default().fg(Color::Red).add_modifier(Modifier::ITALIC);
        let marker_style = Style::default()
            .patch(bold_style)
            .fg(Color::Black)
            .bg(Color::Yellow);

        let title = self.title();
        Paragraph::new(Span::styled(title.text, title.style))
            .alignment(Alignment::Center)
            .render(layout.title, buf);

        let field_text = format!("{:<width$}", self.points_text(), width = FIELD_WIDTH as usize);
        Paragraph::new(Line::from(vec![
            Span::styled(FIELD_LABEL, bold_style),
            Span::styled(field_text, input_style),
        ]))
        .render(layout.field, buf);

        if self.points_required() {
            Paragraph::new(Span::styled(REQUIRED_MESSAGE, error_style)).render(layout.message, buf);
        }

        Paragraph::new(Line::from(vec![
            Span::styled(TIME_LABEL, bold_style),
            Span::raw(self.elapsed_display()),
        ]))
        .render(layout.time, buf);

        Paragraph::new(Span::styled(
            button_text(self.button_label()),
            bold_style.fg(Color::Cyan),
        ))
        .render(layout.button, buf);

        Block::default()
            .borders(Borders::ALL)
            .border_style(dim_style)
            .render(layout.play_frame, buf);

        for marker in self.markers() {
            if let Some(rect) = layout.marker_rect(marker) {
                buf.set_stringn(
                    rect.x,
                    rect.y,
                    marker.label(),
                    rect.width as usize,
                    marker_style,
                );
            }
        }

        Paragraph::new(Span::styled(HELP_TEXT, dim_style.add_modifier(Modifier::ITALIC)))
            .alignment(Alignment::Center)
            .render(layout.help, buf);
    }
}
