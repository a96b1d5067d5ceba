use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::app::{App, Severity};
use crate::theme;
use crate::ui::components::Component;
use crate::ui::utils::throbber_frame;

/// One-line status: spinner while a request runs, then the last message.
#[derive(Debug, Default)]
pub struct StatusLine;

impl Component for StatusLine {
    fn render(&mut self, frame: &mut Frame, rect: Rect, app: &mut App) {
        let mut spans = Vec::new();
        if app.executing {
            spans.push(Span::styled(format!("{} ", throbber_frame(app.throbber_idx)), theme::list_highlight_style()));
        }
        if let Some(status) = &app.status {
            let style = match status.severity {
                Severity::Info => theme::text_style(),
                Severity::Success => theme::success_style(),
                Severity::Error => theme::error_style(),
            };
            spans.push(Span::styled(status.text.clone(), style));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), rect);
    }
}
