use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::theme;

/// Footer listing the keys the active screen understands.
#[derive(Debug, Default)]
pub struct HintBar;

impl HintBar {
    pub fn render(&self, frame: &mut Frame, rect: Rect, hints: Vec<Span<'static>>) {
        let mut spans = vec![Span::styled("Hints: ", theme::text_muted())];
        spans.extend(hints);
        frame.render_widget(Paragraph::new(Line::from(spans)), rect);
    }
}
