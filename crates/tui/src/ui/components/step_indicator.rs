use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use regdesk_engine::StepMarker;

use crate::app::App;
use crate::theme;
use crate::ui::components::Component;

/// Progress strip across the top: completed, active, and pending steps.
#[derive(Debug, Default)]
pub struct StepIndicator;

impl StepIndicator {
    pub(crate) fn line(app: &App) -> Line<'static> {
        let steps = &app.wizard.config().steps;
        let markers = app.wizard.state().step_markers();
        let mut spans = Vec::with_capacity(steps.len() * 2);
        for (index, (step, marker)) in steps.iter().zip(markers).enumerate() {
            if index > 0 {
                spans.push(Span::styled(" ── ", theme::text_muted()));
            }
            let (glyph, style) = match marker {
                StepMarker::Completed => ("✓", theme::success_style()),
                StepMarker::Active => ("●", theme::list_highlight_style()),
                StepMarker::Pending => ("○", theme::text_muted()),
            };
            spans.push(Span::styled(format!("{glyph} {}", step.title()), style));
        }
        Line::from(spans)
    }
}

impl Component for StepIndicator {
    fn render(&mut self, frame: &mut Frame, rect: Rect, app: &mut App) {
        let block = theme::panel_block(Some(app.config.checkout.display_name.as_str()), false);
        let paragraph = Paragraph::new(Self::line(app)).alignment(Alignment::Center).block(block);
        frame.render_widget(paragraph, rect);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::tests::{fill_personal, test_app};

    #[tokio::test]
    async fn marks_completed_steps() {
        let mut app = test_app();
        fill_personal(&mut app);
        app.advance();
        let text: String = StepIndicator::line(&app).spans.iter().map(|span| span.content.as_ref()).collect();
        assert!(text.starts_with("✓ Personal Info"));
        assert!(text.contains("● Events"));
        assert!(text.contains("○ Payment"));
    }
}
