//! "Did you complete the payment?" prompt for a recent checkout attempt.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use regdesk_engine::PAYMENT_CONFIRMATION_PROMPT;

use crate::app::{App, Effect, Modal};
use crate::theme;
use crate::ui::components::Component;

const BUTTONS: [&str; 2] = ["Yes, I paid", "No"];
const BUTTON_WIDTH: u16 = 15;

#[derive(Default, Debug, Clone)]
pub struct RecoveryPromptModal;

impl RecoveryPromptModal {
    fn confirm_focused(app: &App) -> bool {
        matches!(app.modal, Some(Modal::RecoveryPrompt { confirm_focused: true }))
    }
}

impl Component for RecoveryPromptModal {
    fn handle_key_events(&mut self, app: &mut App, key: KeyEvent) -> Vec<Effect> {
        let confirm_focused = Self::confirm_focused(app);
        match key.code {
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Left | KeyCode::Right => {
                app.modal = Some(Modal::RecoveryPrompt {
                    confirm_focused: !confirm_focused,
                });
                Vec::new()
            }
            KeyCode::Enter => {
                app.modal = None;
                if confirm_focused {
                    vec![Effect::ConfirmRecoveredPayment]
                } else {
                    vec![Effect::DeclineRecoveredPayment]
                }
            }
            KeyCode::Char('y') => {
                app.modal = None;
                vec![Effect::ConfirmRecoveredPayment]
            }
            KeyCode::Esc | KeyCode::Char('n') => {
                app.modal = None;
                vec![Effect::DeclineRecoveredPayment]
            }
            _ => Vec::new(),
        }
    }

    fn render(&mut self, frame: &mut Frame, rect: Rect, app: &mut App) {
        let block = theme::panel_block(Some("Payment confirmation"), true);
        let inner = block.inner(rect);
        frame.render_widget(block, rect);
        let [message_area, _, button_area] =
            Layout::vertical([Constraint::Min(1), Constraint::Length(1), Constraint::Length(3)]).areas(inner);

        let message = Paragraph::new(PAYMENT_CONFIRMATION_PROMPT)
            .style(theme::text_style())
            .wrap(Wrap { trim: false });
        frame.render_widget(message, message_area);

        let confirm_focused = Self::confirm_focused(app);
        for (index, label) in BUTTONS.iter().enumerate() {
            let focused = (index == 0) == confirm_focused;
            let offset = index as u16 * (BUTTON_WIDTH + 2);
            let area = Rect::new(button_area.x + offset, button_area.y, BUTTON_WIDTH, button_area.height)
                .intersection(button_area);
            let button = Paragraph::new(Line::from(Span::styled(
                *label,
                if focused { theme::list_highlight_style() } else { theme::text_style() },
            )))
            .centered()
            .block(Block::default().borders(Borders::ALL).border_style(theme::border_style(focused)));
            frame.render_widget(button, area);
        }
    }

    fn get_hint_spans(&self, _app: &App) -> Vec<Span<'static>> {
        theme::hint_spans(&[("Tab", "focus"), ("Enter", "choose"), ("y/n", "answer"), ("Esc", "not paid")])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::tests::test_app;

    #[tokio::test]
    async fn enter_confirms_by_default_and_tab_switches() {
        let mut app = test_app();
        let mut modal = RecoveryPromptModal;

        app.modal = Some(Modal::RecoveryPrompt { confirm_focused: true });
        let effects = modal.handle_key_events(&mut app, KeyEvent::from(KeyCode::Enter));
        assert!(matches!(effects.as_slice(), [Effect::ConfirmRecoveredPayment]));
        assert!(app.modal.is_none());

        app.modal = Some(Modal::RecoveryPrompt { confirm_focused: true });
        modal.handle_key_events(&mut app, KeyEvent::from(KeyCode::Tab));
        let effects = modal.handle_key_events(&mut app, KeyEvent::from(KeyCode::Enter));
        assert!(matches!(effects.as_slice(), [Effect::DeclineRecoveredPayment]));
    }
}
