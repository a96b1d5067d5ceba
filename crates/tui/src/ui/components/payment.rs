//! Payment step: choose online or offline and submit.
//!
//! After a redirect checkout starts, the step shows the checkout link and
//! lets the user copy it or report that they finished paying.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Wrap};
use regdesk_engine::FormData;
use regdesk_types::{FormField, PaymentMode};

use crate::app::{App, Effect, Modal, PAYMENT_MODES};
use crate::theme;
use crate::ui::components::Component;

#[derive(Debug, Default)]
pub struct PaymentComponent;

impl PaymentComponent {
    fn describe(mode: PaymentMode) -> &'static str {
        match mode {
            PaymentMode::Online => "Online: pay now through the secure checkout",
            PaymentMode::Offline => "Offline: pay at the registration desk",
        }
    }

    fn fee_line(app: &App) -> Line<'static> {
        let checkout = &app.config.checkout;
        let amount = format!(
            "{}.{:02} {}",
            checkout.amount_minor / 100,
            checkout.amount_minor % 100,
            checkout.currency
        );
        Line::from(vec![
            Span::styled("Registration fee: ", theme::text_muted()),
            Span::styled(amount, theme::title_style()),
        ])
    }
}

impl Component for PaymentComponent {
    fn handle_key_events(&mut self, app: &mut App, key: KeyEvent) -> Vec<Effect> {
        if app.checkout_url.is_some() {
            return match key.code {
                KeyCode::Char('c') => app.copy_checkout_url(),
                KeyCode::Char('p') => {
                    app.modal = Some(Modal::RecoveryPrompt { confirm_focused: true });
                    Vec::new()
                }
                _ => Vec::new(),
            };
        }
        match key.code {
            KeyCode::Down | KeyCode::Up | KeyCode::Tab => {
                app.payment_cursor = (app.payment_cursor + 1) % PAYMENT_MODES.len();
                app.select_payment_at_cursor();
            }
            KeyCode::Char(' ') => app.select_payment_at_cursor(),
            KeyCode::Enter => return app.submit(),
            KeyCode::Esc | KeyCode::BackTab if !app.executing => app.retreat(),
            _ => {}
        }
        Vec::new()
    }

    fn render(&mut self, frame: &mut Frame, rect: Rect, app: &mut App) {
        let block = theme::panel_block(Some("Payment"), true);
        let inner = block.inner(rect);
        frame.render_widget(block, rect);
        let [fee_area, options_area, error_area, action_area] = Layout::vertical([
            Constraint::Length(2),
            Constraint::Length(PAYMENT_MODES.len() as u16 + 1),
            Constraint::Length(1),
            Constraint::Min(3),
        ])
        .areas(inner);

        frame.render_widget(Paragraph::new(Self::fee_line(app)), fee_area);

        let selected = app.form.payment_mode();
        let options: Vec<Line> = PAYMENT_MODES
            .iter()
            .enumerate()
            .map(|(index, mode)| {
                let radio = if selected == Some(*mode) { "(•)" } else { "( )" };
                let style = if index == app.payment_cursor {
                    theme::highlight_style()
                } else {
                    theme::text_style()
                };
                Line::from(Span::styled(format!("{radio} {}", Self::describe(*mode)), style))
            })
            .collect();
        frame.render_widget(Paragraph::new(options), options_area);

        if let Some(error) = app.field_error(FormField::PaymentMode) {
            frame.render_widget(Paragraph::new(Span::styled(error.message.clone(), theme::error_style())), error_area);
        }

        let action = match &app.checkout_url {
            Some(url) => vec![
                Line::from(Span::styled("Open this link to pay:", theme::text_muted())),
                Line::from(Span::styled(url.to_string(), theme::list_highlight_style())),
            ],
            None => {
                let guard = app.submitter.guard();
                let style = if guard.is_enabled() {
                    theme::list_highlight_style()
                } else {
                    theme::text_muted()
                };
                vec![Line::from(Span::styled(format!("[ {} ]", guard.label()), style))]
            }
        };
        frame.render_widget(Paragraph::new(action).wrap(Wrap { trim: false }), action_area);
    }

    fn get_hint_spans(&self, app: &App) -> Vec<Span<'static>> {
        if app.checkout_url.is_some() {
            theme::hint_spans(&[("c", "copy link"), ("p", "I have paid"), ("Ctrl+C", "quit")])
        } else {
            theme::hint_spans(&[("↑/↓", "choose"), ("Enter", "submit"), ("Esc", "back")])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::tests::test_app;
    use url::Url;

    #[tokio::test]
    async fn arrows_select_a_mode() {
        let mut app = test_app();
        let mut component = PaymentComponent;
        component.handle_key_events(&mut app, KeyEvent::from(KeyCode::Down));
        assert_eq!(app.form.payment_mode(), Some(PaymentMode::Offline));
        component.handle_key_events(&mut app, KeyEvent::from(KeyCode::Down));
        assert_eq!(app.form.payment_mode(), Some(PaymentMode::Online));
    }

    #[tokio::test]
    async fn started_checkout_offers_copy_and_confirm() {
        let mut app = test_app();
        app.checkout_url = Some(Url::parse("https://pay.example.com/#?return_url=x").unwrap());
        let mut component = PaymentComponent;

        let effects = component.handle_key_events(&mut app, KeyEvent::from(KeyCode::Char('c')));
        assert!(matches!(effects.as_slice(), [Effect::CopyToClipboard { .. }]));

        component.handle_key_events(&mut app, KeyEvent::from(KeyCode::Char('p')));
        assert!(matches!(app.modal, Some(Modal::RecoveryPrompt { .. })));
    }
}
