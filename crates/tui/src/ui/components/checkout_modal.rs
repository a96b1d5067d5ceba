//! Embedded checkout: shows the order and collects the payment identifier.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Position, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use regdesk_engine::{CheckoutError, PaymentId};

use crate::app::{App, Effect, Modal};
use crate::theme;
use crate::ui::components::Component;

#[derive(Debug, Default)]
pub struct CheckoutModalComponent;

impl Component for CheckoutModalComponent {
    fn handle_key_events(&mut self, app: &mut App, key: KeyEvent) -> Vec<Effect> {
        let Some(Modal::Checkout(state)) = app.modal.as_mut() else {
            return Vec::new();
        };
        match key.code {
            KeyCode::Enter => {
                if state.payment_id.is_empty() {
                    app.set_status(crate::app::Severity::Error, "Enter the payment ID shown by the checkout");
                    return Vec::new();
                }
                let payment_id = PaymentId::new(state.payment_id.input().trim());
                state.resolve(Ok(payment_id));
                app.modal = None;
            }
            KeyCode::Esc => {
                state.resolve(Err(CheckoutError::Cancelled));
                app.modal = None;
            }
            _ => {
                state.payment_id.handle_edit_key(key);
            }
        }
        Vec::new()
    }

    fn render(&mut self, frame: &mut Frame, rect: Rect, app: &mut App) {
        let Some(Modal::Checkout(state)) = app.modal.as_ref() else {
            return;
        };
        let request = &state.request;
        let block = theme::panel_block(Some(request.display_name.as_str()), true);
        let inner = block.inner(rect);
        frame.render_widget(block, rect);
        let [summary_area, input_area] = Layout::vertical([Constraint::Min(5), Constraint::Length(2)]).areas(inner);

        let summary = vec![
            Line::from(Span::styled(request.description.clone(), theme::text_style())),
            Line::from(vec![
                Span::styled("Amount    ", theme::text_muted()),
                Span::styled(request.display_amount(), theme::title_style()),
            ]),
            Line::from(vec![
                Span::styled("Order     ", theme::text_muted()),
                Span::styled(request.order_id.clone(), theme::text_style()),
            ]),
            Line::from(vec![
                Span::styled("Payer     ", theme::text_muted()),
                Span::styled(
                    format!("{} <{}> {}", request.prefill.name, request.prefill.email, request.prefill.phone),
                    theme::text_style(),
                ),
            ]),
        ];
        frame.render_widget(Paragraph::new(summary), summary_area);

        let label = "Payment ID: ";
        let input = Line::from(vec![
            Span::styled(label, theme::list_highlight_style()),
            Span::styled(state.payment_id.input().to_string(), theme::highlight_style()),
        ]);
        frame.render_widget(Paragraph::new(input), input_area);
        let x = input_area.x + label.len() as u16 + state.payment_id.cursor_column();
        frame.set_cursor_position(Position::new(x.min(input_area.right().saturating_sub(1)), input_area.y));
    }

    fn get_hint_spans(&self, _app: &App) -> Vec<Span<'static>> {
        theme::hint_spans(&[("Enter", "payment done"), ("Esc", "cancel payment")])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::CheckoutModalState;
    use crate::app::tests::test_app;
    use crate::checkout::CheckoutPromptRequest;
    use regdesk_engine::{CheckoutPrefill, CheckoutRequest};
    use tokio::sync::oneshot;

    fn open(app: &mut App) -> oneshot::Receiver<Result<PaymentId, CheckoutError>> {
        let (reply, receiver) = oneshot::channel();
        let request = CheckoutRequest {
            public_key: "rzp_test".into(),
            amount_minor: 20000,
            currency: "INR".into(),
            display_name: "Symposium".into(),
            description: "Registration fee".into(),
            order_id: "order_T1".into(),
            prefill: CheckoutPrefill {
                name: "Asha Rao".into(),
                email: "asha@example.com".into(),
                phone: "9876543210".into(),
            },
        };
        app.modal = Some(Modal::Checkout(Box::new(CheckoutModalState::new(CheckoutPromptRequest {
            request,
            reply,
        }))));
        receiver
    }

    #[tokio::test]
    async fn enter_sends_typed_payment_id() {
        let mut app = test_app();
        let mut receiver = open(&mut app);
        let mut modal = CheckoutModalComponent;
        for c in "pay_7".chars() {
            modal.handle_key_events(&mut app, KeyEvent::from(KeyCode::Char(c)));
        }
        modal.handle_key_events(&mut app, KeyEvent::from(KeyCode::Enter));
        assert!(app.modal.is_none());
        assert_eq!(receiver.try_recv().unwrap(), Ok(PaymentId::new("pay_7")));
    }

    #[tokio::test]
    async fn empty_id_keeps_modal_open() {
        let mut app = test_app();
        let _receiver = open(&mut app);
        CheckoutModalComponent.handle_key_events(&mut app, KeyEvent::from(KeyCode::Enter));
        assert!(app.modal.is_some());
    }

    #[tokio::test]
    async fn closing_the_modal_cancels() {
        let mut app = test_app();
        let mut receiver = open(&mut app);
        CheckoutModalComponent.handle_key_events(&mut app, KeyEvent::from(KeyCode::Esc));
        assert_eq!(receiver.try_recv().unwrap(), Err(CheckoutError::Cancelled));
    }
}
