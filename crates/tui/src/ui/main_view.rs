//! Top-level view: routes keys to the active modal or step and lays out the frame.

use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::widgets::Clear;
use regdesk_engine::WizardStep;

use crate::app::{App, Effect, Modal, Msg};
use crate::ui::components::{
    CheckoutModalComponent, Component, EventsComponent, HintBar, PaymentComponent, PersonalInfoComponent,
    RecoveryPromptModal, StatusLine, StepIndicator, TicketComponent,
};
use crate::ui::utils::centered_rect;

#[derive(Debug, Default)]
pub struct MainView {
    step_indicator: StepIndicator,
    personal_info: PersonalInfoComponent,
    events: EventsComponent,
    payment: PaymentComponent,
    ticket: TicketComponent,
    recovery_prompt: RecoveryPromptModal,
    checkout: CheckoutModalComponent,
    status_line: StatusLine,
    hint_bar: HintBar,
}

impl MainView {
    pub fn new() -> Self {
        Self::default()
    }

    /// The component that currently receives keys.
    fn active(&mut self, app: &App) -> &mut dyn Component {
        match &app.modal {
            Some(Modal::RecoveryPrompt { .. }) => &mut self.recovery_prompt,
            Some(Modal::Checkout(_)) => &mut self.checkout,
            None => match app.wizard.current_step() {
                WizardStep::PersonalInfo => &mut self.personal_info,
                WizardStep::EventSelection => &mut self.events,
                WizardStep::Payment => &mut self.payment,
                WizardStep::Confirmation => &mut self.ticket,
            },
        }
    }

    pub fn handle_key_events(&mut self, app: &mut App, key: KeyEvent) -> Vec<Effect> {
        self.active(app).handle_key_events(app, key)
    }

    pub fn handle_message(&mut self, app: &mut App, msg: Msg) -> Vec<Effect> {
        app.update(msg)
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect, app: &mut App) {
        let [header, body, status, hints] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Min(8),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(area);

        self.step_indicator.render(frame, header, app);
        match app.wizard.current_step() {
            WizardStep::PersonalInfo => self.personal_info.render(frame, body, app),
            WizardStep::EventSelection => self.events.render(frame, body, app),
            WizardStep::Payment => self.payment.render(frame, body, app),
            WizardStep::Confirmation => self.ticket.render(frame, body, app),
        }
        self.status_line.render(frame, status, app);

        let modal: Option<&mut dyn Component> = match &app.modal {
            Some(Modal::RecoveryPrompt { .. }) => Some(&mut self.recovery_prompt),
            Some(Modal::Checkout(_)) => Some(&mut self.checkout),
            None => None,
        };
        if let Some(modal) = modal {
            let modal_area = centered_rect(60, 45, area);
            frame.render_widget(Clear, modal_area);
            modal.render(frame, modal_area, app);
        }

        let hint_spans = self.active(app).get_hint_spans(app);
        self.hint_bar.render(frame, hints, hint_spans);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::tests::test_app;
    use crossterm::event::KeyCode;
    use ratatui::{Terminal, backend::TestBackend};

    #[tokio::test]
    async fn modal_takes_keys_before_the_step() {
        let mut app = test_app();
        let mut view = MainView::new();
        app.modal = Some(Modal::RecoveryPrompt { confirm_focused: true });

        let effects = view.handle_key_events(&mut app, KeyEvent::from(KeyCode::Char('n')));
        assert!(matches!(effects.as_slice(), [Effect::DeclineRecoveredPayment]));
        assert!(app.personal.input(regdesk_types::FormField::Name).unwrap().input().is_empty());
    }

    #[tokio::test]
    async fn renders_first_step() {
        let mut app = test_app();
        let mut view = MainView::new();
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|frame| view.render(frame, frame.area(), &mut app)).unwrap();

        let buffer = terminal.backend().buffer();
        let screen: String = buffer.content().iter().map(|cell| cell.symbol()).collect();
        assert!(screen.contains("Personal Information"));
        assert!(screen.contains("WhatsApp"));
    }
}
