//! Ticket view shown after a successful registration.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Paragraph, Wrap};
use regdesk_types::PaymentStatus;

use crate::app::{App, Effect};
use crate::theme;
use crate::ui::components::Component;

#[derive(Debug, Default)]
pub struct TicketComponent;

impl TicketComponent {
    fn detail(label: &str, value: String) -> Line<'static> {
        Line::from(vec![
            Span::styled(format!("{label:<12}"), theme::text_muted()),
            Span::styled(value, theme::text_style()),
        ])
    }
}

impl Component for TicketComponent {
    fn handle_key_events(&mut self, app: &mut App, key: KeyEvent) -> Vec<Effect> {
        match key.code {
            KeyCode::Char('c') => app.copy_ticket_id(),
            KeyCode::Char('n') => {
                app.reset_wizard();
                app.status = None;
                Vec::new()
            }
            KeyCode::Char('q') => vec![Effect::Quit],
            _ => Vec::new(),
        }
    }

    fn render(&mut self, frame: &mut Frame, rect: Rect, app: &mut App) {
        let block = theme::panel_block(Some("Your Ticket"), true);
        let inner = block.inner(rect);
        frame.render_widget(block, rect);
        let Some(confirmation) = app.confirmation.as_ref() else {
            return;
        };
        let ticket = &confirmation.ticket;

        let qr = ticket.code.to_terminal_string();
        let qr_width = qr.lines().map(|line| line.chars().count()).max().unwrap_or(0) as u16;
        let [details_area, qr_area] =
            Layout::horizontal([Constraint::Min(30), Constraint::Length(qr_width + 2)]).areas(inner);

        let status_style = match ticket.payment_status {
            PaymentStatus::Paid => theme::success_style(),
            PaymentStatus::Pending => theme::pending_style(),
        };
        let mut lines = vec![
            Line::from(Span::styled(confirmation.message, theme::success_style())),
            Line::default(),
            Self::detail("Ticket ID", ticket.ticket_id.clone()),
            Self::detail("Name", ticket.name.clone()),
            Self::detail("Email", ticket.email.clone()),
            Self::detail("Events", ticket.events_joined()),
            Self::detail("Department", ticket.department.clone()),
            Line::from(vec![
                Span::styled(format!("{:<12}", "Payment"), theme::text_muted()),
                Span::styled(ticket.payment_status.label().to_string(), status_style),
            ]),
        ];
        if let Some(registration_id) = &confirmation.result.registration_id {
            lines.push(Self::detail("Reference", registration_id.clone()));
        }
        if let Some(notice) = ticket.offline_notice() {
            lines.push(Line::default());
            lines.push(Line::from(Span::styled(notice, theme::pending_style())));
        }
        frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), details_area);
        frame.render_widget(Paragraph::new(Text::raw(qr)), qr_area);
    }

    fn get_hint_spans(&self, _app: &App) -> Vec<Span<'static>> {
        theme::hint_spans(&[("c", "copy ticket ID"), ("n", "new registration"), ("q", "quit")])
    }
}
