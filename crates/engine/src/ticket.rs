//! Read-only ticket shown after a successful registration.

use qrcode::render::{Renderer, svg, unicode};
use qrcode::types::QrError;
use qrcode::{Color, QrCode};
use regdesk_types::{Participant, PaymentStatus, RegistrationDraft};
use regdesk_util::RegdeskConfig;
use thiserror::Error;

/// Shown while payment is still due.
pub const OFFLINE_NOTICE: &str = "Payment is due at the venue. Please pay at the registration desk.";

const QUIET_ZONE: u32 = 4;
const SVG_MIN_DIMENSION: u32 = 160;

#[derive(Debug, Error)]
pub enum TicketError {
    #[error("ticket identifier is empty")]
    EmptyTicketId,
    #[error("could not encode scannable code: {0}")]
    Encode(#[from] QrError),
}

/// QR encoding of a ticket identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannableCode {
    payload: String,
    width: usize,
    modules: Vec<Color>,
}

impl ScannableCode {
    pub fn encode(payload: &str) -> Result<Self, TicketError> {
        let code = QrCode::new(payload.as_bytes())?;
        Ok(Self {
            payload: payload.to_string(),
            width: code.width(),
            modules: code.to_colors(),
        })
    }

    /// The text a scanner reads back.
    pub fn payload(&self) -> &str {
        &self.payload
    }

    /// Modules per side, excluding the quiet zone.
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn modules(&self) -> &[Color] {
        &self.modules
    }

    /// Two module rows per text line, light-on-dark for terminals.
    pub fn to_terminal_string(&self) -> String {
        Renderer::<unicode::Dense1x2>::new(&self.modules, self.width, QUIET_ZONE)
            .dark_color(unicode::Dense1x2::Light)
            .light_color(unicode::Dense1x2::Dark)
            .build()
    }

    pub fn to_svg(&self) -> String {
        Renderer::<svg::Color>::new(&self.modules, self.width, QUIET_ZONE)
            .min_dimensions(SVG_MIN_DIMENSION, SVG_MIN_DIMENSION)
            .dark_color(svg::Color("#000000"))
            .light_color(svg::Color("#FFFFFF"))
            .build()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketView {
    pub ticket_id: String,
    pub name: String,
    pub email: String,
    /// Event display labels in selection order.
    pub events: Vec<String>,
    pub department: String,
    pub payment_status: PaymentStatus,
    pub code: ScannableCode,
}

impl TicketView {
    pub fn from_draft(
        ticket_id: &str,
        draft: &RegistrationDraft,
        payment_status: PaymentStatus,
        config: &RegdeskConfig,
    ) -> Result<Self, TicketError> {
        Self::build(
            ticket_id,
            &draft.name,
            &draft.email,
            draft.events.iter().map(String::as_str),
            &draft.department,
            payment_status,
            config,
        )
    }

    /// Ticket for a participant record fetched from the backend.
    pub fn from_participant(participant: &Participant, config: &RegdeskConfig) -> Result<Self, TicketError> {
        Self::build(
            &participant.ticket_id,
            participant.name.as_deref().unwrap_or_default(),
            participant.email.as_deref().unwrap_or_default(),
            participant.events.iter().map(String::as_str),
            participant.department.as_deref().unwrap_or_default(),
            participant.payment_status,
            config,
        )
    }

    fn build<'a>(
        ticket_id: &str,
        name: &str,
        email: &str,
        events: impl Iterator<Item = &'a str>,
        department: &str,
        payment_status: PaymentStatus,
        config: &RegdeskConfig,
    ) -> Result<Self, TicketError> {
        let ticket_id = ticket_id.trim();
        if ticket_id.is_empty() {
            return Err(TicketError::EmptyTicketId);
        }
        Ok(Self {
            ticket_id: ticket_id.to_string(),
            name: name.to_string(),
            email: email.to_string(),
            events: events.map(|id| config.event_label(id)).collect(),
            department: if department.is_empty() {
                String::new()
            } else {
                config.department_label(department)
            },
            payment_status,
            code: ScannableCode::encode(ticket_id)?,
        })
    }

    pub fn events_joined(&self) -> String {
        self.events.join(", ")
    }

    /// Notice shown while payment is still pending; hidden once paid.
    pub fn offline_notice(&self) -> Option<&'static str> {
        match self.payment_status {
            PaymentStatus::Pending => Some(OFFLINE_NOTICE),
            PaymentStatus::Paid => None,
        }
    }

    /// Plain-text rendering used by the CLI.
    pub fn render_text(&self) -> String {
        let mut lines = vec![
            format!("Registration ID: {}", self.ticket_id),
            format!("Name:            {}", self.name),
            format!("Email:           {}", self.email),
            format!("Events:          {}", self.events_joined()),
            format!("Department:      {}", self.department),
            format!("Payment:         {}", self.payment_status.label()),
        ];
        if let Some(notice) = self.offline_notice() {
            lines.push(String::new());
            lines.push(notice.to_string());
        }
        lines.push(String::new());
        lines.push(self.code.to_terminal_string());
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use regdesk_types::PaymentMode;

    fn draft() -> RegistrationDraft {
        RegistrationDraft {
            name: "Asha Rao".into(),
            email: "asha@example.com".into(),
            phone: "9876543210".into(),
            whatsapp: "9876543210".into(),
            college: "City College".into(),
            year: "3".into(),
            department: "CSE".into(),
            events: ["technical-quiz".to_string(), "robotics".to_string()].into_iter().collect(),
            payment_mode: PaymentMode::Offline,
            project_link: None,
            payment_status: None,
            payment_id: None,
        }
    }

    #[test]
    fn code_payload_is_the_ticket_id() {
        let ticket = TicketView::from_draft("T123", &draft(), PaymentStatus::Pending, &RegdeskConfig::default()).unwrap();
        assert_eq!(ticket.ticket_id, "T123");
        assert_eq!(ticket.code.payload(), "T123");
        let reference = QrCode::new(b"T123").unwrap();
        assert_eq!(ticket.code.modules(), reference.to_colors().as_slice());
        assert_eq!(ticket.code.width(), reference.width());
    }

    #[test]
    fn labels_come_from_the_catalog() {
        let ticket = TicketView::from_draft("T123", &draft(), PaymentStatus::Paid, &RegdeskConfig::default()).unwrap();
        assert_eq!(ticket.department, "Computer Science and Engineering");
        assert_eq!(ticket.events_joined(), "Technical Quiz, robotics");
        assert!(ticket.offline_notice().is_none());
    }

    #[test]
    fn pending_ticket_shows_offline_notice() {
        let ticket = TicketView::from_draft("T123", &draft(), PaymentStatus::Pending, &RegdeskConfig::default()).unwrap();
        assert_eq!(ticket.offline_notice(), Some(OFFLINE_NOTICE));
        let text = ticket.render_text();
        assert!(text.contains("Registration ID: T123"));
        assert!(text.contains("Payment Pending"));
    }

    #[test]
    fn rendered_text_carries_the_code_once() {
        let ticket = TicketView::from_draft("T123", &draft(), PaymentStatus::Paid, &RegdeskConfig::default()).unwrap();
        let code = ticket.code.to_terminal_string();
        let text = ticket.render_text();
        assert_eq!(text.matches(code.as_str()).count(), 1);
        assert!(text.trim_end().ends_with(code.trim_end()));
    }

    #[test]
    fn empty_ticket_id_is_rejected() {
        let error = TicketView::from_draft("  ", &draft(), PaymentStatus::Pending, &RegdeskConfig::default()).unwrap_err();
        assert!(matches!(error, TicketError::EmptyTicketId));
    }

    #[test]
    fn svg_export_is_well_formed() {
        let code = ScannableCode::encode("T123").unwrap();
        let svg = code.to_svg();
        assert!(svg.starts_with("<?xml"));
        assert!(svg.contains("<svg"));
    }
}
