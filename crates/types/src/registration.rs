//! Registration data model.
//!
//! A [`RegistrationDraft`] is the in-progress form payload. It is posted to the
//! registration backend verbatim (including the payment fields the client
//! attaches right before submission), so the serde names below are part of
//! the wire contract.

use chrono::{DateTime, Duration, Utc};
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Maximum number of events a registrant may select.
pub const MAX_SELECTED_EVENTS: usize = 3;

/// Default staleness window for a persisted payment attempt.
pub const DEFAULT_STALENESS_MINUTES: i64 = 10;

/// How the registrant intends to pay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMode {
    Online,
    Offline,
}

impl PaymentMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMode::Online => "online",
            PaymentMode::Offline => "offline",
        }
    }
}

impl fmt::Display for PaymentMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "online" => Ok(PaymentMode::Online),
            "offline" => Ok(PaymentMode::Offline),
            other => Err(format!("unknown payment mode '{other}'; expected 'online' or 'offline'")),
        }
    }
}

/// Payment state reported for a registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    #[default]
    Pending,
    Paid,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Paid => "paid",
        }
    }

    /// Human readable label used on the ticket.
    pub fn label(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "Payment Pending",
            PaymentStatus::Paid => "Payment Completed",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The in-progress, unsubmitted registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationDraft {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub whatsapp: String,
    pub college: String,
    pub year: String,
    pub department: String,
    /// Selected event identifiers in selection order; at most [`MAX_SELECTED_EVENTS`].
    pub events: IndexSet<String>,
    pub payment_mode: PaymentMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_link: Option<String>,
    /// Attached by the client right before submission.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_status: Option<PaymentStatus>,
    /// Attached when a payment identifier is known at submission time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_id: Option<String>,
}

impl RegistrationDraft {
    /// Return a copy marked with the given payment status and optional payment identifier.
    pub fn with_payment(mut self, status: PaymentStatus, payment_id: Option<String>) -> Self {
        self.payment_status = Some(status);
        if payment_id.is_some() {
            self.payment_id = payment_id;
        }
        self
    }

    pub fn events_joined(&self) -> String {
        self.events.iter().cloned().collect::<Vec<_>>().join(", ")
    }
}

/// Overall outcome reported by the registration endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultStatus {
    Success,
    Error,
}

/// Immutable record of a registration as acknowledged by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationResult {
    pub status: ResultStatus,
    pub ticket_id: String,
    pub payment_status: PaymentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registration_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// Draft plus attempt timestamp, persisted across a redirect to the external checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedAttempt {
    pub draft: RegistrationDraft,
    pub attempted_at: DateTime<Utc>,
}

impl PersistedAttempt {
    pub fn new(draft: RegistrationDraft, attempted_at: DateTime<Utc>) -> Self {
        Self { draft, attempted_at }
    }

    /// An attempt is fresh while strictly younger than `window`.
    pub fn is_fresh(&self, now: DateTime<Utc>, window: Duration) -> bool {
        now.signed_duration_since(self.attempted_at) < window
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    pub(crate) fn sample_draft() -> RegistrationDraft {
        RegistrationDraft {
            name: "Asha Rao".into(),
            email: "asha@example.com".into(),
            phone: "9876543210".into(),
            whatsapp: "9876543210".into(),
            college: "City College".into(),
            year: "3".into(),
            department: "CSE".into(),
            events: ["paper", "quiz"].into_iter().map(String::from).collect(),
            payment_mode: PaymentMode::Offline,
            project_link: None,
            payment_status: None,
            payment_id: None,
        }
    }

    #[test]
    fn draft_serializes_with_wire_names() {
        let draft = sample_draft().with_payment(PaymentStatus::Pending, None);
        let value = serde_json::to_value(&draft).unwrap();
        assert_eq!(value["payment_mode"], "offline");
        assert_eq!(value["payment_status"], "pending");
        assert_eq!(value["events"], serde_json::json!(["paper", "quiz"]));
        assert!(value.get("project_link").is_none());
        assert!(value.get("payment_id").is_none());
    }

    #[test]
    fn with_payment_keeps_existing_payment_id_when_none_given() {
        let draft = sample_draft().with_payment(PaymentStatus::Paid, Some("pay_1".into()));
        let draft = draft.with_payment(PaymentStatus::Paid, None);
        assert_eq!(draft.payment_id.as_deref(), Some("pay_1"));
    }

    #[test]
    fn attempt_freshness_uses_strict_window() {
        let now = Utc::now();
        let window = Duration::minutes(DEFAULT_STALENESS_MINUTES);
        let fresh = PersistedAttempt::new(sample_draft(), now - Duration::minutes(9));
        let stale = PersistedAttempt::new(sample_draft(), now - Duration::minutes(11));
        let boundary = PersistedAttempt::new(sample_draft(), now - window);
        assert!(fresh.is_fresh(now, window));
        assert!(!stale.is_fresh(now, window));
        assert!(!boundary.is_fresh(now, window));
    }

    #[test]
    fn payment_mode_parses_case_insensitively() {
        assert_eq!("Online".parse::<PaymentMode>().unwrap(), PaymentMode::Online);
        assert_eq!(" offline ".parse::<PaymentMode>().unwrap(), PaymentMode::Offline);
        assert!("card".parse::<PaymentMode>().is_err());
    }
}
