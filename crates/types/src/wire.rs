//! Request and response shapes exchanged with the registration backend.
//!
//! Every response type tolerates unknown fields. Success is signalled by
//! `status == "success"`; anything else is a business failure whose `detail`
//! (when present) is shown to the user.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::registration::{PaymentStatus, RegistrationDraft};

/// Status literal used by the backend to report success.
pub const SUCCESS_STATUS: &str = "success";

/// Minimal view over any backend response, used to decide success before
/// decoding the full shape.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiEnvelope {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub detail: Option<Value>,
}

impl ApiEnvelope {
    pub fn is_success(&self) -> bool {
        self.status.as_deref() == Some(SUCCESS_STATUS)
    }

    /// The server-supplied `detail`, flattened to text.
    pub fn detail_text(&self) -> Option<String> {
        match self.detail.as_ref()? {
            Value::Null => None,
            Value::String(text) if text.trim().is_empty() => None,
            Value::String(text) => Some(text.clone()),
            other => Some(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RegisterResponse {
    pub status: String,
    pub ticket_id: String,
    #[serde(default)]
    pub registration_id: Option<String>,
    #[serde(default)]
    pub payment_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateOrderRequest {
    /// Amount in minor currency units.
    pub amount: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreateOrderResponse {
    pub status: String,
    pub order_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfirmPaymentRequest {
    pub ticket_id: String,
    pub payment_id: String,
    pub payment_status: PaymentStatus,
}

/// Participant record as returned by `participant/{ticket_id}`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Participant {
    pub ticket_id: String,
    pub payment_status: PaymentStatus,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub events: Vec<String>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ParticipantResponse {
    pub status: String,
    pub participant: Participant,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RegistrationStatusResponse {
    pub payment_status: PaymentStatus,
    #[serde(default)]
    pub ticket_id: Option<String>,
}

/// Event name posted to the webhook after a checkout return.
pub const PAYMENT_SUCCESS_EVENT: &str = "payment_success";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WebhookNotification {
    pub event: String,
    pub payment_id: Option<String>,
    pub user_data: RegistrationDraft,
}

impl WebhookNotification {
    pub fn payment_success(payment_id: Option<String>, user_data: RegistrationDraft) -> Self {
        Self {
            event: PAYMENT_SUCCESS_EVENT.to_string(),
            payment_id,
            user_data,
        }
    }
}
