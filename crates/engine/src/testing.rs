//! In-memory fakes shared by the engine's flow tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use regdesk_api::{ApiError, RegistrationBackend};
use regdesk_types::{
    ConfirmPaymentRequest, CreateOrderResponse, Participant, PaymentMode, PaymentStatus, RegisterResponse,
    RegistrationDraft, RegistrationStatusResponse, WebhookNotification,
};
use regdesk_util::{AttemptStore, RegdeskConfig};

use crate::payment::{CheckoutError, CheckoutRequest, CheckoutWidget, PaymentId};
use crate::submission::Submitter;

pub(crate) fn sample_draft(payment_mode: PaymentMode) -> RegistrationDraft {
    RegistrationDraft {
        name: "Asha Rao".into(),
        email: "asha@example.com".into(),
        phone: "9876543210".into(),
        whatsapp: "9123456780".into(),
        college: "City College".into(),
        year: "3".into(),
        department: "CSE".into(),
        events: ["technical-quiz".to_string()].into_iter().collect(),
        payment_mode,
        project_link: None,
        payment_status: None,
        payment_id: None,
    }
}

pub(crate) fn submitter_with(backend: Arc<FakeBackend>, store: Arc<dyn AttemptStore>) -> Submitter {
    Submitter::new(backend, store, Arc::new(RegdeskConfig::default()))
}

#[derive(Default)]
pub(crate) struct FakeBackend {
    ticket_id: String,
    reject_detail: Option<String>,
    reject_confirmation: bool,
    statuses: Mutex<VecDeque<PaymentStatus>>,
    calls: Mutex<Vec<&'static str>>,
    registered: Mutex<Vec<RegistrationDraft>>,
    confirmed: Mutex<Vec<ConfirmPaymentRequest>>,
}

impl FakeBackend {
    pub(crate) fn accepting(ticket_id: &str) -> Self {
        Self {
            ticket_id: ticket_id.to_string(),
            ..Self::default()
        }
    }

    pub(crate) fn rejecting(detail: &str) -> Self {
        Self {
            reject_detail: Some(detail.to_string()),
            ..Self::default()
        }
    }

    /// Accept registrations but fail every payment confirmation.
    pub(crate) fn failing_confirmation(self) -> Self {
        Self {
            reject_confirmation: true,
            ..self
        }
    }

    /// Queue the statuses `registration_status` reports, in order.
    pub(crate) fn with_statuses(self, statuses: impl IntoIterator<Item = PaymentStatus>) -> Self {
        *self.statuses.lock().expect("fake lock poisoned") = statuses.into_iter().collect();
        self
    }

    pub(crate) fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().expect("fake lock poisoned").clone()
    }

    pub(crate) fn registered(&self) -> Vec<RegistrationDraft> {
        self.registered.lock().expect("fake lock poisoned").clone()
    }

    pub(crate) fn confirmed(&self) -> Vec<ConfirmPaymentRequest> {
        self.confirmed.lock().expect("fake lock poisoned").clone()
    }

    fn record(&self, call: &'static str) {
        self.calls.lock().expect("fake lock poisoned").push(call);
    }
}

#[async_trait]
impl RegistrationBackend for FakeBackend {
    async fn register(&self, draft: &RegistrationDraft) -> Result<RegisterResponse, ApiError> {
        self.record("register");
        if let Some(detail) = &self.reject_detail {
            return Err(ApiError::Business {
                call: "register",
                http_status: Some(200),
                detail: Some(detail.clone()),
            });
        }
        self.registered.lock().expect("fake lock poisoned").push(draft.clone());
        Ok(RegisterResponse {
            status: "success".into(),
            ticket_id: self.ticket_id.clone(),
            registration_id: Some(format!("reg_{}", self.ticket_id)),
            payment_url: None,
        })
    }

    async fn create_order(&self, _amount_minor: u64) -> Result<CreateOrderResponse, ApiError> {
        self.record("create-order");
        Ok(CreateOrderResponse {
            status: "success".into(),
            order_id: format!("order_{}", self.ticket_id),
        })
    }

    async fn confirm_payment(&self, request: &ConfirmPaymentRequest) -> Result<(), ApiError> {
        self.record("confirm-payment");
        if self.reject_confirmation {
            return Err(ApiError::Business {
                call: "confirm-payment",
                http_status: Some(500),
                detail: Some("ledger unavailable".into()),
            });
        }
        self.confirmed.lock().expect("fake lock poisoned").push(request.clone());
        Ok(())
    }

    async fn participant(&self, ticket_id: &str) -> Result<Participant, ApiError> {
        self.record("participant");
        let paid = !self.confirmed.lock().expect("fake lock poisoned").is_empty();
        Ok(Participant {
            ticket_id: ticket_id.to_string(),
            payment_status: if paid { PaymentStatus::Paid } else { PaymentStatus::Pending },
            name: Some("Asha Rao".into()),
            email: Some("asha@example.com".into()),
            events: vec!["technical-quiz".into()],
            department: Some("CSE".into()),
            extra: Default::default(),
        })
    }

    async fn registration_status(&self, _registration_id: &str) -> Result<RegistrationStatusResponse, ApiError> {
        self.record("registration");
        let status = self
            .statuses
            .lock()
            .expect("fake lock poisoned")
            .pop_front()
            .unwrap_or_default();
        Ok(RegistrationStatusResponse {
            payment_status: status,
            ticket_id: (status == PaymentStatus::Paid).then(|| self.ticket_id.clone()),
        })
    }

    async fn notify_webhook(&self, _notification: &WebhookNotification) {
        self.record("webhook");
    }
}

pub(crate) struct FakeWidget {
    outcome: Result<PaymentId, CheckoutError>,
    last_request: Mutex<Option<CheckoutRequest>>,
}

impl FakeWidget {
    pub(crate) fn paying(payment_id: &str) -> Self {
        Self {
            outcome: Ok(PaymentId::new(payment_id)),
            last_request: Mutex::new(None),
        }
    }

    pub(crate) fn cancelling() -> Self {
        Self {
            outcome: Err(CheckoutError::Cancelled),
            last_request: Mutex::new(None),
        }
    }

    pub(crate) fn last_request(&self) -> Option<CheckoutRequest> {
        self.last_request.lock().expect("fake lock poisoned").clone()
    }
}

#[async_trait]
impl CheckoutWidget for FakeWidget {
    async fn collect(&self, request: CheckoutRequest) -> Result<PaymentId, CheckoutError> {
        *self.last_request.lock().expect("fake lock poisoned") = Some(request);
        self.outcome.clone()
    }
}
