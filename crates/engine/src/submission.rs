//! Submission flows for each payment strategy.
//!
//! Every flow runs its backend calls strictly in sequence and holds the
//! [`SubmitGuard`] for its whole duration, so a draft is never submitted
//! twice concurrently.
//!
//! Ordering differs by strategy:
//!
//! - offline: register with `payment_status = pending`
//! - redirect: persist the attempt, send the user to checkout, and register
//!   once (as `paid`) when they return; the attempt is cleared only after
//!   the backend accepts the registration
//! - embedded: register as `pending` first, then create the order, collect
//!   the payment, confirm it, and read the participant back. A payment that
//!   never completes leaves a pending registration rather than an orphaned
//!   payment.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use regdesk_api::{ApiError, RegistrationBackend};
use regdesk_types::{
    ConfirmPaymentRequest, PaymentStatus, PersistedAttempt, RegisterResponse, RegistrationDraft, RegistrationResult,
    ResultStatus, WebhookNotification,
};
use regdesk_util::{AttemptStore, AttemptStoreError, RegdeskConfig, redact_payment_id};
use thiserror::Error;
use tracing::{debug, info, warn};
use url::Url;

use crate::guard::SubmitGuard;
use crate::payment::{CheckoutError, CheckoutRequest, CheckoutWidget, PaymentId, PaymentStrategy, build_checkout_url};
use crate::ticket::{TicketError, TicketView};

/// Shown on the confirmation view after any successful registration.
pub const SUCCESS_MESSAGE: &str = "Registration successful! Check your email.";

/// Shown when an embedded checkout left the registration pending.
pub const PAYMENT_DUE_MESSAGE: &str = "Registration saved. Payment is due at the venue.";

/// Shown when a collected payment could not be recorded against the registration.
pub const PAYMENT_UNCONFIRMED_MESSAGE: &str = "Registration saved. Contact support to confirm your payment.";

#[derive(Debug, Error)]
pub enum SubmissionError {
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Registered as pending, but the embedded checkout did not complete.
    /// `saved` is the pending registration the backend now holds.
    #[error("registration {ticket_id} saved with payment pending: {source}")]
    PaymentIncomplete {
        ticket_id: String,
        saved: Box<Confirmation>,
        #[source]
        source: CheckoutError,
    },

    /// The payment went through but the backend did not record it.
    #[error("payment {payment_id} for registration {ticket_id} could not be confirmed: {source}")]
    ConfirmationFailed {
        ticket_id: String,
        payment_id: String,
        saved: Box<Confirmation>,
        #[source]
        source: ApiError,
    },

    /// A success return arrived but no attempt was stored.
    #[error("Payment successful but registration data is missing. Please contact support.")]
    PaymentDataMissing,

    #[error("Your session has expired. Please start the registration again.")]
    SessionExpired,

    #[error("a submission is already in progress")]
    AlreadyInFlight,

    #[error("embedded checkout is not available")]
    WidgetUnavailable,

    #[error(transparent)]
    Storage(#[from] AttemptStoreError),

    #[error("invalid checkout URL: {0}")]
    CheckoutUrl(#[from] url::ParseError),

    #[error(transparent)]
    Ticket(#[from] TicketError),
}

impl SubmissionError {
    pub fn user_message(&self) -> String {
        match self {
            SubmissionError::Api(error) => error.user_message(),
            SubmissionError::PaymentIncomplete { ticket_id, source, .. } => format!(
                "{}. Registration {ticket_id} is saved; payment is due at the venue.",
                capitalize(&source.to_string())
            ),
            SubmissionError::ConfirmationFailed { ticket_id, payment_id, .. } => format!(
                "Payment received but could not be confirmed. Please contact support with registration {ticket_id} and payment {payment_id}."
            ),
            other => other.to_string(),
        }
    }

    /// Whether the wizard should restart from the first step.
    pub fn requires_restart(&self) -> bool {
        matches!(self, SubmissionError::SessionExpired | SubmissionError::PaymentDataMissing)
    }

    /// The registration the backend kept even though the flow failed.
    /// Resubmitting the draft would register it a second time.
    pub fn saved_confirmation(&self) -> Option<&Confirmation> {
        match self {
            SubmissionError::PaymentIncomplete { saved, .. } | SubmissionError::ConfirmationFailed { saved, .. } => {
                Some(saved)
            }
            _ => None,
        }
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// A registration the backend accepted, ready for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Confirmation {
    pub result: RegistrationResult,
    pub ticket: TicketView,
    pub message: &'static str,
}

/// What a submission produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    Registered(Box<Confirmation>),
    /// The user must complete payment at this URL and return.
    CheckoutStarted { checkout_url: Url },
}

/// Runs submissions against a backend and an attempt store.
#[derive(Clone)]
pub struct Submitter {
    backend: Arc<dyn RegistrationBackend>,
    store: Arc<dyn AttemptStore>,
    config: Arc<RegdeskConfig>,
    guard: SubmitGuard,
}

impl Submitter {
    pub fn new(backend: Arc<dyn RegistrationBackend>, store: Arc<dyn AttemptStore>, config: Arc<RegdeskConfig>) -> Self {
        Self {
            backend,
            store,
            config,
            guard: SubmitGuard::default(),
        }
    }

    pub fn guard(&self) -> &SubmitGuard {
        &self.guard
    }

    pub fn config(&self) -> &RegdeskConfig {
        &self.config
    }

    pub fn store(&self) -> &dyn AttemptStore {
        self.store.as_ref()
    }

    pub fn backend(&self) -> &dyn RegistrationBackend {
        self.backend.as_ref()
    }

    /// Dispatch a draft to the flow for `strategy`.
    pub async fn submit(
        &self,
        draft: RegistrationDraft,
        strategy: PaymentStrategy,
        widget: Option<&dyn CheckoutWidget>,
    ) -> Result<SubmissionOutcome, SubmissionError> {
        match strategy {
            PaymentStrategy::Offline => self.submit_offline(draft).await.map(registered),
            PaymentStrategy::Redirect => self
                .begin_redirect(draft, Utc::now())
                .map(|checkout_url| SubmissionOutcome::CheckoutStarted { checkout_url }),
            PaymentStrategy::Embedded => {
                let widget = widget.ok_or(SubmissionError::WidgetUnavailable)?;
                self.submit_embedded(draft, widget).await.map(registered)
            }
        }
    }

    pub async fn submit_offline(&self, draft: RegistrationDraft) -> Result<Confirmation, SubmissionError> {
        let _ticket = self.guard.try_begin().ok_or(SubmissionError::AlreadyInFlight)?;
        let draft = draft.with_payment(PaymentStatus::Pending, None);
        self.register(&draft, PaymentStatus::Pending).await
    }

    /// Persist the attempt and return the checkout URL to send the user to.
    pub fn begin_redirect(&self, draft: RegistrationDraft, now: DateTime<Utc>) -> Result<Url, SubmissionError> {
        let _ticket = self.guard.try_begin().ok_or(SubmissionError::AlreadyInFlight)?;
        let checkout_url = build_checkout_url(&self.config.checkout_url, &self.config.return_url)?;
        self.store.save(&PersistedAttempt::new(draft, now))?;
        info!(checkout = %checkout_url.host_str().unwrap_or_default(), "payment attempt persisted; awaiting checkout return");
        Ok(checkout_url)
    }

    /// Finish a redirect checkout after the user returned with a success marker.
    pub async fn complete_redirect(&self, payment_id: Option<PaymentId>) -> Result<Confirmation, SubmissionError> {
        let _ticket = self.guard.try_begin().ok_or(SubmissionError::AlreadyInFlight)?;
        let Some(attempt) = self.store.load()? else {
            warn!("checkout returned successfully but no stored registration was found");
            return Err(SubmissionError::PaymentDataMissing);
        };
        self.register_paid_attempt(attempt, payment_id).await
    }

    /// Register a recovered attempt as paid and clear it once accepted.
    pub(crate) async fn register_paid_attempt(
        &self,
        attempt: PersistedAttempt,
        payment_id: Option<PaymentId>,
    ) -> Result<Confirmation, SubmissionError> {
        let payment_id = payment_id.map(PaymentId::into_inner);
        let draft = attempt.draft.with_payment(PaymentStatus::Paid, payment_id.clone());

        self.backend
            .notify_webhook(&WebhookNotification::payment_success(payment_id, draft.clone()))
            .await;

        self.register(&draft, PaymentStatus::Paid).await
    }

    pub async fn submit_embedded(
        &self,
        draft: RegistrationDraft,
        widget: &dyn CheckoutWidget,
    ) -> Result<Confirmation, SubmissionError> {
        let _ticket = self.guard.try_begin().ok_or(SubmissionError::AlreadyInFlight)?;
        let draft = draft.with_payment(PaymentStatus::Pending, None);

        let registered = self.backend.register(&draft).await?;
        let ticket_id = registered.ticket_id.clone();
        debug!(ticket_id = %ticket_id, "registered pending; creating payment order");
        let pending = self.confirmation(&draft, registered, PaymentStatus::Pending, PAYMENT_DUE_MESSAGE)?;

        let order = self.backend.create_order(self.config.checkout.amount_minor).await?;
        let request = CheckoutRequest::new(&self.config.checkout, order.order_id, &draft);
        let payment_id = match widget.collect(request).await {
            Ok(payment_id) => payment_id.into_inner(),
            Err(source) => {
                info!(ticket_id = %ticket_id, reason = %source, "checkout did not complete");
                return Err(SubmissionError::PaymentIncomplete {
                    ticket_id,
                    saved: Box::new(pending),
                    source,
                });
            }
        };

        let confirm = ConfirmPaymentRequest {
            ticket_id: ticket_id.clone(),
            payment_id: payment_id.clone(),
            payment_status: PaymentStatus::Paid,
        };
        if let Err(source) = self.backend.confirm_payment(&confirm).await {
            warn!(
                ticket_id = %ticket_id,
                payment_id = %redact_payment_id(&payment_id),
                error = %source,
                "payment collected but confirmation failed"
            );
            return Err(SubmissionError::ConfirmationFailed {
                ticket_id,
                payment_id,
                saved: Box::new(Confirmation {
                    message: PAYMENT_UNCONFIRMED_MESSAGE,
                    ..pending
                }),
                source,
            });
        }

        let participant = self.backend.participant(&ticket_id).await?;
        if participant.payment_status != PaymentStatus::Paid {
            warn!(ticket_id = %ticket_id, status = %participant.payment_status, "participant not yet marked paid");
        }

        let ticket = TicketView::from_draft(&ticket_id, &draft, PaymentStatus::Paid, &self.config)?;
        info!(ticket_id = %ticket_id, "embedded payment confirmed");
        Ok(Confirmation {
            result: RegistrationResult {
                payment_status: PaymentStatus::Paid,
                ..pending.result
            },
            ticket,
            message: SUCCESS_MESSAGE,
        })
    }

    async fn register(&self, draft: &RegistrationDraft, status: PaymentStatus) -> Result<Confirmation, SubmissionError> {
        let response = self.backend.register(draft).await?;
        info!(ticket_id = %response.ticket_id, payment_status = %status, "registration accepted");
        if status == PaymentStatus::Paid
            && let Err(error) = self.store.clear()
        {
            warn!(error = %error, "registration succeeded but the payment attempt could not be cleared");
        }
        self.confirmation(draft, response, status, SUCCESS_MESSAGE)
    }

    fn confirmation(
        &self,
        draft: &RegistrationDraft,
        response: RegisterResponse,
        status: PaymentStatus,
        message: &'static str,
    ) -> Result<Confirmation, SubmissionError> {
        let ticket = TicketView::from_draft(&response.ticket_id, draft, status, &self.config)?;
        Ok(Confirmation {
            result: RegistrationResult {
                status: ResultStatus::Success,
                ticket_id: response.ticket_id,
                payment_status: status,
                registration_id: response.registration_id,
                detail: None,
            },
            ticket,
            message,
        })
    }
}

fn registered(confirmation: Confirmation) -> SubmissionOutcome {
    SubmissionOutcome::Registered(Box::new(confirmation))
}
