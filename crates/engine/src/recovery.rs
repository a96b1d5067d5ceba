//! Deciding what to do when the client starts with a stored payment attempt.
//!
//! A return URL with a success marker completes the payment. Without one, a
//! fresh attempt asks the user whether they paid; a stale attempt is dropped
//! and the wizard starts over.

use chrono::{DateTime, Duration, Utc};
use regdesk_types::PersistedAttempt;
use regdesk_util::AttemptStore;
use tracing::{debug, info};

use crate::form::FormState;
use crate::payment::{PaymentId, ReturnParams};
use crate::submission::{Confirmation, SubmissionError, Submitter};
use crate::wizard::Wizard;

/// Prompt shown for a fresh attempt without success markers.
pub const PAYMENT_CONFIRMATION_PROMPT: &str = "Did you complete the payment? Confirm if payment was successful, cancel if not.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResumeAction {
    /// Success markers present and an attempt is stored.
    CompletePayment(Option<PaymentId>),
    /// No markers, but the stored attempt is younger than the staleness window.
    PromptPaymentConfirmation,
    /// Success markers present but nothing is stored.
    SessionExpired,
    /// Start the wizard at step 0.
    Fresh,
}

/// Pure decision over the return parameters and the stored attempt.
pub fn resume_action(
    params: &ReturnParams,
    attempt: Option<&PersistedAttempt>,
    now: DateTime<Utc>,
    window: Duration,
) -> ResumeAction {
    match (params.indicates_success(), attempt) {
        (true, Some(_)) => ResumeAction::CompletePayment(params.payment_id.clone()),
        (true, None) => ResumeAction::SessionExpired,
        (false, Some(attempt)) if attempt.is_fresh(now, window) => ResumeAction::PromptPaymentConfirmation,
        (false, _) => ResumeAction::Fresh,
    }
}

/// Load the stored attempt and decide; a stale attempt is discarded.
pub fn plan_resume(
    store: &dyn AttemptStore,
    params: &ReturnParams,
    now: DateTime<Utc>,
    window: Duration,
) -> Result<ResumeAction, SubmissionError> {
    let attempt = store.load()?;
    let action = resume_action(params, attempt.as_ref(), now, window);
    if action == ResumeAction::Fresh && attempt.is_some() {
        debug!("discarding stale payment attempt");
        store.clear()?;
    }
    debug!(action = ?action, "resume planned");
    Ok(action)
}

/// The user says they paid: register the stored attempt as paid.
pub async fn confirm_recovered_payment(submitter: &Submitter) -> Result<Confirmation, SubmissionError> {
    let _ticket = submitter
        .guard()
        .try_begin()
        .ok_or(SubmissionError::AlreadyInFlight)?;
    let attempt = submitter.store().load()?.ok_or(SubmissionError::SessionExpired)?;
    info!("registering recovered payment attempt as paid");
    submitter.register_paid_attempt(attempt, None).await
}

/// The user says they did not pay: forget the attempt and start over.
pub fn decline_recovered_payment(
    store: &dyn AttemptStore,
    wizard: &mut Wizard,
    form: &mut FormState,
) -> Result<(), SubmissionError> {
    store.clear()?;
    wizard.reset();
    form.clear();
    info!("recovered payment declined; wizard reset");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeBackend, sample_draft, submitter_with};
    use crate::wizard::WizardConfig;
    use regdesk_types::{PaymentMode, PaymentStatus};
    use regdesk_util::InMemoryAttemptStore;
    use std::sync::Arc;

    fn attempt_at(minutes_ago: i64, now: DateTime<Utc>) -> PersistedAttempt {
        PersistedAttempt::new(sample_draft(PaymentMode::Online), now - Duration::minutes(minutes_ago))
    }

    #[test]
    fn prompt_only_for_fresh_attempts() {
        let now = Utc::now();
        let window = Duration::minutes(10);
        let none = ReturnParams::default();

        assert_eq!(
            resume_action(&none, Some(&attempt_at(3, now)), now, window),
            ResumeAction::PromptPaymentConfirmation
        );
        assert_eq!(resume_action(&none, Some(&attempt_at(11, now)), now, window), ResumeAction::Fresh);
        assert_eq!(resume_action(&none, Some(&attempt_at(10, now)), now, window), ResumeAction::Fresh);
        assert_eq!(resume_action(&none, None, now, window), ResumeAction::Fresh);
    }

    #[test]
    fn success_markers_complete_or_expire() {
        let now = Utc::now();
        let window = Duration::minutes(10);
        let params = ReturnParams::parse("payment=success&razorpay_payment_id=pay_1").unwrap();

        assert_eq!(
            resume_action(&params, Some(&attempt_at(45, now)), now, window),
            ResumeAction::CompletePayment(Some(PaymentId::new("pay_1")))
        );
        assert_eq!(resume_action(&params, None, now, window), ResumeAction::SessionExpired);
    }

    #[test]
    fn plan_resume_discards_stale_attempt() {
        let now = Utc::now();
        let store = InMemoryAttemptStore::with_attempt(attempt_at(30, now));
        let action = plan_resume(&store, &ReturnParams::default(), now, Duration::minutes(10)).unwrap();
        assert_eq!(action, ResumeAction::Fresh);
        assert!(store.load().unwrap().is_none());
    }

    #[tokio::test]
    async fn confirming_registers_as_paid_and_clears() {
        let backend = Arc::new(FakeBackend::accepting("T9"));
        let store = Arc::new(InMemoryAttemptStore::with_attempt(attempt_at(2, Utc::now())));
        let submitter = submitter_with(backend.clone(), store.clone());

        let confirmation = confirm_recovered_payment(&submitter).await.unwrap();
        assert_eq!(confirmation.ticket.ticket_id, "T9");
        assert_eq!(confirmation.ticket.payment_status, PaymentStatus::Paid);
        assert!(confirmation.ticket.offline_notice().is_none());
        assert_eq!(backend.registered()[0].payment_status, Some(PaymentStatus::Paid));
        assert!(store.load().unwrap().is_none());
        assert!(submitter.guard().is_enabled());
    }

    #[test]
    fn declining_clears_attempt_and_resets_wizard() {
        let store = InMemoryAttemptStore::with_attempt(attempt_at(2, Utc::now()));
        let mut wizard = Wizard::new(WizardConfig::default());
        wizard.show_confirmation();
        let mut form = FormState::from_draft(&sample_draft(PaymentMode::Online));

        decline_recovered_payment(&store, &mut wizard, &mut form).unwrap();
        assert!(store.load().unwrap().is_none());
        assert_eq!(wizard.state().current_step_index(), 0);
        assert_eq!(form, FormState::default());
    }
}
