//! Post-payment status polling.

use std::time::Duration;

use regdesk_api::{ApiError, RegistrationBackend};
use regdesk_types::PaymentStatus;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    Paid { ticket_id: Option<String> },
    StillPending { attempts: u32 },
}

/// Query the registration until it reports `paid` or `max_attempts` lookups ran.
///
/// Sleeps `interval` between lookups. Backend errors end the poll.
pub async fn poll_payment_status(
    backend: &dyn RegistrationBackend,
    registration_id: &str,
    interval: Duration,
    max_attempts: u32,
) -> Result<PollOutcome, ApiError> {
    for attempt in 1..=max_attempts {
        let status = backend.registration_status(registration_id).await?;
        debug!(registration_id, attempt, status = %status.payment_status, "polled payment status");
        if status.payment_status == PaymentStatus::Paid {
            return Ok(PollOutcome::Paid {
                ticket_id: status.ticket_id,
            });
        }
        if attempt < max_attempts {
            tokio::time::sleep(interval).await;
        }
    }
    Ok(PollOutcome::StillPending { attempts: max_attempts })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeBackend;

    #[tokio::test]
    async fn stops_when_paid() {
        let backend = FakeBackend::accepting("T1").with_statuses([PaymentStatus::Pending, PaymentStatus::Paid]);
        let outcome = poll_payment_status(&backend, "reg_T1", Duration::ZERO, 5).await.unwrap();
        assert_eq!(
            outcome,
            PollOutcome::Paid {
                ticket_id: Some("T1".into())
            }
        );
        assert_eq!(backend.calls().len(), 2);
    }

    #[tokio::test]
    async fn gives_up_after_max_attempts() {
        let backend = FakeBackend::accepting("T1");
        let outcome = poll_payment_status(&backend, "reg_T1", Duration::ZERO, 3).await.unwrap();
        assert_eq!(outcome, PollOutcome::StillPending { attempts: 3 });
        assert_eq!(backend.calls().len(), 3);
    }
}
