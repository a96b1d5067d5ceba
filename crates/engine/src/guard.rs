//! Single-flight guard for the submit trigger.
//!
//! While a [`SubmitTicket`] is alive the trigger reports itself disabled and
//! shows its busy label. Dropping the ticket re-enables it, so every exit
//! path of a submission (success, rejection, transport failure, panic
//! unwinding through the task) restores the original label.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::debug;

#[derive(Debug, Clone)]
pub struct SubmitGuard {
    label: String,
    busy_label: String,
    in_flight: Arc<AtomicBool>,
}

impl SubmitGuard {
    pub fn new(label: impl Into<String>, busy_label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            busy_label: busy_label.into(),
            in_flight: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Claim the trigger. Returns `None` while another submission is in flight.
    pub fn try_begin(&self) -> Option<SubmitTicket> {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| {
                debug!(label = %self.label, "submit trigger disabled");
                SubmitTicket {
                    in_flight: Arc::clone(&self.in_flight),
                }
            })
    }

    pub fn is_enabled(&self) -> bool {
        !self.in_flight.load(Ordering::Acquire)
    }

    /// Label the trigger should currently display.
    pub fn label(&self) -> &str {
        if self.is_enabled() { &self.label } else { &self.busy_label }
    }
}

impl Default for SubmitGuard {
    fn default() -> Self {
        Self::new("Submit Registration", "Processing...")
    }
}

/// Proof that the holder owns the in-flight submission.
#[derive(Debug)]
pub struct SubmitTicket {
    in_flight: Arc<AtomicBool>,
}

impl Drop for SubmitTicket {
    fn drop(&mut self) {
        self.in_flight.store(false, Ordering::Release);
        debug!("submit trigger re-enabled");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_claim_is_refused_until_ticket_drops() {
        let guard = SubmitGuard::new("Submit", "Processing...");
        let ticket = guard.try_begin().unwrap();
        assert!(!guard.is_enabled());
        assert_eq!(guard.label(), "Processing...");
        assert!(guard.try_begin().is_none());

        drop(ticket);
        assert!(guard.is_enabled());
        assert_eq!(guard.label(), "Submit");
        assert!(guard.try_begin().is_some());
    }

    #[tokio::test]
    async fn ticket_restores_label_when_task_fails() {
        let guard = SubmitGuard::default();
        let ticket = guard.try_begin().unwrap();
        let result: Result<(), &str> = tokio::spawn(async move {
            let _ticket = ticket;
            Err("network down")
        })
        .await
        .unwrap();
        assert!(result.is_err());
        assert!(guard.is_enabled());
        assert_eq!(guard.label(), "Submit Registration");
    }
}
