//! Embedded checkout for the terminal.
//!
//! The submission runs on a background task while the event loop owns the
//! screen. [`TuiCheckoutWidget`] bridges the two: it posts a prompt to the
//! runtime and waits for the checkout modal to answer on a oneshot channel.

use async_trait::async_trait;
use regdesk_engine::{CheckoutError, CheckoutRequest, CheckoutWidget, PaymentId};
use tokio::sync::{mpsc, oneshot};
use tracing::debug;

/// A pending checkout waiting for the user.
#[derive(Debug)]
pub struct CheckoutPromptRequest {
    pub request: CheckoutRequest,
    pub reply: oneshot::Sender<Result<PaymentId, CheckoutError>>,
}

#[derive(Debug, Clone)]
pub struct TuiCheckoutWidget {
    prompts: mpsc::Sender<CheckoutPromptRequest>,
}

impl TuiCheckoutWidget {
    pub fn new(prompts: mpsc::Sender<CheckoutPromptRequest>) -> Self {
        Self { prompts }
    }
}

#[async_trait]
impl CheckoutWidget for TuiCheckoutWidget {
    async fn collect(&self, request: CheckoutRequest) -> Result<PaymentId, CheckoutError> {
        let (reply, outcome) = oneshot::channel();
        if self.prompts.send(CheckoutPromptRequest { request, reply }).await.is_err() {
            return Err(CheckoutError::Failed("checkout is unavailable".into()));
        }
        // A dropped modal counts as the user closing the checkout.
        outcome.await.unwrap_or_else(|_| {
            debug!("checkout prompt closed without an answer");
            Err(CheckoutError::Cancelled)
        })
    }
}
