use async_trait::async_trait;
use regdesk_types::{
    ConfirmPaymentRequest, CreateOrderResponse, Participant, RegisterResponse, RegistrationDraft,
    RegistrationStatusResponse, WebhookNotification,
};

use crate::{ApiError, RegdeskClient};

/// Calls the submission flows make against the registration backend.
///
/// Implemented by [`RegdeskClient`]; tests substitute in-memory fakes.
#[async_trait]
pub trait RegistrationBackend: Send + Sync {
    async fn register(&self, draft: &RegistrationDraft) -> Result<RegisterResponse, ApiError>;

    async fn create_order(&self, amount_minor: u64) -> Result<CreateOrderResponse, ApiError>;

    async fn confirm_payment(&self, request: &ConfirmPaymentRequest) -> Result<(), ApiError>;

    async fn participant(&self, ticket_id: &str) -> Result<Participant, ApiError>;

    async fn registration_status(&self, registration_id: &str) -> Result<RegistrationStatusResponse, ApiError>;

    /// Best effort; implementations must swallow their own failures.
    async fn notify_webhook(&self, notification: &WebhookNotification);
}

#[async_trait]
impl RegistrationBackend for RegdeskClient {
    async fn register(&self, draft: &RegistrationDraft) -> Result<RegisterResponse, ApiError> {
        RegdeskClient::register(self, draft).await
    }

    async fn create_order(&self, amount_minor: u64) -> Result<CreateOrderResponse, ApiError> {
        RegdeskClient::create_order(self, amount_minor).await
    }

    async fn confirm_payment(&self, request: &ConfirmPaymentRequest) -> Result<(), ApiError> {
        RegdeskClient::confirm_payment(self, request).await
    }

    async fn participant(&self, ticket_id: &str) -> Result<Participant, ApiError> {
        RegdeskClient::participant(self, ticket_id).await
    }

    async fn registration_status(&self, registration_id: &str) -> Result<RegistrationStatusResponse, ApiError> {
        RegdeskClient::registration_status(self, registration_id).await
    }

    async fn notify_webhook(&self, notification: &WebhookNotification) {
        RegdeskClient::notify_webhook(self, notification).await
    }
}
