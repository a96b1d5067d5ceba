//! # Regdesk shared types
//!
//! Data model and wire shapes for the registration wizard, plus the field
//! validation rules every front end applies before talking to the backend.

pub mod registration;
pub mod validation;
pub mod wire;

pub use registration::{
    DEFAULT_STALENESS_MINUTES, MAX_SELECTED_EVENTS, PaymentMode, PaymentStatus, PersistedAttempt, RegistrationDraft,
    RegistrationResult, ResultStatus,
};
pub use validation::{FieldError, FormField, is_present, is_valid_email, is_valid_phone, summarize_errors};
pub use wire::{
    ApiEnvelope, ConfirmPaymentRequest, CreateOrderRequest, CreateOrderResponse, Participant, ParticipantResponse,
    RegisterResponse, RegistrationStatusResponse, WebhookNotification,
};
