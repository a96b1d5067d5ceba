//! # Regdesk Engine
//!
//! The registration wizard without a screen: step navigation, the typed form
//! accessor, per-step validation, the single-flight submit guard, payment
//! strategies, submission flows, recovery of an interrupted redirect
//! checkout, and the ticket view with its scannable code.
//!
//! ## Usage
//!
//! ```rust
//! use regdesk_engine::{FormState, Wizard, WizardConfig, WizardStep};
//!
//! let mut wizard = Wizard::new(WizardConfig::default());
//! let form = FormState::default();
//!
//! // An empty personal-info step does not advance.
//! assert!(wizard.next(&form).is_err());
//! assert_eq!(wizard.current_step(), WizardStep::PersonalInfo);
//! ```
//!
//! ## Architecture
//!
//! - **`wizard`**: step state machine and its configuration
//! - **`form`** / **`validate`**: field access and per-step rules
//! - **`guard`**: disables the submit trigger while a request is in flight
//! - **`payment`**: strategies, checkout URL, return parameters, widget seam
//! - **`submission`**: offline, redirect, and embedded flows
//! - **`recovery`**: resuming after the external checkout
//! - **`polling`**: waiting for the backend to mark a registration paid
//! - **`ticket`**: confirmation view and QR rendering

pub mod form;
pub mod guard;
pub mod payment;
pub mod polling;
pub mod recovery;
pub mod submission;
pub mod ticket;
pub mod validate;
pub mod wizard;

#[cfg(test)]
pub(crate) mod testing;

pub use form::{EventToggle, FormData, FormState, assemble_draft};
pub use guard::{SubmitGuard, SubmitTicket};
pub use payment::{
    CheckoutError, CheckoutPrefill, CheckoutRequest, CheckoutWidget, PaymentId, PaymentStrategy, ReturnParams,
    build_checkout_url,
};
pub use polling::{PollOutcome, poll_payment_status};
pub use recovery::{
    PAYMENT_CONFIRMATION_PROMPT, ResumeAction, confirm_recovered_payment, decline_recovered_payment, plan_resume,
    resume_action,
};
pub use submission::{
    Confirmation, PAYMENT_DUE_MESSAGE, PAYMENT_UNCONFIRMED_MESSAGE, SUCCESS_MESSAGE, SubmissionError, SubmissionOutcome,
    Submitter,
};
pub use ticket::{OFFLINE_NOTICE, ScannableCode, TicketError, TicketView};
pub use validate::validate_step;
pub use wizard::{StepMarker, StepValidator, Wizard, WizardConfig, WizardState, WizardStep};
