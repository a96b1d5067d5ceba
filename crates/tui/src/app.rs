//! Application state and logic for the registration TUI.
//!
//! `App` owns the wizard, the form, and everything the screens render.
//! Components mutate it through the helpers below and report side effects
//! as [`Effect`]s; finished background work comes back as [`Msg`]s.

use std::sync::Arc;

use indexmap::IndexMap;
use regdesk_engine::{
    CheckoutError, CheckoutRequest, Confirmation, EventToggle, FormState, PaymentId, PaymentStrategy, ResumeAction,
    SubmissionError, SubmissionOutcome, Submitter, Wizard, WizardConfig, WizardStep, assemble_draft,
};
use regdesk_types::{FieldError, FormField, MAX_SELECTED_EVENTS, PaymentMode, RegistrationDraft, summarize_errors};
use regdesk_util::{CatalogEntry, RegdeskConfig, redact_sensitive};
use tokio::sync::oneshot;
use tracing::{debug, info, warn};
use url::Url;

use crate::checkout::{CheckoutPromptRequest, TuiCheckoutWidget};
use crate::ui::components::text_input::TextInputState;

const MAX_LOG_ENTRIES: usize = 500;

/// Copy confirmation shown on the ticket view.
pub const COPIED_MESSAGE: &str = "Registration ID copied!";

/// Personal-info rows in display order.
pub const PERSONAL_FIELDS: [FormField; 8] = [
    FormField::Name,
    FormField::Email,
    FormField::Phone,
    FormField::Whatsapp,
    FormField::College,
    FormField::Year,
    FormField::Department,
    FormField::ProjectLink,
];

/// Payment options in display order.
pub const PAYMENT_MODES: [PaymentMode; 2] = [PaymentMode::Online, PaymentMode::Offline];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub text: String,
    pub severity: Severity,
}

/// Editing state for the personal-info step.
#[derive(Debug, Clone)]
pub struct PersonalInfoState {
    pub focused: usize,
    inputs: IndexMap<FormField, TextInputState>,
}

impl Default for PersonalInfoState {
    fn default() -> Self {
        let inputs = PERSONAL_FIELDS
            .iter()
            .filter(|field| !is_choice_field(**field))
            .map(|field| (*field, TextInputState::new()))
            .collect();
        Self { focused: 0, inputs }
    }
}

impl PersonalInfoState {
    pub fn focused_field(&self) -> FormField {
        PERSONAL_FIELDS[self.focused.min(PERSONAL_FIELDS.len() - 1)]
    }

    pub fn input(&self, field: FormField) -> Option<&TextInputState> {
        self.inputs.get(&field)
    }

    pub fn input_mut(&mut self, field: FormField) -> Option<&mut TextInputState> {
        self.inputs.get_mut(&field)
    }

    pub fn focus_next(&mut self) {
        self.focused = (self.focused + 1) % PERSONAL_FIELDS.len();
    }

    pub fn focus_prev(&mut self) {
        self.focused = (self.focused + PERSONAL_FIELDS.len() - 1) % PERSONAL_FIELDS.len();
    }
}

/// Year and department are picked from the catalog rather than typed.
pub fn is_choice_field(field: FormField) -> bool {
    matches!(field, FormField::Year | FormField::Department)
}

/// The embedded checkout waiting on the user.
#[derive(Debug)]
pub struct CheckoutModalState {
    pub request: CheckoutRequest,
    pub payment_id: TextInputState,
    reply: Option<oneshot::Sender<Result<PaymentId, CheckoutError>>>,
}

impl CheckoutModalState {
    pub fn new(prompt: CheckoutPromptRequest) -> Self {
        Self {
            request: prompt.request,
            payment_id: TextInputState::new(),
            reply: Some(prompt.reply),
        }
    }

    /// Hand the outcome back to the waiting submission. Later calls are ignored.
    pub fn resolve(&mut self, outcome: Result<PaymentId, CheckoutError>) {
        if let Some(reply) = self.reply.take()
            && reply.send(outcome).is_err()
        {
            debug!("checkout outcome dropped; submission no longer waiting");
        }
    }
}

impl Drop for CheckoutModalState {
    fn drop(&mut self) {
        self.resolve(Err(CheckoutError::Cancelled));
    }
}

#[derive(Debug)]
pub enum Modal {
    /// "Did you complete the payment?" for a recent stored attempt.
    RecoveryPrompt { confirm_focused: bool },
    Checkout(Box<CheckoutModalState>),
}

/// Messages delivered to the application from the runtime.
#[derive(Debug)]
pub enum Msg {
    /// Periodic UI tick (throbber)
    Tick,
    /// Terminal resized
    Resize(u16, u16),
    /// Background work finished
    ExecCompleted(Box<ExecOutcome>),
    /// The embedded checkout wants the user to pay
    CheckoutRequested(CheckoutPromptRequest),
}

/// Side effects requested by state changes.
#[derive(Debug)]
pub enum Effect {
    Submit {
        draft: Box<RegistrationDraft>,
        strategy: PaymentStrategy,
    },
    CompleteRedirect(Option<PaymentId>),
    ConfirmRecoveredPayment,
    DeclineRecoveredPayment,
    CopyToClipboard {
        text: String,
        success_message: &'static str,
    },
    Quit,
}

/// Result of background work.
#[derive(Debug)]
pub enum ExecOutcome {
    Submission(Result<SubmissionOutcome, SubmissionError>),
    Log(String),
}

pub struct App {
    pub config: Arc<RegdeskConfig>,
    pub submitter: Submitter,
    pub widget: Arc<TuiCheckoutWidget>,
    pub wizard: Wizard,
    pub form: FormState,
    pub personal: PersonalInfoState,
    pub events_cursor: usize,
    pub payment_cursor: usize,
    pub field_errors: Vec<FieldError>,
    pub status: Option<StatusMessage>,
    pub logs: Vec<String>,
    pub confirmation: Option<Confirmation>,
    /// Set once a redirect checkout has started.
    pub checkout_url: Option<Url>,
    pub modal: Option<Modal>,
    pub executing: bool,
    pub throbber_idx: usize,
    pub should_quit: bool,
}

impl App {
    pub fn new(submitter: Submitter, widget: Arc<TuiCheckoutWidget>) -> Self {
        let config = Arc::new(submitter.config().clone());
        Self {
            wizard: Wizard::new(WizardConfig::from(config.as_ref())),
            config,
            submitter,
            widget,
            form: FormState::default(),
            personal: PersonalInfoState::default(),
            events_cursor: 0,
            payment_cursor: 0,
            field_errors: Vec::new(),
            status: None,
            logs: vec!["Welcome to regdesk".into()],
            confirmation: None,
            checkout_url: None,
            modal: None,
            executing: false,
            throbber_idx: 0,
            should_quit: false,
        }
    }

    /// Translate the startup recovery decision into UI state and effects.
    pub fn startup_effects(&mut self, action: ResumeAction) -> Vec<Effect> {
        match action {
            ResumeAction::CompletePayment(payment_id) => {
                self.executing = true;
                self.set_status(Severity::Info, "Completing your registration...");
                vec![Effect::CompleteRedirect(payment_id)]
            }
            ResumeAction::PromptPaymentConfirmation => {
                self.modal = Some(Modal::RecoveryPrompt { confirm_focused: true });
                Vec::new()
            }
            ResumeAction::SessionExpired => {
                self.set_status(Severity::Error, SubmissionError::PaymentDataMissing.user_message());
                Vec::new()
            }
            ResumeAction::Fresh => Vec::new(),
        }
    }

    pub fn set_status(&mut self, severity: Severity, text: impl Into<String>) {
        let text = text.into();
        self.log(text.clone());
        self.status = Some(StatusMessage { text, severity });
    }

    pub fn log(&mut self, entry: impl Into<String>) {
        self.logs.push(redact_sensitive(&entry.into()));
        let log_len = self.logs.len();
        if log_len > MAX_LOG_ENTRIES {
            self.logs.drain(0..log_len - MAX_LOG_ENTRIES);
        }
    }

    /// Validate the current step and move forward.
    pub fn advance(&mut self) {
        match self.wizard.next(&self.form) {
            Ok(step) => {
                self.field_errors.clear();
                self.status = None;
                debug!(step = ?step, "entered step");
            }
            Err(errors) => {
                let summary = summarize_errors(&errors);
                self.field_errors = errors;
                self.set_status(Severity::Error, summary);
            }
        }
    }

    pub fn retreat(&mut self) {
        self.wizard.back();
        self.field_errors.clear();
        self.status = None;
    }

    pub fn field_error(&self, field: FormField) -> Option<&FieldError> {
        self.field_errors.iter().find(|error| error.field == field)
    }

    /// Copy the focused personal-info input into the form.
    pub fn sync_personal_field(&mut self, field: FormField) {
        if let Some(input) = self.personal.input(field) {
            let value = input.input().to_string();
            self.form.set_field(field, value);
        }
        self.field_errors.retain(|error| error.field != field);
    }

    pub fn choices_for(&self, field: FormField) -> &[CatalogEntry] {
        match field {
            FormField::Year => &self.config.years,
            FormField::Department => &self.config.departments,
            _ => &[],
        }
    }

    /// Step a year/department selection forward or back, wrapping around.
    pub fn cycle_choice(&mut self, field: FormField, delta: isize) {
        let options = self.choices_for(field);
        if options.is_empty() {
            return;
        }
        let len = options.len() as isize;
        let current = options.iter().position(|entry| entry.id == self.form.field(field));
        let next = match current {
            Some(index) => (index as isize + delta).rem_euclid(len),
            None if delta >= 0 => 0,
            None => len - 1,
        };
        let id = options[next as usize].id.clone();
        self.form.set_field(field, id);
        self.field_errors.retain(|error| error.field != field);
    }

    pub fn toggle_event_at_cursor(&mut self) {
        let Some(entry) = self.config.events.get(self.events_cursor) else {
            return;
        };
        let id = entry.id.clone();
        let label = entry.label.clone();
        match self.form.toggle_event(&id) {
            EventToggle::Selected | EventToggle::Deselected => {
                self.field_errors.retain(|error| error.field != FormField::Events);
                self.status = None;
            }
            EventToggle::RejectedLimit => {
                self.set_status(
                    Severity::Error,
                    format!("You can select up to {MAX_SELECTED_EVENTS} events; {label} was not added"),
                );
            }
        }
    }

    pub fn select_payment_at_cursor(&mut self) {
        if let Some(mode) = PAYMENT_MODES.get(self.payment_cursor) {
            self.form.select_payment_mode(*mode);
            self.field_errors.retain(|error| error.field != FormField::PaymentMode);
        }
    }

    /// Assemble the draft and request submission. Nothing is sent on local failure.
    pub fn submit(&mut self) -> Vec<Effect> {
        if self.executing || !self.submitter.guard().is_enabled() {
            debug!("submit ignored; a submission is already in flight");
            return Vec::new();
        }
        if self.wizard.current_step() == WizardStep::Confirmation {
            debug!("submit ignored; this registration was already recorded");
            return Vec::new();
        }
        match assemble_draft(&self.form) {
            Ok(draft) => {
                let strategy = self.wizard.strategy_for(draft.payment_mode);
                self.field_errors.clear();
                self.executing = true;
                self.throbber_idx = 0;
                self.set_status(Severity::Info, "Processing...");
                vec![Effect::Submit {
                    draft: Box::new(draft),
                    strategy,
                }]
            }
            Err(errors) => {
                let summary = summarize_errors(&errors);
                self.field_errors = errors;
                self.set_status(Severity::Error, summary);
                Vec::new()
            }
        }
    }

    pub fn copy_ticket_id(&self) -> Vec<Effect> {
        self.confirmation
            .as_ref()
            .map(|confirmation| Effect::CopyToClipboard {
                text: confirmation.ticket.ticket_id.clone(),
                success_message: COPIED_MESSAGE,
            })
            .into_iter()
            .collect()
    }

    pub fn copy_checkout_url(&self) -> Vec<Effect> {
        self.checkout_url
            .as_ref()
            .map(|url| Effect::CopyToClipboard {
                text: url.to_string(),
                success_message: "Checkout link copied!",
            })
            .into_iter()
            .collect()
    }

    /// Start over with an empty form on the first step.
    pub fn reset_wizard(&mut self) {
        self.wizard.reset();
        self.form.clear();
        self.personal = PersonalInfoState::default();
        self.events_cursor = 0;
        self.payment_cursor = 0;
        self.field_errors.clear();
        self.confirmation = None;
        self.checkout_url = None;
    }

    pub fn update(&mut self, msg: Msg) -> Vec<Effect> {
        match msg {
            Msg::Tick => {
                if self.executing {
                    self.throbber_idx = (self.throbber_idx + 1) % 10;
                }
            }
            Msg::Resize(width, height) => debug!(width, height, "terminal resized"),
            Msg::CheckoutRequested(prompt) => {
                info!(order_id = %prompt.request.order_id, "embedded checkout opened");
                self.modal = Some(Modal::Checkout(Box::new(CheckoutModalState::new(prompt))));
            }
            Msg::ExecCompleted(outcome) => match *outcome {
                ExecOutcome::Submission(result) => {
                    self.executing = false;
                    self.apply_submission(result);
                }
                ExecOutcome::Log(entry) => self.log(entry),
            },
        }
        Vec::new()
    }

    fn apply_submission(&mut self, result: Result<SubmissionOutcome, SubmissionError>) {
        match result {
            Ok(SubmissionOutcome::Registered(confirmation)) => {
                self.checkout_url = None;
                self.wizard.show_confirmation();
                self.set_status(Severity::Success, confirmation.message);
                self.confirmation = Some(*confirmation);
            }
            Ok(SubmissionOutcome::CheckoutStarted { checkout_url }) => {
                self.set_status(
                    Severity::Info,
                    "Complete the payment using the checkout link, then press p to confirm.",
                );
                self.checkout_url = Some(checkout_url);
            }
            Err(SubmissionError::AlreadyInFlight) => {
                debug!("duplicate submission refused");
            }
            Err(error) if error.saved_confirmation().is_some() => {
                warn!(error = %error, "payment did not complete; showing the saved registration");
                self.checkout_url = None;
                self.wizard.show_confirmation();
                self.set_status(Severity::Error, error.user_message());
                self.confirmation = error.saved_confirmation().cloned();
            }
            Err(error) => {
                warn!(error = %error, "submission failed");
                if error.requires_restart() {
                    self.reset_wizard();
                }
                self.set_status(Severity::Error, error.user_message());
            }
        }
    }
}
