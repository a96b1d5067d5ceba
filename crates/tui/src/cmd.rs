//! # Command Execution Layer
//!
//! This module translates application effects ([`Effect`]) into imperative
//! commands ([`Cmd`]) and executes them. It is the boundary where the pure
//! state of the wizard meets the outside world:
//! - Writing to the system clipboard
//! - Submitting registrations to the backend
//! - Finishing or discarding a recovered payment attempt
//!
//! ## Design
//! - [`from_effects`] maps effects to commands one to one.
//! - [`run_cmds`] executes them and returns a [`CommandBatch`]: outcomes that
//!   are ready now and background tasks whose outcomes arrive later.
//!
//! State updates stay pure; commands own the side effects.

use std::sync::Arc;

use regdesk_engine::{
    CheckoutWidget, PaymentId, PaymentStrategy, SubmissionOutcome, confirm_recovered_payment, decline_recovered_payment,
};
use regdesk_types::RegistrationDraft;
use tokio::task::{JoinHandle, spawn};
use tracing::{info, warn};

use crate::app::{App, Effect, ExecOutcome, Severity};

/// Side-effectful commands executed outside of state updates.
#[derive(Debug)]
pub enum Cmd {
    /// Write text into the system clipboard.
    ClipboardSet {
        text: String,
        success_message: &'static str,
    },
    Submit {
        draft: Box<RegistrationDraft>,
        strategy: PaymentStrategy,
    },
    CompleteRedirect(Option<PaymentId>),
    ConfirmRecoveredPayment,
    DeclineRecoveredPayment,
    Quit,
}

/// Outcomes produced by one round of command execution.
#[derive(Debug, Default)]
pub struct CommandBatch {
    pub immediate: Vec<ExecOutcome>,
    pub pending: Vec<JoinHandle<ExecOutcome>>,
}

pub fn from_effects(effects: Vec<Effect>) -> Vec<Cmd> {
    effects
        .into_iter()
        .map(|effect| match effect {
            Effect::Submit { draft, strategy } => Cmd::Submit { draft, strategy },
            Effect::CompleteRedirect(payment_id) => Cmd::CompleteRedirect(payment_id),
            Effect::ConfirmRecoveredPayment => Cmd::ConfirmRecoveredPayment,
            Effect::DeclineRecoveredPayment => Cmd::DeclineRecoveredPayment,
            Effect::CopyToClipboard { text, success_message } => Cmd::ClipboardSet { text, success_message },
            Effect::Quit => Cmd::Quit,
        })
        .collect()
}

/// Convenience wrapper used by the runtime.
pub fn run_from_effects(app: &mut App, effects: Vec<Effect>) -> CommandBatch {
    run_cmds(app, from_effects(effects))
}

pub fn run_cmds(app: &mut App, commands: Vec<Cmd>) -> CommandBatch {
    let mut batch = CommandBatch::default();
    for command in commands {
        match command {
            Cmd::ClipboardSet { text, success_message } => {
                execute_clipboard_set(app, text, success_message, system_clipboard);
            }
            Cmd::Submit { draft, strategy } => batch.pending.push(spawn_submission(app, *draft, strategy)),
            Cmd::CompleteRedirect(payment_id) => batch.pending.push(spawn_complete_redirect(app, payment_id)),
            Cmd::ConfirmRecoveredPayment => batch.pending.push(spawn_confirm_recovered(app)),
            Cmd::DeclineRecoveredPayment => execute_decline_recovered(app),
            Cmd::Quit => app.should_quit = true,
        }
    }
    batch
}

fn system_clipboard(text: String) -> Result<(), arboard::Error> {
    arboard::Clipboard::new().and_then(|mut clipboard| clipboard.set_text(text))
}

/// Copy `text` and report the outcome. Failures only log; the wizard is untouched.
fn execute_clipboard_set(
    app: &mut App,
    text: String,
    success_message: &'static str,
    write: impl FnOnce(String) -> Result<(), arboard::Error>,
) {
    match write(text) {
        Ok(()) => app.set_status(Severity::Success, success_message),
        Err(error) => {
            warn!(error = %error, "clipboard write failed");
            app.log(format!("Clipboard error: {error}"));
        }
    }
}

fn spawn_submission(app: &mut App, draft: RegistrationDraft, strategy: PaymentStrategy) -> JoinHandle<ExecOutcome> {
    let submitter = app.submitter.clone();
    let widget = Arc::clone(&app.widget);
    app.executing = true;
    info!(strategy = ?strategy, events = draft.events.len(), "submitting registration");
    spawn(async move {
        let widget: &dyn CheckoutWidget = widget.as_ref();
        ExecOutcome::Submission(submitter.submit(draft, strategy, Some(widget)).await)
    })
}

fn spawn_complete_redirect(app: &mut App, payment_id: Option<PaymentId>) -> JoinHandle<ExecOutcome> {
    let submitter = app.submitter.clone();
    app.executing = true;
    spawn(async move {
        let result = submitter.complete_redirect(payment_id).await;
        ExecOutcome::Submission(result.map(|confirmation| SubmissionOutcome::Registered(Box::new(confirmation))))
    })
}

fn spawn_confirm_recovered(app: &mut App) -> JoinHandle<ExecOutcome> {
    let submitter = app.submitter.clone();
    app.executing = true;
    app.set_status(Severity::Info, "Completing your registration...");
    spawn(async move {
        let result = confirm_recovered_payment(&submitter).await;
        ExecOutcome::Submission(result.map(|confirmation| SubmissionOutcome::Registered(Box::new(confirmation))))
    })
}

fn execute_decline_recovered(app: &mut App) {
    match decline_recovered_payment(app.submitter.store(), &mut app.wizard, &mut app.form) {
        Ok(()) => {
            app.reset_wizard();
            app.set_status(Severity::Info, "Payment not completed. Please register again.");
        }
        Err(error) => {
            warn!(error = %error, "could not discard the stored payment attempt");
            app.set_status(Severity::Error, error.user_message());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::tests::{fill_personal, test_app};
    use regdesk_engine::WizardStep;

    #[tokio::test]
    async fn clipboard_failure_logs_and_keeps_state() {
        let mut app = test_app();
        fill_personal(&mut app);
        app.advance();
        let form_before = app.form.clone();
        let log_count = app.logs.len();

        execute_clipboard_set(&mut app, "T123".into(), "Registration ID copied!", |_| {
            Err(arboard::Error::ClipboardNotSupported)
        });

        assert_eq!(app.wizard.current_step(), WizardStep::EventSelection);
        assert_eq!(app.form, form_before);
        assert_eq!(app.logs.len(), log_count + 1);
        assert!(app.logs.last().unwrap().starts_with("Clipboard error:"));
        assert!(app.status.is_none());
    }

    #[tokio::test]
    async fn clipboard_success_sets_status() {
        let mut app = test_app();
        let mut copied = None;
        execute_clipboard_set(&mut app, "T123".into(), "Registration ID copied!", |text| {
            copied = Some(text);
            Ok(())
        });
        assert_eq!(copied.as_deref(), Some("T123"));
        assert_eq!(app.status.unwrap().text, "Registration ID copied!");
    }

    #[tokio::test]
    async fn quit_and_decline_run_immediately() {
        let mut app = test_app();
        fill_personal(&mut app);
        app.advance();

        let batch = run_from_effects(&mut app, vec![Effect::DeclineRecoveredPayment, Effect::Quit]);
        assert!(batch.pending.is_empty());
        assert!(app.should_quit);
        assert_eq!(app.wizard.state().current_step_index(), 0);
        assert_eq!(app.form.field(regdesk_types::FormField::Name), "");
    }
}
