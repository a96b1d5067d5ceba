//! # Regdesk TUI
//!
//! Terminal front end for the registration wizard, built on Ratatui.
//!
//! ## Architecture
//!
//! - **`app`**: wizard state, messages, and effects
//! - **`cmd`**: executes effects (submissions, clipboard) off the render path
//! - **`checkout`**: embedded checkout bridge between a submission task and the UI
//! - **`ui`**: runtime loop, main view, and one component per step or modal
//!
//! Components never perform I/O. They mutate `App` and return effects; the
//! runtime hands those to `cmd` and feeds finished work back as messages.

mod app;
mod checkout;
mod cmd;
mod theme;
mod ui;

use anyhow::Result;
use regdesk_engine::{ResumeAction, Submitter};

pub use checkout::{CheckoutPromptRequest, TuiCheckoutWidget};

/// Runs the registration wizard until the user quits.
///
/// `startup` is the recovery decision made before the terminal is taken
/// over: finish a returned checkout, ask about a recent attempt, or start
/// fresh.
pub async fn run(submitter: Submitter, startup: ResumeAction) -> Result<()> {
    ui::runtime::run_app(submitter, startup).await
}
