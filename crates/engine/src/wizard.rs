//! Step navigation for the registration wizard.
//!
//! [`WizardState`] is a plain value: transitions consume it and return the
//! next state, so callers never share a mutable step counter. [`Wizard`]
//! pairs that state with its [`WizardConfig`] and runs the per-step
//! validator before advancing.

use chrono::Duration;
use regdesk_types::{FieldError, PaymentMode};
use regdesk_util::{OnlinePaymentStrategy, RegdeskConfig};
use tracing::debug;

use crate::form::FormData;
use crate::payment::PaymentStrategy;
use crate::validate::validate_step;

/// A form section shown by the wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WizardStep {
    PersonalInfo,
    EventSelection,
    Payment,
    Confirmation,
}

impl WizardStep {
    /// The default section order.
    pub const ALL: [WizardStep; 4] = [
        WizardStep::PersonalInfo,
        WizardStep::EventSelection,
        WizardStep::Payment,
        WizardStep::Confirmation,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            WizardStep::PersonalInfo => "Personal Info",
            WizardStep::EventSelection => "Events",
            WizardStep::Payment => "Payment",
            WizardStep::Confirmation => "Confirmation",
        }
    }
}

/// How the step indicator renders one index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepMarker {
    Completed,
    Active,
    Pending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WizardState {
    current_step_index: usize,
    step_count: usize,
}

impl WizardState {
    /// A wizard positioned on its first step. `step_count` is clamped to at least one.
    pub fn new(step_count: usize) -> Self {
        Self {
            current_step_index: 0,
            step_count: step_count.max(1),
        }
    }

    pub fn current_step_index(&self) -> usize {
        self.current_step_index
    }

    pub fn step_count(&self) -> usize {
        self.step_count
    }

    pub fn is_first(&self) -> bool {
        self.current_step_index == 0
    }

    pub fn is_last(&self) -> bool {
        self.current_step_index + 1 == self.step_count
    }

    /// Move forward one step when the current step validated. No-op on the last step.
    pub fn advance(self, validator_passed: bool) -> Self {
        if !validator_passed || self.is_last() {
            return self;
        }
        Self {
            current_step_index: self.current_step_index + 1,
            ..self
        }
    }

    /// Move back one step. No-op on the first step.
    pub fn retreat(self) -> Self {
        if self.is_first() {
            return self;
        }
        Self {
            current_step_index: self.current_step_index - 1,
            ..self
        }
    }

    /// Jump to the final section once a submission has completed.
    pub fn complete(self) -> Self {
        Self {
            current_step_index: self.step_count - 1,
            ..self
        }
    }

    pub fn reset(self) -> Self {
        Self::new(self.step_count)
    }

    /// Index of the only visible section.
    pub fn visible_section(&self) -> usize {
        self.current_step_index
    }

    pub fn is_section_visible(&self, index: usize) -> bool {
        index == self.current_step_index
    }

    pub fn step_markers(&self) -> Vec<StepMarker> {
        (0..self.step_count)
            .map(|index| match index.cmp(&self.current_step_index) {
                std::cmp::Ordering::Less => StepMarker::Completed,
                std::cmp::Ordering::Equal => StepMarker::Active,
                std::cmp::Ordering::Greater => StepMarker::Pending,
            })
            .collect()
    }
}

/// Validates the fields owned by one step.
pub type StepValidator = fn(WizardStep, &dyn FormData) -> Result<(), Vec<FieldError>>;

/// Parameters that distinguish one wizard deployment from another.
#[derive(Debug, Clone)]
pub struct WizardConfig {
    pub steps: Vec<WizardStep>,
    pub validator: StepValidator,
    pub online_strategy: OnlinePaymentStrategy,
    pub api_base_url: String,
    pub staleness_window: Duration,
}

impl Default for WizardConfig {
    fn default() -> Self {
        Self::from(&RegdeskConfig::default())
    }
}

impl From<&RegdeskConfig> for WizardConfig {
    fn from(config: &RegdeskConfig) -> Self {
        Self {
            steps: WizardStep::ALL.to_vec(),
            validator: validate_step,
            online_strategy: config.online_strategy,
            api_base_url: config.api_base_url.clone(),
            staleness_window: config.staleness_window(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Wizard {
    config: WizardConfig,
    state: WizardState,
}

impl Wizard {
    pub fn new(config: WizardConfig) -> Self {
        let state = WizardState::new(config.steps.len());
        Self { config, state }
    }

    pub fn config(&self) -> &WizardConfig {
        &self.config
    }

    pub fn state(&self) -> WizardState {
        self.state
    }

    pub fn current_step(&self) -> WizardStep {
        self.config
            .steps
            .get(self.state.current_step_index())
            .copied()
            .unwrap_or(WizardStep::Confirmation)
    }

    /// Validate the current step and advance when it passes.
    ///
    /// On the last step this returns `Ok` without running the validator.
    pub fn next(&mut self, form: &dyn FormData) -> Result<WizardStep, Vec<FieldError>> {
        if self.state.is_last() {
            return Ok(self.current_step());
        }
        let step = self.current_step();
        let outcome = (self.config.validator)(step, form);
        self.state = self.state.advance(outcome.is_ok());
        match outcome {
            Ok(()) => {
                debug!(from = ?step, to = ?self.current_step(), "wizard advanced");
                Ok(self.current_step())
            }
            Err(errors) => {
                debug!(step = ?step, errors = errors.len(), "wizard step rejected");
                Err(errors)
            }
        }
    }

    pub fn back(&mut self) -> WizardStep {
        self.state = self.state.retreat();
        self.current_step()
    }

    pub fn show_confirmation(&mut self) {
        self.state = self.state.complete();
    }

    pub fn reset(&mut self) {
        self.state = self.state.reset();
    }

    /// Payment strategy for a draft's payment mode under this configuration.
    pub fn strategy_for(&self, mode: PaymentMode) -> PaymentStrategy {
        PaymentStrategy::for_mode(mode, self.config.online_strategy)
    }
}
