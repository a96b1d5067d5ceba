//! Typed access to the wizard's form fields.
//!
//! Validation and submission read fields through [`FormData`] only, so the
//! rendering layer can keep whatever widget state it likes as long as it can
//! answer these getters. [`FormState`] is the in-memory implementation used
//! by the TUI, the CLI draft loader, and tests.

use indexmap::IndexSet;
use regdesk_types::{FieldError, FormField, MAX_SELECTED_EVENTS, PaymentMode, RegistrationDraft};

use crate::validate::validate_step;
use crate::wizard::WizardStep;

pub trait FormData {
    fn name(&self) -> &str;
    fn email(&self) -> &str;
    fn phone(&self) -> &str;
    fn whatsapp(&self) -> &str;
    fn college(&self) -> &str;
    fn year(&self) -> &str;
    fn department(&self) -> &str;
    fn selected_events(&self) -> &IndexSet<String>;
    fn payment_mode(&self) -> Option<PaymentMode>;
    fn project_link(&self) -> Option<&str>;
}

/// Result of toggling an event checkbox.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventToggle {
    Selected,
    Deselected,
    /// The selection would exceed the limit; the checkbox stays unchecked.
    RejectedLimit,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormState {
    name: String,
    email: String,
    phone: String,
    whatsapp: String,
    college: String,
    year: String,
    department: String,
    events: IndexSet<String>,
    payment_mode: Option<PaymentMode>,
    project_link: String,
}

impl FormState {
    /// Prefill the form from a stored draft, e.g. a recovered payment attempt.
    pub fn from_draft(draft: &RegistrationDraft) -> Self {
        Self {
            name: draft.name.clone(),
            email: draft.email.clone(),
            phone: draft.phone.clone(),
            whatsapp: draft.whatsapp.clone(),
            college: draft.college.clone(),
            year: draft.year.clone(),
            department: draft.department.clone(),
            events: draft.events.clone(),
            payment_mode: Some(draft.payment_mode),
            project_link: draft.project_link.clone().unwrap_or_default(),
        }
    }

    /// Set a text field. `Events` and `PaymentMode` are ignored; use their dedicated setters.
    pub fn set_field(&mut self, field: FormField, value: impl Into<String>) {
        let value = value.into();
        match field {
            FormField::Name => self.name = value,
            FormField::Email => self.email = value,
            FormField::Phone => self.phone = value,
            FormField::Whatsapp => self.whatsapp = value,
            FormField::College => self.college = value,
            FormField::Year => self.year = value,
            FormField::Department => self.department = value,
            FormField::ProjectLink => self.project_link = value,
            FormField::Events | FormField::PaymentMode => {}
        }
    }

    /// Current text of a field; empty for non-text fields.
    pub fn field(&self, field: FormField) -> &str {
        match field {
            FormField::Name => &self.name,
            FormField::Email => &self.email,
            FormField::Phone => &self.phone,
            FormField::Whatsapp => &self.whatsapp,
            FormField::College => &self.college,
            FormField::Year => &self.year,
            FormField::Department => &self.department,
            FormField::ProjectLink => &self.project_link,
            FormField::Events | FormField::PaymentMode => "",
        }
    }

    pub fn toggle_event(&mut self, event_id: &str) -> EventToggle {
        if self.events.shift_remove(event_id) {
            return EventToggle::Deselected;
        }
        if self.events.len() >= MAX_SELECTED_EVENTS {
            return EventToggle::RejectedLimit;
        }
        self.events.insert(event_id.to_string());
        EventToggle::Selected
    }

    pub fn is_event_selected(&self, event_id: &str) -> bool {
        self.events.contains(event_id)
    }

    pub fn select_payment_mode(&mut self, mode: PaymentMode) {
        self.payment_mode = Some(mode);
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

impl FormData for FormState {
    fn name(&self) -> &str {
        &self.name
    }

    fn email(&self) -> &str {
        &self.email
    }

    fn phone(&self) -> &str {
        &self.phone
    }

    fn whatsapp(&self) -> &str {
        &self.whatsapp
    }

    fn college(&self) -> &str {
        &self.college
    }

    fn year(&self) -> &str {
        &self.year
    }

    fn department(&self) -> &str {
        &self.department
    }

    fn selected_events(&self) -> &IndexSet<String> {
        &self.events
    }

    fn payment_mode(&self) -> Option<PaymentMode> {
        self.payment_mode
    }

    fn project_link(&self) -> Option<&str> {
        let link = self.project_link.trim();
        (!link.is_empty()).then_some(link)
    }
}

/// Build a draft from the form, or report every field that blocks submission.
pub fn assemble_draft(form: &dyn FormData) -> Result<RegistrationDraft, Vec<FieldError>> {
    let errors: Vec<FieldError> = [WizardStep::PersonalInfo, WizardStep::EventSelection, WizardStep::Payment]
        .into_iter()
        .filter_map(|step| validate_step(step, form).err())
        .flatten()
        .collect();
    if !errors.is_empty() {
        return Err(errors);
    }
    let Some(payment_mode) = form.payment_mode() else {
        return Err(vec![FieldError::required(FormField::PaymentMode)]);
    };

    Ok(RegistrationDraft {
        name: form.name().trim().to_string(),
        email: form.email().trim().to_string(),
        phone: form.phone().trim().to_string(),
        whatsapp: form.whatsapp().trim().to_string(),
        college: form.college().trim().to_string(),
        year: form.year().trim().to_string(),
        department: form.department().trim().to_string(),
        events: form.selected_events().clone(),
        payment_mode,
        project_link: form.project_link().map(str::to_string),
        payment_status: None,
        payment_id: None,
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn filled_form(mode: PaymentMode) -> FormState {
        let mut form = FormState::default();
        form.set_field(FormField::Name, "Asha Rao");
        form.set_field(FormField::Email, "asha@example.com");
        form.set_field(FormField::Phone, "9876543210");
        form.set_field(FormField::Whatsapp, "9123456780");
        form.set_field(FormField::College, "City College");
        form.set_field(FormField::Year, "3");
        form.set_field(FormField::Department, "CSE");
        form.toggle_event("technical-quiz");
        form.select_payment_mode(mode);
        form
    }

    #[test]
    fn fourth_event_is_rejected_and_stays_unchecked() {
        let mut form = FormState::default();
        for id in ["a", "b", "c"] {
            assert_eq!(form.toggle_event(id), EventToggle::Selected);
        }
        assert_eq!(form.toggle_event("d"), EventToggle::RejectedLimit);
        assert!(!form.is_event_selected("d"));
        assert_eq!(form.selected_events().len(), 3);

        assert_eq!(form.toggle_event("b"), EventToggle::Deselected);
        assert_eq!(form.toggle_event("d"), EventToggle::Selected);
        assert_eq!(form.selected_events().iter().collect::<Vec<_>>(), vec!["a", "c", "d"]);
    }

    #[test]
    fn assemble_rejects_missing_fields_without_building_a_draft() {
        let mut form = filled_form(PaymentMode::Offline);
        form.set_field(FormField::College, "   ");
        let errors = assemble_draft(&form).unwrap_err();
        assert_eq!(errors, vec![FieldError::required(FormField::College)]);
    }

    #[test]
    fn assemble_trims_and_keeps_event_order() {
        let mut form = filled_form(PaymentMode::Online);
        form.set_field(FormField::Name, "  Asha Rao ");
        form.toggle_event("gaming");
        form.set_field(FormField::ProjectLink, "https://git.example.com/asha/robot");

        let draft = assemble_draft(&form).unwrap();
        assert_eq!(draft.name, "Asha Rao");
        assert_eq!(draft.events_joined(), "technical-quiz, gaming");
        assert_eq!(draft.payment_mode, PaymentMode::Online);
        assert_eq!(draft.project_link.as_deref(), Some("https://git.example.com/asha/robot"));
        assert!(draft.payment_status.is_none());
    }

    #[test]
    fn from_draft_round_trips_through_assemble() {
        let draft = assemble_draft(&filled_form(PaymentMode::Offline)).unwrap();
        assert_eq!(assemble_draft(&FormState::from_draft(&draft)).unwrap(), draft);
    }
}
