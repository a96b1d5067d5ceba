//! Per-step validators.

use regdesk_types::{FieldError, FormField, MAX_SELECTED_EVENTS, is_present, is_valid_email, is_valid_phone};

use crate::form::FormData;
use crate::wizard::WizardStep;

/// Validate the fields owned by `step`. Confirmation always passes.
pub fn validate_step(step: WizardStep, form: &dyn FormData) -> Result<(), Vec<FieldError>> {
    let errors = match step {
        WizardStep::PersonalInfo => personal_info_errors(form),
        WizardStep::EventSelection => event_selection_errors(form),
        WizardStep::Payment => payment_errors(form),
        WizardStep::Confirmation => Vec::new(),
    };
    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

fn personal_info_errors(form: &dyn FormData) -> Vec<FieldError> {
    let mut errors = Vec::new();

    if !is_present(form.name()) {
        errors.push(FieldError::required(FormField::Name));
    }

    if !is_present(form.email()) {
        errors.push(FieldError::required(FormField::Email));
    } else if !is_valid_email(form.email()) {
        errors.push(FieldError::new(FormField::Email, "Please enter a valid email address"));
    }

    for (field, value) in [(FormField::Phone, form.phone()), (FormField::Whatsapp, form.whatsapp())] {
        if !is_present(value) {
            errors.push(FieldError::required(field));
        } else if !is_valid_phone(value) {
            errors.push(FieldError::new(
                field,
                format!("{} number must be exactly 10 digits", field.label()),
            ));
        }
    }

    if !is_present(form.college()) {
        errors.push(FieldError::required(FormField::College));
    }
    if !is_present(form.year()) {
        errors.push(FieldError::new(FormField::Year, "Please select your year"));
    }
    if !is_present(form.department()) {
        errors.push(FieldError::new(FormField::Department, "Please select your department"));
    }
    errors
}

fn event_selection_errors(form: &dyn FormData) -> Vec<FieldError> {
    let selected = form.selected_events().len();
    if selected == 0 {
        vec![FieldError::new(FormField::Events, "Please select at least one event")]
    } else if selected > MAX_SELECTED_EVENTS {
        vec![FieldError::new(
            FormField::Events,
            format!("You can select up to {MAX_SELECTED_EVENTS} events"),
        )]
    } else {
        Vec::new()
    }
}

fn payment_errors(form: &dyn FormData) -> Vec<FieldError> {
    match form.payment_mode() {
        Some(_) => Vec::new(),
        None => vec![FieldError::new(FormField::PaymentMode, "Please select a payment mode")],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::FormState;
    use crate::form::tests::filled_form;
    use regdesk_types::PaymentMode;

    fn fields(errors: Vec<FieldError>) -> Vec<FormField> {
        errors.into_iter().map(|error| error.field).collect()
    }

    #[test]
    fn valid_personal_info_passes() {
        assert!(validate_step(WizardStep::PersonalInfo, &filled_form(PaymentMode::Offline)).is_ok());
    }

    #[test]
    fn malformed_email_and_phone_are_rejected() {
        let mut form = filled_form(PaymentMode::Offline);
        form.set_field(FormField::Email, "asha.example.com");
        form.set_field(FormField::Whatsapp, "98765-43210");
        let errors = validate_step(WizardStep::PersonalInfo, &form).unwrap_err();
        assert_eq!(fields(errors), vec![FormField::Email, FormField::Whatsapp]);

        form.set_field(FormField::Email, "asha@localhost");
        form.set_field(FormField::Whatsapp, "987654321");
        let errors = validate_step(WizardStep::PersonalInfo, &form).unwrap_err();
        assert_eq!(errors[1].message, "WhatsApp number must be exactly 10 digits");
    }

    #[test]
    fn event_step_requires_one_to_three() {
        let mut form = FormState::default();
        assert!(validate_step(WizardStep::EventSelection, &form).is_err());
        form.toggle_event("quiz");
        assert!(validate_step(WizardStep::EventSelection, &form).is_ok());
    }

    #[test]
    fn payment_step_requires_mode() {
        let mut form = FormState::default();
        assert_eq!(
            fields(validate_step(WizardStep::Payment, &form).unwrap_err()),
            vec![FormField::PaymentMode]
        );
        form.select_payment_mode(PaymentMode::Online);
        assert!(validate_step(WizardStep::Payment, &form).is_ok());
        assert!(validate_step(WizardStep::Confirmation, &FormState::default()).is_ok());
    }
}
