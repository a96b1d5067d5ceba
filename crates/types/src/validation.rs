//! Field validation rules shared by the wizard, the CLI, and the TUI.
//!
//! Validation never touches the network: a draft that fails here is rejected
//! before any request is built.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::fmt;

static EMAIL_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex should compile"));
static PHONE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]{10}$").expect("phone regex should compile"));

/// Identifies a form field in validation reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FormField {
    Name,
    Email,
    Phone,
    Whatsapp,
    College,
    Year,
    Department,
    Events,
    PaymentMode,
    ProjectLink,
}

impl FormField {
    pub fn label(&self) -> &'static str {
        match self {
            FormField::Name => "Name",
            FormField::Email => "Email",
            FormField::Phone => "Phone",
            FormField::Whatsapp => "WhatsApp",
            FormField::College => "College",
            FormField::Year => "Year",
            FormField::Department => "Department",
            FormField::Events => "Events",
            FormField::PaymentMode => "Payment mode",
            FormField::ProjectLink => "Project link",
        }
    }
}

/// A single local validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: FormField,
    pub message: String,
}

impl FieldError {
    pub fn new(field: FormField, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }

    pub fn required(field: FormField) -> Self {
        Self::new(field, format!("{} is required", field.label()))
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Returns `true` for `local@domain.tld` shaped addresses.
pub fn is_valid_email(candidate: &str) -> bool {
    EMAIL_REGEX.is_match(candidate.trim())
}

/// Returns `true` for exactly ten ASCII digits.
pub fn is_valid_phone(candidate: &str) -> bool {
    PHONE_REGEX.is_match(candidate.trim())
}

/// Returns `true` when the value carries non-whitespace content.
pub fn is_present(candidate: &str) -> bool {
    !candidate.trim().is_empty()
}

/// Render a list of field errors as one prompt-style message.
pub fn summarize_errors(errors: &[FieldError]) -> String {
    errors.iter().map(|error| error.message.as_str()).collect::<Vec<_>>().join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_pattern() {
        assert!(is_valid_email("asha@example.com"));
        assert!(is_valid_email(" asha.rao@mail.college.edu "));
        assert!(!is_valid_email("asha.example.com"));
        assert!(!is_valid_email("asha@example"));
        assert!(!is_valid_email("asha@"));
        assert!(!is_valid_email("as ha@example.com"));
    }

    #[test]
    fn phone_pattern_requires_exactly_ten_digits() {
        assert!(is_valid_phone("9876543210"));
        assert!(!is_valid_phone("987654321"));
        assert!(!is_valid_phone("98765432101"));
        assert!(!is_valid_phone("98765-43210"));
        assert!(!is_valid_phone("+919876543210"));
    }

    #[test]
    fn summary_joins_messages() {
        let errors = vec![FieldError::required(FormField::Name), FieldError::new(FormField::Email, "Email is invalid")];
        assert_eq!(summarize_errors(&errors), "Name is required; Email is invalid");
    }
}
