use crate::error::FieldError;
use crate::models::{ContactSubmission, LeadSubmission};
use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap_or_else(|e| panic!("invalid email pattern: {e}"))
});

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email.trim())
}

fn check_email(email: &str, errors: &mut Vec<FieldError>) {
    if email.trim().is_empty() {
        errors.push(FieldError::new("email", "Email is required"));
    } else if !is_valid_email(email) {
        errors.push(FieldError::new("email", "Enter a valid email address"));
    }
}

fn require(field: &'static str, value: &str, message: &str, errors: &mut Vec<FieldError>) {
    if value.trim().is_empty() {
        errors.push(FieldError::new(field, message));
    }
}

/// Field-by-field check of a report request
pub fn validate_lead(form: &LeadSubmission) -> Result<(), Vec<FieldError>> {
    let mut errors = Vec::new();
    require("name", &form.full_name(), "Name is required", &mut errors);
    check_email(&form.email, &mut errors);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

pub fn validate_contact(form: &ContactSubmission) -> Result<(), Vec<FieldError>> {
    let mut errors = Vec::new();
    require("firstName", &form.first_name, "First name is required", &mut errors);
    require("lastName", &form.last_name, "Last name is required", &mut errors);
    check_email(&form.email, &mut errors);
    require("message", &form.message, "Message is required", &mut errors);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
