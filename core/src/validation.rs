//! Client-side checks run before a create or edit is submitted.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::ValidationError;
use crate::types::EmployeeForm;

/// `None` only if the pattern fails to compile, in which case nothing passes.
static EMAIL: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").ok());

/// Presence first, then shape.
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    if email.is_empty() {
        return Err(ValidationError::EmailRequired);
    }
    if !EMAIL.as_ref().is_some_and(|re| re.is_match(email)) {
        return Err(ValidationError::InvalidEmail);
    }
    Ok(())
}

/// Only the email is checked; names and department may be empty.
pub fn validate_form(form: &EmployeeForm) -> Result<(), ValidationError> {
    validate_email(&form.email)
}
