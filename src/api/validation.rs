use regex::Regex;
use std::sync::LazyLock;

use super::ApiError;
use crate::constants::limits::{MAX_DESCRIPTION_LEN, MAX_FIELD_LEN};
use crate::models::complaint::NewComplaint;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid")
});

/// Trims a required single-line field and checks its length.
pub fn validate_required<'a>(label: &str, value: &'a str) -> Result<&'a str, ApiError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ApiError::validation(format!("{label} is required")));
    }

    if trimmed.chars().count() > MAX_FIELD_LEN {
        return Err(ApiError::validation(format!(
            "{label} must be {MAX_FIELD_LEN} characters or less"
        )));
    }

    Ok(trimmed)
}

pub fn validate_email(email: &str) -> Result<&str, ApiError> {
    let trimmed = validate_required("Email", email)?;
    if !EMAIL_RE.is_match(trimmed) {
        return Err(ApiError::validation(format!(
            "Invalid email address: {trimmed}"
        )));
    }
    Ok(trimmed)
}

pub fn validate_password(password: &str) -> Result<&str, ApiError> {
    if password.is_empty() {
        return Err(ApiError::validation("Password is required"));
    }
    Ok(password)
}

/// Both fields are stored exactly as submitted once they pass the checks.
pub fn validate_complaint(complaint_type: &str, description: &str) -> Result<NewComplaint, ApiError> {
    if complaint_type.trim().is_empty() {
        return Err(ApiError::validation("Complaint type is required"));
    }

    if complaint_type.chars().count() > MAX_FIELD_LEN {
        return Err(ApiError::validation(format!(
            "Complaint type must be {MAX_FIELD_LEN} characters or less"
        )));
    }

    if description.trim().is_empty() {
        return Err(ApiError::validation("Description is required"));
    }

    if description.chars().count() > MAX_DESCRIPTION_LEN {
        return Err(ApiError::validation(format!(
            "Description must be {MAX_DESCRIPTION_LEN} characters or less"
        )));
    }

    Ok(NewComplaint {
        complaint_type: complaint_type.to_string(),
        description: description.to_string(),
    })
}
