//! Field validation rules shared by the entities.
//!
//! Every rule trims its input first, so a whitespace-only value fails the
//! same way an empty one does.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{AgendaError, AgendaResult};

static NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\p{L}\p{M}\s]+$").expect("valid name regex"));

// Day 00-31 and month 00-12 regardless of the month's real length.
static DATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-2][0-9]|3[0-1])/(0[0-9]|1[0-2])/[0-9]{4}$").expect("valid date regex")
});

static TIME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([01][0-9]|2[0-3]):([0-5][0-9])$").expect("valid time regex"));

/// Return the trimmed value, or fail if nothing is left after trimming.
pub fn require_non_empty(value: &str, field: &str) -> AgendaResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AgendaError::Validation(format!("{field} is required")));
    }
    Ok(trimmed.to_string())
}

/// Names may only contain letters (any script, combining marks included) and spaces.
pub fn validate_name(name: &str) -> AgendaResult<()> {
    if !NAME_RE.is_match(name.trim()) {
        return Err(AgendaError::Validation(
            "name must contain only letters and spaces".into(),
        ));
    }
    Ok(())
}

/// Only checks for an `@`; no RFC 5322 parsing.
pub fn validate_email(email: &str) -> AgendaResult<()> {
    let email = email.trim();
    if email.is_empty() || !email.contains('@') {
        return Err(AgendaError::Validation(format!("invalid email '{email}'")));
    }
    Ok(())
}

/// `DD/MM/YYYY`, zero-padded.
pub fn validate_date(date: &str) -> AgendaResult<()> {
    if !DATE_RE.is_match(date.trim()) {
        return Err(AgendaError::Validation(format!(
            "invalid date '{}', use DD/MM/YYYY",
            date.trim()
        )));
    }
    Ok(())
}

/// `HH:MM`, 24-hour, zero-padded.
pub fn validate_time(time: &str) -> AgendaResult<()> {
    if !TIME_RE.is_match(time.trim()) {
        return Err(AgendaError::Validation(format!(
            "invalid time '{}', use HH:MM",
            time.trim()
        )));
    }
    Ok(())
}
