//! Field rules shared by the resource services.

use crate::services::error::{ServiceError, ServiceResult};

pub const MAX_TITLE_LEN: usize = 255;
pub const MAX_USERNAME_LEN: usize = 50;

/// Trims a title or name and checks it is non-empty and at most 255 characters.
pub fn title(field: &str, value: &str) -> ServiceResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ServiceError::invalid_input(format!("{} must not be empty", field)));
    }
    if trimmed.chars().count() > MAX_TITLE_LEN {
        return Err(ServiceError::invalid_input(format!(
            "{} must be at most {} characters",
            field, MAX_TITLE_LEN
        )));
    }
    Ok(trimmed.to_string())
}

/// Label colors are free-form but bounded like titles. Empty is allowed.
pub fn color(value: &str) -> ServiceResult<String> {
    let trimmed = value.trim();
    if trimmed.chars().count() > MAX_TITLE_LEN {
        return Err(ServiceError::invalid_input(format!(
            "color must be at most {} characters",
            MAX_TITLE_LEN
        )));
    }
    Ok(trimmed.to_string())
}

pub fn username(value: &str) -> ServiceResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed.chars().count() > MAX_USERNAME_LEN {
        return Err(ServiceError::invalid_input(format!(
            "username must be 1 to {} characters",
            MAX_USERNAME_LEN
        )));
    }
    if !trimmed.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-')) {
        return Err(ServiceError::invalid_input(
            "username may only contain letters, digits, '_', '.' and '-'",
        ));
    }
    Ok(trimmed.to_string())
}

/// Normalizes an email address to trimmed lowercase and checks its shape:
/// one `@`, a non-empty local part, and a dotted domain whose last label is
/// at least two letters.
pub fn email(value: &str) -> ServiceResult<String> {
    let normalized = value.trim().to_lowercase();
    let invalid = || ServiceError::invalid_input(format!("'{}' is not a valid email address", value.trim()));

    if normalized.chars().count() > MAX_TITLE_LEN {
        return Err(invalid());
    }

    let (local, domain) = normalized.split_once('@').ok_or_else(invalid)?;
    if local.is_empty() || domain.contains('@') || local.chars().any(char::is_whitespace) {
        return Err(invalid());
    }

    let labels: Vec<&str> = domain.split('.').collect();
    let well_formed = labels.len() >= 2
        && labels
            .iter()
            .all(|l| !l.is_empty() && l.chars().all(|c| c.is_ascii_alphanumeric() || c == '-'))
        && labels
            .last()
            .is_some_and(|tld| tld.len() >= 2 && tld.chars().all(|c| c.is_ascii_alphabetic()));
    if !well_formed {
        return Err(invalid());
    }

    Ok(normalized)
}

pub fn password(value: &str) -> ServiceResult<()> {
    crate::auth::password::validate_password_strength(value).map_err(ServiceError::InvalidInput)
}
