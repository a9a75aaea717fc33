//! bcrypt credential hashing and the password strength rule.

use bcrypt::BcryptError;

pub use bcrypt::DEFAULT_COST;

/// Work factors bcrypt accepts.
pub const MIN_COST: u32 = 4;
pub const MAX_COST: u32 = 31;

const MIN_PASSWORD_LEN: usize = 8;

pub fn hash_password(password: &str, cost: u32) -> Result<String, BcryptError> {
    bcrypt::hash(password, cost)
}

/// Compares a plaintext password to a stored hash. A stored value that is not
/// a bcrypt hash is an error, not a mismatch.
pub fn verify_password(password: &str, stored: &str) -> Result<bool, BcryptError> {
    bcrypt::verify(password, stored)
}

/// Password rule: at least 8 characters with a lowercase letter, an uppercase
/// letter, a digit and a special character.
pub fn validate_password_strength(password: &str) -> Result<(), String> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err("password must be at least 8 characters".to_string());
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        return Err("password must contain at least one lowercase letter".to_string());
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        return Err("password must contain at least one uppercase letter".to_string());
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err("password must contain at least one digit".to_string());
    }
    if !password.chars().any(|c| !c.is_ascii_alphanumeric() && !c.is_whitespace()) {
        return Err("password must contain at least one special character".to_string());
    }
    Ok(())
}
