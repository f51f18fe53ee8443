//! Input validation utilities
//!
//! Lengths are counted in characters, not bytes.

use regex::Regex;
use std::sync::OnceLock;

/// Validate email
pub fn validate_email(email: &str) -> Result<(), String> {
    if email.is_empty() {
        return Err("Email is required".to_string());
    }

    if email.len() > 254 {
        return Err("Email must be at most 254 characters long".to_string());
    }

    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
            .expect("Failed to compile email regex")
    });

    if !regex.is_match(email) {
        return Err("Invalid email format".to_string());
    }

    Ok(())
}

/// Validate password
pub fn validate_password(password: &str) -> Result<(), String> {
    let length = password.chars().count();

    if length < 8 {
        return Err("Password must be at least 8 characters long".to_string());
    }

    if length > 128 {
        return Err("Password must be at most 128 characters long".to_string());
    }

    Ok(())
}

/// Validate a display name such as a user, category or asset name
pub fn validate_name(field: &str, name: &str) -> Result<(), String> {
    let length = name.trim().chars().count();

    if length < 2 {
        return Err(format!("{field} must be at least 2 characters long"));
    }

    if name.chars().count() > 100 {
        return Err(format!("{field} must be at most 100 characters long"));
    }

    Ok(())
}

/// Validate an optional free-text field against a maximum length
pub fn validate_max_len(field: &str, value: Option<&str>, max: usize) -> Result<(), String> {
    match value {
        Some(value) if value.chars().count() > max => {
            Err(format!("{field} must be at most {max} characters long"))
        }
        _ => Ok(()),
    }
}

/// Validate a maintenance record description
pub fn validate_description(description: &str) -> Result<(), String> {
    let length = description.trim().chars().count();

    if length < 5 {
        return Err("Description must be at least 5 characters long".to_string());
    }

    if description.chars().count() > 500 {
        return Err("Description must be at most 500 characters long".to_string());
    }

    Ok(())
}

/// Validate a schedule interval
pub fn validate_interval_days(interval_days: Option<i32>) -> Result<(), String> {
    match interval_days {
        Some(days) if days < 1 => Err("Interval days must be at least 1".to_string()),
        _ => Ok(()),
    }
}
