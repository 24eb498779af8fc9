//! Input validation utilities

use chrono::{DateTime, NaiveDate};
use regex::Regex;
use std::sync::OnceLock;

pub const MIN_PASSWORD_LENGTH: usize = 10;
pub const MAX_NAME_LENGTH: usize = 50;
pub const MAX_SKILL_NAME_LENGTH: usize = 100;
pub const MAX_INVENTORY_NAME_LENGTH: usize = 100;

/// Validate an account username, which must be an e-mail address
pub fn validate_username(username: &str) -> Result<(), String> {
    if username.is_empty() {
        return Err("User name can not be empty".to_string());
    }

    if username.len() > 254 {
        return Err("User name must be at most 254 characters long".to_string());
    }

    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
            .expect("Failed to compile email regex")
    });

    if !regex.is_match(username) {
        return Err("User name must be a valid email address".to_string());
    }

    Ok(())
}

/// Validate password strength
///
/// At least ten characters with a lowercase letter, an uppercase letter, a
/// digit and a symbol, and no character repeated three times in a row.
pub fn validate_password(password: &str) -> Result<(), String> {
    if password.is_empty() {
        return Err("Password can not be empty".to_string());
    }

    let chars: Vec<char> = password.chars().collect();

    let strong = chars.len() >= MIN_PASSWORD_LENGTH
        && chars.iter().any(|c| c.is_ascii_lowercase())
        && chars.iter().any(|c| c.is_ascii_uppercase())
        && chars.iter().any(|c| c.is_ascii_digit())
        && chars.iter().any(|c| !c.is_ascii_alphanumeric())
        && !chars.windows(3).any(|w| w[0] == w[1] && w[1] == w[2]);

    if !strong {
        return Err("password too weak".to_string());
    }

    Ok(())
}

/// Validate a required free-text field with a maximum length
pub fn validate_required(field: &str, value: &str, max_len: usize) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err(format!("{} can not be empty", field));
    }

    if value.chars().count() > max_len {
        return Err(format!("{} too long", field));
    }

    Ok(())
}

/// Parse a birth date given either as `YYYY-MM-DD` or as an RFC 3339 timestamp
pub fn parse_birth_date(value: &str) -> Result<NaiveDate, String> {
    let value = value.trim();
    if value.is_empty() {
        return Err("Birth date can not be empty".to_string());
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .or_else(|_| DateTime::parse_from_rfc3339(value).map(|dt| dt.date_naive()))
        .map_err(|_| "Birth date must be a valid ISO 8601 date".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_username_must_be_email() {
        assert!(validate_username("a@b.com").is_ok());
        assert!(validate_username("").is_err());
        assert!(validate_username("not-an-email").is_err());
    }

    #[test]
    fn test_password_rules() {
        assert!(validate_password("Str0ng!Pass").is_ok());
        assert_eq!(validate_password("").unwrap_err(), "Password can not be empty");
        // too short
        assert!(validate_password("Sh0rt!").is_err());
        // missing symbol
        assert!(validate_password("Str0ngPassword").is_err());
        // missing uppercase
        assert!(validate_password("str0ng!pass").is_err());
        // three identical characters in a row
        assert!(validate_password("Str0ng!Paaass").is_err());
        // two in a row is fine
        assert!(validate_password("Str0ng!Paass").is_ok());
    }

    #[test]
    fn test_required_field_limits() {
        assert!(validate_required("First name", "Ada", MAX_NAME_LENGTH).is_ok());
        assert_eq!(
            validate_required("First name", "   ", MAX_NAME_LENGTH).unwrap_err(),
            "First name can not be empty"
        );
        assert_eq!(
            validate_required("First name", &"x".repeat(51), MAX_NAME_LENGTH).unwrap_err(),
            "First name too long"
        );
    }

    #[test]
    fn test_birth_date_formats() {
        let expected = NaiveDate::from_ymd_opt(1990, 5, 17).unwrap();
        assert_eq!(parse_birth_date("1990-05-17").unwrap(), expected);
        assert_eq!(parse_birth_date("1990-05-17T00:00:00Z").unwrap(), expected);
        assert!(parse_birth_date("17/05/1990").is_err());
        assert!(parse_birth_date("").is_err());
    }
}
