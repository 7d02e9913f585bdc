//! Name, username and phone number rules

use once_cell::sync::Lazy;
use regex::Regex;

static NAME_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-zA-Z\s]{2,30}$").unwrap());

static USERNAME_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-zA-Z0-9_]{3,20}$").unwrap());

static PHONE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\+?[0-9\s\-()]{10,}$").unwrap());

/// 2 to 30 characters, letters and spaces only
pub fn is_valid_name(name: &str) -> bool {
    NAME_REGEX.is_match(name)
}

/// 3 to 20 characters, letters, digits and underscore only
pub fn is_valid_username(username: &str) -> bool {
    USERNAME_REGEX.is_match(username)
}

/// Optional leading `+`, then at least 10 digits, spaces, dashes or parentheses
pub fn is_valid_phone(phone: &str) -> bool {
    PHONE_REGEX.is_match(phone)
}
