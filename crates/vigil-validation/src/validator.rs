// File: src/validator.rs
// Purpose: Per-field rules and whole-form validation

use crate::email::is_valid_email;
use crate::error::{FieldError, ValidationErrors};
use crate::field::{Field, FieldValues, FormMode};
use crate::password::is_strong_password;
use crate::string::{is_valid_name, is_valid_phone, is_valid_username};

pub const EMAIL_REQUIRED: &str = "Email is required";
pub const EMAIL_INVALID: &str = "Please enter a valid email address";
pub const PASSWORD_REQUIRED: &str = "Password is required";
pub const PASSWORD_WEAK: &str =
    "Password must be at least 8 characters with uppercase, lowercase, number, and special character";
pub const CONFIRM_REQUIRED: &str = "Please confirm your password";
pub const CONFIRM_MISMATCH: &str = "Passwords do not match";
pub const FIRST_NAME_REQUIRED: &str = "First name is required";
pub const LAST_NAME_REQUIRED: &str = "Last name is required";
pub const NAME_INVALID: &str = "Name must contain only letters and spaces (2-30 characters)";
pub const USERNAME_REQUIRED: &str = "Username is required";
pub const USERNAME_INVALID: &str =
    "Username must be 3-20 characters (letters, numbers, underscore only)";
pub const PHONE_INVALID: &str = "Please enter a valid phone number";

/// Check a single field
///
/// `live_password` is the password field's value at the time of the call;
/// `confirmPassword` is compared against it, never against an earlier copy.
/// Register-only fields always pass in login mode.
pub fn validate_field(
    field: Field,
    value: &str,
    mode: FormMode,
    live_password: &str,
) -> Option<FieldError> {
    let register = mode == FormMode::Register;

    match field {
        Field::Email => {
            if value.is_empty() {
                return Some(FieldError::required(EMAIL_REQUIRED));
            }
            if !is_valid_email(value) {
                return Some(FieldError::format_invalid(EMAIL_INVALID));
            }
        }
        Field::Password => {
            if value.is_empty() {
                return Some(FieldError::required(PASSWORD_REQUIRED));
            }
            // Login accepts whatever password was chosen before
            if register && !is_strong_password(value) {
                return Some(FieldError::format_invalid(PASSWORD_WEAK));
            }
        }
        Field::ConfirmPassword if register => {
            if value.is_empty() {
                return Some(FieldError::required(CONFIRM_REQUIRED));
            }
            if value != live_password {
                return Some(FieldError::mismatch(CONFIRM_MISMATCH));
            }
        }
        Field::FirstName | Field::LastName if register => {
            if value.is_empty() {
                let message = if field == Field::FirstName {
                    FIRST_NAME_REQUIRED
                } else {
                    LAST_NAME_REQUIRED
                };
                return Some(FieldError::required(message));
            }
            if !is_valid_name(value) {
                return Some(FieldError::format_invalid(NAME_INVALID));
            }
        }
        Field::Username if register => {
            if value.is_empty() {
                return Some(FieldError::required(USERNAME_REQUIRED));
            }
            if !is_valid_username(value) {
                return Some(FieldError::format_invalid(USERNAME_INVALID));
            }
        }
        Field::Phone if register && !value.is_empty() => {
            if !is_valid_phone(value) {
                return Some(FieldError::format_invalid(PHONE_INVALID));
            }
        }
        _ => {}
    }

    None
}

/// Validate every field belonging to `mode`
///
/// Returns the complete error set; an empty result means the form may be
/// submitted.
pub fn validate_form(values: &FieldValues, mode: FormMode) -> ValidationErrors {
    let live_password = values.get(Field::Password);

    mode.fields()
        .iter()
        .filter_map(|&field| {
            validate_field(field, values.get(field), mode, live_password).map(|error| (field, error))
        })
        .collect()
}
