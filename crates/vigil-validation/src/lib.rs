//! vigil validation
//!
//! Pure field validators for the login and registration forms. Every
//! function here is deterministic and side-effect free; form state and
//! submission live in the `vigil` crate.

pub mod email;
pub mod error;
pub mod field;
pub mod password;
pub mod string;
pub mod validator;

pub use email::is_valid_email;
pub use error::{FieldError, FieldErrorKind, ValidationErrors};
pub use field::{Field, FieldValues, FormMode, UnknownField};
pub use password::is_strong_password;
pub use string::{is_valid_name, is_valid_phone, is_valid_username};
pub use validator::{validate_field, validate_form};
