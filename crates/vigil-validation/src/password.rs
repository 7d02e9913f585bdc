//! Password strength rules
//!
//! The `regex` crate has no look-ahead support, so the strength rule is
//! checked by scanning characters instead of with a single pattern.

/// Symbols accepted (and one of which is required) in a registration password
pub const PASSWORD_SYMBOLS: &str = "@$!%*?&";

/// Minimum length of a registration password
pub const PASSWORD_MIN_LENGTH: usize = 8;

/// Characters a registration password may be built from
fn is_allowed(c: char) -> bool {
    c.is_ascii_alphanumeric() || PASSWORD_SYMBOLS.contains(c)
}

/// Registration strength rule
///
/// At least 8 characters drawn only from ASCII letters, digits and
/// `@$!%*?&`, with at least one lowercase letter, one uppercase letter,
/// one digit and one symbol.
pub fn is_strong_password(password: &str) -> bool {
    if password.chars().count() < PASSWORD_MIN_LENGTH {
        return false;
    }
    if !password.chars().all(is_allowed) {
        return false;
    }

    let has_lowercase = password.chars().any(|c| c.is_ascii_lowercase());
    let has_uppercase = password.chars().any(|c| c.is_ascii_uppercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    let has_symbol = password.chars().any(|c| PASSWORD_SYMBOLS.contains(c));

    has_lowercase && has_uppercase && has_digit && has_symbol
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Abcdef1!")]
    #[case("Password123!")]
    #[case("Secure@Pass1")]
    #[case("zZ9&zZ9&")]
    fn test_strong_passwords(#[case] password: &str) {
        assert!(is_strong_password(password));
    }

    #[rstest]
    #[case::no_upper_digit_or_symbol("abcdefgh")]
    #[case::too_short("Abcde1!")]
    #[case::no_symbol("NoSpecial123")]
    #[case::no_uppercase("nouppercas!1")]
    #[case::no_lowercase("NOLOWERCASE!1")]
    #[case::no_digit("NoDigits!Aa")]
    #[case::symbol_outside_set("Abcdef1#")]
    #[case::contains_space("Abc def1!")]
    #[case::non_ascii_letter("Ábcdef1!")]
    fn test_weak_passwords(#[case] password: &str) {
        assert!(!is_strong_password(password));
    }
}
