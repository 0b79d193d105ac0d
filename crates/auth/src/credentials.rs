//! Client-side credential shape checks (run before any network call).

use resourcehub_core::{ClientError, FieldError};

pub const MIN_PASSWORD_LEN: usize = 6;

/// `local@domain.tld` shape: no whitespace, a single `@`, and a dot inside
/// the domain with text on both sides.
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
}

pub fn is_valid_password(password: &str) -> bool {
    password.chars().count() >= MIN_PASSWORD_LEN
}

/// Check an email/password pair, reporting every rejected field at once.
pub fn validate_credentials(email: &str, password: &str) -> Result<(), ClientError> {
    let mut fields = Vec::new();

    if !is_valid_email(email) {
        fields.push(FieldError::new("email", "Please enter a valid email address"));
    }
    if !is_valid_password(password) {
        fields.push(FieldError::new(
            "password",
            format!("Password must be at least {MIN_PASSWORD_LEN} characters"),
        ));
    }

    if fields.is_empty() {
        Ok(())
    } else {
        Err(ClientError::validation(fields))
    }
}
