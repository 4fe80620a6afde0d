//! Registration input checks.

use thiserror::Error;

/// Maximum username length.
pub const MAX_USERNAME_LENGTH: usize = 32;

/// Maximum email length.
pub const MAX_EMAIL_LENGTH: usize = 254;

/// Validation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Username is empty.
    #[error("username is empty")]
    UsernameEmpty,

    /// Username exceeds the length limit.
    #[error("username is longer than {MAX_USERNAME_LENGTH} characters")]
    UsernameTooLong,

    /// Username contains characters outside the allowed set.
    #[error("username may only use ASCII letters, digits and underscores")]
    UsernameInvalidChars,

    /// Email exceeds the length limit.
    #[error("email is longer than {MAX_EMAIL_LENGTH} characters")]
    EmailTooLong,

    /// Email does not look like an address.
    #[error("email address is malformed")]
    EmailInvalidFormat,
}

/// Validate a username: non-empty, at most 32 characters, ASCII
/// alphanumerics and underscores only.
pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    if username.is_empty() {
        return Err(ValidationError::UsernameEmpty);
    }
    if username.len() > MAX_USERNAME_LENGTH {
        return Err(ValidationError::UsernameTooLong);
    }
    if !username.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(ValidationError::UsernameInvalidChars);
    }
    Ok(())
}

/// Validate an email address.
///
/// A light structural check only: one `@` with characters on both sides
/// and a dot in the domain part.
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    if email.len() > MAX_EMAIL_LENGTH {
        return Err(ValidationError::EmailTooLong);
    }
    let Some((local, domain)) = email.split_once('@') else {
        return Err(ValidationError::EmailInvalidFormat);
    };
    if local.is_empty() || domain.is_empty() || !domain.contains('.') {
        return Err(ValidationError::EmailInvalidFormat);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_username_accepts_word_characters() {
        assert!(validate_username("bob").is_ok());
        assert!(validate_username("bob_42").is_ok());
        assert!(validate_username("B").is_ok());
        assert!(validate_username(&"a".repeat(MAX_USERNAME_LENGTH)).is_ok());
    }

    #[test]
    fn test_username_rejections() {
        assert_eq!(validate_username(""), Err(ValidationError::UsernameEmpty));
        assert_eq!(
            validate_username(&"a".repeat(MAX_USERNAME_LENGTH + 1)),
            Err(ValidationError::UsernameTooLong)
        );
        assert_eq!(
            validate_username("bob smith"),
            Err(ValidationError::UsernameInvalidChars)
        );
        assert_eq!(
            validate_username("bob@host"),
            Err(ValidationError::UsernameInvalidChars)
        );
    }

    #[test]
    fn test_email_accepts_plausible_addresses() {
        assert!(validate_email("bob@zombo.com").is_ok());
        assert!(validate_email("a.b@c.example.org").is_ok());
    }

    #[test]
    fn test_email_rejections() {
        for bad in ["not-an-email", "@zombo.com", "bob@", "bob@nodot"] {
            assert_eq!(
                validate_email(bad),
                Err(ValidationError::EmailInvalidFormat),
                "address {bad}"
            );
        }

        let long = format!("{}@example.com", "a".repeat(250));
        assert_eq!(validate_email(&long), Err(ValidationError::EmailTooLong));
    }
}
