//! Password validation and hashing.
//!
//! [ValidatedPassword] guarantees a password is long enough and not trivially
//! guessable, [PasswordHash] turns it into a salted bcrypt hash.

use std::fmt::Display;

use bcrypt::{BcryptError, hash, verify};
use serde::{Deserialize, Serialize};
use zxcvbn::{Score, feedback::Feedback, zxcvbn};

use crate::{Error, auth::AuthErrorKind};

/// The minimum number of characters in a password.
pub const PASSWORD_MIN_LENGTH: usize = 6;

/// Check the length of a raw password.
///
/// # Errors
///
/// Returns [Error::PasswordTooShort] if `raw_password` has fewer than
/// [PASSWORD_MIN_LENGTH] characters.
pub fn check_password_length(raw_password: &str) -> Result<(), Error> {
    if raw_password.chars().count() < PASSWORD_MIN_LENGTH {
        Err(Error::PasswordTooShort(PASSWORD_MIN_LENGTH))
    } else {
        Ok(())
    }
}

/// A password that has been validated, but not yet hashed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidatedPassword(String);

impl ValidatedPassword {
    /// Create and validate a new password from a string.
    ///
    /// # Errors
    ///
    /// Returns [Error::PasswordTooShort] for passwords shorter than [PASSWORD_MIN_LENGTH]
    /// and [AuthErrorKind::WeakPassword] (wrapped in [Error::Auth]) for passwords that
    /// zxcvbn scores below [Score::Two]. The weak password error carries zxcvbn's
    /// suggestions for a stronger password.
    pub fn new(raw_password_string: &str) -> Result<Self, Error> {
        check_password_length(raw_password_string)?;

        let password_analysis = zxcvbn(raw_password_string, &[]);

        if !matches!(password_analysis.score(), Score::Zero | Score::One) {
            Ok(Self(raw_password_string.to_owned()))
        } else {
            let feedback = password_analysis
                .feedback()
                .unwrap_or(&Feedback::default())
                .to_string();

            Err(AuthErrorKind::WeakPassword(feedback.trim().to_owned()).into())
        }
    }

    /// Create a new `ValidatedPassword` without any validation.
    ///
    /// Only intended for tests and operator tooling where the password has been checked elsewhere.
    pub fn new_unchecked(raw_password_string: &str) -> Self {
        Self(raw_password_string.to_owned())
    }
}

impl Display for ValidatedPassword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "********")
    }
}

/// A salted and hashed password.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// An alias for the default encryption cost for hashing passwords.
    pub const DEFAULT_COST: u32 = bcrypt::DEFAULT_COST;

    /// Hash a validated password with the specified `cost`.
    ///
    /// # Errors
    ///
    /// Returns [Error::HashingError] if bcrypt fails.
    pub fn new(password: ValidatedPassword, cost: u32) -> Result<Self, Error> {
        hash(&password.0, cost)
            .map(Self)
            .map_err(|error| Error::HashingError(error.to_string()))
    }

    /// Wrap an existing hash, e.g. one read back from the database.
    pub fn new_unchecked(raw_password_hash: &str) -> Self {
        Self(raw_password_hash.to_owned())
    }

    /// Validate then hash a raw password string.
    pub fn from_raw_password(raw_password: &str, cost: u32) -> Result<Self, Error> {
        let validated_password = ValidatedPassword::new(raw_password)?;
        PasswordHash::new(validated_password, cost)
    }

    /// Check that `raw_password` matches the stored password.
    pub fn verify(&self, raw_password: &str) -> Result<bool, BcryptError> {
        verify(raw_password, &self.0)
    }
}

impl AsRef<str> for PasswordHash {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod validated_password_tests {
    use crate::{Error, auth::AuthErrorKind};

    use super::{PASSWORD_MIN_LENGTH, ValidatedPassword, check_password_length};

    #[test]
    fn new_fails_on_short_password() {
        let result = ValidatedPassword::new("abc12");

        assert_eq!(result, Err(Error::PasswordTooShort(PASSWORD_MIN_LENGTH)));
    }

    #[test]
    fn length_counts_characters_not_bytes() {
        assert!(check_password_length("ыыыыыы").is_ok());
        assert!(check_password_length("ыыыыы").is_err());
    }

    #[test]
    fn new_fails_on_guessable_password() {
        let result = ValidatedPassword::new("password");

        assert!(
            matches!(result, Err(Error::Auth(AuthErrorKind::WeakPassword(_)))),
            "want weak password error, got {result:?}"
        );
    }

    #[test]
    fn new_succeeds_on_long_password() {
        let result = ValidatedPassword::new("asomewhatlongpassword1");

        assert!(result.is_ok());
    }

    #[test]
    fn display_hides_password() {
        let password = ValidatedPassword::new_unchecked("hunter2");

        assert_eq!(password.to_string(), "********");
    }
}
