use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::auth::AuthErrorKind;

/// A lower-cased email address that has passed a basic format check.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Email(String);

impl Email {
    /// Create and validate an email address.
    ///
    /// # Errors
    ///
    /// This function will return [AuthErrorKind::InvalidEmail] if `raw_email` does not have
    /// exactly one '@' with text on both sides, or contains whitespace.
    pub fn new(raw_email: &str) -> Result<Self, AuthErrorKind> {
        let email = raw_email.trim();

        let is_valid = match email.split_once('@') {
            Some((local, domain)) => {
                !local.is_empty()
                    && !domain.is_empty()
                    && !domain.contains('@')
                    && !domain.starts_with('.')
                    && !domain.ends_with('.')
                    && !email.contains(char::is_whitespace)
            }
            None => false,
        };

        if is_valid {
            Ok(Self(email.to_lowercase()))
        } else {
            Err(AuthErrorKind::InvalidEmail)
        }
    }

    /// Create a new `Email` without any validation.
    ///
    /// The caller should ensure that `raw_email` is a correctly formatted, lower-case email address.
    /// For emails coming from the user, this function should **not** be used, instead use the checked version.
    ///
    /// This function has `_unchecked` in the name but is not `unsafe`, because if an incorrectly formatted email is provided it will cause incorrect behaviour but not affect memory safety.
    pub fn new_unchecked(raw_email: &str) -> Self {
        Self(raw_email.to_owned())
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for Email {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
