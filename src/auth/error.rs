//! The closed set of ways signing in or signing up can fail.

/// Why an authentication request was rejected.
///
/// Every kind maps to exactly one user-facing message via [AuthErrorKind::message].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthErrorKind {
    /// The email address is not well formed.
    #[error("invalid email")]
    InvalidEmail,

    /// The account exists but has been disabled by an operator.
    #[error("user disabled")]
    UserDisabled,

    /// No account is registered under the email address.
    #[error("user not found")]
    UserNotFound,

    /// The password does not match the account.
    #[error("wrong password")]
    WrongPassword,

    /// An account is already registered under the email address.
    #[error("email already in use")]
    EmailAlreadyInUse,

    /// The password was rejected by the strength check.
    #[error("weak password: {0}")]
    WeakPassword(String),

    /// The user store could not be reached.
    #[error("network request failed")]
    NetworkRequestFailed,

    /// Too many failed attempts have been made recently.
    #[error("too many requests")]
    TooManyRequests,

    /// Anything else, with the underlying message.
    #[error("{0}")]
    Unknown(String),
}

impl AuthErrorKind {
    /// The message to show the user.
    pub fn message(&self) -> String {
        match self {
            AuthErrorKind::InvalidEmail => "Invalid email format".to_owned(),
            AuthErrorKind::UserDisabled => "This account has been disabled".to_owned(),
            AuthErrorKind::UserNotFound => "User not found".to_owned(),
            AuthErrorKind::WrongPassword => "Wrong password".to_owned(),
            AuthErrorKind::EmailAlreadyInUse => "Email is already in use".to_owned(),
            AuthErrorKind::WeakPassword(feedback) if feedback.is_empty() => {
                "Weak password".to_owned()
            }
            AuthErrorKind::WeakPassword(feedback) => format!("Weak password: {feedback}"),
            AuthErrorKind::NetworkRequestFailed => {
                "Network problem. Check your internet connection".to_owned()
            }
            AuthErrorKind::TooManyRequests => {
                "Too many attempts. Please try again later".to_owned()
            }
            AuthErrorKind::Unknown(message) => format!("Authentication error: {message}"),
        }
    }
}

#[cfg(test)]
mod auth_error_kind_tests {
    use super::AuthErrorKind;

    #[test]
    fn every_kind_has_a_message() {
        let kinds = [
            AuthErrorKind::InvalidEmail,
            AuthErrorKind::UserDisabled,
            AuthErrorKind::UserNotFound,
            AuthErrorKind::WrongPassword,
            AuthErrorKind::EmailAlreadyInUse,
            AuthErrorKind::WeakPassword(String::new()),
            AuthErrorKind::NetworkRequestFailed,
            AuthErrorKind::TooManyRequests,
            AuthErrorKind::Unknown("boom".to_owned()),
        ];

        for kind in kinds {
            assert!(!kind.message().is_empty(), "{kind:?} has no message");
        }
    }

    #[test]
    fn unknown_includes_raw_message() {
        let kind = AuthErrorKind::Unknown("disk on fire".to_owned());

        assert_eq!(kind.message(), "Authentication error: disk on fire");
    }
}
