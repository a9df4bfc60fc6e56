//! Email and password accounts backed by the `user` table.
//!
//! These functions are the only place that decides which [AuthErrorKind] a
//! failed sign-in or sign-up produces.

use rusqlite::{Connection, ErrorCode};
use time::OffsetDateTime;

use crate::{
    Error,
    auth::{
        AuthErrorKind, Email, PasswordHash, SignInThrottle, User, ValidatedPassword, create_user,
        get_user_by_email,
    },
};

fn store_error(error: Error) -> AuthErrorKind {
    match error {
        Error::Auth(kind) => kind,
        Error::PasswordTooShort(_) => AuthErrorKind::WeakPassword(error.to_string()),
        Error::SqlError(ref sql_error)
            if sql_error.sqlite_error_code() == Some(ErrorCode::ConstraintViolation) =>
        {
            AuthErrorKind::EmailAlreadyInUse
        }
        Error::SqlError(_) | Error::DatabaseLockError => {
            tracing::error!("User store unavailable: {error}");
            AuthErrorKind::NetworkRequestFailed
        }
        error => {
            tracing::error!("Unexpected error in the user store: {error}");
            AuthErrorKind::Unknown(error.to_string())
        }
    }
}

/// Register a new account and return it.
///
/// # Errors
///
/// - [AuthErrorKind::InvalidEmail] if the email is malformed.
/// - [AuthErrorKind::WeakPassword] if the password is too short or too guessable.
/// - [AuthErrorKind::EmailAlreadyInUse] if the email is already registered.
/// - [AuthErrorKind::NetworkRequestFailed] if the database could not be used.
pub fn sign_up(
    connection: &Connection,
    raw_email: &str,
    raw_password: &str,
    cost: u32,
) -> Result<User, AuthErrorKind> {
    let email = Email::new(raw_email)?;
    let password = ValidatedPassword::new(raw_password).map_err(store_error)?;

    match get_user_by_email(&email, connection) {
        Ok(_) => return Err(AuthErrorKind::EmailAlreadyInUse),
        Err(Error::NotFound) => {}
        Err(error) => return Err(store_error(error)),
    }

    let password_hash = PasswordHash::new(password, cost).map_err(store_error)?;
    let user = create_user(email, password_hash, connection).map_err(store_error)?;

    tracing::info!("Registered user {}", user.id);

    Ok(user)
}

/// Check the credentials of an existing account and return it.
///
/// Failed attempts are counted per email address in `throttle`.
///
/// # Errors
///
/// - [AuthErrorKind::InvalidEmail] if the email is malformed.
/// - [AuthErrorKind::TooManyRequests] if the email has too many recent failures.
/// - [AuthErrorKind::UserNotFound] if no account uses the email.
/// - [AuthErrorKind::UserDisabled] if the account has been disabled.
/// - [AuthErrorKind::WrongPassword] if the password does not match.
/// - [AuthErrorKind::NetworkRequestFailed] if the database could not be used.
pub fn sign_in(
    connection: &Connection,
    throttle: &SignInThrottle,
    raw_email: &str,
    raw_password: &str,
) -> Result<User, AuthErrorKind> {
    let email = Email::new(raw_email)?;
    let now = OffsetDateTime::now_utc();

    if throttle.is_throttled(email.as_ref(), now) {
        tracing::warn!("Too many failed sign in attempts for {email}");
        return Err(AuthErrorKind::TooManyRequests);
    }

    let user = match get_user_by_email(&email, connection) {
        Ok(user) => user,
        Err(Error::NotFound) => {
            throttle.record_failure(email.as_ref(), now);
            return Err(AuthErrorKind::UserNotFound);
        }
        Err(error) => return Err(store_error(error)),
    };

    if user.disabled {
        return Err(AuthErrorKind::UserDisabled);
    }

    let is_password_valid = user.password_hash.verify(raw_password).map_err(|error| {
        tracing::error!("Unhandled error while verifying credentials: {error}");
        AuthErrorKind::Unknown(error.to_string())
    })?;

    if !is_password_valid {
        throttle.record_failure(email.as_ref(), now);
        return Err(AuthErrorKind::WrongPassword);
    }

    throttle.clear(email.as_ref());

    Ok(user)
}

#[cfg(test)]
mod provider_tests {
    use rusqlite::Connection;

    use crate::auth::{
        AuthErrorKind, SignInThrottle, create_user_table, set_user_disabled,
        throttle::MAX_FAILED_ATTEMPTS,
    };

    use super::{sign_in, sign_up};

    const PASSWORD: &str = "correct horse battery staple";
    const TEST_COST: u32 = 4;

    fn get_connection() -> Connection {
        let connection = Connection::open_in_memory().unwrap();
        create_user_table(&connection).unwrap();
        connection
    }

    #[test]
    fn sign_up_then_sign_in() {
        let connection = get_connection();
        let throttle = SignInThrottle::default();

        let created = sign_up(&connection, "Me@Example.com", PASSWORD, TEST_COST).unwrap();
        let signed_in = sign_in(&connection, &throttle, "me@example.com", PASSWORD).unwrap();

        assert_eq!(created.id, signed_in.id);
        assert_eq!(signed_in.email.as_ref(), "me@example.com");
    }

    #[test]
    fn sign_up_rejects_invalid_email() {
        let connection = get_connection();

        assert_eq!(
            sign_up(&connection, "not-an-email", PASSWORD, TEST_COST),
            Err(AuthErrorKind::InvalidEmail)
        );
    }

    #[test]
    fn sign_up_rejects_weak_password() {
        let connection = get_connection();

        let result = sign_up(&connection, "me@example.com", "123456", TEST_COST);

        assert!(
            matches!(result, Err(AuthErrorKind::WeakPassword(_))),
            "got {result:?}"
        );
    }

    #[test]
    fn sign_up_rejects_duplicate_email() {
        let connection = get_connection();
        sign_up(&connection, "me@example.com", PASSWORD, TEST_COST).unwrap();

        assert_eq!(
            sign_up(&connection, "ME@example.com", PASSWORD, TEST_COST),
            Err(AuthErrorKind::EmailAlreadyInUse)
        );
    }

    #[test]
    fn sign_in_unknown_user() {
        let connection = get_connection();

        assert_eq!(
            sign_in(
                &connection,
                &SignInThrottle::default(),
                "nobody@example.com",
                PASSWORD
            ),
            Err(AuthErrorKind::UserNotFound)
        );
    }

    #[test]
    fn sign_in_wrong_password() {
        let connection = get_connection();
        sign_up(&connection, "me@example.com", PASSWORD, TEST_COST).unwrap();

        assert_eq!(
            sign_in(
                &connection,
                &SignInThrottle::default(),
                "me@example.com",
                "wrong horse"
            ),
            Err(AuthErrorKind::WrongPassword)
        );
    }

    #[test]
    fn sign_in_disabled_user() {
        let connection = get_connection();
        let user = sign_up(&connection, "me@example.com", PASSWORD, TEST_COST).unwrap();
        set_user_disabled(user.id, true, &connection).unwrap();

        assert_eq!(
            sign_in(
                &connection,
                &SignInThrottle::default(),
                "me@example.com",
                PASSWORD
            ),
            Err(AuthErrorKind::UserDisabled)
        );
    }

    #[test]
    fn repeated_failures_are_throttled_even_with_correct_password() {
        let connection = get_connection();
        let throttle = SignInThrottle::default();
        sign_up(&connection, "me@example.com", PASSWORD, TEST_COST).unwrap();

        for _ in 0..MAX_FAILED_ATTEMPTS {
            let _ = sign_in(&connection, &throttle, "me@example.com", "wrong horse");
        }

        assert_eq!(
            sign_in(&connection, &throttle, "me@example.com", PASSWORD),
            Err(AuthErrorKind::TooManyRequests)
        );
    }
}
