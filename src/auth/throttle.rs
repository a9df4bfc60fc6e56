//! Limits repeated failed sign-in attempts for the same email address.

use std::{
    collections::HashMap,
    sync::{Mutex, MutexGuard},
};

use time::{Duration, OffsetDateTime};

/// Failed attempts allowed within [THROTTLE_WINDOW] before further attempts are refused.
pub const MAX_FAILED_ATTEMPTS: usize = 5;

/// How far back failed attempts are counted.
pub const THROTTLE_WINDOW: Duration = Duration::minutes(5);

/// Records failed sign-in attempts per email address.
#[derive(Debug, Default)]
pub struct SignInThrottle {
    failures: Mutex<HashMap<String, Vec<OffsetDateTime>>>,
}

impl SignInThrottle {
    fn failures(&self) -> MutexGuard<'_, HashMap<String, Vec<OffsetDateTime>>> {
        // The map only holds timestamps, so a panic elsewhere cannot leave it inconsistent.
        self.failures
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Whether `email` has used up its failed attempts as of `now`.
    pub fn is_throttled(&self, email: &str, now: OffsetDateTime) -> bool {
        let mut failures = self.failures();

        match failures.get_mut(email) {
            Some(attempts) => {
                attempts.retain(|attempt| now - *attempt < THROTTLE_WINDOW);
                attempts.len() >= MAX_FAILED_ATTEMPTS
            }
            None => false,
        }
    }

    /// Count a failed attempt for `email`.
    ///
    /// Emails whose attempts have all expired are forgotten, so the map only
    /// holds emails with failures inside [THROTTLE_WINDOW].
    pub fn record_failure(&self, email: &str, now: OffsetDateTime) {
        let mut failures = self.failures();

        failures.retain(|_, attempts| {
            attempts.retain(|attempt| now - *attempt < THROTTLE_WINDOW);
            !attempts.is_empty()
        });
        failures.entry(email.to_owned()).or_default().push(now);
    }

    /// Forget the failed attempts for `email`, e.g. after a successful sign-in.
    pub fn clear(&self, email: &str) {
        self.failures().remove(email);
    }
}
