//! Implements a struct that holds the state of the REST server.

use std::sync::{Arc, Mutex};

use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;
use rusqlite::Connection;
use sha2::{Digest, Sha512};
use time::Duration;

use crate::{
    Error,
    auth::{DEFAULT_COOKIE_DURATION, SignInThrottle},
    db::{DbOptions, initialize},
    pwa::{SHELL_URLS, ShellManifest},
};

/// The cache version used when none is configured.
pub const DEFAULT_CACHE_VERSION: &str = "v1";

/// The state of the REST server.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,

    /// The duration for which cookies used for authentication are valid.
    pub cookie_duration: Duration,

    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,

    /// The database connection
    pub db_connection: Arc<Mutex<Connection>>,

    /// Tracks failed sign-in attempts per email address.
    pub sign_in_throttle: Arc<SignInThrottle>,

    /// The app shell resources and the version they are cached under.
    pub shell_manifest: ShellManifest,
}

impl AppState {
    /// Create a new [AppState] with a SQLite database connection.
    ///
    /// This function will initialize the database by adding the tables for the domain models.
    /// `local_timezone` should be a valid, canonical timezone name, e.g. "Pacific/Auckland".
    ///
    /// # Errors
    /// Returns an error if the database cannot be initialized.
    pub fn new(
        db_connection: Connection,
        cookie_secret: &str,
        local_timezone: &str,
        db_options: DbOptions,
    ) -> Result<Self, Error> {
        initialize(&db_connection, db_options)?;

        Ok(Self {
            cookie_key: create_cookie_key(cookie_secret),
            cookie_duration: DEFAULT_COOKIE_DURATION,
            local_timezone: local_timezone.to_owned(),
            db_connection: Arc::new(Mutex::new(db_connection)),
            sign_in_throttle: Arc::new(SignInThrottle::default()),
            shell_manifest: ShellManifest::new(DEFAULT_CACHE_VERSION, SHELL_URLS),
        })
    }

    /// Cache the app shell under `version` instead of [DEFAULT_CACHE_VERSION].
    ///
    /// Bumping the version makes clients fetch the shell again.
    pub fn with_cache_version(mut self, version: &str) -> Self {
        self.shell_manifest = ShellManifest::new(version, SHELL_URLS);
        self
    }
}

impl FromRef<AppState> for ShellManifest {
    fn from_ref(state: &AppState) -> Self {
        state.shell_manifest.clone()
    }
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.cookie_key.clone()
    }
}

/// Create a signing key for cookies from a `secret`s string.
pub fn create_cookie_key(secret: &str) -> Key {
    let hash = Sha512::digest(secret);

    Key::from(&hash)
}
