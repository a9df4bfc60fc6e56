//! A note-taking web app with user accounts, categories, light/dark themes and
//! an installable, offline-capable app shell.
//!
//! This library provides a REST API that directly serves HTML pages.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use tokio::signal;

mod alert;
mod app_state;
mod auth;
mod batch;
mod category;
mod db;
mod endpoints;
mod html;
mod internal_server_error;
mod logging;
mod not_found;
mod note;
mod pwa;
mod routing;
mod theme;
mod timezone;

#[cfg(test)]
mod test_utils;

pub use app_state::{AppState, create_cookie_key};
pub use auth::{
    AuthErrorKind, Email, PasswordHash, User, UserID, ValidatedPassword, get_user_by_email,
    set_user_disabled, update_password,
};
pub use db::{DbOptions, initialize as initialize_db};
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use pwa::{CacheStorage, CacheWorker, SHELL_URLS, ShellManifest};
pub use routing::{build_router, with_shell_cache};

use crate::{
    alert::Alert, category::CategoryId, internal_server_error::InternalServerError,
    not_found::get_404_not_found_response,
};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The auth cookie is missing from the cookie jar in the request.
    #[error("no cookies in the cookie jar :(")]
    CookieMissing,

    /// The auth cookie could not be decoded or has expired.
    #[error("the auth token is invalid or has expired")]
    InvalidToken,

    /// A date time could not be formatted or parsed.
    #[error("could not format or parse date-time: {0}")]
    InvalidDateFormat(String),

    /// The user provided a password with fewer than the minimum number of characters.
    #[error("Password must be at least {0} characters long")]
    PasswordTooShort(usize),

    /// Signing in or signing up was rejected.
    #[error(transparent)]
    Auth(#[from] AuthErrorKind),

    /// An unexpected error occurred with the underlying hashing library.
    ///
    /// The error string should only be logged for debugging on the server.
    /// When communicating with the application client this error should be
    /// replaced with a general error type indicating an internal server error.
    #[error("hashing failed: {0}")]
    HashingError(String),

    /// An empty (or whitespace only) string was used as the text of a note.
    #[error("Note text cannot be empty")]
    EmptyNoteText,

    /// An empty string was used to create a category name.
    #[error("Category name cannot be empty")]
    EmptyCategoryName,

    /// The user already has a category with the same name, ignoring case.
    #[error("A category named \"{0}\" already exists")]
    DuplicateCategoryName(String),

    /// The category colour is not a hex colour of the form `#rrggbb`.
    #[error("\"{0}\" is not a valid colour, expected a hex colour such as #4f46e5")]
    InvalidCategoryColor(String),

    /// The category ID used to create a note did not match one of the user's categories.
    #[error("the category ID does not refer to a valid category")]
    InvalidCategory(Option<CategoryId>),

    /// The category filter in the query string was not `all`, `uncategorized` or a category ID.
    #[error("\"{0}\" is not a valid category filter")]
    InvalidCategoryFilter(String),

    /// An ordered query was issued without the composite index it needs.
    #[error("the query requires the index {0}, which does not exist")]
    MissingIndex(String),

    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the parameters
    /// (e.g., ID) are correct and that the resource has been created.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),

    /// An error occurred while serializing a struct as JSON
    #[error("could not serialize as JSON: {0}")]
    JSONSerializationError(String),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// Tried to delete a note that does not exist
    #[error("tried to delete a note that is not in the database")]
    DeleteMissingNote,

    /// Tried to delete a category that does not exist
    #[error("tried to delete a category that is not in the database")]
    DeleteMissingCategory,

    /// One of the app shell resources could not be fetched while installing the offline cache.
    #[error("could not cache {url}: {reason}")]
    CacheInstallFailed {
        /// The URL of the resource that failed.
        url: String,
        /// Why the resource could not be fetched.
        reason: String,
    },
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound => get_404_not_found_response(),
            Error::InvalidCategoryFilter(_) => (
                StatusCode::BAD_REQUEST,
                axum::response::Html(
                    html::error_view(
                        "Bad Request",
                        "400",
                        &self.to_string(),
                        "Pick a category from the sidebar instead.",
                    )
                    .into_string(),
                ),
            )
                .into_response(),
            Error::InvalidTimezoneError(timezone) => InternalServerError {
                description: "Invalid Timezone Settings",
                fix: &format!(
                    "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                ),
            }
            .into_response(),
            Error::DatabaseLockError => InternalServerError::default().into_response(),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                InternalServerError::default().into_response()
            }
        }
    }
}

impl Error {
    /// Render the error as a notification for HTMX requests.
    ///
    /// Validation errors are shown as-is, missing records get a hint to
    /// refresh the page and any other store error is reported as a failed
    /// operation with its raw message.
    fn into_alert_response(self) -> Response {
        let (status_code, alert) = match self {
            Error::EmptyNoteText
            | Error::PasswordTooShort(_)
            | Error::EmptyCategoryName
            | Error::DuplicateCategoryName(_)
            | Error::InvalidCategoryColor(_)
            | Error::InvalidCategoryFilter(_) => (
                StatusCode::BAD_REQUEST,
                Alert::ErrorSimple {
                    message: self.to_string(),
                },
            ),
            Error::Auth(kind) => (
                StatusCode::BAD_REQUEST,
                Alert::ErrorSimple {
                    message: kind.message(),
                },
            ),
            Error::InvalidCategory(category_id) => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Invalid category".to_owned(),
                    details: format!("Could not find a category with the ID {category_id:?}"),
                },
            ),
            Error::DeleteMissingNote => (
                StatusCode::NOT_FOUND,
                Alert::Error {
                    message: "Could not delete note".to_owned(),
                    details: "The note could not be found. \
                        Try refreshing the page to see if the note has already been deleted."
                        .to_owned(),
                },
            ),
            Error::NotFound => (
                StatusCode::NOT_FOUND,
                Alert::Error {
                    message: "Could not find the requested item".to_owned(),
                    details: "It may have been changed or deleted elsewhere. \
                        Try refreshing the page."
                        .to_owned(),
                },
            ),
            Error::DeleteMissingCategory => (
                StatusCode::NOT_FOUND,
                Alert::Error {
                    message: "Could not delete category".to_owned(),
                    details: "The category could not be found. \
                        Try refreshing the page to see if the category has already been deleted."
                        .to_owned(),
                },
            ),
            Error::InvalidTimezoneError(timezone) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Alert::Error {
                    message: "Invalid Timezone Settings".to_owned(),
                    details: format!(
                        "Could not get local timezone \"{timezone}\". Check your server settings and \
                        ensure the timezone has been set to valid, canonical timezone string"
                    ),
                },
            ),
            error => {
                tracing::error!("Operation failed: {error}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Alert::Error {
                        message: "Something went wrong".to_owned(),
                        details: format!("Operation failed: {error}"),
                    },
                )
            }
        };

        (status_code, alert).into_response()
    }
}
