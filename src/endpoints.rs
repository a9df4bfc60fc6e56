//! The API endpoints URIs.
//!
//! For endpoints that take a parameter, e.g., '/api/notes/{note_id}', use [format_endpoint].

/// The root route which redirects to the notes page or sign-in page.
pub const ROOT: &str = "/";
/// The landing page for signed in users.
pub const NOTES_VIEW: &str = "/notes";
/// The route for getting the sign-in page.
pub const SIGN_IN_VIEW: &str = "/sign_in";
/// The page to display when an internal server error occurs.
pub const INTERNAL_ERROR_VIEW: &str = "/error";
/// The route for static files.
pub const STATIC: &str = "/static";
/// The web app manifest used when installing the app.
pub const WEB_MANIFEST: &str = "/manifest.json";
/// The service worker script that caches the app shell in the browser.
pub const SERVICE_WORKER: &str = "/sw.js";
/// The cached page shown when the app is opened without a connection.
pub const OFFLINE_VIEW: &str = "/offline";

/// The route for signing in a user.
pub const SIGN_IN_API: &str = "/api/sign_in";
/// The route for creating a new account.
pub const SIGN_UP_API: &str = "/api/sign_up";
/// The route for the client to sign out the current user.
pub const SIGN_OUT: &str = "/api/sign_out";
/// The route to fetch the note list as an HTML fragment.
pub const NOTES_API: &str = "/api/notes";
/// The route to delete a note.
pub const DELETE_NOTE: &str = "/api/notes/{note_id}";
/// The route to create a category.
pub const CATEGORIES_API: &str = "/api/categories";
/// The route to delete a category.
pub const DELETE_CATEGORY: &str = "/api/categories/{category_id}";
/// The route to toggle between the light and dark theme.
pub const THEME_API: &str = "/api/theme";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/notes/{note_id}', '{note_id}' is the parameter.
///
/// This function assumes that an endpoint path only contains ASCII characters
/// and a single parameter.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// the original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let mut param_start = None;
    let mut param_end = None;

    for (i, c) in endpoint_path.chars().enumerate() {
        if c == '{' {
            param_start = Some(i);
        } else if param_start.is_some() && c == '}' {
            param_end = Some(i + 1);
            break;
        }
    }

    let param_start = match param_start {
        Some(start) => start,
        None => return endpoint_path.to_string(),
    };

    let param_end = param_end.unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}

// These tests are here so that we know when we call `Uri::from_shared` it will not panic.
#[cfg(test)]
mod endpoints_tests {
    use axum::http::Uri;

    use crate::endpoints;

    use super::format_endpoint;

    fn assert_endpoint_is_valid_uri(uri: &str) {
        assert!(uri.parse::<Uri>().is_ok());
    }

    #[test]
    fn endpoints_are_valid_uris() {
        assert_endpoint_is_valid_uri(endpoints::ROOT);
        assert_endpoint_is_valid_uri(endpoints::NOTES_VIEW);
        assert_endpoint_is_valid_uri(endpoints::SIGN_IN_VIEW);
        assert_endpoint_is_valid_uri(endpoints::INTERNAL_ERROR_VIEW);
        assert_endpoint_is_valid_uri(endpoints::STATIC);
        assert_endpoint_is_valid_uri(endpoints::WEB_MANIFEST);
        assert_endpoint_is_valid_uri(endpoints::SERVICE_WORKER);
        assert_endpoint_is_valid_uri(endpoints::OFFLINE_VIEW);

        assert_endpoint_is_valid_uri(endpoints::SIGN_IN_API);
        assert_endpoint_is_valid_uri(endpoints::SIGN_UP_API);
        assert_endpoint_is_valid_uri(endpoints::SIGN_OUT);
        assert_endpoint_is_valid_uri(endpoints::NOTES_API);
        assert_endpoint_is_valid_uri(endpoints::DELETE_NOTE);
        assert_endpoint_is_valid_uri(endpoints::CATEGORIES_API);
        assert_endpoint_is_valid_uri(endpoints::DELETE_CATEGORY);
        assert_endpoint_is_valid_uri(endpoints::THEME_API);
    }

    #[test]
    fn produces_valid_uri() {
        let formatted_path = format_endpoint("/hello/{world_id}", 1);

        assert_eq!(formatted_path, "/hello/1");
        assert!(formatted_path.parse::<Uri>().is_ok());

        // Parameter with single word should also work.
        let formatted_path = format_endpoint("/hello/{world}", 1);

        assert_eq!(formatted_path, "/hello/1");
        assert!(formatted_path.parse::<Uri>().is_ok());
    }

    #[test]
    fn returns_original_path_with_no_parameter() {
        let formatted_path = format_endpoint("/hello/world", 1);

        assert_eq!(formatted_path, "/hello/world");
        assert!(formatted_path.parse::<Uri>().is_ok());
    }

    #[test]
    fn parameter_in_middle() {
        let formatted_path = format_endpoint("/hello/{world}/bye", 1);

        assert_eq!(formatted_path, "/hello/1/bye");
        assert!(formatted_path.parse::<Uri>().is_ok());
    }
}
