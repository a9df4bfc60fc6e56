//! Remembers where a signed-out user was heading so sign-in can send them back.

use axum::{extract::Request, http::Uri};

use crate::endpoints;

/// Accept only same-origin paths, and never the sign-in page itself.
pub fn normalize_redirect_url(raw_url: &str) -> Option<String> {
    let uri = raw_url.parse::<Uri>().ok()?;
    if uri.scheme().is_some() || uri.authority().is_some() {
        return None;
    }
    let path_and_query = uri.path_and_query()?.as_str();

    let is_local = path_and_query.starts_with('/') && !path_and_query.starts_with("//");
    let is_sign_in = uri.path() == endpoints::SIGN_IN_VIEW;

    (is_local && !is_sign_in).then(|| path_and_query.to_owned())
}

/// The sign-in page URL with `redirect_url` set to `target`.
pub fn sign_in_url_with_redirect(target: &str) -> String {
    match serde_urlencoded::to_string([("redirect_url", target)]) {
        Ok(query) => format!("{}?{query}", endpoints::SIGN_IN_VIEW),
        Err(error) => {
            tracing::error!("Could not encode redirect URL {target}: {error}");
            endpoints::SIGN_IN_VIEW.to_owned()
        }
    }
}

/// Where to send the client after signing in, given the request that was refused.
///
/// Page requests return to the same page. HTMX API requests return to the page
/// that issued them (the `HX-Current-URL` header). Anything else goes to the notes page.
pub fn sign_in_redirect_for(request: &Request) -> String {
    let target = if request.uri().path().starts_with("/api") {
        request
            .headers()
            .get("hx-current-url")
            .and_then(|header| header.to_str().ok())
            .and_then(|current_url| current_url.parse::<Uri>().ok())
            .and_then(|uri| {
                uri.path_and_query()
                    .and_then(|path_and_query| normalize_redirect_url(path_and_query.as_str()))
            })
    } else {
        request
            .uri()
            .path_and_query()
            .and_then(|path_and_query| normalize_redirect_url(path_and_query.as_str()))
    };

    let target = target.unwrap_or_else(|| {
        tracing::debug!(
            "No usable redirect target for {}, using the notes page.",
            request.uri()
        );
        endpoints::NOTES_VIEW.to_owned()
    });

    sign_in_url_with_redirect(&target)
}
