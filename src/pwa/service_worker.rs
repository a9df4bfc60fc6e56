//! The browser service worker script.
//!
//! The script is rendered from the same [ShellManifest] the server-side
//! [CacheWorker](crate::pwa::CacheWorker) uses, so both cache the same URLs
//! under the same bucket name.

use axum::{
    extract::State,
    http::{
        StatusCode,
        header::{CACHE_CONTROL, CONTENT_TYPE},
    },
    response::{IntoResponse, Response},
};

use crate::{endpoints, internal_server_error::InternalServerError, pwa::ShellManifest};

/// Install caches every shell URL with `addAll`, which rejects if any fetch
/// fails. Fetch answers GET requests from the cache first and never stores
/// network responses. Page loads that fail get the cached offline page.
const SERVICE_WORKER_BODY: &str = r#"
self.addEventListener("install", (event) => {
  event.waitUntil(
    caches.open(CACHE_NAME).then((cache) => cache.addAll(urlsToCache))
  );
});

self.addEventListener("fetch", (event) => {
  if (event.request.method !== "GET") {
    return;
  }

  event.respondWith(
    caches.match(event.request).then(
      (cached) =>
        cached ||
        fetch(event.request).catch((error) => {
          if (event.request.mode === "navigate") {
            return caches.match(OFFLINE_URL);
          }
          throw error;
        })
    )
  );
});
"#;

/// Render the service worker for `manifest`.
pub fn render_service_worker(manifest: &ShellManifest) -> Result<String, serde_json::Error> {
    let cache_name = serde_json::to_string(&manifest.bucket_name())?;
    let urls_to_cache = serde_json::to_string(&manifest.urls)?;
    let offline_url = serde_json::to_string(endpoints::OFFLINE_VIEW)?;

    Ok(format!(
        "const CACHE_NAME = {cache_name};\nconst urlsToCache = {urls_to_cache};\n\
        const OFFLINE_URL = {offline_url};\n{SERVICE_WORKER_BODY}"
    ))
}

/// Serve the service worker script.
///
/// The script itself is never cached so that a new version is picked up on
/// the next visit.
pub async fn get_service_worker(State(manifest): State<ShellManifest>) -> Response {
    match render_service_worker(&manifest) {
        Ok(script) => (
            StatusCode::OK,
            [
                (CONTENT_TYPE, "application/javascript"),
                (CACHE_CONTROL, "no-cache"),
            ],
            script,
        )
            .into_response(),
        Err(error) => {
            tracing::error!("Could not render the service worker: {error}");
            InternalServerError::default().into_response()
        }
    }
}
