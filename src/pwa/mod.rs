//! The installable, offline-capable app shell.

mod cache_worker;
mod manifest;
mod middleware;
mod offline;
mod service_worker;

pub use cache_worker::{CacheStorage, CacheWorker, Fetch, RequestKey, ShellManifest};
pub use manifest::get_web_manifest;
pub use middleware::shell_cache_middleware;
pub use offline::get_offline_page;
pub use service_worker::get_service_worker;

/// The resources cached when the app is installed, in the order they are fetched.
///
/// The offline page is the only document in the shell: the notes page needs a
/// session and changes with every write, so it is never cached.
pub const SHELL_URLS: &[&str] = &[
    "/offline",
    "/static/styles.css",
    "/static/app.js",
    "/static/icon.svg",
    "/manifest.json",
];
