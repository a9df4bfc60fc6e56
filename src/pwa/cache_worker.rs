//! A cache-first store for the app shell.
//!
//! The worker is installed once per version: every URL in the shell manifest
//! is fetched and stored in a bucket named after the version. Once active,
//! requests for those URLs are answered from the bucket without touching the
//! network. Anything else goes to the network and is never stored.

use std::{
    collections::HashMap,
    future::Future,
    sync::{
        Arc, RwLock,
        atomic::{AtomicBool, Ordering},
    },
};

use axum::{
    Router,
    body::{Body, Bytes},
    http::{HeaderMap, Method, Request, StatusCode, Uri},
    response::Response,
};
use tower::ServiceExt;

use crate::Error;

/// Cached responses larger than this are rejected during install.
const MAX_CACHED_BODY_BYTES: usize = 8 * 1024 * 1024;

/// The resources that make up the app shell and the version they are cached under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellManifest {
    /// Names the cache bucket, see [ShellManifest::bucket_name].
    pub version: String,
    /// Paths to cache, fetched in this order.
    pub urls: Vec<String>,
}

impl ShellManifest {
    /// Create a manifest caching `urls` under `version`.
    pub fn new(version: &str, urls: &[&str]) -> Self {
        Self {
            version: version.to_owned(),
            urls: urls.iter().map(|url| (*url).to_owned()).collect(),
        }
    }

    /// The bucket this version is cached in.
    ///
    /// Changing the version is the only way to invalidate the cache.
    pub fn bucket_name(&self) -> String {
        format!("notes-app-{}", self.version)
    }
}

/// Identifies a request by method, path and query string.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequestKey {
    method: Method,
    path_and_query: String,
}

impl RequestKey {
    pub fn get(url: &str) -> Self {
        Self {
            method: Method::GET,
            path_and_query: url.to_owned(),
        }
    }

    pub fn from_request<B>(request: &Request<B>) -> Self {
        Self {
            method: request.method().clone(),
            path_and_query: request
                .uri()
                .path_and_query()
                .map(|path_and_query| path_and_query.as_str().to_owned())
                .unwrap_or_else(|| request.uri().path().to_owned()),
        }
    }
}

/// A response with its body read into memory so it can be replayed.
#[derive(Debug, Clone)]
pub struct CachedResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl CachedResponse {
    async fn from_response(response: Response) -> Result<Self, String> {
        let (parts, body) = response.into_parts();
        let body = axum::body::to_bytes(body, MAX_CACHED_BODY_BYTES)
            .await
            .map_err(|error| error.to_string())?;

        Ok(Self {
            status: parts.status,
            headers: parts.headers,
            body,
        })
    }

    pub fn to_response(&self) -> Response {
        let mut response = Response::new(Body::from(self.body.clone()));
        *response.status_mut() = self.status;
        *response.headers_mut() = self.headers.clone();

        response
    }
}

type Bucket = HashMap<RequestKey, CachedResponse>;

/// Named buckets of cached responses.
///
/// Buckets are only ever added whole. Buckets of old versions are left in
/// place.
#[derive(Debug, Default)]
pub struct CacheStorage {
    buckets: RwLock<HashMap<String, Arc<Bucket>>>,
}

impl CacheStorage {
    /// The bucket called `name`, if it has been installed.
    pub fn open(&self, name: &str) -> Option<Arc<Bucket>> {
        self.buckets
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(name)
            .cloned()
    }

    fn insert(&self, name: String, bucket: Bucket) {
        self.buckets
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(name, Arc::new(bucket));
    }

    /// The names of all installed buckets in alphabetical order.
    pub fn bucket_names(&self) -> Vec<String> {
        let mut names = self
            .buckets
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .keys()
            .cloned()
            .collect::<Vec<_>>();
        names.sort();

        names
    }
}

/// Something that can perform a request over the network.
pub trait Fetch {
    fn fetch(
        &self,
        request: Request<Body>,
    ) -> impl Future<Output = Result<Response, String>> + Send;
}

/// The in-process router stands in for the network at start-up.
impl Fetch for Router {
    async fn fetch(&self, request: Request<Body>) -> Result<Response, String> {
        match self.clone().oneshot(request).await {
            Ok(response) => Ok(response),
            Err(infallible) => match infallible {},
        }
    }
}

/// Caches the app shell and serves it cache-first.
#[derive(Debug)]
pub struct CacheWorker {
    manifest: ShellManifest,
    storage: Arc<CacheStorage>,
    active: AtomicBool,
}

impl CacheWorker {
    /// Create an inactive worker that installs `manifest` into `storage`.
    pub fn new(manifest: ShellManifest, storage: Arc<CacheStorage>) -> Self {
        Self {
            manifest,
            storage,
            active: AtomicBool::new(false),
        }
    }

    /// The resources this worker caches.
    pub fn manifest(&self) -> &ShellManifest {
        &self.manifest
    }

    /// Whether [CacheWorker::install] has completed.
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    /// Fetch every manifest URL, in order, into this version's bucket.
    ///
    /// The bucket is only stored once every URL has been fetched successfully.
    ///
    /// # Errors
    ///
    /// Returns [Error::CacheInstallFailed] for the first URL that fails to
    /// fetch or responds with a non-success status. Storage is left untouched
    /// and the worker stays inactive.
    pub async fn install(&self, fetcher: &impl Fetch) -> Result<(), Error> {
        let bucket_name = self.manifest.bucket_name();
        let mut staging = Bucket::new();

        for url in &self.manifest.urls {
            let install_failed = |reason: String| {
                tracing::error!("Could not install {bucket_name}, fetching {url} failed: {reason}");
                Error::CacheInstallFailed {
                    url: url.clone(),
                    reason,
                }
            };

            let uri = url
                .parse::<Uri>()
                .map_err(|error| install_failed(error.to_string()))?;
            let request = Request::get(uri)
                .body(Body::empty())
                .map_err(|error| install_failed(error.to_string()))?;

            let response = fetcher.fetch(request).await.map_err(install_failed)?;
            if !response.status().is_success() {
                return Err(install_failed(format!("status {}", response.status())));
            }

            let cached = CachedResponse::from_response(response)
                .await
                .map_err(install_failed)?;
            staging.insert(RequestKey::get(url), cached);
        }

        self.storage.insert(bucket_name.clone(), staging);
        self.active.store(true, Ordering::Release);
        tracing::info!(
            "Installed {bucket_name} with {} resources",
            self.manifest.urls.len()
        );

        Ok(())
    }

    /// Answer `key` from this version's bucket, or else with `network`.
    ///
    /// Hits are returned exactly as they were stored. Misses are not stored.
    pub async fn respond<F>(&self, key: &RequestKey, network: F) -> Response
    where
        F: Future<Output = Response>,
    {
        if self.is_active()
            && let Some(bucket) = self.storage.open(&self.manifest.bucket_name())
            && let Some(cached) = bucket.get(key)
        {
            tracing::trace!("Serving {} from cache", key.path_and_query);
            return cached.to_response();
        }

        network.await
    }
}
