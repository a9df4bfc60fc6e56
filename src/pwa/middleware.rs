//! Serves app shell requests from the cache worker.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::Method,
    middleware::Next,
    response::Response,
};

use crate::pwa::{CacheWorker, RequestKey};

/// Answer `GET` requests cache-first. Other methods always reach the router.
pub async fn shell_cache_middleware(
    State(worker): State<Arc<CacheWorker>>,
    request: Request,
    next: Next,
) -> Response {
    if request.method() != Method::GET {
        return next.run(request).await;
    }

    let key = RequestKey::from_request(&request);
    worker.respond(&key, next.run(request)).await
}

#[cfg(test)]
mod shell_cache_middleware_tests {
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };

    use axum::{Router, middleware, routing::get};
    use axum_test::TestServer;

    use crate::pwa::{CacheStorage, CacheWorker, ShellManifest};

    use super::shell_cache_middleware;

    /// A router whose asset changes every time it is requested.
    fn counting_router(hits: Arc<AtomicUsize>) -> Router {
        let asset_hits = hits.clone();
        Router::new()
            .route(
                "/static/app.js",
                get(move || {
                    let count = asset_hits.fetch_add(1, Ordering::SeqCst);
                    async move { format!("asset {count}") }
                }),
            )
            .route(
                "/page",
                get(move || {
                    let count = hits.fetch_add(1, Ordering::SeqCst);
                    async move { format!("page {count}") }
                })
                .post(|| async { "posted" }),
            )
    }

    async fn get_server() -> TestServer {
        let hits = Arc::new(AtomicUsize::new(0));
        let router = counting_router(hits);
        let worker = Arc::new(CacheWorker::new(
            ShellManifest::new("v1", &["/static/app.js"]),
            Arc::new(CacheStorage::default()),
        ));
        worker.install(&router).await.expect("install failed");

        let app = router.layer(middleware::from_fn_with_state(
            worker,
            shell_cache_middleware,
        ));

        TestServer::try_new(app).expect("Could not create test server.")
    }

    #[tokio::test]
    async fn manifest_url_is_served_from_cache() {
        let server = get_server().await;

        let first = server.get("/static/app.js").await;
        let second = server.get("/static/app.js").await;

        assert_eq!(first.text(), "asset 0");
        assert_eq!(second.text(), "asset 0");
    }

    #[tokio::test]
    async fn other_urls_reach_the_router() {
        let server = get_server().await;

        let first = server.get("/page").await;
        let second = server.get("/page").await;

        assert_ne!(first.text(), second.text());
        assert_eq!(server.post("/page").await.text(), "posted");
    }
}
