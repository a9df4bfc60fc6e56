//! Application router configuration with protected and unprotected route definitions.

use std::sync::Arc;

use axum::{
    Router, middleware,
    response::Redirect,
    routing::{delete, get, post},
};
use tower_http::services::ServeDir;

use crate::{
    AppState,
    auth::{auth_guard, auth_guard_hx, get_sign_in_page, get_sign_out, post_sign_in, post_sign_up},
    category::{create_category_endpoint, delete_category_endpoint},
    endpoints,
    internal_server_error::get_internal_server_error_page,
    not_found::get_404_not_found,
    note::{create_note_endpoint, delete_note_endpoint, get_note_list, get_notes_page},
    pwa::{
        CacheWorker, get_offline_page, get_service_worker, get_web_manifest,
        shell_cache_middleware,
    },
    theme::toggle_theme_endpoint,
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let unprotected_routes = Router::new()
        .route(endpoints::SIGN_IN_VIEW, get(get_sign_in_page))
        .route(endpoints::SIGN_IN_API, post(post_sign_in))
        .route(endpoints::SIGN_UP_API, post(post_sign_up))
        .route(endpoints::SIGN_OUT, get(get_sign_out))
        .route(endpoints::WEB_MANIFEST, get(get_web_manifest))
        .route(endpoints::SERVICE_WORKER, get(get_service_worker))
        .route(endpoints::OFFLINE_VIEW, get(get_offline_page))
        .route(
            endpoints::INTERNAL_ERROR_VIEW,
            get(get_internal_server_error_page),
        );

    let protected_routes = Router::new()
        .route(endpoints::ROOT, get(get_index_page))
        .route(endpoints::NOTES_VIEW, get(get_notes_page))
        .layer(middleware::from_fn_with_state(state.clone(), auth_guard));

    // HTMX requests need the HX-Redirect header for auth redirects to work.
    let protected_routes = protected_routes.merge(
        Router::new()
            .route(
                endpoints::NOTES_API,
                get(get_note_list).post(create_note_endpoint),
            )
            .route(endpoints::DELETE_NOTE, delete(delete_note_endpoint))
            .route(endpoints::CATEGORIES_API, post(create_category_endpoint))
            .route(
                endpoints::DELETE_CATEGORY,
                delete(delete_category_endpoint),
            )
            .route(endpoints::THEME_API, post(toggle_theme_endpoint))
            .layer(middleware::from_fn_with_state(state.clone(), auth_guard_hx)),
    );

    protected_routes
        .merge(unprotected_routes)
        .nest_service(endpoints::STATIC, ServeDir::new("static/"))
        .fallback(get_404_not_found)
        .with_state(state)
}

/// Serve the app shell from `worker`'s cache before the request reaches `router`.
pub fn with_shell_cache(router: Router, worker: Arc<CacheWorker>) -> Router {
    router.layer(middleware::from_fn_with_state(worker, shell_cache_middleware))
}

/// The root path '/' redirects to the notes page.
async fn get_index_page() -> Redirect {
    Redirect::to(endpoints::NOTES_VIEW)
}
