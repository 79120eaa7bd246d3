//! HTTP server and routes.

pub(crate) mod handlers;
mod state;

pub use state::AppState;

use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/chapters", get(handlers::api_chapters))
        .route("/chapters/{name}", get(handlers::api_chapter));

    Router::new()
        .route("/", get(handlers::index))
        .route("/chapters/{name}", get(handlers::chapter))
        .route("/next/{name}", get(handlers::next_chapter))
        .route("/prev/{name}", get(handlers::prev_chapter))
        .route("/images/{name}/{*page}", get(handlers::image))
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
