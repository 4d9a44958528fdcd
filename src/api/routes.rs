use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::middleware::{make_span_with_request_id, request_id_middleware};

use super::handlers;
use super::AppState;

/// Creates the router; recommendations are served on POST to any path
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", post(handlers::recommend))
        .route(
            "/health",
            get(handlers::health_check).post(handlers::recommend),
        )
        .route("/*path", post(handlers::recommend))
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id)),
        )
        .with_state(state)
}
