use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use super::{handlers, messages};
use super::middleware::{api_key_middleware, metrics_middleware};
use crate::state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    // Chat messages, guarded by the API key when one is configured
    let message_routes = Router::new()
        .route("/messages", post(messages::post_message))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            api_key_middleware,
        ));

    let api_routes = Router::new()
        .route("/health", get(handlers::health))
        .route("/config", get(handlers::get_config))
        .merge(message_routes);

    Router::new()
        .nest("/api/v1", api_routes)
        .route("/metrics", get(handlers::metrics))
        .with_state(state)
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
}
