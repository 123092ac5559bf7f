//! Route table and request pipeline
//!
//! Each registered route runs through, outermost first: request logging,
//! rate limiting, then the handler whose errors are turned into responses
//! by [`crate::error::Error`]. Layers are attached with `route_layer`, so a
//! request that matches no route gets a plain 404 and spends no token.

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};

use crate::{
    handlers::{create_advert, get_advert, list_adverts},
    middleware::{enforce, log_requests, TokenBucket},
    state::AppState,
};

/// Build the application router around a shared token bucket
///
/// Oversized bodies are cut off at extraction, so they are rejected through
/// the handler's error path like any other malformed body.
pub fn router(state: AppState, bucket: Arc<TokenBucket>) -> Router {
    let body_limit = state.config().middleware.body_limit_kb * 1024;

    Router::new()
        .route("/adverts/{id}", get(get_advert))
        .route("/adverts", get(list_adverts))
        .route("/advert", post(create_advert))
        .route_layer(DefaultBodyLimit::max(body_limit))
        .route_layer(middleware::from_fn_with_state(bucket, enforce))
        .route_layer(middleware::from_fn(log_requests))
        .with_state(state)
}
