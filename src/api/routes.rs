//! Route Definitions
//!
//! Maps URLs to handlers.

use super::{handlers::*, middleware::request_id_middleware};
use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;

/// Build the API router with all endpoints
///
/// Request ids are attached here rather than in the server so every handler
/// can rely on the `RequestId` extension.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/v1/tables", post(create_table_handler).get(list_tables_handler))
        .route("/v1/tables/:id", get(get_table_handler))
        .route("/v1/tables/:id/spin", put(spin_table_handler))
        .route("/v1/tables/:id/settle", put(settle_table_handler))
        .route("/v1/tables/:id/bet", post(place_bet_handler))
        .route("/v1/bets/:id", get(get_bet_handler))
        .layer(middleware::from_fn(request_id_middleware))
        .with_state(state)
}
