//! Request Handlers
//!
//! Thin adapters between HTTP and the table and bet services.

use super::{
    errors::ApiError,
    middleware::RequestId,
    models::*,
};
use crate::services::Services;
use axum::{
    extract::{rejection::JsonRejection, rejection::PathRejection, Path, State},
    http::StatusCode,
    Extension, Json,
};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// Shared application state
pub struct AppState {
    pub services: Services,
}

impl AppState {
    pub fn new(services: Services) -> Self {
        Self { services }
    }
}

type ApiResult<T> = Result<T, ApiError>;

fn parse_id(request_id: &RequestId, path: Result<Path<Uuid>, PathRejection>) -> ApiResult<Uuid> {
    path.map(|Path(id)| id)
        .map_err(|e| ApiError::bad_request(request_id.0.clone(), e.body_text()))
}

/// GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "Running".to_string(),
    })
}

/// POST /v1/tables
pub async fn create_table_handler(
    Extension(request_id): Extension<RequestId>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<(StatusCode, Json<TableResponse>)> {
    let table = state
        .services
        .tables
        .create()
        .await
        .map_err(|e| ApiError::from_table_error(request_id.0.clone(), e))?;

    Ok((StatusCode::CREATED, Json(table.into())))
}

/// GET /v1/tables
pub async fn list_tables_handler(
    Extension(request_id): Extension<RequestId>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<TableResponse>>> {
    let tables = state
        .services
        .tables
        .list()
        .await
        .map_err(|e| ApiError::from_table_error(request_id.0.clone(), e))?;

    Ok(Json(tables.into_iter().map(TableResponse::from).collect()))
}

/// GET /v1/tables/:id
pub async fn get_table_handler(
    Extension(request_id): Extension<RequestId>,
    State(state): State<Arc<AppState>>,
    path: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<Json<TableResponse>> {
    let id = parse_id(&request_id, path)?;
    let table = state
        .services
        .tables
        .get(id)
        .await
        .map_err(|e| ApiError::from_table_error(request_id.0.clone(), e))?;

    Ok(Json(table.into()))
}

/// PUT /v1/tables/:id/spin
pub async fn spin_table_handler(
    Extension(request_id): Extension<RequestId>,
    State(state): State<Arc<AppState>>,
    path: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<Json<TableResponse>> {
    let id = parse_id(&request_id, path)?;
    let table = state
        .services
        .tables
        .spin(id)
        .await
        .map_err(|e| ApiError::from_table_error(request_id.0.clone(), e))?;

    Ok(Json(table.into()))
}

/// PUT /v1/tables/:id/settle
pub async fn settle_table_handler(
    Extension(request_id): Extension<RequestId>,
    State(state): State<Arc<AppState>>,
    path: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<Json<TableResponse>> {
    let id = parse_id(&request_id, path)?;
    let table = state
        .services
        .tables
        .settle(id)
        .await
        .map_err(|e| ApiError::from_table_error(request_id.0.clone(), e))?;

    Ok(Json(table.into()))
}

/// POST /v1/tables/:id/bet
pub async fn place_bet_handler(
    Extension(request_id): Extension<RequestId>,
    State(state): State<Arc<AppState>>,
    path: Result<Path<Uuid>, PathRejection>,
    body: Result<Json<BetRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<BetResponse>)> {
    let table_id = parse_id(&request_id, path)?;
    let Json(request) =
        body.map_err(|e| ApiError::bad_request(request_id.0.clone(), e.body_text()))?;
    let bet = request
        .into_bet(table_id)
        .map_err(|reason| ApiError::bad_request(request_id.0.clone(), reason))?;

    let bet = state
        .services
        .bets
        .create(bet)
        .await
        .map_err(|e| ApiError::from_bet_error(request_id.0.clone(), e))?;

    info!(request_id = %request_id.0, bet_id = %bet.id, table_id = %table_id, "bet placed");
    Ok((StatusCode::CREATED, Json(bet.into())))
}

/// GET /v1/bets/:id
pub async fn get_bet_handler(
    Extension(request_id): Extension<RequestId>,
    State(state): State<Arc<AppState>>,
    path: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<Json<BetResponse>> {
    let id = parse_id(&request_id, path)?;
    let bet = state
        .services
        .bets
        .get(id)
        .await
        .map_err(|e| ApiError::from_bet_error(request_id.0.clone(), e))?;

    Ok(Json(bet.into()))
}
