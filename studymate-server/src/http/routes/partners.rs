//! Partner endpoints

use std::sync::Arc;

use axum::{
    extract::State,
    routing::{get, patch},
    Json, Router,
};
use serde_json::Value as JsonValue;

use super::{InsertedResponse, SuccessResponse};
use crate::http::error::ApiError;
use crate::http::extractors::{JsonBody, QueryParams, ValidUuid};
use crate::http::server::AppState;
use crate::models::{into_document, CountDelta, Partner, PartnerFilter, PartnerQueryParams};

/// GET /partners - list partners, optionally filtered by subject and sorted
async fn list_partners(
    State(state): State<Arc<AppState>>,
    QueryParams(params): QueryParams<PartnerQueryParams>,
) -> Result<Json<Vec<Partner>>, ApiError> {
    let filter = PartnerFilter::try_from(params)?;
    let partners = state.partners.list_partners(&filter).await?;

    tracing::debug!(count = partners.len(), ?filter, "listed partners");
    Ok(Json(partners))
}

/// GET /partners/{id} - get a single partner
async fn get_partner(
    State(state): State<Arc<AppState>>,
    ValidUuid(id): ValidUuid,
) -> Result<Json<Partner>, ApiError> {
    let partner = state.partners.get_partner(id).await?;
    Ok(Json(partner))
}

/// POST /partners - insert a partner as supplied
async fn create_partner(
    State(state): State<Arc<AppState>>,
    JsonBody(body): JsonBody<JsonValue>,
) -> Result<Json<InsertedResponse>, ApiError> {
    let doc = into_document(body)?;
    let id = state.partners.create_partner(doc).await?;

    tracing::info!(%id, "partner added");
    Ok(Json(InsertedResponse::new(id)))
}

/// PATCH /partners/{id}/increase-count
async fn increase_count(
    State(state): State<Arc<AppState>>,
    ValidUuid(id): ValidUuid,
) -> Result<Json<SuccessResponse>, ApiError> {
    state
        .partners
        .adjust_partner_count(id, CountDelta::Increment)
        .await?;
    Ok(Json(SuccessResponse::ok()))
}

/// PATCH /partners/{id}/decrease-count - no-op (404) once the count is zero
async fn decrease_count(
    State(state): State<Arc<AppState>>,
    ValidUuid(id): ValidUuid,
) -> Result<Json<SuccessResponse>, ApiError> {
    state
        .partners
        .adjust_partner_count(id, CountDelta::Decrement)
        .await?;
    Ok(Json(SuccessResponse::ok()))
}

/// Partner routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/partners", get(list_partners).post(create_partner))
        .route("/partners/{id}", get(get_partner))
        .route("/partners/{id}/increase-count", patch(increase_count))
        .route("/partners/{id}/decrease-count", patch(decrease_count))
}
