//! Partner request endpoints

use std::sync::Arc;

use axum::{
    extract::State,
    routing::{get, patch},
    Json, Router,
};
use serde::Serialize;
use serde_json::Value as JsonValue;

use super::{InsertedResponse, SuccessResponse};
use crate::http::error::ApiError;
use crate::http::extractors::{JsonBody, JsonBodyOrDefault, QueryParams, ValidUuid};
use crate::http::server::AppState;
use crate::models::{into_document, Document, PartnerRequest, PartnerRequestUpdate, RequesterQuery};

/// PATCH response listing the fields that were written
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatedResponse {
    pub success: bool,
    pub updated_fields: Document,
}

/// POST /partner-requests - create a request stamped with `requestedAt`
async fn create_request(
    State(state): State<Arc<AppState>>,
    JsonBody(body): JsonBody<JsonValue>,
) -> Result<Json<InsertedResponse>, ApiError> {
    let doc = into_document(body)?;
    let id = state.requests.create_request(doc).await?;

    tracing::info!(%id, "partner request created");
    Ok(Json(InsertedResponse::new(id)))
}

/// GET /partner-requests?email= - requests made by one user
///
/// Without an email this returns an empty list rather than every request.
async fn list_requests(
    State(state): State<Arc<AppState>>,
    QueryParams(query): QueryParams<RequesterQuery>,
) -> Result<Json<Vec<PartnerRequest>>, ApiError> {
    let Some(email) = query.email() else {
        return Ok(Json(Vec::new()));
    };

    let requests = state.requests.list_requests_by_requester(email).await?;
    Ok(Json(requests))
}

/// PATCH /partner-requests/{id} - update partnerName/subject/studyMode
///
/// An absent body is an empty update.
async fn update_request(
    State(state): State<Arc<AppState>>,
    ValidUuid(id): ValidUuid,
    JsonBodyOrDefault(update): JsonBodyOrDefault<PartnerRequestUpdate>,
) -> Result<Json<UpdatedResponse>, ApiError> {
    let fields = update.applicable_fields();
    let updated_fields = state.requests.update_request(id, fields).await?;

    tracing::debug!(%id, fields = updated_fields.len(), "partner request updated");
    Ok(Json(UpdatedResponse {
        success: true,
        updated_fields,
    }))
}

/// DELETE /partner-requests/{id}
async fn delete_request(
    State(state): State<Arc<AppState>>,
    ValidUuid(id): ValidUuid,
) -> Result<Json<SuccessResponse>, ApiError> {
    state.requests.delete_request(id).await?;

    tracing::info!(%id, "partner request deleted");
    Ok(Json(SuccessResponse::ok()))
}

/// Partner request routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/partner-requests", get(list_requests).post(create_request))
        .route(
            "/partner-requests/{id}",
            patch(update_request).delete(delete_request),
        )
}
