//! Route handlers organized by resource

pub mod health;
pub mod partners;
pub mod partner_requests;

use serde::Serialize;
use uuid::Uuid;

/// `{success, insertedId}` returned by both create endpoints
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertedResponse {
    pub success: bool,
    pub inserted_id: Uuid,
}

impl InsertedResponse {
    pub fn new(inserted_id: Uuid) -> Self {
        Self {
            success: true,
            inserted_id,
        }
    }
}

/// `{success: true}`
#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    pub fn ok() -> Self {
        Self { success: true }
    }
}
