//! Repository traits and their PostgreSQL implementations
//!
//! Each collection is a table of `(id, seq, doc)` rows where `doc` holds the
//! caller's JSON object. `seq` preserves insertion order for unsorted lists.

pub mod partners;
pub mod partner_requests;

use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::{CountDelta, Document, Partner, PartnerFilter, PartnerRequest};

pub use partner_requests::PartnerRequestRepo;
pub use partners::PartnerRepo;

/// Database error type
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("not found: {resource} '{id}'")]
    NotFound { resource: &'static str, id: String },

    /// Conditional decrement matched nothing: missing record or count at zero
    #[error("not found or partnerCount already zero: partner '{id}'")]
    CountExhausted { id: Uuid },

    #[error("field '{field}' holds a non-numeric value")]
    TypeMismatch { field: &'static str },
}

/// Access to the `partners` collection
#[async_trait]
pub trait PartnerStore: Send + Sync {
    /// List partners matching the filter, sorted if requested.
    async fn list_partners(&self, filter: &PartnerFilter) -> Result<Vec<Partner>, DbError>;

    /// Fetch one partner.
    async fn get_partner(&self, id: Uuid) -> Result<Partner, DbError>;

    /// Insert a partner document as-is and return its new id.
    async fn create_partner(&self, doc: Document) -> Result<Uuid, DbError>;

    /// Atomically add `delta` to `partnerCount`.
    ///
    /// Decrement only applies while the count is positive.
    async fn adjust_partner_count(&self, id: Uuid, delta: CountDelta) -> Result<(), DbError>;
}

/// Access to the `partner_requests` collection
#[async_trait]
pub trait PartnerRequestStore: Send + Sync {
    /// Insert a request stamped with `requestedAt` and return its new id.
    async fn create_request(&self, doc: Document) -> Result<Uuid, DbError>;

    /// All requests whose `requestedBy` equals `email` exactly.
    async fn list_requests_by_requester(&self, email: &str)
        -> Result<Vec<PartnerRequest>, DbError>;

    /// Merge `fields` into the stored request and return what was applied.
    async fn update_request(&self, id: Uuid, fields: Document) -> Result<Document, DbError>;

    /// Remove a request.
    async fn delete_request(&self, id: Uuid) -> Result<(), DbError>;
}

/// Raw `(id, doc)` row shared by both collections
#[derive(Debug, FromRow)]
pub(crate) struct DocumentRow {
    pub id: Uuid,
    pub doc: Json<Document>,
}

impl From<DocumentRow> for Partner {
    fn from(row: DocumentRow) -> Self {
        Self {
            id: row.id,
            fields: row.doc.0,
        }
    }
}

impl From<DocumentRow> for PartnerRequest {
    fn from(row: DocumentRow) -> Self {
        Self {
            id: row.id,
            fields: row.doc.0,
        }
    }
}
