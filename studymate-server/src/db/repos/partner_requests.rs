//! Partner request repository
//!
//! Partial updates use `doc || $2`, a shallow merge of the applied fields.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use super::{DbError, DocumentRow, PartnerRequestStore};
use crate::models::partner_request::stamp_requested_at;
use crate::models::{Document, PartnerRequest};

/// Partner request repository
#[derive(Clone)]
pub struct PartnerRequestRepo {
    pool: PgPool,
}

impl PartnerRequestRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn not_found(id: Uuid) -> DbError {
        DbError::NotFound {
            resource: "partner request",
            id: id.to_string(),
        }
    }
}

#[async_trait]
impl PartnerRequestStore for PartnerRequestRepo {
    async fn create_request(&self, mut doc: Document) -> Result<Uuid, DbError> {
        stamp_requested_at(&mut doc, Utc::now());

        let (id,): (Uuid,) =
            sqlx::query_as("INSERT INTO partner_requests (doc) VALUES ($1) RETURNING id")
                .bind(Json(doc))
                .fetch_one(&self.pool)
                .await?;

        tracing::debug!(%id, "partner request created");
        Ok(id)
    }

    async fn list_requests_by_requester(
        &self,
        email: &str,
    ) -> Result<Vec<PartnerRequest>, DbError> {
        let rows: Vec<DocumentRow> = sqlx::query_as(
            r#"
            SELECT id, doc
            FROM partner_requests
            WHERE jsonb_typeof(doc->'requestedBy') = 'string'
              AND doc->>'requestedBy' = $1
            ORDER BY seq ASC
            "#,
        )
        .bind(email)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(PartnerRequest::from).collect())
    }

    async fn update_request(&self, id: Uuid, fields: Document) -> Result<Document, DbError> {
        if fields.is_empty() {
            let (exists,): (bool,) =
                sqlx::query_as("SELECT EXISTS(SELECT 1 FROM partner_requests WHERE id = $1)")
                    .bind(id)
                    .fetch_one(&self.pool)
                    .await?;

            return if exists {
                Ok(fields)
            } else {
                Err(Self::not_found(id))
            };
        }

        let result = sqlx::query("UPDATE partner_requests SET doc = doc || $2 WHERE id = $1")
            .bind(id)
            .bind(Json(&fields))
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(Self::not_found(id));
        }

        Ok(fields)
    }

    async fn delete_request(&self, id: Uuid) -> Result<(), DbError> {
        let result = sqlx::query("DELETE FROM partner_requests WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(Self::not_found(id));
        }

        Ok(())
    }
}
