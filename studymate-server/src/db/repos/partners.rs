//! Partner repository
//!
//! - list: optional subject filter + ORDER BY experience in one query
//! - adjust count: single UPDATE, decrement guarded in the WHERE clause

use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use super::{DbError, DocumentRow, PartnerStore};
use crate::models::{CountDelta, Document, Partner, PartnerFilter};

/// Partner repository
#[derive(Clone)]
pub struct PartnerRepo {
    pool: PgPool,
}

impl PartnerRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PartnerStore for PartnerRepo {
    async fn list_partners(&self, filter: &PartnerFilter) -> Result<Vec<Partner>, DbError> {
        let order_by = match filter.sort {
            Some(sort) => format!("doc->'experience' {}, seq ASC", sort.as_sql()),
            None => "seq ASC".to_owned(),
        };

        let sql = format!(
            r#"
            SELECT id, doc
            FROM partners
            WHERE $1::text IS NULL
               OR (jsonb_typeof(doc->'subject') = 'string'
                   AND strpos(lower(doc->>'subject'), lower($1)) > 0)
            ORDER BY {}
            "#,
            order_by
        );

        let rows: Vec<DocumentRow> = sqlx::query_as(&sql)
            .bind(filter.subject.as_deref())
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Partner::from).collect())
    }

    async fn get_partner(&self, id: Uuid) -> Result<Partner, DbError> {
        let row: DocumentRow = sqlx::query_as("SELECT id, doc FROM partners WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DbError::NotFound {
                resource: "partner",
                id: id.to_string(),
            })?;

        Ok(row.into())
    }

    async fn create_partner(&self, doc: Document) -> Result<Uuid, DbError> {
        let (id,): (Uuid,) = sqlx::query_as("INSERT INTO partners (doc) VALUES ($1) RETURNING id")
            .bind(Json(doc))
            .fetch_one(&self.pool)
            .await?;

        tracing::debug!(%id, "partner created");
        Ok(id)
    }

    async fn adjust_partner_count(&self, id: Uuid, delta: CountDelta) -> Result<(), DbError> {
        let sql = match delta {
            CountDelta::Increment => {
                r#"
                UPDATE partners
                SET doc = jsonb_set(
                    doc,
                    '{partnerCount}',
                    to_jsonb(COALESCE(NULLIF(doc->'partnerCount', 'null'::jsonb)::numeric, 0) + 1)
                )
                WHERE id = $1
                "#
            }
            CountDelta::Decrement => {
                r#"
                UPDATE partners
                SET doc = jsonb_set(
                    doc,
                    '{partnerCount}',
                    to_jsonb((doc->'partnerCount')::numeric - 1)
                )
                WHERE id = $1
                  AND CASE WHEN jsonb_typeof(doc->'partnerCount') = 'number'
                           THEN (doc->'partnerCount')::numeric > 0
                           ELSE false
                      END
                "#
            }
        };

        let result = sqlx::query(sql).bind(id).execute(&self.pool).await?;

        if result.rows_affected() == 0 {
            return Err(match delta {
                CountDelta::Increment => DbError::NotFound {
                    resource: "partner",
                    id: id.to_string(),
                },
                CountDelta::Decrement => DbError::CountExhausted { id },
            });
        }

        tracing::debug!(%id, delta = delta.as_i64(), "partnerCount adjusted");
        Ok(())
    }
}
