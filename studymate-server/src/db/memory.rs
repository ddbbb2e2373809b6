//! In-memory implementation of both stores for development and testing
//!
//! Mirrors the PostgreSQL repositories: same filter, same ordering, and
//! conditional counter updates applied under a single write lock.

use async_trait::async_trait;
use chrono::Utc;
use serde_json::{json, Number, Value as JsonValue};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{DbError, PartnerRequestStore, PartnerStore};
use crate::models::partner::{EXPERIENCE_FIELD, PARTNER_COUNT_FIELD};
use crate::models::partner_request::{stamp_requested_at, REQUESTED_BY_FIELD};
use crate::models::{
    compare_values, CountDelta, Document, Partner, PartnerFilter, PartnerRequest, SortOrder,
};

/// Both collections, each kept in insertion order
#[derive(Debug, Default)]
pub struct MemoryStore {
    partners: RwLock<Vec<(Uuid, Document)>>,
    requests: RwLock<Vec<(Uuid, Document)>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Integer arithmetic while it fits in i64, float beyond that.
fn add_to_number(n: &Number, delta: i64) -> JsonValue {
    match n.as_i64().and_then(|i| i.checked_add(delta)) {
        Some(sum) => json!(sum),
        None => json!(n.as_f64().unwrap_or(0.0) + delta as f64),
    }
}

fn is_positive(value: Option<&JsonValue>) -> bool {
    value
        .and_then(|v| v.as_f64())
        .map(|f| f > 0.0)
        .unwrap_or(false)
}

#[async_trait]
impl PartnerStore for MemoryStore {
    async fn list_partners(&self, filter: &PartnerFilter) -> Result<Vec<Partner>, DbError> {
        let partners = self.partners.read().await;

        let mut matched: Vec<Partner> = partners
            .iter()
            .filter(|(_, doc)| filter.matches_subject(doc))
            .map(|(id, doc)| Partner {
                id: *id,
                fields: doc.clone(),
            })
            .collect();

        // Stable sort keeps insertion order for ties
        if let Some(sort) = filter.sort {
            matched.sort_by(|a, b| {
                let ord = compare_values(
                    a.fields.get(EXPERIENCE_FIELD),
                    b.fields.get(EXPERIENCE_FIELD),
                );
                match sort {
                    SortOrder::Asc => ord,
                    SortOrder::Desc => ord.reverse(),
                }
            });
        }

        Ok(matched)
    }

    async fn get_partner(&self, id: Uuid) -> Result<Partner, DbError> {
        self.partners
            .read()
            .await
            .iter()
            .find(|(pid, _)| *pid == id)
            .map(|(id, doc)| Partner {
                id: *id,
                fields: doc.clone(),
            })
            .ok_or_else(|| DbError::NotFound {
                resource: "partner",
                id: id.to_string(),
            })
    }

    async fn create_partner(&self, doc: Document) -> Result<Uuid, DbError> {
        let id = Uuid::new_v4();
        self.partners.write().await.push((id, doc));
        Ok(id)
    }

    async fn adjust_partner_count(&self, id: Uuid, delta: CountDelta) -> Result<(), DbError> {
        let mut partners = self.partners.write().await;

        let Some((_, doc)) = partners.iter_mut().find(|(pid, _)| *pid == id) else {
            return Err(match delta {
                CountDelta::Increment => DbError::NotFound {
                    resource: "partner",
                    id: id.to_string(),
                },
                CountDelta::Decrement => DbError::CountExhausted { id },
            });
        };

        let current = doc.get(PARTNER_COUNT_FIELD);
        let next = match delta {
            CountDelta::Increment => match current {
                None | Some(JsonValue::Null) => json!(1),
                Some(JsonValue::Number(n)) => add_to_number(n, 1),
                Some(_) => {
                    return Err(DbError::TypeMismatch {
                        field: PARTNER_COUNT_FIELD,
                    })
                }
            },
            CountDelta::Decrement => match current {
                Some(JsonValue::Number(n)) if is_positive(current) => add_to_number(n, -1),
                _ => return Err(DbError::CountExhausted { id }),
            },
        };

        doc.insert(PARTNER_COUNT_FIELD.to_owned(), next);
        Ok(())
    }
}

#[async_trait]
impl PartnerRequestStore for MemoryStore {
    async fn create_request(&self, mut doc: Document) -> Result<Uuid, DbError> {
        stamp_requested_at(&mut doc, Utc::now());
        let id = Uuid::new_v4();
        self.requests.write().await.push((id, doc));
        Ok(id)
    }

    async fn list_requests_by_requester(
        &self,
        email: &str,
    ) -> Result<Vec<PartnerRequest>, DbError> {
        let requests = self.requests.read().await;

        Ok(requests
            .iter()
            .filter(|(_, doc)| doc.get(REQUESTED_BY_FIELD).and_then(|v| v.as_str()) == Some(email))
            .map(|(id, doc)| PartnerRequest {
                id: *id,
                fields: doc.clone(),
            })
            .collect())
    }

    async fn update_request(&self, id: Uuid, fields: Document) -> Result<Document, DbError> {
        let mut requests = self.requests.write().await;

        let (_, doc) = requests
            .iter_mut()
            .find(|(rid, _)| *rid == id)
            .ok_or_else(|| DbError::NotFound {
                resource: "partner request",
                id: id.to_string(),
            })?;

        for (key, value) in &fields {
            doc.insert(key.clone(), value.clone());
        }

        Ok(fields)
    }

    async fn delete_request(&self, id: Uuid) -> Result<(), DbError> {
        let mut requests = self.requests.write().await;
        let before = requests.len();
        requests.retain(|(rid, _)| *rid != id);

        if requests.len() == before {
            return Err(DbError::NotFound {
                resource: "partner request",
                id: id.to_string(),
            });
        }

        Ok(())
    }
}
