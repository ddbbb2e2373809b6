//! Partner request documents and partial updates

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use uuid::Uuid;

use super::{is_truthy, Document};

/// Server-stamped creation time
pub const REQUESTED_AT_FIELD: &str = "requestedAt";

/// Exact-match lookup key for listing
pub const REQUESTED_BY_FIELD: &str = "requestedBy";

/// A stored partner request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PartnerRequest {
    #[serde(rename = "_id")]
    pub id: Uuid,
    #[serde(flatten)]
    pub fields: Document,
}

/// Stamp a new request document with its creation time.
///
/// Overwrites any caller-supplied `requestedAt`.
pub fn stamp_requested_at(doc: &mut Document, now: DateTime<Utc>) {
    doc.insert(
        REQUESTED_AT_FIELD.to_owned(),
        JsonValue::String(now.to_rfc3339_opts(SecondsFormat::Millis, true)),
    );
}

/// PATCH body for a partner request.
///
/// Only these three fields are updatable. Values are kept as raw JSON so
/// falsy values of any type can be skipped rather than rejected.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartnerRequestUpdate {
    pub partner_name: Option<JsonValue>,
    pub subject: Option<JsonValue>,
    pub study_mode: Option<JsonValue>,
}

impl PartnerRequestUpdate {
    /// Fields that will actually be written: present and truthy.
    pub fn applicable_fields(&self) -> Document {
        let candidates = [
            ("partnerName", &self.partner_name),
            ("subject", &self.subject),
            ("studyMode", &self.study_mode),
        ];

        candidates
            .into_iter()
            .filter_map(|(name, value)| {
                value
                    .as_ref()
                    .filter(|v| is_truthy(v))
                    .map(|v| (name.to_owned(), v.clone()))
            })
            .collect()
    }
}

/// Query string for `GET /partner-requests`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RequesterQuery {
    pub email: Option<String>,
}

impl RequesterQuery {
    /// The requester email, if one was given and non-empty.
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref().filter(|e| !e.is_empty())
    }
}
