//! Partner documents and list filters

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Document, ValidationError};

/// Field matched by the subject filter
pub const SUBJECT_FIELD: &str = "subject";

/// Field used for sorting
pub const EXPERIENCE_FIELD: &str = "experience";

/// Counter adjusted by the increase/decrease endpoints
pub const PARTNER_COUNT_FIELD: &str = "partnerCount";

/// A stored partner: identifier plus the caller-supplied fields
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Partner {
    #[serde(rename = "_id")]
    pub id: Uuid,
    #[serde(flatten)]
    pub fields: Document,
}

/// Sort direction for `experience`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    /// Parse `asc` or `desc` (case-insensitive).
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        match s.to_ascii_lowercase().as_str() {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            _ => Err(ValidationError::InvalidVariant {
                field: "sort",
                value: s.to_owned(),
            }),
        }
    }

    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::Asc => "ASC NULLS FIRST",
            Self::Desc => "DESC NULLS LAST",
        }
    }
}

/// Query string for `GET /partners`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PartnerQueryParams {
    pub subject: Option<String>,
    pub sort: Option<String>,
}

/// Validated partner list filter
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartnerFilter {
    /// Case-insensitive substring of `subject`
    pub subject: Option<String>,
    /// Order by `experience`; insertion order when absent
    pub sort: Option<SortOrder>,
}

impl PartnerFilter {
    /// Whether a partner's `subject` satisfies the filter.
    pub fn matches_subject(&self, doc: &Document) -> bool {
        let Some(needle) = &self.subject else {
            return true;
        };

        doc.get(SUBJECT_FIELD)
            .and_then(|v| v.as_str())
            .map(|subject| subject.to_lowercase().contains(&needle.to_lowercase()))
            .unwrap_or(false)
    }
}

impl TryFrom<PartnerQueryParams> for PartnerFilter {
    type Error = ValidationError;

    fn try_from(params: PartnerQueryParams) -> Result<Self, Self::Error> {
        let subject = params.subject.filter(|s| !s.is_empty());
        let sort = match params.sort.as_deref() {
            None | Some("") => None,
            Some(s) => Some(SortOrder::parse(s)?),
        };

        Ok(Self { subject, sort })
    }
}

/// Direction of a `partnerCount` adjustment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountDelta {
    Increment,
    Decrement,
}

impl CountDelta {
    pub fn as_i64(&self) -> i64 {
        match self {
            Self::Increment => 1,
            Self::Decrement => -1,
        }
    }
}
