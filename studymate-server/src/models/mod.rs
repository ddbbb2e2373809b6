//! Domain models
//!
//! Documents are schemaless JSON objects. The only input checks are the
//! ones needed to route a request: the body is an object, the id is a
//! UUID, and the sort direction is known.

pub mod validation;
pub mod document;
pub mod partner;
pub mod partner_request;

pub use validation::ValidationError;
pub use document::{compare_values, into_document, is_truthy, Document, ID_FIELD};
pub use partner::{CountDelta, Partner, PartnerFilter, PartnerQueryParams, SortOrder};
pub use partner_request::{
    PartnerRequest, PartnerRequestUpdate, RequesterQuery, REQUESTED_AT_FIELD,
};
