//! studymate-server: HTTP API for study-partner matching
//!
//! Exposes partner and partner-request documents over REST, stored in
//! PostgreSQL JSONB columns or in process memory.

pub mod config;
pub mod db;
pub mod http;
pub mod models;

pub use config::DatabaseConfig;
pub use http::{build_router, run_server, AppState, ServerConfig, ServerError};
