//! Storage layer - connection pool, migrations, and repositories
//!
//! # Design Principles
//!
//! - Documents live in a single JSONB column per collection
//! - Every mutation is one statement; conditional updates go in the WHERE clause
//! - Handlers only see the `PartnerStore` / `PartnerRequestStore` traits

pub mod memory;
pub mod migrations;
pub mod pool;
pub mod repos;

pub use memory::MemoryStore;
pub use pool::connect;
pub use repos::*;
