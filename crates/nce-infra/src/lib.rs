//! # NCE Infrastructure
//!
//! Concrete implementations of the ports defined in `nce-core`.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - No external dependencies, in-memory only
//! - `postgres` - PostgreSQL storage via SeaORM

pub mod database;

pub use database::{DatabaseConfig, InMemoryErrorRecordRepository};

#[cfg(feature = "postgres")]
pub use database::PostgresErrorRecordRepository;
