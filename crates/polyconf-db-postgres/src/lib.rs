//! PostgreSQL storage backend for Polyconf.
//!
//! Implements the `ConfigStorage` trait over a sqlx connection pool,
//! with embedded migrations for single-binary deployment.

pub mod config;
pub mod error;
pub mod migrations;
pub mod pool;
mod queries;
pub mod storage;

pub use config::PostgresConfig;
pub use error::PostgresError;
pub use storage::PostgresStorage;
