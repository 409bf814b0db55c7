//! Database layer
//!
//! Storage for Tasknest. Two backends are supported:
//! - SQLite (default, single-file deployment)
//! - MySQL
//!
//! The driver is selected from configuration. Everything above this module
//! talks to the trait object `DynDatabasePool`; repositories match on
//! [`Backend`] to run dialect-specific SQL.
//!
//! # Usage
//!
//! ```ignore
//! use tasknest::config::DatabaseConfig;
//! use tasknest::db::{create_pool, migrations};
//!
//! let pool = create_pool(&DatabaseConfig::default()).await?;
//! migrations::run_migrations(&pool).await?;
//! pool.ping().await?;
//! ```

pub mod migrations;
pub mod pool;
pub mod repositories;

pub use pool::{create_pool, create_test_pool, Backend, Database, DatabasePool, DynDatabasePool};

/// Whether `err` was caused by a unique constraint rejecting a write.
///
/// Repositories wrap driver errors in `anyhow` context, so the whole chain
/// is searched for the underlying `sqlx::Error`.
pub fn is_unique_violation(err: &anyhow::Error) -> bool {
    err.chain().any(|cause| {
        matches!(
            cause.downcast_ref::<sqlx::Error>(),
            Some(sqlx::Error::Database(db)) if db.is_unique_violation()
        )
    })
}
