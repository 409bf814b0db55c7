//! Connection pools
//!
//! `create_pool` opens the backend named by the configuration and hands it
//! out as a [`DynDatabasePool`]. Callers that need dialect-specific SQL
//! match on [`DatabasePool::backend`]; everything else is provided on top
//! of it.

use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::{
    mysql::{MySqlPool, MySqlPoolOptions},
    sqlite::{SqlitePool, SqlitePoolOptions},
};
use std::path::Path;
use std::sync::Arc;

use crate::config::{DatabaseConfig, DatabaseDriver};

/// Connection limit for file-backed SQLite
const SQLITE_MAX_CONNECTIONS: u32 = 20;

/// Connection limit for MySQL
const MYSQL_MAX_CONNECTIONS: u32 = 30;

/// Borrowed handle to the concrete pool behind a [`DatabasePool`].
#[derive(Debug, Clone, Copy)]
pub enum Backend<'a> {
    Sqlite(&'a SqlitePool),
    Mysql(&'a MySqlPool),
}

/// A pool for either supported backend.
///
/// Only [`backend`](DatabasePool::backend) is required.
#[async_trait]
pub trait DatabasePool: Send + Sync {
    /// The concrete pool, for dialect-specific queries
    fn backend(&self) -> Backend<'_>;

    fn driver(&self) -> DatabaseDriver {
        match self.backend() {
            Backend::Sqlite(_) => DatabaseDriver::Sqlite,
            Backend::Mysql(_) => DatabaseDriver::Mysql,
        }
    }

    fn as_sqlite(&self) -> Option<&SqlitePool> {
        match self.backend() {
            Backend::Sqlite(pool) => Some(pool),
            Backend::Mysql(_) => None,
        }
    }

    fn as_mysql(&self) -> Option<&MySqlPool> {
        match self.backend() {
            Backend::Mysql(pool) => Some(pool),
            Backend::Sqlite(_) => None,
        }
    }

    /// Run a statement that returns no rows, giving the affected row count
    async fn execute(&self, sql: &str) -> Result<u64> {
        let affected = match self.backend() {
            Backend::Sqlite(pool) => sqlx::query(sql).execute(pool).await.map(|r| r.rows_affected()),
            Backend::Mysql(pool) => sqlx::query(sql).execute(pool).await.map(|r| r.rows_affected()),
        };
        affected.with_context(|| format!("Failed to execute query: {}", sql))
    }

    /// Round-trip a trivial query
    async fn ping(&self) -> Result<()> {
        let result = match self.backend() {
            Backend::Sqlite(pool) => sqlx::query("SELECT 1").execute(pool).await.map(|_| ()),
            Backend::Mysql(pool) => sqlx::query("SELECT 1").execute(pool).await.map(|_| ()),
        };
        result.context("Database ping failed")
    }
}

/// Shared handle used by repositories and services
pub type DynDatabasePool = Arc<dyn DatabasePool>;

/// An open pool for one of the supported backends
pub enum Database {
    Sqlite(SqlitePool),
    Mysql(MySqlPool),
}

impl Database {
    /// Open a SQLite database, creating the file and its directory if
    /// needed. Foreign keys are switched on.
    pub async fn sqlite(url: &str) -> Result<Self> {
        let target = SqliteTarget::parse(url);
        if let Some(dir) = target.parent_dir() {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create database directory: {:?}", dir))?;
        }

        // Each connection to `:memory:` is a separate database, so one
        // connection has to stay open for the pool's whole life
        let options = if target.in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(SQLITE_MAX_CONNECTIONS)
        };

        let pool = options
            .connect(&target.connection_url)
            .await
            .with_context(|| format!("Failed to connect to SQLite database: {}", url))?;

        sqlx::query("PRAGMA foreign_keys = ON")
            .execute(&pool)
            .await
            .context("Failed to enable foreign keys")?;

        Ok(Database::Sqlite(pool))
    }

    /// Connect to MySQL; a bare `user@host/db` gets the `mysql://` scheme
    pub async fn mysql(url: &str) -> Result<Self> {
        let pool = MySqlPoolOptions::new()
            .max_connections(MYSQL_MAX_CONNECTIONS)
            .connect(&mysql_connection_url(url))
            .await
            .with_context(|| format!("Failed to connect to MySQL database: {}", url))?;

        Ok(Database::Mysql(pool))
    }
}

#[async_trait]
impl DatabasePool for Database {
    fn backend(&self) -> Backend<'_> {
        match self {
            Database::Sqlite(pool) => Backend::Sqlite(pool),
            Database::Mysql(pool) => Backend::Mysql(pool),
        }
    }
}

/// Where a configured SQLite url points
#[derive(Debug, PartialEq, Eq)]
struct SqliteTarget {
    connection_url: String,
    /// File path on disk, `None` for in-memory databases
    file: Option<String>,
    in_memory: bool,
}

impl SqliteTarget {
    /// Accepts a bare path, `:memory:`, or a `sqlite:` url. Urls without
    /// query options get `mode=rwc` so the file is created on first use.
    fn parse(url: &str) -> Self {
        if url == ":memory:" || url.starts_with("sqlite::memory:") {
            let connection_url = if url == ":memory:" {
                "sqlite::memory:".to_string()
            } else {
                url.to_string()
            };
            return Self {
                connection_url,
                file: None,
                in_memory: true,
            };
        }

        let rest = url.strip_prefix("sqlite:").unwrap_or(url);
        let file = rest.split('?').next().unwrap_or(rest).to_string();
        let connection_url = if rest.contains('?') {
            format!("sqlite:{}", rest)
        } else {
            format!("sqlite:{}?mode=rwc", rest)
        };

        Self {
            connection_url,
            file: Some(file),
            in_memory: false,
        }
    }

    /// Directory that must exist before the file can be created
    fn parent_dir(&self) -> Option<&Path> {
        let parent = Path::new(self.file.as_deref()?).parent()?;
        (!parent.as_os_str().is_empty()).then_some(parent)
    }
}

fn mysql_connection_url(url: &str) -> String {
    if url.starts_with("mysql://") {
        url.to_string()
    } else {
        format!("mysql://{}", url)
    }
}

/// Open the pool described by `config`
pub async fn create_pool(config: &DatabaseConfig) -> Result<DynDatabasePool> {
    let db = match config.driver {
        DatabaseDriver::Sqlite => Database::sqlite(&config.url).await?,
        DatabaseDriver::Mysql => Database::mysql(&config.url).await?,
    };
    Ok(Arc::new(db))
}

/// A fresh in-memory SQLite pool for tests
pub async fn create_test_pool() -> Result<DynDatabasePool> {
    let config = DatabaseConfig {
        driver: DatabaseDriver::Sqlite,
        url: ":memory:".to_string(),
    };
    create_pool(&config).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sqlite_target_parsing() {
        let memory = SqliteTarget::parse(":memory:");
        assert!(memory.in_memory);
        assert_eq!(memory.connection_url, "sqlite::memory:");
        assert_eq!(memory.parent_dir(), None);

        let bare = SqliteTarget::parse("data/tasknest.db");
        assert!(!bare.in_memory);
        assert_eq!(bare.connection_url, "sqlite:data/tasknest.db?mode=rwc");
        assert_eq!(bare.parent_dir(), Some(Path::new("data")));

        let with_options = SqliteTarget::parse("sqlite:db/app.db?mode=ro");
        assert_eq!(with_options.connection_url, "sqlite:db/app.db?mode=ro");
        assert_eq!(with_options.file.as_deref(), Some("db/app.db"));

        assert_eq!(SqliteTarget::parse("app.db").parent_dir(), None);
    }

    #[test]
    fn test_mysql_connection_url() {
        assert_eq!(mysql_connection_url("root@localhost/todos"), "mysql://root@localhost/todos");
        assert_eq!(mysql_connection_url("mysql://db/todos"), "mysql://db/todos");
    }

    #[tokio::test]
    async fn test_in_memory_pool_keeps_its_data() {
        let pool = create_test_pool().await.expect("Failed to create pool");
        assert_eq!(pool.driver(), DatabaseDriver::Sqlite);
        assert!(pool.as_mysql().is_none());
        pool.ping().await.expect("Ping should succeed");

        pool.execute("CREATE TABLE notes (id INTEGER PRIMARY KEY, body TEXT)")
            .await
            .expect("Failed to create table");
        let affected = pool
            .execute("INSERT INTO notes (body) VALUES ('a'), ('b')")
            .await
            .expect("Failed to insert");
        assert_eq!(affected, 2);

        // Later statements see the same database
        assert_eq!(pool.execute("DELETE FROM notes").await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_foreign_keys_enforced() {
        let pool = create_test_pool().await.unwrap();
        pool.execute("CREATE TABLE parent (id INTEGER PRIMARY KEY)").await.unwrap();
        pool.execute("CREATE TABLE child (parent_id INTEGER REFERENCES parent(id))")
            .await
            .unwrap();

        assert!(pool.execute("INSERT INTO child VALUES (7)").await.is_err());
    }

    #[tokio::test]
    async fn test_sqlite_file_in_nested_directory() {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let db_path = temp_dir.path().join("nested").join("dir").join("test.db");

        let config = DatabaseConfig {
            driver: DatabaseDriver::Sqlite,
            url: db_path.to_string_lossy().to_string(),
        };
        let pool = create_pool(&config).await.expect("Failed to create pool");
        pool.ping().await.expect("Ping should succeed");

        assert!(db_path.exists());
    }

    #[tokio::test]
    #[ignore = "Requires MySQL server"]
    async fn test_mysql_pool_ping() {
        let url = std::env::var("MYSQL_TEST_URL")
            .unwrap_or_else(|_| "mysql://root@localhost/test".to_string());
        let config = DatabaseConfig {
            driver: DatabaseDriver::Mysql,
            url,
        };

        let pool = create_pool(&config).await.expect("Failed to create pool");
        assert_eq!(pool.driver(), DatabaseDriver::Mysql);
        pool.ping().await.expect("Ping should succeed");
    }
}
