//! Category repository
//!
//! Database operations for the shared category list.
//!
//! This module provides:
//! - `CategoryRepository` trait defining the interface for category data access
//! - `SqlxCategoryRepository` implementing the trait for SQLite and MySQL

use crate::db::{Backend, DynDatabasePool};
use crate::models::Category;
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{MySqlPool, Row, SqlitePool};
use std::sync::Arc;

/// Category repository trait
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// Create a new category
    async fn create(&self, name: &str) -> Result<Category>;

    /// List all categories, ordered by name
    async fn list(&self) -> Result<Vec<Category>>;

    /// The subset of `ids` that name an existing category
    async fn existing_ids(&self, ids: &[i64]) -> Result<Vec<i64>>;

    /// Delete every category (detaching them from todos)
    async fn delete_all(&self) -> Result<u64>;
}

/// SQLx-based category repository implementation
///
/// Supports both SQLite and MySQL databases.
pub struct SqlxCategoryRepository {
    pool: DynDatabasePool,
}

impl SqlxCategoryRepository {
    /// Create a new SQLx category repository
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    /// Create a boxed repository for use with dependency injection
    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn CategoryRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl CategoryRepository for SqlxCategoryRepository {
    async fn create(&self, name: &str) -> Result<Category> {
        match self.pool.backend() {
            Backend::Sqlite(pool) => create_category_sqlite(pool, name).await,
            Backend::Mysql(pool) => create_category_mysql(pool, name).await,
        }
    }

    async fn list(&self) -> Result<Vec<Category>> {
        match self.pool.backend() {
            Backend::Sqlite(pool) => list_categories_sqlite(pool).await,
            Backend::Mysql(pool) => list_categories_mysql(pool).await,
        }
    }

    async fn existing_ids(&self, ids: &[i64]) -> Result<Vec<i64>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        match self.pool.backend() {
            Backend::Sqlite(pool) => existing_category_ids_sqlite(pool, ids).await,
            Backend::Mysql(pool) => existing_category_ids_mysql(pool, ids).await,
        }
    }

    async fn delete_all(&self) -> Result<u64> {
        match self.pool.backend() {
            Backend::Sqlite(pool) => delete_all_categories_sqlite(pool).await,
            Backend::Mysql(pool) => delete_all_categories_mysql(pool).await,
        }
    }
}

// ============================================================================
// SQLite implementations
// ============================================================================

async fn create_category_sqlite(pool: &SqlitePool, name: &str) -> Result<Category> {
    let now = Utc::now();

    let result = sqlx::query("INSERT INTO categories (name, created_at, updated_at) VALUES (?, ?, ?)")
        .bind(name)
        .bind(now)
        .bind(now)
        .execute(pool)
        .await
        .context("Failed to create category")?;

    Ok(Category {
        id: result.last_insert_rowid(),
        name: name.to_string(),
        created_at: now,
        updated_at: now,
    })
}

async fn list_categories_sqlite(pool: &SqlitePool) -> Result<Vec<Category>> {
    let rows = sqlx::query("SELECT id, name, created_at, updated_at FROM categories ORDER BY name")
        .fetch_all(pool)
        .await
        .context("Failed to list categories")?;

    Ok(rows.iter().map(row_to_category_sqlite).collect())
}

async fn existing_category_ids_sqlite(pool: &SqlitePool, ids: &[i64]) -> Result<Vec<i64>> {
    let sql = format!("SELECT id FROM categories WHERE id IN ({})", id_placeholders(ids.len()));
    let mut query = sqlx::query_scalar::<_, i64>(&sql);
    for id in ids {
        query = query.bind(*id);
    }

    query
        .fetch_all(pool)
        .await
        .context("Failed to look up category ids")
}

async fn delete_all_categories_sqlite(pool: &SqlitePool) -> Result<u64> {
    let mut tx = pool.begin().await?;
    sqlx::query("DELETE FROM todo_categories")
        .execute(&mut *tx)
        .await
        .context("Failed to detach categories")?;
    let result = sqlx::query("DELETE FROM categories")
        .execute(&mut *tx)
        .await
        .context("Failed to delete categories")?;
    tx.commit().await?;

    Ok(result.rows_affected())
}

/// `?, ?, ?` for an `IN` list of `count` values
fn id_placeholders(count: usize) -> String {
    vec!["?"; count].join(", ")
}

pub(crate) fn row_to_category_sqlite(row: &sqlx::sqlite::SqliteRow) -> Category {
    Category {
        id: row.get("id"),
        name: row.get("name"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

// ============================================================================
// MySQL implementations
// ============================================================================

async fn create_category_mysql(pool: &MySqlPool, name: &str) -> Result<Category> {
    let now = Utc::now();

    let result = sqlx::query("INSERT INTO categories (name, created_at, updated_at) VALUES (?, ?, ?)")
        .bind(name)
        .bind(now)
        .bind(now)
        .execute(pool)
        .await
        .context("Failed to create category")?;

    Ok(Category {
        id: result.last_insert_id() as i64,
        name: name.to_string(),
        created_at: now,
        updated_at: now,
    })
}

async fn list_categories_mysql(pool: &MySqlPool) -> Result<Vec<Category>> {
    let rows = sqlx::query("SELECT id, name, created_at, updated_at FROM categories ORDER BY name")
        .fetch_all(pool)
        .await
        .context("Failed to list categories")?;

    Ok(rows.iter().map(row_to_category_mysql).collect())
}

async fn existing_category_ids_mysql(pool: &MySqlPool, ids: &[i64]) -> Result<Vec<i64>> {
    let sql = format!("SELECT id FROM categories WHERE id IN ({})", id_placeholders(ids.len()));
    let mut query = sqlx::query_scalar::<_, i64>(&sql);
    for id in ids {
        query = query.bind(*id);
    }

    query
        .fetch_all(pool)
        .await
        .context("Failed to look up category ids")
}

async fn delete_all_categories_mysql(pool: &MySqlPool) -> Result<u64> {
    let mut tx = pool.begin().await?;
    sqlx::query("DELETE FROM todo_categories")
        .execute(&mut *tx)
        .await
        .context("Failed to detach categories")?;
    let result = sqlx::query("DELETE FROM categories")
        .execute(&mut *tx)
        .await
        .context("Failed to delete categories")?;
    tx.commit().await?;

    Ok(result.rows_affected())
}

pub(crate) fn row_to_category_mysql(row: &sqlx::mysql::MySqlRow) -> Category {
    Category {
        id: row.get("id"),
        name: row.get("name"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_test_pool, migrations};

    async fn setup_test_repo() -> SqlxCategoryRepository {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");
        SqlxCategoryRepository::new(pool)
    }

    #[tokio::test]
    async fn test_create_category() {
        let repo = setup_test_repo().await;

        let created = repo.create("Work").await.expect("Failed to create category");
        assert!(created.id > 0);
        assert_eq!(created.name, "Work");
    }

    #[tokio::test]
    async fn test_duplicate_name_fails() {
        let repo = setup_test_repo().await;
        repo.create("Work").await.unwrap();
        assert!(repo.create("Work").await.is_err());
    }

    #[tokio::test]
    async fn test_list_is_sorted_by_name() {
        let repo = setup_test_repo().await;
        for name in ["Work", "Errands", "Health"] {
            repo.create(name).await.unwrap();
        }

        let names: Vec<String> = repo.list().await.unwrap().into_iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["Errands", "Health", "Work"]);
    }

    #[tokio::test]
    async fn test_existing_ids() {
        let repo = setup_test_repo().await;
        let work = repo.create("Work").await.unwrap();
        let health = repo.create("Health").await.unwrap();

        let mut found = repo.existing_ids(&[health.id, 404, work.id]).await.unwrap();
        found.sort_unstable();
        assert_eq!(found, vec![work.id, health.id]);
        assert!(repo.existing_ids(&[]).await.unwrap().is_empty());
        assert!(repo.existing_ids(&[404]).await.unwrap().is_empty());
    }

    #[test]
    fn test_id_placeholders() {
        assert_eq!(id_placeholders(1), "?");
        assert_eq!(id_placeholders(3), "?, ?, ?");
    }

    #[tokio::test]
    async fn test_delete_all() {
        let repo = setup_test_repo().await;
        repo.create("Work").await.unwrap();
        repo.create("Personal").await.unwrap();

        assert_eq!(repo.delete_all().await.unwrap(), 2);
        assert!(repo.list().await.unwrap().is_empty());
    }
}
