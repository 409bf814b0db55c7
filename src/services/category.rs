//! Category service
//!
//! The category list is shared by every user and read on most todo pages,
//! so it is cached. Categories are only written by the seed tool, which
//! runs in another process, so the cache is never trusted for checks.

use crate::cache::{CacheLayer, MemoryCache};
use crate::db::repositories::CategoryRepository;
use crate::models::Category;
use anyhow::Context;
use std::sync::Arc;

/// Cache key for the full category list
const CATEGORY_LIST_KEY: &str = "categories:all";

/// Error types for category operations
#[derive(Debug, thiserror::Error)]
pub enum CategoryError {
    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

/// Category service
pub struct CategoryService {
    repo: Arc<dyn CategoryRepository>,
    cache: Arc<MemoryCache>,
}

impl CategoryService {
    pub fn new(repo: Arc<dyn CategoryRepository>, cache: Arc<MemoryCache>) -> Self {
        Self { repo, cache }
    }

    /// All categories ordered by name, served from cache when possible
    pub async fn list(&self) -> Result<Vec<Category>, CategoryError> {
        match self.cache.get::<Vec<Category>>(CATEGORY_LIST_KEY).await {
            Ok(Some(categories)) => return Ok(categories),
            Ok(None) => {}
            Err(e) => tracing::warn!("Ignoring unreadable category cache entry: {}", e),
        }

        let categories = self.repo.list().await.context("Failed to list categories")?;

        if let Err(e) = self
            .cache
            .set(CATEGORY_LIST_KEY, &categories, self.cache.default_ttl())
            .await
        {
            tracing::warn!("Failed to cache category list: {}", e);
        }

        Ok(categories)
    }

    /// Ids from `ids` that do not name an existing category.
    ///
    /// Always answered from the database: a stale cached list would let a
    /// deleted id through to the foreign key and reject a fresh one.
    pub async fn unknown_ids(&self, ids: &[i64]) -> Result<Vec<i64>, CategoryError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let known = self
            .repo
            .existing_ids(ids)
            .await
            .context("Failed to look up categories")?;
        Ok(ids
            .iter()
            .copied()
            .filter(|id| !known.contains(id))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::SqlxCategoryRepository;
    use crate::db::{create_test_pool, migrations};

    async fn setup_test_service() -> (Arc<dyn CategoryRepository>, CategoryService) {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");
        let repo = SqlxCategoryRepository::boxed(pool);
        let service = CategoryService::new(repo.clone(), Arc::new(MemoryCache::new()));
        (repo, service)
    }

    #[tokio::test]
    async fn test_list_is_sorted_and_cached() {
        let (repo, service) = setup_test_service().await;
        repo.create("Work").await.unwrap();
        repo.create("Health").await.unwrap();

        let names: Vec<String> = service.list().await.unwrap().into_iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["Health", "Work"]);

        // Written behind the service's back: the cached list is still served
        repo.create("Hidden").await.unwrap();
        assert_eq!(service.list().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_unknown_ids() {
        let (repo, service) = setup_test_service().await;
        let work = repo.create("Work").await.unwrap();

        assert!(service.unknown_ids(&[]).await.unwrap().is_empty());
        assert!(service.unknown_ids(&[work.id]).await.unwrap().is_empty());
        assert_eq!(service.unknown_ids(&[work.id, 999]).await.unwrap(), vec![999]);
    }

    #[tokio::test]
    async fn test_unknown_ids_ignores_stale_cache() {
        let (repo, service) = setup_test_service().await;
        let old = repo.create("Work").await.unwrap();
        assert_eq!(service.list().await.unwrap().len(), 1);

        // Reseeded elsewhere while the list sits in cache
        repo.delete_all().await.unwrap();
        let fresh = repo.create("Work").await.unwrap();
        assert_ne!(old.id, fresh.id);

        assert!(service.unknown_ids(&[fresh.id]).await.unwrap().is_empty());
        assert_eq!(service.unknown_ids(&[old.id]).await.unwrap(), vec![old.id]);
    }
}
