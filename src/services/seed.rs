//! Demo data seeding
//!
//! Wipes todos, users and categories, then loads a fixed set of demo
//! accounts, each with three todos tagged with randomly chosen categories.

use crate::db::repositories::{
    CategoryRepository, SqlxCategoryRepository, SqlxTodoRepository, SqlxUserRepository,
    TodoRepository, UserRepository,
};
use crate::db::DynDatabasePool;
use crate::models::{Category, CreateTodoInput, User};
use crate::services::password::hash_password;
use anyhow::{Context, Result};
use rand::seq::index;
use rand::Rng;
use std::sync::Arc;

/// Categories created by the seed
pub const SEED_CATEGORIES: [&str; 5] = ["Work", "Personal", "Health", "Errands", "Learning"];

/// Demo accounts as (name, email, password)
pub const SEED_USERS: [(&str, &str, &str); 3] = [
    ("Alice", "alice@example.com", "password123"),
    ("Bob", "bob@example.com", "password456"),
    ("Charlie", "charlie@example.com", "password789"),
];

/// Per-todo (ordinal, min categories, max categories)
const SEED_TODOS: [(&str, usize, usize); 3] = [("first", 1, 2), ("second", 1, 3), ("third", 2, 3)];

/// What a seed run created
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
    pub categories: usize,
    pub users: usize,
    pub todos: usize,
}

/// Loads the demo data set
pub struct Seeder {
    users: Arc<dyn UserRepository>,
    categories: Arc<dyn CategoryRepository>,
    todos: Arc<dyn TodoRepository>,
}

impl Seeder {
    pub fn new(pool: DynDatabasePool) -> Self {
        Self {
            users: SqlxUserRepository::boxed(pool.clone()),
            categories: SqlxCategoryRepository::boxed(pool.clone()),
            todos: SqlxTodoRepository::boxed(pool),
        }
    }

    /// Replace all data with the demo set
    pub async fn run<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<SeedReport> {
        self.clear().await?;

        let mut categories = Vec::with_capacity(SEED_CATEGORIES.len());
        for name in SEED_CATEGORIES {
            let category = self
                .categories
                .create(name)
                .await
                .with_context(|| format!("Failed to create category {}", name))?;
            categories.push(category);
        }

        let mut report = SeedReport {
            categories: categories.len(),
            users: 0,
            todos: 0,
        };

        for (name, email, password) in SEED_USERS {
            let hash = hash_password(password)?;
            let user = self
                .users
                .create(&User::new(name.to_string(), email.to_string(), hash))
                .await
                .with_context(|| format!("Failed to create user {}", email))?;
            report.users += 1;

            for (ordinal, min, max) in SEED_TODOS {
                let input = CreateTodoInput {
                    title: format!("{}'s {} todo", name, ordinal),
                    description: Some(format!("This is the {} todo", ordinal)),
                    category_ids: pick_categories(rng, &categories, min, max),
                };
                self.todos
                    .create(user.id, &input)
                    .await
                    .with_context(|| format!("Failed to create todo for {}", email))?;
                report.todos += 1;
            }
        }

        tracing::info!(
            categories = report.categories,
            users = report.users,
            todos = report.todos,
            "Database has been seeded"
        );
        Ok(report)
    }

    async fn clear(&self) -> Result<()> {
        let todos = self.todos.delete_all().await?;
        let users = self.users.delete_all().await?;
        let categories = self.categories.delete_all().await?;
        tracing::debug!(todos, users, categories, "Cleared existing data");
        Ok(())
    }
}

/// Between `min` and `max` distinct categories, chosen at random
fn pick_categories<R: Rng + ?Sized>(
    rng: &mut R,
    categories: &[Category],
    min: usize,
    max: usize,
) -> Vec<i64> {
    let max = max.min(categories.len());
    let min = min.min(max);
    let count = rng.gen_range(min..=max);

    index::sample(rng, categories.len(), count)
        .iter()
        .map(|i| categories[i].id)
        .collect()
}
