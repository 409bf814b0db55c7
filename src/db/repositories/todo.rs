//! Todo repository
//!
//! Database operations for todos and their category links.
//!
//! Every read and write except the maintenance helpers is scoped by the
//! owning user's id, so a todo that belongs to someone else looks exactly
//! like a missing one.

use super::category::{row_to_category_mysql, row_to_category_sqlite};
use crate::db::{Backend, DynDatabasePool};
use crate::models::{Category, CreateTodoInput, Todo, UpdateTodoInput};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{MySql, MySqlPool, Row, Sqlite, SqlitePool, Transaction};
use std::collections::HashMap;
use std::sync::Arc;

/// Todo repository trait
#[async_trait]
pub trait TodoRepository: Send + Sync {
    /// Create a todo for `user_id` and attach the given categories
    async fn create(&self, user_id: i64, input: &CreateTodoInput) -> Result<Todo>;

    /// List a user's todos with their categories, oldest first
    async fn list_by_user(&self, user_id: i64) -> Result<Vec<Todo>>;

    /// Get a todo if it exists and belongs to `user_id`
    async fn get_for_user(&self, id: i64, user_id: i64) -> Result<Option<Todo>>;

    /// Replace a todo's fields and category set.
    ///
    /// Returns `None` when the todo does not exist or belongs to another user.
    async fn update(&self, id: i64, user_id: i64, input: &UpdateTodoInput)
        -> Result<Option<Todo>>;

    /// Set the completion flag. Returns `false` when nothing matched.
    async fn set_completed(&self, id: i64, user_id: i64, completed: bool) -> Result<bool>;

    /// Delete a todo. Returns `false` when nothing matched.
    async fn delete_for_user(&self, id: i64, user_id: i64) -> Result<bool>;

    /// Delete every todo
    async fn delete_all(&self) -> Result<u64>;
}

/// SQLx-based todo repository implementation
///
/// Supports both SQLite and MySQL databases.
pub struct SqlxTodoRepository {
    pool: DynDatabasePool,
}

impl SqlxTodoRepository {
    /// Create a new SQLx todo repository
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    /// Create a boxed repository for use with dependency injection
    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn TodoRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl TodoRepository for SqlxTodoRepository {
    async fn create(&self, user_id: i64, input: &CreateTodoInput) -> Result<Todo> {
        match self.pool.backend() {
            Backend::Sqlite(pool) => create_todo_sqlite(pool, user_id, input).await,
            Backend::Mysql(pool) => create_todo_mysql(pool, user_id, input).await,
        }
    }

    async fn list_by_user(&self, user_id: i64) -> Result<Vec<Todo>> {
        match self.pool.backend() {
            Backend::Sqlite(pool) => list_todos_sqlite(pool, user_id).await,
            Backend::Mysql(pool) => list_todos_mysql(pool, user_id).await,
        }
    }

    async fn get_for_user(&self, id: i64, user_id: i64) -> Result<Option<Todo>> {
        match self.pool.backend() {
            Backend::Sqlite(pool) => get_todo_sqlite(pool, id, user_id).await,
            Backend::Mysql(pool) => get_todo_mysql(pool, id, user_id).await,
        }
    }

    async fn update(
        &self,
        id: i64,
        user_id: i64,
        input: &UpdateTodoInput,
    ) -> Result<Option<Todo>> {
        match self.pool.backend() {
            Backend::Sqlite(pool) => update_todo_sqlite(pool, id, user_id, input).await,
            Backend::Mysql(pool) => update_todo_mysql(pool, id, user_id, input).await,
        }
    }

    async fn set_completed(&self, id: i64, user_id: i64, completed: bool) -> Result<bool> {
        match self.pool.backend() {
            Backend::Sqlite(pool) => set_completed_sqlite(pool, id, user_id, completed).await,
            Backend::Mysql(pool) => set_completed_mysql(pool, id, user_id, completed).await,
        }
    }

    async fn delete_for_user(&self, id: i64, user_id: i64) -> Result<bool> {
        match self.pool.backend() {
            Backend::Sqlite(pool) => delete_todo_sqlite(pool, id, user_id).await,
            Backend::Mysql(pool) => delete_todo_mysql(pool, id, user_id).await,
        }
    }

    async fn delete_all(&self) -> Result<u64> {
        match self.pool.backend() {
            Backend::Sqlite(pool) => delete_all_todos_sqlite(pool).await,
            Backend::Mysql(pool) => delete_all_todos_mysql(pool).await,
        }
    }
}

const SELECT_TODO: &str =
    "SELECT id, title, description, completed, user_id, created_at, updated_at FROM todos";

const SELECT_TODO_CATEGORIES: &str = r#"
    SELECT tc.todo_id AS todo_id, c.id AS id, c.name AS name,
           c.created_at AS created_at, c.updated_at AS updated_at
    FROM todo_categories tc
    INNER JOIN categories c ON c.id = tc.category_id
    INNER JOIN todos t ON t.id = tc.todo_id
"#;

/// Sorted, duplicate-free copy of the requested category ids
fn unique_ids(ids: &[i64]) -> Vec<i64> {
    let mut ids = ids.to_vec();
    ids.sort_unstable();
    ids.dedup();
    ids
}

/// Attach categories to their todos, keeping todo order
fn attach(mut todos: Vec<Todo>, mut links: HashMap<i64, Vec<Category>>) -> Vec<Todo> {
    for todo in &mut todos {
        todo.categories = links.remove(&todo.id).unwrap_or_default();
    }
    todos
}

// ============================================================================
// SQLite implementations
// ============================================================================

async fn create_todo_sqlite(
    pool: &SqlitePool,
    user_id: i64,
    input: &CreateTodoInput,
) -> Result<Todo> {
    let now = Utc::now();
    let mut tx = pool.begin().await?;

    let result = sqlx::query(
        r#"
        INSERT INTO todos (title, description, completed, user_id, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&input.title)
    .bind(&input.description)
    .bind(false)
    .bind(user_id)
    .bind(now)
    .bind(now)
    .execute(&mut *tx)
    .await
    .context("Failed to create todo")?;

    let id = result.last_insert_rowid();
    link_categories_sqlite(&mut tx, id, &input.category_ids).await?;
    tx.commit().await?;

    get_todo_sqlite(pool, id, user_id)
        .await?
        .context("Todo not found after insert")
}

async fn link_categories_sqlite(
    tx: &mut Transaction<'_, Sqlite>,
    todo_id: i64,
    category_ids: &[i64],
) -> Result<()> {
    for category_id in unique_ids(category_ids) {
        sqlx::query("INSERT INTO todo_categories (todo_id, category_id) VALUES (?, ?)")
            .bind(todo_id)
            .bind(category_id)
            .execute(&mut **tx)
            .await
            .with_context(|| format!("Failed to attach category {}", category_id))?;
    }
    Ok(())
}

async fn list_todos_sqlite(pool: &SqlitePool, user_id: i64) -> Result<Vec<Todo>> {
    let rows = sqlx::query(&format!(
        "{SELECT_TODO} WHERE user_id = ? ORDER BY created_at ASC, id ASC"
    ))
    .bind(user_id)
    .fetch_all(pool)
    .await
    .context("Failed to list todos")?;
    let todos = rows.iter().map(row_to_todo_sqlite).collect();

    let link_rows = sqlx::query(&format!(
        "{SELECT_TODO_CATEGORIES} WHERE t.user_id = ? ORDER BY c.name"
    ))
    .bind(user_id)
    .fetch_all(pool)
    .await
    .context("Failed to load todo categories")?;

    let mut links: HashMap<i64, Vec<Category>> = HashMap::new();
    for row in &link_rows {
        links
            .entry(row.get("todo_id"))
            .or_default()
            .push(row_to_category_sqlite(row));
    }

    Ok(attach(todos, links))
}

async fn get_todo_sqlite(pool: &SqlitePool, id: i64, user_id: i64) -> Result<Option<Todo>> {
    let row = sqlx::query(&format!("{SELECT_TODO} WHERE id = ? AND user_id = ?"))
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await
        .context("Failed to get todo")?;

    let Some(row) = row else {
        return Ok(None);
    };
    let mut todo = row_to_todo_sqlite(&row);

    let link_rows = sqlx::query(&format!(
        "{SELECT_TODO_CATEGORIES} WHERE tc.todo_id = ? ORDER BY c.name"
    ))
    .bind(id)
    .fetch_all(pool)
    .await
    .context("Failed to load todo categories")?;
    todo.categories = link_rows.iter().map(row_to_category_sqlite).collect();

    Ok(Some(todo))
}

async fn update_todo_sqlite(
    pool: &SqlitePool,
    id: i64,
    user_id: i64,
    input: &UpdateTodoInput,
) -> Result<Option<Todo>> {
    let mut tx = pool.begin().await?;

    let owned = sqlx::query("SELECT id FROM todos WHERE id = ? AND user_id = ?")
        .bind(id)
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await
        .context("Failed to look up todo")?;
    if owned.is_none() {
        return Ok(None);
    }

    sqlx::query(
        r#"
        UPDATE todos
        SET title = ?, description = ?, completed = ?, updated_at = ?
        WHERE id = ? AND user_id = ?
        "#,
    )
    .bind(&input.title)
    .bind(&input.description)
    .bind(input.completed)
    .bind(Utc::now())
    .bind(id)
    .bind(user_id)
    .execute(&mut *tx)
    .await
    .context("Failed to update todo")?;

    sqlx::query("DELETE FROM todo_categories WHERE todo_id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await
        .context("Failed to clear todo categories")?;
    link_categories_sqlite(&mut tx, id, &input.category_ids).await?;
    tx.commit().await?;

    get_todo_sqlite(pool, id, user_id).await
}

async fn set_completed_sqlite(
    pool: &SqlitePool,
    id: i64,
    user_id: i64,
    completed: bool,
) -> Result<bool> {
    let result = sqlx::query(
        "UPDATE todos SET completed = ?, updated_at = ? WHERE id = ? AND user_id = ?",
    )
    .bind(completed)
    .bind(Utc::now())
    .bind(id)
    .bind(user_id)
    .execute(pool)
    .await
    .context("Failed to update todo completion")?;

    Ok(result.rows_affected() > 0)
}

async fn delete_todo_sqlite(pool: &SqlitePool, id: i64, user_id: i64) -> Result<bool> {
    let mut tx = pool.begin().await?;

    sqlx::query(
        "DELETE FROM todo_categories WHERE todo_id IN (SELECT id FROM todos WHERE id = ? AND user_id = ?)",
    )
    .bind(id)
    .bind(user_id)
    .execute(&mut *tx)
    .await
    .context("Failed to detach todo categories")?;

    let result = sqlx::query("DELETE FROM todos WHERE id = ? AND user_id = ?")
        .bind(id)
        .bind(user_id)
        .execute(&mut *tx)
        .await
        .context("Failed to delete todo")?;

    tx.commit().await?;
    Ok(result.rows_affected() > 0)
}

async fn delete_all_todos_sqlite(pool: &SqlitePool) -> Result<u64> {
    let mut tx = pool.begin().await?;
    sqlx::query("DELETE FROM todo_categories")
        .execute(&mut *tx)
        .await
        .context("Failed to detach todo categories")?;
    let result = sqlx::query("DELETE FROM todos")
        .execute(&mut *tx)
        .await
        .context("Failed to delete todos")?;
    tx.commit().await?;

    Ok(result.rows_affected())
}

fn row_to_todo_sqlite(row: &sqlx::sqlite::SqliteRow) -> Todo {
    Todo {
        id: row.get("id"),
        title: row.get("title"),
        description: row.get("description"),
        completed: row.get("completed"),
        user_id: row.get("user_id"),
        categories: Vec::new(),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

// ============================================================================
// MySQL implementations
// ============================================================================

async fn create_todo_mysql(pool: &MySqlPool, user_id: i64, input: &CreateTodoInput) -> Result<Todo> {
    let now = Utc::now();
    let mut tx = pool.begin().await?;

    let result = sqlx::query(
        r#"
        INSERT INTO todos (title, description, completed, user_id, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&input.title)
    .bind(&input.description)
    .bind(false)
    .bind(user_id)
    .bind(now)
    .bind(now)
    .execute(&mut *tx)
    .await
    .context("Failed to create todo")?;

    let id = result.last_insert_id() as i64;
    link_categories_mysql(&mut tx, id, &input.category_ids).await?;
    tx.commit().await?;

    get_todo_mysql(pool, id, user_id)
        .await?
        .context("Todo not found after insert")
}

async fn link_categories_mysql(
    tx: &mut Transaction<'_, MySql>,
    todo_id: i64,
    category_ids: &[i64],
) -> Result<()> {
    for category_id in unique_ids(category_ids) {
        sqlx::query("INSERT INTO todo_categories (todo_id, category_id) VALUES (?, ?)")
            .bind(todo_id)
            .bind(category_id)
            .execute(&mut **tx)
            .await
            .with_context(|| format!("Failed to attach category {}", category_id))?;
    }
    Ok(())
}

async fn list_todos_mysql(pool: &MySqlPool, user_id: i64) -> Result<Vec<Todo>> {
    let rows = sqlx::query(&format!(
        "{SELECT_TODO} WHERE user_id = ? ORDER BY created_at ASC, id ASC"
    ))
    .bind(user_id)
    .fetch_all(pool)
    .await
    .context("Failed to list todos")?;
    let todos = rows.iter().map(row_to_todo_mysql).collect();

    let link_rows = sqlx::query(&format!(
        "{SELECT_TODO_CATEGORIES} WHERE t.user_id = ? ORDER BY c.name"
    ))
    .bind(user_id)
    .fetch_all(pool)
    .await
    .context("Failed to load todo categories")?;

    let mut links: HashMap<i64, Vec<Category>> = HashMap::new();
    for row in &link_rows {
        links
            .entry(row.get("todo_id"))
            .or_default()
            .push(row_to_category_mysql(row));
    }

    Ok(attach(todos, links))
}

async fn get_todo_mysql(pool: &MySqlPool, id: i64, user_id: i64) -> Result<Option<Todo>> {
    let row = sqlx::query(&format!("{SELECT_TODO} WHERE id = ? AND user_id = ?"))
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await
        .context("Failed to get todo")?;

    let Some(row) = row else {
        return Ok(None);
    };
    let mut todo = row_to_todo_mysql(&row);

    let link_rows = sqlx::query(&format!(
        "{SELECT_TODO_CATEGORIES} WHERE tc.todo_id = ? ORDER BY c.name"
    ))
    .bind(id)
    .fetch_all(pool)
    .await
    .context("Failed to load todo categories")?;
    todo.categories = link_rows.iter().map(row_to_category_mysql).collect();

    Ok(Some(todo))
}

async fn update_todo_mysql(
    pool: &MySqlPool,
    id: i64,
    user_id: i64,
    input: &UpdateTodoInput,
) -> Result<Option<Todo>> {
    let mut tx = pool.begin().await?;

    // MySQL reports changed rows, not matched rows, so check ownership up front
    let owned = sqlx::query("SELECT id FROM todos WHERE id = ? AND user_id = ?")
        .bind(id)
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await
        .context("Failed to look up todo")?;
    if owned.is_none() {
        return Ok(None);
    }

    sqlx::query(
        r#"
        UPDATE todos
        SET title = ?, description = ?, completed = ?, updated_at = ?
        WHERE id = ? AND user_id = ?
        "#,
    )
    .bind(&input.title)
    .bind(&input.description)
    .bind(input.completed)
    .bind(Utc::now())
    .bind(id)
    .bind(user_id)
    .execute(&mut *tx)
    .await
    .context("Failed to update todo")?;

    sqlx::query("DELETE FROM todo_categories WHERE todo_id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await
        .context("Failed to clear todo categories")?;
    link_categories_mysql(&mut tx, id, &input.category_ids).await?;
    tx.commit().await?;

    get_todo_mysql(pool, id, user_id).await
}

async fn set_completed_mysql(
    pool: &MySqlPool,
    id: i64,
    user_id: i64,
    completed: bool,
) -> Result<bool> {
    let owned = sqlx::query("SELECT id FROM todos WHERE id = ? AND user_id = ?")
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await
        .context("Failed to look up todo")?;
    if owned.is_none() {
        return Ok(false);
    }

    sqlx::query("UPDATE todos SET completed = ?, updated_at = ? WHERE id = ? AND user_id = ?")
        .bind(completed)
        .bind(Utc::now())
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await
        .context("Failed to update todo completion")?;

    Ok(true)
}

async fn delete_todo_mysql(pool: &MySqlPool, id: i64, user_id: i64) -> Result<bool> {
    let mut tx = pool.begin().await?;

    sqlx::query(
        "DELETE FROM todo_categories WHERE todo_id IN (SELECT id FROM todos WHERE id = ? AND user_id = ?)",
    )
    .bind(id)
    .bind(user_id)
    .execute(&mut *tx)
    .await
    .context("Failed to detach todo categories")?;

    let result = sqlx::query("DELETE FROM todos WHERE id = ? AND user_id = ?")
        .bind(id)
        .bind(user_id)
        .execute(&mut *tx)
        .await
        .context("Failed to delete todo")?;

    tx.commit().await?;
    Ok(result.rows_affected() > 0)
}

async fn delete_all_todos_mysql(pool: &MySqlPool) -> Result<u64> {
    let mut tx = pool.begin().await?;
    sqlx::query("DELETE FROM todo_categories")
        .execute(&mut *tx)
        .await
        .context("Failed to detach todo categories")?;
    let result = sqlx::query("DELETE FROM todos")
        .execute(&mut *tx)
        .await
        .context("Failed to delete todos")?;
    tx.commit().await?;

    Ok(result.rows_affected())
}

fn row_to_todo_mysql(row: &sqlx::mysql::MySqlRow) -> Todo {
    Todo {
        id: row.get("id"),
        title: row.get("title"),
        description: row.get("description"),
        completed: row.get("completed"),
        user_id: row.get("user_id"),
        categories: Vec::new(),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::{CategoryRepository, SqlxCategoryRepository};
    use crate::db::{create_test_pool, migrations};

    struct Fixture {
        repo: SqlxTodoRepository,
        categories: SqlxCategoryRepository,
    }

    async fn setup() -> Fixture {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");
        for (id, name) in [(1, "Alice"), (2, "Bob")] {
            sqlx::query("INSERT INTO users (id, name, email, password_hash) VALUES (?, ?, ?, 'hash')")
                .bind(id)
                .bind(name)
                .bind(format!("{}@example.com", name.to_lowercase()))
                .execute(pool.as_sqlite().expect("sqlite test pool"))
                .await
                .expect("Failed to create test user");
        }
        Fixture {
            repo: SqlxTodoRepository::new(pool.clone()),
            categories: SqlxCategoryRepository::new(pool),
        }
    }

    fn input(title: &str, category_ids: Vec<i64>) -> CreateTodoInput {
        CreateTodoInput {
            title: title.to_string(),
            description: None,
            category_ids,
        }
    }

    #[tokio::test]
    async fn test_create_todo_with_categories() {
        let f = setup().await;
        let work = f.categories.create("Work").await.unwrap();
        let health = f.categories.create("Health").await.unwrap();

        let todo = f
            .repo
            .create(1, &input("Write report", vec![work.id, health.id, work.id]))
            .await
            .expect("Failed to create todo");

        assert!(todo.id > 0);
        assert_eq!(todo.user_id, 1);
        assert!(!todo.completed);
        let names: Vec<&str> = todo.categories.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Health", "Work"]);
    }

    #[tokio::test]
    async fn test_unknown_category_rolls_back() {
        let f = setup().await;

        let result = f.repo.create(1, &input("Broken", vec![42])).await;

        assert!(result.is_err());
        assert!(f.repo.list_by_user(1).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_is_scoped_and_ordered() {
        let f = setup().await;
        let errands = f.categories.create("Errands").await.unwrap();
        f.repo.create(1, &input("first", vec![errands.id])).await.unwrap();
        f.repo.create(2, &input("not mine", vec![])).await.unwrap();
        f.repo.create(1, &input("second", vec![])).await.unwrap();

        let todos = f.repo.list_by_user(1).await.unwrap();
        let titles: Vec<&str> = todos.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["first", "second"]);
        assert_eq!(todos[0].categories.len(), 1);
        assert!(todos[1].categories.is_empty());
    }

    #[tokio::test]
    async fn test_get_for_other_user_is_none() {
        let f = setup().await;
        let todo = f.repo.create(1, &input("private", vec![])).await.unwrap();

        assert!(f.repo.get_for_user(todo.id, 1).await.unwrap().is_some());
        assert!(f.repo.get_for_user(todo.id, 2).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_replaces_fields_and_categories() {
        let f = setup().await;
        let work = f.categories.create("Work").await.unwrap();
        let personal = f.categories.create("Personal").await.unwrap();
        let todo = f.repo.create(1, &input("draft", vec![work.id])).await.unwrap();

        let update = UpdateTodoInput {
            title: "final".to_string(),
            description: Some("done properly".to_string()),
            completed: true,
            category_ids: vec![personal.id],
        };
        let updated = f
            .repo
            .update(todo.id, 1, &update)
            .await
            .unwrap()
            .expect("todo should exist");

        assert_eq!(updated.title, "final");
        assert_eq!(updated.description.as_deref(), Some("done properly"));
        assert!(updated.completed);
        assert_eq!(updated.category_ids(), vec![personal.id]);

        assert!(f.repo.update(todo.id, 2, &update).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_set_completed() {
        let f = setup().await;
        let todo = f.repo.create(1, &input("toggle me", vec![])).await.unwrap();

        assert!(f.repo.set_completed(todo.id, 1, true).await.unwrap());
        let found = f.repo.get_for_user(todo.id, 1).await.unwrap().unwrap();
        assert!(found.completed);

        assert!(!f.repo.set_completed(todo.id, 2, false).await.unwrap());
        let found = f.repo.get_for_user(todo.id, 1).await.unwrap().unwrap();
        assert!(found.completed);
    }

    #[tokio::test]
    async fn test_delete_for_user() {
        let f = setup().await;
        let work = f.categories.create("Work").await.unwrap();
        let todo = f.repo.create(1, &input("remove", vec![work.id])).await.unwrap();

        assert!(!f.repo.delete_for_user(todo.id, 2).await.unwrap());
        assert!(f.repo.delete_for_user(todo.id, 1).await.unwrap());
        assert!(f.repo.get_for_user(todo.id, 1).await.unwrap().is_none());

        // Category itself survives
        let remaining: Vec<i64> = f.categories.list().await.unwrap().iter().map(|c| c.id).collect();
        assert_eq!(remaining, vec![work.id]);
    }

    #[tokio::test]
    async fn test_delete_all() {
        let f = setup().await;
        f.repo.create(1, &input("a", vec![])).await.unwrap();
        f.repo.create(1, &input("b", vec![])).await.unwrap();
        f.repo.create(2, &input("c", vec![])).await.unwrap();
        assert_eq!(f.repo.list_by_user(1).await.unwrap().len(), 2);

        assert_eq!(f.repo.delete_all().await.unwrap(), 3);
        assert!(f.repo.list_by_user(1).await.unwrap().is_empty());
        assert!(f.repo.list_by_user(2).await.unwrap().is_empty());
    }

    #[test]
    fn test_unique_ids() {
        assert_eq!(unique_ids(&[3, 1, 3, 2, 1]), vec![1, 2, 3]);
        assert!(unique_ids(&[]).is_empty());
    }
}
