//! Todo service
//!
//! Per-user todo management. Every operation takes the acting user's id
//! and never touches todos owned by anyone else.

use crate::db::repositories::TodoRepository;
use crate::models::{CreateTodoInput, Todo, UpdateTodoInput};
use crate::services::category::{CategoryError, CategoryService};
use anyhow::Context;
use std::sync::Arc;

/// Error types for todo operations
#[derive(Debug, thiserror::Error)]
pub enum TodoError {
    /// Missing, or owned by another user
    #[error("Todo not found")]
    NotFound,

    /// A submitted category id does not exist
    #[error("Unknown category: {0}")]
    UnknownCategory(i64),

    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

impl From<CategoryError> for TodoError {
    fn from(err: CategoryError) -> Self {
        let CategoryError::InternalError(e) = err;
        TodoError::InternalError(e)
    }
}

/// Todo service
pub struct TodoService {
    repo: Arc<dyn TodoRepository>,
    categories: Arc<CategoryService>,
}

impl TodoService {
    pub fn new(repo: Arc<dyn TodoRepository>, categories: Arc<CategoryService>) -> Self {
        Self { repo, categories }
    }

    /// A user's todos, oldest first, with their categories
    pub async fn list_for_user(&self, user_id: i64) -> Result<Vec<Todo>, TodoError> {
        Ok(self
            .repo
            .list_by_user(user_id)
            .await
            .context("Failed to list todos")?)
    }

    pub async fn create(&self, user_id: i64, input: CreateTodoInput) -> Result<Todo, TodoError> {
        self.check_categories(&input.category_ids).await?;

        let todo = self
            .repo
            .create(user_id, &input)
            .await
            .context("Failed to create todo")?;

        tracing::debug!(todo_id = todo.id, user_id, "Todo created");
        Ok(todo)
    }

    pub async fn get_for_user(&self, id: i64, user_id: i64) -> Result<Todo, TodoError> {
        self.repo
            .get_for_user(id, user_id)
            .await
            .context("Failed to get todo")?
            .ok_or(TodoError::NotFound)
    }

    pub async fn update(
        &self,
        id: i64,
        user_id: i64,
        input: UpdateTodoInput,
    ) -> Result<Todo, TodoError> {
        self.check_categories(&input.category_ids).await?;

        self.repo
            .update(id, user_id, &input)
            .await
            .context("Failed to update todo")?
            .ok_or(TodoError::NotFound)
    }

    pub async fn set_completed(
        &self,
        id: i64,
        user_id: i64,
        completed: bool,
    ) -> Result<(), TodoError> {
        let updated = self
            .repo
            .set_completed(id, user_id, completed)
            .await
            .context("Failed to update todo")?;

        if updated {
            Ok(())
        } else {
            Err(TodoError::NotFound)
        }
    }

    pub async fn delete(&self, id: i64, user_id: i64) -> Result<(), TodoError> {
        let deleted = self
            .repo
            .delete_for_user(id, user_id)
            .await
            .context("Failed to delete todo")?;

        if deleted {
            tracing::debug!(todo_id = id, user_id, "Todo deleted");
            Ok(())
        } else {
            Err(TodoError::NotFound)
        }
    }

    async fn check_categories(&self, ids: &[i64]) -> Result<(), TodoError> {
        match self.categories.unknown_ids(ids).await?.first() {
            Some(&id) => Err(TodoError::UnknownCategory(id)),
            None => Ok(()),
        }
    }
}
