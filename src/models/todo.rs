//! Todo model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Category;

/// A task owned by exactly one user, tagged with zero or more categories.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Todo {
    /// Unique identifier
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
    /// Owning user
    pub user_id: i64,
    /// Attached categories, ordered by name
    pub categories: Vec<Category>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl Todo {
    /// Create a new, not yet persisted todo.
    pub fn new(user_id: i64, title: String, description: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: 0, // Will be set by the database
            title,
            description,
            completed: false,
            user_id,
            categories: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Creation date as shown in lists, e.g. `Jan 5, 2024`
    pub fn created_label(&self) -> String {
        self.created_at.format("%b %-d, %Y").to_string()
    }

    /// Whether a category with the given id is attached
    pub fn has_category(&self, category_id: i64) -> bool {
        self.categories.iter().any(|c| c.id == category_id)
    }

    /// Ids of the attached categories
    pub fn category_ids(&self) -> Vec<i64> {
        self.categories.iter().map(|c| c.id).collect()
    }
}

/// Input for creating a todo
#[derive(Debug, Clone, Default)]
pub struct CreateTodoInput {
    pub title: String,
    pub description: Option<String>,
    pub category_ids: Vec<i64>,
}

/// Input for updating a todo.
///
/// Updates replace every editable field, including the category set.
#[derive(Debug, Clone, Default)]
pub struct UpdateTodoInput {
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
    pub category_ids: Vec<i64>,
}
