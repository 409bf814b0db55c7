//! Database repositories
//!
//! Repository pattern implementations for database access.
//! Each repository handles the queries for a specific entity.

pub mod category;
pub mod session;
pub mod todo;
pub mod user;

pub use category::{CategoryRepository, SqlxCategoryRepository};
pub use session::{SessionRepository, SqlxSessionRepository};
pub use todo::{SqlxTodoRepository, TodoRepository};
pub use user::{SqlxUserRepository, UserRepository};
