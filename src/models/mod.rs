//! Data models
//!
//! Plain data structures shared by the repositories, services and views:
//! - Database entities (User, Session, Todo, Category)
//! - Input types consumed by the services

mod category;
mod session;
mod todo;
mod user;

pub use category::Category;
pub use session::Session;
pub use todo::{CreateTodoInput, Todo, UpdateTodoInput};
pub use user::{CreateUserInput, User};
