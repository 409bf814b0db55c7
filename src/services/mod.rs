//! Services layer - Business logic
//!
//! Services implement the application's rules on top of the repositories:
//! - Validating form input
//! - Authentication and sessions
//! - Per-user todo management and the shared category list
//! - Seeding demo data

pub mod auth;
pub mod category;
pub mod password;
pub mod seed;
pub mod todo;
pub mod validation;

pub use auth::{AuthError, AuthService};
pub use category::{CategoryError, CategoryService};
pub use password::{hash_password, verify_password};
pub use seed::{SeedReport, Seeder};
pub use todo::{TodoError, TodoService};
pub use validation::{FormErrors, LoginForm, SignupForm, TodoDraft, TodoForm};
