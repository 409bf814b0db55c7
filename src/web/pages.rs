//! Landing, home and demo pages

use axum::{
    extract::State,
    response::Html,
    routing::get,
    Router,
};
use tera::Context as TeraContext;

use super::middleware::{AppError, AppState, CurrentUser};

/// Public pages
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/error", get(error_demo))
}

/// Pages that need a signed-in user
pub fn protected_router() -> Router<AppState> {
    Router::new()
        .route("/home", get(home))
        .route("/protected", get(protected))
}

fn user_context(user: &crate::models::User) -> TeraContext {
    let mut context = TeraContext::new();
    context.insert("user", user);
    context
}

/// GET /
async fn index(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    state.render("index.html", &TeraContext::new())
}

/// GET /home
async fn home(State(state): State<AppState>, CurrentUser(user): CurrentUser) -> Result<Html<String>, AppError> {
    state.render("home.html", &user_context(&user))
}

/// GET /protected
async fn protected(State(state): State<AppState>, CurrentUser(user): CurrentUser) -> Result<Html<String>, AppError> {
    state.render("protected.html", &user_context(&user))
}

/// GET /error
///
/// Always fails, to show the error page.
async fn error_demo() -> Result<Html<String>, AppError> {
    Err(anyhow::anyhow!("Deliberate failure from /error").into())
}

/// Fallback for unmatched routes
pub async fn not_found() -> AppError {
    AppError::NotFound
}
