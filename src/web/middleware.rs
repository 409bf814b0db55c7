//! Web middleware
//!
//! Contains:
//! - Shared application state
//! - Session loading and the login guard for protected routes
//! - `AppError`, the HTML error boundary

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{request::Parts, StatusCode},
    middleware::Next,
    response::{Html, IntoResponse, Redirect, Response},
};
use std::convert::Infallible;
use std::sync::Arc;
use tera::Context as TeraContext;

use crate::models::User;
use crate::plinko::BoardConfig;
use crate::services::{AuthError, AuthService, CategoryError, CategoryService, TodoError, TodoService};
use crate::session::SessionCookie;
use crate::views::{simple_error_page, ViewEngine, ViewError};

/// Application state containing shared services
#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<AuthService>,
    pub todos: Arc<TodoService>,
    pub categories: Arc<CategoryService>,
    pub cookies: Arc<SessionCookie>,
    pub views: Arc<ViewEngine>,
    pub board: Arc<BoardConfig>,
}

impl AppState {
    /// Render a template into an HTML response body
    pub fn render(&self, template: &str, context: &TeraContext) -> Result<Html<String>, AppError> {
        Ok(Html(self.views.render(template, context)?))
    }

    /// Render a template with an explicit status code
    pub fn render_with_status(
        &self,
        status: StatusCode,
        template: &str,
        context: &TeraContext,
    ) -> Result<Response, AppError> {
        Ok((status, self.render(template, context)?).into_response())
    }
}

/// User resolved from the session cookie.
///
/// As an extractor it is only satisfied behind [`require_auth`]; anywhere
/// else a missing user redirects to the login page.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = Redirect;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or_else(|| Redirect::to("/login"))
    }
}

/// The signed-in user, if any
#[derive(Debug, Clone)]
pub struct MaybeUser(pub Option<User>);

impl<S> FromRequestParts<S> for MaybeUser
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(MaybeUser(
            parts.extensions.get::<CurrentUser>().map(|u| u.0.clone()),
        ))
    }
}

/// Resolve the session cookie to a user and attach it to the request.
///
/// Unsigned, tampered, unknown and expired sessions all leave the request
/// anonymous.
pub async fn load_session(State(state): State<AppState>, mut request: Request, next: Next) -> Response {
    if let Some(token) = state.cookies.read(request.headers()) {
        match state.auth.validate_session(&token).await {
            Ok(Some(user)) => {
                request.extensions_mut().insert(CurrentUser(user));
            }
            Ok(None) => tracing::debug!("Session cookie did not match a live session"),
            Err(e) => tracing::error!("Session validation failed: {:#}", e),
        }
    }
    next.run(request).await
}

/// Authentication guard: anonymous requests are sent to `/login`
pub async fn require_auth(request: Request, next: Next) -> Response {
    if request.extensions().get::<CurrentUser>().is_none() {
        tracing::debug!(path = %request.uri().path(), "Redirecting anonymous request to login");
        return Redirect::to("/login").into_response();
    }
    next.run(request).await
}

/// Error page details left on a response by [`AppError`], picked up by
/// [`render_error_pages`].
#[derive(Debug, Clone)]
pub struct ErrorPage {
    pub status: StatusCode,
    pub message: String,
}

/// Replace the bare error page of an [`AppError`] response with the
/// rendered error template.
pub async fn render_error_pages(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;
    let Some(page) = response.extensions_mut().remove::<ErrorPage>() else {
        return response;
    };

    let body = state.views.render_error(page.status.as_u16(), &page.message);
    (page.status, Html(body)).into_response()
}

/// Errors surfaced by handlers.
///
/// Internal details are logged and never shown to the user.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Page not found")]
    NotFound,

    #[error("{0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn public_message(&self) -> String {
        match self {
            AppError::Internal(_) => "Something went wrong".to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let AppError::Internal(ref e) = self {
            tracing::error!("Request failed: {:#}", e);
        }

        let status = self.status();
        let message = self.public_message();
        let mut response = (status, Html(simple_error_page(status.as_u16(), &message))).into_response();
        response.extensions_mut().insert(ErrorPage { status, message });
        response
    }
}

impl From<ViewError> for AppError {
    fn from(err: ViewError) -> Self {
        AppError::Internal(anyhow::Error::new(err))
    }
}

impl From<TodoError> for AppError {
    fn from(err: TodoError) -> Self {
        match err {
            TodoError::NotFound => AppError::NotFound,
            TodoError::UnknownCategory(_) => AppError::BadRequest(err.to_string()),
            TodoError::InternalError(e) => AppError::Internal(e),
        }
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InternalError(e) => AppError::Internal(e),
            other => AppError::BadRequest(other.to_string()),
        }
    }
}

impl From<CategoryError> for AppError {
    fn from(err: CategoryError) -> Self {
        let CategoryError::InternalError(e) = err;
        AppError::Internal(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(AppError::NotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::BadRequest("x".into()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            AppError::Internal(anyhow::anyhow!("db down")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_internal_details_are_hidden() {
        let response = AppError::Internal(anyhow::anyhow!("password=hunter2")).into_response();
        let page = response.extensions().get::<ErrorPage>().unwrap();
        assert_eq!(page.message, "Something went wrong");
        assert_eq!(page.status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_todo_errors_map_to_pages() {
        assert!(matches!(AppError::from(TodoError::NotFound), AppError::NotFound));
        assert!(matches!(
            AppError::from(TodoError::UnknownCategory(9)),
            AppError::BadRequest(msg) if msg == "Unknown category: 9"
        ));
    }
}
