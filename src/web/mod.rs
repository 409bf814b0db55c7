//! Web layer - HTML pages and routing
//!
//! Server-rendered pages for:
//! - Login, signup and logout
//! - The signed-in user's home and todo list
//! - The Plinko demo and its board configuration
//! - Embedded static assets
//!
//! Every request passes through `load_session`, which resolves the signed
//! session cookie. Protected routes add `require_auth` on top.

pub mod auth;
pub mod middleware;
pub mod pages;
pub mod plinko;
pub mod static_files;
pub mod todos;

use anyhow::Result;
use axum::{middleware as axum_middleware, routing::get, Router};
use std::sync::Arc;
use tower_http::{compression::CompressionLayer, trace::TraceLayer};

use crate::cache::create_cache;
use crate::config::Config;
use crate::db::repositories::{
    SqlxCategoryRepository, SqlxSessionRepository, SqlxTodoRepository, SqlxUserRepository,
};
use crate::db::DynDatabasePool;
use crate::plinko::BoardConfig;
use crate::services::{AuthService, CategoryService, TodoService};
use crate::session::SessionCookie;
use crate::views::ViewEngine;

pub use middleware::{AppError, AppState, CurrentUser, MaybeUser};

impl AppState {
    /// Wire repositories, services, cookie signing and templates together
    pub fn build(pool: DynDatabasePool, config: &Config) -> Result<Self> {
        let cache = create_cache(&config.cache);

        let auth = Arc::new(AuthService::with_session_expiration(
            SqlxUserRepository::boxed(pool.clone()),
            SqlxSessionRepository::boxed(pool.clone()),
            config.session.max_age_days,
        ));
        let categories = Arc::new(CategoryService::new(
            SqlxCategoryRepository::boxed(pool.clone()),
            cache,
        ));
        let todos = Arc::new(TodoService::new(
            SqlxTodoRepository::boxed(pool),
            categories.clone(),
        ));

        Ok(Self {
            auth,
            todos,
            categories,
            cookies: Arc::new(SessionCookie::new(&config.session)?),
            views: Arc::new(ViewEngine::new(&config.views)?),
            board: Arc::new(BoardConfig::standard()),
        })
    }
}

/// Build the complete router with middleware
pub fn build_router(state: AppState) -> Router {
    let protected = Router::new()
        .merge(pages::protected_router())
        .merge(todos::router())
        .route_layer(axum_middleware::from_fn(middleware::require_auth));

    Router::new()
        .merge(pages::router())
        .merge(auth::router())
        .merge(plinko::router())
        .merge(protected)
        .route("/static/{*path}", get(static_files::serve_static))
        .fallback(pages::not_found)
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::load_session,
        ))
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::render_error_pages,
        ))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
