//! Plinko page and board configuration

use axum::{
    extract::State,
    http::header,
    response::{Html, IntoResponse},
    routing::get,
    Json, Router,
};
use tera::Context as TeraContext;

use super::middleware::{AppError, AppState};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/plinko", get(page))
        .route("/plinko/board.json", get(board))
}

/// GET /plinko
///
/// Only a shell; the board is built in the browser.
async fn page(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    state.render("plinko.html", &TeraContext::new())
}

/// GET /plinko/board.json
async fn board(State(state): State<AppState>) -> impl IntoResponse {
    (
        [(header::CACHE_CONTROL, "public, max-age=3600")],
        Json(state.board.as_ref().clone()),
    )
}
