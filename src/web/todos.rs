//! Todo list pages
//!
//! All routes here sit behind `require_auth` and act on the signed-in
//! user's todos only. Someone else's todo id answers 404.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
    Form, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tera::Context as TeraContext;

use super::middleware::{AppError, AppState, CurrentUser};
use crate::models::{CreateTodoInput, Todo, UpdateTodoInput, User};
use crate::services::validation::{is_checked, validate_todo};
use crate::services::{FormErrors, TodoError, TodoForm};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/todos", get(list).post(toggle))
        .route("/todos/new", get(new_page).post(create))
        .route("/todos/{id}/edit", get(edit_page).post(update))
        .route("/todos/{id}/delete", post(delete))
}

/// A todo as the list template sees it
#[derive(Serialize)]
struct TodoRow<'a> {
    #[serde(flatten)]
    todo: &'a Todo,
    created: String,
}

/// Completion toggle posted from the list
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ToggleForm {
    id: String,
    completed: String,
}

fn parse_id(raw: &str) -> Result<i64, AppError> {
    raw.trim().parse().map_err(|_| AppError::NotFound)
}

/// Field values for re-displaying the todo form
fn form_values(form: &TodoForm) -> serde_json::Value {
    let category_ids: Vec<i64> = form
        .categories
        .iter()
        .filter_map(|raw| raw.trim().parse().ok())
        .collect();
    json!({
        "title": form.title,
        "description": form.description,
        "category_ids": category_ids,
        "completed": form.completed,
    })
}

async fn form_context(
    state: &AppState,
    user: &User,
    values: serde_json::Value,
    errors: &FormErrors,
) -> Result<TeraContext, AppError> {
    let mut context = TeraContext::new();
    context.insert("user", user);
    context.insert("categories", &state.categories.list().await?);
    context.insert("values", &values);
    context.insert("errors", errors);
    Ok(context)
}

/// Re-render a todo form with 422
async fn invalid_form(
    state: &AppState,
    user: &User,
    template: &str,
    form: &TodoForm,
    errors: &FormErrors,
    todo_id: Option<i64>,
) -> Result<Response, AppError> {
    let mut context = form_context(state, user, form_values(form), errors).await?;
    if let Some(id) = todo_id {
        context.insert("todo_id", &id);
    }
    state.render_with_status(StatusCode::UNPROCESSABLE_ENTITY, template, &context)
}

fn unknown_category_errors() -> FormErrors {
    let mut errors = FormErrors::new();
    errors.add("categories", "Invalid category");
    errors
}

/// GET /todos
async fn list(State(state): State<AppState>, CurrentUser(user): CurrentUser) -> Result<Response, AppError> {
    let todos = state.todos.list_for_user(user.id).await?;
    let rows: Vec<TodoRow> = todos
        .iter()
        .map(|todo| TodoRow {
            todo,
            created: todo.created_label(),
        })
        .collect();

    let mut context = TeraContext::new();
    context.insert("user", &user);
    context.insert("todos", &rows);
    Ok(state.render("todos/index.html", &context)?.into_response())
}

/// POST /todos
async fn toggle(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Form(form): Form<ToggleForm>,
) -> Result<Redirect, AppError> {
    let id = form
        .id
        .trim()
        .parse::<i64>()
        .map_err(|_| AppError::BadRequest("Invalid todo id".to_string()))?;

    state
        .todos
        .set_completed(id, user.id, is_checked(&form.completed))
        .await?;
    Ok(Redirect::to("/todos"))
}

/// GET /todos/new
async fn new_page(State(state): State<AppState>, CurrentUser(user): CurrentUser) -> Result<Response, AppError> {
    let context = form_context(&state, &user, form_values(&TodoForm::default()), &FormErrors::new()).await?;
    Ok(state.render("todos/new.html", &context)?.into_response())
}

/// POST /todos/new
async fn create(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Result<Response, AppError> {
    let form = TodoForm::from_pairs(&pairs);
    let draft = match validate_todo(&form) {
        Ok(draft) => draft,
        Err(errors) => return invalid_form(&state, &user, "todos/new.html", &form, &errors, None).await,
    };

    let input = CreateTodoInput {
        title: draft.title,
        description: draft.description,
        category_ids: draft.category_ids,
    };
    match state.todos.create(user.id, input).await {
        Ok(_) => Ok(Redirect::to("/todos").into_response()),
        Err(TodoError::UnknownCategory(_)) => {
            invalid_form(&state, &user, "todos/new.html", &form, &unknown_category_errors(), None).await
        }
        Err(e) => Err(e.into()),
    }
}

/// GET /todos/{id}/edit
async fn edit_page(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let todo = state.todos.get_for_user(parse_id(&id)?, user.id).await?;

    let values = json!({
        "title": todo.title,
        "description": todo.description.clone().unwrap_or_default(),
        "category_ids": todo.category_ids(),
        "completed": todo.completed,
    });
    let mut context = form_context(&state, &user, values, &FormErrors::new()).await?;
    context.insert("todo_id", &todo.id);
    Ok(state.render("todos/edit.html", &context)?.into_response())
}

/// POST /todos/{id}/edit
async fn update(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Result<Response, AppError> {
    let id = parse_id(&id)?;
    let form = TodoForm::from_pairs(&pairs);
    let draft = match validate_todo(&form) {
        Ok(draft) => draft,
        Err(errors) => {
            return invalid_form(&state, &user, "todos/edit.html", &form, &errors, Some(id)).await
        }
    };

    let input = UpdateTodoInput {
        title: draft.title,
        description: draft.description,
        completed: draft.completed,
        category_ids: draft.category_ids,
    };
    match state.todos.update(id, user.id, input).await {
        Ok(_) => Ok(Redirect::to("/todos").into_response()),
        Err(TodoError::UnknownCategory(_)) => {
            invalid_form(&state, &user, "todos/edit.html", &form, &unknown_category_errors(), Some(id)).await
        }
        Err(e) => Err(e.into()),
    }
}

/// POST /todos/{id}/delete
async fn delete(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> Result<Redirect, AppError> {
    state.todos.delete(parse_id(&id)?, user.id).await?;
    Ok(Redirect::to("/todos"))
}
