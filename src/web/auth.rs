//! Login, signup and logout pages

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Redirect, Response},
    routing::get,
    Form, Router,
};
use serde_json::json;
use tera::Context as TeraContext;

use super::middleware::{AppError, AppState, MaybeUser};
use crate::models::Session;
use crate::services::validation::{validate_login, validate_signup};
use crate::services::{AuthError, FormErrors, LoginForm, SignupForm};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", get(login_page).post(login))
        .route("/signup", get(signup_page).post(signup))
        .route("/logout", get(logout_redirect).post(logout))
}

fn login_context(email: &str, errors: &FormErrors) -> TeraContext {
    let mut context = TeraContext::new();
    context.insert("values", &json!({ "email": email }));
    context.insert("errors", errors);
    context
}

fn signup_context(form: &SignupForm, errors: &FormErrors) -> TeraContext {
    let mut context = TeraContext::new();
    context.insert("values", &json!({ "name": form.name, "email": form.email }));
    context.insert("errors", errors);
    context
}

/// Set the session cookie and go to the home page
fn signed_in(state: &AppState, session: &Session) -> Result<Response, AppError> {
    let cookie = state.cookies.set_cookie(&session.id)?;
    Ok(([(header::SET_COOKIE, cookie)], Redirect::to("/home")).into_response())
}

/// GET /login
async fn login_page(State(state): State<AppState>, MaybeUser(user): MaybeUser) -> Result<Response, AppError> {
    if user.is_some() {
        return Ok(Redirect::to("/home").into_response());
    }
    Ok(state
        .render("auth/login.html", &login_context("", &FormErrors::new()))?
        .into_response())
}

/// POST /login
async fn login(State(state): State<AppState>, Form(form): Form<LoginForm>) -> Result<Response, AppError> {
    let input = match validate_login(&form) {
        Ok(input) => input,
        Err(errors) => {
            return state.render_with_status(
                StatusCode::UNPROCESSABLE_ENTITY,
                "auth/login.html",
                &login_context(&form.email, &errors),
            );
        }
    };

    match state.auth.login(&input.email, &input.password).await {
        Ok((_, session)) => signed_in(&state, &session),
        Err(AuthError::Authorization(message)) => state.render_with_status(
            StatusCode::UNAUTHORIZED,
            "auth/login.html",
            &login_context(&input.email, &FormErrors::form_error(message)),
        ),
        Err(e) => Err(e.into()),
    }
}

/// GET /signup
async fn signup_page(State(state): State<AppState>, MaybeUser(user): MaybeUser) -> Result<Response, AppError> {
    if user.is_some() {
        return Ok(Redirect::to("/home").into_response());
    }
    Ok(state
        .render("auth/signup.html", &signup_context(&SignupForm::default(), &FormErrors::new()))?
        .into_response())
}

/// POST /signup
async fn signup(State(state): State<AppState>, Form(form): Form<SignupForm>) -> Result<Response, AppError> {
    let input = match validate_signup(&form) {
        Ok(input) => input,
        Err(errors) => {
            return state.render_with_status(
                StatusCode::UNPROCESSABLE_ENTITY,
                "auth/signup.html",
                &signup_context(&form, &errors),
            );
        }
    };

    match state.auth.signup(input).await {
        Ok((_, session)) => signed_in(&state, &session),
        Err(AuthError::EmailTaken) => {
            let mut errors = FormErrors::new();
            errors.add("email", AuthError::EmailTaken.to_string());
            state.render_with_status(
                StatusCode::UNPROCESSABLE_ENTITY,
                "auth/signup.html",
                &signup_context(&form, &errors),
            )
        }
        Err(e) => Err(e.into()),
    }
}

/// POST /logout
async fn logout(State(state): State<AppState>, headers: HeaderMap) -> Result<Response, AppError> {
    if let Some(token) = state.cookies.read(&headers) {
        state.auth.logout(&token).await?;
    }
    let cookie = state.cookies.clear_cookie()?;
    Ok(([(header::SET_COOKIE, cookie)], Redirect::to("/login")).into_response())
}

/// GET /logout
async fn logout_redirect() -> Redirect {
    Redirect::to("/")
}
