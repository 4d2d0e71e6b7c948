use std::sync::Arc;

use askama::Template;
use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::{Form, Router};
use serde::Deserialize;

use crate::error::AppError;
use crate::session;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/login", get(login_page).post(login))
        .route("/logout", post(logout))
}

#[derive(Template)]
#[template(path = "login.html")]
struct LoginTemplate {
    error: Option<String>,
    username: String,
}

#[derive(Deserialize)]
pub struct LoginInput {
    #[serde(default)]
    username: String,
    #[serde(default)]
    password: String,
}

async fn login_page(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    if session::has_session(&state, &headers).await {
        return Ok(Redirect::to("/dashboard").into_response());
    }
    let tmpl = LoginTemplate {
        error: None,
        username: String::new(),
    };
    Ok(Html(tmpl.render()?).into_response())
}

async fn login(
    State(state): State<Arc<AppState>>,
    Form(input): Form<LoginInput>,
) -> Result<Response, AppError> {
    if state.auth.login(&input.username, &input.password).await? {
        let token = state
            .auth
            .current_session()
            .await
            .map(|s| s.token)
            .unwrap_or_default();
        return Ok((
            [(header::SET_COOKIE, session::session_cookie(&token))],
            Redirect::to("/dashboard"),
        )
            .into_response());
    }

    let tmpl = LoginTemplate {
        error: Some("Invalid credentials".to_string()),
        username: input.username,
    };
    Ok((StatusCode::UNAUTHORIZED, Html(tmpl.render()?)).into_response())
}

async fn logout(State(state): State<Arc<AppState>>) -> Result<Response, AppError> {
    state.auth.logout().await?;
    Ok((
        [(header::SET_COOKIE, session::cleared_cookie())],
        Redirect::to("/login"),
    )
        .into_response())
}
