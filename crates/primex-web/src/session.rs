//! Session cookie handling and the extractors that guard admin routes.

use std::sync::Arc;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::{header, HeaderMap};
use axum::response::Redirect;

use crate::error::ApiError;
use crate::AppState;

pub const SESSION_COOKIE: &str = "primex_session";

/// Value of the session cookie, if the request carries one.
pub fn session_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value)
}

pub fn session_cookie(token: &str) -> String {
    format!("{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax")
}

pub fn cleared_cookie() -> String {
    format!("{SESSION_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}

/// `true` when the request's cookie matches the live admin session.
pub async fn has_session(state: &AppState, headers: &HeaderMap) -> bool {
    match session_token(headers) {
        Some(token) => state.auth.is_valid_token(token).await,
        None => false,
    }
}

/// Admin page guard. Anonymous requests are sent to the login page.
pub struct AdminPage {
    pub username: String,
}

impl FromRequestParts<Arc<AppState>> for AdminPage {
    type Rejection = Redirect;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        if !has_session(state, &parts.headers).await {
            return Err(Redirect::to("/login"));
        }
        let username = state
            .auth
            .current_user()
            .await
            .map(|u| u.username)
            .unwrap_or_default();
        Ok(Self { username })
    }
}

/// API guard. Anonymous requests get a 401 JSON body.
pub struct AdminApi;

impl FromRequestParts<Arc<AppState>> for AdminApi {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        if has_session(state, &parts.headers).await {
            Ok(Self)
        } else {
            Err(ApiError::unauthorized("authentication required"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_session_token_parsing() {
        let mut headers = HeaderMap::new();
        assert_eq!(session_token(&headers), None);

        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; primex_session=abc123; lang=en"),
        );
        assert_eq!(session_token(&headers), Some("abc123"));
    }

    #[test]
    fn test_session_token_ignores_similar_names() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("primex_session_old=zzz"),
        );
        assert_eq!(session_token(&headers), None);
    }

    #[test]
    fn test_cookie_strings() {
        assert!(session_cookie("t").starts_with("primex_session=t;"));
        assert!(session_cookie("t").contains("HttpOnly"));
        assert!(cleared_cookie().contains("Max-Age=0"));
    }
}
