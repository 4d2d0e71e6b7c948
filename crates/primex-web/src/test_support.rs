//! Shared helpers for the handler tests.

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{header, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use primex_core::auth::AuthGate;
use primex_core::config::PrimexConfig;
use primex_core::forms::FormService;
use primex_core::portfolio::PortfolioStore;
use primex_core::storage::{MemoryStore, Store};
use tower::ServiceExt;

use crate::AppState;

/// In-memory state with the default credentials, no submit delay, and no
/// remote endpoint.
pub fn test_app_state() -> Arc<AppState> {
    let config = PrimexConfig::default_config();
    let store = Arc::new(Store::Memory(MemoryStore::new()));
    let auth = AuthGate::from_config(&config, Arc::clone(&store));
    let portfolio = Arc::new(PortfolioStore::new(store));
    let forms = FormService::new(Arc::clone(&portfolio), None, Duration::ZERO);
    Arc::new(AppState {
        portfolio,
        auth,
        forms,
        config,
    })
}

pub fn test_router() -> Router {
    router_with(test_app_state())
}

pub fn router_with(state: Arc<AppState>) -> Router {
    crate::routes::router().with_state(state)
}

/// Log in through the real endpoint and return the `Cookie` header value.
pub async fn login_cookie(app: &Router) -> String {
    let resp = app
        .clone()
        .oneshot(form_request("/login", "username=admin&password=1234"))
        .await
        .unwrap();
    let set_cookie = resp
        .headers()
        .get(header::SET_COOKIE)
        .expect("login should set a cookie")
        .to_str()
        .unwrap();
    set_cookie.split(';').next().unwrap().to_string()
}

pub fn form_request(uri: &str, body: &str) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn authed_form(uri: &str, cookie: &str, body: &str) -> Request<Body> {
    let mut req = form_request(uri, body);
    req.headers_mut()
        .insert(header::COOKIE, cookie.parse().unwrap());
    req
}

pub fn authed_get(uri: &str, cookie: &str) -> Request<Body> {
    Request::get(uri)
        .header(header::COOKIE, cookie)
        .body(Body::empty())
        .unwrap()
}

pub fn location(resp: &Response<Body>) -> &str {
    resp.headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}

pub async fn body_json(body: Body) -> serde_json::Value {
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn body_text(body: Body) -> String {
    let bytes = body.collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}
