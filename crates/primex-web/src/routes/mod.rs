pub mod api;
pub mod auth;
pub mod dashboard;
pub mod forms;

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, Json};
use axum::routing::get;
use axum::Router;
use primex_core::storage::{keys, KeyValueStore};

use crate::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(health))
        .merge(auth::routes())
        .merge(dashboard::routes())
        .merge(forms::routes())
        .merge(api::routes())
        .fallback(not_found)
}

async fn health(State(state): State<Arc<AppState>>) -> (StatusCode, Json<serde_json::Value>) {
    let store = state.portfolio.store();
    let store_ok = store.get(keys::AUTH).await.is_ok();

    let status = if store_ok {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (
        status,
        Json(serde_json::json!({
            "status": if store_ok { "ok" } else { "degraded" },
            "store": store.describe(),
            "remote_enabled": state.forms.remote_endpoint().is_some(),
            "remote_endpoint": state.forms.remote_endpoint(),
        })),
    )
}

async fn not_found() -> (StatusCode, Html<String>) {
    let body = r#"<!doctype html>
<html><head><title>404 · Prime X Studio</title>
<style>body{font-family:system-ui;background:#0b0b0f;color:#e5e5e5;display:flex;justify-content:center;align-items:center;height:100vh;margin:0}
.box{text-align:center}
h1{font-size:4rem;color:#a78bfa;margin:0}
p{color:#9ca3af;margin:0.5rem 0 1.5rem}
a{color:#a78bfa;text-decoration:none;padding:0.5rem 1rem;border:1px solid #27272a;border-radius:8px}
a:hover{border-color:#a78bfa;background:rgba(167,139,250,0.1)}</style>
</head><body><div class="box"><h1>404</h1><p>This page doesn't exist.</p><a href="/dashboard">Back to dashboard</a></div></body></html>"#;
    (StatusCode::NOT_FOUND, Html(body.to_string()))
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use crate::test_support::{body_json, test_router};

    #[tokio::test]
    async fn test_health() {
        let resp = test_router()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp.into_body()).await;
        assert_eq!(json["status"], "ok");
        assert_eq!(json["store"], "memory");
        assert_eq!(json["remote_enabled"], false);
        assert!(json["remote_endpoint"].is_null());
    }

    #[tokio::test]
    async fn test_unknown_path_is_404() {
        let resp = test_router()
            .oneshot(Request::get("/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
