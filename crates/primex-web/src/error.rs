use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Json, Response};
use primex_core::error::PrimexError;

/// Application error type that renders as an HTML error page.
pub struct AppError(pub anyhow::Error);

impl AppError {
    /// The key of the collection that could not be parsed, if that is the cause.
    fn corrupt_collection(&self) -> Option<&str> {
        match self.0.downcast_ref::<PrimexError>() {
            Some(PrimexError::CorruptCollection { key, .. }) => Some(key),
            _ => None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        tracing::error!("web error: {:#}", self.0);

        if let Some(key) = self.corrupt_collection() {
            let body = format!(
                r#"<!doctype html>
<html><head><title>Collection Unreadable · Prime X Studio</title>
<style>body{{font-family:system-ui;background:#0b0b0f;color:#e5e5e5;display:flex;justify-content:center;align-items:center;height:100vh;margin:0}}
.box{{text-align:center;max-width:520px}}
h1{{font-size:2.2rem;color:#f59e0b;margin:0}}
p{{color:#9ca3af;margin:0.5rem 0}}
code{{background:#18181b;padding:0.2rem 0.5rem;border-radius:4px;color:#a78bfa}}
a{{color:#a78bfa;text-decoration:none;padding:0.5rem 1rem;border:1px solid #27272a;border-radius:8px}}</style>
</head><body><div class="box"><h1>Collection Unreadable</h1>
<p>The stored data under <code>{}</code> could not be read, so nothing was saved over it.</p>
<p>Run <code>primex check</code> to inspect the store.</p>
<p style="margin-top:1.5rem"><a href="/dashboard">Back to dashboard</a></p>
</div></body></html>"#,
                html_escape(key)
            );
            return (StatusCode::CONFLICT, Html(body)).into_response();
        }

        let body = format!(
            r#"<!doctype html>
<html><head><title>Error</title>
<style>body{{font-family:system-ui;background:#0b0b0f;color:#e5e5e5;display:flex;justify-content:center;align-items:center;height:100vh;margin:0}}
.err{{background:#18181b;padding:2rem;border-radius:8px;border-left:4px solid #ef4444;max-width:600px}}
h1{{color:#ef4444;margin-top:0}}pre{{white-space:pre-wrap;color:#a1a1aa}}</style>
</head><body><div class="err"><h1>Something went wrong</h1><pre>{}</pre>
<p><a href="/dashboard" style="color:#a78bfa">Back to dashboard</a></p></div></body></html>"#,
            html_escape(&format!("{:#}", self.0))
        );
        (StatusCode::INTERNAL_SERVER_ERROR, Html(body)).into_response()
    }
}

impl<E: Into<anyhow::Error>> From<E> for AppError {
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

/// JSON API error type for REST endpoints.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: msg.into(),
        }
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            message: msg.into(),
        }
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: msg.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({ "error": self.message });
        (self.status, Json(body)).into_response()
    }
}

impl From<PrimexError> for ApiError {
    fn from(err: PrimexError) -> Self {
        match &err {
            PrimexError::InvalidInput(_) => Self::bad_request(err.to_string()),
            _ => {
                tracing::error!("api error: {}", err);
                Self::internal(err.to_string())
            }
        }
    }
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
