use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub username: String,
    pub is_authenticated: bool,
}

/// An authenticated admin session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user: User,
    /// Opaque value handed to the browser as the session cookie.
    pub token: String,
    pub started_at: DateTime<Utc>,
}

impl Session {
    pub fn new(username: String) -> Self {
        Self {
            user: User {
                username,
                is_authenticated: true,
            },
            token: Uuid::new_v4().simple().to_string(),
            started_at: Utc::now(),
        }
    }

    pub fn with_token(mut self, token: String) -> Self {
        self.token = token;
        self
    }
}

/// The persisted authentication marker.
///
/// Older markers only carry `isAuthenticated`; the other fields default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthMarker {
    pub is_authenticated: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl AuthMarker {
    pub fn for_session(session: &Session) -> Self {
        Self {
            is_authenticated: true,
            token: Some(session.token.clone()),
        }
    }
}
