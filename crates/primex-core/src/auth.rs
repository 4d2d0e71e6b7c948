//! Admin authentication: a pluggable credential check plus a single session
//! mirrored into the store so it survives restarts.

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::config::PrimexConfig;
use crate::error::Result;
use crate::model::{AuthMarker, Session, User};
use crate::storage::{keys, KeyValueStore, Store};

/// Decides whether a username/password pair is acceptable.
pub trait CredentialVerifier: Send + Sync {
    fn verify(&self, username: &str, password: &str) -> bool;
}

/// A single fixed credential pair.
#[derive(Debug, Clone)]
pub struct StaticCredentials {
    username: String,
    password: String,
}

impl StaticCredentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn from_config(config: &PrimexConfig) -> Self {
        Self::new(config.auth.username.clone(), config.resolve_admin_password())
    }
}

impl CredentialVerifier for StaticCredentials {
    fn verify(&self, username: &str, password: &str) -> bool {
        username == self.username && password == self.password
    }
}

/// Holds the admin session.
///
/// `restore` is the init step (run once at startup); `logout` is the teardown.
pub struct AuthGate {
    verifier: Box<dyn CredentialVerifier>,
    store: Arc<Store>,
    /// Username used when a session is rebuilt from the persisted marker.
    admin_username: String,
    session: RwLock<Option<Session>>,
}

impl AuthGate {
    pub fn new(
        verifier: impl CredentialVerifier + 'static,
        store: Arc<Store>,
        admin_username: impl Into<String>,
    ) -> Self {
        Self {
            verifier: Box::new(verifier),
            store,
            admin_username: admin_username.into(),
            session: RwLock::new(None),
        }
    }

    pub fn from_config(config: &PrimexConfig, store: Arc<Store>) -> Self {
        Self::new(
            StaticCredentials::from_config(config),
            store,
            config.auth.username.clone(),
        )
    }

    /// Rebuild the session from the persisted marker, if any.
    /// Returns `true` when a session was restored.
    pub async fn restore(&self) -> Result<bool> {
        let Some(raw) = self.store.get(keys::AUTH).await? else {
            return Ok(false);
        };
        let marker = match serde_json::from_str::<AuthMarker>(&raw) {
            Ok(marker) => marker,
            Err(e) => {
                tracing::warn!(error = %e, "ignoring unreadable auth marker");
                return Ok(false);
            }
        };
        if !marker.is_authenticated {
            return Ok(false);
        }

        let mut session = Session::new(self.admin_username.clone());
        if let Some(token) = marker.token {
            session = session.with_token(token);
        }
        tracing::info!(username = %session.user.username, "restored admin session");
        *self.session.write().await = Some(session);
        Ok(true)
    }

    /// Check credentials. On success the session is set and persisted.
    /// Failures carry no detail.
    pub async fn login(&self, username: &str, password: &str) -> Result<bool> {
        if !self.verifier.verify(username, password) {
            tracing::warn!(username, "rejected login attempt");
            return Ok(false);
        }

        let session = Session::new(username.to_string());
        let marker = serde_json::to_string(&AuthMarker::for_session(&session))?;
        self.store.set(keys::AUTH, &marker).await?;
        tracing::info!(username, "admin logged in");
        *self.session.write().await = Some(session);
        Ok(true)
    }

    /// Remove the persisted marker, then clear the in-memory session.
    /// If the marker cannot be removed the session is kept as well.
    pub async fn logout(&self) -> Result<()> {
        self.store.remove(keys::AUTH).await?;
        self.session.write().await.take();
        tracing::info!("admin logged out");
        Ok(())
    }

    pub async fn is_authenticated(&self) -> bool {
        self.session.read().await.is_some()
    }

    /// `true` when a session exists and `token` is its token.
    pub async fn is_valid_token(&self, token: &str) -> bool {
        self.session
            .read()
            .await
            .as_ref()
            .is_some_and(|s| s.token == token)
    }

    pub async fn current_user(&self) -> Option<User> {
        self.session.read().await.as_ref().map(|s| s.user.clone())
    }

    pub async fn current_session(&self) -> Option<Session> {
        self.session.read().await.clone()
    }
}
