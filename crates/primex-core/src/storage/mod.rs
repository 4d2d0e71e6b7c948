mod backend;
mod memory;
mod sqlite;

pub use backend::KeyValueStore;
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use crate::config::{self, PrimexConfig};
use crate::error::{PrimexError, Result};

/// Fixed keys the admin panel stores its data under.
pub mod keys {
    pub const WEB_PROJECTS: &str = "primex_web_projects";
    pub const EVENTS: &str = "primex_events";
    pub const GRAPHIC_DESIGNS: &str = "primex_graphic_designs";
    pub const AUTH: &str = "primex_auth";
}

/// Enum wrapper for store backends. Dispatches to the concrete implementation.
/// Using an enum instead of `Box<dyn KeyValueStore>` because the trait uses RPITIT.
pub enum Store {
    Sqlite(SqliteStore),
    Memory(MemoryStore),
}

impl KeyValueStore for Store {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        match self {
            Store::Sqlite(s) => s.get(key).await,
            Store::Memory(s) => s.get(key).await,
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        match self {
            Store::Sqlite(s) => s.set(key, value).await,
            Store::Memory(s) => s.set(key, value).await,
        }
    }

    async fn remove(&self, key: &str) -> Result<()> {
        match self {
            Store::Sqlite(s) => s.remove(key).await,
            Store::Memory(s) => s.remove(key).await,
        }
    }
}

impl Store {
    /// Short description for status output, e.g. `sqlite (/path/primex.db)`.
    pub fn describe(&self) -> String {
        match self {
            Store::Sqlite(s) => format!("sqlite ({})", s.path().display()),
            Store::Memory(_) => "memory".to_string(),
        }
    }
}

/// Create a store backend from the given configuration.
pub fn create_store(config: &PrimexConfig) -> Result<Store> {
    match config.storage.backend.as_str() {
        "sqlite" => {
            let path = match &config.storage.path {
                Some(p) => std::path::PathBuf::from(p),
                None => config::default_sqlite_path()?,
            };
            let store = SqliteStore::open(&path)?;
            tracing::debug!(path = %path.display(), "opened sqlite store");
            Ok(Store::Sqlite(store))
        }
        "memory" => Ok(Store::Memory(MemoryStore::new())),
        other => Err(PrimexError::Config(format!(
            "unknown storage backend '{other}', valid: {}",
            config::VALID_STORAGE_BACKENDS.join(", ")
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_memory_store() {
        let mut config = PrimexConfig::default_config();
        config.storage.backend = "memory".to_string();
        let store = create_store(&config).unwrap();
        assert_eq!(store.describe(), "memory");
    }

    #[test]
    fn test_create_unknown_backend_fails() {
        let mut config = PrimexConfig::default_config();
        config.storage.backend = "redis".to_string();
        match create_store(&config) {
            Err(PrimexError::Config(msg)) => assert!(msg.contains("redis")),
            _ => panic!("expected config error"),
        }
    }

    #[tokio::test]
    async fn test_create_sqlite_store_at_custom_path() {
        let dir = std::env::temp_dir().join(format!("primex-store-{}", uuid::Uuid::now_v7()));
        std::fs::create_dir_all(&dir).unwrap();
        let mut config = PrimexConfig::default_config();
        config.storage.path = Some(dir.join("x.db").to_string_lossy().into_owned());

        let store = create_store(&config).unwrap();
        assert!(store.describe().starts_with("sqlite ("));
        store.set(keys::EVENTS, "[]").await.unwrap();
        assert_eq!(store.get(keys::EVENTS).await.unwrap().as_deref(), Some("[]"));

        drop(store);
        let _ = std::fs::remove_dir_all(&dir);
    }
}
