use crate::error::{PrimexError, Result};
use config::{Config, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrimexConfig {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub web: WebConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub forms: FormsConfig,
    #[serde(default)]
    pub remote: RemoteConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_storage_backend")]
    pub backend: String,
    /// Custom path for the SQLite database. Defaults to `~/.config/primex/primex.db`.
    #[serde(default)]
    pub path: Option<String>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: default_storage_backend(),
            path: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebConfig {
    #[serde(default = "default_web_port")]
    pub port: u16,
    #[serde(default = "default_web_host")]
    pub host: String,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            port: default_web_port(),
            host: default_web_host(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    #[serde(default = "default_admin_username")]
    pub username: String,
    #[serde(default = "default_admin_password")]
    pub password: String,
    /// Environment variable that overrides `password` when set.
    #[serde(default)]
    pub password_env: Option<String>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            username: default_admin_username(),
            password: default_admin_password(),
            password_env: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormsConfig {
    /// Artificial latency before event and design submissions resolve.
    #[serde(default = "default_submit_delay_ms")]
    pub submit_delay_ms: u64,
}

impl Default for FormsConfig {
    fn default() -> Self {
        Self {
            submit_delay_ms: default_submit_delay_ms(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_remote_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_remote_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: default_remote_endpoint(),
            timeout_secs: default_remote_timeout_secs(),
        }
    }
}

/// Valid storage backend names.
pub const VALID_STORAGE_BACKENDS: &[&str] = &["sqlite", "memory"];

/// Environment variable consulted for the admin password when
/// `auth.password_env` is not set.
pub const DEFAULT_PASSWORD_ENV: &str = "PRIMEX_ADMIN_PASSWORD";

// -- Defaults --

fn default_storage_backend() -> String {
    "sqlite".to_string()
}
fn default_web_port() -> u16 {
    8080
}
fn default_web_host() -> String {
    "127.0.0.1".to_string()
}
fn default_admin_username() -> String {
    "admin".to_string()
}
fn default_admin_password() -> String {
    "1234".to_string()
}
fn default_submit_delay_ms() -> u64 {
    1000
}
fn default_remote_endpoint() -> String {
    "https://primexbackend.onrender.com/api/web/addwebsite".to_string()
}
fn default_remote_timeout_secs() -> u64 {
    30
}
fn default_true() -> bool {
    true
}

impl PrimexConfig {
    /// Load configuration with three-layer TOML merge:
    /// 1. ~/.config/primex/config.toml (global)
    /// 2. .primex/config.toml (project)
    /// 3. .primex/config.local.toml (local, gitignored)
    pub fn load(project_dir: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                builder = builder.add_source(File::from(global_path).required(false));
            }
        }

        if let Some(dir) = project_dir {
            let project_config = dir.join(".primex").join("config.toml");
            if project_config.exists() {
                builder = builder.add_source(File::from(project_config).required(false));
            }

            let local_config = dir.join(".primex").join("config.local.toml");
            if local_config.exists() {
                builder = builder.add_source(File::from(local_config).required(false));
            }
        }

        let config = builder
            .build()
            .map_err(|e| PrimexError::Config(e.to_string()))?;

        let mut cfg: Self = config
            .try_deserialize()
            .map_err(|e| PrimexError::Config(e.to_string()))?;

        cfg.validate();
        Ok(cfg)
    }

    /// Defaults only (no files).
    pub fn default_config() -> Self {
        Self {
            storage: StorageConfig::default(),
            web: WebConfig::default(),
            auth: AuthConfig::default(),
            forms: FormsConfig::default(),
            remote: RemoteConfig::default(),
        }
    }

    /// Validate config values, fixing out-of-range values and logging warnings.
    /// Lenient: never rejects the config.
    pub fn validate(&mut self) -> Vec<String> {
        let mut warnings = Vec::new();

        if !VALID_STORAGE_BACKENDS.contains(&self.storage.backend.as_str()) {
            warnings.push(format!(
                "unknown storage backend '{}', valid: {}",
                self.storage.backend,
                VALID_STORAGE_BACKENDS.join(", ")
            ));
        }

        if self.auth.username.trim().is_empty() {
            warnings.push("auth.username is empty, setting to 'admin'".to_string());
            self.auth.username = default_admin_username();
        }

        if self.remote.enabled && self.remote.endpoint.trim().is_empty() {
            warnings.push("remote.endpoint is empty, disabling remote submission".to_string());
            self.remote.enabled = false;
        }

        if self.remote.timeout_secs == 0 {
            warnings.push("remote.timeout_secs = 0, setting to 1".to_string());
            self.remote.timeout_secs = 1;
        }

        if self.forms.submit_delay_ms > 10_000 {
            warnings.push(format!(
                "forms.submit_delay_ms = {} is above 10000, clamping",
                self.forms.submit_delay_ms
            ));
            self.forms.submit_delay_ms = 10_000;
        }

        for w in &warnings {
            tracing::warn!("config: {}", w);
        }

        warnings
    }

    /// Resolve the admin password: environment variable first, then the config value.
    pub fn resolve_admin_password(&self) -> String {
        let env_var = self
            .auth
            .password_env
            .as_deref()
            .unwrap_or(DEFAULT_PASSWORD_ENV);
        match std::env::var(env_var) {
            Ok(value) if !value.is_empty() => value,
            _ => self.auth.password.clone(),
        }
    }
}

fn global_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("primex").join("config.toml"))
}

/// Default location of the SQLite database: `~/.config/primex/primex.db`.
pub fn default_sqlite_path() -> Result<PathBuf> {
    let dir = dirs::config_dir()
        .ok_or_else(|| PrimexError::Config("cannot determine config directory".to_string()))?
        .join("primex");
    std::fs::create_dir_all(&dir)
        .map_err(|e| PrimexError::Config(format!("failed to create config dir: {e}")))?;
    Ok(dir.join("primex.db"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PrimexConfig::default_config();
        assert_eq!(config.storage.backend, "sqlite");
        assert!(config.storage.path.is_none());
        assert_eq!(config.web.host, "127.0.0.1");
        assert_eq!(config.web.port, 8080);
        assert_eq!(config.auth.username, "admin");
        assert_eq!(config.forms.submit_delay_ms, 1000);
        assert!(config.remote.enabled);
        assert_eq!(
            config.remote.endpoint,
            "https://primexbackend.onrender.com/api/web/addwebsite"
        );
        assert_eq!(config.remote.timeout_secs, 30);
    }

    #[test]
    fn test_load_config_no_files() {
        let config = PrimexConfig::load(Some(Path::new("/nonexistent/path"))).unwrap();
        assert_eq!(config.web.port, 8080);
        assert_eq!(config.storage.backend, "sqlite");
    }

    #[test]
    fn test_config_serde_roundtrip() {
        let config = PrimexConfig::default_config();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: PrimexConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.web.port, config.web.port);
        assert_eq!(parsed.remote.endpoint, config.remote.endpoint);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let toml_str = r#"
[web]
port = 9000

[forms]
submit_delay_ms = 0
"#;
        let config: PrimexConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.web.port, 9000);
        assert_eq!(config.web.host, "127.0.0.1");
        assert_eq!(config.forms.submit_delay_ms, 0);
        assert_eq!(config.auth.username, "admin");
        assert!(config.remote.enabled);
    }

    #[test]
    fn test_project_layer_overrides() {
        let dir = std::env::temp_dir().join(format!("primex-cfg-{}", uuid::Uuid::now_v7()));
        std::fs::create_dir_all(dir.join(".primex")).unwrap();
        std::fs::write(
            dir.join(".primex").join("config.toml"),
            "[storage]\nbackend = \"memory\"\n\n[web]\nport = 9100\n",
        )
        .unwrap();
        std::fs::write(
            dir.join(".primex").join("config.local.toml"),
            "[web]\nport = 9200\n",
        )
        .unwrap();

        let config = PrimexConfig::load(Some(&dir)).unwrap();
        assert_eq!(config.storage.backend, "memory");
        assert_eq!(config.web.port, 9200);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_validate_unknown_backend_warns() {
        let mut config = PrimexConfig::default_config();
        config.storage.backend = "postgres".to_string();
        let warnings = config.validate();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("unknown storage backend"));
    }

    #[test]
    fn test_validate_fixes_values() {
        let mut config = PrimexConfig::default_config();
        config.remote.timeout_secs = 0;
        config.remote.endpoint = "  ".to_string();
        config.auth.username = String::new();
        config.forms.submit_delay_ms = 60_000;
        let warnings = config.validate();
        assert_eq!(warnings.len(), 4);
        assert_eq!(config.remote.timeout_secs, 1);
        assert!(!config.remote.enabled);
        assert_eq!(config.auth.username, "admin");
        assert_eq!(config.forms.submit_delay_ms, 10_000);
    }

    #[test]
    fn test_validate_default_is_clean() {
        let mut config = PrimexConfig::default_config();
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_resolve_admin_password_from_custom_env() {
        let var = format!("PRIMEX_TEST_PW_{}", std::process::id());
        let mut config = PrimexConfig::default_config();
        config.auth.password_env = Some(var.clone());
        assert_eq!(config.resolve_admin_password(), "1234");

        std::env::set_var(&var, "s3cret");
        assert_eq!(config.resolve_admin_password(), "s3cret");
        std::env::remove_var(&var);
    }
}
