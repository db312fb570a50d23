//! Server configuration
//!
//! Sources, lowest precedence first:
//! 1. Built-in defaults
//! 2. YAML file (`toxiguard.yaml` unless `--config` is given)
//! 3. `TOXIGUARD__SECTION__KEY` environment variables
//! 4. Command-line overrides

use ::config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use toxiguard_classifiers::ClassifierConfig;
use toxiguard_store::{StoreBackend, StoreConfig};
use tracing::info;

/// Config file read when no path is given
pub const DEFAULT_CONFIG_PATH: &str = "toxiguard.yaml";

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub classifier: ClassifierConfig,

    #[serde(default)]
    pub store: StoreConfig,

    #[serde(default)]
    pub admin: AdminConfig,

    #[serde(default)]
    pub drafts: DraftsConfig,
}

impl AppConfig {
    /// Load configuration from file and environment.
    ///
    /// An explicitly named file must exist; the default one is optional.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        Self::load_with_env(path, environment())
    }

    fn load_with_env(path: Option<&Path>, env: Environment) -> anyhow::Result<Self> {
        let (path, required) = match path {
            Some(path) => (path.to_path_buf(), true),
            None => (PathBuf::from(DEFAULT_CONFIG_PATH), false),
        };

        let settings = Config::builder()
            .add_source(File::from(path.as_path()).format(FileFormat::Yaml).required(required))
            .add_source(env)
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// Apply command-line overrides
    pub fn apply_overrides(&mut self, overrides: &Overrides) {
        if let Some(listen) = &overrides.listen {
            self.server.listen = listen.clone();
        }
        if let Some(port) = overrides.port {
            self.server.port = port;
        }
        if let Some(store) = &overrides.store {
            if self.store.backend != StoreBackend::Jsonl {
                info!(path = %store.display(), "Store path given, switching to the jsonl backend");
                self.store.backend = StoreBackend::Jsonl;
            }
            self.store.path = store.clone();
        }
        if let Some(model) = &overrides.model {
            self.classifier.kind = toxiguard_classifiers::ClassifierKind::Linear;
            self.classifier.model_path = Some(model.clone());
        }
    }
}

/// `TOXIGUARD__SECTION__KEY` variables; `server.cors_origins` is comma separated
fn environment() -> Environment {
    Environment::with_prefix("TOXIGUARD")
        .separator("__")
        .list_separator(",")
        .with_list_parse_key("server.cors_origins")
        .try_parsing(true)
}

/// Values given on the command line
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub listen: Option<String>,
    pub port: Option<u16>,
    pub store: Option<PathBuf>,
    pub model: Option<PathBuf>,
}

/// HTTP listener settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_listen")]
    pub listen: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Origins allowed by CORS; `*` allows any
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,

    /// Default number of entries in the public feed
    #[serde(default = "default_feed_limit")]
    pub feed_limit: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            port: default_port(),
            cors_origins: default_cors_origins(),
            feed_limit: default_feed_limit(),
        }
    }
}

/// Moderator credentials
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminConfig {
    #[serde(default = "default_admin_username")]
    pub username: String,

    /// Argon2id PHC string; without one, admin login is disabled
    #[serde(default)]
    pub password_hash: Option<String>,

    /// Lifetime of an admin session token
    #[serde(default = "default_session_ttl_secs")]
    pub session_ttl_secs: u64,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            username: default_admin_username(),
            password_hash: None,
            session_ttl_secs: default_session_ttl_secs(),
        }
    }
}

/// Pending draft settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DraftsConfig {
    #[serde(default = "default_max_pending")]
    pub max_pending: usize,
}

impl Default for DraftsConfig {
    fn default() -> Self {
        Self {
            max_pending: default_max_pending(),
        }
    }
}

fn default_listen() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_cors_origins() -> Vec<String> {
    vec![
        "http://localhost:5173".to_string(),
        "http://127.0.0.1:5173".to_string(),
    ]
}

fn default_feed_limit() -> usize {
    50
}

fn default_admin_username() -> String {
    "admin".to_string()
}

fn default_session_ttl_secs() -> u64 {
    8 * 60 * 60
}

fn default_max_pending() -> usize {
    10_000
}

#[cfg(test)]
mod tests {
    use super::*;
    use toxiguard_classifiers::ClassifierKind;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.admin.username, "admin");
        assert!(config.admin.password_hash.is_none());
        assert_eq!(config.admin.session_ttl_secs, 28_800);
        assert_eq!(config.drafts.max_pending, 10_000);
        assert_eq!(config.classifier.timeout_ms, 2000);
    }

    #[test]
    fn test_load_yaml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("toxiguard.yaml");
        std::fs::write(
            &path,
            r#"
server:
  port: 9090
store:
  backend: memory
classifier:
  kind: lexicon
  lexicon:
    extra_terms: ["clown"]
admin:
  username: moderator
"#,
        )
        .unwrap();

        let config = AppConfig::load(Some(&path)).unwrap();
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.server.listen, "127.0.0.1");
        assert_eq!(config.store.backend, StoreBackend::Memory);
        assert_eq!(config.classifier.kind, ClassifierKind::Lexicon);
        assert_eq!(config.classifier.lexicon.extra_terms, vec!["clown".to_string()]);
        assert_eq!(config.admin.username, "moderator");
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(AppConfig::load(Some(&dir.path().join("absent.yaml"))).is_err());
    }

    #[test]
    fn test_overrides() {
        let mut config = AppConfig::default();
        config.apply_overrides(&Overrides {
            listen: Some("0.0.0.0".into()),
            port: Some(3000),
            store: Some(PathBuf::from("/tmp/c.jsonl")),
            model: Some(PathBuf::from("model.json")),
        });

        assert_eq!(config.server.listen, "0.0.0.0");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.store.path, PathBuf::from("/tmp/c.jsonl"));
        assert_eq!(config.classifier.kind, ClassifierKind::Linear);
        assert_eq!(config.classifier.model_path, Some(PathBuf::from("model.json")));
    }

    #[test]
    fn test_store_override_selects_jsonl_backend() {
        let mut config = AppConfig::default();
        config.store.backend = StoreBackend::Memory;

        config.apply_overrides(&Overrides {
            store: Some(PathBuf::from("/tmp/c.jsonl")),
            ..Default::default()
        });

        assert_eq!(config.store.backend, StoreBackend::Jsonl);
        assert_eq!(config.store.path, PathBuf::from("/tmp/c.jsonl"));
    }

    #[test]
    fn test_environment_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let mut vars = ::config::Map::new();
        vars.insert(
            "TOXIGUARD__SERVER__CORS_ORIGINS".to_string(),
            "http://a.example,http://b.example".to_string(),
        );
        vars.insert("TOXIGUARD__SERVER__PORT".to_string(), "9191".to_string());
        vars.insert("TOXIGUARD__ADMIN__USERNAME".to_string(), "moderator".to_string());

        let path = write_config(&dir, "server:\n  port: 9090\n");
        let config = AppConfig::load_with_env(
            Some(path.as_path()),
            environment().source(Some(vars)),
        )
        .unwrap();

        assert_eq!(
            config.server.cors_origins,
            vec!["http://a.example".to_string(), "http://b.example".to_string()]
        );
        assert_eq!(config.server.port, 9191);
        assert_eq!(config.admin.username, "moderator");
    }

    fn write_config(dir: &tempfile::TempDir, content: &str) -> PathBuf {
        let path = dir.path().join("toxiguard.yaml");
        std::fs::write(&path, content).unwrap();
        path
    }
}
