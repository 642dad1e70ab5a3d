//! Configuration for the site core
//!
//! Read from a TOML file; every section and field has a default. A handful of
//! environment variables override the file so deployments can inject secrets.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::repository::{
    CollectionClient, HttpClientConfig, HttpCollectionClient, JsonFileCollectionClient,
    MemoryCollectionClient, TimeoutClient,
};
use crate::store::SyncStrategy;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid value for {key}: {value}")]
    Env { key: &'static str, value: String },
    #[error("backend kind `http` needs a base_url")]
    MissingBaseUrl,
    #[error("failed to open backend: {0}")]
    Backend(#[from] crate::domain::DomainError),
}

/// Company details quoted by the assistant and the generators
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompanyProfile {
    pub name: String,
    pub email: String,
    pub phone: String,
}

impl Default for CompanyProfile {
    fn default() -> Self {
        Self {
            name: "Mastersolis Infotech".to_string(),
            email: "info@mastersolis.com".to_string(),
            phone: "+1 (234) 567-890".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    #[default]
    Memory,
    File,
    Http,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    pub kind: BackendKind,
    /// Directory for the `file` backend
    pub data_dir: PathBuf,
    pub base_url: Option<String>,
    pub api_token: Option<String>,
    /// 0 disables the client-side timeout
    pub request_timeout_ms: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            kind: BackendKind::Memory,
            data_dir: PathBuf::from("data"),
            base_url: None,
            api_token: None,
            request_timeout_ms: 10_000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    pub strategy: SyncStrategy,
    pub page_size: usize,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            strategy: SyncStrategy::Patch,
            page_size: 50,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub dir: PathBuf,
    pub level: String,
    pub max_file_bytes: u64,
    pub max_files: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("logs"),
            level: "info".to_string(),
            max_file_bytes: 1024 * 1024,
            max_files: 5,
        }
    }
}

impl LoggingConfig {
    pub fn level_filter(&self) -> log::LevelFilter {
        self.level.parse().unwrap_or(log::LevelFilter::Info)
    }

    pub fn logger_options(&self, app_name: &str) -> rolling_logger::LoggerOptions {
        let mut options = rolling_logger::LoggerOptions::new(self.dir.clone(), app_name);
        options.level = self.level_filter();
        options.max_file_bytes = self.max_file_bytes;
        options.max_files = self.max_files;
        options
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistantConfig {
    pub reply_delay_ms: u64,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self { reply_delay_ms: 0 }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub site: CompanyProfile,
    pub backend: BackendConfig,
    pub sync: SyncConfig,
    pub logging: LoggingConfig,
    pub assistant: AssistantConfig,
}

impl SiteConfig {
    /// Load config from file, then apply environment overrides
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_toml(&content)?;
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Apply `SITE_*` overrides read through `lookup`
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("SITE_BACKEND_URL") {
            self.backend.base_url = Some(url);
            self.backend.kind = BackendKind::Http;
        }
        if let Some(token) = lookup("SITE_API_TOKEN") {
            self.backend.api_token = Some(token);
        }
        if let Some(dir) = lookup("SITE_DATA_DIR") {
            self.backend.data_dir = PathBuf::from(dir);
            if self.backend.kind == BackendKind::Memory {
                self.backend.kind = BackendKind::File;
            }
        }
        if let Some(level) = lookup("SITE_LOG_LEVEL") {
            if level.parse::<log::LevelFilter>().is_err() {
                return Err(ConfigError::Env {
                    key: "SITE_LOG_LEVEL",
                    value: level,
                });
            }
            self.logging.level = level;
        }
        if let Some(ms) = lookup("SITE_REQUEST_TIMEOUT_MS") {
            self.backend.request_timeout_ms = ms.parse().map_err(|_| ConfigError::Env {
                key: "SITE_REQUEST_TIMEOUT_MS",
                value: ms,
            })?;
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        (self.backend.request_timeout_ms > 0).then(|| Duration::from_millis(self.backend.request_timeout_ms))
    }

    /// Build the configured collection client
    pub async fn connect(&self) -> Result<Arc<dyn CollectionClient>, ConfigError> {
        let timeout = self.request_timeout();
        let client: Arc<dyn CollectionClient> = match self.backend.kind {
            BackendKind::Memory => Arc::new(MemoryCollectionClient::new()),
            BackendKind::File => {
                let client = JsonFileCollectionClient::open(&self.backend.data_dir).await?;
                match timeout {
                    Some(limit) => Arc::new(TimeoutClient::new(client, limit)),
                    None => Arc::new(client),
                }
            }
            BackendKind::Http => {
                let base_url = self.backend.base_url.clone().ok_or(ConfigError::MissingBaseUrl)?;
                Arc::new(HttpCollectionClient::new(HttpClientConfig {
                    base_url,
                    api_token: self.backend.api_token.clone(),
                    request_timeout: timeout,
                })?)
            }
        };
        Ok(client)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_empty_file_gives_defaults() {
        let config = SiteConfig::from_toml("").unwrap();
        assert_eq!(config, SiteConfig::default());
        assert_eq!(config.sync.strategy, SyncStrategy::Patch);
        assert_eq!(config.backend.kind, BackendKind::Memory);
    }

    #[test]
    fn test_partial_sections() {
        let config = SiteConfig::from_toml(
            r#"
            [site]
            name = "Acme Consulting"

            [backend]
            kind = "file"
            data_dir = "/var/lib/site"

            [sync]
            strategy = "refetch"
            "#,
        )
        .unwrap();
        assert_eq!(config.site.name, "Acme Consulting");
        assert_eq!(config.site.email, CompanyProfile::default().email);
        assert_eq!(config.backend.kind, BackendKind::File);
        assert_eq!(config.sync.strategy, SyncStrategy::Refetch);
        assert_eq!(config.sync.page_size, 50);
    }

    #[test]
    fn test_unknown_backend_kind_is_rejected() {
        let err = SiteConfig::from_toml("[backend]\nkind = \"ftp\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_env_overrides() {
        let mut config = SiteConfig::default();
        config
            .apply_env(env(&[
                ("SITE_BACKEND_URL", "https://cms.example.com"),
                ("SITE_API_TOKEN", "secret"),
                ("SITE_LOG_LEVEL", "debug"),
                ("SITE_REQUEST_TIMEOUT_MS", "0"),
            ]))
            .unwrap();
        assert_eq!(config.backend.kind, BackendKind::Http);
        assert_eq!(config.backend.api_token.as_deref(), Some("secret"));
        assert_eq!(config.logging.level_filter(), log::LevelFilter::Debug);
        assert_eq!(config.request_timeout(), None);
    }

    #[test]
    fn test_bad_env_value() {
        let mut config = SiteConfig::default();
        let err = config
            .apply_env(env(&[("SITE_REQUEST_TIMEOUT_MS", "soon")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Env { key: "SITE_REQUEST_TIMEOUT_MS", .. }));
    }

    #[tokio::test]
    async fn test_connect_http_without_url_fails() {
        let mut config = SiteConfig::default();
        config.backend.kind = BackendKind::Http;
        assert!(matches!(config.connect().await, Err(ConfigError::MissingBaseUrl)));
    }

    #[tokio::test]
    async fn test_connect_file_backend() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut config = SiteConfig::default();
        config.apply_env(env(&[("SITE_DATA_DIR", dir.path().to_str().unwrap())])).unwrap();
        let client = config.connect().await.unwrap();
        assert!(client.get_all("projects").await.unwrap().is_empty());
    }
}
