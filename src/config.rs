use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::content::{
    ContentProvider, DirectoryContentProvider, HttpContentProvider, StaticContentProvider,
};
use crate::storage::{FileStorage, FORM_DATA_KEY};
use crate::wizard::StepCatalog;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub paths: PathsConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub content: ContentConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    pub ui: UiConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Directory holding stored form data and logs
    pub state: String,
    /// Component documents, used when `content.source = "directory"`
    pub components: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Key the form data snapshot is stored under
    #[serde(default = "default_storage_key")]
    pub key: String,
}

fn default_storage_key() -> String {
    FORM_DATA_KEY.to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            key: default_storage_key(),
        }
    }
}

/// Where sub-step components are resolved from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentSource {
    /// Components compiled into the binary
    #[default]
    Builtin,
    /// YAML files under `paths.components`
    Directory,
    /// YAML documents served under `content.base_url`
    Http,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentConfig {
    #[serde(default)]
    pub source: ContentSource,
    /// Base URL for the http source
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Request timeout in seconds (default: 10)
    #[serde(default = "default_content_timeout")]
    pub timeout_secs: u64,
}

fn default_content_timeout() -> u64 {
    10
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            source: ContentSource::Builtin,
            base_url: None,
            timeout_secs: default_content_timeout(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// YAML catalog replacing the built-in add-building steps
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    pub refresh_rate_ms: u64,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Whether to log to file in TUI mode (false = stderr for debugging)
    #[serde(default = "default_log_to_file")]
    pub to_file: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_to_file() -> bool {
    true
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            to_file: default_log_to_file(),
        }
    }
}

impl Config {
    /// Path to the project-local config file
    pub fn local_config_path() -> PathBuf {
        PathBuf::from(".building-wizard/config.toml")
    }

    pub fn load(config_path: Option<&str>) -> Result<Self> {
        // Start with embedded defaults so the wizard works without config files
        let defaults = Config::default();
        let defaults_json =
            serde_json::to_string(&defaults).context("Failed to serialize default config")?;

        let mut builder = config::Config::builder().add_source(config::File::from_str(
            &defaults_json,
            config::FileFormat::Json,
        ));

        let local_config = Self::local_config_path();
        if local_config.exists() {
            builder = builder.add_source(config::File::from(local_config));
        }

        // User config in ~/.config/building-wizard/ (optional global overrides)
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("building-wizard").join("config.toml");
            if user_config.exists() {
                builder = builder.add_source(config::File::from(user_config));
            }
        }

        // Explicit config file (CLI override)
        if let Some(path) = config_path {
            builder = builder.add_source(config::File::with_name(path));
        }

        // Environment variables, e.g. BUILDING_WIZARD__CONTENT__SOURCE=directory
        builder = builder.add_source(
            config::Environment::with_prefix("BUILDING_WIZARD")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build().context("Failed to load configuration")?;
        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }

    /// Save config to .building-wizard/config.toml
    pub fn save(&self) -> Result<PathBuf> {
        let config_path = Self::local_config_path();

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let toml_str =
            toml::to_string_pretty(self).context("Failed to serialize config to TOML")?;

        std::fs::write(&config_path, toml_str).context("Failed to write config file")?;

        Ok(config_path)
    }

    /// Get absolute path to state directory
    pub fn state_path(&self) -> PathBuf {
        absolute(&self.paths.state)
    }

    /// Get absolute path to components directory
    pub fn components_path(&self) -> PathBuf {
        absolute(&self.paths.components)
    }

    /// Get absolute path to logs directory
    pub fn logs_path(&self) -> PathBuf {
        self.state_path().join("logs")
    }

    /// Load the configured step catalog, or the built-in one
    pub fn load_catalog(&self) -> Result<StepCatalog> {
        match &self.catalog.path {
            Some(path) => {
                let path = absolute(path);
                StepCatalog::load(&path)
                    .with_context(|| format!("Failed to load catalog {}", path.display()))
            }
            None => StepCatalog::building().context("Built-in catalog is invalid"),
        }
    }

    /// Build the content provider for the configured source
    pub fn content_provider(&self) -> Result<Arc<dyn ContentProvider>> {
        let provider: Arc<dyn ContentProvider> = match self.content.source {
            ContentSource::Builtin => Arc::new(
                StaticContentProvider::building().context("Built-in components are invalid")?,
            ),
            ContentSource::Directory => {
                Arc::new(DirectoryContentProvider::new(self.components_path()))
            }
            ContentSource::Http => {
                let base_url = self
                    .content
                    .base_url
                    .as_deref()
                    .context("content.base_url is required for the http source")?;
                Arc::new(
                    HttpContentProvider::new(
                        base_url,
                        Duration::from_secs(self.content.timeout_secs),
                    )
                    .context("Failed to build HTTP client")?,
                )
            }
        };
        Ok(provider)
    }

    pub fn file_storage(&self) -> FileStorage {
        FileStorage::new(self.state_path())
    }
}

fn absolute(path: &str) -> PathBuf {
    let path = PathBuf::from(path);
    if path.is_absolute() {
        path
    } else {
        std::env::current_dir().unwrap_or_default().join(path)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            paths: PathsConfig {
                state: ".building-wizard".to_string(), // Relative to cwd
                components: "components".to_string(),
            },
            storage: StorageConfig::default(),
            content: ContentConfig::default(),
            catalog: CatalogConfig::default(),
            ui: UiConfig {
                refresh_rate_ms: 100,
            },
            logging: LoggingConfig::default(),
        }
    }
}
