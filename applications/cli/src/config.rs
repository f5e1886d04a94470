/// CLI configuration
use crate::error::{CliError, Result};
use roster_client::ClientConfig;
use roster_core::DEFAULT_PAGE_SIZE;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// File read when no `--config` path is given
pub const DEFAULT_CONFIG_FILE: &str = "roster.toml";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RosterConfig {
    #[serde(default = "default_api")]
    pub api: ApiSettings,

    #[serde(default = "default_feed")]
    pub feed: FeedSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiSettings {
    #[serde(default = "default_url")]
    pub url: String,

    /// Application key sent as `app-id`. No default: it is issued per account.
    #[serde(default)]
    pub app_id: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FeedSettings {
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

impl RosterConfig {
    /// Load configuration from file and environment.
    ///
    /// An explicit `path` must exist; otherwise `roster.toml` in the working
    /// directory is read when present. `ROSTER_`-prefixed variables override
    /// both, with `__` between section and key (`ROSTER_API__APP_ID`).
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with(path, environment())
    }

    fn load_with(path: Option<&Path>, env: config::Environment) -> Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                if !path.exists() {
                    return Err(CliError::Config(format!(
                        "config file {} does not exist",
                        path.display()
                    )));
                }
                settings = settings.add_source(config::File::from(path.to_path_buf()));
            }
            None => {
                let config_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if config_path.exists() {
                    settings = settings.add_source(config::File::from(config_path));
                }
            }
        }

        settings = settings.add_source(env);

        let config = settings.build()?;
        Ok(config.try_deserialize()?)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.api.app_id.trim().is_empty() {
            return Err(CliError::Config(
                "app id is required (set ROSTER_API__APP_ID or api.app_id)".to_string(),
            ));
        }

        if !self.api.url.starts_with("http://") && !self.api.url.starts_with("https://") {
            return Err(CliError::Config(format!(
                "api.url must be an http(s) URL, got {:?}",
                self.api.url
            )));
        }

        if self.feed.page_size == 0 {
            return Err(CliError::Config(
                "feed.page_size must be at least 1".to_string(),
            ));
        }

        Ok(())
    }

    /// Connection settings for [`roster_client::RosterClient`]
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig::new(self.api.url.clone(), self.api.app_id.clone()).with_timeouts(
            Duration::from_secs(self.api.timeout_secs),
            Duration::from_secs(self.api.connect_timeout_secs),
        )
    }
}

/// `ROSTER_`-prefixed variables. Values stay strings until deserialized, so
/// a digits-only app id keeps its leading zeros.
fn environment() -> config::Environment {
    config::Environment::with_prefix("ROSTER")
        .prefix_separator("_")
        .separator("__")
}

// Default values
fn default_api() -> ApiSettings {
    ApiSettings {
        url: default_url(),
        app_id: String::new(),
        timeout_secs: default_timeout_secs(),
        connect_timeout_secs: default_connect_timeout_secs(),
    }
}

fn default_url() -> String {
    "https://dummyapi.io/data/v1".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_feed() -> FeedSettings {
    FeedSettings {
        page_size: default_page_size(),
    }
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

impl Default for RosterConfig {
    fn default() -> Self {
        Self {
            api: default_api(),
            feed: default_feed(),
        }
    }
}
