//! Client configuration
//!
//! Settings come from code, a TOML file or the environment:
//!
//! ```toml
//! [api]
//! key = "your-api-key"
//! base_url = "https://api.lucid.co"
//! version = "1"
//! timeout_secs = 30
//! product = "lucidchart"
//! ```

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

use crate::core::{LucidError, Result};

pub const DEFAULT_BASE_URL: &str = "https://api.lucid.co";
pub const DEFAULT_API_VERSION: &str = "1";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_PRODUCT: &str = "lucidchart";

pub const ENV_API_KEY: &str = "LUCID_API_KEY";
pub const ENV_BASE_URL: &str = "LUCID_API_BASE_URL";

/// File name looked up in the working directory and the user config dir
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Everything the client needs to reach the service
#[derive(Clone, PartialEq)]
pub struct ClientConfig {
    pub api_key: String,
    pub base_url: String,
    pub api_version: String,
    pub timeout: Duration,
    pub product: String,
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("api_version", &self.api_version)
            .field("timeout", &self.timeout)
            .field("product", &self.product)
            .finish()
    }
}

#[derive(Debug, Deserialize)]
struct ConfigFile {
    api: ApiSection,
}

#[derive(Debug, Deserialize)]
struct ApiSection {
    key: Option<String>,
    base_url: Option<String>,
    version: Option<String>,
    timeout_secs: Option<u64>,
    product: Option<String>,
}

impl ClientConfig {
    /// Defaults for everything but the key
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            timeout: DEFAULT_TIMEOUT,
            product: DEFAULT_PRODUCT.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = version.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_product(mut self, product: impl Into<String>) -> Self {
        self.product = product.into();
        self
    }

    /// Parse the `[api]` table of a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Self::parse_toml(content, None)
    }

    /// Like [`ClientConfig::from_toml_str`], with `api_key` taking the place
    /// of the file's key; the file may then leave `key` out
    pub fn from_toml_str_with_key(content: &str, api_key: Option<&str>) -> Result<Self> {
        Self::parse_toml(content, api_key)
    }

    fn parse_toml(content: &str, api_key: Option<&str>) -> Result<Self> {
        let file: ConfigFile = toml::from_str(content)
            .map_err(|e| LucidError::config(format!("invalid config: {}", e)))?;
        let api = file.api;
        let key = api_key
            .map(str::to_string)
            .or(api.key)
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| LucidError::config("missing [api] key"))?;

        let mut config = ClientConfig::new(key);
        if let Some(base_url) = api.base_url {
            config.base_url = base_url;
        }
        if let Some(version) = api.version {
            config.api_version = version;
        }
        if let Some(secs) = api.timeout_secs {
            config.timeout = Duration::from_secs(secs);
        }
        if let Some(product) = api.product {
            config.product = product;
        }
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_file_with_key(path, None)
    }

    /// Read a config file, letting `api_key` override the file's key
    pub fn from_file_with_key(path: impl AsRef<Path>, api_key: Option<&str>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            LucidError::config(format!("cannot read {}: {}", path.display(), e))
        })?;
        debug!(path = %path.display(), "Loaded client config");
        Self::parse_toml(&content, api_key)
    }

    /// Read `LUCID_API_KEY` and `LUCID_API_BASE_URL`
    pub fn from_env() -> Option<Self> {
        Self::from_env_with(|name| std::env::var(name).ok())
    }

    /// Like [`ClientConfig::from_env`] with a custom variable lookup
    pub fn from_env_with<F>(lookup: F) -> Option<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let key = lookup(ENV_API_KEY).filter(|k| !k.trim().is_empty())?;
        let mut config = ClientConfig::new(key);
        if let Some(base_url) = lookup(ENV_BASE_URL).filter(|u| !u.is_empty()) {
            config.base_url = base_url;
        }
        Some(config)
    }

    /// Files checked by [`ClientConfig::load`], in order
    pub fn search_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(CONFIG_FILE_NAME)];
        if let Some(dir) = dirs::config_dir() {
            paths.push(dir.join("lucidkit").join(CONFIG_FILE_NAME));
        }
        paths
    }

    /// First configuration found in the environment or the search paths
    pub fn load() -> Result<Self> {
        if let Some(config) = Self::from_env() {
            debug!("Using client config from environment");
            return Ok(config);
        }
        for path in Self::search_paths() {
            if path.is_file() {
                return Self::from_file(&path);
            }
        }
        Err(LucidError::config(format!(
            "no API key: set {} or add an [api] key to {}",
            ENV_API_KEY, CONFIG_FILE_NAME
        )))
    }

    pub fn validate(&self) -> Result<()> {
        if self.api_key.trim().is_empty() {
            return Err(LucidError::config("API key is empty"));
        }
        if !(self.base_url.starts_with("https://") || self.base_url.starts_with("http://")) {
            return Err(LucidError::config(format!(
                "base URL must be http(s), got '{}'",
                self.base_url
            )));
        }
        if self.timeout.is_zero() {
            return Err(LucidError::config("timeout must be greater than zero"));
        }
        Ok(())
    }

    /// Absolute URL for an API path such as `/documents`
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}
