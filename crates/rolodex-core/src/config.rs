use crate::error::ErrorCode;
use crate::model::tags::{DEFAULT_VOCABULARY, normalize_vocabulary};
use serde::{Deserialize, Serialize};
use std::io;
use std::path::{Path, PathBuf};
use url::Url;

/// Base URL used when neither flag, environment nor config file sets one.
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:3000/api";

/// Environment variable overriding the configured base URL.
pub const API_URL_ENV: &str = "ROLODEX_API_URL";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid API base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

impl ConfigError {
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Read { .. } => ErrorCode::ConfigReadFailed,
            Self::Parse { .. } => ErrorCode::ConfigParseError,
            Self::InvalidBaseUrl { .. } => ErrorCode::InvalidBaseUrl,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RolodexConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub tags: TagConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_api_url")]
    pub base_url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_api_url(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagConfig {
    #[serde(default = "default_vocabulary")]
    pub vocabulary: Vec<String>,
}

impl Default for TagConfig {
    fn default() -> Self {
        Self {
            vocabulary: default_vocabulary(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default = "default_true")]
    pub confirm_delete: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            confirm_delete: default_true(),
        }
    }
}

/// Settings after flag, environment and file layers are merged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    pub base_url: Url,
    pub vocabulary: Vec<String>,
    pub confirm_delete: bool,
}

/// `<config dir>/rolodex/config.toml`, if the platform has a config dir.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("rolodex").join("config.toml"))
}

/// Load the config file.
///
/// An explicit `path` must exist. Without one, the default location is used
/// and a missing file yields the defaults.
///
/// # Errors
///
/// Returns [`ConfigError::Read`] or [`ConfigError::Parse`] when the file
/// cannot be read or is not valid TOML for [`RolodexConfig`].
pub fn load_config(path: Option<&Path>) -> Result<RolodexConfig, ConfigError> {
    let path = match path {
        Some(explicit) => explicit.to_path_buf(),
        None => match default_config_path() {
            Some(default) if default.exists() => default,
            _ => return Ok(RolodexConfig::default()),
        },
    };

    let content = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
        path: path.clone(),
        source,
    })?;

    toml::from_str::<RolodexConfig>(&content).map_err(|source| ConfigError::Parse { path, source })
}

/// Merge the layers. Base URL precedence: `cli_api_url` > `env_api_url` >
/// file > [`DEFAULT_API_URL`].
///
/// # Errors
///
/// Returns [`ConfigError::InvalidBaseUrl`] when the winning base URL is not
/// an absolute http(s) URL.
pub fn resolve_config(
    file: &RolodexConfig,
    cli_api_url: Option<&str>,
    env_api_url: Option<&str>,
) -> Result<ResolvedConfig, ConfigError> {
    let raw_url = cli_api_url
        .or(env_api_url)
        .filter(|url| !url.trim().is_empty())
        .unwrap_or(&file.api.base_url);

    Ok(ResolvedConfig {
        base_url: parse_base_url(raw_url)?,
        vocabulary: normalize_vocabulary(&file.tags.vocabulary),
        confirm_delete: file.ui.confirm_delete,
    })
}

/// Validate a base URL for the contact service.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidBaseUrl`] for unparseable, non-http(s) or
/// cannot-be-a-base URLs.
pub fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidBaseUrl {
        url: raw.to_string(),
        reason,
    };

    let url = Url::parse(raw.trim()).map_err(|err| invalid(err.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
    }
    if url.cannot_be_a_base() {
        return Err(invalid("URL cannot carry a path".to_string()));
    }
    Ok(url)
}

const fn default_true() -> bool {
    true
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_vocabulary() -> Vec<String> {
    DEFAULT_VOCABULARY.iter().map(|tag| (*tag).to_string()).collect()
}
