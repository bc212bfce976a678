use directories::ProjectDirs;
use reqwest::Url;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";

/// Per-directory config file, layered over the platform one.
pub const LOCAL_CONFIG_FILE: &str = ".student-results.toml";

/// On-disk TOML configuration.
/// All fields are optional so partial configs merge over defaults.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ConfigFile {
    pub server: Option<ServerConfig>,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ServerConfig {
    pub base_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct LoggingConfig {
    pub level: Option<String>,
    pub directory: Option<PathBuf>,
}

/// Fully resolved settings.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub base_url: Url,
    pub log_level: Option<String>,
    pub log_directory: Option<PathBuf>,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("could not read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("invalid server URL {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },
}

pub fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "student-results", "student-results")
}

/// Platform config path, e.g. `~/.config/student-results/config.toml`.
pub fn platform_config_path() -> Option<PathBuf> {
    project_dirs().map(|d| d.config_dir().join("config.toml"))
}

/// Load configuration by cascading, lowest precedence first: defaults,
/// platform config, `./.student-results.toml`, the `--config` file, and the
/// `--url` flag.
pub fn load(explicit: Option<&Path>, url_override: Option<&str>) -> Result<Config, ConfigError> {
    let mut layers = Vec::new();
    if let Some(path) = platform_config_path() {
        layers.extend(load_optional(&path)?);
    }
    layers.extend(load_optional(Path::new(LOCAL_CONFIG_FILE))?);
    if let Some(path) = explicit {
        layers.push(load_required(path)?);
    }

    let file = layers.into_iter().fold(ConfigFile::default(), merge);
    resolve(file, url_override)
}

/// A missing file is not an error; a malformed one is.
fn load_optional(path: &Path) -> Result<Option<ConfigFile>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    load_required(path).map(Some)
}

fn load_required(path: &Path) -> Result<ConfigFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let file = toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(path = %path.display(), "config file loaded");
    Ok(file)
}

/// Merge two configs: `overlay` values take precedence over `base`.
fn merge(base: ConfigFile, overlay: ConfigFile) -> ConfigFile {
    let base_server = base.server.unwrap_or_default();
    let overlay_server = overlay.server.unwrap_or_default();
    let base_logging = base.logging.unwrap_or_default();
    let overlay_logging = overlay.logging.unwrap_or_default();

    ConfigFile {
        server: Some(ServerConfig {
            base_url: overlay_server.base_url.or(base_server.base_url),
        }),
        logging: Some(LoggingConfig {
            level: overlay_logging.level.or(base_logging.level),
            directory: overlay_logging.directory.or(base_logging.directory),
        }),
    }
}

fn resolve(file: ConfigFile, url_override: Option<&str>) -> Result<Config, ConfigError> {
    let server = file.server.unwrap_or_default();
    let logging = file.logging.unwrap_or_default();

    let raw_url = url_override
        .map(str::to_string)
        .or(server.base_url)
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

    Ok(Config {
        base_url: parse_base_url(&raw_url)?,
        log_level: logging.level,
        log_directory: logging.directory,
    })
}

fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidUrl {
        url: raw.to_string(),
        reason,
    };
    let url = Url::parse(raw.trim()).map_err(|e| invalid(e.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(invalid(format!("unsupported scheme {:?}", other))),
    }
}
