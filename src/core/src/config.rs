use std::path::{Component, Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::paths::{default_config_path, user_home_dir};
use crate::storage::StoreLocation;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to resolve user home; set --home, LATER_HOME or HOME/USERPROFILE")]
    NoHomeDir,

    #[error("{0} is empty")]
    EmptyPath(&'static str),

    #[error("{field} must be a single plain path segment, got '{value}'")]
    InvalidName { field: &'static str, value: String },
}

/// Contents of `config.toml`. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LaterConfig {
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory that holds the dedicated store directory. Defaults to home.
    pub base_dir: Option<String>,
    pub dir_name: String,
    pub file_name: String,
    /// Explicit database file; wins over the dedicated layout.
    pub db_path: Option<String>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            base_dir: None,
            dir_name: StoreLocation::DEFAULT_DIR_NAME.to_string(),
            file_name: StoreLocation::DEFAULT_FILE_NAME.to_string(),
            db_path: None,
        }
    }
}

/// Location settings that take precedence over the config file
/// (command-line flags and their environment fallbacks).
#[derive(Debug, Clone, Default)]
pub struct LocationOverrides {
    pub base_dir: Option<PathBuf>,
    pub db_path: Option<PathBuf>,
}

impl LaterConfig {
    /// Load `path`, or the default config path when `None`.
    ///
    /// A missing default file yields the defaults; an explicitly named file
    /// must exist.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => match default_config_path() {
                Some(path) if path.exists() => path,
                _ => return Ok(Self::default()),
            },
        };
        let raw = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;
        let config = Self::parse(&raw).map_err(|source| ConfigError::Parse {
            path: path.clone(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "config loaded");
        Ok(config)
    }

    pub fn parse(raw: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(raw)
    }

    /// Resolve where the store lives: overrides, then config file, then
    /// `~/.later/later.db`.
    pub fn store_location(
        &self,
        overrides: &LocationOverrides,
    ) -> Result<StoreLocation, ConfigError> {
        let storage = &self.storage;

        if let Some(path) = overrides.db_path.as_ref() {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::EmptyPath("--db-path"));
            }
            return Ok(StoreLocation::File(path.clone()));
        }

        let dir_name = plain_name(&storage.dir_name, "storage.dir_name")?;
        let file_name = plain_name(&storage.file_name, "storage.file_name")?;

        let base_dir = match overrides.base_dir.as_ref() {
            Some(path) if path.as_os_str().is_empty() => {
                return Err(ConfigError::EmptyPath("--home"));
            }
            Some(path) => path.clone(),
            None => {
                if let Some(db_path) = storage.db_path.as_deref() {
                    return Ok(StoreLocation::File(resolve_path(db_path, "storage.db_path")?));
                }
                match storage.base_dir.as_deref() {
                    Some(dir) => resolve_path(dir, "storage.base_dir")?,
                    None => user_home_dir().ok_or(ConfigError::NoHomeDir)?,
                }
            }
        };

        Ok(StoreLocation::dedicated(base_dir, dir_name, file_name))
    }
}

/// `clean` removes `<base>/<dir_name>` recursively, so both names must stay
/// inside the base directory: exactly one normal component.
fn plain_name<'a>(value: &'a str, field: &'static str) -> Result<&'a str, ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::EmptyPath(field));
    }
    let mut components = Path::new(trimmed).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(trimmed),
        _ => Err(ConfigError::InvalidName {
            field,
            value: trimmed.to_string(),
        }),
    }
}

/// Expand a leading `~` to the user's home directory.
fn resolve_path(value: &str, field: &'static str) -> Result<PathBuf, ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::EmptyPath(field));
    }
    if trimmed == "~" {
        return user_home_dir().ok_or(ConfigError::NoHomeDir);
    }
    if let Some(rest) = trimmed.strip_prefix("~/") {
        let home = user_home_dir().ok_or(ConfigError::NoHomeDir)?;
        return Ok(home.join(rest));
    }
    Ok(PathBuf::from(trimmed))
}
