use crate::error::ConfigError;
use crate::links::LinkConfig;
use crate::store::{Store, DEFAULT_DATA_FILE};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "dinepick.toml";

/// Settings read from `dinepick.toml`.
///
/// ```toml
/// data_file = "data/restaurants.json"
///
/// [links]
/// map_base_url = "https://map.naver.com/v5/search/"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default = "default_data_file")]
    pub data_file: PathBuf,
    #[serde(default)]
    pub links: LinkConfig,
}

fn default_data_file() -> PathBuf {
    PathBuf::from(DEFAULT_DATA_FILE)
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_file: default_data_file(),
            links: LinkConfig::default(),
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Config = toml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// An explicit path must exist; the implicit one in `dir` is optional.
    pub fn discover(explicit: Option<&Path>, dir: &Path) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        let implicit = dir.join(DEFAULT_CONFIG_FILE);
        if implicit.is_file() {
            Self::load(&implicit)
        } else {
            Ok(Self::default())
        }
    }

    #[must_use]
    pub fn with_data_file(mut self, data_file: Option<PathBuf>) -> Self {
        if let Some(path) = data_file {
            self.data_file = path;
        }
        self
    }

    pub fn store(&self) -> Store {
        Store::new(&self.data_file)
    }
}
