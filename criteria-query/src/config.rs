//! Configuration management using Figment
//!
//! Sources are merged lowest priority first:
//!
//! 1. Built-in defaults
//! 2. A TOML file (`criteria-query.toml` in the working directory, or the
//!    path given to [`Config::load_from`]; `.json` paths are read as JSON)
//! 3. Environment variables prefixed with `CRITERIA_QUERY_`, with `__`
//!    separating nested keys (`CRITERIA_QUERY_PAGING__DEFAULT_SIZE=25`)
//!
//! ```toml
//! [paging]
//! default_size = 25
//! default_sort = "created_at"
//! default_desc = true
//!
//! [logging]
//! level = "criteria_query=debug,info"
//! format = "pretty"
//! ```

use std::path::Path;

use figment::{
    providers::{Env, Format, Json, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::paging::{PageParameters, SortParameter, DEFAULT_PAGE_SIZE, DEFAULT_SORT_FIELD};

/// Config file read by [`Config::load`]
pub const CONFIG_FILE: &str = "criteria-query.toml";

/// Prefix for environment variable overrides
pub const ENV_PREFIX: &str = "CRITERIA_QUERY_";

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Defaults for page requests
    #[serde(default)]
    pub paging: PagingConfig,

    /// Log output
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Defaults for page requests
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PagingConfig {
    /// Rows per page
    #[serde(default = "default_page_size")]
    pub default_size: u32,

    /// Field sorted on
    #[serde(default = "default_sort_field")]
    pub default_sort: String,

    /// Sort descending
    #[serde(default)]
    pub default_desc: bool,
}

impl Default for PagingConfig {
    fn default() -> Self {
        Self {
            default_size: default_page_size(),
            default_sort: default_sort_field(),
            default_desc: false,
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// One JSON object per event
    #[default]
    Json,
    /// Human-readable multi-line output
    Pretty,
}

/// Log output configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directive, e.g. `info` or `criteria_query=debug`
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

fn default_sort_field() -> String {
    DEFAULT_SORT_FIELD.to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from [`CONFIG_FILE`] and the environment
    pub fn load() -> Result<Self> {
        Self::load_from(CONFIG_FILE)
    }

    /// Load configuration from a specific file and the environment
    ///
    /// A missing file is not an error; defaults and environment variables
    /// still apply.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        tracing::debug!("Loading configuration from: {}", path.display());

        let config: Self = Self::figment(path).extract()?;
        config.validate()?;
        Ok(config)
    }

    /// The merged sources, before extraction
    pub fn figment(path: impl AsRef<Path>) -> Figment {
        let path = path.as_ref();
        let figment = Figment::new().merge(Serialized::defaults(Config::default()));

        let figment = if path.extension().is_some_and(|ext| ext == "json") {
            figment.merge(Json::file(path))
        } else {
            figment.merge(Toml::file(path))
        };

        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    fn validate(&self) -> Result<()> {
        if self.paging.default_size == 0 {
            return Err(figment::Error::from(
                "paging.default_size must be greater than zero".to_string(),
            )
            .into());
        }
        Ok(())
    }

    /// Page parameters for the first page with the configured defaults
    ///
    /// ```rust
    /// use criteria_query::config::Config;
    ///
    /// let params = Config::default().page_parameters();
    /// assert_eq!(params.size, 100);
    /// assert_eq!(params.page, 0);
    /// ```
    #[must_use]
    pub fn page_parameters(&self) -> PageParameters {
        PageParameters::new(self.paging.default_size, 0).with_sort(vec![SortParameter::new(
            self.paging.default_sort.clone(),
            self.paging.default_desc,
        )])
    }
}
