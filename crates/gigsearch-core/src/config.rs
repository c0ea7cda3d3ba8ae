//! Lightweight configuration loader and path helpers.
//!
//! Uses Figment to merge built-in defaults, `config.toml`, `config.<env>.toml`
//! and `APP_*` env vars (`APP_SEARCH__MAX_LIMIT=50` sets `search.max_limit`).
//! Provides helpers to expand `~` and `${VAR}` and to resolve relative paths
//! against the directory the configuration was loaded from.

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::query::{SortKey, DEFAULT_LIMIT};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SearchConfig {
    pub default_limit: usize,
    pub max_limit: usize,
    pub default_sort: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self { default_limit: DEFAULT_LIMIT, max_limit: 100, default_sort: "relevance".to_string() }
    }
}

impl SearchConfig {
    pub fn default_sort_key(&self) -> SortKey {
        SortKey::parse(&self.default_sort)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DataConfig {
    /// JSON file or directory of JSON files; the built-in sample catalog is
    /// used when unset.
    pub listings_path: Option<String>,
    /// JSON facet definitions; the built-in context facets are used when unset.
    pub facets_path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_string(), json: false }
    }
}

impl LoggingConfig {
    /// The level as a tracing filter directive. `warning` is spelled `warn`
    /// there; any other word would be read as a target name.
    pub fn filter_directive(&self) -> String {
        match self.level.trim().to_ascii_lowercase().as_str() {
            "warning" => "warn".to_string(),
            other => other.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub search: SearchConfig,
    pub data: DataConfig,
    pub logging: LoggingConfig,
}

impl Settings {
    pub fn validate(&self) -> Result<()> {
        if self.search.default_limit == 0 {
            return Err(Error::InvalidConfig("search.default_limit must be at least 1".to_string()));
        }
        if self.search.max_limit < self.search.default_limit {
            return Err(Error::InvalidConfig(format!(
                "search.max_limit ({}) is below search.default_limit ({})",
                self.search.max_limit, self.search.default_limit
            )));
        }
        match self.logging.filter_directive().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
            other => Err(Error::InvalidConfig(format!(
                "logging.level '{other}' is not one of trace, debug, info, warn, error"
            ))),
        }
    }
}

pub struct Config {
    figment: Figment,
    base_dir: PathBuf,
    settings: Settings,
}

impl Config {
    /// Load from the current directory for the environment named by `RUST_ENV` (default `dev`).
    pub fn load() -> Result<Self> {
        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());
        Self::load_from(Path::new("."), &env_name)
    }

    pub fn load_from(dir: &Path, env_name: &str) -> Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(Settings::default()))
            .merge(Toml::file(dir.join("config.toml")));
        match env_name {
            "dev" | "development" => {
                figment = figment.merge(Toml::file(dir.join("config.dev.toml")));
            }
            "prod" | "production" => {
                figment = figment.merge(Toml::file(dir.join("config.prod.toml")));
            }
            "test" | "testing" => {
                figment = figment.merge(Toml::file(dir.join("config.test.toml")));
            }
            _ => {}
        }
        figment = figment.merge(Env::prefixed("APP_").split("__"));
        Self::from_figment(figment, dir)
    }

    pub fn from_figment(figment: Figment, base_dir: &Path) -> Result<Self> {
        let settings: Settings = figment
            .extract()
            .map_err(|e| Error::InvalidConfig(e.to_string()))?;
        settings.validate()?;
        Ok(Self { figment, base_dir: base_dir.to_path_buf(), settings })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn get<T>(&self, key: &str) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        self.figment
            .extract_inner(key)
            .map_err(|e| Error::InvalidConfig(format!("Failed to get '{key}': {e}")))
    }

    pub fn listings_path(&self) -> Option<PathBuf> {
        let path = self.settings.data.listings_path.as_deref()?;
        Some(resolve_with_base(&self.base_dir, path))
    }

    pub fn facets_path(&self) -> Option<PathBuf> {
        let path = self.settings.data.facets_path.as_deref()?;
        Some(resolve_with_base(&self.base_dir, path))
    }
}

/// Expand a user-provided path string:
/// - Expands leading '~' to the user's home directory
/// - Expands ${VAR} and $VAR environment variables
/// - Returns a PathBuf without attempting to canonicalize
pub fn expand_path<S: AsRef<str>>(input: S) -> PathBuf {
    let s = input.as_ref();
    let expanded_env = shellexpand::env(s).unwrap_or(std::borrow::Cow::Borrowed(s));
    let expanded = shellexpand::tilde(&expanded_env);
    PathBuf::from(expanded.as_ref())
}

/// Resolve a possibly relative path against a given base directory after expansion.
/// If `p` is absolute, it's returned as-is; otherwise `base.join(p)` is returned.
pub fn resolve_with_base<S: AsRef<str>>(base: &Path, p: S) -> PathBuf {
    let p = expand_path(p);
    if p.is_absolute() { p } else { base.join(p) }
}
