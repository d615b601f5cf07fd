//! Process-wide Landmark configuration.
//!
//! Configuration comes from a TOML file with one table per environment:
//!
//! ```toml
//! [development]
//! normalize_paths = false
//!
//! [production]
//! api_key = "KEY"
//! ```
//!
//! followed by optional environment variable overrides:
//!
//! | Variable | Effect |
//! |---|---|
//! | `LANDMARK_CONFIG` | Config file path (default `config/landmark.toml`) |
//! | `LANDMARK_ENV` | Table to read (default `development`) |
//! | `LANDMARK_API_KEY` | Overrides `api_key` |
//! | `LANDMARK_NORMALIZE_PATHS` | Overrides `normalize_paths` (`true`/`false`) |
//!
//! A missing or broken configuration never stops the host application:
//! [`Config::load`] logs a warning and falls back to [`Config::default`].

use crate::error::ConfigError;
use crate::path::normalize_path;
use serde::Deserialize;
use std::path::Path;
use std::sync::OnceLock;

/// Default config file location, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "config/landmark.toml";

/// Environment used when `LANDMARK_ENV` is unset.
pub const DEFAULT_ENVIRONMENT: &str = "development";

/// Landmark settings shared read-only by every request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    api_key: Option<String>,
    normalize_paths: bool,
}

/// Shape of one environment table in the config file.
#[derive(Debug, Deserialize)]
struct EnvironmentTable {
    api_key: Option<String>,
    normalize_paths: Option<bool>,
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    /// Configuration with no API key and path normalization enabled.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            api_key: None,
            normalize_paths: true,
        }
    }

    /// Set the API key sent in every `initialize` call.
    #[must_use]
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Enable or disable normalization of automatically tracked paths.
    #[must_use]
    pub const fn with_normalize_paths(mut self, normalize_paths: bool) -> Self {
        self.normalize_paths = normalize_paths;
        self
    }

    /// The configured API key.
    #[must_use]
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    /// Whether automatically tracked paths are normalized.
    #[must_use]
    pub const fn normalize_paths(&self) -> bool {
        self.normalize_paths
    }

    /// The action name to track for a page view of `path`.
    #[must_use]
    pub fn page_action(&self, path: &str) -> String {
        if self.normalize_paths {
            normalize_path(path)
        } else {
            path.to_string()
        }
    }

    /// Load the `environment` table from the TOML file at `path`.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the file cannot be read, is not valid
    /// TOML, has wrong-typed fields, or has no table for
    /// `environment`.
    pub fn try_load(path: impl AsRef<Path>, environment: &str) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let display = path.display().to_string();

        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: display.clone(),
            source,
        })?;
        let mut root: toml::Table = toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: display.clone(),
            source,
        })?;
        let table = root
            .remove(environment)
            .ok_or_else(|| ConfigError::MissingEnvironment {
                path: display.clone(),
                environment: environment.to_string(),
            })?;
        let table: EnvironmentTable = table.try_into().map_err(|source| ConfigError::Parse {
            path: display,
            source,
        })?;

        Ok(Self {
            api_key: table.api_key,
            normalize_paths: table.normalize_paths.unwrap_or(true),
        })
    }

    /// Load the `environment` table from `path`, falling back to defaults.
    ///
    /// Any failure is logged and yields [`Config::default`].
    #[must_use]
    pub fn load(path: impl AsRef<Path>, environment: &str) -> Self {
        match Self::try_load(path, environment) {
            Ok(config) => {
                tracing::debug!(
                    environment,
                    has_api_key = config.api_key.is_some(),
                    normalize_paths = config.normalize_paths,
                    "Loaded Landmark configuration"
                );
                config
            }
            Err(err) => {
                tracing::warn!(error = %err, "Landmark configuration unavailable, using defaults");
                Self::default()
            }
        }
    }

    /// Apply `LANDMARK_API_KEY` and `LANDMARK_NORMALIZE_PATHS` overrides.
    #[must_use]
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides using `lookup` in place of the process environment.
    ///
    /// Values that do not parse are ignored.
    #[must_use]
    pub fn with_overrides_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(api_key) = lookup("LANDMARK_API_KEY").filter(|key| !key.is_empty()) {
            self.api_key = Some(api_key);
        }
        if let Some(raw) = lookup("LANDMARK_NORMALIZE_PATHS") {
            match raw.trim().parse() {
                Ok(normalize_paths) => self.normalize_paths = normalize_paths,
                Err(_) => tracing::warn!(value = %raw, "Ignoring invalid LANDMARK_NORMALIZE_PATHS"),
            }
        }
        self
    }

    /// Load configuration the way a deployed application does.
    ///
    /// Reads `LANDMARK_CONFIG` for environment `LANDMARK_ENV`, then applies
    /// environment variable overrides.
    #[must_use]
    pub fn from_env() -> Self {
        let path =
            std::env::var("LANDMARK_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        let environment =
            std::env::var("LANDMARK_ENV").unwrap_or_else(|_| DEFAULT_ENVIRONMENT.to_string());
        Self::load(path, &environment).with_env_overrides()
    }

    /// The process-wide configuration, loaded by [`Config::from_env`] on first use.
    #[must_use]
    pub fn global() -> &'static Self {
        static GLOBAL: OnceLock<Config> = OnceLock::new();
        GLOBAL.get_or_init(Self::from_env)
    }
}
