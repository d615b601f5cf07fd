//! Error types for Landmark core operations.

use thiserror::Error;

/// Result type alias for Landmark core operations.
pub type Result<T> = std::result::Result<T, LandmarkError>;

/// Errors a caller can observe from the core API.
///
/// Rendering never fails and configuration failures are recovered
/// internally (see [`ConfigError`]), so the only user-visible error is a
/// contract violation at an identify or track call site.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LandmarkError {
    /// A value passed to `identify` or `track` could not be turned into a
    /// JSON object.
    #[error("{call}: {reason}")]
    ContractViolation {
        /// The call that received the bad value (`"identify"` or `"track"`)
        call: &'static str,
        /// What was wrong with the value
        reason: String,
    },
}

impl LandmarkError {
    /// Create a contract violation for the given call site.
    #[must_use]
    pub fn contract_violation(call: &'static str, reason: impl Into<String>) -> Self {
        Self::ContractViolation {
            call,
            reason: reason.into(),
        }
    }
}

/// Reasons a configuration source could not be used.
///
/// [`Config::load`](crate::config::Config::load) swallows these and falls back
/// to defaults; [`Config::try_load`](crate::config::Config::try_load) returns
/// them.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("Failed to read config file {path}: {source}")]
    Io {
        /// Path that was read
        path: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML or has wrong-typed fields.
    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        /// Path that was parsed
        path: String,
        /// Underlying parse error
        #[source]
        source: toml::de::Error,
    },

    /// The file has no table for the requested environment.
    #[error("No [{environment}] section in config file {path}")]
    MissingEnvironment {
        /// Path that was parsed
        path: String,
        /// Environment that was requested
        environment: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contract_violation_display() {
        let err = LandmarkError::contract_violation("track", "properties must be a JSON object");
        assert_eq!(err.to_string(), "track: properties must be a JSON object");
    }

    #[test]
    fn test_missing_environment_display() {
        let err = ConfigError::MissingEnvironment {
            path: "config/landmark.toml".to_string(),
            environment: "staging".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "No [staging] section in config file config/landmark.toml"
        );
    }
}
