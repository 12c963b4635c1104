//! core::config::schema
//!
//! Configuration schema types.
//!
//! # Validation
//!
//! Config values are validated after parsing: the log filter must be a valid
//! tracing directive, default scopes must be single path segments and the
//! default transform must be usable as a transform tag.

use serde::{Deserialize, Serialize};

use super::ConfigError;
use crate::core::names::{NameParts, SEPARATOR};

/// Global configuration (user scope).
///
/// # Example
///
/// ```toml
/// json = false
/// log_filter = "namescope=debug"
///
/// [qualify]
/// default_scopes = ["model"]
/// transform = "log"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct GlobalConfig {
    /// Emit JSON instead of text
    pub json: Option<bool>,

    /// Tracing filter used when `RUST_LOG` is not set
    pub log_filter: Option<String>,

    /// Defaults for the qualify command
    pub qualify: Option<QualifyDefaults>,
}

impl GlobalConfig {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(filter) = &self.log_filter {
            tracing_subscriber::EnvFilter::try_new(filter).map_err(|e| {
                ConfigError::InvalidValue(format!("invalid log_filter '{}': {}", filter, e))
            })?;
        }

        if let Some(qualify) = &self.qualify {
            qualify.validate()?;
        }

        Ok(())
    }
}

/// Qualify command defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct QualifyDefaults {
    /// Scopes entered before the ones given on the command line
    pub default_scopes: Option<Vec<String>>,

    /// Transform applied when none is given
    pub transform: Option<String>,
}

impl QualifyDefaults {
    /// Validate the qualify defaults.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for scope in self.default_scopes.iter().flatten() {
            if scope.contains(SEPARATOR) {
                return Err(ConfigError::InvalidValue(format!(
                    "invalid default scope '{}': scope names cannot contain '{}'",
                    scope, SEPARATOR
                )));
            }
        }

        if let Some(transform) = &self.transform {
            if !NameParts::is_valid_transform(transform) {
                return Err(ConfigError::InvalidValue(format!(
                    "invalid transform '{}': must be non-empty and cannot contain '{}'",
                    transform, SEPARATOR
                )));
            }
        }

        Ok(())
    }
}
