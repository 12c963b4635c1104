//! core::config
//!
//! Configuration schema and loading.
//!
//! # Precedence
//!
//! Configuration values are resolved in this order (later overrides earlier):
//! 1. Default values
//! 2. Global config file
//! 3. CLI flags (not handled here)
//!
//! # Config Locations
//!
//! Searched in order, first existing file wins:
//! 1. Explicit path (`--config`), which must exist
//! 2. `$NAMESCOPE_CONFIG` if set (warns if the file is missing)
//! 3. `$XDG_CONFIG_HOME/namescope/config.toml`
//! 4. `~/.namescope/config.toml` (canonical write location)
//!
//! # Example
//!
//! ```no_run
//! use namescope::core::config::Config;
//!
//! let result = Config::load(None).unwrap();
//! let config = result.config;
//!
//! println!("JSON output: {}", config.json());
//! println!("Default scopes: {:?}", config.default_scopes());
//! ```

pub mod schema;

pub use schema::{GlobalConfig, QualifyDefaults};

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "NAMESCOPE_CONFIG";

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("failed to write config file '{path}': {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config value: {0}")]
    InvalidValue(String),

    #[error("home directory not found")]
    NoHomeDir,
}

/// Warnings generated during config loading.
#[derive(Debug, Clone)]
pub struct ConfigWarning {
    /// The warning message.
    pub message: String,
    /// The path that triggered the warning.
    pub path: PathBuf,
}

/// Result of loading configuration.
#[derive(Debug)]
pub struct ConfigLoadResult {
    /// The loaded configuration.
    pub config: Config,
    /// Any warnings generated during loading.
    pub warnings: Vec<ConfigWarning>,
}

/// Where to look for a config file.
///
/// [`ConfigSources::from_env`] reads the process environment; tests build
/// one directly.
#[derive(Debug, Clone, Default)]
pub struct ConfigSources {
    pub explicit: Option<PathBuf>,
    pub env_path: Option<PathBuf>,
    pub xdg_config_home: Option<PathBuf>,
    pub home: Option<PathBuf>,
}

impl ConfigSources {
    pub fn from_env(explicit: Option<&Path>) -> Self {
        Self {
            explicit: explicit.map(Path::to_path_buf),
            env_path: std::env::var_os(CONFIG_ENV).map(PathBuf::from),
            xdg_config_home: std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from),
            home: dirs::home_dir(),
        }
    }

    /// Path written by `config set`: the explicit or env path if given,
    /// otherwise the canonical location.
    pub fn write_path(&self) -> Result<PathBuf, ConfigError> {
        if let Some(path) = self.explicit.as_ref().or(self.env_path.as_ref()) {
            return Ok(path.clone());
        }
        let home = self.home.as_ref().ok_or(ConfigError::NoHomeDir)?;
        Ok(home.join(".namescope/config.toml"))
    }
}

/// Loaded configuration with defaults applied by the accessors.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Global configuration
    pub global: GlobalConfig,
    /// Path to the config file (if loaded)
    path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from the default locations.
    ///
    /// # Errors
    ///
    /// Returns an error if a config file exists but cannot be parsed, or if
    /// `explicit` is given and cannot be read. Missing files in the default
    /// locations are not an error (defaults are used).
    pub fn load(explicit: Option<&Path>) -> Result<ConfigLoadResult, ConfigError> {
        Self::load_from(&ConfigSources::from_env(explicit))
    }

    /// Load configuration from the given sources.
    pub fn load_from(sources: &ConfigSources) -> Result<ConfigLoadResult, ConfigError> {
        let mut warnings = Vec::new();
        let (global, path) = Self::load_global(sources, &mut warnings)?;

        global.validate()?;

        Ok(ConfigLoadResult {
            config: Config { global, path },
            warnings,
        })
    }

    fn load_global(
        sources: &ConfigSources,
        warnings: &mut Vec<ConfigWarning>,
    ) -> Result<(GlobalConfig, Option<PathBuf>), ConfigError> {
        // 1. Explicit path, read unconditionally so a typo is reported
        if let Some(path) = &sources.explicit {
            let config = Self::read_config(path)?;
            return Ok((config, Some(path.clone())));
        }

        // 2. $NAMESCOPE_CONFIG
        if let Some(path) = &sources.env_path {
            if path.exists() {
                let config = Self::read_config(path)?;
                return Ok((config, Some(path.clone())));
            }
            warnings.push(ConfigWarning {
                message: format!("{} points to a missing file, ignoring it", CONFIG_ENV),
                path: path.clone(),
            });
        }

        // 3. $XDG_CONFIG_HOME/namescope/config.toml
        if let Some(xdg_home) = &sources.xdg_config_home {
            let path = xdg_home.join("namescope/config.toml");
            if path.exists() {
                let config = Self::read_config(&path)?;
                return Ok((config, Some(path)));
            }
        }

        // 4. ~/.namescope/config.toml
        if let Some(home) = &sources.home {
            let path = home.join(".namescope/config.toml");
            if path.exists() {
                let config = Self::read_config(&path)?;
                return Ok((config, Some(path)));
            }
        }

        Ok((GlobalConfig::default(), None))
    }

    /// Read and parse a config file.
    fn read_config(path: &Path) -> Result<GlobalConfig, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Validate and write a config file atomically.
    ///
    /// Creates parent directories if needed. Writes to a temp file in the
    /// same directory, then renames it over the target.
    pub fn write(path: &Path, config: &GlobalConfig) -> Result<(), ConfigError> {
        config.validate()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::WriteError {
                path: path.to_path_buf(),
                source: e,
            })?;
        }

        let contents =
            toml::to_string_pretty(config).map_err(|e| ConfigError::InvalidValue(e.to_string()))?;

        let temp_path = path.with_extension("toml.tmp");
        let mut file = fs::File::create(&temp_path).map_err(|e| ConfigError::WriteError {
            path: temp_path.clone(),
            source: e,
        })?;

        file.write_all(contents.as_bytes())
            .and_then(|()| file.sync_all())
            .map_err(|e| ConfigError::WriteError {
                path: temp_path.clone(),
                source: e,
            })?;

        fs::rename(&temp_path, path).map_err(|e| ConfigError::WriteError {
            path: path.to_path_buf(),
            source: e,
        })?;

        tracing::debug!(path = %path.display(), "config written");
        Ok(())
    }

    // =========================================================================
    // Accessor methods with defaults
    // =========================================================================

    /// Whether output defaults to JSON.
    ///
    /// Defaults to `false` if not configured.
    pub fn json(&self) -> bool {
        self.global.json.unwrap_or(false)
    }

    /// Tracing filter directive.
    ///
    /// Defaults to `"warn"` if not configured.
    pub fn log_filter(&self) -> &str {
        self.global.log_filter.as_deref().unwrap_or("warn")
    }

    /// Scopes entered before command-line scopes.
    ///
    /// Defaults to none.
    pub fn default_scopes(&self) -> &[String] {
        self.global
            .qualify
            .as_ref()
            .and_then(|q| q.default_scopes.as_deref())
            .unwrap_or(&[])
    }

    /// Transform applied by `qualify` when none is given.
    pub fn default_transform(&self) -> Option<&str> {
        self.global
            .qualify
            .as_ref()
            .and_then(|q| q.transform.as_deref())
    }

    /// Path the configuration was loaded from.
    pub fn loaded_from(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}
