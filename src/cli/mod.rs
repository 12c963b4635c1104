//! cli
//!
//! Command-line interface layer for namescope.
//!
//! # Responsibilities
//!
//! - Parse command-line arguments and global flags
//! - Load configuration and initialize logging
//! - Delegate to command handlers
//!
//! # Architecture
//!
//! The CLI layer is thin. It parses arguments via clap and dispatches to
//! handlers that call into [`crate::core`]. Handlers never parse names or
//! manipulate scopes themselves.

pub mod args;
pub mod commands;

pub use args::Cli;

use anyhow::{Context as _, Result};
use tracing_subscriber::EnvFilter;

use crate::core::config::{Config, ConfigSources};
use crate::ui::output::{self, Verbosity};

/// Execution context shared by all command handlers.
#[derive(Debug, Clone)]
pub struct Context {
    /// Output verbosity
    pub verbosity: Verbosity,
    /// Emit JSON instead of text
    pub json: bool,
    /// Loaded configuration
    pub config: Config,
    /// Where configuration is read from and written to
    pub sources: ConfigSources,
}

/// Run the CLI application.
///
/// This is the main entry point called from `main.rs`.
pub fn run() -> Result<()> {
    let cli = Cli::parse_args();

    let sources = ConfigSources::from_env(cli.config.as_deref());
    let loaded = Config::load_from(&sources).context("Failed to load config")?;

    init_tracing(cli.debug, loaded.config.log_filter());

    let verbosity = Verbosity::from_flags(cli.quiet, cli.debug);
    for warning in &loaded.warnings {
        output::warn(
            format!("{} ({})", warning.message, warning.path.display()),
            verbosity,
        );
    }
    if let Some(path) = loaded.config.loaded_from() {
        tracing::debug!(path = %path.display(), "config loaded");
    }

    let ctx = Context {
        verbosity,
        json: cli.json_output(loaded.config.json()),
        config: loaded.config,
        sources,
    };

    commands::dispatch(cli.command, &ctx)
}

/// Install the stderr subscriber.
///
/// `--debug` wins over `RUST_LOG`, which wins over the configured filter.
fn init_tracing(debug: bool, config_filter: &str) {
    let env_filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(config_filter))
            .unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    // A subscriber may already be installed when embedded in tests.
    if let Err(err) = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
    {
        tracing::debug!(error = %err, "keeping existing tracing subscriber");
    }
}
