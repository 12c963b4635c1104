//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Global Flags
//!
//! These flags are available on all commands:
//! - `--help` / `-h`: Show help
//! - `--version`: Show version
//! - `--config <path>`: Use this config file
//! - `--debug`: Enable debug logging
//! - `--json`: Machine-readable output
//! - `--quiet` / `-q`: Minimal output

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// namescope - scoped hierarchical names with transform-aware parsing
#[derive(Parser, Debug)]
#[command(name = "namescope")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Use this config file instead of the default locations
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Print results as JSON
    #[arg(long, global = true, conflicts_with = "text")]
    pub json: bool,

    /// Print results as text, even if the config asks for JSON
    #[arg(long, global = true)]
    pub text: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }

    /// Whether JSON output was requested, falling back to the config default.
    pub fn json_output(&self, config_default: bool) -> bool {
        if self.json {
            true
        } else if self.text {
            false
        } else {
            config_default
        }
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Decompose names into path, transform and untransformed name
    #[command(
        name = "parse",
        long_about = "Decompose names into path, transform and untransformed name.\n\n\
            The last `/`-separated segment of each name must look like `name` or \
            `__transform_name`; earlier segments form the path. A name that does \
            not match is reported and the command exits with an error.",
        after_help = "\
EXAMPLES:
    # Plain and transformed names
    namescope parse sayam __tiger_inzoo

    # Qualified names keep their path
    namescope parse model/encoder/__log_scale

    # Machine-readable output
    namescope parse --json model/__log_sigma"
    )]
    Parse {
        /// Names to decompose
        #[arg(required = true)]
        names: Vec<String>,
    },

    /// Check names against the name grammar
    #[command(
        name = "check",
        long_about = "Check names against the name grammar.\n\n\
            Prints whether each name is valid. Exits with an error if any name is \
            invalid, so it can be used in scripts.",
        after_help = "\
EXAMPLES:
    namescope check sayam _tiger

    # Reject transform prefixes
    namescope check --untransformed __tiger_inzoo"
    )]
    Check {
        /// Names to check
        #[arg(required = true)]
        names: Vec<String>,

        /// Require names without a transform prefix
        #[arg(long, short)]
        untransformed: bool,
    },

    /// Qualify a leaf name with nested scopes
    #[command(
        name = "qualify",
        long_about = "Qualify a leaf name with nested scopes.\n\n\
            Enters the configured default scopes, then each --scope in order, and \
            prints the qualified name of the leaf. Empty scope names are skipped.",
        after_help = "\
EXAMPLES:
    # model/encoder/weight
    namescope qualify weight --scope model --scope encoder

    # model/__log_sigma
    namescope qualify sigma -s model --transform log

    # Ignore default scopes from the config
    namescope qualify weight --no-defaults"
    )]
    Qualify {
        /// Leaf name (without transform prefix)
        leaf: String,

        /// Scope to enter, outermost first
        #[arg(long = "scope", short = 's', value_name = "NAME")]
        scopes: Vec<String>,

        /// Transform to apply to the leaf
        #[arg(long, short)]
        transform: Option<String>,

        /// Do not enter the configured default scopes
        #[arg(long)]
        no_defaults: bool,
    },

    /// Replace or remove the transform of a name
    #[command(
        name = "retransform",
        after_help = "\
EXAMPLES:
    # model/__exp_sigma
    namescope retransform model/__log_sigma --transform exp

    # model/sigma
    namescope retransform model/__log_sigma"
    )]
    Retransform {
        /// Name to rewrite
        name: String,

        /// New transform; omit to remove the transform
        #[arg(long, short)]
        transform: Option<String>,
    },

    /// Get, set, or list configuration values
    #[command(name = "config")]
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completion scripts
    #[command(name = "completion")]
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Config subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum ConfigAction {
    /// Get a configuration value
    Get {
        /// Configuration key
        key: String,
    },
    /// Set a configuration value
    Set {
        /// Configuration key
        key: String,
        /// Value to set
        value: String,
    },
    /// Remove a configuration value
    Unset {
        /// Configuration key
        key: String,
    },
    /// List all configuration values
    List,
}
