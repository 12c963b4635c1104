//! ui
//!
//! Output for the command-line interface.
//!
//! # Modules
//!
//! - [`output`] - Verbosity-aware printing and name formatting
//!
//! # Design
//!
//! All user-facing output goes through this module. Diagnostics for
//! developers go through `tracing` instead and end up on stderr.

pub mod output;
