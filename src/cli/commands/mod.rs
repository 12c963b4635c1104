//! cli::commands
//!
//! Command dispatch and handlers.
//!
//! # Architecture
//!
//! Each command handler:
//! 1. Validates command-specific arguments
//! 2. Calls into `core` to do the work
//! 3. Formats and displays output (text or JSON)
//!
//! Handlers report failure by returning an error, which `main` turns into a
//! non-zero exit code.

mod check;
mod completion;
mod config_cmd;
mod parse;
mod qualify;
mod retransform;

// Re-export command functions for testing and direct invocation
pub use check::check;
pub use completion::completion;
pub use config_cmd::{get as config_get, list as config_list, set as config_set, unset as config_unset};
pub use parse::parse;
pub use qualify::qualify;
pub use retransform::retransform;

use crate::cli::args::{Command, ConfigAction};
use crate::cli::Context;
use anyhow::Result;

/// Dispatch a command to its handler.
pub fn dispatch(command: Command, ctx: &Context) -> Result<()> {
    match command {
        Command::Parse { names } => parse::parse(ctx, &names),
        Command::Check {
            names,
            untransformed,
        } => check::check(ctx, &names, untransformed),
        Command::Qualify {
            leaf,
            scopes,
            transform,
            no_defaults,
        } => qualify::qualify(ctx, &leaf, &scopes, transform.as_deref(), no_defaults),
        Command::Retransform { name, transform } => {
            retransform::retransform(ctx, &name, transform.as_deref())
        }
        Command::Config { action } => match action {
            ConfigAction::Get { key } => config_cmd::get(ctx, &key),
            ConfigAction::Set { key, value } => config_cmd::set(ctx, &key, &value),
            ConfigAction::Unset { key } => config_cmd::unset(ctx, &key),
            ConfigAction::List => config_cmd::list(ctx),
        },
        Command::Completion { shell } => completion::completion(shell),
    }
}
