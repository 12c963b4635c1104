//! namescope - scoped hierarchical names with transform-aware parsing
//!
//! Code that labels values (variables of a model, metrics, resources) often
//! builds names from nested contexts: `model/encoder/weight`. namescope keeps
//! those contexts on a stack and parses the resulting names back into their
//! parts, including an optional transform tag (`model/__log_sigma`).
//!
//! # Architecture
//!
//! - [`core`] - Scope stacks, the name grammar and configuration
//! - [`cli`] - Command-line interface (`namescope` binary)
//! - [`ui`] - Output formatting for the CLI
//!
//! # Example
//!
//! ```
//! use namescope::core::names::NameParts;
//! use namescope::core::scope::{Scope, ScopeStack};
//!
//! let stack = ScopeStack::new();
//! let name = stack.scoped(Scope::named("model"), |stack| {
//!     stack.qualified_name(Some("__log_sigma"))
//! });
//! let parts = NameParts::from_name(name.as_deref().unwrap()).unwrap();
//!
//! assert_eq!(parts.transform_name(), Some("log"));
//! assert_eq!(parts.full_untransformed_name(), "model/sigma");
//! assert!(stack.is_empty());
//! ```
//!
//! # Invariants
//!
//! 1. Scopes exit in reverse order of entry, on every exit path
//! 2. Execution contexts (threads, tasks) never see each other's scopes
//! 3. A `NameParts` always holds a valid, non-empty untransformed name

pub mod cli;
pub mod core;
pub mod ui;
