//! core
//!
//! Scopes, names and configuration for namescope.
//!
//! # Modules
//!
//! - [`names`] - Name grammar and `NameParts` decomposition
//! - [`scope`] - Scope stacks and scoped acquisition
//! - [`naming`] - Qualified names of variables under the active scopes
//! - [`config`] - Configuration schema and loading
//!
//! # Design Principles
//!
//! - Names are validated at construction; invalid names are not representable
//! - Scopes exit in strict reverse order of entry
//! - Nothing here prints; callers decide how to report

pub mod config;
pub mod names;
pub mod naming;
pub mod scope;
