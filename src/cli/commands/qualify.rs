//! qualify command - Qualify a leaf name with nested scopes

use crate::cli::Context;
use crate::core::names::NameParts;
use crate::core::naming;
use crate::core::scope::{Scope, ScopeStack};
use crate::ui::output;
use anyhow::{Context as _, Result};
use serde::Serialize;

#[derive(Debug, Serialize)]
struct QualifyReport {
    qualified_name: String,
    scopes: Vec<Scope>,
    parts: NameParts,
}

/// Qualify `leaf` under the default scopes followed by `scopes`.
///
/// # Arguments
///
/// * `ctx` - Execution context
/// * `leaf` - Leaf name, validated as an untransformed name
/// * `scopes` - Scope names, outermost first
/// * `transform` - Transform applied to the leaf (falls back to the config)
/// * `no_defaults` - Skip the configured default scopes
pub fn qualify(
    ctx: &Context,
    leaf: &str,
    scopes: &[String],
    transform: Option<&str>,
    no_defaults: bool,
) -> Result<()> {
    let defaults: &[String] = if no_defaults {
        &[]
    } else {
        ctx.config.default_scopes()
    };
    let transform = transform.or(ctx.config.default_transform());

    let stack = ScopeStack::new();
    let guards = stack.enter_all(defaults.iter().chain(scopes).map(|name| Scope::named(name.as_str())));
    output::debug(
        format!("entered {} scopes", guards.len()),
        ctx.verbosity,
    );

    let declared = match transform {
        Some(transform) => naming::declare_transformed(&stack, transform, leaf),
        None => naming::declare(&stack, leaf),
    };
    let active = stack.snapshot();
    drop(guards);

    let parts = declared.with_context(|| format!("Cannot qualify '{}'", leaf))?;
    let qualified_name = parts.full_original_name();

    if ctx.json {
        output::json(&QualifyReport {
            qualified_name,
            scopes: active,
            parts,
        })?;
    } else {
        output::print(qualified_name, ctx.verbosity);
    }

    Ok(())
}
