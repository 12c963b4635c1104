//! retransform command - Replace or remove the transform of a name

use crate::cli::Context;
use crate::core::names::NameParts;
use crate::ui::output;
use anyhow::{bail, Context as _, Result};
use serde::Serialize;

#[derive(Debug, Serialize)]
struct RetransformReport<'a> {
    input: &'a str,
    output: String,
    /// Whether `output` parses back into the same parts
    stable: bool,
}

/// Print `name` with its transform replaced by `transform` (or removed).
pub fn retransform(ctx: &Context, name: &str, transform: Option<&str>) -> Result<()> {
    if let Some(transform) = transform {
        if !NameParts::is_valid_transform(transform) {
            bail!(
                "Invalid transform '{}': must be non-empty and cannot contain '/'",
                transform
            );
        }
    }

    let parts = NameParts::from_name(name).with_context(|| format!("Cannot parse '{}'", name))?;
    let rewritten = parts.replace_transform(transform);
    let rendered = rewritten.full_original_name();

    // `__a_` + `b_c` renders as `__a_b_c`, which the greedy grammar reads as
    // transform `a_b` and name `c`.
    let stable = rewritten.round_trips();
    if !stable {
        output::warn(
            format!(
                "'{}' does not parse back into transform '{}' and name '{}'",
                rendered,
                rewritten.transform_name().unwrap_or("-"),
                rewritten.untransformed_name()
            ),
            ctx.verbosity,
        );
    }

    if ctx.json {
        output::json(&RetransformReport {
            input: name,
            output: rendered,
            stable,
        })?;
    } else {
        output::print(rendered, ctx.verbosity);
    }

    Ok(())
}
