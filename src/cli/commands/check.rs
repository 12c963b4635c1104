//! check command - Validate names against the grammar

use crate::cli::Context;
use crate::core::names::NameParts;
use crate::ui::output;
use anyhow::{bail, Result};
use serde::Serialize;

#[derive(Debug, Serialize)]
struct CheckReport<'a> {
    name: &'a str,
    valid: bool,
}

/// Report validity of each name; fails if any is invalid.
pub fn check(ctx: &Context, names: &[String], untransformed: bool) -> Result<()> {
    let reports: Vec<CheckReport<'_>> = names
        .iter()
        .map(|name| CheckReport {
            name,
            valid: if untransformed {
                NameParts::is_valid_untransformed_name(name)
            } else {
                NameParts::is_valid_name(name)
            },
        })
        .collect();

    if ctx.json {
        output::json(&reports)?;
    } else {
        for report in &reports {
            let verdict = if report.valid { "valid" } else { "invalid" };
            output::print(format!("{}: {}", report.name, verdict), ctx.verbosity);
        }
    }

    let invalid: Vec<&str> = reports
        .iter()
        .filter(|report| !report.valid)
        .map(|report| report.name)
        .collect();
    if !invalid.is_empty() {
        let kind = if untransformed {
            "untransformed names"
        } else {
            "names"
        };
        bail!("not valid {}:\n{}", kind, output::format_list(&invalid, "  - "));
    }
    Ok(())
}
