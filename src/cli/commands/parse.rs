//! parse command - Decompose names into their parts

use crate::cli::Context;
use crate::core::names::{NameError, NameParts};
use crate::ui::output;
use anyhow::{bail, Result};
use serde::Serialize;

/// One parsed (or rejected) name.
#[derive(Debug, Serialize)]
struct ParseReport<'a> {
    input: &'a str,
    valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    path: Option<&'a [String]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    transform: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    untransformed: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<'a> ParseReport<'a> {
    fn new(input: &'a str, result: &'a Result<NameParts, NameError>) -> Self {
        match result {
            Ok(parts) => Self {
                input,
                valid: true,
                path: Some(parts.path()),
                transform: parts.transform_name(),
                untransformed: Some(parts.untransformed_name()),
                error: None,
            },
            Err(err) => Self {
                input,
                valid: false,
                path: None,
                transform: None,
                untransformed: None,
                error: Some(err.to_string()),
            },
        }
    }
}

/// Decompose each name; fails if any name is invalid.
pub fn parse(ctx: &Context, names: &[String]) -> Result<()> {
    let results: Vec<Result<NameParts, NameError>> =
        names.iter().map(|name| NameParts::from_name(name)).collect();

    if ctx.json {
        let reports: Vec<ParseReport<'_>> = names
            .iter()
            .zip(&results)
            .map(|(name, result)| ParseReport::new(name, result))
            .collect();
        output::json(&reports)?;
    } else {
        for (name, result) in names.iter().zip(&results) {
            match result {
                Ok(parts) => {
                    output::print(format!("{}: {}", name, output::format_parts(parts)), ctx.verbosity)
                }
                Err(err) => {
                    output::print(format!("{} has no match", name), ctx.verbosity);
                    output::debug(err, ctx.verbosity);
                }
            }
        }
    }

    let failed = results.iter().filter(|result| result.is_err()).count();
    if failed > 0 {
        bail!(
            "{} of {} names do not match the name grammar",
            failed,
            names.len()
        );
    }
    Ok(())
}
