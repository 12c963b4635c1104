//! config command - Get, set, or list configuration values

use crate::cli::Context;
use crate::core::config::{Config, GlobalConfig, QualifyDefaults};
use crate::ui::output;
use anyhow::{bail, Context as _, Result};
use std::collections::BTreeMap;

/// Keys understood by `config get/set/unset`.
const KEYS: &[&str] = &[
    "json",
    "log_filter",
    "qualify.default_scopes",
    "qualify.transform",
];

/// Get a configuration value.
pub fn get(ctx: &Context, key: &str) -> Result<()> {
    let value = read_key(&ctx.config.global, key)?;

    match value {
        Some(value) => output::print(value, ctx.verbosity),
        // Key exists but has no value - exit silently
        None => {}
    }
    Ok(())
}

/// Set a configuration value.
pub fn set(ctx: &Context, key: &str, value: &str) -> Result<()> {
    let mut config = ctx.config.global.clone();

    match key {
        "json" => {
            let parsed = value
                .parse::<bool>()
                .with_context(|| format!("Invalid value for json: '{}'", value))?;
            config.json = Some(parsed);
        }
        "log_filter" => config.log_filter = Some(value.to_string()),
        "qualify.default_scopes" => {
            qualify_mut(&mut config).default_scopes = Some(split_list(value));
        }
        "qualify.transform" => qualify_mut(&mut config).transform = Some(value.to_string()),
        _ => bail!(unknown_key(key)),
    }

    let path = ctx.sources.write_path().context("Failed to locate config file")?;
    Config::write(&path, &config).context("Failed to write config")?;

    output::print(format!("Set {} = {}", key, value), ctx.verbosity);
    Ok(())
}

/// Remove a configuration value.
pub fn unset(ctx: &Context, key: &str) -> Result<()> {
    let mut config = ctx.config.global.clone();

    match key {
        "json" => config.json = None,
        "log_filter" => config.log_filter = None,
        "qualify.default_scopes" => {
            if let Some(qualify) = config.qualify.as_mut() {
                qualify.default_scopes = None;
            }
        }
        "qualify.transform" => {
            if let Some(qualify) = config.qualify.as_mut() {
                qualify.transform = None;
            }
        }
        _ => bail!(unknown_key(key)),
    }
    if config.qualify.as_ref() == Some(&QualifyDefaults::default()) {
        config.qualify = None;
    }

    let path = ctx.sources.write_path().context("Failed to locate config file")?;
    Config::write(&path, &config).context("Failed to write config")?;

    output::print(format!("Unset {}", key), ctx.verbosity);
    Ok(())
}

/// List all configuration values.
pub fn list(ctx: &Context) -> Result<()> {
    let mut values = BTreeMap::new();
    for key in KEYS {
        values.insert(*key, read_key(&ctx.config.global, key)?);
    }

    if ctx.json {
        output::json(&values)?;
        return Ok(());
    }

    match ctx.config.loaded_from() {
        Some(path) => output::print(format!("# Loaded from {}", path.display()), ctx.verbosity),
        None => output::print("# No config file loaded (defaults)", ctx.verbosity),
    }
    for (key, value) in values {
        let value = value.unwrap_or_else(|| "(not set)".to_string());
        output::print(format!("{} = {}", key, value), ctx.verbosity);
    }

    Ok(())
}

fn read_key(config: &GlobalConfig, key: &str) -> Result<Option<String>> {
    let qualify = config.qualify.as_ref();
    let value = match key {
        "json" => config.json.map(|json| json.to_string()),
        "log_filter" => config.log_filter.clone(),
        "qualify.default_scopes" => qualify
            .and_then(|q| q.default_scopes.as_ref())
            .map(|scopes| scopes.join(",")),
        "qualify.transform" => qualify.and_then(|q| q.transform.clone()),
        _ => bail!(unknown_key(key)),
    };
    Ok(value)
}

fn qualify_mut(config: &mut GlobalConfig) -> &mut QualifyDefaults {
    config.qualify.get_or_insert_with(QualifyDefaults::default)
}

/// Comma-separated list; surrounding whitespace is trimmed.
fn split_list(value: &str) -> Vec<String> {
    if value.trim().is_empty() {
        return Vec::new();
    }
    value.split(',').map(|item| item.trim().to_string()).collect()
}

fn unknown_key(key: &str) -> String {
    format!(
        "Unknown configuration key: {} (known keys: {})",
        key,
        KEYS.join(", ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_list_trims_items() {
        assert_eq!(split_list("model, encoder"), ["model", "encoder"]);
        assert!(split_list("  ").is_empty());
    }

    #[test]
    fn read_key_formats_values() {
        let config = GlobalConfig {
            json: Some(true),
            qualify: Some(QualifyDefaults {
                default_scopes: Some(vec!["a".to_string(), "b".to_string()]),
                transform: None,
            }),
            ..Default::default()
        };

        assert_eq!(read_key(&config, "json").unwrap().as_deref(), Some("true"));
        assert_eq!(
            read_key(&config, "qualify.default_scopes").unwrap().as_deref(),
            Some("a,b")
        );
        assert_eq!(read_key(&config, "qualify.transform").unwrap(), None);
        assert!(read_key(&config, "nope").is_err());
    }
}
