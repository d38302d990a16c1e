//! Parser for service definitions
//!
//! Parses and validates service files. `.json` files are read with
//! `serde_json`, everything else as YAML.

use crate::error::{Error, Result, ResultExt};
use crate::loader::types::{CollectionConfig, ServiceConfig};
use crate::types::JsonValue;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Load a service definition from a file.
///
/// `items_file` entries are resolved relative to the directory holding the
/// definition.
pub fn load_config(path: impl AsRef<Path>) -> Result<ServiceConfig> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file '{}'", path.display()))?;

    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    let config: ServiceConfig = if is_json {
        serde_json::from_str(&content).context("Failed to parse config JSON")?
    } else {
        serde_yaml::from_str(&content).context("Failed to parse config YAML")?
    };

    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    finish(config, base_dir)
}

/// Load a service definition from a YAML (or JSON) string.
///
/// `items_file` entries are resolved relative to the working directory.
pub fn load_config_from_str(yaml: &str) -> Result<ServiceConfig> {
    let config: ServiceConfig =
        serde_yaml::from_str(yaml).context("Failed to parse config YAML")?;

    finish(config, Path::new("."))
}

/// Load an items file: a JSON array of objects
pub fn load_items(path: impl AsRef<Path>) -> Result<Vec<JsonValue>> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read items file '{}'", path.display()))?;

    let parsed: JsonValue = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse items file '{}'", path.display()))?;

    match parsed {
        JsonValue::Array(items) => Ok(items),
        _ => Err(Error::config(format!(
            "Items file '{}' must contain a JSON array",
            path.display()
        ))),
    }
}

fn finish(mut config: ServiceConfig, base_dir: &Path) -> Result<ServiceConfig> {
    validate_config(&config)?;

    for collection in &mut config.collections {
        if let Some(file) = &collection.items_file {
            collection.items = load_items(base_dir.join(file))?;
        }
    }

    tracing::debug!(
        collections = config.collections.len(),
        "Loaded service config"
    );
    Ok(config)
}

/// Validate a service definition
fn validate_config(config: &ServiceConfig) -> Result<()> {
    let names: HashSet<_> = config.collections.iter().map(|c| &c.name).collect();

    if names.len() != config.collections.len() {
        return Err(Error::config("Duplicate collection names found"));
    }

    for collection in &config.collections {
        validate_collection(collection)?;
    }

    Ok(())
}

/// Validate a collection definition
fn validate_collection(collection: &CollectionConfig) -> Result<()> {
    if collection.name.is_empty() {
        return Err(Error::config("Collection name cannot be empty"));
    }

    if collection.name.contains('/') {
        return Err(Error::config(format!(
            "Collection '{}' name cannot contain '/'",
            collection.name
        )));
    }

    if collection.strategy.is_cursor() && collection.date_field.is_none() {
        return Err(Error::invalid_value(
            "date_field",
            format!(
                "collection '{}' uses strategy '{}' which requires a date_field",
                collection.name, collection.strategy
            ),
        ));
    }

    if collection.items_file.is_some() && !collection.items.is_empty() {
        return Err(Error::invalid_value(
            "items_file",
            format!(
                "collection '{}' sets both items and items_file",
                collection.name
            ),
        ));
    }

    Ok(())
}
