//! Manifest sanitization: field and export-condition removal
//!
//! Removes caller-specified top-level fields and export conditions from the
//! package manifest. The manifest is handled as an order-preserving JSON
//! value so retained keys survive the round trip in their original order.

use crate::core::error::PublishError;
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::path::Path;
use tokio::fs;

/// Manifest file name
pub const MANIFEST_FILE: &str = "package.json";

/// Parse manifest text into a JSON value
pub fn parse(content: &str) -> Result<Value, PublishError> {
    serde_json::from_str(content).map_err(|e| PublishError::ManifestParse {
        message: e.to_string(),
    })
}

/// Read and parse the manifest under `dir`
pub async fn read(dir: &Path) -> Result<Value, PublishError> {
    let path = dir.join(MANIFEST_FILE);
    let content = fs::read_to_string(&path)
        .await
        .map_err(|e| PublishError::filesystem("manifest", format!("{}: {}", path.display(), e)))?;
    parse(&content)
}

/// Write a manifest value into `dir` in pretty-printed JSON
pub async fn write(dir: &Path, manifest: &Value) -> Result<(), PublishError> {
    let path = dir.join(MANIFEST_FILE);
    let content = serde_json::to_string_pretty(manifest).map_err(|e| {
        PublishError::ManifestParse {
            message: e.to_string(),
        }
    })?;

    fs::write(&path, content + "\n")
        .await
        .map_err(|e| PublishError::filesystem("manifest", format!("{}: {}", path.display(), e)))
}

/// Produce a sanitized copy of the manifest
///
/// Top-level keys in `excluded_fields` are removed shallowly. The value at
/// "exports" is walked recursively and keys named in `excluded_conditions`
/// are removed at every mapping level. A mapping emptied by condition
/// removal is retained unless `prune_empty_exports` is set. The input is
/// never mutated; removal of a missing key is a no-op.
pub fn sanitize(
    manifest: &Value,
    excluded_fields: &[String],
    excluded_conditions: &[String],
    prune_empty_exports: bool,
) -> Value {
    let Some(object) = manifest.as_object() else {
        return manifest.clone();
    };

    let fields: HashSet<&str> = excluded_fields.iter().map(String::as_str).collect();
    let conditions: HashSet<&str> = excluded_conditions.iter().map(String::as_str).collect();

    let mut result = Map::new();
    for (key, value) in object {
        if fields.contains(key.as_str()) {
            continue;
        }

        if key == "exports" {
            result.insert(
                key.clone(),
                clean_exports(value, &conditions, prune_empty_exports),
            );
        } else {
            result.insert(key.clone(), value.clone());
        }
    }

    Value::Object(result)
}

fn clean_exports(value: &Value, conditions: &HashSet<&str>, prune: bool) -> Value {
    let Some(object) = value.as_object() else {
        return value.clone();
    };

    let mut result = Map::new();
    for (key, child) in object {
        if conditions.contains(key.as_str()) {
            continue;
        }

        let cleaned = clean_exports(child, conditions, prune);
        if prune && cleaned.as_object().is_some_and(|o| o.is_empty()) {
            continue;
        }
        result.insert(key.clone(), cleaned);
    }

    Value::Object(result)
}
