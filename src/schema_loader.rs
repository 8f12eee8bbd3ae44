//! JSON Schema loading for external catalog files.
//!
//! The canonical schema is embedded at compile time so installed binaries do
//! not depend on the source tree. Loading extracts the `schema_version` const,
//! enforces the allowed set, and compiles a validator.

use crate::catalog::builtin::CATALOG_SCHEMA_VERSION;
use anyhow::{Context, Result, anyhow, bail};
use jsonschema::JSONSchema;
use serde_json::Value;
use std::collections::BTreeSet;

const CATALOG_SCHEMA: &str = include_str!("../schema/survey_catalog.schema.json");

/// Result of loading and compiling a JSON Schema.
pub(crate) struct SchemaLoadResult {
    pub schema_version: String,
    pub compiled: JSONSchema,
}

/// Controls how a schema payload is checked before compilation.
pub(crate) struct SchemaLoadOptions<'a> {
    /// Where to find the schema_version const inside the schema payload.
    pub schema_version_pointer: &'a str,
    /// Allowed schema_version values; enforced when present.
    pub allowed_versions: Option<&'a BTreeSet<String>>,
}

impl<'a> Default for SchemaLoadOptions<'a> {
    fn default() -> Self {
        Self {
            schema_version_pointer: "/properties/schema_version/const",
            allowed_versions: None,
        }
    }
}

impl SchemaLoadResult {
    /// Validate `instance`, joining every schema violation into one error.
    pub fn validate(&self, label: &str, instance: &Value) -> Result<()> {
        if let Err(errors) = self.compiled.validate(instance) {
            let details = errors
                .map(|err| format!("{}: {err}", err.instance_path))
                .collect::<Vec<_>>()
                .join("\n");
            bail!(
                "{label} failed schema validation against {}:\n{details}",
                self.schema_version
            );
        }
        Ok(())
    }
}

pub(crate) fn allowed_schema_versions() -> BTreeSet<String> {
    BTreeSet::from_iter([CATALOG_SCHEMA_VERSION.to_string()])
}

/// Compile the embedded catalog schema.
pub(crate) fn load_catalog_schema() -> Result<SchemaLoadResult> {
    let allowed = allowed_schema_versions();
    compile_json_schema(
        "embedded catalog schema",
        CATALOG_SCHEMA,
        SchemaLoadOptions {
            allowed_versions: Some(&allowed),
            ..Default::default()
        },
    )
}

pub(crate) fn compile_json_schema(
    label: &str,
    text: &str,
    options: SchemaLoadOptions<'_>,
) -> Result<SchemaLoadResult> {
    let schema: Value =
        serde_json::from_str(text).with_context(|| format!("parsing {label}"))?;

    let schema_version = extract_schema_version(&schema, options.schema_version_pointer)
        .ok_or_else(|| anyhow!("{label} missing schema_version const"))?;

    if let Some(allowed) = options.allowed_versions {
        if !allowed.contains(&schema_version) {
            bail!(
                "schema_version '{}' not in allowed set {:?}",
                schema_version,
                allowed
            );
        }
    }

    // The compile error borrows the schema value, so render it before returning.
    let compiled =
        JSONSchema::compile(&schema).map_err(|err| anyhow!("compiling {label}: {err}"))?;

    Ok(SchemaLoadResult {
        schema_version,
        compiled,
    })
}

pub(crate) fn is_valid_version_token(value: &str) -> bool {
    !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
}

fn extract_schema_version(schema: &Value, pointer: &str) -> Option<String> {
    let version = schema.pointer(pointer).and_then(Value::as_str)?;
    is_valid_version_token(version).then(|| version.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn embedded_schema_matches_crate_version() {
        let schema = load_catalog_schema().unwrap();
        assert_eq!(schema.schema_version, CATALOG_SCHEMA_VERSION);
    }

    #[test]
    fn rejects_schema_outside_allowed_versions() {
        let allowed = allowed_schema_versions();
        let text = json!({
            "type": "object",
            "properties": {"schema_version": {"const": "survey_catalog_v0"}}
        })
        .to_string();
        let err = compile_json_schema(
            "test schema",
            &text,
            SchemaLoadOptions {
                allowed_versions: Some(&allowed),
                ..Default::default()
            },
        )
        .err()
        .unwrap();
        assert!(err.to_string().contains("not in allowed set"));
    }

    #[test]
    fn rejects_schema_without_version_const() {
        let text = json!({"type": "object"}).to_string();
        assert!(compile_json_schema("bare", &text, SchemaLoadOptions::default()).is_err());
    }

    #[test]
    fn validation_reports_instance_paths() {
        let schema = load_catalog_schema().unwrap();
        let err = schema
            .validate("fixture", &json!({"schema_version": "survey_catalog_v1"}))
            .unwrap_err();
        let message = err.to_string();
        assert!(
            message.starts_with("fixture failed schema validation against survey_catalog_v1")
        );
        assert!(message.contains("countries"));
    }

    #[test]
    fn version_tokens_are_restricted() {
        assert!(is_valid_version_token("survey_catalog_v1"));
        assert!(!is_valid_version_token(""));
        assert!(!is_valid_version_token("v1 beta"));
    }
}
