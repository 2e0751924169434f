//! Structural check of the persisted catalog document.
//!
//! The document is validated against the bundled JSON Schema before it is
//! deserialized, and the cross-field rules the schema cannot express (unique
//! ids, categories drawn from the enumeration, names that stay inside their
//! directory) are checked afterwards. Any
//! failure is fatal: a corrupt catalog is never repaired by guessing.

use anyhow::{Result, anyhow};
use jsonschema::JSONSchema;
use serde_json::Value;
use std::collections::BTreeSet;
use std::path::Path;

use crate::catalog::Catalog;
use crate::error::CatalogError;
use crate::layout::is_path_component;

const CATALOG_SCHEMA: &str = include_str!("../../schema/icon_catalog.schema.json");

fn compile_catalog_schema() -> Result<JSONSchema> {
    let schema: Value =
        serde_json::from_str(CATALOG_SCHEMA).map_err(|err| anyhow!("parsing catalog schema: {err}"))?;
    JSONSchema::compile(&schema).map_err(|err| anyhow!("compiling catalog schema: {err}"))
}

fn corrupt(path: &Path, details: impl Into<String>) -> anyhow::Error {
    CatalogError::CorruptDocument {
        path: path.to_path_buf(),
        details: details.into(),
    }
    .into()
}

/// Parse and validate raw catalog text read from `path`.
pub(crate) fn parse_catalog(path: &Path, text: &str) -> Result<Catalog> {
    let value: Value = serde_json::from_str(text).map_err(|err| corrupt(path, err.to_string()))?;

    let compiled = compile_catalog_schema()?;
    if let Err(errors) = compiled.validate(&value) {
        let details = errors
            .map(|err| format!("{}: {}", err.instance_path, err))
            .collect::<Vec<_>>()
            .join("\n");
        return Err(corrupt(path, details));
    }

    let catalog: Catalog =
        serde_json::from_value(value).map_err(|err| corrupt(path, err.to_string()))?;
    check_references(path, &catalog)?;
    Ok(catalog)
}

fn check_references(path: &Path, catalog: &Catalog) -> Result<()> {
    if let Some(bad) = catalog.categories.iter().find(|c| !is_path_component(c)) {
        return Err(corrupt(path, format!("category '{bad}' is not a plain name")));
    }
    let mut seen: BTreeSet<&str> = BTreeSet::new();
    for icon in &catalog.icons {
        if !seen.insert(icon.id.as_str()) {
            return Err(corrupt(path, format!("duplicate icon id '{}'", icon.id)));
        }
        if !is_path_component(&icon.id) || !is_path_component(&icon.semantic_name) {
            return Err(corrupt(
                path,
                format!(
                    "icon '{}' has a name that is not a plain path component",
                    icon.id
                ),
            ));
        }
        if !catalog.has_category(&icon.category) {
            return Err(corrupt(
                path,
                format!(
                    "icon '{}' references unknown category '{}'",
                    icon.id, icon.category
                ),
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn details(err: anyhow::Error) -> String {
        match err.downcast_ref::<CatalogError>() {
            Some(CatalogError::CorruptDocument { details, .. }) => details.clone(),
            other => panic!("expected CorruptDocument, got {other:?}"),
        }
    }

    #[test]
    fn bundled_schema_compiles() {
        compile_catalog_schema().unwrap();
    }

    #[test]
    fn accepts_minimal_document() {
        let text = r#"{"version": "1.0", "icons": [], "categories": ["ui"]}"#;
        let catalog = parse_catalog(Path::new("c.json"), text).unwrap();
        assert!(catalog.is_empty());
        assert_eq!(catalog.categories, vec!["ui"]);
    }

    #[test]
    fn rejects_missing_icons_array() {
        let text = r#"{"version": "1.0", "categories": ["ui"]}"#;
        let err = parse_catalog(Path::new("c.json"), text).unwrap_err();
        assert!(details(err).contains("icons"));
    }

    #[test]
    fn rejects_duplicate_ids() {
        let text = r#"{"version": "1.0", "categories": ["ui"], "icons": [
            {"id": "1", "filename": "raw/1.png", "semanticName": "a", "category": "ui"},
            {"id": "1", "filename": "raw/1.png", "semanticName": "b", "category": "ui"}
        ]}"#;
        let err = parse_catalog(Path::new("c.json"), text).unwrap_err();
        assert!(details(err).contains("duplicate icon id"));
    }

    #[test]
    fn rejects_unknown_category_reference() {
        let text = r#"{"version": "1.0", "categories": ["ui"], "icons": [
            {"id": "1", "filename": "raw/1.png", "semanticName": "a", "category": "weather"}
        ]}"#;
        let err = parse_catalog(Path::new("c.json"), text).unwrap_err();
        assert!(details(err).contains("weather"));
    }

    #[test]
    fn rejects_traversal_in_semantic_name() {
        let text = r#"{"version": "1.0", "categories": ["ui"], "icons": [
            {"id": "9", "filename": "raw/9.png", "semanticName": "../../raw/5", "category": "ui"}
        ]}"#;
        let err = details(parse_catalog(Path::new("c.json"), text).unwrap_err());
        assert!(err.contains("not a plain path component"), "{err}");
    }

    #[test]
    fn rejects_invalid_json() {
        let err = parse_catalog(Path::new("c.json"), "{not json").unwrap_err();
        assert!(!details(err).is_empty());
    }
}
