//! Reusable `{tags, category}` presets for families of icons.
//!
//! Templates live in `icon-templates.json`, a map from template name to
//! preset. Applying one stamps every new entry with the same category and a
//! shared tag prefix, going through the normal upsert path.

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::Read;
use std::path::Path;
use tracing::{info, warn};

use crate::catalog::{CatalogStore, NewEntry};
use crate::error::CatalogError;
use crate::import::{Columns, csv_reader};
use crate::layout::LibraryLayout;
use crate::suggest::describe;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Template {
    pub tags: Vec<String>,
    pub category: String,
}

/// All templates of a library, keyed by name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TemplateBook {
    templates: BTreeMap<String, Template>,
}

impl TemplateBook {
    /// Read the template document; `None` when it does not exist yet.
    pub fn load(layout: &LibraryLayout) -> Result<Option<Self>> {
        let path = layout.templates_file();
        if !path.exists() {
            return Ok(None);
        }
        let text = fs::read_to_string(&path)
            .with_context(|| format!("reading templates {}", path.display()))?;
        let book = serde_json::from_str(&text)
            .with_context(|| format!("parsing templates {}", path.display()))?;
        Ok(Some(book))
    }

    pub fn save(&self, layout: &LibraryLayout) -> Result<()> {
        let path = layout.templates_file();
        let json = serde_json::to_string_pretty(self).context("serializing templates")?;
        fs::write(&path, format!("{json}\n"))
            .with_context(|| format!("writing templates {}", path.display()))
    }

    pub fn get(&self, name: &str) -> Option<&Template> {
        self.templates.get(name)
    }

    pub fn names(&self) -> Vec<String> {
        self.templates.keys().cloned().collect()
    }

    pub fn insert(&mut self, name: &str, template: Template) -> Option<Template> {
        self.templates.insert(name.to_string(), template)
    }
}

/// Create or replace a template and persist the template document.
pub fn create_template(
    store: &CatalogStore,
    name: &str,
    tags: Vec<String>,
    category: &str,
) -> Result<Template> {
    let name = name.trim();
    if name.is_empty() {
        bail!(CatalogError::EmptyField {
            field: "template name"
        });
    }
    store.catalog().ensure_category(category)?;

    let layout = store.layout();
    let mut book = TemplateBook::load(layout)?.unwrap_or_default();
    let template = Template {
        tags,
        category: category.to_string(),
    };
    if book.insert(name, template.clone()).is_some() {
        info!(template = name, "replaced template");
    } else {
        info!(template = name, "created template");
    }
    book.save(layout)?;
    Ok(template)
}

/// One icon to stamp with a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateSpec {
    pub id: String,
    pub semantic: String,
    pub extra_tags: Vec<String>,
    pub description: Option<String>,
}

/// Read specs from CSV with columns `id, semantic, extra_tags?, description?`.
/// `extra_tags` is comma separated.
pub fn read_specs<R: Read>(input: R) -> Result<Vec<TemplateSpec>> {
    let mut reader = csv_reader(input);
    let headers = reader.headers().context("reading CSV header")?.clone();
    let columns = Columns::from_headers(&headers);
    columns.require(&["id", "semantic"])?;
    let has_description = columns.names().iter().any(|n| n == "description");

    let mut specs = Vec::new();
    for (idx, record) in reader.records().enumerate() {
        let record = record.with_context(|| format!("reading CSV row {}", idx + 2))?;
        let extra_tags = columns
            .get(&record, "extra_tags")
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect();
        specs.push(TemplateSpec {
            id: columns.get(&record, "id").to_string(),
            semantic: columns.get(&record, "semantic").to_string(),
            extra_tags,
            description: has_description.then(|| columns.get(&record, "description").to_string()),
        });
    }
    Ok(specs)
}

pub fn read_specs_file(path: &Path) -> Result<Vec<TemplateSpec>> {
    let file = File::open(path).with_context(|| format!("opening CSV file {}", path.display()))?;
    read_specs(file)
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplySummary {
    pub applied: usize,
    /// Ids already in the catalog.
    pub skipped: Vec<String>,
    /// `(id, reason)` for specs the store rejected; the batch continues.
    pub failed: Vec<(String, String)>,
}

/// Add every spec that is not already cataloged using the named template.
pub fn apply_template(
    store: &mut CatalogStore,
    name: &str,
    specs: &[TemplateSpec],
) -> Result<ApplySummary> {
    let Some(book) = TemplateBook::load(store.layout())? else {
        bail!(CatalogError::NoTemplates);
    };
    let Some(template) = book.get(name) else {
        bail!(CatalogError::UnknownTemplate {
            name: name.to_string(),
            available: book.names(),
        });
    };

    let mut summary = ApplySummary::default();
    for spec in specs {
        if store.find_by_id(spec.id.trim()).is_some() {
            warn!(id = %spec.id, "icon already exists, skipping");
            summary.skipped.push(spec.id.clone());
            continue;
        }
        let tags = template
            .tags
            .iter()
            .chain(&spec.extra_tags)
            .cloned()
            .collect();
        let description = spec
            .description
            .clone()
            .unwrap_or_else(|| describe(&spec.semantic));
        let added = store.upsert(NewEntry {
            id: spec.id.clone(),
            semantic_name: spec.semantic.clone(),
            tags,
            category: template.category.clone(),
            description,
        });
        match added {
            Ok(_) => summary.applied += 1,
            Err(err) => {
                warn!(id = %spec.id, "{err:#}, skipping");
                summary.failed.push((spec.id.clone(), format!("{err:#}")));
            }
        }
    }
    info!(
        template = name,
        applied = summary.applied,
        failed = summary.failed.len(),
        "applied template"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn specs_parse_optional_columns() {
        let csv = "id,semantic,extra_tags,description\n\
                   10,arrow-left,\"left, back\",\n\
                   11,arrow-right,,Points right\n";
        let specs = read_specs(csv.as_bytes()).unwrap();
        assert_eq!(specs.len(), 2);
        assert_eq!(specs[0].extra_tags, vec!["left", "back"]);
        assert_eq!(specs[0].description.as_deref(), Some(""));
        assert!(specs[1].extra_tags.is_empty());
        assert_eq!(specs[1].description.as_deref(), Some("Points right"));
    }

    #[test]
    fn specs_without_description_column_use_default() {
        let specs = read_specs("id,semantic\n10,arrow-up\n".as_bytes()).unwrap();
        assert_eq!(specs[0].description, None);
    }

    #[test]
    fn specs_require_id_and_semantic() {
        let err = read_specs("id,tags\n1,a\n".as_bytes()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CatalogError>(),
            Some(CatalogError::MissingColumns { .. })
        ));
    }

    #[test]
    fn template_book_serializes_as_plain_map() {
        let mut book = TemplateBook::default();
        book.insert(
            "arrow",
            Template {
                tags: vec!["arrow".into()],
                category: "ui".into(),
            },
        );
        let value = serde_json::to_value(&book).unwrap();
        assert_eq!(value["arrow"]["category"], "ui");
    }
}
