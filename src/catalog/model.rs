use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::CatalogError;

pub const CATALOG_VERSION: &str = "1.0";

/// Categories every fresh catalog starts with, in declaration order.
pub const SEED_CATEGORIES: [&str; 7] = [
    "files",
    "network",
    "security",
    "tools",
    "ui",
    "emoji",
    "development",
];

/// One cataloged icon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEntry {
    pub id: String,
    /// Catalog-relative source path, always `raw/<id>.<ext>`.
    pub filename: String,
    pub semantic_name: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub category: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub used_in: Vec<String>,
}

impl CatalogEntry {
    /// Extension of the source image, falling back to `png` when the stored
    /// filename has none.
    pub fn extension(&self) -> &str {
        Path::new(&self.filename)
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or(crate::layout::DEFAULT_EXTENSION)
    }

    /// Case-insensitive exact match against any tag.
    pub fn has_tag(&self, tag: &str) -> bool {
        let needle = tag.to_lowercase();
        self.tags.iter().any(|t| t.to_lowercase() == needle)
    }

    /// Record a consuming project. Returns `false` when it was already listed.
    pub fn mark_used_in(&mut self, project: &str) -> bool {
        if self.used_in.iter().any(|p| p == project) {
            return false;
        }
        self.used_in.push(project.to_string());
        true
    }
}

/// Fields a caller supplies when adding or updating an entry. The filename
/// and `usedIn` set are owned by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEntry {
    pub id: String,
    pub semantic_name: String,
    pub tags: Vec<String>,
    pub category: String,
    pub description: String,
}

/// The persisted catalog document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    pub version: String,
    /// Insertion order is meaningful: the tail is the most recent additions.
    pub icons: Vec<CatalogEntry>,
    pub categories: Vec<String>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self {
            version: CATALOG_VERSION.to_string(),
            icons: Vec::new(),
            categories: SEED_CATEGORIES.iter().map(|c| c.to_string()).collect(),
        }
    }
}

impl Catalog {
    pub fn len(&self) -> usize {
        self.icons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.icons.is_empty()
    }

    pub fn has_category(&self, category: &str) -> bool {
        self.categories.iter().any(|c| c == category)
    }

    /// Reject categories outside the catalog-wide enumeration.
    pub fn ensure_category(&self, category: &str) -> Result<(), CatalogError> {
        if self.has_category(category) {
            Ok(())
        } else {
            Err(CatalogError::UnknownCategory {
                category: category.to_string(),
                available: self.categories.clone(),
            })
        }
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.icons.iter().position(|icon| icon.id == id)
    }
}
