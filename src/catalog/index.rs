//! Lookup and search over a loaded catalog.
//!
//! All queries walk the entries in catalog (insertion) order, so callers
//! that need a single entry for a semantic name get the earliest match.
//! That tie-break is part of the contract: export and info both rely on it.

use std::collections::BTreeSet;

use crate::catalog::{Catalog, CatalogEntry};

impl Catalog {
    pub fn find_by_id(&self, id: &str) -> Option<&CatalogEntry> {
        self.icons.iter().find(|icon| icon.id == id)
    }

    /// Entries carrying `tag`, compared case-insensitively.
    pub fn find_by_tag(&self, tag: &str) -> Vec<&CatalogEntry> {
        self.icons.iter().filter(|icon| icon.has_tag(tag)).collect()
    }

    /// Entries whose semantic name contains `name`, case-insensitively.
    pub fn find_by_semantic(&self, name: &str) -> Vec<&CatalogEntry> {
        let needle = name.to_lowercase();
        self.icons
            .iter()
            .filter(|icon| icon.semantic_name.to_lowercase().contains(&needle))
            .collect()
    }

    /// First entry in catalog order whose semantic name contains `name`.
    pub fn first_by_semantic(&self, name: &str) -> Option<&CatalogEntry> {
        let needle = name.to_lowercase();
        self.icons
            .iter()
            .find(|icon| icon.semantic_name.to_lowercase().contains(&needle))
    }

    /// Tag matches followed by semantic-name matches, deduplicated by id in
    /// first-seen order.
    pub fn search(&self, query: &str) -> Vec<&CatalogEntry> {
        let mut seen: BTreeSet<&str> = BTreeSet::new();
        self.find_by_tag(query)
            .into_iter()
            .chain(self.find_by_semantic(query))
            .filter(|icon| seen.insert(icon.id.as_str()))
            .collect()
    }

    /// Entries of one category sorted by semantic name.
    pub fn in_category(&self, category: &str) -> Vec<&CatalogEntry> {
        let mut icons: Vec<&CatalogEntry> = self
            .icons
            .iter()
            .filter(|icon| icon.category == category)
            .collect();
        icons.sort_by(|a, b| a.semantic_name.cmp(&b.semantic_name));
        icons
    }

    /// The last `limit` additions, newest first.
    pub fn recent(&self, limit: usize) -> Vec<&CatalogEntry> {
        self.icons.iter().rev().take(limit).collect()
    }
}
