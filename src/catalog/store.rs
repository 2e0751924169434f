//! Owning service for the catalog document.
//!
//! `CatalogStore` holds the only in-memory copy of the catalog for a process
//! run. Every mutation goes through it and follows the same sequence: mutate
//! in memory, update the symlink projection, then persist the whole
//! document. There is no cross-process lock; two concurrent invocations
//! against the same library can lose each other's writes.

use anyhow::{Context, Result, bail};
use std::fs;
use std::io::Write;
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use crate::catalog::schema::parse_catalog;
use crate::catalog::{Catalog, CatalogEntry, NewEntry};
use crate::error::CatalogError;
use crate::layout::{LibraryLayout, is_path_component};
use crate::projector::{Projection, Projector};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertKind {
    Inserted,
    Updated,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpsertOutcome {
    pub kind: UpsertKind,
    pub projection: Projection,
}

#[derive(Debug)]
pub struct CatalogStore {
    layout: LibraryLayout,
    projector: Projector,
    catalog: Catalog,
}

impl CatalogStore {
    /// Load the catalog for `layout`.
    ///
    /// A missing library root is an error; a missing catalog document yields
    /// the default catalog with the seed categories. Nothing is created on
    /// disk here.
    pub fn open(layout: LibraryLayout) -> Result<Self> {
        if !layout.root().is_dir() {
            bail!(CatalogError::MissingRoot(layout.root().to_path_buf()));
        }

        let path = layout.catalog_file();
        let catalog = if path.exists() {
            let text = fs::read_to_string(&path)
                .with_context(|| format!("reading catalog {}", path.display()))?;
            let catalog = parse_catalog(&path, &text)?;
            debug!(path = %path.display(), icons = catalog.len(), "loaded catalog");
            catalog
        } else {
            debug!(path = %path.display(), "no catalog document; starting empty");
            Catalog::default()
        };

        Ok(Self {
            projector: Projector::new(layout.clone()),
            layout,
            catalog,
        })
    }

    pub fn layout(&self) -> &LibraryLayout {
        &self.layout
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn find_by_id(&self, id: &str) -> Option<&CatalogEntry> {
        self.catalog.find_by_id(id)
    }

    /// Overwrite the catalog document with the in-memory state.
    ///
    /// The document is written to a temporary file next to the target and
    /// renamed over it, so a crash never leaves a truncated catalog.
    pub fn save(&self) -> Result<()> {
        let path = self.layout.catalog_file();
        let json = serde_json::to_string_pretty(&self.catalog).context("serializing catalog")?;

        let mut temp = NamedTempFile::new_in(self.layout.root())
            .with_context(|| format!("creating temporary file in {}", self.layout.root().display()))?;
        writeln!(temp, "{json}")
            .with_context(|| format!("writing {}", temp.path().display()))?;
        temp.persist(&path)
            .with_context(|| format!("replacing catalog {}", path.display()))?;
        debug!(path = %path.display(), "saved catalog");
        Ok(())
    }

    /// Insert or update an entry keyed by id, then project and persist.
    ///
    /// An update keeps the entry's position and its existing `usedIn` set.
    /// If projecting or persisting fails the in-memory catalog is restored.
    pub fn upsert(&mut self, new: NewEntry) -> Result<UpsertOutcome> {
        let id = new.id.trim().to_string();
        let semantic_name = new.semantic_name.trim().to_string();
        if id.is_empty() {
            bail!(CatalogError::EmptyField { field: "id" });
        }
        if semantic_name.is_empty() {
            bail!(CatalogError::EmptyField {
                field: "semanticName"
            });
        }
        for (field, value) in [("id", &id), ("semanticName", &semantic_name)] {
            if !is_path_component(value) {
                bail!(CatalogError::UnsafeName {
                    field,
                    value: value.clone(),
                });
            }
        }
        self.catalog.ensure_category(&new.category)?;

        let existing = self.catalog.position(&id);
        let used_in = existing
            .map(|idx| self.catalog.icons[idx].used_in.clone())
            .unwrap_or_default();
        let entry = CatalogEntry {
            filename: self.layout.entry_filename(&id),
            id,
            semantic_name,
            tags: new.tags,
            category: new.category,
            description: new.description,
            used_in,
        };

        self.warn_on_link_collision(&entry);

        let snapshot = self.catalog.icons.clone();
        let kind = match existing {
            Some(idx) => {
                self.catalog.icons[idx] = entry.clone();
                UpsertKind::Updated
            }
            None => {
                self.catalog.icons.push(entry.clone());
                UpsertKind::Inserted
            }
        };

        let committed = self
            .projector
            .project(
                &entry.id,
                &entry.semantic_name,
                &entry.category,
                entry.extension(),
            )
            .and_then(|projection| self.save().map(|_| projection));

        match committed {
            Ok(projection) => {
                match kind {
                    UpsertKind::Inserted => {
                        info!(id = %entry.id, name = %entry.semantic_name, "added icon")
                    }
                    UpsertKind::Updated => {
                        info!(id = %entry.id, name = %entry.semantic_name, "updated icon")
                    }
                }
                if let Projection::Deferred { source } = &projection {
                    warn!(id = %entry.id, source = %source.display(), "source image missing; symlink deferred");
                }
                Ok(UpsertOutcome { kind, projection })
            }
            Err(err) => {
                self.catalog.icons = snapshot;
                Err(err)
            }
        }
    }

    /// Add `project` to the `usedIn` set of each id and persist if anything
    /// changed. Returns how many entries gained the project.
    pub fn record_usage<'a>(
        &mut self,
        ids: impl IntoIterator<Item = &'a str>,
        project: &str,
    ) -> Result<usize> {
        let mut positions = Vec::new();
        for id in ids {
            let Some(idx) = self.catalog.position(id) else {
                bail!(CatalogError::IconNotFound(id.to_string()));
            };
            positions.push(idx);
        }

        let mut changed = 0;
        for idx in positions {
            let icon = &mut self.catalog.icons[idx];
            if icon.mark_used_in(project) {
                info!(id = %icon.id, project, "recorded usage");
                changed += 1;
            }
        }
        if changed > 0 {
            self.save()?;
        }
        Ok(changed)
    }

    /// Grow the catalog-wide category enumeration.
    pub fn add_category(&mut self, name: &str) -> Result<bool> {
        let name = name.trim();
        if !is_path_component(name) {
            bail!(CatalogError::InvalidCategoryName(name.to_string()));
        }
        if self.catalog.has_category(name) {
            return Ok(false);
        }
        self.catalog.categories.push(name.to_string());
        if let Err(err) = self.save() {
            self.catalog.categories.pop();
            return Err(err);
        }
        info!(category = name, "added category");
        Ok(true)
    }

    fn warn_on_link_collision(&self, entry: &CatalogEntry) {
        let Some(other) = self.catalog.icons.iter().find(|icon| {
            icon.id != entry.id
                && icon.category == entry.category
                && icon.semantic_name == entry.semantic_name
                && icon.extension() == entry.extension()
        }) else {
            return;
        };
        let link = self
            .layout
            .link_path(&entry.category, &entry.semantic_name, entry.extension());
        warn!(
            id = %entry.id,
            previous = %other.id,
            link = %link.display(),
            "semantic name already projected by another icon; last write wins"
        );
    }
}
