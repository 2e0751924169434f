//! Read-only audit of catalog and symlink tree agreement.
//!
//! Disagreements are reported, never repaired. Hard issues mean something
//! the catalog depends on is gone; warnings mean the projection is stale in
//! a way that re-running `add` would fix.

use anyhow::{Context, Result};
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::catalog::CatalogStore;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntegrityIssue {
    MissingDirectory(PathBuf),
    MissingSource {
        id: String,
        semantic_name: String,
        filename: String,
    },
    BrokenLink { link: PathBuf, target: PathBuf },
}

impl fmt::Display for IntegrityIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IntegrityIssue::MissingDirectory(path) => {
                write!(f, "directory missing: {}", path.display())
            }
            IntegrityIssue::MissingSource {
                id,
                semantic_name,
                filename,
            } => write!(
                f,
                "missing source file for '{semantic_name}' (#{id}): {filename}"
            ),
            IntegrityIssue::BrokenLink { link, target } => {
                write!(f, "broken symlink: {} -> {}", link.display(), target.display())
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntegrityWarning {
    MissingLink { semantic_name: String, path: PathBuf },
    NotASymlink(PathBuf),
}

impl fmt::Display for IntegrityWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IntegrityWarning::MissingLink {
                semantic_name,
                path,
            } => write!(
                f,
                "missing catalog symlink for '{semantic_name}' at: {}",
                path.display()
            ),
            IntegrityWarning::NotASymlink(path) => write!(f, "not a symlink: {}", path.display()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IntegrityReport {
    pub total_icons: usize,
    pub issues: Vec<IntegrityIssue>,
    pub warnings: Vec<IntegrityWarning>,
}

impl IntegrityReport {
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty() && self.warnings.is_empty()
    }
}

pub fn validate(store: &CatalogStore) -> Result<IntegrityReport> {
    let layout = store.layout();
    let catalog = store.catalog();
    let mut report = IntegrityReport {
        total_icons: catalog.len(),
        ..IntegrityReport::default()
    };

    let raw_dir = layout.raw_dir();
    let catalog_dir = layout.catalog_dir();
    for dir in [&raw_dir, &catalog_dir] {
        if !dir.is_dir() {
            report.issues.push(IntegrityIssue::MissingDirectory(dir.clone()));
        }
    }

    for icon in &catalog.icons {
        if !layout.resolve(&icon.filename).exists() {
            report.issues.push(IntegrityIssue::MissingSource {
                id: icon.id.clone(),
                semantic_name: icon.semantic_name.clone(),
                filename: icon.filename.clone(),
            });
            // Without a source no link can be created, so there is nothing to warn about.
            continue;
        }

        let link = layout.link_path(&icon.category, &icon.semantic_name, icon.extension());
        match fs::symlink_metadata(&link) {
            Ok(meta) if meta.file_type().is_symlink() => {}
            Ok(_) => report.warnings.push(IntegrityWarning::NotASymlink(link)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                report.warnings.push(IntegrityWarning::MissingLink {
                    semantic_name: icon.semantic_name.clone(),
                    path: link,
                });
            }
            Err(err) => {
                return Err(err).with_context(|| format!("inspecting {}", link.display()));
            }
        }
    }

    if catalog_dir.is_dir() {
        report.issues.extend(broken_links(&catalog_dir)?);
    }

    Ok(report)
}

/// Symlinks one level below each category directory whose target is gone.
fn broken_links(catalog_dir: &Path) -> Result<Vec<IntegrityIssue>> {
    let mut broken = Vec::new();
    let mut category_dirs: Vec<PathBuf> = fs::read_dir(catalog_dir)
        .with_context(|| format!("reading {}", catalog_dir.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_dir())
        .collect();
    category_dirs.sort();

    for dir in category_dirs {
        let mut links: Vec<PathBuf> = fs::read_dir(&dir)
            .with_context(|| format!("reading {}", dir.display()))?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .collect();
        links.sort();
        for link in links {
            let is_symlink = fs::symlink_metadata(&link)
                .map(|meta| meta.file_type().is_symlink())
                .unwrap_or(false);
            if is_symlink && fs::metadata(&link).is_err() {
                let target = fs::read_link(&link).unwrap_or_default();
                broken.push(IntegrityIssue::BrokenLink { link, target });
            }
        }
    }
    Ok(broken)
}
