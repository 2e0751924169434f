//! Copy cataloged icons into a consuming project.
//!
//! Icons land as plain copies under `<project>/.github/assets/icons/` named
//! by semantic name. Each exported entry records the project's directory
//! name in `usedIn`; the catalog is persisted only if something was copied.

use anyhow::{Context, Result, bail};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::catalog::CatalogStore;
use crate::error::CatalogError;

pub const PROJECT_ICON_DIR: [&str; 3] = [".github", "assets", "icons"];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportReport {
    pub target_dir: PathBuf,
    /// Semantic names of copied icons.
    pub exported: Vec<String>,
    /// Requested names with no semantic match.
    pub not_found: Vec<String>,
    /// Matched entries whose source image is absent.
    pub missing_source: Vec<String>,
}

pub fn project_icon_dir(project: &Path) -> PathBuf {
    PROJECT_ICON_DIR
        .iter()
        .fold(project.to_path_buf(), |dir, part| dir.join(part))
}

/// Export the first semantic match of each requested name.
pub fn export_to_project(
    store: &mut CatalogStore,
    project: &Path,
    names: &[String],
) -> Result<ExportReport> {
    let target_dir = project_icon_dir(project);
    fs::create_dir_all(&target_dir)
        .with_context(|| format!("creating {}", target_dir.display()))?;
    let project_name = project_name(project)?;

    let mut report = ExportReport {
        target_dir,
        ..ExportReport::default()
    };
    let mut exported_ids = Vec::new();
    let mut copy_error = None;
    for name in names {
        let Some(icon) = store.catalog().first_by_semantic(name) else {
            warn!(name = %name, "icon not found in catalog");
            report.not_found.push(name.clone());
            continue;
        };

        let source = store.layout().resolve(&icon.filename);
        if !source.exists() {
            warn!(name = %icon.semantic_name, source = %source.display(), "source image missing, not exported");
            report.missing_source.push(icon.semantic_name.clone());
            continue;
        }

        let target = report
            .target_dir
            .join(format!("{}.{}", icon.semantic_name, icon.extension()));
        let copied = fs::copy(&source, &target).with_context(|| {
            format!("copying {} to {}", source.display(), target.display())
        });
        if let Err(err) = copied {
            copy_error = Some(err);
            break;
        }
        info!(name = %icon.semantic_name, target = %target.display(), "exported icon");
        report.exported.push(icon.semantic_name.clone());
        exported_ids.push(icon.id.clone());
    }

    if !exported_ids.is_empty() {
        store.record_usage(exported_ids.iter().map(String::as_str), &project_name)?;
    }
    // Usage for copies that landed is kept even when a later copy failed.
    if let Some(err) = copy_error {
        return Err(err);
    }
    Ok(report)
}

/// Export every icon of `category`.
pub fn export_category(
    store: &mut CatalogStore,
    project: &Path,
    category: &str,
) -> Result<ExportReport> {
    store.catalog().ensure_category(category)?;
    let names: Vec<String> = store
        .catalog()
        .icons
        .iter()
        .filter(|icon| icon.category == category)
        .map(|icon| icon.semantic_name.clone())
        .collect();
    if names.is_empty() {
        return Ok(ExportReport {
            target_dir: project_icon_dir(project),
            ..ExportReport::default()
        });
    }
    export_to_project(store, project, &names)
}

fn project_name(project: &Path) -> Result<String> {
    let resolved = fs::canonicalize(project)
        .with_context(|| format!("resolving project path {}", project.display()))?;
    match resolved.file_name().and_then(|name| name.to_str()) {
        Some(name) => Ok(name.to_string()),
        None => bail!(CatalogError::EmptyField {
            field: "project directory name"
        }),
    }
}
