//! Category-keyed symlink tree.
//!
//! Each entry projects to `catalog/<category>/<semanticName>.<ext>`, a
//! relative link to `../../raw/<id>.<ext>` so the whole library can be moved
//! without breaking the tree. The projector only ever touches the single
//! link path it is asked about; stale links elsewhere are left for the
//! integrity validator to report.

use anyhow::{Context, Result, bail};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::layout::{LibraryLayout, RAW_DIR, is_path_component};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Projection {
    /// A link now exists at the given path.
    Linked(PathBuf),
    /// The source image is absent; no link was created.
    Deferred { source: PathBuf },
}

#[derive(Debug, Clone)]
pub struct Projector {
    layout: LibraryLayout,
}

impl Projector {
    pub fn new(layout: LibraryLayout) -> Self {
        Self { layout }
    }

    /// Ensure the link for `(category, semantic_name)` points at the source
    /// image of `id`. An existing file or link at that path is replaced.
    pub fn project(
        &self,
        id: &str,
        semantic_name: &str,
        category: &str,
        extension: &str,
    ) -> Result<Projection> {
        for part in [id, semantic_name, category, extension] {
            if !is_path_component(part) {
                bail!("refusing to project {part:?}: not a single path component");
            }
        }

        let category_dir = self.layout.catalog_dir().join(category);
        fs::create_dir_all(&category_dir)
            .with_context(|| format!("creating category directory {}", category_dir.display()))?;

        let file_name = format!("{id}.{extension}");
        let source = self.layout.raw_dir().join(&file_name);
        let link = self.layout.link_path(category, semantic_name, extension);
        if link.parent() != Some(category_dir.as_path()) {
            bail!("link {} escapes {}", link.display(), category_dir.display());
        }

        remove_existing(&link)?;

        if !source.exists() {
            debug!(source = %source.display(), "source image absent; link deferred");
            return Ok(Projection::Deferred { source });
        }

        let target = Path::new("..").join("..").join(RAW_DIR).join(&file_name);
        make_link(&target, &link).with_context(|| {
            format!("linking {} -> {}", link.display(), target.display())
        })?;
        info!(link = %link.display(), "created symlink");
        Ok(Projection::Linked(link))
    }
}

fn remove_existing(link: &Path) -> Result<()> {
    match fs::symlink_metadata(link) {
        Ok(meta) if meta.is_dir() => {
            bail!("refusing to replace directory {}", link.display())
        }
        Ok(_) => fs::remove_file(link).with_context(|| format!("removing {}", link.display())),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(err) => Err(err).with_context(|| format!("inspecting {}", link.display())),
    }
}

#[cfg(unix)]
fn make_link(target: &Path, link: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

#[cfg(windows)]
fn make_link(target: &Path, link: &Path) -> io::Result<()> {
    std::os::windows::fs::symlink_file(target, link)
}
