#![allow(dead_code)]

use anyhow::Result;
use iconics::{CatalogStore, LibraryLayout, NewEntry};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

// Throwaway icon library rooted in a temp dir with raw/ and catalog/ present.
pub struct TempLibrary {
    dir: TempDir,
}

impl TempLibrary {
    pub fn new() -> Result<Self> {
        let dir = TempDir::new()?;
        fs::create_dir_all(dir.path().join("raw"))?;
        fs::create_dir_all(dir.path().join("catalog"))?;
        Ok(Self { dir })
    }

    /// A root with nothing in it, not even raw/ or catalog/.
    pub fn bare() -> Result<Self> {
        Ok(Self {
            dir: TempDir::new()?,
        })
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn layout(&self) -> LibraryLayout {
        LibraryLayout::new(self.root())
    }

    pub fn open(&self) -> Result<CatalogStore> {
        CatalogStore::open(self.layout())
    }

    /// Drop a fake source image at raw/<id>.png.
    pub fn write_raw(&self, id: &str) -> Result<PathBuf> {
        let path = self.root().join("raw").join(format!("{id}.png"));
        fs::write(&path, format!("png-bytes-{id}"))?;
        Ok(path)
    }

    pub fn link(&self, category: &str, name: &str) -> PathBuf {
        self.root()
            .join("catalog")
            .join(category)
            .join(format!("{name}.png"))
    }

    pub fn write_file(&self, relative: &str, contents: &str) -> Result<PathBuf> {
        let path = self.root().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, contents)?;
        Ok(path)
    }
}

pub fn entry(id: &str, name: &str, tags: &[&str], category: &str) -> NewEntry {
    NewEntry {
        id: id.to_string(),
        semantic_name: name.to_string(),
        tags: tags.iter().map(|t| t.to_string()).collect(),
        category: category.to_string(),
        description: String::new(),
    }
}
