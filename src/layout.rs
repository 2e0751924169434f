//! On-disk layout of an icon library and how its root is located.
//!
//! A library root holds the catalog document, the template document, the
//! `raw/` directory of source images named by id, and the `catalog/` tree of
//! category folders whose entries are relative symlinks back into `raw/`.

use anyhow::{Result, bail};
use std::{
    env, fs,
    path::{Path, PathBuf},
};

pub const CATALOG_FILE: &str = "icon-catalog.json";
pub const TEMPLATES_FILE: &str = "icon-templates.json";
pub const RAW_DIR: &str = "raw";
pub const CATALOG_DIR: &str = "catalog";
pub const DEFAULT_EXTENSION: &str = "png";
pub const ROOT_ENV: &str = "ICONICS_ROOT";

/// Paths derived from a library root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryLayout {
    root: PathBuf,
    extension: String,
}

impl LibraryLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            extension: DEFAULT_EXTENSION.to_string(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Image extension used for new entries, without the leading dot.
    pub fn extension(&self) -> &str {
        &self.extension
    }

    pub fn catalog_file(&self) -> PathBuf {
        self.root.join(CATALOG_FILE)
    }

    pub fn templates_file(&self) -> PathBuf {
        self.root.join(TEMPLATES_FILE)
    }

    pub fn raw_dir(&self) -> PathBuf {
        self.root.join(RAW_DIR)
    }

    pub fn catalog_dir(&self) -> PathBuf {
        self.root.join(CATALOG_DIR)
    }

    /// Relative filename recorded on an entry: `raw/<id>.<ext>`.
    pub fn entry_filename(&self, id: &str) -> String {
        format!("{RAW_DIR}/{id}.{}", self.extension)
    }

    /// Absolute path of a catalog-relative filename.
    pub fn resolve(&self, relative: &str) -> PathBuf {
        self.root.join(relative)
    }

    /// Where the projected link for `(category, semantic_name)` lives.
    pub fn link_path(&self, category: &str, semantic_name: &str, extension: &str) -> PathBuf {
        self.catalog_dir()
            .join(category)
            .join(format!("{semantic_name}.{extension}"))
    }
}

/// True when `name` can be joined onto a directory without leaving it.
pub fn is_path_component(name: &str) -> bool {
    !name.is_empty() && name != "." && name != ".." && !name.contains(['/', '\\', '\0'])
}

fn is_library_root(candidate: &Path) -> bool {
    candidate.join(CATALOG_FILE).is_file()
}

fn root_from_hint(hint: &str) -> Option<PathBuf> {
    if hint.is_empty() {
        return None;
    }
    let hint_path = PathBuf::from(hint);
    if !hint_path.is_dir() {
        return None;
    }
    fs::canonicalize(hint_path).ok()
}

fn search_upwards(start: &Path) -> Option<PathBuf> {
    let mut dir = fs::canonicalize(start).ok()?;
    loop {
        if is_library_root(&dir) {
            return Some(dir);
        }
        if !dir.pop() {
            break;
        }
    }
    None
}

/// Resolve the library root.
///
/// An explicit path wins and is returned as given, even if it does not exist
/// yet, so that loading can report the missing directory itself. After that
/// `ICONICS_ROOT`, the build-time `ICONICS_ROOT_HINT`, and finally an upward
/// search for `icon-catalog.json` from the working directory are tried.
pub fn find_library_root(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }

    if let Ok(env_root) = env::var(ROOT_ENV) {
        if !env_root.is_empty() {
            return Ok(root_from_hint(&env_root).unwrap_or_else(|| PathBuf::from(env_root)));
        }
    }

    if let Some(hint) = option_env!("ICONICS_ROOT_HINT") {
        if let Some(root) = root_from_hint(hint) {
            return Ok(root);
        }
    }

    if let Ok(cwd) = env::current_dir() {
        if let Some(root) = search_upwards(&cwd) {
            return Ok(root);
        }
    }

    bail!(
        "Unable to locate an icon library. Pass --root or set {ROOT_ENV} to the library directory."
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn explicit_root_is_returned_untouched() {
        let resolved = find_library_root(Some(Path::new("/does/not/exist"))).unwrap();
        assert_eq!(resolved, PathBuf::from("/does/not/exist"));
    }

    #[test]
    fn search_upwards_finds_catalog_document() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(CATALOG_FILE), "{}").unwrap();
        let nested = temp.path().join("catalog/ui");
        fs::create_dir_all(&nested).unwrap();
        let found = search_upwards(&nested).unwrap();
        assert_eq!(found, fs::canonicalize(temp.path()).unwrap());
    }

    #[test]
    fn link_path_uses_category_and_semantic_name() {
        let layout = LibraryLayout::new("/lib");
        assert_eq!(
            layout.link_path("security", "lock", "png"),
            PathBuf::from("/lib/catalog/security/lock.png")
        );
        assert_eq!(layout.entry_filename("100"), "raw/100.png");
    }

    #[test]
    fn path_components_reject_traversal() {
        assert!(is_path_component("lock-screen"));
        assert!(is_path_component("v1.2"));
        for name in ["", ".", "..", "../raw/5", "a/b", "a\\b", "nul\0byte"] {
            assert!(!is_path_component(name), "{name:?} accepted");
        }
    }
}
