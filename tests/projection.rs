#![cfg(unix)]

// Symlink projection guard rails.
mod support;

use anyhow::Result;
use iconics::{Projection, Projector};
use std::fs;
use std::path::{Path, PathBuf};

use support::{TempLibrary, entry};

#[test]
fn link_is_relative_and_resolves_to_source() -> Result<()> {
    let lib = TempLibrary::new()?;
    let source = lib.write_raw("100")?;
    let projector = Projector::new(lib.layout());

    let outcome = projector.project("100", "document", "files", "png")?;
    let link = lib.link("files", "document");
    assert_eq!(outcome, Projection::Linked(link.clone()));
    assert_eq!(fs::read_link(&link)?, PathBuf::from("../../raw/100.png"));
    assert_eq!(fs::canonicalize(&link)?, fs::canonicalize(&source)?);
    Ok(())
}

#[test]
fn second_projection_replaces_first() -> Result<()> {
    let lib = TempLibrary::new()?;
    lib.write_raw("1")?;
    lib.write_raw("2")?;
    let projector = Projector::new(lib.layout());

    projector.project("1", "lock", "security", "png")?;
    projector.project("2", "lock", "security", "png")?;

    let entries: Vec<_> = fs::read_dir(lib.root().join("catalog/security"))?.collect();
    assert_eq!(entries.len(), 1);
    assert_eq!(
        fs::read_link(lib.link("security", "lock"))?,
        Path::new("../../raw/2.png")
    );
    Ok(())
}

#[test]
fn regular_file_at_link_path_is_replaced() -> Result<()> {
    let lib = TempLibrary::new()?;
    lib.write_raw("3")?;
    lib.write_file("catalog/ui/arrow.png", "stray copy")?;
    let projector = Projector::new(lib.layout());

    projector.project("3", "arrow", "ui", "png")?;
    let meta = fs::symlink_metadata(lib.link("ui", "arrow"))?;
    assert!(meta.file_type().is_symlink());
    Ok(())
}

#[test]
fn absent_source_defers_link_but_keeps_entry() -> Result<()> {
    let lib = TempLibrary::new()?;
    let mut store = lib.open()?;

    let outcome = store.upsert(entry("42", "globe", &["web"], "network"))?;
    assert!(matches!(outcome.projection, Projection::Deferred { .. }));
    assert!(store.find_by_id("42").is_some());
    assert!(fs::symlink_metadata(lib.link("network", "globe")).is_err());
    assert!(lib.root().join("catalog/network").is_dir());

    // Source arrives later; re-adding creates the link.
    lib.write_raw("42")?;
    let outcome = store.upsert(entry("42", "globe", &["web"], "network"))?;
    assert_eq!(outcome.projection, Projection::Linked(lib.link("network", "globe")));
    Ok(())
}

#[test]
fn projection_leaves_neighbouring_links_alone() -> Result<()> {
    let lib = TempLibrary::new()?;
    lib.write_raw("1")?;
    lib.write_raw("2")?;
    let mut store = lib.open()?;
    store.upsert(entry("1", "key", &[], "security"))?;
    store.upsert(entry("2", "shield", &[], "security"))?;

    // Renaming entry 1 leaves its old link in place; only the new path is managed.
    store.upsert(entry("1", "key-old", &[], "security"))?;
    assert!(fs::symlink_metadata(lib.link("security", "key")).is_ok());
    assert!(fs::symlink_metadata(lib.link("security", "key-old")).is_ok());
    assert!(fs::symlink_metadata(lib.link("security", "shield")).is_ok());
    Ok(())
}

#[test]
fn category_directories_are_created_on_demand() -> Result<()> {
    let lib = TempLibrary::bare()?;
    fs::create_dir_all(lib.root().join("raw"))?;
    lib.write_raw("7")?;
    let projector = Projector::new(lib.layout());
    projector.project("7", "gear", "tools", "png")?;
    assert!(lib.root().join("catalog/tools").is_dir());
    Ok(())
}

#[test]
fn projector_refuses_paths_outside_the_category() -> Result<()> {
    let lib = TempLibrary::new()?;
    let victim = lib.write_raw("5")?;
    let projector = Projector::new(lib.layout());

    assert!(projector.project("9", "../../raw/5", "ui", "png").is_err());
    assert!(projector.project("../raw/5", "lock", "ui", "png").is_err());
    assert!(projector.project("9", "lock", "..", "png").is_err());
    assert!(victim.exists());
    Ok(())
}
