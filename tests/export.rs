#![cfg(unix)]

// Export to consuming projects and usage tracking.
mod support;

use anyhow::Result;
use iconics::{CatalogError, export_category, export_to_project};
use std::fs;
use tempfile::TempDir;

use support::{TempLibrary, entry};

#[test]
fn export_copies_first_semantic_match_and_tracks_usage() -> Result<()> {
    let lib = TempLibrary::new()?;
    lib.write_raw("1")?;
    lib.write_raw("2")?;
    let mut store = lib.open()?;
    store.upsert(entry("1", "padlock", &[], "security"))?;
    store.upsert(entry("2", "lock-open", &[], "security"))?;

    let projects = TempDir::new()?;
    let project = projects.path().join("my-site");
    fs::create_dir_all(&project)?;

    let report = export_to_project(&mut store, &project, &["lock".to_string()])?;
    assert_eq!(report.exported, vec!["padlock"]);
    let copied = project.join(".github/assets/icons/padlock.png");
    assert!(fs::symlink_metadata(&copied)?.file_type().is_file());
    assert_eq!(fs::read_to_string(&copied)?, "png-bytes-1");

    let reloaded = lib.open()?;
    assert_eq!(reloaded.find_by_id("1").unwrap().used_in, vec!["my-site"]);
    assert!(reloaded.find_by_id("2").unwrap().used_in.is_empty());
    Ok(())
}

#[test]
fn repeated_export_does_not_duplicate_usage() -> Result<()> {
    let lib = TempLibrary::new()?;
    lib.write_raw("1")?;
    let mut store = lib.open()?;
    store.upsert(entry("1", "gear", &[], "tools"))?;
    let project = TempDir::new()?;

    export_to_project(&mut store, project.path(), &["gear".to_string()])?;
    export_to_project(&mut store, project.path(), &["gear".to_string()])?;
    assert_eq!(store.find_by_id("1").unwrap().used_in.len(), 1);
    Ok(())
}

#[test]
fn unknown_names_and_missing_sources_are_reported() -> Result<()> {
    let lib = TempLibrary::new()?;
    let mut store = lib.open()?;
    store.upsert(entry("1", "ghost", &[], "emoji"))?;
    let project = TempDir::new()?;

    let report = export_to_project(
        &mut store,
        project.path(),
        &["nothing".to_string(), "ghost".to_string()],
    )?;
    assert!(report.exported.is_empty());
    assert_eq!(report.not_found, vec!["nothing"]);
    assert_eq!(report.missing_source, vec!["ghost"]);
    assert!(store.find_by_id("1").unwrap().used_in.is_empty());
    Ok(())
}

#[test]
fn category_export_covers_whole_category() -> Result<()> {
    let lib = TempLibrary::new()?;
    lib.write_raw("1")?;
    lib.write_raw("2")?;
    lib.write_raw("3")?;
    let mut store = lib.open()?;
    store.upsert(entry("1", "arrow-left", &[], "ui"))?;
    store.upsert(entry("2", "menu", &[], "ui"))?;
    store.upsert(entry("3", "bug", &[], "development"))?;
    let project = TempDir::new()?;

    let report = export_category(&mut store, project.path(), "ui")?;
    assert_eq!(report.exported, vec!["arrow-left", "menu"]);
    assert!(!report.target_dir.join("bug.png").exists());
    Ok(())
}

#[test]
fn category_export_rejects_unknown_category() -> Result<()> {
    let lib = TempLibrary::new()?;
    let mut store = lib.open()?;
    let project = TempDir::new()?;
    let err = export_category(&mut store, project.path(), "weather").unwrap_err();
    assert!(matches!(
        err.downcast_ref::<CatalogError>(),
        Some(CatalogError::UnknownCategory { .. })
    ));
    Ok(())
}

#[test]
fn failed_copy_keeps_usage_of_earlier_copies() -> Result<()> {
    let lib = TempLibrary::new()?;
    lib.write_raw("1")?;
    lib.write_raw("2")?;
    let mut store = lib.open()?;
    store.upsert(entry("1", "lock", &[], "security"))?;
    store.upsert(entry("2", "key", &[], "security"))?;

    let projects = TempDir::new()?;
    let project = projects.path().join("app");
    // A directory where the second copy should land makes it fail.
    fs::create_dir_all(project.join(".github/assets/icons/key.png"))?;

    let names = ["lock".to_string(), "key".to_string()];
    assert!(export_to_project(&mut store, &project, &names).is_err());
    assert!(project.join(".github/assets/icons/lock.png").is_file());

    let reloaded = lib.open()?;
    assert_eq!(reloaded.find_by_id("1").unwrap().used_in, vec!["app"]);
    assert!(reloaded.find_by_id("2").unwrap().used_in.is_empty());
    Ok(())
}
