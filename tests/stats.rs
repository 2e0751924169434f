#![cfg(unix)]

// Coverage and usage figures.
mod support;

use anyhow::Result;
use iconics::stats;

use support::{TempLibrary, entry};

#[test]
fn stats_count_coverage_and_usage() -> Result<()> {
    let lib = TempLibrary::new()?;
    lib.write_raw("1")?;
    lib.write_raw("2")?;
    lib.write_raw("3")?;
    lib.write_raw("4")?;
    let mut store = lib.open()?;
    store.upsert(entry("1", "lock", &[], "security"))?;
    store.upsert(entry("2", "key", &[], "security"))?;
    store.record_usage(["2"], "site")?;
    store.record_usage(["2"], "blog")?;
    store.record_usage(["1"], "blog")?;

    let stats = stats::collect(&store)?;
    assert_eq!(stats.cataloged, 2);
    assert_eq!(stats.raw_images, 4);
    assert_eq!(stats.uncataloged, 2);
    assert!((stats.coverage_pct - 50.0).abs() < f64::EPSILON);
    assert_eq!(stats.by_category["security"].count, 2);
    assert_eq!(stats.most_used[0].0, "key");
    let projects: Vec<_> = stats.projects.iter().map(String::as_str).collect();
    assert_eq!(projects, vec!["blog", "site"]);
    Ok(())
}

#[test]
fn sourceless_entries_do_not_inflate_coverage() -> Result<()> {
    let lib = TempLibrary::new()?;
    lib.write_raw("1")?;
    let mut store = lib.open()?;
    store.upsert(entry("1", "lock", &[], "security"))?;
    for id in ["2", "3", "4"] {
        store.upsert(entry(id, &format!("ghost-{id}"), &[], "ui"))?;
    }

    let stats = stats::collect(&store)?;
    assert_eq!(stats.cataloged, 4);
    assert_eq!(stats.raw_images, 1);
    assert_eq!(stats.uncataloged, 0);
    assert!((stats.coverage_pct - 100.0).abs() < f64::EPSILON);
    Ok(())
}

#[test]
fn empty_library_reports_zero_coverage() -> Result<()> {
    let lib = TempLibrary::new()?;
    let stats = stats::collect(&lib.open()?)?;
    assert_eq!(stats.raw_images, 0);
    assert_eq!(stats.coverage_pct, 0.0);
    assert!(stats.most_used.is_empty());
    Ok(())
}
