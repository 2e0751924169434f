//! Catalog coverage and usage figures for the `stats` report.
//!
//! Coverage compares cataloged entries whose source image is on disk against
//! every image in `raw/`, so it never exceeds 100%.

use anyhow::Result;
use std::collections::{BTreeMap, BTreeSet};

use crate::catalog::CatalogStore;
use crate::suggest::uncataloged_stems;

pub const SAMPLE_SIZE: usize = 10;
pub const MOST_USED_LIMIT: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryBreakdown {
    pub count: usize,
    /// First few semantic names in catalog order.
    pub samples: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CatalogStats {
    pub cataloged: usize,
    pub raw_images: usize,
    pub uncataloged: usize,
    pub coverage_pct: f64,
    pub by_category: BTreeMap<String, CategoryBreakdown>,
    /// `(semantic name, projects)` for the most widely used icons.
    pub most_used: Vec<(String, Vec<String>)>,
    pub projects: BTreeSet<String>,
}

pub fn collect(store: &CatalogStore) -> Result<CatalogStats> {
    let catalog = store.catalog();
    let uncataloged = uncataloged_stems(store.layout(), catalog)?.len();
    let cataloged = catalog.len();
    let on_disk = cataloged_on_disk(store);
    let raw_images = on_disk + uncataloged;
    let coverage_pct = if raw_images > 0 {
        on_disk as f64 / raw_images as f64 * 100.0
    } else {
        0.0
    };

    let mut by_category: BTreeMap<String, CategoryBreakdown> = BTreeMap::new();
    for icon in &catalog.icons {
        let slot = by_category
            .entry(icon.category.clone())
            .or_insert_with(|| CategoryBreakdown {
                count: 0,
                samples: Vec::new(),
            });
        slot.count += 1;
        if slot.samples.len() < SAMPLE_SIZE {
            slot.samples.push(icon.semantic_name.clone());
        }
    }

    let mut used: Vec<_> = catalog
        .icons
        .iter()
        .filter(|icon| !icon.used_in.is_empty())
        .collect();
    // Stable sort keeps catalog order among equally used icons.
    used.sort_by(|a, b| b.used_in.len().cmp(&a.used_in.len()));
    let most_used = used
        .into_iter()
        .take(MOST_USED_LIMIT)
        .map(|icon| (icon.semantic_name.clone(), icon.used_in.clone()))
        .collect();

    let projects = catalog
        .icons
        .iter()
        .flat_map(|icon| icon.used_in.iter().cloned())
        .collect();

    Ok(CatalogStats {
        cataloged,
        raw_images,
        uncataloged,
        coverage_pct,
        by_category,
        most_used,
        projects,
    })
}

fn cataloged_on_disk(store: &CatalogStore) -> usize {
    let layout = store.layout();
    store
        .catalog()
        .icons
        .iter()
        .filter(|icon| icon.extension() == layout.extension())
        .filter(|icon| layout.resolve(&icon.filename).is_file())
        .count()
}
