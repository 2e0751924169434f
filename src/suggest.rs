//! Naming and category suggestions for uncataloged images.
//!
//! Suggestions are advisory: they are written to a CSV for a human to review
//! and later feed through the importer, never straight into the catalog.

use anyhow::{Context, Result};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use crate::catalog::Catalog;
use crate::layout::LibraryLayout;

pub const DEFAULT_CATEGORY: &str = "ui";
pub const SUGGESTED_TAG_LIMIT: usize = 5;
pub const SUGGESTION_COLUMNS: [&str; 5] = ["id", "semantic", "tags", "category", "description"];

/// Keyword table scanned in declaration order; earlier categories win ties.
pub const CATEGORY_KEYWORDS: &[(&str, &[&str])] = &[
    (
        "files",
        &["file", "document", "folder", "pdf", "doc", "text", "page", "book", "paper"],
    ),
    (
        "network",
        &["network", "wifi", "cloud", "internet", "connection", "globe", "web", "server", "router"],
    ),
    (
        "security",
        &["lock", "key", "shield", "security", "secure", "certificate", "password", "protection"],
    ),
    (
        "tools",
        &["tool", "wrench", "gear", "settings", "config", "hammer", "screwdriver", "toolbox"],
    ),
    (
        "ui",
        &["button", "icon", "arrow", "close", "open", "menu", "navigation", "pointer", "cursor"],
    ),
    (
        "development",
        &["code", "bug", "database", "api", "console", "terminal", "git", "debug", "test"],
    ),
    ("emoji", &["smile", "happy", "sad", "face", "emotion", "laugh", "cry"]),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestion {
    pub semantic: String,
    /// Normalized words of the stem, deduplicated in first-seen order.
    pub tags: Vec<String>,
    pub category: String,
    /// Number of words that matched the winning category's keywords.
    pub score: usize,
}

/// Derive a semantic name, tags and a category guess from a filename stem.
pub fn suggest_from_stem(stem: &str) -> Suggestion {
    let normalized = stem.replace(['_', '-'], " ").to_lowercase();
    let words: Vec<&str> = normalized.split_whitespace().collect();

    let mut seen = BTreeSet::new();
    let tags: Vec<String> = words
        .iter()
        .filter(|w| seen.insert(**w))
        .map(|w| w.to_string())
        .collect();

    let (category, score) = guess_category(&words);
    Suggestion {
        semantic: words.join("-"),
        tags,
        category: category.to_string(),
        score,
    }
}

fn guess_category(words: &[&str]) -> (&'static str, usize) {
    let mut best = (DEFAULT_CATEGORY, 0);
    for (category, keywords) in CATEGORY_KEYWORDS {
        let score = words
            .iter()
            .filter(|word| keywords.iter().any(|kw| word.contains(kw)))
            .count();
        if score > best.1 {
            best = (*category, score);
        }
    }
    best
}

/// `"lock-screen"` becomes `"Lock Screen icon"`.
pub fn describe(semantic: &str) -> String {
    let words: Vec<String> = semantic
        .split(['-', ' '])
        .filter(|w| !w.is_empty())
        .map(title_case)
        .collect();
    format!("{} icon", words.join(" "))
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// One line of the suggestions CSV.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestionRow {
    pub id: String,
    pub suggestion: Suggestion,
}

impl SuggestionRow {
    fn record(&self) -> [String; 5] {
        let tags: Vec<&str> = self
            .suggestion
            .tags
            .iter()
            .take(SUGGESTED_TAG_LIMIT)
            .map(String::as_str)
            .collect();
        [
            self.id.clone(),
            self.suggestion.semantic.clone(),
            tags.join(","),
            self.suggestion.category.clone(),
            describe(&self.suggestion.semantic),
        ]
    }
}

/// Stems of raw images that have no catalog entry, sorted.
pub fn uncataloged_stems(layout: &LibraryLayout, catalog: &Catalog) -> Result<Vec<String>> {
    let raw_dir = layout.raw_dir();
    if !raw_dir.is_dir() {
        return Ok(Vec::new());
    }
    let mut stems = Vec::new();
    for entry in fs::read_dir(&raw_dir).with_context(|| format!("reading {}", raw_dir.display()))? {
        let path = entry?.path();
        if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some(layout.extension()) {
            continue;
        }
        if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
            if catalog.find_by_id(stem).is_none() {
                stems.push(stem.to_string());
            }
        }
    }
    stems.sort();
    Ok(stems)
}

/// Build suggestion rows for uncataloged images, optionally capped at `limit`.
pub fn generate_suggestions(
    layout: &LibraryLayout,
    catalog: &Catalog,
    limit: Option<usize>,
) -> Result<Vec<SuggestionRow>> {
    let stems = uncataloged_stems(layout, catalog)?;
    Ok(stems
        .into_iter()
        .take(limit.unwrap_or(usize::MAX))
        .map(|id| SuggestionRow {
            suggestion: suggest_from_stem(&id),
            id,
        })
        .collect())
}

pub fn write_suggestions_csv(path: &Path, rows: &[SuggestionRow]) -> Result<()> {
    let mut writer =
        csv::Writer::from_path(path).with_context(|| format!("creating {}", path.display()))?;
    writer.write_record(SUGGESTION_COLUMNS)?;
    for row in rows {
        writer.write_record(row.record())?;
    }
    writer
        .flush()
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}
