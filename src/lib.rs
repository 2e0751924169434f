//! Semantic icon library.
//!
//! Raw icon images are stored under opaque ids in `raw/`; the catalog maps
//! each id to a semantic name, tags and a category, and the projector keeps
//! a `catalog/<category>/<name>` symlink tree in step with it so other
//! projects can consume icons by name. Everything here is single-process and
//! synchronous; each mutating call persists before it returns.

pub mod catalog;
pub mod error;
pub mod export;
pub mod import;
pub mod layout;
pub mod projector;
pub mod stats;
pub mod suggest;
pub mod templates;
pub mod validate;

pub use catalog::{
    Catalog, CatalogEntry, CatalogStore, NewEntry, SEED_CATEGORIES, UpsertKind, UpsertOutcome,
};
pub use error::CatalogError;
pub use export::{ExportReport, export_category, export_to_project};
pub use import::{ImportSummary, RowIssue, RowProblem, import_csv, import_reader, parse_tags};
pub use layout::{LibraryLayout, find_library_root};
pub use projector::{Projection, Projector};
pub use stats::CatalogStats;
pub use suggest::{Suggestion, generate_suggestions, suggest_from_stem, write_suggestions_csv};
pub use templates::{
    ApplySummary, Template, TemplateBook, TemplateSpec, apply_template, create_template,
};
pub use validate::{IntegrityIssue, IntegrityReport, IntegrityWarning, validate};

/// Split a free-form list on commas and whitespace, as accepted by CLI flags
/// that take several tags in one argument.
pub fn split_list(value: &str) -> Vec<String> {
    value
        .replace(',', " ")
        .split_whitespace()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
