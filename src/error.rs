//! Typed negative results for the icon catalog.
//!
//! Most plumbing returns `anyhow::Result`; the variants here are raised
//! through it with `bail!` so the binary can print them verbatim and tests
//! can recover the exact condition with `downcast_ref`.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("library root {} does not exist or is not a directory", .0.display())]
    MissingRoot(PathBuf),

    #[error("catalog document {} is malformed:\n{details}", .path.display())]
    CorruptDocument { path: PathBuf, details: String },

    #[error("invalid category '{category}' (available: {})", .available.join(", "))]
    UnknownCategory {
        category: String,
        available: Vec<String>,
    },

    #[error("category name '{0}' must be non-empty and free of path separators")]
    InvalidCategoryName(String),

    #[error("{field} '{value}' must be a single path component")]
    UnsafeName { field: &'static str, value: String },

    #[error("{field} must not be empty")]
    EmptyField { field: &'static str },

    #[error("CSV must have headers: {}; found: {}", .required.join(", "), .found.join(", "))]
    MissingColumns {
        required: Vec<&'static str>,
        found: Vec<String>,
    },

    #[error("template '{name}' not found (available: {})", .available.join(", "))]
    UnknownTemplate {
        name: String,
        available: Vec<String>,
    },

    #[error("no templates found; create one with 'create-template' first")]
    NoTemplates,

    #[error("icon '{0}' not found in catalog")]
    IconNotFound(String),
}
