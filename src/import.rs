//! Bulk import from CSV.
//!
//! The header is checked once; after that every row is judged on its own and
//! a bad row never stops the batch. Each accepted row is committed through
//! `CatalogStore::upsert`, so rows imported before a crash stay persisted.

use anyhow::{Context, Result, bail};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{info, warn};

use crate::catalog::{CatalogStore, NewEntry};
use crate::error::CatalogError;

pub const REQUIRED_COLUMNS: [&str; 4] = ["id", "semantic", "tags", "category"];

/// Why a row was not imported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowProblem {
    InvalidCategory(String),
    MissingIdOrName,
    AlreadyExists(String),
    Malformed(String),
    CommitFailed(String),
}

impl std::fmt::Display for RowProblem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RowProblem::InvalidCategory(category) => write!(f, "invalid category '{category}'"),
            RowProblem::MissingIdOrName => write!(f, "missing id or semantic name"),
            RowProblem::AlreadyExists(id) => write!(f, "icon '{id}' already exists"),
            RowProblem::Malformed(details) => write!(f, "malformed row: {details}"),
            RowProblem::CommitFailed(details) => write!(f, "error processing row: {details}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowIssue {
    /// 1-based line number; the header is line 1.
    pub row: usize,
    pub problem: RowProblem,
}

impl RowIssue {
    pub fn is_duplicate(&self) -> bool {
        matches!(self.problem, RowProblem::AlreadyExists(_))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub succeeded: usize,
    pub errors: usize,
    pub duplicates: usize,
    pub catalog_size: usize,
    pub issues: Vec<RowIssue>,
}

impl ImportSummary {
    fn skip(&mut self, row: usize, problem: RowProblem) {
        warn!(row, "{problem}, skipping");
        let issue = RowIssue { row, problem };
        if issue.is_duplicate() {
            self.duplicates += 1;
        } else {
            self.errors += 1;
        }
        self.issues.push(issue);
    }
}

/// Split a raw tag field: on commas when one is present, otherwise on
/// whitespace. Empty tokens are dropped.
pub fn parse_tags(raw: &str) -> Vec<String> {
    let raw = raw.trim();
    let tokens: Vec<&str> = if raw.contains(',') {
        raw.split(',').collect()
    } else {
        raw.split_whitespace().collect()
    };
    tokens
        .into_iter()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Column positions resolved from the header row.
pub(crate) struct Columns {
    positions: Vec<(String, usize)>,
}

impl Columns {
    pub(crate) fn from_headers(headers: &csv::StringRecord) -> Self {
        Self {
            positions: headers
                .iter()
                .enumerate()
                .map(|(idx, name)| (name.trim().to_string(), idx))
                .collect(),
        }
    }

    pub(crate) fn names(&self) -> Vec<String> {
        self.positions.iter().map(|(name, _)| name.clone()).collect()
    }

    pub(crate) fn require(&self, required: &[&'static str]) -> Result<()> {
        if required.iter().all(|col| self.index(col).is_some()) {
            return Ok(());
        }
        bail!(CatalogError::MissingColumns {
            required: required.to_vec(),
            found: self.names(),
        });
    }

    fn index(&self, name: &str) -> Option<usize> {
        self.positions
            .iter()
            .find(|(col, _)| col == name)
            .map(|(_, idx)| *idx)
            .or_else(|| {
                (name == "semantic")
                    .then(|| self.index("semanticName"))
                    .flatten()
            })
    }

    /// Trimmed field value; absent columns and short rows read as empty.
    pub(crate) fn get<'r>(&self, record: &'r csv::StringRecord, name: &str) -> &'r str {
        self.index(name)
            .and_then(|idx| record.get(idx))
            .map(str::trim)
            .unwrap_or("")
    }
}

/// Open a CSV reader that tolerates ragged rows.
pub(crate) fn csv_reader<R: Read>(input: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::None)
        .from_reader(input)
}

pub fn import_csv(store: &mut CatalogStore, path: &Path) -> Result<ImportSummary> {
    let file = File::open(path).with_context(|| format!("opening CSV file {}", path.display()))?;
    info!(path = %path.display(), "importing icons");
    import_reader(store, file)
}

pub fn import_reader<R: Read>(store: &mut CatalogStore, input: R) -> Result<ImportSummary> {
    let mut reader = csv_reader(input);
    let headers = reader.headers().context("reading CSV header")?.clone();
    let columns = Columns::from_headers(&headers);
    columns.require(&REQUIRED_COLUMNS)?;

    let mut summary = ImportSummary::default();
    for (idx, record) in reader.records().enumerate() {
        let row = idx + 2;
        let record = match record {
            Ok(record) => record,
            Err(err) => {
                summary.skip(row, RowProblem::Malformed(err.to_string()));
                continue;
            }
        };

        let tags = parse_tags(columns.get(&record, "tags"));

        let category = columns.get(&record, "category");
        if !store.catalog().has_category(category) {
            summary.skip(row, RowProblem::InvalidCategory(category.to_string()));
            continue;
        }

        let id = columns.get(&record, "id");
        let semantic = columns.get(&record, "semantic");
        if id.is_empty() || semantic.is_empty() {
            summary.skip(row, RowProblem::MissingIdOrName);
            continue;
        }

        if store.find_by_id(id).is_some() {
            summary.skip(row, RowProblem::AlreadyExists(id.to_string()));
            continue;
        }

        let entry = NewEntry {
            id: id.to_string(),
            semantic_name: semantic.to_string(),
            tags,
            category: category.to_string(),
            description: columns.get(&record, "description").to_string(),
        };
        match store.upsert(entry) {
            Ok(_) => summary.succeeded += 1,
            Err(err) => summary.skip(row, RowProblem::CommitFailed(format!("{err:#}"))),
        }
    }

    summary.catalog_size = store.catalog().len();
    info!(
        succeeded = summary.succeeded,
        errors = summary.errors,
        duplicates = summary.duplicates,
        "import finished"
    );
    Ok(summary)
}
