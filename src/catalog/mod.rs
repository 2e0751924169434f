//! Icon catalog: the authoritative record of every cataloged icon.
//!
//! The document lives at `icon-catalog.json` in the library root. Types here
//! mirror its fields; `CatalogStore` owns the loaded copy for a process run
//! and is the only path through which it is mutated, while lookups are plain
//! methods on `Catalog`.

pub mod index;
pub mod model;
pub(crate) mod schema;
pub mod store;

pub use model::{CATALOG_VERSION, Catalog, CatalogEntry, NewEntry, SEED_CATEGORIES};
pub use store::{CatalogStore, UpsertKind, UpsertOutcome};
