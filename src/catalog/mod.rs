//! Catalog lookups.
//!
//! The catalog is an external database owned by the media server; the
//! importer only needs two existence checks from it, so the trait exposes
//! exactly those and nothing else.

mod store;

pub use store::SqliteCatalogStore;

use anyhow::Result;

/// Read-only lookup capability over the media server's catalog.
pub trait CatalogStore: Send + Sync {
    /// Check whether a file with the given content hash is already cataloged.
    fn file_exists_by_hash(&self, md5: &str) -> Result<bool>;

    /// Check whether a track type code exists in the reference table.
    fn track_type_exists(&self, code: &str) -> Result<bool>;
}
