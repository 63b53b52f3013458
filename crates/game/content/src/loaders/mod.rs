//! Content loaders for reading battle data from files.
//!
//! Every loader has a `load` (file), `parse` (string) and `bundled` entry
//! point; `bundled` parses the data in [`crate::data`].

pub mod catalog;
pub mod config;
pub mod parties;

pub use catalog::{CatalogFile, CatalogLoader};
pub use config::ConfigLoader;
pub use parties::{PartyFile, PartyLoader, PartySpec, UnitSpec};

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
