//! Data-driven battle content and loaders.
//!
//! This crate houses the bundled sample content and provides loaders for
//! RON/TOML data files:
//! - Skill, status and unit catalogs (RON)
//! - Starter parties (RON)
//! - Battle configuration (TOML)
//!
//! Content is consumed through [`battle_core::CatalogOracle`] and never
//! changes during a battle. All loaders deserialize battle-core types
//! directly through their serde derives.

pub mod data;

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{
    CatalogFile, CatalogLoader, ConfigLoader, LoadResult, PartyFile, PartyLoader, PartySpec,
    UnitSpec,
};
