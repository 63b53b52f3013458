//! Catalog loader.

use std::path::Path;

use battle_core::{Catalog, Skill, Status, UnitDefinition};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// Catalog structure for RON files.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogFile {
    pub skills: Vec<Skill>,
    pub statuses: Vec<Status>,
    pub units: Vec<UnitDefinition>,
}

impl CatalogFile {
    /// Builds the in-memory catalog, rejecting duplicate ids and dangling
    /// references.
    pub fn into_catalog(self) -> LoadResult<Catalog> {
        let mut catalog = Catalog::new();

        for skill in self.skills {
            let id = skill.id;
            if catalog.insert_skill(skill).is_some() {
                anyhow::bail!("Duplicate {} in catalog", id);
            }
        }
        for status in self.statuses {
            let id = status.id;
            if catalog.insert_status(status).is_some() {
                anyhow::bail!("Duplicate {} in catalog", id);
            }
        }
        for definition in self.units {
            let id = definition.id;
            if catalog.insert_definition(definition).is_some() {
                anyhow::bail!("Duplicate {} in catalog", id);
            }
        }

        catalog
            .validate()
            .map_err(|e| anyhow::anyhow!("Invalid catalog: {}", e))?;
        Ok(catalog)
    }
}

/// Loader for skill, status and unit catalogs from RON files.
pub struct CatalogLoader;

impl CatalogLoader {
    /// Load a catalog from a RON file containing a [`CatalogFile`].
    pub fn load(path: &Path) -> LoadResult<Catalog> {
        let content = read_file(path)?;
        Self::parse(&content).map_err(|e| anyhow::anyhow!("{} ({})", e, path.display()))
    }

    pub fn parse(content: &str) -> LoadResult<Catalog> {
        let file: CatalogFile = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse catalog RON: {}", e))?;

        tracing::debug!(
            skills = file.skills.len(),
            statuses = file.statuses.len(),
            units = file.units.len(),
            "catalog parsed"
        );
        file.into_catalog()
    }

    /// The catalog shipped with the crate.
    pub fn bundled() -> LoadResult<Catalog> {
        Self::parse(crate::data::CATALOG)
    }
}
