//! Starter party loader.
//!
//! A party file lists characters by name, each with the units they field.
//! Units are built from catalog definitions at the requested level and learn
//! every skill unlocked up to it.

use std::path::Path;

use battle_core::{BattleConfig, CatalogOracle, Character, DefinitionId, Unit};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// One unit slot in a party file. `None` entries in
/// [`PartySpec::units`] are empty slots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitSpec {
    pub definition: DefinitionId,
    #[serde(default = "UnitSpec::default_level")]
    pub level: u32,
    #[serde(default)]
    pub nickname: Option<String>,
}

impl UnitSpec {
    fn default_level() -> u32 {
        1
    }

    pub fn build(&self, catalog: &dyn CatalogOracle, config: &BattleConfig) -> LoadResult<Unit> {
        let definition = catalog
            .unit_definition(self.definition)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("Unknown unit definition {}", self.definition))?;

        let mut unit = Unit::new(definition, config);
        unit.set_level(self.level);
        unit.learn_unlocked_skills();
        if let Some(nickname) = &self.nickname {
            unit = unit.with_nickname(nickname.clone());
        }
        Ok(unit)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartySpec {
    pub name: String,
    #[serde(default)]
    pub icon: Option<String>,
    pub units: Vec<Option<UnitSpec>>,
}

impl PartySpec {
    /// Builds the character with a fresh unit for every occupied slot.
    pub fn build(
        &self,
        catalog: &dyn CatalogOracle,
        config: &BattleConfig,
    ) -> LoadResult<Character> {
        let mut character = Character::new(self.name.clone());
        if let Some(icon) = &self.icon {
            character = character.with_icon(icon.clone());
        }
        for slot in &self.units {
            character = match slot {
                Some(spec) => character.with_unit(
                    spec.build(catalog, config)
                        .map_err(|e| anyhow::anyhow!("{} in party '{}'", e, self.name))?,
                ),
                None => character.with_empty_slot(),
            };
        }
        Ok(character)
    }
}

/// Party list structure for RON files.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PartyFile {
    pub parties: Vec<PartySpec>,
}

/// Loader for starter parties from RON files.
pub struct PartyLoader;

impl PartyLoader {
    pub fn load(path: &Path) -> LoadResult<Vec<PartySpec>> {
        let content = read_file(path)?;
        Self::parse(&content).map_err(|e| anyhow::anyhow!("{} ({})", e, path.display()))
    }

    pub fn parse(content: &str) -> LoadResult<Vec<PartySpec>> {
        let file: PartyFile = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse party RON: {}", e))?;
        Ok(file.parties)
    }

    /// The parties shipped with the crate.
    pub fn bundled() -> LoadResult<Vec<PartySpec>> {
        Self::parse(crate::data::PARTIES)
    }
}
