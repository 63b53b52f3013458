//! Battle configuration loader.

use std::path::Path;

use battle_core::BattleConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for battle configuration from TOML files.
///
/// Missing keys fall back to [`BattleConfig::default`].
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config data from a TOML file.
    pub fn load(path: &Path) -> LoadResult<BattleConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("{} ({})", e, path.display()))
    }

    pub fn parse(content: &str) -> LoadResult<BattleConfig> {
        let config: BattleConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?;

        if config.units_per_party == 0 {
            anyhow::bail!("units_per_party must be at least 1");
        }
        if config.characters_per_battle < BattleConfig::MIN_CHARACTERS {
            anyhow::bail!(
                "characters_per_battle must be at least {}",
                BattleConfig::MIN_CHARACTERS
            );
        }
        Ok(config)
    }

    /// The configuration shipped with the crate.
    pub fn bundled() -> LoadResult<BattleConfig> {
        Self::parse(crate::data::CONFIG)
    }
}
