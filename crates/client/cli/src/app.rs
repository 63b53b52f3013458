//! Content loading and the battle loop.

use std::path::Path;

use anyhow::{Context, Result};
use battle_content::{CatalogLoader, ConfigLoader, PartyLoader, PartySpec};
use battle_core::{Battle, BattleConfig, Catalog, FirstReadySkillPlanner, Progress};

use crate::narrator::ConsoleNarrator;

pub struct DemoBattle {
    catalog: Catalog,
    config: BattleConfig,
    parties: Vec<PartySpec>,
}

impl DemoBattle {
    /// Loads each piece from its file, or from the bundled data when no path
    /// is given.
    pub fn load(
        config: Option<&Path>,
        catalog: Option<&Path>,
        parties: Option<&Path>,
    ) -> Result<Self> {
        let config = match config {
            Some(path) => ConfigLoader::load(path),
            None => ConfigLoader::bundled(),
        }
        .context("loading battle config")?;
        let catalog = match catalog {
            Some(path) => CatalogLoader::load(path),
            None => CatalogLoader::bundled(),
        }
        .context("loading catalog")?;
        let parties = match parties {
            Some(path) => PartyLoader::load(path),
            None => PartyLoader::bundled(),
        }
        .context("loading parties")?;

        if parties.len() < BattleConfig::MIN_CHARACTERS {
            anyhow::bail!(
                "need at least {} parties, found {}",
                BattleConfig::MIN_CHARACTERS,
                parties.len()
            );
        }

        tracing::info!(
            skills = catalog.skills().count(),
            statuses = catalog.statuses().count(),
            units = catalog.definitions().count(),
            "content loaded"
        );
        Ok(Self {
            catalog,
            config,
            parties,
        })
    }

    pub fn run(&self, max_turns: u32, quiet: bool) -> Result<()> {
        let mut builder = Battle::builder(&self.catalog, self.config.clone());
        for party in self.parties.iter().take(self.config.characters_per_battle) {
            let character = party
                .build(&self.catalog, &self.config)
                .with_context(|| format!("building party '{}'", party.name))?;
            builder = builder.planned(character, FirstReadySkillPlanner);
        }
        let mut battle = builder.build();
        let mut narrator = ConsoleNarrator::new(!quiet);

        loop {
            match battle.advance(&mut narrator)? {
                Progress::Advanced(_) if battle.turn() > max_turns => {
                    tracing::info!(max_turns, "turn limit reached");
                    println!("\nNo winner after {max_turns} turns.");
                    break;
                }
                Progress::Advanced(_) => {}
                Progress::AwaitingInput(units) => {
                    anyhow::bail!("units {units:?} are waiting for a player");
                }
                Progress::Finished(outcome) => {
                    tracing::info!(turns = outcome.turns, winner = ?outcome.winner, "battle over");
                    break;
                }
            }
        }

        println!();
        for unit in battle.roster().iter() {
            let owner = battle
                .character(unit.id().character)
                .map(|character| character.name.as_str())
                .unwrap_or("?");
            println!(
                "{owner:>10} | {:<12} {:>4}/{:<4} HP",
                unit.name(),
                unit.hp(),
                unit.max_hp()
            );
        }
        tracing::debug!(events = narrator.lines(), "narration finished");
        Ok(())
    }
}
