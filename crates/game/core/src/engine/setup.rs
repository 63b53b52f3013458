//! `Start` phase: validation and roster construction.

use std::collections::BTreeSet;

use crate::action::Effect;
use crate::catalog::{CatalogError, CatalogOracle, StatusId};
use crate::config::BattleConfig;
use crate::state::{BattleUnit, BattleUnitId, Character, Roster, Unit};

use super::SetupError;

/// Checks participant counts, party sizes and every catalog reference the
/// participants' units make.
pub(super) fn validate<'c>(
    characters: impl ExactSizeIterator<Item = &'c Character>,
    config: &BattleConfig,
    catalog: &dyn CatalogOracle,
) -> Result<(), SetupError> {
    let found = characters.len();
    if found < BattleConfig::MIN_CHARACTERS {
        return Err(SetupError::TooFewCharacters {
            found,
            min: BattleConfig::MIN_CHARACTERS,
        });
    }
    let max = config.characters_per_battle.max(BattleConfig::MIN_CHARACTERS);
    if found > max {
        return Err(SetupError::TooManyCharacters { found, max });
    }

    let mut checked = BTreeSet::new();
    for character in characters {
        let size = character.units().count();
        if size > config.units_per_party {
            return Err(SetupError::PartyTooLarge {
                character: character.name.clone(),
                size,
                max: config.units_per_party,
            });
        }
        if size == 0 {
            return Err(SetupError::EmptyParty {
                character: character.name.clone(),
            });
        }
        for unit in character.units() {
            check_unit(unit, catalog, &mut checked)?;
        }
    }
    Ok(())
}

fn check_unit(
    unit: &Unit,
    catalog: &dyn CatalogOracle,
    checked: &mut BTreeSet<StatusId>,
) -> Result<(), CatalogError> {
    let definition = unit.definition();
    if catalog.unit_definition(definition.id).is_none() {
        return Err(CatalogError::MissingDefinition(definition.id));
    }

    for skill in unit.skills().iter().filter_map(|slot| slot.skill) {
        let referenced_by = format!("unit '{}'", unit.name());
        let entry = catalog.skill(skill).ok_or(CatalogError::MissingSkill {
            skill,
            referenced_by,
        })?;
        check_effects(&entry.effects, &format!("skill '{}'", entry.name), catalog, checked)?;
    }
    Ok(())
}

/// Follows status references transitively; `checked` stops cycles.
fn check_effects(
    effects: &[Effect],
    owner: &str,
    catalog: &dyn CatalogOracle,
    checked: &mut BTreeSet<StatusId>,
) -> Result<(), CatalogError> {
    for status in effects.iter().filter_map(Effect::referenced_status) {
        if !checked.insert(status) {
            continue;
        }
        let entry = catalog.status(status).ok_or_else(|| CatalogError::MissingStatus {
            status,
            referenced_by: owner.to_string(),
        })?;
        let owner = format!("status '{}'", entry.name);
        for chain in [
            &entry.on_apply,
            &entry.on_turn_start,
            &entry.on_turn_end,
            &entry.on_clear,
        ] {
            check_effects(chain, &owner, catalog, checked)?;
        }
    }
    Ok(())
}

/// Builds the roster with empty slots pruned: each party's units are packed
/// into slots `0..n` in their original order. Every unit starts reset.
pub(super) fn build_roster<'c>(
    characters: impl ExactSizeIterator<Item = &'c Character>,
    config: &BattleConfig,
) -> Roster {
    let mut roster = Roster::new(characters.len(), config.units_per_party);
    for (character_index, character) in characters.enumerate() {
        for (slot, unit) in character.units().enumerate() {
            let id = BattleUnitId::new(character_index, slot);
            roster.insert(BattleUnit::new(id, unit.clone()));
        }
    }
    for unit in roster.iter_mut() {
        unit.reset();
    }
    roster
}
