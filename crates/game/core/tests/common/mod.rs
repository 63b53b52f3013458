#![allow(dead_code)]

use std::sync::Arc;

use battle_core::{
    BattleConfig, BattleUnit, BattleUnitId, Catalog, CatalogOracle, Character, DefinitionId,
    Roster, SkillId, StatBlock, Unit, UnitDefinition,
};

/// A definition with `health` HP, `agility` speed and the given level 1 skills.
pub fn definition(id: u32, name: &str, health: i32, agility: i32, skills: &[u32]) -> UnitDefinition {
    skills.iter().fold(
        UnitDefinition::new(DefinitionId(id), name, StatBlock::new(health, 10, 10, agility)),
        |definition, &skill| definition.with_skill_unlock(1, SkillId(skill)),
    )
}

pub fn unit(catalog: &Catalog, definition: u32) -> Unit {
    let definition: Arc<UnitDefinition> = catalog
        .unit_definition(DefinitionId(definition))
        .cloned()
        .expect("definition registered");
    Unit::new(definition, &BattleConfig::default())
}

pub fn character(catalog: &Catalog, name: &str, definitions: &[u32]) -> Character {
    definitions
        .iter()
        .fold(Character::new(name), |character, &definition| {
            character.with_unit(unit(catalog, definition))
        })
}

/// Roster with one party per entry, each unit built from a definition id.
pub fn roster(catalog: &Catalog, parties: &[&[u32]]) -> Roster {
    let config = BattleConfig::default();
    let mut roster = Roster::new(parties.len(), config.units_per_party);
    for (character, party) in parties.iter().enumerate() {
        for (slot, &definition) in party.iter().enumerate() {
            roster.insert(BattleUnit::new(
                BattleUnitId::new(character, slot),
                unit(catalog, definition),
            ));
        }
    }
    roster
}

pub fn hp(roster: &Roster, id: BattleUnitId) -> i32 {
    roster.get(id).expect("unit in roster").hp()
}
