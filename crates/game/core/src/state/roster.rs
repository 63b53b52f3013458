use super::{BattleUnit, BattleUnitId};

/// Every battle unit of a battle, addressed by [`BattleUnitId`].
///
/// Storage is a flat array indexed `character × units_per_party + slot`.
/// Defeated units stay in the roster (their statuses may still reference
/// them as appliers); iteration helpers filter them out where it matters.
#[derive(Clone, Debug)]
pub struct Roster {
    units_per_party: usize,
    characters: usize,
    slots: Vec<Option<BattleUnit>>,
}

impl Roster {
    pub fn new(characters: usize, units_per_party: usize) -> Self {
        Self {
            units_per_party,
            characters,
            slots: vec![None; characters * units_per_party],
        }
    }

    pub fn characters(&self) -> usize {
        self.characters
    }

    pub fn units_per_party(&self) -> usize {
        self.units_per_party
    }

    fn index(&self, id: BattleUnitId) -> Option<usize> {
        (id.character < self.characters && id.slot < self.units_per_party)
            .then(|| id.index(self.units_per_party))
    }

    /// Places a unit at its id's position, returning the unit it replaced.
    ///
    /// Ids outside the roster are ignored and handed back.
    pub fn insert(&mut self, unit: BattleUnit) -> Option<BattleUnit> {
        match self.index(unit.id()) {
            Some(index) => self.slots[index].replace(unit),
            None => Some(unit),
        }
    }

    pub fn get(&self, id: BattleUnitId) -> Option<&BattleUnit> {
        self.index(id).and_then(|index| self.slots[index].as_ref())
    }

    pub fn get_mut(&mut self, id: BattleUnitId) -> Option<&mut BattleUnit> {
        self.index(id)
            .and_then(move |index| self.slots[index].as_mut())
    }

    pub fn contains(&self, id: BattleUnitId) -> bool {
        self.get(id).is_some()
    }

    /// True when the unit exists and is not defeated.
    pub fn is_alive(&self, id: BattleUnitId) -> bool {
        self.get(id).is_some_and(BattleUnit::is_alive)
    }

    /// Present units (alive or defeated) in roster order.
    pub fn iter(&self) -> impl Iterator<Item = &BattleUnit> {
        self.slots.iter().flatten()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut BattleUnit> {
        self.slots.iter_mut().flatten()
    }

    /// Live units in roster order.
    pub fn living(&self) -> impl Iterator<Item = &BattleUnit> {
        self.iter().filter(|unit| unit.is_alive())
    }

    pub fn living_ids(&self) -> Vec<BattleUnitId> {
        self.living().map(BattleUnit::id).collect()
    }

    /// Present units of one character in slot order.
    pub fn party(&self, character: usize) -> impl Iterator<Item = &BattleUnit> {
        self.iter().filter(move |unit| unit.id().character == character)
    }

    pub fn living_party(&self, character: usize) -> impl Iterator<Item = &BattleUnit> {
        self.party(character).filter(|unit| unit.is_alive())
    }

    /// Characters that still have at least one live unit.
    pub fn standing_characters(&self) -> Vec<usize> {
        (0..self.characters)
            .filter(|&character| self.living_party(character).next().is_some())
            .collect()
    }

    pub fn into_units(self) -> impl Iterator<Item = BattleUnit> {
        self.slots.into_iter().flatten()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::catalog::{DefinitionId, UnitDefinition};
    use crate::config::BattleConfig;
    use crate::state::Unit;
    use crate::stats::StatBlock;

    fn unit_at(character: usize, slot: usize) -> BattleUnit {
        let definition = Arc::new(UnitDefinition::new(
            DefinitionId(1),
            "Pawn",
            StatBlock::new(10, 1, 1, 1),
        ));
        BattleUnit::new(
            BattleUnitId::new(character, slot),
            Unit::new(definition, &BattleConfig::default()),
        )
    }

    #[test]
    fn addresses_by_character_and_slot() {
        let mut roster = Roster::new(2, 3);
        roster.insert(unit_at(1, 2));

        assert!(roster.contains(BattleUnitId::new(1, 2)));
        assert!(!roster.contains(BattleUnitId::new(2, 1)));
        assert!(roster.get(BattleUnitId::new(0, 5)).is_none());
    }

    #[test]
    fn out_of_range_insert_is_returned() {
        let mut roster = Roster::new(2, 3);
        let rejected = roster.insert(unit_at(0, 3));
        assert!(rejected.is_some());
        assert_eq!(roster.iter().count(), 0);
    }

    #[test]
    fn standing_characters_ignore_defeated_units() {
        let mut roster = Roster::new(2, 3);
        roster.insert(unit_at(0, 0));
        roster.insert(unit_at(1, 0));
        roster.insert(unit_at(1, 1));

        roster.get_mut(BattleUnitId::new(0, 0)).unwrap().take_damage(99);

        assert_eq!(roster.standing_characters(), vec![1]);
        assert_eq!(roster.living_ids().len(), 2);
        assert_eq!(roster.party(0).count(), 1);
        assert_eq!(roster.living_party(0).count(), 0);
    }
}
