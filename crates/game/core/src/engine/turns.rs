use std::cmp::Reverse;

use crate::action::Action;
use crate::catalog::{CatalogOracle, SkillPriority};
use crate::state::Roster;

/// Sort key for queued actions: priority tier, then speed (fastest first),
/// then roster position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct TurnOrderKey {
    pub priority: SkillPriority,
    pub speed: Reverse<i32>,
    pub roster_index: usize,
}

impl TurnOrderKey {
    /// Key for `action` given the state at the start of the action phase.
    ///
    /// Skips and placeholders use the default tier. Actions whose unit is
    /// missing sort last.
    pub fn of(action: &Action, roster: &Roster, catalog: &dyn CatalogOracle) -> Self {
        let Some(unit) = action.unit().and_then(|id| roster.get(id)) else {
            return Self {
                priority: SkillPriority::AlwaysLast,
                speed: Reverse(i32::MIN),
                roster_index: usize::MAX,
            };
        };

        let priority = match action {
            Action::Attack(attack) => attack
                .skill_index()
                .and_then(|index| unit.unit().skills().get(index))
                .and_then(|slot| slot.skill)
                .and_then(|skill| catalog.skill(skill))
                .map(|skill| skill.priority)
                .unwrap_or_default(),
            Action::Skip { .. } | Action::Defeated { .. } => SkillPriority::None,
        };

        Self {
            priority,
            speed: Reverse(unit.speed()),
            roster_index: unit.id().index(roster.units_per_party()),
        }
    }
}

/// Orders `actions` for resolution. The sort is stable.
pub fn order_actions(actions: &mut [Action], roster: &Roster, catalog: &dyn CatalogOracle) {
    actions.sort_by_cached_key(|action| TurnOrderKey::of(action, roster, catalog));
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::action::{Effect, TargetType};
    use crate::catalog::{Catalog, DefinitionId, Skill, SkillId, UnitDefinition};
    use crate::config::BattleConfig;
    use crate::state::{BattleUnit, BattleUnitId, Unit};
    use crate::stats::StatBlock;

    fn unit(id: BattleUnitId, agility: i32, skill: SkillId) -> BattleUnit {
        let definition = Arc::new(
            UnitDefinition::new(DefinitionId(1), "Runner", StatBlock::new(10, 1, 1, agility))
                .with_skill_unlock(1, skill),
        );
        BattleUnit::new(id, Unit::new(definition, &BattleConfig::default()))
    }

    #[test]
    fn faster_units_act_first_and_priority_overrides_speed() {
        let catalog = Catalog::new()
            .with_skill(
                Skill::new(SkillId(1), "Strike", TargetType::SINGLE_ENEMY)
                    .with_effect(Effect::damage(1)),
            )
            .with_skill(
                Skill::new(SkillId(2), "Quick Strike", TargetType::SINGLE_ENEMY)
                    .with_effect(Effect::damage(1))
                    .with_priority(SkillPriority::AlwaysFirst),
            );
        let slow = BattleUnitId::new(0, 0);
        let fast = BattleUnitId::new(0, 1);
        let quick = BattleUnitId::new(1, 0);

        let mut roster = Roster::new(2, 2);
        roster.insert(unit(slow, 5, SkillId(1)));
        roster.insert(unit(fast, 50, SkillId(1)));
        roster.insert(unit(quick, 1, SkillId(2)));

        let mut actions = vec![
            Action::attack(slow, 0, quick),
            Action::attack(fast, 0, quick),
            Action::attack(quick, 0, slow),
        ];
        order_actions(&mut actions, &roster, &catalog);

        let order: Vec<_> = actions.iter().filter_map(Action::unit).collect();
        assert_eq!(order, vec![quick, fast, slow]);
    }

    #[test]
    fn speed_ties_fall_back_to_roster_order() {
        let catalog = Catalog::new();
        let a = BattleUnitId::new(1, 0);
        let b = BattleUnitId::new(0, 1);
        let mut roster = Roster::new(2, 2);
        roster.insert(unit(a, 10, SkillId(1)));
        roster.insert(unit(b, 10, SkillId(1)));

        let mut actions = vec![Action::skip(a), Action::skip(b)];
        order_actions(&mut actions, &roster, &catalog);

        assert_eq!(actions[0].unit(), Some(b));
    }
}
