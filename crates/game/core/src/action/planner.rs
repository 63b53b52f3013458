//! Automatic action selection for non-player characters.

use crate::catalog::CatalogOracle;
use crate::state::{BattleUnitId, Roster};

use super::Action;
use super::targeting::valid_anchors;

/// Read-only battle state handed to a planner.
#[derive(Clone, Copy)]
pub struct PlanningView<'a> {
    pub roster: &'a Roster,
    pub catalog: &'a dyn CatalogOracle,
    pub turn: u32,
}

/// Supplies actions for automatically controlled characters.
///
/// Called once per live unit during `ChooseActions`. The returned action is
/// validated like player input; an invalid one is replaced by a skip.
pub trait ActionPlanner {
    fn plan(&mut self, unit: BattleUnitId, view: PlanningView<'_>) -> Action;
}

/// Always skips. Useful for tests or as a fallback.
#[derive(Clone, Copy, Debug, Default)]
pub struct PassivePlanner;

impl ActionPlanner for PassivePlanner {
    fn plan(&mut self, unit: BattleUnitId, _view: PlanningView<'_>) -> Action {
        Action::skip(unit)
    }
}

/// Uses the first ready skill slot on the first valid target.
#[derive(Clone, Copy, Debug, Default)]
pub struct FirstReadySkillPlanner;

impl ActionPlanner for FirstReadySkillPlanner {
    fn plan(&mut self, unit: BattleUnitId, view: PlanningView<'_>) -> Action {
        let Some(battle_unit) = view.roster.get(unit) else {
            return Action::skip(unit);
        };

        for (index, slot) in battle_unit.unit().skills().iter().enumerate() {
            if !slot.is_ready() {
                continue;
            }
            let Some(skill) = slot.skill.and_then(|id| view.catalog.skill(id)) else {
                continue;
            };
            if let Some(&target) = valid_anchors(view.roster, unit, skill.target).first() {
                return Action::attack(unit, index, target);
            }
        }

        Action::skip(unit)
    }
}
