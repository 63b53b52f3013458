//! Ephemeral per-battle projection of a [`Unit`].
//!
//! A [`BattleUnit`] is built when a battle starts and discarded when it ends.
//! Everything here is battle-scoped: current HP, status slots, triggered
//! flags and stat multipliers. Skill cooldowns live on the owned copy of the
//! unit's skill slots.
//!
//! Operations that need other units or the catalog (running a status's effect
//! chains) live in [`crate::action::execute`]; this module only holds the
//! per-unit primitives.

use std::fmt;

use bitflags::bitflags;

use super::Unit;
use crate::catalog::{Status, StatusId, StatusType};
use crate::error::{BattleErrorKind, ErrorSeverity};
use crate::stats::{Stat, StatBlock, StatMultipliers};

/// Position of a unit in a battle: `(character, slot)`.
///
/// Two ids are equal iff both components match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleUnitId {
    pub character: usize,
    pub slot: usize,
}

impl BattleUnitId {
    pub const fn new(character: usize, slot: usize) -> Self {
        Self { character, slot }
    }

    /// Roster index: `character × units_per_party + slot`.
    pub const fn index(self, units_per_party: usize) -> usize {
        self.character * units_per_party + self.slot
    }

    pub const fn is_ally_of(self, other: BattleUnitId) -> bool {
        self.character == other.character
    }
}

impl fmt::Display for BattleUnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.character, self.slot)
    }
}

bitflags! {
    /// Special battle-state flags toggled by effects.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    #[cfg_attr(feature = "serde", serde(transparent))]
    pub struct TriggeredEffects: u8 {
        /// The unit skips its action.
        const STUN                      = 1 << 0;
        /// Damage dealt heals the dealer.
        const LIFESTEAL                 = 1 << 1;
        /// New statuses are rejected.
        const DEBUFF_IMMUNITY           = 1 << 2;
        /// The next status clear skips its on-clear chain.
        const FAIL_STATUS_CLEAR_EFFECTS = 1 << 3;
    }
}

/// Errors raised by status slot removal.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum StatusError {
    #[error("unit has no status slots")]
    EmptyStatusList,

    #[error("unit does not hold {0}")]
    StatusNotFound(StatusId),
}

impl BattleErrorKind for StatusError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Internal
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::EmptyStatusList => "STATUS_LIST_EMPTY",
            Self::StatusNotFound(_) => "STATUS_NOT_FOUND",
        }
    }
}

/// An active status on a unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StatusSlot {
    /// Unique per holder; distinguishes re-applications of the same status.
    pub serial: u64,
    pub status: StatusId,
    pub kind: StatusType,
    /// Turns left; the status expires when this reaches 0 at turn end.
    pub remaining: u32,
    /// The unit whose effect applied this status.
    pub applied_by: BattleUnitId,
}

/// Battle-scoped state of one unit.
#[derive(Clone, Debug)]
pub struct BattleUnit {
    id: BattleUnitId,
    unit: Unit,
    stats: StatBlock,
    hp: i32,
    statuses: Vec<StatusSlot>,
    triggered: TriggeredEffects,
    clear_suppression_armed: bool,
    multipliers: StatMultipliers,
    next_serial: u64,
}

impl BattleUnit {
    pub fn new(id: BattleUnitId, unit: Unit) -> Self {
        let stats = unit.stats();
        let mut battle_unit = Self {
            id,
            unit,
            stats,
            hp: 0,
            statuses: Vec::new(),
            triggered: TriggeredEffects::empty(),
            clear_suppression_armed: false,
            multipliers: StatMultipliers::new(),
            next_serial: 0,
        };
        battle_unit.reset();
        battle_unit
    }

    pub fn id(&self) -> BattleUnitId {
        self.id
    }

    pub fn unit(&self) -> &Unit {
        &self.unit
    }

    pub(crate) fn unit_mut(&mut self) -> &mut Unit {
        &mut self.unit
    }

    pub fn into_unit(self) -> Unit {
        self.unit
    }

    pub fn name(&self) -> &str {
        self.unit.name()
    }

    // ===== health =====

    pub fn hp(&self) -> i32 {
        self.hp
    }

    pub fn max_hp(&self) -> i32 {
        self.stats.health.max(1)
    }

    pub fn is_defeated(&self) -> bool {
        self.hp <= 0
    }

    pub fn is_alive(&self) -> bool {
        !self.is_defeated()
    }

    /// Subtracts `amount` from HP (floored at 0).
    ///
    /// Returns true when the unit is now at or below zero. Handling the
    /// defeat is up to the caller.
    pub fn take_damage(&mut self, amount: i32) -> bool {
        self.hp = self.hp.saturating_sub(amount.max(0)).max(0);
        self.is_defeated()
    }

    /// Adds `amount` to HP, clamped to max HP. Returns the HP actually restored.
    pub fn restore_health(&mut self, amount: i32) -> i32 {
        let before = self.hp;
        self.hp = self.hp.saturating_add(amount.max(0)).min(self.max_hp());
        self.hp - before
    }

    // ===== stats =====

    /// Level-derived stat before battle multipliers.
    pub fn base_stat(&self, stat: Stat) -> i32 {
        self.stats[stat]
    }

    /// Stat after battle multipliers.
    pub fn stat(&self, stat: Stat) -> i32 {
        self.multipliers.scale(stat, self.stats[stat])
    }

    /// Effective Agility; drives turn order.
    pub fn speed(&self) -> i32 {
        self.stat(Stat::Agility)
    }

    pub fn multiplier(&self, stat: Stat) -> f64 {
        self.multipliers.get(stat)
    }

    pub fn multipliers(&self) -> &StatMultipliers {
        &self.multipliers
    }

    /// Compounds a percentage modifier into `stat`.
    ///
    /// Returns the new multiplier, or `None` for Health, which does not take
    /// multipliers.
    pub fn apply_stat_modifier(&mut self, stat: Stat, percent: i32) -> Option<f64> {
        self.multipliers.apply(stat, percent)
    }

    // ===== statuses =====

    pub fn statuses(&self) -> &[StatusSlot] {
        &self.statuses
    }

    pub fn has_status(&self, status: StatusId) -> bool {
        self.statuses.iter().any(|slot| slot.status == status)
    }

    pub fn status_slot(&self, serial: u64) -> Option<&StatusSlot> {
        self.statuses.iter().find(|slot| slot.serial == serial)
    }

    /// Whether a new status would be accepted.
    pub fn accepts_statuses(&self) -> bool {
        !self.triggered.contains(TriggeredEffects::DEBUFF_IMMUNITY)
    }

    /// Appends a status slot unless the unit is immune.
    ///
    /// Running the on-apply chain is the caller's job; see
    /// [`crate::action::execute::gain_status`].
    pub(crate) fn push_status(
        &mut self,
        status: &Status,
        duration: u32,
        applied_by: BattleUnitId,
    ) -> Option<StatusSlot> {
        if !self.accepts_statuses() {
            return None;
        }
        let slot = StatusSlot {
            serial: self.next_serial,
            status: status.id,
            kind: status.kind,
            remaining: duration,
            applied_by,
        };
        self.next_serial += 1;
        self.statuses.push(slot);
        Some(slot)
    }

    /// Removes the most recently added slot when `status` is `None`, otherwise
    /// every slot holding `status`.
    ///
    /// Returns the removed slots in the order they were added.
    pub fn remove_status_slot(
        &mut self,
        status: Option<StatusId>,
    ) -> Result<Vec<StatusSlot>, StatusError> {
        if self.statuses.is_empty() {
            return Err(StatusError::EmptyStatusList);
        }

        match status {
            None => Ok(self.statuses.pop().into_iter().collect()),
            Some(id) => {
                let (removed, kept): (Vec<_>, Vec<_>) =
                    self.statuses.iter().copied().partition(|slot| slot.status == id);
                if removed.is_empty() {
                    return Err(StatusError::StatusNotFound(id));
                }
                self.statuses = kept;
                Ok(removed)
            }
        }
    }

    pub(crate) fn remove_status_serial(&mut self, serial: u64) -> Option<StatusSlot> {
        let index = self.statuses.iter().position(|slot| slot.serial == serial)?;
        Some(self.statuses.remove(index))
    }

    /// Adds `delta` to the timers of every slot (or only slots holding
    /// `status`). Timers never go below zero. Returns the number of slots
    /// touched.
    pub fn change_status_timers(&mut self, status: Option<StatusId>, delta: i32) -> usize {
        let mut touched = 0;
        for slot in &mut self.statuses {
            if status.is_some_and(|id| id != slot.status) {
                continue;
            }
            slot.remaining = slot.remaining.saturating_add_signed(delta);
            touched += 1;
        }
        touched
    }

    /// Counts every timer down by one turn and removes the slots that reach
    /// zero, returning them.
    pub(crate) fn tick_status_timers(&mut self) -> Vec<StatusSlot> {
        for slot in &mut self.statuses {
            slot.remaining = slot.remaining.saturating_sub(1);
        }
        let (expired, active): (Vec<_>, Vec<_>) =
            self.statuses.iter().copied().partition(|slot| slot.remaining == 0);
        self.statuses = active;
        expired
    }

    // ===== triggered effects =====

    pub fn triggered(&self) -> TriggeredEffects {
        self.triggered
    }

    pub fn has_triggered(&self, flags: TriggeredEffects) -> bool {
        self.triggered.contains(flags)
    }

    /// Sets `flags`. Enabling `FAIL_STATUS_CLEAR_EFFECTS` (re-)arms the
    /// one-shot clear suppression.
    pub fn enable_triggered(&mut self, flags: TriggeredEffects) {
        self.triggered.insert(flags);
        if flags.contains(TriggeredEffects::FAIL_STATUS_CLEAR_EFFECTS) {
            self.clear_suppression_armed = true;
        }
    }

    pub fn disable_triggered(&mut self, flags: TriggeredEffects) {
        self.triggered.remove(flags);
        if flags.contains(TriggeredEffects::FAIL_STATUS_CLEAR_EFFECTS) {
            self.clear_suppression_armed = false;
        }
    }

    pub fn toggle_triggered(&mut self, flags: TriggeredEffects) {
        self.triggered.toggle(flags);
        if flags.contains(TriggeredEffects::FAIL_STATUS_CLEAR_EFFECTS) {
            self.clear_suppression_armed = self
                .triggered
                .contains(TriggeredEffects::FAIL_STATUS_CLEAR_EFFECTS);
        }
    }

    /// Whether the next status clear will skip its on-clear chain.
    pub fn clear_suppression_armed(&self) -> bool {
        self.clear_suppression_armed
            && self
                .triggered
                .contains(TriggeredEffects::FAIL_STATUS_CLEAR_EFFECTS)
    }

    /// Consumes the clear suppression. The flag itself stays set until it is
    /// explicitly disabled.
    pub(crate) fn consume_clear_suppression(&mut self) -> bool {
        let armed = self.clear_suppression_armed();
        self.clear_suppression_armed = false;
        armed
    }

    // ===== cooldowns =====

    pub fn cooldown(&self, slot: usize) -> Option<u32> {
        self.unit.skills().get(slot).map(|s| s.cooldown)
    }

    pub(crate) fn tick_cooldowns(&mut self) {
        self.unit.tick_cooldowns();
    }

    /// Restores the unit to its battle-start state.
    ///
    /// Statuses are dropped without running their on-clear chains.
    pub fn reset(&mut self) {
        self.multipliers.reset();
        self.unit.reset_cooldowns();
        self.statuses.clear();
        self.triggered = TriggeredEffects::empty();
        self.clear_suppression_armed = false;
        self.hp = self.max_hp();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::catalog::{DefinitionId, SkillId, UnitDefinition};
    use crate::config::BattleConfig;

    fn battle_unit() -> BattleUnit {
        let definition = Arc::new(
            UnitDefinition::new(DefinitionId(1), "Squire", StatBlock::new(100, 10, 10, 20))
                .with_skill_unlock(1, SkillId(1)),
        );
        BattleUnit::new(
            BattleUnitId::new(0, 0),
            Unit::new(definition, &BattleConfig::default()),
        )
    }

    fn status(id: u32) -> Status {
        Status::new(StatusId(id), "Status", 3, StatusType::Debuff)
    }

    #[test]
    fn ids_compare_componentwise() {
        assert_eq!(BattleUnitId::new(1, 2), BattleUnitId::new(1, 2));
        assert_ne!(BattleUnitId::new(1, 2), BattleUnitId::new(2, 1));
        assert_eq!(BattleUnitId::new(1, 2).index(3), 5);
    }

    #[test]
    fn starts_at_full_health() {
        let unit = battle_unit();
        assert_eq!(unit.hp(), 100);
        assert_eq!(unit.max_hp(), 100);
        assert!(unit.is_alive());
    }

    #[test]
    fn take_damage_reports_defeat_and_floors_at_zero() {
        let mut unit = battle_unit();

        assert!(!unit.take_damage(40));
        assert_eq!(unit.hp(), 60);

        assert!(unit.take_damage(100));
        assert_eq!(unit.hp(), 0);
        assert!(unit.is_defeated());
    }

    #[test]
    fn restore_health_clamps_to_max() {
        let mut unit = battle_unit();
        unit.take_damage(30);

        assert_eq!(unit.restore_health(50), 30);
        assert_eq!(unit.hp(), 100);
    }

    #[test]
    fn stat_modifier_changes_effective_stat() {
        let mut unit = battle_unit();
        unit.apply_stat_modifier(Stat::Agility, 50);

        assert_eq!(unit.base_stat(Stat::Agility), 20);
        assert_eq!(unit.speed(), 30);
        assert_eq!(unit.apply_stat_modifier(Stat::Health, 50), None);
        assert_eq!(unit.max_hp(), 100);
    }

    #[test]
    fn immune_unit_rejects_status() {
        let mut unit = battle_unit();
        unit.enable_triggered(TriggeredEffects::DEBUFF_IMMUNITY);

        assert!(unit.push_status(&status(1), 3, unit.id()).is_none());
        assert!(unit.statuses().is_empty());
    }

    #[test]
    fn remove_without_status_pops_most_recent() {
        let mut unit = battle_unit();
        let id = unit.id();
        unit.push_status(&status(1), 3, id);
        unit.push_status(&status(2), 3, id);

        let removed = unit.remove_status_slot(None).unwrap();

        assert_eq!(removed.len(), 1);
        assert_eq!(removed[0].status, StatusId(2));
        assert!(unit.has_status(StatusId(1)));
    }

    #[test]
    fn remove_by_status_removes_every_match() {
        let mut unit = battle_unit();
        let id = unit.id();
        unit.push_status(&status(1), 3, id);
        unit.push_status(&status(2), 3, id);
        unit.push_status(&status(1), 5, id);

        let removed = unit.remove_status_slot(Some(StatusId(1))).unwrap();

        assert_eq!(removed.len(), 2);
        assert_eq!(unit.statuses().len(), 1);
        assert_eq!(unit.statuses()[0].status, StatusId(2));
    }

    #[test]
    fn remove_reports_empty_and_missing() {
        let mut unit = battle_unit();
        assert_eq!(
            unit.remove_status_slot(None),
            Err(StatusError::EmptyStatusList)
        );

        let id = unit.id();
        unit.push_status(&status(1), 3, id);
        assert_eq!(
            unit.remove_status_slot(Some(StatusId(7))),
            Err(StatusError::StatusNotFound(StatusId(7)))
        );
        assert_eq!(unit.statuses().len(), 1);
    }

    #[test]
    fn timers_tick_and_expire() {
        let mut unit = battle_unit();
        let id = unit.id();
        unit.push_status(&status(1), 1, id);
        unit.push_status(&status(2), 2, id);

        let expired = unit.tick_status_timers();
        assert_eq!(expired.len(), 1);
        assert_eq!(expired[0].status, StatusId(1));

        assert_eq!(unit.change_status_timers(Some(StatusId(2)), 2), 1);
        assert_eq!(unit.statuses()[0].remaining, 3);
        assert_eq!(unit.change_status_timers(None, -10), 1);
        assert_eq!(unit.statuses()[0].remaining, 0);
    }

    #[test]
    fn clear_suppression_is_one_shot_until_reenabled() {
        let mut unit = battle_unit();
        unit.enable_triggered(TriggeredEffects::FAIL_STATUS_CLEAR_EFFECTS);

        assert!(unit.consume_clear_suppression());
        // Flag stays set, but the suppression is spent.
        assert!(unit.has_triggered(TriggeredEffects::FAIL_STATUS_CLEAR_EFFECTS));
        assert!(!unit.consume_clear_suppression());

        unit.enable_triggered(TriggeredEffects::FAIL_STATUS_CLEAR_EFFECTS);
        assert!(unit.clear_suppression_armed());

        unit.disable_triggered(TriggeredEffects::FAIL_STATUS_CLEAR_EFFECTS);
        assert!(!unit.clear_suppression_armed());
    }

    #[test]
    fn toggle_flips_flags() {
        let mut unit = battle_unit();
        unit.toggle_triggered(TriggeredEffects::STUN | TriggeredEffects::LIFESTEAL);
        assert!(unit.has_triggered(TriggeredEffects::STUN));

        unit.toggle_triggered(TriggeredEffects::STUN);
        assert!(!unit.has_triggered(TriggeredEffects::STUN));
        assert!(unit.has_triggered(TriggeredEffects::LIFESTEAL));
    }

    #[test]
    fn reset_restores_battle_start_state() {
        let mut unit = battle_unit();
        let id = unit.id();
        unit.take_damage(70);
        unit.apply_stat_modifier(Stat::Strength, 40);
        unit.apply_stat_modifier(Stat::Agility, -40);
        unit.push_status(&status(1), 3, id);
        unit.enable_triggered(TriggeredEffects::STUN | TriggeredEffects::LIFESTEAL);
        unit.unit_mut().set_cooldown(0, 4);

        unit.reset();

        assert_eq!(unit.hp(), unit.max_hp());
        assert!(unit.multipliers().is_identity());
        assert!(unit.statuses().is_empty());
        assert!(unit.triggered().is_empty());
        assert!(unit.unit().skills().iter().all(|slot| slot.cooldown == 0));
    }
}
