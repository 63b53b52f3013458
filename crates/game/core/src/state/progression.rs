//! Persistent unit progression: experience, levels and skill loadout.
//!
//! A [`Unit`] survives across battles. Battle-scoped state (HP, statuses,
//! multipliers) lives on [`BattleUnit`](super::BattleUnit) instead.

use std::sync::Arc;

use crate::catalog::{SkillId, UnitDefinition};
use crate::config::BattleConfig;
use crate::error::{BattleErrorKind, ErrorSeverity};
use crate::stats::StatBlock;

/// Errors raised by loadout mutations.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ProgressionError {
    #[error("skill slot {index} out of range (unit has {slots} slots)")]
    SkillSlotOutOfRange { index: usize, slots: usize },

    #[error("no empty skill slot and no slot to overwrite")]
    NoEmptySkillSlot,

    #[error("skill slot {index} is empty")]
    EmptySkillSlot { index: usize },
}

impl BattleErrorKind for ProgressionError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::SkillSlotOutOfRange { .. } | Self::NoEmptySkillSlot => ErrorSeverity::Validation,
            Self::EmptySkillSlot { .. } => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::SkillSlotOutOfRange { .. } => "SKILL_SLOT_OUT_OF_RANGE",
            Self::NoEmptySkillSlot => "NO_EMPTY_SKILL_SLOT",
            Self::EmptySkillSlot { .. } => "EMPTY_SKILL_SLOT",
        }
    }
}

/// A skill reference plus its remaining cooldown in turns.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SkillSlot {
    pub skill: Option<SkillId>,
    pub cooldown: u32,
}

impl SkillSlot {
    pub const EMPTY: Self = Self {
        skill: None,
        cooldown: 0,
    };

    pub fn new(skill: SkillId) -> Self {
        Self {
            skill: Some(skill),
            cooldown: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.skill.is_none()
    }

    /// True when the slot holds a skill that is off cooldown.
    pub fn is_ready(&self) -> bool {
        self.skill.is_some() && self.cooldown == 0
    }
}

/// Outcome of an experience gain.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LevelProgress {
    pub levels_gained: u32,
    /// Skills whose unlock level was crossed, in unlock order.
    pub unlocked: Vec<SkillId>,
}

/// A persistent combatant owned by a character.
#[derive(Clone, Debug)]
pub struct Unit {
    definition: Arc<UnitDefinition>,
    nickname: Option<String>,
    total_exp: u64,
    level: u32,
    exp_to_next_level: u64,
    max_level: u32,
    skills: Vec<SkillSlot>,
}

impl Unit {
    /// Creates a level 1 unit and learns every skill unlocked at level 1.
    pub fn new(definition: Arc<UnitDefinition>, config: &BattleConfig) -> Self {
        let max_level = config.max_unit_level.max(1);
        let mut unit = Self {
            definition,
            nickname: None,
            total_exp: 0,
            level: 1,
            exp_to_next_level: 0,
            max_level,
            skills: vec![SkillSlot::EMPTY; config.max_skills_per_unit],
        };
        unit.exp_to_next_level = unit.threshold(1);
        unit.learn_unlocked_skills();
        unit
    }

    pub fn with_nickname(mut self, nickname: impl Into<String>) -> Self {
        self.nickname = Some(nickname.into());
        self
    }

    pub fn definition(&self) -> &Arc<UnitDefinition> {
        &self.definition
    }

    /// Nickname if set, otherwise the definition name.
    pub fn name(&self) -> &str {
        self.nickname.as_deref().unwrap_or(&self.definition.name)
    }

    pub fn nickname(&self) -> Option<&str> {
        self.nickname.as_deref()
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn max_level(&self) -> u32 {
        self.max_level
    }

    pub fn total_exp(&self) -> u64 {
        self.total_exp
    }

    /// Experience still needed for the next level; 0 at the cap.
    pub fn exp_to_next_level(&self) -> u64 {
        self.exp_to_next_level
    }

    /// Stats at the current level.
    pub fn stats(&self) -> StatBlock {
        self.definition.stats_at(self.level)
    }

    pub fn skills(&self) -> &[SkillSlot] {
        &self.skills
    }

    pub fn skill_slot(&self, index: usize) -> Result<&SkillSlot, ProgressionError> {
        self.skills
            .get(index)
            .ok_or(ProgressionError::SkillSlotOutOfRange {
                index,
                slots: self.skills.len(),
            })
    }

    pub fn knows(&self, skill: SkillId) -> bool {
        self.skills.iter().any(|slot| slot.skill == Some(skill))
    }

    fn threshold(&self, level: u32) -> u64 {
        if level >= self.max_level {
            0
        } else {
            self.definition.curve.exp_to_next(level)
        }
    }

    // ===== experience =====

    /// Accumulates experience, rolling over as many levels as `amount` covers.
    ///
    /// Past the level cap experience stops accumulating; the excess is dropped.
    pub fn gain_exp(&mut self, amount: u64) -> LevelProgress {
        let mut progress = LevelProgress::default();
        let mut remaining = amount;

        while remaining > 0 && self.level < self.max_level {
            if remaining < self.exp_to_next_level {
                self.exp_to_next_level -= remaining;
                self.total_exp += remaining;
                break;
            }

            remaining -= self.exp_to_next_level;
            self.total_exp += self.exp_to_next_level;
            self.level += 1;
            self.exp_to_next_level = self.threshold(self.level);

            progress.levels_gained += 1;
            progress
                .unlocked
                .extend(self.definition.skills_at(self.level));
        }

        if progress.levels_gained > 0 {
            tracing::debug!(
                unit = self.name(),
                level = self.level,
                gained = progress.levels_gained,
                "unit leveled up"
            );
        }
        progress
    }

    /// Jumps to `level` (clamped to `[1, max_level]`) and recomputes total
    /// experience as the sum of the thresholds below it.
    pub fn set_level(&mut self, level: u32) {
        let level = level.clamp(1, self.max_level);
        self.level = level;
        self.total_exp = self.definition.curve.total_exp_for(level);
        self.exp_to_next_level = self.threshold(level);
    }

    /// Resets to level 1 and replays [`Self::gain_exp`] with `total`.
    pub fn set_total_exp(&mut self, total: u64) {
        self.level = 1;
        self.total_exp = 0;
        self.exp_to_next_level = self.threshold(1);
        self.gain_exp(total);
    }

    // ===== loadout =====

    /// Learns `skill` into the first empty slot, or overwrites `replace` when
    /// every slot is taken. Returns the slot index used.
    pub fn learn_skill(
        &mut self,
        skill: SkillId,
        replace: Option<usize>,
    ) -> Result<usize, ProgressionError> {
        if let Some(index) = replace {
            self.skill_slot(index)?;
        }

        let index = self
            .skills
            .iter()
            .position(SkillSlot::is_empty)
            .or(replace)
            .ok_or(ProgressionError::NoEmptySkillSlot)?;

        self.skills[index] = SkillSlot::new(skill);
        Ok(index)
    }

    /// Learns every skill unlocked at or below the current level that the
    /// unit does not know yet, as long as empty slots remain.
    pub fn learn_unlocked_skills(&mut self) -> Vec<SkillId> {
        let pending: Vec<SkillId> = self
            .definition
            .skills_up_to(self.level)
            .filter(|skill| !self.knows(*skill))
            .collect();

        let mut learned = Vec::new();
        for skill in pending {
            if self.knows(skill) {
                continue;
            }
            match self.learn_skill(skill, None) {
                Ok(_) => learned.push(skill),
                Err(_) => {
                    tracing::debug!(unit = self.name(), %skill, "no free slot for unlocked skill");
                    break;
                }
            }
        }
        learned
    }

    /// Empties a skill slot, returning the skill it held.
    pub fn forget_skill(&mut self, index: usize) -> Result<SkillId, ProgressionError> {
        self.skill_slot(index)?;
        let slot = &mut self.skills[index];
        let skill = slot.skill.ok_or(ProgressionError::EmptySkillSlot { index })?;
        *slot = SkillSlot::EMPTY;
        Ok(skill)
    }

    // ===== cooldowns =====

    pub(crate) fn set_cooldown(&mut self, index: usize, turns: u32) {
        if let Some(slot) = self.skills.get_mut(index) {
            slot.cooldown = turns;
        }
    }

    /// Adds `delta` to the cooldown of one slot, or every occupied slot when
    /// `index` is `None`. Cooldowns never go below zero. Returns the number of
    /// slots touched.
    pub(crate) fn change_cooldown(&mut self, index: Option<usize>, delta: i32) -> usize {
        let mut touched = 0;
        for (i, slot) in self.skills.iter_mut().enumerate() {
            if slot.is_empty() || index.is_some_and(|wanted| wanted != i) {
                continue;
            }
            slot.cooldown = slot.cooldown.saturating_add_signed(delta);
            touched += 1;
        }
        touched
    }

    pub(crate) fn tick_cooldowns(&mut self) {
        for slot in &mut self.skills {
            slot.cooldown = slot.cooldown.saturating_sub(1);
        }
    }

    pub(crate) fn reset_cooldowns(&mut self) {
        for slot in &mut self.skills {
            slot.cooldown = 0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{DefinitionId, LevelCurve};

    fn definition() -> Arc<UnitDefinition> {
        Arc::new(
            UnitDefinition::new(DefinitionId(1), "Knight", StatBlock::new(100, 10, 10, 10))
                .with_growth(StatBlock::new(10, 1, 1, 1))
                .with_skill_unlock(1, SkillId(1))
                .with_skill_unlock(3, SkillId(2))
                .with_skill_unlock(5, SkillId(3)),
        )
    }

    fn config() -> BattleConfig {
        BattleConfig::default().with_max_unit_level(10)
    }

    fn unit() -> Unit {
        Unit::new(definition(), &config())
    }

    #[test]
    fn new_unit_starts_at_level_one_with_unlocked_skills() {
        let unit = unit();

        assert_eq!(unit.level(), 1);
        assert_eq!(unit.total_exp(), 0);
        assert_eq!(unit.exp_to_next_level(), LevelCurve::default().exp_to_next(1));
        assert_eq!(unit.skills()[0].skill, Some(SkillId(1)));
        assert!(unit.skills()[1].is_empty());
        assert_eq!(unit.skills().len(), BattleConfig::DEFAULT_MAX_SKILLS_PER_UNIT);
    }

    #[test]
    fn gain_exp_rolls_over_multiple_levels() {
        let mut unit = unit();
        let curve = LevelCurve::default();
        let to_level_four = curve.total_exp_for(4);

        let progress = unit.gain_exp(to_level_four + 5);

        assert_eq!(progress.levels_gained, 3);
        assert_eq!(progress.unlocked, vec![SkillId(2)]);
        assert_eq!(unit.level(), 4);
        assert_eq!(unit.total_exp(), to_level_four + 5);
        assert_eq!(unit.exp_to_next_level(), curve.exp_to_next(4) - 5);
    }

    #[test]
    fn gain_exp_is_additive_below_the_cap() {
        for (a, b) in [(0, 0), (3, 8), (11, 24), (50, 137), (400, 1)] {
            let mut split = unit();
            split.gain_exp(a);
            split.gain_exp(b);

            let mut single = unit();
            single.gain_exp(a + b);

            assert_eq!(split.level(), single.level(), "a={a} b={b}");
            assert_eq!(split.total_exp(), single.total_exp(), "a={a} b={b}");
            assert_eq!(split.exp_to_next_level(), single.exp_to_next_level());
        }
    }

    #[test]
    fn experience_stops_at_the_cap() {
        let mut unit = unit();
        let cap_total = LevelCurve::default().total_exp_for(10);

        unit.gain_exp(cap_total + 1_000);

        assert_eq!(unit.level(), 10);
        assert_eq!(unit.total_exp(), cap_total);
        assert_eq!(unit.exp_to_next_level(), 0);

        let progress = unit.gain_exp(500);
        assert_eq!(progress.levels_gained, 0);
        assert_eq!(unit.total_exp(), cap_total);
    }

    #[test]
    fn set_level_round_trips_through_set_total_exp() {
        for level in 1..=10 {
            let mut unit = unit();
            unit.set_level(level);
            let total = unit.total_exp();

            let mut replayed = self::unit();
            replayed.set_total_exp(total);

            assert_eq!(replayed.level(), level);
            assert_eq!(replayed.total_exp(), total);
            assert_eq!(replayed.exp_to_next_level(), unit.exp_to_next_level());
        }
    }

    #[test]
    fn set_level_clamps_to_range() {
        let mut unit = unit();

        unit.set_level(99);
        assert_eq!(unit.level(), 10);
        assert_eq!(unit.exp_to_next_level(), 0);

        unit.set_level(0);
        assert_eq!(unit.level(), 1);
        assert_eq!(unit.total_exp(), 0);
    }

    #[test]
    fn stats_follow_level() {
        let mut unit = unit();
        unit.set_level(3);
        assert_eq!(unit.stats(), StatBlock::new(120, 12, 12, 12));
    }

    #[test]
    fn learn_skill_fills_first_empty_slot() {
        let mut unit = unit();

        assert_eq!(unit.learn_skill(SkillId(7), Some(0)), Ok(1));
        assert_eq!(unit.skills()[0].skill, Some(SkillId(1)));
        assert_eq!(unit.skills()[1].skill, Some(SkillId(7)));
    }

    #[test]
    fn learn_skill_overwrites_index_when_full() {
        let mut unit = unit();
        for id in 10..13 {
            unit.learn_skill(SkillId(id), None).unwrap();
        }

        assert_eq!(
            unit.learn_skill(SkillId(20), None),
            Err(ProgressionError::NoEmptySkillSlot)
        );
        assert_eq!(unit.learn_skill(SkillId(20), Some(2)), Ok(2));
        assert_eq!(unit.skills()[2].skill, Some(SkillId(20)));
    }

    #[test]
    fn learn_skill_rejects_out_of_range_index_before_mutation() {
        let mut unit = unit();
        let before = unit.skills().to_vec();

        let err = unit.learn_skill(SkillId(9), Some(4)).unwrap_err();

        assert_eq!(err, ProgressionError::SkillSlotOutOfRange { index: 4, slots: 4 });
        assert_eq!(unit.skills(), before.as_slice());
    }

    #[test]
    fn learn_unlocked_skills_after_leveling() {
        let mut unit = unit();
        unit.set_level(5);

        let learned = unit.learn_unlocked_skills();

        assert_eq!(learned, vec![SkillId(2), SkillId(3)]);
        assert!(unit.knows(SkillId(1)));
        assert!(unit.learn_unlocked_skills().is_empty());
    }

    #[test]
    fn forget_skill_reports_empty_slot() {
        let mut unit = unit();

        assert_eq!(unit.forget_skill(0), Ok(SkillId(1)));
        assert_eq!(
            unit.forget_skill(0),
            Err(ProgressionError::EmptySkillSlot { index: 0 })
        );
        assert!(matches!(
            unit.forget_skill(9),
            Err(ProgressionError::SkillSlotOutOfRange { .. })
        ));
    }

    #[test]
    fn cooldown_changes_never_underflow() {
        let mut unit = unit();
        unit.set_cooldown(0, 2);

        assert_eq!(unit.change_cooldown(None, -5), 1);
        assert_eq!(unit.skills()[0].cooldown, 0);

        unit.change_cooldown(Some(0), 3);
        unit.tick_cooldowns();
        assert_eq!(unit.skills()[0].cooldown, 2);

        unit.reset_cooldowns();
        assert!(unit.skills()[0].is_ready());
    }
}
