//! Stat multiplier and cooldown effects.

use crate::action::error::EffectError;
use crate::action::execute::EffectContext;
use crate::events::{BattleEvent, UnitRef};
use crate::stats::Stat;

use super::{AppliedValue, EffectScope};

/// Compound a percentage into one of the target's stat multipliers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatModifierEffect {
    pub stat: Stat,
}

impl StatModifierEffect {
    pub fn apply(
        &self,
        value: i32,
        scope: EffectScope,
        ctx: &mut EffectContext<'_>,
    ) -> Result<AppliedValue, EffectError> {
        let target = ctx.unit_mut(scope.target)?;
        let multiplier = target
            .apply_stat_modifier(self.stat, value)
            .ok_or(EffectError::StatNotModifiable(self.stat))?;
        let target_ref = UnitRef::from(&*target);

        let stat = ctx.config.stat_name(self.stat).to_string();
        ctx.emit(BattleEvent::StatModified {
            target: target_ref,
            stat,
            percent: value,
            multiplier,
        });

        Ok(AppliedValue::Multiplier {
            stat: self.stat,
            value: multiplier,
        })
    }
}

/// Shift the target's skill cooldowns: one slot, or every occupied slot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SkillCooldownChangeEffect {
    #[cfg_attr(feature = "serde", serde(default))]
    pub slot: Option<usize>,
}

impl SkillCooldownChangeEffect {
    pub fn apply(
        &self,
        value: i32,
        scope: EffectScope,
        ctx: &mut EffectContext<'_>,
    ) -> Result<AppliedValue, EffectError> {
        let target = ctx.unit_mut(scope.target)?;
        let slots = target.unit().skills().len();
        if let Some(index) = self.slot.filter(|&index| index >= slots) {
            return Err(EffectError::SkillSlotOutOfRange { index, slots });
        }

        let slots = target.unit_mut().change_cooldown(self.slot, value);
        let target_ref = UnitRef::from(&*target);
        if slots > 0 {
            ctx.emit(BattleEvent::CooldownsChanged {
                target: target_ref,
                delta: value,
            });
        }
        Ok(AppliedValue::CooldownsChanged { slots })
    }
}
