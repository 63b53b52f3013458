//! Damage and heal effects.

use crate::action::error::EffectError;
use crate::action::execute::EffectContext;
use crate::events::{BattleEvent, UnitRef};
use crate::state::TriggeredEffects;

use super::{AppliedValue, EffectScope, Scaling};

/// Resolves `value` through `scaling` into an amount (never negative).
fn scaled_amount(
    scaling: Scaling,
    value: i32,
    scope: EffectScope,
    ctx: &EffectContext<'_>,
) -> Result<i32, EffectError> {
    let amount = match scaling {
        Scaling::Flat => i64::from(value),
        Scaling::PercentOfMaxHealth => {
            let target = ctx.unit(scope.target)?;
            i64::from(value) * i64::from(target.max_hp()) / 100
        }
        Scaling::Stat(stat) => {
            let user = ctx.unit(scope.user)?;
            i64::from(value) * i64::from(user.stat(stat)) / 100
        }
    };
    Ok(amount.clamp(0, i64::from(i32::MAX)) as i32)
}

/// Deal damage to the target.
///
/// A user with the lifesteal flag recovers `lifesteal_percent` of the HP
/// actually removed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DamageEffect {
    #[cfg_attr(feature = "serde", serde(default))]
    pub scaling: Scaling,
}

impl DamageEffect {
    pub fn new(scaling: Scaling) -> Self {
        Self { scaling }
    }

    pub fn apply(
        &self,
        value: i32,
        scope: EffectScope,
        ctx: &mut EffectContext<'_>,
    ) -> Result<AppliedValue, EffectError> {
        let planned = scaled_amount(self.scaling, value, scope, ctx)?;

        let target = ctx.unit_mut(scope.target)?;
        let before = target.hp();
        let defeated = target.take_damage(planned);
        let actual = before - target.hp();
        let remaining = target.hp();
        let target_ref = UnitRef::from(&*target);

        tracing::debug!(target = %scope.target, planned, actual, "damage applied");
        ctx.emit(BattleEvent::Damaged {
            target: target_ref.clone(),
            amount: actual,
            remaining,
        });
        if defeated && before > 0 {
            ctx.emit(BattleEvent::Defeated { unit: target_ref });
        }

        if actual > 0 {
            self.lifesteal(actual, scope, ctx);
        }

        Ok(AppliedValue::Damage {
            planned,
            actual,
            defeated,
        })
    }

    fn lifesteal(&self, dealt: i32, scope: EffectScope, ctx: &mut EffectContext<'_>) {
        let percent = i64::from(ctx.config.lifesteal_percent);
        let Ok(user) = ctx.unit_mut(scope.user) else {
            return;
        };
        if !user.has_triggered(TriggeredEffects::LIFESTEAL) || user.is_defeated() {
            return;
        }
        let amount = (i64::from(dealt) * percent / 100) as i32;
        let restored = user.restore_health(amount);
        if restored > 0 {
            let user_ref = UnitRef::from(&*user);
            ctx.emit(BattleEvent::Healed {
                target: user_ref,
                amount: restored,
            });
        }
    }
}

/// Restore HP to the target, clamped to max HP.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HealEffect {
    #[cfg_attr(feature = "serde", serde(default))]
    pub scaling: Scaling,
}

impl HealEffect {
    pub fn new(scaling: Scaling) -> Self {
        Self { scaling }
    }

    pub fn apply(
        &self,
        value: i32,
        scope: EffectScope,
        ctx: &mut EffectContext<'_>,
    ) -> Result<AppliedValue, EffectError> {
        let planned = scaled_amount(self.scaling, value, scope, ctx)?;

        let target = ctx.unit_mut(scope.target)?;
        let actual = target.restore_health(planned);
        let target_ref = UnitRef::from(&*target);

        tracing::debug!(target = %scope.target, planned, actual, "heal applied");
        ctx.emit(BattleEvent::Healed {
            target: target_ref,
            amount: actual,
        });

        Ok(AppliedValue::Healing { planned, actual })
    }
}
