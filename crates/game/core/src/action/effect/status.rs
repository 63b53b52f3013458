//! Status effect implementations.

use crate::action::error::EffectError;
use crate::action::execute::{EffectContext, clear_status, gain_status};
use crate::catalog::StatusId;
use crate::events::{BattleEvent, UnitRef};

use super::{AppliedValue, EffectScope};

/// Apply a status to the target, recorded as applied by the user.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ApplyStatusEffect {
    pub status: StatusId,
}

impl ApplyStatusEffect {
    pub fn apply(
        &self,
        value: i32,
        scope: EffectScope,
        ctx: &mut EffectContext<'_>,
    ) -> Result<AppliedValue, EffectError> {
        let duration = u32::try_from(value).ok().filter(|&turns| turns > 0);
        match gain_status(ctx, scope.target, self.status, duration, scope.user)? {
            Some(slot) => Ok(AppliedValue::StatusApplied {
                serial: slot.serial,
            }),
            None => Ok(AppliedValue::StatusResisted),
        }
    }
}

/// Remove statuses from the target, running their on-clear chains.
///
/// Without a status id only the most recently applied slot is removed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RemoveStatusEffect {
    #[cfg_attr(feature = "serde", serde(default))]
    pub status: Option<StatusId>,
}

impl RemoveStatusEffect {
    pub fn apply(
        &self,
        scope: EffectScope,
        ctx: &mut EffectContext<'_>,
    ) -> Result<AppliedValue, EffectError> {
        let removed = ctx.unit_mut(scope.target)?.remove_status_slot(self.status)?;
        let count = removed.len();
        for slot in removed {
            clear_status(ctx, scope.target, slot);
        }
        Ok(AppliedValue::StatusesRemoved { count })
    }
}

/// Shift the remaining turns of the target's statuses.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusTimerChangeEffect {
    #[cfg_attr(feature = "serde", serde(default))]
    pub status: Option<StatusId>,
}

impl StatusTimerChangeEffect {
    pub fn apply(
        &self,
        value: i32,
        scope: EffectScope,
        ctx: &mut EffectContext<'_>,
    ) -> Result<AppliedValue, EffectError> {
        let target = ctx.unit_mut(scope.target)?;
        let slots = target.change_status_timers(self.status, value);
        let target_ref = UnitRef::from(&*target);
        if slots > 0 {
            ctx.emit(BattleEvent::StatusTimersChanged {
                target: target_ref,
                delta: value,
            });
        }
        Ok(AppliedValue::TimersChanged { slots })
    }
}
