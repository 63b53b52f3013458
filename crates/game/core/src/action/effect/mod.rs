//! Effects: the atomic building blocks of skills and statuses.
//!
//! A skill is an ordered list of [`Effect`]s applied to each resolved target;
//! a status carries four such lists fired at different points of its life.
//! Every effect is a `{ kind, value }` pair where the meaning of `value`
//! depends on the kind:
//!
//! | Kind                  | `value`                                       |
//! |-----------------------|-----------------------------------------------|
//! | `Damage` / `Heal`     | amount, interpreted through [`Scaling`]       |
//! | `ApplyStatus`         | duration in turns (`<= 0`: status default)    |
//! | `RemoveStatus`        | unused                                        |
//! | `StatModifier`        | percent (`+` buff, `-` debuff)                |
//! | `SkillCooldownChange` | turns added to cooldowns                      |
//! | `StatusTimerChange`   | turns added to status timers                  |
//! | `*Triggered`          | unused                                        |
//!
//! # Architecture
//!
//! Like the rest of the action layer this uses an **Enum + Struct hybrid**:
//! each effect is a struct in its own file with an `apply` method, and
//! [`EffectKind`] wraps them for serialization and static dispatch.

mod damage;
mod kinds;
mod modifier;
mod status;
mod triggered;

pub use damage::{DamageEffect, HealEffect};
pub use kinds::EffectKind;
pub use modifier::{SkillCooldownChangeEffect, StatModifierEffect};
pub use status::{ApplyStatusEffect, RemoveStatusEffect, StatusTimerChangeEffect};
pub use triggered::TriggerOp;

use crate::catalog::StatusId;
use crate::state::{BattleUnitId, TriggeredEffects};
use crate::stats::Stat;

use super::error::EffectError;
use super::execute::EffectContext;

/// How the `value` of a damage or heal effect becomes an amount.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Scaling {
    /// `value` as is.
    #[default]
    Flat,
    /// `value` percent of the target's max HP.
    PercentOfMaxHealth,
    /// `value` percent of the user's effective stat.
    Stat(Stat),
}

/// One catalog-declared effect.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Effect {
    pub kind: EffectKind,
    #[cfg_attr(feature = "serde", serde(default))]
    pub value: i32,
}

impl Effect {
    pub fn new(kind: EffectKind, value: i32) -> Self {
        Self { kind, value }
    }

    /// Flat damage.
    pub fn damage(amount: i32) -> Self {
        Self::new(EffectKind::Damage(DamageEffect::new(Scaling::Flat)), amount)
    }

    pub fn damage_scaled(scaling: Scaling, value: i32) -> Self {
        Self::new(EffectKind::Damage(DamageEffect::new(scaling)), value)
    }

    /// Flat heal.
    pub fn heal(amount: i32) -> Self {
        Self::new(EffectKind::Heal(HealEffect::new(Scaling::Flat)), amount)
    }

    pub fn heal_scaled(scaling: Scaling, value: i32) -> Self {
        Self::new(EffectKind::Heal(HealEffect::new(scaling)), value)
    }

    /// Applies `status`; a `duration` of zero or less uses the status default.
    pub fn apply_status(status: StatusId, duration: i32) -> Self {
        Self::new(
            EffectKind::ApplyStatus(ApplyStatusEffect { status }),
            duration,
        )
    }

    /// Removes every slot holding `status`, or the most recent slot.
    pub fn remove_status(status: Option<StatusId>) -> Self {
        Self::new(EffectKind::RemoveStatus(RemoveStatusEffect { status }), 0)
    }

    pub fn stat_modifier(stat: Stat, percent: i32) -> Self {
        Self::new(EffectKind::StatModifier(StatModifierEffect { stat }), percent)
    }

    pub fn cooldown_change(slot: Option<usize>, delta: i32) -> Self {
        Self::new(
            EffectKind::SkillCooldownChange(SkillCooldownChangeEffect { slot }),
            delta,
        )
    }

    pub fn status_timer_change(status: Option<StatusId>, delta: i32) -> Self {
        Self::new(
            EffectKind::StatusTimerChange(StatusTimerChangeEffect { status }),
            delta,
        )
    }

    pub fn enable(flags: TriggeredEffects) -> Self {
        Self::new(EffectKind::EnableTriggered(flags), 0)
    }

    pub fn disable(flags: TriggeredEffects) -> Self {
        Self::new(EffectKind::DisableTriggered(flags), 0)
    }

    pub fn toggle(flags: TriggeredEffects) -> Self {
        Self::new(EffectKind::ToggleTriggered(flags), 0)
    }

    /// The status this effect names, if any.
    pub fn referenced_status(&self) -> Option<StatusId> {
        match &self.kind {
            EffectKind::ApplyStatus(e) => Some(e.status),
            EffectKind::RemoveStatus(e) => e.status,
            EffectKind::StatusTimerChange(e) => e.status,
            _ => None,
        }
    }

    /// Applies the effect from `scope.user` to `scope.target`.
    pub fn apply(
        &self,
        scope: EffectScope,
        ctx: &mut EffectContext<'_>,
    ) -> Result<AppliedValue, EffectError> {
        self.kind.apply(self.value, scope, ctx)
    }
}

/// The user and target of a single effect application.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EffectScope {
    pub user: BattleUnitId,
    pub target: BattleUnitId,
}

impl EffectScope {
    pub fn new(user: BattleUnitId, target: BattleUnitId) -> Self {
        Self { user, target }
    }
}

/// What an effect actually did.
#[derive(Clone, Debug, PartialEq)]
pub enum AppliedValue {
    Damage {
        /// Amount before clamping at zero HP.
        planned: i32,
        /// HP actually removed.
        actual: i32,
        defeated: bool,
    },
    Healing {
        planned: i32,
        actual: i32,
    },
    StatusApplied {
        serial: u64,
    },
    StatusResisted,
    StatusesRemoved {
        count: usize,
    },
    Multiplier {
        stat: Stat,
        value: f64,
    },
    CooldownsChanged {
        slots: usize,
    },
    TimersChanged {
        slots: usize,
    },
    Triggered {
        now: TriggeredEffects,
    },
}
