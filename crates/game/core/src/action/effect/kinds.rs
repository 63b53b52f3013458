//! Effect kind enum and dispatcher.

use crate::action::error::EffectError;
use crate::action::execute::EffectContext;
use crate::state::TriggeredEffects;

use super::damage::{DamageEffect, HealEffect};
use super::modifier::{SkillCooldownChangeEffect, StatModifierEffect};
use super::status::{ApplyStatusEffect, RemoveStatusEffect, StatusTimerChangeEffect};
use super::triggered::{self, TriggerOp};
use super::{AppliedValue, EffectScope};

/// The operation an [`Effect`](super::Effect) performs.
///
/// Each variant delegates to its corresponding struct implementation.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EffectKind {
    // ========================================================================
    // Health
    // ========================================================================
    Damage(DamageEffect),
    Heal(HealEffect),

    // ========================================================================
    // Statuses
    // ========================================================================
    ApplyStatus(ApplyStatusEffect),
    RemoveStatus(RemoveStatusEffect),
    StatusTimerChange(StatusTimerChangeEffect),

    // ========================================================================
    // Stats and skills
    // ========================================================================
    StatModifier(StatModifierEffect),
    SkillCooldownChange(SkillCooldownChangeEffect),

    // ========================================================================
    // Triggered effects
    // ========================================================================
    EnableTriggered(TriggeredEffects),
    DisableTriggered(TriggeredEffects),
    ToggleTriggered(TriggeredEffects),
}

impl EffectKind {
    /// Apply: execute the effect and return what it did.
    pub fn apply(
        &self,
        value: i32,
        scope: EffectScope,
        ctx: &mut EffectContext<'_>,
    ) -> Result<AppliedValue, EffectError> {
        match self {
            Self::Damage(e) => e.apply(value, scope, ctx),
            Self::Heal(e) => e.apply(value, scope, ctx),
            Self::ApplyStatus(e) => e.apply(value, scope, ctx),
            Self::RemoveStatus(e) => e.apply(scope, ctx),
            Self::StatusTimerChange(e) => e.apply(value, scope, ctx),
            Self::StatModifier(e) => e.apply(value, scope, ctx),
            Self::SkillCooldownChange(e) => e.apply(value, scope, ctx),
            Self::EnableTriggered(flags) => triggered::apply(TriggerOp::Enable, *flags, scope, ctx),
            Self::DisableTriggered(flags) => {
                triggered::apply(TriggerOp::Disable, *flags, scope, ctx)
            }
            Self::ToggleTriggered(flags) => triggered::apply(TriggerOp::Toggle, *flags, scope, ctx),
        }
    }

    /// Short name for logs.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Damage(_) => "damage",
            Self::Heal(_) => "heal",
            Self::ApplyStatus(_) => "apply_status",
            Self::RemoveStatus(_) => "remove_status",
            Self::StatusTimerChange(_) => "status_timer_change",
            Self::StatModifier(_) => "stat_modifier",
            Self::SkillCooldownChange(_) => "skill_cooldown_change",
            Self::EnableTriggered(_) => "enable_triggered",
            Self::DisableTriggered(_) => "disable_triggered",
            Self::ToggleTriggered(_) => "toggle_triggered",
        }
    }
}
