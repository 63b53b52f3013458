//! Action execution pipeline.
//!
//! ```text
//! Action
//!   ├─ Skip / Defeated ─────────────────────────► narrate, done
//!   └─ Attack
//!        1. user still standing and not stunned?
//!        2. look up the skill in the slot
//!        3. start the slot's cooldown
//!        4. resolve targets (empty: fizzle)
//!        5. run the skill's effect chain against each target
//! ```

use crate::action::targeting::resolve_targets;
use crate::action::{Action, AttackAction};
use crate::catalog::SkillId;
use crate::error::BattleErrorKind;
use crate::events::{BattleEvent, SkipReason, UnitRef};
use crate::state::{BattleUnitId, TriggeredEffects};

use super::{EffectContext, run_chain};

/// What happened to one queued action.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ActionOutcome {
    /// The skill ran against these targets.
    Resolved {
        skill: SkillId,
        targets: Vec<BattleUnitId>,
    },
    /// The action did nothing.
    Skipped(SkipReason),
    /// The skill was used but no target was left.
    Fizzled { skill: SkillId },
}

/// Executes one queued action.
pub fn perform_action(ctx: &mut EffectContext<'_>, action: &Action) -> ActionOutcome {
    match action {
        Action::Skip { unit } => skip(ctx, *unit, SkipReason::Chose),
        Action::Defeated { unit } => skip(ctx, *unit, SkipReason::Defeated),
        Action::Attack(attack) => perform_attack(ctx, attack),
    }
}

fn skip(ctx: &mut EffectContext<'_>, unit: BattleUnitId, reason: SkipReason) -> ActionOutcome {
    if let Some(battle_unit) = ctx.roster.get(unit) {
        let unit = UnitRef::from(battle_unit);
        ctx.emit(BattleEvent::ActionSkipped { unit, reason });
    }
    ActionOutcome::Skipped(reason)
}

fn perform_attack(ctx: &mut EffectContext<'_>, attack: &AttackAction) -> ActionOutcome {
    let Some((user, index, anchor)) = attack.parts() else {
        tracing::warn!(stage = ?attack.stage(), "incomplete attack reached execution");
        return ActionOutcome::Skipped(SkipReason::Chose);
    };

    let Some(unit) = ctx.roster.get(user) else {
        tracing::warn!(%user, "attack from a unit outside the roster");
        return ActionOutcome::Skipped(SkipReason::Defeated);
    };
    if unit.is_defeated() {
        return skip(ctx, user, SkipReason::Defeated);
    }
    if unit.has_triggered(TriggeredEffects::STUN) {
        return skip(ctx, user, SkipReason::Stunned);
    }
    let Some(skill_id) = unit.unit().skills().get(index).and_then(|slot| slot.skill) else {
        return skip(ctx, user, SkipReason::EmptySlot);
    };

    let catalog = ctx.catalog;
    let Some(skill) = catalog.skill(skill_id) else {
        let error = crate::action::ActionError::UnknownSkill(skill_id);
        tracing::warn!(%user, code = error.error_code(), %error, "skipping attack");
        return skip(ctx, user, SkipReason::EmptySlot);
    };

    if let Some(unit) = ctx.roster.get_mut(user) {
        unit.unit_mut().set_cooldown(index, skill.turn_timer);
    }

    let targets = resolve_targets(ctx.roster, user, skill.target, anchor);
    let user_ref = ctx.roster.get(user).map(UnitRef::from);
    let Some(user_ref) = user_ref else {
        return ActionOutcome::Skipped(SkipReason::Defeated);
    };

    if targets.is_empty() {
        tracing::debug!(%user, skill = %skill_id, "no targets left, action fizzles");
        ctx.emit(BattleEvent::ActionFizzled {
            user: user_ref,
            skill: skill.name.clone(),
        });
        return ActionOutcome::Fizzled { skill: skill_id };
    }

    let target_refs = targets
        .iter()
        .filter_map(|&id| ctx.roster.get(id).map(UnitRef::from))
        .collect();
    tracing::debug!(%user, skill = %skill_id, ?targets, "skill used");
    ctx.emit(BattleEvent::SkillUsed {
        user: user_ref,
        skill: skill.name.clone(),
        targets: target_refs,
    });

    if let Err(error) = run_chain(ctx, &skill.effects, user, &targets) {
        tracing::warn!(%user, skill = %skill_id, %error, "skill chain aborted");
    }

    ActionOutcome::Resolved {
        skill: skill_id,
        targets,
    }
}
