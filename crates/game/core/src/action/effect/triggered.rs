//! Triggered-effect flag changes.

use crate::action::error::EffectError;
use crate::action::execute::EffectContext;
use crate::events::{BattleEvent, UnitRef};
use crate::state::TriggeredEffects;

use super::{AppliedValue, EffectScope};

/// How a flag effect changes the target's flags.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum TriggerOp {
    Enable,
    Disable,
    Toggle,
}

pub(super) fn apply(
    op: TriggerOp,
    flags: TriggeredEffects,
    scope: EffectScope,
    ctx: &mut EffectContext<'_>,
) -> Result<AppliedValue, EffectError> {
    let target = ctx.unit_mut(scope.target)?;
    match op {
        TriggerOp::Enable => target.enable_triggered(flags),
        TriggerOp::Disable => target.disable_triggered(flags),
        TriggerOp::Toggle => target.toggle_triggered(flags),
    }
    let now = target.triggered();
    let target_ref = UnitRef::from(&*target);

    tracing::debug!(target = %scope.target, %op, ?flags, ?now, "triggered effects changed");
    ctx.emit(BattleEvent::TriggeredChanged {
        target: target_ref,
        now,
    });

    Ok(AppliedValue::Triggered { now })
}
