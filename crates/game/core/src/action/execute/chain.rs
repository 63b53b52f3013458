//! Effect chain runner.

use crate::action::effect::{Effect, EffectScope};
use crate::action::error::EffectError;
use crate::config::BattleConfig;
use crate::error::BattleErrorKind;
use crate::state::BattleUnitId;

use super::EffectContext;

/// Runs `effects` in declared order from `user` against each target in turn.
///
/// Best effort: a failing effect is logged and the chain moves on. Effects
/// stop for a target once it is defeated. The only error returned is
/// [`EffectError::DepthExceeded`], raised before anything runs.
pub fn run_chain(
    ctx: &mut EffectContext<'_>,
    effects: &[Effect],
    user: BattleUnitId,
    targets: &[BattleUnitId],
) -> Result<(), EffectError> {
    if effects.is_empty() {
        return Ok(());
    }
    if ctx.depth >= BattleConfig::MAX_EFFECT_DEPTH {
        return Err(EffectError::DepthExceeded {
            limit: BattleConfig::MAX_EFFECT_DEPTH,
        });
    }

    ctx.depth += 1;
    for &target in targets {
        for effect in effects {
            if !ctx.roster.is_alive(target) {
                break;
            }
            let scope = EffectScope::new(user, target);
            match effect.apply(scope, ctx) {
                Ok(applied) => {
                    tracing::trace!(kind = effect.kind.label(), %user, %target, ?applied, "effect");
                }
                Err(error) => {
                    tracing::warn!(
                        kind = effect.kind.label(),
                        %user,
                        %target,
                        code = error.error_code(),
                        %error,
                        "effect failed, continuing chain"
                    );
                }
            }
        }
    }
    ctx.depth -= 1;

    Ok(())
}
