//! Status lifecycle: gaining, clearing, per-turn hooks and expiry.
//!
//! Every status chain runs with the applier as user and the holder as the
//! only target.

use crate::action::error::EffectError;
use crate::catalog::{StatusHook, StatusId};
use crate::error::BattleErrorKind;
use crate::events::{BattleEvent, UnitRef};
use crate::state::{BattleUnitId, StatusSlot};

use super::{EffectContext, run_chain};

fn log_chain_error(holder: BattleUnitId, status: StatusId, hook: StatusHook, error: EffectError) {
    tracing::warn!(
        %holder,
        %status,
        %hook,
        code = error.error_code(),
        %error,
        "status chain aborted"
    );
}

/// Puts `status` on `holder` and runs its on-apply chain.
///
/// `duration` overrides the catalog default. Returns `None` when the holder
/// is immune; nothing else happens in that case.
pub fn gain_status(
    ctx: &mut EffectContext<'_>,
    holder: BattleUnitId,
    status: StatusId,
    duration: Option<u32>,
    applied_by: BattleUnitId,
) -> Result<Option<StatusSlot>, EffectError> {
    let catalog = ctx.catalog;
    let definition = catalog
        .status(status)
        .ok_or(EffectError::UnknownStatus(status))?;
    let turns = duration.unwrap_or(definition.duration);

    let unit = ctx.unit_mut(holder)?;
    let slot = unit.push_status(definition, turns, applied_by);
    let target = UnitRef::from(&*unit);

    let Some(slot) = slot else {
        tracing::debug!(%holder, %status, "status resisted");
        ctx.emit(BattleEvent::StatusResisted {
            target,
            status: definition.name.clone(),
        });
        return Ok(None);
    };

    tracing::debug!(%holder, %status, turns, %applied_by, "status gained");
    ctx.emit(BattleEvent::StatusApplied {
        target,
        status: definition.name.clone(),
        turns,
    });

    if let Err(error) = run_chain(ctx, &definition.on_apply, applied_by, &[holder]) {
        log_chain_error(holder, status, StatusHook::Apply, error);
    }
    Ok(Some(slot))
}

/// Finishes a slot already taken off `holder`: narrates it and runs the
/// on-clear chain unless the holder's clear suppression is armed, which this
/// consumes.
pub fn clear_status(ctx: &mut EffectContext<'_>, holder: BattleUnitId, slot: StatusSlot) {
    let catalog = ctx.catalog;
    let Some(definition) = catalog.status(slot.status) else {
        tracing::warn!(%holder, status = %slot.status, "cleared status missing from catalog");
        return;
    };
    let Ok(unit) = ctx.unit_mut(holder) else {
        return;
    };
    let suppressed = unit.consume_clear_suppression();
    let target = UnitRef::from(&*unit);

    tracing::debug!(%holder, status = %slot.status, suppressed, "status cleared");
    ctx.emit(BattleEvent::StatusCleared {
        target,
        status: definition.name.clone(),
        suppressed,
    });

    if suppressed {
        return;
    }
    if let Err(error) = run_chain(ctx, &definition.on_clear, slot.applied_by, &[holder]) {
        log_chain_error(holder, slot.status, StatusHook::Clear, error);
    }
}

/// Fires the `hook` chain of every status `holder` has, in slot order.
///
/// Slots removed by an earlier chain in the same pass are skipped. Nothing
/// runs for a defeated holder.
pub fn fire_status_hook(ctx: &mut EffectContext<'_>, holder: BattleUnitId, hook: StatusHook) {
    let catalog = ctx.catalog;
    let slots = match ctx.roster.get(holder) {
        Some(unit) if unit.is_alive() => unit.statuses().to_vec(),
        _ => return,
    };

    for slot in slots {
        let still_held = ctx
            .roster
            .get(holder)
            .is_some_and(|unit| unit.is_alive() && unit.status_slot(slot.serial).is_some());
        if !still_held {
            continue;
        }
        let Some(definition) = catalog.status(slot.status) else {
            tracing::warn!(%holder, status = %slot.status, "held status missing from catalog");
            continue;
        };
        if let Err(error) = run_chain(ctx, definition.chain(hook), slot.applied_by, &[holder]) {
            log_chain_error(holder, slot.status, hook, error);
        }
    }
}

/// Counts down `holder`'s status timers and clears the ones that run out.
pub fn expire_statuses(ctx: &mut EffectContext<'_>, holder: BattleUnitId) {
    let Ok(unit) = ctx.unit_mut(holder) else {
        return;
    };
    for slot in unit.tick_status_timers() {
        clear_status(ctx, holder, slot);
    }
}
