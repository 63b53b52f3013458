//! Action and effect errors.
//!
//! [`ActionError`] rejects a submitted action before it is queued.
//! [`EffectError`] reports a single effect that could not be applied; the
//! engine logs it and continues with the rest of the chain.

use crate::catalog::{SkillId, StatusId};
use crate::error::{BattleErrorKind, ErrorSeverity};
use crate::state::{BattleUnitId, StatusError};
use crate::stats::Stat;

use super::AttackStage;

// ============================================================================
// Action Validation Errors
// ============================================================================

/// Reasons a submitted action is refused.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ActionError {
    #[error("battle is not waiting for actions")]
    NotAwaitingInput,

    #[error("unit {0} is not in this battle")]
    UnknownUnit(BattleUnitId),

    #[error("unit {0} is defeated")]
    UnitDefeated(BattleUnitId),

    #[error("unit {0} is not player controlled")]
    NotPlayerControlled(BattleUnitId),

    #[error("unit {0} already has an action this turn")]
    AlreadySubmitted(BattleUnitId),

    #[error("defeated placeholders are queued by the engine only")]
    ReservedAction,

    #[error("attack action is incomplete (stage {stage:?})")]
    IncompleteAction { stage: AttackStage },

    #[error("skill slot {index} out of range (unit has {slots} slots)")]
    SkillSlotOutOfRange { index: usize, slots: usize },

    #[error("skill slot {index} is empty")]
    EmptySkillSlot { index: usize },

    #[error("skill slot {index} is cooling down ({remaining} turns left)")]
    SkillOnCooldown { index: usize, remaining: u32 },

    #[error("{0} is not in the catalog")]
    UnknownSkill(SkillId),

    #[error("unit {user} cannot target {target}")]
    InvalidTarget {
        user: BattleUnitId,
        target: BattleUnitId,
    },
}

impl BattleErrorKind for ActionError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::SkillOnCooldown { .. } | Self::UnitDefeated(_) | Self::InvalidTarget { .. } => {
                ErrorSeverity::Recoverable
            }
            Self::UnknownSkill(_) => ErrorSeverity::Internal,
            _ => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::NotAwaitingInput => "ACTION_NOT_AWAITING_INPUT",
            Self::UnknownUnit(_) => "ACTION_UNKNOWN_UNIT",
            Self::UnitDefeated(_) => "ACTION_UNIT_DEFEATED",
            Self::NotPlayerControlled(_) => "ACTION_NOT_PLAYER_CONTROLLED",
            Self::AlreadySubmitted(_) => "ACTION_ALREADY_SUBMITTED",
            Self::ReservedAction => "ACTION_RESERVED",
            Self::IncompleteAction { .. } => "ACTION_INCOMPLETE",
            Self::SkillSlotOutOfRange { .. } => "ACTION_SKILL_SLOT_OUT_OF_RANGE",
            Self::EmptySkillSlot { .. } => "ACTION_EMPTY_SKILL_SLOT",
            Self::SkillOnCooldown { .. } => "ACTION_SKILL_ON_COOLDOWN",
            Self::UnknownSkill(_) => "ACTION_UNKNOWN_SKILL",
            Self::InvalidTarget { .. } => "ACTION_INVALID_TARGET",
        }
    }
}

// ============================================================================
// Effect Application Errors
// ============================================================================

/// A single effect that could not be applied.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EffectError {
    #[error("unit {0} is not in this battle")]
    UnitMissing(BattleUnitId),

    #[error("{0} is not in the catalog")]
    UnknownStatus(StatusId),

    #[error(transparent)]
    Status(#[from] StatusError),

    #[error("{0} does not take multipliers")]
    StatNotModifiable(Stat),

    #[error("skill slot {index} out of range (unit has {slots} slots)")]
    SkillSlotOutOfRange { index: usize, slots: usize },

    #[error("effect chain nested deeper than {limit}")]
    DepthExceeded { limit: usize },
}

impl BattleErrorKind for EffectError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Status(_) | Self::StatNotModifiable(_) | Self::SkillSlotOutOfRange { .. } => {
                ErrorSeverity::Recoverable
            }
            Self::UnitMissing(_) | Self::UnknownStatus(_) | Self::DepthExceeded { .. } => {
                ErrorSeverity::Internal
            }
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::UnitMissing(_) => "EFFECT_UNIT_MISSING",
            Self::UnknownStatus(_) => "EFFECT_UNKNOWN_STATUS",
            Self::Status(inner) => inner.error_code(),
            Self::StatNotModifiable(_) => "EFFECT_STAT_NOT_MODIFIABLE",
            Self::SkillSlotOutOfRange { .. } => "EFFECT_SKILL_SLOT_OUT_OF_RANGE",
            Self::DepthExceeded { .. } => "EFFECT_DEPTH_EXCEEDED",
        }
    }
}
