//! Action domain: what units do on their turn.
//!
//! # Module Structure
//!
//! - `targeting`: [`TargetType`] and the target resolver
//! - `effect`: effect definitions (damage, heal, statuses, modifiers, flags)
//! - `execute`: effect chains, the status lifecycle and action execution
//! - `planner`: automatic action selection
//! - `error`: [`ActionError`] and [`EffectError`]
//!
//! An [`Action`] is what a unit queues during `ChooseActions`. Attacks are
//! assembled stage by stage with [`AttackAction`]; only a complete attack
//! (user, skill slot and target all set) is accepted by the engine.

pub mod effect;
pub mod error;
pub mod execute;
pub mod planner;
pub mod targeting;

pub use effect::{AppliedValue, Effect, EffectKind, EffectScope, Scaling};
pub use error::{ActionError, EffectError};
pub use execute::{ActionOutcome, EffectContext};
pub use planner::{ActionPlanner, FirstReadySkillPlanner, PassivePlanner};
pub use targeting::{TargetType, resolve_targets};

use crate::state::BattleUnitId;

/// One unit's choice for the turn.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
    /// Do nothing.
    Skip { unit: BattleUnitId },
    /// Placeholder queued for a unit that cannot act.
    Defeated { unit: BattleUnitId },
    /// Use a skill.
    Attack(AttackAction),
}

impl Action {
    /// The unit the action belongs to, if known.
    pub fn unit(&self) -> Option<BattleUnitId> {
        match self {
            Self::Skip { unit } | Self::Defeated { unit } => Some(*unit),
            Self::Attack(attack) => attack.user(),
        }
    }

    pub fn skip(unit: BattleUnitId) -> Self {
        Self::Skip { unit }
    }

    /// A complete attack.
    pub fn attack(user: BattleUnitId, skill_index: usize, target: BattleUnitId) -> Self {
        Self::Attack(AttackAction::complete(user, skill_index, target))
    }
}

impl From<AttackAction> for Action {
    fn from(attack: AttackAction) -> Self {
        Self::Attack(attack)
    }
}

/// How far an [`AttackAction`] has been built.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum AttackStage {
    #[default]
    Empty = 0,
    HasUser = 1,
    HasSkill = 2,
    HasTarget = 3,
}

/// Staged attack builder: user, then skill slot, then target.
///
/// Setting an earlier stage discards the later ones, so the stage is always
/// the number of leading fields that are set.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AttackAction {
    user: Option<BattleUnitId>,
    skill_index: Option<usize>,
    target: Option<BattleUnitId>,
}

impl AttackAction {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn complete(user: BattleUnitId, skill_index: usize, target: BattleUnitId) -> Self {
        Self {
            user: Some(user),
            skill_index: Some(skill_index),
            target: Some(target),
        }
    }

    pub fn stage(&self) -> AttackStage {
        match (self.user, self.skill_index, self.target) {
            (Some(_), Some(_), Some(_)) => AttackStage::HasTarget,
            (Some(_), Some(_), None) => AttackStage::HasSkill,
            (Some(_), None, _) => AttackStage::HasUser,
            (None, ..) => AttackStage::Empty,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.stage() == AttackStage::HasTarget
    }

    pub fn user(&self) -> Option<BattleUnitId> {
        self.user
    }

    pub fn skill_index(&self) -> Option<usize> {
        self.skill_index
    }

    pub fn target(&self) -> Option<BattleUnitId> {
        self.target
    }

    /// `(user, skill_index, target)` once complete.
    pub fn parts(&self) -> Option<(BattleUnitId, usize, BattleUnitId)> {
        Some((self.user?, self.skill_index?, self.target?))
    }

    /// Sets the user, discarding skill and target.
    pub fn set_user(&mut self, user: BattleUnitId) -> &mut Self {
        self.user = Some(user);
        self.skill_index = None;
        self.target = None;
        self
    }

    /// Sets the skill slot, discarding the target. Requires a user.
    pub fn set_skill_index(&mut self, index: usize) -> Result<&mut Self, ActionError> {
        if self.user.is_none() {
            return Err(ActionError::IncompleteAction {
                stage: self.stage(),
            });
        }
        self.skill_index = Some(index);
        self.target = None;
        Ok(self)
    }

    /// Sets the target. Requires a skill slot.
    pub fn set_target(&mut self, target: BattleUnitId) -> Result<&mut Self, ActionError> {
        if self.stage() < AttackStage::HasSkill {
            return Err(ActionError::IncompleteAction {
                stage: self.stage(),
            });
        }
        self.target = Some(target);
        Ok(self)
    }
}
