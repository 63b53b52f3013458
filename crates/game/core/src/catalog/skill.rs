use super::SkillId;
use crate::action::effect::Effect;
use crate::action::targeting::TargetType;

/// Turn-order tier of a skill.
///
/// The tier overrides raw speed: every `AlwaysFirst` action resolves before
/// any `None` action, which resolve before any `AlwaysLast` action. Within a
/// tier the faster unit acts first.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SkillPriority {
    AlwaysFirst,
    #[default]
    None,
    AlwaysLast,
}

/// A catalog-defined action a unit can use.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Skill {
    pub id: SkillId,
    pub name: String,

    /// Cooldown applied to the slot when the skill is used, in turns.
    /// Zero means the skill is usable every turn.
    #[cfg_attr(feature = "serde", serde(default))]
    pub turn_timer: u32,

    pub target: TargetType,

    /// Effects applied in declared order to the resolved targets.
    pub effects: Vec<Effect>,

    #[cfg_attr(feature = "serde", serde(default))]
    pub priority: SkillPriority,
}

impl Skill {
    pub fn new(id: SkillId, name: impl Into<String>, target: TargetType) -> Self {
        Self {
            id,
            name: name.into(),
            turn_timer: 0,
            target,
            effects: Vec::new(),
            priority: SkillPriority::None,
        }
    }

    /// Builder: append an effect.
    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    /// Builder: set cooldown.
    pub fn with_cooldown(mut self, turn_timer: u32) -> Self {
        self.turn_timer = turn_timer;
        self
    }

    /// Builder: set priority tier.
    pub fn with_priority(mut self, priority: SkillPriority) -> Self {
        self.priority = priority;
        self
    }
}
