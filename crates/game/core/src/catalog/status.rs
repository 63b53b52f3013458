use super::StatusId;
use crate::action::effect::Effect;

/// Broad category of a status.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StatusType {
    #[default]
    Default,
    Buff,
    Debuff,
}

/// Points in a status's lifetime that fire an effect chain.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum StatusHook {
    Apply,
    TurnStart,
    TurnEnd,
    Clear,
}

/// A catalog-defined timed condition.
///
/// The unit that applied a status is recorded on the runtime status slot,
/// not here: the catalog entry is shared by every holder.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Status {
    pub id: StatusId,
    pub name: String,

    /// Turns the status lasts when applied without an explicit duration.
    pub duration: u32,

    #[cfg_attr(feature = "serde", serde(default))]
    pub kind: StatusType,

    #[cfg_attr(feature = "serde", serde(default))]
    pub on_apply: Vec<Effect>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub on_turn_start: Vec<Effect>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub on_turn_end: Vec<Effect>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub on_clear: Vec<Effect>,
}

impl Status {
    pub fn new(id: StatusId, name: impl Into<String>, duration: u32, kind: StatusType) -> Self {
        Self {
            id,
            name: name.into(),
            duration,
            kind,
            on_apply: Vec::new(),
            on_turn_start: Vec::new(),
            on_turn_end: Vec::new(),
            on_clear: Vec::new(),
        }
    }

    /// Builder: append an effect to the chain fired at `hook`.
    pub fn with_effect(mut self, hook: StatusHook, effect: Effect) -> Self {
        match hook {
            StatusHook::Apply => self.on_apply.push(effect),
            StatusHook::TurnStart => self.on_turn_start.push(effect),
            StatusHook::TurnEnd => self.on_turn_end.push(effect),
            StatusHook::Clear => self.on_clear.push(effect),
        }
        self
    }

    /// The effect chain fired at `hook`.
    pub fn chain(&self, hook: StatusHook) -> &[Effect] {
        match hook {
            StatusHook::Apply => &self.on_apply,
            StatusHook::TurnStart => &self.on_turn_start,
            StatusHook::TurnEnd => &self.on_turn_end,
            StatusHook::Clear => &self.on_clear,
        }
    }

    pub(crate) fn all_effects(&self) -> impl Iterator<Item = &Effect> {
        self.on_apply
            .iter()
            .chain(&self.on_turn_start)
            .chain(&self.on_turn_end)
            .chain(&self.on_clear)
    }
}
