/// Battle phase state machine.
///
/// ```text
/// Start -> TurnStart -> ChooseActions -> Action -> TurnEnd -> TurnStart | End
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BattlePhase {
    #[default]
    #[strum(to_string = "Battle start")]
    Start,
    #[strum(to_string = "Turn start")]
    TurnStart,
    #[strum(to_string = "Choose actions")]
    ChooseActions,
    #[strum(to_string = "Actions")]
    Action,
    #[strum(to_string = "Turn end")]
    TurnEnd,
    #[strum(to_string = "Battle end")]
    End,
}

impl BattlePhase {
    /// The phase that normally follows this one. `TurnEnd` may also lead to
    /// `End`; `End` is terminal.
    pub const fn next(self) -> Self {
        match self {
            Self::Start => Self::TurnStart,
            Self::TurnStart => Self::ChooseActions,
            Self::ChooseActions => Self::Action,
            Self::Action => Self::TurnEnd,
            Self::TurnEnd => Self::TurnStart,
            Self::End => Self::End,
        }
    }

    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::End)
    }
}
