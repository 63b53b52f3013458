//! Narration events emitted by the engine.
//!
//! The engine writes [`BattleEvent`]s to an injected [`EventSink`]. The
//! stream is append-only and presentation-only: nothing in the engine reads
//! it back. `Display` renders each event as a narration line.

use std::fmt;

use crate::engine::BattlePhase;
use crate::state::{BattleUnit, BattleUnitId, TriggeredEffects};

/// A unit as it appears in narration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnitRef {
    pub id: BattleUnitId,
    pub name: String,
}

impl From<&BattleUnit> for UnitRef {
    fn from(unit: &BattleUnit) -> Self {
        Self {
            id: unit.id(),
            name: unit.name().to_string(),
        }
    }
}

impl fmt::Display for UnitRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Why a queued action did not resolve.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
pub enum SkipReason {
    #[strum(to_string = "skips the turn")]
    Chose,
    #[strum(to_string = "is stunned")]
    Stunned,
    #[strum(to_string = "is defeated")]
    Defeated,
    #[strum(to_string = "has no skill in that slot")]
    EmptySlot,
}

/// One step of battle narration.
#[derive(Clone, Debug, PartialEq)]
pub enum BattleEvent {
    PhaseEntered {
        phase: BattlePhase,
        turn: u32,
    },
    SkillUsed {
        user: UnitRef,
        skill: String,
        targets: Vec<UnitRef>,
    },
    ActionSkipped {
        unit: UnitRef,
        reason: SkipReason,
    },
    ActionFizzled {
        user: UnitRef,
        skill: String,
    },
    Damaged {
        target: UnitRef,
        amount: i32,
        remaining: i32,
    },
    Defeated {
        unit: UnitRef,
    },
    Healed {
        target: UnitRef,
        amount: i32,
    },
    StatusApplied {
        target: UnitRef,
        status: String,
        turns: u32,
    },
    StatusResisted {
        target: UnitRef,
        status: String,
    },
    StatusCleared {
        target: UnitRef,
        status: String,
        /// The on-clear chain was suppressed.
        suppressed: bool,
    },
    StatModified {
        target: UnitRef,
        stat: String,
        percent: i32,
        multiplier: f64,
    },
    CooldownsChanged {
        target: UnitRef,
        delta: i32,
    },
    StatusTimersChanged {
        target: UnitRef,
        delta: i32,
    },
    TriggeredChanged {
        target: UnitRef,
        now: TriggeredEffects,
    },
    BattleEnded {
        winner: Option<String>,
    },
}

impl fmt::Display for BattleEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PhaseEntered { phase, turn } => write!(f, "[turn {turn}] {phase}"),
            Self::SkillUsed {
                user,
                skill,
                targets,
            } => {
                let names: Vec<&str> = targets.iter().map(|t| t.name.as_str()).collect();
                if targets.len() == 1 && targets[0].id == user.id {
                    write!(f, "{user} uses {skill}!")
                } else {
                    write!(f, "{user} uses {skill} on {}!", names.join(", "))
                }
            }
            Self::ActionSkipped { unit, reason } => write!(f, "{unit} {reason}."),
            Self::ActionFizzled { user, skill } => {
                write!(f, "{user} uses {skill}, but there is no target!")
            }
            Self::Damaged {
                target,
                amount,
                remaining,
            } => write!(f, "{target} takes {amount} damage ({remaining} HP left)."),
            Self::Defeated { unit } => write!(f, "{unit} is defeated!"),
            Self::Healed { target, amount } => write!(f, "{target} recovers {amount} HP."),
            Self::StatusApplied {
                target,
                status,
                turns,
            } => write!(f, "{target} is afflicted by {status} for {turns} turns."),
            Self::StatusResisted { target, status } => {
                write!(f, "{target} is immune to {status}.")
            }
            Self::StatusCleared {
                target,
                status,
                suppressed,
            } => {
                if *suppressed {
                    write!(f, "{status} fades from {target} without effect.")
                } else {
                    write!(f, "{status} fades from {target}.")
                }
            }
            Self::StatModified {
                target,
                stat,
                percent,
                ..
            } => {
                if *percent >= 0 {
                    write!(f, "{target}'s {stat} rises by {percent}%.")
                } else {
                    write!(f, "{target}'s {stat} falls by {}%.", percent.unsigned_abs())
                }
            }
            Self::CooldownsChanged { target, delta } => {
                write!(f, "{target}'s cooldowns shift by {delta:+} turns.")
            }
            Self::StatusTimersChanged { target, delta } => {
                write!(f, "{target}'s statuses shift by {delta:+} turns.")
            }
            Self::TriggeredChanged { target, now } => {
                write!(f, "{target}'s condition changes ({now:?}).")
            }
            Self::BattleEnded { winner: Some(name) } => write!(f, "{name} wins the battle!"),
            Self::BattleEnded { winner: None } => write!(f, "The battle ends in a draw."),
        }
    }
}

/// Append-only destination for narration events.
pub trait EventSink {
    fn emit(&mut self, event: BattleEvent);
}

/// Discards every event.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&mut self, _event: BattleEvent) {}
}

/// Collects events in memory.
#[derive(Clone, Debug, Default)]
pub struct EventLog {
    events: Vec<BattleEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[BattleEvent] {
        &self.events
    }

    /// Narration lines in emission order.
    pub fn lines(&self) -> Vec<String> {
        self.events.iter().map(ToString::to_string).collect()
    }

    /// Removes and returns every collected event.
    pub fn drain(&mut self) -> Vec<BattleEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl EventSink for EventLog {
    fn emit(&mut self, event: BattleEvent) {
        self.events.push(event);
    }
}

impl<F: FnMut(BattleEvent)> EventSink for F {
    fn emit(&mut self, event: BattleEvent) {
        self(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit(character: usize, name: &str) -> UnitRef {
        UnitRef {
            id: BattleUnitId::new(character, 0),
            name: name.to_string(),
        }
    }

    #[test]
    fn skill_narration_names_targets() {
        let event = BattleEvent::SkillUsed {
            user: unit(0, "Aria"),
            skill: "Slash".to_string(),
            targets: vec![unit(1, "Goblin")],
        };
        assert_eq!(event.to_string(), "Aria uses Slash on Goblin!");
    }

    #[test]
    fn self_targeted_skill_omits_target() {
        let aria = unit(0, "Aria");
        let event = BattleEvent::SkillUsed {
            user: aria.clone(),
            skill: "Focus".to_string(),
            targets: vec![aria],
        };
        assert_eq!(event.to_string(), "Aria uses Focus!");
    }

    #[test]
    fn closures_are_sinks() {
        let mut lines = Vec::new();
        {
            let mut sink = |event: BattleEvent| lines.push(event.to_string());
            sink.emit(BattleEvent::BattleEnded { winner: None });
        }
        assert_eq!(lines, vec!["The battle ends in a draw.".to_string()]);
    }
}
