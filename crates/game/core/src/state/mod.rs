//! Battle state representation.
//!
//! Two layers with different lifetimes:
//! - **Persistent**: [`Unit`] and [`Character`], owned by the player across
//!   battles and mutated only by progression operations.
//! - **Ephemeral**: [`BattleUnit`] and [`Roster`], built fresh when a battle
//!   starts and mutated exclusively by the engine.
mod battle_unit;
mod character;
mod progression;
mod roster;

pub use battle_unit::{BattleUnit, BattleUnitId, StatusError, StatusSlot, TriggeredEffects};
pub use character::Character;
pub use progression::{LevelProgress, ProgressionError, SkillSlot, Unit};
pub use roster::Roster;
