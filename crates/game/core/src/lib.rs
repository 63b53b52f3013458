//! Deterministic turn-based battle rules.
//!
//! `battle-core` defines the canonical rules (progression, catalog content,
//! targeting, effects and the battle phase machine) and exposes synchronous,
//! side-effect-free APIs that frontends drive. All battle state mutation
//! flows through [`engine::Battle`]; narration leaves through an injected
//! [`events::EventSink`].
//!
//! ```text
//! Catalog (skills, statuses, definitions)   BattleConfig
//!          │                                     │
//!          ▼                                     ▼
//! Character ─► Unit ───────────► Battle ─► Roster of BattleUnits
//!  (persistent)                    │
//!                                  ├─ ActionPlanner / submit_action
//!                                  └─ EventSink (narration)
//! ```
pub mod action;
pub mod catalog;
pub mod config;
pub mod engine;
pub mod error;
pub mod events;
pub mod state;
pub mod stats;

pub use action::{
    Action, ActionError, ActionOutcome, ActionPlanner, AttackAction, AttackStage, Effect,
    EffectError, EffectKind, FirstReadySkillPlanner, PassivePlanner, Scaling, TargetType,
    resolve_targets,
};
pub use catalog::{
    Catalog, CatalogError, CatalogOracle, DefinitionId, LevelCurve, Skill, SkillId, SkillPriority,
    SkillUnlock, Status, StatusHook, StatusId, StatusType, UnitDefinition,
};
pub use config::{BattleConfig, StatNames};
pub use engine::{
    Battle, BattleBuilder, BattleError, BattleOutcome, BattlePhase, Control, Participant, Progress,
    SetupError,
};
pub use error::{BattleErrorKind, ErrorSeverity};
pub use events::{BattleEvent, EventLog, EventSink, NullSink, SkipReason, UnitRef};
pub use state::{
    BattleUnit, BattleUnitId, Character, LevelProgress, ProgressionError, Roster, SkillSlot,
    StatusError, StatusSlot, TriggeredEffects, Unit,
};
pub use stats::{Stat, StatBlock, StatMultipliers};
