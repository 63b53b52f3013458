//! Effect execution context.

use crate::action::error::EffectError;
use crate::catalog::CatalogOracle;
use crate::config::BattleConfig;
use crate::events::{BattleEvent, EventSink};
use crate::state::{BattleUnit, BattleUnitId, Roster};

/// Everything an effect may read or mutate while it runs.
///
/// One context lives for one engine step; nested chains (a status applying
/// another status) reuse it and bump [`depth`](Self::depth).
pub struct EffectContext<'a> {
    /// Mutable battle state.
    pub roster: &'a mut Roster,

    /// Read-only skill and status definitions.
    pub catalog: &'a dyn CatalogOracle,

    pub config: &'a BattleConfig,

    /// Narration output.
    pub sink: &'a mut dyn EventSink,

    pub(super) depth: usize,
}

impl<'a> EffectContext<'a> {
    pub fn new(
        roster: &'a mut Roster,
        catalog: &'a dyn CatalogOracle,
        config: &'a BattleConfig,
        sink: &'a mut dyn EventSink,
    ) -> Self {
        Self {
            roster,
            catalog,
            config,
            sink,
            depth: 0,
        }
    }

    /// Current nesting level of effect chains.
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn unit(&self, id: BattleUnitId) -> Result<&BattleUnit, EffectError> {
        self.roster.get(id).ok_or(EffectError::UnitMissing(id))
    }

    pub fn unit_mut(&mut self, id: BattleUnitId) -> Result<&mut BattleUnit, EffectError> {
        self.roster.get_mut(id).ok_or(EffectError::UnitMissing(id))
    }

    pub fn emit(&mut self, event: BattleEvent) {
        self.sink.emit(event);
    }
}
