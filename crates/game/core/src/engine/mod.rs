//! Battle phase state machine.
//!
//! [`Battle`] owns the roster for the duration of one battle and is the only
//! thing that mutates it. Callers drive it with [`Battle::advance`], which
//! performs exactly one phase transition, and answer
//! [`Progress::AwaitingInput`] with [`Battle::submit_action`].
//!
//! The `Action` phase resolves every queued action inside a single
//! `advance` call, so observers only ever see the state before or after a
//! whole turn's actions.

mod errors;
mod phase;
mod setup;
mod turns;

pub use errors::{BattleError, SetupError};
pub use phase::BattlePhase;
pub use turns::{TurnOrderKey, order_actions};

use std::collections::BTreeSet;

use crate::action::execute::{
    EffectContext, expire_statuses, fire_status_hook, perform_action,
};
use crate::action::planner::PlanningView;
use crate::action::targeting::is_valid_anchor;
use crate::action::{Action, ActionError, ActionPlanner};
use crate::catalog::{CatalogOracle, StatusHook};
use crate::config::BattleConfig;
use crate::error::BattleErrorKind;
use crate::events::{BattleEvent, EventSink};
use crate::state::{BattleUnit, BattleUnitId, Character, Roster};

/// Who chooses a character's actions.
pub enum Control {
    /// Actions arrive through [`Battle::submit_action`].
    Player,
    /// Actions come from a planner every turn.
    Planner(Box<dyn ActionPlanner>),
}

impl Control {
    pub fn planner(planner: impl ActionPlanner + 'static) -> Self {
        Self::Planner(Box::new(planner))
    }

    pub fn is_player(&self) -> bool {
        matches!(self, Self::Player)
    }
}

impl std::fmt::Debug for Control {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Player => f.write_str("Player"),
            Self::Planner(_) => f.write_str("Planner(..)"),
        }
    }
}

/// A character entering a battle.
#[derive(Debug)]
pub struct Participant {
    pub character: Character,
    pub control: Control,
}

/// How a battle ended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BattleOutcome {
    /// Index of the last character standing; `None` when nobody is.
    pub winner: Option<usize>,
    /// Turns played.
    pub turns: u32,
}

/// Result of one [`Battle::advance`] call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Progress {
    /// Moved to this phase.
    Advanced(BattlePhase),
    /// Still in `ChooseActions`; these units need an action.
    AwaitingInput(Vec<BattleUnitId>),
    /// The battle is over.
    Finished(BattleOutcome),
}

/// Fluent construction of a [`Battle`].
pub struct BattleBuilder<'c> {
    catalog: &'c dyn CatalogOracle,
    config: BattleConfig,
    participants: Vec<Participant>,
}

impl<'c> BattleBuilder<'c> {
    pub fn participant(mut self, character: Character, control: Control) -> Self {
        self.participants.push(Participant { character, control });
        self
    }

    pub fn player(self, character: Character) -> Self {
        self.participant(character, Control::Player)
    }

    pub fn planned(self, character: Character, planner: impl ActionPlanner + 'static) -> Self {
        self.participant(character, Control::planner(planner))
    }

    pub fn build(self) -> Battle<'c> {
        Battle::new(self.catalog, self.config, self.participants)
    }
}

/// One battle, from setup to outcome.
pub struct Battle<'c> {
    catalog: &'c dyn CatalogOracle,
    config: BattleConfig,
    participants: Vec<Participant>,
    roster: Roster,
    phase: BattlePhase,
    turn: u32,
    queue: Vec<Action>,
    queued_units: BTreeSet<BattleUnitId>,
    outcome: Option<BattleOutcome>,
}

impl<'c> Battle<'c> {
    /// Creates a battle in the `Start` phase. Validation happens on the
    /// first [`advance`](Self::advance).
    pub fn new(
        catalog: &'c dyn CatalogOracle,
        config: BattleConfig,
        participants: Vec<Participant>,
    ) -> Self {
        let roster = Roster::new(0, config.units_per_party);
        Self {
            catalog,
            config,
            participants,
            roster,
            phase: BattlePhase::Start,
            turn: 0,
            queue: Vec::new(),
            queued_units: BTreeSet::new(),
            outcome: None,
        }
    }

    pub fn builder(catalog: &'c dyn CatalogOracle, config: BattleConfig) -> BattleBuilder<'c> {
        BattleBuilder {
            catalog,
            config,
            participants: Vec::new(),
        }
    }

    // ===== observation =====

    pub fn phase(&self) -> BattlePhase {
        self.phase
    }

    /// Current turn number, starting at 1 once the battle is set up.
    pub fn turn(&self) -> u32 {
        self.turn
    }

    pub fn config(&self) -> &BattleConfig {
        &self.config
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn unit(&self, id: BattleUnitId) -> Option<&BattleUnit> {
        self.roster.get(id)
    }

    pub fn characters(&self) -> impl Iterator<Item = &Character> {
        self.participants.iter().map(|p| &p.character)
    }

    pub fn character(&self, index: usize) -> Option<&Character> {
        self.participants.get(index).map(|p| &p.character)
    }

    pub fn outcome(&self) -> Option<&BattleOutcome> {
        self.outcome.as_ref()
    }

    /// Name of the winning character, once the battle is over.
    pub fn winner_name(&self) -> Option<&str> {
        let winner = self.outcome.as_ref()?.winner?;
        self.character(winner).map(|c| c.name.as_str())
    }

    pub fn queued_actions(&self) -> &[Action] {
        &self.queue
    }

    /// Live player-controlled units still missing an action this turn.
    pub fn pending_units(&self) -> Vec<BattleUnitId> {
        if self.phase != BattlePhase::ChooseActions {
            return Vec::new();
        }
        self.roster
            .living()
            .map(BattleUnit::id)
            .filter(|id| self.is_player_controlled(*id) && !self.queued_units.contains(id))
            .collect()
    }

    /// Hands the participants back. Their units are untouched: the battle
    /// worked on copies.
    pub fn into_characters(self) -> Vec<Character> {
        self.participants.into_iter().map(|p| p.character).collect()
    }

    fn is_player_controlled(&self, id: BattleUnitId) -> bool {
        self.participants
            .get(id.character)
            .is_some_and(|p| p.control.is_player())
    }

    // ===== driving =====

    /// Performs one phase transition.
    ///
    /// In `ChooseActions` this returns [`Progress::AwaitingInput`] without
    /// changing phase until every live player unit has an action.
    pub fn advance(&mut self, sink: &mut dyn EventSink) -> Result<Progress, BattleError> {
        let next = match self.phase {
            BattlePhase::Start => {
                self.start()?;
                BattlePhase::TurnStart
            }
            BattlePhase::TurnStart => {
                self.fire_hooks(StatusHook::TurnStart, sink);
                self.plan_automatic_units();
                BattlePhase::ChooseActions
            }
            BattlePhase::ChooseActions => {
                let pending = self.pending_units();
                if !pending.is_empty() {
                    return Ok(Progress::AwaitingInput(pending));
                }
                BattlePhase::Action
            }
            BattlePhase::Action => {
                self.resolve_actions(sink);
                BattlePhase::TurnEnd
            }
            BattlePhase::TurnEnd => self.end_turn(sink),
            BattlePhase::End => {
                return Ok(match &self.outcome {
                    Some(outcome) => Progress::Finished(outcome.clone()),
                    None => Progress::Advanced(BattlePhase::End),
                });
            }
        };

        self.enter(next, sink);
        Ok(match (next, &self.outcome) {
            (BattlePhase::End, Some(outcome)) => Progress::Finished(outcome.clone()),
            _ => Progress::Advanced(next),
        })
    }

    /// Advances until the battle needs player input or is over.
    pub fn run_until_input(&mut self, sink: &mut dyn EventSink) -> Result<Progress, BattleError> {
        loop {
            match self.advance(sink)? {
                Progress::Advanced(_) => continue,
                done => return Ok(done),
            }
        }
    }

    /// Queues a player's action for the current turn.
    ///
    /// The action is validated against the live state: the unit must be a
    /// live, player-controlled unit without an action yet, and an attack must
    /// be complete, name a ready skill and point at a valid target.
    pub fn submit_action(&mut self, action: Action) -> Result<(), ActionError> {
        if self.phase != BattlePhase::ChooseActions {
            return Err(ActionError::NotAwaitingInput);
        }
        let unit = match &action {
            Action::Attack(attack) => attack.user().ok_or(ActionError::IncompleteAction {
                stage: attack.stage(),
            })?,
            other => other.unit().ok_or(ActionError::NotAwaitingInput)?,
        };
        if !self.is_player_controlled(unit) && self.roster.contains(unit) {
            return Err(ActionError::NotPlayerControlled(unit));
        }
        self.validate(&action, unit)?;
        self.enqueue(unit, action);
        Ok(())
    }

    /// Withdraws a submitted action so it can be replaced.
    pub fn withdraw_action(&mut self, unit: BattleUnitId) -> Option<Action> {
        if self.phase != BattlePhase::ChooseActions || !self.is_player_controlled(unit) {
            return None;
        }
        let index = self.queue.iter().position(|a| a.unit() == Some(unit))?;
        self.queued_units.remove(&unit);
        Some(self.queue.remove(index))
    }

    // ===== phases =====

    fn enter(&mut self, phase: BattlePhase, sink: &mut dyn EventSink) {
        tracing::debug!(from = %self.phase, to = %phase, turn = self.turn, "phase transition");
        self.phase = phase;
        sink.emit(BattleEvent::PhaseEntered {
            phase,
            turn: self.turn,
        });
    }

    fn start(&mut self) -> Result<(), SetupError> {
        let characters = self.participants.iter().map(|p| &p.character);
        if let Err(error) = setup::validate(characters.clone(), &self.config, self.catalog) {
            tracing::error!(code = error.error_code(), %error, "battle setup rejected");
            return Err(error);
        }
        self.roster = setup::build_roster(characters, &self.config);
        self.turn = 1;
        tracing::debug!(
            characters = self.participants.len(),
            units = self.roster.iter().count(),
            "battle started"
        );
        Ok(())
    }

    fn context<'s>(&'s mut self, sink: &'s mut dyn EventSink) -> EffectContext<'s> {
        EffectContext::new(&mut self.roster, self.catalog, &self.config, sink)
    }

    fn fire_hooks(&mut self, hook: StatusHook, sink: &mut dyn EventSink) {
        let holders = self.roster.living_ids();
        let mut ctx = self.context(sink);
        for holder in holders {
            fire_status_hook(&mut ctx, holder, hook);
        }
    }

    fn plan_automatic_units(&mut self) {
        self.queue.clear();
        self.queued_units.clear();

        for id in self.roster.living_ids() {
            let Some(participant) = self.participants.get_mut(id.character) else {
                continue;
            };
            let Control::Planner(planner) = &mut participant.control else {
                continue;
            };
            let view = PlanningView {
                roster: &self.roster,
                catalog: self.catalog,
                turn: self.turn,
            };
            let planned = planner.plan(id, view);
            let action = match validate_action(&self.roster, self.catalog, &planned, id) {
                Ok(()) => planned,
                Err(error) => {
                    tracing::warn!(unit = %id, code = error.error_code(), %error, "planner action rejected, skipping");
                    Action::skip(id)
                }
            };
            self.enqueue(id, action);
        }
    }

    fn validate(&self, action: &Action, unit: BattleUnitId) -> Result<(), ActionError> {
        if self.queued_units.contains(&unit) {
            return Err(ActionError::AlreadySubmitted(unit));
        }
        validate_action(&self.roster, self.catalog, action, unit)
    }

    fn enqueue(&mut self, unit: BattleUnitId, action: Action) {
        self.queued_units.insert(unit);
        self.queue.push(action);
    }

    fn resolve_actions(&mut self, sink: &mut dyn EventSink) {
        let mut queue = std::mem::take(&mut self.queue);
        order_actions(&mut queue, &self.roster, self.catalog);
        self.queued_units.clear();

        let mut ctx = self.context(sink);
        for action in &queue {
            let action = match action.unit() {
                Some(unit) if !ctx.roster.is_alive(unit) => Action::Defeated { unit },
                _ => action.clone(),
            };
            let outcome = perform_action(&mut ctx, &action);
            tracing::debug!(unit = ?action.unit(), ?outcome, "action resolved");
        }
    }

    fn end_turn(&mut self, sink: &mut dyn EventSink) -> BattlePhase {
        self.fire_hooks(StatusHook::TurnEnd, sink);

        let holders = self.roster.living_ids();
        {
            let mut ctx = self.context(sink);
            for holder in holders {
                if let Ok(unit) = ctx.unit_mut(holder) {
                    unit.tick_cooldowns();
                }
                expire_statuses(&mut ctx, holder);
            }
        }

        let standing = self.roster.standing_characters();
        if standing.len() <= 1 {
            let outcome = BattleOutcome {
                winner: standing.first().copied(),
                turns: self.turn,
            };
            let winner = outcome
                .winner
                .and_then(|index| self.character(index))
                .map(|c| c.name.clone());
            tracing::debug!(?winner, turns = self.turn, "battle over");
            sink.emit(BattleEvent::BattleEnded { winner });
            self.outcome = Some(outcome);
            return BattlePhase::End;
        }

        self.turn += 1;
        BattlePhase::TurnStart
    }
}

/// Checks an action for `unit` against the current roster.
fn validate_action(
    roster: &Roster,
    catalog: &dyn CatalogOracle,
    action: &Action,
    unit: BattleUnitId,
) -> Result<(), ActionError> {
    let battle_unit = roster.get(unit).ok_or(ActionError::UnknownUnit(unit))?;
    if battle_unit.is_defeated() {
        return Err(ActionError::UnitDefeated(unit));
    }

    match action {
        Action::Skip { unit: owner } if *owner == unit => Ok(()),
        Action::Skip { .. } => Err(ActionError::UnknownUnit(unit)),
        Action::Defeated { .. } => Err(ActionError::ReservedAction),
        Action::Attack(attack) => {
            let (user, index, target) = attack.parts().ok_or(ActionError::IncompleteAction {
                stage: attack.stage(),
            })?;
            if user != unit {
                return Err(ActionError::UnknownUnit(user));
            }

            let slots = battle_unit.unit().skills();
            let slot = slots.get(index).ok_or(ActionError::SkillSlotOutOfRange {
                index,
                slots: slots.len(),
            })?;
            let skill = slot.skill.ok_or(ActionError::EmptySkillSlot { index })?;
            if !slot.is_ready() {
                return Err(ActionError::SkillOnCooldown {
                    index,
                    remaining: slot.cooldown,
                });
            }
            let skill = catalog.skill(skill).ok_or(ActionError::UnknownSkill(skill))?;

            if skill.target.needs_anchor() && !is_valid_anchor(roster, user, skill.target, target) {
                return Err(ActionError::InvalidTarget { user, target });
            }
            Ok(())
        }
    }
}
