//! Interaction gate
//!
//! `select` is the only operation the player can trigger. Guards are checked
//! in order and short-circuit; a guarded call is a silent no-op reported as
//! [`SelectOutcome::Ignored`].
//!
//! # Critical Invariants
//!
//! 1. **Exactly-once penalty**: one entity can cost at most one wrongful action
//! 2. **No double resolution**: a resolved entity is never scored again
//! 3. **Outage opacity**: nothing in a dark zone can be selected
//! 4. **Vignette isolation**: vignette actors never reach the score board
//! 5. **No synchronous removal**: resolved entities stay until the hold delay elapses

use crate::models::{
    Entity, EntityId, EntityState, Event, EventLog, FailureKind, PayloadStatus, SessionState,
};
use crate::orchestrator::config::SessionConfig;
use serde::Serialize;
use tracing::debug;

/// Why a `select` call had no effect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IgnoreReason {
    /// The session is over (or was cancelled)
    SessionOver,
    /// No live entity with that id
    NotFound,
    /// The entity's zone is blacked out
    ZoneDark,
    /// The entity was already caught
    AlreadyResolved,
    /// Vignette actors cannot be selected
    Vignette,
    /// An innocent that was already penalized for and scared off
    AlreadyPenalized,
}

/// What a `select` call did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "outcome")]
pub enum SelectOutcome {
    Ignored { reason: IgnoreReason },
    /// Legitimate catch; `recovered` is true once the goods are secured
    Resolved { recovered: bool },
    /// Wrongful action charged; the entity is now fleeing
    Penalized,
    /// An adversary that was already penalized for was scared off again, no new charge
    Scared,
}

impl SelectOutcome {
    pub fn is_ignored(&self) -> bool {
        matches!(self, SelectOutcome::Ignored { .. })
    }

    fn ignored(reason: IgnoreReason) -> Self {
        SelectOutcome::Ignored { reason }
    }
}

/// Validates and applies player selections
#[derive(Debug, Clone)]
pub struct InteractionGate {
    flee_multiplier: f32,
    resolved_hold_ticks: u32,
}

impl InteractionGate {
    pub fn new(config: &SessionConfig) -> Self {
        Self {
            flee_multiplier: config.motion.flee_multiplier,
            resolved_hold_ticks: config.resolved_hold_ticks,
        }
    }

    /// Apply a selection of `entity_id`.
    ///
    /// The "session over" guard belongs to the caller; by the time this runs
    /// the session is known to be live.
    pub fn select(
        &self,
        state: &mut SessionState,
        entity_id: EntityId,
        tick: u64,
        log: &mut EventLog,
    ) -> SelectOutcome {
        let Some(entity) = state.entity(entity_id) else {
            return SelectOutcome::ignored(IgnoreReason::NotFound);
        };
        // Exiting entities are already off-screen and swept next tick.
        if matches!(entity.state, EntityState::Exiting | EntityState::Removed) {
            return SelectOutcome::ignored(IgnoreReason::NotFound);
        }
        if state.is_zone_dark(entity.zone) {
            return SelectOutcome::ignored(IgnoreReason::ZoneDark);
        }
        if entity.state == EntityState::Resolved {
            return SelectOutcome::ignored(IgnoreReason::AlreadyResolved);
        }
        if entity.is_vignette() {
            return SelectOutcome::ignored(IgnoreReason::Vignette);
        }

        let archetype = entity.archetype;
        let catchable = entity.is_catchable();
        let already_penalized = entity.flags.penalized;

        if catchable {
            let recovered = self.resolve(state, entity_id);
            state.score_mut().record_success();
            debug!(tick, entity_id, recovered, "entity_resolved");
            log.log(Event::EntityResolved {
                tick,
                entity_id,
                recovered,
            });
            return SelectOutcome::Resolved { recovered };
        }

        if !archetype.is_adversarial() && already_penalized {
            return SelectOutcome::ignored(IgnoreReason::AlreadyPenalized);
        }

        if let Some(entity) = state.entity_mut(entity_id) {
            self.scare_off(entity);
        }

        if already_penalized {
            debug!(tick, entity_id, "entity_scared");
            log.log(Event::EntityScared { tick, entity_id });
            return SelectOutcome::Scared;
        }

        if let Some(entity) = state.entity_mut(entity_id) {
            entity.flags.penalized = true;
        }
        state.score_mut().record_failure(FailureKind::WrongfulActions);
        debug!(
            tick,
            entity_id,
            archetype = archetype.as_str(),
            wrongful_actions = state.score().wrongful_actions,
            "wrongful_action"
        );
        log.log(Event::WrongfulAction {
            tick,
            entity_id,
            archetype,
        });
        SelectOutcome::Penalized
    }

    /// Mark caught; returns true if the goods were secured
    fn resolve(&self, state: &mut SessionState, entity_id: EntityId) -> bool {
        let Some(entity) = state.entity_mut(entity_id) else {
            return false;
        };
        entity.state = EntityState::Resolved;
        entity.action_timer = self.resolved_hold_ticks;
        let recovered = matches!(
            entity.payload,
            Some(PayloadStatus::Untouched) | Some(PayloadStatus::Taken)
        );
        if recovered {
            entity.payload = Some(PayloadStatus::Recovered);
        }
        recovered
    }

    /// Send the entity running for the far edge. Speed is boosted only once.
    fn scare_off(&self, entity: &mut Entity) {
        if entity.state == EntityState::Fleeing {
            return;
        }
        entity.state = EntityState::Fleeing;
        entity.speed *= self.flee_multiplier;
    }
}
