//! Entity behavior resolver
//!
//! Advances every live entity one tick through its state machine:
//!
//! ```text
//! entering --(midpoint, archetype dwells, first time)--> dwelling
//! entering --(past far edge)--------------------------> exiting
//! dwelling --(timer 0, adversarial)-------------------> fleeing   [payload taken, speed × flee]
//! dwelling --(timer 0, benign)------------------------> entering
//! fleeing  --(past far edge)--------------------------> exiting   [payload still taken → item lost]
//! resolved --(display hold elapsed)-------------------> removed
//! exiting  ---------------------------------------------> removed
//! ```
//!
//! Vignette actors follow their own sub-machine (see [`vignette`]).
//! Zone outages do not pause anything here: a blacked-out zone keeps
//! moving, it is only hidden from the player.

pub mod vignette;

use crate::models::{
    EntityId, Entity, EntityState, Event, EventLog, FailureKind, PayloadStatus, SessionState,
};
use crate::orchestrator::config::{MotionTuning, SessionConfig, TrackGeometry, VignetteConfig};
use tracing::debug;

/// Summary of one behavior pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BehaviorReport {
    /// Adversaries that left a zone carrying stolen goods this tick
    pub items_lost: u32,
    /// Adversaries that finished stealing this tick
    pub payloads_taken: u32,
    /// Entities dropped from the session this tick
    pub removed: Vec<EntityId>,
}

/// Per-tick state machine driver
#[derive(Debug, Clone)]
pub struct BehaviorResolver {
    motion: MotionTuning,
    track: TrackGeometry,
    vignette: VignetteConfig,
}

impl BehaviorResolver {
    pub fn new(config: &SessionConfig) -> Self {
        Self {
            motion: config.motion,
            track: config.track,
            vignette: config.vignette,
        }
    }

    /// Advance every entity one tick, then pair up vignette actors and sweep removals
    pub fn run(&self, state: &mut SessionState, tick: u64, log: &mut EventLog) -> BehaviorReport {
        let mut report = BehaviorReport::default();

        for entity in state.entities_mut() {
            self.step(entity, tick, log, &mut report);
        }

        for _ in 0..report.items_lost {
            state.score_mut().record_failure(FailureKind::ItemsLost);
        }

        vignette::pair_up(state, &self.vignette, tick, log);

        report.removed = state.sweep_removed();
        for &entity_id in &report.removed {
            debug!(tick, entity_id, "entity_removed");
            log.log(Event::EntityRemoved { tick, entity_id });
        }

        report
    }

    fn step(&self, entity: &mut Entity, tick: u64, log: &mut EventLog, report: &mut BehaviorReport) {
        match entity.state {
            EntityState::Entering => {
                entity.step();
                if !entity.is_vignette()
                    && entity.archetype.dwells()
                    && !entity.flags.has_dwelled
                    && entity.reached(self.track.midpoint())
                {
                    self.begin_dwell(entity, tick, log);
                } else if self.track.has_exited(entity.position, entity.direction) {
                    entity.state = EntityState::Exiting;
                }
            }

            EntityState::Dwelling => {
                if entity.tick_timer() {
                    if entity.archetype.is_adversarial() {
                        entity.state = EntityState::Fleeing;
                        entity.payload = Some(PayloadStatus::Taken);
                        entity.speed *= self.motion.flee_multiplier;
                        report.payloads_taken += 1;
                        debug!(tick, entity_id = entity.id, zone = entity.zone, "payload_taken");
                        log.log(Event::PayloadTaken {
                            tick,
                            entity_id: entity.id,
                            zone: entity.zone,
                        });
                    } else {
                        entity.state = EntityState::Entering;
                    }
                }
            }

            EntityState::Fleeing | EntityState::Heartbroken | EntityState::Rejecting => {
                entity.step();
                if self.track.has_exited(entity.position, entity.direction) {
                    if entity.holds_stolen_goods() {
                        entity.payload = Some(PayloadStatus::Lost);
                        report.items_lost += 1;
                        debug!(tick, entity_id = entity.id, zone = entity.zone, "item_lost");
                        log.log(Event::ItemLost {
                            tick,
                            entity_id: entity.id,
                            zone: entity.zone,
                        });
                    }
                    entity.state = EntityState::Exiting;
                }
            }

            EntityState::Resolved => {
                if entity.tick_timer() {
                    entity.state = EntityState::Removed;
                }
            }

            EntityState::Proposing | EntityState::Reacting => {
                if entity.tick_timer() {
                    vignette::retreat(entity, &self.vignette);
                }
            }

            EntityState::Exiting => {
                entity.state = EntityState::Removed;
            }

            EntityState::Removed => {}
        }
    }

    fn begin_dwell(&self, entity: &mut Entity, tick: u64, log: &mut EventLog) {
        entity.position = self.track.midpoint();
        entity.state = EntityState::Dwelling;
        entity.flags.has_dwelled = true;
        if !entity.archetype.is_adversarial() {
            entity.action_timer = self.motion.maintenance_dwell_ticks;
        }
        log.log(Event::DwellStarted {
            tick,
            entity_id: entity.id,
        });
    }
}
