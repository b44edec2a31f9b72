//! Paired vignette sub-machine
//!
//! ```text
//! entering --(partner within proximity)--> proposing (suitor) / reacting (beloved)
//! proposing --(dwell elapsed)--> heartbroken   [turns around, slow]
//! reacting  --(dwell elapsed)--> rejecting     [turns around, fast]
//! heartbroken / rejecting --(past edge)--> exiting --> removed
//! ```
//!
//! The suitor is always the one turned down. Vignette actors never touch
//! the score board.

use crate::models::{Entity, EntityState, Event, EventLog, SessionState, VignetteRole};
use crate::orchestrator::config::VignetteConfig;
use tracing::debug;

/// Stop both actors once they are close enough to talk
pub(crate) fn pair_up(state: &mut SessionState, cfg: &VignetteConfig, tick: u64, log: &mut EventLog) {
    let suitors: Vec<(u64, u64, f32)> = state
        .entities()
        .filter(|e| e.vignette_role == Some(VignetteRole::Suitor) && e.state == EntityState::Entering)
        .filter_map(|e| e.pair_id.map(|partner| (e.id, partner, e.position)))
        .collect();

    for (suitor_id, beloved_id, suitor_pos) in suitors {
        let Some(beloved) = state.entity(beloved_id) else {
            continue;
        };
        if beloved.state != EntityState::Entering {
            continue;
        }
        // The suitor walks left to right, so crossing also counts as meeting.
        let gap = beloved.position - suitor_pos;
        if gap > cfg.proximity {
            continue;
        }

        if let Some(suitor) = state.entity_mut(suitor_id) {
            suitor.state = EntityState::Proposing;
            suitor.action_timer = cfg.dwell_ticks;
        }
        if let Some(beloved) = state.entity_mut(beloved_id) {
            beloved.state = EntityState::Reacting;
            beloved.action_timer = cfg.dwell_ticks;
        }
        debug!(tick, suitor_id, beloved_id, "vignette_met");
        log.log(Event::VignetteMet {
            tick,
            suitor_id,
            beloved_id,
        });
    }
}

/// End the conversation: both turn back the way they came
pub(crate) fn retreat(entity: &mut Entity, cfg: &VignetteConfig) {
    entity.turn_around();
    match entity.vignette_role {
        Some(VignetteRole::Suitor) => {
            entity.state = EntityState::Heartbroken;
            entity.speed = cfg.heartbroken_speed;
        }
        Some(VignetteRole::Beloved) => {
            entity.state = EntityState::Rejecting;
            entity.speed = cfg.rejecting_speed;
        }
        None => {
            debug_assert!(false, "retreat called on a non-vignette entity");
            entity.state = EntityState::Exiting;
        }
    }
}
