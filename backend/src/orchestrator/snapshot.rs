//! Read-only snapshot of a session for the presentation layer
//!
//! A renderer subscribes by calling [`Session::snapshot`] after each tick.
//! Entities inside a dark zone are still listed (they keep moving) but are
//! flagged not visible so the renderer can draw static instead.

use crate::models::{Archetype, EntityId, EntityState, ItemKind, ZoneId};
use crate::orchestrator::engine::{Session, SessionError, SessionStatus};
use serde::Serialize;

/// One entity as the renderer sees it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntityView {
    pub id: EntityId,
    pub archetype: Archetype,
    pub zone: ZoneId,
    pub position: f32,
    pub lane: usize,
    pub direction: i8,
    pub state: EntityState,
    pub item: ItemKind,
    pub scale: f32,
    /// False while the entity's zone is blacked out
    pub visible: bool,
    /// Whether a `select` on this entity could currently have any effect
    pub selectable: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OutageView {
    pub zone: ZoneId,
    pub remaining_ticks: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SnapshotStatus {
    Running,
    Won,
    Lost,
    Cancelled,
}

/// Complete presentation view of a session at one tick
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSnapshot {
    pub session_id: String,
    pub config_hash: String,
    pub tick: u64,
    pub time_remaining: u32,
    pub seconds_remaining: u64,
    pub status: SnapshotStatus,
    pub successes: u32,
    pub items_lost: u32,
    pub wrongful_actions: u32,
    pub entities: Vec<EntityView>,
    pub outages: Vec<OutageView>,
}

impl SessionSnapshot {
    pub(crate) fn capture(session: &Session) -> Self {
        let state = session.state();
        let running = !session.is_finished();

        let entities = state
            .entities()
            .map(|e| {
                let visible = !state.is_zone_dark(e.zone);
                EntityView {
                    id: e.id,
                    archetype: e.archetype,
                    zone: e.zone,
                    position: e.position,
                    lane: e.lane,
                    direction: e.direction,
                    state: e.state,
                    item: e.item,
                    scale: e.scale,
                    visible,
                    selectable: running
                        && visible
                        && !e.is_vignette()
                        && e.state != EntityState::Resolved
                        && e.state != EntityState::Exiting
                        && e.state != EntityState::Removed
                        && !(e.flags.penalized && !e.archetype.is_adversarial()),
                }
            })
            .collect();

        let outages = state
            .outages()
            .map(|o| OutageView {
                zone: o.zone,
                remaining_ticks: o.remaining_ticks,
            })
            .collect();

        let status = match session.status() {
            SessionStatus::Running => SnapshotStatus::Running,
            SessionStatus::Ended(outcome) if outcome.won => SnapshotStatus::Won,
            SessionStatus::Ended(_) => SnapshotStatus::Lost,
            SessionStatus::Cancelled => SnapshotStatus::Cancelled,
        };

        let score = state.score();
        SessionSnapshot {
            session_id: session.id().to_string(),
            config_hash: session.config_hash().to_string(),
            tick: session.current_tick(),
            time_remaining: session.time_remaining(),
            seconds_remaining: session.clock().seconds_remaining(),
            status,
            successes: score.successes,
            items_lost: score.items_lost,
            wrongful_actions: score.wrongful_actions,
            entities,
            outages,
        }
    }

    /// Entities the player can currently see
    pub fn visible_entities(&self) -> impl Iterator<Item = &EntityView> {
        self.entities.iter().filter(|e| e.visible)
    }

    pub fn to_json(&self) -> Result<String, SessionError> {
        serde_json::to_string(self)
            .map_err(|e| SessionError::Serialization(format!("Snapshot serialization failed: {}", e)))
    }
}
