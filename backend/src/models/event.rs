//! Event log for presentation and debugging.
//!
//! Every significant state change in a session is recorded as an [`Event`].
//! The log is read-only telemetry: the presentation layer may use it to
//! drive effects (a flash when a thief is caught, a static burst when a
//! camera drops), but nothing in the engine reads it back.
//!
//! # Example
//!
//! ```rust
//! use surveillance_core::models::{Event, EventLog};
//!
//! let mut log = EventLog::new();
//! log.log(Event::OutageStarted { tick: 12, zone: 1, duration: 60 });
//!
//! assert_eq!(log.events_at_tick(12).len(), 1);
//! assert_eq!(log.events_of_type("OutageStarted").len(), 1);
//! ```

use crate::models::entity::{Archetype, EntityId, ZoneId};
use crate::models::state::FailureKind;
use serde::Serialize;

/// Why a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "cause", content = "counter")]
pub enum EndCause {
    /// The countdown reached zero
    TimeExpired,
    /// A failure counter reached its configured maximum
    FailureLimit(FailureKind),
}

/// Session event. All variants carry the tick on which they happened.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum Event {
    EntitySpawned {
        tick: u64,
        entity_id: EntityId,
        archetype: Archetype,
        zone: ZoneId,
        lane: usize,
        direction: i8,
    },

    /// Both halves of the paired vignette entered the zone
    VignetteSpawned {
        tick: u64,
        suitor_id: EntityId,
        beloved_id: EntityId,
        zone: ZoneId,
    },

    /// Vignette actors met in the middle
    VignetteMet {
        tick: u64,
        suitor_id: EntityId,
        beloved_id: EntityId,
    },

    DwellStarted {
        tick: u64,
        entity_id: EntityId,
    },

    /// An adversary finished stealing and started running
    PayloadTaken {
        tick: u64,
        entity_id: EntityId,
        zone: ZoneId,
    },

    /// An adversary got away with the goods
    ItemLost {
        tick: u64,
        entity_id: EntityId,
        zone: ZoneId,
    },

    EntityRemoved {
        tick: u64,
        entity_id: EntityId,
    },

    OutageStarted {
        tick: u64,
        zone: ZoneId,
        duration: u32,
    },

    OutageEnded {
        tick: u64,
        zone: ZoneId,
    },

    /// A legitimate catch
    EntityResolved {
        tick: u64,
        entity_id: EntityId,
        recovered: bool,
    },

    /// The player acted on an entity that was not fair game
    WrongfulAction {
        tick: u64,
        entity_id: EntityId,
        archetype: Archetype,
    },

    /// An entity was scared off without a new penalty
    EntityScared {
        tick: u64,
        entity_id: EntityId,
    },

    SessionEnded {
        tick: u64,
        won: bool,
        cause: EndCause,
        payout: i64,
    },
}

impl Event {
    /// Tick on which this event happened
    pub fn tick(&self) -> u64 {
        match self {
            Event::EntitySpawned { tick, .. }
            | Event::VignetteSpawned { tick, .. }
            | Event::VignetteMet { tick, .. }
            | Event::DwellStarted { tick, .. }
            | Event::PayloadTaken { tick, .. }
            | Event::ItemLost { tick, .. }
            | Event::EntityRemoved { tick, .. }
            | Event::OutageStarted { tick, .. }
            | Event::OutageEnded { tick, .. }
            | Event::EntityResolved { tick, .. }
            | Event::WrongfulAction { tick, .. }
            | Event::EntityScared { tick, .. }
            | Event::SessionEnded { tick, .. } => *tick,
        }
    }

    /// Variant name, for filtering
    pub fn event_type(&self) -> &'static str {
        match self {
            Event::EntitySpawned { .. } => "EntitySpawned",
            Event::VignetteSpawned { .. } => "VignetteSpawned",
            Event::VignetteMet { .. } => "VignetteMet",
            Event::DwellStarted { .. } => "DwellStarted",
            Event::PayloadTaken { .. } => "PayloadTaken",
            Event::ItemLost { .. } => "ItemLost",
            Event::EntityRemoved { .. } => "EntityRemoved",
            Event::OutageStarted { .. } => "OutageStarted",
            Event::OutageEnded { .. } => "OutageEnded",
            Event::EntityResolved { .. } => "EntityResolved",
            Event::WrongfulAction { .. } => "WrongfulAction",
            Event::EntityScared { .. } => "EntityScared",
            Event::SessionEnded { .. } => "SessionEnded",
        }
    }

    /// Entity this event concerns, if any
    pub fn entity_id(&self) -> Option<EntityId> {
        match self {
            Event::EntitySpawned { entity_id, .. }
            | Event::DwellStarted { entity_id, .. }
            | Event::PayloadTaken { entity_id, .. }
            | Event::ItemLost { entity_id, .. }
            | Event::EntityRemoved { entity_id, .. }
            | Event::EntityResolved { entity_id, .. }
            | Event::WrongfulAction { entity_id, .. }
            | Event::EntityScared { entity_id, .. } => Some(*entity_id),
            _ => None,
        }
    }
}

/// Append-only event log
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Vec<Event>,
}

impl EventLog {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn log(&mut self, event: Event) {
        self.events.push(event);
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn events_at_tick(&self, tick: u64) -> Vec<&Event> {
        self.events.iter().filter(|e| e.tick() == tick).collect()
    }

    pub fn events_of_type(&self, event_type: &str) -> Vec<&Event> {
        self.events
            .iter()
            .filter(|e| e.event_type() == event_type)
            .collect()
    }

    pub fn events_for_entity(&self, entity_id: EntityId) -> Vec<&Event> {
        self.events
            .iter()
            .filter(|e| e.entity_id() == Some(entity_id))
            .collect()
    }

    /// Events logged at or after `tick` (incremental polling by a renderer)
    pub fn events_since(&self, tick: u64) -> &[Event] {
        let start = self.events.partition_point(|e| e.tick() < tick);
        &self.events[start..]
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}
