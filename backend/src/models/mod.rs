//! Domain models for the surveillance engine

pub mod entity;
pub mod event;
pub mod outage;
pub mod state;

// Re-exports
pub use entity::{
    Archetype, Entity, EntityFlags, EntityId, EntityState, ItemKind, PayloadStatus, VignetteRole,
    ZoneId,
};
pub use event::{EndCause, Event, EventLog};
pub use outage::ZoneOutage;
pub use state::{FailureKind, ScoreBoard, SessionState};
