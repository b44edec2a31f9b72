//! Surveillance Mini-Game Engine
//!
//! Deterministic, tick-driven simulation behind the "watch the cameras"
//! arcade sequence: actors walk through camera zones, thieves stop to steal
//! and then run, cameras drop out now and then, and the player has to catch
//! the thieves in the act without harassing anyone innocent.
//!
//! # Architecture
//!
//! - **core**: Session countdown clock and wall-clock pacing
//! - **models**: Domain types (Entity, ZoneOutage, SessionState, Event)
//! - **spawner**: Probabilistic entity introduction, including the one-off vignette
//! - **behavior**: Per-tick entity state machines
//! - **distraction**: Zone outages
//! - **interaction**: The `select` gate
//! - **outcome**: Win/lose evaluation, payout and message
//! - **orchestrator**: Configuration, the tick loop and snapshots
//! - **rng**: Deterministic random number generation
//!
//! # Critical Invariants
//!
//! 1. All randomness is deterministic (seeded RNG)
//! 2. Counters change exactly once per qualifying event
//! 3. A session settles at most once and never after cancellation

// Module declarations
pub mod behavior;
pub mod core;
pub mod distraction;
pub mod interaction;
pub mod models;
pub mod orchestrator;
pub mod outcome;
pub mod rng;
pub mod spawner;

// Re-exports for convenience
pub use crate::core::pacing::TickPacer;
pub use crate::core::time::SessionClock;
pub use interaction::{IgnoreReason, SelectOutcome};
pub use models::{
    Archetype, EndCause, Entity, EntityId, EntityState, Event, EventLog, FailureKind,
    PayloadStatus, ScoreBoard, SessionState, VignetteRole, ZoneId, ZoneOutage,
};
pub use orchestrator::{
    ArchetypeWeights, CompletionHandler, ConfigError, EntityView, FailureLimits, MotionTuning,
    OutageConfig, OutageView, PayoutRates, Session, SessionConfig, SessionError, SessionSnapshot,
    SessionStatus, SnapshotStatus, TickResult, TrackGeometry, VignetteConfig,
};
pub use outcome::SessionOutcome;
pub use rng::RngManager;

// FFI module (when feature enabled)
#[cfg(feature = "python")]
pub mod ffi;

#[cfg(feature = "python")]
use pyo3::prelude::*;

#[cfg(feature = "python")]
#[pymodule]
fn surveillance_core(_py: Python<'_>, m: &PyModule) -> PyResult<()> {
    m.add_class::<ffi::session::PySession>()?;
    Ok(())
}
