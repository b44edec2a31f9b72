//! Orchestrator - session configuration, tick loop and presentation snapshot
//!
//! See `engine.rs` for the tick loop.

pub mod config;
pub mod engine;
pub mod snapshot;

// Re-export main types for convenience
pub use config::{
    ArchetypeWeights, ConfigError, FailureLimits, MotionTuning, OutageConfig, PayoutRates,
    SessionConfig, TrackGeometry, VignetteConfig,
};
pub use engine::{CompletionHandler, Session, SessionError, SessionStatus, TickResult};
pub use snapshot::{EntityView, OutageView, SessionSnapshot, SnapshotStatus};
