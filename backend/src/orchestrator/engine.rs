//! Session engine
//!
//! Owns all state of one mini-game run and drives it tick by tick:
//!
//! ```text
//! advance():
//! 1. Decrement the countdown; if it hit zero, skip to step 5
//! 2. Spawner        (maybe introduce an entity or the vignette)
//! 3. Behavior       (move entities, run timers, count escapes, sweep removals)
//! 4. Distraction    (expire and maybe start zone outages)
//! 5. Outcome        (failure limits first, then time) → settle once
//! ```
//!
//! `select()` calls from the host are applied in full between two
//! `advance()` calls; `&mut self` makes that atomic by construction.
//!
//! # Example
//!
//! ```rust
//! use surveillance_core::{Session, SessionConfig};
//!
//! let config = SessionConfig {
//!     duration_ticks: 100,
//!     ..SessionConfig::default()
//! };
//! let mut payouts = Vec::new();
//! let mut session = Session::new(config).unwrap();
//!
//! while !session.is_finished() {
//!     session.advance();
//! }
//!
//! let outcome = session.outcome().unwrap();
//! payouts.push(outcome.payout);
//! assert_eq!(payouts.len(), 1);
//! ```

use crate::behavior::BehaviorResolver;
use crate::core::time::SessionClock;
use crate::distraction::DistractionManager;
use crate::interaction::{IgnoreReason, InteractionGate, SelectOutcome};
use crate::models::{EndCause, EntityId, Event, EventLog, SessionState};
use crate::orchestrator::config::{ConfigError, SessionConfig};
use crate::orchestrator::snapshot::SessionSnapshot;
use crate::outcome::{self, SessionOutcome};
use crate::rng::RngManager;
use crate::spawner::{EntitySpawner, SpawnOutcome};
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

/// Errors at the edges of a session (construction, config loading, telemetry export)
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SessionError {
    #[error("Invalid config: {0}")]
    InvalidConfig(#[from] ConfigError),

    #[error("Config parse error: {0}")]
    ConfigParse(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Receives the single terminal result of a session
///
/// Closures `FnMut(i64, &str)` implement this directly.
pub trait CompletionHandler {
    fn on_complete(&mut self, payout: i64, message: &str);
}

impl<F> CompletionHandler for F
where
    F: FnMut(i64, &str),
{
    fn on_complete(&mut self, payout: i64, message: &str) {
        self(payout, message)
    }
}

/// Lifecycle of a session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionStatus {
    Running,
    Ended(SessionOutcome),
    /// Aborted by the host; no outcome was settled
    Cancelled,
}

/// Result of a single `advance()`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickResult {
    /// Tick number after the advance
    pub tick: u64,
    pub time_remaining: u32,
    pub spawn: SpawnOutcome,
    pub items_lost: u32,
    pub removed: usize,
    pub outage_started: bool,
    /// Set on the tick the session ends
    pub outcome: Option<SessionOutcome>,
}

impl TickResult {
    fn idle(tick: u64, time_remaining: u32) -> Self {
        Self {
            tick,
            time_remaining,
            spawn: SpawnOutcome::Skipped,
            items_lost: 0,
            removed: 0,
            outage_started: false,
            outcome: None,
        }
    }
}

/// One run of the surveillance mini-game
pub struct Session {
    id: Uuid,
    config: SessionConfig,
    config_hash: String,
    clock: SessionClock,
    rng: RngManager,
    state: SessionState,
    spawner: EntitySpawner,
    behavior: BehaviorResolver,
    distraction: DistractionManager,
    gate: InteractionGate,
    status: SessionStatus,
    event_log: EventLog,
    completion: Option<Box<dyn CompletionHandler>>,
}

impl Session {
    /// Start a session: full countdown, no entities, no outages
    pub fn new(config: SessionConfig) -> Result<Self, SessionError> {
        config.validate()?;
        let config_hash = config.config_hash()?;
        let id = Uuid::new_v4();

        info!(
            session_id = %id,
            seed = config.rng_seed,
            duration_ticks = config.duration_ticks,
            zones = config.zone_count,
            "session_started"
        );

        Ok(Self {
            id,
            clock: SessionClock::new(config.duration_ticks, config.tick_interval_ms),
            rng: RngManager::new(config.rng_seed),
            state: SessionState::new(config.zone_count),
            spawner: EntitySpawner::new(&config),
            behavior: BehaviorResolver::new(&config),
            distraction: DistractionManager::new(&config),
            gate: InteractionGate::new(&config),
            status: SessionStatus::Running,
            event_log: EventLog::new(),
            completion: None,
            config_hash,
            config,
        })
    }

    /// Register the handler that receives `(payout, message)` when the session ends naturally
    pub fn with_completion_handler(mut self, handler: impl CompletionHandler + 'static) -> Self {
        self.completion = Some(Box::new(handler));
        self
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn config_hash(&self) -> &str {
        &self.config_hash
    }

    pub fn clock(&self) -> &SessionClock {
        &self.clock
    }

    pub fn current_tick(&self) -> u64 {
        self.clock.current_tick()
    }

    pub fn time_remaining(&self) -> u32 {
        self.clock.time_remaining()
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Mutable access to session state for staging test scenarios
    /// (placing entities, forcing outages).
    ///
    /// Only compiled for this crate's tests or with the `test-support`
    /// feature; hosts go through `advance`, `select` and `cancel`.
    #[cfg(any(test, feature = "test-support"))]
    pub fn state_mut(&mut self) -> &mut SessionState {
        &mut self.state
    }

    pub fn status(&self) -> &SessionStatus {
        &self.status
    }

    /// True once an outcome has been settled
    pub fn is_ended(&self) -> bool {
        matches!(self.status, SessionStatus::Ended(_))
    }

    /// True once the session will process nothing more (ended or cancelled)
    pub fn is_finished(&self) -> bool {
        !matches!(self.status, SessionStatus::Running)
    }

    pub fn outcome(&self) -> Option<&SessionOutcome> {
        match &self.status {
            SessionStatus::Ended(outcome) => Some(outcome),
            _ => None,
        }
    }

    pub fn event_log(&self) -> &EventLog {
        &self.event_log
    }

    /// Read-only view for presentation
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot::capture(self)
    }

    // ========================================================================
    // Tick Loop
    // ========================================================================

    /// Advance the simulation by one tick. No-op once finished.
    pub fn advance(&mut self) -> TickResult {
        if self.is_finished() {
            return TickResult::idle(self.clock.current_tick(), self.clock.time_remaining());
        }

        // STEP 1: CLOCK
        self.clock.advance_tick();
        let tick = self.clock.current_tick();
        let mut result = TickResult::idle(tick, self.clock.time_remaining());

        if !self.clock.is_expired() {
            // STEP 2: SPAWN
            result.spawn = self
                .spawner
                .run(&mut self.state, &mut self.rng, tick, &mut self.event_log);

            // STEP 3: BEHAVIOR
            let behavior = self.behavior.run(&mut self.state, tick, &mut self.event_log);
            result.items_lost = behavior.items_lost;
            result.removed = behavior.removed.len();

            // STEP 4: DISTRACTION
            let distraction =
                self.distraction
                    .run(&mut self.state, &mut self.rng, tick, &mut self.event_log);
            result.outage_started = distraction.started.is_some();
        }

        // STEP 5: OUTCOME
        if let Some(cause) = outcome::evaluate(
            self.state.score(),
            &self.config.failure_limits,
            self.clock.time_remaining(),
        ) {
            result.outcome = Some(self.finish(cause, tick));
        }

        result
    }

    /// Advance until the session ends, returning the outcome
    pub fn run_to_end(&mut self) -> Option<SessionOutcome> {
        while !self.is_finished() {
            self.advance();
        }
        self.outcome().cloned()
    }

    // ========================================================================
    // Host Operations
    // ========================================================================

    /// Player selected an entity
    pub fn select(&mut self, entity_id: EntityId) -> SelectOutcome {
        if self.is_finished() {
            return SelectOutcome::Ignored {
                reason: IgnoreReason::SessionOver,
            };
        }
        let tick = self.clock.current_tick();
        self.gate
            .select(&mut self.state, entity_id, tick, &mut self.event_log)
    }

    /// Abort without settling. The completion handler is never called.
    pub fn cancel(&mut self) {
        if self.is_finished() {
            return;
        }
        info!(
            session_id = %self.id,
            tick = self.clock.current_tick(),
            "session_cancelled"
        );
        self.status = SessionStatus::Cancelled;
        self.completion = None;
    }

    fn finish(&mut self, cause: EndCause, tick: u64) -> SessionOutcome {
        debug_assert!(!self.is_finished(), "session settled twice");

        let settled = outcome::settle(cause, *self.state.score(), &self.config.payout);
        info!(
            session_id = %self.id,
            tick,
            won = settled.won,
            payout = settled.payout,
            successes = settled.score.successes,
            items_lost = settled.score.items_lost,
            wrongful_actions = settled.score.wrongful_actions,
            "session_ended"
        );
        self.event_log.log(Event::SessionEnded {
            tick,
            won: settled.won,
            cause,
            payout: settled.payout,
        });
        self.status = SessionStatus::Ended(settled.clone());

        if let Some(mut handler) = self.completion.take() {
            debug!(session_id = %self.id, "completion_handler_invoked");
            handler.on_complete(settled.payout, &settled.message);
        }
        settled
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.id)
            .field("current_tick", &self.clock.current_tick())
            .field("time_remaining", &self.clock.time_remaining())
            .field("num_entities", &self.state.num_entities())
            .field("score", self.state.score())
            .field("status", &self.status)
            .finish()
    }
}
