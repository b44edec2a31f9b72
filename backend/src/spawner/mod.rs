//! Entity spawner
//!
//! Once per tick the spawner rolls against `spawn_chance`. On success it
//! picks a zone uniformly and, if the zone has room, introduces one new
//! entity off-screen on the side it will walk in from. At most once per
//! session the roll instead produces the paired vignette, provided the
//! zone drawn for it has room for two; otherwise the vignette stays
//! pending and the tick falls back to a normal spawn.
//!
//! # Key Principles
//!
//! 1. **Determinism**: every roll comes from the session RNG, in a fixed order
//! 2. **Capacity**: a full zone aborts the attempt; there is no retry until next tick
//! 3. **Cosmetics are inert**: item kind and scale never reach scoring
//!
//! # Example
//!
//! ```
//! use surveillance_core::spawner::{EntitySpawner, SpawnOutcome};
//! use surveillance_core::{Archetype, EventLog, RngManager, SessionConfig, SessionState};
//!
//! let config = SessionConfig::default();
//! let spawner = EntitySpawner::new(&config);
//! let mut state = SessionState::new(config.zone_count);
//! let mut rng = RngManager::new(42);
//! let mut log = EventLog::new();
//!
//! let id = spawner.spawn_entity(&mut state, &mut rng, 0, Archetype::Adversarial, 1, 0, &mut log);
//! let thief = state.entity(id).unwrap();
//! assert!(thief.action_timer >= config.motion.adversarial_dwell_min);
//! ```

use crate::models::{
    Archetype, Entity, EntityId, EntityState, Event, EventLog, ItemKind, SessionState,
    VignetteRole, ZoneId,
};
use crate::orchestrator::config::{
    MotionTuning, SessionConfig, TrackGeometry, VignetteConfig,
};
use crate::rng::RngManager;
use tracing::debug;

const SCALE_MIN: f32 = 0.85;
const SCALE_MAX: f32 = 1.15;

/// What a spawn attempt did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnOutcome {
    /// The per-tick roll failed
    Skipped,
    /// The chosen zone had no room
    ZoneFull(ZoneId),
    Spawned(EntityId),
    Vignette { suitor: EntityId, beloved: EntityId },
}

/// Introduces new entities into the scene
#[derive(Debug, Clone)]
pub struct EntitySpawner {
    spawn_chance: f64,
    zone_count: usize,
    max_per_zone: usize,
    lanes_per_zone: usize,
    weights: [u32; 4],
    motion: MotionTuning,
    track: TrackGeometry,
    vignette: VignetteConfig,
}

impl EntitySpawner {
    pub fn new(config: &SessionConfig) -> Self {
        Self {
            spawn_chance: config.spawn_chance,
            zone_count: config.zone_count,
            max_per_zone: config.max_entities_per_zone,
            lanes_per_zone: config.lanes_per_zone,
            weights: config.archetype_weights.as_array(),
            motion: config.motion,
            track: config.track,
            vignette: config.vignette,
        }
    }

    /// Run one tick's spawn attempt
    pub fn run(
        &self,
        state: &mut SessionState,
        rng: &mut RngManager,
        tick: u64,
        log: &mut EventLog,
    ) -> SpawnOutcome {
        if !rng.chance(self.spawn_chance) {
            return SpawnOutcome::Skipped;
        }

        if self.vignette.enabled && !state.vignette_spawned() && rng.chance(self.vignette.chance) {
            let zone = rng.index(self.zone_count);
            if state.zone_population(zone) + 2 <= self.max_per_zone {
                let (suitor, beloved) = self.spawn_vignette(state, zone, tick, log);
                return SpawnOutcome::Vignette { suitor, beloved };
            }
            // No room for the pair; the vignette stays pending and this tick spawns normally.
            debug!(tick, zone, "vignette_deferred");
        }

        let zone = rng.index(self.zone_count);
        if state.zone_population(zone) >= self.max_per_zone {
            debug!(tick, zone, "spawn_zone_full");
            return SpawnOutcome::ZoneFull(zone);
        }

        let archetype = match rng.weighted_index(&self.weights) {
            Some(idx) => Archetype::ALL[idx],
            None => Archetype::Neutral,
        };
        let direction = if rng.chance(0.5) { 1 } else { -1 };
        SpawnOutcome::Spawned(self.spawn_entity(state, rng, zone, archetype, direction, tick, log))
    }

    /// Build and insert one entity of `archetype` walking in `direction`
    /// (non-negative means left to right)
    #[allow(clippy::too_many_arguments)]
    pub fn spawn_entity(
        &self,
        state: &mut SessionState,
        rng: &mut RngManager,
        zone: ZoneId,
        archetype: Archetype,
        direction: i8,
        tick: u64,
        log: &mut EventLog,
    ) -> EntityId {
        let direction: i8 = if direction >= 0 { 1 } else { -1 };

        let (speed, action_timer) = match archetype {
            Archetype::Adversarial => (
                rng.range_f32(self.motion.adversarial_speed_min, self.motion.adversarial_speed_max),
                rng.range_inclusive(
                    self.motion.adversarial_dwell_min,
                    self.motion.adversarial_dwell_max,
                ),
            ),
            other => (self.motion.base_speed(other), 0),
        };

        let item = ItemKind::ALL[rng.index(ItemKind::ALL.len())];
        let scale = rng.range_f32(SCALE_MIN, SCALE_MAX);

        let id = state.allocate_id();
        let lane = self.free_lane(state, zone, id);
        let entity = Entity::new(
            id,
            archetype,
            zone,
            lane,
            direction,
            self.track.start_position(direction),
            speed,
            action_timer,
        )
        .with_cosmetics(item, scale);
        state.insert_entity(entity);

        debug!(
            tick,
            entity_id = id,
            archetype = archetype.as_str(),
            zone,
            lane,
            direction,
            "entity_spawned"
        );
        log.log(Event::EntitySpawned {
            tick,
            entity_id: id,
            archetype,
            zone,
            lane,
            direction,
        });
        id
    }

    fn spawn_vignette(
        &self,
        state: &mut SessionState,
        zone: ZoneId,
        tick: u64,
        log: &mut EventLog,
    ) -> (EntityId, EntityId) {
        let suitor_id = state.allocate_id();
        let beloved_id = state.allocate_id();

        let suitor = Entity::new(
            suitor_id,
            Archetype::Neutral,
            zone,
            self.free_lane(state, zone, suitor_id),
            1,
            self.track.start_position(1),
            self.vignette.walk_speed,
            0,
        )
        .into_vignette(VignetteRole::Suitor, beloved_id);
        state.insert_entity(suitor);

        let beloved = Entity::new(
            beloved_id,
            Archetype::Neutral,
            zone,
            self.free_lane(state, zone, beloved_id),
            -1,
            self.track.start_position(-1),
            self.vignette.walk_speed,
            0,
        )
        .into_vignette(VignetteRole::Beloved, suitor_id);
        state.insert_entity(beloved);
        state.mark_vignette_spawned();

        debug!(tick, zone, suitor_id, beloved_id, "vignette_spawned");
        log.log(Event::VignetteSpawned {
            tick,
            suitor_id,
            beloved_id,
            zone,
        });
        (suitor_id, beloved_id)
    }

    /// Lowest lane not occupied in `zone`; falls back to `id % lanes` when all are taken
    fn free_lane(&self, state: &SessionState, zone: ZoneId, id: EntityId) -> usize {
        let mut used = vec![false; self.lanes_per_zone];
        for e in state.entities_in_zone(zone) {
            if e.state != EntityState::Removed && e.lane < used.len() {
                used[e.lane] = true;
            }
        }
        used.iter()
            .position(|taken| !taken)
            .unwrap_or((id % self.lanes_per_zone as u64) as usize)
    }
}
