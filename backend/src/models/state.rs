//! Session state
//!
//! Everything the running session mutates lives here: the live entities,
//! the active zone outages and the score counters.
//!
//! # Critical Invariants
//!
//! 1. **Unique ids**: entity ids are allocated from a monotonic counter and never reused
//! 2. **One outage per zone**: `outages` is keyed by zone
//! 3. **Monotonic counters**: the score board only ever increments
//! 4. **One vignette**: `vignette_spawned` flips false → true at most once

use crate::models::entity::{Entity, EntityId, EntityState, ZoneId};
use crate::models::outage::ZoneOutage;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Independent failure counters, each with its own configured maximum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Stolen goods carried out of a zone
    ItemsLost,
    /// The player acted on someone who was not (yet) doing anything wrong
    WrongfulActions,
}

impl FailureKind {
    /// Evaluation order when several limits are reached on the same tick
    pub const ALL: [FailureKind; 2] = [FailureKind::ItemsLost, FailureKind::WrongfulActions];

    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::ItemsLost => "items_lost",
            FailureKind::WrongfulActions => "wrongful_actions",
        }
    }
}

/// Success and failure counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScoreBoard {
    pub successes: u32,
    pub items_lost: u32,
    pub wrongful_actions: u32,
}

impl ScoreBoard {
    pub fn failures(&self, kind: FailureKind) -> u32 {
        match kind {
            FailureKind::ItemsLost => self.items_lost,
            FailureKind::WrongfulActions => self.wrongful_actions,
        }
    }

    pub fn total_failures(&self) -> u32 {
        self.items_lost + self.wrongful_actions
    }

    pub(crate) fn record_failure(&mut self, kind: FailureKind) {
        match kind {
            FailureKind::ItemsLost => self.items_lost += 1,
            FailureKind::WrongfulActions => self.wrongful_actions += 1,
        }
    }

    pub(crate) fn record_success(&mut self) {
        self.successes += 1;
    }
}

/// Mutable state of one session
///
/// # Example
///
/// ```rust
/// use surveillance_core::{Archetype, Entity, SessionState};
///
/// let mut state = SessionState::new(4);
/// let id = state.allocate_id();
/// state.insert_entity(Entity::new(id, Archetype::Neutral, 2, 0, 1, -8.0, 0.8, 0));
///
/// assert_eq!(state.zone_population(2), 1);
/// assert!(state.begin_outage(2, 40));
/// assert!(state.is_zone_dark(2));
/// assert!(!state.begin_outage(2, 40));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionState {
    zone_count: usize,
    entities: BTreeMap<EntityId, Entity>,
    outages: BTreeMap<ZoneId, ZoneOutage>,
    score: ScoreBoard,
    next_entity_id: EntityId,
    vignette_spawned: bool,
}

impl SessionState {
    pub fn new(zone_count: usize) -> Self {
        Self {
            zone_count,
            entities: BTreeMap::new(),
            outages: BTreeMap::new(),
            score: ScoreBoard::default(),
            next_entity_id: 1,
            vignette_spawned: false,
        }
    }

    pub fn zone_count(&self) -> usize {
        self.zone_count
    }

    // ========================================================================
    // Entities
    // ========================================================================

    /// Reserve the next entity id
    pub fn allocate_id(&mut self) -> EntityId {
        let id = self.next_entity_id;
        self.next_entity_id += 1;
        id
    }

    /// Add an entity. Its id must come from [`SessionState::allocate_id`].
    pub fn insert_entity(&mut self, entity: Entity) {
        debug_assert!(entity.zone < self.zone_count, "entity zone out of range");
        debug_assert!(
            !self.entities.contains_key(&entity.id),
            "entity id {} reused",
            entity.id
        );
        self.entities.insert(entity.id, entity);
    }

    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    pub fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(&id)
    }

    /// Live entities in id order
    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values()
    }

    pub(crate) fn entities_mut(&mut self) -> impl Iterator<Item = &mut Entity> {
        self.entities.values_mut()
    }

    pub fn entity_ids(&self) -> Vec<EntityId> {
        self.entities.keys().copied().collect()
    }

    pub fn num_entities(&self) -> usize {
        self.entities.len()
    }

    pub fn entities_in_zone(&self, zone: ZoneId) -> impl Iterator<Item = &Entity> {
        self.entities.values().filter(move |e| e.zone == zone)
    }

    /// Entities occupying capacity in `zone`
    pub fn zone_population(&self, zone: ZoneId) -> usize {
        self.entities_in_zone(zone)
            .filter(|e| e.state != EntityState::Removed)
            .count()
    }

    /// Drop every entity in the `Removed` state, returning their ids
    pub(crate) fn sweep_removed(&mut self) -> Vec<EntityId> {
        let removed: Vec<EntityId> = self
            .entities
            .values()
            .filter(|e| e.state == EntityState::Removed)
            .map(|e| e.id)
            .collect();
        for id in &removed {
            self.entities.remove(id);
        }
        removed
    }

    // ========================================================================
    // Outages
    // ========================================================================

    /// Blind `zone` for `duration_ticks`. Returns false if it is already dark.
    pub fn begin_outage(&mut self, zone: ZoneId, duration_ticks: u32) -> bool {
        if self.outages.contains_key(&zone) || duration_ticks == 0 {
            return false;
        }
        self.outages.insert(zone, ZoneOutage::new(zone, duration_ticks));
        true
    }

    pub fn is_zone_dark(&self, zone: ZoneId) -> bool {
        self.outages.contains_key(&zone)
    }

    pub fn outage(&self, zone: ZoneId) -> Option<&ZoneOutage> {
        self.outages.get(&zone)
    }

    pub fn outages(&self) -> impl Iterator<Item = &ZoneOutage> {
        self.outages.values()
    }

    /// Count every outage down one tick and drop the expired ones
    pub(crate) fn tick_outages(&mut self) -> Vec<ZoneId> {
        let mut expired = Vec::new();
        for (zone, outage) in self.outages.iter_mut() {
            if outage.tick() {
                expired.push(*zone);
            }
        }
        for zone in &expired {
            self.outages.remove(zone);
        }
        expired
    }

    // ========================================================================
    // Score
    // ========================================================================

    pub fn score(&self) -> &ScoreBoard {
        &self.score
    }

    pub(crate) fn score_mut(&mut self) -> &mut ScoreBoard {
        &mut self.score
    }

    pub fn vignette_spawned(&self) -> bool {
        self.vignette_spawned
    }

    pub(crate) fn mark_vignette_spawned(&mut self) {
        debug_assert!(!self.vignette_spawned, "vignette spawned twice");
        self.vignette_spawned = true;
    }
}
