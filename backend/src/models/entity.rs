//! Entity model
//!
//! An entity is one simulated actor walking through a camera zone. It moves
//! along a one-dimensional track (0.0 at the left edge of the visible area,
//! `track.length` at the right edge) in a fixed lane, and its [`EntityState`]
//! decides both what the behavior resolver does with it each tick and
//! whether the player may act on it.
//!
//! # Archetypes
//!
//! - **Adversarial**: walks in, dwells at the midpoint while stealing, then
//!   flees with the goods. The only archetype a player should ever select.
//! - **Maintenance**: walks in, dwells at the midpoint doing repairs, walks on.
//! - **Authority**: passes straight through, fast.
//! - **Neutral**: passes straight through.
//!
//! Vignette actors are Neutral entities carrying a [`VignetteRole`]; they
//! run their own sub-machine and can never be selected.

use serde::{Deserialize, Serialize};

/// Stable, monotonically allocated entity identifier
pub type EntityId = u64;

/// Index of a camera zone, `0..zone_count`
pub type ZoneId = usize;

/// Behavioral category of an entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Archetype {
    Neutral,
    Adversarial,
    Maintenance,
    Authority,
}

impl Archetype {
    /// All archetypes, in the order used by [`crate::ArchetypeWeights::as_array`]
    pub const ALL: [Archetype; 4] = [
        Archetype::Adversarial,
        Archetype::Maintenance,
        Archetype::Authority,
        Archetype::Neutral,
    ];

    /// Does this archetype stop at the midpoint?
    pub fn dwells(&self) -> bool {
        matches!(self, Archetype::Adversarial | Archetype::Maintenance)
    }

    /// Is this the archetype the player is meant to catch?
    pub fn is_adversarial(&self) -> bool {
        matches!(self, Archetype::Adversarial)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Archetype::Neutral => "neutral",
            Archetype::Adversarial => "adversarial",
            Archetype::Maintenance => "maintenance",
            Archetype::Authority => "authority",
        }
    }
}

/// Role of an entity in the paired vignette
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VignetteRole {
    /// Walks in from the left, proposes, retreats slowly when turned down
    Suitor,
    /// Walks in from the right, hears the proposal, turns and runs
    Beloved,
}

/// Node in an entity's state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityState {
    /// Walking across the zone at normal speed
    Entering,
    /// Stopped at the midpoint, counting down `action_timer`
    Dwelling,
    /// Running for the far edge at flee speed
    Fleeing,
    /// Caught by the player; held on screen for the display delay
    Resolved,
    /// Past the far edge; removed on the next tick
    Exiting,
    /// Terminal
    Removed,
    /// Vignette: suitor pausing in front of the partner
    Proposing,
    /// Vignette: beloved pausing to hear the proposal
    Reacting,
    /// Vignette: suitor walking back the way they came, slowly
    Heartbroken,
    /// Vignette: beloved running back the way they came
    Rejecting,
}

impl EntityState {
    /// States in which position advances each tick
    pub fn is_moving(&self) -> bool {
        matches!(
            self,
            EntityState::Entering
                | EntityState::Fleeing
                | EntityState::Heartbroken
                | EntityState::Rejecting
        )
    }

    /// States in which `action_timer` counts down instead of moving
    pub fn is_holding(&self) -> bool {
        matches!(
            self,
            EntityState::Dwelling
                | EntityState::Resolved
                | EntityState::Proposing
                | EntityState::Reacting
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EntityState::Entering => "entering",
            EntityState::Dwelling => "dwelling",
            EntityState::Fleeing => "fleeing",
            EntityState::Resolved => "resolved",
            EntityState::Exiting => "exiting",
            EntityState::Removed => "removed",
            EntityState::Proposing => "proposing",
            EntityState::Reacting => "reacting",
            EntityState::Heartbroken => "heartbroken",
            EntityState::Rejecting => "rejecting",
        }
    }
}

/// Status of the goods an adversarial entity is after
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayloadStatus {
    /// Still on the shelf
    Untouched,
    /// Stolen and being carried off
    Taken,
    /// Taken back by a successful interaction
    Recovered,
    /// Carried out of the zone
    Lost,
}

/// Cosmetic item drawn with the entity. Never affects scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    Crate,
    CopperCoil,
    FuelDrum,
    Toolbox,
}

impl ItemKind {
    pub const ALL: [ItemKind; 4] = [
        ItemKind::Crate,
        ItemKind::CopperCoil,
        ItemKind::FuelDrum,
        ItemKind::Toolbox,
    ];
}

/// Archetype-specific booleans
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityFlags {
    /// A wrongful-action penalty has already been charged for this entity
    pub penalized: bool,
    /// The entity has already stopped at the midpoint once
    pub has_dwelled: bool,
}

/// One simulated actor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub archetype: Archetype,
    pub zone: ZoneId,
    /// Progress along the traversal axis
    pub position: f32,
    /// Fixed perpendicular lane index
    pub lane: usize,
    /// +1 (left to right) or -1 (right to left)
    pub direction: i8,
    pub state: EntityState,
    /// Distance covered per moving tick
    pub speed: f32,
    /// Countdown for holding states
    pub action_timer: u32,
    /// `Some` only for adversarial entities
    pub payload: Option<PayloadStatus>,
    pub flags: EntityFlags,
    /// Partner id for vignette actors; a lookup key, not ownership
    pub pair_id: Option<EntityId>,
    pub vignette_role: Option<VignetteRole>,
    pub item: ItemKind,
    /// Cosmetic sprite scale
    pub scale: f32,
}

impl Entity {
    /// Create an entity in the `Entering` state
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: EntityId,
        archetype: Archetype,
        zone: ZoneId,
        lane: usize,
        direction: i8,
        position: f32,
        speed: f32,
        action_timer: u32,
    ) -> Self {
        debug_assert!(direction == 1 || direction == -1, "direction must be +1 or -1");
        Self {
            id,
            archetype,
            zone,
            position,
            lane,
            direction,
            state: EntityState::Entering,
            speed,
            action_timer,
            payload: archetype.is_adversarial().then_some(PayloadStatus::Untouched),
            flags: EntityFlags::default(),
            pair_id: None,
            vignette_role: None,
            item: ItemKind::Crate,
            scale: 1.0,
        }
    }

    /// Attach cosmetic variety
    pub fn with_cosmetics(mut self, item: ItemKind, scale: f32) -> Self {
        self.item = item;
        self.scale = scale;
        self
    }

    /// Turn this entity into one half of the paired vignette
    pub fn into_vignette(mut self, role: VignetteRole, partner: EntityId) -> Self {
        self.vignette_role = Some(role);
        self.pair_id = Some(partner);
        self
    }

    pub fn is_vignette(&self) -> bool {
        self.vignette_role.is_some()
    }

    /// Has the forbidden action completed with the goods still unaccounted for?
    pub fn holds_stolen_goods(&self) -> bool {
        self.payload == Some(PayloadStatus::Taken)
    }

    /// Would selecting this entity now be a legitimate catch?
    ///
    /// An adversary is fair game while stealing (dwelling) or while running
    /// off with the goods. One that was scared off early carries nothing and
    /// is not.
    pub fn is_catchable(&self) -> bool {
        self.archetype.is_adversarial()
            && match self.state {
                EntityState::Dwelling => true,
                EntityState::Fleeing => self.holds_stolen_goods(),
                _ => false,
            }
    }

    /// Advance one step along the track
    pub fn step(&mut self) {
        self.position += self.speed * self.direction as f32;
    }

    /// Reverse traversal direction (vignette retreats)
    pub fn turn_around(&mut self) {
        self.direction = -self.direction;
    }

    /// Has the entity reached the middle of the visible range?
    pub fn reached(&self, mark: f32) -> bool {
        if self.direction > 0 {
            self.position >= mark
        } else {
            self.position <= mark
        }
    }

    /// Count the action timer down by one tick; true when it reaches zero
    pub fn tick_timer(&mut self) -> bool {
        self.action_timer = self.action_timer.saturating_sub(1);
        self.action_timer == 0
    }
}
