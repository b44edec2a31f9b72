//! Session configuration
//!
//! Every tunable of a session in one serde-friendly struct. `Default` is the
//! reference industrial-job tuning; missing JSON fields fall back to it, so
//! a host only has to write the values it wants to change.
//!
//! # Example
//!
//! ```rust
//! use surveillance_core::SessionConfig;
//!
//! let config = SessionConfig::from_json_str(r#"{ "rng_seed": 7, "zone_count": 2 }"#).unwrap();
//! assert_eq!(config.zone_count, 2);
//! assert_eq!(config.duration_ticks, 1200);
//! ```

use crate::models::{Archetype, FailureKind};
use crate::orchestrator::SessionError;
use crate::rng::RngManager;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

/// Configuration validation failures
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigError {
    #[error("{field} must be positive")]
    NotPositive { field: &'static str },

    #[error("{field} must be a probability in [0, 1], got {value}")]
    ProbabilityOutOfRange { field: &'static str, value: f64 },

    #[error("{field} must be finite and positive, got {value}")]
    InvalidSpeed { field: &'static str, value: f32 },

    #[error("{field} range is empty: min {min} > max {max}")]
    EmptyRange { field: &'static str, min: f64, max: f64 },

    #[error("archetype weights must not all be zero")]
    AllWeightsZero,

    #[error("failure limit for {0:?} must be at least 1")]
    ZeroFailureLimit(FailureKind),

    #[error("lanes_per_zone ({lanes}) must be at least max_entities_per_zone ({max_entities})")]
    TooFewLanes { lanes: usize, max_entities: usize },

    #[error("the vignette needs max_entities_per_zone of at least 2, got {0}")]
    NoRoomForVignette(usize),
}

/// Relative spawn weights per archetype
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArchetypeWeights {
    pub adversarial: u32,
    pub maintenance: u32,
    pub authority: u32,
    pub neutral: u32,
}

impl Default for ArchetypeWeights {
    fn default() -> Self {
        Self {
            adversarial: 45,
            maintenance: 20,
            authority: 15,
            neutral: 20,
        }
    }
}

impl ArchetypeWeights {
    /// Weights in [`Archetype::ALL`] order
    pub fn as_array(&self) -> [u32; 4] {
        [self.adversarial, self.maintenance, self.authority, self.neutral]
    }

    pub fn weight_of(&self, archetype: Archetype) -> u32 {
        match archetype {
            Archetype::Adversarial => self.adversarial,
            Archetype::Maintenance => self.maintenance,
            Archetype::Authority => self.authority,
            Archetype::Neutral => self.neutral,
        }
    }
}

/// Speeds (track units per tick) and dwell timers
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionTuning {
    pub neutral_speed: f32,
    pub maintenance_speed: f32,
    pub authority_speed: f32,
    pub adversarial_speed_min: f32,
    pub adversarial_speed_max: f32,
    /// Speed multiplier applied when an entity starts fleeing
    pub flee_multiplier: f32,
    /// Theft duration range, rolled at spawn
    pub adversarial_dwell_min: u32,
    pub adversarial_dwell_max: u32,
    /// Repair duration for maintenance workers
    pub maintenance_dwell_ticks: u32,
}

impl Default for MotionTuning {
    fn default() -> Self {
        Self {
            neutral_speed: 0.8,
            maintenance_speed: 0.5,
            authority_speed: 1.4,
            adversarial_speed_min: 0.6,
            adversarial_speed_max: 1.1,
            flee_multiplier: 2.5,
            adversarial_dwell_min: 30,
            adversarial_dwell_max: 60,
            maintenance_dwell_ticks: 40,
        }
    }
}

impl MotionTuning {
    /// Base walking speed for non-adversarial archetypes
    pub fn base_speed(&self, archetype: Archetype) -> f32 {
        match archetype {
            Archetype::Neutral => self.neutral_speed,
            Archetype::Maintenance => self.maintenance_speed,
            Archetype::Authority => self.authority_speed,
            Archetype::Adversarial => self.adversarial_speed_min,
        }
    }
}

/// Shape of the traversal axis
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackGeometry {
    /// Width of the visible range; positions run from 0.0 to `length`
    pub length: f32,
    /// How far outside the visible range entities start and exit
    pub offscreen_margin: f32,
}

impl Default for TrackGeometry {
    fn default() -> Self {
        Self {
            length: 100.0,
            offscreen_margin: 8.0,
        }
    }
}

impl TrackGeometry {
    pub fn midpoint(&self) -> f32 {
        self.length / 2.0
    }

    /// Off-screen start position for an entity walking in `direction`
    pub fn start_position(&self, direction: i8) -> f32 {
        if direction > 0 {
            -self.offscreen_margin
        } else {
            self.length + self.offscreen_margin
        }
    }

    /// Has an entity at `position` walking in `direction` fully left the visible range?
    pub fn has_exited(&self, position: f32, direction: i8) -> bool {
        if direction > 0 {
            position > self.length + self.offscreen_margin
        } else {
            position < -self.offscreen_margin
        }
    }

    /// Is `position` inside the visible range?
    pub fn is_visible(&self, position: f32) -> bool {
        (0.0..=self.length).contains(&position)
    }
}

/// Camera blackouts
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutageConfig {
    /// Per-tick probability of trying to start an outage (0 disables)
    pub chance: f64,
    pub min_ticks: u32,
    pub max_ticks: u32,
}

impl Default for OutageConfig {
    fn default() -> Self {
        Self {
            chance: 0.01,
            min_ticks: 40,
            max_ticks: 80,
        }
    }
}

/// The once-per-session two-actor vignette
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VignetteConfig {
    pub enabled: bool,
    /// Probability that a successful spawn roll becomes the vignette instead
    pub chance: f64,
    pub walk_speed: f32,
    /// Distance at which the pair stops to talk
    pub proximity: f32,
    pub dwell_ticks: u32,
    /// Suitor's retreat speed
    pub heartbroken_speed: f32,
    /// Beloved's retreat speed
    pub rejecting_speed: f32,
}

impl Default for VignetteConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            chance: 0.03,
            walk_speed: 0.7,
            proximity: 6.0,
            dwell_ticks: 40,
            heartbroken_speed: 0.3,
            rejecting_speed: 2.0,
        }
    }
}

/// Maximum of each failure counter; reaching one ends the session as a loss
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FailureLimits {
    pub items_lost: u32,
    pub wrongful_actions: u32,
}

impl Default for FailureLimits {
    fn default() -> Self {
        Self {
            items_lost: 3,
            wrongful_actions: 3,
        }
    }
}

impl FailureLimits {
    pub fn limit(&self, kind: FailureKind) -> u32 {
        match kind {
            FailureKind::ItemsLost => self.items_lost,
            FailureKind::WrongfulActions => self.wrongful_actions,
        }
    }
}

/// Payout formula constants (credits)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PayoutRates {
    pub base_reward: i64,
    pub success_bonus: i64,
    pub item_loss_penalty: i64,
    pub wrongful_penalty: i64,
    /// Floor applied to a winning payout
    pub min_win_payout: i64,
    /// Subtracted on a loss; the result may be negative
    pub failure_fine: i64,
    /// Catches needed, with zero failures, for the top-tier message
    pub flawless_threshold: u32,
}

impl Default for PayoutRates {
    fn default() -> Self {
        Self {
            base_reward: 5_000,
            success_bonus: 250,
            item_loss_penalty: 500,
            wrongful_penalty: 300,
            min_win_payout: 1_000,
            failure_fine: 2_000,
            flawless_threshold: 5,
        }
    }
}

/// Complete session configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Seed for the session's RNG
    pub rng_seed: u64,
    /// Session length in ticks
    pub duration_ticks: u32,
    /// Wall-clock length of one tick
    pub tick_interval_ms: u64,
    pub zone_count: usize,
    pub max_entities_per_zone: usize,
    pub lanes_per_zone: usize,
    /// Per-tick probability of a spawn attempt
    pub spawn_chance: f64,
    pub archetype_weights: ArchetypeWeights,
    pub motion: MotionTuning,
    pub track: TrackGeometry,
    /// How long a caught entity stays on screen before removal
    pub resolved_hold_ticks: u32,
    pub outages: OutageConfig,
    pub vignette: VignetteConfig,
    pub failure_limits: FailureLimits,
    pub payout: PayoutRates,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            rng_seed: 0x5EC0_12E7,
            duration_ticks: 1_200,
            tick_interval_ms: 50,
            zone_count: 4,
            max_entities_per_zone: 3,
            lanes_per_zone: 3,
            spawn_chance: 0.05,
            archetype_weights: ArchetypeWeights::default(),
            motion: MotionTuning::default(),
            track: TrackGeometry::default(),
            resolved_hold_ticks: 10,
            outages: OutageConfig::default(),
            vignette: VignetteConfig::default(),
            failure_limits: FailureLimits::default(),
            payout: PayoutRates::default(),
        }
    }
}

impl SessionConfig {
    /// Reference tuning: four cameras over a factory floor, one minute on the clock
    pub fn industrial_job() -> Self {
        Self::default()
    }

    /// The simpler sibling: two corridors, no camera trouble, no vignette,
    /// less patience for mistakes
    pub fn janitor() -> Self {
        Self {
            duration_ticks: 900,
            zone_count: 2,
            max_entities_per_zone: 2,
            lanes_per_zone: 2,
            spawn_chance: 0.04,
            archetype_weights: ArchetypeWeights {
                adversarial: 35,
                maintenance: 35,
                authority: 10,
                neutral: 20,
            },
            outages: OutageConfig {
                chance: 0.0,
                ..OutageConfig::default()
            },
            vignette: VignetteConfig {
                enabled: false,
                ..VignetteConfig::default()
            },
            failure_limits: FailureLimits {
                items_lost: 3,
                wrongful_actions: 2,
            },
            payout: PayoutRates {
                base_reward: 1_500,
                success_bonus: 100,
                item_loss_penalty: 200,
                wrongful_penalty: 200,
                min_win_payout: 300,
                failure_fine: 500,
                flawless_threshold: 3,
            },
            ..Self::default()
        }
    }

    /// Replace the seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng_seed = seed;
        self
    }

    /// Replace the seed with a freshly drawn one
    pub fn with_fresh_seed(self) -> Self {
        self.with_seed(RngManager::fresh_seed())
    }

    /// Parse and validate a JSON configuration
    pub fn from_json_str(json: &str) -> Result<Self, SessionError> {
        let config: SessionConfig =
            serde_json::from_str(json).map_err(|e| SessionError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Like [`SessionConfig::from_json_str`], but a document that does not
    /// set `rng_seed` gets a fresh seed instead of the built-in default
    pub fn from_json_str_or_fresh_seed(json: &str) -> Result<Self, SessionError> {
        let value: serde_json::Value =
            serde_json::from_str(json).map_err(|e| SessionError::ConfigParse(e.to_string()))?;
        let declares_seed = value.get("rng_seed").is_some();
        let mut config: SessionConfig =
            serde_json::from_value(value).map_err(|e| SessionError::ConfigParse(e.to_string()))?;
        if !declares_seed {
            config = config.with_fresh_seed();
        }
        config.validate()?;
        Ok(config)
    }

    /// Check every field for a usable value
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.duration_ticks == 0 {
            return Err(ConfigError::NotPositive { field: "duration_ticks" });
        }
        if self.tick_interval_ms == 0 {
            return Err(ConfigError::NotPositive { field: "tick_interval_ms" });
        }
        if self.zone_count == 0 {
            return Err(ConfigError::NotPositive { field: "zone_count" });
        }
        if self.max_entities_per_zone == 0 {
            return Err(ConfigError::NotPositive { field: "max_entities_per_zone" });
        }
        if self.lanes_per_zone == 0 {
            return Err(ConfigError::NotPositive { field: "lanes_per_zone" });
        }
        if self.lanes_per_zone < self.max_entities_per_zone {
            return Err(ConfigError::TooFewLanes {
                lanes: self.lanes_per_zone,
                max_entities: self.max_entities_per_zone,
            });
        }
        if self.vignette.enabled && self.max_entities_per_zone < 2 {
            return Err(ConfigError::NoRoomForVignette(self.max_entities_per_zone));
        }

        check_probability("spawn_chance", self.spawn_chance)?;
        check_probability("outages.chance", self.outages.chance)?;
        check_probability("vignette.chance", self.vignette.chance)?;

        if self.archetype_weights.as_array().iter().all(|&w| w == 0) {
            return Err(ConfigError::AllWeightsZero);
        }

        let m = &self.motion;
        for (field, value) in [
            ("motion.neutral_speed", m.neutral_speed),
            ("motion.maintenance_speed", m.maintenance_speed),
            ("motion.authority_speed", m.authority_speed),
            ("motion.adversarial_speed_min", m.adversarial_speed_min),
            ("motion.adversarial_speed_max", m.adversarial_speed_max),
            ("motion.flee_multiplier", m.flee_multiplier),
            ("vignette.walk_speed", self.vignette.walk_speed),
            ("vignette.heartbroken_speed", self.vignette.heartbroken_speed),
            ("vignette.rejecting_speed", self.vignette.rejecting_speed),
            ("track.length", self.track.length),
        ] {
            check_speed(field, value)?;
        }
        if !(self.track.offscreen_margin.is_finite() && self.track.offscreen_margin >= 0.0) {
            return Err(ConfigError::InvalidSpeed {
                field: "track.offscreen_margin",
                value: self.track.offscreen_margin,
            });
        }

        check_range(
            "motion.adversarial_speed",
            m.adversarial_speed_min as f64,
            m.adversarial_speed_max as f64,
        )?;
        if m.adversarial_dwell_min == 0 {
            return Err(ConfigError::NotPositive { field: "motion.adversarial_dwell_min" });
        }
        check_range(
            "motion.adversarial_dwell",
            m.adversarial_dwell_min as f64,
            m.adversarial_dwell_max as f64,
        )?;
        if m.maintenance_dwell_ticks == 0 {
            return Err(ConfigError::NotPositive { field: "motion.maintenance_dwell_ticks" });
        }
        if self.resolved_hold_ticks == 0 {
            return Err(ConfigError::NotPositive { field: "resolved_hold_ticks" });
        }

        if self.outages.min_ticks == 0 {
            return Err(ConfigError::NotPositive { field: "outages.min_ticks" });
        }
        check_range(
            "outages.duration",
            self.outages.min_ticks as f64,
            self.outages.max_ticks as f64,
        )?;

        if self.vignette.dwell_ticks == 0 {
            return Err(ConfigError::NotPositive { field: "vignette.dwell_ticks" });
        }

        for kind in FailureKind::ALL {
            if self.failure_limits.limit(kind) == 0 {
                return Err(ConfigError::ZeroFailureLimit(kind));
            }
        }

        Ok(())
    }

    /// SHA-256 of the configuration's JSON form, hex encoded
    ///
    /// Stamped into snapshots so recorded telemetry can be matched to the
    /// tuning that produced it.
    pub fn config_hash(&self) -> Result<String, SessionError> {
        let json = serde_json::to_string(self).map_err(|e| {
            SessionError::Serialization(format!("Config serialization failed: {}", e))
        })?;

        let mut hasher = Sha256::new();
        hasher.update(json.as_bytes());
        Ok(format!("{:x}", hasher.finalize()))
    }
}

fn check_probability(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::ProbabilityOutOfRange { field, value })
    }
}

fn check_speed(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidSpeed { field, value })
    }
}

fn check_range(field: &'static str, min: f64, max: f64) -> Result<(), ConfigError> {
    if min <= max {
        Ok(())
    } else {
        Err(ConfigError::EmptyRange { field, min, max })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_validate() {
        SessionConfig::industrial_job().validate().unwrap();
        SessionConfig::janitor().validate().unwrap();
    }

    #[test]
    fn test_track_edges() {
        let track = TrackGeometry::default();
        assert_eq!(track.start_position(1), -8.0);
        assert_eq!(track.start_position(-1), 108.0);
        assert!(!track.has_exited(-8.0, 1));
        assert!(track.has_exited(108.5, 1));
        assert!(track.has_exited(-8.5, -1));
        assert!(!track.has_exited(108.5, -1));
    }

    #[test]
    fn test_hash_changes_with_seed() {
        let a = SessionConfig::default().config_hash().unwrap();
        let b = SessionConfig::default().with_seed(1).config_hash().unwrap();
        assert_eq!(a.len(), 64);
        assert_ne!(a, b);
    }
}
