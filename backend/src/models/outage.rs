//! Zone outage model

use super::entity::ZoneId;
use serde::{Deserialize, Serialize};

/// A temporary blackout over one camera zone
///
/// While active, entities in the zone keep moving but cannot be selected
/// and are not shown to the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneOutage {
    pub zone: ZoneId,
    pub remaining_ticks: u32,
}

impl ZoneOutage {
    pub fn new(zone: ZoneId, duration_ticks: u32) -> Self {
        Self {
            zone,
            remaining_ticks: duration_ticks,
        }
    }

    /// Count down one tick; true once the outage has run out
    pub fn tick(&mut self) -> bool {
        self.remaining_ticks = self.remaining_ticks.saturating_sub(1);
        self.remaining_ticks == 0
    }
}
