//! Distraction manager
//!
//! Each tick: count active outages down and lift the expired ones, then
//! with a small probability black out one zone for a random duration. A
//! zone that is already dark is left alone.

use crate::models::{Event, EventLog, SessionState, ZoneId};
use crate::orchestrator::config::{OutageConfig, SessionConfig};
use crate::rng::RngManager;
use tracing::debug;

/// Summary of one distraction pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DistractionReport {
    pub started: Option<(ZoneId, u32)>,
    pub ended: Vec<ZoneId>,
}

#[derive(Debug, Clone)]
pub struct DistractionManager {
    outages: OutageConfig,
    zone_count: usize,
}

impl DistractionManager {
    pub fn new(config: &SessionConfig) -> Self {
        Self {
            outages: config.outages,
            zone_count: config.zone_count,
        }
    }

    pub fn run(
        &self,
        state: &mut SessionState,
        rng: &mut RngManager,
        tick: u64,
        log: &mut EventLog,
    ) -> DistractionReport {
        let mut report = DistractionReport {
            ended: state.tick_outages(),
            ..Default::default()
        };
        for &zone in &report.ended {
            debug!(tick, zone, "outage_ended");
            log.log(Event::OutageEnded { tick, zone });
        }

        if self.outages.chance <= 0.0 || !rng.chance(self.outages.chance) {
            return report;
        }

        let zone = rng.index(self.zone_count);
        if state.is_zone_dark(zone) {
            return report;
        }
        let duration = rng.range_inclusive(self.outages.min_ticks, self.outages.max_ticks);
        if state.begin_outage(zone, duration) {
            debug!(tick, zone, duration, "outage_started");
            log.log(Event::OutageStarted {
                tick,
                zone,
                duration,
            });
            report.started = Some((zone, duration));
        }
        report
    }
}
