//! Simulation clock and wall-clock pacing

pub mod pacing;
pub mod time;
