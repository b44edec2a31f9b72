//! Deterministic random number generation
//!
//! Uses the xorshift64* algorithm. Every random decision the engine makes
//! (spawn rolls, archetype picks, outage durations, cosmetic variety) is
//! drawn from the session's single [`RngManager`], so a seed fully
//! determines a session given the same sequence of `select` calls.

mod xorshift;

pub use xorshift::RngManager;
