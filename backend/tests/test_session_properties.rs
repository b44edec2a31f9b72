//! Property tests over randomly driven sessions
//!
//! A session is driven by a script of actions: advance one tick, or select
//! the n-th live entity. Every select is checked against the state it was
//! made in.

use proptest::prelude::*;
use std::collections::HashMap;
use surveillance_core::{
    EntityId, IgnoreReason, OutageConfig, SelectOutcome, Session, SessionConfig, VignetteConfig,
};

#[derive(Debug, Clone, Copy)]
enum Action {
    Advance,
    Select(usize),
}

fn action() -> impl Strategy<Value = Action> {
    prop_oneof![
        3 => Just(Action::Advance),
        1 => (0usize..16).prop_map(Action::Select),
    ]
}

fn busy_config(seed: u64) -> SessionConfig {
    SessionConfig {
        rng_seed: seed,
        duration_ticks: 400,
        spawn_chance: 0.25,
        outages: OutageConfig {
            chance: 0.05,
            min_ticks: 5,
            max_ticks: 20,
        },
        vignette: VignetteConfig {
            chance: 0.5,
            ..VignetteConfig::default()
        },
        ..SessionConfig::default()
    }
}

fn pick(session: &Session, n: usize) -> Option<EntityId> {
    let ids = session.state().entity_ids();
    if ids.is_empty() {
        None
    } else {
        Some(ids[n % ids.len()])
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn property_counters_and_clock_are_monotonic(
        seed in 1_u64..100_000,
        script in prop::collection::vec(action(), 1..600),
    ) {
        let mut session = Session::new(busy_config(seed)).unwrap();
        let mut last_score = *session.state().score();
        let mut last_remaining = session.time_remaining();

        for step in script {
            match step {
                Action::Advance => {
                    let was_running = !session.is_finished();
                    let result = session.advance();
                    if was_running {
                        prop_assert_eq!(result.time_remaining + 1, last_remaining);
                    } else {
                        prop_assert_eq!(result.time_remaining, last_remaining);
                    }
                }
                Action::Select(n) => {
                    if let Some(id) = pick(&session, n) {
                        session.select(id);
                    }
                }
            }
            let score = *session.state().score();
            prop_assert!(score.successes >= last_score.successes);
            prop_assert!(score.items_lost >= last_score.items_lost);
            prop_assert!(score.wrongful_actions >= last_score.wrongful_actions);
            prop_assert!(session.time_remaining() <= last_remaining);
            last_score = score;
            last_remaining = session.time_remaining();
        }
        prop_assert!(session.event_log().events_of_type("SessionEnded").len() <= 1);
    }

    #[test]
    fn property_each_entity_is_charged_at_most_once(
        seed in 1_u64..100_000,
        script in prop::collection::vec(action(), 1..600),
    ) {
        let mut session = Session::new(busy_config(seed)).unwrap();
        let mut charges: HashMap<EntityId, u32> = HashMap::new();
        let mut catches: HashMap<EntityId, u32> = HashMap::new();

        for step in script {
            match step {
                Action::Advance => {
                    session.advance();
                }
                Action::Select(n) => {
                    let Some(id) = pick(&session, n) else { continue };
                    let before = *session.state().score();
                    match session.select(id) {
                        SelectOutcome::Penalized => {
                            *charges.entry(id).or_default() += 1;
                            prop_assert_eq!(session.state().score().wrongful_actions, before.wrongful_actions + 1);
                        }
                        SelectOutcome::Resolved { .. } => {
                            *catches.entry(id).or_default() += 1;
                            prop_assert_eq!(session.state().score().successes, before.successes + 1);
                        }
                        SelectOutcome::Scared | SelectOutcome::Ignored { .. } => {
                            prop_assert_eq!(*session.state().score(), before);
                        }
                    }
                }
            }
        }

        prop_assert!(charges.values().all(|&c| c == 1));
        prop_assert!(catches.values().all(|&c| c == 1));
        let score = session.state().score();
        prop_assert_eq!(score.wrongful_actions as usize, charges.len());
        prop_assert_eq!(score.successes as usize, catches.len());
    }

    #[test]
    fn property_dark_zones_and_vignette_are_untouchable(
        seed in 1_u64..100_000,
        script in prop::collection::vec(action(), 1..600),
    ) {
        let mut session = Session::new(busy_config(seed)).unwrap();

        for step in script {
            match step {
                Action::Advance => {
                    session.advance();
                }
                Action::Select(n) => {
                    let Some(id) = pick(&session, n) else { continue };
                    let Some(entity) = session.state().entity(id).cloned() else { continue };
                    let dark = session.state().is_zone_dark(entity.zone);
                    let before = *session.state().score();
                    let outcome = session.select(id);

                    if session.is_finished() {
                        continue;
                    }
                    if dark {
                        prop_assert_eq!(outcome, SelectOutcome::Ignored { reason: IgnoreReason::ZoneDark });
                        prop_assert_eq!(session.state().entity(id), Some(&entity));
                    } else if entity.is_vignette() {
                        prop_assert_eq!(outcome, SelectOutcome::Ignored { reason: IgnoreReason::Vignette });
                    }
                    if dark || entity.is_vignette() {
                        prop_assert_eq!(*session.state().score(), before);
                    }
                }
            }
        }
    }

    #[test]
    fn property_same_seed_same_session(
        seed in 1_u64..100_000,
        script in prop::collection::vec(action(), 1..400),
    ) {
        let run = |script: &[Action]| {
            let mut session = Session::new(busy_config(seed)).unwrap();
            let mut outcomes = Vec::new();
            for step in script {
                match *step {
                    Action::Advance => {
                        session.advance();
                    }
                    Action::Select(n) => {
                        if let Some(id) = pick(&session, n) {
                            outcomes.push(session.select(id));
                        }
                    }
                }
            }
            (session.event_log().events().to_vec(), outcomes, session.outcome().cloned())
        };

        prop_assert_eq!(run(&script), run(&script));
    }
}
