//! Entity state machine tests
//!
//! Drives the behavior resolver directly against hand-placed entities.

use surveillance_core::behavior::BehaviorResolver;
use surveillance_core::{
    Archetype, Entity, EntityId, EntityState, EventLog, PayloadStatus, ScoreBoard, SessionConfig,
    SessionState, VignetteRole,
};

fn place(state: &mut SessionState, archetype: Archetype, position: f32, speed: f32, timer: u32) -> EntityId {
    let id = state.allocate_id();
    state.insert_entity(Entity::new(id, archetype, 0, 0, 1, position, speed, timer));
    id
}

/// Run until `done` holds or `limit` ticks pass; returns the tick it held on
fn run_until(
    resolver: &BehaviorResolver,
    state: &mut SessionState,
    log: &mut EventLog,
    limit: u64,
    mut done: impl FnMut(&SessionState) -> bool,
) -> Option<u64> {
    for tick in 1..=limit {
        resolver.run(state, tick, log);
        if done(state) {
            return Some(tick);
        }
    }
    None
}

#[test]
fn test_adversary_steals_flees_and_loses_item() {
    let config = SessionConfig::default();
    let resolver = BehaviorResolver::new(&config);
    let mut state = SessionState::new(1);
    let mut log = EventLog::new();
    let id = place(&mut state, Archetype::Adversarial, 45.0, 1.0, 3);

    let dwell_tick = run_until(&resolver, &mut state, &mut log, 20, |s| {
        s.entity(id).map(|e| e.state) == Some(EntityState::Dwelling)
    })
    .expect("adversary should stop at the midpoint");
    assert_eq!(dwell_tick, 5);
    assert_eq!(state.entity(id).unwrap().position, config.track.midpoint());
    assert_eq!(state.entity(id).unwrap().payload, Some(PayloadStatus::Untouched));

    for tick in 6..=7 {
        resolver.run(&mut state, tick, &mut log);
        assert_eq!(state.entity(id).unwrap().state, EntityState::Dwelling);
    }
    let report = resolver.run(&mut state, 8, &mut log);
    assert_eq!(report.payloads_taken, 1);
    let e = state.entity(id).unwrap();
    assert_eq!(e.state, EntityState::Fleeing);
    assert_eq!(e.payload, Some(PayloadStatus::Taken));
    assert_eq!(e.speed, config.motion.flee_multiplier);

    let mut lost = 0;
    for tick in 9..200 {
        lost += resolver.run(&mut state, tick, &mut log).items_lost;
        if state.entity(id).is_none() {
            break;
        }
    }
    assert_eq!(lost, 1);
    assert!(state.entity(id).is_none());
    assert_eq!(state.score().items_lost, 1);
    assert_eq!(log.events_of_type("ItemLost").len(), 1);
    assert_eq!(log.events_of_type("EntityRemoved").len(), 1);
}

#[test]
fn test_maintenance_dwells_once_then_walks_on() {
    let config = SessionConfig::default();
    let resolver = BehaviorResolver::new(&config);
    let mut state = SessionState::new(1);
    let mut log = EventLog::new();
    let id = place(&mut state, Archetype::Maintenance, 49.5, 0.5, 0);

    resolver.run(&mut state, 1, &mut log);
    assert_eq!(state.entity(id).unwrap().state, EntityState::Dwelling);

    let ticks = config.motion.maintenance_dwell_ticks as u64;
    for tick in 2..=ticks {
        resolver.run(&mut state, tick, &mut log);
        assert_eq!(state.entity(id).unwrap().state, EntityState::Dwelling);
    }
    resolver.run(&mut state, ticks + 1, &mut log);
    assert_eq!(state.entity(id).unwrap().state, EntityState::Entering);

    resolver.run(&mut state, ticks + 2, &mut log);
    let e = state.entity(id).unwrap();
    assert_eq!(e.state, EntityState::Entering);
    assert!(e.position > config.track.midpoint());

    let gone = run_until(&resolver, &mut state, &mut log, 500, |s| s.entity(id).is_none());
    assert!(gone.is_some());
    assert_eq!(log.events_of_type("DwellStarted").len(), 1);
    assert_eq!(state.score().items_lost, 0);
}

#[test]
fn test_neutral_and_authority_walk_straight_through() {
    let config = SessionConfig::default();
    let resolver = BehaviorResolver::new(&config);
    let mut state = SessionState::new(1);
    let mut log = EventLog::new();
    let neutral = place(&mut state, Archetype::Neutral, 49.0, 0.8, 0);
    let authority = place(&mut state, Archetype::Authority, 49.0, 1.4, 0);

    resolver.run(&mut state, 1, &mut log);
    resolver.run(&mut state, 2, &mut log);
    for id in [neutral, authority] {
        let e = state.entity(id).unwrap();
        assert_eq!(e.state, EntityState::Entering);
        assert!(e.position > config.track.midpoint());
    }
    assert!(log.events_of_type("DwellStarted").is_empty());
}

#[test]
fn test_right_to_left_walker_exits_left() {
    let config = SessionConfig::default();
    let resolver = BehaviorResolver::new(&config);
    let mut state = SessionState::new(1);
    let mut log = EventLog::new();
    let id = state.allocate_id();
    state.insert_entity(Entity::new(id, Archetype::Neutral, 0, 0, -1, -7.5, 1.0, 0));

    resolver.run(&mut state, 1, &mut log);
    assert_eq!(state.entity(id).unwrap().state, EntityState::Exiting);
    let report = resolver.run(&mut state, 2, &mut log);
    assert_eq!(report.removed, vec![id]);
}

#[test]
fn test_resolved_entity_is_held_then_removed() {
    let config = SessionConfig::default();
    let resolver = BehaviorResolver::new(&config);
    let mut state = SessionState::new(1);
    let mut log = EventLog::new();
    let id = place(&mut state, Archetype::Adversarial, 50.0, 1.0, 30);
    {
        let e = state.entity_mut(id).unwrap();
        e.state = EntityState::Resolved;
        e.payload = Some(PayloadStatus::Recovered);
        e.action_timer = config.resolved_hold_ticks;
    }

    for tick in 1..config.resolved_hold_ticks as u64 {
        resolver.run(&mut state, tick, &mut log);
        let e = state.entity(id).unwrap();
        assert_eq!(e.state, EntityState::Resolved);
        assert_eq!(e.position, 50.0);
    }
    let report = resolver.run(&mut state, config.resolved_hold_ticks as u64, &mut log);
    assert_eq!(report.removed, vec![id]);
    assert_eq!(report.items_lost, 0);
}

#[test]
fn test_outage_does_not_pause_movement() {
    let config = SessionConfig::default();
    let resolver = BehaviorResolver::new(&config);
    let mut dark = SessionState::new(1);
    let mut lit = SessionState::new(1);
    let a = place(&mut dark, Archetype::Adversarial, 40.0, 1.0, 5);
    let b = place(&mut lit, Archetype::Adversarial, 40.0, 1.0, 5);
    assert!(dark.begin_outage(0, 100));

    let mut log_dark = EventLog::new();
    let mut log_lit = EventLog::new();
    for tick in 1..=30 {
        resolver.run(&mut dark, tick, &mut log_dark);
        resolver.run(&mut lit, tick, &mut log_lit);
        assert_eq!(dark.entity(a), lit.entity(b));
    }
    assert_eq!(dark.entity(a).unwrap().state, EntityState::Fleeing);
}

#[test]
fn test_vignette_meets_rejects_and_leaves_without_scoring() {
    let config = SessionConfig::default();
    let resolver = BehaviorResolver::new(&config);
    let vc = config.vignette;
    let mut state = SessionState::new(1);
    let mut log = EventLog::new();

    let suitor = state.allocate_id();
    let beloved = state.allocate_id();
    state.insert_entity(
        Entity::new(suitor, Archetype::Neutral, 0, 0, 1, 40.0, vc.walk_speed, 0)
            .into_vignette(VignetteRole::Suitor, beloved),
    );
    state.insert_entity(
        Entity::new(beloved, Archetype::Neutral, 0, 0, -1, 60.0, vc.walk_speed, 0)
            .into_vignette(VignetteRole::Beloved, suitor),
    );

    let met = run_until(&resolver, &mut state, &mut log, 50, |s| {
        s.entity(suitor).map(|e| e.state) == Some(EntityState::Proposing)
    })
    .expect("pair should meet");
    assert_eq!(state.entity(beloved).unwrap().state, EntityState::Reacting);
    assert!(state.entity(beloved).unwrap().position - state.entity(suitor).unwrap().position <= vc.proximity);
    assert_eq!(log.events_of_type("VignetteMet").len(), 1);

    let mut tick = met;
    for _ in 0..vc.dwell_ticks {
        tick += 1;
        resolver.run(&mut state, tick, &mut log);
    }
    let s = state.entity(suitor).unwrap();
    let b = state.entity(beloved).unwrap();
    assert_eq!(s.state, EntityState::Heartbroken);
    assert_eq!(s.direction, -1);
    assert_eq!(s.speed, vc.heartbroken_speed);
    assert_eq!(b.state, EntityState::Rejecting);
    assert_eq!(b.direction, 1);
    assert_eq!(b.speed, vc.rejecting_speed);

    for _ in 0..1000 {
        tick += 1;
        resolver.run(&mut state, tick, &mut log);
        if state.num_entities() == 0 {
            break;
        }
    }
    assert_eq!(state.num_entities(), 0);
    assert_eq!(*state.score(), ScoreBoard::default());
    assert!(log.events_of_type("ItemLost").is_empty());
}
