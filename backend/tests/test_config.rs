//! Configuration loading, validation and hashing

use surveillance_core::{
    ConfigError, FailureKind, Session, SessionConfig, SessionError,
};

#[test]
fn test_empty_json_is_reference_tuning() {
    let config = SessionConfig::from_json_str("{}").unwrap();
    assert_eq!(config, SessionConfig::default());
    assert_eq!(config, SessionConfig::industrial_job());
}

#[test]
fn test_partial_nested_json_keeps_other_defaults() {
    let config = SessionConfig::from_json_str(
        r#"{
            "rng_seed": 99,
            "motion": { "flee_multiplier": 3.0 },
            "failure_limits": { "wrongful_actions": 5 },
            "vignette": { "enabled": false }
        }"#,
    )
    .unwrap();

    let defaults = SessionConfig::default();
    assert_eq!(config.rng_seed, 99);
    assert_eq!(config.motion.flee_multiplier, 3.0);
    assert_eq!(config.motion.neutral_speed, defaults.motion.neutral_speed);
    assert_eq!(config.failure_limits.wrongful_actions, 5);
    assert_eq!(config.failure_limits.items_lost, defaults.failure_limits.items_lost);
    assert!(!config.vignette.enabled);
    assert_eq!(config.vignette.proximity, defaults.vignette.proximity);
}

#[test]
fn test_malformed_json_is_a_parse_error() {
    let err = SessionConfig::from_json_str("{ \"zone_count\": \"four\" }").unwrap_err();
    assert!(matches!(err, SessionError::ConfigParse(_)));
}

#[test]
fn test_invalid_values_are_rejected() {
    let cases: Vec<(SessionConfig, ConfigError)> = vec![
        (
            SessionConfig { duration_ticks: 0, ..SessionConfig::default() },
            ConfigError::NotPositive { field: "duration_ticks" },
        ),
        (
            SessionConfig { zone_count: 0, ..SessionConfig::default() },
            ConfigError::NotPositive { field: "zone_count" },
        ),
        (
            SessionConfig { spawn_chance: 1.5, ..SessionConfig::default() },
            ConfigError::ProbabilityOutOfRange { field: "spawn_chance", value: 1.5 },
        ),
    ];
    for (config, expected) in cases {
        assert_eq!(config.validate(), Err(expected));
    }

    let mut config = SessionConfig::default();
    config.archetype_weights.adversarial = 0;
    config.archetype_weights.maintenance = 0;
    config.archetype_weights.authority = 0;
    config.archetype_weights.neutral = 0;
    assert_eq!(config.validate(), Err(ConfigError::AllWeightsZero));

    let mut config = SessionConfig::default();
    config.failure_limits.items_lost = 0;
    assert_eq!(
        config.validate(),
        Err(ConfigError::ZeroFailureLimit(FailureKind::ItemsLost))
    );

    let config = SessionConfig {
        lanes_per_zone: 2,
        max_entities_per_zone: 3,
        ..SessionConfig::default()
    };
    assert_eq!(
        config.validate(),
        Err(ConfigError::TooFewLanes { lanes: 2, max_entities: 3 })
    );

    let config = SessionConfig {
        max_entities_per_zone: 1,
        ..SessionConfig::default()
    };
    assert_eq!(config.validate(), Err(ConfigError::NoRoomForVignette(1)));
    let mut solo = config.clone();
    solo.vignette.enabled = false;
    assert!(solo.validate().is_ok());

    let mut config = SessionConfig::default();
    config.outages.min_ticks = 90;
    assert!(matches!(config.validate(), Err(ConfigError::EmptyRange { .. })));

    let mut config = SessionConfig::default();
    config.motion.flee_multiplier = f32::NAN;
    assert!(matches!(config.validate(), Err(ConfigError::InvalidSpeed { .. })));
}

#[test]
fn test_session_refuses_invalid_config() {
    let config = SessionConfig {
        tick_interval_ms: 0,
        ..SessionConfig::default()
    };
    let err = Session::new(config).unwrap_err();
    assert_eq!(
        err,
        SessionError::InvalidConfig(ConfigError::NotPositive { field: "tick_interval_ms" })
    );
    assert_eq!(err.to_string(), "Invalid config: tick_interval_ms must be positive");
}

#[test]
fn test_config_hash_is_stable_and_sensitive() {
    let a = SessionConfig::default().config_hash().unwrap();
    let b = SessionConfig::default().config_hash().unwrap();
    let c = SessionConfig::default().with_seed(1).config_hash().unwrap();

    assert_eq!(a, b);
    assert_ne!(a, c);
    assert_eq!(a.len(), 64);
    assert!(a.chars().all(|ch| ch.is_ascii_hexdigit()));

    let session = Session::new(SessionConfig::default()).unwrap();
    assert_eq!(session.config_hash(), a);
}

#[test]
fn test_presets_are_valid_and_distinct() {
    let industrial = SessionConfig::industrial_job();
    let janitor = SessionConfig::janitor();
    assert!(industrial.validate().is_ok());
    assert!(janitor.validate().is_ok());

    assert_eq!(janitor.zone_count, 2);
    assert_eq!(janitor.duration_ticks, 900);
    assert_eq!(janitor.outages.chance, 0.0);
    assert!(!janitor.vignette.enabled);
    assert_eq!(janitor.failure_limits.wrongful_actions, 2);
}

#[test]
fn test_janitor_session_never_blacks_out() {
    let mut session = Session::new(SessionConfig::janitor().with_seed(17)).unwrap();
    session.run_to_end();
    assert!(session.event_log().events_of_type("OutageStarted").is_empty());
    assert!(session.event_log().events_of_type("VignetteSpawned").is_empty());
    assert!(session.state().entities().all(|e| e.zone < 2));
}

#[test]
fn test_config_round_trips_through_json() {
    let config = SessionConfig::janitor().with_seed(123);
    let json = serde_json::to_string(&config).unwrap();
    let parsed = SessionConfig::from_json_str(&json).unwrap();
    assert_eq!(parsed, config);
}

#[test]
fn test_unseeded_json_draws_a_fresh_seed() {
    let declared = SessionConfig::from_json_str_or_fresh_seed(r#"{ "rng_seed": 7 }"#).unwrap();
    assert_eq!(declared.rng_seed, 7);

    let a = SessionConfig::from_json_str_or_fresh_seed(r#"{ "zone_count": 2 }"#).unwrap();
    let b = SessionConfig::from_json_str_or_fresh_seed(r#"{ "zone_count": 2 }"#).unwrap();
    assert_eq!(a.zone_count, 2);
    assert_ne!(a.rng_seed, SessionConfig::default().rng_seed);
    assert_ne!(a.rng_seed, b.rng_seed);

    assert!(matches!(
        SessionConfig::from_json_str_or_fresh_seed(r#"{ "lanes_per_zone": 0 }"#),
        Err(SessionError::InvalidConfig(_))
    ));
}
