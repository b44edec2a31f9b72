//! Headless runner for the surveillance mini-game
//!
//! Parses command-line options, builds a session and plays it to the end,
//! optionally paced in real time and with a scripted player.

use std::fs;
use std::io::Write;
use std::thread;
use std::time::Instant;

use surveillance_core::{
    Archetype, EntityState, RngManager, SelectOutcome, Session, SessionConfig, SessionOutcome,
    TickPacer,
};
use tracing::{debug, info};

/// Decorrelates the autopilot's stream from the session's own RNG
const AUTOPILOT_SEED_SALT: u64 = 0xA17_0B0D;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    IndustrialJob,
    Janitor,
}

impl Preset {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "industrial_job" | "industrial-job" => Some(Preset::IndustrialJob),
            "janitor" => Some(Preset::Janitor),
            _ => None,
        }
    }

    pub fn config(&self) -> SessionConfig {
        match self {
            Preset::IndustrialJob => SessionConfig::industrial_job(),
            Preset::Janitor => SessionConfig::janitor(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CliOptions {
    pub config_path: Option<String>,
    pub preset: Preset,
    pub seed: Option<u64>,
    pub realtime: bool,
    /// Per-tick probability that the scripted player catches a visible thief
    pub autopilot: Option<f64>,
    pub json: bool,
}

impl Default for CliOptions {
    fn default() -> Self {
        Self {
            config_path: None,
            preset: Preset::IndustrialJob,
            seed: None,
            realtime: false,
            autopilot: None,
            json: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Run(CliOptions),
    Help,
}

/// Parse arguments (without the program name)
pub fn parse_args(args: &[String]) -> Result<Command, String> {
    let mut options = CliOptions::default();
    let mut index = 0usize;
    while index < args.len() {
        match args[index].as_str() {
            "-h" | "--help" => return Ok(Command::Help),
            "--seed" => {
                let value = args
                    .get(index + 1)
                    .ok_or_else(|| "missing value for --seed".to_string())?;
                options.seed = Some(
                    value
                        .parse::<u64>()
                        .map_err(|_| format!("invalid --seed value '{value}' (expected u64)"))?,
                );
                index += 2;
            }
            "--preset" => {
                let value = args
                    .get(index + 1)
                    .ok_or_else(|| "missing value for --preset".to_string())?;
                options.preset = Preset::parse(value).ok_or_else(|| {
                    format!("unknown preset '{value}' (expected industrial_job or janitor)")
                })?;
                index += 2;
            }
            "--autopilot" => {
                let value = args
                    .get(index + 1)
                    .ok_or_else(|| "missing value for --autopilot".to_string())?;
                let accuracy = value
                    .parse::<f64>()
                    .map_err(|_| format!("invalid --autopilot value '{value}' (expected f64)"))?;
                if !(0.0..=1.0).contains(&accuracy) {
                    return Err(format!("--autopilot must be in [0, 1], got {accuracy}"));
                }
                options.autopilot = Some(accuracy);
                index += 2;
            }
            "--realtime" => {
                options.realtime = true;
                index += 1;
            }
            "--json" => {
                options.json = true;
                index += 1;
            }
            other if other.starts_with("--") => {
                return Err(format!("unknown option '{other}'"));
            }
            path => {
                if options.config_path.is_some() {
                    return Err(format!("unexpected argument '{path}'"));
                }
                options.config_path = Some(path.to_string());
                index += 1;
            }
        }
    }
    Ok(Command::Run(options))
}

/// Resolve the session configuration: file if given, else the preset.
///
/// `--seed` wins, then an `rng_seed` set in the file; otherwise a fresh
/// seed is drawn (the session logs it at start).
pub fn load_config(options: &CliOptions) -> Result<SessionConfig, String> {
    let config = match &options.config_path {
        Some(path) => {
            let json = fs::read_to_string(path)
                .map_err(|e| format!("failed to read config '{path}': {e}"))?;
            SessionConfig::from_json_str_or_fresh_seed(&json)
                .map_err(|e| format!("{path}: {e}"))?
        }
        None => options.preset.config().with_fresh_seed(),
    };
    Ok(match options.seed {
        Some(seed) => config.with_seed(seed),
        None => config,
    })
}

/// Scripted player: each tick, may catch one visible thief in the act
pub struct Autopilot {
    accuracy: f64,
    rng: RngManager,
}

impl Autopilot {
    pub fn new(accuracy: f64, seed: u64) -> Self {
        Self {
            accuracy,
            rng: RngManager::new(seed ^ AUTOPILOT_SEED_SALT),
        }
    }

    /// Look at the current snapshot and maybe act on it
    pub fn play(&mut self, session: &mut Session) -> Option<SelectOutcome> {
        let snapshot = session.snapshot();
        let target = snapshot
            .visible_entities()
            .find(|e| {
                e.selectable
                    && e.archetype == Archetype::Adversarial
                    && e.state == EntityState::Dwelling
            })
            .map(|e| e.id)?;

        if !self.rng.chance(self.accuracy) {
            return None;
        }
        let outcome = session.select(target);
        debug!(tick = session.current_tick(), entity_id = target, ?outcome, "autopilot_select");
        Some(outcome)
    }
}

/// Play a session to the end
pub fn run_session(config: SessionConfig, options: &CliOptions) -> Result<SessionOutcome, String> {
    let seed = config.rng_seed;
    let mut session = Session::new(config).map_err(|e| e.to_string())?;
    let mut autopilot = options.autopilot.map(|accuracy| Autopilot::new(accuracy, seed));

    info!(
        session_id = %session.id(),
        seed,
        realtime = options.realtime,
        autopilot = ?options.autopilot,
        "headless_run_started"
    );

    if options.realtime {
        let mut pacer = TickPacer::new(session.clock().tick_interval());
        let mut last = Instant::now();
        while !session.is_finished() {
            let now = Instant::now();
            let due = pacer.due_ticks(now - last);
            last = now;
            for _ in 0..due {
                step(&mut session, autopilot.as_mut());
                if session.is_finished() {
                    break;
                }
            }
            thread::sleep(pacer.until_next_tick());
        }
    } else {
        while !session.is_finished() {
            step(&mut session, autopilot.as_mut());
        }
    }

    session
        .outcome()
        .cloned()
        .ok_or_else(|| "session finished without an outcome".to_string())
}

fn step(session: &mut Session, autopilot: Option<&mut Autopilot>) {
    if let Some(pilot) = autopilot {
        pilot.play(session);
    }
    session.advance();
}

/// Print the final result in text or JSON form
pub fn report(outcome: &SessionOutcome, json: bool, out: &mut impl Write) -> Result<(), String> {
    if json {
        let line = serde_json::to_string(outcome).map_err(|e| e.to_string())?;
        writeln!(out, "{line}").map_err(|e| e.to_string())
    } else {
        writeln!(
            out,
            "{} | payout {} | caught {} | lost {} | wrongful {}\n{}",
            if outcome.won { "WIN" } else { "LOSE" },
            outcome.payout,
            outcome.score.successes,
            outcome.score.items_lost,
            outcome.score.wrongful_actions,
            outcome.message,
        )
        .map_err(|e| e.to_string())
    }
}

pub fn usage_text() -> String {
    [
        "surveillance-cli - headless surveillance mini-game session",
        "",
        "Usage:",
        "  surveillance-cli [config.json] [--preset <industrial_job|janitor>] [--seed <u64>]",
        "                   [--realtime] [--autopilot <0..1>] [--json]",
        "",
        "Logging is controlled with RUST_LOG (default: info).",
    ]
    .join("\n")
}
