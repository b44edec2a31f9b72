use std::env;
use std::io;
use std::process::ExitCode;

use surveillance_cli::{load_config, parse_args, report, run_session, usage_text, Command};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    init_tracing();
    match run_cli() {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("{message}");
            ExitCode::from(1)
        }
    }
}

fn run_cli() -> Result<(), String> {
    let args = env::args().skip(1).collect::<Vec<_>>();
    let options = match parse_args(&args) {
        Ok(Command::Run(options)) => options,
        Ok(Command::Help) => {
            println!("{}", usage_text());
            return Ok(());
        }
        Err(message) => return Err(format!("{message}\n\n{}", usage_text())),
    };

    let config = load_config(&options)?;
    let outcome = run_session(config, &options)?;
    report(&outcome, options.json, &mut io::stdout())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .compact()
        .init();
}
