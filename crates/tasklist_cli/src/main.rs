use clap::Parser;
use std::io;
use tasklist_cli::cli::{Cli, normalize_parse_error, overrides_from_args};
use tasklist_cli::session::Session;
use tasklist_core::config::{load_config_with_fallback, merge_overrides};
use tasklist_core::error::AppError;
use tasklist_core::notify::notifier_from_config;
use tracing::warn;
use tracing_subscriber::EnvFilter;

const LOG_ENV_VAR: &str = "TASKLIST_LOG";

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<(), AppError> {
    let loaded = load_config_with_fallback();
    if let Some(err) = loaded.error {
        warn!(error = %err, "using default configuration");
    }

    let overrides = overrides_from_args(&cli.config_override)?;
    let config = merge_overrides(&loaded.config, &overrides);
    let notifier = notifier_from_config(&config)?;

    let stdout = io::stdout();
    let mut session = Session::new(config, notifier, cli.json, stdout.lock());
    session.run(io::stdin().lock())
}

fn main() {
    init_tracing();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if !err.use_stderr() => err.exit(),
        Err(err) => {
            eprintln!("ERROR: {}", normalize_parse_error(err));
            std::process::exit(1);
        }
    };

    if let Err(err) = run(cli) {
        eprintln!("ERROR: {}", err);
        std::process::exit(1);
    }
}
