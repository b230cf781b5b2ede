//! Command dispatch for the `fixrate` binary.
//!
//! `src/main.rs` only maps errors to exit codes; everything else happens here:
//! - parses CLI arguments and installs logging
//! - resolves settings (.env / environment) and engine constants (TOML)
//! - loads or generates the decision input
//! - runs a decision cycle
//! - prints the report and writes optional exports

use chrono::{Local, Utc};
use clap::Parser;
use tracing::Level;
use tracing_subscriber::EnvFilter;

use crate::cli::{AdviseArgs, Command, DemoArgs, EngineArgs, WindowsArgs};
use crate::config::{EngineConfig, Settings};
use crate::data::{ScenarioConfig, generate_scenario};
use crate::error::AppError;
use crate::io::ingest::DecisionInput;

pub mod pipeline;

/// Entry point for the `fixrate` binary.
pub fn run() -> Result<(), AppError> {
    let cli = crate::cli::Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Advise(args) => handle_advise(args),
        Command::Demo(args) => handle_demo(args),
        Command::Windows(args) => handle_windows(args),
    }
}

/// Log to stderr so the report on stdout stays pipeable.
fn init_tracing(verbose: bool) {
    let default = if verbose { Level::DEBUG } else { Level::INFO };
    let filter = EnvFilter::builder()
        .with_default_directive(default.into())
        .from_env_lossy();
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn handle_advise(args: AdviseArgs) -> Result<(), AppError> {
    let input = crate::io::ingest::read_input(&args.input)?;
    decide_and_report(&input, &args.engine)
}

fn handle_demo(args: DemoArgs) -> Result<(), AppError> {
    let scenario = ScenarioConfig {
        drift: args.drift,
        noise: args.noise,
        history_days: args.history_days,
        ..ScenarioConfig::new(args.seed, Utc::now())
    };
    let mut input = generate_scenario(&scenario)?;
    // Let the usual loan-amount resolution apply.
    input.loan_amount = None;
    tracing::info!(seed = args.seed, drift = args.drift, "generated synthetic scenario");
    decide_and_report(&input, &args.engine)
}

fn handle_windows(args: WindowsArgs) -> Result<(), AppError> {
    let today = args.date.unwrap_or_else(|| Local::now().date_naive());
    print!("{}", crate::report::format_windows(today));
    Ok(())
}

fn decide_and_report(input: &DecisionInput, engine: &EngineArgs) -> Result<(), AppError> {
    let settings = Settings::from_env()?;
    let config = resolve_config(&settings, engine)?;
    let loan_amount = match engine.loan_amount {
        Some(amount) if amount.is_finite() && amount > 0.0 => amount,
        Some(amount) => {
            return Err(AppError::Config(format!(
                "--loan-amount must be a positive amount (got {amount})."
            )));
        }
        None => input.loan_amount.unwrap_or(settings.loan_amount),
    };
    let input = DecisionInput {
        loan_amount: Some(loan_amount),
        ..input.clone()
    };

    let output = pipeline::run_cycle(&input, loan_amount, &config);

    if engine.json {
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        print!("{}", crate::report::format_decision(&output));
    }

    if let Some(path) = &engine.export {
        crate::io::export::write_output_json(path, &output)?;
    }

    Ok(())
}

fn resolve_config(settings: &Settings, engine: &EngineArgs) -> Result<EngineConfig, AppError> {
    let config = settings.engine_config(engine.config.as_deref())?;
    config.validate()?;
    Ok(config)
}
