use anyhow::Result;
use clap::Parser;
use colored::*;
use std::process::ExitCode;
use tagtest_engine::{is_panic_contained, EngineError, Fault};
use tracing_subscriber::EnvFilter;

mod commands;
mod config;
mod demo;
mod reporter;

use config::Config;

/// Exit code for a configuration fault (unknown subject, failed construction)
const EXIT_CONFIG: u8 = 2;

/// Run the marked test methods of a registered subject.
///
/// Each method tagged with `#[tagtest(...)]` runs once per parameter literal.
/// Results are compared against the expected literals, with an optional
/// numeric tolerance, and every case is reported as PASS, FAIL or ERROR.
///
/// EXAMPLES:
///     tagtest ShowcaseSuite                   Run a subject by short name
///     tagtest tagtest.demo.CounterSuite       Run by dotted full name
///     tagtest ShowcaseSuite --filter square   Only methods containing "square"
///     tagtest --list                          List registered subjects
///
/// ENVIRONMENT VARIABLES:
///     TAGTEST_FORMAT    Set to 'json' for JSON output by default
///     TAGTEST_NO_COLOR  Set to disable colored output (NO_COLOR also works)
///     TAGTEST_LOG       Log filter, e.g. 'debug' (falls back to RUST_LOG)
///
/// EXIT STATUS:
///     0  every case passed, or no test methods were discovered
///     1  at least one case failed or errored
///     2  usage error, unknown subject, or the subject could not be created
#[derive(Parser)]
#[command(name = "tagtest")]
#[command(version)]
struct Cli {
    /// Test subject to run (full, dotted or short name)
    #[arg(required_unless_present = "list")]
    subject: Option<String>,
    /// Only run test methods whose name contains this pattern
    #[arg(long, short = 'f', value_name = "PATTERN")]
    filter: Option<String>,
    /// Output results in JSON format
    #[arg(long)]
    json: bool,
    /// Disable colored output
    #[arg(long)]
    no_color: bool,
    /// Show how each passing case was matched
    #[arg(long, short = 'v')]
    verbose: bool,
    /// List registered test subjects and exit
    #[arg(long)]
    list: bool,
}

fn main() -> ExitCode {
    init_tracing();
    install_panic_hook();

    let cli = Cli::parse();
    let config = Config::from_env();

    match dispatch(cli, &config) {
        Ok(code) => code,
        Err(err) => {
            report_error(&err);
            ExitCode::from(EXIT_CONFIG)
        }
    }
}

fn dispatch(cli: Cli, config: &Config) -> Result<ExitCode> {
    let json = cli.json || config.default_json;
    if cli.no_color || config.no_color {
        colored::control::set_override(false);
    }

    let registry = demo::registry();

    let subject = match cli.subject {
        Some(subject) if !cli.list => subject,
        _ => {
            commands::list::run(&registry, json, &mut std::io::stdout())?;
            return Ok(ExitCode::SUCCESS);
        }
    };

    let args = commands::test::TestArgs {
        subject,
        pattern: cli.filter,
        verbose: cli.verbose,
        json,
    };
    let summary = commands::test::run(&registry, &args)?;

    Ok(if summary.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn report_error(err: &anyhow::Error) {
    eprintln!("{} {}", "error:".red().bold(), err);
    if let Some(EngineError::UnknownSubject { known, .. }) = err.downcast_ref::<EngineError>() {
        if !known.is_empty() {
            eprintln!("Known subjects:");
            for name in known {
                eprintln!("  {}", name);
            }
        }
    }
}

/// Structured logging to stderr; TAGTEST_LOG, then RUST_LOG, default errors only
fn init_tracing() {
    let filter = EnvFilter::try_from_env("TAGTEST_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("error"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Log panics raised by tested methods instead of printing them; they are
/// reported as ERROR cases. Any other panic keeps the default report.
fn install_panic_hook() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        if is_panic_contained() {
            let fault = Fault::from_panic(info.payload());
            tracing::debug!(location = ?info.location(), "{}", fault.message);
        } else {
            default_hook(info);
        }
    }));
}
