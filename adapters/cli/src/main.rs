#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that boots a Blastgrid session in the terminal.

use std::{
    fs::{self, File},
    io,
    path::{Path, PathBuf},
    process::ExitCode,
    sync::Mutex,
};

use anyhow::{Context, Result};
use blastgrid_rendering::{DEFAULT_INTRO, LOSE_MESSAGE, WIN_MESSAGE};
use blastgrid_system_bootstrap::{Bootstrap, Config};
use blastgrid_system_scheduler::{self as scheduler, Outcome, Session, SessionConfig};
use blastgrid_terminal::TerminalFrontend;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

const MISSING_LEVEL_MESSAGE: &str = "Please choose level";

/// Intro file looked up beside the level when `--intro` is not given.
const INTRO_FILE_NAME: &str = "intro.txt";

/// Command-line arguments accepted by the Blastgrid binary.
#[derive(Debug, Parser)]
#[command(
    name = "blastgrid",
    version,
    about = "Destroy walls, dodge the adversaries and find the hidden door"
)]
struct CliArgs {
    /// Level file to play.
    level: Option<PathBuf>,
    /// Text file shown before the game starts. Defaults to `intro.txt` next
    /// to the level.
    #[arg(long, value_name = "PATH")]
    intro: Option<PathBuf>,
    /// Seed for door placement; random when omitted.
    #[arg(long)]
    seed: Option<u64>,
    /// Writes logs to this file. Logging is disabled otherwise.
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

/// Entry point for the Blastgrid command-line interface.
fn main() -> ExitCode {
    let args = CliArgs::parse();
    let Some(level) = args.level.as_deref() else {
        println!("{MISSING_LEVEL_MESSAGE}");
        return ExitCode::FAILURE;
    };

    match play(&args, level) {
        Ok(outcome) => {
            if let Some(message) = outcome_message(outcome) {
                println!("{message}");
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn play(args: &CliArgs, level: &Path) -> Result<Outcome> {
    init_tracing(args.log_file.as_deref())?;

    let layout = blastgrid_level::load(level)?;
    let intro = load_intro(args.intro.as_deref(), level)?;
    let seed = args.seed.unwrap_or_else(rand::random);
    info!(level = %level.display(), seed, "starting session");

    let world = Bootstrap::new(Config::new(seed)).build(layout);
    let mut session = Session::new(world, SessionConfig::default());

    let mut frontend = TerminalFrontend::enter(intro)?;
    let outcome = scheduler::run(&mut session, &mut frontend);
    frontend.restore()?;
    outcome
}

/// Reads the explicit intro file, else `intro.txt` beside the level, else the
/// built-in intro.
fn load_intro(explicit: Option<&Path>, level: &Path) -> Result<String> {
    if let Some(path) = explicit {
        return fs::read_to_string(path)
            .with_context(|| format!("failed to read intro file {}", path.display()));
    }
    let beside_level = level
        .parent()
        .unwrap_or_else(|| Path::new(""))
        .join(INTRO_FILE_NAME);
    match fs::read_to_string(&beside_level) {
        Ok(intro) => Ok(intro),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(DEFAULT_INTRO.to_owned()),
        Err(err) => Err(err)
            .with_context(|| format!("failed to read intro file {}", beside_level.display())),
    }
}

fn init_tracing(log_file: Option<&Path>) -> Result<()> {
    let Some(path) = log_file else {
        return Ok(());
    };
    let file = File::create(path)
        .with_context(|| format!("failed to create log file {}", path.display()))?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init();
    Ok(())
}

fn outcome_message(outcome: Outcome) -> Option<&'static str> {
    match outcome {
        Outcome::Won => Some(WIN_MESSAGE),
        Outcome::Lost => Some(LOSE_MESSAGE),
        Outcome::Quit => None,
    }
}
