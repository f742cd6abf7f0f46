//! Train Monitor CLI Application
//!
//! This is the command-line interface for the onboard train advisory display.
//! It uses the train-advisory library and adds:
//! - Conductor/admin login with lockout
//! - Session state machine and trip log ownership
//! - Fixed-interval replay of a sensor recording
//! - Colored terminal display of the advisories
//! - Trip log report (TXT/JSON)

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use train_advisory::{load_rows, AdvisoryEngine, CsvSensorReader, RowPolicy};

mod auth;
mod config;
mod console;
mod display;
mod driver;
mod report;
mod state;

use config::{AppConfig, LogFormat};
use console::{Console, TripSetup};
use driver::{NoWait, Pacer, RealtimePacer};
use state::Session;

/// Train Monitor - Replay recorded sensor data as conductor advisories
#[derive(Parser, Debug)]
#[command(name = "train-monitor")]
#[command(about = "Onboard advisory display for recorded train sensor data", long_about = None)]
#[command(version)]
struct Args {
    /// Path to the CSV sensor recording (default: sensordata.csv)
    #[arg(short, long, value_name = "FILE")]
    input: Option<PathBuf>,

    /// Path to configuration file (config.toml)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Milliseconds between ticks
    #[arg(long, value_name = "MS")]
    tick_ms: Option<u64>,

    /// Run ticks back to back instead of in real time
    #[arg(long)]
    no_wait: bool,

    /// Print severity tags instead of colors
    #[arg(long)]
    no_color: bool,

    /// Redraw the display in place
    #[arg(long)]
    clear_screen: bool,

    /// Format of the admin trip log view
    #[arg(long, value_enum, value_name = "FORMAT")]
    log_format: Option<LogFormat>,

    /// Stop at the first malformed row instead of skipping it
    #[arg(long)]
    abort_on_malformed: bool,

    /// Verbosity level (can be repeated: -v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all log output except errors
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize logging
    init_logging(args.verbose, args.quiet);

    log::info!("Train Monitor CLI v{}", env!("CARGO_PKG_VERSION"));
    log::info!("Using advisory library v{}", train_advisory::VERSION);

    let config = resolve_config(&args)?;
    log::debug!("Effective configuration: {:?}", config);

    // Recording is read before anyone logs in
    let rows = CsvSensorReader::open(&config.input.file)
        .with_context(|| format!("Failed to open sensor recording: {:?}", config.input.file))?;
    let recording = load_rows(rows, config.input.malformed_rows)
        .with_context(|| format!("Failed to load sensor recording: {:?}", config.input.file))?;
    if recording.skipped > 0 {
        log::warn!("{} malformed rows were skipped", recording.skipped);
    }

    let engine = AdvisoryEngine::new(config.thresholds.clone());
    let mut session = Session::new(auth::LoginGate::from_config(&config.credentials));
    let mut pacer: Box<dyn Pacer> = if config.simulation.realtime {
        Box::new(RealtimePacer)
    } else {
        Box::new(NoWait)
    };

    let setup = TripSetup {
        engine: &engine,
        rows: &recording.rows,
        interval: config.simulation.tick_interval(),
        output: &config.output,
    };

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    let mut console = Console::new(stdin.lock(), stdout.lock());
    console.run(&mut session, &setup, pacer.as_mut())?;

    log::info!(
        "Session closed ({}) with {} trip log entries",
        session.state(),
        session.log().len()
    );
    Ok(())
}

/// Load the config file (if any) and apply command-line overrides
fn resolve_config(args: &Args) -> Result<AppConfig> {
    let mut config = match &args.config {
        Some(path) => {
            log::info!("Loading configuration from: {:?}", path);
            config::load_config(path)?
        }
        None => AppConfig::default(),
    };

    if let Some(input) = &args.input {
        config.input.file = input.clone();
    }
    if let Some(tick_ms) = args.tick_ms {
        config.simulation.tick_interval_ms = tick_ms;
    }
    if args.no_wait {
        config.simulation.realtime = false;
    }
    if args.no_color {
        config.output.color = false;
    }
    if args.clear_screen {
        config.output.clear_screen = true;
    }
    if let Some(format) = args.log_format {
        config.output.log_format = format;
    }
    if args.abort_on_malformed {
        config.input.malformed_rows = RowPolicy::Abort;
    }

    config.validate()?;
    Ok(config)
}

/// Initialize logging based on verbosity level
fn init_logging(verbose: u8, quiet: bool) {
    use env_logger::Builder;
    use log::LevelFilter;
    use std::io::Write;

    let level = if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    Builder::new()
        .filter_level(level)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {}] {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
}
