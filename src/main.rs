//! Distance Simulator
//!
//! Writes synthetic ultrasonic distance readings to a serial port so a host
//! application can be exercised without the physical sensor.
//!
//! # Wire format
//!
//! One ASCII line per reading, every 100 ms by default:
//!
//! ```text
//! D:147.32
//! D:152.08
//! ```
//!
//! Values follow a smoothed random walk starting at 150 cm and never leave
//! the 10..=400 cm range.
//!
//! # Usage
//!
//! ```bash
//! # Create a virtual serial pair (Linux), then send to one end
//! socat -d -d pty,raw,echo=0 pty,raw,echo=0
//! distance-sim /dev/pts/3
//!
//! # Reproducible run of 50 frames, recorded to CSV
//! distance-sim /dev/ttyUSB0 --seed 42 --count 50 --record session.csv
//!
//! # Settings from a TOML file (baud_rate, narrower bounds, seed, ...)
//! distance-sim COM3 --config sim.toml
//!
//! # List available serial ports
//! distance-sim --list
//! ```

mod config;
mod error;
mod record;
mod serial;
mod shutdown;
mod signal;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use std::path::PathBuf;
use std::process::ExitCode;

use config::SimConfig;
use record::Recorder;
use serial::{run_session, Emitter, PortConfig, RunOutcome, SerialConnection, Sink};
use shutdown::Shutdown;

/// Distance Simulator
///
/// Sends simulated ultrasonic distance frames over a serial port
#[derive(Parser)]
#[command(name = "distance-sim")]
#[command(author = "Prasanna Gautam")]
#[command(version = "0.1.0")]
#[command(about = "Serial ultrasonic distance simulator for testing host applications")]
struct Cli {
    /// Serial port to write to (e.g., /dev/ttyUSB0, COM3)
    port: Option<String>,

    /// List available serial ports and exit
    #[arg(short, long)]
    list: bool,

    /// TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// RNG seed for a reproducible signal
    #[arg(short, long)]
    seed: Option<u64>,

    /// Stop after sending this many frames
    #[arg(short = 'n', long)]
    count: Option<u64>,

    /// Prefix progress lines with timestamps
    #[arg(short, long)]
    timestamps: bool,

    /// Record every sent reading to a CSV file
    #[arg(short, long)]
    record: Option<PathBuf>,
}

fn main() -> ExitCode {
    // Initialize logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} {:#}", "[ERROR]".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

fn print_usage() {
    eprintln!("Usage: distance-sim <PORT>");
    eprintln!("  Linux:   distance-sim /dev/ttyUSB0    Windows: distance-sim COM3");
}

fn run(cli: Cli) -> Result<ExitCode> {
    if cli.list {
        serial::port::print_ports()?;
        return Ok(ExitCode::SUCCESS);
    }

    let Some(port) = cli.port else {
        print_usage();
        return Ok(ExitCode::FAILURE);
    };

    let mut config = match cli.config {
        Some(ref path) => SimConfig::load(path)?,
        None => SimConfig::default(),
    };
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }
    if cli.count.is_some() {
        config.count = cli.count;
    }
    config.show_timestamps |= cli.timestamps;
    config.validate()?;

    let shutdown = Shutdown::new();
    shutdown.install_ctrlc()?;

    let connection = SerialConnection::open(PortConfig::new(&port).with_baud_rate(config.baud_rate))?;
    println!(
        "{} Connected to {} at {} baud",
        "[OK]".green().bold(),
        port.white().bold(),
        config.baud_rate
    );

    // The record file only exists once the port is actually open
    let mut emitter = Emitter::new(&config, &port);
    if let Some(ref path) = cli.record {
        match Recorder::create(path) {
            Ok(recorder) => emitter = emitter.with_recorder(recorder),
            Err(e) => {
                if let Err(close_err) = connection.close() {
                    log::warn!("Error while closing {}: {}", port, close_err);
                }
                return Err(e.into());
            }
        }
    }
    println!("{}", "Sending simulated data... (Ctrl+C to stop)\n".yellow());

    let outcome = run_session(connection, &mut emitter, &shutdown);
    println!("{} Serial port closed", "[OK]".green().bold());

    match outcome.with_context(|| format!("Simulation on {} aborted", port))? {
        RunOutcome::Interrupted => println!("{}", "Simulator stopped".cyan()),
        RunOutcome::Completed => println!(
            "{} Sent {} frames",
            "[OK]".green().bold(),
            emitter.stats().count()
        ),
    }

    Ok(ExitCode::SUCCESS)
}
