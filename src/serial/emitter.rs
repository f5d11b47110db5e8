//! Timed frame emitter
//!
//! Drives the distance generator against a byte sink:
//! - One frame per interval, flushed immediately
//! - Progress line per frame on the console
//! - Optional CSV recording
//! - Summary statistics when the loop ends

use super::Sink;
use crate::config::SimConfig;
use crate::error::{Result, SimError};
use crate::record::Recorder;
use crate::shutdown::Shutdown;
use crate::signal::frame::format_distance;
use crate::signal::{Frame, Generator, Sample, SessionStats};
use chrono::Local;
use colored::Colorize;
use std::fmt::Display;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::time::Duration;

/// How a run ended, when it did not fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Shutdown was requested (Ctrl+C)
    Interrupted,
    /// The configured frame count was reached
    Completed,
}

/// Frame emitter with its generator state and session bookkeeping
pub struct Emitter {
    generator: Generator,
    interval: Duration,
    limit: Option<u64>,
    show_timestamps: bool,
    port_label: String,
    baud_rate: u32,
    recorder: Option<Recorder<BufWriter<File>>>,
    stats: SessionStats,
    console: Box<dyn Write>,
}

impl Emitter {
    /// Create an emitter for the given port, printing to stdout
    pub fn new(config: &SimConfig, port_label: &str) -> Self {
        Self {
            generator: Generator::new(config),
            interval: config.interval(),
            limit: config.count,
            show_timestamps: config.show_timestamps,
            port_label: port_label.to_string(),
            baud_rate: config.baud_rate,
            recorder: None,
            stats: SessionStats::new(),
            console: Box::new(io::stdout()),
        }
    }

    /// Record every emitted sample to CSV
    pub fn with_recorder(mut self, recorder: Recorder<BufWriter<File>>) -> Self {
        self.recorder = Some(recorder);
        self
    }

    /// Send progress output somewhere other than stdout
    #[cfg(test)]
    pub fn with_console(mut self, console: Box<dyn Write>) -> Self {
        self.console = console;
        self
    }

    pub fn port_label(&self) -> &str {
        &self.port_label
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    /// Emit frames until shutdown, the frame limit, or a write failure
    ///
    /// The sink is only borrowed; releasing it is the caller's job.
    pub fn run<W: Write>(&mut self, sink: &mut W, shutdown: &Shutdown) -> Result<RunOutcome> {
        self.print_header();

        let result = loop {
            if shutdown.is_triggered() {
                break Ok(RunOutcome::Interrupted);
            }
            if self.limit_reached() {
                break Ok(RunOutcome::Completed);
            }
            if let Err(e) = self.emit_one(sink) {
                break Err(e);
            }
            if self.limit_reached() {
                break Ok(RunOutcome::Completed);
            }
            if shutdown.wait(self.interval) {
                break Ok(RunOutcome::Interrupted);
            }
        };

        self.print_summary();
        result
    }

    fn limit_reached(&self) -> bool {
        self.limit.is_some_and(|limit| self.stats.count() >= limit)
    }

    /// Generate, send and report a single sample
    fn emit_one<W: Write>(&mut self, sink: &mut W) -> Result<()> {
        let sample = self.generator.draw();
        let frame = Frame::new(sample.distance);

        sink.write_all(frame.as_bytes())
            .and_then(|_| sink.flush())
            .map_err(SimError::Transport)?;
        log::trace!("wrote {:?}", frame.as_str());

        self.report(&sample);
        if let Some(ref mut recorder) = self.recorder {
            recorder.record(&sample)?;
        }

        self.stats.push(sample.distance);
        self.generator.advance(&sample);
        Ok(())
    }

    /// Print the per-frame progress line
    fn report(&mut self, sample: &Sample) {
        let mut line = String::new();
        if self.show_timestamps {
            let timestamp = Local::now().format("%H:%M:%S%.3f");
            line.push_str(&format!("{} ", timestamp.to_string().dimmed()));
        }
        line.push_str(&format!(
            "{} Sent: {} cm",
            format!("[{:04}]", sample.sequence).cyan(),
            format_distance(sample.distance)
        ));
        self.say(line);
    }

    fn say(&mut self, line: impl Display) {
        if let Err(e) = writeln!(self.console, "{}", line) {
            log::debug!("Console write failed: {}", e);
        }
    }

    fn print_header(&mut self) {
        let rule = "=".repeat(70).dimmed();
        self.say(&rule);
        self.say(format!("{}: {}", "Port".cyan(), self.port_label.white()));
        self.say(format!("{}: {}", "Baud".cyan(), self.baud_rate.to_string().white()));
        self.say(format!(
            "{}: {} ms",
            "Interval".cyan(),
            self.interval.as_millis().to_string().white()
        ));
        if let Some(path) = self.recorder.as_ref().map(|r| r.path().to_string()) {
            self.say(format!("{}: {}", "Record".cyan(), path.white()));
        }
        self.say(&rule);
    }

    fn print_summary(&mut self) {
        let rule = "=".repeat(70).dimmed();
        let fmt = |v: Option<f64>| v.map(format_distance).unwrap_or_else(|| "-".to_string());
        let (min, max, mean) = (
            fmt(self.stats.min()),
            fmt(self.stats.max()),
            fmt(self.stats.mean()),
        );

        self.say("");
        self.say(&rule);
        self.say("--- Simulator Summary ---".cyan().bold());
        self.say(format!("Frames sent: {}", self.stats.count()));
        self.say(format!("Distance min/max/mean: {} / {} / {} cm", min, max, mean));
        let recorded = self
            .recorder
            .as_ref()
            .map(|r| (r.rows(), r.path().to_string()));
        if let Some((rows, path)) = recorded {
            self.say(format!("Recorded {} rows to: {}", rows, path.white()));
        }
        self.say(&rule);
    }
}

/// Run the emitter against an opened sink, then close the sink exactly once
///
/// The sink is closed whether the run was interrupted, completed, or failed.
pub fn run_session<S: Sink>(
    mut sink: S,
    emitter: &mut Emitter,
    shutdown: &Shutdown,
) -> Result<RunOutcome> {
    let outcome = emitter.run(&mut sink, shutdown);
    if let Err(e) = sink.close() {
        log::warn!("Error while closing {}: {}", emitter.port_label(), e);
    }
    outcome
}
