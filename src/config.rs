//! Simulator configuration
//!
//! Every setting has a built-in default matching the reference ultrasonic
//! sensor behaviour, so the config file is optional and may be partial.

use crate::error::{Result, SimError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Default baud rate of the simulated sensor
pub const DEFAULT_BAUD: u32 = 9600;

/// Baud rates accepted by the host application
pub const BAUD_RANGE: std::ops::RangeInclusive<u32> = 1200..=115200;

/// Distances the host accepts on the wire, in cm
pub const DISTANCE_RANGE: std::ops::RangeInclusive<f64> = 10.0..=400.0;

/// Largest noise half-width; with `MAX_TREND` this bounds a step to 35 cm
pub const MAX_NOISE: f64 = 20.0;

/// Largest trend half-width
pub const MAX_TREND: f64 = 15.0;

/// Configuration for a simulator run
///
/// Distance bounds and amplitudes may only narrow the sensor's envelope,
/// never widen it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimConfig {
    /// Baud rate (default: 9600)
    pub baud_rate: u32,
    /// Delay between frames in milliseconds, fixed at 100 outside tests
    #[serde(skip)]
    pub interval_ms: u64,
    /// Starting point of the random walk in cm
    pub initial_distance: f64,
    /// Lowest distance ever emitted
    pub min_distance: f64,
    /// Highest distance ever emitted
    pub max_distance: f64,
    /// Half-width of the per-sample noise draw
    pub noise_amplitude: f64,
    /// Half-width of the per-sample trend draw
    pub trend_amplitude: f64,
    /// Fixed RNG seed; entropy-seeded when absent
    pub seed: Option<u64>,
    /// Stop after this many frames; run until interrupted when absent
    pub count: Option<u64>,
    /// Prefix progress lines with a local timestamp
    pub show_timestamps: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            baud_rate: DEFAULT_BAUD,
            interval_ms: 100,
            initial_distance: 150.0,
            min_distance: *DISTANCE_RANGE.start(),
            max_distance: *DISTANCE_RANGE.end(),
            noise_amplitude: MAX_NOISE,
            trend_amplitude: MAX_TREND,
            seed: None,
            count: None,
            show_timestamps: false,
        }
    }
}

impl SimConfig {
    /// Load a config file, falling back to defaults for missing keys
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| SimError::ConfigRead {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::parse(&content)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Parse TOML config content
    pub fn parse(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the settings describe a usable signal
    pub fn validate(&self) -> Result<()> {
        if !BAUD_RANGE.contains(&self.baud_rate) {
            return Err(SimError::Config(format!(
                "baud_rate {} outside {}..={}",
                self.baud_rate,
                BAUD_RANGE.start(),
                BAUD_RANGE.end()
            )));
        }
        if !DISTANCE_RANGE.contains(&self.min_distance)
            || !DISTANCE_RANGE.contains(&self.max_distance)
            || self.min_distance >= self.max_distance
        {
            return Err(SimError::Config(format!(
                "distance bounds must satisfy {} <= min < max <= {}, got [{}, {}]",
                DISTANCE_RANGE.start(),
                DISTANCE_RANGE.end(),
                self.min_distance,
                self.max_distance
            )));
        }
        if !(self.min_distance..=self.max_distance).contains(&self.initial_distance) {
            return Err(SimError::Config(format!(
                "initial_distance {} outside [{}, {}]",
                self.initial_distance, self.min_distance, self.max_distance
            )));
        }
        for (name, value, max) in [
            ("noise_amplitude", self.noise_amplitude, MAX_NOISE),
            ("trend_amplitude", self.trend_amplitude, MAX_TREND),
        ] {
            if !(0.0..=max).contains(&value) {
                return Err(SimError::Config(format!(
                    "{} must be within 0..={}, got {}",
                    name, max, value
                )));
            }
        }
        Ok(())
    }

    /// Frame interval as a `Duration`
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}
