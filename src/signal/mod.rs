//! Synthetic ultrasonic distance signal
//!
//! This module provides:
//! - A smoothed random walk over distances in centimeters
//! - The `D:<value>\n` text framing sent over the wire
//! - Running statistics over the emitted samples

pub mod frame;
pub mod generator;
pub mod stats;

pub use frame::Frame;
pub use generator::{Generator, Sample};
pub use stats::SessionStats;
