//! Serial output for the distance simulator
//!
//! This module provides functionality for:
//! - Listing available serial ports
//! - Opening the port the simulated sensor writes to
//! - Running the timed frame emitter against any byte sink

pub mod emitter;
pub mod port;

pub use emitter::{run_session, Emitter, RunOutcome};
pub use port::{PortConfig, SerialConnection};

use std::io::{self, Write};

/// A writable endpoint that must be released exactly once
///
/// `close` consumes the sink, so a closed sink cannot be written to or
/// closed again.
pub trait Sink: Write {
    fn close(self) -> io::Result<()>
    where
        Self: Sized;
}
